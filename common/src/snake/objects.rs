use std::collections::HashSet;

use crate::{log, SessionRng};
use super::balance::{FoodTable, ObstacleBalance};
use super::settings::{DangerZone, GameMode, GameSettings};
use super::entity::Snake;
use super::types::{Axis, FieldSize, FoodItem, Obstacle, ObstacleKind, Point};

/// Progress values that drive food kinds and obstacle behaviour.
#[derive(Clone, Copy, Debug)]
pub struct PlacementContext<'a> {
    pub mode: &'a GameMode,
    pub score: u32,
}

/// Food and obstacles on the field. Nothing here overlaps the snake at
/// placement time, and no two items share a cell.
#[derive(Clone, Debug)]
pub struct ObjectField {
    pub(crate) food: Vec<FoodItem>,
    pub(crate) obstacles: Vec<Obstacle>,
    field_size: FieldSize,
    food_table: FoodTable,
    obstacle_balance: ObstacleBalance,
    danger_zone: DangerZone,
    food_clearance: bool,
}

impl ObjectField {
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            food: Vec::new(),
            obstacles: Vec::new(),
            field_size: settings.field_size,
            food_table: settings.food_table.clone(),
            obstacle_balance: settings.obstacles.clone(),
            danger_zone: settings.danger_zone,
            food_clearance: settings.food_clearance,
        }
    }

    pub fn food(&self) -> &[FoodItem] {
        &self.food
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn clear(&mut self) {
        self.food.clear();
        self.obstacles.clear();
    }

    pub fn food_at(&self, cell: Point) -> Option<&FoodItem> {
        self.food.iter().find(|f| f.position == cell)
    }

    pub fn remove_food_at(&mut self, cell: Point) -> Option<FoodItem> {
        let idx = self.food.iter().position(|f| f.position == cell)?;
        Some(self.food.remove(idx))
    }

    pub fn is_occupied_by_snake(&self, cell: Point, snake: &Snake) -> bool {
        snake.contains(cell)
    }

    pub fn is_occupied_by_obstacle(&self, cell: Point) -> bool {
        self.obstacles.iter().any(|o| o.position == cell)
    }

    fn occupied_cells(&self, snake: &Snake) -> HashSet<Point> {
        snake
            .body
            .iter()
            .copied()
            .chain(self.obstacles.iter().map(|o| o.position))
            .chain(self.food.iter().map(|f| f.position))
            .collect()
    }

    /// Tops food up to `target_count` and returns the items placed by this call.
    /// A crowded board yields fewer items than asked for.
    pub fn place_food(
        &mut self,
        snake: &Snake,
        target_count: usize,
        ctx: PlacementContext<'_>,
        rng: &mut SessionRng,
    ) -> Vec<FoodItem> {
        self.food.retain(|f| !snake.contains(f.position));

        let mut occupied = self.occupied_cells(snake);
        let mut placed = Vec::new();

        while self.food.len() < target_count {
            let Some(cell) = self.field_size.sample_free(&occupied, rng) else {
                log!("Board full: {} of {} food items on the field", self.food.len(), target_count);
                break;
            };

            let kind = self.food_table.roll(ctx.mode, ctx.score, snake.len(), rng);
            let item = FoodItem::new(cell, kind);
            occupied.insert(cell);
            self.food.push(item);
            placed.push(item);
        }

        placed
    }

    pub fn in_danger_zone(&self, cell: Point, snake: &Snake) -> bool {
        self.danger_zone.contains(snake.head(), snake.direction, cell)
    }

    /// Replaces every obstacle with a fresh set of at most `count`.
    pub fn place_obstacles(
        &mut self,
        count: usize,
        snake: &Snake,
        ctx: PlacementContext<'_>,
        rng: &mut SessionRng,
    ) -> Vec<Obstacle> {
        self.obstacles.clear();

        let occupied = self.occupied_cells(snake);
        let field_size = &self.field_size;
        let near_food: HashSet<Point> = if self.food_clearance {
            self.food
                .iter()
                .flat_map(move |f| field_size.neighbours(f.position))
                .collect()
        } else {
            HashSet::new()
        };

        let mut candidates: Vec<Point> = self
            .field_size
            .list_free_cells(&occupied)
            .into_iter()
            .filter(|cell| !self.in_danger_zone(*cell, snake) && !near_food.contains(cell))
            .collect();

        if candidates.len() < count {
            log!("Only {} safe cells for {} obstacles", candidates.len(), count);
        }

        let allow_moving = self.obstacle_balance.allows_moving(ctx.mode, ctx.score);

        while self.obstacles.len() < count {
            let Some(idx) = rng.pick_index(candidates.len()) else {
                break;
            };
            let cell = candidates.swap_remove(idx);

            let kind = if allow_moving && rng.chance(self.obstacle_balance.moving_probability) {
                let axis = if rng.random_bool() { Axis::Horizontal } else { Axis::Vertical };
                ObstacleKind::Moving(axis)
            } else {
                ObstacleKind::Static
            };

            self.obstacles.push(Obstacle::new(cell, kind));
        }

        self.obstacles.clone()
    }

    /// Moves each moving obstacle one random step along its axis when the
    /// target cell is inside the field and free.
    pub fn update_moving_obstacles(&mut self, snake: &Snake, rng: &mut SessionRng) {
        if !self.obstacles.iter().any(Obstacle::is_moving) {
            return;
        }

        let mut obstacle_cells: HashSet<Point> = self.obstacles.iter().map(|o| o.position).collect();
        let food_cells: HashSet<Point> = self.food.iter().map(|f| f.position).collect();

        for obstacle in self.obstacles.iter_mut() {
            let ObstacleKind::Moving(axis) = obstacle.kind else {
                continue;
            };

            let step = if rng.random_bool() { 1 } else { -1 };
            let from = obstacle.position;
            let to = match axis {
                Axis::Horizontal => Point::new(from.x + step, from.y),
                Axis::Vertical => Point::new(from.x, from.y + step),
            };

            let free = self.field_size.in_bounds(to)
                && !snake.contains(to)
                && !obstacle_cells.contains(&to)
                && !food_cells.contains(&to);

            if free {
                obstacle_cells.remove(&from);
                obstacle_cells.insert(to);
                obstacle.position = to;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::types::{Direction, FoodKind};

    fn settings() -> GameSettings {
        GameSettings::default()
    }

    fn ctx(mode: &GameMode, score: u32) -> PlacementContext<'_> {
        PlacementContext { mode, score }
    }

    fn assert_no_overlap(field: &ObjectField, snake: &Snake) {
        let mut seen = HashSet::new();
        for f in field.food() {
            assert!(!snake.contains(f.position), "food on snake at {:?}", f.position);
            assert!(seen.insert(f.position), "duplicate cell {:?}", f.position);
        }
        for o in field.obstacles() {
            assert!(!snake.contains(o.position), "obstacle on snake at {:?}", o.position);
            assert!(seen.insert(o.position), "duplicate cell {:?}", o.position);
        }
    }

    #[test]
    fn test_place_food_fills_to_target_without_overlap() {
        let settings = settings();
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        let mode = GameMode::normal();
        let mut rng = SessionRng::new(42);

        field.place_obstacles(30, &snake, ctx(&mode, 0), &mut rng);
        let placed = field.place_food(&snake, 5, ctx(&mode, 0), &mut rng);

        assert_eq!(placed.len(), 5);
        assert_eq!(field.food().len(), 5);
        assert_no_overlap(&field, &snake);
    }

    #[test]
    fn test_place_food_drops_food_under_snake() {
        let settings = settings();
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        field.food.push(FoodItem::new(Point::new(2, 1), FoodKind::Normal));
        let mode = GameMode::normal();
        let mut rng = SessionRng::new(1);

        field.place_food(&snake, 1, ctx(&mode, 0), &mut rng);

        assert_eq!(field.food().len(), 1);
        assert_ne!(field.food()[0].position, Point::new(2, 1));
    }

    #[test]
    fn test_place_food_on_nearly_full_board() {
        let settings = GameSettings {
            field_size: FieldSize::new(5, 5),
            ..GameSettings::default()
        };
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        let snake_cells: HashSet<Point> = snake.body.iter().copied().collect();
        let mut free = settings.field_size.list_free_cells(&snake_cells);
        let last = free.pop().unwrap();
        field.obstacles = free
            .into_iter()
            .map(|p| Obstacle::new(p, ObstacleKind::Static))
            .collect();

        let mode = GameMode::normal();
        let mut rng = SessionRng::new(8);
        let placed = field.place_food(&snake, 5, ctx(&mode, 0), &mut rng);

        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].position, last);

        let placed_again = field.place_food(&snake, 5, ctx(&mode, 0), &mut rng);
        assert!(placed_again.is_empty());
    }

    #[test]
    fn test_obstacles_avoid_danger_zone() {
        let settings = settings();
        let snake = Snake::new(&settings);
        let mode = GameMode::normal();

        for seed in 0..20 {
            let mut field = ObjectField::new(&settings);
            let mut rng = SessionRng::new(seed);
            field.place_obstacles(150, &snake, ctx(&mode, 0), &mut rng);
            for o in field.obstacles() {
                assert!(!field.in_danger_zone(o.position, &snake));
                assert!(!(o.position.y == 1 && (4..=8).contains(&o.position.x)));
            }
            assert_no_overlap(&field, &snake);
        }
    }

    #[test]
    fn test_place_obstacles_replaces_previous_set() {
        let settings = settings();
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        let mode = GameMode::normal();
        let mut rng = SessionRng::new(3);

        field.place_obstacles(10, &snake, ctx(&mode, 0), &mut rng);
        let second = field.place_obstacles(4, &snake, ctx(&mode, 0), &mut rng);

        assert_eq!(second.len(), 4);
        assert_eq!(field.obstacles().len(), 4);
    }

    #[test]
    fn test_place_obstacles_bounded_by_safe_cells() {
        let settings = GameSettings {
            field_size: FieldSize::new(5, 5),
            ..GameSettings::default()
        };
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        let mode = GameMode::normal();
        let mut rng = SessionRng::new(3);

        // 25 cells - 3 snake - 1 danger cell at (4, 1)
        let placed = field.place_obstacles(100, &snake, ctx(&mode, 0), &mut rng);
        assert_eq!(placed.len(), 21);
        assert_no_overlap(&field, &snake);
    }

    #[test]
    fn test_food_clearance_keeps_obstacles_off_food_neighbours() {
        let settings = GameSettings {
            food_clearance: true,
            ..GameSettings::default()
        };
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        field.food.push(FoodItem::new(Point::new(10, 10), FoodKind::Normal));
        let mode = GameMode::normal();
        let mut rng = SessionRng::new(17);

        field.place_obstacles(400, &snake, ctx(&mode, 0), &mut rng);

        for o in field.obstacles() {
            assert!(o.position.manhattan_distance(Point::new(10, 10)) > 1);
        }
    }

    #[test]
    fn test_static_obstacles_outside_expert() {
        let settings = settings();
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        let mode = GameMode::hard();
        let mut rng = SessionRng::new(21);

        field.place_obstacles(50, &snake, ctx(&mode, 100), &mut rng);
        assert!(field.obstacles().iter().all(|o| !o.is_moving()));
    }

    #[test]
    fn test_expert_mode_can_spawn_moving_obstacles() {
        let settings = GameSettings {
            obstacles: ObstacleBalance {
                moving_probability: 1.0,
                ..ObstacleBalance::default()
            },
            ..GameSettings::default()
        };
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        let mode = GameMode::expert();
        let mut rng = SessionRng::new(21);

        field.place_obstacles(10, &snake, ctx(&mode, 11), &mut rng);
        assert!(field.obstacles().iter().all(Obstacle::is_moving));
    }

    #[test]
    fn test_moving_obstacle_never_steps_onto_occupied_cell() {
        let settings = GameSettings {
            initial_body: vec![Point::new(6, 5), Point::new(7, 5), Point::new(8, 5)],
            initial_direction: Direction::Left,
            ..GameSettings::default()
        };
        let snake = Snake::new(&settings);

        for seed in 0..32 {
            let mut field = ObjectField::new(&settings);
            field.obstacles = vec![Obstacle::new(
                Point::new(5, 5),
                ObstacleKind::Moving(Axis::Horizontal),
            )];
            let mut rng = SessionRng::new(seed);

            field.update_moving_obstacles(&snake, &mut rng);

            let pos = field.obstacles()[0].position;
            assert!(pos == Point::new(4, 5) || pos == Point::new(5, 5));
        }
    }

    #[test]
    fn test_moving_obstacles_never_share_a_cell() {
        let settings = settings();
        let snake = Snake::new(&settings);

        for seed in 0..32 {
            let mut field = ObjectField::new(&settings);
            field.obstacles = vec![
                Obstacle::new(Point::new(10, 10), ObstacleKind::Moving(Axis::Horizontal)),
                Obstacle::new(Point::new(12, 10), ObstacleKind::Moving(Axis::Horizontal)),
                Obstacle::new(Point::new(11, 9), ObstacleKind::Moving(Axis::Vertical)),
                Obstacle::new(Point::new(11, 11), ObstacleKind::Moving(Axis::Vertical)),
            ];
            let mut rng = SessionRng::new(seed);

            for _ in 0..20 {
                field.update_moving_obstacles(&snake, &mut rng);
                let cells: HashSet<Point> = field.obstacles().iter().map(|o| o.position).collect();
                assert_eq!(cells.len(), 4);
                assert!(cells.iter().all(|c| settings.field_size.in_bounds(*c)));
            }
        }
    }

    #[test]
    fn test_moving_obstacle_stays_inside_field() {
        let settings = settings();
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        field.obstacles = vec![Obstacle::new(Point::new(0, 20), ObstacleKind::Moving(Axis::Horizontal))];
        let mut rng = SessionRng::new(5);

        for _ in 0..50 {
            field.update_moving_obstacles(&snake, &mut rng);
            assert!(settings.field_size.in_bounds(field.obstacles()[0].position));
        }
    }

    #[test]
    fn test_queries() {
        let settings = settings();
        let snake = Snake::new(&settings);
        let mut field = ObjectField::new(&settings);
        field.obstacles.push(Obstacle::new(Point::new(7, 7), ObstacleKind::Static));
        field.food.push(FoodItem::new(Point::new(9, 9), FoodKind::Score));

        assert!(field.is_occupied_by_snake(Point::new(2, 1), &snake));
        assert!(!field.is_occupied_by_snake(Point::new(7, 7), &snake));
        assert!(field.is_occupied_by_obstacle(Point::new(7, 7)));
        assert_eq!(field.food_at(Point::new(9, 9)).map(|f| f.kind), Some(FoodKind::Score));
        assert_eq!(field.remove_food_at(Point::new(9, 9)).map(|f| f.kind), Some(FoodKind::Score));
        assert!(field.food_at(Point::new(9, 9)).is_none());
        assert!(field.remove_food_at(Point::new(9, 9)).is_none());
    }
}
