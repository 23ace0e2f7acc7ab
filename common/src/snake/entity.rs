use std::collections::{HashSet, VecDeque};

use crate::log;
use super::settings::GameSettings;
use super::types::{Direction, FieldSize, FoodItem, FoodKind, Obstacle, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionKind {
    Wall,
    Obstacle,
    SelfCollision,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveResult {
    pub game_over: bool,
    pub ate: bool,
    pub food_effect: Option<FoodKind>,
    pub collision: Option<CollisionKind>,
    pub life_lost: bool,
}

#[derive(Clone, Debug)]
pub struct Snake {
    pub body: VecDeque<Point>,
    pub body_set: HashSet<Point>,
    pub direction: Direction,
    pub pending_direction: Option<Direction>,
    pub lives: u32,
    pub invincible_until: Option<u64>,
    field_size: FieldSize,
    max_lives: Option<u32>,
    invincibility_ms: u64,
    initial_body: Vec<Point>,
    initial_direction: Direction,
    initial_lives: u32,
}

impl Snake {
    pub fn new(settings: &GameSettings) -> Self {
        let mut snake = Self {
            body: VecDeque::new(),
            body_set: HashSet::new(),
            direction: settings.initial_direction,
            pending_direction: None,
            lives: settings.initial_lives,
            invincible_until: None,
            field_size: settings.field_size,
            max_lives: settings.max_lives,
            invincibility_ms: settings.invincibility_ms,
            initial_body: settings.initial_body.clone(),
            initial_direction: settings.initial_direction,
            initial_lives: settings.initial_lives,
        };
        snake.reset();
        snake
    }

    pub fn reset(&mut self) {
        self.body = self.initial_body.iter().copied().collect();
        self.body_set = self.initial_body.iter().copied().collect();
        self.direction = self.initial_direction;
        self.pending_direction = None;
        self.lives = self.initial_lives;
        self.invincible_until = None;
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Point) -> bool {
        self.body_set.contains(&cell)
    }

    pub fn segments(&self) -> Vec<Point> {
        self.body.iter().copied().collect()
    }

    pub fn is_invincible(&self, now_ms: u64) -> bool {
        self.invincible_until.is_some_and(|deadline| now_ms < deadline)
    }

    /// Queues a turn. Reversals are ignored; the last call before a tick wins.
    pub fn set_direction(&mut self, direction: Direction) {
        if !direction.is_opposite(&self.direction) {
            self.pending_direction = Some(direction);
        }
    }

    pub fn advance(&mut self, food: &[FoodItem], obstacles: &[Obstacle], now_ms: u64) -> MoveResult {
        if let Some(next) = self.pending_direction.take()
            && !next.is_opposite(&self.direction)
        {
            self.direction = next;
        }

        if self.invincible_until.is_some_and(|deadline| now_ms >= deadline) {
            self.invincible_until = None;
        }
        let invincible = self.is_invincible(now_ms);

        let new_head = self.head().moved(self.direction);

        let collision = if !self.field_size.in_bounds(new_head) {
            Some(CollisionKind::Wall)
        } else if obstacles.iter().any(|o| o.position == new_head) {
            Some(CollisionKind::Obstacle)
        } else if self.body_set.contains(&new_head) {
            Some(CollisionKind::SelfCollision)
        } else {
            None
        };

        if let Some(kind) = collision {
            if !invincible {
                return self.take_hit(kind, now_ms);
            }
            // Obstacles are passable while invincible; walls and the body are not.
            // The body can lie on an obstacle cell it passed earlier.
            if kind != CollisionKind::Obstacle || self.body_set.contains(&new_head) {
                let held = if kind == CollisionKind::Obstacle {
                    CollisionKind::SelfCollision
                } else {
                    kind
                };
                return MoveResult {
                    collision: Some(held),
                    ..MoveResult::default()
                };
            }
        }

        let mut result = MoveResult {
            collision,
            ..MoveResult::default()
        };

        if let Some(item) = food.iter().find(|f| f.position == new_head) {
            result.ate = true;
            result.food_effect = Some(item.kind);
            if item.kind == FoodKind::Life && self.max_lives.is_none_or(|max| self.lives < max) {
                self.lives += 1;
            }
        } else {
            let tail = self
                .body
                .pop_back()
                .expect("Snake body should never be empty");
            self.body_set.remove(&tail);
        }

        self.body.push_front(new_head);
        self.body_set.insert(new_head);

        result
    }

    fn take_hit(&mut self, kind: CollisionKind, now_ms: u64) -> MoveResult {
        self.lives = self.lives.saturating_sub(1);
        let game_over = self.lives == 0;
        if game_over {
            log!("Snake crashed ({:?}) at length {}", kind, self.len());
        } else {
            self.invincible_until = Some(now_ms + self.invincibility_ms);
            log!("Snake hit {:?}, {} lives left", kind, self.lives);
        }

        MoveResult {
            game_over,
            collision: Some(kind),
            life_lost: true,
            ..MoveResult::default()
        }
    }
}
