use std::time::Duration;

use serde::Serialize;

use crate::{log, SessionRng};
use super::entity::{MoveResult, Snake};
use super::objects::{ObjectField, PlacementContext};
use super::settings::{GameMode, GameSettings};
use super::types::{Direction, FoodItem, FoodKind, Obstacle, Point};

/// Callbacks injected at construction; every method defaults to a no-op.
pub trait SimulationHooks {
    fn on_food_consumed(&mut self, _item: &FoodItem, _score: u32) {}

    fn on_obstacles_refreshed(&mut self, _obstacles: &[Obstacle]) {}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl SimulationHooks for NoHooks {}

/// Read-only view of the board handed to renderers after every tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub segments: Vec<Point>,
    pub food: Vec<FoodItem>,
    pub obstacles: Vec<Obstacle>,
    pub lives: u32,
    pub invincible: bool,
    pub score: u32,
    pub game_over: bool,
    pub ate: bool,
    pub food_effect: Option<FoodKind>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub movement: MoveResult,
    pub score_delta: u32,
    pub obstacles_refreshed: bool,
    pub snapshot: Snapshot,
}

pub struct Simulation<H: SimulationHooks = NoHooks> {
    settings: GameSettings,
    snake: Snake,
    field: ObjectField,
    rng: SessionRng,
    hooks: H,
    score: u32,
    food_since_refresh: u32,
    tick: u64,
    clock_ms: u64,
    boost_until: Option<u64>,
    game_over: bool,
    last_move: MoveResult,
}

impl Simulation<NoHooks> {
    pub fn new(settings: GameSettings, rng: SessionRng) -> Self {
        Self::with_hooks(settings, rng, NoHooks)
    }
}

impl<H: SimulationHooks> Simulation<H> {
    pub fn with_hooks(settings: GameSettings, rng: SessionRng, hooks: H) -> Self {
        let snake = Snake::new(&settings);
        let field = ObjectField::new(&settings);
        let mut simulation = Self {
            settings,
            snake,
            field,
            rng,
            hooks,
            score: 0,
            food_since_refresh: 0,
            tick: 0,
            clock_ms: 0,
            boost_until: None,
            game_over: false,
            last_move: MoveResult::default(),
        };
        simulation.reset();
        simulation
    }

    /// Fresh snake, fresh food and obstacles, zeroed score and clock.
    pub fn reset(&mut self) {
        self.snake.reset();
        self.field.clear();
        self.score = 0;
        self.food_since_refresh = 0;
        self.tick = 0;
        self.clock_ms = 0;
        self.boost_until = None;
        self.game_over = false;
        self.last_move = MoveResult::default();

        self.refill_food();
        self.refresh_obstacles();
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn mode(&self) -> &GameMode {
        &self.settings.mode
    }

    pub(crate) fn set_mode(&mut self, mode: GameMode) {
        self.settings.mode = mode;
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn field(&self) -> &ObjectField {
        &self.field
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.snake.set_direction(direction);
    }

    pub fn speed_boost_active(&self) -> bool {
        self.boost_until.is_some_and(|until| self.clock_ms < until)
    }

    /// Interval the scheduler should wait before the next tick.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms())
    }

    fn tick_interval_ms(&self) -> u64 {
        let base = self.settings.mode.tick_interval_ms;
        if self.speed_boost_active() {
            self.settings.speed_boost.boosted_interval_ms(base)
        } else {
            base
        }
    }

    pub fn tick(&mut self) -> StepOutcome {
        if self.game_over {
            return StepOutcome {
                movement: self.last_move,
                score_delta: 0,
                obstacles_refreshed: false,
                snapshot: self.snapshot(),
            };
        }

        self.clock_ms += self.tick_interval_ms();
        self.tick += 1;

        let movement = self
            .snake
            .advance(self.field.food(), self.field.obstacles(), self.clock_ms);
        self.last_move = movement;

        if movement.game_over {
            self.game_over = true;
            log!("Game over at tick {} with score {}", self.tick, self.score);
            return StepOutcome {
                movement,
                score_delta: 0,
                obstacles_refreshed: false,
                snapshot: self.snapshot(),
            };
        }

        let mut score_delta = 0;
        let mut obstacles_refreshed = false;

        if movement.ate {
            score_delta = self.consume_food();
            self.refill_food();

            self.food_since_refresh += 1;
            if self.food_since_refresh >= self.settings.obstacle_refresh_every {
                self.refresh_obstacles();
                obstacles_refreshed = true;
            }
        }

        if self.score > self.settings.moving_update_score {
            self.field.update_moving_obstacles(&self.snake, &mut self.rng);
        }

        StepOutcome {
            movement,
            score_delta,
            obstacles_refreshed,
            snapshot: self.snapshot(),
        }
    }

    fn consume_food(&mut self) -> u32 {
        let head = self.snake.head();
        let Some(item) = self.field.remove_food_at(head) else {
            return 0;
        };

        let delta = match item.kind {
            FoodKind::Score => 2,
            _ => 1,
        };
        self.score += delta;

        if item.kind == FoodKind::Speed {
            self.boost_until = Some(self.clock_ms + self.settings.speed_boost.duration_ms);
        }

        self.hooks.on_food_consumed(&item, self.score);
        delta
    }

    fn refill_food(&mut self) {
        let target = self.settings.food.target_count(
            &self.settings.mode,
            self.score,
            self.snake.len(),
            &mut self.rng,
        );
        let ctx = PlacementContext {
            mode: &self.settings.mode,
            score: self.score,
        };
        self.field.place_food(&self.snake, target, ctx, &mut self.rng);
    }

    fn refresh_obstacles(&mut self) {
        self.food_since_refresh = 0;

        let count = self.settings.obstacles.target_count(
            &self.settings.mode,
            self.score,
            self.snake.len(),
            &self.settings.field_size,
        );
        let ctx = PlacementContext {
            mode: &self.settings.mode,
            score: self.score,
        };
        let obstacles = self.field.place_obstacles(count, &self.snake, ctx, &mut self.rng);
        log!("Obstacles refreshed: {} placed", obstacles.len());
        self.hooks.on_obstacles_refreshed(&obstacles);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            segments: self.snake.segments(),
            food: self.field.food().to_vec(),
            obstacles: self.field.obstacles().to_vec(),
            lives: self.snake.lives,
            invincible: self.snake.is_invincible(self.clock_ms),
            score: self.score,
            game_over: self.game_over,
            ate: self.last_move.ate,
            food_effect: self.last_move.food_effect,
        }
    }
}
