use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::balance::{FoodBalance, FoodTable, ObstacleBalance};
use super::types::{Direction, FieldSize, Point};

/// Difficulty preset. Chosen before a run and fixed for its duration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameMode {
    pub name: String,
    pub tick_interval_ms: u64,
    pub obstacle_count: usize,
    /// Added to the random base food count.
    pub food_bonus: usize,
    pub obstacle_growth_rate: f64,
    pub extra_life_chance: f64,
    pub moving_obstacles: bool,
}

impl GameMode {
    pub fn normal() -> Self {
        Self {
            name: "normal".to_string(),
            tick_interval_ms: 150,
            obstacle_count: 10,
            food_bonus: 1,
            obstacle_growth_rate: 0.7,
            extra_life_chance: 0.0,
            moving_obstacles: false,
        }
    }

    pub fn fast() -> Self {
        Self {
            name: "fast".to_string(),
            tick_interval_ms: 100,
            obstacle_count: 6,
            food_bonus: 2,
            obstacle_growth_rate: 0.5,
            extra_life_chance: 0.0,
            moving_obstacles: false,
        }
    }

    pub fn hard() -> Self {
        Self {
            name: "hard".to_string(),
            tick_interval_ms: 120,
            obstacle_count: 16,
            food_bonus: 1,
            obstacle_growth_rate: 1.0,
            extra_life_chance: 0.1,
            moving_obstacles: false,
        }
    }

    pub fn expert() -> Self {
        Self {
            name: "expert".to_string(),
            tick_interval_ms: 80,
            obstacle_count: 24,
            food_bonus: 0,
            obstacle_growth_rate: 1.5,
            extra_life_chance: 0.1,
            moving_obstacles: true,
        }
    }

    pub fn presets() -> Vec<GameMode> {
        vec![Self::normal(), Self::fast(), Self::hard(), Self::expert()]
    }

    pub fn by_name(name: &str) -> Option<GameMode> {
        Self::presets()
            .into_iter()
            .find(|mode| mode.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for GameMode {
    fn default() -> Self {
        Self::normal()
    }
}

impl Validate for GameMode {
    fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("mode name must not be empty".to_string());
        }
        if self.tick_interval_ms < 10 || self.tick_interval_ms > 5000 {
            return Err("Tick interval must be between 10ms and 5000ms".to_string());
        }
        if self.obstacle_growth_rate < 0.0 {
            return Err("obstacle_growth_rate must not be negative".to_string());
        }
        if !(0.0..=1.0).contains(&self.extra_life_chance) {
            return Err("extra_life_chance must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DangerZoneShape {
    /// Only the cells straight ahead of the head.
    Ahead,
    /// All four rays from the head.
    Cross,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DangerZone {
    pub range: u32,
    pub shape: DangerZoneShape,
}

impl Default for DangerZone {
    fn default() -> Self {
        Self {
            range: 5,
            shape: DangerZoneShape::Ahead,
        }
    }
}

impl DangerZone {
    pub fn contains(&self, head: Point, direction: Direction, cell: Point) -> bool {
        let directions: &[Direction] = match self.shape {
            DangerZoneShape::Ahead => &[direction],
            DangerZoneShape::Cross => &Direction::ALL,
        };
        directions.iter().any(|d| {
            let (dx, dy) = d.delta();
            (1..=self.range as i32).any(|step| Point::new(head.x + dx * step, head.y + dy * step) == cell)
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedBoost {
    pub factor: f64,
    pub min_interval_ms: u64,
    pub duration_ms: u64,
}

impl Default for SpeedBoost {
    fn default() -> Self {
        Self {
            factor: 0.6,
            min_interval_ms: 50,
            duration_ms: 5000,
        }
    }
}

impl SpeedBoost {
    pub fn boosted_interval_ms(&self, base_ms: u64) -> u64 {
        ((base_ms as f64 * self.factor).round() as u64).max(self.min_interval_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub field_size: FieldSize,
    pub mode: GameMode,
    /// Head first.
    pub initial_body: Vec<Point>,
    pub initial_direction: Direction,
    pub initial_lives: u32,
    /// `None` means lives are not capped.
    pub max_lives: Option<u32>,
    pub invincibility_ms: u64,
    pub danger_zone: DangerZone,
    /// Keep obstacles off the cells next to food.
    pub food_clearance: bool,
    pub obstacle_refresh_every: u32,
    /// Moving obstacles only step once the score is above this.
    pub moving_update_score: u32,
    pub speed_boost: SpeedBoost,
    pub food: FoodBalance,
    pub food_table: FoodTable,
    pub obstacles: ObstacleBalance,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            field_size: FieldSize::default(),
            mode: GameMode::default(),
            initial_body: vec![Point::new(3, 1), Point::new(2, 1), Point::new(1, 1)],
            initial_direction: Direction::Right,
            initial_lives: 1,
            max_lives: Some(10),
            invincibility_ms: 2000,
            danger_zone: DangerZone::default(),
            food_clearance: false,
            obstacle_refresh_every: 5,
            moving_update_score: 10,
            speed_boost: SpeedBoost::default(),
            food: FoodBalance::default(),
            food_table: FoodTable::default(),
            obstacles: ObstacleBalance::default(),
        }
    }
}

impl GameSettings {
    pub fn with_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if self.field_size.width < 5 || self.field_size.height < 5 {
            return Err("field dimensions must be at least 5x5".to_string());
        }
        if self.field_size.width > 200 || self.field_size.height > 200 {
            return Err("field dimensions must not exceed 200x200".to_string());
        }
        if self.initial_body.is_empty() {
            return Err("initial_body must contain at least one segment".to_string());
        }
        let mut seen = HashSet::new();
        for segment in &self.initial_body {
            if !self.field_size.in_bounds(*segment) {
                return Err(format!("initial segment ({}, {}) is outside the field", segment.x, segment.y));
            }
            if !seen.insert(*segment) {
                return Err(format!("initial segment ({}, {}) is duplicated", segment.x, segment.y));
            }
        }
        for pair in self.initial_body.windows(2) {
            if pair[0].manhattan_distance(pair[1]) != 1 {
                return Err("initial_body segments must be adjacent".to_string());
            }
        }
        if self.initial_body.len() > 1
            && self.initial_body[0].moved(self.initial_direction.opposite()) != self.initial_body[1]
        {
            return Err("initial_direction must point away from the neck".to_string());
        }
        if self.initial_lives == 0 {
            return Err("initial_lives must be at least 1".to_string());
        }
        if let Some(max) = self.max_lives
            && max < self.initial_lives
        {
            return Err("max_lives must not be lower than initial_lives".to_string());
        }
        if self.obstacle_refresh_every == 0 {
            return Err("obstacle_refresh_every must be greater than 0".to_string());
        }
        if self.speed_boost.factor <= 0.0 || self.speed_boost.factor > 1.0 {
            return Err("speed_boost factor must be greater than 0 and at most 1".to_string());
        }
        self.mode.validate()?;
        self.food.validate()?;
        self.food_table.validate()?;
        self.obstacles.validate()?;
        Ok(())
    }
}
