use serde::{Deserialize, Serialize};

use crate::SessionRng;
use crate::config::Validate;
use super::settings::GameMode;
use super::types::{FieldSize, FoodKind};

/// How many food items should be on the field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodBalance {
    pub max_count: usize,
    pub score_bonus_every: u32,
    pub long_snake_length: usize,
}

impl Default for FoodBalance {
    fn default() -> Self {
        Self {
            max_count: 8,
            score_bonus_every: 10,
            long_snake_length: 15,
        }
    }
}

impl FoodBalance {
    pub fn target_count(&self, mode: &GameMode, score: u32, snake_len: usize, rng: &mut SessionRng) -> usize {
        let base = rng.random_range(1..=3usize);
        let bonus = (score / self.score_bonus_every.max(1)) as usize;
        let mut target = (base + mode.food_bonus + bonus).min(self.max_count);
        if snake_len > self.long_snake_length {
            target = target.saturating_sub(1).max(1);
        }
        target
    }
}

impl Validate for FoodBalance {
    fn validate(&self) -> Result<(), String> {
        if self.max_count == 0 {
            return Err("food max_count must be at least 1".to_string());
        }
        if self.score_bonus_every == 0 {
            return Err("food score_bonus_every must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Probability table for the kind of each newly placed food item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodTable {
    pub life_probability: f64,
    pub speed_probability: f64,
    pub score_probability: f64,
    pub score_threshold: u32,
    pub score_food_probability: f64,
    pub length_threshold: usize,
    pub length_speed_probability: f64,
}

impl Default for FoodTable {
    fn default() -> Self {
        Self {
            life_probability: 0.2,
            speed_probability: 0.0,
            score_probability: 0.0,
            score_threshold: 5,
            score_food_probability: 0.15,
            length_threshold: 10,
            length_speed_probability: 0.1,
        }
    }
}

impl FoodTable {
    /// (life, speed, score) probabilities for the current progress.
    pub fn probabilities(&self, mode: &GameMode, score: u32, snake_len: usize) -> (f64, f64, f64) {
        let mut life = self.life_probability;
        let mut speed = self.speed_probability;
        let mut bonus = self.score_probability;

        if score > self.score_threshold {
            bonus = self.score_food_probability;
            life = self.score_food_probability;
        }

        if snake_len > self.length_threshold {
            speed = self.length_speed_probability;
            life = self.life_probability;
        }

        life += mode.extra_life_chance;

        (life, speed, bonus)
    }

    pub fn roll(&self, mode: &GameMode, score: u32, snake_len: usize, rng: &mut SessionRng) -> FoodKind {
        let (life, speed, bonus) = self.probabilities(mode, score, snake_len);
        let roll: f64 = rng.random();
        if roll < life {
            FoodKind::Life
        } else if roll < life + speed {
            FoodKind::Speed
        } else if roll < life + speed + bonus {
            FoodKind::Score
        } else {
            FoodKind::Normal
        }
    }
}

impl Validate for FoodTable {
    fn validate(&self) -> Result<(), String> {
        let probabilities = [
            ("life_probability", self.life_probability),
            ("speed_probability", self.speed_probability),
            ("score_probability", self.score_probability),
            ("score_food_probability", self.score_food_probability),
            ("length_speed_probability", self.length_speed_probability),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0.0 and 1.0", name));
            }
        }
        Ok(())
    }
}

/// How many obstacles a refresh should place, and when they start moving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleBalance {
    pub score_factor_every: u32,
    pub max_area_fraction: f64,
    pub moving_score_threshold: u32,
    pub moving_probability: f64,
}

impl Default for ObstacleBalance {
    fn default() -> Self {
        Self {
            score_factor_every: 5,
            max_area_fraction: 0.3,
            moving_score_threshold: 10,
            moving_probability: 0.2,
        }
    }
}

impl ObstacleBalance {
    pub fn target_count(&self, mode: &GameMode, score: u32, snake_len: usize, field_size: &FieldSize) -> usize {
        let base = mode.obstacle_count as i64;
        let score_factor = (score / self.score_factor_every.max(1)) as f64;
        let additional = (score_factor * mode.obstacle_growth_rate).floor() as i64;

        let length_adjustment = if snake_len > 20 {
            -2
        } else if snake_len > 10 {
            -1
        } else {
            0
        };

        let count = base.max(base + additional + length_adjustment) as usize;
        let cap = (field_size.area() as f64 * self.max_area_fraction).floor() as usize;
        count.min(cap)
    }

    pub fn allows_moving(&self, mode: &GameMode, score: u32) -> bool {
        mode.moving_obstacles && score > self.moving_score_threshold
    }
}

impl Validate for ObstacleBalance {
    fn validate(&self) -> Result<(), String> {
        if self.score_factor_every == 0 {
            return Err("obstacle score_factor_every must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.max_area_fraction) {
            return Err("obstacle max_area_fraction must be between 0.0 and 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.moving_probability) {
            return Err("obstacle moving_probability must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_target_count_in_range() {
        let balance = FoodBalance::default();
        let mode = GameMode::normal();
        let mut rng = SessionRng::new(5);
        for _ in 0..50 {
            let target = balance.target_count(&mode, 0, 3, &mut rng);
            assert!((2..=4).contains(&target));
        }
    }

    #[test]
    fn test_food_target_count_capped_and_reduced_for_long_snake() {
        let balance = FoodBalance::default();
        let mode = GameMode::fast();
        let mut rng = SessionRng::new(5);
        for _ in 0..50 {
            assert!(balance.target_count(&mode, 100, 3, &mut rng) <= 8);
            assert_eq!(balance.target_count(&mode, 1000, 16, &mut rng), 7);
        }
    }

    #[test]
    fn test_food_probabilities_follow_progress() {
        let table = FoodTable::default();
        let normal = GameMode::normal();
        assert_eq!(table.probabilities(&normal, 0, 3), (0.2, 0.0, 0.0));
        assert_eq!(table.probabilities(&normal, 6, 3), (0.15, 0.0, 0.15));
        assert_eq!(table.probabilities(&normal, 6, 11), (0.2, 0.1, 0.15));

        let (life, _, _) = table.probabilities(&GameMode::hard(), 0, 3);
        assert!((life - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_food_roll_without_specials_is_normal() {
        let table = FoodTable {
            life_probability: 0.0,
            ..FoodTable::default()
        };
        let mut rng = SessionRng::new(11);
        for _ in 0..50 {
            assert_eq!(table.roll(&GameMode::normal(), 0, 3, &mut rng), FoodKind::Normal);
        }
    }

    #[test]
    fn test_obstacle_target_count() {
        let balance = ObstacleBalance::default();
        let field = FieldSize::default();
        let expert = GameMode::expert();
        assert_eq!(balance.target_count(&expert, 0, 3, &field), 24);
        // 20 / 5 = 4, 4 * 1.5 = 6
        assert_eq!(balance.target_count(&expert, 20, 3, &field), 30);
        assert_eq!(balance.target_count(&expert, 20, 12, &field), 29);
        // Never below the mode's base count.
        assert_eq!(balance.target_count(&expert, 0, 25, &field), 24);
    }

    #[test]
    fn test_obstacle_target_count_capped_by_area() {
        let balance = ObstacleBalance::default();
        let field = FieldSize::new(5, 5);
        assert_eq!(balance.target_count(&GameMode::expert(), 0, 3, &field), 7);
    }

    #[test]
    fn test_moving_obstacles_only_in_expert_after_threshold() {
        let balance = ObstacleBalance::default();
        assert!(!balance.allows_moving(&GameMode::expert(), 10));
        assert!(balance.allows_moving(&GameMode::expert(), 11));
        assert!(!balance.allows_moving(&GameMode::hard(), 50));
    }
}
