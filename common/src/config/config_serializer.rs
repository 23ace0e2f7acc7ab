use serde::{Deserialize, Serialize};

pub trait ConfigSerializer<TConfig> {
    fn serialize(&self, config: &TConfig) -> Result<String, String>;
    fn deserialize(&self, content: &str) -> Result<TConfig, String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct YamlConfigSerializer;

impl<TConfig> ConfigSerializer<TConfig> for YamlConfigSerializer
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn serialize(&self, config: &TConfig) -> Result<String, String> {
        serde_yaml_ng::to_string(config).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    fn deserialize(&self, content: &str) -> Result<TConfig, String> {
        serde_yaml_ng::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::{GameMode, GameSettings};

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "mode:\n  name: hard\n  tick_interval_ms: 120\n  obstacle_count: 16\n  food_bonus: 1\n  obstacle_growth_rate: 1.0\n  extra_life_chance: 0.1\n  moving_obstacles: false\ninitial_lives: 3\n";
        let settings: GameSettings = YamlConfigSerializer.deserialize(yaml).unwrap();
        assert_eq!(settings.mode, GameMode::hard());
        assert_eq!(settings.initial_lives, 3);
        assert_eq!(settings.invincibility_ms, 2000);
        assert_eq!(settings.field_size, GameSettings::default().field_size);
    }

    #[test]
    fn test_malformed_yaml_is_reported() {
        let result: Result<GameSettings, String> = YamlConfigSerializer.deserialize("initial_lives: [");
        assert!(result.unwrap_err().starts_with("Failed to parse config"));
    }
}
