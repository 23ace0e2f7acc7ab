use serde::{Deserialize, Serialize};

use snake_common::config::Validate;
use snake_common::snake::{GameMode, GameSettings};

use crate::autopilot::AutopilotKind;

pub const DEFAULT_CONFIG_PATH: &str = "snake_runner_config.yaml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub game: GameSettings,
    /// Fresh random seed when absent.
    pub seed: Option<u64>,
    /// Stop after this many ticks even if the snake is still alive.
    pub max_ticks: Option<u64>,
    pub autopilot: AutopilotKind,
}

impl RunnerConfig {
    pub fn with_overrides(
        mut self,
        mode: Option<&str>,
        seed: Option<u64>,
        max_ticks: Option<u64>,
        autopilot: Option<AutopilotKind>,
    ) -> Result<Self, String> {
        if let Some(name) = mode {
            self.game.mode = GameMode::by_name(name).ok_or_else(|| format!("Unknown mode: {}", name))?;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        if max_ticks.is_some() {
            self.max_ticks = max_ticks;
        }
        if let Some(kind) = autopilot {
            self.autopilot = kind;
        }
        self.validate()?;
        Ok(self)
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_ticks == Some(0) {
            return Err("max_ticks must be greater than 0".to_string());
        }
        self.game.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_common::config::{ConfigManager, MemoryContentConfigProvider, YamlConfigSerializer};

    #[test]
    fn test_overrides_apply() {
        let config = RunnerConfig::default()
            .with_overrides(Some("expert"), Some(42), Some(100), Some(AutopilotKind::Random))
            .unwrap();
        assert_eq!(config.game.mode, GameMode::expert());
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_ticks, Some(100));
        assert_eq!(config.autopilot, AutopilotKind::Random);
    }

    #[test]
    fn test_absent_overrides_keep_file_values() {
        let base = RunnerConfig {
            seed: Some(9),
            ..RunnerConfig::default()
        };
        let config = base.clone().with_overrides(None, None, None, None).unwrap();
        assert_eq!(config, base);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = RunnerConfig::default()
            .with_overrides(Some("nightmare"), None, None, None)
            .unwrap_err();
        assert_eq!(err, "Unknown mode: nightmare");
    }

    #[test]
    fn test_zero_max_ticks_rejected() {
        assert!(RunnerConfig::default().with_overrides(None, None, Some(0), None).is_err());
    }

    #[test]
    fn test_load_from_yaml() {
        let yaml = "seed: 7\nautopilot: random\ngame:\n  initial_lives: 3\n";
        let manager: ConfigManager<_, RunnerConfig> =
            ConfigManager::new(MemoryContentConfigProvider::with_content(yaml), YamlConfigSerializer);
        let config = manager.get_config().unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.autopilot, AutopilotKind::Random);
        assert_eq!(config.game.initial_lives, 3);
        assert_eq!(config.game.mode, GameMode::normal());
    }
}
