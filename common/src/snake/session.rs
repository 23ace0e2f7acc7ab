use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{log, SessionRng};
use super::settings::{GameMode, GameSettings};
use super::simulation::{NoHooks, Simulation, SimulationHooks, Snapshot, StepOutcome};
use super::types::{Direction, FoodKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ready,
    Playing,
    Paused,
    Over,
}

/// Discrete notifications for score, audio and UI collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    Start,
    Eat { kind: FoodKind, score_delta: u32 },
    PowerUp(FoodKind),
    LifeLost { lives_left: u32 },
    ObstaclesRefreshed { count: usize },
    Crash { score: u32 },
    Pause,
    Resume,
}

pub struct SnakeSession<H: SimulationHooks = NoHooks> {
    simulation: Simulation<H>,
    status: GameStatus,
    events: Vec<GameEvent>,
}

impl SnakeSession<NoHooks> {
    pub fn new(settings: GameSettings, rng: SessionRng) -> Self {
        Self::with_hooks(settings, rng, NoHooks)
    }
}

impl<H: SimulationHooks> SnakeSession<H> {
    pub fn with_hooks(settings: GameSettings, rng: SessionRng, hooks: H) -> Self {
        Self {
            simulation: Simulation::with_hooks(settings, rng, hooks),
            status: GameStatus::Ready,
            events: Vec::new(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn simulation(&self) -> &Simulation<H> {
        &self.simulation
    }

    pub fn mode(&self) -> &GameMode {
        self.simulation.mode()
    }

    pub fn score(&self) -> u32 {
        self.simulation.score()
    }

    pub fn tick_interval(&self) -> Duration {
        self.simulation.tick_interval()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.simulation.snapshot()
    }

    pub fn change_mode(&mut self, mode: GameMode) -> Result<(), String> {
        if self.status != GameStatus::Ready {
            return Err(format!("Mode can only change before a run, status is {:?}", self.status));
        }
        log!("Mode changed to {}", mode.name);
        self.simulation.set_mode(mode);
        self.simulation.reset();
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), String> {
        match self.status {
            GameStatus::Ready | GameStatus::Over => {
                self.simulation.reset();
                self.status = GameStatus::Playing;
                self.events.push(GameEvent::Start);
                log!(
                    "Run started in {} mode (seed {})",
                    self.simulation.mode().name,
                    self.simulation.seed()
                );
                Ok(())
            }
            status => Err(format!("Cannot start a run while {:?}", status)),
        }
    }

    pub fn toggle_pause(&mut self) -> Result<(), String> {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                self.events.push(GameEvent::Pause);
                Ok(())
            }
            GameStatus::Paused => {
                self.status = GameStatus::Playing;
                self.events.push(GameEvent::Resume);
                Ok(())
            }
            status => Err(format!("Cannot pause while {:?}", status)),
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.simulation.set_direction(direction);
    }

    /// Runs one step while playing; `None` otherwise.
    pub fn tick(&mut self) -> Option<StepOutcome> {
        if self.status != GameStatus::Playing {
            return None;
        }

        let outcome = self.simulation.tick();
        let movement = outcome.movement;

        if movement.game_over {
            self.status = GameStatus::Over;
            self.events.push(GameEvent::Crash {
                score: outcome.snapshot.score,
            });
            return Some(outcome);
        }

        if movement.life_lost {
            self.events.push(GameEvent::LifeLost {
                lives_left: outcome.snapshot.lives,
            });
        }

        if let Some(kind) = movement.food_effect
            && movement.ate
        {
            if kind != FoodKind::Normal {
                self.events.push(GameEvent::PowerUp(kind));
            }
            self.events.push(GameEvent::Eat {
                kind,
                score_delta: outcome.score_delta,
            });
        }

        if outcome.obstacles_refreshed {
            self.events.push(GameEvent::ObstaclesRefreshed {
                count: outcome.snapshot.obstacles.len(),
            });
        }

        Some(outcome)
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
