mod balance;
mod entity;
mod grid;
mod objects;
mod session;
mod settings;
mod simulation;
mod types;

pub use balance::{FoodBalance, FoodTable, ObstacleBalance};
pub use entity::{CollisionKind, MoveResult, Snake};
pub use objects::{ObjectField, PlacementContext};
pub use session::{GameEvent, GameStatus, SnakeSession};
pub use settings::{DangerZone, DangerZoneShape, GameMode, GameSettings, SpeedBoost};
pub use simulation::{NoHooks, Simulation, SimulationHooks, Snapshot, StepOutcome};
pub use types::{Axis, Direction, FieldSize, FoodItem, FoodKind, Obstacle, ObstacleKind, Point};
