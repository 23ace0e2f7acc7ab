use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use snake_common::SessionRng;
use snake_common::snake::{Direction, Point, Simulation, SimulationHooks};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AutopilotKind {
    /// Head for the nearest food over safe cells.
    #[default]
    Greedy,
    /// Any safe turn.
    Random,
}

pub struct Autopilot;

impl Autopilot {
    pub fn calculate_move<H: SimulationHooks>(
        kind: AutopilotKind,
        simulation: &Simulation<H>,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        if simulation.is_game_over() {
            return None;
        }
        match kind {
            AutopilotKind::Greedy => Self::greedy_move(simulation, rng),
            AutopilotKind::Random => Self::random_safe_move(simulation, rng),
        }
    }

    fn greedy_move<H: SimulationHooks>(simulation: &Simulation<H>, rng: &mut SessionRng) -> Option<Direction> {
        let head = simulation.snake().head();
        let Some(target) = Self::find_nearest_food(head, simulation) else {
            return Self::random_safe_move(simulation, rng);
        };

        let best = Self::safe_directions(simulation)
            .into_iter()
            .min_by_key(|dir| head.moved(*dir).manhattan_distance(target));

        best.or_else(|| Self::random_safe_move(simulation, rng))
    }

    fn random_safe_move<H: SimulationHooks>(simulation: &Simulation<H>, rng: &mut SessionRng) -> Option<Direction> {
        let safe = Self::safe_directions(simulation);
        match rng.pick_index(safe.len()) {
            Some(idx) => Some(safe[idx]),
            None => Some(simulation.snake().direction),
        }
    }

    fn safe_directions<H: SimulationHooks>(simulation: &Simulation<H>) -> Vec<Direction> {
        let current = simulation.snake().direction;
        let head = simulation.snake().head();
        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(&current))
            .filter(|d| Self::is_safe_position(head.moved(*d), simulation))
            .collect()
    }

    fn find_nearest_food<H: SimulationHooks>(from: Point, simulation: &Simulation<H>) -> Option<Point> {
        simulation
            .field()
            .food()
            .iter()
            .map(|item| item.position)
            .min_by_key(|position| from.manhattan_distance(*position))
    }

    fn is_safe_position<H: SimulationHooks>(pos: Point, simulation: &Simulation<H>) -> bool {
        // The tail cell counts as occupied: the engine checks the body before the tail moves.
        simulation.settings().field_size.in_bounds(pos)
            && !simulation.field().is_occupied_by_obstacle(pos)
            && !simulation.snake().contains(pos)
    }
}
