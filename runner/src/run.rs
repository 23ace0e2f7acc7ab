use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use snake_common::log;
use snake_common::SessionRng;
use snake_common::snake::{GameEvent, SnakeSession};

use crate::autopilot::Autopilot;
use crate::config::RunnerConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: u64,
    pub score: u32,
    pub game_over: bool,
}

fn create_ticker(period: Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Start => log!("Start"),
        GameEvent::Eat { kind, score_delta } => log!("Ate {} food (+{})", kind, score_delta),
        GameEvent::PowerUp(kind) => log!("Power-up: {}", kind),
        GameEvent::LifeLost { lives_left } => log!("Life lost, {} left", lives_left),
        GameEvent::ObstaclesRefreshed { count } => log!("Obstacles refreshed ({})", count),
        GameEvent::Crash { score } => log!("Crash with score {}", score),
        GameEvent::Pause => log!("Paused"),
        GameEvent::Resume => log!("Resumed"),
    }
}

/// Drives one run on a timer until the snake dies or `max_ticks` is reached.
pub async fn run_session(config: RunnerConfig) -> Result<RunSummary, String> {
    let rng = match config.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    let seed = rng.seed();
    // Separate stream so autopilot choices never shift the engine's placements.
    let mut input_rng = SessionRng::new(seed.wrapping_add(1));

    let mut session = SnakeSession::new(config.game.clone(), rng);
    session.start()?;

    let mut period = session.tick_interval();
    let mut ticker = create_ticker(period);
    let mut ticks = 0u64;
    let mut game_over = false;

    loop {
        ticker.tick().await;

        if let Some(direction) = Autopilot::calculate_move(config.autopilot, session.simulation(), &mut input_rng) {
            session.set_direction(direction);
        }

        let Some(outcome) = session.tick() else {
            break;
        };
        ticks += 1;

        for event in session.take_events() {
            log_event(&event);
        }

        if outcome.movement.game_over {
            game_over = true;
            break;
        }
        if config.max_ticks.is_some_and(|max| ticks >= max) {
            log!("Tick limit {} reached", ticks);
            break;
        }

        let next_period = session.tick_interval();
        if next_period != period {
            period = next_period;
            ticker = create_ticker(period);
        }
    }

    let summary = RunSummary {
        seed,
        ticks,
        score: session.score(),
        game_over,
    };
    log!(
        "Run finished after {} ticks: score {}, seed {}",
        summary.ticks,
        summary.score,
        summary.seed
    );
    Ok(summary)
}
