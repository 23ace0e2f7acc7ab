pub mod autopilot;
pub mod config;
pub mod run;
