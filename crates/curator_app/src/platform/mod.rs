//! Command-line front end: configuration, logging, effect execution and
//! text rendering around the pure core.
mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod records;
mod render;

pub use app::run_app;
