// Core modules
pub mod backtest;
pub mod execution;
pub mod indicators;
pub mod market;
pub mod models;
pub mod report;
pub mod settings;
pub mod strategy;

// Re-export commonly used types
pub use execution::{SimulationError, TradingSimulator};
pub use market::{PriceGenerator, PriceSource, ScriptedFeed};
pub use models::*;
pub use strategy::Strategy;
