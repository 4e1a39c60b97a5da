pub mod metrics;
pub mod runner;

pub use metrics::{PriceRange, RunSummary, TradeLog};
pub use runner::{
    run_configured, write_comparison, write_summary, ReportFormat, RunError, SimulationRunner,
};
