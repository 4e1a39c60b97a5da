// Trade execution: price window, cash account and the tick loop
pub mod account;
pub mod price_window;
pub mod simulator;

pub use account::Account;
pub use price_window::PriceWindow;
pub use simulator::{SimulationError, TradingSimulator};
