// Terminal UI implementation using ratatui
pub mod app;
pub mod detail_ui;
pub mod favorites_ui;
pub mod help_ui;
pub mod runner;
pub mod ui;

pub use app::{App, Command, GatewayEvent, InputMode, Tab};
pub use runner::run_tui;
