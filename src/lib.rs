pub mod cli;
pub mod editor;
pub mod error;
pub mod i18n;
pub mod model;
pub mod parser;
pub mod render;
pub mod session;
pub mod state;
pub mod store;
pub mod timer;
pub mod tui;
pub mod ui;
