pub mod cmds;
pub mod config;
pub mod contributions;
pub mod events;
pub mod loader;
pub mod placeholder;
pub mod provider;
pub mod stats;
pub mod ui;
