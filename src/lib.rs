pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod terminal_runtime;
pub mod ui;
pub mod world;
