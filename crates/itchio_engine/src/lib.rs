//! Itchio2D engine host.
//!
//! Owns the window, renderer, asset cache and [`system_runtime::SystemRegistry`]
//! for one game type and drives the loaded systems on a fixed timestep.

pub mod assets;
pub mod cli;
pub mod config;
pub mod engine;
pub mod graphics;
pub mod logging;
pub mod signals;
pub mod window;

pub use config::AppConfig;
pub use engine::{Engine, FrameStats, StopReason};
