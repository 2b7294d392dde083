//! Core game module - states, events, shared context, and fundamental systems.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod context;
mod error;
mod events;
mod plugin;
mod states;
mod tween;

pub use config::*;
pub use context::*;
pub use error::*;
pub use events::*;
pub use plugin::CorePlugin;
pub use states::*;
pub use tween::*;
