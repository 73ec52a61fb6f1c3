//! Tennis mini-game engine: a single-player rally against a bot, stepped by
//! the host one frame at a time, with a coupon for beating the bot.

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod paddle;
pub mod physics;
pub mod rally;
pub mod reward;
pub mod scoring;
pub mod types;

// WASM bridge module - only compiled when wasm feature is enabled
#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{Config, RewardConfig};
pub use error::ConfigError;
pub use game::{GameSession, MiniGame, Screen};
pub use input::StrikeInput;
pub use reward::{RewardCallback, RewardIssuer};
pub use scoring::{PointOutcome, Score};
pub use types::*;
