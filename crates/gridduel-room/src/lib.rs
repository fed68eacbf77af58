//! Room engine for Grid Duel.
//!
//! Each room runs as an isolated Tokio task (actor model) that seats two
//! players, deals hands, and resolves rounds of alternating card plays
//! on a small grid.
//!
//! # Key types
//!
//! - [`RoomRegistry`]: creates rooms on first join, routes players
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomState`]: the Init/Select/Execute/End cycle
//! - [`RoomConfig`]: grid size, resource caps, pacing, RNG seed
//! - [`catalog`]: the per-character card tables
//! - [`combat`]: deterministic card resolution

pub mod catalog;
pub mod combat;
mod config;
mod error;
mod player;
mod registry;
mod room;

pub use catalog::{Card, CharacterTemplate, template};
pub use combat::{Resolution, hit_zone, resolve};
pub use config::{Pacing, RoomConfig, RoomState};
pub use error::RoomError;
pub use player::Player;
pub use registry::RoomRegistry;
pub use room::{Intent, PlayerSender, RoomHandle, RoomInfo, SEATS};
