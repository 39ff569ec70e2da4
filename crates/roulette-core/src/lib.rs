//! # Daily Roulette Core Library
//!
//! This library provides the core logic for Daily Roulette: a once-a-day
//! random pick from a user-curated list, with completion streaks and points
//! toward a level. The `roulette` CLI is a thin presentation layer over it.
//!
//! ## Architecture
//!
//! - **Decision Model**: a small state machine (`ReadyToSpin -> DecisionMade ->
//!   Completed`) with calendar-day reset and streak rules
//! - **Storage**: a key-value [`PreferenceStore`] seam with SQLite and in-memory
//!   implementations, plus TOML-based configuration
//! - **Clock**: injected time source; all day comparisons are calendar-based
//!
//! ## Key Components
//!
//! - [`DecisionModel`]: owns and persists every field
//! - [`level_of`]: derived level view
//! - [`SqliteStore`]: on-disk preference store
//! - [`Config`]: application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod model;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use events::Event;
pub use model::{level_of, DailyState, DecisionModel, DecisionSnapshot, Level, LevelTier};
pub use storage::{Config, MemoryStore, PreferenceBatch, PreferenceStore, SqliteStore};
