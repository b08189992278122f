pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "redis")]
pub use adapters::RedisStorage;

pub use adapters::InMemoryStorage;
pub use config::{build_storage, RedisConfig, StorageBackend, StorageConfig};
pub use core::{CardGenerator, GeneratorConfig};
pub use domain::model::{Card, Deck, Rank, Suit};
pub use domain::ports::DeckStorage;
pub use utils::error::{DeckError, ErrorCategory, Result};
