// Adapters layer: concrete DeckStorage backends.

pub mod memory;

#[cfg(feature = "redis")]
pub mod redis;

pub use memory::InMemoryStorage;

#[cfg(feature = "redis")]
pub use self::redis::RedisStorage;
