pub mod generator;

pub use crate::domain::model::{Card, Deck, Rank, Suit};
pub use crate::domain::ports::DeckStorage;
pub use crate::utils::error::Result;
pub use generator::{CardGenerator, GeneratorConfig};
