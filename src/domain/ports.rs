use crate::domain::model::{Card, Deck};
use crate::utils::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Persistence for decks. Backends must behave identically from the outside.
///
/// Over-drawing is not an error: `draw` hands out `min(count, remaining)`
/// cards and only fails with `EmptyDeck` once nothing is left.
#[async_trait]
pub trait DeckStorage: Send + Sync {
    /// Persists a new deck under a freshly generated id.
    async fn create(&self, cards: Vec<Card>, shuffled: bool) -> Result<Deck>;

    /// Current state of the deck, or `DeckNotFound`.
    async fn get(&self, id: &Uuid) -> Result<Deck>;

    /// Removes up to `count` cards from the top of the deck and returns them.
    async fn draw(&self, id: &Uuid, count: usize) -> Result<Vec<Card>>;
}
