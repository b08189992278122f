use crate::domain::model::{Card, Deck};
use crate::domain::ports::DeckStorage;
use crate::utils::error::{DeckError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Keeps every deck in process memory. Decks are lost when the process exits.
///
/// One lock guards the whole map, so each operation sees and leaves a consistent deck.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    decks: Mutex<HashMap<Uuid, Deck>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn decks(&self) -> MutexGuard<'_, HashMap<Uuid, Deck>> {
        self.decks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DeckStorage for InMemoryStorage {
    async fn create(&self, cards: Vec<Card>, shuffled: bool) -> Result<Deck> {
        let deck = Deck::new(cards, shuffled);
        self.decks().insert(deck.id, deck.clone());

        tracing::debug!("Created deck {} with {} cards", deck.id, deck.remaining());
        Ok(deck)
    }

    async fn get(&self, id: &Uuid) -> Result<Deck> {
        self.decks().get(id).cloned().ok_or(DeckError::DeckNotFound)
    }

    async fn draw(&self, id: &Uuid, count: usize) -> Result<Vec<Card>> {
        let mut decks = self.decks();
        let deck = decks.get_mut(id).ok_or(DeckError::DeckNotFound)?;

        if deck.is_empty() {
            return Err(DeckError::EmptyDeck);
        }

        let count = count.min(deck.remaining());
        let drawn: Vec<Card> = deck.cards.drain(..count).collect();

        tracing::debug!(
            "Drew {} cards from deck {}, {} left",
            drawn.len(),
            id,
            deck.remaining()
        );
        Ok(drawn)
    }
}
