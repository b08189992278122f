//! Deck storage on Redis.
//!
//! A deck is spread over two keys:
//! - `decks:{id}:cards` is a list with the remaining card codes, top of the deck first.
//! - `decks:{id}:shuffled` holds "1" or "0" and doubles as the existence marker.
//!
//! Every operation is two round trips with nothing tying them together, so two
//! processes drawing from the same deck can interleave. Deck creation can also
//! leave an orphaned cards key if the process dies between the two writes. A
//! MULTI/EXEC block or a Lua script would close both gaps; until then a deck
//! must only have a single writer at a time.
//!
//! When the flag write fails after the cards were pushed, `create` deletes the
//! cards key again on a best-effort basis. That rollback path has no test
//! coverage: it needs a server that fails a SET right after accepting an RPUSH.

use crate::config::RedisConfig;
use crate::domain::model::{cards_to_codes, codes_to_cards, Card, Deck};
use crate::domain::ports::DeckStorage;
use crate::utils::error::{DeckError, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, IntoConnectionInfo};
use std::num::NonZeroUsize;
use std::time::Duration;
use uuid::Uuid;

const KEY_PREFIX: &str = "decks";

#[derive(Clone)]
pub struct RedisStorage {
    conn: MultiplexedConnection,
}

impl RedisStorage {
    /// Connects and pings the server, giving up after the configured connect timeout.
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let mut info = (config.host.as_str(), config.port).into_connection_info()?;
        info.redis.username = config.username.clone();
        info.redis.password = config.password.clone();

        let client = redis::Client::open(info)?;
        let mut conn = client
            .get_multiplexed_async_connection_with_timeouts(
                Duration::from_secs(config.response_timeout_secs),
                Duration::from_secs(config.connect_timeout_secs),
            )
            .await?;

        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        tracing::info!(
            "Connected to Redis at {}:{} ({})",
            config.host,
            config.port,
            pong
        );

        Ok(Self { conn })
    }

    pub fn cards_key(id: &Uuid) -> String {
        key_for_attribute(id, "cards")
    }

    pub fn shuffled_key(id: &Uuid) -> String {
        key_for_attribute(id, "shuffled")
    }

    /// Reads the shuffled flag, which is also how a deck's existence is decided.
    async fn shuffled_flag(&self, id: &Uuid) -> Result<bool> {
        let mut conn = self.conn.clone();
        let flag: Option<String> = conn.get(Self::shuffled_key(id)).await?;

        flag.as_deref().map(parse_flag).ok_or(DeckError::DeckNotFound)
    }

    fn decode(id: &Uuid, codes: Vec<String>) -> Result<Vec<Card>> {
        codes_to_cards(codes).map_err(|e| DeckError::CorruptDeck {
            id: *id,
            source: Box::new(e),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn key_for_attribute(id: &Uuid, attribute: &str) -> String {
    format!("{}:{}:{}", KEY_PREFIX, id, attribute)
}

#[async_trait]
impl DeckStorage for RedisStorage {
    async fn create(&self, cards: Vec<Card>, shuffled: bool) -> Result<Deck> {
        let deck = Deck::new(cards, shuffled);
        let cards_key = Self::cards_key(&deck.id);
        let mut conn = self.conn.clone();

        // RPUSH needs at least one value; an empty deck is just the flag key.
        if !deck.is_empty() {
            let _: () = conn.rpush(&cards_key, cards_to_codes(&deck.cards)).await?;
        }

        let written: redis::RedisResult<()> = conn.set(Self::shuffled_key(&deck.id), shuffled).await;
        if let Err(e) = written {
            if !deck.is_empty() {
                let rollback: redis::RedisResult<()> = conn.del(&cards_key).await;
                if let Err(rollback_err) = rollback {
                    tracing::warn!("Error rolling back key {}: {}", cards_key, rollback_err);
                }
            }
            return Err(e.into());
        }

        tracing::debug!("Created deck {} with {} cards", deck.id, deck.remaining());
        Ok(deck)
    }

    async fn get(&self, id: &Uuid) -> Result<Deck> {
        let shuffled = self.shuffled_flag(id).await?;

        let mut conn = self.conn.clone();
        let codes: Vec<String> = conn.lrange(Self::cards_key(id), 0, -1).await?;

        Ok(Deck {
            id: *id,
            shuffled,
            cards: Self::decode(id, codes)?,
        })
    }

    async fn draw(&self, id: &Uuid, count: usize) -> Result<Vec<Card>> {
        // LPOP answers nil both for a missing and an emptied list, so existence
        // comes from the flag key.
        self.shuffled_flag(id).await?;

        let cards_key = Self::cards_key(id);
        let mut conn = self.conn.clone();

        let Some(count) = NonZeroUsize::new(count) else {
            let remaining: usize = conn.llen(&cards_key).await?;
            return if remaining == 0 {
                Err(DeckError::EmptyDeck)
            } else {
                Ok(Vec::new())
            };
        };

        let popped: Option<Vec<String>> = conn.lpop(&cards_key, Some(count)).await?;
        match popped {
            None => Err(DeckError::EmptyDeck),
            Some(codes) if codes.is_empty() => Err(DeckError::EmptyDeck),
            Some(codes) => {
                tracing::debug!("Drew {} cards from deck {}", codes.len(), id);
                Self::decode(id, codes)
            }
        }
    }
}
