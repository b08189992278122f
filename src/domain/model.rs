use crate::utils::error::{DeckError, Result};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn from_code(code: char) -> Result<Self> {
        match code {
            'C' => Ok(Suit::Clubs),
            'D' => Ok(Suit::Diamonds),
            'H' => Ok(Suit::Hearts),
            'S' => Ok(Suit::Spades),
            other => Err(DeckError::InvalidSuitCode(other.to_string())),
        }
    }

    pub fn code(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Suit::Clubs => "CLUBS",
            Suit::Diamonds => "DIAMONDS",
            Suit::Hearts => "HEARTS",
            Suit::Spades => "SPADES",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Card rank as its face value:
/// 1 is the ace, 2-10 are numeric, 11 is the jack, 12 the queen and 13 the king.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(u8);

impl Rank {
    pub const ACE: Rank = Rank(1);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);

    pub fn new(value: u8) -> Result<Self> {
        if (1..=13).contains(&value) {
            Ok(Rank(value))
        } else {
            Err(DeckError::InvalidRankCode(value.to_string()))
        }
    }

    /// Ranks from ace to king.
    pub fn all() -> impl Iterator<Item = Rank> {
        (1..=13).map(Rank)
    }

    /// Face letters win over digits; 1, 11, 12 and 13 are only reachable by letter.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "A" => Ok(Rank::ACE),
            "J" => Ok(Rank::JACK),
            "Q" => Ok(Rank::QUEEN),
            "K" => Ok(Rank::KING),
            digits => match digits.parse::<i32>() {
                Ok(n @ 2..=10) => Ok(Rank(n as u8)),
                _ => Err(DeckError::InvalidRankCode(code.to_string())),
            },
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn code(self) -> String {
        match self.0 {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => n.to_string(),
        }
    }

    pub fn name(self) -> String {
        match self.0 {
            1 => "ACE".to_string(),
            11 => "JACK".to_string(),
            12 => "QUEEN".to_string(),
            13 => "KING".to_string(),
            n => n.to_string(),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    /// Decodes a code such as "AS" or "10D".
    ///
    /// The last character is the suit and is checked first, whatever precedes
    /// it is the rank. Surrounding whitespace is ignored.
    pub fn from_code(code: &str) -> Result<Self> {
        let code = code.trim();
        let mut chars = code.chars();
        let suit_code = chars
            .next_back()
            .ok_or_else(|| DeckError::InvalidSuitCode(String::new()))?;

        let suit = Suit::from_code(suit_code)?;
        let rank = Rank::from_code(chars.as_str())?;
        Ok(Self { suit, rank })
    }

    pub fn code(&self) -> String {
        format!("{}{}", self.rank.code(), self.suit.code())
    }

    /// Display name of the rank, e.g. "ACE" or "7".
    pub fn value(&self) -> String {
        self.rank.name()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.code(), self.suit.code())
    }
}

impl FromStr for Card {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self> {
        Card::from_code(s)
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.code())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Card::from_code(&code).map_err(serde::de::Error::custom)
    }
}

pub fn cards_to_codes(cards: &[Card]) -> Vec<String> {
    cards.iter().map(Card::code).collect()
}

/// Decodes every code in order, stopping at the first invalid one.
pub fn codes_to_cards<I, S>(codes: I) -> Result<Vec<Card>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .map(|code| Card::from_code(code.as_ref()))
        .collect()
}

/// A deck as persisted by a storage backend. `cards[0]` is the top of the deck.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deck {
    pub id: Uuid,
    pub shuffled: bool,
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(cards: Vec<Card>, shuffled: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            shuffled,
            cards,
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

// `remaining` is written out for readers; it is ignored when deserializing.
impl Serialize for Deck {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Deck", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("shuffled", &self.shuffled)?;
        state.serialize_field("remaining", &self.remaining())?;
        state.serialize_field("cards", &self.cards)?;
        state.end()
    }
}
