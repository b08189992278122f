use crate::domain::model::{codes_to_cards, Card, Rank, Suit};
use crate::utils::error::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Suit order of a freshly built deck.
pub const DECK_SUIT_ORDER: [Suit; 4] = [Suit::Spades, Suit::Diamonds, Suit::Clubs, Suit::Hearts];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Comma separated card codes. Absent or empty means a full deck.
    pub codes: Option<String>,
    pub shuffled: bool,
}

impl GeneratorConfig {
    pub fn full(shuffled: bool) -> Self {
        Self {
            codes: None,
            shuffled,
        }
    }

    pub fn with_codes(codes: impl Into<String>, shuffled: bool) -> Self {
        Self {
            codes: Some(codes.into()),
            shuffled,
        }
    }
}

#[derive(Debug)]
pub struct CardGenerator {
    rng: Mutex<StdRng>,
}

impl CardGenerator {
    /// Seeds the generator from the wall clock.
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        tracing::debug!("Card generator seeded with {}", seed);
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn build(&self, config: &GeneratorConfig) -> Result<Vec<Card>> {
        let mut cards = match config.codes.as_deref() {
            None | Some("") => self.full_deck(),
            Some(codes) => self.from_codes(codes)?,
        };

        if config.shuffled {
            self.shuffle(&mut cards);
        }

        tracing::debug!(
            "Built {} cards (shuffled: {})",
            cards.len(),
            config.shuffled
        );
        Ok(cards)
    }

    pub fn full_deck(&self) -> Vec<Card> {
        DECK_SUIT_ORDER
            .iter()
            .flat_map(|&suit| Rank::all().map(move |rank| Card::new(suit, rank)))
            .collect()
    }

    pub fn from_codes(&self, codes: &str) -> Result<Vec<Card>> {
        codes_to_cards(codes.split(','))
    }

    /// Fisher-Yates: element `i` swaps with a uniformly chosen `j` in `[0, i]`.
    pub fn shuffle(&self, cards: &mut [Card]) {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        for i in 0..cards.len() {
            let j = rng.gen_range(0..=i);
            cards.swap(i, j);
        }
    }
}

impl Default for CardGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::cards_to_codes;
    use crate::utils::error::DeckError;
    use std::collections::HashMap;

    const FULL_DECK: [&str; 52] = [
        "AS", "2S", "3S", "4S", "5S", "6S", "7S", "8S", "9S", "10S", "JS", "QS", "KS",
        "AD", "2D", "3D", "4D", "5D", "6D", "7D", "8D", "9D", "10D", "JD", "QD", "KD",
        "AC", "2C", "3C", "4C", "5C", "6C", "7C", "8C", "9C", "10C", "JC", "QC", "KC",
        "AH", "2H", "3H", "4H", "5H", "6H", "7H", "8H", "9H", "10H", "JH", "QH", "KH",
    ];

    #[test]
    fn test_default_config_builds_full_unshuffled_deck() {
        let generator = CardGenerator::new();
        let cards = generator.build(&GeneratorConfig::default()).unwrap();
        assert_eq!(cards_to_codes(&cards), FULL_DECK);
    }

    #[test]
    fn test_empty_codes_mean_full_deck() {
        let generator = CardGenerator::new();
        let cards = generator
            .build(&GeneratorConfig::with_codes("", false))
            .unwrap();
        assert_eq!(cards.len(), 52);
    }

    #[test]
    fn test_full_shuffled_deck_is_a_permutation() {
        let generator = CardGenerator::new();
        let cards = generator.build(&GeneratorConfig::full(true)).unwrap();

        let mut codes = cards_to_codes(&cards);
        assert_eq!(codes.len(), 52);
        assert_ne!(codes, FULL_DECK);

        codes.sort();
        let mut expected: Vec<String> = FULL_DECK.iter().map(|c| c.to_string()).collect();
        expected.sort();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_specific_codes_keep_order() {
        let generator = CardGenerator::new();
        let cards = generator
            .build(&GeneratorConfig::with_codes("AS,KD,AC,2C,KH,10D", false))
            .unwrap();
        assert_eq!(
            cards,
            vec![
                Card::new(Suit::Spades, Rank::ACE),
                Card::new(Suit::Diamonds, Rank::KING),
                Card::new(Suit::Clubs, Rank::ACE),
                Card::new(Suit::Clubs, Rank::new(2).unwrap()),
                Card::new(Suit::Hearts, Rank::KING),
                Card::new(Suit::Diamonds, Rank::new(10).unwrap()),
            ]
        );
    }

    #[test]
    fn test_invalid_codes_propagate_specific_error() {
        let generator = CardGenerator::new();

        let err = generator.from_codes("AS,14C").unwrap_err();
        assert!(matches!(err, DeckError::InvalidRankCode(ref code) if code == "14"));
        assert_eq!(err.to_string(), "invalid rank code '14'");

        let err = generator.from_codes("AS,10C,Q?").unwrap_err();
        assert!(matches!(err, DeckError::InvalidSuitCode(ref code) if code == "?"));
        assert_eq!(err.to_string(), "invalid suit code '?'");
    }

    #[test]
    fn test_same_seed_same_shuffle() {
        let a = CardGenerator::with_seed(7);
        let b = CardGenerator::with_seed(7);

        let mut left = a.full_deck();
        let mut right = b.full_deck();
        a.shuffle(&mut left);
        b.shuffle(&mut right);

        assert_eq!(left, right);
    }

    #[test]
    fn test_shuffle_handles_tiny_inputs() {
        let generator = CardGenerator::with_seed(1);

        let mut empty: Vec<Card> = Vec::new();
        generator.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![Card::new(Suit::Hearts, Rank::QUEEN)];
        generator.shuffle(&mut single);
        assert_eq!(single, vec![Card::new(Suit::Hearts, Rank::QUEEN)]);
    }

    #[test]
    fn test_shuffle_positions_are_roughly_uniform() {
        // Where does the first card of a 4 card deck end up? Each slot should get ~25%.
        let generator = CardGenerator::with_seed(42);
        let deck = generator.from_codes("AS,2S,3S,4S").unwrap();
        let trials = 20_000;
        let mut landed: HashMap<usize, usize> = HashMap::new();

        for _ in 0..trials {
            let mut cards = deck.clone();
            generator.shuffle(&mut cards);
            let position = cards.iter().position(|c| *c == deck[0]).unwrap();
            *landed.entry(position).or_default() += 1;
        }

        for slot in 0..4 {
            let share = *landed.get(&slot).unwrap_or(&0) as f64 / trials as f64;
            assert!((share - 0.25).abs() < 0.03, "slot {} share {}", slot, share);
        }
    }
}
