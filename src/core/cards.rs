//! Playing cards and blackjack hand arithmetic.
//!
//! Cards are drawn from an infinite deck: every draw picks a value and a suit
//! independently and uniformly, so duplicates within or across hands happen.

use rand::{Rng, SeedableRng, rngs::StdRng};
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest total that is not a bust.
pub const BLACKJACK: u32 = 21;

/// Card value. Serialized as the label printed on the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    /// Every rank, lowest first.
    pub const ALL: [Self; 13] = [
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
    ];

    /// Fixed point value for non-aces; aces are scored by [`hand_total`].
    const fn points(self) -> u32 {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten | Self::Jack | Self::Queen | Self::King => 10,
            Self::Ace => 11,
        }
    }

    /// Label printed on the card.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        }
    }
}

/// Card suit. Serialized as its symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    #[serde(rename = "♠")]
    Spades,
    #[serde(rename = "♥")]
    Hearts,
    #[serde(rename = "♦")]
    Diamonds,
    #[serde(rename = "♣")]
    Clubs,
}

impl Suit {
    /// Every suit.
    pub const ALL: [Self; 4] = [Self::Spades, Self::Hearts, Self::Diamonds, Self::Clubs];

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Spades => "♠",
            Self::Hearts => "♥",
            Self::Diamonds => "♦",
            Self::Clubs => "♣",
        }
    }
}

/// A single drawn card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Rank of the card
    pub value: Rank,
    /// Suit of the card
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub const fn new(value: Rank, suit: Suit) -> Self {
        Self { value, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value.label(), self.suit.symbol())
    }
}

/// Blackjack total of a sequence of cards.
///
/// Non-aces are summed first. Each ace then counts 11, unless that would take
/// the running total past 21, in which case it counts 1.
#[must_use]
pub fn hand_total(cards: &[Card]) -> u32 {
    let aces = cards.iter().filter(|c| c.value == Rank::Ace).count();
    let mut total: u32 = cards
        .iter()
        .filter(|c| c.value != Rank::Ace)
        .map(|c| c.value.points())
        .sum();

    for _ in 0..aces {
        total += if total + 11 > BLACKJACK { 1 } else { 11 };
    }
    total
}

/// Ordered cards held by the player or the dealer.
///
/// Stored as a JSON array in the games table.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult,
)]
pub struct Hand(pub Vec<Card>);

impl Hand {
    /// Appends a freshly drawn card.
    pub fn push(&mut self, card: Card) {
        self.0.push(card);
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.0
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        hand_total(&self.0)
    }

    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.total() > BLACKJACK
    }

    /// Two-card 21.
    #[must_use]
    pub fn is_blackjack(&self) -> bool {
        self.0.len() == 2 && self.total() == BLACKJACK
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

/// Anything cards can be drawn from.
pub trait CardSource {
    /// Draws the next card.
    fn draw(&mut self) -> Card;
}

/// Infinite deck backed by a random number generator.
pub struct RandomDeck<R> {
    rng: R,
}

impl<R: Rng> RandomDeck<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomDeck<StdRng> {
    /// Deck seeded from OS entropy. `StdRng` is `Send`, so the deck can be
    /// held across awaits inside command handlers.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> CardSource for RandomDeck<R> {
    fn draw(&mut self) -> Card {
        let value = Rank::ALL[self.rng.gen_range(0..Rank::ALL.len())];
        let suit = Suit::ALL[self.rng.gen_range(0..Suit::ALL.len())];
        Card::new(value, suit)
    }
}
