//! Card labels and ranks.
//!
//! A card crosses the wire as a plain string: a rank token (`2`-`10`, `J`,
//! `Q`, `K`, `A`) immediately followed by one suit glyph. That exact string is
//! the equality key everywhere; no structured card object is ever exchanged.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque card label such as `"10♥"` or `"A♠"`.
///
/// Compared by value. Parsing the rank is best-effort: a label the server
/// invents outside the closed rank set still round-trips untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(String);

impl Card {
    /// Wrap a wire label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The wire label.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label without its trailing suit glyph.
    pub fn rank_token(&self) -> &str {
        let mut chars = self.0.chars();
        chars.next_back();
        chars.as_str()
    }

    /// Trailing suit glyph. `None` for an empty label.
    pub fn suit(&self) -> Option<char> {
        self.0.chars().next_back()
    }

    /// Parsed rank. `None` if the token is outside the closed rank set.
    pub fn rank(&self) -> Option<Rank> {
        self.rank_token().parse().ok()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Card {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Card {
    fn from(label: String) -> Self {
        Self(label)
    }
}

/// Card rank.
///
/// Ordering follows display precedence (`Two` lowest, `Ace` highest). It is
/// used for sorting hands on screen and never for game rules, which belong to
/// the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    /// 2
    Two,
    /// 3
    Three,
    /// 4
    Four,
    /// 5
    Five,
    /// 6
    Six,
    /// 7
    Seven,
    /// 8
    Eight,
    /// 9
    Nine,
    /// 10
    Ten,
    /// J
    Jack,
    /// Q
    Queen,
    /// K
    King,
    /// A
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

    /// Wire token (`"10"`, `"J"`, ...).
    pub const fn token(self) -> &'static str {
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

    /// Canonical display name (`"Ten"`, `"Jack"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Two => "Two",
            Self::Three => "Three",
            Self::Four => "Four",
            Self::Five => "Five",
            Self::Six => "Six",
            Self::Seven => "Seven",
            Self::Eight => "Eight",
            Self::Nine => "Nine",
            Self::Ten => "Ten",
            Self::Jack => "Jack",
            Self::Queen => "Queen",
            Self::King => "King",
            Self::Ace => "Ace",
        }
    }

    /// Plural display name (`"Tens"`, `"Sixes"`).
    pub fn plural(self) -> String {
        match self {
            Self::Six => "Sixes".to_string(),
            other => format!("{}s", other.name()),
        }
    }

    /// Count phrase for a claim: `"1 Ten"`, `"3 Sixes"`.
    pub fn quantity(self, count: usize) -> String {
        if count == 1 {
            format!("1 {}", self.name())
        } else {
            format!("{count} {}", self.plural())
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Token outside the closed rank set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown rank token: {0:?}")]
pub struct UnknownRank(pub String);

impl FromStr for Rank {
    type Err = UnknownRank;

    /// Parses a rank token, ignoring surrounding whitespace and case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|rank| rank.token() == token)
            .ok_or_else(|| UnknownRank(s.to_string()))
    }
}
