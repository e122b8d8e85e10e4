//! Player data models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Player ID type
pub type PlayerId = i64;

/// Structured personal name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    /// Family name
    pub family: String,
    /// Given name
    pub given: String,
    /// Whether the given name is conventionally written first
    pub is_given_first: bool,
}

impl Name {
    pub fn new(family: impl Into<String>, given: impl Into<String>, is_given_first: bool) -> Self {
        Self {
            family: family.into(),
            given: given.into(),
            is_given_first,
        }
    }

    /// Name in its conventional written order
    pub fn full_name(&self) -> String {
        if self.is_given_first {
            format!("{} {}", self.given, self.family)
        } else {
            format!("{} {}", self.family, self.given)
        }
    }
}

/// Go skill rank, weakest first.
///
/// Kyu grades count down from 15k to 1k, then dan grades count up from 1d to 9d.
/// Serialized in the short form, e.g. `"9d"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Rank {
    Kyu15,
    Kyu14,
    Kyu13,
    Kyu12,
    Kyu11,
    Kyu10,
    Kyu9,
    Kyu8,
    Kyu7,
    Kyu6,
    Kyu5,
    Kyu4,
    Kyu3,
    Kyu2,
    Kyu1,
    Dan1,
    Dan2,
    Dan3,
    Dan4,
    Dan5,
    Dan6,
    Dan7,
    Dan8,
    Dan9,
}

impl Rank {
    /// Every rank in ascending strength
    pub const ALL: [Rank; 24] = [
        Rank::Kyu15,
        Rank::Kyu14,
        Rank::Kyu13,
        Rank::Kyu12,
        Rank::Kyu11,
        Rank::Kyu10,
        Rank::Kyu9,
        Rank::Kyu8,
        Rank::Kyu7,
        Rank::Kyu6,
        Rank::Kyu5,
        Rank::Kyu4,
        Rank::Kyu3,
        Rank::Kyu2,
        Rank::Kyu1,
        Rank::Dan1,
        Rank::Dan2,
        Rank::Dan3,
        Rank::Dan4,
        Rank::Dan5,
        Rank::Dan6,
        Rank::Dan7,
        Rank::Dan8,
        Rank::Dan9,
    ];

    /// Position on the scale, 0 for 15k through 23 for 9d. Used as the stored value.
    pub fn ordinal(self) -> i16 {
        self as i16
    }

    pub fn from_ordinal(ordinal: i16) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn is_dan(self) -> bool {
        self >= Rank::Dan1
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ordinal = self.ordinal();
        if self.is_dan() {
            write!(f, "{}d", ordinal - Rank::Dan1.ordinal() + 1)
        } else {
            write!(f, "{}k", Rank::Kyu1.ordinal() - ordinal + 1)
        }
    }
}

impl FromStr for Rank {
    type Err = String;

    /// Parses the short form, e.g. `"15k"` or `"3d"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let suffix = s.chars().last().ok_or_else(|| "empty rank".to_string())?;
        let grade: i16 = s[..s.len() - suffix.len_utf8()]
            .parse()
            .map_err(|_| format!("unknown rank '{s}'"))?;

        let ordinal = match suffix {
            'k' if (1..=15).contains(&grade) => Rank::Kyu1.ordinal() - grade + 1,
            'd' if (1..=9).contains(&grade) => Rank::Dan1.ordinal() + grade - 1,
            _ => return Err(format!("unknown rank '{s}'")),
        };

        Rank::from_ordinal(ordinal).ok_or_else(|| format!("unknown rank '{s}'"))
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.to_string()
    }
}

impl TryFrom<String> for Rank {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Player model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: Name,
    pub email: Option<String>,
    pub rank: Option<Rank>,
}

/// Player data supplied on creation or update; the id is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: Name,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub rank: Option<Rank>,
}

impl NewPlayer {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            email: None,
            rank: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Attach an identity
    pub fn into_player(self, id: PlayerId) -> Player {
        Player {
            id,
            name: self.name,
            email: self.email,
            rank: self.rank,
        }
    }
}
