//! Tournament data models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{RegistryError, RegistryResult};
use crate::player::{Player, PlayerId};

/// Tournament ID type
pub type TournamentId = i64;

/// Format accepted for tournament dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Governing body whose rules apply to play.
///
/// Opaque to registration; never interpreted for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ruleset {
    #[serde(rename = "AGA")]
    Aga,
    Japanese,
    Chinese,
    Korean,
    Ing,
}

impl Ruleset {
    /// Tag used in storage and on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Ruleset::Aga => "AGA",
            Ruleset::Japanese => "Japanese",
            Ruleset::Chinese => "Chinese",
            Ruleset::Korean => "Korean",
            Ruleset::Ing => "Ing",
        }
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ruleset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AGA" => Ok(Ruleset::Aga),
            "Japanese" => Ok(Ruleset::Japanese),
            "Chinese" => Ok(Ruleset::Chinese),
            "Korean" => Ok(Ruleset::Korean),
            "Ing" => Ok(Ruleset::Ing),
            other => Err(format!("unknown ruleset '{other}'")),
        }
    }
}

/// Tournament with its organizer and participant list loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub ruleset: Ruleset,
    pub organizer: Player,
    /// Registered players, ordered by id
    pub participants: Vec<Player>,
}

impl Tournament {
    pub fn has_participant(&self, player_id: PlayerId) -> bool {
        self.participants.iter().any(|p| p.id == player_id)
    }
}

/// Tournament insert as handed to the store, with dates already parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTournament {
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub ruleset: Ruleset,
    pub organizer_id: PlayerId,
}

/// Tournament creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentDto {
    pub name: String,
    pub location: String,
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
    pub ruleset: Ruleset,
    pub organizer_id: PlayerId,
}

/// Editable tournament fields. The organizer is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentUpdate {
    pub name: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub ruleset: Ruleset,
}

/// Parse a `YYYY-MM-DD` date, naming the offending field on failure
pub fn parse_date(field: &'static str, value: &str) -> RegistryResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        RegistryError::InvalidArgument {
            field,
            reason: format!("'{value}' is not a YYYY-MM-DD date ({e})"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ruleset_tags() {
        for ruleset in [
            Ruleset::Aga,
            Ruleset::Japanese,
            Ruleset::Chinese,
            Ruleset::Korean,
            Ruleset::Ing,
        ] {
            assert_eq!(ruleset.as_str().parse::<Ruleset>(), Ok(ruleset));
        }
        assert!("NewZealand".parse::<Ruleset>().is_err());
    }

    #[test]
    fn test_ruleset_serde_uses_tag() {
        assert_eq!(serde_json::to_string(&Ruleset::Aga).unwrap(), "\"AGA\"");
        let parsed: Ruleset = serde_json::from_str("\"Japanese\"").unwrap();
        assert_eq!(parsed, Ruleset::Japanese);
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("start_date", "2026-03-15").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());

        let err = parse_date("end_date", "15/03/2026").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidArgument {
                field: "end_date",
                ..
            }
        ));
        assert!(parse_date("start_date", "2026-02-30").is_err());
    }
}
