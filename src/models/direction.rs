use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoadError;

/// Direction of travel along the section, relative to the home station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrainDirection {
    TowardsHome,
    AwayFromHome,
}

impl TrainDirection {
    /// Stable index for per-direction storage, towards home first.
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::TowardsHome => 0,
            Self::AwayFromHome => 1,
        }
    }
}

impl fmt::Display for TrainDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TowardsHome => "TowardsHome",
            Self::AwayFromHome => "AwayFromHome",
        })
    }
}

impl FromStr for TrainDirection {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TowardsHome" => Ok(Self::TowardsHome),
            "AwayFromHome" => Ok(Self::AwayFromHome),
            other => Err(LoadError::UnknownDirection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_directions() {
        assert_eq!(
            "TowardsHome".parse::<TrainDirection>().expect("should parse"),
            TrainDirection::TowardsHome
        );
        assert_eq!(
            "AwayFromHome".parse::<TrainDirection>().expect("should parse"),
            TrainDirection::AwayFromHome
        );
    }

    #[test]
    fn test_parse_rejects_unknown_direction() {
        let err = "Sideways".parse::<TrainDirection>();
        assert!(matches!(err, Err(LoadError::UnknownDirection(value)) if value == "Sideways"));
    }

    #[test]
    fn test_display_round_trips() {
        for direction in [TrainDirection::TowardsHome, TrainDirection::AwayFromHome] {
            let parsed: TrainDirection = direction.to_string().parse().expect("should parse");
            assert_eq!(parsed, direction);
        }
    }
}
