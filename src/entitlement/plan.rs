//! Subscription tiers and their ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A paid subscription tier. "No subscription" is modelled as `Option<Tier>::None`
/// and always ranks below every tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Starter,
    Pro,
    Agency,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Tier; 3] = [Tier::Starter, Tier::Pro, Tier::Agency];

    pub fn rank(self) -> u8 {
        match self {
            Tier::Starter => 1,
            Tier::Pro => 2,
            Tier::Agency => 3,
        }
    }

    /// The tier directly above this one, or `None` at the top of the hierarchy.
    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Starter => Some(Tier::Pro),
            Tier::Pro => Some(Tier::Agency),
            Tier::Agency => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Tier::Starter => "Starter",
            Tier::Pro => "Pro",
            Tier::Agency => "Agency",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Tier::Starter => "starter",
            Tier::Pro => "pro",
            Tier::Agency => "agency",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starter" => Ok(Tier::Starter),
            "pro" => Ok(Tier::Pro),
            "agency" => Ok(Tier::Agency),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

/// Rank of an optional tier; absence ranks 0.
pub fn rank_of(tier: Option<Tier>) -> u8 {
    tier.map_or(0, Tier::rank)
}

pub fn is_at_least(user: Option<Tier>, required: Tier) -> bool {
    rank_of(user) >= required.rank()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_are_ascending() {
        assert_eq!(Tier::Starter.rank(), 1);
        assert_eq!(Tier::Pro.rank(), 2);
        assert_eq!(Tier::Agency.rank(), 3);
        assert_eq!(rank_of(None), 0);
    }

    #[test]
    fn test_is_at_least_matches_rank_comparison() {
        for user in Tier::ALL {
            for required in Tier::ALL {
                assert_eq!(
                    is_at_least(Some(user), required),
                    user.rank() >= required.rank(),
                    "{user} vs {required}"
                );
            }
        }
    }

    #[test]
    fn test_absent_tier_never_satisfies() {
        for required in Tier::ALL {
            assert!(!is_at_least(None, required));
        }
    }

    #[test]
    fn test_next_walks_hierarchy() {
        assert_eq!(Tier::Starter.next(), Some(Tier::Pro));
        assert_eq!(Tier::Pro.next(), Some(Tier::Agency));
        assert_eq!(Tier::Agency.next(), None);
    }

    #[test]
    fn test_ord_agrees_with_rank() {
        assert!(Tier::Starter < Tier::Pro);
        assert!(Tier::Pro < Tier::Agency);
        assert!(None < Some(Tier::Starter));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PRO".parse::<Tier>(), Ok(Tier::Pro));
        assert_eq!(" agency ".parse::<Tier>(), Ok(Tier::Agency));
        assert!("enterprise".parse::<Tier>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Tier::Agency).unwrap(), "\"agency\"");
        let t: Tier = serde_json::from_str("\"starter\"").unwrap();
        assert_eq!(t, Tier::Starter);
    }
}
