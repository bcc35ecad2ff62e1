use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A life-aspect of the dashboard. `Settings` is a configuration surface and
/// never takes part in priorities or recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectId {
    Training,
    Food,
    Sports,
    Films,
    Finance,
    Business,
    Travel,
    Family,
    Friends,
    Events,
    Settings,
}

impl AspectId {
    /// Every aspect that can carry recommendations (all but `Settings`).
    pub const TRACKABLE: [AspectId; 10] = [
        AspectId::Training,
        AspectId::Food,
        AspectId::Sports,
        AspectId::Films,
        AspectId::Finance,
        AspectId::Business,
        AspectId::Travel,
        AspectId::Family,
        AspectId::Friends,
        AspectId::Events,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectId::Training => "training",
            AspectId::Food => "food",
            AspectId::Sports => "sports",
            AspectId::Films => "films",
            AspectId::Finance => "finance",
            AspectId::Business => "business",
            AspectId::Travel => "travel",
            AspectId::Family => "family",
            AspectId::Friends => "friends",
            AspectId::Events => "events",
            AspectId::Settings => "settings",
        }
    }

    pub fn is_trackable(&self) -> bool {
        *self != AspectId::Settings
    }
}

impl fmt::Display for AspectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "training" => Ok(AspectId::Training),
            "food" => Ok(AspectId::Food),
            "sports" => Ok(AspectId::Sports),
            "films" => Ok(AspectId::Films),
            "finance" => Ok(AspectId::Finance),
            "business" => Ok(AspectId::Business),
            "travel" => Ok(AspectId::Travel),
            "family" => Ok(AspectId::Family),
            "friends" => Ok(AspectId::Friends),
            "events" => Ok(AspectId::Events),
            "settings" => Ok(AspectId::Settings),
            other => Err(format!("unknown aspect '{other}'")),
        }
    }
}

/// Normalizes a stored priority list: unknown names and `settings` are dropped,
/// duplicates keep their first position.
pub fn normalize_priorities<S: AsRef<str>>(raw: &[S]) -> Vec<AspectId> {
    let mut out: Vec<AspectId> = Vec::new();
    for name in raw {
        if let Ok(aspect) = name.as_ref().parse::<AspectId>() {
            if aspect.is_trackable() && !out.contains(&aspect) {
                out.push(aspect);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Finance".parse::<AspectId>().unwrap(), AspectId::Finance);
        assert_eq!(" events ".parse::<AspectId>().unwrap(), AspectId::Events);
        assert!("gardening".parse::<AspectId>().is_err());
    }

    #[test]
    fn test_trackable_excludes_settings() {
        assert!(!AspectId::TRACKABLE.contains(&AspectId::Settings));
        assert!(!AspectId::Settings.is_trackable());
    }

    #[test]
    fn test_normalize_priorities_drops_settings_and_duplicates() {
        let raw = ["finance", "settings", "training", "finance", "bogus"];
        assert_eq!(
            normalize_priorities(&raw),
            vec![AspectId::Finance, AspectId::Training]
        );
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&AspectId::Films).unwrap();
        assert_eq!(json, "\"films\"");
    }
}
