//! Scenario lookup by identifier.

use crate::config::SimulationConfig;
use crate::error::{SimError, SimResult};

pub use crate::config::ScenarioKind;

/// Catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Canonical identifier.
    pub id: &'static str,
    /// Alternate identifiers.
    pub aliases: &'static [&'static str],
    /// Display title.
    pub title: &'static str,
    /// One-line description.
    pub summary: &'static str,
    /// Variant.
    pub kind: ScenarioKind,
}

/// Every available scenario.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "free-fall",
        aliases: &["serbest-dusme", "freefall", "free_fall"],
        title: "Free Fall",
        summary: "Drop a ball from a height and watch it bounce to rest",
        kind: ScenarioKind::FreeFall,
    },
    CatalogEntry {
        id: "projectile",
        aliases: &["yatay-atis", "horizontal-launch"],
        title: "Projectile Motion",
        summary: "Launch a ball horizontally and measure its range",
        kind: ScenarioKind::Projectile,
    },
];

impl ScenarioKind {
    /// Canonical identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::FreeFall => "free-fall",
            Self::Projectile => "projectile",
        }
    }
}

/// Find an entry by identifier or alias, case-insensitively.
#[must_use]
pub fn find(name: &str) -> Option<&'static CatalogEntry> {
    let name = name.trim();
    CATALOG.iter().find(|entry| {
        entry.id.eq_ignore_ascii_case(name)
            || entry.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    })
}

/// Resolve an identifier to a scenario kind.
///
/// # Errors
///
/// Returns [`SimError::ScenarioNotFound`] for unknown identifiers.
pub fn lookup(name: &str) -> SimResult<ScenarioKind> {
    find(name)
        .map(|entry| entry.kind)
        .ok_or_else(|| SimError::scenario_not_found(name))
}

/// Preset configuration for an identifier.
///
/// # Errors
///
/// Returns [`SimError::ScenarioNotFound`] for unknown identifiers.
pub fn preset(name: &str) -> SimResult<SimulationConfig> {
    lookup(name).map(SimulationConfig::preset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ids_and_aliases() {
        assert_eq!(lookup("free-fall").ok(), Some(ScenarioKind::FreeFall));
        assert_eq!(lookup("serbest-dusme").ok(), Some(ScenarioKind::FreeFall));
        assert_eq!(lookup("Projectile").ok(), Some(ScenarioKind::Projectile));
        assert_eq!(lookup(" yatay-atis ").ok(), Some(ScenarioKind::Projectile));
    }

    #[test]
    fn test_unknown_scenario() {
        let err = lookup("egik-atis").unwrap_err();
        assert!(matches!(err, SimError::ScenarioNotFound { ref name } if name == "egik-atis"));
    }

    #[test]
    fn test_preset_matches_kind() {
        let config = preset("yatay-atis").expect("known");
        assert_eq!(config.scenario, ScenarioKind::Projectile);
    }

    #[test]
    fn test_ids_round_trip() {
        for entry in CATALOG {
            assert_eq!(entry.kind.id(), entry.id);
            assert_eq!(find(entry.id).map(|e| e.kind), Some(entry.kind));
        }
    }
}
