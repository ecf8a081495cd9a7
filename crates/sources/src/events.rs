//! Event-code normalization for each provider family.
//!
//! A provider reports events by its own code ("1600 Meters", "1600m",
//! "SMR 1600m"). Two matcher tables per family turn a code into a readable
//! label and a distance in meters. Patterns are case-insensitive; literals
//! match exactly.

use std::sync::OnceLock;

use paceline_recon::MatcherTable;
use regex::Regex;
use serde::Deserialize;

const METERS_PER_MILE: f64 = 1609.344;

/// Which code convention a provider uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCodes {
    /// "1600 Meters", "4x400 Relay", "SMR 1600m", "2.5k Steeplechase".
    AthleticNet,
    /// "1600m", "300H", "3000mSC", "HJ".
    MileSplit,
    /// Codes are already labels; meters come from the record itself.
    #[default]
    Canonical,
}

impl EventCodes {
    pub fn label(self, code: &str) -> String {
        let code = code.trim();
        match self {
            Self::AthleticNet => athletic_net_labels().evaluate(code, code.to_lowercase()),
            Self::MileSplit => milesplit_labels().evaluate(code, code.to_string()),
            Self::Canonical => code.to_string(),
        }
    }

    pub fn meters(self, code: &str) -> Option<f64> {
        let code = code.trim();
        match self {
            Self::AthleticNet => athletic_net_meters().evaluate(code, None),
            Self::MileSplit => milesplit_meters().evaluate(code, None),
            Self::Canonical => None,
        }
    }

    /// Provider-formatted mark to the form the time filter accepts.
    pub fn clean_mark(self, mark: &str) -> String {
        match self {
            Self::AthleticNet => crate::marks::clean_athletic_net_mark(mark),
            Self::MileSplit | Self::Canonical => mark.trim().to_string(),
        }
    }
}

impl std::fmt::Display for EventCodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AthleticNet => write!(f, "athletic_net"),
            Self::MileSplit => write!(f, "milesplit"),
            Self::Canonical => write!(f, "canonical"),
        }
    }
}

/// Cross-country distances arrive as (distance, units) and are coded as
/// `"<distance> <units>"` with lower-cased units.
pub fn xc_code(distance: f64, units: &str) -> String {
    format!("{distance} {}", units.trim().to_lowercase())
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn re(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("event code pattern")
}

fn with_suffix(suffix: &'static str) -> impl Fn(Option<&str>) -> String + Send + Sync {
    move |s| format!("{}{suffix}", s.unwrap_or_default())
}

fn number(s: Option<&str>) -> Option<f64> {
    s.and_then(|s| s.replace(',', "").parse::<f64>().ok())
}

fn athletic_net_labels() -> &'static MatcherTable<String> {
    static TABLE: OnceLock<MatcherTable<String>> = OnceLock::new();
    TABLE.get_or_init(|| {
        MatcherTable::new()
            .regex(re(r"^(\d+) Meter(?:s| Dash| Fly)$"), with_suffix(" meter"))
            .regex(re(r"^(\d+(?:\.\d+)?) Miles?$"), with_suffix(" mile"))
            .regex(re(r"^(\d+x\d+)(?:Throwers)? Relay$"), with_suffix(" meter relay"))
            .regex(re(r"^(\d+)m Hurdles$"), with_suffix(" meter hurdles"))
            .regex(re(r"^(\d+)y Hurdles$"), with_suffix(" yard hurdles"))
            .regex(re(r"^(\d+(?:\.\d+))k Steeplechase$"), with_suffix(" kilometer steeple chase"))
            .regex(re(r"^(\d+) Mile Steeplechase$"), with_suffix(" mile steeple chase"))
            .regex(re(r"^(\d+(?:,000)?)m Racewalk$"), with_suffix(" meter race walk"))
            .regex(re(r"^(\d+) Mile Racewalk$"), with_suffix(" mile race walk"))
            .literal("Mile Racewalk", "1 mile race walk".to_string())
            .literal("1-Hour Racewalk", "1 hour race walk".to_string())
            .regex(
                re(r"^(\d+x\d+(?:\.\d+)?) Shuttle (?:Hurdles|Relay)$"),
                with_suffix(" meter shuttle hurdles"),
            )
            .regex(
                re(r"^(\d+x\d+(?:\.\d+)?) Yard Shuttle (?:Hurdles|Relay)$"),
                with_suffix(" yard shuttle hurdles"),
            )
            .regex(re(r"^(\d+x\d+) Yard Relay$"), with_suffix(" yard relay"))
            .regex(re(r"^(\d+)xMile Relay$"), with_suffix("x1 mile relay"))
            .regex(re(r"^[SDM]MR (\d+)m$"), with_suffix(" meter medley relay"))
            .regex(re(r"^[SDM]MR (\d+)y$"), with_suffix(" yard medley relay"))
            .regex(re(r"^[SDM]MR (\d+(?:\.\d+)?) Mile$"), with_suffix(" mile medley relay"))
    })
}

fn athletic_net_meters() -> &'static MatcherTable<Option<f64>> {
    static TABLE: OnceLock<MatcherTable<Option<f64>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        MatcherTable::new()
            .regex(
                re(r"^(\d+(?:,000)?)(?: Meter(?:s| Dash| Fly)|m (?:Hurdles|Racewalk))$"),
                number,
            )
            .regex(re(r"^(\d+(?:\.\d+)?) Mile(?:|s| Steeplechase| Racewalk)$"), |s| {
                number(s).map(|miles| miles * METERS_PER_MILE)
            })
            .regex(re(r"^(\d+(?:\.\d+))k Steeplechase$"), |s| {
                number(s).map(|km| km * 1000.0)
            })
    })
}

fn milesplit_labels() -> &'static MatcherTable<String> {
    static TABLE: OnceLock<MatcherTable<String>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = MatcherTable::new()
            .regex(re(r"^(\d+)m$"), with_suffix(" meter"))
            .regex(re(r"^(\d+(?:\.\d+)?)mile$"), with_suffix(" mile"))
            .literal("Mile", "1 mile".to_string())
            .regex(re(r"^(\d+)H$"), with_suffix(" meter hurdles"));
        for (code, label) in [
            ("D", "discus"),
            ("HJ", "high jump"),
            ("HT", "hammer throw"),
            ("JT", "javelin"),
            ("LJ", "long jump"),
            ("PV", "pole vault"),
            ("S", "shot put"),
            ("TJ", "triple jump"),
        ] {
            table = table.literal(code, label.to_string());
        }
        table
            .regex(re(r"^(\d+)mSC$"), with_suffix(" meter steeple chase"))
            .regex(re(r"^(\d+)RW$"), with_suffix(" meter race walk"))
    })
}

fn milesplit_meters() -> &'static MatcherTable<Option<f64>> {
    static TABLE: OnceLock<MatcherTable<Option<f64>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        MatcherTable::new()
            .regex(re(r"^(\d+)(?:m(?:SC)?|h|rw)$"), number)
            .regex(re(r"(\d+(?:\.\d+)?)mile"), |s| {
                number(s).map(|miles| miles * METERS_PER_MILE)
            })
    })
}
