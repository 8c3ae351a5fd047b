//! Cropping seasons and the fixed season rotation

use serde::{Deserialize, Serialize};

/// Cropping seasons recognised by the platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Season {
    Kharif,
    Rabi,
    Zaid,
    Summer,
    Autumn,
    Winter,
    #[serde(rename = "Whole Year")]
    WholeYear,
}

impl Season {
    pub const ALL: [Season; 7] = [
        Season::Kharif,
        Season::Rabi,
        Season::Zaid,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
        Season::WholeYear,
    ];

    /// Parse a season from its exact label.
    ///
    /// Labels are matched verbatim; "kharif" or " Kharif" are unknown.
    pub fn from_label(label: &str) -> Option<Season> {
        match label {
            "Kharif" => Some(Season::Kharif),
            "Rabi" => Some(Season::Rabi),
            "Zaid" => Some(Season::Zaid),
            "Summer" => Some(Season::Summer),
            "Autumn" => Some(Season::Autumn),
            "Winter" => Some(Season::Winter),
            "Whole Year" => Some(Season::WholeYear),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Zaid => "Zaid",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
            Season::WholeYear => "Whole Year",
        }
    }

    /// The season that follows this one in the rotation
    pub fn next(&self) -> Season {
        match self {
            Season::Kharif => Season::Rabi,
            Season::Rabi => Season::Zaid,
            Season::Zaid => Season::Kharif,
            Season::Summer => Season::Kharif,
            Season::Autumn => Season::Rabi,
            Season::Winter => Season::Zaid,
            Season::WholeYear => Season::Kharif,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Look up the season that follows `current`, or `None` for an unknown label
pub fn next_season(current: &str) -> Option<Season> {
    Season::from_label(current).map(|season| season.next())
}
