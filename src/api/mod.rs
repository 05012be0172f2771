pub(crate) mod provider;

pub use provider::{
    DEFAULT_API_BASE_URL, MockStatsProvider, OpenF1Client, ScriptedCycle, StatsProvider,
};

use serde::{Deserialize, Serialize};

/// A driver's public profile as returned by the stats API.
///
/// Profiles are replaced wholesale on every successful fetch; fields are
/// never merged across cycles.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DriverProfile {
    pub driver_number: u32,
    pub broadcast_name: String,
    pub full_name: String,
    pub name_acronym: String,
    pub team_name: String,
    /// Team accent colour as a hex string without the leading `#`.
    pub team_colour: String,
    pub country_code: Option<String>,
    pub headshot_url: Option<String>,
}

/// Descriptor of the most recent session on the calendar.
///
/// `session_status` is free text; upstream sends arbitrary labels and the
/// dashboard renders whatever it receives. Timestamps and the GMT offset
/// are upstream-formatted strings passed through verbatim.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionInfo {
    pub session_name: String,
    pub circuit_short_name: String,
    pub location: String,
    pub session_status: String,
    pub date_start: String,
    pub date_end: String,
    pub gmt_offset: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DriverSummary {
    pub name: String,
    pub best_lap: String,
    pub avg_speed: f64,
    pub position: u32,
}

/// Head-to-head numbers for the two dashboard drivers.
///
/// `delta` is upstream-formatted text and is not guaranteed to be a clean
/// numeric string.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComparisonResult {
    pub driver1: DriverSummary,
    pub driver2: DriverSummary,
    pub delta: String,
}
