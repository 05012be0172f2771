pub mod coordinator;

pub use coordinator::{CoordinatorHandle, start_coordinator};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::{ComparisonResult, DriverProfile, SessionInfo};

/// Racing numbers of the two drivers this dashboard instance tracks.
pub const DRIVER_ONE_NUMBER: u32 = 87;
pub const DRIVER_TWO_NUMBER: u32 = 31;
/// Pairing identifier understood by the comparison endpoint.
pub const COMPARISON_PAIR: &str = "bearman-ocon";

/// Banner text for a coordinator-level failure. Per-resource failures are
/// never surfaced to the user; they only show up as cards that keep their
/// previous content.
pub const GENERIC_FETCH_ERROR: &str = "Failed to load dashboard data";

/// The result of one resource fetch attempt.
///
/// `Unreachable` covers transport failures, non-success statuses, and
/// payloads that fail to parse. The dashboard treats all three identically:
/// the slice keeps whatever it was already displaying.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Payload(T),
    Unreachable,
}

impl<T> Outcome<T> {
    pub fn from_result<E: std::fmt::Display>(label: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(payload) => Outcome::Payload(payload),
            Err(e) => {
                debug!("{} is unreachable this cycle: {}", label, e);
                Outcome::Unreachable
            }
        }
    }
}

/// Everything a single fan-out fetch produced, one outcome per slice.
#[derive(Clone, Debug)]
pub struct CycleOutcomes {
    pub driver_one: Outcome<DriverProfile>,
    pub driver_two: Outcome<DriverProfile>,
    pub session: Outcome<SessionInfo>,
    pub comparison: Outcome<ComparisonResult>,
}

/// The dashboard's view model: four independently-nullable slices plus the
/// loading and error flags. This is the only mutable state in the refresh
/// core; the rendering layer only ever sees cloned snapshots of it.
///
/// Invariant: each slice is either absent (never successfully fetched) or
/// holds the most recent successful payload for that resource. A failed
/// fetch for one slice never clears or blocks another slice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewModel {
    pub driver_one: Option<DriverProfile>,
    pub driver_two: Option<DriverProfile>,
    pub session: Option<SessionInfo>,
    pub comparison: Option<ComparisonResult>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            driver_one: None,
            driver_two: None,
            session: None,
            comparison: None,
            is_loading: true,
            error: None,
        }
    }
}

impl ViewModel {
    /// Marks the start of a refresh cycle.
    pub fn begin_cycle(&mut self) {
        self.is_loading = true;
    }

    /// Applies the outcomes of a settled cycle.
    ///
    /// Payloads replace their slice wholesale; unreachable resources leave
    /// the previous value in place so stale data keeps rendering instead of
    /// blanking the card. Always finalizes the loading flag and clears any
    /// earlier coordinator failure banner.
    pub fn commit_cycle(&mut self, outcomes: CycleOutcomes) {
        if let Outcome::Payload(driver) = outcomes.driver_one {
            self.driver_one = Some(driver);
        }
        if let Outcome::Payload(driver) = outcomes.driver_two {
            self.driver_two = Some(driver);
        }
        if let Outcome::Payload(session) = outcomes.session {
            self.session = Some(session);
        }
        if let Outcome::Payload(comparison) = outcomes.comparison {
            self.comparison = Some(comparison);
        }
        self.error = None;
        self.is_loading = false;
    }

    /// Records a coordinator-level failure. Per-resource failures never end
    /// up here; they are absorbed as unreachable outcomes upstream.
    pub fn fail_cycle(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DriverSummary;

    pub(crate) fn sample_driver(number: u32, name: &str) -> DriverProfile {
        DriverProfile {
            driver_number: number,
            broadcast_name: name.to_string(),
            full_name: format!("{} Fullname", name),
            name_acronym: name.chars().take(3).collect::<String>().to_uppercase(),
            team_name: "Haas F1 Team".to_string(),
            team_colour: "E6002B".to_string(),
            country_code: Some("GB".to_string()),
            headshot_url: None,
        }
    }

    pub(crate) fn sample_session(status: &str) -> SessionInfo {
        SessionInfo {
            session_name: "Race".to_string(),
            circuit_short_name: "Suzuka".to_string(),
            location: "Suzuka".to_string(),
            session_status: status.to_string(),
            date_start: "2025-04-06T05:00:00+00:00".to_string(),
            date_end: "2025-04-06T07:00:00+00:00".to_string(),
            gmt_offset: "09:00:00".to_string(),
        }
    }

    pub(crate) fn sample_comparison(delta: &str) -> ComparisonResult {
        ComparisonResult {
            driver1: DriverSummary {
                name: "BEARMAN".to_string(),
                best_lap: "1:32.845".to_string(),
                avg_speed: 214.3,
                position: 10,
            },
            driver2: DriverSummary {
                name: "OCON".to_string(),
                best_lap: "1:32.503".to_string(),
                avg_speed: 215.1,
                position: 8,
            },
            delta: delta.to_string(),
        }
    }

    fn all_payload_outcomes(tag: &str) -> CycleOutcomes {
        CycleOutcomes {
            driver_one: Outcome::Payload(sample_driver(DRIVER_ONE_NUMBER, &format!("{} ONE", tag))),
            driver_two: Outcome::Payload(sample_driver(DRIVER_TWO_NUMBER, &format!("{} TWO", tag))),
            session: Outcome::Payload(sample_session(tag)),
            comparison: Outcome::Payload(sample_comparison("+0.342")),
        }
    }

    #[test]
    fn test_new_view_model_is_empty_and_loading() {
        let view_model = ViewModel::default();
        assert!(view_model.is_loading);
        assert!(view_model.driver_one.is_none());
        assert!(view_model.driver_two.is_none());
        assert!(view_model.session.is_none());
        assert!(view_model.comparison.is_none());
        assert!(view_model.error.is_none());
    }

    #[test]
    fn test_partial_failure_commits_only_reachable_slices() {
        // driver one and the session succeed, driver two and the comparison
        // are unreachable
        let mut view_model = ViewModel::default();
        view_model.commit_cycle(CycleOutcomes {
            driver_one: Outcome::Payload(sample_driver(DRIVER_ONE_NUMBER, "BEARMAN")),
            driver_two: Outcome::Unreachable,
            session: Outcome::Payload(sample_session("Started")),
            comparison: Outcome::Unreachable,
        });

        assert!(view_model.driver_one.is_some());
        assert!(view_model.driver_two.is_none());
        assert!(view_model.session.is_some());
        assert!(view_model.comparison.is_none());
        assert!(!view_model.is_loading);
        assert!(view_model.error.is_none());
    }

    #[test]
    fn test_unreachable_slice_keeps_previous_value() {
        let mut view_model = ViewModel::default();
        view_model.commit_cycle(all_payload_outcomes("first"));
        let populated = view_model.clone();

        view_model.begin_cycle();
        view_model.commit_cycle(CycleOutcomes {
            driver_one: Outcome::Unreachable,
            driver_two: Outcome::Unreachable,
            session: Outcome::Unreachable,
            comparison: Outcome::Unreachable,
        });

        assert_eq!(view_model.driver_one, populated.driver_one);
        assert_eq!(view_model.driver_two, populated.driver_two);
        assert_eq!(view_model.session, populated.session);
        assert_eq!(view_model.comparison, populated.comparison);
        assert!(!view_model.is_loading);
    }

    #[test]
    fn test_payloads_replace_slices_wholesale() {
        let mut view_model = ViewModel::default();
        view_model.commit_cycle(all_payload_outcomes("first"));
        view_model.begin_cycle();
        view_model.commit_cycle(all_payload_outcomes("second"));

        assert_eq!(
            view_model.driver_one.as_ref().unwrap().broadcast_name,
            "second ONE"
        );
        assert_eq!(
            view_model.session.as_ref().unwrap().session_status,
            "second"
        );
    }

    #[test]
    fn test_loading_flag_transitions_once_per_cycle() {
        let mut view_model = ViewModel::default();
        assert!(view_model.is_loading);

        view_model.commit_cycle(all_payload_outcomes("first"));
        assert!(!view_model.is_loading);

        view_model.begin_cycle();
        assert!(view_model.is_loading);
        view_model.commit_cycle(all_payload_outcomes("second"));
        assert!(!view_model.is_loading);
    }

    #[test]
    fn test_settled_cycle_clears_stale_error_banner() {
        let mut view_model = ViewModel::default();
        view_model.fail_cycle(GENERIC_FETCH_ERROR);
        assert_eq!(view_model.error.as_deref(), Some(GENERIC_FETCH_ERROR));
        assert!(!view_model.is_loading);

        view_model.begin_cycle();
        view_model.commit_cycle(all_payload_outcomes("recovered"));
        assert!(view_model.error.is_none());
    }

    #[test]
    fn test_fail_cycle_keeps_slices() {
        let mut view_model = ViewModel::default();
        view_model.commit_cycle(all_payload_outcomes("first"));
        view_model.begin_cycle();
        view_model.fail_cycle(GENERIC_FETCH_ERROR);

        assert!(view_model.driver_one.is_some());
        assert!(view_model.session.is_some());
        assert!(!view_model.is_loading);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        // **Property: slice independence**
        // For every combination of per-resource outcomes, a payload
        // replaces exactly its own slice and an unreachable resource
        // leaves exactly its own slice at the previous value.
        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_slice_independence(
                driver_one_ok in any::<bool>(),
                driver_two_ok in any::<bool>(),
                session_ok in any::<bool>(),
                comparison_ok in any::<bool>(),
                start_populated in any::<bool>(),
            ) {
                let mut view_model = ViewModel::default();
                if start_populated {
                    view_model.commit_cycle(all_payload_outcomes("seed"));
                }
                let before = view_model.clone();

                view_model.begin_cycle();
                view_model.commit_cycle(CycleOutcomes {
                    driver_one: if driver_one_ok {
                        Outcome::Payload(sample_driver(DRIVER_ONE_NUMBER, "fresh ONE"))
                    } else {
                        Outcome::Unreachable
                    },
                    driver_two: if driver_two_ok {
                        Outcome::Payload(sample_driver(DRIVER_TWO_NUMBER, "fresh TWO"))
                    } else {
                        Outcome::Unreachable
                    },
                    session: if session_ok {
                        Outcome::Payload(sample_session("fresh"))
                    } else {
                        Outcome::Unreachable
                    },
                    comparison: if comparison_ok {
                        Outcome::Payload(sample_comparison("-0.118"))
                    } else {
                        Outcome::Unreachable
                    },
                });

                if driver_one_ok {
                    assert_eq!(
                        view_model.driver_one.as_ref().unwrap().broadcast_name,
                        "fresh ONE"
                    );
                } else {
                    assert_eq!(view_model.driver_one, before.driver_one);
                }
                if driver_two_ok {
                    assert_eq!(
                        view_model.driver_two.as_ref().unwrap().broadcast_name,
                        "fresh TWO"
                    );
                } else {
                    assert_eq!(view_model.driver_two, before.driver_two);
                }
                if session_ok {
                    assert_eq!(view_model.session.as_ref().unwrap().session_status, "fresh");
                } else {
                    assert_eq!(view_model.session, before.session);
                }
                if comparison_ok {
                    assert_eq!(view_model.comparison.as_ref().unwrap().delta, "-0.118");
                } else {
                    assert_eq!(view_model.comparison, before.comparison);
                }

                // every settled cycle finalizes the flags regardless of how
                // many resources were reachable
                assert!(!view_model.is_loading);
                assert!(view_model.error.is_none());
            }
        }
    }
}
