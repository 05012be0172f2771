use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use log::debug;

use crate::PitwallError;

use super::{ComparisonResult, DriverProfile, SessionInfo};

/// Per-request timeout for the live client. Without a bound here a stalled
/// upstream would keep refresh cycles in flight indefinitely.
pub(crate) const REQUEST_TIMEOUT_S: u64 = 5;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

/// A trait for fetching dashboard statistics from a timing data backend.
///
/// This trait abstracts the data source behind the dashboard, allowing the
/// refresh coordinator to run against the live HTTP API or against scripted
/// data for testing and offline development. Implementations perform one
/// request per call and report failures through `PitwallError`; they never
/// retry. The coordinator reduces every failure to a per-resource outcome,
/// so an erroring implementation can slow a cycle down but never abort it.
///
/// The three resources are independent and the coordinator fetches them
/// concurrently; implementations must tolerate overlapping calls.
pub trait StatsProvider {
    /// Fetch the profile for a single driver by racing number.
    fn driver(
        &self,
        driver_number: u32,
    ) -> impl Future<Output = Result<DriverProfile, PitwallError>>;

    /// Fetch the descriptor of the latest session on the calendar.
    fn latest_session(&self) -> impl Future<Output = Result<SessionInfo, PitwallError>>;

    /// Fetch the head-to-head comparison for a driver pairing.
    fn comparison(
        &self,
        pair: &str,
    ) -> impl Future<Output = Result<ComparisonResult, PitwallError>>;
}

/// Stats provider backed by the live timing HTTP API.
///
/// Resources are plain GET endpoints returning JSON payloads. A response
/// with a non-success status and a response whose body does not parse are
/// both reported as errors; the coordinator treats either the same way as
/// a transport failure.
pub struct OpenF1Client {
    base_url: String,
    http: reqwest::Client,
}

impl OpenF1Client {
    pub fn new(base_url: &str) -> Result<Self, PitwallError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_S))
            .build()
            .map_err(|e| PitwallError::StatsClientError { source: e })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, PitwallError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                debug!("Request to {} failed: {}", url, e);
                PitwallError::StatsRequestError { source: e }
            })?;
        response
            .json::<T>()
            .await
            .map_err(|e| {
                debug!("Could not parse payload from {}: {}", url, e);
                PitwallError::MalformedStatsPayload { source: e }
            })
    }
}

impl StatsProvider for OpenF1Client {
    fn driver(
        &self,
        driver_number: u32,
    ) -> impl Future<Output = Result<DriverProfile, PitwallError>> {
        async move { self.get_json(&format!("driver/{}", driver_number)).await }
    }

    fn latest_session(&self) -> impl Future<Output = Result<SessionInfo, PitwallError>> {
        async move { self.get_json("session/latest").await }
    }

    fn comparison(
        &self,
        pair: &str,
    ) -> impl Future<Output = Result<ComparisonResult, PitwallError>> {
        async move { self.get_json(&format!("comparison/{}", pair)).await }
    }
}

/// One scripted refresh cycle for the mock provider.
///
/// `None` for a resource means that resource is unreachable during the
/// cycle. `latency` is applied to every fetch of the cycle to simulate a
/// slow upstream.
#[derive(Clone, Debug, Default)]
pub struct ScriptedCycle {
    pub driver_one: Option<DriverProfile>,
    pub driver_two: Option<DriverProfile>,
    pub session: Option<SessionInfo>,
    pub comparison: Option<ComparisonResult>,
    pub latency: Duration,
}

struct ScriptedFetch<T> {
    result: Option<T>,
    latency: Duration,
}

/// A scripted stats provider for testing and offline development.
///
/// Each resource keeps its own queue of scripted fetches; every call pops
/// one entry, waits out the scripted latency, then yields the entry's
/// result. Once a queue runs dry the resource reports a provider error on
/// every further call, which the coordinator absorbs as an unreachable
/// outcome.
pub struct MockStatsProvider {
    drivers: Mutex<HashMap<u32, VecDeque<ScriptedFetch<DriverProfile>>>>,
    sessions: Mutex<VecDeque<ScriptedFetch<SessionInfo>>>,
    comparisons: Mutex<VecDeque<ScriptedFetch<ComparisonResult>>>,
}

impl MockStatsProvider {
    /// Build a provider that replays `cycles` in order, one entry per
    /// resource per cycle, for the two given driver numbers.
    pub fn from_cycles(
        driver_one_number: u32,
        driver_two_number: u32,
        cycles: Vec<ScriptedCycle>,
    ) -> Self {
        let mut driver_one = VecDeque::new();
        let mut driver_two = VecDeque::new();
        let mut sessions = VecDeque::new();
        let mut comparisons = VecDeque::new();
        for cycle in cycles {
            driver_one.push_back(ScriptedFetch {
                result: cycle.driver_one,
                latency: cycle.latency,
            });
            driver_two.push_back(ScriptedFetch {
                result: cycle.driver_two,
                latency: cycle.latency,
            });
            sessions.push_back(ScriptedFetch {
                result: cycle.session,
                latency: cycle.latency,
            });
            comparisons.push_back(ScriptedFetch {
                result: cycle.comparison,
                latency: cycle.latency,
            });
        }

        let mut drivers = HashMap::new();
        drivers.insert(driver_one_number, driver_one);
        drivers.insert(driver_two_number, driver_two);
        Self {
            drivers: Mutex::new(drivers),
            sessions: Mutex::new(sessions),
            comparisons: Mutex::new(comparisons),
        }
    }

    async fn replay<T>(
        scripted: Option<ScriptedFetch<T>>,
        resource: &str,
    ) -> Result<T, PitwallError> {
        let scripted = scripted.ok_or_else(|| PitwallError::StatsProviderError {
            description: format!("Mock script exhausted for {}", resource),
        })?;
        if !scripted.latency.is_zero() {
            tokio::time::sleep(scripted.latency).await;
        }
        scripted.result.ok_or(PitwallError::StatsProviderError {
            description: format!("Scripted unreachable {}", resource),
        })
    }
}

impl StatsProvider for MockStatsProvider {
    fn driver(
        &self,
        driver_number: u32,
    ) -> impl Future<Output = Result<DriverProfile, PitwallError>> {
        let scripted = self
            .drivers
            .lock()
            .expect("mock driver script lock poisoned")
            .get_mut(&driver_number)
            .and_then(|queue| queue.pop_front());
        async move { Self::replay(scripted, "driver profile").await }
    }

    fn latest_session(&self) -> impl Future<Output = Result<SessionInfo, PitwallError>> {
        let scripted = self
            .sessions
            .lock()
            .expect("mock session script lock poisoned")
            .pop_front();
        async move { Self::replay(scripted, "latest session").await }
    }

    fn comparison(
        &self,
        _pair: &str,
    ) -> impl Future<Output = Result<ComparisonResult, PitwallError>> {
        let scripted = self
            .comparisons
            .lock()
            .expect("mock comparison script lock poisoned")
            .pop_front();
        async move { Self::replay(scripted, "comparison").await }
    }
}
