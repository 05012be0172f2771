use std::{panic::AssertUnwindSafe, rc::Rc, sync::mpsc::Sender, thread, time::Duration};

use futures::{FutureExt, StreamExt, future::LocalBoxFuture, stream::FuturesUnordered};
use log::{debug, error};
use tokio::sync::watch;

use crate::{PitwallError, api::StatsProvider};

use super::{
    COMPARISON_PAIR, CycleOutcomes, DRIVER_ONE_NUMBER, DRIVER_TWO_NUMBER, GENERIC_FETCH_ERROR,
    Outcome, ViewModel,
};

pub const DEFAULT_REFRESH_INTERVAL_S: u64 = 10;

type SettledCycle = Result<CycleOutcomes, Box<dyn std::any::Any + Send>>;

/// Fetch one resource, tolerating failure.
///
/// Reduces the provider call to an outcome so that a failing resource can
/// never abort the cycle that issued it.
async fn fetch_slice<T, F>(label: &str, fetch: F) -> Outcome<T>
where
    F: Future<Output = Result<T, PitwallError>>,
{
    Outcome::from_result(label, fetch.await)
}

/// Issue all four resource fetches concurrently and wait for every one of
/// them to settle. A slow or failing resource does not hold back the
/// others' results; the caller commits everything at once after the
/// slowest settles.
pub async fn fetch_cycle<P: StatsProvider>(provider: &P) -> CycleOutcomes {
    let (driver_one, driver_two, session, comparison) = tokio::join!(
        fetch_slice("driver one profile", provider.driver(DRIVER_ONE_NUMBER)),
        fetch_slice("driver two profile", provider.driver(DRIVER_TWO_NUMBER)),
        fetch_slice("latest session", provider.latest_session()),
        fetch_slice("head-to-head comparison", provider.comparison(COMPARISON_PAIR)),
    );
    CycleOutcomes {
        driver_one,
        driver_two,
        session,
        comparison,
    }
}

fn broadcast(sender: &Sender<ViewModel>, view_model: &ViewModel) -> bool {
    if sender.send(view_model.clone()).is_err() {
        debug!("Snapshot receiver dropped, stopping refresh coordinator");
        return false;
    }
    true
}

/// Drives the dashboard refresh schedule until `stop` is signalled or the
/// snapshot receiver goes away.
///
/// Cycles start on a fixed period measured from coordinator start, not from
/// the completion of the previous cycle; a cycle that outlives the period
/// overlaps the next one and the two commit in settle order, last write
/// winning per slice. Commits are whole-slice replacements applied here on
/// the single coordinator thread, so readers of broadcast snapshots never
/// observe a partially updated slice.
fn run_refresh_loop<P: StatsProvider + 'static>(
    provider: P,
    snapshot_sender: Sender<ViewModel>,
    mut writer_sender: Option<Sender<ViewModel>>,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("could not build refresh coordinator runtime");

    runtime.block_on(async move {
        let provider = Rc::new(provider);
        let mut view_model = ViewModel::default();
        let mut interval = tokio::time::interval(period);
        let mut in_flight: FuturesUnordered<LocalBoxFuture<'static, SettledCycle>> =
            FuturesUnordered::new();
        let mut cycle_no: usize = 0;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    cycle_no += 1;
                    debug!("Starting refresh cycle #{}", cycle_no);
                    view_model.begin_cycle();
                    if !broadcast(&snapshot_sender, &view_model) {
                        break;
                    }
                    let provider = Rc::clone(&provider);
                    let cycle = async move { fetch_cycle(provider.as_ref()).await };
                    in_flight.push(AssertUnwindSafe(cycle).catch_unwind().boxed_local());
                }
                Some(settled) = in_flight.next() => {
                    match settled {
                        Ok(outcomes) => view_model.commit_cycle(outcomes),
                        Err(_) => {
                            error!("Refresh cycle panicked, surfacing a generic dashboard error");
                            view_model.fail_cycle(GENERIC_FETCH_ERROR);
                        }
                    }
                    if let Some(ref writer) = writer_sender {
                        if writer.send(view_model.clone()).is_err() {
                            debug!("Snapshot writer stopped, continuing without recording");
                            writer_sender = None;
                        }
                    }
                    if !broadcast(&snapshot_sender, &view_model) {
                        break;
                    }
                }
                _ = stop.changed() => {
                    debug!("Stop requested, cancelling refresh schedule");
                    break;
                }
            }
        }
    });
    // dropping the runtime discards any cycle still in flight; nothing is
    // left to receive its results
}

/// Handle to a running refresh coordinator.
///
/// Dropping the handle stops the schedule: the timer is cancelled, no
/// further cycles start, and anything still in flight is discarded.
pub struct CoordinatorHandle {
    stop: watch::Sender<bool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl CoordinatorHandle {
    /// Signal shutdown and wait for the coordinator thread to exit. Safe to
    /// call more than once.
    pub fn stop(&mut self) {
        let _ = self.stop.send(true);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                error!("Refresh coordinator thread panicked during shutdown");
            }
        }
    }
}

impl Drop for CoordinatorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start the refresh coordinator on its own thread.
///
/// The first cycle fires immediately; later cycles fire every `period`
/// measured from start. Every state change is broadcast to
/// `snapshot_sender` as a cloned snapshot of the view model;
/// `writer_sender`, when present, additionally receives each settled
/// snapshot for recording.
pub fn start_coordinator<P>(
    provider: P,
    snapshot_sender: Sender<ViewModel>,
    writer_sender: Option<Sender<ViewModel>>,
    period: Duration,
) -> CoordinatorHandle
where
    P: StatsProvider + Send + 'static,
{
    let (stop_sender, stop_receiver) = watch::channel(false);
    let thread = thread::spawn(move || {
        run_refresh_loop(provider, snapshot_sender, writer_sender, period, stop_receiver)
    });
    CoordinatorHandle {
        stop: stop_sender,
        thread: Some(thread),
    }
}
