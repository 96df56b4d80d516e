use crate::{
    batch::{self, BatchError, BatchRun, BatchSummary, Flight, FlightTarget},
    time_queue::TimeQueue,
};
use rand_chacha::ChaChaRng;
use rand_core::SeedableRng as _;
use routesim_core::{Addr, DeviceId, Topology, TraceReport, trace};
use std::{sync::Arc, time::Duration};

/// The batch scheduler's simulated-time context.
///
/// One context owns the clock, the flight queue and at most one
/// outstanding [`BatchRun`]. Time only moves when the caller pumps it
/// with [`advance_with`], so a batch that would take seconds of
/// animation resolves instantly in tests.
///
/// [`advance_with`]: SimContext::advance_with
///
/// # Example
///
/// ```
/// use routesim::{BatchEvent, BatchStart, SimContext};
/// use routesim_core::{DeviceKind, Topology};
/// use std::{sync::Arc, time::Duration};
///
/// let mut builder = Topology::builder();
/// let switch = builder.new_device(DeviceKind::Switch).register();
/// let h1 = builder
///     .new_device(DeviceKind::Host)
///     .set_ip("192.168.1.10".parse().unwrap())
///     .set_mask("255.255.255.0".parse().unwrap())
///     .register();
/// let h2 = builder
///     .new_device(DeviceKind::Host)
///     .set_ip("192.168.1.11".parse().unwrap())
///     .set_mask("255.255.255.0".parse().unwrap())
///     .register();
/// builder.connect(h1, switch).unwrap();
/// builder.connect(h2, switch).unwrap();
///
/// let mut context = SimContext::new();
/// let BatchStart::Scheduled { flights } =
///     context.start_batch(Arc::new(builder.build())).unwrap()
/// else {
///     panic!("two hosts schedule traffic")
/// };
/// assert_eq!(flights, 2);
///
/// let mut summary = None;
/// while context.is_outstanding() {
///     context.advance_with(Duration::from_millis(100), |event| {
///         if let BatchEvent::Completed(s) = event {
///             summary = Some(s);
///         }
///     });
/// }
/// assert_eq!(summary.unwrap().succeeded, 2);
/// ```
pub struct SimContext {
    queue: TimeQueue<Flight>,
    active: Option<ActiveBatch>,
    clock: Duration,
    rng: ChaChaRng,
}

struct ActiveBatch {
    run: BatchRun,
    /// Snapshot taken when the batch started. Later edits to the
    /// diagram do not affect packets already in flight.
    topology: Arc<Topology>,
}

/// What happened when a batch was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStart {
    /// Traffic was generated and queued; pump the context to resolve it.
    Scheduled { flights: usize },
    /// Fewer than two hosts: nothing to schedule, the batch is already
    /// complete and this is its (zero) summary.
    Empty(BatchSummary),
}

/// Notification surfaced while pumping the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// A flight was traced through the snapshot.
    Resolved {
        source: DeviceId,
        report: TraceReport,
    },
    /// A flight's gateway IP matched no device; counted as a failure
    /// without tracing.
    GatewayMissing { source: DeviceId, gateway: Addr },
    /// The last outstanding flight resolved. Emitted exactly once per
    /// batch.
    Completed(BatchSummary),
}

impl SimContext {
    pub fn new() -> Self {
        Self {
            queue: TimeQueue::new(),
            active: None,
            clock: Duration::ZERO,
            rng: ChaChaRng::seed_from_u64(0),
        }
    }

    /// Re-seed the peer-selection generator so a batch's random traffic
    /// is reproducible.
    pub fn set_seed(&mut self, seed: u64) {
        self.rng = ChaChaRng::seed_from_u64(seed);
    }

    /// Current simulated time.
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Counters of the outstanding batch, if one is in flight.
    pub fn batch(&self) -> Option<&BatchRun> {
        self.active.as_ref().map(|active| &active.run)
    }

    pub fn is_outstanding(&self) -> bool {
        self.active.is_some()
    }

    /// How long until the next queued flight is due, from the current
    /// clock.
    pub fn time_to_next_flight(&self) -> Option<Duration> {
        self.queue.next_due().map(|due| due.saturating_sub(self.clock))
    }

    /// Generate and queue a batch of traffic against `topology`.
    ///
    /// The snapshot is pinned for the whole batch. Starting a batch
    /// while another is outstanding is rejected without touching the
    /// outstanding one.
    pub fn start_batch(&mut self, topology: Arc<Topology>) -> Result<BatchStart, BatchError> {
        if self.active.is_some() {
            return Err(BatchError::AlreadyOutstanding);
        }

        let flights = batch::generate(&topology, &mut self.rng);
        if flights.is_empty() {
            return Ok(BatchStart::Empty(BatchSummary::EMPTY));
        }

        let count = flights.len();
        for (offset, flight) in flights {
            self.queue.push(self.clock + offset, flight);
        }
        self.active = Some(ActiveBatch {
            run: BatchRun::new(count),
            topology,
        });
        Ok(BatchStart::Scheduled { flights: count })
    }

    /// Advance the simulated clock by `duration`, dispatching every
    /// flight that comes due and reporting each through `handle`.
    ///
    /// When the last outstanding flight resolves, `handle` receives
    /// [`BatchEvent::Completed`] and the context is ready for a new
    /// batch.
    pub fn advance_with<H>(&mut self, duration: Duration, mut handle: H)
    where
        H: FnMut(BatchEvent),
    {
        self.clock += duration;

        let Some(active) = self.active.as_mut() else {
            return;
        };

        for flight in self.queue.pop_all_elapsed(self.clock) {
            match flight.target {
                FlightTarget::MissingGateway(gateway) => {
                    active.run.resolve(false);
                    handle(BatchEvent::GatewayMissing {
                        source: flight.source,
                        gateway,
                    });
                }
                FlightTarget::Device(destination) => {
                    let report = trace(&active.topology, flight.source, destination)
                        .expect("flight endpoints come from the batch snapshot");
                    active.run.resolve(report.success());
                    handle(BatchEvent::Resolved {
                        source: flight.source,
                        report,
                    });
                }
            }
        }

        if active.run.done() {
            let summary = active.run.summary();
            self.active = None;
            handle(BatchEvent::Completed(summary));
        }
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new()
    }
}
