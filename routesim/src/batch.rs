use crate::defaults::{FLIGHT_STAGGER, PEER_OFFSET};
use rand_core::RngCore;
use routesim_core::{Addr, DeviceId, Topology};
use std::time::Duration;
use thiserror::Error;

/// Error returned when a batch simulation cannot be started.
#[derive(Debug, Error)]
pub enum BatchError {
    /// A previous batch still has unresolved packets. The only
    /// cancellation point in the scheduler is rejecting a brand-new
    /// batch; in-flight packets are never cancelled.
    #[error("A batch simulation is already outstanding; wait for its summary")]
    AlreadyOutstanding,
}

/// One scheduled packet of a batch's generated traffic pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flight {
    pub source: DeviceId,
    pub target: FlightTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlightTarget {
    /// Destination resolved to a device in the snapshot.
    Device(DeviceId),
    /// The source host's gateway IP matches no device: the flight is a
    /// synthetic failure resolved on dispatch, without a trace.
    MissingGateway(Addr),
}

/// Live counters for the batch currently in flight.
///
/// `outstanding` is the rendezvous: each resolved packet decrements it,
/// and whichever packet brings it to zero triggers the one and only
/// summary. Completion order between packets carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRun {
    scheduled: usize,
    outstanding: usize,
    succeeded: usize,
    failed: usize,
}

impl BatchRun {
    pub(crate) fn new(scheduled: usize) -> Self {
        Self {
            scheduled,
            outstanding: scheduled,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Packets planned when the batch started.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Packets not yet resolved.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub(crate) fn resolve(&mut self, success: bool) {
        self.outstanding = self.outstanding.saturating_sub(1);
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub(crate) fn done(&self) -> bool {
        self.outstanding == 0
    }

    pub(crate) fn summary(&self) -> BatchSummary {
        BatchSummary {
            scheduled: self.scheduled,
            succeeded: self.succeeded,
            failed: self.failed,
        }
    }
}

/// Aggregate result of a completed batch, emitted exactly once.
///
/// A failed packet is not an error. Partial failure is normal and is
/// precisely the connectivity signal the batch measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub scheduled: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// The summary of a batch that had nothing to schedule.
    pub const EMPTY: Self = Self {
        scheduled: 0,
        succeeded: 0,
        failed: 0,
    };

    /// At least one packet arrived. This is the signal worth recording
    /// (at most once per batch) with the persistence collaborator.
    pub fn any_success(&self) -> bool {
        self.succeeded > 0
    }

    /// Classify the summary for presentation.
    pub fn verdict(&self) -> BatchVerdict {
        if self.scheduled == 0 {
            BatchVerdict::NoTraffic
        } else if self.succeeded == 0 {
            BatchVerdict::TotalFailure
        } else if self.failed > 0 {
            BatchVerdict::PartialSuccess
        } else {
            BatchVerdict::FullSuccess
        }
    }
}

/// Presentation-level classification of a [`BatchSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchVerdict {
    /// Fewer than two hosts; nothing was scheduled.
    NoTraffic,
    /// Every scheduled packet arrived.
    FullSuccess,
    /// Some packets arrived, some were dropped.
    PartialSuccess,
    /// Every scheduled packet was dropped.
    TotalFailure,
}

/// Generate the fixed traffic pattern for a "simulate all traffic"
/// request.
///
/// With fewer than two hosts there is nothing to test and the result is
/// empty. Otherwise every host `i` contributes, at staggered offsets:
///
/// - a packet toward its gateway's device at `i * FLIGHT_STAGGER`, when
///   a gateway is configured (a gateway IP matching no device becomes a
///   [`FlightTarget::MissingGateway`] synthetic failure);
/// - a packet toward a uniformly-chosen distinct host at
///   `i * FLIGHT_STAGGER + PEER_OFFSET`.
pub(crate) fn generate<R: RngCore>(topology: &Topology, rng: &mut R) -> Vec<(Duration, Flight)> {
    let hosts: Vec<_> = topology.hosts().collect();
    if hosts.len() < 2 {
        return Vec::new();
    }

    let mut flights = Vec::new();
    for (index, source) in hosts.iter().enumerate() {
        let offset = FLIGHT_STAGGER * index as u32;

        if let Some(gateway) = source.gateway() {
            let target = match topology.device_by_ip(gateway) {
                Some(device) => FlightTarget::Device(device.id()),
                None => FlightTarget::MissingGateway(gateway),
            };
            flights.push((
                offset,
                Flight {
                    source: source.id(),
                    target,
                },
            ));
        }

        // hosts.len() >= 2, so a distinct peer always exists
        let peers: Vec<_> = hosts
            .iter()
            .filter(|peer| peer.id() != source.id())
            .collect();
        let peer = peers[(rng.next_u64() % peers.len() as u64) as usize];
        flights.push((
            offset + PEER_OFFSET,
            Flight {
                source: source.id(),
                target: FlightTarget::Device(peer.id()),
            },
        ));
    }
    flights
}
