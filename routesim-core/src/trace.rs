use crate::{
    addr::Addr,
    defaults::MAX_HOPS,
    device::DeviceId,
    reachability::Path,
    routing::{Decision, decide},
    topology::Topology,
};
use core::fmt;
use thiserror::Error;

/// The terminal status of one simulated packet.
///
/// Every variant here, including the failures, is an *expected*
/// result of the simulation, not an exception: a dropped packet is the
/// commonly-exercised output of this system, the signal being measured.
/// The [`Display`](fmt::Display) rendering carries the specific,
/// actionable explanation shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Forwarding landed exactly on the destination device.
    DestinationReached,
    /// The destination sat on the current device's local segment.
    DeliveredViaLocalSegment,
    /// Source and destination are the same device.
    LoopbackToSelf,
    /// A host needed to leave its segment with no gateway configured.
    NoDefaultGateway { host: String },
    /// No routing-table entry covers the destination.
    NoMatchingRoute {
        router: String,
        destination: Option<Addr>,
    },
    /// The chosen next-hop IP resolves to no device in the topology.
    NextHopNotActive { next_hop: Addr },
    /// The next hop exists but no cable path reaches it.
    NextHopUnreachable { next_hop: Addr },
    /// Subnet configuration says the destination is local; the cabling
    /// disagrees.
    LogicalNeighborUnreachable { destination: Addr },
    /// The current device cannot make forwarding decisions.
    NoPath,
    /// The hop ceiling tripped; the routing tables most likely loop.
    TtlExceeded,
}

impl Outcome {
    /// Did the packet arrive?
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::DestinationReached | Self::DeliveredViaLocalSegment | Self::LoopbackToSelf
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DestinationReached => "Destination reached.".fmt(f),
            Self::DeliveredViaLocalSegment => "Delivered via local segment.".fmt(f),
            Self::LoopbackToSelf => "Packet successfully looped back to its own device.".fmt(f),
            Self::NoDefaultGateway { host } => {
                write!(f, "No default gateway configured on {host}.")
            }
            Self::NoMatchingRoute {
                router,
                destination: Some(destination),
            } => {
                write!(
                    f,
                    "Router {router} has no route to a network containing {destination}."
                )
            }
            Self::NoMatchingRoute {
                router,
                destination: None,
            } => {
                write!(
                    f,
                    "Router {router} cannot route to a destination with no IP address."
                )
            }
            Self::NextHopNotActive { next_hop } => {
                write!(f, "Next hop {next_hop} is not active in the network.")
            }
            Self::NextHopUnreachable { next_hop } => {
                write!(
                    f,
                    "Cannot physically reach next hop {next_hop} (check cabling)."
                )
            }
            Self::LogicalNeighborUnreachable { destination } => {
                write!(
                    f,
                    "Destination {destination} is a logical neighbor but not reachable physically (check cables)."
                )
            }
            Self::NoPath => "No next hop could be identified.".fmt(f),
            Self::TtlExceeded => "TTL exceeded.".fmt(f),
        }
    }
}

/// Result of one path simulation.
///
/// `path` always starts at the source device; on failure it holds the
/// partial walk accumulated before the packet was dropped, so the
/// presentation layer can show how far it got. `hops` counts L3
/// forwarding decisions (gateway and router hops), not physical links
/// traversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceReport {
    pub outcome: Outcome,
    pub path: Path,
    pub hops: u8,
}

impl TraceReport {
    /// Did the packet arrive?
    pub fn success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Error returned when a simulation request references devices that are
/// not part of the snapshot.
///
/// Unlike the [`Outcome`] failures these are caller defects: the
/// diagram layer handed the engine an identifier the snapshot has never
/// seen.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The source device does not exist in the snapshot.
    /// A field named `source` would get `Error::source` semantics from
    /// thiserror, so the identifier lives under `device`.
    #[error("Source device ({device}) not found in the topology")]
    SourceNotFound { device: DeviceId },
    /// The destination device does not exist in the snapshot.
    #[error("Destination device ({destination}) not found in the topology")]
    DestinationNotFound { destination: DeviceId },
}

/// What happens if a packet is sent from `source` to `destination`?
///
/// Drives the per-hop routing decision iteratively, accumulating the
/// full device/link walk, until the packet is delivered, dropped, or
/// the hop counter reaches [`MAX_HOPS`], the network-layer time-to-live
/// safeguard that turns a forwarding loop from contradictory routing
/// tables into a clean [`Outcome::TtlExceeded`].
///
/// A simulation from a device to itself short-circuits to
/// [`Outcome::LoopbackToSelf`] with zero hops.
///
/// # Errors
///
/// - [`TraceError::SourceNotFound`]: `source` is not in the snapshot.
/// - [`TraceError::DestinationNotFound`]: `destination` is not in the
///   snapshot.
pub fn trace(
    topology: &Topology,
    source: DeviceId,
    destination: DeviceId,
) -> Result<TraceReport, TraceError> {
    let Some(mut current) = topology.device(source) else {
        return Err(TraceError::SourceNotFound { device: source });
    };
    let Some(target) = topology.device(destination) else {
        return Err(TraceError::DestinationNotFound { destination });
    };

    let mut path = Path::new(source);

    if source == destination {
        return Ok(TraceReport {
            outcome: Outcome::LoopbackToSelf,
            path,
            hops: 0,
        });
    }

    let mut hops = 0;
    while hops < MAX_HOPS {
        if current.id() == destination {
            return Ok(TraceReport {
                outcome: Outcome::DestinationReached,
                path,
                hops,
            });
        }

        match decide(topology, current, target) {
            Decision::Deliver(leg) => {
                path.extend(leg);
                return Ok(TraceReport {
                    outcome: Outcome::DeliveredViaLocalSegment,
                    path,
                    hops,
                });
            }
            Decision::Forward { next_hop, leg } => {
                path.extend(leg);
                current = topology
                    .device(next_hop)
                    .expect("the next hop was resolved from this same snapshot");
                hops += 1;
            }
            Decision::Drop(outcome) => {
                return Ok(TraceReport {
                    outcome,
                    path,
                    hops,
                });
            }
        }
    }

    Ok(TraceReport {
        outcome: Outcome::TtlExceeded,
        path,
        hops,
    })
}
