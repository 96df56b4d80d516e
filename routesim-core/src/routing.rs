use crate::{
    addr::Addr,
    device::{Device, DeviceId, DeviceKind},
    reachability::{Path, physical_path},
    topology::Topology,
    trace::Outcome,
};

/// A static routing-table entry: packets for the network implied by
/// `destination` are handed to `next_hop`.
///
/// The entry carries no explicit prefix length: the matching network
/// is derived classfully via [`Addr::implied_mask`], mirroring how the
/// table is entered in the diagram UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub destination: Addr,
    pub next_hop: Addr,
}

/// What a device decided to do with a packet it currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The destination sits on the current device's segment; the walk
    /// to it completes the delivery.
    Deliver(Path),
    /// Hand the packet to the resolved next hop, reached via `leg`.
    Forward { next_hop: DeviceId, leg: Path },
    /// The packet is dropped, with the specific failure as the outcome.
    Drop(Outcome),
}

/// One hop of the routing state machine: decide what `current` does
/// with a packet addressed to `destination`.
///
/// The checks run in a fixed priority order:
///
/// 1. **Same-segment test**: if the destination is on `current`'s
///    subnet it is logically local. Deliver over the physical segment,
///    or drop with [`Outcome::LogicalNeighborUnreachable`] when the
///    configuration says local but the cabling disagrees.
/// 2. **Router adjacency**: a router with a physical path to the
///    destination delivers even without a matching subnet or route
///    entry, modelling a router cabled straight onto the destination's
///    segment.
/// 3. **Forwarding**: hosts use their default gateway; routers run a
///    longest-prefix match over the static table. A device of a
///    transparent kind can do neither and drops with
///    [`Outcome::NoPath`].
/// 4. **Next-hop resolution**: the chosen next-hop IP must resolve to
///    a device ([`Outcome::NextHopNotActive`]) that is physically
///    reachable ([`Outcome::NextHopUnreachable`]).
pub fn decide(topology: &Topology, current: &Device, destination: &Device) -> Decision {
    let segment = physical_path(topology, current.id(), destination.id());

    let same_segment = match (current.ip(), current.mask(), destination.ip()) {
        (Some(ip), Some(mask), Some(destination)) => {
            Addr::same_subnet(ip, destination, mask).then_some(destination)
        }
        _ => None,
    };
    if let Some(destination) = same_segment {
        return match segment {
            Some(leg) => Decision::Deliver(leg),
            None => Decision::Drop(Outcome::LogicalNeighborUnreachable { destination }),
        };
    }

    if current.kind() == DeviceKind::Router
        && let Some(leg) = segment
    {
        return Decision::Deliver(leg);
    }

    let next_hop = match current.kind() {
        DeviceKind::Host => match current.gateway() {
            Some(gateway) => gateway,
            None => {
                return Decision::Drop(Outcome::NoDefaultGateway {
                    host: current.name().to_owned(),
                });
            }
        },
        DeviceKind::Router => match best_route(current.routes(), destination.ip()) {
            Some(entry) => entry.next_hop,
            None => {
                return Decision::Drop(Outcome::NoMatchingRoute {
                    router: current.name().to_owned(),
                    destination: destination.ip(),
                });
            }
        },
        _ => return Decision::Drop(Outcome::NoPath),
    };

    let Some(hop_device) = topology.device_by_ip(next_hop) else {
        return Decision::Drop(Outcome::NextHopNotActive { next_hop });
    };
    match physical_path(topology, current.id(), hop_device.id()) {
        Some(leg) => Decision::Forward {
            next_hop: hop_device.id(),
            leg,
        },
        None => Decision::Drop(Outcome::NextHopUnreachable { next_hop }),
    }
}

/// Longest-prefix match over the static table.
///
/// Entries are ranked by the integer value of their classful implied
/// mask (a /24 mask is numerically larger than a /8), and ties keep
/// the earliest table entry. Since the mask is always classful-derived,
/// an operator's intended /30 ranks as its classful mask; the match
/// is deliberately only as specific as the implied mask.
fn best_route(routes: &[RouteEntry], destination: Option<Addr>) -> Option<&RouteEntry> {
    let destination = destination?;

    let mut best: Option<(&RouteEntry, u32)> = None;
    for entry in routes {
        let mask = entry.destination.implied_mask();
        if destination.in_subnet(entry.destination, mask) {
            let rank = mask.to_u32();
            if best.is_none_or(|(_, best_rank)| rank > best_rank) {
                best = Some((entry, rank));
            }
        }
    }
    best.map(|(entry, _)| entry)
}
