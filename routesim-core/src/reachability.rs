use crate::{device::DeviceId, link::LinkId, topology::Topology};
use std::collections::{HashMap, VecDeque};

/// A walk through the topology: the devices visited, in order, plus the
/// link traversed between each consecutive pair.
///
/// The first device is always the walk's starting point; `links` is
/// always exactly one element shorter than `devices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    devices: Vec<DeviceId>,
    links: Vec<LinkId>,
}

impl Path {
    pub(crate) fn new(start: DeviceId) -> Self {
        Self {
            devices: vec![start],
            links: Vec::new(),
        }
    }

    /// The devices visited, starting point first.
    pub fn devices(&self) -> &[DeviceId] {
        &self.devices
    }

    /// The links traversed, in traversal order.
    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    /// The device the walk starts at.
    pub fn source(&self) -> DeviceId {
        self.devices[0]
    }

    /// The device the walk currently ends at.
    pub fn last(&self) -> DeviceId {
        *self
            .devices
            .last()
            .expect("a path always holds at least its starting device")
    }

    /// Number of physical links traversed.
    pub fn physical_hops(&self) -> usize {
        self.links.len()
    }

    /// Splice a further leg onto the end of this walk.
    ///
    /// The leg's first device duplicates this walk's last device and is
    /// dropped.
    pub(crate) fn extend(&mut self, leg: Path) {
        debug_assert_eq!(leg.source(), self.last());

        self.devices.extend(leg.devices.into_iter().skip(1));
        self.links.extend(leg.links);
    }
}

/// Is there a cable path from `start` to `end`, and through which
/// devices and links?
///
/// Breadth-first search over the physical links. A neighbor is explored
/// only if it is the target device or a transparently-forwarding kind
/// (switch, access point, cloud). Hosts and routers are L3 boundaries,
/// never transit points, though the destination itself is a valid
/// terminal hop regardless of its kind.
///
/// The returned path has the fewest physical hops; ties go to the
/// first-discovered neighbor, which is deterministic because neighbor
/// iteration follows link connection order. Returns `None` when the
/// segments are disconnected.
pub fn physical_path(topology: &Topology, start: DeviceId, end: DeviceId) -> Option<Path> {
    let mut queue = VecDeque::from([start]);
    // also serves as the visited set: a device is present once discovered
    let mut came_from: HashMap<DeviceId, (LinkId, DeviceId)> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if current == end {
            return Some(reconstruct(start, end, &came_from));
        }
        for &(link, neighbor) in topology.neighbors(current) {
            if neighbor == start || came_from.contains_key(&neighbor) {
                continue;
            }
            let kind = topology
                .device(neighbor)
                .expect("adjacency only references registered devices")
                .kind();
            if neighbor == end || kind.is_transparent() {
                came_from.insert(neighbor, (link, current));
                queue.push_back(neighbor);
            }
        }
    }

    None
}

fn reconstruct(
    start: DeviceId,
    end: DeviceId,
    came_from: &HashMap<DeviceId, (LinkId, DeviceId)>,
) -> Path {
    let mut devices = vec![end];
    let mut links = Vec::new();

    let mut current = end;
    while current != start {
        let (link, previous) = came_from[&current];
        links.push(link);
        devices.push(previous);
        current = previous;
    }

    devices.reverse();
    links.reverse();
    Path { devices, links }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        device::DeviceKind,
        topology::{Topology, TopologyBuilder},
    };

    fn chain(kinds: &[DeviceKind]) -> (Topology, Vec<DeviceId>) {
        let mut builder = TopologyBuilder::new();
        let ids: Vec<_> = kinds
            .iter()
            .map(|kind| builder.new_device(*kind).register())
            .collect();
        for pair in ids.windows(2) {
            builder.connect(pair[0], pair[1]).unwrap();
        }
        (builder.build(), ids)
    }

    #[test]
    fn start_is_its_own_path() {
        let (topology, ids) = chain(&[DeviceKind::Host]);
        let path = physical_path(&topology, ids[0], ids[0]).unwrap();

        assert_eq!(path.devices(), &[ids[0]]);
        assert!(path.links().is_empty());
        assert_eq!(path.physical_hops(), 0);
    }

    #[test]
    fn reaches_through_transparent_devices() {
        use DeviceKind::*;
        let (topology, ids) = chain(&[Host, Switch, AccessPoint, Cloud, Host]);

        let path = physical_path(&topology, ids[0], ids[4]).unwrap();
        assert_eq!(path.devices(), ids.as_slice());
        assert_eq!(path.physical_hops(), 4);
    }

    #[test]
    fn never_transits_through_a_router() {
        use DeviceKind::*;
        // HostA -- RouterX -- HostB, cabled directly: the router is an
        // L3 boundary, so there is no physical path end to end.
        let (topology, ids) = chain(&[Host, Router, Host]);

        assert!(physical_path(&topology, ids[0], ids[2]).is_none());
        // the router itself is still reachable as the target
        assert!(physical_path(&topology, ids[0], ids[1]).is_some());
    }

    #[test]
    fn never_transits_through_a_host() {
        use DeviceKind::*;
        let (topology, ids) = chain(&[Host, Host, Host]);

        assert!(physical_path(&topology, ids[0], ids[2]).is_none());
    }

    #[test]
    fn disconnected_segments() {
        let mut builder = TopologyBuilder::new();
        let a = builder.new_device(DeviceKind::Host).register();
        let b = builder.new_device(DeviceKind::Host).register();
        let topology = builder.build();

        assert!(physical_path(&topology, a, b).is_none());
    }

    #[test]
    fn shortest_path_wins() {
        use DeviceKind::*;
        // a -- s1 -- b  and the long way  a -- s2 -- s3 -- b
        let mut builder = TopologyBuilder::new();
        let a = builder.new_device(Host).register();
        let b = builder.new_device(Host).register();
        let s1 = builder.new_device(Switch).register();
        let s2 = builder.new_device(Switch).register();
        let s3 = builder.new_device(Switch).register();
        builder.connect(a, s2).unwrap();
        builder.connect(s2, s3).unwrap();
        builder.connect(s3, b).unwrap();
        builder.connect(a, s1).unwrap();
        builder.connect(s1, b).unwrap();
        let topology = builder.build();

        let path = physical_path(&topology, a, b).unwrap();
        assert_eq!(path.devices(), &[a, s1, b]);
        assert_eq!(path.physical_hops(), 2);
    }

    #[test]
    fn tie_break_follows_connection_order() {
        use DeviceKind::*;
        // two equal-length routes; the first-connected wins
        let mut builder = TopologyBuilder::new();
        let a = builder.new_device(Host).register();
        let b = builder.new_device(Host).register();
        let s1 = builder.new_device(Switch).register();
        let s2 = builder.new_device(Switch).register();
        builder.connect(a, s1).unwrap();
        builder.connect(a, s2).unwrap();
        builder.connect(s1, b).unwrap();
        builder.connect(s2, b).unwrap();
        let topology = builder.build();

        let path = physical_path(&topology, a, b).unwrap();
        assert_eq!(path.devices(), &[a, s1, b]);
    }

    #[test]
    fn extend_splices_legs() {
        let (topology, ids) = chain(&[DeviceKind::Host, DeviceKind::Switch, DeviceKind::Router]);

        let mut path = Path::new(ids[0]);
        let leg = physical_path(&topology, ids[0], ids[2]).unwrap();
        path.extend(leg);

        assert_eq!(path.devices(), ids.as_slice());
        assert_eq!(path.physical_hops(), 2);
    }
}
