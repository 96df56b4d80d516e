use crate::{
    addr::Addr,
    device::{Device, DeviceId, DeviceKind},
    link::LinkId,
    routing::RouteEntry,
};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Error returned when a snapshot under construction is inconsistent.
///
/// These are programmer/caller defects, not simulation outcomes: a
/// cable referencing a device that was never registered can only come
/// from a bug in the diagram layer, so the builder fails fast instead
/// of handing the engine a snapshot it cannot trust.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A link endpoint does not exist in the snapshot under construction.
    #[error("Unknown device ({device}): register a device before cabling it")]
    UnknownEndpoint { device: DeviceId },
    /// Both link endpoints are the same device.
    #[error("Cannot cable device ({device}) to itself")]
    SelfLink { device: DeviceId },
}

/// Builder for configuring a device before registering it with the
/// snapshot under construction.
///
/// Obtained via [`TopologyBuilder::new_device`]. Configure the L3
/// settings with the setter methods, then call
/// [`register`](DeviceBuilder::register) to obtain the [`DeviceId`].
///
/// ## Example
///
/// ```
/// use routesim_core::{DeviceKind, TopologyBuilder};
///
/// let mut builder = TopologyBuilder::new();
///
/// let pc = builder
///     .new_device(DeviceKind::Host)
///     .set_name("pc-accounting")
///     .set_ip("192.168.1.10".parse().unwrap())
///     .set_mask("255.255.255.0".parse().unwrap())
///     .set_gateway("192.168.1.1".parse().unwrap())
///     .register();
///
/// // An unconfigured switch: no IP needed to pass traffic through.
/// let switch = builder.new_device(DeviceKind::Switch).register();
///
/// builder.connect(pc, switch).unwrap();
/// let topology = builder.build();
/// # assert_eq!(topology.neighbors(pc).len(), 1);
/// ```
pub struct DeviceBuilder<'a> {
    device: Device,

    builder: &'a mut TopologyBuilder,
}

impl DeviceBuilder<'_> {
    /// Set the display name shown in diagnostics and failure messages.
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.device.set_name(name.into());
        self
    }

    /// Set the device's IP address. Leaving it unset makes the device
    /// unreachable at L3 (still a valid physical transit hop if it is a
    /// transparent kind).
    pub fn set_ip(mut self, ip: Addr) -> Self {
        self.device.set_ip(ip);
        self
    }

    /// Set the device's subnet mask.
    pub fn set_mask(mut self, mask: Addr) -> Self {
        self.device.set_mask(mask);
        self
    }

    /// Set the default gateway. Meaningful only for hosts.
    pub fn set_gateway(mut self, gateway: Addr) -> Self {
        self.device.set_gateway(gateway);
        self
    }

    /// Append a static routing-table entry. Meaningful only for routers.
    /// Entries keep the order they were added in.
    pub fn route(mut self, destination: Addr, next_hop: Addr) -> Self {
        self.device.push_route(RouteEntry {
            destination,
            next_hop,
        });
        self
    }

    /// Finalise the configuration and register the device.
    ///
    /// Returns the [`DeviceId`] assigned to this device.
    pub fn register(self) -> DeviceId {
        let Self { device, builder } = self;

        let id = device.id();

        builder.index.insert(id, builder.devices.len());
        builder.adjacency.insert(id, Vec::new());
        builder.devices.push(device);

        id
    }
}

/// Incrementally assembles a [`Topology`] snapshot.
///
/// Device identifiers are assigned sequentially starting at `1`;
/// [`DeviceId::ZERO`] is reserved as a sentinel and never returned.
#[derive(Default)]
pub struct TopologyBuilder {
    devices: Vec<Device>,
    index: HashMap<DeviceId, usize>,
    adjacency: HashMap<DeviceId, Vec<(LinkId, DeviceId)>>,
    links: HashSet<LinkId>,

    /// the last assigned ID
    id: DeviceId,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            index: HashMap::new(),
            adjacency: HashMap::new(),
            links: HashSet::new(),
            id: DeviceId::ZERO,
        }
    }

    /// Create a new device and return a builder to configure it.
    pub fn new_device(&mut self, kind: DeviceKind) -> DeviceBuilder<'_> {
        self.id = self.id.next();
        DeviceBuilder {
            device: Device::new(self.id, kind),
            builder: self,
        }
    }

    /// Cable two registered devices together.
    ///
    /// Links are undirected; connecting `(a, b)` and then `(b, a)` is
    /// the same link and the second call is a no-op. Neighbor iteration
    /// order is the order in which links were connected, which keeps
    /// the breadth-first search over the finished snapshot
    /// deterministic.
    ///
    /// # Errors
    ///
    /// - [`TopologyError::UnknownEndpoint`]: either device was never
    ///   registered with this builder.
    /// - [`TopologyError::SelfLink`]: both endpoints are the same
    ///   device.
    pub fn connect(&mut self, a: DeviceId, b: DeviceId) -> Result<LinkId, TopologyError> {
        if a == b {
            return Err(TopologyError::SelfLink { device: a });
        }
        for endpoint in [a, b] {
            if !self.index.contains_key(&endpoint) {
                return Err(TopologyError::UnknownEndpoint { device: endpoint });
            }
        }

        let link = LinkId::new(a, b);
        if self.links.insert(link) {
            self.adjacency
                .get_mut(&a)
                .expect("endpoint presence checked above")
                .push((link, b));
            self.adjacency
                .get_mut(&b)
                .expect("endpoint presence checked above")
                .push((link, a));
        }
        Ok(link)
    }

    /// Freeze the construction into an immutable [`Topology`] snapshot.
    pub fn build(self) -> Topology {
        let Self {
            devices,
            index,
            adjacency,
            links,
            id: _,
        } = self;

        Topology {
            devices,
            index,
            adjacency,
            links,
        }
    }
}

/// An immutable, point-in-time view of the diagram's devices and
/// physical links.
///
/// This is the engine's only window onto the network: a pure input,
/// captured when a simulation is requested. The engine never mutates
/// device configuration; the diagram editor owns the live, mutable
/// object graph and produces one of these per simulation request.
///
/// Device iteration order is registration order, which makes every
/// lookup (including the permissive duplicate-IP resolution of
/// [`device_by_ip`](Topology::device_by_ip)) deterministic.
pub struct Topology {
    devices: Vec<Device>,
    index: HashMap<DeviceId, usize>,
    adjacency: HashMap<DeviceId, Vec<(LinkId, DeviceId)>>,
    links: HashSet<LinkId>,
}

impl Topology {
    /// Start building a new snapshot.
    pub fn builder() -> TopologyBuilder {
        TopologyBuilder::new()
    }

    /// Look up a device by identifier.
    pub fn device(&self, id: DeviceId) -> Option<&Device> {
        self.index.get(&id).map(|position| &self.devices[*position])
    }

    /// All devices, in registration order.
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    /// All host devices, in registration order.
    pub fn hosts(&self) -> impl Iterator<Item = &Device> {
        self.devices
            .iter()
            .filter(|device| device.kind() == DeviceKind::Host)
    }

    /// Number of devices in the snapshot.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Number of physical links in the snapshot.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// The devices directly cabled to `device`, with the connecting
    /// link, in connection order. Unknown identifiers yield an empty
    /// slice.
    pub fn neighbors(&self, device: DeviceId) -> &[(LinkId, DeviceId)] {
        self.adjacency
            .get(&device)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve an IP address to a device.
    ///
    /// Duplicate IPs across devices are a configuration error the
    /// engine does not detect or reject: the first match in
    /// registration order wins, with no diagnostic.
    pub fn device_by_ip(&self, ip: Addr) -> Option<&Device> {
        self.devices.iter().find(|device| device.ip() == Some(ip))
    }

    /// Resolve a display name to a device, first match in registration
    /// order.
    pub fn device_by_name(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Addr {
        s.parse().unwrap()
    }

    #[test]
    fn default_builder_assigns_ids_from_one() {
        let mut builder = TopologyBuilder::default();
        let first = builder.new_device(DeviceKind::Host).register();

        assert_eq!(first, DeviceId::ONE);
    }

    #[test]
    fn register_and_query() {
        let mut builder = Topology::builder();
        let pc = builder
            .new_device(DeviceKind::Host)
            .set_name("pc")
            .set_ip(addr("192.168.1.10"))
            .register();
        let switch = builder.new_device(DeviceKind::Switch).register();
        builder.connect(pc, switch).unwrap();
        let topology = builder.build();

        assert_eq!(topology.len(), 2);
        assert_eq!(topology.link_count(), 1);
        assert_eq!(topology.device(pc).unwrap().name(), "pc");
        assert_eq!(
            topology.device_by_ip(addr("192.168.1.10")).unwrap().id(),
            pc
        );
        assert_eq!(topology.device_by_name("pc").unwrap().id(), pc);
        assert_eq!(topology.neighbors(pc), &[(LinkId::new(pc, switch), switch)]);
    }

    #[test]
    fn connect_unknown_endpoint() {
        let mut builder = Topology::builder();
        let pc = builder.new_device(DeviceKind::Host).register();

        let phantom = "99".parse().unwrap();
        let Err(error) = builder.connect(pc, phantom) else {
            panic!("Expecting an error for an unregistered endpoint")
        };
        assert!(matches!(
            error,
            TopologyError::UnknownEndpoint { device } if device == phantom
        ));
    }

    #[test]
    fn connect_self_rejected() {
        let mut builder = Topology::builder();
        let pc = builder.new_device(DeviceKind::Host).register();

        assert!(matches!(
            builder.connect(pc, pc),
            Err(TopologyError::SelfLink { .. })
        ));
    }

    #[test]
    fn duplicate_connect_is_idempotent() {
        let mut builder = Topology::builder();
        let a = builder.new_device(DeviceKind::Host).register();
        let b = builder.new_device(DeviceKind::Switch).register();

        builder.connect(a, b).unwrap();
        builder.connect(b, a).unwrap();
        let topology = builder.build();

        assert_eq!(topology.link_count(), 1);
        assert_eq!(topology.neighbors(a).len(), 1);
        assert_eq!(topology.neighbors(b).len(), 1);
    }

    #[test]
    fn duplicate_ip_resolves_to_first_registered() {
        let mut builder = Topology::builder();
        let first = builder
            .new_device(DeviceKind::Host)
            .set_ip(addr("10.0.0.1"))
            .register();
        let _second = builder
            .new_device(DeviceKind::Host)
            .set_ip(addr("10.0.0.1"))
            .register();
        let topology = builder.build();

        assert_eq!(topology.device_by_ip(addr("10.0.0.1")).unwrap().id(), first);
    }

    #[test]
    fn hosts_filters_kinds() {
        let mut builder = Topology::builder();
        builder.new_device(DeviceKind::Host).register();
        builder.new_device(DeviceKind::Router).register();
        builder.new_device(DeviceKind::Switch).register();
        builder.new_device(DeviceKind::Host).register();
        let topology = builder.build();

        assert_eq!(topology.hosts().count(), 2);
    }
}
