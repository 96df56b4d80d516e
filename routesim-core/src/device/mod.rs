mod id;

pub use self::id::DeviceId;
use crate::{addr::Addr, routing::RouteEntry};
use core::fmt;

/// The role a device plays in the simulated network.
///
/// For routing purposes every end device (PC, laptop, server, printer)
/// behaves identically, so they all map to [`DeviceKind::Host`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// End device: sources and sinks traffic, forwards via its default
    /// gateway when the destination is off-segment.
    Host,
    /// Forwards between segments using its static routing table.
    Router,
    Switch,
    AccessPoint,
    /// A cloud/WAN node; behaves like any other transparent segment hop.
    Cloud,
}

impl DeviceKind {
    /// Transparently-forwarding (L2) kinds: they pass physical-layer
    /// traffic along without participating in IP decisions.
    pub const fn is_transparent(self) -> bool {
        matches!(self, Self::Switch | Self::AccessPoint | Self::Cloud)
    }

    /// L3 kinds: the ones that make IP forwarding decisions.
    pub const fn is_forwarding(self) -> bool {
        matches!(self, Self::Host | Self::Router)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Host => "host".fmt(f),
            Self::Router => "router".fmt(f),
            Self::Switch => "switch".fmt(f),
            Self::AccessPoint => "access-point".fmt(f),
            Self::Cloud => "cloud".fmt(f),
        }
    }
}

/// A device in the topology, with its user-supplied L3 configuration.
///
/// You never construct a `Device` directly: use
/// [`TopologyBuilder::new_device`] to get a [`DeviceBuilder`], configure
/// it, and register it for its [`DeviceId`].
///
/// An absent `ip`/`mask` means the device is unconfigured and therefore
/// unreachable at L3; the engine treats that as a normal (failing)
/// simulation input, not an error. `gateway` is meaningful only for
/// hosts, `routes` only for routers. Routing-table entries are
/// user-supplied and may overlap or contradict each other; the
/// routing engine picks deterministically among them.
///
/// [`TopologyBuilder::new_device`]: crate::topology::TopologyBuilder::new_device
/// [`DeviceBuilder`]: crate::topology::DeviceBuilder
#[derive(Debug, Clone)]
pub struct Device {
    id: DeviceId,
    name: String,
    kind: DeviceKind,
    ip: Option<Addr>,
    mask: Option<Addr>,
    gateway: Option<Addr>,
    routes: Vec<RouteEntry>,
}

impl Device {
    pub(crate) fn new(id: DeviceId, kind: DeviceKind) -> Self {
        Self {
            id,
            name: format!("{kind}-{id}"),
            kind,
            ip: None,
            mask: None,
            gateway: None,
            routes: Vec::new(),
        }
    }

    /// Returns the unique identifier of this device.
    #[inline]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// The display name. Defaults to `<kind>-<id>` when not set.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn ip(&self) -> Option<Addr> {
        self.ip
    }

    pub fn mask(&self) -> Option<Addr> {
        self.mask
    }

    /// The default gateway, meaningful only for [`DeviceKind::Host`].
    pub fn gateway(&self) -> Option<Addr> {
        self.gateway
    }

    /// The static routing table, meaningful only for
    /// [`DeviceKind::Router`]. Order is the user's entry order.
    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_ip(&mut self, ip: Addr) {
        self.ip = Some(ip);
    }

    pub(crate) fn set_mask(&mut self, mask: Addr) {
        self.mask = Some(mask);
    }

    pub(crate) fn set_gateway(&mut self, gateway: Addr) {
        self.gateway = Some(gateway);
    }

    pub(crate) fn push_route(&mut self, entry: RouteEntry) {
        self.routes.push(entry);
    }
}
