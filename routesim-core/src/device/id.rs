use anyhow::anyhow;
use std::{fmt, str};

/// Stable identity of a device within a [`Topology`] snapshot.
///
/// Identifiers are assigned sequentially by the [`TopologyBuilder`],
/// starting at `1`. They are opaque handles into the snapshot's flat
/// device table; the engine never relies on live object identity.
///
/// [`Topology`]: crate::topology::Topology
/// [`TopologyBuilder`]: crate::topology::TopologyBuilder
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DeviceId(u64);

impl DeviceId {
    /// Reserved sentinel, never assigned to a device.
    pub const ZERO: Self = DeviceId::new(0);
    pub const ONE: Self = DeviceId::new(1);

    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use = "function does not modify the current value"]
    pub(crate) fn next(self) -> Self {
        Self::new(self.0 + 1)
    }
}

impl str::FromStr for DeviceId {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self).map_err(|error| anyhow!("{error}"))
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
