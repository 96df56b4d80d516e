use crate::device::DeviceId;
use core::fmt;

/// Identifier of the physical cable between two devices.
///
/// A link is undirected and carries no L3 state of its own; its only
/// role in the simulation is physical reachability. The identifier is
/// normalised so that for all devices `a` and `b`, `(a, b)` and
/// `(b, a)` name the same link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId {
    smaller: DeviceId,
    larger: DeviceId,
}

impl LinkId {
    pub fn new(a: DeviceId, b: DeviceId) -> Self {
        if a < b {
            Self {
                smaller: a,
                larger: b,
            }
        } else {
            Self {
                smaller: b,
                larger: a,
            }
        }
    }

    /// The two endpoints, smaller identifier first.
    #[inline]
    pub fn endpoints(self) -> (DeviceId, DeviceId) {
        (self.smaller, self.larger)
    }

    /// The endpoint that is not `device`, or `None` if `device` is not
    /// an endpoint of this link.
    pub fn other(self, device: DeviceId) -> Option<DeviceId> {
        if device == self.smaller {
            Some(self.larger)
        } else if device == self.larger {
            Some(self.smaller)
        } else {
            None
        }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<->{}", self.smaller, self.larger)
    }
}
