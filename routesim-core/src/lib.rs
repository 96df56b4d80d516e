/*!
# routesim-core

The routing simulation engine behind the network diagram: given an
immutable [`Topology`] snapshot (devices, their user-entered IPv4
configuration, and the physical cabling), answer *"what happens if a
packet is sent from A to B?"*: which physical path it takes, and why it
succeeds or fails.

The engine is a pure function of its inputs. It renders nothing, stores
nothing and never mutates device configuration; the diagram editor owns
the live object graph and hands the engine a read-only snapshot per
simulation request. Dropped packets are first-class [`Outcome`] values,
not errors; they are the signal this system exists to measure.

## Example

```
use routesim_core::{DeviceKind, Outcome, Topology, trace};

let mut builder = Topology::builder();
let pc = builder
    .new_device(DeviceKind::Host)
    .set_ip("192.168.1.10".parse().unwrap())
    .set_mask("255.255.255.0".parse().unwrap())
    .register();
let switch = builder.new_device(DeviceKind::Switch).register();
let server = builder
    .new_device(DeviceKind::Host)
    .set_ip("192.168.1.100".parse().unwrap())
    .set_mask("255.255.255.0".parse().unwrap())
    .register();
builder.connect(pc, switch).unwrap();
builder.connect(switch, server).unwrap();
let topology = builder.build();

let report = trace(&topology, pc, server).unwrap();
assert!(report.success());
assert_eq!(report.outcome, Outcome::DeliveredViaLocalSegment);
assert_eq!(report.path.devices(), &[pc, switch, server]);
```
*/

pub mod addr;
pub mod defaults;
pub mod device;
pub mod link;
pub mod reachability;
pub mod routing;
pub mod topology;
pub mod trace;

pub use self::{
    addr::Addr,
    device::{Device, DeviceId, DeviceKind},
    link::LinkId,
    reachability::{Path, physical_path},
    routing::{Decision, RouteEntry, decide},
    topology::{DeviceBuilder, Topology, TopologyBuilder, TopologyError},
    trace::{Outcome, TraceError, TraceReport, trace},
};
