/*!
# Batch traffic orchestrator

Drives "simulate all traffic" runs over a [`routesim_core`] topology
snapshot: every host sends a staggered packet to its gateway and to one
random peer, each flight resolves through the trace engine, and when the
outstanding counter hits zero the batch produces exactly one
[`BatchSummary`].
*/

mod batch;
pub mod defaults;
mod sim_context;
mod time_queue;

// convenient re-export of `routesim_core` core objects
pub use routesim_core::{
    Addr, Device, DeviceId, DeviceKind, LinkId, Outcome, Path, Topology, TraceReport,
};

pub use self::{
    batch::{BatchError, BatchRun, BatchSummary, BatchVerdict},
    sim_context::{BatchEvent, BatchStart, SimContext},
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};

    /// Two offices joined by a pair of routers, pumped end to end.
    #[test]
    fn routed_batch() {
        let mut builder = Topology::builder();

        let r1 = builder
            .new_device(DeviceKind::Router)
            .set_ip("192.168.1.1".parse().unwrap())
            .route("10.0.0.0".parse().unwrap(), "10.0.0.1".parse().unwrap())
            .register();
        let r2 = builder
            .new_device(DeviceKind::Router)
            .set_ip("10.0.0.1".parse().unwrap())
            .route(
                "192.168.1.0".parse().unwrap(),
                "192.168.1.1".parse().unwrap(),
            )
            .register();
        let h1 = builder
            .new_device(DeviceKind::Host)
            .set_ip("192.168.1.10".parse().unwrap())
            .set_mask("255.255.255.0".parse().unwrap())
            .set_gateway("192.168.1.1".parse().unwrap())
            .register();
        let h2 = builder
            .new_device(DeviceKind::Host)
            .set_ip("10.0.0.10".parse().unwrap())
            .set_mask("255.0.0.0".parse().unwrap())
            .set_gateway("10.0.0.1".parse().unwrap())
            .register();
        builder.connect(h1, r1).unwrap();
        builder.connect(r1, r2).unwrap();
        builder.connect(r2, h2).unwrap();
        let topology = Arc::new(builder.build());

        let mut context = SimContext::new();
        let BatchStart::Scheduled { flights } = context.start_batch(topology).unwrap() else {
            panic!("two hosts with gateways schedule traffic")
        };
        assert_eq!(flights, 4);

        let mut summary = None;
        while summary.is_none() {
            context.advance_with(Duration::from_millis(200), |event| {
                if let BatchEvent::Completed(s) = event {
                    summary = Some(s);
                }
            });
        }

        let summary = summary.unwrap();
        assert_eq!(summary.scheduled, 4);
        assert_eq!(summary.succeeded, 4);
        assert_eq!(summary.verdict(), BatchVerdict::FullSuccess);
    }
}
