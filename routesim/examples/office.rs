use anyhow::Result;
use clap::Parser;
use routesim::{BatchEvent, BatchStart, DeviceKind, SimContext, Topology};
use std::{sync::Arc, time::Duration};

/// Run a traffic batch over a small two-subnet office network and
/// print every flight's fate.
#[derive(Parser)]
struct Command {
    /// Seed for the random peer selection.
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Simulated milliseconds per pump step.
    #[arg(long, default_value = "100")]
    step: u64,
}

fn main() -> Result<()> {
    let cmd = Command::parse();

    let mut builder = Topology::builder();

    let r1 = builder
        .new_device(DeviceKind::Router)
        .set_name("edge-1")
        .set_ip("192.168.1.1".parse()?)
        .set_mask("255.255.255.0".parse()?)
        .route("10.0.0.0".parse()?, "10.0.0.1".parse()?)
        .register();
    let r2 = builder
        .new_device(DeviceKind::Router)
        .set_name("edge-2")
        .set_ip("10.0.0.1".parse()?)
        .set_mask("255.0.0.0".parse()?)
        .route("192.168.1.0".parse()?, "192.168.1.1".parse()?)
        .register();
    let floor = builder.new_device(DeviceKind::Switch).set_name("floor").register();
    let lab = builder.new_device(DeviceKind::Switch).set_name("lab").register();

    let mut hosts = Vec::new();
    for i in 0..3 {
        let host = builder
            .new_device(DeviceKind::Host)
            .set_name(format!("pc-{i}"))
            .set_ip(format!("192.168.1.{}", 10 + i).parse()?)
            .set_mask("255.255.255.0".parse()?)
            .set_gateway("192.168.1.1".parse()?)
            .register();
        builder.connect(host, floor)?;
        hosts.push(host);
    }
    for i in 0..2 {
        let host = builder
            .new_device(DeviceKind::Host)
            .set_name(format!("srv-{i}"))
            .set_ip(format!("10.0.0.{}", 10 + i).parse()?)
            .set_mask("255.0.0.0".parse()?)
            .set_gateway("10.0.0.1".parse()?)
            .register();
        builder.connect(host, lab)?;
        hosts.push(host);
    }
    builder.connect(r1, floor)?;
    builder.connect(r2, lab)?;
    builder.connect(r1, r2)?;

    let topology = Arc::new(builder.build());

    let mut context = SimContext::new();
    context.set_seed(cmd.seed);

    let start = context.start_batch(topology.clone())?;
    match start {
        BatchStart::Empty(summary) => {
            println!("nothing to simulate: {summary:?}");
            return Ok(());
        }
        BatchStart::Scheduled { flights } => {
            println!("scheduled {flights} flights");
        }
    }

    let step = Duration::from_millis(cmd.step);
    let name = |id| {
        topology
            .device(id)
            .map(|device| device.name().to_string())
            .unwrap_or_else(|| id.to_string())
    };

    while context.is_outstanding() {
        context.advance_with(step, |event| match event {
            BatchEvent::Resolved { source, report } => {
                let verdict = if report.success() { "ok" } else { "FAIL" };
                println!(
                    "{:<4} from {}: {} ({} hops)",
                    verdict,
                    name(source),
                    report.outcome,
                    report.hops,
                );
            }
            BatchEvent::GatewayMissing { source, gateway } => {
                println!(
                    "FAIL from {}: gateway {gateway} is not a device",
                    name(source)
                );
            }
            BatchEvent::Completed(summary) => {
                println!(
                    "batch complete: {}/{} delivered, {} dropped ({:?})",
                    summary.succeeded,
                    summary.scheduled,
                    summary.failed,
                    summary.verdict(),
                );
            }
        });
    }

    Ok(())
}
