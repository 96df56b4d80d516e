/// Hop ceiling for a single path simulation.
///
/// Counts L3 forwarding decisions, not physical links traversed. Once a
/// packet has been forwarded this many times the simulation stops with
/// [`Outcome::TtlExceeded`], the network-layer time-to-live safeguard
/// that keeps contradictory routing tables from looping forever.
///
/// This is a hard constant, not a configuration knob.
///
/// ```
/// # use routesim_core::defaults::*;
/// assert_eq!(MAX_HOPS, 15);
/// ```
///
/// [`Outcome::TtlExceeded`]: crate::trace::Outcome::TtlExceeded
pub const MAX_HOPS: u8 = 15;
