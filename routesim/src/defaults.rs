use std::time::Duration;

/// Delay between consecutive hosts' scheduled traffic in a batch.
///
/// Host `i`'s gateway packet fires at `i * FLIGHT_STAGGER` on the
/// simulated clock. The staggering only exists so the playback layer
/// can animate packets without hopeless overlap; scheduled packets are
/// logically independent and order-insensitive.
///
/// ```
/// # use routesim::defaults::*;
/// # use std::time::Duration;
/// assert_eq!(FLIGHT_STAGGER, Duration::from_millis(400));
/// ```
pub const FLIGHT_STAGGER: Duration = Duration::from_millis(400);

/// Delay of a host's random-peer packet after its gateway packet.
///
/// ```
/// # use routesim::defaults::*;
/// # use std::time::Duration;
/// assert_eq!(PEER_OFFSET, Duration::from_millis(200));
/// ```
pub const PEER_OFFSET: Duration = Duration::from_millis(200);
