use std::time::Duration;

/// Nominal train speed in distance units per hour, used whenever a train is
/// outside the timed part of its run (approaching or having left the section)
/// and by the periodic position recompute.
pub const NOMINAL_SPEED: f64 = 60.0;

/// How often each train's position is recomputed.
pub const TICK_PERIOD: Duration = Duration::from_secs(2);

/// Hour from which a service window counts as an evening entry (trains
/// entering at or after this hour may leave the section past midnight).
pub const OVERNIGHT_ENTRY_HOUR: u32 = 20;

/// Latest hour on the following day at which an overnight service window may
/// still close.
pub const OVERNIGHT_EXIT_HOUR: u32 = 6;
