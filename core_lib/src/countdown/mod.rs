//! Countdown widget: renders time remaining until each target instant

pub mod clock;
pub mod remaining;
pub mod target;
pub mod widget;

pub use clock::{Clock, ManualClock, SystemClock};
pub use remaining::{remaining_millis, CountdownState, RemainingDuration};
pub use target::parse_target_instant;
pub use widget::{tick_element, CountdownWidget, TickOutcome};
