use chrono::{NaiveTime, Timelike};

mod event;
mod guest;
mod status;
mod task;
mod user;

pub use event::{Event, EventUpdate, NewEvent};
pub use guest::{Guest, GuestTally, GuestUpdate, NewGuest};
pub use status::{GuestStatus, TaskStatus};
pub use task::{NewTask, Task, TaskUpdate};
pub use user::User;

/// Storage and display format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage and display format for times of day. Event times have minute
/// precision.
pub const TIME_FORMAT: &str = "%H:%M";

/// Drop seconds and fractions of a second.
pub(crate) fn to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}
