pub mod countdown;
pub mod day_interval;
pub mod day_name;
pub mod local_now;
pub mod schedule;

pub use day_interval::DayInterval;
pub use day_name::DayName;
pub use local_now::local_now;
pub use schedule::{DaySummary, WeeklySchedule};
