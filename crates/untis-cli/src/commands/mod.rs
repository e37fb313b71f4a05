pub mod dispatch;
pub mod period;
pub mod resolve;
pub mod timetable;
pub mod whoami;
