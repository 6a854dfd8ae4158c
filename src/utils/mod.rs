pub mod time;

pub use time::time_in_minutes;
