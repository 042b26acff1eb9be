pub mod atomize;
pub mod dispatch;
pub mod parse_date;
pub mod plan;
pub mod prefs;
pub mod shared;
pub mod task;
pub mod transfer;
