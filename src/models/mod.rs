pub mod category;
pub mod daily_log;
pub mod news;
pub mod user;
