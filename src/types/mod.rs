pub mod calendar;
pub mod hourly_record;
pub mod season;
