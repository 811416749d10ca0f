pub(crate) mod columns;
pub mod completeness;
pub mod error;
pub mod leap_day;
pub mod loader;
pub mod normalize;
pub mod schema;
pub mod season;
pub mod validate;
