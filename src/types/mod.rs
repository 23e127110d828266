pub mod record;
pub mod station;
