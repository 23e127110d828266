pub mod error;
pub mod merge;
pub mod resample;
pub mod time_series;
