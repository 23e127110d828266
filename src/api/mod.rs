pub mod error;
pub(crate) mod http;
pub(crate) mod responses;
