pub mod error;
pub mod http;
pub mod remote;
pub mod telemetry;
