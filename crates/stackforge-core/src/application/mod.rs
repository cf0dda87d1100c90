//! Application layer: use cases and the ports they drive.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use services::{ComposeService, CompositionReport, RetrofitReport, RetrofitService};
