//! Controller client library for dnacrun.
//!
//! Provides the authenticated REST client for the controller and the
//! submit → poll → fetch → resolve pipeline that turns one command request
//! into one terminal outcome.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod runner;

pub use api::ControllerApi;
pub use config::ControllerConfig;
pub use error::ClientError;
pub use http::ApiClient;
pub use runner::{CommandRunner, PollPolicy, RunError};
