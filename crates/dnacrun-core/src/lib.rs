//! dnacrun Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Runtime specifics
//!
//! All types here represent the controller-side entities this client
//! observes: devices, commands, task progress, and result artifacts.

pub mod artifact;
pub mod command;
pub mod device;
pub mod error;
pub mod ids;
pub mod progress;

// Re-export commonly used types
pub use artifact::{CommandOutcome, CommandResponses, ResolveError, ResolvePolicy, ResultArtifact};
pub use command::{CommandRequest, CommandVocabulary};
pub use device::Device;
pub use error::CoreError;
pub use ids::{DeviceId, FileId, TaskId};
pub use progress::TaskProgress;
