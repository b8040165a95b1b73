//! Mock collaborators and fixtures for testing.
//!
//! These are real implementations of the external-service traits with
//! controllable behavior: configurable results, injected failures, and
//! recorded calls for assertions.

pub mod fixtures;
mod mock_generator;
mod mock_media;
mod mock_publisher;

pub use mock_generator::MockDraftGenerator;
pub use mock_media::{MockMediaGenerator, MockObjectStore};
pub use mock_publisher::MockPublishBridge;
