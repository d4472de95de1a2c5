//! External system integrations for usage-export.
//!
//! - [`circleci`] - CircleCI usage export REST API
//!
//! Adapters isolate third-party types behind a trait so the export pipeline
//! can be tested against mock implementations.

pub mod circleci;
