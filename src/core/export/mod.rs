//! Export orchestration
//!
//! [`ExportCoordinator`] drives submission, polling and retrieval and
//! produces an [`ExportSummary`].

pub mod coordinator;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use summary::ExportSummary;
