//! Core business logic for usage-export.
//!
//! - [`export`] - Export orchestration and summary
//! - [`polling`] - Job status polling with a fixed-delay policy
//! - [`retrieval`] - Report download, decompression and naming

pub mod export;
pub mod polling;
pub mod retrieval;

#[cfg(test)]
pub(crate) mod testing;
