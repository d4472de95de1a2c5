//! CircleCI usage export API integration
//!
//! - [`api`] - the [`UsageApi`] trait the export pipeline depends on
//! - [`client`] - `reqwest` implementation against the v2 REST API
//! - [`models`] - request payload and response parsing

pub mod api;
pub mod client;
pub mod models;

pub use api::UsageApi;
pub use client::CircleCiClient;
pub use models::CreateJobPayload;
