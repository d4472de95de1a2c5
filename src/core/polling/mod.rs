//! Export job status polling
//!
//! [`JobPoller`] repeats the status request on a fixed [`PollPolicy`] until
//! the job leaves `processing` or the attempt ceiling is reached.

pub mod poller;
pub mod policy;

pub use poller::{JobPoller, PollOutcome, PollState};
pub use policy::{PollPolicy, Sleeper, TokioSleeper};
