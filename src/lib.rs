// SPDX-License-Identifier: MIT

//! cvrank: résumé screening client
//!
//! Assembles résumé files and keywords into an evaluation request, submits
//! them to a remote scoring backend, and normalizes the loosely-shaped
//! response into a ranked list of candidate scores.

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod session;

pub use config::AppConfig;
pub use error::{CvRankError, Result};
