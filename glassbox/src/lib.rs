//! Next-token probability explorer for Gemini models.
//!
//! [`Predictor`] asks a prioritized list of models for a single next token with
//! top-5 log-probabilities. [`reweight`] redistributes those candidates for any
//! display temperature without another request.

pub mod client;
pub mod error;
pub mod models;
pub mod prediction;
pub mod predictor;
pub mod reweight;
pub mod session;

#[cfg(test)]
mod test_support;

pub use glassbox_types as types;

pub use client::{Client, ClientBuilder};
pub use error::{Error, Result};
pub use prediction::{PredictionResult, RequestParameters, TokenCandidate};
pub use predictor::{predict_next_token, Predictor};
pub use reweight::{rank, reweight, reweight_prediction, WeightedCandidate};
pub use session::Session;
