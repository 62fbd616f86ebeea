//! Shared wire types for the Glass Box next-token explorer.

pub mod config;
pub mod content;
pub mod converters;
pub mod enums;
pub mod logprobs;
pub mod models;
pub mod response;
