//! `landacq-client`: HTTP access to the land-acquisition backend.
//!
//! Every request goes through [`BackendClient`], which owns the single place
//! where the bearer token is attached.

pub mod client;
pub mod config;
pub mod error;
pub mod source;

pub use client::BackendClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use source::UnreadCountSource;
