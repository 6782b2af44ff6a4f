//! # showcase-api
//!
//! Blocking client for the showcase actions of a remote catalog instance.
//!
//! The orchestrator only sees the [`ActionApi`] and [`ImageDownloader`]
//! traits; [`RemoteCkan`] implements both over HTTP.

pub mod action;
pub mod error;
mod multipart;
pub mod remote;

pub use action::{actions, ActionApi, ImageDownloader};
pub use error::ApiError;
pub use remote::{ClientConfig, RemoteCkan};
