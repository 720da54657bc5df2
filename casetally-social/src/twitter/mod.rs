//! Twitter/X API integration surface.
//!
//! Submodules provide the OAuth 1.0a signer, the HTTP client wrapper, and the
//! typed request/response models for the create-post operation.
pub mod client;
pub mod oauth;
pub mod types;

pub use client::TwitterApi;
