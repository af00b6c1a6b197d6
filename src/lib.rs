//! Bearer-token authentication gate for an axum API.
//!
//! Every `/api/v1` request passes through [`services::auth::AuthGate`]: the bearer token is
//! verified, the member is loaded, and the member status decides between establishing an
//! [`api::v1::extractors::AuthCtx`], rejecting with 403, or continuing anonymously.

pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
