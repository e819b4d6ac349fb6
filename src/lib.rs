//! g2migrate - migrate a Gallery2 photo database into a remote
//! photo-hosting service
//!
//! The pipeline is strictly sequential and flows one way: record store
//! adapter → entity model → hierarchy/aggregation builder → upload
//! orchestrator → remote service.

pub mod config;
pub mod entities;
pub mod error;
pub mod gallery;
pub mod remote;
pub mod retry;
pub mod store;
pub mod uploader;

pub use crate::error::{Error, Result};
