//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The permission-gated location abstraction
//! - The remote forecast provider and its wire types
//! - Derived presentation views and the pipeline state machine
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod view;

pub use config::Config;
pub use error::PipelineError;
pub use location::{LocationService, Permission, StaticLocationService};
pub use model::{Coordinate, ForecastSample, ForecastSet};
pub use pipeline::{Phase, Pipeline, PipelineState};
pub use provider::{ForecastFetcher, fetcher_from_config};
