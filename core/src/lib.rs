//! churnboard-core: synthetic merchant churn-risk data for the dashboard.
//!
//! `generator` builds the dataset from a caller-owned `GenRng`;
//! `dashboard` projects it into filtered views, aggregates and rankings.

pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod model;
pub mod rng;
pub mod types;

pub use dataset::Dataset;
pub use error::{GenError, GenResult};
pub use generator::{generate, DatasetGenerator};
pub use rng::GenRng;
