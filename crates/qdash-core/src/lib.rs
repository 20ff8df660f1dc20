//! Core types and pure logic for the quality dashboard.
//!
//! KPI classification, CTQ health scoring and rework Pareto aggregation live
//! here, together with the [`store::QualityStore`] trait the storage backends
//! implement. This crate has no HTTP or database dependencies.

// Store implementations use native `async fn` for the trait methods.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod ctq;
pub mod error;
pub mod kpi;
pub mod pareto;
pub mod rework;
pub mod store;

pub use error::{Error, Result};
