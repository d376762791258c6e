//! Tidewash: Tabular Data Cleaning Library
//!
//! A library for turning raw tabular data into a model-ready table by
//! type normalization, deduplication, imputation, outlier suppression,
//! standardization, categorical encoding and optional quantile binning.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
