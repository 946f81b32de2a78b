//! Core library for the scorecard-tools command line application.
//!
//! The pipeline has three batch stages that only share files on disk:
//! [`fetch`] downloads the application workbooks, [`extract`] cuts the
//! applicability block out of each workbook, and [`aggregate`] folds the
//! blocks into one wide score table. IO adapters live under [`io`], shared
//! data types in [`model`], heuristic constants in [`config`], and the
//! instrumented stage entry points in [`pipeline`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod io;
pub mod logging;
pub mod model;
pub mod pipeline;

pub use config::ScoringConfig;
pub use error::{Result, ToolError};
