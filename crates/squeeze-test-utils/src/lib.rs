//! Shared test utilities for the reposqueeze workspace.
//!
//! This crate provides standardised test fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`git`]: real git repositories with history, built through `git2`
//! - [`archive`]: [`ZipBuilder`](archive::ZipBuilder) for hosting-style repository archives

pub mod archive;
pub mod git;
