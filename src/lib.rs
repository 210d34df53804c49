//! valo-track - Main Library
//!
//! Stack statistics for Valorant, following Clean Architecture principles.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, runners)
//! - **valorant**: Core business logic (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust
//! use valo_track::bin_common::{parse_args, CliArgs};
//! use valo_track::valorant::application::AnalysisApp;
//! ```

// Re-export workspace library for convenience
pub use valorant;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables
    //!
    //! Provides shared functionality for the presentation layer (binaries)
    //! following Clean Architecture principles.

    pub mod cli;
    pub mod runner;

    pub use cli::{parse_args, CliArgs, CliError};
    pub use runner::RunConfig;
}
