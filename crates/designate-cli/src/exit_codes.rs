//! Standard exit codes for CLI operations
//!
//! Each error kind gets its own code so pipelines can branch on the failure.
//! `2` is left to clap for usage errors.

#![allow(dead_code)]

/// Success - deployment triggered or registry valid
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// GitHub error - registry could not be fetched
pub const GITHUB_ERROR: i32 = 3;

/// Entry error - a registry document is malformed
pub const ENTRY_ERROR: i32 = 4;

/// Template error - values rendering failed
pub const TEMPLATE_ERROR: i32 = 5;

/// Spinnaker error - trigger failed
pub const SPINNAKER_ERROR: i32 = 6;

/// App entry not found
pub const APP_NOT_FOUND: i32 = 7;

/// Template entry not found
pub const TEMPLATE_NOT_FOUND: i32 = 8;

/// No environment matched
pub const ENVIRONMENT_NOT_FOUND: i32 = 9;
