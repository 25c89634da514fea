//! Process exit codes
//!
//! Scripts wrapping `podplate` can tell a broken variables file (2) from a
//! reference loop (3) or a missing file (5).

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - invalid variables file, config, or unresolved placeholders in strict mode
pub const VALIDATION_ERROR: i32 = 2;

/// Template error - variable references form a cycle
pub const TEMPLATE_ERROR: i32 = 3;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
