//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (transaction type parsing, mapping resolution)
//! - `convert` - CSV to QIF conversion
//! - `mapping` - Mapping and action reference output

pub mod convert;
pub mod core;
pub mod mapping;

// Re-export command functions for main.rs
pub use self::core::*;
pub use convert::*;
pub use mapping::*;
