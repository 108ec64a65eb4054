//! # GameLink Domain
//!
//! Wire types and models shared by every GameLink API consumer.
//!
//! This crate contains:
//! - The response envelope and its validation
//! - The typed API error and its classification
//! - Pagination request/response shapes
//! - Client configuration structures and business error codes
//!
//! ## Architecture
//! - No dependencies on other GameLink crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
