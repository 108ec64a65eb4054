//! Domain types and models
//!
//! Everything that crosses the wire between the GameLink backend and its
//! clients: the response envelope, the typed API error, and pagination.

pub mod api_error;
pub mod envelope;
pub mod pagination;

pub use api_error::{ApiError, ErrorCategory};
pub use envelope::Envelope;
pub use pagination::{PageQuery, PageResult, SortOrder};
