//! Shared types for the Corvid bytecode back end.
//!
//! - [`Span`]: source positions carried by nodes and diagnostics
//! - [`error`]: the unified error hierarchy
//! - [`DataType`]: resolved static types
//! - [`ast`]: the typed tree the compiler consumes

pub mod ast;
pub mod data_type;
pub mod error;
mod span;

pub use data_type::DataType;
pub use error::{CompilationError, CorvidError, EncodingError};
pub use span::Span;
