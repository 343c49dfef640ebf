//! Domain models
//!
//! Job requests coming from a caller and the results handed back to it.

pub mod job;
pub mod tool_result;

pub use job::*;
pub use tool_result::*;
