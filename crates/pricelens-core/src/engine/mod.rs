//! Query engine
//!
//! Validates a query and runs the text and range branches concurrently

pub mod pipeline;
pub mod query;
pub mod result;

pub use pipeline::QueryPipeline;
pub use query::Query;
pub use result::{QueryResult, RangeOutcome, TextAnswer};
