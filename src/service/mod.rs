// src/service/mod.rs
// =============================================================================
// This module wraps link extraction up as a "web search service": a search
// page described by a JSON config that can be queried with parameters and
// returns the harvested links as JSON.
//
// Submodules:
// - config: The JSON configuration format
// - search: Sending the query and turning the response into a job result
// =============================================================================

mod config;
mod search;

pub use config::{OperationConfig, ParameterConfig, RequestMethod, ServiceConfig};
pub use search::{JobStatus, ServiceJob, WebSearchService};
