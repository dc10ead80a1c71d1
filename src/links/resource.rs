// src/links/resource.rs
// =============================================================================
// Splits a URI into the protocol and path parts used by the JSON output.
//
//   "https://host.example/a/c.html" -> protocol "https", path "host.example/a/c.html"
// =============================================================================

use crate::error::ResourceError;

const PROTOCOL_DELIMITER: &str = "://";

/// A URI broken into protocol and path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub protocol: String,
    pub path: String,
}

impl Resource {
    // Splits at the first "://"
    //
    // Fails if there is no "://" or nothing in front of it, e.g. for
    // "c.html" or "://host.example".
    pub fn parse(uri: &str) -> Result<Self, ResourceError> {
        let (protocol, path) = uri
            .split_once(PROTOCOL_DELIMITER)
            .ok_or_else(|| ResourceError::MissingSeparator(uri.to_string()))?;

        if protocol.is_empty() {
            return Err(ResourceError::EmptyProtocol(uri.to_string()));
        }

        Ok(Resource {
            protocol: protocol.to_string(),
            path: path.to_string(),
        })
    }
}
