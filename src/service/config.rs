// src/service/config.rs
// =============================================================================
// This module loads the configuration of a web search service.
//
// A service is a search page we know how to query and scrape. It's
// described in a JSON file like this:
//
//   {
//     "name": "Example search",
//     "description": "Full-text search of example.com",
//     "uri": "https://example.com/search",
//     "method": "get",
//     "operation": {
//       "link_selector": "div.result a",
//       "title_selector": "div.result h3"
//     },
//     "parameters": [
//       { "name": "q", "description": "Search terms" },
//       { "name": "page", "default": "1" }
//     ]
//   }
//
// `base_uri` may be given when result links should resolve against
// something other than `uri`.
// =============================================================================

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ServiceError;

/// How parameters are sent to the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMethod {
    /// Query string on a GET request
    #[default]
    Get,
    /// Form-encoded POST body
    Post,
    /// JSON object as the POST body
    Body,
}

/// The selectors used to scrape the service's result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationConfig {
    pub link_selector: String,
    /// Required in the file, but link titles come from the `title` attribute
    pub title_selector: String,
}

/// A parameter the service accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_uri: Option<String>,
    /// Endpoint the request is sent to
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    #[serde(default)]
    pub method: RequestMethod,
    pub operation: OperationConfig,
    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,
}

impl ServiceConfig {
    // Parses and validates a config from JSON text
    pub fn from_json(text: &str) -> Result<Self, ServiceError> {
        let config: ServiceConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    // Reads, parses and validates a config file
    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        let text = fs::read_to_string(path).map_err(|source| ServiceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// URI that relative result links resolve against
    pub fn base_uri(&self) -> &str {
        self.base_uri.as_deref().unwrap_or(&self.uri)
    }

    fn validate(&self) -> Result<(), ServiceError> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::MissingValue("name"));
        }
        if self.operation.link_selector.trim().is_empty() {
            return Err(ServiceError::MissingValue("link_selector"));
        }
        Url::parse(&self.uri).map_err(|e| ServiceError::InvalidUri {
            uri: self.uri.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "name": "Example search",
        "uri": "https://example.com/search",
        "operation": { "link_selector": "div.result a", "title_selector": "h3" },
        "parameters": [ { "name": "q" }, { "name": "page", "default": "1" } ]
    }"#;

    #[test]
    fn test_parse_config() {
        let config = ServiceConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.name, "Example search");
        assert_eq!(config.method, RequestMethod::Get);
        assert_eq!(config.operation.link_selector, "div.result a");
        assert_eq!(config.parameters[1].default.as_deref(), Some("1"));
        assert_eq!(config.base_uri(), "https://example.com/search");
    }

    #[test]
    fn test_explicit_base_uri_and_method() {
        let text = r#"{
            "name": "Posted",
            "uri": "https://example.com/api/search",
            "base_uri": "https://example.com/",
            "method": "body",
            "operation": { "link_selector": "a", "title_selector": "" }
        }"#;
        let config = ServiceConfig::from_json(text).unwrap();
        assert_eq!(config.method, RequestMethod::Body);
        assert_eq!(config.base_uri(), "https://example.com/");
        assert!(config.parameters.is_empty());
    }

    #[test]
    fn test_missing_title_selector_is_rejected() {
        let text = r#"{
            "name": "Broken",
            "uri": "https://example.com/",
            "operation": { "link_selector": "a" }
        }"#;
        assert!(matches!(ServiceConfig::from_json(text), Err(ServiceError::Json(_))));
    }

    #[test]
    fn test_empty_link_selector_is_rejected() {
        let text = r#"{
            "name": "Broken",
            "uri": "https://example.com/",
            "operation": { "link_selector": " ", "title_selector": "h3" }
        }"#;
        assert!(matches!(
            ServiceConfig::from_json(text),
            Err(ServiceError::MissingValue("link_selector"))
        ));
    }

    #[test]
    fn test_relative_uri_is_rejected() {
        let text = r#"{
            "name": "Broken",
            "uri": "/search",
            "operation": { "link_selector": "a", "title_selector": "h3" }
        }"#;
        assert!(matches!(
            ServiceConfig::from_json(text),
            Err(ServiceError::InvalidUri { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = ServiceConfig::from_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ServiceError::Io { .. })));
    }
}
