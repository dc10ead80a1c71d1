// src/service/search.rs
// =============================================================================
// This module runs a configured web search service.
//
// How a run works:
// 1. Merge the caller's parameter values with the configured defaults
// 2. Send them to the service (query string, form or JSON body)
// 3. Extract links from the response with the configured selectors
// 4. Report the outcome as a ServiceJob, which serializes to JSON
// =============================================================================

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, Result};
use log::{info, warn};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use super::config::{ParameterConfig, RequestMethod, ServiceConfig};
use crate::error::ServiceError;
use crate::links::get_matching_links_as_json;

/// Outcome of a service run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// The request could not be built, sent, or got an error response
    FailedToStart,
    /// The service answered but no results could be extracted
    Failed,
    Succeeded,
}

/// The record of one service run
#[derive(Debug, Clone, Serialize)]
pub struct ServiceJob {
    pub name: String,
    pub service: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServiceJob {
    fn new(service: &str) -> Self {
        ServiceJob {
            name: format!("{} job", service),
            service: service.to_string(),
            status: JobStatus::FailedToStart,
            results: None,
            message: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Succeeded
    }
}

/// A search page we can query and harvest links from
#[derive(Debug, Clone)]
pub struct WebSearchService {
    config: ServiceConfig,
}

impl WebSearchService {
    pub fn new(config: ServiceConfig) -> Self {
        WebSearchService { config }
    }

    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        ServiceConfig::from_file(path).map(Self::new)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn description(&self) -> Option<&str> {
        self.config.description.as_deref()
    }

    pub fn info_uri(&self) -> Option<&str> {
        self.config.info_uri.as_deref()
    }

    pub fn parameters(&self) -> &[ParameterConfig] {
        &self.config.parameters
    }

    // Works out the parameter values to send
    //
    // Configured parameters are taken in config order, using the supplied
    // value or else the default. Parameters with neither are left out, and
    // supplied names the service doesn't know are ignored with a warning.
    pub fn resolve_parameters(&self, supplied: &HashMap<String, String>) -> Vec<(String, String)> {
        for name in supplied.keys() {
            if !self.config.parameters.iter().any(|p| &p.name == name) {
                warn!("Ignoring unknown parameter '{}' for {}", name, self.name());
            }
        }

        self.config
            .parameters
            .iter()
            .filter_map(|param| {
                supplied
                    .get(&param.name)
                    .or(param.default.as_ref())
                    .map(|value| (param.name.clone(), value.clone()))
            })
            .collect()
    }

    // Builds the HTTP request carrying the parameters
    pub fn build_request(&self, client: &Client, params: &[(String, String)]) -> Result<RequestBuilder> {
        let mut url = Url::parse(&self.config.uri)
            .map_err(|e| anyhow!("Invalid URL '{}': {}", self.config.uri, e))?;

        let request = match self.config.method {
            RequestMethod::Get => {
                if !params.is_empty() {
                    url.query_pairs_mut().extend_pairs(params);
                }
                client.get(url)
            }
            RequestMethod::Post => client.post(url).form(params),
            RequestMethod::Body => {
                let body: Map<String, Value> = params
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                    .collect();
                client.post(url).json(&body)
            }
        };

        Ok(request)
    }

    // Extracts the JSON results from a response body
    //
    // Returns: None for an empty body or an unusable selector
    pub fn results_from_html(&self, html: &str) -> Option<Value> {
        if html.is_empty() {
            return None;
        }

        get_matching_links_as_json(
            html,
            &self.config.operation.link_selector,
            &self.config.operation.title_selector,
            Some(self.config.base_uri()),
        )
    }

    // Runs the service once
    //
    // Parameters:
    //   client: reqwest HTTP client
    //   supplied: parameter values given by the caller
    //
    // Returns: a ServiceJob, never an error; failures are in its status
    pub async fn run(&self, client: &Client, supplied: &HashMap<String, String>) -> ServiceJob {
        let mut job = ServiceJob::new(self.name());
        let params = self.resolve_parameters(supplied);

        let html = match self.call(client, &params).await {
            Ok(html) => html,
            Err(e) => {
                warn!("{} failed to start: {}", self.name(), e);
                job.message = Some(e.to_string());
                return job;
            }
        };

        match self.results_from_html(&html) {
            Some(results) => {
                let count = results.as_array().map_or(0, Vec::len);
                info!("{} returned {} link(s)", self.name(), count);
                job.results = Some(results);
                job.status = JobStatus::Succeeded;
            }
            None => {
                job.status = JobStatus::Failed;
                job.message = Some("No results could be extracted".to_string());
            }
        }

        job
    }

    async fn call(&self, client: &Client, params: &[(String, String)]) -> Result<String> {
        let response = self.build_request(client, params)?.send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP {}", response.status()));
        }

        Ok(response.text().await?)
    }
}
