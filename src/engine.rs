//! Ties resolution, validation and synthesis together: one request in, one
//! response out, with RFC 7807 problems for everything that cannot be
//! served from the document.

use crate::faker::{FakerError, FakerOptions, ResponseFaker};
use crate::loader::SchemaProvider;
use crate::problem::{self, Problem, SUCCESS_CHAIN};
use crate::validator::{RequestValidator, ResponseValidator, ValidationOutcome};
use serde_json::Value;
use std::collections::HashMap;

/// Disables validation for this exchange when set to `false` or `0`.
pub const HEADER_MOCK_ACTIVE: &str = "x-mock-active";
/// Pins the synthesized response to one documented status code.
pub const HEADER_MOCK_STATUS_CODE: &str = "x-mock-status-code";
/// Selects a named example from the documented response.
pub const HEADER_MOCK_EXAMPLE: &str = "x-mock-example";

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// A decoded request body. Malformed JSON is kept as a decode failure so
/// validation can report it instead of the transport erroring out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    Json(Value),
    Malformed(String),
}

/// Transport-independent view of an incoming request. Header names are
/// stored lowercased.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestPayload>,
}

impl MockRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_string(),
            path: path.to_string(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_body(self, body: Value) -> Self {
        self.with_payload(RequestPayload::Json(body))
    }

    pub fn with_payload(mut self, payload: RequestPayload) -> Self {
        self.body = Some(payload);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Content type with parameters stripped, defaulting to JSON.
    pub fn content_type(&self) -> &str {
        self.header("content-type")
            .map(|value| value.split(';').next().unwrap_or(value).trim())
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Whether validation applies to this exchange. Opt-out only.
    pub fn is_active(&self) -> bool {
        !matches!(self.header(HEADER_MOCK_ACTIVE), Some("false") | Some("0"))
    }
}

/// What the engine hands back to the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub validate_request: bool,
    pub validate_response: bool,
    pub faker: FakerOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validate_request: true,
            validate_response: true,
            faker: FakerOptions::default(),
        }
    }
}

/// The mock engine. Cheap to clone; the document is shared.
#[derive(Debug, Clone)]
pub struct Engine {
    provider: SchemaProvider,
    config: EngineConfig,
    faker: ResponseFaker,
}

impl Engine {
    pub fn new(provider: SchemaProvider, config: EngineConfig) -> Self {
        let faker = ResponseFaker::new(config.faker.clone());
        Self {
            provider,
            config,
            faker,
        }
    }

    pub fn provider(&self) -> &SchemaProvider {
        &self.provider
    }

    /// Process one request. Total: every failure becomes a problem body.
    pub fn process(&self, request: &MockRequest) -> MockResponse {
        let spec = self.provider.spec();
        let validate = self.config.validate_request && request.is_active();

        let (address, outcome) = RequestValidator::new(spec).parse(request, validate);

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            valid = outcome.is_valid(),
            "resolved request"
        );

        let content_type = request.content_type();
        let example_name = request.header(HEADER_MOCK_EXAMPLE);

        if outcome.is_valid() {
            let pinned = request.header(HEADER_MOCK_STATUS_CODE);
            let candidates: &[&str] = match &pinned {
                Some(status) => std::slice::from_ref(status),
                None => SUCCESS_CHAIN,
            };
            let synthesized = match self
                .faker
                .mock(spec, &address, candidates, content_type, example_name)
            {
                Ok(response) => response,
                Err(miss) => {
                    return self.problem_response(request, Problem::unexpected(miss.to_string()));
                }
            };

            // A schema-valid request producing a schema-invalid mock is a
            // generation bug; no fallback search applies.
            if self.config.validate_response
                && request.is_active()
                && let Err(failure) =
                    ResponseValidator::new(spec).parse(&synthesized, &address, true)
            {
                tracing::warn!(detail = %failure.detail(), "synthesized response violates its schema");
                return self.problem_response(request, Problem::violations(&failure));
            }

            synthesized
        } else {
            // A documented error body is returned verbatim when the chain
            // finds one; otherwise the original outcome decides the problem.
            match self.rescue(&outcome, &address, content_type) {
                Some(response) => response,
                None => self.problem_response(request, Problem::from_outcome(&outcome)),
            }
        }
    }

    /// Try the outcome's fallback chain of documented status codes before
    /// falling back to a problem body. Named-example selection never applies
    /// here; the chain serves whatever error body the document provides.
    fn rescue(
        &self,
        outcome: &ValidationOutcome,
        address: &crate::routing::OperationAddress,
        content_type: &str,
    ) -> Option<MockResponse> {
        let chain = problem::fallback_chain(outcome)?;
        match self
            .faker
            .mock(self.provider.spec(), address, chain, content_type, None)
        {
            Ok(response) => Some(response),
            Err(FakerError::NoCandidates) => None,
            Err(miss) => {
                tracing::debug!(miss = %miss, "fallback chain exhausted");
                None
            }
        }
    }

    fn problem_response(&self, request: &MockRequest, problem: Problem) -> MockResponse {
        // An explicit Content-Type on the request wins over the problem
        // media type, matching what callers expect to parse.
        let content_type = request
            .header("content-type")
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .unwrap_or_else(|| PROBLEM_CONTENT_TYPE.to_string());

        MockResponse {
            status: problem.status,
            content_type,
            body: serde_json::to_value(&problem).unwrap_or(Value::Null),
        }
    }
}
