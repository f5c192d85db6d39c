//! Response synthesis: produce a body for a documented response without a
//! real backend, trying an ordered chain of candidate status codes.

mod schema;

use crate::engine::MockResponse;
use crate::loader::refs;
use crate::routing::{self, OperationAddress};
use oas3::OpenApiV3Spec;
use oas3::spec::{MediaType, MediaTypeExamples};
use schema::SchemaFaker;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FakerError {
    #[error("OpenAPI spec contains no such operation {0}")]
    NoPath(String),

    #[error("OpenAPI spec contains no response for status code {status} at {address}")]
    NoResponse { status: String, address: String },

    #[error("OpenAPI spec contains no example named \"{name}\" for status code {status} at {address}")]
    NoExample {
        name: String,
        status: String,
        address: String,
    },

    #[error("no candidate status codes were given to synthesize a response from")]
    NoCandidates,
}

/// Knobs for schema-derived values. Only the static strategy is implemented;
/// bodies are deterministic for a given schema.
#[derive(Debug, Clone)]
pub struct FakerOptions {
    /// Element count for arrays whose schema has no `minItems`.
    pub min_items: usize,
    /// Include optional object properties, not just required ones.
    pub always_fake_optionals: bool,
}

impl Default for FakerOptions {
    fn default() -> Self {
        Self {
            min_items: 1,
            always_fake_optionals: true,
        }
    }
}

/// Synthesizes response bodies from documented examples and schemas.
#[derive(Debug, Clone, Default)]
pub struct ResponseFaker {
    options: FakerOptions,
}

impl ResponseFaker {
    pub fn new(options: FakerOptions) -> Self {
        Self { options }
    }

    /// Try each candidate status code in order and return the first body a
    /// response definition exists for.
    ///
    /// On exhaustion the failure of the LAST candidate is surfaced; earlier
    /// misses are discarded. An empty candidate list is a programming error
    /// and fails immediately.
    pub fn mock(
        &self,
        spec: &OpenApiV3Spec,
        address: &OperationAddress,
        candidates: &[&str],
        content_type: &str,
        example_name: Option<&str>,
    ) -> Result<MockResponse, FakerError> {
        // The wire status used when the "default" response entry matches:
        // the chain's first concrete code is what the chain was built for.
        let primary_status = candidates
            .iter()
            .find_map(|candidate| candidate.parse::<u16>().ok())
            .unwrap_or(500);

        let mut last_miss = FakerError::NoCandidates;
        for candidate in candidates {
            match self.mock_status(
                spec,
                address,
                candidate,
                primary_status,
                content_type,
                example_name,
            ) {
                Ok(response) => return Ok(response),
                Err(miss) => last_miss = miss,
            }
        }

        Err(last_miss)
    }

    fn mock_status(
        &self,
        spec: &OpenApiV3Spec,
        address: &OperationAddress,
        status: &str,
        primary_status: u16,
        content_type: &str,
        example_name: Option<&str>,
    ) -> Result<MockResponse, FakerError> {
        let operation = routing::find_operation(spec, address)
            .ok_or_else(|| FakerError::NoPath(address.to_string()))?;

        let no_response = || FakerError::NoResponse {
            status: status.to_string(),
            address: address.to_string(),
        };

        let response = operation
            .responses
            .as_ref()
            .and_then(|responses| responses.get(status))
            .and_then(|entry| refs::resolve_response(spec, entry))
            .ok_or_else(no_response)?;

        let wire_status = status.parse::<u16>().unwrap_or(primary_status);

        // Responses documented without content (204 and friends) synthesize
        // an empty body.
        if response.content.is_empty() {
            return Ok(MockResponse {
                status: wire_status,
                content_type: content_type.to_string(),
                body: Value::Null,
            });
        }

        let media = response.content.get(content_type).ok_or_else(no_response)?;

        let body = match example_name {
            Some(name) => {
                self.named_example(spec, media, name)
                    .ok_or_else(|| FakerError::NoExample {
                        name: name.to_string(),
                        status: status.to_string(),
                        address: address.to_string(),
                    })?
            }
            None => self.body_for_media(spec, media),
        };

        Ok(MockResponse {
            status: wire_status,
            content_type: content_type.to_string(),
            body,
        })
    }

    /// Body preference order: documented example(s) first, then a value
    /// derived from the schema, then null.
    fn body_for_media(&self, spec: &OpenApiV3Spec, media: &MediaType) -> Value {
        match &media.examples {
            Some(MediaTypeExamples::Example { example }) => return example.clone(),
            Some(MediaTypeExamples::Examples { examples }) => {
                if let Some(value) = examples
                    .values()
                    .filter_map(|entry| refs::resolve_example(spec, entry))
                    .find_map(|example| example.value.clone())
                {
                    return value;
                }
            }
            None => {}
        }

        media
            .schema
            .as_ref()
            .and_then(|entry| refs::resolve_schema(spec, entry))
            .map(|schema| SchemaFaker::new(spec, &self.options).generate(schema))
            .unwrap_or(Value::Null)
    }

    fn named_example(&self, spec: &OpenApiV3Spec, media: &MediaType, name: &str) -> Option<Value> {
        match &media.examples {
            Some(MediaTypeExamples::Examples { examples }) => refs::resolve_example(
                spec,
                examples.get(name)?,
            )
            .and_then(|example| example.value.clone()),
            _ => None,
        }
    }
}
