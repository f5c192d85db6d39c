//! RFC 7807 problem details. Every way a mocked exchange can go wrong maps
//! to exactly one problem type, and most problem types carry a fallback
//! chain of documented status codes to try before giving up.

use crate::validator::{Failure, ValidationOutcome};
use serde::Serialize;

pub const NO_PATH_MATCHED_ERROR: &str = "NO_PATH_MATCHED_ERROR";
pub const NO_RESOURCE_PROVIDED_ERROR: &str = "NO_RESOURCE_PROVIDED_ERROR";
pub const NO_PATH_AND_METHOD_MATCHED_ERROR: &str = "NO_PATH_AND_METHOD_MATCHED_ERROR";
pub const NO_PATH_AND_METHOD_AND_RESPONSE_CODE_MATCHED_ERROR: &str =
    "NO_PATH_AND_METHOD_AND_RESPONSE_CODE_MATCHED_ERROR";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const UNPROCESSABLE_ENTITY: &str = "UNPROCESSABLE_ENTITY";
pub const VIOLATIONS: &str = "VIOLATIONS";
pub const ERROR: &str = "ERROR";

/// Chain tried for a valid request with no explicit status override.
pub const SUCCESS_CHAIN: &[&str] = &["200", "201"];
/// Chain tried when routing fails in any way.
pub const NO_PATH_CHAIN: &[&str] = &["404", "400", "500", "default"];
/// Chain tried when no security requirement was satisfied.
pub const SECURITY_CHAIN: &[&str] = &["401", "500", "default"];
/// Chain tried when the request body or parameters are invalid.
pub const VALIDATION_CHAIN: &[&str] = &["422", "400", "500", "default"];

/// An RFC 7807 problem body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Problem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub detail: String,
    pub status: u16,
}

impl Problem {
    /// The problem emitted when synthesis could not rescue an invalid
    /// request. Total over every failing outcome.
    pub fn from_outcome(outcome: &ValidationOutcome) -> Problem {
        match outcome {
            ValidationOutcome::Valid => Problem::unexpected("request was valid".to_string()),
            ValidationOutcome::NoPath {
                spec_has_paths,
                failure,
            } => {
                let kind = if *spec_has_paths {
                    NO_PATH_MATCHED_ERROR
                } else {
                    NO_RESOURCE_PROVIDED_ERROR
                };
                let title = if *spec_has_paths {
                    "Route not resolved, no path matched"
                } else {
                    "Route not resolved, no resource provided"
                };
                Problem {
                    kind,
                    title,
                    detail: failure.detail(),
                    status: 404,
                }
            }
            ValidationOutcome::NoOperation { failure } => Problem {
                kind: NO_PATH_AND_METHOD_MATCHED_ERROR,
                title: "Route resolved, but no path matched",
                detail: failure.detail(),
                status: 404,
            },
            ValidationOutcome::NoResponseCode { failure } => Problem {
                kind: NO_PATH_AND_METHOD_AND_RESPONSE_CODE_MATCHED_ERROR,
                title: "Route resolved, but no status code matched",
                detail: failure.detail(),
                status: 405,
            },
            ValidationOutcome::InvalidSecurity { failure } => Problem {
                kind: UNAUTHORIZED,
                title: "Invalid security scheme used",
                detail: failure.detail(),
                status: 401,
            },
            ValidationOutcome::InvalidBody { failure } => Problem {
                kind: UNPROCESSABLE_ENTITY,
                title: "Invalid request",
                detail: failure.detail(),
                status: 422,
            },
            ValidationOutcome::Unclassified { failure } => Problem::unexpected(failure.detail()),
        }
    }

    /// The problem emitted when a synthesized response violates its own
    /// documented schema.
    pub fn violations(failure: &Failure) -> Problem {
        Problem {
            kind: VIOLATIONS,
            title: "Request/Response not valid",
            detail: failure.detail(),
            status: 500,
        }
    }

    pub fn unexpected(detail: String) -> Problem {
        Problem {
            kind: ERROR,
            title: "Unexpected error occurred",
            detail,
            status: 500,
        }
    }
}

/// The chain of documented status codes tried before a problem body is
/// emitted for a failing outcome. `None` means emit the problem directly.
pub fn fallback_chain(outcome: &ValidationOutcome) -> Option<&'static [&'static str]> {
    match outcome {
        ValidationOutcome::Valid | ValidationOutcome::Unclassified { .. } => None,
        ValidationOutcome::NoPath { .. }
        | ValidationOutcome::NoOperation { .. }
        | ValidationOutcome::NoResponseCode { .. } => Some(NO_PATH_CHAIN),
        ValidationOutcome::InvalidSecurity { .. } => Some(SECURITY_CHAIN),
        ValidationOutcome::InvalidBody { .. } => Some(VALIDATION_CHAIN),
    }
}
