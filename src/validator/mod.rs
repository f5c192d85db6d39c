//! Request and response validation against the OpenAPI document.
//!
//! Failures never propagate as errors: every violation is captured as a
//! [`ValidationOutcome`] variant and turned into a wire-level problem body by
//! the classifier in [`crate::problem`].

mod body;
mod request;
mod response;
mod security;

pub use request::RequestValidator;
pub use response::ResponseValidator;

/// The proximate failure cause, plus at most one nested cause.
///
/// Detail text on the wire is `message`, or `message\nnested` when a nested
/// cause exists; deeper causes are never traversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub nested: Option<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            nested: None,
        }
    }

    pub fn with_nested(message: impl Into<String>, nested: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            nested: Some(nested.into()),
        }
    }

    pub fn detail(&self) -> String {
        match &self.nested {
            Some(nested) => format!("{}\n{}", self.message, nested),
            None => self.message.clone(),
        }
    }
}

/// Classified result of validating one request or response.
///
/// Produced once per validation, immutable afterwards. The categories mirror
/// the classifier's priority order: path, then method, then documented
/// response codes, then security, then body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    /// No path template matched. `spec_has_paths` distinguishes a genuinely
    /// unknown route from a document that declares no paths at all.
    NoPath {
        spec_has_paths: bool,
        failure: Failure,
    },
    NoOperation {
        failure: Failure,
    },
    NoResponseCode {
        failure: Failure,
    },
    InvalidSecurity {
        failure: Failure,
    },
    InvalidBody {
        failure: Failure,
    },
    Unclassified {
        failure: Failure,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            ValidationOutcome::Valid => None,
            ValidationOutcome::NoPath { failure, .. }
            | ValidationOutcome::NoOperation { failure }
            | ValidationOutcome::NoResponseCode { failure }
            | ValidationOutcome::InvalidSecurity { failure }
            | ValidationOutcome::InvalidBody { failure }
            | ValidationOutcome::Unclassified { failure } => Some(failure),
        }
    }
}
