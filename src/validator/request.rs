use super::{Failure, ValidationOutcome, body, security};
use crate::engine::{MockRequest, RequestPayload};
use crate::loader::refs;
use crate::routing::{self, OperationAddress};
use oas3::OpenApiV3Spec;
use oas3::spec::{Operation, ParameterIn};

/// Validates one incoming request against the document.
///
/// Checks run in a fixed priority order; the first failing check decides the
/// outcome category. A best-effort [`OperationAddress`] is always returned,
/// even on failure, so diagnostics can name what the request addressed.
pub struct RequestValidator<'a> {
    spec: &'a OpenApiV3Spec,
}

impl<'a> RequestValidator<'a> {
    pub fn new(spec: &'a OpenApiV3Spec) -> Self {
        Self { spec }
    }

    /// Resolve and, when `validate` is set, classify the request.
    ///
    /// With `validate` false only resolution runs and the outcome is
    /// unconditionally `Valid` (pass-through mode).
    pub fn parse(
        &self,
        request: &MockRequest,
        validate: bool,
    ) -> (OperationAddress, ValidationOutcome) {
        let address = routing::resolve(self.spec, &request.path, &request.method);

        if !validate {
            return (address, ValidationOutcome::Valid);
        }

        let outcome = self.classify(request, &address);
        (address, outcome)
    }

    fn classify(&self, request: &MockRequest, address: &OperationAddress) -> ValidationOutcome {
        let spec_has_paths = self
            .spec
            .paths
            .as_ref()
            .is_some_and(|paths| !paths.is_empty());

        if !spec_has_paths {
            return ValidationOutcome::NoPath {
                spec_has_paths: false,
                failure: Failure::new(format!(
                    "OpenAPI spec contains no such path [{}]",
                    request.path
                )),
            };
        }

        let Some((_, path_item)) = routing::find_path_item(self.spec, &request.path) else {
            return ValidationOutcome::NoPath {
                spec_has_paths: true,
                failure: Failure::new(format!(
                    "OpenAPI spec contains no such path [{}]",
                    request.path
                )),
            };
        };

        let Some(operation) = routing::operation_for_method(path_item, &request.method) else {
            return ValidationOutcome::NoOperation {
                failure: Failure::new(format!(
                    "OpenAPI spec contains no such operation [{},{}]",
                    request.path,
                    request.method.to_ascii_lowercase()
                )),
            };
        };

        if operation
            .responses
            .as_ref()
            .is_none_or(|responses| responses.is_empty())
        {
            return ValidationOutcome::NoResponseCode {
                failure: Failure::new(format!(
                    "OpenAPI spec contains no response codes for operation {}",
                    address
                )),
            };
        }

        if !security::satisfied(self.spec, operation, request) {
            return ValidationOutcome::InvalidSecurity {
                failure: Failure::new(format!(
                    "None of security schemas did match for Request [{} {}]",
                    address.method(),
                    address.path()
                )),
            };
        }

        if let Some(failure) = self.check_parameters(operation, request, address) {
            return ValidationOutcome::InvalidBody { failure };
        }

        if let Some(failure) = self.check_body(operation, request, address) {
            return ValidationOutcome::InvalidBody { failure };
        }

        ValidationOutcome::Valid
    }

    fn check_parameters(
        &self,
        operation: &Operation,
        request: &MockRequest,
        address: &OperationAddress,
    ) -> Option<Failure> {
        for entry in &operation.parameters {
            let Some(parameter) = refs::resolve_parameter(self.spec, entry) else {
                continue;
            };
            if parameter.required != Some(true) {
                continue;
            }

            let (present, location) = match parameter.location {
                ParameterIn::Query => (
                    request.query.iter().any(|(key, _)| key == &parameter.name),
                    "query",
                ),
                ParameterIn::Header => (request.header(&parameter.name).is_some(), "header"),
                // A matched path template implies all path parameters were
                // supplied; cookies are not inspected per-parameter.
                ParameterIn::Path | ParameterIn::Cookie => continue,
            };

            if !present {
                return Some(Failure::with_nested(
                    format!(
                        "Parameters do not match schema for Request [{} {}]",
                        address.method(),
                        address.path()
                    ),
                    format!(
                        "Keyword validation failed: Required parameter '{}' must be present in the {}",
                        parameter.name, location
                    ),
                ));
            }
        }

        None
    }

    fn check_body(
        &self,
        operation: &Operation,
        request: &MockRequest,
        address: &OperationAddress,
    ) -> Option<Failure> {
        let body_spec = operation
            .request_body
            .as_ref()
            .and_then(|entry| refs::resolve_request_body(self.spec, entry))?;

        let content_type = request.content_type();
        let message = format!(
            "Body does not match schema for content-type \"{}\" for Request [{} {}]",
            content_type,
            address.method(),
            address.path()
        );

        let payload = match &request.body {
            None => {
                if body_spec.required == Some(true) {
                    return Some(Failure::with_nested(
                        message,
                        "Keyword validation failed: Required request body must be present",
                    ));
                }
                return None;
            }
            Some(RequestPayload::Malformed(cause)) => {
                return Some(Failure::with_nested(
                    message,
                    format!("Unable to decode JSON body: {}", cause),
                ));
            }
            Some(RequestPayload::Json(value)) => value,
        };

        let Some(media) = body_spec.content.get(content_type) else {
            return Some(Failure::with_nested(
                message,
                format!(
                    "Content-Type \"{}\" is not documented for the request body",
                    content_type
                ),
            ));
        };
        let schema = media
            .schema
            .as_ref()
            .and_then(|entry| refs::resolve_schema(self.spec, entry))?;

        body::check(self.spec, schema, payload)
            .err()
            .map(|violation| Failure::with_nested(message, violation))
    }
}
