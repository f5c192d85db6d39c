use super::{Failure, body};
use crate::engine::MockResponse;
use crate::loader::refs;
use crate::routing::{self, OperationAddress};
use oas3::OpenApiV3Spec;

/// Validates a produced response against the documented response schema.
///
/// Any failure here is a generation bug, not a client error; the caller maps
/// it to the `VIOLATIONS` descriptor without attempting further synthesis.
pub struct ResponseValidator<'a> {
    spec: &'a OpenApiV3Spec,
}

impl<'a> ResponseValidator<'a> {
    pub fn new(spec: &'a OpenApiV3Spec) -> Self {
        Self { spec }
    }

    pub fn parse(
        &self,
        response: &MockResponse,
        address: &OperationAddress,
        validate: bool,
    ) -> Result<(), Failure> {
        if !validate {
            return Ok(());
        }

        let Some(operation) = routing::find_operation(self.spec, address) else {
            return Err(Failure::new(format!(
                "OpenAPI spec contains no such operation {}",
                address
            )));
        };

        let status = response.status.to_string();
        let documented = operation
            .responses
            .as_ref()
            .and_then(|responses| responses.get(&status).or_else(|| responses.get("default")))
            .and_then(|entry| refs::resolve_response(self.spec, entry));

        let Some(documented) = documented else {
            return Err(Failure::new(format!(
                "OpenAPI spec contains no response for status code {} at {}",
                response.status, address
            )));
        };

        // A response documented without content carries no schema to violate.
        if documented.content.is_empty() {
            return Ok(());
        }

        let Some(media) = documented.content.get(&response.content_type) else {
            return Err(Failure::new(format!(
                "OpenAPI spec contains no content-type \"{}\" for status code {} at {}",
                response.content_type, response.status, address
            )));
        };

        let Some(schema) = media
            .schema
            .as_ref()
            .and_then(|entry| refs::resolve_schema(self.spec, entry))
        else {
            return Ok(());
        };

        body::check(self.spec, schema, &response.body).map_err(|violation| {
            Failure::with_nested(
                format!(
                    "Body does not match schema for content-type \"{}\" for Response [{} {}]",
                    response.content_type,
                    address.method(),
                    address.path()
                ),
                violation,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> OpenApiV3Spec {
        let yaml = r#"
openapi: 3.0.2
info:
  title: Todos
  version: 1.0.0
paths:
  /todos:
    get:
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: array
                items:
                  type: object
                  required: [id]
                  properties:
                    id:
                      type: integer
        '204':
          description: No content
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    fn address() -> OperationAddress {
        OperationAddress::new("/todos", "get")
    }

    #[test]
    fn test_conforming_body_passes() {
        let spec = spec();
        let response = MockResponse {
            status: 200,
            content_type: "application/json".into(),
            body: json!([{"id": 1}]),
        };

        let validator = ResponseValidator::new(&spec);
        assert!(validator.parse(&response, &address(), true).is_ok());
    }

    #[test]
    fn test_violating_body_fails() {
        let spec = spec();
        let response = MockResponse {
            status: 200,
            content_type: "application/json".into(),
            body: json!([{"name": "no id"}]),
        };

        let validator = ResponseValidator::new(&spec);
        let failure = validator.parse(&response, &address(), true).unwrap_err();
        assert!(failure.detail().contains("Required property 'id'"));
    }

    #[test]
    fn test_undocumented_status_fails() {
        let spec = spec();
        let response = MockResponse {
            status: 404,
            content_type: "application/json".into(),
            body: json!(null),
        };

        let validator = ResponseValidator::new(&spec);
        assert!(validator.parse(&response, &address(), true).is_err());
    }

    #[test]
    fn test_content_free_response_passes() {
        let spec = spec();
        let response = MockResponse {
            status: 204,
            content_type: "application/json".into(),
            body: json!(null),
        };

        let validator = ResponseValidator::new(&spec);
        assert!(validator.parse(&response, &address(), true).is_ok());
    }

    #[test]
    fn test_disabled_validation_passes_everything() {
        let spec = spec();
        let response = MockResponse {
            status: 418,
            content_type: "text/plain".into(),
            body: json!("teapot"),
        };

        let validator = ResponseValidator::new(&spec);
        assert!(validator.parse(&response, &address(), false).is_ok());
    }
}
