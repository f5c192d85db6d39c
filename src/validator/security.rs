//! Security-scheme checks: does the request carry the credentials one of the
//! operation's security requirements asks for?
//!
//! Presence checks only; credentials are never verified against anything.
//! That is the honest contract of a mock server.

use crate::engine::MockRequest;
use crate::loader::refs;
use oas3::OpenApiV3Spec;
use oas3::spec::{Operation, SecurityScheme};

/// True when the request satisfies at least one of the effective security
/// requirements. Operation-level security, when declared, takes precedence
/// over document-level security; an empty requirement object marks security
/// as optional.
pub(crate) fn satisfied(
    spec: &OpenApiV3Spec,
    operation: &Operation,
    request: &MockRequest,
) -> bool {
    let requirements = if operation.security.is_empty() {
        &spec.security
    } else {
        &operation.security
    };
    if requirements.is_empty() {
        return true;
    }

    requirements.iter().any(|requirement| {
        if requirement.0.is_empty() {
            return true;
        }
        requirement
            .0
            .keys()
            .all(|name| scheme_satisfied(spec, name, request))
    })
}

fn scheme_satisfied(spec: &OpenApiV3Spec, name: &str, request: &MockRequest) -> bool {
    let Some(scheme) = refs::resolve_security_scheme(spec, name) else {
        // A requirement naming an undeclared scheme can never be satisfied.
        return false;
    };

    match scheme {
        SecurityScheme::ApiKey { name, location, .. } => match location.as_str() {
            "query" => request.query.iter().any(|(key, _)| key == name),
            "header" => request.header(name).is_some(),
            "cookie" => request
                .header("cookie")
                .is_some_and(|cookies| cookie_present(cookies, name)),
            _ => false,
        },
        SecurityScheme::Http { scheme, .. } => {
            let Some(authorization) = request.header("authorization") else {
                return false;
            };
            if scheme.eq_ignore_ascii_case("bearer") {
                authorization.starts_with("Bearer ")
            } else if scheme.eq_ignore_ascii_case("basic") {
                authorization.starts_with("Basic ")
            } else {
                true
            }
        }
        // OAuth2, OpenID Connect and friends: a bearer credential in the
        // Authorization header is the best a mock can check for.
        _ => request.header("authorization").is_some(),
    }
}

fn cookie_present(cookie_header: &str, name: &str) -> bool {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, _)| key.trim() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing;

    fn spec() -> OpenApiV3Spec {
        let yaml = r#"
openapi: 3.0.2
info:
  title: Test
  version: 1.0.0
paths:
  /todos:
    delete:
      security:
        - apikey: []
      responses:
        '200':
          description: OK
  /open:
    get:
      responses:
        '200':
          description: OK
  /bearer:
    get:
      security:
        - token: []
      responses:
        '200':
          description: OK
components:
  securitySchemes:
    apikey:
      type: apiKey
      name: server_token
      in: query
    token:
      type: http
      scheme: bearer
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    fn operation<'a>(spec: &'a OpenApiV3Spec, path: &str, method: &str) -> &'a Operation {
        let address = routing::resolve(spec, path, method);
        routing::find_operation(spec, &address).unwrap()
    }

    #[test]
    fn test_api_key_in_query() {
        let spec = spec();
        let operation = operation(&spec, "/todos", "delete");

        let without = MockRequest::new("DELETE", "/todos");
        assert!(!satisfied(&spec, operation, &without));

        let with = MockRequest::new("DELETE", "/todos").with_query("server_token", "secret");
        assert!(satisfied(&spec, operation, &with));
    }

    #[test]
    fn test_no_security_always_passes() {
        let spec = spec();
        let operation = operation(&spec, "/open", "get");
        assert!(satisfied(&spec, operation, &MockRequest::new("GET", "/open")));
    }

    #[test]
    fn test_document_level_security_applies_when_operation_declares_none() {
        let yaml = r#"
openapi: 3.0.2
info:
  title: Test
  version: 1.0.0
security:
  - apikey: []
paths:
  /todos:
    get:
      responses:
        '200':
          description: OK
    delete:
      security:
        - token: []
      responses:
        '200':
          description: OK
components:
  securitySchemes:
    apikey:
      type: apiKey
      name: server_token
      in: query
    token:
      type: http
      scheme: bearer
"#;
        let spec: OpenApiV3Spec = serde_yaml::from_str(yaml).unwrap();

        // GET declares nothing, so the document-level apikey applies.
        let get = operation(&spec, "/todos", "get");
        assert!(!satisfied(&spec, get, &MockRequest::new("GET", "/todos")));
        assert!(satisfied(
            &spec,
            get,
            &MockRequest::new("GET", "/todos").with_query("server_token", "secret")
        ));

        // DELETE declares its own requirement, which replaces the document's.
        let delete = operation(&spec, "/todos", "delete");
        let with_key = MockRequest::new("DELETE", "/todos").with_query("server_token", "secret");
        assert!(!satisfied(&spec, delete, &with_key));
        let with_bearer =
            MockRequest::new("DELETE", "/todos").with_header("Authorization", "Bearer abc");
        assert!(satisfied(&spec, delete, &with_bearer));
    }

    #[test]
    fn test_http_bearer() {
        let spec = spec();
        let operation = operation(&spec, "/bearer", "get");

        let wrong = MockRequest::new("GET", "/bearer").with_header("Authorization", "Basic abc");
        assert!(!satisfied(&spec, operation, &wrong));

        let right = MockRequest::new("GET", "/bearer").with_header("Authorization", "Bearer abc");
        assert!(satisfied(&spec, operation, &right));
    }
}
