use mockbird::engine::{
    Engine, EngineConfig, HEADER_MOCK_ACTIVE, HEADER_MOCK_EXAMPLE, HEADER_MOCK_STATUS_CODE,
    MockRequest, RequestPayload,
};
use mockbird::loader::SchemaProvider;
use serde_json::json;

fn todos_engine() -> Engine {
    let provider = SchemaProvider::from_file("tests/fixtures/todos.yaml").unwrap();
    Engine::new(provider, EngineConfig::default())
}

#[test]
fn test_valid_get_serves_documented_example_list() {
    let response = todos_engine().process(&MockRequest::new("GET", "/todos"));

    assert_eq!(response.status, 200);
    assert_eq!(response.content_type, "application/json");
    assert_eq!(
        response.body,
        json!([
            {"id": 100, "name": "watering plants", "tag": "homework"},
            {"id": 101, "name": "prepare food", "tag": "homework"},
        ])
    );
}

#[test]
fn test_unknown_path_is_a_not_found_problem() {
    let request =
        MockRequest::new("GET", "/hello").with_header("Content-Type", "application/json");
    let response = todos_engine().process(&request);

    assert_eq!(response.status, 404);
    assert_eq!(response.content_type, "application/json");
    assert_eq!(response.body["type"], "NO_PATH_MATCHED_ERROR");
    assert_eq!(response.body["title"], "Route not resolved, no path matched");
    assert_eq!(
        response.body["detail"],
        "OpenAPI spec contains no such path [/hello]"
    );
    assert_eq!(response.body["status"], 404);
}

#[test]
fn test_unknown_method_is_a_not_found_problem() {
    let response = todos_engine().process(&MockRequest::new("PUT", "/todos"));

    assert_eq!(response.status, 404);
    assert_eq!(response.body["type"], "NO_PATH_AND_METHOD_MATCHED_ERROR");
    assert_eq!(
        response.body["title"],
        "Route resolved, but no path matched"
    );
    assert_eq!(
        response.body["detail"],
        "OpenAPI spec contains no such operation [/todos,put]"
    );
}

#[test]
fn test_missing_required_property_is_unprocessable() {
    let request = MockRequest::new("POST", "/todos")
        .with_header("Content-Type", "application/json")
        .with_body(json!({}));
    let response = todos_engine().process(&request);

    assert_eq!(response.status, 422);
    assert_eq!(response.body["type"], "UNPROCESSABLE_ENTITY");
    assert_eq!(response.body["title"], "Invalid request");

    let detail = response.body["detail"].as_str().unwrap();
    assert!(detail.starts_with(
        "Body does not match schema for content-type \"application/json\" for Request [post /todos]"
    ));
    assert!(detail.contains("Required property 'id' must be present in the object"));
}

#[test]
fn test_missing_api_key_is_unauthorized() {
    let response = todos_engine().process(&MockRequest::new("DELETE", "/todos"));

    assert_eq!(response.status, 401);
    assert_eq!(response.body["type"], "UNAUTHORIZED");
    assert_eq!(response.body["title"], "Invalid security scheme used");
    assert_eq!(
        response.body["detail"],
        "None of security schemas did match for Request [delete /todos]"
    );
}

#[test]
fn test_api_key_in_query_grants_access() {
    let request = MockRequest::new("DELETE", "/todos").with_query("server_token", "secret");
    let response = todos_engine().process(&request);

    assert_eq!(response.status, 200);
    assert!(response.body.is_array());
}

#[test]
fn test_empty_document_reports_no_resource() {
    let yaml = "openapi: 3.0.2\ninfo:\n  title: empty\n  version: '1'\npaths: {}\n";
    let provider = SchemaProvider::from_yaml(yaml).unwrap();
    let engine = Engine::new(provider, EngineConfig::default());

    let response = engine.process(&MockRequest::new("GET", "/todos"));

    assert_eq!(response.status, 404);
    assert_eq!(response.body["type"], "NO_RESOURCE_PROVIDED_ERROR");
    assert_eq!(
        response.body["title"],
        "Route not resolved, no resource provided"
    );
}

#[test]
fn test_malformed_json_body_is_unprocessable() {
    let request = MockRequest::new("POST", "/todos")
        .with_payload(RequestPayload::Malformed("expected value at line 1".into()));
    let response = todos_engine().process(&request);

    assert_eq!(response.status, 422);
    let detail = response.body["detail"].as_str().unwrap();
    assert!(detail.contains("Unable to decode JSON body"));
}

#[test]
fn test_mock_active_header_disables_validation() {
    let request = MockRequest::new("POST", "/todos")
        .with_body(json!({}))
        .with_header(HEADER_MOCK_ACTIVE, "false");
    let response = todos_engine().process(&request);

    assert_eq!(response.status, 200);
    assert_eq!(response.body["id"], 100);
}

#[test]
fn test_status_code_header_pins_candidate() {
    let request = MockRequest::new("GET", "/todos").with_header(HEADER_MOCK_STATUS_CODE, "200");
    let response = todos_engine().process(&request);
    assert_eq!(response.status, 200);

    // Pinning an undocumented code cannot be rescued for a valid request.
    let request = MockRequest::new("GET", "/todos").with_header(HEADER_MOCK_STATUS_CODE, "503");
    let response = todos_engine().process(&request);
    assert_eq!(response.status, 500);
    assert_eq!(response.body["type"], "ERROR");
}

#[test]
fn test_example_header_selects_named_example() {
    let request = MockRequest::new("GET", "/todos").with_header(HEADER_MOCK_EXAMPLE, "textExample");
    let response = todos_engine().process(&request);

    assert_eq!(response.status, 200);
    assert_eq!(response.body[1]["name"], "prepare food");
}

#[test]
fn test_documented_error_response_beats_problem_body() {
    let yaml = r#"
openapi: 3.0.2
info:
  title: t
  version: '1'
paths:
  /items:
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              required: [id]
              properties:
                id:
                  type: integer
      responses:
        '201':
          description: Created
        '422':
          description: Invalid
          content:
            application/json:
              example:
                code: ITEM_INVALID
"#;
    let provider = SchemaProvider::from_yaml(yaml).unwrap();
    let engine = Engine::new(provider, EngineConfig::default());

    let response = engine.process(&MockRequest::new("POST", "/items").with_body(json!({})));

    assert_eq!(response.status, 422);
    assert_eq!(response.body, json!({"code": "ITEM_INVALID"}));
}

#[test]
fn test_response_violating_its_schema_is_an_internal_error() {
    let yaml = r#"
openapi: 3.0.2
info:
  title: t
  version: '1'
paths:
  /broken:
    get:
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: object
                required: [id]
                properties:
                  id:
                    type: integer
              example:
                name: no id here
"#;
    let provider = SchemaProvider::from_yaml(yaml).unwrap();
    let engine = Engine::new(provider, EngineConfig::default());

    let response = engine.process(&MockRequest::new("GET", "/broken"));

    assert_eq!(response.status, 500);
    assert_eq!(response.body["type"], "VIOLATIONS");
    assert_eq!(response.body["title"], "Request/Response not valid");
}

#[test]
fn test_response_validation_can_be_disabled() {
    let yaml = r#"
openapi: 3.0.2
info:
  title: t
  version: '1'
paths:
  /broken:
    get:
      responses:
        '200':
          description: OK
          content:
            application/json:
              schema:
                type: object
                required: [id]
                properties:
                  id:
                    type: integer
              example:
                name: no id here
"#;
    let provider = SchemaProvider::from_yaml(yaml).unwrap();
    let config = EngineConfig {
        validate_response: false,
        ..EngineConfig::default()
    };
    let engine = Engine::new(provider, config);

    let response = engine.process(&MockRequest::new("GET", "/broken"));

    assert_eq!(response.status, 200);
    assert_eq!(response.body["name"], "no id here");
}

#[test]
fn test_processing_is_deterministic() {
    let engine = todos_engine();
    let request = MockRequest::new("GET", "/todos");

    let first = engine.process(&request);
    let second = engine.process(&request);

    assert_eq!(first, second);
}
