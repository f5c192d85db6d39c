//! Local `$ref` resolution into `#/components/*`.
//!
//! Only document-local references are supported; remote refs resolve to
//! `None` and are treated by callers as missing definitions.

use oas3::OpenApiV3Spec;
use oas3::spec::{
    Components, Example, ObjectOrReference, ObjectSchema, Parameter, RequestBody, Response,
    SecurityScheme,
};
use std::collections::BTreeMap;

const MAX_REF_DEPTH: usize = 8;

fn resolve_in<'a, T>(
    spec: &'a OpenApiV3Spec,
    entry: &'a ObjectOrReference<T>,
    section: &str,
    index: fn(&'a Components) -> &'a BTreeMap<String, ObjectOrReference<T>>,
    depth: usize,
) -> Option<&'a T> {
    if depth > MAX_REF_DEPTH {
        return None;
    }

    match entry {
        ObjectOrReference::Object(value) => Some(value),
        ObjectOrReference::Ref { ref_path, .. } => {
            let name = ref_path
                .strip_prefix("#/components/")?
                .strip_prefix(section)?
                .strip_prefix('/')?;
            let next = index(spec.components.as_ref()?).get(name)?;
            resolve_in(spec, next, section, index, depth + 1)
        }
    }
}

pub fn resolve_schema<'a>(
    spec: &'a OpenApiV3Spec,
    entry: &'a ObjectOrReference<ObjectSchema>,
) -> Option<&'a ObjectSchema> {
    resolve_in(spec, entry, "schemas", |c| &c.schemas, 0)
}

pub fn resolve_response<'a>(
    spec: &'a OpenApiV3Spec,
    entry: &'a ObjectOrReference<Response>,
) -> Option<&'a Response> {
    resolve_in(spec, entry, "responses", |c| &c.responses, 0)
}

pub fn resolve_request_body<'a>(
    spec: &'a OpenApiV3Spec,
    entry: &'a ObjectOrReference<RequestBody>,
) -> Option<&'a RequestBody> {
    resolve_in(spec, entry, "requestBodies", |c| &c.request_bodies, 0)
}

pub fn resolve_example<'a>(
    spec: &'a OpenApiV3Spec,
    entry: &'a ObjectOrReference<Example>,
) -> Option<&'a Example> {
    resolve_in(spec, entry, "examples", |c| &c.examples, 0)
}

pub fn resolve_parameter<'a>(
    spec: &'a OpenApiV3Spec,
    entry: &'a ObjectOrReference<Parameter>,
) -> Option<&'a Parameter> {
    resolve_in(spec, entry, "parameters", |c| &c.parameters, 0)
}

pub fn resolve_security_scheme<'a>(
    spec: &'a OpenApiV3Spec,
    name: &str,
) -> Option<&'a SecurityScheme> {
    let components = spec.components.as_ref()?;
    let entry = components.security_schemes.get(name)?;
    resolve_in(spec, entry, "securitySchemes", |c| &c.security_schemes, 0)
}

/// Resolve an `items` schema, ignoring boolean schemas (`items: true`), which
/// constrain nothing this engine checks or fakes.
pub fn resolve_items<'a>(
    spec: &'a OpenApiV3Spec,
    items: &'a oas3::spec::Schema,
) -> Option<&'a ObjectSchema> {
    match items {
        oas3::spec::Schema::Object(entry) => resolve_schema(spec, entry),
        oas3::spec::Schema::Boolean(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ref_entry(ref_path: &str) -> ObjectOrReference<ObjectSchema> {
        serde_yaml::from_str(&format!("$ref: '{}'", ref_path)).unwrap()
    }

    fn spec() -> OpenApiV3Spec {
        let yaml = r#"
openapi: 3.0.2
info:
  title: Test
  version: 1.0.0
paths: {}
components:
  schemas:
    Todo:
      type: object
      required: [id]
      properties:
        id:
          type: integer
    TodoAlias:
      $ref: '#/components/schemas/Todo'
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_resolve_direct_ref() {
        let spec = spec();
        let entry = ref_entry("#/components/schemas/Todo");
        let schema = resolve_schema(&spec, &entry).unwrap();
        assert!(schema.required.contains(&"id".to_string()));
    }

    #[test]
    fn test_resolve_chained_ref() {
        let spec = spec();
        let entry = ref_entry("#/components/schemas/TodoAlias");
        assert!(resolve_schema(&spec, &entry).is_some());
    }

    #[test]
    fn test_resolve_unknown_ref() {
        let spec = spec();
        let entry = ref_entry("#/components/schemas/Nope");
        assert!(resolve_schema(&spec, &entry).is_none());
    }

    #[test]
    fn test_remote_refs_are_unsupported() {
        let spec = spec();
        let entry = ref_entry("other.yaml#/components/schemas/Todo");
        assert!(resolve_schema(&spec, &entry).is_none());
    }
}
