//! Operation resolution: maps an incoming (path, method) pair onto the
//! documented operation it addresses, template parameters included.

use oas3::OpenApiV3Spec;
use oas3::spec::{Operation, PathItem};
use std::fmt;

/// Address of one documented operation: a path template plus an HTTP method.
///
/// When resolution fails, the literal request path and method are carried
/// instead, so diagnostics downstream always have something to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationAddress {
    path: String,
    method: String,
}

impl OperationAddress {
    pub fn new(path: impl Into<String>, method: &str) -> Self {
        Self {
            path: path.into(),
            method: method.to_ascii_lowercase(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

impl fmt::Display for OperationAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.path, self.method)
    }
}

/// Resolve a request to an operation address.
///
/// Always succeeds: when no documented operation matches, the literal
/// (path, method) pair is returned unchanged so that fallback handling
/// still has an address for its diagnostics.
pub fn resolve(spec: &OpenApiV3Spec, path: &str, method: &str) -> OperationAddress {
    if let Some((template, item)) = find_path_item(spec, path)
        && operation_for_method(item, method).is_some()
    {
        return OperationAddress::new(template, method);
    }

    OperationAddress::new(path, method)
}

/// Find the path item matching a concrete request path, trying an exact key
/// first and falling back to template matching (`/todos/{id}` vs `/todos/17`).
pub fn find_path_item<'a>(spec: &'a OpenApiV3Spec, path: &str) -> Option<(&'a str, &'a PathItem)> {
    let paths = spec.paths.as_ref()?;

    if let Some((template, item)) = paths.get_key_value(path) {
        return Some((template.as_str(), item));
    }

    paths
        .iter()
        .find(|(template, _)| template_matches(template, path))
        .map(|(template, item)| (template.as_str(), item))
}

/// Look up the operation for an HTTP method on a path item.
pub fn operation_for_method<'a>(item: &'a PathItem, method: &str) -> Option<&'a Operation> {
    match method.to_ascii_lowercase().as_str() {
        "get" => item.get.as_ref(),
        "post" => item.post.as_ref(),
        "put" => item.put.as_ref(),
        "delete" => item.delete.as_ref(),
        "patch" => item.patch.as_ref(),
        "options" => item.options.as_ref(),
        "head" => item.head.as_ref(),
        "trace" => item.trace.as_ref(),
        _ => None,
    }
}

/// Find the operation an address points at, or `None` for unresolved addresses.
pub fn find_operation<'a>(
    spec: &'a OpenApiV3Spec,
    address: &OperationAddress,
) -> Option<&'a Operation> {
    find_path_item(spec, address.path())
        .and_then(|(_, item)| operation_for_method(item, address.method()))
}

/// Number of operations defined on a path item.
pub fn operation_count(item: &PathItem) -> usize {
    [
        &item.get,
        &item.post,
        &item.put,
        &item.delete,
        &item.patch,
        &item.options,
        &item.head,
        &item.trace,
    ]
    .iter()
    .filter(|operation| operation.is_some())
    .count()
}

/// Segment-wise template match. A `{param}` segment matches any non-empty
/// concrete segment; everything else must match literally.
fn template_matches(template: &str, path: &str) -> bool {
    let template = template.trim_end_matches('/');
    let path = path.trim_end_matches('/');

    let mut template_segments = template.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (template_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(t), Some(p)) => {
                let is_param = t.starts_with('{') && t.ends_with('}');
                if is_param {
                    if p.is_empty() {
                        return false;
                    }
                } else if t != p {
                    return false;
                }
            }
            _ => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> OpenApiV3Spec {
        let yaml = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
paths:
  /todos:
    get:
      responses:
        '200':
          description: OK
  /todos/{todoId}:
    get:
      responses:
        '200':
          description: OK
"#;
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_resolve_exact_path() {
        let address = resolve(&spec(), "/todos", "GET");
        assert_eq!(address.path(), "/todos");
        assert_eq!(address.method(), "get");
    }

    #[test]
    fn test_resolve_templated_path() {
        let address = resolve(&spec(), "/todos/17", "get");
        assert_eq!(address.path(), "/todos/{todoId}");
    }

    #[test]
    fn test_resolve_unknown_path_echoes_request() {
        let address = resolve(&spec(), "/missing", "get");
        assert_eq!(address.path(), "/missing");
        assert_eq!(address.method(), "get");
    }

    #[test]
    fn test_resolve_unknown_method_echoes_request() {
        let address = resolve(&spec(), "/todos", "PUT");
        assert_eq!(address.path(), "/todos");
        assert_eq!(address.method(), "put");
        assert!(find_operation(&spec(), &address).is_none());
    }

    #[test]
    fn test_template_matching() {
        assert!(template_matches("/todos/{id}", "/todos/17"));
        assert!(template_matches("/a/{b}/c", "/a/x/c"));
        assert!(!template_matches("/todos/{id}", "/todos"));
        assert!(!template_matches("/todos", "/todos/17"));
        assert!(!template_matches("/todos/{id}", "/other/17"));
    }

    #[test]
    fn test_address_display() {
        let address = OperationAddress::new("/todos", "PUT");
        assert_eq!(address.to_string(), "[/todos,put]");
    }
}
