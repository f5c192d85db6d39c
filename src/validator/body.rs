//! Structural checks of a JSON value against an OpenAPI schema object.
//!
//! This covers the subset of JSON Schema the mock engine needs: type,
//! required properties, enum/const, nested objects and arrays, the composite
//! keywords, and the common size bounds. The first violation found is
//! reported; search stops there.

use crate::loader::refs;
use oas3::OpenApiV3Spec;
use oas3::spec::{ObjectSchema, SchemaType, SchemaTypeSet};
use serde_json::Value;

const MAX_DEPTH: usize = 32;

/// Check `value` against `schema`, returning the first violation message.
pub(crate) fn check(
    spec: &OpenApiV3Spec,
    schema: &ObjectSchema,
    value: &Value,
) -> Result<(), String> {
    check_at(spec, schema, value, 0)
}

fn check_at(
    spec: &OpenApiV3Spec,
    schema: &ObjectSchema,
    value: &Value,
    depth: usize,
) -> Result<(), String> {
    if depth > MAX_DEPTH {
        return Ok(());
    }

    for entry in &schema.all_of {
        if let Some(sub) = refs::resolve_schema(spec, entry) {
            check_at(spec, sub, value, depth + 1)?;
        }
    }

    for candidates in [&schema.one_of, &schema.any_of] {
        if !candidates.is_empty() {
            let matched = candidates.iter().any(|entry| {
                refs::resolve_schema(spec, entry)
                    .is_some_and(|sub| check_at(spec, sub, value, depth + 1).is_ok())
            });
            if !matched {
                return Err(
                    "Keyword validation failed: Value matches none of the candidate schemas"
                        .to_string(),
                );
            }
        }
    }

    if let Some(expected) = &schema.const_value
        && expected != value
    {
        return Err(format!(
            "Keyword validation failed: Value must be the constant {}",
            expected
        ));
    }

    if !schema.enum_values.is_empty() && !schema.enum_values.contains(value) {
        return Err(format!(
            "Keyword validation failed: Value {} is not listed in the enum",
            value
        ));
    }

    if let Some(type_set) = &schema.schema_type
        && !type_allows(type_set, value)
    {
        return Err(format!(
            "Keyword validation failed: Value expected to be of type {}",
            type_set_name(type_set)
        ));
    }

    if let Value::Object(fields) = value {
        for required in &schema.required {
            if !fields.contains_key(required) {
                return Err(format!(
                    "Keyword validation failed: Required property '{}' must be present in the object",
                    required
                ));
            }
        }

        for (name, entry) in &schema.properties {
            if let Some(field) = fields.get(name)
                && let Some(sub) = refs::resolve_schema(spec, entry)
            {
                check_at(spec, sub, field, depth + 1)
                    .map_err(|e| format!("{} (at property '{}')", e, name))?;
            }
        }
    }

    if let Value::Array(elements) = value {
        if let Some(min) = schema.min_items
            && (elements.len() as u64) < min
        {
            return Err(format!(
                "Keyword validation failed: Array must have at least {} items",
                min
            ));
        }
        if let Some(max) = schema.max_items
            && (elements.len() as u64) > max
        {
            return Err(format!(
                "Keyword validation failed: Array must have at most {} items",
                max
            ));
        }

        if let Some(item_schema) = schema
            .items
            .as_deref()
            .and_then(|items| refs::resolve_items(spec, items))
        {
            for (index, element) in elements.iter().enumerate() {
                check_at(spec, item_schema, element, depth + 1)
                    .map_err(|e| format!("{} (at index {})", e, index))?;
            }
        }
    }

    if let Value::String(text) = value {
        if let Some(min) = schema.min_length
            && (text.chars().count() as u64) < min
        {
            return Err(format!(
                "Keyword validation failed: String must be at least {} characters long",
                min
            ));
        }
        if let Some(max) = schema.max_length
            && (text.chars().count() as u64) > max
        {
            return Err(format!(
                "Keyword validation failed: String must be at most {} characters long",
                max
            ));
        }
    }

    if let Value::Number(number) = value
        && let Some(actual) = number.as_f64()
    {
        if let Some(min) = schema.minimum.as_ref().and_then(|n| n.as_f64())
            && actual < min
        {
            return Err(format!(
                "Keyword validation failed: Value must be greater than or equal to {}",
                min
            ));
        }
        if let Some(max) = schema.maximum.as_ref().and_then(|n| n.as_f64())
            && actual > max
        {
            return Err(format!(
                "Keyword validation failed: Value must be less than or equal to {}",
                max
            ));
        }
    }

    Ok(())
}

fn type_allows(type_set: &SchemaTypeSet, value: &Value) -> bool {
    match type_set {
        SchemaTypeSet::Single(t) => type_matches(t, value),
        SchemaTypeSet::Multiple(types) => types.iter().any(|t| type_matches(t, value)),
    }
}

fn type_matches(schema_type: &SchemaType, value: &Value) -> bool {
    match schema_type {
        SchemaType::Boolean => value.is_boolean(),
        SchemaType::Integer => value.is_i64() || value.is_u64(),
        SchemaType::Number => value.is_number(),
        SchemaType::String => value.is_string(),
        SchemaType::Array => value.is_array(),
        SchemaType::Object => value.is_object(),
        SchemaType::Null => value.is_null(),
    }
}

fn type_set_name(type_set: &SchemaTypeSet) -> String {
    match type_set {
        SchemaTypeSet::Single(t) => format!("{:?}", t).to_lowercase(),
        SchemaTypeSet::Multiple(types) => types
            .iter()
            .map(|t| format!("{:?}", t).to_lowercase())
            .collect::<Vec<_>>()
            .join(" or "),
    }
}
