//! Deterministic value synthesis from an OpenAPI schema. The static strategy
//! prefers authored examples over invented data so mocked bodies stay close
//! to what the spec author intended.

use crate::faker::FakerOptions;
use crate::loader::refs;
use oas3::OpenApiV3Spec;
use oas3::spec::{ObjectSchema, SchemaType, SchemaTypeSet};
use serde_json::{Map, Value, json};

const MAX_DEPTH: usize = 16;

pub(crate) struct SchemaFaker<'a> {
    spec: &'a OpenApiV3Spec,
    options: &'a FakerOptions,
}

impl<'a> SchemaFaker<'a> {
    pub(crate) fn new(spec: &'a OpenApiV3Spec, options: &'a FakerOptions) -> Self {
        Self { spec, options }
    }

    pub(crate) fn generate(&self, schema: &ObjectSchema) -> Value {
        self.generate_at(schema, 0)
    }

    fn generate_at(&self, schema: &ObjectSchema, depth: usize) -> Value {
        if depth > MAX_DEPTH {
            return Value::Null;
        }

        // Authored values beat invented ones.
        if let Some(example) = &schema.example {
            return example.clone();
        }
        if let Some(example) = schema.examples.first() {
            return example.clone();
        }
        if let Some(default) = &schema.default {
            return default.clone();
        }
        if let Some(constant) = &schema.const_value {
            return constant.clone();
        }
        if let Some(variant) = schema.enum_values.first() {
            return variant.clone();
        }

        if !schema.all_of.is_empty() {
            return self.merge_all_of(schema, depth);
        }
        if let Some(entry) = schema.one_of.first().or_else(|| schema.any_of.first())
            && let Some(sub) = refs::resolve_schema(self.spec, entry)
        {
            return self.generate_at(sub, depth + 1);
        }

        match self.primary_type(schema) {
            Some(SchemaType::Object) => self.generate_object(schema, depth),
            Some(SchemaType::Array) => self.generate_array(schema, depth),
            Some(SchemaType::String) => self.generate_string(schema),
            Some(SchemaType::Integer) => self.generate_integer(schema),
            Some(SchemaType::Number) => self.generate_number(schema),
            Some(SchemaType::Boolean) => Value::Bool(true),
            Some(SchemaType::Null) | None => Value::Null,
        }
    }

    /// Untyped schemas with properties or items are treated as objects or
    /// arrays, which is how most authors write them.
    fn primary_type(&self, schema: &ObjectSchema) -> Option<SchemaType> {
        match &schema.schema_type {
            Some(SchemaTypeSet::Single(single)) => Some(*single),
            Some(SchemaTypeSet::Multiple(multiple)) => multiple
                .iter()
                .copied()
                .find(|candidate| *candidate != SchemaType::Null)
                .or(Some(SchemaType::Null)),
            None if !schema.properties.is_empty() => Some(SchemaType::Object),
            None if schema.items.is_some() => Some(SchemaType::Array),
            None => None,
        }
    }

    fn generate_object(&self, schema: &ObjectSchema, depth: usize) -> Value {
        let mut object = Map::new();
        for (name, entry) in &schema.properties {
            if !self.options.always_fake_optionals && !schema.required.contains(name) {
                continue;
            }
            let value = refs::resolve_schema(self.spec, entry)
                .map(|property| self.generate_at(property, depth + 1))
                .unwrap_or(Value::Null);
            object.insert(name.clone(), value);
        }
        Value::Object(object)
    }

    fn generate_array(&self, schema: &ObjectSchema, depth: usize) -> Value {
        let Some(items) = schema
            .items
            .as_deref()
            .and_then(|items| refs::resolve_items(self.spec, items))
        else {
            return json!([]);
        };

        let count = schema
            .min_items
            .map(|minimum| minimum as usize)
            .unwrap_or(self.options.min_items)
            .max(1);
        let element = self.generate_at(items, depth + 1);

        Value::Array(vec![element; count])
    }

    fn generate_string(&self, schema: &ObjectSchema) -> Value {
        let value = match schema.format.as_deref() {
            Some("date") => "2021-01-01".to_string(),
            Some("date-time") => "2021-01-01T00:00:00Z".to_string(),
            Some("email") => "user@example.com".to_string(),
            Some("uuid") => "00000000-0000-4000-8000-000000000000".to_string(),
            Some("uri") | Some("url") => "https://example.com".to_string(),
            _ => {
                let mut text = "string".to_string();
                if let Some(maximum) = schema.max_length
                    && (maximum as usize) < text.len()
                {
                    text.truncate(maximum as usize);
                }
                while (text.len() as u64) < schema.min_length.unwrap_or(0) {
                    text.push('a');
                }
                text
            }
        };
        Value::String(value)
    }

    fn generate_integer(&self, schema: &ObjectSchema) -> Value {
        let value = schema
            .minimum
            .as_ref()
            .and_then(|minimum| minimum.as_i64())
            .unwrap_or(0);
        json!(value)
    }

    fn generate_number(&self, schema: &ObjectSchema) -> Value {
        let value = schema
            .minimum
            .as_ref()
            .and_then(|minimum| minimum.as_f64())
            .unwrap_or(0.0);
        json!(value)
    }

    fn merge_all_of(&self, schema: &ObjectSchema, depth: usize) -> Value {
        let mut merged = Map::new();
        for entry in &schema.all_of {
            if let Some(sub) = refs::resolve_schema(self.spec, entry)
                && let Value::Object(part) = self.generate_at(sub, depth + 1)
            {
                merged.extend(part);
            }
        }
        Value::Object(merged)
    }
}
