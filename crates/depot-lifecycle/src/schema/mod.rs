//! Schema descriptors for every request and response body of the API.
//!
//! Descriptors are plain statics, kept apart from the `domain` structs. The validator walks raw
//! JSON against them before anything is deserialized, so a client gets every problem at once.

pub mod catalog;
pub mod openapi;
mod validate;

pub use validate::{validate, Violation, Violations};

/// Named JSON object with an ordered set of fields.
#[derive(Debug)]
pub struct ObjectSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSchema],
}

impl ObjectSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
    }
}

#[derive(Debug)]
pub struct FieldSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSchema {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            description: "",
            required: true,
            kind,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            description: "",
            required: false,
            kind,
        }
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

#[derive(Debug)]
pub enum FieldKind {
    Text(TextRules),
    Integer { minimum: Option<i64> },
    Decimal { minimum: Option<f64> },
    Boolean,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// RFC 3339 timestamp with offset.
    DateTime,
    Object { schema: &'static ObjectSchema },
    Array {
        items: &'static FieldKind,
        min_items: usize,
    },
}

impl FieldKind {
    pub const fn text(max_length: usize) -> Self {
        Self::Text(TextRules {
            min_length: None,
            max_length: Some(max_length),
            pattern: None,
            allowed: &[],
        })
    }

    pub const fn exact_length(length: usize) -> Self {
        Self::Text(TextRules {
            min_length: Some(length),
            max_length: Some(length),
            pattern: None,
            allowed: &[],
        })
    }

    pub const fn pattern(pattern: &'static str, max_length: usize) -> Self {
        Self::Text(TextRules {
            min_length: None,
            max_length: Some(max_length),
            pattern: Some(pattern),
            allowed: &[],
        })
    }

    pub const fn one_of(allowed: &'static [&'static str]) -> Self {
        Self::Text(TextRules {
            min_length: None,
            max_length: None,
            pattern: None,
            allowed,
        })
    }

    pub const fn non_negative_integer() -> Self {
        Self::Integer { minimum: Some(0) }
    }

    pub const fn non_negative_decimal() -> Self {
        Self::Decimal { minimum: Some(0.0) }
    }

    pub const fn array(items: &'static FieldKind) -> Self {
        Self::Array {
            items,
            min_items: 0,
        }
    }

    pub const fn non_empty_array(items: &'static FieldKind) -> Self {
        Self::Array {
            items,
            min_items: 1,
        }
    }
}

/// String constraints; an empty `allowed` list means any value.
#[derive(Debug)]
pub struct TextRules {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static str>,
    pub allowed: &'static [&'static str],
}
