use super::CONTENT_KIND;
use crate::document_store::Document;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read item templates {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse item templates: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("No item template for kind \"{0}\"")]
    UnknownKind(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Any,
}

impl FieldType {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
            FieldType::Any => true,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Any => "any",
        };
        f.write_str(name)
    }
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub one_of: Option<Vec<Value>>,
}

/// Either `field: string` or the full mapping form.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFieldSpec {
    Short(FieldType),
    Full(FieldSpec),
}

impl From<RawFieldSpec> for FieldSpec {
    fn from(raw: RawFieldSpec) -> Self {
        match raw {
            RawFieldSpec::Short(field_type) => FieldSpec {
                field_type,
                required: true,
                one_of: None,
            },
            RawFieldSpec::Full(spec) => spec,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    Missing(String),
    WrongType {
        field: String,
        expected: FieldType,
    },
    NotAllowed {
        field: String,
        value: Value,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing(field) => write!(f, "missing field \"{}\"", field),
            Violation::WrongType { field, expected } => {
                write!(f, "field \"{}\" should be {}", field, expected)
            }
            Violation::NotAllowed { field, value } => {
                write!(f, "field \"{}\" has unsupported value {}", field, value)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTemplate {
    pub fields: BTreeMap<String, FieldSpec>,
}

impl ItemTemplate {
    /// Checks `item` against the template and returns every violation.
    /// Fields not named by the template are accepted.
    pub fn validate(&self, item: &Document) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        for (name, spec) in &self.fields {
            let Some(value) = item.get(name).filter(|v| !v.is_null()) else {
                if spec.required {
                    violations.push(Violation::Missing(name.clone()));
                }
                continue;
            };
            if !spec.field_type.matches(value) {
                violations.push(Violation::WrongType {
                    field: name.clone(),
                    expected: spec.field_type,
                });
                continue;
            }
            if let Some(allowed) = &spec.one_of {
                if !allowed.contains(value) {
                    violations.push(Violation::NotAllowed {
                        field: name.clone(),
                        value: value.clone(),
                    });
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    pub fn is_valid(&self, item: &Document) -> bool {
        self.validate(item).is_ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemTemplates {
    kinds: HashMap<String, ItemTemplate>,
}

impl ItemTemplates {
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let templates = Self::parse(&raw)?;
        templates.get(CONTENT_KIND)?;
        Ok(templates)
    }

    pub fn parse(yaml: &str) -> Result<Self, TemplateError> {
        let raw: HashMap<String, BTreeMap<String, RawFieldSpec>> = serde_yaml::from_str(yaml)?;
        let kinds = raw
            .into_iter()
            .map(|(kind, fields)| {
                let fields = fields
                    .into_iter()
                    .map(|(name, spec)| (name, spec.into()))
                    .collect();
                (kind, ItemTemplate { fields })
            })
            .collect();
        Ok(Self { kinds })
    }

    pub fn get(&self, kind: &str) -> Result<&ItemTemplate, TemplateError> {
        self.kinds
            .get(kind)
            .ok_or_else(|| TemplateError::UnknownKind(kind.to_owned()))
    }
}
