//! Host-boundary patch parsing.
//!
//! Hosts send configuration as loosely-typed JSON. Each field is validated
//! on its own: a bad value drops that field (logged, and reported back in the
//! rejection list) while the rest of the patch is still applied. Unknown keys
//! are ignored.

use crate::config::{ConfigField, ConfigValue, MultiSelectKey, ValueKind};
use crate::error::{PatchError, RejectedField};
use crate::merge::ConfigPatch;
use serde_json::Value;

const IS_SILENT_MODE: &str = "isSilentMode";
const TEXT_EDIT: &str = "textEdit";

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn expect_bool(field: &'static str, value: &Value) -> Result<bool, PatchError> {
    value.as_bool().ok_or(PatchError::InvalidPatchField {
        field,
        expected: ValueKind::Bool,
        found: json_type(value),
    })
}

fn parse_value(field: ConfigField, value: &Value) -> Result<ConfigValue, PatchError> {
    match field.kind() {
        ValueKind::Bool => expect_bool(field.key(), value).map(ConfigValue::Bool),
        ValueKind::Key => {
            let name = value.as_str().ok_or(PatchError::InvalidPatchField {
                field: field.key(),
                expected: ValueKind::Key,
                found: json_type(value),
            })?;
            MultiSelectKey::parse(name).map(ConfigValue::Key)
        }
        ValueKind::Extra => match value {
            Value::Object(map) => Ok(ConfigValue::Extra(map.clone())),
            other => Err(PatchError::InvalidPatchField {
                field: field.key(),
                expected: ValueKind::Extra,
                found: json_type(other),
            }),
        },
    }
}

impl ConfigPatch {
    /// Parse a JSON patch. Never fails as a whole; rejected fields are
    /// returned alongside the accepted patch.
    pub fn from_json(value: &Value) -> (Self, Vec<RejectedField>) {
        let mut patch = ConfigPatch::new();
        let mut rejected = Vec::new();

        let Value::Object(entries) = value else {
            let error = PatchError::NotAnObject(json_type(value));
            log::warn!("config patch ignored: {error}");
            rejected.push(RejectedField {
                field: String::new(),
                error,
            });
            return (patch, rejected);
        };

        for (key, raw) in entries {
            let parsed = match key.as_str() {
                IS_SILENT_MODE => expect_bool(IS_SILENT_MODE, raw).map(|b| {
                    patch.is_silent_mode = Some(b);
                }),
                TEXT_EDIT => expect_bool(TEXT_EDIT, raw).map(|b| {
                    patch.text_edit = Some(b);
                }),
                other => match ConfigField::from_key(other) {
                    Some(field) => {
                        parse_value(field, raw).and_then(|v| patch.fields.insert(field, v))
                    }
                    None => {
                        log::debug!("ignoring unknown config key `{other}`");
                        Ok(())
                    }
                },
            };
            if let Err(error) = parsed {
                log::warn!("config field `{key}` rejected: {error}");
                rejected.push(RejectedField {
                    field: key.clone(),
                    error,
                });
            }
        }

        (patch, rejected)
    }

    /// Parse a JSON patch from text. Malformed text yields an empty patch.
    pub fn from_json_str(text: &str) -> (Self, Vec<RejectedField>) {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_json(&value),
            Err(e) => {
                log::warn!("config patch is not valid JSON: {e}");
                let error = PatchError::NotAnObject("malformed JSON");
                (
                    ConfigPatch::new(),
                    vec![RejectedField {
                        field: String::new(),
                        error,
                    }],
                )
            }
        }
    }
}
