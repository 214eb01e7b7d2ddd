//! Request-body validation for the task endpoints.
//!
//! Violations are collected per field so that a single response reports every
//! problem with the submitted body.

use serde_json::{Map, Value};

use super::dto::{NewTask, TaskChanges, UpdateMode};
use super::model::TITLE_MAX_LENGTH;
use crate::domain::shared::error_dto::{ErrorDetail, FieldErrors};

pub const REQUIRED: &str = "This field is required.";
pub const MAY_NOT_BE_NULL: &str = "This field may not be null.";
pub const MAY_NOT_BE_BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_A_BOOLEAN: &str = "Must be a valid boolean.";

pub const NO_DATA_PROVIDED: &str = "No data provided";

const TRUE_VALUES: &[&str] = &[
    "t", "T", "y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON", "1",
];
const FALSE_VALUES: &[&str] = &[
    "f", "F", "n", "N", "no", "No", "NO", "false", "False", "FALSE", "off", "Off", "OFF", "0",
];

pub fn validate_new_task(body: &Value) -> Result<NewTask, ErrorDetail> {
    let object = expect_object(body)?;
    let mut violations = Violations::default();
    let fields = read_fields(object, true, &mut violations);
    violations.into_result()?;

    Ok(NewTask {
        title: fields.title.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
        completed: fields.completed.unwrap_or(false),
    })
}

pub fn validate_task_changes(body: &Value, mode: UpdateMode) -> Result<TaskChanges, ErrorDetail> {
    let object = expect_object(body)?;
    let mut violations = Violations::default();
    let changes = read_fields(object, mode == UpdateMode::Full, &mut violations);
    violations.into_result()?;

    Ok(changes)
}

fn read_fields(
    object: &Map<String, Value>,
    required: bool,
    violations: &mut Violations,
) -> TaskChanges {
    TaskChanges {
        title: text_field(object, "title", required, Some(TITLE_MAX_LENGTH), violations),
        description: text_field(object, "description", required, None, violations),
        completed: bool_field(object, "completed", violations),
    }
}

fn expect_object(body: &Value) -> Result<&Map<String, Value>, ErrorDetail> {
    match body {
        Value::Object(object) => Ok(object),
        Value::Null => Err(ErrorDetail::field("non_field_errors", NO_DATA_PROVIDED)),
        other => Err(ErrorDetail::field(
            "non_field_errors",
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                type_name(other)
            ),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn text_field(
    object: &Map<String, Value>,
    name: &str,
    required: bool,
    max_length: Option<usize>,
    violations: &mut Violations,
) -> Option<String> {
    let raw = match object.get(name) {
        None => {
            if required {
                violations.push(name, REQUIRED);
            }
            return None;
        }
        Some(Value::Null) => {
            violations.push(name, MAY_NOT_BE_NULL);
            return None;
        }
        Some(Value::String(text)) => text.clone(),
        // numbers are coerced to their textual form
        Some(Value::Number(number)) => number.to_string(),
        Some(_) => {
            violations.push(name, NOT_A_STRING);
            return None;
        }
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        violations.push(name, MAY_NOT_BE_BLANK);
        return None;
    }
    if let Some(max) = max_length {
        if trimmed.chars().count() > max {
            violations.push(
                name,
                format!("Ensure this field has no more than {} characters.", max),
            );
            return None;
        }
    }

    Some(trimmed.to_string())
}

fn bool_field(
    object: &Map<String, Value>,
    name: &str,
    violations: &mut Violations,
) -> Option<bool> {
    let parsed = match object.get(name)? {
        Value::Null => {
            violations.push(name, MAY_NOT_BE_NULL);
            return None;
        }
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => parse_bool_text(text),
        // 1.0 and 0.0 compare equal to 1 and 0
        Value::Number(number) => match number.as_f64() {
            Some(value) if value == 1.0 => Some(true),
            Some(value) if value == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    };

    if parsed.is_none() {
        violations.push(name, NOT_A_BOOLEAN);
    }
    parsed
}

/// Only the listed spellings count; `"tRuE"` is not a boolean.
fn parse_bool_text(text: &str) -> Option<bool> {
    if TRUE_VALUES.contains(&text) {
        Some(true)
    } else if FALSE_VALUES.contains(&text) {
        Some(false)
    } else {
        None
    }
}

#[derive(Default)]
struct Violations(FieldErrors);

impl Violations {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    fn into_result(self) -> Result<(), ErrorDetail> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ErrorDetail::Fields(self.0))
        }
    }
}
