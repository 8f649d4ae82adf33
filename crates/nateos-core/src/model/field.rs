// ── Field coercion rules ──
//
// Each configuration field knows its wire name, how captured text becomes a
// JSON value, and what to show or store when the remote omits it.

use serde_json::Value;

use crate::error::CoreError;

/// How captured text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Sent as a JSON integer.
    Number,
    /// Sent as a JSON boolean.
    Toggle,
    /// Free text restricted to a fixed set by the form surface.
    Choice(&'static [&'static str]),
}

/// A constant scalar usable in `static` descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

impl Scalar {
    pub fn to_value(self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b),
            Self::Int(n) => Value::from(n),
            Self::Str(s) => Value::from(s),
        }
    }
}

/// What happens when a record lacks the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    /// Left absent; renders as an empty cell.
    None,
    /// Filled into the record when it is decoded.
    Stored(Scalar),
    /// Never stored; only used as the rendered text.
    Display(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name in the JSON payload.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: FieldDefault,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    pub const fn toggle(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Toggle)
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::new(name, label, FieldKind::Choice(options))
    }

    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            default: FieldDefault::None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn stored(mut self, value: Scalar) -> Self {
        self.default = FieldDefault::Stored(value);
        self
    }

    pub const fn shown_as(mut self, text: &'static str) -> Self {
        self.default = FieldDefault::Display(text);
        self
    }

    /// Turn captured text into a payload value.
    ///
    /// Blank input yields `Ok(None)` for optional fields so the key is
    /// omitted from the payload.
    pub fn coerce(&self, raw: &str) -> Result<Option<Value>, CoreError> {
        let raw = raw.trim();
        if raw.is_empty() {
            if self.required {
                return Err(self.coercion_error("a value is required"));
            }
            return Ok(None);
        }

        let value = match self.kind {
            FieldKind::Text | FieldKind::Choice(_) => Value::from(raw),
            FieldKind::Number => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| self.coercion_error(format!("expected a whole number, got {raw:?}")))?,
            FieldKind::Toggle => Value::Bool(
                parse_toggle(raw)
                    .ok_or_else(|| self.coercion_error(format!("expected on/off, got {raw:?}")))?,
            ),
        };
        Ok(Some(value))
    }

    /// Render a (possibly absent) value for display.
    pub fn display(&self, value: Option<&Value>) -> String {
        match value {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(true)) => "enabled".into(),
            Some(Value::Bool(false)) => "disabled".into(),
            Some(Value::Null) | None => match self.default {
                FieldDefault::None => String::new(),
                FieldDefault::Display(text) => text.into(),
                FieldDefault::Stored(scalar) => self.display(Some(&scalar.to_value())),
            },
            Some(other) => other.to_string(),
        }
    }

    /// Render a value back into editable text (for pre-filled forms).
    pub fn to_input(&self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(if *b { "on" } else { "off" }.into()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn coercion_error(&self, message: impl Into<String>) -> CoreError {
        CoreError::Coercion {
            field: self.name.into(),
            message: message.into(),
        }
    }
}

pub(crate) fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "y" | "1" | "enabled" | "enable" => Some(true),
        "false" | "off" | "no" | "n" | "0" | "disabled" | "disable" => Some(false),
        _ => None,
    }
}
