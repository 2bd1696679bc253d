//! Conversion of raw theme strings into native property values.
//!
//! Every stylable property declares a [`ValueType`]. The [`ConverterRegistry`]
//! holds one converter per type; the built-in ones are registered by
//! [`ConverterRegistry::default`] and any of them can be replaced.
//!
//! Numbers are parsed independently of the process locale: the decimal
//! separator is always `.`.

pub mod color;

use core::fmt;
use std::collections::HashMap;

use dashstyle_actor::{PropertySpec, PropertyValue, ValueType};

use crate::error::ConversionError;

/// Converts a raw theme value for one property.
pub type Converter = Box<dyn Fn(&str, &PropertySpec) -> Result<PropertyValue, ConversionError>>;

/// Converters keyed by the property type they produce.
pub struct ConverterRegistry {
    converters: HashMap<ValueType, Converter>,
}

impl ConverterRegistry {
    /// A registry with no converters at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Register `converter` for `value_type`, replacing any previous one.
    pub fn register<F>(&mut self, value_type: ValueType, converter: F)
    where
        F: Fn(&str, &PropertySpec) -> Result<PropertyValue, ConversionError> + 'static,
    {
        let _ = self.converters.insert(value_type, Box::new(converter));
    }

    /// Whether a converter exists for `value_type`.
    #[must_use]
    pub fn contains(&self, value_type: ValueType) -> bool {
        self.converters.contains_key(&value_type)
    }

    /// Convert `raw` into a value of `spec.value_type`.
    ///
    /// # Errors
    ///
    /// Fails if no converter is registered for the type, if the converter
    /// rejects the text, or if it produces a value of another type.
    pub fn convert(&self, raw: &str, spec: &PropertySpec) -> Result<PropertyValue, ConversionError> {
        let Some(converter) = self.converters.get(&spec.value_type) else {
            return Err(conversion_error(raw, spec, "no converter registered for this type"));
        };

        let value = converter(raw, spec)?;
        if value.value_type() != spec.value_type {
            return Err(conversion_error(
                raw,
                spec,
                format!("converter produced a {} value", value.value_type()),
            ));
        }
        Ok(value)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ValueType::String, convert_string);
        registry.register(ValueType::Bool, convert_bool);
        registry.register(ValueType::Int, convert_int);
        registry.register(ValueType::Uint, convert_uint);
        registry.register(ValueType::Float, convert_float);
        registry.register(ValueType::Color, convert_color);
        registry.register(ValueType::Enum, convert_enum);
        registry
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<String> = self.converters.keys().map(ToString::to_string).collect();
        types.sort();
        f.debug_struct("ConverterRegistry")
            .field("types", &types)
            .finish()
    }
}

/// Build a [`ConversionError`] for `spec`.
pub fn conversion_error(raw: &str, spec: &PropertySpec, reason: impl Into<String>) -> ConversionError {
    ConversionError {
        property: spec.name.clone(),
        value: raw.to_string(),
        expected: spec.value_type,
        reason: reason.into(),
    }
}

fn convert_string(raw: &str, _spec: &PropertySpec) -> Result<PropertyValue, ConversionError> {
    let text = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|&q| text.strip_prefix(q).and_then(|t| t.strip_suffix(q)));

    let value = match unquoted {
        Some(inner) => {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else {
                    out.push(c);
                }
            }
            out
        }
        None => text.to_string(),
    };
    Ok(PropertyValue::String(value))
}

fn convert_bool(raw: &str, spec: &PropertySpec) -> Result<PropertyValue, ConversionError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(PropertyValue::Bool(true)),
        "false" | "no" | "0" => Ok(PropertyValue::Bool(false)),
        _ => Err(conversion_error(raw, spec, "expected true/false, yes/no or 1/0")),
    }
}

/// Trim whitespace and an optional `px` unit.
fn number_text(raw: &str) -> &str {
    let text = raw.trim();
    text.strip_suffix("px").map_or(text, str::trim_end)
}

fn convert_int(raw: &str, spec: &PropertySpec) -> Result<PropertyValue, ConversionError> {
    number_text(raw)
        .parse::<i64>()
        .map(PropertyValue::Int)
        .map_err(|e| conversion_error(raw, spec, e.to_string()))
}

fn convert_uint(raw: &str, spec: &PropertySpec) -> Result<PropertyValue, ConversionError> {
    number_text(raw)
        .parse::<u64>()
        .map(PropertyValue::Uint)
        .map_err(|e| conversion_error(raw, spec, e.to_string()))
}

fn convert_float(raw: &str, spec: &PropertySpec) -> Result<PropertyValue, ConversionError> {
    let value = number_text(raw)
        .parse::<f64>()
        .map_err(|e| conversion_error(raw, spec, e.to_string()))?;
    if !value.is_finite() {
        return Err(conversion_error(raw, spec, "value is not finite"));
    }
    Ok(PropertyValue::Float(value))
}

fn convert_color(raw: &str, spec: &PropertySpec) -> Result<PropertyValue, ConversionError> {
    color::parse_color(raw)
        .map(PropertyValue::Color)
        .ok_or_else(|| conversion_error(raw, spec, "unrecognized color"))
}

fn convert_enum(raw: &str, spec: &PropertySpec) -> Result<PropertyValue, ConversionError> {
    let normalize = |s: &str| s.trim().to_ascii_lowercase().replace('_', "-");
    let wanted = normalize(raw);
    spec.enum_values
        .iter()
        .find(|member| normalize(member.as_str()) == wanted)
        .map(|member| PropertyValue::Enum(member.clone()))
        .ok_or_else(|| {
            conversion_error(
                raw,
                spec,
                format!("expected one of: {}", spec.enum_values.join(", ")),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_text_strips_unit() {
        assert_eq!(number_text(" 12px "), "12");
        assert_eq!(number_text("12 px"), "12");
        assert_eq!(number_text("1.5"), "1.5");
    }

    #[test]
    fn test_single_quote_is_not_stripped_as_pair() {
        let spec = PropertySpec::new("text", PropertyValue::String(String::new()));
        assert_eq!(
            convert_string("\"", &spec),
            Ok(PropertyValue::String("\"".into()))
        );
    }
}
