//! Typed property values and the property declarations a stylable exposes.
//!
//! Theme files only ever carry strings. A stylable declares, per property, the
//! native [`ValueType`] and a default [`PropertyValue`]; the cascade converts the
//! winning string into that type before handing it to the stylable.

use core::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The native type of a stylable property.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Free-form text.
    String,
    /// `true` / `false`.
    Bool,
    /// Signed integer.
    Int,
    /// Unsigned integer.
    Uint,
    /// Floating point number.
    Float,
    /// RGBA color.
    Color,
    /// One of a fixed set of names declared by the property.
    Enum,
}

/// sRGB color with an alpha channel, all components 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorValue {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = fully opaque).
    pub a: u8,
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// A color with explicit alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

/// A converted, native property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    /// Text value.
    String(String),
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Unsigned integer value.
    Uint(u64),
    /// Floating point value.
    Float(f64),
    /// Color value.
    Color(ColorValue),
    /// Canonical name of an enumeration member.
    Enum(String),
}

impl PropertyValue {
    /// The [`ValueType`] this value belongs to.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Bool(_) => ValueType::Bool,
            Self::Int(_) => ValueType::Int,
            Self::Uint(_) => ValueType::Uint,
            Self::Float(_) => ValueType::Float,
            Self::Color(_) => ValueType::Color,
            Self::Enum(_) => ValueType::Enum,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Color(c) => write!(f, "{c}"),
            Self::Enum(name) => write!(f, "{name}"),
        }
    }
}

/// Declaration of one property that the cascade is allowed to override.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpec {
    /// Property name as written in theme files, e.g. `background-color`.
    pub name: String,
    /// Native type the theme string is converted into.
    pub value_type: ValueType,
    /// Value applied when no rule sets the property or conversion fails.
    pub default: PropertyValue,
    /// Allowed member names when `value_type` is [`ValueType::Enum`].
    pub enum_values: Vec<String>,
}

impl PropertySpec {
    /// Declare a property whose type is taken from its default value.
    #[must_use]
    pub fn new(name: impl Into<String>, default: PropertyValue) -> Self {
        Self {
            name: name.into(),
            value_type: default.value_type(),
            default,
            enum_values: Vec::new(),
        }
    }

    /// Declare an enumeration property with the allowed member names.
    #[must_use]
    pub fn enumeration<I, S>(name: impl Into<String>, values: I, default: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            value_type: ValueType::Enum,
            default: PropertyValue::Enum(default.to_string()),
            enum_values: values.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_value_type_from_str_is_case_insensitive() {
        assert_eq!(ValueType::from_str("Color"), Ok(ValueType::Color));
        assert_eq!(ValueType::from_str("uint"), Ok(ValueType::Uint));
        assert!(ValueType::from_str("gradient").is_err());
        assert_eq!(ValueType::Float.to_string(), "float");
    }

    #[test]
    fn test_spec_type_follows_default() {
        let spec = PropertySpec::new("opacity", PropertyValue::Float(1.0));
        assert_eq!(spec.value_type, ValueType::Float);
        assert!(spec.enum_values.is_empty());
    }

    #[test]
    fn test_color_display() {
        assert_eq!(ColorValue::rgb(0x25, 0x63, 0xeb).to_string(), "#2563ebff");
        assert_eq!(
            PropertyValue::Color(ColorValue::TRANSPARENT).to_string(),
            "#00000000"
        );
    }

    #[test]
    fn test_value_serializes_with_type_tag() {
        let json = serde_json::to_string(&PropertyValue::Float(2.5)).unwrap();
        assert_eq!(json, r#"{"type":"float","value":2.5}"#);
    }
}
