//! Integration tests for the built-in value converters.

use dashstyle_actor::{ColorValue, PropertySpec, PropertyValue, ValueType};
use dashstyle_css::ConverterRegistry;

fn spec(value_type: ValueType) -> PropertySpec {
    let default = match value_type {
        ValueType::String => PropertyValue::String(String::new()),
        ValueType::Bool => PropertyValue::Bool(false),
        ValueType::Int => PropertyValue::Int(0),
        ValueType::Uint => PropertyValue::Uint(0),
        ValueType::Float => PropertyValue::Float(0.0),
        ValueType::Color => PropertyValue::Color(ColorValue::BLACK),
        ValueType::Enum => {
            return PropertySpec::enumeration(
                "mode",
                ["icon-only", "text_only", "Both"],
                "Both",
            );
        }
    };
    PropertySpec::new("prop", default)
}

fn convert(value_type: ValueType, raw: &str) -> Option<PropertyValue> {
    ConverterRegistry::default().convert(raw, &spec(value_type)).ok()
}

#[test]
fn test_numbers_use_dot_separator() {
    assert_eq!(convert(ValueType::Float, " 1.5 "), Some(PropertyValue::Float(1.5)));
    assert_eq!(convert(ValueType::Float, "-.25"), Some(PropertyValue::Float(-0.25)));
    assert_eq!(convert(ValueType::Float, "8px"), Some(PropertyValue::Float(8.0)));
    assert_eq!(convert(ValueType::Float, "1,5"), None);
    assert_eq!(convert(ValueType::Float, "inf"), None);
    assert_eq!(convert(ValueType::Float, "NaN"), None);
}

#[test]
fn test_integers() {
    assert_eq!(convert(ValueType::Int, "-4"), Some(PropertyValue::Int(-4)));
    assert_eq!(convert(ValueType::Int, "12px"), Some(PropertyValue::Int(12)));
    assert_eq!(convert(ValueType::Int, "1.5"), None);
    assert_eq!(convert(ValueType::Uint, "7"), Some(PropertyValue::Uint(7)));
    assert_eq!(convert(ValueType::Uint, "-7"), None);
}

#[test]
fn test_bools() {
    for raw in ["true", "YES", "1"] {
        assert_eq!(convert(ValueType::Bool, raw), Some(PropertyValue::Bool(true)));
    }
    for raw in ["false", "No", "0"] {
        assert_eq!(convert(ValueType::Bool, raw), Some(PropertyValue::Bool(false)));
    }
    assert_eq!(convert(ValueType::Bool, "maybe"), None);
}

#[test]
fn test_colors() {
    let color = |raw| convert(ValueType::Color, raw);
    assert_eq!(color("#fff"), Some(PropertyValue::Color(ColorValue::WHITE)));
    assert_eq!(
        color("#2563eb80"),
        Some(PropertyValue::Color(ColorValue::rgba(0x25, 0x63, 0xeb, 0x80)))
    );
    assert_eq!(color("Red"), Some(PropertyValue::Color(ColorValue::rgb(255, 0, 0))));
    assert_eq!(
        color("transparent"),
        Some(PropertyValue::Color(ColorValue::TRANSPARENT))
    );
    assert_eq!(
        color("rgba(0, 0, 0, 0)"),
        Some(PropertyValue::Color(ColorValue::TRANSPARENT))
    );
    assert_eq!(
        color("rgb(300, -5, 10)"),
        Some(PropertyValue::Color(ColorValue::rgb(255, 0, 10)))
    );
    assert_eq!(color("#12"), None);
    assert_eq!(color("blurple"), None);
}

#[test]
fn test_enums_are_canonicalized() {
    let mode = |raw| convert(ValueType::Enum, raw);
    assert_eq!(mode("icon_only"), Some(PropertyValue::Enum("icon-only".into())));
    assert_eq!(mode("TEXT-ONLY"), Some(PropertyValue::Enum("text_only".into())));
    assert_eq!(mode("both"), Some(PropertyValue::Enum("Both".into())));
    assert_eq!(mode("none"), None);
}

#[test]
fn test_strings_lose_quotes() {
    let text = |raw| convert(ValueType::String, raw);
    assert_eq!(text("\"Sans 12\""), Some(PropertyValue::String("Sans 12".into())));
    assert_eq!(text("'it\\'s'"), Some(PropertyValue::String("it's".into())));
    assert_eq!(text("plain words"), Some(PropertyValue::String("plain words".into())));
}

#[test]
fn test_error_describes_property() {
    let error = ConverterRegistry::default()
        .convert("diagonal", &spec(ValueType::Enum))
        .unwrap_err();
    assert_eq!(error.property, "mode");
    assert_eq!(error.expected, ValueType::Enum);
    assert_eq!(
        error.to_string(),
        "cannot convert 'diagonal' to enum for property 'mode': expected one of: icon-only, text_only, Both"
    );
}

#[test]
fn test_missing_or_mistyped_converter_is_an_error() {
    let mut converters = ConverterRegistry::empty();
    assert!(!converters.contains(ValueType::Float));
    assert!(converters.convert("1", &spec(ValueType::Float)).is_err());

    converters.register(ValueType::Float, |_, _| Ok(PropertyValue::Int(1)));
    let error = converters.convert("1", &spec(ValueType::Float)).unwrap_err();
    assert_eq!(error.reason, "converter produced a int value");
}
