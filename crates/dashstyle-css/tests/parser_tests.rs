//! Integration tests for theme source parsing and error recovery.

use dashstyle_css::parser::{Constants, ThemeParser};
use dashstyle_css::{ParseErrorKind, SelectorError, StyleSheet};

fn parse(source: &str) -> dashstyle_css::parser::ParsedTheme {
    let mut constants = Constants::new();
    ThemeParser::new(source, "theme.css", &mut constants).parse()
}

fn error_kinds(sheet: &StyleSheet) -> Vec<&ParseErrorKind> {
    sheet.errors().iter().map(|e| &e.kind).collect()
}

#[test]
fn test_rules_and_declarations() {
    let theme = parse(
        "XfdashboardButton { color: white; padding: 4px }\n\
         .title, #header { font: \"Sans Bold 12\"; }",
    );
    assert!(theme.errors.is_empty());
    assert_eq!(theme.rules.len(), 2);

    let button = &theme.rules[0];
    assert_eq!(button.selectors[0].text, "XfdashboardButton");
    let decls: Vec<_> = button
        .declarations
        .iter()
        .map(|d| (d.name.as_str(), d.value.as_str()))
        .collect();
    assert_eq!(decls, vec![("color", "white"), ("padding", "4px")]);

    let texts: Vec<_> = theme.rules[1].selectors.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec![".title", "#header"]);
    assert_eq!(theme.rules[1].declarations[0].value, "\"Sans Bold 12\"");
    assert_eq!(theme.rules[1].line, 2);
}

#[test]
fn test_comments_are_ignored() {
    let theme = parse("/* header */ A { /* inside */ color: red; /* after */ }");
    assert!(theme.errors.is_empty());
    assert_eq!(theme.rules[0].declarations.len(), 1);
}

#[test]
fn test_constants_substituted_at_load() {
    let theme = parse(
        "@accent: #2563eb;\n\
         @border: 1px solid @accent;\n\
         A { border: @border; label: \"@accent\"; }",
    );
    assert!(theme.errors.is_empty(), "{:?}", theme.errors);
    let decls = &theme.rules[0].declarations;
    assert_eq!(decls[0].value, "1px solid #2563eb");
    // Constants are not expanded inside strings
    assert_eq!(decls[1].value, "\"@accent\"");
}

#[test]
fn test_constant_redefinition_applies_to_later_rules() {
    let theme = parse("@c: red; A { color: @c } @c: blue; B { color: @c }");
    assert_eq!(theme.rules[0].declarations[0].value, "red");
    assert_eq!(theme.rules[1].declarations[0].value, "blue");
}

#[test]
fn test_undefined_constant_drops_declaration() {
    let theme = parse("A { color: @nope; opacity: 1 }");
    assert_eq!(theme.errors.len(), 1);
    assert_eq!(
        theme.errors[0].kind,
        ParseErrorKind::UndefinedConstant("nope".into())
    );
    assert_eq!(theme.rules[0].declarations.len(), 1);
    assert_eq!(theme.rules[0].declarations[0].name, "opacity");
}

#[test]
fn test_unsupported_at_rule_is_skipped() {
    let theme = parse("@import \"other.css\";\n@media screen { A { x: 1 } }\nB { y: 2 }");
    let kinds: Vec<_> = theme.errors.iter().map(|e| &e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &ParseErrorKind::UnsupportedAtRule("import".into()),
            &ParseErrorKind::UnsupportedAtRule("media".into()),
        ]
    );
    assert_eq!(theme.errors[1].line, 2);
    assert_eq!(theme.rules.len(), 1);
    assert_eq!(theme.rules[0].selectors[0].text, "B");
}

#[test]
fn test_declaration_errors_are_local() {
    let theme = parse("A { : red; color: ; 42: x; opacity: 0.5; }");
    let kinds: Vec<_> = theme.errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            ParseErrorKind::ExpectedPropertyName(":".into()),
            ParseErrorKind::EmptyValue("color".into()),
            ParseErrorKind::ExpectedPropertyName("42".into()),
        ]
    );
    assert_eq!(theme.rules[0].declarations.len(), 1);
    assert_eq!(theme.rules[0].declarations[0].value, "0.5");
}

#[test]
fn test_unterminated_string_drops_declaration() {
    let theme = parse("A { font: \"Sans\n; color: red; }");
    assert_eq!(theme.errors[0].kind, ParseErrorKind::UnterminatedString);
    let names: Vec<_> = theme.rules[0].declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["color"]);
}

#[test]
fn test_unterminated_block_keeps_declarations() {
    let theme = parse("A { color: red;\n opacity: 1");
    assert_eq!(
        theme.errors.iter().map(|e| &e.kind).collect::<Vec<_>>(),
        vec![&ParseErrorKind::UnexpectedEof("declaration block")]
    );
    assert_eq!(theme.rules[0].declarations.len(), 2);
}

#[test]
fn test_missing_selector_and_stray_braces() {
    let theme = parse("{ color: red } } B { x: 1 }");
    let kinds: Vec<_> = theme.errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            ParseErrorKind::MissingSelector,
            ParseErrorKind::UnexpectedToken("}".into()),
        ]
    );
    assert_eq!(theme.rules.len(), 1);
}

#[test]
fn test_bad_selector_among_valid_rules() {
    // One malformed rule next to five valid ones
    let sheet = StyleSheet::parse(
        "A { x: 1 }\n\
         .b { x: 2 }\n\
         ..bad:: { x: 3 }\n\
         #c { x: 4 }\n\
         D > E { x: 5 }\n\
         F:hover { x: 6 }",
    );
    assert_eq!(sheet.rules().len(), 5);
    assert_eq!(sheet.errors().len(), 1);
    assert_eq!(sheet.errors()[0].line, 3);
    assert_eq!(
        error_kinds(&sheet),
        vec![&ParseErrorKind::InvalidSelector {
            text: "..bad::".into(),
            error: SelectorError::MissingName('.'),
        }]
    );
    // Source order still counts the skipped rule
    let orders: Vec<_> = sheet.rules().iter().map(|r| r.source_order).collect();
    assert_eq!(orders, vec![0, 1, 3, 4, 5]);
}

#[test]
fn test_error_display_has_location() {
    let sheet = StyleSheet::parse("\n\nA { color red }");
    assert_eq!(
        sheet.errors()[0].to_string(),
        "<inline>:3: expected ':' after property 'color'"
    );
}
