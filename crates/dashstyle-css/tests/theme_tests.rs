//! Integration tests for theme loading from disk.

use std::fs;
use std::path::Path;

use dashstyle_actor::{Actor, ActorId, ActorTree, ColorValue, PropertySpec, PropertyValue, Stylable};
use dashstyle_css::{Theme, ThemeError, ThemeManager};
use tempfile::TempDir;

/// Write a theme directory `<base>/<name>` with a manifest and style files.
fn write_theme(base: &Path, name: &str, files: &[(&str, &str)]) {
    let dir = base.join(name);
    fs::create_dir_all(&dir).unwrap();
    let styles: Vec<_> = files.iter().map(|(file, _)| format!("\"{file}\"")).collect();
    fs::write(
        dir.join("theme.json"),
        format!(r#"{{ "name": "{name}", "styles": [{}] }}"#, styles.join(", ")),
    )
    .unwrap();
    for (file, css) in files {
        fs::write(dir.join(file), css).unwrap();
    }
}

#[test]
fn test_load_theme_in_manifest_order() {
    let tmp = TempDir::new().unwrap();
    write_theme(
        tmp.path(),
        "breeze",
        &[
            ("base.css", "@fg: #336699;\n* { color: black }"),
            ("widgets.css", "* { color: @fg }\n..oops { color: red }"),
        ],
    );

    let theme = Theme::load(&tmp.path().join("breeze")).unwrap();
    assert_eq!(theme.manifest.name, "breeze");
    assert_eq!(theme.manifest.description, None);

    let sheet = &theme.style_sheet;
    assert_eq!(sheet.rules().len(), 2);
    assert_eq!(sheet.errors().len(), 1);
    assert!(sheet.errors()[0].origin.ends_with("widgets.css"));

    let mut tree = ActorTree::new();
    let id = tree.alloc(
        Actor::new("XfdashboardLabel")
            .with_property(PropertySpec::new("color", PropertyValue::Color(ColorValue::WHITE))),
    );
    tree.append_child(ActorId::ROOT, id);

    // Same specificity: the later file wins
    assert_eq!(sheet.matching_properties(&tree, id)["color"].value, "#336699");
}

#[test]
fn test_search_paths_are_tried_in_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_theme(second.path(), "dark", &[("dark.css", "* { opacity: 0.9 }")]);
    write_theme(first.path(), "light", &[("light.css", "* { opacity: 1 }")]);
    write_theme(second.path(), "light", &[("light.css", "* { opacity: 0.5 }")]);

    let manager = ThemeManager::new([first.path(), second.path()]);
    assert_eq!(manager.find_theme("light"), Some(first.path().join("light")));
    assert_eq!(manager.find_theme("dark"), Some(second.path().join("dark")));
    assert_eq!(manager.find_theme("missing"), None);
    assert_eq!(manager.find_theme("../light"), None);
}

#[test]
fn test_load_theme_activates_and_restyles() {
    let tmp = TempDir::new().unwrap();
    write_theme(tmp.path(), "dim", &[("dim.css", "XfdashboardLabel { opacity: 0.5 }")]);

    let mut manager = ThemeManager::new([tmp.path()]);
    assert!(manager.style_sheet().is_none());

    let mut tree = ActorTree::new();
    let id = tree.alloc(
        Actor::new("XfdashboardLabel").with_property(PropertySpec::new("opacity", PropertyValue::Float(1.0))),
    );
    tree.append_child(ActorId::ROOT, id);

    let theme = manager.load_theme("dim").unwrap();
    assert_eq!(theme.path, tmp.path().join("dim"));
    assert!(manager.style_sheet().is_some());

    let reports = manager.restyle(&mut tree);
    assert_eq!(reports.len(), 1);
    assert_eq!(
        tree.stylable(id).and_then(|s| s.style_property("opacity")),
        Some(&PropertyValue::Float(0.5))
    );
}

#[test]
fn test_failed_load_keeps_active_sheet() {
    let tmp = TempDir::new().unwrap();
    write_theme(tmp.path(), "good", &[("good.css", "* { x: 1 }")]);
    let broken = tmp.path().join("broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("theme.json"), "{ \"name\": \"broken\" ").unwrap();

    let mut manager = ThemeManager::new([tmp.path()]);
    let _ = manager.load_theme("good").unwrap();
    let active = manager.active();

    let error = manager.load_theme("broken").unwrap_err();
    assert!(matches!(error, ThemeError::Manifest { .. }));
    assert!(matches!(
        manager.load_theme("nowhere"),
        Err(ThemeError::NotFound(name)) if name == "nowhere"
    ));
    assert_eq!(manager.active().as_deref(), active.as_deref());
}

#[test]
fn test_manifest_errors() {
    let tmp = TempDir::new().unwrap();

    let empty = tmp.path().join("empty");
    fs::create_dir_all(&empty).unwrap();
    fs::write(empty.join("theme.json"), r#"{ "name": "empty", "styles": [] }"#).unwrap();
    assert!(matches!(Theme::load(&empty), Err(ThemeError::NoStyles(_))));

    let missing_file = tmp.path().join("missing-file");
    fs::create_dir_all(&missing_file).unwrap();
    fs::write(
        missing_file.join("theme.json"),
        r#"{ "name": "missing-file", "styles": ["nope.css"] }"#,
    )
    .unwrap();
    let error = Theme::load(&missing_file).unwrap_err();
    assert!(matches!(&error, ThemeError::Io { path, .. } if path.ends_with("nope.css")));

    assert!(matches!(
        Theme::load(&tmp.path().join("absent")),
        Err(ThemeError::Io { .. })
    ));
}
