//! Themes on disk and the holder of the active style sheet.
//!
//! A theme is a directory containing `theme.json`:
//!
//! ```json
//! {
//!   "name": "Breeze",
//!   "description": "Light theme",
//!   "styles": ["base.css", "widgets.css"]
//! }
//! ```
//!
//! The listed style files are loaded in order into one [`StyleSheet`], so
//! constants from `base.css` are visible in `widgets.css` and later files win
//! ties in the cascade.

use std::fs;
use std::mem;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use dashstyle_actor::{ActorId, ActorTree};
use dashstyle_common::warning::clear_warnings;
use serde::Deserialize;

use crate::cascade::{InvalidationReport, invalidate_subtree};
use crate::convert::ConverterRegistry;
use crate::error::ThemeError;
use crate::stylesheet::StyleSheet;

/// Contents of a theme's `theme.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeManifest {
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Style files relative to the theme directory, in load order.
    pub styles: Vec<PathBuf>,
}

impl ThemeManifest {
    /// Name of the manifest file inside a theme directory.
    pub const FILE_NAME: &'static str = "theme.json";

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// [`ThemeError::Io`] if it cannot be read, [`ThemeError::Manifest`] if it is
    /// not a valid manifest.
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let text = fs::read_to_string(path).map_err(|error| ThemeError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        serde_json::from_str(&text).map_err(|error| ThemeError::Manifest {
            path: path.to_path_buf(),
            error,
        })
    }
}

/// A loaded theme.
#[derive(Debug, Clone)]
pub struct Theme {
    /// The theme directory.
    pub path: PathBuf,
    /// The parsed manifest.
    pub manifest: ThemeManifest,
    /// Every style file of the theme, loaded in manifest order.
    pub style_sheet: Rc<StyleSheet>,
}

impl Theme {
    /// Load the theme in `dir`.
    ///
    /// # Errors
    ///
    /// Fails if the manifest is missing or invalid, lists no style files, or a
    /// listed file cannot be read. Syntax errors inside style files do not fail
    /// the load; they are available from [`StyleSheet::errors`].
    pub fn load(dir: &Path) -> Result<Self, ThemeError> {
        let manifest_path = dir.join(ThemeManifest::FILE_NAME);
        let manifest = ThemeManifest::from_file(&manifest_path)?;
        if manifest.styles.is_empty() {
            return Err(ThemeError::NoStyles(manifest_path));
        }

        let mut builder = StyleSheet::builder();
        for style in &manifest.styles {
            let _ = builder.add_file(&dir.join(style))?;
        }
        let style_sheet = builder.build();

        tracing::info!(
            theme = %manifest.name,
            rules = style_sheet.rules().len(),
            errors = style_sheet.errors().len(),
            "loaded theme"
        );

        Ok(Self {
            path: dir.to_path_buf(),
            manifest,
            style_sheet: Rc::new(style_sheet),
        })
    }
}

/// Owns the active style sheet and the converters used to apply it.
///
/// Replacing the style sheet is a single reference swap; invalidations that
/// run afterwards see the new sheet.
#[derive(Debug, Default)]
pub struct ThemeManager {
    search_paths: Vec<PathBuf>,
    active: Option<Rc<StyleSheet>>,
    converters: ConverterRegistry,
}

impl ThemeManager {
    /// Create a manager that looks for themes in `search_paths`, in order.
    #[must_use]
    pub fn new<I, P>(search_paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_paths: search_paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Directories searched by [`ThemeManager::find_theme`].
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Append a search directory with the lowest priority.
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        self.search_paths.push(path.into());
    }

    /// The active style sheet, if any.
    #[must_use]
    pub fn style_sheet(&self) -> Option<&StyleSheet> {
        self.active.as_deref()
    }

    /// A shared handle to the active style sheet.
    #[must_use]
    pub fn active(&self) -> Option<Rc<StyleSheet>> {
        self.active.clone()
    }

    /// Swap in a new style sheet (or none) and return the previous one.
    ///
    /// Warnings already reported for the old sheet are forgotten so that the
    /// new one gets its own.
    pub fn replace(&mut self, sheet: Option<Rc<StyleSheet>>) -> Option<Rc<StyleSheet>> {
        clear_warnings();
        mem::replace(&mut self.active, sheet)
    }

    /// The converters applied during [`ThemeManager::restyle`].
    #[must_use]
    pub const fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Mutable access for registering custom converters.
    pub fn converters_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.converters
    }

    /// The first search path containing a theme called `name`.
    #[must_use]
    pub fn find_theme(&self, name: &str) -> Option<PathBuf> {
        // A theme name is a single directory name
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return None;
        }
        self.search_paths
            .iter()
            .map(|base| base.join(name))
            .find(|dir| dir.join(ThemeManifest::FILE_NAME).is_file())
    }

    /// Find, load and activate the theme called `name`.
    ///
    /// # Errors
    ///
    /// [`ThemeError::NotFound`] if no search path has it, otherwise whatever
    /// [`Theme::load`] reports. The active style sheet is unchanged on error.
    pub fn load_theme(&mut self, name: &str) -> Result<Theme, ThemeError> {
        let dir = self
            .find_theme(name)
            .ok_or_else(|| ThemeError::NotFound(name.to_string()))?;
        let theme = Theme::load(&dir)?;
        let _ = self.replace(Some(Rc::clone(&theme.style_sheet)));
        Ok(theme)
    }

    /// Re-style every actor in `tree` against the active style sheet.
    pub fn restyle(&self, tree: &mut ActorTree) -> Vec<(ActorId, InvalidationReport)> {
        let root = tree.root();
        invalidate_subtree(tree, root, self.style_sheet(), &self.converters)
    }
}
