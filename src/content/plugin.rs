//! ContentPlugin builds the registry before any simulation system runs.
use std::path::PathBuf;

use bevy::prelude::*;

use super::{
    registry::ContentRegistry,
    source::{
        fallback_content, BuiltinContent, ContentSource, TomlContentFile, DEFAULT_CONTENT_PATH,
    },
};

pub struct ContentPlugin {
    path: PathBuf,
}

impl ContentPlugin {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ContentPlugin {
    fn default() -> Self {
        Self::from_path(DEFAULT_CONTENT_PATH)
    }
}

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        let registry = load_registry(&TomlContentFile::new(&self.path));
        let counts = registry
            .summary()
            .into_iter()
            .map(|(kind, count)| format!("{count} {kind}"))
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            "Content registry ready: {} definitions ({}), {} diagnostics",
            registry.len(),
            counts,
            registry.diagnostics().len()
        );

        app.insert_resource(registry);
    }
}

/// Loads `source`, falling back to the built-in set when it cannot be read.
pub fn load_registry(source: &dyn ContentSource) -> ContentRegistry {
    match source.load_records() {
        Ok(records) => ContentRegistry::initialize(records),
        Err(error) => {
            warn!(
                "Failed to load content from {}: {error}. Falling back to {}.",
                source.describe(),
                BuiltinContent.describe()
            );
            ContentRegistry::initialize(fallback_content())
        }
    }
}
