//! Content module hosting definition records and the registry built from them.
pub mod definitions;
pub mod errors;
pub mod plugin;
pub mod registry;
pub mod source;
pub mod tags;

pub use definitions::{
    Definition, DefinitionHeader, DefinitionKind, DefinitionRecord, EntityDefinition, Ingredient,
    ItemDefinition, RecipeDefinition,
};
pub use errors::{ContentDiagnostic, ContentLoadError};
pub use plugin::ContentPlugin;
pub use registry::ContentRegistry;
pub use tags::TagRef;
