//! Content sources: the TOML content file and the built-in fallback set.
use std::{fs, path::PathBuf};

use serde::Deserialize;

use super::{
    definitions::{
        DefinitionHeader, DefinitionRecord, EntityDefinition, Ingredient, ItemDefinition,
        RecipeDefinition,
    },
    errors::ContentLoadError,
    tags::TagRef,
};

pub const DEFAULT_CONTENT_PATH: &str = "config/content.toml";

/// Anything that can produce the records the registry is built from.
pub trait ContentSource {
    /// Human-readable origin used in log lines.
    fn describe(&self) -> String;

    fn load_records(&self) -> Result<Vec<DefinitionRecord>, ContentLoadError>;
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RawContentFile {
    #[serde(default, rename = "entity")]
    entities: Vec<RawEntity>,
    #[serde(default, rename = "item")]
    items: Vec<RawItem>,
    #[serde(default, rename = "recipe")]
    recipes: Vec<RawRecipe>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawHeader {
    #[serde(default)]
    id: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    tags: Vec<TagRef>,
}

impl From<RawHeader> for DefinitionHeader {
    fn from(value: RawHeader) -> Self {
        let display_name = if value.display_name.trim().is_empty() {
            value.id.clone()
        } else {
            value.display_name
        };
        DefinitionHeader::new(value.id, display_name)
            .with_description(value.description)
            .with_tags(value.tags)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RawEntity {
    #[serde(flatten)]
    header: RawHeader,
    #[serde(default)]
    prefab: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawItem {
    #[serde(flatten)]
    header: RawHeader,
    #[serde(default = "default_stack_size")]
    max_stack_size: u32,
    #[serde(default)]
    icon: Option<String>,
}

fn default_stack_size() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
struct RawRecipe {
    #[serde(flatten)]
    header: RawHeader,
    #[serde(default)]
    ingredients: Vec<RawIngredient>,
    output_item: String,
    #[serde(default = "default_output_quantity")]
    output_quantity: u32,
    #[serde(default)]
    crafting_time_seconds: f32,
}

fn default_output_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
struct RawIngredient {
    item: String,
    quantity: u32,
}

impl RawContentFile {
    /// Entities first, then items, then recipes, each in file order.
    fn into_records(self) -> Vec<DefinitionRecord> {
        let mut records =
            Vec::with_capacity(self.entities.len() + self.items.len() + self.recipes.len());

        records.extend(self.entities.into_iter().map(|raw| {
            let prefab = if raw.prefab.trim().is_empty() {
                raw.header.id.clone()
            } else {
                raw.prefab
            };
            DefinitionRecord::entity(raw.header.into(), EntityDefinition { prefab })
        }));

        records.extend(self.items.into_iter().map(|raw| {
            DefinitionRecord::item(
                raw.header.into(),
                ItemDefinition {
                    max_stack_size: raw.max_stack_size,
                    icon: raw.icon.filter(|icon| !icon.trim().is_empty()),
                },
            )
        }));

        records.extend(self.recipes.into_iter().map(|raw| {
            DefinitionRecord::recipe(
                raw.header.into(),
                RecipeDefinition {
                    ingredients: raw
                        .ingredients
                        .into_iter()
                        .map(|ingredient| Ingredient::new(ingredient.item.trim(), ingredient.quantity))
                        .collect(),
                    output_item: raw.output_item.trim().to_string(),
                    output_quantity: raw.output_quantity,
                    crafting_time_seconds: raw.crafting_time_seconds,
                },
            )
        }));

        records
    }
}

/// A content file on disk using `[[entity]]`, `[[item]]` and `[[recipe]]`
/// tables.
#[derive(Debug, Clone)]
pub struct TomlContentFile {
    path: PathBuf,
}

impl TomlContentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses content text as if it had been read from this file's path.
    pub fn parse(&self, data: &str) -> Result<Vec<DefinitionRecord>, ContentLoadError> {
        let raw: RawContentFile = toml::from_str(data).map_err(|err| ContentLoadError::Parse {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        Ok(raw.into_records())
    }
}

impl Default for TomlContentFile {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_PATH)
    }
}

impl ContentSource for TomlContentFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_records(&self) -> Result<Vec<DefinitionRecord>, ContentLoadError> {
        let data = fs::read_to_string(&self.path).map_err(|source| ContentLoadError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.parse(&data)
    }
}

/// Minimal content set used when the content file cannot be loaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinContent;

impl ContentSource for BuiltinContent {
    fn describe(&self) -> String {
        "built-in fallback content".to_string()
    }

    fn load_records(&self) -> Result<Vec<DefinitionRecord>, ContentLoadError> {
        Ok(fallback_content())
    }
}

pub fn fallback_content() -> Vec<DefinitionRecord> {
    let item = |id: &str, name: &str, stack: u32, tags: &[&str]| {
        DefinitionRecord::item(
            DefinitionHeader::new(id, name).with_tags(tags.iter().copied()),
            ItemDefinition {
                max_stack_size: stack,
                icon: None,
            },
        )
    };

    vec![
        DefinitionRecord::entity(
            DefinitionHeader::new("entity_settler", "Settler")
                .with_description("A member of the founding lineage.")
                .with_tags(["settler"]),
            EntityDefinition {
                prefab: "settler".to_string(),
            },
        ),
        item("item_wood", "Wood", 50, &["material"]),
        item("item_flint", "Flint", 30, &["material", "stone"]),
        item("item_plank", "Plank", 25, &["material"]),
        item("item_stone_axe", "Stone Axe", 1, &["tool"]),
        DefinitionRecord::recipe(
            DefinitionHeader::new("recipe_plank", "Saw Planks").with_tags(["carpentry"]),
            RecipeDefinition {
                ingredients: vec![Ingredient::new("item_wood", 3)],
                output_item: "item_plank".to_string(),
                output_quantity: 1,
                crafting_time_seconds: 4.0,
            },
        ),
        DefinitionRecord::recipe(
            DefinitionHeader::new("recipe_stone_axe", "Knap Stone Axe").with_tags(["toolmaking"]),
            RecipeDefinition {
                ingredients: vec![
                    Ingredient::new("item_plank", 1),
                    Ingredient::new("item_flint", 2),
                ],
                output_item: "item_stone_axe".to_string(),
                output_quantity: 1,
                crafting_time_seconds: 8.0,
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::definitions::DefinitionKind;

    const SAMPLE: &str = r#"
        [[recipe]]
        id = "recipe_plank"
        display_name = "Saw Planks"
        output_item = "item_plank"
        crafting_time_seconds = 3.5
        ingredients = [{ item = "item_wood", quantity = 3 }]

        [[item]]
        id = "item_wood"
        display_name = "Wood"
        max_stack_size = 40
        tags = ["Material"]

        [[entity]]
        id = "entity_settler"
        tags = ["settler"]
    "#;

    #[test]
    fn parses_tables_in_kind_then_file_order() {
        let records = TomlContentFile::new("memory.toml")
            .parse(SAMPLE)
            .expect("sample should parse");

        let kinds: Vec<_> = records.iter().map(|record| record.kind()).collect();
        assert_eq!(
            kinds,
            vec![DefinitionKind::Entity, DefinitionKind::Item, DefinitionKind::Recipe]
        );

        let settler = records[0]
            .as_definition::<EntityDefinition>()
            .expect("entity");
        assert_eq!(settler.prefab, "entity_settler");
        assert_eq!(records[0].display_name(), "entity_settler");

        assert!(records[1].has_tag(&TagRef::new("material")));

        let recipe = records[2]
            .as_definition::<RecipeDefinition>()
            .expect("recipe");
        assert_eq!(recipe.output_quantity, 1);
        assert_eq!(recipe.ingredients, vec![Ingredient::new("item_wood", 3)]);
        assert!((recipe.crafting_time_seconds - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn parse_errors_name_the_path() {
        let error = TomlContentFile::new("broken.toml")
            .parse("[[item]]\nid = 5")
            .expect_err("id must be a string");
        assert!(error.to_string().contains("broken.toml"));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let error = TomlContentFile::new("definitely/not/here.toml")
            .load_records()
            .expect_err("file does not exist");
        assert!(matches!(error, ContentLoadError::Io { .. }));
    }

    #[test]
    fn fallback_content_loads_without_errors() {
        let records = BuiltinContent.load_records().expect("fallback is infallible");
        assert!(records.iter().any(|record| record.id() == "recipe_plank"));
    }
}
