//! Content definition records and their typed variants.
use std::{collections::BTreeSet, fmt};

use super::tags::TagRef;

/// Discriminant of a [`DefinitionBody`], used for the per-kind index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DefinitionKind {
    Entity,
    Item,
    Recipe,
}

impl DefinitionKind {
    pub const ALL: [DefinitionKind; 3] = [Self::Entity, Self::Item, Self::Recipe];

    pub fn label(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Item => "item",
            Self::Recipe => "recipe",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fields shared by every definition regardless of kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionHeader {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub tags: BTreeSet<TagRef>,
}

impl DefinitionHeader {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            display_name: display_name.into(),
            description: String::new(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TagRef>,
    {
        self.tags.extend(
            tags.into_iter()
                .map(Into::into)
                .filter(|tag: &TagRef| !tag.is_blank()),
        );
        self
    }
}

/// Definition of a spawnable entity such as a settler or animal.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefinition {
    /// Name of the prefab/archetype the host uses to spawn the entity.
    pub prefab: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDefinition {
    /// Always at least 1.
    pub max_stack_size: u32,
    pub icon: Option<String>,
}

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub item_id: String,
    pub quantity: u32,
}

impl Ingredient {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDefinition {
    /// Ordered; every quantity is positive.
    pub ingredients: Vec<Ingredient>,
    pub output_item: String,
    /// Always at least 1.
    pub output_quantity: u32,
    /// Never negative.
    pub crafting_time_seconds: f32,
}

/// Kind-specific payload of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionBody {
    Entity(EntityDefinition),
    Item(ItemDefinition),
    Recipe(RecipeDefinition),
}

impl DefinitionBody {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Entity(_) => DefinitionKind::Entity,
            Self::Item(_) => DefinitionKind::Item,
            Self::Recipe(_) => DefinitionKind::Recipe,
        }
    }
}

/// Immutable content entry keyed by an id unique across all kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionRecord {
    header: DefinitionHeader,
    body: DefinitionBody,
}

impl DefinitionRecord {
    pub fn new(header: DefinitionHeader, body: DefinitionBody) -> Self {
        Self { header, body }
    }

    pub fn entity(header: DefinitionHeader, definition: EntityDefinition) -> Self {
        Self::new(header, DefinitionBody::Entity(definition))
    }

    pub fn item(header: DefinitionHeader, definition: ItemDefinition) -> Self {
        Self::new(header, DefinitionBody::Item(definition))
    }

    pub fn recipe(header: DefinitionHeader, definition: RecipeDefinition) -> Self {
        Self::new(header, DefinitionBody::Recipe(definition))
    }

    pub fn id(&self) -> &str {
        &self.header.id
    }

    pub fn display_name(&self) -> &str {
        &self.header.display_name
    }

    pub fn description(&self) -> &str {
        &self.header.description
    }

    pub fn tags(&self) -> &BTreeSet<TagRef> {
        &self.header.tags
    }

    pub fn has_tag(&self, tag: &TagRef) -> bool {
        self.header.tags.contains(tag)
    }

    pub fn header(&self) -> &DefinitionHeader {
        &self.header
    }

    pub fn body(&self) -> &DefinitionBody {
        &self.body
    }

    pub fn kind(&self) -> DefinitionKind {
        self.body.kind()
    }

    pub fn into_parts(self) -> (DefinitionHeader, DefinitionBody) {
        (self.header, self.body)
    }

    /// Typed view of the body, `None` when the record is another kind.
    pub fn as_definition<T: Definition>(&self) -> Option<&T> {
        T::from_body(&self.body)
    }
}

/// Implemented by each variant payload so registry queries can filter by an
/// explicit kind tag.
pub trait Definition: Sized {
    const KIND: DefinitionKind;

    fn from_body(body: &DefinitionBody) -> Option<&Self>;
}

impl Definition for EntityDefinition {
    const KIND: DefinitionKind = DefinitionKind::Entity;

    fn from_body(body: &DefinitionBody) -> Option<&Self> {
        match body {
            DefinitionBody::Entity(definition) => Some(definition),
            _ => None,
        }
    }
}

impl Definition for ItemDefinition {
    const KIND: DefinitionKind = DefinitionKind::Item;

    fn from_body(body: &DefinitionBody) -> Option<&Self> {
        match body {
            DefinitionBody::Item(definition) => Some(definition),
            _ => None,
        }
    }
}

impl Definition for RecipeDefinition {
    const KIND: DefinitionKind = DefinitionKind::Recipe;

    fn from_body(body: &DefinitionBody) -> Option<&Self> {
        match body {
            DefinitionBody::Recipe(definition) => Some(definition),
            _ => None,
        }
    }
}
