//! Content registry: id index plus per-kind lookup over all loaded definitions.
use std::collections::{BTreeMap, HashMap, HashSet};

use bevy::{log::warn, prelude::Resource};

use crate::crafting::recipe::CraftingRecipe;

use super::{
    definitions::{
        Definition, DefinitionBody, DefinitionKind, DefinitionRecord, ItemDefinition,
        RecipeDefinition,
    },
    errors::ContentDiagnostic,
    tags::TagRef,
};

/// Every loaded definition, indexed by id and by kind. Built once before any
/// system reads it and never mutated afterwards.
///
/// Collection queries return records in load order.
#[derive(Resource, Debug, Clone, Default)]
pub struct ContentRegistry {
    records: Vec<DefinitionRecord>,
    by_id: HashMap<String, usize>,
    by_kind: HashMap<DefinitionKind, Vec<usize>>,
    diagnostics: Vec<ContentDiagnostic>,
}

impl ContentRegistry {
    /// Indexes `source`. The first record for an id wins; later ones are
    /// dropped with a [`ContentDiagnostic::DuplicateId`].
    pub fn initialize(source: impl IntoIterator<Item = DefinitionRecord>) -> Self {
        let mut registry = Self::default();

        for record in source {
            let record = registry.normalise(record);
            if record.id().is_empty() {
                registry.report(ContentDiagnostic::MissingId {
                    kind: record.kind(),
                });
                continue;
            }

            if let Some(&existing) = registry.by_id.get(record.id()) {
                let kept = registry.records[existing].kind();
                registry.report(ContentDiagnostic::duplicate_id(
                    record.id(),
                    kept,
                    record.kind(),
                ));
                continue;
            }

            let index = registry.records.len();
            registry.by_id.insert(record.id().to_string(), index);
            registry.by_kind.entry(record.kind()).or_default().push(index);
            registry.records.push(record);
        }

        registry.check_recipe_references();
        registry
    }

    /// Range fixes applied to every record regardless of where it came from.
    fn normalise(&mut self, record: DefinitionRecord) -> DefinitionRecord {
        let (header, body) = record.into_parts();
        let id = header.id.clone();

        let body = match body {
            DefinitionBody::Item(mut item) => {
                if item.max_stack_size == 0 {
                    self.report(ContentDiagnostic::normalised(
                        &id,
                        "max_stack_size",
                        "raised 0 to 1",
                    ));
                    item.max_stack_size = 1;
                }
                DefinitionBody::Item(item)
            }
            DefinitionBody::Recipe(mut recipe) => {
                let before = recipe.ingredients.len();
                recipe.ingredients.retain(|ingredient| ingredient.quantity > 0);
                if recipe.ingredients.len() != before {
                    self.report(ContentDiagnostic::normalised(
                        &id,
                        "ingredients",
                        format!(
                            "dropped {} zero-quantity entries",
                            before - recipe.ingredients.len()
                        ),
                    ));
                }
                if recipe.output_quantity == 0 {
                    self.report(ContentDiagnostic::normalised(
                        &id,
                        "output_quantity",
                        "raised 0 to 1",
                    ));
                    recipe.output_quantity = 1;
                }
                if !recipe.crafting_time_seconds.is_finite() || recipe.crafting_time_seconds < 0.0 {
                    self.report(ContentDiagnostic::normalised(
                        &id,
                        "crafting_time_seconds",
                        format!("replaced {} with 0", recipe.crafting_time_seconds),
                    ));
                    recipe.crafting_time_seconds = 0.0;
                }
                DefinitionBody::Recipe(recipe)
            }
            entity @ DefinitionBody::Entity(_) => entity,
        };

        DefinitionRecord::new(header, body)
    }

    fn check_recipe_references(&mut self) {
        let mut dangling = Vec::new();
        for recipe_record in self.kind_records(DefinitionKind::Recipe) {
            let Some(recipe) = recipe_record.as_definition::<RecipeDefinition>() else {
                continue;
            };
            let mut seen = HashSet::new();
            let referenced = recipe
                .ingredients
                .iter()
                .map(|ingredient| ingredient.item_id.as_str())
                .chain(std::iter::once(recipe.output_item.as_str()));
            for item_id in referenced {
                if seen.insert(item_id) && self.get_definition::<ItemDefinition>(item_id).is_none() {
                    dangling.push(ContentDiagnostic::DanglingReference {
                        recipe_id: recipe_record.id().to_string(),
                        item_id: item_id.to_string(),
                    });
                }
            }
        }

        for diagnostic in dangling {
            self.report(diagnostic);
        }
    }

    fn report(&mut self, diagnostic: ContentDiagnostic) {
        warn!("Content: {diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    fn kind_records(&self, kind: DefinitionKind) -> impl Iterator<Item = &DefinitionRecord> + '_ {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(|&index| self.records.get(index))
    }

    /// Untyped lookup.
    pub fn get(&self, id: &str) -> Option<&DefinitionRecord> {
        self.by_id.get(id).and_then(|&index| self.records.get(index))
    }

    #[allow(dead_code)]
    pub fn kind_of(&self, id: &str) -> Option<DefinitionKind> {
        self.get(id).map(DefinitionRecord::kind)
    }

    /// The typed definition for `id`, `None` when missing or of another kind.
    pub fn get_definition<T: Definition>(&self, id: &str) -> Option<&T> {
        self.get(id).and_then(DefinitionRecord::as_definition::<T>)
    }

    /// Records of kind `T` in load order.
    pub fn all_of_type<T: Definition>(&self) -> Vec<&DefinitionRecord> {
        self.kind_records(T::KIND).collect()
    }

    /// Records of kind `T` carrying `tag`, in load order.
    pub fn with_tag<T: Definition>(&self, tag: &TagRef) -> Vec<&DefinitionRecord> {
        self.kind_records(T::KIND)
            .filter(|record| record.has_tag(tag))
            .collect()
    }

    /// Runtime recipe for a recipe definition id.
    pub fn recipe(&self, id: &str) -> Option<CraftingRecipe> {
        self.get(id)
            .filter(|record| record.kind() == DefinitionKind::Recipe)
            .and_then(CraftingRecipe::from_record)
    }

    /// Runtime recipes for every recipe definition, in load order.
    pub fn recipes(&self) -> Vec<CraftingRecipe> {
        self.all_of_type::<RecipeDefinition>()
            .into_iter()
            .filter_map(CraftingRecipe::from_record)
            .collect()
    }

    pub fn diagnostics(&self) -> &[ContentDiagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record counts per kind.
    pub fn summary(&self) -> BTreeMap<DefinitionKind, usize> {
        DefinitionKind::ALL
            .into_iter()
            .map(|kind| (kind, self.by_kind.get(&kind).map_or(0, Vec::len)))
            .collect()
    }
}
