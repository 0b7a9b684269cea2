//! Translation completeness
//!
//! Builds a per-language report of which translatable recipe fields are
//! filled in. The admin editor uses it to highlight missing translations and
//! the recipe service uses it to decide whether a recipe may be published.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Ingredient, Language, Recipe, Step, SubRecipe};

/// Top-level recipe fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeFields {
    pub name: bool,
    pub description: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientFields {
    pub name: bool,
    pub note: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFields {
    pub content: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRecipeFields {
    pub name: bool,
    pub count: u32,
}

/// Completeness of a single language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageReport {
    pub recipe: RecipeFields,
    pub ingredients: Vec<IngredientFields>,
    pub ingredient_error_count: u32,
    pub steps: Vec<StepFields>,
    pub step_error_count: u32,
    pub sub_recipes: Vec<SubRecipeFields>,
    pub sub_recipe_error_count: u32,
    /// Every filled-in field for this language, summed over the recipe and
    /// all of its children
    pub count: u32,
}

impl LanguageReport {
    /// True when this language carries everything a published recipe needs
    pub fn is_complete(&self) -> bool {
        self.recipe.name
            && self.recipe.description
            && self.ingredient_error_count == 0
            && self.step_error_count == 0
            && self.sub_recipe_error_count == 0
    }

    pub fn error_count(&self) -> u32 {
        self.ingredient_error_count + self.step_error_count + self.sub_recipe_error_count
    }
}

/// Per-language completeness, one entry for every requested language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletenessReport {
    languages: BTreeMap<Language, LanguageReport>,
}

impl CompletenessReport {
    pub fn get(&self, language: Language) -> Option<&LanguageReport> {
        self.languages.get(&language)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Language, &LanguageReport)> {
        self.languages.iter().map(|(language, report)| (*language, report))
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Languages in which the recipe could be published
    pub fn complete_languages(&self) -> Vec<Language> {
        self.iter()
            .filter(|(_, report)| report.is_complete())
            .map(|(language, _)| language)
            .collect()
    }

    /// A recipe may be published once at least one language is complete
    pub fn is_publishable(&self) -> bool {
        self.languages.values().any(LanguageReport::is_complete)
    }
}

/// Build the completeness report of `recipe` for each of `languages`.
///
/// Children are reported in ascending `position` order regardless of the
/// order they are stored in.
pub fn build_completeness_report(recipe: &Recipe, languages: &[Language]) -> CompletenessReport {
    let ingredients = by_position(&recipe.ingredients, |i| i.position);
    let steps = by_position(&recipe.steps, |s| s.position);
    let sub_recipes = by_position(&recipe.sub_recipes, |s| s.position);

    let languages = languages
        .iter()
        .map(|language| {
            let report = language_report(recipe, &ingredients, &steps, &sub_recipes, *language);
            (*language, report)
        })
        .collect();

    CompletenessReport { languages }
}

fn language_report(
    recipe: &Recipe,
    ingredients: &[&Ingredient],
    steps: &[&Step],
    sub_recipes: &[&SubRecipe],
    language: Language,
) -> LanguageReport {
    let mut report = LanguageReport::default();

    let name = recipe.name.is_present(language);
    let description = recipe.description.is_present(language);
    report.recipe = RecipeFields {
        name,
        description,
        count: tally(&[name, description]),
    };

    for ingredient in ingredients {
        let name = ingredient.name.is_present(language);
        let note = ingredient.note.is_present(language);
        if !name {
            report.ingredient_error_count += 1;
        }
        report.ingredients.push(IngredientFields {
            name,
            note,
            count: tally(&[name, note]),
        });
    }

    for step in steps {
        let content = step.content.is_present(language);
        if !content {
            report.step_error_count += 1;
        }
        report.steps.push(StepFields {
            content,
            count: tally(&[content]),
        });
    }

    for sub_recipe in sub_recipes {
        let name = sub_recipe.name.is_present(language);
        if !name {
            report.sub_recipe_error_count += 1;
        }
        report.sub_recipes.push(SubRecipeFields {
            name,
            count: tally(&[name]),
        });
    }

    report.count = report.recipe.count
        + report.ingredients.iter().map(|i| i.count).sum::<u32>()
        + report.steps.iter().map(|s| s.count).sum::<u32>()
        + report.sub_recipes.iter().map(|s| s.count).sum::<u32>();

    report
}

fn by_position<T>(items: &[T], position: impl Fn(&T) -> i32) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| position(item));
    sorted
}

fn tally(flags: &[bool]) -> u32 {
    flags.iter().filter(|flag| **flag).count() as u32
}
