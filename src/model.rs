use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field names with a fixed meaning in a [`RecipeRecord`]
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "language",
    "title",
    "rating_count",
    "rating_score",
    "tm-versions",
    "ingredients",
    "nutritions",
    "steps",
    "tags",
];

/// Structured data for one recipe page.
///
/// The feature-icon pairs (preparation time, total time, servings, ...) are
/// flattened into the top level of the JSON object, so their keys vary from
/// page to page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub id: String,
    pub language: String,
    pub title: String,
    pub rating_count: String,
    pub rating_score: String,
    #[serde(rename = "tm-versions")]
    pub tm_versions: Vec<String>,
    #[serde(flatten)]
    pub features: BTreeMap<String, String>,
    pub ingredients: Vec<String>,
    pub nutritions: BTreeMap<String, String>,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
}

impl RecipeRecord {
    /// Adds a feature-icon entry unless the key collides with a fixed field.
    pub fn insert_feature(&mut self, key: String, value: String) -> bool {
        if key.is_empty() || RESERVED_FIELDS.contains(&key.as_str()) {
            return false;
        }
        self.features.insert(key, value);
        true
    }
}

/// Derives the recipe id from the last path segment of its URL.
///
/// `https://cookidoo.de/recipes/recipe/de-DE/r59322?x=1` becomes `r59322`.
pub fn recipe_id_from_url(recipe_url: &str) -> Result<String, url::ParseError> {
    let parsed = url::Url::parse(recipe_url)?;
    let id = parsed
        .path()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();
    Ok(id)
}
