use crate::error::ExtractError;
use crate::extractors::normalize;
use crate::extractors::{Extractor, ParsingContext};
use crate::model::RecipeRecord;
use log::debug;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

const LANGUAGE: &str = "html";
const TITLE: &str = ".recipe-card__title";
const RATING_LABEL: &str = ".core-rating__label";
const RATING_COUNTER: &str = ".core-rating__counter";
const TM_VERSIONS: &str = ".recipe-card__tm-version core-badge";
const FEATURE_LABELS: &str = "core-feature-icons label span";
const INGREDIENTS: &str = "#ingredients li";
const NUTRITIONS: &str = ".nutritions dl";
const STEPS: &str = "#preparation-steps li";
const TAGS: &str = ".core-tags-wrapper__tags-container a";

/// Extracts a [`RecipeRecord`] from a rendered Cookidoo recipe page.
pub struct CookidooExtractor;

fn selector(css: &str) -> Result<Selector, ExtractError> {
    Selector::parse(css).map_err(|_| ExtractError::InvalidSelector(css.to_string()))
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn required<'a>(document: &'a Html, css: &str) -> Result<ElementRef<'a>, ExtractError> {
    document
        .select(&selector(css)?)
        .next()
        .ok_or_else(|| ExtractError::MissingElement {
            selector: css.to_string(),
        })
}

fn all_texts(
    document: &Html,
    css: &str,
    clean: fn(&str) -> String,
) -> Result<Vec<String>, ExtractError> {
    Ok(document
        .select(&selector(css)?)
        .map(|el| clean(&text_of(el)))
        .collect())
}

/// Label/value pairs of the feature icon bar. The value is the text node that
/// follows the label's `<span>`.
fn features(document: &Html) -> Result<Vec<(String, String)>, ExtractError> {
    let mut pairs = Vec::new();
    for span in document.select(&selector(FEATURE_LABELS)?) {
        let key = text_of(span).trim().to_string();
        let value = span
            .next_sibling()
            .and_then(|node| node.value().as_text().map(|t| t.trim().to_string()));
        match value {
            Some(value) => pairs.push((key, value)),
            None => debug!("Feature icon '{}' has no value text", key),
        }
    }
    Ok(pairs)
}

fn nutritions(document: &Html) -> Result<BTreeMap<String, String>, ExtractError> {
    let list = required(document, NUTRITIONS)?;
    let dt = selector("dt")?;
    let dd = selector("dd")?;

    Ok(list
        .select(&dt)
        .zip(list.select(&dd))
        .map(|(dt, dd)| {
            (
                normalize::nutrition(&text_of(dt)),
                normalize::nutrition(&text_of(dd)),
            )
        })
        .collect())
}

impl Extractor for CookidooExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeRecord, ExtractError> {
        let document = &context.document;
        debug!("Extracting recipe {}", context.id);

        let language = required(document, LANGUAGE)?
            .value()
            .attr("lang")
            .ok_or_else(|| ExtractError::MissingAttribute {
                selector: LANGUAGE.to_string(),
                attribute: "lang".to_string(),
            })?
            .to_string();
        let title = text_of(required(document, TITLE)?);
        let rating_count = normalize::digits_only(&text_of(required(document, RATING_LABEL)?));
        let rating_score = text_of(required(document, RATING_COUNTER)?);

        let mut recipe = RecipeRecord {
            id: context.id.clone(),
            language,
            title,
            rating_count,
            rating_score,
            tm_versions: all_texts(document, TM_VERSIONS, normalize::badge)?,
            features: BTreeMap::new(),
            ingredients: all_texts(document, INGREDIENTS, normalize::collapse_whitespace)?,
            nutritions: nutritions(document)?,
            steps: all_texts(document, STEPS, normalize::collapse_whitespace)?,
            tags: all_texts(document, TAGS, normalize::tag)?,
        };

        for (key, value) in features(document)? {
            if !recipe.insert_feature(key.clone(), value) {
                debug!("Ignoring feature icon with reserved key '{}'", key);
            }
        }

        debug!("Recipe name: {}", recipe.title);
        debug!("Ingredients count: {}", recipe.ingredients.len());
        debug!("Steps count: {}", recipe.steps.len());

        Ok(recipe)
    }
}
