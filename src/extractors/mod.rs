use crate::error::ExtractError;
use crate::model::RecipeRecord;
use scraper::Html;

mod cookidoo;
pub mod normalize;

pub use cookidoo::CookidooExtractor;

pub struct ParsingContext {
    /// Recipe id derived from the page URL
    pub id: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(id: impl Into<String>, html: &str) -> Self {
        Self {
            id: id.into(),
            document: Html::parse_document(html),
        }
    }
}

pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeRecord, ExtractError>;
}
