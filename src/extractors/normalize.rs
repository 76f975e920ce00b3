//! Text normalization shared by the record extractor.

/// Collapses every whitespace run (spaces, tabs, newlines) into one space and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps only ASCII digits, e.g. `"1,234 ratings"` becomes `"1234"`.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Drops newlines, trims and lower-cases a badge label.
pub fn badge(text: &str) -> String {
    text.replace('\n', "").trim().to_lowercase()
}

/// Tags are shown as `#Vegan`; stored as `vegan`.
pub fn tag(text: &str) -> String {
    text.replace(['#', '\n'], "").trim().to_lowercase()
}

/// Nutrition terms and values: lower-cased with whitespace collapsed.
pub fn nutrition(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}
