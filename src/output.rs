use crate::error::ScrapeError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where every artifact of a run is written.
///
/// ```text
/// <root>/index.html
/// <root>/recipes/<id>.html
/// <root>/recipes/<id>.json   (separate JSON mode)
/// <root>/images/<id>.jpg
/// <root>/recipesPDF/
/// <root>/data.json           (aggregate JSON mode)
/// ```
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// `custom` is an optional sub-directory below `outputdir`; blank means none.
    pub fn new(outputdir: impl Into<PathBuf>, custom: Option<&str>) -> Self {
        let mut root = outputdir.into();
        if let Some(custom) = custom.map(str::trim).filter(|c| !c.is_empty()) {
            root.push(custom);
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_html(&self) -> PathBuf {
        self.root.join("index.html")
    }

    pub fn recipe_html(&self, id: &str) -> PathBuf {
        self.root.join("recipes").join(format!("{id}.html"))
    }

    pub fn recipe_json(&self, id: &str) -> PathBuf {
        self.root.join("recipes").join(format!("{id}.json"))
    }

    pub fn image(&self, id: &str) -> PathBuf {
        self.root.join("images").join(format!("{id}.jpg"))
    }

    pub fn pdf_dir(&self) -> PathBuf {
        self.root.join("recipesPDF")
    }

    pub fn data_json(&self) -> PathBuf {
        self.root.join("data.json")
    }
}

/// Link from `index.html` to a saved recipe page
pub fn index_recipe_link(id: &str) -> String {
    format!("./recipes/{id}.html")
}

/// Image source used in `index.html`
pub fn index_image_link(id: &str) -> String {
    format!("images/{id}.jpg")
}

/// Image source used in `recipes/<id>.html`
pub fn recipe_image_link(id: &str) -> String {
    format!("../images/{id}.jpg")
}

/// Write `contents` to `path`, creating parent directories as needed
pub async fn write_text(path: &Path, contents: &str) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await?;
    Ok(())
}

pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ScrapeError> {
    let json = serde_json::to_string(value)?;
    write_text(path, &json).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = OutputLayout::new("/out", Some("vegetarian"));
        assert_eq!(layout.index_html(), PathBuf::from("/out/vegetarian/index.html"));
        assert_eq!(
            layout.recipe_html("r1"),
            PathBuf::from("/out/vegetarian/recipes/r1.html")
        );
        assert_eq!(
            layout.recipe_json("r1"),
            PathBuf::from("/out/vegetarian/recipes/r1.json")
        );
        assert_eq!(layout.image("r1"), PathBuf::from("/out/vegetarian/images/r1.jpg"));
        assert_eq!(layout.pdf_dir(), PathBuf::from("/out/vegetarian/recipesPDF"));
        assert_eq!(layout.data_json(), PathBuf::from("/out/vegetarian/data.json"));
    }

    #[test]
    fn test_blank_custom_dir_is_ignored() {
        let layout = OutputLayout::new("/out", Some("  "));
        assert_eq!(layout.root(), Path::new("/out"));
        assert_eq!(OutputLayout::new("/out", None).root(), Path::new("/out"));
    }

    #[test]
    fn test_relative_links() {
        assert_eq!(index_recipe_link("r7"), "./recipes/r7.html");
        assert_eq!(index_image_link("r7"), "images/r7.jpg");
        assert_eq!(recipe_image_link("r7"), "../images/r7.jpg");
    }

    #[tokio::test]
    async fn test_write_text_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/index.html");

        write_text(&path, "<html></html>").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
