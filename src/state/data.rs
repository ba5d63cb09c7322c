/// Shared data structures for the gallery state
///
/// These structs represent the data model that flows between
/// the directory scanner, the listing cache and the UI layer.
use chrono::{DateTime, Utc};
use image::ImageFormat;
use std::path::Path;

/// Extensions listed as text items
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

/// Extensions listed as image items
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// What a gallery entry holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Image,
    Text,
}

impl ItemKind {
    /// Classify a file by extension, `None` for anything the gallery does not show
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) && ImageFormat::from_extension(&ext).is_some() {
            return Some(ItemKind::Image);
        }
        if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            return Some(ItemKind::Text);
        }
        None
    }

    /// Stable tag used by the listing cache
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Image => "image",
            ItemKind::Text => "text",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "image" => Some(ItemKind::Image),
            "text" => Some(ItemKind::Text),
            _ => None,
        }
    }
}

/// Represents a single entry in the gallery
///
/// The path is the identity. Positions in the grid are owned by the
/// display order and are never stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Path relative to the output directory, '/' separated (e.g., "2024/ComfyUI_00001_.png")
    pub path: String,
    /// Filename only (e.g., "ComfyUI_00001_.png")
    pub name: String,
    /// Last modification time
    pub modified: DateTime<Utc>,
    /// File size in bytes
    pub size: u64,
    pub kind: ItemKind,
}

impl Item {
    /// Lowercased extension, empty when the name has none
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// Outcome of a bulk delete; partial failure is normal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteReport {
    /// Ids removed from disk
    pub deleted: Vec<String>,
    /// Ids that could not be removed, with the reason
    pub failed: Vec<(String, String)>,
}

impl DeleteReport {
    /// Toast text for the finished batch
    pub fn message(&self) -> String {
        let deleted = crate::state::selection::pluralize(self.deleted.len(), "image");
        if self.failed.is_empty() {
            format!("Successfully deleted {}", deleted)
        } else {
            format!("Deleted {}, {} failed", deleted, self.failed.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(ItemKind::from_path(Path::new("a/b.PNG")), Some(ItemKind::Image));
        assert_eq!(ItemKind::from_path(Path::new("img.webp")), Some(ItemKind::Image));
        assert_eq!(ItemKind::from_path(Path::new("prompt.txt")), Some(ItemKind::Text));
        assert_eq!(ItemKind::from_path(Path::new("workflow.json")), None);
        assert_eq!(ItemKind::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn test_delete_report_message() {
        let mut report = DeleteReport::default();
        report.deleted = vec!["a.png".into(), "b.png".into()];
        assert_eq!(report.message(), "Successfully deleted 2 images");

        report.failed.push(("c.png".into(), "permission denied".into()));
        assert_eq!(report.message(), "Deleted 2 images, 1 failed");
    }

    #[test]
    fn test_kind_tag() {
        for kind in [ItemKind::Image, ItemKind::Text] {
            assert_eq!(ItemKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ItemKind::parse("video"), None);
    }
}
