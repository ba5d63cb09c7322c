/// Output directory listing
///
/// Walks the output directory recursively and collects every image and
/// text file as a gallery item, newest first.
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{GalleryError, Result};
use crate::state::data::{Item, ItemKind};

/// List the output directory on the blocking pool
pub async fn scan_output_dir(root: PathBuf) -> Result<Vec<Item>> {
    // Spawn blocking because walking a large tree hits the disk a lot
    task::spawn_blocking(move || scan_output_dir_blocking(&root))
        .await
        .map_err(|e| GalleryError::Task(e.to_string()))?
}

/// Blocking implementation of the directory listing
pub fn scan_output_dir_blocking(root: &Path) -> Result<Vec<Item>> {
    if !root.is_dir() {
        return Err(GalleryError::NotFound(root.display().to_string()));
    }

    debug!(root = %root.display(), "scanning output directory");

    let mut items = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(kind) = ItemKind::from_path(path) else {
            continue;
        };

        match item_for(root, path, kind) {
            Ok(item) => items.push(item),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable file"),
        }
    }

    items.sort_by(|a, b| b.modified.cmp(&a.modified));

    info!(count = items.len(), root = %root.display(), "output directory scanned");
    Ok(items)
}

/// Build the item for one file below `root`
pub fn item_for(root: &Path, path: &Path, kind: ItemKind) -> Result<Item> {
    let metadata = std::fs::metadata(path)?;
    let modified: DateTime<Utc> = metadata.modified()?.into();

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(Item {
        path: relative_id(root, path)?,
        name,
        modified,
        size: metadata.len(),
        kind,
    })
}

/// Item id for a file: its path below `root`, '/' separated on every platform
pub fn relative_id(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| GalleryError::OutsideRoot(path.display().to_string()))?;

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_collects_images_and_text() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("batch").join("deep")).unwrap();
        fs::write(root.join("first.png"), b"png").unwrap();
        fs::write(root.join("batch").join("second.JPG"), b"jpeg!").unwrap();
        fs::write(root.join("batch").join("deep").join("prompt.txt"), b"a cat").unwrap();
        fs::write(root.join("workflow.json"), b"{}").unwrap();
        fs::write(root.join("README"), b"").unwrap();

        let items = scan_output_dir_blocking(root).unwrap();
        let mut paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
        paths.sort();
        assert_eq!(paths, ["batch/deep/prompt.txt", "batch/second.JPG", "first.png"]);

        let second = items.iter().find(|i| i.name == "second.JPG").unwrap();
        assert_eq!(second.size, 5);
        assert_eq!(second.kind, ItemKind::Image);

        let prompt = items.iter().find(|i| i.name == "prompt.txt").unwrap();
        assert_eq!(prompt.kind, ItemKind::Text);
    }

    #[test]
    fn test_scan_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.png"), b"a").unwrap();
        fs::write(dir.path().join("b.png"), b"b").unwrap();

        let items = scan_output_dir_blocking(dir.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].modified >= items[1].modified);
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = scan_output_dir_blocking(&dir.path().join("nope"));
        assert!(matches!(result, Err(GalleryError::NotFound(_))));
    }

    #[test]
    fn test_relative_id_uses_forward_slashes() {
        let root = Path::new("/out");
        let path = Path::new("/out").join("a").join("b.png");
        assert_eq!(relative_id(root, &path).unwrap(), "a/b.png");
        assert!(relative_id(root, Path::new("/elsewhere/b.png")).is_err());
    }
}
