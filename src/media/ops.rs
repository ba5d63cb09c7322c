/// File operations on gallery items: delete and rename
///
/// Every item id is resolved against the output directory first and refused
/// when it would land outside of it.
use std::path::{Component, Path, PathBuf};
use tokio::task;
use tracing::{info, warn};

use super::scan::item_for;
use crate::error::{GalleryError, Result};
use crate::state::data::{DeleteReport, Item, ItemKind};

/// Resolve an item id to a path inside `root`
pub fn resolve(root: &Path, id: &str) -> Result<PathBuf> {
    let relative = Path::new(id.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(GalleryError::OutsideRoot(id.to_string()));
            }
        }
    }
    if resolved == root {
        return Err(GalleryError::OutsideRoot(id.to_string()));
    }
    Ok(resolved)
}

/// Remove one item from disk
pub fn delete_item(root: &Path, id: &str) -> Result<()> {
    let path = resolve(root, id)?;
    if !path.is_file() {
        warn!(%id, "delete requested for missing file");
        return Err(GalleryError::NotFound(id.to_string()));
    }
    std::fs::remove_file(&path)?;
    info!(%id, "deleted");
    Ok(())
}

/// Remove several items; failures are collected rather than aborting the batch
pub fn delete_items(root: &Path, ids: &[String]) -> DeleteReport {
    let mut report = DeleteReport::default();
    for id in ids {
        match delete_item(root, id) {
            Ok(()) => report.deleted.push(id.clone()),
            Err(e) => {
                warn!(%id, error = %e, "delete failed");
                report.failed.push((id.clone(), e.to_string()));
            }
        }
    }
    report
}

/// Rename an item within its directory, keeping the extension.
///
/// `new_stem` is the new name without extension.
pub fn rename_item(root: &Path, id: &str, new_stem: &str) -> Result<Item> {
    let stem = new_stem.trim();
    if stem.is_empty() || stem.contains(['/', '\\']) || stem == "." || stem == ".." {
        return Err(GalleryError::InvalidName(new_stem.to_string()));
    }

    let path = resolve(root, id)?;
    if !path.is_file() {
        return Err(GalleryError::NotFound(id.to_string()));
    }

    let file_name = match path.extension() {
        Some(ext) => format!("{}.{}", stem, ext.to_string_lossy()),
        None => stem.to_string(),
    };
    let target = path.with_file_name(&file_name);

    if target == path {
        let kind = item_kind(&path)?;
        return item_for(root, &path, kind);
    }
    if target.exists() {
        return Err(GalleryError::AlreadyExists(target));
    }

    std::fs::rename(&path, &target)?;
    info!(%id, to = %file_name, "renamed");

    let kind = item_kind(&target)?;
    item_for(root, &target, kind)
}

fn item_kind(path: &Path) -> Result<ItemKind> {
    ItemKind::from_path(path).ok_or_else(|| GalleryError::InvalidName(path.display().to_string()))
}

/// Delete on the blocking pool
pub async fn delete_items_async(root: PathBuf, ids: Vec<String>) -> Result<DeleteReport> {
    task::spawn_blocking(move || delete_items(&root, &ids))
        .await
        .map_err(|e| GalleryError::Task(e.to_string()))
}

/// Rename on the blocking pool
pub async fn rename_item_async(root: PathBuf, id: String, new_stem: String) -> Result<Item> {
    task::spawn_blocking(move || rename_item(&root, &id, &new_stem))
        .await
        .map_err(|e| GalleryError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn output_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("batch")).unwrap();
        fs::write(dir.path().join("one.png"), b"1").unwrap();
        fs::write(dir.path().join("batch").join("two.png"), b"22").unwrap();
        fs::write(dir.path().join("batch").join("taken.png"), b"333").unwrap();
        dir
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let root = Path::new("/out");
        assert_eq!(resolve(root, "a/b.png").unwrap(), Path::new("/out/a/b.png"));
        assert_eq!(resolve(root, "/a.png").unwrap(), Path::new("/out/a.png"));
        assert!(matches!(resolve(root, "../etc/passwd"), Err(GalleryError::OutsideRoot(_))));
        assert!(matches!(resolve(root, "a/../../x"), Err(GalleryError::OutsideRoot(_))));
        assert!(matches!(resolve(root, ""), Err(GalleryError::OutsideRoot(_))));
    }

    #[test]
    fn test_delete_items_partial_failure() {
        let dir = output_dir();
        let ids = vec![
            "one.png".to_string(),
            "missing.png".to_string(),
            "batch/two.png".to_string(),
        ];

        let report = delete_items(dir.path(), &ids);
        assert_eq!(report.deleted, ["one.png", "batch/two.png"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "missing.png");
        assert!(!dir.path().join("one.png").exists());
        assert!(dir.path().join("batch").join("taken.png").exists());
    }

    #[test]
    fn test_rename_keeps_extension_and_directory() {
        let dir = output_dir();
        let item = rename_item(dir.path(), "batch/two.png", "portrait").unwrap();
        assert_eq!(item.path, "batch/portrait.png");
        assert_eq!(item.name, "portrait.png");
        assert_eq!(item.size, 2);
        assert!(dir.path().join("batch").join("portrait.png").exists());
        assert!(!dir.path().join("batch").join("two.png").exists());
    }

    #[test]
    fn test_rename_refuses_overwrite() {
        let dir = output_dir();
        let result = rename_item(dir.path(), "batch/two.png", "taken");
        assert!(matches!(result, Err(GalleryError::AlreadyExists(_))));
        assert!(dir.path().join("batch").join("two.png").exists());
    }

    #[test]
    fn test_rename_rejects_bad_names() {
        let dir = output_dir();
        for name in ["", "   ", "../up", "a/b", "a\\b", ".."] {
            let result = rename_item(dir.path(), "one.png", name);
            assert!(matches!(result, Err(GalleryError::InvalidName(_))), "{:?}", name);
        }
        assert!(matches!(
            rename_item(dir.path(), "ghost.png", "x"),
            Err(GalleryError::NotFound(_))
        ));
    }
}
