//! File discovery for the declarative apply engine. Deliberately simpler than
//! `db::sql_executor::discover_sql_files_ordered`, which layers in migration-directory
//! heuristics (`init`/`migrate` ordering, numeric prefixes) that don't apply here: a
//! declarative root is just "every `.sql` file under this path", sorted by path.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Discovers every `.sql` file under `root`. If `root` is itself a file, returns just that file.
/// Order is full path, case-insensitive byte order, with paths normalized to forward slashes
/// relative to `root` (or to `root`'s parent, when `root` is a single file).
pub fn discover_sql_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        anyhow::bail!("path does not exist: {}", root.display());
    }

    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    collect_recursive(root, &mut files)
        .with_context(|| format!("scanning {} for .sql files", root.display()))?;

    files.sort_by_key(|p| relative_sort_key(root, p));
    Ok(files)
}

fn collect_recursive(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_recursive(&path, out)?;
        } else if file_type.is_file() && path.extension().is_some_and(|e| e == "sql") {
            out.push(path);
        }
    }
    Ok(())
}

fn relative_sort_key(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/").to_lowercase()
}
