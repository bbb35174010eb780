use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::error::LoadError;

/// 探索しないディレクトリ
const SKIPPED_DIRS: [&str; 4] = ["node_modules", "dist", ".git", "target"];

/// フロントエンドプロジェクト内のメインルーター定義を探す
///
/// `router/index.{js,ts}` を優先し、無ければ `router.{js,ts}` / `routes.{js,ts}` を候補にする。
/// 候補が複数ある場合はパスが最も浅いもの (同じ深さなら辞書順で先) を返す。
pub fn find_router_module(project_root: &Path) -> Result<PathBuf, LoadError> {
    let mut preferred: Vec<PathBuf> = Vec::new();
    let mut fallback: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(project_root)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        let Some(fname) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let in_router_dir = path
            .parent()
            .and_then(|p| p.file_name())
            .is_some_and(|d| d == "router");

        match fname {
            "index.js" | "index.ts" if in_router_dir => preferred.push(path.to_path_buf()),
            "router.js" | "router.ts" | "routes.js" | "routes.ts" => {
                fallback.push(path.to_path_buf())
            }
            _ => {}
        }
    }

    let mut candidates = if preferred.is_empty() { fallback } else { preferred };
    candidates.sort_by_key(|p| (p.components().count(), p.clone()));
    debug!(candidates = candidates.len(), root = %project_root.display(), "router candidates");

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| LoadError::NoRouterFound {
            root: project_root.to_path_buf(),
        })
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_router_index_in_fixture() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/admin");
        let found = find_router_module(&root).unwrap();
        assert!(found.ends_with("src/router/index.js"));
    }

    #[test]
    fn reports_missing_router() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("src");
        assert!(matches!(
            find_router_module(&root),
            Err(LoadError::NoRouterFound { .. })
        ));
    }
}
