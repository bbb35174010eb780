use path_absolutize::Absolutize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// 拡張子を省略した import で試す拡張子
const EXTENSIONS: [&str; 2] = ["js", "ts"];

/// ルート定義ファイル中の import 指定子を実ファイルに解決する関数。
///
/// - `specifier`: import 文の指定子 (例: "./modules/nested", "@/router/modules/table")
/// - `importing_file`: その import を書いているファイル (例: `/proj/src/router/index.js`)
/// - `project_root`: フロントエンドのプロジェクトルート。`@/` は `<project_root>/src` を指す
///
/// 戻り値:
/// - Ok(Some(path)) → 見つかったファイルの絶対パス
/// - Ok(None)       → 相対パスでも `@/` でもない (npm パッケージなど)、または見つからなかった
pub fn resolve_import_path(
    specifier: &str,
    importing_file: &Path,
    project_root: &Path,
) -> Result<Option<PathBuf>, LoadError> {
    // 1) 指定子の種類から基準ディレクトリを決める
    let candidate_base = if let Some(rest) = specifier.strip_prefix("@/") {
        project_root.join("src").join(rest)
    } else if specifier.starts_with("./") || specifier.starts_with("../") {
        let parent_dir = importing_file.parent().unwrap_or_else(|| Path::new("."));
        parent_dir.join(specifier)
    } else {
        return Ok(None);
    };

    // 2) 典型的なファイル名パターンを列挙
    let mut candidates: Vec<PathBuf> = Vec::new();

    // A) 拡張子付きで書かれていればそのまま
    if candidate_base.extension().is_some_and(|ext| EXTENSIONS.iter().any(|e| ext == *e)) {
        candidates.push(candidate_base.clone());
    }

    // B) nested → nested.js / nested.ts
    for ext in EXTENSIONS {
        let mut file = candidate_base.clone().into_os_string();
        file.push(".");
        file.push(ext);
        candidates.push(PathBuf::from(file));
    }

    // C) ディレクトリなら index.js / index.ts
    for ext in EXTENSIONS {
        candidates.push(candidate_base.join(format!("index.{ext}")));
    }

    // 3) 列挙した候補を絶対パス化し、最初に存在するファイルを返却
    for cand in candidates {
        let abs = cand
            .absolutize()
            .map_err(|source| LoadError::Io {
                path: cand.clone(),
                source,
            })?
            .to_path_buf();
        if fs::metadata(&abs).map(|m| m.is_file()).unwrap_or(false) {
            return Ok(Some(abs));
        }
    }

    // 4) どれにも該当しなければ None
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/admin")
    }

    #[test]
    fn resolves_relative_module_without_extension() {
        let root = fixture_root();
        let index = root.join("src/router/index.js");
        let resolved = resolve_import_path("./modules/nested", &index, &root)
            .unwrap()
            .unwrap();
        assert!(resolved.ends_with("src/router/modules/nested.js"));
    }

    #[test]
    fn resolves_alias_to_src() {
        let root = fixture_root();
        let index = root.join("src/router/index.js");
        let resolved = resolve_import_path("@/router/modules/nested", &index, &root)
            .unwrap()
            .unwrap();
        assert!(resolved.ends_with("src/router/modules/nested.js"));
    }

    #[test]
    fn package_imports_are_not_resolved() {
        let root = fixture_root();
        let index = root.join("src/router/index.js");
        assert_eq!(resolve_import_path("vue-router", &index, &root).unwrap(), None);
        assert_eq!(
            resolve_import_path("./modules/missing", &index, &root).unwrap(),
            None
        );
    }
}
