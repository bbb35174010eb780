//! ルート定義の読み込み。
//!
//! JSON 設定ファイル、または JS/TS のルーターモジュールから固定ルートと動的ルートを
//! 読み込む。JSON の形式:
//!
//! ```json
//! {
//!   "roles": ["admin", "editor"],
//!   "constantRoutes": [ { "path": "/login", "meta": { "hidden": true } } ],
//!   "asyncRoutes": [ { "path": "/permission", "meta": { "roles": ["admin"] } } ]
//! }
//! ```
//!
//! `roles` がある場合は閉じたロールレジストリとして扱う。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{LoadError, RouteError};
use crate::model::RouteNode;
use crate::parser::parse_route_module;
use crate::validate::{RoleRegistry, validate_route_sets};

/// ルーターモジュールで探す export 名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNames {
    pub constant: String,
    pub dynamic: String,
}

impl Default for ExportNames {
    fn default() -> Self {
        ExportNames {
            constant: "constantRoutes".to_string(),
            dynamic: "asyncRoutes".to_string(),
        }
    }
}

/// 読み込んだルート定義一式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSource {
    /// 既知ロールの一覧。None ならロール名を制限しない
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    /// 全ロールに公開する固定ルート
    #[serde(default, rename = "constantRoutes")]
    pub constant: Vec<RouteNode>,

    /// ロールで絞り込む動的ルート
    #[serde(default, rename = "asyncRoutes")]
    pub dynamic: Vec<RouteNode>,
}

impl RouteSource {
    pub fn registry(&self) -> Option<RoleRegistry> {
        self.roles.as_ref().map(RoleRegistry::new)
    }

    /// 固定ルートと動的ルートを合わせた状態で構造検証する
    pub fn validate(&self, registry: Option<&RoleRegistry>) -> Result<(), RouteError> {
        validate_route_sets(&self.constant, &self.dynamic, registry)
    }
}

/// 拡張子に応じてルート定義を読み込む
///
/// - `.json` → [`RouteSource`] としてデシリアライズ
/// - `.js` / `.ts` → swc で解析 (`project_root` は `@/` の解決に使う)
pub fn load_route_source(
    path: &Path,
    project_root: &Path,
    exports: &ExportNames,
) -> Result<RouteSource, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let source = match ext {
        "json" => {
            let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str::<RouteSource>(&text).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })?
        }
        "js" | "ts" | "mjs" => parse_route_module(path, project_root, exports)?,
        _ => {
            return Err(LoadError::UnsupportedSource {
                path: path.to_path_buf(),
            });
        }
    };

    info!(
        file = %path.display(),
        constant = source.constant.len(),
        dynamic = source.dynamic.len(),
        closed_registry = source.roles.is_some(),
        "route source loaded"
    );
    Ok(source)
}
