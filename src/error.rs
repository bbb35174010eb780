//! ルート定義の読み込み・検証で発生するエラー型。

use std::path::PathBuf;
use thiserror::Error;

/// ルートツリーの構造検証エラー
///
/// どちらのエラーも発生した操作だけを失敗させ、既存のルートテーブルは変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// 不正または重複したルート定義
    #[error("invalid route configuration at '{path}': {reason}")]
    Configuration { path: String, reason: String },

    /// 閉じたロールレジストリに存在しないロールを参照している
    #[error("route '{path}' references unknown role '{role}'")]
    UnknownRole { path: String, role: String },
}

impl RouteError {
    pub(crate) fn configuration(path: impl Into<String>, reason: impl Into<String>) -> Self {
        RouteError::Configuration {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// ルート定義ファイルの読み込みエラー
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON route config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse {path}: {details}")]
    Parse { path: PathBuf, details: String },

    /// JS/TS ソース中のルートリテラルが解釈できない
    #[error("{path}: {details}")]
    InvalidLiteral { path: PathBuf, details: String },

    #[error("{path}: cannot resolve import '{specifier}'")]
    UnresolvedImport { path: PathBuf, specifier: String },

    #[error("{path}: export '{binding}' not found")]
    MissingExport { path: PathBuf, binding: String },

    #[error("unsupported route source {path} (expected .json, .js or .ts)")]
    UnsupportedSource { path: PathBuf },

    #[error("no router definition found under {root}")]
    NoRouterFound { root: PathBuf },

    #[error(transparent)]
    Route(#[from] RouteError),
}
