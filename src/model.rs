// src/model.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// セッションに割り当てられたロールの集合
pub type RoleSet = BTreeSet<String>;

/// breadcrumb 上で「リダイレクトしない」ことを表す番兵文字列
pub const NO_REDIRECT: &str = "noRedirect";

/// レイアウト (グルーピング用コンテナ) を表すコンポーネント名
pub const LAYOUT: &str = "Layout";

/// ルート定義 1 件 (ページ、またはグルーピング用コンテナ)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteNode {
    /// URL セグメント (例: "/permission", "page", "https://example.com")
    pub path: String,

    /// keep-alive のキャッシュキーとして使う一意な名前
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// 描画するコンポーネント。None はコンポーネントを持たないノード
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Redirect>,

    #[serde(default)]
    pub meta: RouteMeta,

    /// 子ルート (並び順 = 表示順)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    pub fn new(path: impl Into<String>) -> Self {
        RouteNode {
            path: path.into(),
            name: None,
            component: None,
            redirect: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.component = Some(component);
        self
    }

    pub fn with_redirect(mut self, redirect: Redirect) -> Self {
        self.redirect = Some(redirect);
        self
    }

    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    /// 自身のビューを持つか (単なるグルーピング用コンテナではないか)
    pub fn has_view(&self) -> bool {
        matches!(self.component, Some(Component::View(_)))
    }

    /// redirect だけを目的としたノードか
    /// 例: `{ path: '*', redirect: '/404', hidden: true }`
    pub fn is_redirect_only(&self) -> bool {
        self.redirect.is_some() && self.component.is_none() && self.children.is_empty()
    }
}

/// ルートに付随するメタ情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    /// サイドバーと breadcrumb に表示する名前
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// 閲覧可能なロール。None または空集合は全ロールに公開
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<RoleSet>,

    /// true ならサイドバーに出さない (ルーティングは可能)
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,

    /// true なら子が 1 つでも親メニューを常に表示する
    #[serde(default, skip_serializing_if = "is_false")]
    pub always_show: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub no_cache: bool,

    /// tags-view に固定表示する
    #[serde(default, skip_serializing_if = "is_false")]
    pub affix: bool,

    /// false なら breadcrumb に出さない
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub breadcrumb: bool,

    /// 指定した path をサイドバー上でハイライトする
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_menu: Option<String>,
}

impl Default for RouteMeta {
    fn default() -> Self {
        RouteMeta {
            title: String::new(),
            icon: None,
            roles: None,
            hidden: false,
            always_show: false,
            no_cache: false,
            affix: false,
            breadcrumb: true,
            active_menu: None,
        }
    }
}

impl RouteMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        RouteMeta {
            title: title.into(),
            ..RouteMeta::default()
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// redirect 先。`"noRedirect"` は番兵として扱う
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Redirect {
    NoRedirect,
    To(String),
}

impl From<String> for Redirect {
    fn from(value: String) -> Self {
        if value == NO_REDIRECT {
            Redirect::NoRedirect
        } else {
            Redirect::To(value)
        }
    }
}

impl From<Redirect> for String {
    fn from(value: Redirect) -> Self {
        match value {
            Redirect::NoRedirect => NO_REDIRECT.to_string(),
            Redirect::To(path) => path,
        }
    }
}

/// ルートが描画するコンポーネント
/// 遅延ロードの詳細は UI 側の関心事なので、ここではモジュール指定子だけを保持する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Component {
    /// 子ルートを包むレイアウト
    Layout,
    /// 実際のビュー (例: "@/views/permission/page")
    View(String),
}

impl From<String> for Component {
    fn from(value: String) -> Self {
        if value == LAYOUT {
            Component::Layout
        } else {
            Component::View(value)
        }
    }
}

impl From<Component> for String {
    fn from(value: Component) -> Self {
        match value {
            Component::Layout => LAYOUT.to_string(),
            Component::View(specifier) => specifier,
        }
    }
}

/// 外部リンク (http://, https://, mailto: など) か
pub fn is_external(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("mailto:")
}

/// 親の解決済みパスに子の path を連結する
///
/// - 子が `/` で始まる場合は絶対パスとしてそのまま使う
/// - 子が外部リンクの場合もそのまま使う
/// - それ以外は `parent/child` に連結し、重複したスラッシュを除く
pub fn resolve_path(parent: &str, child: &str) -> String {
    if child.starts_with('/') || is_external(child) {
        return child.to_string();
    }
    if parent.is_empty() {
        return child.to_string();
    }
    if child.is_empty() {
        return parent.to_string();
    }
    format!("{}/{}", parent.trim_end_matches('/'), child)
}
