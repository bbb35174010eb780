//! ルートツリーからサイドバーメニューと breadcrumb を導出する。
//!
//! - [`filter_tree`]: ロールで可視なノードだけを残したメニュー用ツリー (hidden を除く)
//! - [`filter_routes`]: 同じ規則だが hidden を残す、ルーティング用ツリー
//! - [`build_sidebar`]: 子が 1 つだけのグループを畳み込む表示ポリシーを適用
//! - [`breadcrumbs`]: 指定パスまでの breadcrumb

use serde::Serialize;
use tracing::debug;

use crate::model::{Redirect, RoleSet, RouteNode, resolve_path};
use crate::role_filter::is_visible;

/// メニュー表示用にルートツリーをフィルタする
///
/// 深さ優先・帰りがけ順で処理し、兄弟の並び順は保持する。
/// ノードが残る条件:
/// - ロールで可視である
/// - `meta.hidden` が true でない
/// - フィルタ後の子が残っている、元々葉である、または自身のビューを持つ
pub fn filter_tree(nodes: &[RouteNode], active_roles: &RoleSet) -> Vec<RouteNode> {
    let filtered = filter_nodes(nodes, active_roles, Hidden::Drop);
    debug!(
        before = nodes.len(),
        after = filtered.len(),
        roles = ?active_roles,
        "filtered menu tree"
    );
    filtered
}

/// ルーティング用にフィルタする (hidden ノードはメニューに出ないがルーティング可能なので残す)
pub fn filter_routes(nodes: &[RouteNode], active_roles: &RoleSet) -> Vec<RouteNode> {
    filter_nodes(nodes, active_roles, Hidden::Keep)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hidden {
    Keep,
    Drop,
}

fn filter_nodes(nodes: &[RouteNode], roles: &RoleSet, hidden: Hidden) -> Vec<RouteNode> {
    nodes
        .iter()
        .filter_map(|node| filter_node(node, roles, hidden))
        .collect()
}

fn filter_node(node: &RouteNode, roles: &RoleSet, hidden: Hidden) -> Option<RouteNode> {
    if !is_visible(node, roles) {
        return None;
    }
    if node.meta.hidden && hidden == Hidden::Drop {
        return None;
    }

    let children = filter_nodes(&node.children, roles, hidden);

    // 子が全て落ちたグルーピング用コンテナは表示するものが無い
    if !node.children.is_empty() && children.is_empty() && !node.has_view() {
        return None;
    }

    Some(RouteNode {
        path: node.path.clone(),
        name: node.name.clone(),
        component: node.component.clone(),
        redirect: node.redirect.clone(),
        meta: node.meta.clone(),
        children,
    })
}

/// 前順 (pre-order) で全ノードの解決済みパスを列挙する
pub fn resolved_paths(nodes: &[RouteNode]) -> Vec<String> {
    fn walk(nodes: &[RouteNode], parent: &str, out: &mut Vec<String>) {
        for node in nodes {
            let full = resolve_path(parent, &node.path);
            out.push(full.clone());
            walk(&node.children, &full, out);
        }
    }
    let mut out = Vec::new();
    walk(nodes, "", &mut out);
    out
}

/// サイドバーの 1 項目
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// 解決済みパス (外部リンクはそのまま)
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Some ならサブメニュー (子が空のこともある)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuItem>>,
}

impl MenuItem {
    pub fn is_submenu(&self) -> bool {
        self.children.is_some()
    }
}

/// フィルタ済みルートからサイドバー構造を組み立てる
///
/// 表示中の子が 1 つだけで、その子が孫を持たず、`alwaysShow` でもないグループは
/// 親を畳んで子を昇格させる。表示中の子が無いノードは単独項目になる。
pub fn build_sidebar(routes: &[RouteNode]) -> Vec<MenuItem> {
    routes
        .iter()
        .filter_map(|node| sidebar_item(node, ""))
        .collect()
}

fn sidebar_item(node: &RouteNode, base: &str) -> Option<MenuItem> {
    if node.meta.hidden {
        return None;
    }
    let full = resolve_path(base, &node.path);
    let showing: Vec<&RouteNode> = node.children.iter().filter(|c| !c.meta.hidden).collect();

    if !node.meta.always_show {
        match showing.as_slice() {
            [] => return Some(plain_item(node, &full, None)),
            [only] if only.children.is_empty() => {
                let path = resolve_path(&full, &only.path);
                return Some(plain_item(only, &path, node.meta.icon.as_deref()));
            }
            _ => {}
        }
    }

    let children = showing
        .into_iter()
        .filter_map(|child| sidebar_item(child, &full))
        .collect();
    Some(MenuItem {
        title: node.meta.title.clone(),
        icon: node.meta.icon.clone(),
        path: full,
        name: node.name.clone(),
        children: Some(children),
    })
}

fn plain_item(node: &RouteNode, path: &str, fallback_icon: Option<&str>) -> MenuItem {
    MenuItem {
        title: node.meta.title.clone(),
        icon: node
            .meta
            .icon
            .clone()
            .or_else(|| fallback_icon.map(str::to_string)),
        path: path.to_string(),
        name: node.name.clone(),
        children: None,
    }
}

/// breadcrumb の 1 要素
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub title: String,
    pub path: String,
    /// クリック時の遷移先。None ならリンクにしない
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// `target` (解決済みパス) に一致するノードまでの breadcrumb を返す
///
/// タイトルが空、または `meta.breadcrumb` が false のノードは含めない。
/// `noRedirect` のノードと末尾要素はリンクにしない。一致するノードが無ければ空。
pub fn breadcrumbs(routes: &[RouteNode], target: &str) -> Vec<Crumb> {
    let mut chain = Vec::new();
    if !find_chain(routes, "", target, &mut chain) {
        return Vec::new();
    }

    let mut crumbs: Vec<Crumb> = chain
        .into_iter()
        .filter(|(node, _)| !node.meta.title.is_empty() && node.meta.breadcrumb)
        .map(|(node, path)| {
            let link = match &node.redirect {
                Some(Redirect::NoRedirect) => None,
                Some(Redirect::To(to)) => Some(to.clone()),
                None => Some(path.clone()),
            };
            Crumb {
                title: node.meta.title.clone(),
                path,
                link,
            }
        })
        .collect();

    if let Some(last) = crumbs.last_mut() {
        last.link = None;
    }
    crumbs
}

fn find_chain<'a>(
    nodes: &'a [RouteNode],
    parent: &str,
    target: &str,
    chain: &mut Vec<(&'a RouteNode, String)>,
) -> bool {
    for node in nodes {
        let full = resolve_path(parent, &node.path);
        chain.push((node, full.clone()));
        if full == target || find_chain(&node.children, &full, target, chain) {
            return true;
        }
        chain.pop();
    }
    false
}
