// src/validate.rs
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::RouteError;
use crate::model::{RouteNode, resolve_path};

/// 既知ロールの閉じた集合
///
/// レジストリが与えられた場合、`meta.roles` はこの集合の要素しか参照できない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRegistry {
    roles: BTreeSet<String>,
}

impl RoleRegistry {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RoleRegistry {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// ルートツリーを構造検証する
///
/// - 解決済みフルパスの重複 (redirect 専用ノードは対象外)
/// - `name` の重複
/// - トップレベルの空 path (子の空 path は親と同じ URL を共有し、同じ親の下に 1 つまで)
/// - レジストリがある場合、未知ロールの参照
pub fn validate_routes(
    nodes: &[RouteNode],
    registry: Option<&RoleRegistry>,
) -> Result<(), RouteError> {
    let mut state = Validation {
        registry,
        paths: HashMap::new(),
        names: HashMap::new(),
    };
    for node in nodes {
        state.visit(node, "", 0)?;
    }
    debug!(
        paths = state.paths.len(),
        names = state.names.len(),
        "route tree validated"
    );
    Ok(())
}

/// 固定ルートと動的ルートを 1 つのテーブルとして検証する
pub fn validate_route_sets(
    static_routes: &[RouteNode],
    dynamic_routes: &[RouteNode],
    registry: Option<&RoleRegistry>,
) -> Result<(), RouteError> {
    let mut all = Vec::with_capacity(static_routes.len() + dynamic_routes.len());
    all.extend_from_slice(static_routes);
    all.extend_from_slice(dynamic_routes);
    validate_routes(&all, registry)
}

struct Validation<'a> {
    registry: Option<&'a RoleRegistry>,
    /// 解決済みパス → 最初に定義したノードの path
    paths: HashMap<String, String>,
    /// name → 解決済みパス
    names: HashMap<String, String>,
}

impl Validation<'_> {
    fn visit(&mut self, node: &RouteNode, parent: &str, depth: usize) -> Result<(), RouteError> {
        let full = resolve_path(parent, &node.path);

        if node.path.is_empty() && depth == 0 {
            return Err(RouteError::configuration(
                parent,
                "top-level route has an empty path",
            ));
        }

        if let (Some(registry), Some(roles)) = (self.registry, &node.meta.roles) {
            if let Some(role) = roles.iter().find(|r| !registry.contains(r)) {
                return Err(RouteError::UnknownRole {
                    path: full,
                    role: role.clone(),
                });
            }
        }

        // path が空の子は親と同じ URL を共有する (親との重複は許し、兄弟間の重複は下で検査)
        if !node.is_redirect_only() && !node.path.is_empty() {
            if let Some(first) = self.paths.insert(full.clone(), node.path.clone()) {
                return Err(RouteError::configuration(
                    full,
                    format!("duplicate resolved path (first declared as '{first}')"),
                ));
            }
        }

        if let Some(name) = &node.name {
            if let Some(other) = self.names.insert(name.clone(), full.clone()) {
                return Err(RouteError::configuration(
                    full,
                    format!("duplicate route name '{name}' (also used by '{other}')"),
                ));
            }
        }

        let mut empty_child = false;
        for child in &node.children {
            if child.path.is_empty() && !child.is_redirect_only() {
                if empty_child {
                    return Err(RouteError::configuration(
                        full,
                        "duplicate resolved path (more than one empty-path child)",
                    ));
                }
                empty_child = true;
            }
            self.visit(child, &full, depth + 1)?;
        }
        Ok(())
    }
}
