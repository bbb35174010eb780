// src/role_filter.rs
use crate::model::{RoleSet, RouteNode};

/// ノードが指定ロールに対して可視か判定する
///
/// - `meta.roles` が無い、または空なら公開ノードとして true
/// - `meta.roles` と `active_roles` の積集合が空でなければ true
/// - それ以外は false
pub fn is_visible(node: &RouteNode, active_roles: &RoleSet) -> bool {
    match &node.meta.roles {
        None => true,
        Some(required) if required.is_empty() => true,
        Some(required) => !required.is_disjoint(active_roles),
    }
}
