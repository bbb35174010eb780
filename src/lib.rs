//! ロール別にフィルタしたルートツリーから管理画面のナビゲーションメニューを導出するライブラリ。
//!
//! 固定ルートとロールで絞り込む動的ルートを読み込み、構造検証したうえで
//! [`RouterFacade`] が原子的に差し替えて公開する。サイドバーと breadcrumb は
//! [`menu`] モジュールが公開中のテーブルから組み立てる。

pub mod config;
pub mod discover;
pub mod error;
pub mod menu;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod role_filter;
pub mod router;
pub mod validate;

pub use config::{ExportNames, RouteSource, load_route_source};
pub use error::{LoadError, RouteError};
pub use menu::{Crumb, MenuItem, breadcrumbs, build_sidebar, filter_routes, filter_tree};
pub use model::{Component, Redirect, RoleSet, RouteMeta, RouteNode};
pub use role_filter::is_visible;
pub use router::{RouteTable, RouterFacade};
pub use validate::{RoleRegistry, validate_route_sets, validate_routes};
