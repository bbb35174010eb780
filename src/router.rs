//! アクティブなルートテーブルを保持するルーターファサード。
//!
//! 固定ルート (constant routes) はプロセス全体で不変。ロールで絞り込んだ動的ルートは
//! セッションのロールが変わるたびに丸ごと作り直し、検証後に 1 回の `ArcSwap::store`
//! で公開する。読み手は常に完成したテーブルのスナップショットだけを見る。

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{info, warn};

use crate::error::RouteError;
use crate::menu::filter_routes;
use crate::model::{RoleSet, RouteNode};
use crate::validate::{RoleRegistry, validate_route_sets, validate_routes};

/// 固定ルート + 動的ルートをマージしたテーブル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteNode>,
    static_len: usize,
}

impl RouteTable {
    fn merge(static_routes: &[RouteNode], dynamic: Vec<RouteNode>) -> Self {
        let mut routes = Vec::with_capacity(static_routes.len() + dynamic.len());
        routes.extend_from_slice(static_routes);
        routes.extend(dynamic);
        RouteTable {
            routes,
            static_len: static_routes.len(),
        }
    }

    /// マージ済みの全ルート (固定ルートが先、動的ルートが後)
    pub fn routes(&self) -> &[RouteNode] {
        &self.routes
    }

    pub fn static_routes(&self) -> &[RouteNode] {
        &self.routes[..self.static_len]
    }

    pub fn dynamic_routes(&self) -> &[RouteNode] {
        &self.routes[self.static_len..]
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Debug)]
pub struct RouterFacade {
    static_routes: Arc<[RouteNode]>,
    registry: Option<RoleRegistry>,
    table: ArcSwap<RouteTable>,
}

impl RouterFacade {
    /// 固定ルートを検証してファサードを作る。初期状態では動的ルートは空
    pub fn new(
        static_routes: Vec<RouteNode>,
        registry: Option<RoleRegistry>,
    ) -> Result<Self, RouteError> {
        validate_routes(&static_routes, registry.as_ref())?;
        let table = RouteTable::merge(&static_routes, Vec::new());
        info!(static_routes = static_routes.len(), "router initialised");
        Ok(RouterFacade {
            static_routes: static_routes.into(),
            registry,
            table: ArcSwap::from_pointee(table),
        })
    }

    /// 現在公開中のルートテーブル
    pub fn current_routes(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }

    pub fn static_routes(&self) -> &[RouteNode] {
        &self.static_routes
    }

    /// 動的ルートを差し替える
    ///
    /// 新しいテーブルを完成させて検証してから公開する。検証に失敗した場合は
    /// エラーを返し、直前のテーブルはそのまま残る。
    pub fn reset_routes(&self, new_dynamic: Vec<RouteNode>) -> Result<(), RouteError> {
        let candidate = RouteTable::merge(&self.static_routes, new_dynamic);
        if let Err(err) = validate_routes(candidate.routes(), self.registry.as_ref()) {
            warn!(error = %err, "rejected route table replacement");
            return Err(err);
        }
        let dynamic = candidate.dynamic_routes().len();
        self.table.store(Arc::new(candidate));
        info!(dynamic_routes = dynamic, "route table replaced");
        Ok(())
    }

    /// ロール集合で動的ルートを絞り込み、その結果でテーブルを差し替える
    ///
    /// 絞り込む前の定義全体を先に検証するので、不正な定義はロールに関係なく拒否される。
    pub fn apply_roles(
        &self,
        dynamic_source: &[RouteNode],
        roles: &RoleSet,
    ) -> Result<(), RouteError> {
        if let Err(err) =
            validate_route_sets(&self.static_routes, dynamic_source, self.registry.as_ref())
        {
            warn!(error = %err, "rejected dynamic route source");
            return Err(err);
        }
        let accessible = filter_routes(dynamic_source, roles);
        self.reset_routes(accessible)
    }

    /// ログアウト時など、固定ルートだけの状態に戻す
    pub fn clear_dynamic(&self) {
        let table = RouteTable::merge(&self.static_routes, Vec::new());
        self.table.store(Arc::new(table));
        info!("dynamic routes cleared");
    }
}
