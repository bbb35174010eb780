// src/main.rs

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use route_menu::discover::find_router_module;
use route_menu::{
    ExportNames, RoleRegistry, RoleSet, RouterFacade, breadcrumbs, build_sidebar, filter_tree,
    load_route_source,
};

/// 出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// ロールで絞り込んだルートテーブル
    Routes,
    /// サイドバーメニュー
    Menu,
    /// `--target` までの breadcrumb
    Breadcrumbs,
}

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "route-menu",
    version = "0.1.0",
    about = "ルート定義をロールで絞り込み、ルートテーブル・サイドバーメニュー・breadcrumb を JSON 出力する CLI ツール"
)]
struct Cli {
    /// ルート定義ファイル (.json / .js / .ts)
    /// 例: `--routes ./routes.json`
    #[arg(
        short = 'f',
        long = "routes",
        value_name = "FILE",
        required_unless_present = "project_root"
    )]
    routes: Option<PathBuf>,

    /// フロントエンドプロジェクトのルート (`@/` の解決と router/index.js の探索に使う)
    #[arg(short = 'r', long = "project-root", value_name = "DIR")]
    project_root: Option<PathBuf>,

    /// セッションのロール (複数指定またはカンマ区切り)
    #[arg(long = "role", value_name = "ROLE", value_delimiter = ',')]
    roles: Vec<String>,

    /// 既知ロールの一覧。指定すると未知ロールを参照するルートをエラーにする
    #[arg(long = "registry", value_name = "ROLE", value_delimiter = ',')]
    registry: Option<Vec<String>>,

    #[arg(short = 'o', long = "output", value_enum, default_value_t = Output::Menu)]
    output: Output,

    /// breadcrumb を求める解決済みパス (例: `/example/list`)
    #[arg(long = "target", value_name = "PATH", required_if_eq("output", "breadcrumbs"))]
    target: Option<String>,

    #[arg(long = "constant-export", default_value = "constantRoutes")]
    constant_export: String,

    #[arg(long = "dynamic-export", default_value = "asyncRoutes")]
    dynamic_export: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // 1) CLI 引数をパースし、プロジェクトルートを絶対パス化
    let cli = Cli::parse();
    let project_dir = match &cli.project_root {
        Some(dir) => dir.canonicalize()?,
        None => std::env::current_dir()?,
    };

    // 2) ルート定義ファイルを決める (未指定ならプロジェクト内の router/index.js を探す)
    let routes_path = match &cli.routes {
        Some(path) => path.clone(),
        None => find_router_module(&project_dir)?,
    };
    info!(file = %routes_path.display(), "using route definitions");

    // 3) 読み込みと検証
    let exports = ExportNames {
        constant: cli.constant_export.clone(),
        dynamic: cli.dynamic_export.clone(),
    };
    let source = load_route_source(&routes_path, &project_dir, &exports)?;
    let registry = match &cli.registry {
        Some(roles) => Some(RoleRegistry::new(roles)),
        None => source.registry(),
    };
    source.validate(registry.as_ref())?;

    // 4) セッションのロールで動的ルートを絞り込み、ルーターに公開
    let roles: RoleSet = cli.roles.iter().cloned().collect();
    let router = RouterFacade::new(source.constant, registry)?;
    router.apply_roles(&source.dynamic, &roles)?;
    let table = router.current_routes();

    // 5) 指定された形式で JSON 化して標準出力
    let json = match cli.output {
        Output::Routes => serde_json::to_string_pretty(table.routes())?,
        Output::Menu => {
            let menu = build_sidebar(&filter_tree(table.routes(), &roles));
            serde_json::to_string_pretty(&menu)?
        }
        Output::Breadcrumbs => {
            let target = cli.target.as_deref().unwrap_or("/");
            serde_json::to_string_pretty(&breadcrumbs(table.routes(), target))?
        }
    };
    println!("{}", json);

    Ok(())
}

/// ログは標準エラーへ出し、標準出力は JSON だけにする
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
