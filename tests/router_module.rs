//! vue-router 形式のルーターモジュール読み込みとメニュー導出の結合テスト。

use std::path::{Path, PathBuf};

use route_menu::discover::find_router_module;
use route_menu::menu::resolved_paths;
use route_menu::{
    Component, ExportNames, LoadError, Redirect, RoleSet, RouterFacade, breadcrumbs,
    build_sidebar, filter_tree, load_route_source,
};

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/admin")
}

fn roles(names: &[&str]) -> RoleSet {
    names.iter().map(|s| s.to_string()).collect()
}

/// 一時ディレクトリに `src/router/index.js` を書き出し、プロジェクトルートを返す
fn write_router_module(name: &str, source: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("route_menu_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    let router_dir = root.join("src/router");
    std::fs::create_dir_all(&router_dir).unwrap();
    std::fs::write(router_dir.join("index.js"), source).unwrap();
    root
}

fn load_fixture() -> route_menu::RouteSource {
    let root = fixture_root();
    let index = find_router_module(&root).expect("router module should be found");
    load_route_source(&index, &root, &ExportNames::default()).expect("fixture should parse")
}

#[test]
fn parses_constant_and_async_exports() {
    let source = load_fixture();

    let constant: Vec<_> = source.constant.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(constant, ["/redirect", "/login", "/404", "/", "/guide"]);

    let dynamic: Vec<_> = source.dynamic.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(dynamic, ["/permission", "/example", "/nested", "*"]);
}

#[test]
fn node_level_flags_are_folded_into_meta() {
    let source = load_fixture();

    assert!(source.constant[0].meta.hidden);
    assert_eq!(source.constant[0].component, Some(Component::Layout));
    assert_eq!(
        source.constant[1].component,
        Some(Component::View("@/views/login/index".to_string()))
    );

    let permission = &source.dynamic[0];
    assert!(permission.meta.always_show);
    assert_eq!(permission.name.as_deref(), Some("Permission"));
    assert_eq!(permission.meta.roles, Some(roles(&["admin", "editor"])));
    assert_eq!(permission.children.len(), 3);

    let charts = &source.dynamic[1].children[0];
    assert_eq!(charts.redirect, Some(Redirect::NoRedirect));

    let edit = &source.dynamic[1].children[1];
    assert_eq!(edit.path, r"edit/:id(\d+)");
    assert!(edit.meta.hidden);
    assert_eq!(edit.meta.active_menu.as_deref(), Some("/example/list"));

    let catch_all = &source.dynamic[3];
    assert!(catch_all.is_redirect_only());
}

#[test]
fn imported_route_module_is_inlined() {
    let source = load_fixture();
    let nested = &source.dynamic[2];

    assert_eq!(nested.name.as_deref(), Some("Nested"));
    assert_eq!(nested.component, Some(Component::Layout));
    let paths = resolved_paths(std::slice::from_ref(nested));
    assert_eq!(
        paths,
        [
            "/nested",
            "/nested/menu1",
            "/nested/menu1/menu1-1",
            "/nested/menu1/menu1-2",
            "/nested/menu2"
        ]
    );
}

#[test]
fn fixture_passes_validation() {
    let source = load_fixture();
    assert!(source.validate(None).is_ok());
}

#[test]
fn editor_sidebar_matches_collapse_policy() {
    let source = load_fixture();
    let editor = roles(&["editor"]);
    let router = RouterFacade::new(source.constant, None).unwrap();
    router.apply_roles(&source.dynamic, &editor).unwrap();

    let table = router.current_routes();
    let menu = build_sidebar(&filter_tree(table.routes(), &editor));
    let top: Vec<_> = menu.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(
        top,
        ["/dashboard", "/guide/index", "/permission", "/example", "/nested"]
    );

    // alwaysShow のグループは子が 1 つでも畳まない
    let permission = menu[2].children.as_ref().unwrap();
    let permission_paths: Vec<_> = permission.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(permission_paths, ["/permission/directive"]);

    let example = menu[3].children.as_ref().unwrap();
    let example_paths: Vec<_> = example.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(
        example_paths,
        [
            "/charts/line",
            "/example/list",
            "/zip",
            "https://github.com/PanJiaChen/vue-element-admin"
        ]
    );
    assert!(example[2].is_submenu());

    let nested = menu[4].children.as_ref().unwrap();
    let nested_paths: Vec<_> = nested.iter().map(|m| m.path.as_str()).collect();
    assert_eq!(nested_paths, ["/nested/menu1/menu1-1", "/nested/menu2"]);
}

#[test]
fn hidden_routes_stay_routable_for_editor() {
    let source = load_fixture();
    let router = RouterFacade::new(source.constant, None).unwrap();
    router.apply_roles(&source.dynamic, &roles(&["editor"])).unwrap();

    let paths = resolved_paths(router.current_routes().routes());
    assert!(paths.iter().any(|p| p == r"/example/edit/:id(\d+)"));
    assert!(paths.iter().any(|p| p == "*"));
    assert!(!paths.iter().any(|p| p == "/permission/page"));
    assert!(!paths.iter().any(|p| p == "/nested/menu1/menu1-2"));
}

#[test]
fn breadcrumbs_through_absolute_child() {
    let source = load_fixture();
    let router = RouterFacade::new(source.constant, None).unwrap();
    router.apply_roles(&source.dynamic, &roles(&["admin"])).unwrap();

    let crumbs = breadcrumbs(router.current_routes().routes(), "/charts/line");
    let titles: Vec<_> = crumbs.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["example", "charts", "lineChart"]);
    assert_eq!(crumbs[0].link.as_deref(), Some("/example/list"));
    assert_eq!(crumbs[1].link, None);
    assert_eq!(crumbs[2].link, None);
}

#[test]
fn missing_export_is_reported() {
    let root = fixture_root();
    let index = root.join("src/router/index.js");
    let exports = ExportNames {
        constant: "baseRoutes".to_string(),
        ..ExportNames::default()
    };
    let err = load_route_source(&index, &root, &exports).unwrap_err();
    assert!(matches!(err, LoadError::MissingExport { ref binding, .. } if binding == "baseRoutes"));
}

#[test]
fn deeply_nested_literal_tree_is_accepted() {
    // 参照をたどらない入れ子は循環しえないので、深さ上限の対象にならない
    const LEVELS: usize = 80;
    let mut tree = String::from("{ path: 'leaf' }");
    for level in (0..LEVELS).rev() {
        let path = if level == 0 { "/l0".to_string() } else { format!("l{level}") };
        tree = format!("{{ path: '{path}', children: [{tree}] }}");
    }
    let module = format!("export const constantRoutes = [{tree}]\nexport const asyncRoutes = []\n");
    let root = write_router_module("deep", &module);

    let source = load_route_source(&root.join("src/router/index.js"), &root, &ExportNames::default())
        .expect("deep literal tree should parse");
    let paths = resolved_paths(&source.constant);
    assert_eq!(paths.len(), LEVELS + 1);
    assert!(paths.last().unwrap().ends_with("/l79/leaf"));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn cyclic_route_references_are_rejected() {
    let module = "const a = [...b]\nconst b = [...a]\nexport const constantRoutes = [...a]\nexport const asyncRoutes = []\n";
    let root = write_router_module("cycle", module);

    let err = load_route_source(&root.join("src/router/index.js"), &root, &ExportNames::default())
        .unwrap_err();
    assert!(matches!(err, LoadError::InvalidLiteral { .. }));
    let _ = std::fs::remove_dir_all(&root);
}
