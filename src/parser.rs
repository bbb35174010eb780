use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser as SwcParser, StringInput, Syntax, TsConfig};
use swc_ecma_visit::{Visit, VisitWith};
use std::collections::HashMap;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ExportNames, RouteSource};
use crate::error::LoadError;
use crate::model::{Component, Redirect, RoleSet, RouteMeta, RouteNode, LAYOUT};
use crate::resolver::resolve_import_path;

/// 変数参照・import をたどる回数の上限 (循環参照対策。リテラルの入れ子は数えない)
const MAX_DEPTH: usize = 64;

/// モジュール直下の宣言を収集する Visitor
#[derive(Default)]
struct BindingVisitor {
    /// 変数名 → 初期化式 (配列・オブジェクトリテラルのみ)
    bindings: HashMap<String, Expr>,
    /// ローカル名 → (import 指定子, import 元の名前。None は default import)
    imports: HashMap<String, (String, Option<String>)>,
    /// `export default <expr>` の式
    default_export: Option<Expr>,
}

impl Visit for BindingVisitor {
    /// `import nestedRouter from './modules/nested'` のような import を記録する
    fn visit_import_decl(&mut self, import: &ImportDecl) {
        let specifier = import.src.value.to_string();
        for spec in &import.specifiers {
            match spec {
                ImportSpecifier::Default(ImportDefaultSpecifier { local, .. }) => {
                    self.imports
                        .insert(local.sym.to_string(), (specifier.clone(), None));
                }
                ImportSpecifier::Named(ImportNamedSpecifier { local, imported, .. }) => {
                    let imported_name = match imported {
                        Some(ModuleExportName::Ident(ident)) => ident.sym.to_string(),
                        Some(ModuleExportName::Str(s)) => s.value.to_string(),
                        None => local.sym.to_string(),
                    };
                    self.imports.insert(
                        local.sym.to_string(),
                        (specifier.clone(), Some(imported_name)),
                    );
                }
                ImportSpecifier::Namespace(_) => {}
            }
        }
    }

    /// 配列・オブジェクトリテラルで初期化される変数を記録する
    fn visit_var_decl(&mut self, var_decl: &VarDecl) {
        for declarator in &var_decl.decls {
            if let Pat::Ident(BindingIdent { id, .. }) = &declarator.name {
                if let Some(init_expr) = &declarator.init {
                    let init = unwrap_expr(init_expr);
                    if matches!(init, Expr::Array(_) | Expr::Object(_)) {
                        debug!(binding = %id.sym, "route literal binding found");
                        self.bindings.insert(id.sym.to_string(), init.clone());
                    }
                }
            }
        }

        // 子ノードも訪問
        var_decl.visit_children_with(self);
    }

    fn visit_export_default_expr(&mut self, export: &ExportDefaultExpr) {
        self.default_export = Some(unwrap_expr(&export.expr).clone());
    }
}

/// 遅延ロード `() => import('@/views/...')` から import 指定子を取り出す Visitor
#[derive(Default)]
struct ImportFinder {
    specifier: Option<String>,
}

impl Visit for ImportFinder {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if self.specifier.is_none() {
            if let Callee::Import(_) = &call.callee {
                if let Some(arg) = call.args.first() {
                    if let Expr::Lit(Lit::Str(Str { value, .. })) = &*arg.expr {
                        self.specifier = Some(value.to_string());
                    }
                }
            }
        }
        call.visit_children_with(self);
    }
}

/// 括弧や `as const` を剥がした式を返す
fn unwrap_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(ParenExpr { expr, .. }) => unwrap_expr(expr),
        Expr::TsAs(TsAsExpr { expr, .. }) => unwrap_expr(expr),
        Expr::TsConstAssertion(TsConstAssertion { expr, .. }) => unwrap_expr(expr),
        other => other,
    }
}

fn prop_key(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(Str { value, .. }) => Some(value.to_string()),
        _ => None,
    }
}

fn string_value(expr: &Expr) -> Option<String> {
    match unwrap_expr(expr) {
        Expr::Lit(Lit::Str(Str { value, .. })) => Some(value.to_string()),
        _ => None,
    }
}

fn bool_value(expr: &Expr) -> Option<bool> {
    match unwrap_expr(expr) {
        Expr::Lit(Lit::Bool(Bool { value, .. })) => Some(*value),
        _ => None,
    }
}

/// `component` プロパティの値を解釈する
///
/// - 識別子 `Layout` → [`Component::Layout`]
/// - その他の識別子 → その名前をビューとして扱う
/// - `() => import('...')` → import 指定子をビューとして扱う
fn component_value(expr: &Expr) -> Option<Component> {
    match unwrap_expr(expr) {
        Expr::Ident(ident) if &*ident.sym == LAYOUT => Some(Component::Layout),
        Expr::Ident(ident) => Some(Component::View(ident.sym.to_string())),
        other => {
            let mut finder = ImportFinder::default();
            other.visit_with(&mut finder);
            finder.specifier.map(Component::View)
        }
    }
}

/// 1 ファイル分の解析結果と、そこからルートを組み立てるためのコンテキスト
struct ModuleReader<'a> {
    file: PathBuf,
    project_root: &'a Path,
    bindings: BindingVisitor,
}

impl<'a> ModuleReader<'a> {
    fn load(file: &Path, project_root: &'a Path) -> Result<Self, LoadError> {
        let module = parse_module_file(file)?;
        let mut bindings = BindingVisitor::default();
        bindings.visit_module(&module);

        debug!(
            file = %file.display(),
            bindings = bindings.bindings.len(),
            imports = bindings.imports.len(),
            default_export = bindings.default_export.is_some(),
            "module scanned"
        );

        Ok(ModuleReader {
            file: file.to_path_buf(),
            project_root,
            bindings,
        })
    }

    fn invalid(&self, details: impl Into<String>) -> LoadError {
        LoadError::InvalidLiteral {
            path: self.file.clone(),
            details: details.into(),
        }
    }

    /// `export const <name> = [...]` / `export default ...` からルートを取り出す
    fn routes_from_export(
        &self,
        name: Option<&str>,
        depth: usize,
    ) -> Result<Option<Vec<RouteNode>>, LoadError> {
        let expr = match name {
            Some(name) => self.bindings.bindings.get(name),
            None => self.bindings.default_export.as_ref(),
        };
        match expr {
            Some(expr) => self.routes_from_expr(expr, depth).map(Some),
            None => Ok(None),
        }
    }

    fn routes_from_expr(&self, expr: &Expr, depth: usize) -> Result<Vec<RouteNode>, LoadError> {
        if depth > MAX_DEPTH {
            return Err(self.invalid("route references nested too deeply (cycle?)"));
        }
        match unwrap_expr(expr) {
            Expr::Array(arr_lit) => self.routes_from_array(arr_lit, depth),
            Expr::Object(obj_lit) => Ok(vec![self.parse_route_object(obj_lit, depth)?]),
            Expr::Ident(ident) => self.routes_from_ident(&ident.sym, depth + 1),
            _ => Err(self.invalid("expected a route object, an array of routes or a reference")),
        }
    }

    /// 配列リテラルから順番通りにルートを取り出す (スプレッドと変数参照は展開する)
    fn routes_from_array(
        &self,
        arr_lit: &ArrayLit,
        depth: usize,
    ) -> Result<Vec<RouteNode>, LoadError> {
        let mut routes = Vec::new();
        for elem in arr_lit.elems.iter().flatten() {
            routes.extend(self.routes_from_expr(&elem.expr, depth)?);
        }
        Ok(routes)
    }

    /// 識別子をローカル変数、または import 先モジュールの export として解決する
    fn routes_from_ident(&self, name: &str, depth: usize) -> Result<Vec<RouteNode>, LoadError> {
        if let Some(expr) = self.bindings.bindings.get(name) {
            return self.routes_from_expr(expr, depth);
        }

        let Some((specifier, imported)) = self.bindings.imports.get(name) else {
            return Err(self.invalid(format!("unknown route reference '{name}'")));
        };

        let target = resolve_import_path(specifier, &self.file, self.project_root)?.ok_or_else(
            || LoadError::UnresolvedImport {
                path: self.file.clone(),
                specifier: specifier.clone(),
            },
        )?;
        debug!(reference = name, file = %target.display(), "following route import");

        let reader = ModuleReader::load(&target, self.project_root)?;
        reader
            .routes_from_export(imported.as_deref(), depth + 1)?
            .ok_or_else(|| LoadError::MissingExport {
                path: target.clone(),
                binding: imported.clone().unwrap_or_else(|| "default".to_string()),
            })
    }

    /// ObjectLit (例: `{ path: "page", component: () => import("…"), meta: {…} }`) を
    /// RouteNode に変換する
    fn parse_route_object(&self, obj_lit: &ObjectLit, depth: usize) -> Result<RouteNode, LoadError> {
        let mut path: Option<String> = None;
        let mut node = RouteNode::new("");
        // ノード直下に書かれた hidden / alwaysShow (meta より後に書かれることもある)
        let mut hidden = false;
        let mut always_show = false;

        for prop in &obj_lit.props {
            let PropOrSpread::Prop(boxed_prop) = prop else {
                continue;
            };
            let Prop::KeyValue(KeyValueProp { key, value }) = &**boxed_prop else {
                continue;
            };
            let Some(key_name) = prop_key(key) else {
                continue;
            };

            match key_name.as_str() {
                "path" => path = string_value(value),
                "name" => node.name = string_value(value),
                "redirect" => node.redirect = string_value(value).map(Redirect::from),
                "component" => node.component = component_value(value),
                "hidden" => hidden = bool_value(value).unwrap_or(false),
                "alwaysShow" => always_show = bool_value(value).unwrap_or(false),
                "meta" => match unwrap_expr(value) {
                    Expr::Object(meta_obj) => node.meta = self.parse_meta(meta_obj)?,
                    _ => return Err(self.invalid("'meta' must be an object literal")),
                },
                "children" => node.children = self.routes_from_expr(value, depth)?,
                _ => {}
            }
        }

        node.path = path.ok_or_else(|| self.invalid("route object without a string 'path'"))?;
        node.meta.hidden |= hidden;
        node.meta.always_show |= always_show;
        Ok(node)
    }

    fn parse_meta(&self, obj_lit: &ObjectLit) -> Result<RouteMeta, LoadError> {
        let mut meta = RouteMeta::default();
        for prop in &obj_lit.props {
            let PropOrSpread::Prop(boxed_prop) = prop else {
                continue;
            };
            let Prop::KeyValue(KeyValueProp { key, value }) = &**boxed_prop else {
                continue;
            };
            let Some(key_name) = prop_key(key) else {
                continue;
            };

            match key_name.as_str() {
                "title" => meta.title = string_value(value).unwrap_or_default(),
                "icon" => meta.icon = string_value(value),
                "activeMenu" => meta.active_menu = string_value(value),
                "roles" => meta.roles = Some(self.parse_roles(value)?),
                "hidden" => meta.hidden = bool_value(value).unwrap_or(false),
                "alwaysShow" => meta.always_show = bool_value(value).unwrap_or(false),
                "noCache" => meta.no_cache = bool_value(value).unwrap_or(false),
                "affix" => meta.affix = bool_value(value).unwrap_or(false),
                "breadcrumb" => meta.breadcrumb = bool_value(value).unwrap_or(true),
                _ => {}
            }
        }
        Ok(meta)
    }

    fn parse_roles(&self, value: &Expr) -> Result<RoleSet, LoadError> {
        let Expr::Array(arr_lit) = unwrap_expr(value) else {
            return Err(self.invalid("'roles' must be an array of strings"));
        };
        arr_lit
            .elems
            .iter()
            .flatten()
            .map(|elem| {
                string_value(&elem.expr).ok_or_else(|| self.invalid("'roles' must contain only strings"))
            })
            .collect()
    }
}

/// ファイルを TypeScript 構文として AST にパースする
fn parse_module_file(file_path: &Path) -> Result<Module, LoadError> {
    debug!(file = %file_path.display(), "parsing route module");

    let src = fs::read_to_string(file_path).map_err(|source| LoadError::Io {
        path: file_path.to_path_buf(),
        source,
    })?;

    let cm: Lrc<SourceMap> = Default::default();

    let fm = cm.new_source_file(FileName::Real(file_path.to_path_buf()), src);

    // TypeScript 構文でパースする (JS のルート定義もそのまま読める)
    let syntax = Syntax::Typescript(TsConfig {
        tsx: false,
        decorators: true,
        dts: false,
        no_early_errors: true,
        disallow_ambiguous_jsx_like: true,
    });

    let lexer = Lexer::new(
        syntax,
        Default::default(), // es version
        StringInput::from(&*fm),
        None,
    );

    let mut parser = SwcParser::new_from(lexer);

    parser.parse_module().map_err(|e| LoadError::Parse {
        path: file_path.to_path_buf(),
        details: format!("{:?}", e),
    })
}

/// ルーターモジュールから固定ルートと動的ルートを取り出す
///
/// 固定ルートの export は必須。動的ルートの export が無い場合は空として扱う。
pub fn parse_route_module(
    file_path: &Path,
    project_root: &Path,
    exports: &ExportNames,
) -> Result<RouteSource, LoadError> {
    let reader = ModuleReader::load(file_path, project_root)?;

    let constant = reader
        .routes_from_export(Some(&exports.constant), 0)?
        .ok_or_else(|| LoadError::MissingExport {
            path: file_path.to_path_buf(),
            binding: exports.constant.clone(),
        })?;

    let dynamic = match reader.routes_from_export(Some(&exports.dynamic), 0)? {
        Some(routes) => routes,
        None => {
            debug!(binding = %exports.dynamic, "no dynamic routes exported");
            Vec::new()
        }
    };

    debug!(
        file = %file_path.display(),
        constant = constant.len(),
        dynamic = dynamic.len(),
        "route module parsed"
    );

    Ok(RouteSource {
        roles: None,
        constant,
        dynamic,
    })
}
