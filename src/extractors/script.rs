//! Price lookup inside inline <script> blocks
//!
//! Scripts are tried as plain JSON first, then parsed as JavaScript so that
//! object literals in `var x = {...}` / `window.x = {...}` statements can be
//! searched, then scanned for `{...}` JSON fragments, and finally matched
//! against a `price: 12.34` pattern.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use swc_common::{sync::Lrc, FileName, SourceMap};
use swc_ecma_ast::*;
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax};

use super::page::Page;
use super::price::parse_price_text;
use super::structured::json_price;

/// Deepest bracket nesting handed to the JavaScript parser and walked in
/// parsed values
const MAX_NESTING: usize = 64;

/// Longest script body handed to the JavaScript parser
const MAX_AST_SOURCE_LEN: usize = 1 << 20;

static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{[^{}]*"price"[^{}]*\}"#).expect("valid JSON object pattern"));

static PRICE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)["']?price["']?\s*[:=]\s*["']?(\d+(?:[.,]\d+)?)"#).expect("valid price pattern")
});

/// Price from the first inline script mentioning a product or price
pub fn script_price(page: &Page) -> Option<f64> {
    page.select("script").into_iter().find_map(|element| {
        let body = element.text().collect::<String>();
        let lower = body.to_lowercase();
        if !lower.contains("product") && !lower.contains("price") {
            return None;
        }
        price_in_script(&body)
    })
}

fn price_in_script(body: &str) -> Option<f64> {
    let trimmed = body.trim();

    if let Ok(json) = serde_json::from_str::<Value>(trimmed) {
        if let Some(price) = find_price_key(&json) {
            return Some(price);
        }
    }

    if fits_ast_parser(trimmed) {
        if let Some(price) = parse_js_literals(trimmed)
            .iter()
            .find_map(find_price_key)
        {
            return Some(price);
        }
    } else {
        log::debug!("script too large or deeply nested for the JavaScript parser");
    }

    if let Some(price) = JSON_OBJECT
        .find_iter(trimmed)
        .filter_map(|m| serde_json::from_str::<Value>(m.as_str()).ok())
        .find_map(|v| find_price_key(&v))
    {
        return Some(price);
    }

    PRICE_TOKEN
        .captures_iter(trimmed)
        .find_map(|cap| parse_price_text(cap.get(1)?.as_str()))
}

/// Depth-first search for a usable `"price"` key.
/// Zero prices in script state are placeholders and are skipped.
/// Values nested deeper than `MAX_NESTING` are not searched.
pub fn find_price_key(value: &Value) -> Option<f64> {
    find_price_key_within(value, MAX_NESTING)
}

fn find_price_key_within(value: &Value, depth: usize) -> Option<f64> {
    let depth = depth.checked_sub(1)?;
    match value {
        Value::Object(map) => {
            if let Some(price) = map.get("price").and_then(json_price).filter(|p| *p > 0.0) {
                return Some(price);
            }
            map.values().find_map(|v| find_price_key_within(v, depth))
        }
        Value::Array(items) => items.iter().find_map(|v| find_price_key_within(v, depth)),
        _ => None,
    }
}

/// Whether `source` is small and shallow enough for the recursive-descent
/// JavaScript parser. Brackets inside strings are counted too.
fn fits_ast_parser(source: &str) -> bool {
    if source.len() > MAX_AST_SOURCE_LEN {
        return false;
    }
    let mut depth = 0usize;
    for c in source.chars() {
        match c {
            '{' | '[' | '(' => {
                depth += 1;
                if depth > MAX_NESTING {
                    return false;
                }
            }
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    true
}

/// Literal values assigned at the top level of a script
fn parse_js_literals(source: &str) -> Vec<Value> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon.into(), source.to_string());

    let lexer = Lexer::new(
        Syntax::Es(Default::default()),
        Default::default(),
        StringInput::from(&*fm),
        None,
    );

    let mut parser = Parser::new_from(lexer);

    // JS in HTML often has issues
    let script = match parser.parse_script() {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    let mut values = Vec::new();
    for stmt in &script.body {
        match stmt {
            Stmt::Decl(Decl::Var(var_decl)) => {
                values.extend(
                    var_decl
                        .decls
                        .iter()
                        .filter_map(|decl| decl.init.as_deref())
                        .filter_map(|init| expr_to_json(init, MAX_NESTING)),
                );
            }
            Stmt::Expr(expr_stmt) => {
                if let Expr::Assign(assign) = &*expr_stmt.expr {
                    values.extend(expr_to_json(&assign.right, MAX_NESTING));
                }
            }
            _ => {}
        }
    }
    values
}

/// Convert a JavaScript literal expression to a JSON value, giving up below
/// `depth` levels of nesting
fn expr_to_json(expr: &Expr, depth: usize) -> Option<Value> {
    let depth = depth.checked_sub(1)?;
    match expr {
        Expr::Lit(Lit::Str(s)) => Some(Value::String(s.value.as_str().unwrap_or("").to_string())),

        Expr::Lit(Lit::Num(n)) => serde_json::Number::from_f64(n.value).map(Value::Number),

        Expr::Lit(Lit::Bool(b)) => Some(Value::Bool(b.value)),

        Expr::Lit(Lit::Null(_)) => Some(Value::Null),

        Expr::Object(obj) => {
            let mut map = serde_json::Map::new();
            for prop in &obj.props {
                if let PropOrSpread::Prop(prop) = prop {
                    if let Prop::KeyValue(kv) = &**prop {
                        // Unconvertible members are skipped so that one
                        // function-valued property does not hide the rest.
                        if let (Some(key), Some(value)) =
                            (prop_name_to_string(&kv.key), expr_to_json(&kv.value, depth))
                        {
                            map.insert(key, value);
                        }
                    }
                }
            }
            Some(Value::Object(map))
        }

        Expr::Array(arr) => Some(Value::Array(
            arr.elems
                .iter()
                .map(|elem| match elem {
                    Some(ExprOrSpread { expr, .. }) => expr_to_json(expr, depth).unwrap_or(Value::Null),
                    None => Value::Null,
                })
                .collect(),
        )),

        // JSON.parse('...')
        Expr::Call(call) if is_json_parse_call(call) => {
            let ExprOrSpread { expr: arg, .. } = call.args.first()?;
            match &**arg {
                Expr::Lit(Lit::Str(s)) => serde_json::from_str(s.value.as_str()?).ok(),
                _ => None,
            }
        }

        Expr::Paren(paren) => expr_to_json(&paren.expr, depth),

        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
            .quasis
            .first()
            .map(|quasi| Value::String(quasi.raw.as_str().to_string())),

        _ => None,
    }
}

fn is_json_parse_call(call: &CallExpr) -> bool {
    if let Callee::Expr(expr) = &call.callee {
        if let Expr::Member(member) = &**expr {
            if let Expr::Ident(obj) = &*member.obj {
                if obj.sym.as_ref() == "JSON" {
                    if let MemberProp::Ident(prop) = &member.prop {
                        return prop.sym.as_ref() == "parse";
                    }
                }
            }
        }
    }
    false
}

fn prop_name_to_string(name: &PropName) -> Option<String> {
    match name {
        PropName::Ident(ident) => Some(ident.sym.as_str().to_string()),
        PropName::Str(s) => s.value.as_str().map(|v| v.to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}
