use go125_astjson::{json_to_source, reprint, source_to_json, unmarshal, Options};
use go125_astjson::syntax::ast::Stmt;
use serde_json::Value;

const ABS: &str = "package main\n\nfunc abs(x int) int {\n\tif x > 0 {\n\t\treturn x\n\t} else {\n\t\treturn -x\n\t}\n}\n";

#[test]
fn if_else_shape() {
    let opts = Options::new();
    let json = source_to_json(ABS, "abs.go", &opts).unwrap();
    let v: Value = serde_json::from_str(&json).unwrap();

    assert_eq!(v["NodeType"], "File");
    let func = &v["Decls"][0];
    assert_eq!(func["NodeType"], "FuncDecl");
    assert_eq!(func["Body"]["NodeType"], "BlockStmt");

    let stmt = &func["Body"]["List"][0];
    assert_eq!(stmt["NodeType"], "IfStmt");
    assert_eq!(stmt["Cond"]["NodeType"], "BinaryExpr");
    assert_eq!(stmt["Cond"]["Op"], ">");
    assert_eq!(stmt["Else"]["NodeType"], "BlockStmt");
    assert_eq!(stmt["Else"]["List"][0]["Results"][0]["Op"], "-");

    assert!(!json.contains("Position"), "positions leaked: {json}");
    assert_eq!(json_to_source(&json, &opts).unwrap(), reprint(ABS, "abs.go", false).unwrap());
}

#[test]
fn missing_else_is_explicit_null() {
    let src = "package main\n\nfunc f(x int) {\n\tif x > 0 {\n\t\tx--\n\t}\n}\n";
    let opts = Options::new();
    let json = source_to_json(src, "f.go", &opts).unwrap();
    assert!(json.contains(r#""Else":null"#), "{json}");
    assert!(json.contains(r#""Init":null"#), "{json}");

    let sf = unmarshal(&json, &opts).unwrap();
    let a = &sf.arena;
    let if_stmt = a
        .stmts
        .iter()
        .find_map(|(_, s)| match *s {
            Stmt::If { els, init, .. } => Some((els, init)),
            _ => None,
        })
        .expect("an if statement");
    assert_eq!(if_stmt, (None, None));
}

#[test]
fn missing_members_decode_like_null() {
    let opts = Options::new();
    let json = source_to_json(ABS, "abs.go", &opts).unwrap();
    let stripped = json.replace(r#","Init":null"#, "");
    assert_ne!(stripped, json);
    assert_eq!(
        json_to_source(&stripped, &opts).unwrap(),
        json_to_source(&json, &opts).unwrap()
    );
}
