#![allow(dead_code)]

use std::path::{Path, PathBuf};

use go125_astjson::syntax::ast::{AstArena, DeclId, ExprId, SpecId, StmtId};
use go125_astjson::syntax::walk::Visitor;
use go125_astjson::syntax::SourceFile;
use go125_astjson::registry::{DeclKind, ExprKind, Kind, SpecKind, StmtKind};

pub fn testdata() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("testdata")
}

/// Every `.go` fixture as (file name, contents).
pub fn fixtures() -> Vec<(String, String)> {
    let mut out: Vec<_> = std::fs::read_dir(testdata())
        .expect("testdata dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("go"))
        .map(|p| {
            let name = p.file_name().unwrap().to_string_lossy().into_owned();
            let src = std::fs::read_to_string(&p).unwrap();
            (name, src)
        })
        .collect();
    out.sort();
    assert!(!out.is_empty(), "no fixtures found");
    out
}

/// Kinds of every family node reachable from the file's declarations.
#[derive(Default)]
pub struct KindCounter(pub Vec<Kind>);

impl<'ast> Visitor<'ast> for KindCounter {
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        self.0.push(Kind::Decl(DeclKind::of(&a.decls[id])));
        go125_astjson::syntax::walk::Walk::walk(&a.decls[id], a, self);
    }

    fn visit_spec(&mut self, a: &'ast AstArena, id: SpecId) {
        self.0.push(Kind::Spec(SpecKind::of(&a.specs[id])));
        go125_astjson::syntax::walk::Walk::walk(&a.specs[id], a, self);
    }

    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        self.0.push(Kind::Stmt(StmtKind::of(&a.stmts[id])));
        go125_astjson::syntax::walk::Walk::walk(&a.stmts[id], a, self);
    }

    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        self.0.push(Kind::Expr(ExprKind::of(&a.exprs[id])));
        go125_astjson::syntax::walk::Walk::walk(&a.exprs[id], a, self);
    }
}

pub fn kinds(sf: &SourceFile) -> Vec<Kind> {
    let mut c = KindCounter::default();
    c.visit_file(&sf.arena, &sf.file);
    c.0
}
