//! Syntax tree -> mirror tree -> JSON.
//!
//! One exhaustive `match` per family maps every tree variant onto its mirror
//! body, so a kind without a mapping does not compile. Traversal is depth
//! first in field declaration order; a node's identity is taken before any of
//! its children are visited.

use std::collections::{HashMap, HashSet};

use go125_syntax::ast::{
    AstArena, BasicLit, Block, CallExpr, CommentGroupId, Decl, DeclId, Expr, ExprId, FieldId,
    FieldList, FuncType, Ident, ListRef, Pos, SourceFile, Spec, SpecId, Stmt, StmtId,
};
use go125_syntax::walk::{Visitor, Walk};
use go125_syntax::TokenText;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::encode::PosEncoder;
use crate::error::Result;
use crate::mirror::{self as m, Node};
use crate::options::Options;
use crate::refs::{Identity, NodeKey, RefTracker};
use crate::registry::{DeclKind, ExprKind, NodeTag, SpecKind, StmtKind};

/// Builds the mirror of `sf`. The tree is only read.
#[instrument(skip_all, fields(
    decls = sf.file.decls.len(),
    positions = opts.with_positions,
    comments = opts.with_comments,
    references = opts.with_references,
))]
pub fn marshal(sf: &SourceFile, opts: &Options) -> m::FileNode {
    let mut mm = Marshaller::new(sf, opts);
    let file = mm.file();
    debug!(
        nodes = mm.nodes,
        ref_ids = mm.refs.assigned(),
        shared_hits = mm.refs.shared_hits(),
        "marshalled file"
    );
    file
}

/// Writes `value` as JSON: compact for `indent == 0`, otherwise pretty with
/// `indent` spaces per level and a trailing newline.
pub fn to_json<T: Serialize>(value: &T, indent: usize) -> Result<String> {
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }
    let pad = b" ".repeat(indent);
    let mut out = Vec::with_capacity(4096);
    let fmt = serde_json::ser::PrettyFormatter::with_indent(&pad);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
    value.serialize(&mut ser)?;
    out.push(b'\n');
    String::from_utf8(out)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

/// Instances reachable from more than one parent. Only these are cached.
#[derive(Default)]
struct ShareCounter {
    seen: HashSet<NodeKey>,
    shared: HashSet<NodeKey>,
}

impl ShareCounter {
    /// True on the first visit.
    fn first(&mut self, key: NodeKey) -> bool {
        if self.seen.insert(key) {
            return true;
        }
        self.shared.insert(key);
        false
    }
}

impl<'ast> Visitor<'ast> for ShareCounter {
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        if self.first(NodeKey::Decl(id)) {
            a.decls[id].walk(a, self);
        }
    }

    fn visit_spec(&mut self, a: &'ast AstArena, id: SpecId) {
        if self.first(NodeKey::Spec(id)) {
            a.specs[id].walk(a, self);
        }
    }

    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        if self.first(NodeKey::Stmt(id)) {
            a.stmts[id].walk(a, self);
        }
    }

    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        if self.first(NodeKey::Expr(id)) {
            a.exprs[id].walk(a, self);
        }
    }

    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        if self.first(NodeKey::Field(id)) {
            a.fields[id].walk(a, self);
        }
    }

    fn visit_comment_group(&mut self, _a: &'ast AstArena, id: CommentGroupId) {
        self.first(NodeKey::CommentGroup(id));
    }
}

#[derive(Default)]
struct Cache {
    exprs: HashMap<NodeKey, m::Expr>,
    stmts: HashMap<NodeKey, m::Stmt>,
    decls: HashMap<NodeKey, m::Decl>,
    specs: HashMap<NodeKey, m::Spec>,
    fields: HashMap<NodeKey, Node<m::Field>>,
    groups: HashMap<NodeKey, Node<m::CommentGroup>>,
}

struct Marshaller<'a> {
    sf: &'a SourceFile,
    a: &'a AstArena,
    pos: PosEncoder<'a>,
    comments: bool,
    imports: bool,
    refs: RefTracker,
    shared: HashSet<NodeKey>,
    cache: Cache,
    nodes: usize,
}

impl<'a> Marshaller<'a> {
    fn new(sf: &'a SourceFile, opts: &Options) -> Self {
        let shared = if opts.with_references {
            let mut counter = ShareCounter::default();
            counter.visit_file(&sf.arena, &sf.file);
            if opts.with_imports {
                for &s in sf.arena.specs_list(sf.file.imports) {
                    counter.visit_spec(&sf.arena, s);
                }
            }
            for &g in sf.arena.comment_groups_list(sf.file.comments) {
                counter.visit_comment_group(&sf.arena, g);
            }
            counter.shared
        } else {
            HashSet::new()
        };
        Self {
            sf,
            a: &sf.arena,
            pos: PosEncoder::new(&sf.source_map, opts.with_positions),
            comments: opts.with_comments,
            imports: opts.with_imports,
            refs: RefTracker::new(opts.with_references),
            shared,
            cache: Cache::default(),
            nodes: 0,
        }
    }

    /// Returns the cached mirror for a revisited instance, or builds one.
    fn tracked<V: Clone>(
        &mut self,
        key: NodeKey,
        slot: fn(&mut Cache) -> &mut HashMap<NodeKey, V>,
        build: impl FnOnce(&mut Self, Option<u32>) -> V,
    ) -> V {
        let identity = self.refs.identity_of(Some(key));
        if let Identity::Seen(_) = identity {
            if let Some(hit) = slot(&mut self.cache).get(&key) {
                return hit.clone();
            }
        }
        self.nodes += 1;
        let node = build(self, identity.ref_id());
        if self.shared.contains(&key) {
            slot(&mut self.cache).insert(key, node.clone());
        }
        node
    }

    fn inline_id(&mut self) -> Option<u32> {
        self.nodes += 1;
        self.refs.identity_of(None).ref_id()
    }

    fn position(&self, pos: Pos) -> Option<m::Position> {
        self.pos.position(pos)
    }

    // -------------------------------------------------------------------------
    // File and helper nodes
    // -------------------------------------------------------------------------

    fn file(&mut self) -> m::FileNode {
        let a = self.a;
        let f = self.sf.file;
        let ref_id = self.inline_id();
        let doc = self.group(f.doc);
        let package = self.position(f.package);
        let name = self.ident(f.name);
        let decls = a.decls_list(f.decls).iter().map(|&d| self.decl(d)).collect();
        let imports = if self.imports {
            a.specs_list(f.imports).iter().map(|&s| self.spec(s)).collect()
        } else {
            Vec::new()
        };
        let unresolved = a.idents(f.unresolved).iter().map(|&i| self.ident(i)).collect();
        let comments = if self.comments {
            a.comment_groups_list(f.comments)
                .iter()
                .map(|&g| self.comment_group(g))
                .collect()
        } else {
            Vec::new()
        };
        Node::new(
            "File",
            ref_id,
            m::File {
                doc,
                package,
                name,
                decls,
                imports,
                unresolved,
                comments,
            },
        )
    }

    fn group(&mut self, g: Option<CommentGroupId>) -> Option<Node<m::CommentGroup>> {
        if !self.comments {
            return None;
        }
        g.map(|g| self.comment_group(g))
    }

    fn comment_group(&mut self, id: CommentGroupId) -> Node<m::CommentGroup> {
        self.tracked(NodeKey::CommentGroup(id), |c| &mut c.groups, |this, ref_id| {
            let a = this.a;
            let list = a
                .comments_list(a.comment_groups[id].list)
                .iter()
                .map(|c| {
                    let ref_id = this.inline_id();
                    let body = m::Comment {
                        slash: this.position(c.slash),
                        text: a.name(c.text).to_string(),
                    };
                    Node::new("Comment", ref_id, body)
                })
                .collect();
            Node::new("CommentGroup", ref_id, m::CommentGroup { list })
        })
    }

    fn ident_body(&self, i: Ident) -> m::Ident {
        m::Ident {
            name_pos: self.position(i.pos),
            name: self.a.name(i.name).to_string(),
        }
    }

    fn ident(&mut self, i: Ident) -> Node<m::Ident> {
        let ref_id = self.inline_id();
        Node::new("Ident", ref_id, self.ident_body(i))
    }

    fn idents(&mut self, list: ListRef<Ident>) -> Vec<Node<m::Ident>> {
        let a = self.a;
        a.idents(list).iter().map(|&i| self.ident(i)).collect()
    }

    fn lit_body(&self, lit: BasicLit) -> m::BasicLit {
        m::BasicLit {
            value_pos: self.position(lit.pos),
            kind: lit.kind.as_str(),
            value: self.a.name(lit.value).to_string(),
        }
    }

    fn lit(&mut self, lit: BasicLit) -> Node<m::BasicLit> {
        let ref_id = self.inline_id();
        Node::new("BasicLit", ref_id, self.lit_body(lit))
    }

    fn field(&mut self, id: FieldId) -> Node<m::Field> {
        self.tracked(NodeKey::Field(id), |c| &mut c.fields, |this, ref_id| {
            let f = this.a.fields[id];
            let body = m::Field {
                doc: this.group(f.doc),
                names: this.idents(f.names),
                typ: Box::new(this.expr(f.typ)),
                tag: f.tag.map(|t| this.lit(t)),
                comment: this.group(f.comment),
            };
            Node::new("Field", ref_id, body)
        })
    }

    fn field_list(&mut self, fl: FieldList) -> Node<m::FieldList> {
        let a = self.a;
        let ref_id = self.inline_id();
        let body = m::FieldList {
            opening: self.position(fl.opening),
            list: a.fields_list(fl.list).iter().map(|&f| self.field(f)).collect(),
            closing: self.position(fl.closing),
        };
        Node::new("FieldList", ref_id, body)
    }

    fn block_body(&mut self, b: Block) -> m::Block {
        m::Block {
            lbrace: self.position(b.lbrace),
            list: self.stmts(b.list),
            rbrace: self.position(b.rbrace),
        }
    }

    fn block(&mut self, b: Block) -> Node<m::Block> {
        let ref_id = self.inline_id();
        Node::new(StmtKind::BlockStmt.tag(), ref_id, self.block_body(b))
    }

    fn func_type_body(&mut self, ft: FuncType) -> m::FuncType {
        m::FuncType {
            func: self.position(ft.func),
            type_params: ft.type_params.map(|fl| self.field_list(fl)),
            params: self.field_list(ft.params),
            results: ft.results.map(|fl| self.field_list(fl)),
        }
    }

    fn func_type(&mut self, ft: FuncType) -> Node<m::FuncType> {
        let ref_id = self.inline_id();
        Node::new(ExprKind::FuncType.tag(), ref_id, self.func_type_body(ft))
    }

    fn call_body(&mut self, c: CallExpr) -> m::CallExpr {
        m::CallExpr {
            fun: Box::new(self.expr(c.fun)),
            lparen: self.position(c.lparen),
            args: self.exprs(c.args),
            ellipsis: self.pos.marker(c.ellipsis),
            rparen: self.position(c.rparen),
        }
    }

    fn call(&mut self, c: CallExpr) -> Node<m::CallExpr> {
        let ref_id = self.inline_id();
        Node::new(ExprKind::CallExpr.tag(), ref_id, self.call_body(c))
    }

    fn bad(&self, from: Pos, to: Pos) -> m::Bad {
        m::Bad {
            from: self.position(from),
            to: self.position(to),
        }
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn boxed(&mut self, id: ExprId) -> Box<m::Expr> {
        Box::new(self.expr(id))
    }

    fn opt_expr(&mut self, id: Option<ExprId>) -> Option<Box<m::Expr>> {
        id.map(|id| self.boxed(id))
    }

    fn exprs(&mut self, list: ListRef<ExprId>) -> Vec<m::Expr> {
        let a = self.a;
        a.exprs_list(list).iter().map(|&e| self.expr(e)).collect()
    }

    fn expr(&mut self, id: ExprId) -> m::Expr {
        self.tracked(NodeKey::Expr(id), |c| &mut c.exprs, |this, ref_id| {
            this.expr_node(id, ref_id)
        })
    }

    fn expr_node(&mut self, id: ExprId, ref_id: Option<u32>) -> m::Expr {
        use m::ExprBody as B;

        let e = self.a.exprs[id];
        let body = match e {
            Expr::Bad { from, to } => B::BadExpr(self.bad(from, to)),
            Expr::Ident(i) => B::Ident(self.ident_body(i)),
            Expr::Ellipsis { ellipsis, elt } => B::Ellipsis(m::Ellipsis {
                ellipsis: self.position(ellipsis),
                elt: self.opt_expr(elt),
            }),
            Expr::BasicLit(lit) => B::BasicLit(self.lit_body(lit)),
            Expr::FuncLit { typ, body } => B::FuncLit(m::FuncLit {
                typ: self.func_type(typ),
                body: self.block(body),
            }),
            Expr::CompositeLit {
                typ,
                lbrace,
                elts,
                rbrace,
                incomplete,
            } => B::CompositeLit(m::CompositeLit {
                typ: self.opt_expr(typ),
                lbrace: self.position(lbrace),
                elts: self.exprs(elts),
                rbrace: self.position(rbrace),
                incomplete,
            }),
            Expr::Paren { lparen, x, rparen } => B::ParenExpr(m::ParenExpr {
                lparen: self.position(lparen),
                x: self.boxed(x),
                rparen: self.position(rparen),
            }),
            Expr::Selector { x, sel } => B::SelectorExpr(m::SelectorExpr {
                x: self.boxed(x),
                sel: self.ident(sel),
            }),
            Expr::Index {
                x,
                lbrack,
                index,
                rbrack,
            } => B::IndexExpr(m::IndexExpr {
                x: self.boxed(x),
                lbrack: self.position(lbrack),
                index: self.boxed(index),
                rbrack: self.position(rbrack),
            }),
            Expr::IndexList {
                x,
                lbrack,
                indices,
                rbrack,
            } => B::IndexListExpr(m::IndexListExpr {
                x: self.boxed(x),
                lbrack: self.position(lbrack),
                indices: self.exprs(indices),
                rbrack: self.position(rbrack),
            }),
            Expr::Slice {
                x,
                lbrack,
                low,
                high,
                max,
                slice3,
                rbrack,
            } => B::SliceExpr(m::SliceExpr {
                x: self.boxed(x),
                lbrack: self.position(lbrack),
                low: self.opt_expr(low),
                high: self.opt_expr(high),
                max: self.opt_expr(max),
                slice3,
                rbrack: self.position(rbrack),
            }),
            Expr::TypeAssert {
                x,
                lparen,
                typ,
                rparen,
            } => B::TypeAssertExpr(m::TypeAssertExpr {
                x: self.boxed(x),
                lparen: self.position(lparen),
                typ: self.opt_expr(typ),
                rparen: self.position(rparen),
            }),
            Expr::Call(c) => B::CallExpr(self.call_body(c)),
            Expr::Star { star, x } => B::StarExpr(m::StarExpr {
                star: self.position(star),
                x: self.boxed(x),
            }),
            Expr::Unary { op_pos, op, x } => B::UnaryExpr(m::UnaryExpr {
                op_pos: self.position(op_pos),
                op: op.as_str(),
                x: self.boxed(x),
            }),
            Expr::Binary { x, op_pos, op, y } => B::BinaryExpr(m::BinaryExpr {
                x: self.boxed(x),
                op_pos: self.position(op_pos),
                op: op.as_str(),
                y: self.boxed(y),
            }),
            Expr::KeyValue { key, colon, value } => B::KeyValueExpr(m::KeyValueExpr {
                key: self.boxed(key),
                colon: self.position(colon),
                value: self.boxed(value),
            }),
            Expr::ArrayType { lbrack, len, elt } => B::ArrayType(m::ArrayType {
                lbrack: self.position(lbrack),
                len: self.opt_expr(len),
                elt: self.boxed(elt),
            }),
            Expr::StructType {
                struct_pos,
                fields,
                incomplete,
            } => B::StructType(m::StructType {
                struct_pos: self.position(struct_pos),
                fields: self.field_list(fields),
                incomplete,
            }),
            Expr::FuncType(ft) => B::FuncType(self.func_type_body(ft)),
            Expr::InterfaceType {
                interface,
                methods,
                incomplete,
            } => B::InterfaceType(m::InterfaceType {
                interface: self.position(interface),
                methods: self.field_list(methods),
                incomplete,
            }),
            Expr::MapType { map, key, value } => B::MapType(m::MapType {
                map: self.position(map),
                key: self.boxed(key),
                value: self.boxed(value),
            }),
            Expr::ChanType {
                begin,
                arrow,
                dir,
                value,
            } => B::ChanType(m::ChanType {
                begin: self.position(begin),
                arrow: self.position(arrow),
                dir: dir.as_str(),
                value: self.boxed(value),
            }),
        };
        Node::new(ExprKind::of(&e).tag(), ref_id, body)
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn stmts(&mut self, list: ListRef<StmtId>) -> Vec<m::Stmt> {
        let a = self.a;
        a.stmts_list(list).iter().map(|&s| self.stmt(s)).collect()
    }

    fn opt_stmt(&mut self, id: Option<StmtId>) -> Option<Box<m::Stmt>> {
        id.map(|id| Box::new(self.stmt(id)))
    }

    fn stmt(&mut self, id: StmtId) -> m::Stmt {
        self.tracked(NodeKey::Stmt(id), |c| &mut c.stmts, |this, ref_id| {
            this.stmt_node(id, ref_id)
        })
    }

    fn stmt_node(&mut self, id: StmtId, ref_id: Option<u32>) -> m::Stmt {
        use m::StmtBody as B;

        let s = self.a.stmts[id];
        let body = match s {
            Stmt::Bad { from, to } => B::BadStmt(self.bad(from, to)),
            Stmt::Decl(d) => B::DeclStmt(m::DeclStmt {
                decl: Box::new(self.decl(d)),
            }),
            Stmt::Empty {
                semicolon,
                implicit,
            } => B::EmptyStmt(m::EmptyStmt {
                semicolon: self.position(semicolon),
                implicit,
            }),
            Stmt::Labeled { label, colon, stmt } => B::LabeledStmt(m::LabeledStmt {
                label: self.ident(label),
                colon: self.position(colon),
                stmt: Box::new(self.stmt(stmt)),
            }),
            Stmt::Expr(x) => B::ExprStmt(m::ExprStmt { x: self.boxed(x) }),
            Stmt::Send { chan, arrow, value } => B::SendStmt(m::SendStmt {
                chan: self.boxed(chan),
                arrow: self.position(arrow),
                value: self.boxed(value),
            }),
            Stmt::IncDec { x, tok_pos, tok } => B::IncDecStmt(m::IncDecStmt {
                x: self.boxed(x),
                tok_pos: self.position(tok_pos),
                tok: tok.as_str(),
            }),
            Stmt::Assign {
                lhs,
                tok_pos,
                tok,
                rhs,
            } => B::AssignStmt(m::AssignStmt {
                lhs: self.exprs(lhs),
                tok_pos: self.position(tok_pos),
                tok: tok.as_str(),
                rhs: self.exprs(rhs),
            }),
            Stmt::Go { go, call } => B::GoStmt(m::GoStmt {
                go: self.position(go),
                call: self.call(call),
            }),
            Stmt::Defer { defer, call } => B::DeferStmt(m::DeferStmt {
                defer: self.position(defer),
                call: self.call(call),
            }),
            Stmt::Return { ret, results } => B::ReturnStmt(m::ReturnStmt {
                ret: self.position(ret),
                results: self.exprs(results),
            }),
            Stmt::Branch {
                tok_pos,
                tok,
                label,
            } => B::BranchStmt(m::BranchStmt {
                tok_pos: self.position(tok_pos),
                tok: tok.as_str(),
                label: label.map(|l| self.ident(l)),
            }),
            Stmt::Block(b) => B::BlockStmt(self.block_body(b)),
            Stmt::If {
                if_pos,
                init,
                cond,
                body,
                els,
            } => B::IfStmt(m::IfStmt {
                if_pos: self.position(if_pos),
                init: self.opt_stmt(init),
                cond: self.boxed(cond),
                body: self.block(body),
                els: self.opt_stmt(els),
            }),
            Stmt::CaseClause {
                case,
                list,
                colon,
                body,
            } => B::CaseClause(m::CaseClause {
                case_pos: self.position(case),
                list: self.exprs(list),
                colon: self.position(colon),
                body: self.stmts(body),
            }),
            Stmt::Switch {
                switch,
                init,
                tag,
                body,
            } => B::SwitchStmt(m::SwitchStmt {
                switch: self.position(switch),
                init: self.opt_stmt(init),
                tag: self.opt_expr(tag),
                body: self.block(body),
            }),
            Stmt::TypeSwitch {
                switch,
                init,
                assign,
                body,
            } => B::TypeSwitchStmt(m::TypeSwitchStmt {
                switch: self.position(switch),
                init: self.opt_stmt(init),
                assign: Box::new(self.stmt(assign)),
                body: self.block(body),
            }),
            Stmt::CommClause {
                case,
                comm,
                colon,
                body,
            } => B::CommClause(m::CommClause {
                case_pos: self.position(case),
                comm: self.opt_stmt(comm),
                colon: self.position(colon),
                body: self.stmts(body),
            }),
            Stmt::Select { select, body } => B::SelectStmt(m::SelectStmt {
                select: self.position(select),
                body: self.block(body),
            }),
            Stmt::For {
                for_pos,
                init,
                cond,
                post,
                body,
            } => B::ForStmt(m::ForStmt {
                for_pos: self.position(for_pos),
                init: self.opt_stmt(init),
                cond: self.opt_expr(cond),
                post: self.opt_stmt(post),
                body: self.block(body),
            }),
            Stmt::Range {
                for_pos,
                key,
                value,
                tok_pos,
                tok,
                x,
                body,
            } => B::RangeStmt(m::RangeStmt {
                for_pos: self.position(for_pos),
                key: self.opt_expr(key),
                value: self.opt_expr(value),
                tok_pos: self.position(tok_pos),
                tok: tok.map(|t| t.as_str()),
                x: self.boxed(x),
                body: self.block(body),
            }),
        };
        Node::new(StmtKind::of(&s).tag(), ref_id, body)
    }

    // -------------------------------------------------------------------------
    // Specifications and declarations
    // -------------------------------------------------------------------------

    fn spec(&mut self, id: SpecId) -> m::Spec {
        self.tracked(NodeKey::Spec(id), |c| &mut c.specs, |this, ref_id| {
            this.spec_node(id, ref_id)
        })
    }

    fn spec_node(&mut self, id: SpecId, ref_id: Option<u32>) -> m::Spec {
        use m::SpecBody as B;

        let s = self.a.specs[id];
        let body = match s {
            Spec::Import {
                doc,
                name,
                path,
                comment,
                end_pos,
            } => B::ImportSpec(m::ImportSpec {
                doc: self.group(doc),
                name: name.map(|n| self.ident(n)),
                path: self.lit(path),
                comment: self.group(comment),
                end_pos: self.position(end_pos),
            }),
            Spec::Value {
                doc,
                names,
                typ,
                values,
                comment,
            } => B::ValueSpec(m::ValueSpec {
                doc: self.group(doc),
                names: self.idents(names),
                typ: self.opt_expr(typ),
                values: self.exprs(values),
                comment: self.group(comment),
            }),
            Spec::Type {
                doc,
                name,
                type_params,
                assign,
                typ,
                comment,
            } => B::TypeSpec(m::TypeSpec {
                doc: self.group(doc),
                name: self.ident(name),
                type_params: type_params.map(|fl| self.field_list(fl)),
                assign: self.pos.marker(assign),
                typ: self.boxed(typ),
                comment: self.group(comment),
            }),
        };
        Node::new(SpecKind::of(&s).tag(), ref_id, body)
    }

    fn decl(&mut self, id: DeclId) -> m::Decl {
        self.tracked(NodeKey::Decl(id), |c| &mut c.decls, |this, ref_id| {
            this.decl_node(id, ref_id)
        })
    }

    fn decl_node(&mut self, id: DeclId, ref_id: Option<u32>) -> m::Decl {
        use m::DeclBody as B;

        let d = self.a.decls[id];
        let body = match d {
            Decl::Bad { from, to } => B::BadDecl(self.bad(from, to)),
            Decl::Gen(g) => {
                let a = self.a;
                B::GenDecl(m::GenDecl {
                    doc: self.group(g.doc),
                    tok_pos: self.position(g.tok_pos),
                    tok: g.tok.as_str(),
                    lparen: self.pos.marker(g.lparen),
                    specs: a.specs_list(g.specs).iter().map(|&s| self.spec(s)).collect(),
                    rparen: self.pos.marker(g.rparen),
                })
            }
            Decl::Func(f) => B::FuncDecl(m::FuncDecl {
                doc: self.group(f.doc),
                recv: f.recv.map(|fl| self.field_list(fl)),
                name: self.ident(f.name),
                typ: self.func_type(f.typ),
                body: f.body.map(|b| self.block(b)),
            }),
        };
        Node::new(DeclKind::of(&d).tag(), ref_id, body)
    }
}
