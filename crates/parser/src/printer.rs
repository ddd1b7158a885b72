//! Canonical Go source printer.
//!
//! Output depends only on the tree, never on recorded positions: tabs for
//! indentation, one space around binary operators, one declaration per
//! paragraph. Doc comments and trailing line comments attached to the file,
//! declarations, specs and struct/interface fields are printed; free-floating
//! comments are not.

use crate::ast::*;
use crate::token::TokenText;

/// Prints a whole file.
pub fn print_file(a: &AstArena, file: &File) -> String {
    let mut p = Printer::new(a);
    p.file(file);
    p.out
}

/// Prints one expression on a single line where possible.
pub fn print_expr(a: &AstArena, id: ExprId) -> String {
    let mut p = Printer::new(a);
    p.expr(id);
    p.out
}

impl SourceFile {
    pub fn print(&self) -> String {
        print_file(&self.arena, &self.file)
    }
}

struct Printer<'a> {
    a: &'a AstArena,
    out: String,
    depth: usize,
}

impl<'a> Printer<'a> {
    fn new(a: &'a AstArena) -> Self {
        Self {
            a,
            out: String::with_capacity(4096),
            depth: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    fn w(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }

    fn name(&mut self, id: Ident) {
        let s = self.a.name(id.name);
        self.out.push_str(s);
    }

    fn names(&mut self, list: ListRef<Ident>) {
        for (i, &id) in self.a.idents(list).iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.name(id);
        }
    }

    fn lit(&mut self, lit: BasicLit) {
        let s = self.a.name(lit.value);
        self.out.push_str(s);
    }

    /// Doc comment lines, each followed by a newline at the current depth.
    fn doc(&mut self, group: Option<CommentGroupId>) {
        let Some(g) = group else { return };
        for c in self.a.comments_list(self.a.comment_groups[g].list) {
            let text = self.a.name(c.text);
            self.out.push_str(text);
            self.newline();
        }
    }

    /// Trailing comment on the current line.
    fn line_comment(&mut self, group: Option<CommentGroupId>) {
        let Some(g) = group else { return };
        for c in self.a.comments_list(self.a.comment_groups[g].list) {
            self.out.push(' ');
            let text = self.a.name(c.text);
            self.out.push_str(text);
        }
    }

    // -------------------------------------------------------------------------
    // File and declarations
    // -------------------------------------------------------------------------

    fn file(&mut self, f: &File) {
        self.doc(f.doc);
        self.w("package ");
        self.name(f.name);
        self.w("\n");
        for &d in self.a.decls_list(f.decls) {
            self.w("\n");
            self.decl(d);
            self.w("\n");
        }
    }

    fn decl(&mut self, id: DeclId) {
        match self.a.decls[id] {
            Decl::Bad { .. } => self.w("BadDecl"),
            Decl::Gen(g) => self.gen_decl(&g),
            Decl::Func(f) => self.func_decl(&f),
        }
    }

    fn gen_decl(&mut self, g: &GenDecl) {
        self.doc(g.doc);
        self.w(g.tok.as_str());
        self.w(" ");
        let specs = self.a.specs_list(g.specs);
        let grouped = g.lparen.is_some() || specs.len() != 1;
        if !grouped {
            self.spec(specs[0], false);
            return;
        }
        self.w("(");
        self.depth += 1;
        for &s in specs {
            self.newline();
            self.spec(s, true);
        }
        self.depth -= 1;
        self.newline();
        self.w(")");
    }

    fn spec(&mut self, id: SpecId, with_doc: bool) {
        match self.a.specs[id] {
            Spec::Import {
                doc,
                name,
                path,
                comment,
                ..
            } => {
                if with_doc {
                    self.doc(doc);
                }
                if let Some(n) = name {
                    self.name(n);
                    self.w(" ");
                }
                self.lit(path);
                self.line_comment(comment);
            }
            Spec::Value {
                doc,
                names,
                typ,
                values,
                comment,
            } => {
                if with_doc {
                    self.doc(doc);
                }
                self.names(names);
                if let Some(t) = typ {
                    self.w(" ");
                    self.expr(t);
                }
                if !values.is_empty() {
                    self.w(" = ");
                    self.expr_list(values);
                }
                self.line_comment(comment);
            }
            Spec::Type {
                doc,
                name,
                type_params,
                assign,
                typ,
                comment,
            } => {
                if with_doc {
                    self.doc(doc);
                }
                self.name(name);
                if let Some(tp) = type_params {
                    self.field_list(tp, "[", "]");
                }
                self.w(if assign.is_some() { " = " } else { " " });
                self.expr(typ);
                self.line_comment(comment);
            }
        }
    }

    fn func_decl(&mut self, f: &FuncDecl) {
        self.doc(f.doc);
        self.w("func ");
        if let Some(recv) = f.recv {
            self.field_list(recv, "(", ")");
            self.w(" ");
        }
        self.name(f.name);
        self.signature(&f.typ);
        if let Some(body) = f.body {
            self.w(" ");
            self.block(&body);
        }
    }

    // -------------------------------------------------------------------------
    // Fields and signatures
    // -------------------------------------------------------------------------

    /// Inline field list: parameters, results, receivers and type parameters.
    fn field_list(&mut self, list: FieldList, open: &str, close: &str) {
        self.w(open);
        for (i, &f) in self.a.fields_list(list.list).iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            let field = self.a.fields[f];
            if !field.names.is_empty() {
                self.names(field.names);
                self.w(" ");
            }
            self.expr(field.typ);
        }
        self.w(close);
    }

    fn signature(&mut self, t: &FuncType) {
        if let Some(tp) = t.type_params {
            self.field_list(tp, "[", "]");
        }
        self.field_list(t.params, "(", ")");
        let Some(results) = t.results else { return };
        let fields = self.a.fields_list(results.list);
        match fields {
            [] => {}
            [single] if self.a.fields[*single].names.is_empty() => {
                self.w(" ");
                self.expr(self.a.fields[*single].typ);
            }
            _ => {
                self.w(" ");
                self.field_list(results, "(", ")");
            }
        }
    }

    /// One field per line, used by struct and interface bodies.
    fn member_fields(&mut self, list: FieldList, methods: bool) {
        let fields = self.a.fields_list(list.list);
        if fields.is_empty() {
            self.w("{}");
            return;
        }
        self.w(" {");
        self.depth += 1;
        for &f in fields {
            let field = self.a.fields[f];
            self.newline();
            self.doc(field.doc);
            match (methods, self.a.exprs[field.typ]) {
                (true, Expr::FuncType(sig)) if !field.names.is_empty() => {
                    self.names(field.names);
                    self.signature(&sig);
                }
                _ => {
                    if !field.names.is_empty() {
                        self.names(field.names);
                        self.w(" ");
                    }
                    self.expr(field.typ);
                }
            }
            if let Some(tag) = field.tag {
                self.w(" ");
                self.lit(tag);
            }
            self.line_comment(field.comment);
        }
        self.depth -= 1;
        self.newline();
        self.w("}");
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn block(&mut self, b: &Block) {
        self.w("{");
        self.stmt_list(b.list);
        self.newline();
        self.w("}");
    }

    fn stmt_list(&mut self, list: ListRef<StmtId>) {
        self.depth += 1;
        for &s in self.a.stmts_list(list) {
            if matches!(self.a.stmts[s], Stmt::Empty { .. }) {
                continue;
            }
            self.newline();
            self.stmt(s);
        }
        self.depth -= 1;
    }

    fn stmt(&mut self, id: StmtId) {
        match self.a.stmts[id] {
            Stmt::Bad { .. } => self.w("BadStmt"),
            Stmt::Decl(d) => self.decl(d),
            Stmt::Empty { .. } => {}
            Stmt::Labeled { label, stmt, .. } => {
                self.name(label);
                self.w(":");
                if let Stmt::Empty { .. } = self.a.stmts[stmt] {
                    self.w(" ;");
                } else {
                    self.newline();
                    self.stmt(stmt);
                }
            }
            Stmt::Expr(x) => self.expr(x),
            Stmt::Send { chan, value, .. } => {
                self.expr(chan);
                self.w(" <- ");
                self.expr(value);
            }
            Stmt::IncDec { x, tok, .. } => {
                self.expr(x);
                self.w(tok.as_str());
            }
            Stmt::Assign { lhs, tok, rhs, .. } => {
                self.expr_list(lhs);
                self.w(" ");
                self.w(tok.as_str());
                self.w(" ");
                self.expr_list(rhs);
            }
            Stmt::Go { call, .. } => {
                self.w("go ");
                self.call(&call);
            }
            Stmt::Defer { call, .. } => {
                self.w("defer ");
                self.call(&call);
            }
            Stmt::Return { results, .. } => {
                self.w("return");
                if !results.is_empty() {
                    self.w(" ");
                    self.expr_list(results);
                }
            }
            Stmt::Branch { tok, label, .. } => {
                self.w(tok.as_str());
                if let Some(l) = label {
                    self.w(" ");
                    self.name(l);
                }
            }
            Stmt::Block(b) => self.block(&b),
            Stmt::If {
                init,
                cond,
                body,
                els,
                ..
            } => {
                self.w("if ");
                self.header_init(init);
                self.expr(cond);
                self.w(" ");
                self.block(&body);
                if let Some(e) = els {
                    self.w(" else ");
                    self.stmt(e);
                }
            }
            Stmt::CaseClause { list, body, .. } => {
                if list.is_empty() {
                    self.w("default:");
                } else {
                    self.w("case ");
                    self.expr_list(list);
                    self.w(":");
                }
                self.stmt_list(body);
            }
            Stmt::Switch {
                init, tag, body, ..
            } => {
                self.w("switch ");
                self.header_init(init);
                if let Some(t) = tag {
                    self.expr(t);
                    self.w(" ");
                }
                self.clauses(&body);
            }
            Stmt::TypeSwitch {
                init, assign, body, ..
            } => {
                self.w("switch ");
                self.header_init(init);
                self.stmt(assign);
                self.w(" ");
                self.clauses(&body);
            }
            Stmt::CommClause { comm, body, .. } => {
                match comm {
                    Some(c) => {
                        self.w("case ");
                        self.stmt(c);
                        self.w(":");
                    }
                    None => self.w("default:"),
                }
                self.stmt_list(body);
            }
            Stmt::Select { body, .. } => {
                self.w("select ");
                self.clauses(&body);
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
                ..
            } => {
                self.w("for ");
                if init.is_some() || post.is_some() {
                    if let Some(s) = init {
                        self.stmt(s);
                    }
                    self.w("; ");
                    if let Some(c) = cond {
                        self.expr(c);
                    }
                    self.w("; ");
                    if let Some(s) = post {
                        self.stmt(s);
                        self.w(" ");
                    }
                } else if let Some(c) = cond {
                    self.expr(c);
                    self.w(" ");
                }
                self.block(&body);
            }
            Stmt::Range {
                key,
                value,
                tok,
                x,
                body,
                ..
            } => {
                self.w("for ");
                if let Some(k) = key {
                    self.expr(k);
                    if let Some(v) = value {
                        self.w(", ");
                        self.expr(v);
                    }
                    self.w(" ");
                    self.w(tok.map_or(":=", AssignOp::as_str));
                    self.w(" ");
                }
                self.w("range ");
                self.expr(x);
                self.w(" ");
                self.block(&body);
            }
        }
    }

    fn header_init(&mut self, init: Option<StmtId>) {
        if let Some(s) = init {
            self.stmt(s);
            self.w("; ");
        }
    }

    /// Case/comm clauses stay at the switch's depth.
    fn clauses(&mut self, body: &Block) {
        self.w("{");
        for &s in self.a.stmts_list(body.list) {
            self.newline();
            self.stmt(s);
        }
        self.newline();
        self.w("}");
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn expr_list(&mut self, list: ListRef<ExprId>) {
        for (i, &x) in self.a.exprs_list(list).iter().enumerate() {
            if i > 0 {
                self.w(", ");
            }
            self.expr(x);
        }
    }

    fn call(&mut self, c: &CallExpr) {
        self.expr(c.fun);
        self.w("(");
        self.expr_list(c.args);
        if c.ellipsis.is_some() {
            self.w("...");
        }
        self.w(")");
    }

    /// Whether printing `x` right after `op` would fuse into another token.
    fn fuses_with(&self, op: UnaryOp, x: ExprId) -> bool {
        match self.a.exprs[x] {
            Expr::Unary { op: inner, .. } => matches!(
                (op, inner),
                (UnaryOp::Add, UnaryOp::Add)
                    | (UnaryOp::Sub, UnaryOp::Sub)
                    | (UnaryOp::Sub, UnaryOp::Recv)
                    | (UnaryOp::Addr, UnaryOp::Addr)
                    | (UnaryOp::Addr, UnaryOp::Xor)
            ),
            Expr::ChanType { dir: ChanDir::Recv, .. } => op == UnaryOp::Sub,
            _ => false,
        }
    }

    fn expr(&mut self, id: ExprId) {
        match self.a.exprs[id] {
            Expr::Bad { .. } => self.w("BadExpr"),
            Expr::Ident(i) => self.name(i),
            Expr::Ellipsis { elt, .. } => {
                self.w("...");
                if let Some(e) = elt {
                    self.expr(e);
                }
            }
            Expr::BasicLit(l) => self.lit(l),
            Expr::FuncLit { typ, body } => {
                self.w("func");
                self.signature(&typ);
                self.w(" ");
                self.block(&body);
            }
            Expr::CompositeLit { typ, elts, .. } => {
                if let Some(t) = typ {
                    self.expr(t);
                }
                self.w("{");
                self.expr_list(elts);
                self.w("}");
            }
            Expr::Paren { x, .. } => {
                self.w("(");
                self.expr(x);
                self.w(")");
            }
            Expr::Selector { x, sel } => {
                self.expr(x);
                self.w(".");
                self.name(sel);
            }
            Expr::Index { x, index, .. } => {
                self.expr(x);
                self.w("[");
                self.expr(index);
                self.w("]");
            }
            Expr::IndexList { x, indices, .. } => {
                self.expr(x);
                self.w("[");
                self.expr_list(indices);
                self.w("]");
            }
            Expr::Slice {
                x,
                low,
                high,
                max,
                slice3,
                ..
            } => {
                self.expr(x);
                self.w("[");
                if let Some(l) = low {
                    self.expr(l);
                }
                self.w(":");
                if let Some(h) = high {
                    self.expr(h);
                }
                if slice3 {
                    self.w(":");
                    if let Some(m) = max {
                        self.expr(m);
                    }
                }
                self.w("]");
            }
            Expr::TypeAssert { x, typ, .. } => {
                self.expr(x);
                self.w(".(");
                match typ {
                    Some(t) => self.expr(t),
                    None => self.w("type"),
                }
                self.w(")");
            }
            Expr::Call(c) => self.call(&c),
            Expr::Star { x, .. } => {
                self.w("*");
                self.expr(x);
            }
            Expr::Unary { op, x, .. } => {
                self.w(op.as_str());
                if self.fuses_with(op, x) {
                    self.w(" ");
                }
                self.expr(x);
            }
            Expr::Binary { x, op, y, .. } => {
                self.expr(x);
                self.w(" ");
                self.w(op.as_str());
                self.w(" ");
                self.expr(y);
            }
            Expr::KeyValue { key, value, .. } => {
                self.expr(key);
                self.w(": ");
                self.expr(value);
            }
            Expr::ArrayType { len, elt, .. } => {
                self.w("[");
                if let Some(l) = len {
                    self.expr(l);
                }
                self.w("]");
                self.expr(elt);
            }
            Expr::StructType { fields, .. } => {
                self.w("struct");
                self.member_fields(fields, false);
            }
            Expr::FuncType(t) => {
                self.w("func");
                self.signature(&t);
            }
            Expr::InterfaceType { methods, .. } => {
                self.w("interface");
                self.member_fields(methods, true);
            }
            Expr::MapType { key, value, .. } => {
                self.w("map[");
                self.expr(key);
                self.w("]");
                self.expr(value);
            }
            Expr::ChanType { dir, value, .. } => {
                self.w(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.expr(value);
            }
        }
    }
}
