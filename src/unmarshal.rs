//! JSON -> syntax tree.
//!
//! The document is parsed once into a `serde_json::Value`. Every polymorphic
//! child is then decoded in two steps: peek its `NodeType`, resolve the kind
//! for the family the parent expects, and read the field set of that kind.
//! Any failure aborts the whole conversion.

use std::collections::HashMap;
use std::fmt;

use go125_syntax::ast::{
    AstArena, BasicLit, BasicLitKind, Block, CallExpr, ChanDir, Comment, CommentGroup,
    CommentGroupId, Decl, DeclId, Expr, ExprId, Field, FieldId, FieldList, File, FuncDecl,
    FuncType, GenDecl, GenDeclTok, Ident, ListRef, Pos, SourceFile, Spec, SpecId, Stmt, StmtId,
};
use go125_syntax::walk::{ImportCollector, Visitor};
use go125_syntax::TokenText;
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace};

use crate::encode::{Coord, PosDecoder};
use crate::error::{CodecError, Result};
use crate::mirror::Position;
use crate::options::Options;
use crate::registry::{DeclKind, ExprKind, FamilyKind, NodeTag, SpecKind, StmtKind};

type Obj = Map<String, Value>;

/// Rebuilds a tree from a JSON document produced by `marshal` (or by hand).
#[instrument(skip_all, fields(
    len = json.len(),
    positions = opts.with_positions,
    comments = opts.with_comments,
    references = opts.with_references,
))]
pub fn unmarshal(json: &str, opts: &Options) -> Result<SourceFile> {
    let root: Value = serde_json::from_str(json)?;
    unmarshal_value(&root, opts)
}

/// Same as [`unmarshal`] for an already parsed document.
pub fn unmarshal_value(root: &Value, opts: &Options) -> Result<SourceFile> {
    let mut un = Unmarshaller::new(opts);
    let file = un.file(root, &Path::ROOT)?;
    debug!(
        nodes = un.nodes,
        reused = un.reused,
        positions = un.pos.recorded(),
        "unmarshalled file"
    );
    Ok(SourceFile {
        arena: un.a,
        file,
        source_map: un.pos.finish(),
    })
}

// ---------------------------------------------------------------------------
// JSON paths
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Seg {
    Root,
    Key(&'static str),
    Index(usize),
}

/// Location of a value in the document, rendered as `$.Decls[0].Body`.
/// Built on the stack while descending; only rendered for errors and traces.
#[derive(Debug, Clone, Copy)]
struct Path<'p> {
    seg: Seg,
    parent: Option<&'p Path<'p>>,
}

impl<'p> Path<'p> {
    const ROOT: Path<'static> = Path {
        seg: Seg::Root,
        parent: None,
    };

    fn key(&'p self, key: &'static str) -> Path<'p> {
        Path {
            seg: Seg::Key(key),
            parent: Some(self),
        }
    }

    fn index(&'p self, i: usize) -> Path<'p> {
        Path {
            seg: Seg::Index(i),
            parent: Some(self),
        }
    }
}

impl fmt::Display for Path<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = self.parent {
            parent.fmt(f)?;
        }
        match self.seg {
            Seg::Root => f.write_str("$"),
            Seg::Key(k) => write!(f, ".{k}"),
            Seg::Index(i) => write!(f, "[{i}]"),
        }
    }
}

fn schema(path: &Path<'_>, message: impl Into<String>) -> CodecError {
    CodecError::schema(path.to_string(), message)
}

// ---------------------------------------------------------------------------
// Primitive readers
// ---------------------------------------------------------------------------

fn object<'v>(v: &'v Value, path: &Path<'_>) -> Result<&'v Obj> {
    v.as_object()
        .ok_or_else(|| schema(path, "expected a node object"))
}

/// Member `key`, treating `null` as absent.
fn member<'v>(o: &'v Obj, key: &str) -> Option<&'v Value> {
    o.get(key).filter(|v| !v.is_null())
}

fn required<'v>(o: &'v Obj, key: &'static str, path: &Path<'_>) -> Result<&'v Value> {
    member(o, key).ok_or_else(|| schema(&path.key(key), "missing required field"))
}

fn node_type<'v>(o: &'v Obj, path: &Path<'_>) -> Result<&'v str> {
    match o.get("NodeType") {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(schema(&path.key("NodeType"), "expected a string")),
        None => Err(schema(&path.key("NodeType"), "missing required field")),
    }
}

fn expect_tag(o: &Obj, want: &str, path: &Path<'_>) -> Result<()> {
    let tag = node_type(o, path)?;
    if tag != want {
        return Err(schema(path, format!("expected a {want} node, found {tag:?}")));
    }
    Ok(())
}

fn kind<K: FamilyKind>(o: &Obj, path: &Path<'_>) -> Result<K> {
    let tag = node_type(o, path)?;
    K::lookup(tag).ok_or_else(|| CodecError::UnknownTag {
        tag: tag.to_string(),
        family: K::FAMILY,
        path: path.to_string(),
    })
}

fn string<'v>(o: &'v Obj, key: &'static str, path: &Path<'_>) -> Result<&'v str> {
    required(o, key, path)?
        .as_str()
        .ok_or_else(|| schema(&path.key(key), "expected a string"))
}

fn opt_string<'v>(o: &'v Obj, key: &'static str, path: &Path<'_>) -> Result<&'v str> {
    match member(o, key) {
        None => Ok(""),
        Some(v) => v
            .as_str()
            .ok_or_else(|| schema(&path.key(key), "expected a string")),
    }
}

fn flag(o: &Obj, key: &'static str, path: &Path<'_>) -> Result<bool> {
    match member(o, key) {
        None => Ok(false),
        Some(v) => v
            .as_bool()
            .ok_or_else(|| schema(&path.key(key), "expected a boolean")),
    }
}

fn count(o: &Obj, key: &'static str, path: &Path<'_>) -> Result<usize> {
    match member(o, key) {
        None => Ok(0),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| schema(&path.key(key), "expected a non-negative integer")),
    }
}

fn list<'v>(o: &'v Obj, key: &'static str, path: &Path<'_>) -> Result<&'v [Value]> {
    match member(o, key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(schema(&path.key(key), "expected an array")),
    }
}

fn token<T: TokenText>(o: &Obj, key: &'static str, path: &Path<'_>) -> Result<T> {
    let text = string(o, key, path)?;
    T::from_text(text).ok_or_else(|| CodecError::UnknownOperator {
        text: text.to_string(),
        what: T::WHAT,
        path: path.key(key).to_string(),
    })
}

fn opt_token<T: TokenText>(o: &Obj, key: &'static str, path: &Path<'_>) -> Result<Option<T>> {
    match member(o, key) {
        None => Ok(None),
        Some(_) => token(o, key, path).map(Some),
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

type Seen<I> = HashMap<u32, (&'static str, I)>;

/// Nodes already built for a `RefId`, with the tag they were built from.
#[derive(Default)]
struct RefMaps {
    exprs: Seen<ExprId>,
    stmts: Seen<StmtId>,
    decls: Seen<DeclId>,
    specs: Seen<SpecId>,
    fields: Seen<FieldId>,
    groups: Seen<CommentGroupId>,
}

struct Unmarshaller {
    a: AstArena,
    pos: PosDecoder,
    comments: bool,
    imports: bool,
    references: bool,
    refs: RefMaps,
    nodes: usize,
    reused: usize,
}

impl Unmarshaller {
    fn new(opts: &Options) -> Self {
        Self {
            a: AstArena::new(),
            pos: PosDecoder::new(opts.with_positions),
            comments: opts.with_comments,
            imports: opts.with_imports,
            references: opts.with_references,
            refs: RefMaps::default(),
            nodes: 0,
            reused: 0,
        }
    }

    fn ref_id(&self, o: &Obj, path: &Path<'_>) -> Result<Option<u32>> {
        if !self.references {
            return Ok(None);
        }
        match member(o, "RefId") {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .filter(|&n| n >= 1)
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| schema(&path.key("RefId"), "expected a positive integer")),
        }
    }

    /// Reuses the node already built for this `RefId`, or builds a new one.
    fn tracked<I: Copy>(
        &mut self,
        o: &Obj,
        path: &Path<'_>,
        tag: &'static str,
        slot: fn(&mut RefMaps) -> &mut Seen<I>,
        build: impl FnOnce(&mut Self) -> Result<I>,
    ) -> Result<I> {
        let ref_id = self.ref_id(o, path)?;
        if let Some(r) = ref_id {
            if let Some(&(first, id)) = slot(&mut self.refs).get(&r) {
                if first != tag {
                    return Err(schema(
                        path,
                        format!("RefId {r} was first used by a {first} node, not {tag}"),
                    ));
                }
                self.reused += 1;
                return Ok(id);
            }
        }
        self.nodes += 1;
        trace!(%path, tag, "decoding node");
        let id = build(self)?;
        if let Some(r) = ref_id {
            slot(&mut self.refs).insert(r, (tag, id));
        }
        Ok(id)
    }

    // -------------------------------------------------------------------------
    // Positions and comments
    // -------------------------------------------------------------------------

    fn position(&mut self, v: &Value, path: &Path<'_>) -> Result<Pos> {
        let o = object(v, path)?;
        expect_tag(o, Position::TAG, path)?;
        let coord = Coord {
            filename: opt_string(o, "Filename", path)?,
            offset: count(o, "Offset", path)?,
            line: count(o, "Line", path)?,
            column: count(o, "Column", path)?,
        };
        // Line n starts at byte n-1 at the earliest.
        if coord.offset >= u32::MAX as usize
            || coord.line > coord.offset + 1
            || coord.column > coord.offset + 1
        {
            return Err(schema(path, "position out of range"));
        }
        Ok(self.pos.record(coord))
    }

    fn pos(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<Pos> {
        if !self.pos.is_enabled() {
            return Ok(Pos::NONE);
        }
        match member(o, key) {
            None => Ok(Pos::NONE),
            Some(v) => self.position(v, &path.key(key)),
        }
    }

    /// Presence marker: set whenever the member is there, with or without
    /// coordinates.
    fn marker(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<Option<Pos>> {
        match member(o, key) {
            None => Ok(None),
            Some(_) => self.pos(o, key, path).map(Some),
        }
    }

    fn group(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<Option<CommentGroupId>> {
        if !self.comments {
            return Ok(None);
        }
        match member(o, key) {
            None => Ok(None),
            Some(v) => self.comment_group(v, &path.key(key)).map(Some),
        }
    }

    fn comment_group(&mut self, v: &Value, path: &Path<'_>) -> Result<CommentGroupId> {
        let o = object(v, path)?;
        expect_tag(o, "CommentGroup", path)?;
        self.tracked(o, path, "CommentGroup", |r| &mut r.groups, |this| {
            let here = path.key("List");
            let mut comments = Vec::new();
            for (i, c) in list(o, "List", path)?.iter().enumerate() {
                let p = here.index(i);
                let co = object(c, &p)?;
                expect_tag(co, "Comment", &p)?;
                let slash = this.pos(co, "Slash", &p)?;
                let text = this.a.symbols.intern(string(co, "Text", &p)?);
                comments.push(Comment { slash, text });
            }
            let list = this.a.list_comments(comments);
            Ok(this.a.comment_groups.alloc(CommentGroup { list }))
        })
    }

    // -------------------------------------------------------------------------
    // Helper nodes
    // -------------------------------------------------------------------------

    fn file(&mut self, v: &Value, path: &Path<'_>) -> Result<File> {
        let o = object(v, path)?;
        expect_tag(o, "File", path)?;
        let doc = self.group(o, "Doc", path)?;
        let package = self.pos(o, "Package", path)?;
        let name = self.ident(required(o, "Name", path)?, &path.key("Name"))?;
        let decls = self.decls(o, "Decls", path)?;
        let imports = if self.imports && member(o, "Imports").is_some() {
            self.specs(o, "Imports", path)?
        } else {
            let mut found = ImportCollector::default();
            for &d in self.a.decls_list(decls) {
                found.visit_decl(&self.a, d);
            }
            self.a.list_specs(found.specs)
        };
        let unresolved = self.idents(o, "Unresolved", path)?;
        let comments = if self.comments {
            let here = path.key("Comments");
            let mut groups = Vec::new();
            for (i, g) in list(o, "Comments", path)?.iter().enumerate() {
                groups.push(self.comment_group(g, &here.index(i))?);
            }
            self.a.list_comment_groups(groups)
        } else {
            ListRef::EMPTY
        };
        Ok(File {
            doc,
            package,
            name,
            decls,
            imports,
            unresolved,
            comments,
        })
    }

    fn ident_body(&mut self, o: &Obj, path: &Path<'_>) -> Result<Ident> {
        let pos = self.pos(o, "NamePos", path)?;
        let name = string(o, "Name", path)?;
        Ok(self.a.ident(name, pos))
    }

    fn ident(&mut self, v: &Value, path: &Path<'_>) -> Result<Ident> {
        let o = object(v, path)?;
        expect_tag(o, "Ident", path)?;
        self.ident_body(o, path)
    }

    fn opt_ident(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<Option<Ident>> {
        match member(o, key) {
            None => Ok(None),
            Some(v) => self.ident(v, &path.key(key)).map(Some),
        }
    }

    fn idents(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<ListRef<Ident>> {
        let here = path.key(key);
        let mut out = Vec::new();
        for (i, v) in list(o, key, path)?.iter().enumerate() {
            out.push(self.ident(v, &here.index(i))?);
        }
        Ok(self.a.list_idents(out))
    }

    fn lit_body(&mut self, o: &Obj, path: &Path<'_>) -> Result<BasicLit> {
        let pos = self.pos(o, "ValuePos", path)?;
        let kind: BasicLitKind = token(o, "Kind", path)?;
        let value = self.a.symbols.intern(string(o, "Value", path)?);
        Ok(BasicLit { pos, kind, value })
    }

    fn lit(&mut self, v: &Value, path: &Path<'_>) -> Result<BasicLit> {
        let o = object(v, path)?;
        expect_tag(o, "BasicLit", path)?;
        self.lit_body(o, path)
    }

    fn field(&mut self, v: &Value, path: &Path<'_>) -> Result<FieldId> {
        let o = object(v, path)?;
        expect_tag(o, "Field", path)?;
        self.tracked(o, path, "Field", |r| &mut r.fields, |this| {
            let doc = this.group(o, "Doc", path)?;
            let names = this.idents(o, "Names", path)?;
            let typ = this.req_expr(o, "Type", path)?;
            let tag = match member(o, "Tag") {
                None => None,
                Some(t) => Some(this.lit(t, &path.key("Tag"))?),
            };
            let comment = this.group(o, "Comment", path)?;
            Ok(this.a.field(Field {
                doc,
                names,
                typ,
                tag,
                comment,
            }))
        })
    }

    fn field_list(&mut self, v: &Value, path: &Path<'_>) -> Result<FieldList> {
        let o = object(v, path)?;
        expect_tag(o, "FieldList", path)?;
        let opening = self.pos(o, "Opening", path)?;
        let here = path.key("List");
        let mut fields = Vec::new();
        for (i, f) in list(o, "List", path)?.iter().enumerate() {
            fields.push(self.field(f, &here.index(i))?);
        }
        let closing = self.pos(o, "Closing", path)?;
        Ok(FieldList {
            opening,
            list: self.a.list_fields(fields),
            closing,
        })
    }

    fn req_field_list(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<FieldList> {
        let v = required(o, key, path)?;
        self.field_list(v, &path.key(key))
    }

    fn opt_field_list(
        &mut self,
        o: &Obj,
        key: &'static str,
        path: &Path<'_>,
    ) -> Result<Option<FieldList>> {
        match member(o, key) {
            None => Ok(None),
            Some(v) => self.field_list(v, &path.key(key)).map(Some),
        }
    }

    fn block_body(&mut self, o: &Obj, path: &Path<'_>) -> Result<Block> {
        Ok(Block {
            lbrace: self.pos(o, "Lbrace", path)?,
            list: self.stmts(o, "List", path)?,
            rbrace: self.pos(o, "Rbrace", path)?,
        })
    }

    fn block(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<Block> {
        let here = path.key(key);
        let b = object(required(o, key, path)?, &here)?;
        expect_tag(b, StmtKind::BlockStmt.tag(), &here)?;
        self.block_body(b, &here)
    }

    fn opt_block(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<Option<Block>> {
        match member(o, key) {
            None => Ok(None),
            Some(_) => self.block(o, key, path).map(Some),
        }
    }

    fn func_type_body(&mut self, o: &Obj, path: &Path<'_>) -> Result<FuncType> {
        Ok(FuncType {
            func: self.pos(o, "Func", path)?,
            type_params: self.opt_field_list(o, "TypeParams", path)?,
            params: self.req_field_list(o, "Params", path)?,
            results: self.opt_field_list(o, "Results", path)?,
        })
    }

    fn func_type(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<FuncType> {
        let here = path.key(key);
        let f = object(required(o, key, path)?, &here)?;
        expect_tag(f, ExprKind::FuncType.tag(), &here)?;
        self.func_type_body(f, &here)
    }

    fn call_body(&mut self, o: &Obj, path: &Path<'_>) -> Result<CallExpr> {
        Ok(CallExpr {
            fun: self.req_expr(o, "Fun", path)?,
            lparen: self.pos(o, "Lparen", path)?,
            args: self.exprs(o, "Args", path)?,
            ellipsis: self.marker(o, "Ellipsis", path)?,
            rparen: self.pos(o, "Rparen", path)?,
        })
    }

    fn call(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<CallExpr> {
        let here = path.key(key);
        let c = object(required(o, key, path)?, &here)?;
        expect_tag(c, ExprKind::CallExpr.tag(), &here)?;
        self.call_body(c, &here)
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn expr(&mut self, v: &Value, path: &Path<'_>) -> Result<ExprId> {
        let o = object(v, path)?;
        let kind: ExprKind = kind(o, path)?;
        self.tracked(o, path, kind.tag(), |r| &mut r.exprs, |this| {
            let e = this.expr_body(kind, o, path)?;
            Ok(this.a.expr(e))
        })
    }

    fn req_expr(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<ExprId> {
        let v = required(o, key, path)?;
        self.expr(v, &path.key(key))
    }

    fn opt_expr(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<Option<ExprId>> {
        match member(o, key) {
            None => Ok(None),
            Some(v) => self.expr(v, &path.key(key)).map(Some),
        }
    }

    fn exprs(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<ListRef<ExprId>> {
        let here = path.key(key);
        let mut out = Vec::new();
        for (i, v) in list(o, key, path)?.iter().enumerate() {
            out.push(self.expr(v, &here.index(i))?);
        }
        Ok(self.a.list_exprs(out))
    }

    fn expr_body(&mut self, kind: ExprKind, o: &Obj, p: &Path<'_>) -> Result<Expr> {
        Ok(match kind {
            ExprKind::BadExpr => Expr::Bad {
                from: self.pos(o, "From", p)?,
                to: self.pos(o, "To", p)?,
            },
            ExprKind::Ident => Expr::Ident(self.ident_body(o, p)?),
            ExprKind::Ellipsis => Expr::Ellipsis {
                ellipsis: self.pos(o, "Ellipsis", p)?,
                elt: self.opt_expr(o, "Elt", p)?,
            },
            ExprKind::BasicLit => Expr::BasicLit(self.lit_body(o, p)?),
            ExprKind::FuncLit => Expr::FuncLit {
                typ: self.func_type(o, "Type", p)?,
                body: self.block(o, "Body", p)?,
            },
            ExprKind::CompositeLit => Expr::CompositeLit {
                typ: self.opt_expr(o, "Type", p)?,
                lbrace: self.pos(o, "Lbrace", p)?,
                elts: self.exprs(o, "Elts", p)?,
                rbrace: self.pos(o, "Rbrace", p)?,
                incomplete: flag(o, "Incomplete", p)?,
            },
            ExprKind::ParenExpr => Expr::Paren {
                lparen: self.pos(o, "Lparen", p)?,
                x: self.req_expr(o, "X", p)?,
                rparen: self.pos(o, "Rparen", p)?,
            },
            ExprKind::SelectorExpr => Expr::Selector {
                x: self.req_expr(o, "X", p)?,
                sel: self.ident(required(o, "Sel", p)?, &p.key("Sel"))?,
            },
            ExprKind::IndexExpr => Expr::Index {
                x: self.req_expr(o, "X", p)?,
                lbrack: self.pos(o, "Lbrack", p)?,
                index: self.req_expr(o, "Index", p)?,
                rbrack: self.pos(o, "Rbrack", p)?,
            },
            ExprKind::IndexListExpr => Expr::IndexList {
                x: self.req_expr(o, "X", p)?,
                lbrack: self.pos(o, "Lbrack", p)?,
                indices: self.exprs(o, "Indices", p)?,
                rbrack: self.pos(o, "Rbrack", p)?,
            },
            ExprKind::SliceExpr => Expr::Slice {
                x: self.req_expr(o, "X", p)?,
                lbrack: self.pos(o, "Lbrack", p)?,
                low: self.opt_expr(o, "Low", p)?,
                high: self.opt_expr(o, "High", p)?,
                max: self.opt_expr(o, "Max", p)?,
                slice3: flag(o, "Slice3", p)?,
                rbrack: self.pos(o, "Rbrack", p)?,
            },
            ExprKind::TypeAssertExpr => Expr::TypeAssert {
                x: self.req_expr(o, "X", p)?,
                lparen: self.pos(o, "Lparen", p)?,
                typ: self.opt_expr(o, "Type", p)?,
                rparen: self.pos(o, "Rparen", p)?,
            },
            ExprKind::CallExpr => Expr::Call(self.call_body(o, p)?),
            ExprKind::StarExpr => Expr::Star {
                star: self.pos(o, "Star", p)?,
                x: self.req_expr(o, "X", p)?,
            },
            ExprKind::UnaryExpr => Expr::Unary {
                op_pos: self.pos(o, "OpPos", p)?,
                op: token(o, "Op", p)?,
                x: self.req_expr(o, "X", p)?,
            },
            ExprKind::BinaryExpr => Expr::Binary {
                x: self.req_expr(o, "X", p)?,
                op_pos: self.pos(o, "OpPos", p)?,
                op: token(o, "Op", p)?,
                y: self.req_expr(o, "Y", p)?,
            },
            ExprKind::KeyValueExpr => Expr::KeyValue {
                key: self.req_expr(o, "Key", p)?,
                colon: self.pos(o, "Colon", p)?,
                value: self.req_expr(o, "Value", p)?,
            },
            ExprKind::ArrayType => Expr::ArrayType {
                lbrack: self.pos(o, "Lbrack", p)?,
                len: self.opt_expr(o, "Len", p)?,
                elt: self.req_expr(o, "Elt", p)?,
            },
            ExprKind::StructType => Expr::StructType {
                struct_pos: self.pos(o, "Struct", p)?,
                fields: self.req_field_list(o, "Fields", p)?,
                incomplete: flag(o, "Incomplete", p)?,
            },
            ExprKind::FuncType => Expr::FuncType(self.func_type_body(o, p)?),
            ExprKind::InterfaceType => Expr::InterfaceType {
                interface: self.pos(o, "Interface", p)?,
                methods: self.req_field_list(o, "Methods", p)?,
                incomplete: flag(o, "Incomplete", p)?,
            },
            ExprKind::MapType => Expr::MapType {
                map: self.pos(o, "Map", p)?,
                key: self.req_expr(o, "Key", p)?,
                value: self.req_expr(o, "Value", p)?,
            },
            ExprKind::ChanType => {
                let begin = self.pos(o, "Begin", p)?;
                let arrow = self.pos(o, "Arrow", p)?;
                let dir: ChanDir = match o.get("Dir") {
                    Some(Value::String(_)) => token(o, "Dir", p)?,
                    Some(_) => return Err(schema(&p.key("Dir"), "expected a string")),
                    None => return Err(schema(&p.key("Dir"), "missing required field")),
                };
                Expr::ChanType {
                    begin,
                    arrow,
                    dir,
                    value: self.req_expr(o, "Value", p)?,
                }
            }
        })
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn stmt(&mut self, v: &Value, path: &Path<'_>) -> Result<StmtId> {
        let o = object(v, path)?;
        let kind: StmtKind = kind(o, path)?;
        self.tracked(o, path, kind.tag(), |r| &mut r.stmts, |this| {
            let s = this.stmt_body(kind, o, path)?;
            Ok(this.a.stmt(s))
        })
    }

    fn req_stmt(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<StmtId> {
        let v = required(o, key, path)?;
        self.stmt(v, &path.key(key))
    }

    fn opt_stmt(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<Option<StmtId>> {
        match member(o, key) {
            None => Ok(None),
            Some(v) => self.stmt(v, &path.key(key)).map(Some),
        }
    }

    fn stmts(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<ListRef<StmtId>> {
        let here = path.key(key);
        let mut out = Vec::new();
        for (i, v) in list(o, key, path)?.iter().enumerate() {
            out.push(self.stmt(v, &here.index(i))?);
        }
        Ok(self.a.list_stmts(out))
    }

    fn stmt_body(&mut self, kind: StmtKind, o: &Obj, p: &Path<'_>) -> Result<Stmt> {
        Ok(match kind {
            StmtKind::BadStmt => Stmt::Bad {
                from: self.pos(o, "From", p)?,
                to: self.pos(o, "To", p)?,
            },
            StmtKind::DeclStmt => Stmt::Decl(self.req_decl(o, "Decl", p)?),
            StmtKind::EmptyStmt => Stmt::Empty {
                semicolon: self.pos(o, "Semicolon", p)?,
                implicit: flag(o, "Implicit", p)?,
            },
            StmtKind::LabeledStmt => Stmt::Labeled {
                label: self.ident(required(o, "Label", p)?, &p.key("Label"))?,
                colon: self.pos(o, "Colon", p)?,
                stmt: self.req_stmt(o, "Stmt", p)?,
            },
            StmtKind::ExprStmt => Stmt::Expr(self.req_expr(o, "X", p)?),
            StmtKind::SendStmt => Stmt::Send {
                chan: self.req_expr(o, "Chan", p)?,
                arrow: self.pos(o, "Arrow", p)?,
                value: self.req_expr(o, "Value", p)?,
            },
            StmtKind::IncDecStmt => Stmt::IncDec {
                x: self.req_expr(o, "X", p)?,
                tok_pos: self.pos(o, "TokPos", p)?,
                tok: token(o, "Tok", p)?,
            },
            StmtKind::AssignStmt => Stmt::Assign {
                lhs: self.exprs(o, "Lhs", p)?,
                tok_pos: self.pos(o, "TokPos", p)?,
                tok: token(o, "Tok", p)?,
                rhs: self.exprs(o, "Rhs", p)?,
            },
            StmtKind::GoStmt => Stmt::Go {
                go: self.pos(o, "Go", p)?,
                call: self.call(o, "Call", p)?,
            },
            StmtKind::DeferStmt => Stmt::Defer {
                defer: self.pos(o, "Defer", p)?,
                call: self.call(o, "Call", p)?,
            },
            StmtKind::ReturnStmt => Stmt::Return {
                ret: self.pos(o, "Return", p)?,
                results: self.exprs(o, "Results", p)?,
            },
            StmtKind::BranchStmt => Stmt::Branch {
                tok_pos: self.pos(o, "TokPos", p)?,
                tok: token(o, "Tok", p)?,
                label: self.opt_ident(o, "Label", p)?,
            },
            StmtKind::BlockStmt => Stmt::Block(self.block_body(o, p)?),
            StmtKind::IfStmt => Stmt::If {
                if_pos: self.pos(o, "If", p)?,
                init: self.opt_stmt(o, "Init", p)?,
                cond: self.req_expr(o, "Cond", p)?,
                body: self.block(o, "Body", p)?,
                els: self.opt_stmt(o, "Else", p)?,
            },
            StmtKind::CaseClause => Stmt::CaseClause {
                case: self.pos(o, "Case", p)?,
                list: self.exprs(o, "List", p)?,
                colon: self.pos(o, "Colon", p)?,
                body: self.stmts(o, "Body", p)?,
            },
            StmtKind::SwitchStmt => Stmt::Switch {
                switch: self.pos(o, "Switch", p)?,
                init: self.opt_stmt(o, "Init", p)?,
                tag: self.opt_expr(o, "Tag", p)?,
                body: self.block(o, "Body", p)?,
            },
            StmtKind::TypeSwitchStmt => Stmt::TypeSwitch {
                switch: self.pos(o, "Switch", p)?,
                init: self.opt_stmt(o, "Init", p)?,
                assign: self.req_stmt(o, "Assign", p)?,
                body: self.block(o, "Body", p)?,
            },
            StmtKind::CommClause => Stmt::CommClause {
                case: self.pos(o, "Case", p)?,
                comm: self.opt_stmt(o, "Comm", p)?,
                colon: self.pos(o, "Colon", p)?,
                body: self.stmts(o, "Body", p)?,
            },
            StmtKind::SelectStmt => Stmt::Select {
                select: self.pos(o, "Select", p)?,
                body: self.block(o, "Body", p)?,
            },
            StmtKind::ForStmt => Stmt::For {
                for_pos: self.pos(o, "For", p)?,
                init: self.opt_stmt(o, "Init", p)?,
                cond: self.opt_expr(o, "Cond", p)?,
                post: self.opt_stmt(o, "Post", p)?,
                body: self.block(o, "Body", p)?,
            },
            StmtKind::RangeStmt => Stmt::Range {
                for_pos: self.pos(o, "For", p)?,
                key: self.opt_expr(o, "Key", p)?,
                value: self.opt_expr(o, "Value", p)?,
                tok_pos: self.pos(o, "TokPos", p)?,
                tok: opt_token(o, "Tok", p)?,
                x: self.req_expr(o, "X", p)?,
                body: self.block(o, "Body", p)?,
            },
        })
    }

    // -------------------------------------------------------------------------
    // Specifications
    // -------------------------------------------------------------------------

    fn spec(&mut self, v: &Value, path: &Path<'_>) -> Result<SpecId> {
        let o = object(v, path)?;
        let kind: SpecKind = kind(o, path)?;
        self.tracked(o, path, kind.tag(), |r| &mut r.specs, |this| {
            let s = this.spec_body(kind, o, path)?;
            Ok(this.a.spec(s))
        })
    }

    fn specs(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<ListRef<SpecId>> {
        let here = path.key(key);
        let mut out = Vec::new();
        for (i, v) in list(o, key, path)?.iter().enumerate() {
            out.push(self.spec(v, &here.index(i))?);
        }
        Ok(self.a.list_specs(out))
    }

    fn spec_body(&mut self, kind: SpecKind, o: &Obj, p: &Path<'_>) -> Result<Spec> {
        Ok(match kind {
            SpecKind::ImportSpec => Spec::Import {
                doc: self.group(o, "Doc", p)?,
                name: self.opt_ident(o, "Name", p)?,
                path: self.lit(required(o, "Path", p)?, &p.key("Path"))?,
                comment: self.group(o, "Comment", p)?,
                end_pos: self.pos(o, "EndPos", p)?,
            },
            SpecKind::ValueSpec => Spec::Value {
                doc: self.group(o, "Doc", p)?,
                names: self.idents(o, "Names", p)?,
                typ: self.opt_expr(o, "Type", p)?,
                values: self.exprs(o, "Values", p)?,
                comment: self.group(o, "Comment", p)?,
            },
            SpecKind::TypeSpec => Spec::Type {
                doc: self.group(o, "Doc", p)?,
                name: self.ident(required(o, "Name", p)?, &p.key("Name"))?,
                type_params: self.opt_field_list(o, "TypeParams", p)?,
                assign: self.marker(o, "Assign", p)?,
                typ: self.req_expr(o, "Type", p)?,
                comment: self.group(o, "Comment", p)?,
            },
        })
    }

    // -------------------------------------------------------------------------
    // Declarations
    // -------------------------------------------------------------------------

    fn decl(&mut self, v: &Value, path: &Path<'_>) -> Result<DeclId> {
        let o = object(v, path)?;
        let kind: DeclKind = kind(o, path)?;
        self.tracked(o, path, kind.tag(), |r| &mut r.decls, |this| {
            let d = this.decl_body(kind, o, path)?;
            Ok(this.a.decl(d))
        })
    }

    fn req_decl(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<DeclId> {
        let v = required(o, key, path)?;
        self.decl(v, &path.key(key))
    }

    fn decls(&mut self, o: &Obj, key: &'static str, path: &Path<'_>) -> Result<ListRef<DeclId>> {
        let here = path.key(key);
        let mut out = Vec::new();
        for (i, v) in list(o, key, path)?.iter().enumerate() {
            out.push(self.decl(v, &here.index(i))?);
        }
        Ok(self.a.list_decls(out))
    }

    fn decl_body(&mut self, kind: DeclKind, o: &Obj, p: &Path<'_>) -> Result<Decl> {
        Ok(match kind {
            DeclKind::BadDecl => Decl::Bad {
                from: self.pos(o, "From", p)?,
                to: self.pos(o, "To", p)?,
            },
            DeclKind::GenDecl => {
                let doc = self.group(o, "Doc", p)?;
                let tok_pos = self.pos(o, "TokPos", p)?;
                let tok: GenDeclTok = token(o, "Tok", p)?;
                Decl::Gen(GenDecl {
                    doc,
                    tok_pos,
                    tok,
                    lparen: self.marker(o, "Lparen", p)?,
                    specs: self.specs(o, "Specs", p)?,
                    rparen: self.marker(o, "Rparen", p)?,
                })
            }
            DeclKind::FuncDecl => Decl::Func(FuncDecl {
                doc: self.group(o, "Doc", p)?,
                recv: self.opt_field_list(o, "Recv", p)?,
                name: self.ident(required(o, "Name", p)?, &p.key("Name"))?,
                typ: self.func_type(o, "Type", p)?,
                body: self.opt_block(o, "Body", p)?,
            }),
        })
    }
}
