//! # Go syntax tree
//!
//! Arena-allocated syntax tree shaped after the classic Go `ast` package so that
//! every node kind has a stable name and a fixed, ordered field set.
//!
//! ## Architecture
//!
//! - **Families**: expressions, statements, declarations and specifications are
//!   closed enums stored in typed arenas (`Arena<T>`) and addressed by `Id<T>`.
//!   Two parents holding the same id share one node instance.
//! - **Helper nodes**: `Ident`, `BasicLit`, `Block`, `FuncType`, `CallExpr` and
//!   `FieldList` are `Copy` structs stored inline in their parent.
//! - **Lists**: centralized buffers in `ExtraData`, referenced by `ListRef<T>`.
//! - **Positions**: every node stores its own `Pos` fields; `Pos::NONE` marks a
//!   synthesized coordinate. `crate::position::SourceMap` resolves them.
//! - **Symbols**: identifier names, literal values and comment text are interned.
//!
//! Walk/Visitor infrastructure lives in `walk.rs`; `#[derive(WalkAst)]`
//! generates `impl crate::walk::Walk`.

use ast_derive::WalkAst;
use core::cmp::Ordering;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hash, Hasher, RandomState};

use crate::position::SourceMap;
pub use crate::token::{
    AssignOp, BasicLitKind, BinaryOp, BranchTok, ChanDir, GenDeclTok, IncDecOp, UnaryOp,
};

// =============================================================================
// Core Foundation Types
// =============================================================================

/// Source coordinate: byte offset + 1, with 0 reserved for "no position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Pos(u32);

impl Pos {
    pub const NONE: Pos = Pos(0);

    /// Position of the byte at `offset`. Clamps instead of panicking on >4GiB inputs.
    #[inline]
    pub const fn at(offset: usize) -> Self {
        if offset >= u32::MAX as usize {
            Pos(u32::MAX)
        } else {
            Pos(offset as u32 + 1)
        }
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Byte offset, or `None` for a synthesized position.
    #[inline]
    pub const fn offset(self) -> Option<usize> {
        match self.0 {
            0 => None,
            n => Some(n as usize - 1),
        }
    }
}

/// Type-safe identifier for arena-allocated nodes.
///
/// The phantom marker ensures type safety at compile time.
#[derive(Debug)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

// Comparison and hashing look at the index only; node types need not be
// `Hash` or `Ord`.
impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }
}

/// Typed reference into a centralized list buffer.
///
/// Lists are stored in `AstArena::extras` to avoid per-node allocations.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// End index (exclusive).
    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

// =============================================================================
// Symbol Interning System
// =============================================================================

/// Interned string symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identity hasher for u64 values (used for symbol hash buckets).
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, _b: &[u8]) {
        unreachable!("U64IdentityHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner for names, literal text and comment text.
///
/// Uses a seeded random hasher; collisions are resolved inside the bucket.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string and returns its symbol.
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let entry = self.buckets.entry(h).or_default();

        for &sym in entry.iter() {
            if self.strings[sym.0 as usize].as_ref() == s {
                return sym;
            }
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Resolves a symbol back to its string.
    ///
    /// Symbols are only minted by `intern`, so an out-of-range symbol comes from
    /// another interner; it resolves to the empty string.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        debug_assert!((sym.0 as usize) < self.strings.len());
        self.strings.get(sym.0 as usize).map_or("", |s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arena Allocation
// =============================================================================

/// Typed node arena. The index of a node is its identity.
#[derive(Debug)]
pub struct Arena<T> {
    data: Vec<T>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

impl<T> Arena<T> {
    #[inline]
    pub fn alloc(&mut self, node: T) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        id
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, n)| (Id::from_raw(i as u32), n))
    }
}

impl<T> Index<Id<T>> for Arena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<Id<T>> for Arena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        self.get_mut(id)
    }
}

// =============================================================================
// Type Aliases for Node IDs
// =============================================================================

pub type ExprId = Id<Expr>;
pub type StmtId = Id<Stmt>;
pub type DeclId = Id<Decl>;
pub type SpecId = Id<Spec>;
pub type FieldId = Id<Field>;
pub type CommentGroupId = Id<CommentGroup>;

// =============================================================================
// Centralized List Storage
// =============================================================================

/// Buffers that `ListRef<T>` points into.
#[derive(Debug, Default)]
pub struct ExtraData {
    pub idents: Vec<Ident>,
    pub exprs: Vec<ExprId>,
    pub stmts: Vec<StmtId>,
    pub decls: Vec<DeclId>,
    pub specs: Vec<SpecId>,
    pub fields: Vec<FieldId>,
    pub comments: Vec<Comment>,
    pub comment_groups: Vec<CommentGroupId>,
}

// =============================================================================
// Main AST Arena
// =============================================================================

/// Central arena holding all nodes, list buffers and interned strings.
#[derive(Debug, Default)]
pub struct AstArena {
    pub exprs: Arena<Expr>,
    pub stmts: Arena<Stmt>,
    pub decls: Arena<Decl>,
    pub specs: Arena<Spec>,
    pub fields: Arena<Field>,
    pub comment_groups: Arena<CommentGroup>,
    pub symbols: Interner,
    pub extras: ExtraData,
}

macro_rules! list_accessors {
    ($($build:ident / $get:ident: $t:ty => $buf:ident),* $(,)?) => {
        $(
            pub fn $build(&mut self, items: impl IntoIterator<Item = $t>) -> ListRef<$t> {
                Self::push_list(&mut self.extras.$buf, items)
            }

            pub fn $get(&self, r: ListRef<$t>) -> &[$t] {
                Self::slice(&self.extras.$buf, r)
            }
        )*
    };
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
        let start = buf.len();
        buf.extend(items);
        let len = buf.len() - start;
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(len <= u32::MAX as usize);
        ListRef::new(start as u32, len as u32)
    }

    #[inline]
    fn slice<T>(buf: &[T], r: ListRef<T>) -> &[T] {
        &buf[r.start() as usize..r.end() as usize]
    }

    list_accessors! {
        list_idents / idents: Ident => idents,
        list_exprs / exprs_list: ExprId => exprs,
        list_stmts / stmts_list: StmtId => stmts,
        list_decls / decls_list: DeclId => decls,
        list_specs / specs_list: SpecId => specs,
        list_fields / fields_list: FieldId => fields,
        list_comments / comments_list: Comment => comments,
        list_comment_groups / comment_groups_list: CommentGroupId => comment_groups,
    }

    // Allocation shorthands

    pub fn expr(&mut self, e: Expr) -> ExprId {
        self.exprs.alloc(e)
    }

    pub fn stmt(&mut self, s: Stmt) -> StmtId {
        self.stmts.alloc(s)
    }

    pub fn decl(&mut self, d: Decl) -> DeclId {
        self.decls.alloc(d)
    }

    pub fn spec(&mut self, s: Spec) -> SpecId {
        self.specs.alloc(s)
    }

    pub fn field(&mut self, f: Field) -> FieldId {
        self.fields.alloc(f)
    }

    /// Interns `name` and returns an identifier at `pos`.
    pub fn ident(&mut self, name: &str, pos: Pos) -> Ident {
        Ident {
            pos,
            name: self.symbols.intern(name),
        }
    }

    pub fn ident_expr(&mut self, name: &str, pos: Pos) -> ExprId {
        let id = self.ident(name, pos);
        self.expr(Expr::Ident(id))
    }

    #[inline]
    pub fn name(&self, sym: Symbol) -> &str {
        self.symbols.resolve(sym)
    }
}

// =============================================================================
// Comments
// =============================================================================

/// A single `//` or `/* */` comment, text including the markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Comment {
    pub slash: Pos,
    pub text: Symbol,
}

/// Sequence of comments with no other tokens and no empty lines between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CommentGroup {
    pub list: ListRef<Comment>,
}

// =============================================================================
// Source File (Root Node)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct File {
    pub doc: Option<CommentGroupId>,
    /// Position of the `package` keyword
    pub package: Pos,
    pub name: Ident,
    pub decls: ListRef<DeclId>,
    /// Import specs of this file, the same instances the import decls hold
    pub imports: ListRef<SpecId>,
    /// Unresolved identifiers (always empty: no object resolution is done)
    pub unresolved: ListRef<Ident>,
    /// Every comment group in source order
    pub comments: ListRef<CommentGroupId>,
}

/// A parsed or reconstructed file: the tree, its root and its coordinate resolver.
#[derive(Debug)]
pub struct SourceFile {
    pub arena: AstArena,
    pub file: File,
    pub source_map: SourceMap,
}

// =============================================================================
// Helper Nodes (inline, never shared)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident {
    pub pos: Pos,
    pub name: Symbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicLit {
    pub pos: Pos,
    pub kind: BasicLitKind,
    /// Literal source text, quotes and prefixes included
    pub value: Symbol,
}

/// Braced statement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Block {
    pub lbrace: Pos,
    pub list: ListRef<StmtId>,
    pub rbrace: Pos,
}

/// Parameter, result, receiver, type-parameter, struct-field or method list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FieldList {
    pub opening: Pos,
    pub list: ListRef<FieldId>,
    pub closing: Pos,
}

/// Function signature: `func[TypeParams](Params) Results`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FuncType {
    /// Position of `func` (NONE inside interface method specs)
    pub func: Pos,
    pub type_params: Option<FieldList>,
    pub params: FieldList,
    pub results: Option<FieldList>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CallExpr {
    pub fun: ExprId,
    pub lparen: Pos,
    pub args: ListRef<ExprId>,
    /// `Some` for `f(xs...)`; the position may still be NONE when synthesized
    pub ellipsis: Option<Pos>,
    pub rparen: Pos,
}

/// Parameter, struct field or interface element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Field {
    pub doc: Option<CommentGroupId>,
    /// Empty for anonymous parameters and embedded fields
    pub names: ListRef<Ident>,
    pub typ: ExprId,
    pub tag: Option<BasicLit>,
    pub comment: Option<CommentGroupId>,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Decl {
    Bad { from: Pos, to: Pos },
    Gen(GenDecl),
    Func(FuncDecl),
}

/// `import`, `const`, `type` or `var` declaration, grouped or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct GenDecl {
    pub doc: Option<CommentGroupId>,
    pub tok_pos: Pos,
    pub tok: GenDeclTok,
    /// `Some` for a parenthesized group
    pub lparen: Option<Pos>,
    pub specs: ListRef<SpecId>,
    pub rparen: Option<Pos>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FuncDecl {
    pub doc: Option<CommentGroupId>,
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub typ: FuncType,
    /// `None` for external (bodyless) functions
    pub body: Option<Block>,
}

// =============================================================================
// Specifications
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Spec {
    Import {
        doc: Option<CommentGroupId>,
        name: Option<Ident>,
        path: BasicLit,
        comment: Option<CommentGroupId>,
        end_pos: Pos,
    },
    Value {
        doc: Option<CommentGroupId>,
        names: ListRef<Ident>,
        typ: Option<ExprId>,
        values: ListRef<ExprId>,
        comment: Option<CommentGroupId>,
    },
    Type {
        doc: Option<CommentGroupId>,
        name: Ident,
        type_params: Option<FieldList>,
        /// `Some` for an alias declaration (`type A = B`)
        assign: Option<Pos>,
        typ: ExprId,
        comment: Option<CommentGroupId>,
    },
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Stmt {
    Bad {
        from: Pos,
        to: Pos,
    },
    Decl(DeclId),
    /// Explicit `;` or one implied by a newline or closing brace
    Empty {
        semicolon: Pos,
        implicit: bool,
    },
    Labeled {
        label: Ident,
        colon: Pos,
        stmt: StmtId,
    },
    Expr(ExprId),
    Send {
        chan: ExprId,
        arrow: Pos,
        value: ExprId,
    },
    IncDec {
        x: ExprId,
        tok_pos: Pos,
        tok: IncDecOp,
    },
    Assign {
        lhs: ListRef<ExprId>,
        tok_pos: Pos,
        tok: AssignOp,
        rhs: ListRef<ExprId>,
    },
    Go {
        go: Pos,
        call: CallExpr,
    },
    Defer {
        defer: Pos,
        call: CallExpr,
    },
    Return {
        ret: Pos,
        results: ListRef<ExprId>,
    },
    Branch {
        tok_pos: Pos,
        tok: BranchTok,
        label: Option<Ident>,
    },
    Block(Block),
    If {
        if_pos: Pos,
        init: Option<StmtId>,
        cond: ExprId,
        body: Block,
        /// Another `If` or a `Block`
        els: Option<StmtId>,
    },
    /// `case List:` or `default:` (empty list) inside a switch body
    CaseClause {
        case: Pos,
        list: ListRef<ExprId>,
        colon: Pos,
        body: ListRef<StmtId>,
    },
    Switch {
        switch: Pos,
        init: Option<StmtId>,
        tag: Option<ExprId>,
        body: Block,
    },
    TypeSwitch {
        switch: Pos,
        init: Option<StmtId>,
        /// `x := y.(type)` or `y.(type)`
        assign: StmtId,
        body: Block,
    },
    /// `case Comm:` or `default:` (no comm) inside a select body
    CommClause {
        case: Pos,
        comm: Option<StmtId>,
        colon: Pos,
        body: ListRef<StmtId>,
    },
    Select {
        select: Pos,
        body: Block,
    },
    For {
        for_pos: Pos,
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: Block,
    },
    Range {
        for_pos: Pos,
        key: Option<ExprId>,
        value: Option<ExprId>,
        tok_pos: Pos,
        /// `None` when there is no key (`for range x`)
        tok: Option<AssignOp>,
        x: ExprId,
        body: Block,
    },
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Expr {
    Bad {
        from: Pos,
        to: Pos,
    },
    Ident(Ident),
    /// `...T` in a parameter list or `[...]T` array length (no element)
    Ellipsis {
        ellipsis: Pos,
        elt: Option<ExprId>,
    },
    BasicLit(BasicLit),
    FuncLit {
        typ: FuncType,
        body: Block,
    },
    CompositeLit {
        typ: Option<ExprId>,
        lbrace: Pos,
        elts: ListRef<ExprId>,
        rbrace: Pos,
        incomplete: bool,
    },
    Paren {
        lparen: Pos,
        x: ExprId,
        rparen: Pos,
    },
    Selector {
        x: ExprId,
        sel: Ident,
    },
    Index {
        x: ExprId,
        lbrack: Pos,
        index: ExprId,
        rbrack: Pos,
    },
    /// Generic instantiation with more than one type argument
    IndexList {
        x: ExprId,
        lbrack: Pos,
        indices: ListRef<ExprId>,
        rbrack: Pos,
    },
    Slice {
        x: ExprId,
        lbrack: Pos,
        low: Option<ExprId>,
        high: Option<ExprId>,
        max: Option<ExprId>,
        slice3: bool,
        rbrack: Pos,
    },
    /// `x.(T)`; `typ` is `None` for `x.(type)`
    TypeAssert {
        x: ExprId,
        lparen: Pos,
        typ: Option<ExprId>,
        rparen: Pos,
    },
    Call(CallExpr),
    /// `*x`: dereference or pointer type
    Star {
        star: Pos,
        x: ExprId,
    },
    Unary {
        op_pos: Pos,
        op: UnaryOp,
        x: ExprId,
    },
    Binary {
        x: ExprId,
        op_pos: Pos,
        op: BinaryOp,
        y: ExprId,
    },
    KeyValue {
        key: ExprId,
        colon: Pos,
        value: ExprId,
    },
    /// `[Len]Elt`; `len` is `None` for slices
    ArrayType {
        lbrack: Pos,
        len: Option<ExprId>,
        elt: ExprId,
    },
    StructType {
        struct_pos: Pos,
        fields: FieldList,
        incomplete: bool,
    },
    FuncType(FuncType),
    InterfaceType {
        interface: Pos,
        methods: FieldList,
        incomplete: bool,
    },
    MapType {
        map: Pos,
        key: ExprId,
        value: ExprId,
    },
    ChanType {
        begin: Pos,
        arrow: Pos,
        dir: ChanDir,
        value: ExprId,
    },
}

impl Expr {
    /// Strips any number of enclosing parentheses.
    pub fn unparen(a: &AstArena, mut id: ExprId) -> ExprId {
        while let Expr::Paren { x, .. } = a.exprs[id] {
            id = x;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_offsets() {
        assert!(!Pos::NONE.is_valid());
        assert_eq!(Pos::NONE.offset(), None);
        assert_eq!(Pos::at(0).offset(), Some(0));
        assert_eq!(Pos::at(41).offset(), Some(41));
        assert!(Pos::at(3) < Pos::at(4));
    }

    #[test]
    fn ids_compare_and_hash_by_index() {
        use std::collections::HashSet;

        let mut a = AstArena::new();
        let x = a.ident_expr("x", Pos::NONE);
        let y = a.ident_expr("y", Pos::NONE);
        let seen: HashSet<ExprId> = [x, y, x].into_iter().collect();
        assert_eq!(seen.len(), 2);
        assert!(x < y);
        assert_eq!(x, ExprId::from_raw(0));
    }

    #[test]
    fn interner_deduplicates() {
        let mut i = Interner::new();
        let a = i.intern("main");
        let b = i.intern("fmt");
        assert_eq!(i.intern("main"), a);
        assert_ne!(a, b);
        assert_eq!(i.resolve(b), "fmt");
        assert_eq!(i.len(), 2);
    }

    #[test]
    fn lists_are_contiguous_slices() {
        let mut a = AstArena::new();
        let x = a.ident_expr("x", Pos::NONE);
        let y = a.ident_expr("y", Pos::NONE);
        let first = a.list_exprs([x, y]);
        let second = a.list_exprs([y]);
        assert_eq!(a.exprs_list(first), &[x, y]);
        assert_eq!(a.exprs_list(second), &[y]);
        assert!(a.exprs_list(ListRef::EMPTY).is_empty());
    }

    #[test]
    fn unparen_strips_nested_parens() {
        let mut a = AstArena::new();
        let x = a.ident_expr("x", Pos::NONE);
        let p1 = a.expr(Expr::Paren {
            lparen: Pos::NONE,
            x,
            rparen: Pos::NONE,
        });
        let p2 = a.expr(Expr::Paren {
            lparen: Pos::NONE,
            x: p1,
            rparen: Pos::NONE,
        });
        assert_eq!(Expr::unparen(&a, p2), x);
    }
}
