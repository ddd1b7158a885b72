//! Serializable mirror of the syntax tree.
//!
//! Every node object is a [`Node`]: the `NodeType` tag, an optional `RefId`,
//! then the body fields in declaration order. Bodies of the four families are
//! untagged enums of structs named after their tags, so serde writes exactly
//! the field set of each kind and nothing else.
//!
//! Absent optional child nodes serialize as `null`; absent positions and
//! comment groups, empty lists and `false` flags are left out.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node<T> {
    #[serde(rename = "NodeType")]
    pub node_type: &'static str,
    #[serde(rename = "RefId", skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<u32>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Node<T> {
    pub fn new(node_type: &'static str, ref_id: Option<u32>, body: T) -> Self {
        Self {
            node_type,
            ref_id,
            body,
        }
    }
}

pub type Expr = Node<ExprBody>;
pub type Stmt = Node<StmtBody>;
pub type Spec = Node<SpecBody>;
pub type Decl = Node<DeclBody>;
pub type FileNode = Node<File>;

type Pos = Option<Position>;
type Comments = Option<Node<CommentGroup>>;

fn is_zero(n: &usize) -> bool {
    *n == 0
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Resolved coordinate. Positions never carry a `RefId`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Position {
    #[serde(rename = "NodeType")]
    node_type: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filename: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub offset: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub line: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub column: usize,
}

impl Position {
    pub const TAG: &'static str = "Position";

    pub fn new(filename: String, offset: usize, line: usize, column: usize) -> Self {
        Self {
            node_type: Self::TAG,
            filename,
            offset,
            line,
            column,
        }
    }

    /// Bare `{"NodeType":"Position"}`: marks presence without coordinates.
    pub fn empty() -> Self {
        Self::new(String::new(), 0, 0, 0)
    }
}

impl From<go125_syntax::Position> for Position {
    fn from(p: go125_syntax::Position) -> Self {
        Self::new(p.filename, p.offset, p.line, p.column)
    }
}

// ---------------------------------------------------------------------------
// Helper nodes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct File {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Comments,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Pos,
    pub name: Node<Ident>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decls: Vec<Decl>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<Spec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<Node<Ident>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Node<CommentGroup>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Comment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slash: Pos,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommentGroup {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<Node<Comment>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Field {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Comments,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<Node<Ident>>,
    #[serde(rename = "Type")]
    pub typ: Box<Expr>,
    pub tag: Option<Node<BasicLit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Comments,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FieldList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<Node<Field>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ident {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_pos: Pos,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BasicLit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_pos: Pos,
    pub kind: &'static str,
    pub value: String,
}

/// Body of a `BlockStmt`, inline or as a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrace: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<Stmt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrace: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FuncType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub func: Pos,
    pub type_params: Option<Node<FieldList>>,
    pub params: Node<FieldList>,
    pub results: Option<Node<FieldList>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallExpr {
    pub fun: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lparen: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ellipsis: Pos,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rparen: Pos,
}

/// `From`/`To` span shared by the three `Bad*` kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bad {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Pos,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Pos,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExprBody {
    BadExpr(Bad),
    Ident(Ident),
    Ellipsis(Ellipsis),
    BasicLit(BasicLit),
    FuncLit(FuncLit),
    CompositeLit(CompositeLit),
    ParenExpr(ParenExpr),
    SelectorExpr(SelectorExpr),
    IndexExpr(IndexExpr),
    IndexListExpr(IndexListExpr),
    SliceExpr(SliceExpr),
    TypeAssertExpr(TypeAssertExpr),
    CallExpr(CallExpr),
    StarExpr(StarExpr),
    UnaryExpr(UnaryExpr),
    BinaryExpr(BinaryExpr),
    KeyValueExpr(KeyValueExpr),
    ArrayType(ArrayType),
    StructType(StructType),
    FuncType(FuncType),
    InterfaceType(InterfaceType),
    MapType(MapType),
    ChanType(ChanType),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ellipsis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ellipsis: Pos,
    pub elt: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FuncLit {
    #[serde(rename = "Type")]
    pub typ: Node<FuncType>,
    pub body: Node<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompositeLit {
    #[serde(rename = "Type")]
    pub typ: Option<Box<Expr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrace: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub elts: Vec<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrace: Pos,
    #[serde(skip_serializing_if = "is_false")]
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParenExpr {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lparen: Pos,
    pub x: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Node<Ident>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexExpr {
    pub x: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrack: Pos,
    pub index: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrack: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IndexListExpr {
    pub x: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrack: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrack: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SliceExpr {
    pub x: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrack: Pos,
    pub low: Option<Box<Expr>>,
    pub high: Option<Box<Expr>>,
    pub max: Option<Box<Expr>>,
    #[serde(skip_serializing_if = "is_false")]
    pub slice3: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rbrack: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeAssertExpr {
    pub x: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lparen: Pos,
    #[serde(rename = "Type")]
    pub typ: Option<Box<Expr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StarExpr {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star: Pos,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UnaryExpr {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_pos: Pos,
    pub op: &'static str,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub op_pos: Pos,
    pub op: &'static str,
    pub y: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValueExpr {
    pub key: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colon: Pos,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ArrayType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lbrack: Pos,
    pub len: Option<Box<Expr>>,
    pub elt: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StructType {
    #[serde(rename = "Struct", skip_serializing_if = "Option::is_none")]
    pub struct_pos: Pos,
    pub fields: Node<FieldList>,
    #[serde(skip_serializing_if = "is_false")]
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InterfaceType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Pos,
    pub methods: Node<FieldList>,
    #[serde(skip_serializing_if = "is_false")]
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MapType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Pos,
    pub key: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChanType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin: Pos,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Pos,
    /// Always written; `""` for a bidirectional channel.
    pub dir: &'static str,
    pub value: Box<Expr>,
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StmtBody {
    BadStmt(Bad),
    DeclStmt(DeclStmt),
    EmptyStmt(EmptyStmt),
    LabeledStmt(LabeledStmt),
    ExprStmt(ExprStmt),
    SendStmt(SendStmt),
    IncDecStmt(IncDecStmt),
    AssignStmt(AssignStmt),
    GoStmt(GoStmt),
    DeferStmt(DeferStmt),
    ReturnStmt(ReturnStmt),
    BranchStmt(BranchStmt),
    BlockStmt(Block),
    IfStmt(IfStmt),
    CaseClause(CaseClause),
    SwitchStmt(SwitchStmt),
    TypeSwitchStmt(TypeSwitchStmt),
    CommClause(CommClause),
    SelectStmt(SelectStmt),
    ForStmt(ForStmt),
    RangeStmt(RangeStmt),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeclStmt {
    pub decl: Box<Decl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmptyStmt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semicolon: Pos,
    #[serde(skip_serializing_if = "is_false")]
    pub implicit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LabeledStmt {
    pub label: Node<Ident>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colon: Pos,
    pub stmt: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExprStmt {
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SendStmt {
    pub chan: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrow: Pos,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IncDecStmt {
    pub x: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Pos,
    pub tok: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssignStmt {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lhs: Vec<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Pos,
    pub tok: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rhs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoStmt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go: Pos,
    pub call: Node<CallExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeferStmt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defer: Pos,
    pub call: Node<CallExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReturnStmt {
    #[serde(rename = "Return", skip_serializing_if = "Option::is_none")]
    pub ret: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BranchStmt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Pos,
    pub tok: &'static str,
    pub label: Option<Node<Ident>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IfStmt {
    #[serde(rename = "If", skip_serializing_if = "Option::is_none")]
    pub if_pos: Pos,
    pub init: Option<Box<Stmt>>,
    pub cond: Box<Expr>,
    pub body: Node<Block>,
    #[serde(rename = "Else")]
    pub els: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaseClause {
    #[serde(rename = "Case", skip_serializing_if = "Option::is_none")]
    pub case_pos: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub list: Vec<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colon: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwitchStmt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch: Pos,
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Box<Expr>>,
    pub body: Node<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeSwitchStmt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch: Pos,
    pub init: Option<Box<Stmt>>,
    pub assign: Box<Stmt>,
    pub body: Node<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommClause {
    #[serde(rename = "Case", skip_serializing_if = "Option::is_none")]
    pub case_pos: Pos,
    pub comm: Option<Box<Stmt>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colon: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectStmt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Pos,
    pub body: Node<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForStmt {
    #[serde(rename = "For", skip_serializing_if = "Option::is_none")]
    pub for_pos: Pos,
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Box<Expr>>,
    pub post: Option<Box<Stmt>>,
    pub body: Node<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RangeStmt {
    #[serde(rename = "For", skip_serializing_if = "Option::is_none")]
    pub for_pos: Pos,
    pub key: Option<Box<Expr>>,
    pub value: Option<Box<Expr>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Pos,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok: Option<&'static str>,
    pub x: Box<Expr>,
    pub body: Node<Block>,
}

// ---------------------------------------------------------------------------
// Specifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SpecBody {
    ImportSpec(ImportSpec),
    ValueSpec(ValueSpec),
    TypeSpec(TypeSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Comments,
    pub name: Option<Node<Ident>>,
    pub path: Node<BasicLit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Comments,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValueSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Comments,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<Node<Ident>>,
    #[serde(rename = "Type")]
    pub typ: Option<Box<Expr>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Comments,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TypeSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Comments,
    pub name: Node<Ident>,
    pub type_params: Option<Node<FieldList>>,
    /// Present exactly for alias declarations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign: Pos,
    #[serde(rename = "Type")]
    pub typ: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Comments,
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeclBody {
    BadDecl(Bad),
    GenDecl(GenDecl),
    FuncDecl(FuncDecl),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenDecl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Comments,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tok_pos: Pos,
    pub tok: &'static str,
    /// Present exactly for parenthesized groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lparen: Pos,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub specs: Vec<Spec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rparen: Pos,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FuncDecl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Comments,
    pub recv: Option<Node<FieldList>>,
    pub name: Node<Ident>,
    #[serde(rename = "Type")]
    pub typ: Node<FuncType>,
    pub body: Option<Node<Block>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str, ref_id: Option<u32>) -> Expr {
        Node::new(
            "Ident",
            ref_id,
            ExprBody::Ident(Ident {
                name_pos: None,
                name: name.into(),
            }),
        )
    }

    #[test]
    fn tag_and_ref_id_come_first() {
        let e = ident("x", Some(3));
        assert_eq!(
            serde_json::to_string(&e).unwrap(),
            r#"{"NodeType":"Ident","RefId":3,"Name":"x"}"#
        );
    }

    #[test]
    fn absent_children_are_null_and_empty_things_are_omitted() {
        let s = Node::new(
            "IfStmt",
            None,
            StmtBody::IfStmt(IfStmt {
                if_pos: None,
                init: None,
                cond: Box::new(ident("ok", None)),
                body: Node::new(
                    "BlockStmt",
                    None,
                    Block {
                        lbrace: None,
                        list: Vec::new(),
                        rbrace: None,
                    },
                ),
                els: None,
            }),
        );
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"NodeType":"IfStmt","Init":null,"Cond":{"NodeType":"Ident","Name":"ok"},"Body":{"NodeType":"BlockStmt"},"Else":null}"#
        );
    }

    #[test]
    fn positions_drop_zero_members() {
        let p = Position::new("a.go".into(), 0, 1, 1);
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"NodeType":"Position","Filename":"a.go","Line":1,"Column":1}"#
        );
        assert_eq!(
            serde_json::to_string(&Position::empty()).unwrap(),
            r#"{"NodeType":"Position"}"#
        );
    }

    #[test]
    fn bidirectional_channel_keeps_empty_dir() {
        let e = Node::new(
            "ChanType",
            None,
            ExprBody::ChanType(ChanType {
                begin: None,
                arrow: None,
                dir: "",
                value: Box::new(ident("int", None)),
            }),
        );
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains(r#""Dir":"""#), "{json}");
    }
}
