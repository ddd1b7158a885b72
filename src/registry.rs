//! Node tag registry: wire tag <-> concrete node kind, per family.
//!
//! Each family has a fieldless kind enum whose variant names are the tags
//! (`#[derive(NodeTag)]` generates the strings and the `ALL` list). Lookup
//! tables are built once on first use and are read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ast_derive::NodeTag;
use go125_syntax::ast::{Decl, Expr, Spec, Stmt};
use once_cell::sync::Lazy;

/// Tag table of a fieldless kind enum.
pub trait NodeTag: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn tag(self) -> &'static str;
}

/// The four disjoint edge families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Expr,
    Stmt,
    Spec,
    Decl,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Family::Expr => "expression",
            Family::Stmt => "statement",
            Family::Spec => "specification",
            Family::Decl => "declaration",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, NodeTag)]
pub enum ExprKind {
    BadExpr,
    Ident,
    Ellipsis,
    BasicLit,
    FuncLit,
    CompositeLit,
    ParenExpr,
    SelectorExpr,
    IndexExpr,
    IndexListExpr,
    SliceExpr,
    TypeAssertExpr,
    CallExpr,
    StarExpr,
    UnaryExpr,
    BinaryExpr,
    KeyValueExpr,
    ArrayType,
    StructType,
    FuncType,
    InterfaceType,
    MapType,
    ChanType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, NodeTag)]
pub enum StmtKind {
    BadStmt,
    DeclStmt,
    EmptyStmt,
    LabeledStmt,
    ExprStmt,
    SendStmt,
    IncDecStmt,
    AssignStmt,
    GoStmt,
    DeferStmt,
    ReturnStmt,
    BranchStmt,
    BlockStmt,
    IfStmt,
    CaseClause,
    SwitchStmt,
    TypeSwitchStmt,
    CommClause,
    SelectStmt,
    ForStmt,
    RangeStmt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, NodeTag)]
pub enum SpecKind {
    ImportSpec,
    ValueSpec,
    TypeSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, NodeTag)]
pub enum DeclKind {
    BadDecl,
    GenDecl,
    FuncDecl,
}

/// A kind resolved from any family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Expr(ExprKind),
    Stmt(StmtKind),
    Spec(SpecKind),
    Decl(DeclKind),
}

/// A kind enum that belongs to one family and has a lookup table.
pub trait FamilyKind: NodeTag + Eq + Hash {
    const FAMILY: Family;

    fn table() -> &'static HashMap<&'static str, Self>;

    fn lookup(tag: &str) -> Option<Self> {
        Self::table().get(tag).copied()
    }
}

fn build_table<K: NodeTag>() -> HashMap<&'static str, K> {
    K::ALL.iter().map(|&k| (k.tag(), k)).collect()
}

macro_rules! family_kind {
    ($($kind:ident => $family:ident),* $(,)?) => {
        $(
            impl FamilyKind for $kind {
                const FAMILY: Family = Family::$family;

                fn table() -> &'static HashMap<&'static str, Self> {
                    static TABLE: Lazy<HashMap<&'static str, $kind>> = Lazy::new(build_table::<$kind>);
                    &TABLE
                }
            }
        )*
    };
}

family_kind! {
    ExprKind => Expr,
    StmtKind => Stmt,
    SpecKind => Spec,
    DeclKind => Decl,
}

/// Resolves `tag` within `family`; `None` if the family has no such tag.
pub fn resolve(tag: &str, family: Family) -> Option<Kind> {
    match family {
        Family::Expr => ExprKind::lookup(tag).map(Kind::Expr),
        Family::Stmt => StmtKind::lookup(tag).map(Kind::Stmt),
        Family::Spec => SpecKind::lookup(tag).map(Kind::Spec),
        Family::Decl => DeclKind::lookup(tag).map(Kind::Decl),
    }
}

impl ExprKind {
    pub fn of(e: &Expr) -> Self {
        match e {
            Expr::Bad { .. } => Self::BadExpr,
            Expr::Ident(_) => Self::Ident,
            Expr::Ellipsis { .. } => Self::Ellipsis,
            Expr::BasicLit(_) => Self::BasicLit,
            Expr::FuncLit { .. } => Self::FuncLit,
            Expr::CompositeLit { .. } => Self::CompositeLit,
            Expr::Paren { .. } => Self::ParenExpr,
            Expr::Selector { .. } => Self::SelectorExpr,
            Expr::Index { .. } => Self::IndexExpr,
            Expr::IndexList { .. } => Self::IndexListExpr,
            Expr::Slice { .. } => Self::SliceExpr,
            Expr::TypeAssert { .. } => Self::TypeAssertExpr,
            Expr::Call(_) => Self::CallExpr,
            Expr::Star { .. } => Self::StarExpr,
            Expr::Unary { .. } => Self::UnaryExpr,
            Expr::Binary { .. } => Self::BinaryExpr,
            Expr::KeyValue { .. } => Self::KeyValueExpr,
            Expr::ArrayType { .. } => Self::ArrayType,
            Expr::StructType { .. } => Self::StructType,
            Expr::FuncType(_) => Self::FuncType,
            Expr::InterfaceType { .. } => Self::InterfaceType,
            Expr::MapType { .. } => Self::MapType,
            Expr::ChanType { .. } => Self::ChanType,
        }
    }
}

impl StmtKind {
    pub fn of(s: &Stmt) -> Self {
        match s {
            Stmt::Bad { .. } => Self::BadStmt,
            Stmt::Decl(_) => Self::DeclStmt,
            Stmt::Empty { .. } => Self::EmptyStmt,
            Stmt::Labeled { .. } => Self::LabeledStmt,
            Stmt::Expr(_) => Self::ExprStmt,
            Stmt::Send { .. } => Self::SendStmt,
            Stmt::IncDec { .. } => Self::IncDecStmt,
            Stmt::Assign { .. } => Self::AssignStmt,
            Stmt::Go { .. } => Self::GoStmt,
            Stmt::Defer { .. } => Self::DeferStmt,
            Stmt::Return { .. } => Self::ReturnStmt,
            Stmt::Branch { .. } => Self::BranchStmt,
            Stmt::Block(_) => Self::BlockStmt,
            Stmt::If { .. } => Self::IfStmt,
            Stmt::CaseClause { .. } => Self::CaseClause,
            Stmt::Switch { .. } => Self::SwitchStmt,
            Stmt::TypeSwitch { .. } => Self::TypeSwitchStmt,
            Stmt::CommClause { .. } => Self::CommClause,
            Stmt::Select { .. } => Self::SelectStmt,
            Stmt::For { .. } => Self::ForStmt,
            Stmt::Range { .. } => Self::RangeStmt,
        }
    }
}

impl SpecKind {
    pub fn of(s: &Spec) -> Self {
        match s {
            Spec::Import { .. } => Self::ImportSpec,
            Spec::Value { .. } => Self::ValueSpec,
            Spec::Type { .. } => Self::TypeSpec,
        }
    }
}

impl DeclKind {
    pub fn of(d: &Decl) -> Self {
        match d {
            Decl::Bad { .. } => Self::BadDecl,
            Decl::Gen(_) => Self::GenDecl,
            Decl::Func(_) => Self::FuncDecl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_resolves_in_its_own_family_only() {
        for &k in ExprKind::ALL {
            assert_eq!(resolve(k.tag(), Family::Expr), Some(Kind::Expr(k)));
            assert_eq!(resolve(k.tag(), Family::Stmt), None);
        }
        for &k in StmtKind::ALL {
            assert_eq!(resolve(k.tag(), Family::Stmt), Some(Kind::Stmt(k)));
            assert_eq!(resolve(k.tag(), Family::Decl), None);
        }
        for &k in SpecKind::ALL {
            assert_eq!(resolve(k.tag(), Family::Spec), Some(Kind::Spec(k)));
        }
        for &k in DeclKind::ALL {
            assert_eq!(resolve(k.tag(), Family::Decl), Some(Kind::Decl(k)));
            assert_eq!(resolve(k.tag(), Family::Expr), None);
        }
    }

    #[test]
    fn family_sizes() {
        assert_eq!(ExprKind::ALL.len(), 23);
        assert_eq!(StmtKind::ALL.len(), 21);
        assert_eq!(SpecKind::ALL.len(), 3);
        assert_eq!(DeclKind::ALL.len(), 3);
    }

    #[test]
    fn unknown_tags_do_not_resolve() {
        assert_eq!(resolve("NotARealKind", Family::Expr), None);
        assert_eq!(resolve("ident", Family::Expr), None);
        assert_eq!(resolve("", Family::Spec), None);
    }

    #[test]
    fn table_is_shared_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| ExprKind::lookup("BinaryExpr")))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Some(ExprKind::BinaryExpr));
        }
    }
}
