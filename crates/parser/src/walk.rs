use crate::ast::*;

// Core traits
pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

/// Depth-first visitor. Each default method recurses into the node's children,
/// so an override that wants the children walked must call `walk` itself.
pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_file(&mut self, a: &'ast AstArena, f: &File) {
        f.walk(a, self);
    }

    #[inline(always)]
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        a.decls[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_spec(&mut self, a: &'ast AstArena, id: SpecId) {
        a.specs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        a.stmts[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        a.exprs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        a.fields[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_comment_group(&mut self, a: &'ast AstArena, id: CommentGroupId) {
        a.comment_groups[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_ident(&mut self, _a: &'ast AstArena, _id: &Ident) {}
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_decl,
    SpecId => visit_spec,
    StmtId => visit_stmt,
    ExprId => visit_expr,
    FieldId => visit_field,
    CommentGroupId => visit_comment_group,
}

pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast> + 'ast,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for item in a.slice(*self) {
            item.walk(a, v);
        }
    }
}

macro_rules! impl_list_slice {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for AstArena {
                #[inline(always)]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    self.$getter(r)
                }
            }
        )*
    };
}

impl_list_slice! {
    Ident => idents,
    ExprId => exprs_list,
    StmtId => stmts_list,
    DeclId => decls_list,
    SpecId => specs_list,
    FieldId => fields_list,
    Comment => comments_list,
    CommentGroupId => comment_groups_list,
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

impl<'ast> Walk<'ast> for Ident {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        v.visit_ident(a, self);
    }
}

// Doc, name, then declarations. `imports` aliases specs already reachable
// through `decls`, and free-floating comments are not part of the tree.
impl<'ast> Walk<'ast> for File {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        self.doc.walk(a, v);
        self.name.walk(a, v);
        self.decls.walk(a, v);
    }
}

// Leaves
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
            }
        )*
    };
}

impl_walk_noop! {
    Pos,
    Symbol,
    BasicLit,
    bool,
    GenDeclTok,
    BasicLitKind,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    IncDecOp,
    BranchTok,
}

/// Collects every import spec reachable from the file's declarations, in order.
#[derive(Debug, Default)]
pub struct ImportCollector {
    pub specs: Vec<SpecId>,
}

impl<'ast> Visitor<'ast> for ImportCollector {
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        if let Decl::Gen(g) = &a.decls[id] {
            if g.tok == GenDeclTok::Import {
                self.specs.extend_from_slice(a.specs_list(g.specs));
            }
        }
    }

    // Imports only occur at top level.
    fn visit_stmt(&mut self, _: &'ast AstArena, _: StmtId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Names(Vec<String>);

    impl<'ast> Visitor<'ast> for Names {
        fn visit_ident(&mut self, a: &'ast AstArena, id: &Ident) {
            self.0.push(a.name(id.name).to_string());
        }
    }

    #[test]
    fn visits_identifiers_in_field_order() {
        let mut a = AstArena::new();
        let x = a.ident_expr("x", Pos::NONE);
        let sel = a.ident("Println", Pos::NONE);
        let fmt = a.ident_expr("fmt", Pos::NONE);
        let fun = a.expr(Expr::Selector { x: fmt, sel });
        let args = a.list_exprs([x]);
        let call = a.expr(Expr::Call(CallExpr {
            fun,
            lparen: Pos::NONE,
            args,
            ellipsis: None,
            rparen: Pos::NONE,
        }));

        let mut names = Names::default();
        names.visit_expr(&a, call);
        assert_eq!(names.0, ["fmt", "Println", "x"]);
    }
}
