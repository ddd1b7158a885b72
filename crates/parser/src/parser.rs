//! Recursive-descent parser for Go source files.
//!
//! The token stream is lexed up front. Parsing stops at the first syntax
//! error; lexer diagnostics are reported alongside it.
//!
//! Comment handling groups adjacent comments and attaches them the way the
//! Go toolchain does: a group ending on the line right before a declaration,
//! spec or field becomes its `doc`, and a group trailing the same line after
//! it becomes its `comment`. Every group is also recorded in `File::comments`.

use smallvec::SmallVec;
use tracing::{debug, instrument};

use crate::ast::*;
use crate::error::{Diag, ParseFailure, Span};
use crate::lexer::{Lexer, Tok};
use crate::position::SourceMap;
use crate::walk::{ImportCollector, Visitor};

/// Parser configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseMode {
    /// Keep comments: attach doc/line comments and fill `File::comments`.
    pub comments: bool,
}

impl ParseMode {
    pub const fn with_comments(comments: bool) -> Self {
        Self { comments }
    }
}

type PResult<T> = Result<T, Diag>;

/// Parses one Go source file.
#[instrument(skip_all, fields(filename = %filename, len = src.len(), comments = mode.comments))]
pub fn parse_file(filename: &str, src: &str, mode: ParseMode) -> Result<SourceFile, ParseFailure> {
    let source_map = SourceMap::new(filename, src);

    let mut lexer = if mode.comments {
        Lexer::with_comments(src)
    } else {
        Lexer::new(src)
    };
    let toks: Vec<_> = lexer.by_ref().collect();
    let mut diags = lexer.take_diags();

    let mut p = Parser::new(toks, src.len(), &source_map);
    let parsed = p.parse_file();
    match parsed {
        Ok(file) if diags.is_empty() => {
            debug!(
                decls = file.decls.len(),
                exprs = p.a.exprs.len(),
                stmts = p.a.stmts.len(),
                comment_groups = file.comments.len(),
                "parsed"
            );
            Ok(SourceFile {
                arena: p.a,
                file,
                source_map,
            })
        }
        Ok(_) => Err(ParseFailure { diags, source_map }),
        Err(d) => {
            diags.push(d);
            diags.sort_by_key(|d| d.span.start);
            Err(ParseFailure { diags, source_map })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StmtMode {
    Basic,
    LabelOk,
    RangeOk,
}

/// Result of a simple statement before the caller decides where it goes.
enum Simple {
    Stmt(Stmt),
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        tok_pos: Pos,
        tok: Option<AssignOp>,
        x: ExprId,
    },
}

/// One entry of a parameter list before names and types are paired up.
enum Param {
    /// A lone identifier: a name if the list is named, a type otherwise
    Bare(Ident),
    Typed(Option<Ident>, ExprId),
}

struct Parser<'src, 'sm> {
    toks: Vec<(usize, Tok<'src>, usize)>,
    idx: usize,
    src_len: usize,
    sm: &'sm SourceMap,

    tok: Tok<'src>,
    pos: usize,
    end: usize,

    /// < 0: in control clause, >= 0: in expression
    expr_lev: i32,

    lead_comment: Option<CommentGroupId>,
    line_comment: Option<CommentGroupId>,
    comments: Vec<CommentGroupId>,

    a: AstArena,
}

const fn binary_op(tok: Tok<'_>) -> Option<BinaryOp> {
    Some(match tok {
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Mod,
        Tok::Amp => BinaryOp::And,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::AndNot => BinaryOp::AndNot,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::LOr => BinaryOp::LOr,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        _ => return None,
    })
}

const fn assign_op(tok: Tok<'_>) -> Option<AssignOp> {
    Some(match tok {
        Tok::Assign => AssignOp::Assign,
        Tok::Define => AssignOp::Define,
        Tok::AddAssign => AssignOp::AddAssign,
        Tok::SubAssign => AssignOp::SubAssign,
        Tok::MulAssign => AssignOp::MulAssign,
        Tok::DivAssign => AssignOp::DivAssign,
        Tok::ModAssign => AssignOp::ModAssign,
        Tok::AndAssign => AssignOp::AndAssign,
        Tok::OrAssign => AssignOp::OrAssign,
        Tok::XorAssign => AssignOp::XorAssign,
        Tok::ShlAssign => AssignOp::ShlAssign,
        Tok::ShrAssign => AssignOp::ShrAssign,
        Tok::AndNotAssign => AssignOp::AndNotAssign,
        _ => return None,
    })
}

const fn unary_op(tok: Tok<'_>) -> Option<UnaryOp> {
    Some(match tok {
        Tok::Plus => UnaryOp::Add,
        Tok::Minus => UnaryOp::Sub,
        Tok::Bang => UnaryOp::Not,
        Tok::Caret => UnaryOp::Xor,
        Tok::Amp => UnaryOp::Addr,
        Tok::Tilde => UnaryOp::Tilde,
        _ => return None,
    })
}

const fn lit_kind(tok: Tok<'_>) -> Option<(BasicLitKind, &str)> {
    Some(match tok {
        Tok::IntLit(s) => (BasicLitKind::Int, s),
        Tok::FloatLit(s) => (BasicLitKind::Float, s),
        Tok::ImagLit(s) => (BasicLitKind::Imag, s),
        Tok::RuneLit(s) => (BasicLitKind::Char, s),
        Tok::StringLit(s) | Tok::RawStringLit(s) => (BasicLitKind::String, s),
        _ => return None,
    })
}

impl<'src, 'sm> Parser<'src, 'sm> {
    fn new(toks: Vec<(usize, Tok<'src>, usize)>, src_len: usize, sm: &'sm SourceMap) -> Self {
        let mut p = Self {
            toks,
            idx: 0,
            src_len,
            sm,
            tok: Tok::Eof,
            pos: 0,
            end: 0,
            expr_lev: 0,
            lead_comment: None,
            line_comment: None,
            comments: Vec::new(),
            a: AstArena::new(),
        };
        p.load();
        p.collect_comments(None);
        p
    }

    // =========================================================================
    // Token plumbing
    // =========================================================================

    fn load(&mut self) {
        (self.pos, self.tok, self.end) = self
            .toks
            .get(self.idx)
            .copied()
            .unwrap_or((self.src_len, Tok::Eof, self.src_len));
    }

    fn next0(&mut self) {
        if self.idx < self.toks.len() {
            self.idx += 1;
        }
        self.load();
    }

    #[inline]
    fn line(&self, offset: usize) -> usize {
        self.sm.line_col(offset).0
    }

    fn next(&mut self) {
        let prev = self.pos;
        self.next0();
        self.collect_comments(Some(prev));
    }

    /// Consumes comment tokens at the cursor, classifying line and lead groups.
    fn collect_comments(&mut self, prev: Option<usize>) {
        self.lead_comment = None;
        self.line_comment = None;
        if !matches!(self.tok, Tok::Comment(_)) {
            return;
        }

        if prev.is_some_and(|p| self.line(p) == self.line(self.pos)) {
            // Same line as the previous token: can only be a line comment.
            let (group, endline) = self.consume_comment_group(0);
            if self.line(self.pos) != endline || matches!(self.tok, Tok::Semi | Tok::Eof) {
                self.line_comment = Some(group);
            }
        }

        let mut last = None;
        while matches!(self.tok, Tok::Comment(_)) {
            last = Some(self.consume_comment_group(1));
        }
        if let Some((group, endline)) = last {
            if endline + 1 == self.line(self.pos) {
                self.lead_comment = Some(group);
            }
        }
    }

    fn consume_comment_group(&mut self, n: usize) -> (CommentGroupId, usize) {
        let mut list: SmallVec<[Comment; 4]> = SmallVec::new();
        let mut endline = self.line(self.pos);
        while let Tok::Comment(text) = self.tok {
            if self.line(self.pos) > endline + n {
                break;
            }
            endline = self.line(self.pos);
            if text.starts_with("/*") {
                endline += text.bytes().filter(|&b| b == b'\n').count();
            }
            list.push(Comment {
                slash: Pos::at(self.pos),
                text: self.a.symbols.intern(text),
            });
            self.next0();
        }
        let list = self.a.list_comments(list);
        let group = self.a.comment_groups.alloc(CommentGroup { list });
        self.comments.push(group);
        (group, endline)
    }

    /// Next significant token after the current one.
    fn peek(&self) -> Tok<'src> {
        self.toks[self.idx.saturating_add(1).min(self.toks.len())..]
            .iter()
            .map(|t| t.1)
            .find(|t| !matches!(t, Tok::Comment(_)))
            .unwrap_or(Tok::Eof)
    }

    #[inline]
    fn p(&self) -> Pos {
        Pos::at(self.pos)
    }

    fn error(&self, msg: impl Into<String>) -> Diag {
        Diag::parse(Span::new(self.pos, self.end.max(self.pos + 1)), msg)
    }

    fn error_expected(&self, what: &str) -> Diag {
        let found = match self.tok {
            Tok::Semi if self.pos == self.end => "newline".to_string(),
            t => t.to_string(),
        };
        self.error(format!("expected {what}, found {found}"))
    }

    fn expect(&mut self, tok: Tok<'static>) -> PResult<Pos> {
        if self.tok != tok {
            return Err(self.error_expected(&tok.to_string()));
        }
        let pos = self.p();
        self.next();
        Ok(pos)
    }

    /// `;` or the end of a list; returns the line comment that follows it.
    fn expect_semi(&mut self) -> PResult<Option<CommentGroupId>> {
        match self.tok {
            Tok::RParen | Tok::RBrace | Tok::Eof => Ok(None),
            Tok::Semi => {
                self.next();
                Ok(self.line_comment)
            }
            _ => Err(self.error_expected("';'")),
        }
    }

    /// A closing delimiter, tolerating the `;` a newline inserts before it.
    fn expect_closing(&mut self, tok: Tok<'static>, context: &str) -> PResult<Pos> {
        if self.tok == Tok::Semi && self.pos == self.end && self.peek() == tok {
            return Err(self.error(format!("missing ',' before newline in {context}")));
        }
        self.expect(tok)
    }

    // =========================================================================
    // File and declarations
    // =========================================================================

    fn parse_file(&mut self) -> PResult<File> {
        let doc = self.lead_comment;
        let package = self.expect(Tok::KwPackage)?;
        let name = self.parse_ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        while self.tok != Tok::Eof {
            decls.push(self.parse_decl()?);
        }
        let decls = self.a.list_decls(decls);

        let mut imports = ImportCollector::default();
        for &d in self.a.decls_list(decls) {
            imports.visit_decl(&self.a, d);
        }
        let imports = self.a.list_specs(imports.specs);
        let comments = self.a.list_comment_groups(std::mem::take(&mut self.comments));

        Ok(File {
            doc,
            package,
            name,
            decls,
            imports,
            unresolved: ListRef::EMPTY,
            comments,
        })
    }

    fn parse_decl(&mut self) -> PResult<DeclId> {
        match self.tok {
            Tok::KwImport => self.parse_gen_decl(GenDeclTok::Import),
            Tok::KwConst => self.parse_gen_decl(GenDeclTok::Const),
            Tok::KwType => self.parse_gen_decl(GenDeclTok::Type),
            Tok::KwVar => self.parse_gen_decl(GenDeclTok::Var),
            Tok::KwFunc => self.parse_func_decl(),
            _ => Err(self.error_expected("declaration")),
        }
    }

    fn parse_gen_decl(&mut self, tok: GenDeclTok) -> PResult<DeclId> {
        let doc = self.lead_comment;
        let tok_pos = self.p();
        self.next();

        let (lparen, specs, rparen) = if self.tok == Tok::LParen {
            let lparen = self.p();
            self.next();
            let mut specs = Vec::new();
            while self.tok != Tok::RParen && self.tok != Tok::Eof {
                let doc = self.lead_comment;
                specs.push(self.parse_spec(doc, tok)?);
            }
            let rparen = self.expect(Tok::RParen)?;
            self.expect_semi()?;
            (Some(lparen), specs, Some(rparen))
        } else {
            (None, vec![self.parse_spec(None, tok)?], None)
        };

        let specs = self.a.list_specs(specs);
        Ok(self.a.decl(Decl::Gen(GenDecl {
            doc,
            tok_pos,
            tok,
            lparen,
            specs,
            rparen,
        })))
    }

    fn parse_spec(&mut self, doc: Option<CommentGroupId>, tok: GenDeclTok) -> PResult<SpecId> {
        let spec = match tok {
            GenDeclTok::Import => self.parse_import_spec(doc)?,
            GenDeclTok::Type => self.parse_type_spec(doc)?,
            GenDeclTok::Const | GenDeclTok::Var => self.parse_value_spec(doc, tok)?,
        };
        Ok(self.a.spec(spec))
    }

    fn parse_import_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<Spec> {
        let name = match self.tok {
            Tok::Ident(_) => Some(self.parse_ident()?),
            Tok::Dot => {
                let id = self.a.ident(".", self.p());
                self.next();
                Some(id)
            }
            _ => None,
        };
        let path = match self.tok {
            Tok::StringLit(s) | Tok::RawStringLit(s) => {
                let lit = BasicLit {
                    pos: self.p(),
                    kind: BasicLitKind::String,
                    value: self.a.symbols.intern(s),
                };
                self.next();
                lit
            }
            _ => return Err(self.error_expected("import path")),
        };
        let comment = self.expect_semi()?;
        Ok(Spec::Import {
            doc,
            name,
            path,
            comment,
            end_pos: Pos::NONE,
        })
    }

    fn parse_value_spec(&mut self, doc: Option<CommentGroupId>, tok: GenDeclTok) -> PResult<Spec> {
        let names = self.parse_ident_list()?;
        let mut typ = None;
        let mut values = ListRef::EMPTY;

        let at_end = matches!(self.tok, Tok::Semi | Tok::RParen | Tok::Eof);
        if tok == GenDeclTok::Var || !at_end {
            if self.tok != Tok::Assign {
                typ = Some(self.parse_type()?);
            }
            if self.tok == Tok::Assign {
                self.next();
                values = self.parse_expr_list()?;
            }
        }

        let comment = self.expect_semi()?;
        Ok(Spec::Value {
            doc,
            names,
            typ,
            values,
            comment,
        })
    }

    fn parse_type_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<Spec> {
        let name = self.parse_ident()?;
        let mut type_params = None;

        if self.tok == Tok::LBrack && self.type_params_follow() {
            type_params = Some(self.parse_parameters(true)?);
        }

        let assign = if self.tok == Tok::Assign {
            let pos = self.p();
            self.next();
            Some(pos)
        } else {
            None
        };
        let typ = self.parse_type()?;
        let comment = self.expect_semi()?;

        Ok(Spec::Type {
            doc,
            name,
            type_params,
            assign,
            typ,
            comment,
        })
    }

    /// At `[` after a type name: a type parameter list rather than an array
    /// length. `[N]T`, `[N+1]T` and `[pkg.N]T` are arrays; `[T any]`,
    /// `[K comparable, V any]` and `[T ~int | ~uint]` are parameters.
    fn type_params_follow(&self) -> bool {
        let rest = &self.toks[self.idx.min(self.toks.len())..];
        let mut sig = rest.iter().map(|t| t.1).filter(|t| !matches!(t, Tok::Comment(_)));
        sig.next();
        if !matches!(sig.next(), Some(Tok::Ident(_))) {
            return false;
        }
        matches!(
            sig.next(),
            Some(
                Tok::Ident(_)
                    | Tok::Comma
                    | Tok::Tilde
                    | Tok::KwInterface
                    | Tok::KwFunc
                    | Tok::KwChan
                    | Tok::KwMap
                    | Tok::KwStruct
                    | Tok::LBrack
                    | Tok::Arrow
            )
        )
    }

    fn parse_func_decl(&mut self) -> PResult<DeclId> {
        let doc = self.lead_comment;
        let func = self.expect(Tok::KwFunc)?;

        let recv = if self.tok == Tok::LParen {
            Some(self.parse_parameters(false)?)
        } else {
            None
        };
        let name = self.parse_ident()?;
        let type_params = if self.tok == Tok::LBrack {
            Some(self.parse_parameters(true)?)
        } else {
            None
        };
        let params = self.parse_parameters(false)?;
        let results = self.parse_result()?;

        let body = if self.tok == Tok::LBrace {
            let body = self.parse_body()?;
            Some(body)
        } else {
            None
        };
        self.expect_semi()?;

        Ok(self.a.decl(Decl::Func(FuncDecl {
            doc,
            recv,
            name,
            typ: FuncType {
                func,
                type_params,
                params,
                results,
            },
            body,
        })))
    }

    // =========================================================================
    // Identifiers and lists
    // =========================================================================

    fn parse_ident(&mut self) -> PResult<Ident> {
        match self.tok {
            Tok::Ident(name) => {
                let id = self.a.ident(name, self.p());
                self.next();
                Ok(id)
            }
            _ => Err(self.error_expected("identifier")),
        }
    }

    fn parse_ident_list(&mut self) -> PResult<ListRef<Ident>> {
        let mut names: SmallVec<[Ident; 4]> = SmallVec::new();
        names.push(self.parse_ident()?);
        while self.tok == Tok::Comma {
            self.next();
            names.push(self.parse_ident()?);
        }
        Ok(self.a.list_idents(names))
    }

    fn parse_expr_vec(&mut self) -> PResult<SmallVec<[ExprId; 4]>> {
        let mut list = SmallVec::new();
        list.push(self.parse_expr()?);
        while self.tok == Tok::Comma {
            self.next();
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    fn parse_expr_list(&mut self) -> PResult<ListRef<ExprId>> {
        let list = self.parse_expr_vec()?;
        Ok(self.a.list_exprs(list))
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn starts_type(&self) -> bool {
        matches!(
            self.tok,
            Tok::Ident(_)
                | Tok::LBrack
                | Tok::KwStruct
                | Tok::Star
                | Tok::KwFunc
                | Tok::KwInterface
                | Tok::KwMap
                | Tok::KwChan
                | Tok::LParen
                | Tok::Arrow
        )
    }

    fn parse_type(&mut self) -> PResult<ExprId> {
        match self.tok {
            Tok::Ident(_) => {
                let name = self.parse_ident()?;
                let x = self.a.expr(Expr::Ident(name));
                self.parse_type_name_rest(x)
            }
            Tok::LBrack => {
                let lbrack = self.p();
                self.next();
                self.parse_array_type(lbrack)
            }
            Tok::KwStruct => self.parse_struct_type(),
            Tok::Star => {
                let star = self.p();
                self.next();
                let x = self.parse_type()?;
                Ok(self.a.expr(Expr::Star { star, x }))
            }
            Tok::KwFunc => {
                let func = self.p();
                self.next();
                let typ = self.parse_signature(func)?;
                Ok(self.a.expr(Expr::FuncType(typ)))
            }
            Tok::KwInterface => self.parse_interface_type(),
            Tok::KwMap => self.parse_map_type(),
            Tok::KwChan | Tok::Arrow => self.parse_chan_type(),
            Tok::LParen => {
                let lparen = self.p();
                self.next();
                let x = self.parse_type()?;
                let rparen = self.expect(Tok::RParen)?;
                Ok(self.a.expr(Expr::Paren { lparen, x, rparen }))
            }
            _ => Err(self.error_expected("type")),
        }
    }

    /// After a type name: optional `.Sel` qualifier and `[Args]`.
    fn parse_type_name_rest(&mut self, mut x: ExprId) -> PResult<ExprId> {
        if self.tok == Tok::Dot {
            self.next();
            let sel = self.parse_ident()?;
            x = self.a.expr(Expr::Selector { x, sel });
        }
        if self.tok == Tok::LBrack {
            let lbrack = self.p();
            self.next();
            let args = self.parse_type_args()?;
            let rbrack = self.expect_closing(Tok::RBrack, "type argument list")?;
            x = self.make_instance(x, lbrack, &args, rbrack);
        }
        Ok(x)
    }

    fn parse_type_args(&mut self) -> PResult<SmallVec<[ExprId; 4]>> {
        self.expr_lev += 1;
        let mut args = SmallVec::new();
        while self.tok != Tok::RBrack && self.tok != Tok::Eof {
            args.push(self.parse_type_elem()?);
            if self.tok != Tok::Comma {
                break;
            }
            self.next();
        }
        self.expr_lev -= 1;
        if args.is_empty() {
            return Err(self.error_expected("type argument"));
        }
        Ok(args)
    }

    fn make_instance(&mut self, x: ExprId, lbrack: Pos, args: &[ExprId], rbrack: Pos) -> ExprId {
        match args {
            [index] => self.a.expr(Expr::Index {
                x,
                lbrack,
                index: *index,
                rbrack,
            }),
            _ => {
                let indices = self.a.list_exprs(args.iter().copied());
                self.a.expr(Expr::IndexList {
                    x,
                    lbrack,
                    indices,
                    rbrack,
                })
            }
        }
    }

    /// After `[`: slice type, `[...]T` or `[N]T`.
    fn parse_array_type(&mut self, lbrack: Pos) -> PResult<ExprId> {
        let len = match self.tok {
            Tok::RBrack => None,
            Tok::Ellipsis if self.peek() == Tok::RBrack => {
                let ellipsis = self.p();
                self.next();
                Some(self.a.expr(Expr::Ellipsis { ellipsis, elt: None }))
            }
            _ => {
                self.expr_lev += 1;
                let len = self.parse_expr();
                self.expr_lev -= 1;
                Some(len?)
            }
        };
        self.expect(Tok::RBrack)?;
        let elt = self.parse_type()?;
        Ok(self.a.expr(Expr::ArrayType { lbrack, len, elt }))
    }

    fn parse_map_type(&mut self) -> PResult<ExprId> {
        let map = self.expect(Tok::KwMap)?;
        self.expect(Tok::LBrack)?;
        let key = self.parse_type()?;
        self.expect(Tok::RBrack)?;
        let value = self.parse_type()?;
        Ok(self.a.expr(Expr::MapType { map, key, value }))
    }

    fn parse_chan_type(&mut self) -> PResult<ExprId> {
        let begin = self.p();
        let (arrow, dir) = if self.tok == Tok::KwChan {
            self.next();
            if self.tok == Tok::Arrow {
                let arrow = self.p();
                self.next();
                (arrow, ChanDir::Send)
            } else {
                (Pos::NONE, ChanDir::Both)
            }
        } else {
            self.expect(Tok::Arrow)?;
            self.expect(Tok::KwChan)?;
            (begin, ChanDir::Recv)
        };
        let value = self.parse_type()?;
        Ok(self.a.expr(Expr::ChanType {
            begin,
            arrow,
            dir,
            value,
        }))
    }

    /// Constraint element: `~T`, or a union `A | ~B | C`.
    fn parse_type_elem(&mut self) -> PResult<ExprId> {
        let x = self.parse_type_term()?;
        self.parse_union_rest(x)
    }

    fn parse_type_term(&mut self) -> PResult<ExprId> {
        if self.tok == Tok::Tilde {
            let op_pos = self.p();
            self.next();
            let x = self.parse_type()?;
            return Ok(self.a.expr(Expr::Unary {
                op_pos,
                op: UnaryOp::Tilde,
                x,
            }));
        }
        self.parse_type()
    }

    fn parse_union_rest(&mut self, mut x: ExprId) -> PResult<ExprId> {
        while self.tok == Tok::Pipe {
            let op_pos = self.p();
            self.next();
            let y = self.parse_type_term()?;
            x = self.a.expr(Expr::Binary {
                x,
                op_pos,
                op: BinaryOp::Or,
                y,
            });
        }
        Ok(x)
    }

    fn parse_struct_type(&mut self) -> PResult<ExprId> {
        let struct_pos = self.expect(Tok::KwStruct)?;
        let opening = self.expect(Tok::LBrace)?;
        let mut list = Vec::new();
        while matches!(self.tok, Tok::Ident(_) | Tok::Star | Tok::LParen) {
            list.push(self.parse_field_decl()?);
        }
        let closing = self.expect(Tok::RBrace)?;
        let list = self.a.list_fields(list);
        Ok(self.a.expr(Expr::StructType {
            struct_pos,
            fields: FieldList {
                opening,
                list,
                closing,
            },
            incomplete: false,
        }))
    }

    fn parse_field_decl(&mut self) -> PResult<FieldId> {
        let doc = self.lead_comment;
        let mut names: SmallVec<[Ident; 2]> = SmallVec::new();

        let typ = match self.tok {
            Tok::Ident(_) => {
                let name = self.parse_ident()?;
                match self.tok {
                    Tok::Dot => {
                        let x = self.a.expr(Expr::Ident(name));
                        self.parse_type_name_rest(x)?
                    }
                    Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_) => {
                        self.a.expr(Expr::Ident(name))
                    }
                    Tok::LBrack => match self.parse_array_field_or_instance(name)? {
                        Param::Typed(Some(n), t) => {
                            names.push(n);
                            t
                        }
                        Param::Typed(None, t) => t,
                        Param::Bare(n) => self.a.expr(Expr::Ident(n)),
                    },
                    _ => {
                        names.push(name);
                        while self.tok == Tok::Comma {
                            self.next();
                            names.push(self.parse_ident()?);
                        }
                        self.parse_type()?
                    }
                }
            }
            Tok::Star => {
                let star = self.p();
                self.next();
                let name = self.parse_ident()?;
                let x = self.a.expr(Expr::Ident(name));
                let x = self.parse_type_name_rest(x)?;
                self.a.expr(Expr::Star { star, x })
            }
            _ => return Err(self.error("cannot parenthesize embedded type")),
        };

        let tag = match self.tok {
            Tok::StringLit(s) | Tok::RawStringLit(s) => {
                let lit = BasicLit {
                    pos: self.p(),
                    kind: BasicLitKind::String,
                    value: self.a.symbols.intern(s),
                };
                self.next();
                Some(lit)
            }
            _ => None,
        };
        let comment = self.expect_semi()?;
        let names = self.a.list_idents(names);

        Ok(self.a.field(Field {
            doc,
            names,
            typ,
            tag,
            comment,
        }))
    }

    /// `name [N]T`, `name []T` or the instantiated type `Name[Args]`.
    fn parse_array_field_or_instance(&mut self, name: Ident) -> PResult<Param> {
        let lbrack = self.expect(Tok::LBrack)?;
        if self.tok == Tok::RBrack {
            let typ = self.parse_array_type(lbrack)?;
            return Ok(Param::Typed(Some(name), typ));
        }
        if self.tok == Tok::Ellipsis && self.peek() == Tok::RBrack {
            let typ = self.parse_array_type(lbrack)?;
            return Ok(Param::Typed(Some(name), typ));
        }

        self.expr_lev += 1;
        let args = self.parse_array_len_or_args();
        self.expr_lev -= 1;
        let args = args?;
        let rbrack = self.expect(Tok::RBrack)?;

        if args.len() == 1 && self.starts_type() {
            let elt = self.parse_type()?;
            let typ = self.a.expr(Expr::ArrayType {
                lbrack,
                len: Some(args[0]),
                elt,
            });
            return Ok(Param::Typed(Some(name), typ));
        }
        let x = self.a.expr(Expr::Ident(name));
        Ok(Param::Typed(None, self.make_instance(x, lbrack, &args, rbrack)))
    }

    fn parse_array_len_or_args(&mut self) -> PResult<SmallVec<[ExprId; 4]>> {
        let mut args = SmallVec::new();
        args.push(self.parse_type_or_expr()?);
        while self.tok == Tok::Comma {
            self.next();
            if self.tok == Tok::RBrack {
                break;
            }
            args.push(self.parse_type_elem()?);
        }
        Ok(args)
    }

    /// An expression where a constraint element may also appear.
    fn parse_type_or_expr(&mut self) -> PResult<ExprId> {
        if self.tok == Tok::Tilde {
            return self.parse_type_elem();
        }
        let x = self.parse_expr()?;
        self.parse_union_rest(x)
    }

    fn parse_interface_type(&mut self) -> PResult<ExprId> {
        let interface = self.expect(Tok::KwInterface)?;
        let opening = self.expect(Tok::LBrace)?;
        let mut list = Vec::new();
        while self.tok != Tok::RBrace && self.tok != Tok::Eof {
            list.push(self.parse_interface_elem()?);
        }
        let closing = self.expect(Tok::RBrace)?;
        let list = self.a.list_fields(list);
        Ok(self.a.expr(Expr::InterfaceType {
            interface,
            methods: FieldList {
                opening,
                list,
                closing,
            },
            incomplete: false,
        }))
    }

    fn parse_interface_elem(&mut self) -> PResult<FieldId> {
        let doc = self.lead_comment;
        let mut names = ListRef::EMPTY;

        let typ = match self.tok {
            Tok::Ident(_) => {
                let name = self.parse_ident()?;
                if self.tok == Tok::LParen {
                    names = self.a.list_idents([name]);
                    let params = self.parse_parameters(false)?;
                    let results = self.parse_result()?;
                    self.a.expr(Expr::FuncType(FuncType {
                        func: Pos::NONE,
                        type_params: None,
                        params,
                        results,
                    }))
                } else {
                    let x = self.a.expr(Expr::Ident(name));
                    let x = self.parse_type_name_rest(x)?;
                    self.parse_union_rest(x)?
                }
            }
            _ => self.parse_type_elem()?,
        };

        let comment = self.expect_semi()?;
        Ok(self.a.field(Field {
            doc,
            names,
            typ,
            tag: None,
            comment,
        }))
    }

    /// `func` already consumed: parameters and results.
    fn parse_signature(&mut self, func: Pos) -> PResult<FuncType> {
        let params = self.parse_parameters(false)?;
        let results = self.parse_result()?;
        Ok(FuncType {
            func,
            type_params: None,
            params,
            results,
        })
    }

    fn parse_result(&mut self) -> PResult<Option<FieldList>> {
        if self.tok == Tok::LParen {
            return self.parse_parameters(false).map(Some);
        }
        if !self.starts_type() || self.tok == Tok::LParen {
            return Ok(None);
        }
        let typ = self.parse_type()?;
        let field = self.a.field(Field {
            doc: None,
            names: ListRef::EMPTY,
            typ,
            tag: None,
            comment: None,
        });
        Ok(Some(FieldList {
            opening: Pos::NONE,
            list: self.a.list_fields([field]),
            closing: Pos::NONE,
        }))
    }

    /// `( ... )` parameter list, or `[ ... ]` type parameter list when `brack`.
    fn parse_parameters(&mut self, brack: bool) -> PResult<FieldList> {
        let (open, close) = if brack {
            (Tok::LBrack, Tok::RBrack)
        } else {
            (Tok::LParen, Tok::RParen)
        };
        let opening = self.expect(open)?;
        self.expr_lev += 1;

        let mut entries = Vec::new();
        while self.tok != close && self.tok != Tok::Eof {
            entries.push(self.parse_param(close, brack)?);
            if self.tok != Tok::Comma {
                break;
            }
            self.next();
        }
        self.expr_lev -= 1;

        let closing = self.expect_closing(close, "parameter list")?;
        if brack && entries.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        let list = self.resolve_params(entries)?;
        let list = self.a.list_fields(list);
        Ok(FieldList {
            opening,
            list,
            closing,
        })
    }

    fn parse_param(&mut self, close: Tok<'static>, brack: bool) -> PResult<Param> {
        if let Tok::Ident(_) = self.tok {
            let name = self.parse_ident()?;
            return match self.tok {
                Tok::Comma => Ok(Param::Bare(name)),
                t if t == close => Ok(Param::Bare(name)),
                Tok::Dot => {
                    let x = self.a.expr(Expr::Ident(name));
                    Ok(Param::Typed(None, self.parse_type_name_rest(x)?))
                }
                Tok::LBrack if !brack => self.parse_array_field_or_instance(name),
                _ => Ok(Param::Typed(Some(name), self.parse_param_type(brack)?)),
            };
        }
        Ok(Param::Typed(None, self.parse_param_type(brack)?))
    }

    fn parse_param_type(&mut self, brack: bool) -> PResult<ExprId> {
        if brack {
            return self.parse_type_elem();
        }
        if self.tok == Tok::Ellipsis {
            let ellipsis = self.p();
            self.next();
            let elt = self.parse_type()?;
            return Ok(self.a.expr(Expr::Ellipsis {
                ellipsis,
                elt: Some(elt),
            }));
        }
        self.parse_type()
    }

    /// Pairs names with types: in `a, b int, c string` the bare `a` takes
    /// the type of `b`. A list without any `name Type` entry is all types.
    fn resolve_params(&mut self, entries: Vec<Param>) -> PResult<Vec<FieldId>> {
        let named = entries
            .iter()
            .any(|e| matches!(e, Param::Typed(Some(_), _)));
        let mut out = Vec::with_capacity(entries.len());

        if !named {
            for e in entries {
                let typ = match e {
                    Param::Bare(id) => self.a.expr(Expr::Ident(id)),
                    Param::Typed(_, t) => t,
                };
                out.push(self.a.field(Field {
                    doc: None,
                    names: ListRef::EMPTY,
                    typ,
                    tag: None,
                    comment: None,
                }));
            }
            return Ok(out);
        }

        let mut pending: SmallVec<[Ident; 4]> = SmallVec::new();
        for e in entries {
            match e {
                Param::Bare(id) => pending.push(id),
                Param::Typed(Some(id), typ) => {
                    pending.push(id);
                    let names = self.a.list_idents(pending.drain(..));
                    out.push(self.a.field(Field {
                        doc: None,
                        names,
                        typ,
                        tag: None,
                        comment: None,
                    }));
                }
                Param::Typed(None, _) => {
                    return Err(self.error("mixed named and unnamed parameters"));
                }
            }
        }
        if !pending.is_empty() {
            return Err(self.error("mixed named and unnamed parameters"));
        }
        Ok(out)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) -> PResult<ExprId> {
        self.parse_binary_expr(1)
    }

    fn parse_binary_expr(&mut self, prec1: u8) -> PResult<ExprId> {
        let mut x = self.parse_unary_expr()?;
        loop {
            let Some(op) = binary_op(self.tok) else {
                return Ok(x);
            };
            let prec = op.precedence();
            if prec < prec1 {
                return Ok(x);
            }
            let op_pos = self.p();
            self.next();
            let y = self.parse_binary_expr(prec + 1)?;
            x = self.a.expr(Expr::Binary { x, op_pos, op, y });
        }
    }

    fn parse_unary_expr(&mut self) -> PResult<ExprId> {
        if let Some(op) = unary_op(self.tok) {
            let op_pos = self.p();
            self.next();
            let x = self.parse_unary_expr()?;
            return Ok(self.a.expr(Expr::Unary { op_pos, op, x }));
        }
        match self.tok {
            Tok::Arrow => {
                if self.peek() == Tok::KwChan {
                    return self.parse_chan_type();
                }
                let op_pos = self.p();
                self.next();
                let x = self.parse_unary_expr()?;
                Ok(self.a.expr(Expr::Unary {
                    op_pos,
                    op: UnaryOp::Recv,
                    x,
                }))
            }
            Tok::Star => {
                let star = self.p();
                self.next();
                let x = self.parse_unary_expr()?;
                Ok(self.a.expr(Expr::Star { star, x }))
            }
            _ => self.parse_primary_expr(),
        }
    }

    fn parse_operand(&mut self) -> PResult<ExprId> {
        if let Some((kind, text)) = lit_kind(self.tok) {
            let lit = BasicLit {
                pos: self.p(),
                kind,
                value: self.a.symbols.intern(text),
            };
            self.next();
            return Ok(self.a.expr(Expr::BasicLit(lit)));
        }
        match self.tok {
            Tok::Ident(_) => {
                let id = self.parse_ident()?;
                Ok(self.a.expr(Expr::Ident(id)))
            }
            Tok::LParen => {
                let lparen = self.p();
                self.next();
                self.expr_lev += 1;
                let x = self.parse_type_or_expr();
                self.expr_lev -= 1;
                let x = x?;
                let rparen = self.expect_closing(Tok::RParen, "parenthesized expression")?;
                Ok(self.a.expr(Expr::Paren { lparen, x, rparen }))
            }
            Tok::KwFunc => self.parse_func_type_or_lit(),
            Tok::LBrack | Tok::KwStruct | Tok::KwMap | Tok::KwChan | Tok::KwInterface => {
                self.parse_type()
            }
            _ => Err(self.error_expected("expression")),
        }
    }

    fn parse_func_type_or_lit(&mut self) -> PResult<ExprId> {
        let func = self.expect(Tok::KwFunc)?;
        let typ = self.parse_signature(func)?;
        if self.tok != Tok::LBrace {
            return Ok(self.a.expr(Expr::FuncType(typ)));
        }
        self.expr_lev += 1;
        let body = self.parse_body();
        self.expr_lev -= 1;
        let body = body?;
        Ok(self.a.expr(Expr::FuncLit { typ, body }))
    }

    fn parse_primary_expr(&mut self) -> PResult<ExprId> {
        let mut x = self.parse_operand()?;
        loop {
            match self.tok {
                Tok::Dot => {
                    self.next();
                    match self.tok {
                        Tok::Ident(_) => {
                            let sel = self.parse_ident()?;
                            x = self.a.expr(Expr::Selector { x, sel });
                        }
                        Tok::LParen => {
                            let lparen = self.p();
                            self.next();
                            let typ = if self.tok == Tok::KwType {
                                self.next();
                                None
                            } else {
                                Some(self.parse_type()?)
                            };
                            let rparen = self.expect(Tok::RParen)?;
                            x = self.a.expr(Expr::TypeAssert {
                                x,
                                lparen,
                                typ,
                                rparen,
                            });
                        }
                        _ => return Err(self.error_expected("selector or type assertion")),
                    }
                }
                Tok::LBrack => x = self.parse_index_or_slice(x)?,
                Tok::LParen => {
                    let call = self.parse_call(x)?;
                    x = self.a.expr(Expr::Call(call));
                }
                Tok::LBrace if self.is_literal_type(x) => {
                    x = self.parse_literal_value(Some(x))?;
                }
                _ => return Ok(x),
            }
        }
    }

    /// Whether `{` after `x` opens a composite literal. Bare type names are
    /// not literal types inside control clause headers.
    fn is_literal_type(&self, x: ExprId) -> bool {
        match self.a.exprs[Expr::unparen(&self.a, x)] {
            Expr::Bad { .. }
            | Expr::Ident(_)
            | Expr::Selector { .. }
            | Expr::Index { .. }
            | Expr::IndexList { .. } => self.expr_lev >= 0,
            Expr::ArrayType { .. } | Expr::StructType { .. } | Expr::MapType { .. } => true,
            _ => false,
        }
    }

    fn parse_index_or_slice(&mut self, x: ExprId) -> PResult<ExprId> {
        let lbrack = self.expect(Tok::LBrack)?;
        if self.tok == Tok::RBrack {
            return Err(self.error_expected("operand"));
        }
        self.expr_lev += 1;
        let parts = self.parse_index_parts();
        self.expr_lev -= 1;
        let (index, ncolons, args) = parts?;
        let rbrack = self.expect(Tok::RBrack)?;

        if ncolons > 0 {
            let slice3 = ncolons == 2;
            if slice3 && (index[1].is_none() || index[2].is_none()) {
                return Err(self.error("middle and final index required in 3-index slice"));
            }
            return Ok(self.a.expr(Expr::Slice {
                x,
                lbrack,
                low: index[0],
                high: index[1],
                max: index[2],
                slice3,
                rbrack,
            }));
        }
        if args.is_empty() {
            let Some(index) = index[0] else {
                return Err(self.error_expected("operand"));
            };
            return Ok(self.a.expr(Expr::Index {
                x,
                lbrack,
                index,
                rbrack,
            }));
        }
        let indices = self.a.list_exprs(args);
        Ok(self.a.expr(Expr::IndexList {
            x,
            lbrack,
            indices,
            rbrack,
        }))
    }

    #[allow(clippy::type_complexity)]
    fn parse_index_parts(
        &mut self,
    ) -> PResult<([Option<ExprId>; 3], usize, SmallVec<[ExprId; 4]>)> {
        let mut index = [None; 3];
        let mut ncolons = 0;
        let mut args = SmallVec::new();

        if self.tok != Tok::Colon {
            index[0] = Some(self.parse_type_or_expr()?);
        }
        match self.tok {
            Tok::Colon => {
                while self.tok == Tok::Colon && ncolons < 2 {
                    ncolons += 1;
                    self.next();
                    if !matches!(self.tok, Tok::Colon | Tok::RBrack | Tok::Eof) {
                        index[ncolons] = Some(self.parse_expr()?);
                    }
                }
            }
            Tok::Comma => {
                args.extend(index[0]);
                while self.tok == Tok::Comma {
                    self.next();
                    if self.tok != Tok::RBrack && self.tok != Tok::Eof {
                        args.push(self.parse_type_elem()?);
                    }
                }
            }
            _ => {}
        }
        Ok((index, ncolons, args))
    }

    fn parse_call(&mut self, fun: ExprId) -> PResult<CallExpr> {
        let lparen = self.expect(Tok::LParen)?;
        self.expr_lev += 1;
        let parts = self.parse_call_args();
        self.expr_lev -= 1;
        let (args, ellipsis) = parts?;
        let rparen = self.expect_closing(Tok::RParen, "argument list")?;
        let args = self.a.list_exprs(args);
        Ok(CallExpr {
            fun,
            lparen,
            args,
            ellipsis,
            rparen,
        })
    }

    fn parse_call_args(&mut self) -> PResult<(SmallVec<[ExprId; 4]>, Option<Pos>)> {
        let mut args = SmallVec::new();
        let mut ellipsis = None;
        while self.tok != Tok::RParen && self.tok != Tok::Eof && ellipsis.is_none() {
            args.push(self.parse_type_or_expr()?);
            if self.tok == Tok::Ellipsis {
                ellipsis = Some(self.p());
                self.next();
            }
            if self.tok != Tok::Comma {
                break;
            }
            self.next();
        }
        Ok((args, ellipsis))
    }

    fn parse_literal_value(&mut self, typ: Option<ExprId>) -> PResult<ExprId> {
        let lbrace = self.expect(Tok::LBrace)?;
        self.expr_lev += 1;
        let elts = self.parse_element_list();
        self.expr_lev -= 1;
        let elts = elts?;
        let rbrace = self.expect_closing(Tok::RBrace, "composite literal")?;
        let elts = self.a.list_exprs(elts);
        Ok(self.a.expr(Expr::CompositeLit {
            typ,
            lbrace,
            elts,
            rbrace,
            incomplete: false,
        }))
    }

    fn parse_element_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut elts = Vec::new();
        while self.tok != Tok::RBrace && self.tok != Tok::Eof {
            let key = self.parse_element_value()?;
            let elt = if self.tok == Tok::Colon {
                let colon = self.p();
                self.next();
                let value = self.parse_element_value()?;
                self.a.expr(Expr::KeyValue { key, colon, value })
            } else {
                key
            };
            elts.push(elt);
            if self.tok != Tok::Comma {
                break;
            }
            self.next();
        }
        Ok(elts)
    }

    fn parse_element_value(&mut self) -> PResult<ExprId> {
        if self.tok == Tok::LBrace {
            return self.parse_literal_value(None);
        }
        self.parse_expr()
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_body(&mut self) -> PResult<Block> {
        self.parse_block()
    }

    fn parse_block(&mut self) -> PResult<Block> {
        let lbrace = self.expect(Tok::LBrace)?;
        let list = self.parse_stmt_list()?;
        let rbrace = self.expect_closing(Tok::RBrace, "block")?;
        Ok(Block {
            lbrace,
            list,
            rbrace,
        })
    }

    fn parse_stmt_list(&mut self) -> PResult<ListRef<StmtId>> {
        let mut list = Vec::new();
        while !matches!(
            self.tok,
            Tok::KwCase | Tok::KwDefault | Tok::RBrace | Tok::Eof
        ) {
            list.push(self.parse_stmt()?);
        }
        Ok(self.a.list_stmts(list))
    }

    fn parse_stmt(&mut self) -> PResult<StmtId> {
        let stmt = match self.tok {
            Tok::KwConst => Stmt::Decl(self.parse_gen_decl(GenDeclTok::Const)?),
            Tok::KwType => Stmt::Decl(self.parse_gen_decl(GenDeclTok::Type)?),
            Tok::KwVar => Stmt::Decl(self.parse_gen_decl(GenDeclTok::Var)?),

            Tok::Ident(_)
            | Tok::IntLit(_)
            | Tok::FloatLit(_)
            | Tok::ImagLit(_)
            | Tok::RuneLit(_)
            | Tok::StringLit(_)
            | Tok::RawStringLit(_)
            | Tok::KwFunc
            | Tok::LParen
            | Tok::LBrack
            | Tok::KwStruct
            | Tok::KwMap
            | Tok::KwChan
            | Tok::KwInterface
            | Tok::Plus
            | Tok::Minus
            | Tok::Star
            | Tok::Amp
            | Tok::Caret
            | Tok::Arrow
            | Tok::Bang => match self.parse_simple_stmt(StmtMode::LabelOk)? {
                // The labeled statement already consumed its terminator.
                Simple::Stmt(s @ Stmt::Labeled { .. }) => s,
                Simple::Stmt(s) => {
                    self.expect_semi()?;
                    s
                }
                Simple::Range { .. } => return Err(self.error("unexpected range clause")),
            },

            Tok::KwGo | Tok::KwDefer => {
                let kw = self.tok;
                let pos = self.p();
                self.next();
                let call = self.parse_call_operand(if kw == Tok::KwGo { "go" } else { "defer" })?;
                self.expect_semi()?;
                if kw == Tok::KwGo {
                    Stmt::Go { go: pos, call }
                } else {
                    Stmt::Defer { defer: pos, call }
                }
            }
            Tok::KwReturn => {
                let ret = self.p();
                self.next();
                let results = if matches!(self.tok, Tok::Semi | Tok::RBrace) {
                    ListRef::EMPTY
                } else {
                    self.parse_expr_list()?
                };
                self.expect_semi()?;
                Stmt::Return { ret, results }
            }
            Tok::KwBreak | Tok::KwContinue | Tok::KwGoto | Tok::KwFallthrough => {
                let tok = match self.tok {
                    Tok::KwBreak => BranchTok::Break,
                    Tok::KwContinue => BranchTok::Continue,
                    Tok::KwGoto => BranchTok::Goto,
                    _ => BranchTok::Fallthrough,
                };
                let tok_pos = self.p();
                self.next();
                let label = match self.tok {
                    Tok::Ident(_) if tok != BranchTok::Fallthrough => Some(self.parse_ident()?),
                    _ => None,
                };
                self.expect_semi()?;
                Stmt::Branch {
                    tok_pos,
                    tok,
                    label,
                }
            }
            Tok::LBrace => {
                let block = self.parse_block()?;
                self.expect_semi()?;
                Stmt::Block(block)
            }
            Tok::KwIf => self.parse_if_stmt()?,
            Tok::KwSwitch => self.parse_switch_stmt()?,
            Tok::KwSelect => self.parse_select_stmt()?,
            Tok::KwFor => self.parse_for_stmt()?,
            Tok::Semi => {
                let stmt = Stmt::Empty {
                    semicolon: self.p(),
                    implicit: self.pos == self.end,
                };
                self.next();
                stmt
            }
            Tok::RBrace => Stmt::Empty {
                semicolon: self.p(),
                implicit: true,
            },
            _ => return Err(self.error_expected("statement")),
        };
        Ok(self.a.stmt(stmt))
    }

    fn parse_call_operand(&mut self, what: &str) -> PResult<CallExpr> {
        let x = self.parse_unary_expr()?;
        match self.a.exprs[x] {
            Expr::Call(call) => Ok(call),
            _ => Err(self.error(format!("expression in {what} must be function call"))),
        }
    }

    fn parse_simple_stmt(&mut self, mode: StmtMode) -> PResult<Simple> {
        let lhs = self.parse_expr_vec()?;

        if let Some(tok) = assign_op(self.tok) {
            let tok_pos = self.p();
            self.next();
            if mode == StmtMode::RangeOk
                && self.tok == Tok::KwRange
                && matches!(tok, AssignOp::Assign | AssignOp::Define)
            {
                self.next();
                let x = self.parse_expr()?;
                if lhs.len() > 2 {
                    return Err(self.error("range clause permits at most two iteration variables"));
                }
                return Ok(Simple::Range {
                    key: lhs.first().copied(),
                    value: lhs.get(1).copied(),
                    tok_pos,
                    tok: Some(tok),
                    x,
                });
            }
            let rhs = self.parse_expr_list()?;
            let lhs = self.a.list_exprs(lhs);
            return Ok(Simple::Stmt(Stmt::Assign {
                lhs,
                tok_pos,
                tok,
                rhs,
            }));
        }

        if lhs.len() > 1 {
            return Err(self.error_expected("1 expression"));
        }
        let x = lhs[0];

        let stmt = match self.tok {
            Tok::Colon if mode == StmtMode::LabelOk => {
                let Expr::Ident(label) = self.a.exprs[x] else {
                    return Err(self.error("illegal label declaration"));
                };
                let colon = self.p();
                self.next();
                let stmt = self.parse_stmt()?;
                Stmt::Labeled { label, colon, stmt }
            }
            Tok::Arrow => {
                let arrow = self.p();
                self.next();
                let value = self.parse_expr()?;
                Stmt::Send {
                    chan: x,
                    arrow,
                    value,
                }
            }
            Tok::Inc | Tok::Dec => {
                let tok = if self.tok == Tok::Inc {
                    IncDecOp::Inc
                } else {
                    IncDecOp::Dec
                };
                let tok_pos = self.p();
                self.next();
                Stmt::IncDec { x, tok_pos, tok }
            }
            _ => Stmt::Expr(x),
        };
        Ok(Simple::Stmt(stmt))
    }

    fn make_expr(&self, s: Option<Simple>, what: &str) -> PResult<Option<ExprId>> {
        match s {
            None => Ok(None),
            Some(Simple::Stmt(Stmt::Expr(x))) => Ok(Some(x)),
            Some(_) => Err(self.error(format!("expected {what}, found simple statement"))),
        }
    }

    fn alloc_simple(&mut self, s: Option<Simple>) -> PResult<Option<StmtId>> {
        match s {
            None => Ok(None),
            Some(Simple::Stmt(st)) => Ok(Some(self.a.stmt(st))),
            Some(Simple::Range { .. }) => Err(self.error("unexpected range clause")),
        }
    }

    fn parse_if_stmt(&mut self) -> PResult<Stmt> {
        let if_pos = self.expect(Tok::KwIf)?;
        let (init, cond) = self.parse_if_header()?;
        let body = self.parse_block()?;

        let els = if self.tok == Tok::KwElse {
            self.next();
            match self.tok {
                Tok::KwIf => {
                    let s = self.parse_if_stmt()?;
                    Some(self.a.stmt(s))
                }
                Tok::LBrace => {
                    let block = self.parse_block()?;
                    self.expect_semi()?;
                    Some(self.a.stmt(Stmt::Block(block)))
                }
                _ => return Err(self.error_expected("if statement or block")),
            }
        } else {
            self.expect_semi()?;
            None
        };

        Ok(Stmt::If {
            if_pos,
            init,
            cond,
            body,
            els,
        })
    }

    fn parse_if_header(&mut self) -> PResult<(Option<StmtId>, ExprId)> {
        if self.tok == Tok::LBrace {
            return Err(self.error("missing condition in if statement"));
        }
        let prev_lev = self.expr_lev;
        self.expr_lev = -1;
        let header = self.parse_if_header_inner();
        self.expr_lev = prev_lev;
        let (init, cond) = header?;

        let init = self.alloc_simple(init)?;
        let Some(cond) = self.make_expr(cond, "boolean expression")? else {
            return Err(self.error("missing condition in if statement"));
        };
        Ok((init, cond))
    }

    fn parse_if_header_inner(&mut self) -> PResult<(Option<Simple>, Option<Simple>)> {
        let mut init = None;
        if self.tok != Tok::Semi {
            init = Some(self.parse_simple_stmt(StmtMode::Basic)?);
        }
        if self.tok == Tok::LBrace {
            return Ok((None, init));
        }
        self.expect(Tok::Semi)?;
        let cond = if self.tok != Tok::LBrace {
            Some(self.parse_simple_stmt(StmtMode::Basic)?)
        } else {
            None
        };
        Ok((init, cond))
    }

    /// Optional `init;` and tag/guard of a switch header.
    fn parse_switch_header(&mut self) -> PResult<(Option<Simple>, Option<Simple>)> {
        let mut s1 = None;
        let mut s2 = None;
        if self.tok != Tok::LBrace {
            if self.tok != Tok::Semi {
                s2 = Some(self.parse_simple_stmt(StmtMode::Basic)?);
            }
            if self.tok == Tok::Semi {
                self.next();
                s1 = s2.take();
                if self.tok != Tok::LBrace {
                    s2 = Some(self.parse_simple_stmt(StmtMode::Basic)?);
                }
            }
        }
        Ok((s1, s2))
    }

    fn is_type_switch_guard(&self, s: &Option<Simple>) -> bool {
        let is_type_assert = |x: ExprId| {
            matches!(self.a.exprs[x], Expr::TypeAssert { typ: None, .. })
        };
        match s {
            Some(Simple::Stmt(Stmt::Expr(x))) => is_type_assert(*x),
            Some(Simple::Stmt(Stmt::Assign {
                lhs,
                tok: AssignOp::Define,
                rhs,
                ..
            })) => {
                lhs.len() == 1
                    && rhs.len() == 1
                    && is_type_assert(self.a.exprs_list(*rhs)[0])
            }
            _ => false,
        }
    }

    fn parse_switch_stmt(&mut self) -> PResult<Stmt> {
        let switch = self.expect(Tok::KwSwitch)?;
        let prev_lev = self.expr_lev;
        self.expr_lev = -1;
        let header = self.parse_switch_header();
        self.expr_lev = prev_lev;
        let (s1, s2) = header?;

        let type_switch = self.is_type_switch_guard(&s2);
        let lbrace = self.expect(Tok::LBrace)?;
        let mut list = Vec::new();
        while matches!(self.tok, Tok::KwCase | Tok::KwDefault) {
            list.push(self.parse_case_clause()?);
        }
        let rbrace = self.expect(Tok::RBrace)?;
        self.expect_semi()?;

        let list = self.a.list_stmts(list);
        let body = Block {
            lbrace,
            list,
            rbrace,
        };
        let init = self.alloc_simple(s1)?;

        if type_switch {
            let Some(assign) = self.alloc_simple(s2)? else {
                return Err(self.error("missing type switch guard"));
            };
            return Ok(Stmt::TypeSwitch {
                switch,
                init,
                assign,
                body,
            });
        }
        let tag = self.make_expr(s2, "switch expression")?;
        Ok(Stmt::Switch {
            switch,
            init,
            tag,
            body,
        })
    }

    fn parse_case_clause(&mut self) -> PResult<StmtId> {
        let case = self.p();
        let list = if self.tok == Tok::KwCase {
            self.next();
            self.parse_expr_list()?
        } else {
            self.expect(Tok::KwDefault)?;
            ListRef::EMPTY
        };
        let colon = self.expect(Tok::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(self.a.stmt(Stmt::CaseClause {
            case,
            list,
            colon,
            body,
        }))
    }

    fn parse_select_stmt(&mut self) -> PResult<Stmt> {
        let select = self.expect(Tok::KwSelect)?;
        let lbrace = self.expect(Tok::LBrace)?;
        let mut list = Vec::new();
        while matches!(self.tok, Tok::KwCase | Tok::KwDefault) {
            list.push(self.parse_comm_clause()?);
        }
        let rbrace = self.expect(Tok::RBrace)?;
        self.expect_semi()?;
        let list = self.a.list_stmts(list);
        Ok(Stmt::Select {
            select,
            body: Block {
                lbrace,
                list,
                rbrace,
            },
        })
    }

    fn parse_comm_clause(&mut self) -> PResult<StmtId> {
        let case = self.p();
        let comm = if self.tok == Tok::KwCase {
            self.next();
            let s = self.parse_simple_stmt(StmtMode::Basic)?;
            self.alloc_simple(Some(s))?
        } else {
            self.expect(Tok::KwDefault)?;
            None
        };
        let colon = self.expect(Tok::Colon)?;
        let body = self.parse_stmt_list()?;
        Ok(self.a.stmt(Stmt::CommClause {
            case,
            comm,
            colon,
            body,
        }))
    }

    fn parse_for_stmt(&mut self) -> PResult<Stmt> {
        let for_pos = self.expect(Tok::KwFor)?;
        let prev_lev = self.expr_lev;
        self.expr_lev = -1;
        let header = self.parse_for_header();
        self.expr_lev = prev_lev;
        let (s1, s2, s3) = header?;

        let body = self.parse_block()?;
        self.expect_semi()?;

        if let Some(Simple::Range {
            key,
            value,
            tok_pos,
            tok,
            x,
        }) = s2
        {
            return Ok(Stmt::Range {
                for_pos,
                key,
                value,
                tok_pos,
                tok,
                x,
                body,
            });
        }

        let init = self.alloc_simple(s1)?;
        let cond = self.make_expr(s2, "boolean or range expression")?;
        let post = self.alloc_simple(s3)?;
        Ok(Stmt::For {
            for_pos,
            init,
            cond,
            post,
            body,
        })
    }

    #[allow(clippy::type_complexity)]
    fn parse_for_header(&mut self) -> PResult<(Option<Simple>, Option<Simple>, Option<Simple>)> {
        let (mut s1, mut s2, mut s3) = (None, None, None);
        if self.tok == Tok::LBrace {
            return Ok((s1, s2, s3));
        }

        if self.tok == Tok::KwRange {
            // `for range x`
            self.next();
            let x = self.parse_expr()?;
            return Ok((
                None,
                Some(Simple::Range {
                    key: None,
                    value: None,
                    tok_pos: Pos::NONE,
                    tok: None,
                    x,
                }),
                None,
            ));
        }

        if self.tok != Tok::Semi {
            s2 = Some(self.parse_simple_stmt(StmtMode::RangeOk)?);
        }
        if matches!(s2, Some(Simple::Range { .. })) {
            return Ok((s1, s2, s3));
        }
        if self.tok == Tok::Semi {
            self.next();
            s1 = s2.take();
            if self.tok != Tok::Semi {
                s2 = Some(self.parse_simple_stmt(StmtMode::Basic)?);
            }
            self.expect(Tok::Semi)?;
            if self.tok != Tok::LBrace {
                s3 = Some(self.parse_simple_stmt(StmtMode::Basic)?);
            }
        }
        Ok((s1, s2, s3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceFile {
        match parse_file("t.go", src, ParseMode::with_comments(true)) {
            Ok(f) => f,
            Err(e) => panic!("parse failed: {e}\n{src}"),
        }
    }

    fn first_func_body(sf: &SourceFile) -> &[StmtId] {
        for &d in sf.arena.decls_list(sf.file.decls) {
            if let Decl::Func(FuncDecl { body: Some(b), .. }) = sf.arena.decls[d] {
                return sf.arena.stmts_list(b.list);
            }
        }
        panic!("no function body");
    }

    #[test]
    fn composite_literal_not_taken_in_if_header() {
        let sf = parse("package p\nfunc f() { if x == T {} ; if (T{}) == x {} }\n");
        let body = first_func_body(&sf);
        let Stmt::If { cond, .. } = sf.arena.stmts[body[0]] else {
            panic!("expected if");
        };
        assert!(matches!(sf.arena.exprs[cond], Expr::Binary { .. }));
    }

    #[test]
    fn range_clauses() {
        let sf = parse("package p\nfunc f() {\n\tfor k, v := range m {\n\t}\n\tfor range ch {\n\t}\n}\n");
        let body = first_func_body(&sf);
        match sf.arena.stmts[body[0]] {
            Stmt::Range {
                key: Some(_),
                value: Some(_),
                tok: Some(AssignOp::Define),
                ..
            } => {}
            ref s => panic!("unexpected {s:?}"),
        }
        match sf.arena.stmts[body[1]] {
            Stmt::Range {
                key: None,
                tok: None,
                ..
            } => {}
            ref s => panic!("unexpected {s:?}"),
        }
    }

    #[test]
    fn type_switch_detection() {
        let sf = parse("package p\nfunc f(x any) {\n\tswitch y := x.(type) {\n\tcase int:\n\t\t_ = y\n\t}\n}\n");
        let body = first_func_body(&sf);
        assert!(matches!(sf.arena.stmts[body[0]], Stmt::TypeSwitch { .. }));
    }

    #[test]
    fn grouped_params_share_type() {
        let sf = parse("package p\nfunc f(a, b int, c ...string) {}\n");
        let Decl::Func(fd) = sf.arena.decls[sf.arena.decls_list(sf.file.decls)[0]] else {
            panic!("expected func");
        };
        let fields = sf.arena.fields_list(fd.typ.params.list);
        assert_eq!(fields.len(), 2);
        assert_eq!(sf.arena.fields[fields[0]].names.len(), 2);
        let last = sf.arena.fields[fields[1]].typ;
        assert!(matches!(sf.arena.exprs[last], Expr::Ellipsis { elt: Some(_), .. }));
    }

    #[test]
    fn generic_type_params_versus_array() {
        let sf = parse("package p\ntype A [N]int\ntype L[T any] struct{ next *L[T] }\n");
        let specs: Vec<_> = sf
            .arena
            .decls_list(sf.file.decls)
            .iter()
            .map(|&d| match sf.arena.decls[d] {
                Decl::Gen(g) => sf.arena.specs[sf.arena.specs_list(g.specs)[0]],
                _ => panic!("expected gen decl"),
            })
            .collect();
        assert!(matches!(specs[0], Spec::Type { type_params: None, .. }));
        assert!(matches!(specs[1], Spec::Type { type_params: Some(_), .. }));
    }

    #[test]
    fn doc_and_line_comments_attach() {
        let src = "// Package p.\npackage p\n\n// X is x.\nvar X = 1 // trailing\n";
        let sf = parse(src);
        assert!(sf.file.doc.is_some());
        assert_eq!(sf.file.comments.len(), 3);
        let Decl::Gen(g) = sf.arena.decls[sf.arena.decls_list(sf.file.decls)[0]] else {
            panic!("expected gen decl");
        };
        assert!(g.doc.is_some());
        let Spec::Value { doc, comment, .. } = sf.arena.specs[sf.arena.specs_list(g.specs)[0]] else {
            panic!("expected value spec");
        };
        assert!(doc.is_none());
        assert!(comment.is_some());
    }

    #[test]
    fn syntax_error_is_reported_with_location() {
        let err = parse_file("bad.go", "package p\nfunc f( {\n", ParseMode::default())
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        assert!(err.starts_with("bad.go:2:"), "{err}");
    }
}
