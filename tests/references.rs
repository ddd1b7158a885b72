use go125_astjson::syntax::ast::{
    AstArena, BinaryOp, Block, Decl, Expr, ExprId, FieldList, File, FuncDecl, FuncType, ListRef,
    Pos, SourceFile, Stmt,
};
use go125_astjson::syntax::SourceMap;
use go125_astjson::{marshal, source_to_json, to_json, unmarshal, Options};
use serde_json::Value;

/// `func f() { return x + x }` where both operands are one node instance.
fn shared_operand() -> SourceFile {
    let mut a = AstArena::new();
    let x = a.ident_expr("x", Pos::NONE);
    let sum = a.expr(Expr::Binary {
        x,
        op_pos: Pos::NONE,
        op: BinaryOp::Add,
        y: x,
    });
    let results = a.list_exprs([sum]);
    let ret = a.stmt(Stmt::Return {
        ret: Pos::NONE,
        results,
    });
    let list = a.list_stmts([ret]);
    let f = a.ident("f", Pos::NONE);
    let func = a.decl(Decl::Func(FuncDecl {
        doc: None,
        recv: None,
        name: f,
        typ: FuncType {
            func: Pos::NONE,
            type_params: None,
            params: FieldList {
                opening: Pos::NONE,
                list: ListRef::EMPTY,
                closing: Pos::NONE,
            },
            results: None,
        },
        body: Some(Block {
            lbrace: Pos::NONE,
            list,
            rbrace: Pos::NONE,
        }),
    }));
    let decls = a.list_decls([func]);
    let name = a.ident("p", Pos::NONE);
    SourceFile {
        arena: a,
        file: File {
            doc: None,
            package: Pos::NONE,
            name,
            decls,
            imports: ListRef::EMPTY,
            unresolved: ListRef::EMPTY,
            comments: ListRef::EMPTY,
        },
        source_map: SourceMap::default(),
    }
}

fn operands(sf: &SourceFile) -> (ExprId, ExprId) {
    let a = &sf.arena;
    let Decl::Func(f) = a.decls[a.decls_list(sf.file.decls)[0]] else {
        panic!("not a FuncDecl")
    };
    let body = f.body.expect("body");
    let Stmt::Return { results, .. } = a.stmts[a.stmts_list(body.list)[0]] else {
        panic!("not a ReturnStmt")
    };
    let Expr::Binary { x, y, .. } = a.exprs[a.exprs_list(results)[0]] else {
        panic!("not a BinaryExpr")
    };
    (x, y)
}

/// `RefId`s in document order.
fn ref_ids(json: &str) -> Vec<u32> {
    json.match_indices("\"RefId\":")
        .map(|(at, key)| {
            let digits: String = json[at + key.len()..]
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().unwrap()
        })
        .collect()
}

#[test]
fn shared_child_is_written_twice_with_one_ref_id() {
    let sf = shared_operand();
    let opts = Options::new().with_references(true);
    let v = serde_json::to_value(marshal(&sf, &opts)).unwrap();
    let sum = &v["Decls"][0]["Body"]["List"][0]["Results"][0];
    assert_eq!(sum["NodeType"], "BinaryExpr");
    assert_eq!(sum["X"], sum["Y"]);
    assert_eq!(sum["X"]["Name"], "x");
    assert!(sum["X"]["RefId"].as_u64().is_some());
}

#[test]
fn no_ref_ids_without_references() {
    let sf = shared_operand();
    let json = to_json(&marshal(&sf, &Options::new()), 0).unwrap();
    assert!(!json.contains("RefId"), "{json}");
    assert!(sf.print().contains("return x + x"));
}

#[test]
fn sharing_is_restored_only_with_references() {
    let sf = shared_operand();
    let with = Options::new().with_references(true);
    let json = to_json(&marshal(&sf, &with), 0).unwrap();

    let shared = unmarshal(&json, &with).unwrap();
    let (x, y) = operands(&shared);
    assert_eq!(x, y);
    assert_eq!(shared.print(), sf.print());

    let separate = unmarshal(&json, &Options::new()).unwrap();
    let (x, y) = operands(&separate);
    assert_ne!(x, y);
    assert_eq!(separate.print(), sf.print());
}

#[test]
fn ids_are_handed_out_in_first_visit_order() {
    let src = "package p\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc main() {\n\tfmt.Println(os.Args)\n}\n";
    let opts = Options::new().with_references(true).with_imports(true);
    let json = source_to_json(src, "main.go", &opts).unwrap();
    let ids = ref_ids(&json);
    assert!(!ids.is_empty());

    let mut next = 1;
    let mut repeats = 0;
    for id in ids {
        if id == next {
            next += 1;
        } else {
            assert!(id < next, "id {id} skipped ahead of {next}");
            repeats += 1;
        }
    }
    // Both import specs again under File.Imports, with their children.
    assert!(repeats >= 2);
}

#[test]
fn imports_list_aliases_the_declared_specs() {
    let src = "package p\n\nimport \"fmt\"\n\nvar _ = fmt.Sprint\n";
    let opts = Options::new().with_references(true).with_imports(true);
    let json = source_to_json(src, "p.go", &opts).unwrap();
    let v: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["Imports"][0], v["Decls"][0]["Specs"][0]);

    let sf = unmarshal(&json, &opts).unwrap();
    let a = &sf.arena;
    let Decl::Gen(g) = a.decls[a.decls_list(sf.file.decls)[0]] else {
        panic!("not a GenDecl")
    };
    assert_eq!(a.specs_list(sf.file.imports), a.specs_list(g.specs));
}

#[test]
fn comment_groups_share_ids_with_the_file_list() {
    let src = "package p\n\n// Doc for x.\nvar x = 1\n";
    let opts = Options::new().with_references(true).with_comments(true);
    let json = source_to_json(src, "p.go", &opts).unwrap();
    let v: Value = serde_json::from_str(&json).unwrap();
    let doc = &v["Decls"][0]["Doc"];
    assert_eq!(doc["List"][0]["Text"], "// Doc for x.");
    assert_eq!(&v["Comments"][0], doc);
}
