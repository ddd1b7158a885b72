use go125_astjson::{
    marshal, source_to_json, unmarshal, unmarshal_value, CodecError, Family, Options,
};
use proptest::prelude::*;
use serde_json::{json, Value};

const SRC: &str = r#"// Package p is small.
package p

import "fmt"

type T struct {
	A, B int `json:"a"`
}

func (t *T) Sum(xs ...int) (n int) {
	for i, x := range xs {
		if i%2 == 0 {
			n += x * t.A
		} else if x > 0 {
			n -= x
		}
	}
	switch {
	case n < 0:
		fmt.Println(n)
	}
	return
}
"#;

fn all_on() -> Options {
    Options::new()
        .with_comments(true)
        .with_positions(true)
        .with_imports(true)
}

fn document(opts: &Options) -> Value {
    serde_json::from_str(&source_to_json(SRC, "p.go", opts).unwrap()).unwrap()
}

#[test]
fn unknown_expression_tag_names_the_family() {
    let opts = Options::new();
    let mut doc = document(&opts);
    let init = &mut doc["Decls"][2]["Body"]["List"][0]["X"];
    assert_eq!(init["NodeType"], "Ident");
    init["NodeType"] = json!("NotARealKind");

    match unmarshal_value(&doc, &opts).unwrap_err() {
        CodecError::UnknownTag { tag, family, path } => {
            assert_eq!(tag, "NotARealKind");
            assert_eq!(family, Family::Expr);
            assert_eq!(path, "$.Decls[2].Body.List[0].X");
        }
        other => panic!("expected an unknown tag, got {other}"),
    }
}

#[test]
fn shape_errors_are_schema_errors() {
    let opts = Options::new();
    for (json, path) in [
        ("[]", "$"),
        (r#"{"NodeType":"File","Name":{"NodeType":"Ident","Name":"p"},"Decls":{}}"#, "$.Decls"),
        (r#"{"NodeType":"File","Name":"p"}"#, "$.Name"),
        (r#"{"NodeType":"File","Name":{"NodeType":"Ident","Name":7}}"#, "$.Name.Name"),
        (r#"{"NodeType":"File","Name":{"NodeType":"Ident","Name":"p"},"Decls":[null]}"#, "$.Decls[0]"),
    ] {
        match unmarshal(json, &opts).unwrap_err() {
            CodecError::Schema { path: got, .. } => assert_eq!(got, path, "{json}"),
            other => panic!("{json}: expected a schema error, got {other}"),
        }
    }
}

#[test]
fn impossible_positions_are_rejected() {
    let opts = all_on();
    let mut doc = document(&opts);
    doc["Package"]["Line"] = json!(1_000_000_000u64);
    match unmarshal_value(&doc, &opts).unwrap_err() {
        CodecError::Schema { path, message } => {
            assert_eq!(path, "$.Package");
            assert_eq!(message, "position out of range");
        }
        other => panic!("expected a schema error, got {other}"),
    }
}

#[test]
fn distant_line_numbers_decode_without_a_dense_table() {
    let json = r#"{"NodeType":"File","Package":{"NodeType":"Position","Offset":4000000000,"Line":4000000000,"Column":1},"Name":{"NodeType":"Ident","Name":"p"}}"#;
    let opts = Options::new().with_positions(true);
    let sf = unmarshal(json, &opts).unwrap();
    assert_eq!(sf.print(), "package p\n");

    let again: Value = serde_json::to_value(marshal(&sf, &opts)).unwrap();
    assert_eq!(again["Package"]["Line"], 4_000_000_000u64);
    assert_eq!(again["Package"]["Column"], 1);
}

#[test]
fn truncated_text_is_an_input_error() {
    let json = source_to_json(SRC, "p.go", &Options::new()).unwrap();
    let err = unmarshal(&json[..json.len() / 2], &Options::new()).unwrap_err();
    assert!(matches!(err, CodecError::Input(_)), "{err}");
}

/// Steps from the root to a value: object keys or array indexes.
#[derive(Debug, Clone)]
enum Step {
    Key(String),
    Index(usize),
}

fn locations(v: &Value, here: &mut Vec<Step>, out: &mut Vec<Vec<Step>>) {
    out.push(here.clone());
    match v {
        Value::Object(map) => {
            for (k, child) in map {
                here.push(Step::Key(k.clone()));
                locations(child, here, out);
                here.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                here.push(Step::Index(i));
                locations(child, here, out);
                here.pop();
            }
        }
        _ => {}
    }
}

fn at<'v>(v: &'v mut Value, path: &[Step]) -> &'v mut Value {
    path.iter().fold(v, |v, step| match step {
        Step::Key(k) => &mut v[k.as_str()],
        Step::Index(i) => &mut v[*i],
    })
}

#[derive(Debug, Clone)]
enum Mutation {
    Null,
    Number(i64),
    Text(String),
    EmptyObject,
    RemoveKey(prop::sample::Index),
    Retag(&'static str),
}

fn mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        Just(Mutation::Null),
        any::<i64>().prop_map(Mutation::Number),
        "[A-Za-z+<>=]{0,8}".prop_map(Mutation::Text),
        Just(Mutation::EmptyObject),
        any::<prop::sample::Index>().prop_map(Mutation::RemoveKey),
        prop::sample::select(vec![
            "File", "Ident", "BlockStmt", "FuncDecl", "GenDecl", "ImportSpec", "Field",
            "FieldList", "CommentGroup", "Position", "IfStmt", "NotARealKind",
        ])
        .prop_map(Mutation::Retag),
    ]
}

fn apply(target: &mut Value, m: &Mutation) {
    match m {
        Mutation::Null => *target = Value::Null,
        Mutation::Number(n) => *target = json!(n),
        Mutation::Text(s) => *target = json!(s),
        Mutation::EmptyObject => *target = json!({}),
        Mutation::RemoveKey(i) => {
            if let Value::Object(map) = target {
                if !map.is_empty() {
                    let key = map.keys().nth(i.index(map.len())).cloned();
                    if let Some(key) = key {
                        map.remove(&key);
                    }
                }
            }
        }
        Mutation::Retag(tag) => {
            if let Value::Object(map) = target {
                map.insert("NodeType".into(), json!(tag));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn mutated_documents_never_panic(
        site in any::<prop::sample::Index>(),
        edits in prop::collection::vec(mutation(), 1..4),
        references in any::<bool>(),
    ) {
        let opts = all_on().with_references(references);
        let mut doc = document(&opts);
        let mut sites = Vec::new();
        locations(&doc, &mut Vec::new(), &mut sites);

        let path = site.get(&sites).clone();
        for edit in &edits {
            apply(at(&mut doc, &path), edit);
        }
        // Either outcome is fine; only a panic fails the property.
        let _ = unmarshal_value(&doc, &opts);
    }
}
