use go125_syntax::{parse_file, ParseMode};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9]{0,3}".prop_filter("keyword", |s| !is_keyword(s)),
        (0u32..1000).prop_map(|n| n.to_string()),
        Just("1.5".to_string()),
        Just("'x'".to_string()),
        Just("\"s\"".to_string()),
    ]
}

fn is_keyword(s: &str) -> bool {
    matches!(
        s,
        "break" | "case" | "chan" | "const" | "continue" | "default" | "defer" | "else"
            | "for" | "func" | "go" | "goto" | "if" | "map" | "range" | "type" | "var"
    )
}

fn expr() -> impl Strategy<Value = String> {
    leaf().prop_recursive(4, 32, 3, |inner| {
        let bin = prop_oneof![
            Just("+"), Just("-"), Just("*"), Just("/"), Just("<<"), Just("&^"),
            Just("=="), Just("<"), Just("&&"), Just("||"), Just("|"), Just("&"),
        ];
        let un = prop_oneof![Just("-"), Just("+"), Just("!"), Just("^"), Just("&"), Just("<-")];
        prop_oneof![
            (inner.clone(), bin, inner.clone()).prop_map(|(x, op, y)| format!("{x} {op} {y}")),
            (un, inner.clone()).prop_map(|(op, x)| format!("{op} {x}")),
            inner.clone().prop_map(|x| format!("({x})")),
            (inner.clone(), inner.clone()).prop_map(|(f, a)| format!("f({f}, {a})")),
            (inner.clone(), inner.clone()).prop_map(|(x, i)| format!("m[{x}][{i}]")),
            inner.clone().prop_map(|x| format!("[]int{{{x}}}")),
            inner.prop_map(|x| format!("s[{x}:]")),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn printed_expressions_reparse_identically(e in expr()) {
        let src = format!("package p\n\nvar v = {e}\n");
        let sf = parse_file("gen.go", &src, ParseMode::default());
        prop_assert!(sf.is_ok(), "generated source does not parse:\n{src}");
        let Ok(sf) = sf else { unreachable!() };

        let once = sf.print();
        let again = parse_file("gen.go", &once, ParseMode::default());
        prop_assert!(again.is_ok(), "printed source does not parse:\n{once}");
        let Ok(again) = again else { unreachable!() };
        prop_assert_eq!(again.print(), once);
    }

    #[test]
    fn parser_never_panics(s in "package p\n[a-z0-9(){}\\[\\] .,:=+*\n\"]{0,60}") {
        let _ = parse_file("fuzz.go", &s, ParseMode::default());
        let _ = parse_file("fuzz.go", &s, ParseMode::with_comments(true));
    }
}
