use go125_syntax::lexer::{Lexer, Tok};

fn injected_semis(input: &str) -> Vec<usize> {
    Lexer::new(input)
        .filter_map(|(s, t, e)| (matches!(t, Tok::Semi) && s == e).then_some(s))
        .collect()
}

fn tok_name(t: &Tok<'_>) -> &'static str {
    match t {
        Tok::Ident(_) => "IDENT",
        Tok::IntLit(_) => "INT",
        Tok::FloatLit(_) => "FLOAT",
        Tok::ImagLit(_) => "IMAG",
        Tok::RuneLit(_) => "CHAR",
        Tok::StringLit(_) | Tok::RawStringLit(_) => "STRING",
        Tok::Comment(_) => "COMMENT",
        Tok::Semi => ";",
        Tok::Inc => "++",
        Tok::Dec => "--",
        Tok::LParen => "(",
        Tok::RParen => ")",
        Tok::LBrack => "[",
        Tok::RBrack => "]",
        Tok::LBrace => "{",
        Tok::RBrace => "}",
        Tok::Plus => "+",
        Tok::Assign => "=",
        Tok::Define => ":=",
        Tok::Comma => ",",
        Tok::Colon => ":",
        Tok::KwBreak => "break",
        Tok::KwContinue => "continue",
        Tok::KwFallthrough => "fallthrough",
        Tok::KwReturn => "return",
        Tok::KwPackage => "package",
        Tok::KwFunc => "func",
        Tok::KwIf => "if",
        Tok::KwVar => "var",
        Tok::KwChan => "chan",
        Tok::KwStruct => "struct",
        Tok::Error => "ERROR",
        _ => "OTHER",
    }
}

fn names(lexer: Lexer<'_>) -> String {
    lexer.map(|(_, t, _)| tok_name(&t)).collect::<Vec<_>>().join(" ")
}

/// Checks both modes: `want` lists the comment-mode stream; without comments
/// the `COMMENT` entries disappear and nothing else changes.
fn check(input: &str, want: &str) {
    let got = names(Lexer::with_comments(input));
    assert_eq!(got, want, "comments, input=<<{input}>>");

    let plain_want = want
        .split_whitespace()
        .filter(|w| *w != "COMMENT")
        .collect::<Vec<_>>()
        .join(" ");
    let got = names(Lexer::new(input));
    assert_eq!(got, plain_want, "plain, input=<<{input}>>");
}

#[rustfmt::skip]
const CASES: &[(&str, &str)] = &[
    ("", ""),
    ("\u{FEFF};", ";"),
    ("foo\n", "IDENT ;"),
    ("123\n", "INT ;"),
    ("1.2\n", "FLOAT ;"),
    ("1i\n", "IMAG ;"),
    ("'x'\n", "CHAR ;"),
    ("\"x\"\n", "STRING ;"),
    ("`x`\n", "STRING ;"),
    ("+\n", "+"),
    ("=\n", "="),
    (":=\n", ":="),
    ("++\n", "++ ;"),
    ("--\n", "-- ;"),
    ("(\n", "("),
    ("[\n", "["),
    ("{\n", "{"),
    (",\n", ","),
    (")\n", ") ;"),
    ("]\n", "] ;"),
    ("}\n", "} ;"),
    (":\n", ":"),
    ("break\n", "break ;"),
    ("continue\n", "continue ;"),
    ("fallthrough\n", "fallthrough ;"),
    ("return\n", "return ;"),
    ("chan\n", "chan"),
    ("struct\n", "struct"),
    ("var\n", "var"),

    // A comment ending the line terminates the statement before it.
    ("foo//comment\n", "IDENT ; COMMENT"),
    ("foo/*comment*/\n", "IDENT ; COMMENT"),
    ("foo/*\n*/", "IDENT ; COMMENT"),
    ("foo/*comment*/    \n", "IDENT ; COMMENT"),
    ("foo    // comment\n", "IDENT ; COMMENT"),
    ("foo /* a */ /* b */\n", "IDENT ; COMMENT COMMENT"),
    ("foo /* a */ + 1\n", "IDENT COMMENT + INT ;"),
    ("// only\n", "COMMENT"),
    ("{ // open\n", "{ COMMENT"),

    (
        "package main\n\nfunc main() {\n\tif {\n\t\treturn /* */ }\n}\n",
        "package IDENT ; func IDENT ( ) { if { return COMMENT } ; } ;",
    ),
    ("package main", "package IDENT ;"),
];

#[test]
fn semicolon_insertion_table() {
    for &(input, want) in CASES {
        check(input, want);

        // Trailing newlines never change the stream.
        let mut trimmed = input;
        while let Some(rest) = trimmed.strip_suffix('\n') {
            trimmed = rest;
            check(trimmed, want);
        }
    }
}

#[test]
fn inserted_semi_sits_at_line_break() {
    assert_eq!(injected_semis("x\ny"), vec![1, 3]);
    assert_eq!(injected_semis("x\r\ny"), vec![1, 4]);
    assert_eq!(injected_semis("break\nx"), vec![5, 7]);
    assert_eq!(injected_semis("x++\ny"), vec![3, 5]);
}

#[test]
fn inserted_semi_precedes_trailing_comment() {
    assert_eq!(injected_semis("x // c\ny"), vec![2, 8]);
    assert_eq!(injected_semis("x/*\n*/y"), vec![1, 7]);
    let src = "x//c";
    assert_eq!(injected_semis(src), vec![1]);
}

#[test]
fn block_comment_newline_does_not_insert_after_keyword() {
    assert_eq!(injected_semis("if/*\n*/x"), vec![8]);
}

#[test]
fn explicit_semi_is_one_byte_wide() {
    let toks: Vec<_> = Lexer::new("a;b").collect();
    assert_eq!(toks[1], (1, Tok::Semi, 2));
}
