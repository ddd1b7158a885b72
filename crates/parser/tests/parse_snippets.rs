use go125_syntax::{parse_file, ParseMode, SourceFile};

fn parse(src: &str, mode: ParseMode) -> SourceFile {
    match parse_file("snippet.go", src, mode) {
        Ok(sf) => sf,
        Err(f) => panic!("expected parse ok, got diagnostics: {:#?}\n{src}", f.diags),
    }
}

/// Parses, and checks that the printed form parses back to the same text.
fn assert_parses(src: &str) {
    for mode in [ParseMode::default(), ParseMode::with_comments(true)] {
        let first = parse(src, mode).print();
        let second = parse(&first, mode).print();
        assert_eq!(first, second, "printer output is not stable:\n{first}");
    }
}

fn assert_rejects(src: &str, message: &str) {
    match parse_file("bad.go", src, ParseMode::default()) {
        Ok(_) => panic!("expected a syntax error for:\n{src}"),
        Err(f) => assert!(
            f.to_string().contains(message),
            "{message:?} not in {:?}",
            f.to_string()
        ),
    }
}

#[test]
fn parses_imports_and_decls() {
    assert_parses(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
)

const (
    A = 1
    B int = 2
    C
)

var (
    x = 1
    y, z int
)

type (
    T = int
    U[T any] struct { F T }
    V interface {
        M(x int) int
        ~int | ~string
    }
    Pair[K comparable, V any] struct {
        Key K
        Val V
    }
)

func main() {
    fmt.Println(Sqrt(4))
}
"#,
    );
}

#[test]
fn parses_statements() {
    assert_parses(
        r#"
package p

func f(x int) int {
    if x < 0 { return -x }
    for i := 0; i < 10; i++ {
        if i == 5 { break }
        continue
    }
    for range []int{1,2,3} {
    }
    for k, v := range map[string]int{} {
        _, _ = k, v
    }
    switch x {
    case 0, 1:
        x++
        fallthrough
    default:
        x = 3
    }
    select {
    case ch <- x:
        return x
    case v, ok := <-ch:
        _, _ = v, ok
    default:
        return 0
    }
    go func() {}()
    defer close(ch)
outer:
    for {
        goto outer
    }
}
"#,
    );
}

#[test]
fn parses_expressions() {
    assert_parses(
        r#"
package p

func f(a, b, c int, ch chan<- int) {
    _ = a + b*c - (a<<2)
    _ = a == b || a < c && b <= c
    _ = &a
    _ = <-ch
    _ = []int{1,2,3}[0]
    _ = []int{1,2,3}[1:]
    _ = []int{1,2,3}[:2]
    _ = []int{1,2,3}[0:2:3]
    _ = map[string]int{"a":1, "b":2}["a"]
    _ = [...]string{0: "x", 2: "y"}
    _ = [][]int{{1}, {2, 3}}
    _ = f(a, b, c)
    _ = f(a, b, c...)
    _ = x.(fmt.Stringer)
    _ = Map[string, int]{}
    _ = struct{ X, Y int }{1, 2}
    _ = func(x int) (int, error) { return x, nil }
    _ = 1.5e3 + 2i + 'x' + 0x_FF
}
"#,
    );
}

#[test]
fn parses_methods_and_generics() {
    assert_parses(
        r#"
package p

// List is a linked list.
type List[T any] struct {
    next *List[T] // next element
    val  T
}

func (l *List[T]) Push(v T) *List[T] {
    return &List[T]{next: l, val: v}
}

func Map[S ~[]E, E, R any](s S, f func(E) R) []R {
    out := make([]R, 0, len(s))
    for _, v := range s {
        out = append(out, f(v))
    }
    return out
}

type Number interface {
    ~int | ~int64 | ~float64
}

type Arr [4]int

type Alias[T any] = List[T]

func external(int) string
"#,
    );
}

#[test]
fn composite_literals_in_headers_need_parens() {
    assert_parses(
        r#"
package p

func f(x T) {
    if x == (T{}) {
    }
    for _, v := range []T{{}} {
        _ = v
    }
    switch (T{}) {
    }
}
"#,
    );
}

#[test]
fn rejects_syntax_errors() {
    assert_rejects("package p\nfunc f() { x := }\n", "expected expression");
    assert_rejects("package p\nfunc f() { go x }\n", "must be function call");
    assert_rejects("package p\nfunc f(a, int) {}\nfunc g(a b, c) {}\n", "mixed named and unnamed");
    assert_rejects("package p\nvar x = \"unterminated\n", "bad.go:2:");
    assert_rejects("x := 1\n", "expected package");
}
