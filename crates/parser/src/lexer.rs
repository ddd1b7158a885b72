use crate::error::{Diag, LexError, LexErrorKind};
use logos::{Lexer as LogosLexer, Logos};
use std::ops::Range;

// =============================================================================
// 0. Shared helpers
// =============================================================================

#[inline(always)]
pub const fn is_dec_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline(always)]
pub const fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline(always)]
const fn hex_value(b: u8) -> u32 {
    match b {
        b'0'..=b'9' => (b - b'0') as u32,
        b'a'..=b'f' => (b - b'a' + 10) as u32,
        b'A'..=b'F' => (b - b'A' + 10) as u32,
        _ => 0,
    }
}

#[inline(always)]
pub const fn is_valid_unicode_scalar(x: u32) -> bool {
    x <= 0x10_FFFF && !(x >= 0xD800 && x <= 0xDFFF)
}

/// Whether the text starting at a comment runs to the end of its line: only
/// blanks and further comments follow before the next newline (or EOF), or a
/// general comment on the way spans a newline itself.
fn comment_reaches_line_end(rest: &[u8]) -> bool {
    let mut i = 0;
    loop {
        while matches!(rest.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        match (rest.get(i), rest.get(i + 1)) {
            (None, _) | (Some(b'\n' | b'\r'), _) | (Some(b'/'), Some(b'/')) => return true,
            (Some(b'/'), Some(b'*')) => {
                let body = &rest[i + 2..];
                let Some(end) = memchr::memmem::find(body, b"*/") else {
                    return true;
                };
                if memchr::memchr2(b'\n', b'\r', &body[..end]).is_some() {
                    return true;
                }
                i += 2 + end + 2;
            }
            _ => return false,
        }
    }
}

// =============================================================================
// 1. Comment scanners
// =============================================================================

#[inline]
fn lex_line_comment(lex: &mut LogosLexer<'_, RawTok>) {
    let rem = lex.remainder().as_bytes();
    let end = memchr::memchr2(b'\n', b'\r', rem).unwrap_or(rem.len());
    lex.bump(end);
}

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    match memchr::memmem::find(rem, b"*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(rem.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

// =============================================================================
// 2. String and rune escapes (Go rules)
// =============================================================================

mod esc {
    use super::*;

    /// Validates one escape sequence starting right after the backslash and
    /// returns how many bytes it spans.
    fn escape_len(body: &[u8], quote: u8) -> Result<usize, LexErrorKind> {
        let first = *body.first().ok_or(LexErrorKind::InvalidEscape)?;
        let (digits, radix, max) = match first {
            b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => return Ok(1),
            c if c == quote => return Ok(1),
            b'0'..=b'7' => (3, 8, 255),
            b'x' => (2, 16, 255),
            b'u' => (4, 16, 0x10_FFFF),
            b'U' => (8, 16, 0x10_FFFF),
            _ => return Err(LexErrorKind::InvalidEscape),
        };
        let skip = usize::from(radix == 16);
        let digits_src = body
            .get(skip..skip + digits)
            .ok_or(LexErrorKind::InvalidEscape)?;

        let mut value = 0u32;
        for &d in digits_src {
            let ok = if radix == 8 {
                (b'0'..=b'7').contains(&d)
            } else {
                is_hex_digit(d)
            };
            if !ok {
                return Err(LexErrorKind::InvalidEscape);
            }
            value = value * radix + hex_value(d);
        }
        if value > max || (max > 255 && !is_valid_unicode_scalar(value)) {
            return Err(LexErrorKind::InvalidEscape);
        }
        Ok(skip + digits)
    }

    /// Validates every escape in `body` and returns the number of characters
    /// (each escape counts as one).
    pub fn validate_body(body: &str, quote: u8) -> Result<usize, LexErrorKind> {
        let bytes = body.as_bytes();
        let mut i = 0;
        let mut count = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                i += 1 + escape_len(&bytes[i + 1..], quote)?;
            } else {
                i += body[i..].chars().next().map_or(1, char::len_utf8);
            }
            count += 1;
        }
        Ok(count)
    }

    pub fn validate_interpreted_string(
        lex: &mut LogosLexer<'_, super::RawTok>,
    ) -> Result<(), LexErrorKind> {
        let s = lex.slice();
        match s.len() {
            0 | 1 => Err(LexErrorKind::InvalidToken),
            n => validate_body(&s[1..n - 1], b'"').map(|_| ()),
        }
    }

    pub fn validate_rune(lex: &mut LogosLexer<'_, super::RawTok>) -> Result<(), LexErrorKind> {
        let s = lex.slice();
        if s.len() < 3 {
            return Err(LexErrorKind::InvalidToken);
        }
        match validate_body(&s[1..s.len() - 1], b'\'')? {
            1 => Ok(()),
            _ => Err(LexErrorKind::InvalidToken),
        }
    }
}

// =============================================================================
// 3. Numbers: maximal munch + validation
// =============================================================================

pub(crate) mod num {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum NumKind {
        Int,
        Float,
        Imag,
    }

    struct Digits {
        seen_digit: bool,
        seen_sep: bool,
        /// First digit not valid in the literal's base (ints only)
        invalid: bool,
    }

    fn digits(src: &[u8], mut i: usize, base: u32, d: &mut Digits) -> usize {
        while let Some(&b) = src.get(i) {
            let value = match b {
                b'_' => {
                    d.seen_sep = true;
                    i += 1;
                    continue;
                }
                b'0'..=b'9' => (b - b'0') as u32,
                b'a'..=b'f' | b'A'..=b'F' if base == 16 => hex_value(b),
                _ => break,
            };
            if value >= base {
                d.invalid = true;
            }
            d.seen_digit = true;
            i += 1;
        }
        i
    }

    /// `'_'` must sit between two digits (a base prefix counts as a digit).
    fn separators_ok(lit: &[u8]) -> bool {
        let hex = lit.len() >= 2 && lit[0] == b'0' && (lit[1] | 0x20) == b'x';
        let mut i = 0;
        // '0' = digit, '_' = separator, '.' = anything else
        let mut prev = b'.';
        if lit.len() >= 2 && lit[0] == b'0' && matches!(lit[1] | 0x20, b'x' | b'o' | b'b') {
            prev = b'0';
            i = 2;
        }
        for &c in &lit[i..] {
            let class = match c {
                b'_' => b'_',
                c if is_dec_digit(c) || (hex && is_hex_digit(c)) => b'0',
                _ => b'.',
            };
            if (class == b'_' && prev != b'0') || (class == b'.' && prev == b'_') {
                return false;
            }
            prev = class;
        }
        prev != b'_'
    }

    /// Scans the longest number at `src[start..]`, returning its end and kind.
    pub fn scan(src: &[u8], start: usize) -> (usize, Result<NumKind, LexErrorKind>) {
        let mut i = start;
        let mut base = 10;
        let mut prefix = 0u8;
        let mut kind = NumKind::Int;
        let mut ok = true;
        let mut d = Digits {
            seen_digit: false,
            seen_sep: false,
            invalid: false,
        };

        if src.get(i) != Some(&b'.') {
            if src.get(i) == Some(&b'0') {
                i += 1;
                match src.get(i).map(|b| b | 0x20) {
                    Some(b'x') => (base, prefix, i) = (16, b'x', i + 1),
                    Some(b'o') => (base, prefix, i) = (8, b'o', i + 1),
                    Some(b'b') => (base, prefix, i) = (2, b'b', i + 1),
                    _ => {
                        (base, prefix) = (8, b'0');
                        d.seen_digit = true;
                    }
                }
            }
            i = digits(src, i, base, &mut d);
        }

        if src.get(i) == Some(&b'.') {
            kind = NumKind::Float;
            ok &= prefix != b'o' && prefix != b'b';
            i = digits(src, i + 1, base, &mut d);
        }
        ok &= d.seen_digit;

        match src.get(i).map(|b| b | 0x20) {
            Some(e @ (b'e' | b'p')) => {
                ok &= if e == b'e' {
                    prefix == 0 || prefix == b'0'
                } else {
                    prefix == b'x'
                };
                i += 1;
                kind = NumKind::Float;
                if matches!(src.get(i), Some(b'+' | b'-')) {
                    i += 1;
                }
                let mut exp = Digits {
                    seen_digit: false,
                    seen_sep: false,
                    invalid: false,
                };
                i = digits(src, i, 10, &mut exp);
                ok &= exp.seen_digit;
                d.seen_sep |= exp.seen_sep;
            }
            _ => ok &= !(prefix == b'x' && kind == NumKind::Float),
        }

        if src.get(i) == Some(&b'i') {
            kind = NumKind::Imag;
            i += 1;
        }

        // Legacy octal digits 8/9 are fine in floats and imaginaries.
        if kind == NumKind::Int && d.invalid {
            ok = false;
        }
        if d.seen_sep && !separators_ok(&src[start..i]) {
            ok = false;
        }

        (i, if ok { Ok(kind) } else { Err(LexErrorKind::InvalidNumber) })
    }

    pub fn lex_number(lex: &mut LogosLexer<'_, super::RawTok>) -> Result<(), LexErrorKind> {
        let start = lex.span().start;
        let (end, res) = scan(lex.source().as_bytes(), start);
        let already = lex.span().end;
        if end > already {
            lex.bump(end - already);
        }
        res.map(|_| ())
    }
}

// =============================================================================
// 4. Token Definition (RawTok - DFA optimized for logos)
// =============================================================================

#[repr(u8)]
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[token("//", lex_line_comment)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    // Numbers (maximal munch in callback)
    #[regex(r"[0-9]|\.[0-9]", num::lex_number)] Number,

    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#, esc::validate_interpreted_string)] String,
    #[regex(r"'([^'\\\n\r]|\\.)+'", esc::validate_rune)] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

// =============================================================================
// 5. Lookup tables
// =============================================================================

macro_rules! gen_lookup_table {
    ($size:expr, $($variant:ident),* $(,)?) => {{
        let mut table = [false; $size];
        $(table[RawTok::$variant as usize] = true;)*
        table
    }};
}

const SEMI_INSERT_TABLE: [bool; 256] = gen_lookup_table!(
    256,
    Ident,
    Number,
    Rune,
    String,
    RawString,
    KwBreak,
    KwContinue,
    KwFallthrough,
    KwReturn,
    Inc,
    Dec,
    RParen,
    RBrack,
    RBrace,
);

impl RawTok {
    #[inline(always)]
    const fn can_insert_semicolon(self) -> bool {
        SEMI_INSERT_TABLE[self as usize]
    }

    #[inline]
    const fn to_token<'src>(self, slice: &'src str) -> Tok<'src> {
        macro_rules! simple_tok {
            ($($raw:ident => $tok:ident),* $(,)?) => {
                match self {
                    Self::Ident => Tok::Ident(slice),
                    Self::Rune => Tok::RuneLit(slice),
                    Self::String => Tok::StringLit(slice),
                    Self::RawString => Tok::RawStringLit(slice),
                    Self::LineComment | Self::BlockComment => Tok::Comment(slice),
                    $(Self::$raw => Tok::$tok,)*
                    // Number, Newline and Bom are handled by the wrapper.
                    _ => Tok::Error,
                }
            };
        }

        simple_tok! {
            KwBreak => KwBreak, KwCase => KwCase, KwChan => KwChan, KwConst => KwConst,
            KwContinue => KwContinue, KwDefault => KwDefault, KwDefer => KwDefer, KwElse => KwElse,
            KwFallthrough => KwFallthrough, KwFor => KwFor, KwFunc => KwFunc, KwGo => KwGo,
            KwGoto => KwGoto, KwIf => KwIf, KwImport => KwImport, KwInterface => KwInterface,
            KwMap => KwMap, KwPackage => KwPackage, KwRange => KwRange, KwReturn => KwReturn,
            KwSelect => KwSelect, KwStruct => KwStruct, KwSwitch => KwSwitch, KwType => KwType, KwVar => KwVar,

            Ellipsis => Ellipsis, ShlAssign => ShlAssign, ShrAssign => ShrAssign, AndNotAssign => AndNotAssign,
            AddAssign => AddAssign, SubAssign => SubAssign, MulAssign => MulAssign, DivAssign => DivAssign,
            ModAssign => ModAssign, AndAssign => AndAssign, OrAssign => OrAssign, XorAssign => XorAssign,
            Shl => Shl, Shr => Shr, AndNot => AndNot, LAnd => LAnd, LOr => LOr, EqEq => EqEq, NotEq => NotEq,
            Le => Le, Ge => Ge, Inc => Inc, Dec => Dec, Define => Define, Arrow => Arrow,
            Assign => Assign, Plus => Plus, Minus => Minus, Star => Star, Slash => Slash, Percent => Percent,
            Amp => Amp, Pipe => Pipe, Caret => Caret, Tilde => Tilde, Bang => Bang, Lt => Lt, Gt => Gt,

            LParen => LParen, RParen => RParen, LBrack => LBrack, RBrack => RBrack, LBrace => LBrace,
            RBrace => RBrace, Comma => Comma, Semi => Semi, Colon => Colon, Dot => Dot, Error => Error,
        }
    }
}

// =============================================================================
// 6. Public Token Definition (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),
    /// `//` or `/* */` comment, markers included. Only produced in comment mode.
    Comment(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / Delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    /// Explicit `;` (one byte wide) or one inserted at a line end (zero width)
    Semi,
    Colon,
    Dot,

    Error,
    /// End of input; never yielded by `Lexer`, appended by the parser.
    Eof,
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Tok::*;
        let text = match *self {
            Ident(s) => return write!(f, "identifier {s}"),
            IntLit(s) | FloatLit(s) | ImagLit(s) | RuneLit(s) | StringLit(s) | RawStringLit(s) => {
                return write!(f, "literal {s}")
            }
            Comment(_) => "comment",
            KwBreak => "break",
            KwCase => "case",
            KwChan => "chan",
            KwConst => "const",
            KwContinue => "continue",
            KwDefault => "default",
            KwDefer => "defer",
            KwElse => "else",
            KwFallthrough => "fallthrough",
            KwFor => "for",
            KwFunc => "func",
            KwGo => "go",
            KwGoto => "goto",
            KwIf => "if",
            KwImport => "import",
            KwInterface => "interface",
            KwMap => "map",
            KwPackage => "package",
            KwRange => "range",
            KwReturn => "return",
            KwSelect => "select",
            KwStruct => "struct",
            KwSwitch => "switch",
            KwType => "type",
            KwVar => "var",
            Ellipsis => "'...'",
            ShlAssign => "'<<='",
            ShrAssign => "'>>='",
            AndNotAssign => "'&^='",
            AddAssign => "'+='",
            SubAssign => "'-='",
            MulAssign => "'*='",
            DivAssign => "'/='",
            ModAssign => "'%='",
            AndAssign => "'&='",
            OrAssign => "'|='",
            XorAssign => "'^='",
            Shl => "'<<'",
            Shr => "'>>'",
            AndNot => "'&^'",
            LAnd => "'&&'",
            LOr => "'||'",
            EqEq => "'=='",
            NotEq => "'!='",
            Le => "'<='",
            Ge => "'>='",
            Inc => "'++'",
            Dec => "'--'",
            Define => "':='",
            Arrow => "'<-'",
            Assign => "'='",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Amp => "'&'",
            Pipe => "'|'",
            Caret => "'^'",
            Tilde => "'~'",
            Bang => "'!'",
            Lt => "'<'",
            Gt => "'>'",
            LParen => "'('",
            RParen => "')'",
            LBrack => "'['",
            RBrack => "']'",
            LBrace => "'{'",
            RBrace => "'}'",
            Comma => "','",
            Semi => "';'",
            Colon => "':'",
            Dot => "'.'",
            Error => "invalid token",
            Eof => "EOF",
        };
        f.write_str(text)
    }
}

// =============================================================================
// 7. Lexer wrapper: semicolon insertion + comments + diags
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<(usize, Tok<'src>, usize)>,
    diags: Vec<Diag>,
    last_can_insert_semi: bool,
    keep_comments: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    /// Token stream without comments.
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::with_capacity(16),
            last_can_insert_semi: false,
            keep_comments: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    /// Token stream that also yields `Tok::Comment`.
    pub fn with_comments(input: &'src str) -> Self {
        Self {
            keep_comments: true,
            ..Self::new(input)
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let sp = crate::error::Span::from_range(span);
        self.diags.push(LexError { kind, span: sp }.diag());
    }

    #[inline]
    fn semi_at(pos: usize) -> (usize, Tok<'src>, usize) {
        (pos, Tok::Semi, pos)
    }

    /// A comment that ends its line terminates the statement before it, so
    /// the inserted `;` precedes the comment.
    fn handle_comment(
        &mut self,
        span: Range<usize>,
        slice: &'src str,
    ) -> Option<(usize, Tok<'src>, usize)> {
        let comment = (span.start, Tok::Comment(slice), span.end);
        if self.last_can_insert_semi
            && comment_reaches_line_end(&self.logos.source().as_bytes()[span.start..])
        {
            self.last_can_insert_semi = false;
            if self.keep_comments {
                self.pending = Some(comment);
            }
            return Some(Self::semi_at(span.start));
        }
        self.keep_comments.then_some(comment)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }

            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                None => {
                    // Fall through to emit a trailing ';' on the next turn.
                    self.handle_eof();
                    continue;
                }

                Some(Err(kind)) => return self.handle_lex_error(kind),

                Some(Ok(raw)) => {
                    if let Some(item) = self.handle_raw_token(raw) {
                        return Some(item);
                    }
                }
            }
        }
    }
}

impl<'src> Lexer<'src> {
    #[inline]
    fn handle_eof(&mut self) {
        self.eof_done = true;
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.pending = Some(Self::semi_at(self.src_len));
        }
    }

    #[inline]
    fn handle_lex_error(&mut self, kind: LexErrorKind) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        self.push_lex_diag(kind, span.clone());
        self.last_can_insert_semi = false;
        Some((span.start, Tok::Error, span.end))
    }

    /// Returns `None` for trivia that produced nothing.
    #[inline]
    fn handle_raw_token(&mut self, raw: RawTok) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        let slice = self.logos.slice();

        match raw {
            RawTok::Bom if span.start == 0 => None,
            RawTok::Bom | RawTok::Error => {
                self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
                self.last_can_insert_semi = false;
                Some((span.start, Tok::Error, span.end))
            }
            RawTok::Newline => {
                if self.last_can_insert_semi {
                    self.last_can_insert_semi = false;
                    return Some(Self::semi_at(span.start));
                }
                None
            }
            RawTok::LineComment | RawTok::BlockComment => self.handle_comment(span, slice),
            RawTok::Number => Some(self.handle_number_token(span, slice)),
            _ => {
                self.last_can_insert_semi = raw.can_insert_semicolon();
                Some((span.start, raw.to_token(slice), span.end))
            }
        }
    }

    #[inline]
    fn handle_number_token(
        &mut self,
        span: Range<usize>,
        slice: &'src str,
    ) -> (usize, Tok<'src>, usize) {
        self.last_can_insert_semi = true;
        let tok = match num::scan(slice.as_bytes(), 0).1 {
            Ok(num::NumKind::Int) => Tok::IntLit(slice),
            Ok(num::NumKind::Float) => Tok::FloatLit(slice),
            Ok(num::NumKind::Imag) => Tok::ImagLit(slice),
            Err(kind) => {
                self.push_lex_diag(kind, span.clone());
                self.last_can_insert_semi = false;
                Tok::Error
            }
        };
        (span.start, tok, span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::num::{scan, NumKind};
    use super::*;

    fn kind(lit: &str) -> Result<NumKind, LexErrorKind> {
        let (end, res) = scan(lit.as_bytes(), 0);
        assert_eq!(end, lit.len(), "{lit} not fully munched");
        res
    }

    #[test]
    fn classifies_numbers() {
        assert_eq!(kind("42"), Ok(NumKind::Int));
        assert_eq!(kind("0x_1F"), Ok(NumKind::Int));
        assert_eq!(kind("0o17"), Ok(NumKind::Int));
        assert_eq!(kind("0b1010"), Ok(NumKind::Int));
        assert_eq!(kind("1_000_000"), Ok(NumKind::Int));
        assert_eq!(kind("3.14"), Ok(NumKind::Float));
        assert_eq!(kind(".5e-3"), Ok(NumKind::Float));
        assert_eq!(kind("0x1p-2"), Ok(NumKind::Float));
        assert_eq!(kind("09.5"), Ok(NumKind::Float));
        assert_eq!(kind("2i"), Ok(NumKind::Imag));
        assert_eq!(kind("1.5e3i"), Ok(NumKind::Imag));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(kind("09").is_err());
        assert!(kind("0b2").is_err());
        assert!(kind("0x").is_err());
        assert!(kind("0x1.5").is_err());
        assert!(kind("1__0").is_err());
        assert!(kind("1_").is_err());
        assert!(kind("1e").is_err());
        assert!(kind("0o1.2").is_err());
    }

    #[test]
    fn validates_escapes() {
        assert_eq!(esc::validate_body(r"a\n\x41é\U0001F600\101", b'"'), Ok(6));
        assert!(esc::validate_body(r"\q", b'"').is_err());
        assert!(esc::validate_body(r"\'", b'"').is_err());
        assert!(esc::validate_body(r"\400", b'"').is_err());
        assert!(esc::validate_body(r"\uD800", b'"').is_err());
        assert_eq!(esc::validate_body(r"\'", b'\''), Ok(1));
    }

    #[test]
    fn line_end_detection_sees_through_trailing_comments() {
        assert!(comment_reaches_line_end(b"// x\ny"));
        assert!(comment_reaches_line_end(b"/* a */ /* b */\n"));
        assert!(comment_reaches_line_end(b"/* a\n b */ x"));
        assert!(comment_reaches_line_end(b"/* a */"));
        assert!(!comment_reaches_line_end(b"/* a */ + y"));
    }
}
