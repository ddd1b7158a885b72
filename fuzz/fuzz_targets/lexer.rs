// fuzz_targets/lexer.rs
#![no_main]

use go125_syntax::lexer::{Lexer, Tok};
use libfuzzer_sys::fuzz_target;

fn check(s: &str, lx: Lexer<'_>) {
    let mut max_end = 0usize;
    let mut last_real_end = 0usize;
    let max_steps = s.len().saturating_mul(4) + 64;

    for (steps, (start, tok, end)) in lx.enumerate() {
        assert!(start <= end);
        assert!(end <= s.len());

        let injected = matches!(tok, Tok::Semi) && start == end;
        assert!(start >= last_real_end);
        if !injected {
            assert!(end >= max_end);
            last_real_end = end;
        }
        max_end = max_end.max(end);

        assert!(steps <= max_steps);
    }
}

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    check(&s, Lexer::new(&s));
    check(&s, Lexer::with_comments(&s));
});
