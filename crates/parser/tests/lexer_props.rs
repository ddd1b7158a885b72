use go125_syntax::lexer::{Lexer, Tok};
use proptest::prelude::*;

fn check_stream(s: &str, lx: Lexer<'_>) -> Result<(), TestCaseError> {
    // Max progress we have seen in the stream (end positions).
    let mut max_end = 0usize;
    // End position of the last real (non-injected) token.
    let mut last_real_end = 0usize;
    let max_steps = s.len().saturating_mul(4) + 64;

    for (steps, (start, tok, end)) in lx.enumerate() {
        prop_assert!(start <= end, "start>end: ({start},{end}) tok={tok:?} input={s:?}");
        prop_assert!(end <= s.len(), "end out of bounds: ({start},{end}) tok={tok:?} input={s:?}");

        let injected_semi = matches!(tok, Tok::Semi) && start == end;
        if injected_semi {
            prop_assert!(
                start >= last_real_end,
                "injected semi inside a token: pos={start} < {last_real_end} input={s:?}"
            );
        } else {
            prop_assert!(
                start >= last_real_end,
                "real token moved backwards: start={start} < {last_real_end} tok={tok:?} input={s:?}"
            );
            prop_assert!(end >= max_end, "end regressed: {end} < {max_end} input={s:?}");
            last_real_end = end;
        }
        max_end = max_end.max(end);

        prop_assert!(steps <= max_steps, "possible hang: {steps} steps, input={s:?}");
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn never_panics_and_progresses(s in ".*") {
        check_stream(&s, Lexer::new(&s))?;
        check_stream(&s, Lexer::with_comments(&s))?;
    }

    #[test]
    fn comments_only_add_comment_tokens(s in "[a-z0-9 +(){}\\n/*]{0,40}") {
        let plain: Vec<_> = Lexer::new(&s).collect();
        let with: Vec<_> = Lexer::with_comments(&s)
            .filter(|(_, t, _)| !matches!(t, Tok::Comment(_)))
            .collect();
        prop_assert_eq!(plain, with);
    }
}
