//! Property-based tests for the tokenizer
//!
//! These pin down the structural guarantees: peeking never advances the
//! reader, scope tokens stay balanced for any well-indented program, and
//! quote closure follows escape parity.

use proptest::prelude::*;

use kotoba::kotoba::reading::Reader;
use kotoba::kotoba::testing::tokenize;
use kotoba::TokenKind as K;

/// Render a random walk of statements and single-level scope openings into
/// a well-indented source that returns to level zero at end of input.
fn render_program(operations: &[u8]) -> String {
    let mut source = String::new();
    let mut depth = 0usize;
    for operation in operations {
        match operation % 3 {
            0 => {
                source.push_str(&"　".repeat(depth));
                source.push_str("・・・\n");
            }
            1 => {
                source.push_str(&"　".repeat(depth));
                source.push_str("もし 1が 1と 等しければ\n");
                depth += 1;
            }
            _ => {
                depth = depth.saturating_sub(1);
            }
        }
    }
    source
}

proptest! {
    #[test]
    fn peek_is_idempotent_and_never_advances(source in "[あ-ん0-9a-z 　]{0,40}") {
        let mut reader = Reader::new(&source);
        let first = reader.peek_next_chunk(false).unwrap().cloned();
        let second = reader.peek_next_chunk(false).unwrap().cloned();
        prop_assert_eq!(&first, &second);

        let consumed = reader.next_chunk().unwrap();
        prop_assert_eq!(consumed, first);
    }

    #[test]
    fn scope_tokens_stay_balanced(operations in proptest::collection::vec(0u8..=2, 0..40)) {
        let source = render_program(&operations);
        let tokens = tokenize(&source);

        let begins = tokens.iter().filter(|t| t.kind == K::ScopeBegin).count();
        let closes = tokens.iter().filter(|t| t.kind == K::ScopeClose).count();
        prop_assert_eq!(begins, closes);

        // depth never goes negative while draining
        let mut depth = 0isize;
        for token in &tokens {
            match token.kind {
                K::ScopeBegin => depth += 1,
                K::ScopeClose => {
                    depth -= 1;
                    prop_assert!(depth >= 0);
                }
                _ => {}
            }
        }
        prop_assert_eq!(depth, 0);
    }

    #[test]
    fn quote_closure_follows_escape_parity(escapes in 0usize..8) {
        let source = format!("「a{}」b」", "\\".repeat(escapes));
        let mut reader = Reader::new(&source);
        let chunk = reader.next_chunk().unwrap().unwrap();

        if escapes % 2 == 1 {
            prop_assert!(chunk.text.ends_with("b」"));
        } else {
            prop_assert!(!chunk.text.contains('b'));
        }
    }

    #[test]
    fn number_assignments_always_tokenize(value in -9999i64..9999) {
        let tokens = tokenize(&format!("ほげは {}\n", value));
        prop_assert_eq!(tokens.len(), 3);
        prop_assert_eq!(tokens[1].text.clone(), value.to_string());
    }
}
