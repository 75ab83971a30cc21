//! Test support
//!
//! Small helpers for driving the tokenizer to completion and asserting on
//! the emitted kind stream. Used by the crate's own tests; panicking on
//! error is the point.

use crate::kotoba::errors::Error;
use crate::kotoba::tokenizer::Tokenizer;
use crate::kotoba::tokens::{Token, TokenKind};

/// Tokenize a complete source, panicking on any error.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        match tokenizer.next_token() {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => return tokens,
            Err(error) => panic!("tokenize failed on {:?}: {}", source, error),
        }
    }
}

/// Tokenize a source expected to fail, returning the error.
pub fn tokenize_err(source: &str) -> Error {
    let mut tokenizer = Tokenizer::new(source);
    loop {
        match tokenizer.next_token() {
            Ok(Some(_)) => {}
            Ok(None) => panic!("expected an error tokenizing {:?}", source),
            Err(error) => return error,
        }
    }
}

/// Project a token stream onto its kinds.
pub fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

/// Assert the full kind stream of a source.
pub fn assert_kinds(source: &str, expected: &[TokenKind]) {
    let tokens = tokenize(source);
    assert_eq!(
        kinds(&tokens),
        expected.to_vec(),
        "kind stream mismatch for {:?}\ntokens: {:?}",
        source,
        tokens
    );
}
