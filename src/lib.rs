//! # kotoba
//!
//! A tokenizer for a particle-driven Japanese programming language.
//!
//! Source text is read into chunks (words with trailing grammatical
//! particles, string literals, separators), matched against a fixed table of
//! statement grammars, and emitted as a flat token stream for a downstream
//! evaluator. See the [tokenizer module](kotoba::tokenizer) for the entry
//! point.

pub mod kotoba;

pub use kotoba::errors::Error;
pub use kotoba::tokenizer::Tokenizer;
pub use kotoba::tokens::{Token, TokenKind, TokenSub};
