//! Main module for the kotoba tokenizer
//!
//! The pipeline, leaf-first:
//! - [reading]: characters → chunks (words with particles, strings, separators)
//! - [conjugator]: pure verb-inflection rules
//! - [scope] / [context]: live state the grammar consults while matching
//! - [grammar]: the fixed, ordered table of statement shapes
//! - [tokenizer]: the backtracking sequence matcher that emits tokens

pub mod builders;
pub mod classifiers;
pub mod conjugator;
pub mod context;
pub mod errors;
pub mod grammar;
pub mod processor;
pub mod reading;
pub mod scope;
pub mod testing;
pub mod tokenizer;
pub mod tokens;
pub mod words;
