//! Token classifiers
//!
//! One predicate per token kind, selected by an exhaustive match. A
//! predicate decides whether the chunk at the cursor can be this kind,
//! consulting the live scope and context where the surface form alone is
//! not enough; it never consumes input and never errors on a mismatch.
//! Kinds that are only ever synthesized by builders match nothing.

use crate::kotoba::errors::Error;
use crate::kotoba::reading::chunks::ChunkKind;
use crate::kotoba::tokenizer::Tokenizer;
use crate::kotoba::tokens::TokenKind;
use crate::kotoba::words;

impl Tokenizer<'_> {
    pub(crate) fn kind_matches(&mut self, kind: TokenKind) -> Result<bool, Error> {
        if kind == TokenKind::Eol {
            return Ok(match self.current_chunk()? {
                None => true,
                Some(chunk) => chunk.is_newline(),
            });
        }

        let Some(chunk) = self.current_chunk()? else {
            return Ok(false);
        };
        let word = chunk.kind == ChunkKind::Word;
        let text = chunk.text.as_str();

        Ok(match kind {
            TokenKind::NoOp => word && words::NO_OP_WORDS.contains(&text),
            TokenKind::Debug => word && text == words::DEBUG_WORD,
            TokenKind::Break => word && text == words::BREAK_WORD,
            TokenKind::Next => word && text == words::NEXT_WORD,
            TokenKind::If => word && text == words::IF_WORD,
            TokenKind::ElseIf => word && words::ELSE_IF_WORDS.contains(&text),
            TokenKind::Else => word && words::ELSE_WORDS.contains(&text),
            TokenKind::Try => word && words::TRY_WORDS.iter().any(|w| w == text),
            TokenKind::Return => word && words::RETURN_WORDS.iter().any(|w| w == text),
            TokenKind::Loop => word && words::LOOP_WORDS.iter().any(|w| w == text),
            TokenKind::LoopIterator => word && text == words::ITERATOR_WORD,

            TokenKind::Parameter => self.phrase_at(words::FUNCTION_PARTICLES)?.is_some(),
            TokenKind::Assignment => self.phrase_at(&[words::ASSIGNMENT_PARTICLE])?.is_some(),
            TokenKind::Possessive => self.phrase_at(&[words::POSSESSIVE_PARTICLE])?.is_some(),

            TokenKind::Comp1 => self.phrase_at(&[words::SUBJECT_PARTICLE])?.is_some(),
            TokenKind::Comp2To => self.phrase_at(&["と"])?.is_some(),
            TokenKind::Comp2Yori => self.phrase_at(&["より"])?.is_some(),
            TokenKind::Comp2Bound => {
                word
                    && [words::BOUND_UPPER_SUFFIX, words::BOUND_LOWER_SUFFIX]
                        .iter()
                        .any(|suffix| {
                            text.strip_suffix(suffix)
                                .is_some_and(|stem| !stem.is_empty())
                        })
            }
            TokenKind::CompEq => word && self.comparator_surface(words::COMP_EQ_IF, words::COMP_EQ_WHILE, text),
            TokenKind::CompSize => {
                word && self.comparator_surface(words::COMP_SIZE_IF, words::COMP_SIZE_WHILE, text)
            }
            TokenKind::CompBe => word && self.comparator_surface(words::COMP_BE_IF, words::COMP_BE_WHILE, text),
            TokenKind::CompExists => {
                word && self.comparator_surface(words::COMP_EXISTS_IF, words::COMP_EXISTS_WHILE, text)
            }

            TokenKind::Property => {
                let stem = match self.phrase_at(words::FUNCTION_PARTICLES)? {
                    Some(phrase) if !phrase.is_string => phrase.stem,
                    Some(_) => return Ok(false),
                    None if word => text.to_string(),
                    None => return Ok(false),
                };
                words::property_sub(&stem).is_some()
            }
            TokenKind::Attribute => {
                // anything a value or variable could name; the builder
                // validates against the owner
                word || chunk.is_string()
            }

            TokenKind::FunctionDef => word
                && text
                    .strip_suffix("とは")
                    .is_some_and(|stem| !stem.is_empty()),
            TokenKind::FunctionCall => word && self.scope.has_function_named(text),

            TokenKind::Variable => {
                if chunk.is_string() {
                    true
                } else if !word {
                    false
                } else if words::value_sub(text).is_some() || self.scope.has_variable(text) {
                    true
                } else {
                    // an undeclared bare word is still matched (the builder
                    // reports it) unless a particle suffix suggests the
                    // chunk plays some other role
                    let split = {
                        let particles: Vec<&str> = words::ALL_PARTICLES.to_vec();
                        chunk.split_particle(&particles).is_some()
                    };
                    !split
                }
            }

            TokenKind::Comma => chunk.kind == ChunkKind::Comma,
            TokenKind::Bang => chunk.kind == ChunkKind::Bang,
            TokenKind::Question => chunk.kind == ChunkKind::Question,

            // synthesized kinds are never matched as grammar terms
            _ => false,
        })
    }

    /// Pick the comparator surface set for the current construct: the
    /// conditional forms inside an if/else-if condition, the continuative
    /// forms otherwise (a while condition has no leading keyword).
    fn comparator_surface(&self, if_forms: &[&str], while_forms: &[&str], text: &str) -> bool {
        if self.context.inside_if_condition {
            if_forms.contains(&text)
        } else {
            while_forms.contains(&text)
        }
    }
}
