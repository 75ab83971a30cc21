//! Declarative statement grammar
//!
//! The grammar is data, not code: a fixed, ordered table of named
//! sequences, one per legal statement shape. Tokenizing a line means
//! finding the first sequence, in table order, whose terms match the chunk
//! stream completely through its end-of-line term, so table order is the
//! priority among statement shapes with similar prefixes.
//!
//! A term is a single token-kind match, a branch over ordered alternatives,
//! or a nested sub-sequence, each with a repetition bound pair. The matcher
//! in [crate::kotoba::tokenizer] is a plain recursive function over this
//! tree.

use once_cell::sync::Lazy;

use crate::kotoba::tokens::TokenKind;

/// Unbounded repetition.
pub const MANY: u8 = u8::MAX;

#[derive(Debug, Clone)]
pub enum TermBody {
    /// Match one token of this kind via its classifier, then run its
    /// builder.
    Kind(TokenKind),
    /// Ordered alternatives; the first whose entire continuation succeeds
    /// wins.
    Branch(Vec<Vec<Term>>),
    /// Nested sequence sharing the same chunk cursor.
    Sub(Vec<Term>),
}

#[derive(Debug, Clone)]
pub struct Term {
    pub body: TermBody,
    pub min: u8,
    pub max: u8,
}

impl Term {
    pub fn min(&self) -> usize {
        self.min as usize
    }

    pub fn max(&self) -> usize {
        self.max as usize
    }
}

/// A named statement shape.
#[derive(Debug, Clone)]
pub struct Sequence {
    pub name: &'static str,
    pub terms: Vec<Term>,
}

fn one(kind: TokenKind) -> Term {
    Term {
        body: TermBody::Kind(kind),
        min: 1,
        max: 1,
    }
}

fn opt(kind: TokenKind) -> Term {
    Term {
        body: TermBody::Kind(kind),
        min: 0,
        max: 1,
    }
}

fn sub(min: u8, max: u8, terms: Vec<Term>) -> Term {
    Term {
        body: TermBody::Sub(terms),
        min,
        max,
    }
}

fn branch(min: u8, max: u8, alternatives: Vec<Vec<Term>>) -> Term {
    Term {
        body: TermBody::Branch(alternatives),
        min,
        max,
    }
}

/// A comparison: subject, then one of the operand/comparator surfaces.
///
/// The comparator builders rewrite the accumulated stack, so the emitted
/// tokens are comparator-first regardless of the source order here.
fn condition() -> Term {
    sub(
        1,
        1,
        vec![
            one(TokenKind::Comp1),
            branch(
                1,
                1,
                vec![
                    vec![one(TokenKind::Comp2To), one(TokenKind::CompEq)],
                    vec![one(TokenKind::Comp2Yori), one(TokenKind::CompSize)],
                    vec![one(TokenKind::Comp2Bound), one(TokenKind::CompBe)],
                    vec![one(TokenKind::CompExists)],
                ],
            ),
        ],
    )
}

/// A possessed phrase: owner plus named property or attribute key.
fn possessed() -> Vec<Term> {
    vec![
        one(TokenKind::Possessive),
        branch(
            1,
            1,
            vec![vec![one(TokenKind::Property)], vec![one(TokenKind::Attribute)]],
        ),
    ]
}

/// The grammar table. Order is priority: a sequence earlier in the table
/// wins only by matching the whole line, so later sequences still get
/// their chance when an earlier one matches a bare prefix.
pub static GRAMMAR: Lazy<Vec<Sequence>> = Lazy::new(|| {
    vec![
        Sequence {
            name: "no_op",
            terms: vec![one(TokenKind::NoOp), one(TokenKind::Eol)],
        },
        Sequence {
            name: "debug",
            terms: vec![one(TokenKind::Debug), opt(TokenKind::Bang), one(TokenKind::Eol)],
        },
        Sequence {
            name: "break",
            terms: vec![one(TokenKind::Break), one(TokenKind::Eol)],
        },
        Sequence {
            name: "next",
            terms: vec![one(TokenKind::Next), one(TokenKind::Eol)],
        },
        Sequence {
            name: "return",
            terms: vec![
                opt(TokenKind::Parameter),
                one(TokenKind::Return),
                one(TokenKind::Eol),
            ],
        },
        Sequence {
            name: "if",
            terms: vec![one(TokenKind::If), condition(), one(TokenKind::Eol)],
        },
        Sequence {
            name: "else_if",
            terms: vec![one(TokenKind::ElseIf), condition(), one(TokenKind::Eol)],
        },
        Sequence {
            name: "else",
            terms: vec![one(TokenKind::Else), one(TokenKind::Eol)],
        },
        Sequence {
            name: "while",
            terms: vec![condition(), one(TokenKind::Loop), one(TokenKind::Eol)],
        },
        Sequence {
            name: "loop_iterator",
            terms: vec![
                opt(TokenKind::Parameter),
                one(TokenKind::LoopIterator),
                one(TokenKind::Loop),
                one(TokenKind::Eol),
            ],
        },
        Sequence {
            name: "loop",
            terms: vec![
                opt(TokenKind::Parameter),
                opt(TokenKind::Parameter),
                one(TokenKind::Loop),
                one(TokenKind::Eol),
            ],
        },
        Sequence {
            name: "try",
            terms: vec![one(TokenKind::Try), one(TokenKind::Eol)],
        },
        Sequence {
            name: "function_def",
            terms: vec![
                Term {
                    body: TermBody::Kind(TokenKind::Parameter),
                    min: 0,
                    max: MANY,
                },
                one(TokenKind::FunctionDef),
                one(TokenKind::Eol),
            ],
        },
        Sequence {
            name: "assignment",
            terms: vec![
                one(TokenKind::Assignment),
                branch(
                    1,
                    1,
                    vec![
                        // array literal: value (comma value)+
                        vec![
                            one(TokenKind::Variable),
                            sub(
                                1,
                                MANY,
                                vec![one(TokenKind::Comma), one(TokenKind::Variable)],
                            ),
                        ],
                        possessed(),
                        vec![one(TokenKind::Variable)],
                    ],
                ),
                one(TokenKind::Eol),
            ],
        },
        Sequence {
            name: "function_call",
            terms: vec![
                branch(
                    0,
                    MANY,
                    vec![possessed(), vec![one(TokenKind::Parameter)]],
                ),
                one(TokenKind::FunctionCall),
                branch(
                    0,
                    1,
                    vec![vec![one(TokenKind::Bang)], vec![one(TokenKind::Question)]],
                ),
                one(TokenKind::Eol),
            ],
        },
    ]
});

/// The grammar table, forced.
pub fn table() -> &'static [Sequence] {
    &GRAMMAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_is_priority() {
        let names: Vec<&str> = table().iter().map(|s| s.name).collect();
        // assignment must come before function_call, and all keyword
        // statements before both
        let assignment = names.iter().position(|n| *n == "assignment").unwrap();
        let call = names.iter().position(|n| *n == "function_call").unwrap();
        let if_statement = names.iter().position(|n| *n == "if").unwrap();
        assert!(if_statement < assignment);
        assert!(assignment < call);
    }

    #[test]
    fn test_every_sequence_ends_with_eol() {
        for sequence in table() {
            let last = sequence.terms.last().unwrap();
            match &last.body {
                TermBody::Kind(kind) => assert_eq!(
                    *kind,
                    TokenKind::Eol,
                    "sequence {} must end at end of line",
                    sequence.name
                ),
                _ => panic!("sequence {} must end with a plain EOL term", sequence.name),
            }
        }
    }

    #[test]
    fn test_repetition_bounds_are_sane() {
        fn check(terms: &[Term]) {
            for term in terms {
                assert!(term.min() <= term.max());
                match &term.body {
                    TermBody::Kind(_) => {}
                    TermBody::Sub(inner) => check(inner),
                    TermBody::Branch(alternatives) => {
                        for alternative in alternatives {
                            check(alternative);
                        }
                    }
                }
            }
        }
        for sequence in table() {
            check(&sequence.terms);
        }
    }
}
