//! Tokenizer errors
//!
//! All of these are fatal to the current tokenize attempt and carry the
//! 1-based source line. Speculative match failures inside the sequence
//! matcher are not errors; they are plain boolean results that never leave
//! the matcher.

use std::fmt;

/// A fatal tokenize error: what went wrong, and on which source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub line: usize,
}

impl Error {
    pub fn new(kind: ErrorKind, line: usize) -> Self {
        Error { kind, line }
    }
}

/// The closed catalog of failure kinds, each carrying the offending values.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    // Input shape
    UnexpectedInput(String),
    UnexpectedEol,
    UnexpectedEndOfInput,
    UnclosedString,
    UnclosedBlockComment,
    UnexpectedIndent(usize),

    // Statement placement
    UnexpectedElse,
    UnexpectedElseIf,
    UnexpectedBreak,
    UnexpectedNext,
    UnexpectedReturn,

    // Assignment
    AssignmentToReservedWord(String),
    AssignmentToValue(String),
    SelfReferentialAssignment(String),
    UndeclaredVariable(String),

    // Function definition
    FunctionDefNonVerbName(String),
    FunctionDefReservedName(String),
    FunctionDefDuplicateParameter(String),
    FunctionDefLiteralParameter(String),
    FunctionDefReservedParameter(String),
    FunctionAlreadyDeclared(String),
    AmbiguousConjugation(String, String),

    // Function call
    FunctionDoesNotExist(String),
    MissingParticle(String, String),
    WrongParticle(String, String),

    // Property access
    InvalidPropertyOwner(String),
    InvalidProperty(String, String),
    InvalidAttribute(String, String),

    // Loops
    InvalidLoopParameter(String),
    InvalidLoopParticle(String),
    MissingLoopIterator,

    // Return
    InvalidReturnParameter(String),

    // String interpolation
    InvalidInterpolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnexpectedInput(text) => write!(f, "Unexpected input: {}", text),
            ErrorKind::UnexpectedEol => write!(f, "Unexpected end of line"),
            ErrorKind::UnexpectedEndOfInput => write!(f, "Unexpected end of input"),
            ErrorKind::UnclosedString => write!(f, "Unclosed string"),
            ErrorKind::UnclosedBlockComment => write!(f, "Unclosed block comment"),
            ErrorKind::UnexpectedIndent(level) => {
                write!(f, "Unexpected indentation (level {})", level)
            }
            ErrorKind::UnexpectedElse => write!(f, "Else without a preceding if block"),
            ErrorKind::UnexpectedElseIf => write!(f, "Else-if without a preceding if block"),
            ErrorKind::UnexpectedBreak => write!(f, "Break outside of a loop"),
            ErrorKind::UnexpectedNext => write!(f, "Next outside of a loop"),
            ErrorKind::UnexpectedReturn => write!(f, "Return outside of a function"),
            ErrorKind::AssignmentToReservedWord(name) => {
                write!(f, "Cannot assign to reserved word: {}", name)
            }
            ErrorKind::AssignmentToValue(name) => write!(f, "Cannot assign to a value: {}", name),
            ErrorKind::SelfReferentialAssignment(name) => {
                write!(f, "Variable refers to itself in its own declaration: {}", name)
            }
            ErrorKind::UndeclaredVariable(name) => write!(f, "Undeclared variable: {}", name),
            ErrorKind::FunctionDefNonVerbName(name) => {
                write!(f, "Function name is not verb-shaped: {}", name)
            }
            ErrorKind::FunctionDefReservedName(name) => {
                write!(f, "Function name is reserved: {}", name)
            }
            ErrorKind::FunctionDefDuplicateParameter(name) => {
                write!(f, "Duplicate function parameter: {}", name)
            }
            ErrorKind::FunctionDefLiteralParameter(name) => {
                write!(f, "Function parameter cannot be a literal: {}", name)
            }
            ErrorKind::FunctionDefReservedParameter(name) => {
                write!(f, "Function parameter is reserved: {}", name)
            }
            ErrorKind::FunctionAlreadyDeclared(name) => {
                write!(f, "Function already declared: {}", name)
            }
            ErrorKind::AmbiguousConjugation(first, second) => write!(
                f,
                "Functions {} and {} share a conjugated form and cannot be told apart",
                first, second
            ),
            ErrorKind::FunctionDoesNotExist(name) => {
                write!(f, "Function does not exist: {}", name)
            }
            ErrorKind::MissingParticle(name, particle) => {
                write!(f, "Call to {} is missing the particle {}", name, particle)
            }
            ErrorKind::WrongParticle(name, particle) => {
                write!(f, "Call to {} does not take the particle {}", name, particle)
            }
            ErrorKind::InvalidPropertyOwner(name) => {
                write!(f, "Invalid property owner: {}", name)
            }
            ErrorKind::InvalidProperty(owner, property) => {
                write!(f, "Invalid property for {}: {}", owner, property)
            }
            ErrorKind::InvalidAttribute(owner, attribute) => {
                write!(f, "Invalid attribute for {}: {}", owner, attribute)
            }
            ErrorKind::InvalidLoopParameter(name) => {
                write!(f, "Invalid loop parameter: {}", name)
            }
            ErrorKind::InvalidLoopParticle(particle) => {
                write!(f, "Invalid loop particle: {}", particle)
            }
            ErrorKind::MissingLoopIterator => write!(f, "Loop iterator is missing its subject"),
            ErrorKind::InvalidReturnParameter(name) => {
                write!(f, "Invalid return parameter: {}", name)
            }
            ErrorKind::InvalidInterpolation(text) => {
                write!(f, "Cannot interpolate: {}", text)
            }
        }
    }
}

impl std::error::Error for Error {}
