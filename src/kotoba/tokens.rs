//! Token types emitted by the tokenizer
//!
//! A token is the unit the downstream evaluator walks: a kind from a closed
//! enumeration, the source text it was built from, an optional subtype
//! refining the kind (what sort of value, which property), and the
//! grammatical particle that marked the chunk's role, when one was present.

use std::fmt;

/// The closed set of token kinds.
///
/// Kinds fall into three groups:
/// - statement/structure kinds that appear in the output stream,
/// - comparison operand/operator kinds (`Comp1`/`Comp2` are placeholder
///   kinds rewritten to `Variable` once the comparator is known),
/// - matcher-only kinds (`Comp2To`, `CompSize`, ...) referenced by grammar
///   terms to select a surface form; their builders emit the resolved kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TokenKind {
    Assignment,
    Variable,
    Parameter,
    FunctionDef,
    FunctionCall,
    Return,
    If,
    ElseIf,
    Else,
    While,
    Loop,
    LoopIterator,
    Try,
    Break,
    Next,
    NoOp,
    Debug,
    ScopeBegin,
    ScopeClose,
    ArrayBegin,
    ArrayClose,
    Comma,
    Possessive,
    Property,
    Attribute,
    Bang,
    Question,
    Eol,

    // Comparison operands (placeholders until the comparator resolves them)
    Comp1,
    Comp2,

    // Resolved comparators
    CompEq,
    CompNeq,
    CompGt,
    CompLt,
    CompGtEq,
    CompLtEq,
    CompEmp,
    CompNemp,

    // Matcher-only surface kinds
    Comp2To,
    Comp2Yori,
    Comp2Bound,
    CompSize,
    CompBe,
    CompExists,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Assignment => "ASSIGNMENT",
            TokenKind::Variable => "VARIABLE",
            TokenKind::Parameter => "PARAMETER",
            TokenKind::FunctionDef => "FUNCTION_DEF",
            TokenKind::FunctionCall => "FUNCTION_CALL",
            TokenKind::Return => "RETURN",
            TokenKind::If => "IF",
            TokenKind::ElseIf => "ELSE_IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Loop => "LOOP",
            TokenKind::LoopIterator => "LOOP_ITERATOR",
            TokenKind::Try => "TRY",
            TokenKind::Break => "BREAK",
            TokenKind::Next => "NEXT",
            TokenKind::NoOp => "NO_OP",
            TokenKind::Debug => "DEBUG",
            TokenKind::ScopeBegin => "SCOPE_BEGIN",
            TokenKind::ScopeClose => "SCOPE_CLOSE",
            TokenKind::ArrayBegin => "ARRAY_BEGIN",
            TokenKind::ArrayClose => "ARRAY_CLOSE",
            TokenKind::Comma => "COMMA",
            TokenKind::Possessive => "POSSESSIVE",
            TokenKind::Property => "PROPERTY",
            TokenKind::Attribute => "ATTRIBUTE",
            TokenKind::Bang => "BANG",
            TokenKind::Question => "QUESTION",
            TokenKind::Eol => "EOL",
            TokenKind::Comp1 => "COMP_1",
            TokenKind::Comp2 => "COMP_2",
            TokenKind::CompEq => "COMP_EQ",
            TokenKind::CompNeq => "COMP_NEQ",
            TokenKind::CompGt => "COMP_GT",
            TokenKind::CompLt => "COMP_LT",
            TokenKind::CompGtEq => "COMP_GTEQ",
            TokenKind::CompLtEq => "COMP_LTEQ",
            TokenKind::CompEmp => "COMP_EMP",
            TokenKind::CompNemp => "COMP_NEMP",
            TokenKind::Comp2To => "COMP_2_TO",
            TokenKind::Comp2Yori => "COMP_2_YORI",
            TokenKind::Comp2Bound => "COMP_2_BOUND",
            TokenKind::CompSize => "COMP_SIZE",
            TokenKind::CompBe => "COMP_BE",
            TokenKind::CompExists => "COMP_EXISTS",
        };
        write!(f, "{}", name)
    }
}

impl TokenKind {
    /// True for kinds that terminate a statement line in the output stream.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Eol | TokenKind::ScopeBegin | TokenKind::NoOp
        )
    }

    /// True for the resolved comparator kinds.
    pub fn is_comparator(&self) -> bool {
        matches!(
            self,
            TokenKind::CompEq
                | TokenKind::CompNeq
                | TokenKind::CompGt
                | TokenKind::CompLt
                | TokenKind::CompGtEq
                | TokenKind::CompLtEq
                | TokenKind::CompEmp
                | TokenKind::CompNemp
        )
    }

    /// True for kinds that open a new scope when their line completes.
    pub fn opens_scope(&self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::ElseIf
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Loop
                | TokenKind::Try
                | TokenKind::FunctionDef
        )
    }
}

/// Subtype refining a token's kind: what sort of value a VARIABLE or
/// PARAMETER holds, which named property a PROPERTY is, how an ATTRIBUTE
/// key should be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TokenSub {
    ValNum,
    ValStr,
    ValTrue,
    ValFalse,
    ValNull,
    ValArray,
    ValSore,
    ValVar,
    PropLen,
    PropKeys,
    PropFirst,
    PropLast,
    PropButFirst,
    PropButLast,
    KeyIndex,
    KeyName,
    KeyVar,
}

impl fmt::Display for TokenSub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenSub::ValNum => "VAL_NUM",
            TokenSub::ValStr => "VAL_STR",
            TokenSub::ValTrue => "VAL_TRUE",
            TokenSub::ValFalse => "VAL_FALSE",
            TokenSub::ValNull => "VAL_NULL",
            TokenSub::ValArray => "VAL_ARRAY",
            TokenSub::ValSore => "VAL_SORE",
            TokenSub::ValVar => "VAL_VAR",
            TokenSub::PropLen => "PROP_LEN",
            TokenSub::PropKeys => "PROP_KEYS",
            TokenSub::PropFirst => "PROP_FIRST",
            TokenSub::PropLast => "PROP_LAST",
            TokenSub::PropButFirst => "PROP_BUT_FIRST",
            TokenSub::PropButLast => "PROP_BUT_LAST",
            TokenSub::KeyIndex => "KEY_INDEX",
            TokenSub::KeyName => "KEY_NAME",
            TokenSub::KeyVar => "KEY_VAR",
        };
        write!(f, "{}", name)
    }
}

/// One emitted token. Immutable once it reaches the output queue.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub sub: Option<TokenSub>,
    pub particle: Option<String>,
}

impl Token {
    /// A token with no text content (EOL, SCOPE_BEGIN, ...).
    pub fn of(kind: TokenKind) -> Self {
        Token {
            kind,
            text: String::new(),
            sub: None,
            particle: None,
        }
    }

    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
            sub: None,
            particle: None,
        }
    }

    pub fn with_sub(mut self, sub: TokenSub) -> Self {
        self.sub = Some(sub);
        self
    }

    pub fn with_particle(mut self, particle: impl Into<String>) -> Self {
        self.particle = Some(particle.into());
        self
    }
}

impl fmt::Display for Token {
    /// Compact one-line form used by the text output format:
    /// `KIND(text)[:SUB][:particle]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.text.is_empty() {
            write!(f, "({})", self.text)?;
        }
        if let Some(sub) = &self.sub {
            write!(f, ":{}", sub)?;
        }
        if let Some(particle) = &self.particle {
            write!(f, ":{}", particle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_statement_token() {
        let token = Token::new(TokenKind::Assignment, "ほげ").with_particle("は");
        assert_eq!(token.to_string(), "ASSIGNMENT(ほげ):は");
    }

    #[test]
    fn test_display_value_token() {
        let token = Token::new(TokenKind::Variable, "10").with_sub(TokenSub::ValNum);
        assert_eq!(token.to_string(), "VARIABLE(10):VAL_NUM");
    }

    #[test]
    fn test_display_bare_token() {
        assert_eq!(Token::of(TokenKind::Eol).to_string(), "EOL");
        assert_eq!(Token::of(TokenKind::ScopeBegin).to_string(), "SCOPE_BEGIN");
    }

    #[test]
    fn test_kind_predicates() {
        assert!(TokenKind::If.opens_scope());
        assert!(TokenKind::FunctionDef.opens_scope());
        assert!(!TokenKind::Assignment.opens_scope());

        assert!(TokenKind::CompEq.is_comparator());
        assert!(!TokenKind::Comp1.is_comparator());
    }

    #[test]
    fn test_serde_round_trip() {
        let token = Token::new(TokenKind::Parameter, "3")
            .with_sub(TokenSub::ValNum)
            .with_particle("と");
        let json = serde_json::to_string(&token).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
