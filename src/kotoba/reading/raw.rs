//! Raw tokenization
//!
//! This is the entry point where source characters become a token stream,
//! using the logos lexer. Strings and block comments are stateful reads
//! (escapes, embedded interpolation, multi-line spans), so they are handled
//! by callbacks that consume from the remainder rather than by patterns.

use logos::{Lexer, Logos};

/// Scan-level failures. `UnexpectedCharacter` is the default for input no
/// pattern covers (a stray closing quote, a lone escape character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanError {
    UnclosedString,
    UnclosedBlockComment,
    #[default]
    UnexpectedCharacter,
}

/// The raw character-class tokens feeding the reader.
///
/// Whitespace and separators are significant at this layer; comments and
/// line continuations are matched so the reader can discard them while
/// keeping the line count right.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = ScanError)]
pub enum RawToken {
    #[token("\n")]
    Newline,

    #[regex(r"[ \t　]+")]
    Whitespace,

    // Escape character, optional blanks, newline: the logical line continues
    #[regex(r"\\[ \t　]*\n")]
    LineContinuation,

    #[regex(r"[、，,]")]
    Comma,

    #[regex(r"[？?]")]
    Question,

    #[regex(r"[！!]")]
    Bang,

    /// A full quoted string including the quote marks. Interpolation
    /// expressions inside it are swallowed, not split out.
    #[token("「", read_string)]
    Str(String),

    /// `（` or `(` through the matching close mark; may span lines.
    #[token("（", read_block_comment)]
    #[token("(", read_block_comment)]
    BlockComment,

    /// `※` to end of line, exclusive.
    #[regex(r"※[^\n]*")]
    InlineComment,

    #[regex(r"[^ \t　\n\\「」【】（）()※、，,？?！!]+")]
    Word,
}

/// Read from after the opening `「` to the matching unescaped `」`.
///
/// A closing mark preceded by an odd run of escape characters does not
/// close. An interpolation opener `【` consumes through its matching `】`
/// first, so closing quotes inside an interpolation do not terminate the
/// string.
fn read_string(lex: &mut Lexer<RawToken>) -> Result<String, ScanError> {
    let remainder = lex.remainder();
    let mut escapes = 0usize;
    let mut depth = 0usize;

    for (index, character) in remainder.char_indices() {
        if character == '\\' {
            escapes += 1;
            continue;
        }
        let escaped = escapes % 2 == 1;
        escapes = 0;
        if escaped {
            continue;
        }
        match character {
            '【' => depth += 1,
            '】' if depth > 0 => depth -= 1,
            '」' if depth == 0 => {
                lex.bump(index + '」'.len_utf8());
                return Ok(lex.slice().to_string());
            }
            _ => {}
        }
    }

    Err(ScanError::UnclosedString)
}

/// Discard through the close mark of a block comment. Not nesting-aware.
fn read_block_comment(lex: &mut Lexer<RawToken>) -> Result<(), ScanError> {
    let remainder = lex.remainder();
    for (index, character) in remainder.char_indices() {
        if character == '）' || character == ')' {
            lex.bump(index + character.len_utf8());
            return Ok(());
        }
    }
    Err(ScanError::UnclosedBlockComment)
}
