//! The tokenizer engine
//!
//! Pulls chunks from the reader on demand, matches them against the grammar
//! table sequence by sequence, and flushes each successfully matched line
//! into an output queue that [`Tokenizer::next_token`] drains one token at
//! a time.
//!
//! Matching is recursive descent with integrated backtracking. The state a
//! failed attempt must roll back (chunk cursor, accumulated token stack,
//! context) is small and owned, so a snapshot is a plain clone and a
//! restore is a plain replace. Speculative failures are `Ok(false)` and are
//! always absorbed at the choice point that introduced them; `Err` is
//! reserved for input that no interpretation can make legal.

use std::collections::VecDeque;

use crate::kotoba::context::Context;
use crate::kotoba::errors::{Error, ErrorKind};
use crate::kotoba::grammar::{self, Term, TermBody};
use crate::kotoba::reading::chunks::{self, Chunk};
use crate::kotoba::reading::reader::Reader;
use crate::kotoba::scope::{self, Scope, ScopeKind};
use crate::kotoba::tokens::{Token, TokenKind, TokenSub};
use crate::kotoba::words;

/// Configuration threaded through the constructor; no global state.
#[derive(Debug, Clone)]
pub struct TokenizerConfig {
    /// Register the built-in functions into the root scope.
    pub register_builtins: bool,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig {
            register_builtins: true,
        }
    }
}

/// A word-plus-particle phrase at the cursor. A string literal followed by
/// a bare particle word forms a two-chunk phrase.
#[derive(Debug, Clone)]
pub(crate) struct Phrase {
    pub(crate) stem: String,
    pub(crate) particle: String,
    pub(crate) chunks: usize,
    pub(crate) is_string: bool,
}

/// Snapshot of the matcher state taken before each term attempt.
#[derive(Clone)]
struct MatchState {
    cursor: usize,
    stack: Vec<Token>,
    context: Context,
}

/// Continuation of a sequence match, linked through the call stack.
enum Cont<'a> {
    Done,
    /// One instance of `terms[index]` just completed; its repetition count
    /// and the cursor where the instance started decide what may follow.
    Resume {
        terms: &'a [Term],
        index: usize,
        count: usize,
        at: usize,
        next: &'a Cont<'a>,
    },
}

pub struct Tokenizer<'s> {
    pub(crate) reader: Reader<'s>,
    pub(crate) scope: Scope,
    pub(crate) context: Context,
    pub(crate) stack: Vec<Token>,
    line_chunks: Vec<Chunk>,
    line_done: bool,
    pub(crate) cursor: usize,
    furthest: usize,
    output: VecDeque<Token>,
    eof_closed: bool,
    config: TokenizerConfig,
}

impl<'s> Tokenizer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self::with_config(source, TokenizerConfig::default())
    }

    pub fn with_config(source: &'s str, config: TokenizerConfig) -> Self {
        let mut scope = Scope::new();
        if config.register_builtins {
            scope::register_built_ins(&mut scope);
        }
        Tokenizer {
            reader: Reader::new(source),
            scope,
            context: Context::new(),
            stack: Vec::new(),
            line_chunks: Vec::new(),
            line_done: false,
            cursor: 0,
            furthest: 0,
            output: VecDeque::new(),
            eof_closed: false,
            config,
        }
    }

    /// The live scope chain, for run-time interpolation.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Pull the next token, tokenizing further lines as needed. `None` is
    /// the end marker; every open scope has been closed before it.
    pub fn next_token(&mut self) -> Result<Option<Token>, Error> {
        loop {
            if let Some(token) = self.output.pop_front() {
                return Ok(Some(token));
            }
            if self.reader.finished() && self.line_chunks.is_empty() {
                if !self.eof_closed {
                    self.eof_closed = true;
                    while self.scope.depth() > 0 {
                        self.close_one_scope();
                    }
                    continue;
                }
                return Ok(None);
            }
            self.advance_line()?;
        }
    }

    /// Discard all scope, context, and buffer state so an interactive
    /// driver can resume cleanly after an error. The rest of the erroring
    /// line is abandoned; the configuration is kept.
    pub fn reset(&mut self) {
        self.scope = Scope::new();
        if self.config.register_builtins {
            scope::register_built_ins(&mut self.scope);
        }
        self.context = Context::new();
        self.stack.clear();
        self.line_chunks.clear();
        self.line_done = false;
        self.cursor = 0;
        self.furthest = 0;
        self.output.clear();
        self.eof_closed = false;
        // a scan error here marks the reader finished, which is the right
        // outcome for input that cannot be read past
        let _ = self.reader.skip_to_newline();
    }

    // --- line processing ---

    /// Read one source line: balance indentation against the scope chain,
    /// skip blank lines, then match the grammar table.
    fn advance_line(&mut self) -> Result<(), Error> {
        let mut indent_level = 0;
        let leading_whitespace = matches!(
            self.reader.peek_next_chunk(false)?,
            Some(chunk) if chunk.is_whitespace()
        );
        if leading_whitespace {
            if let Some(chunk) = self.reader.next_chunk()? {
                indent_level = chunk.indent_level();
            }
        }

        match self.reader.peek_next_chunk(false)? {
            None => return Ok(()),
            Some(chunk) if chunk.is_newline() => {
                self.reader.next_chunk()?;
                return Ok(());
            }
            _ => {}
        }

        let line = self.reader.line();
        let depth = self.scope.depth();
        if indent_level > depth {
            return Err(Error::new(ErrorKind::UnexpectedIndent(indent_level), line));
        }
        for _ in indent_level..depth {
            self.close_one_scope();
        }

        self.match_line(line)
    }

    /// Close the innermost scope, injecting the implicit null return for a
    /// function body that never returned explicitly.
    fn close_one_scope(&mut self) {
        if let Some((kind, saw_return)) = self.scope.close() {
            if kind == ScopeKind::Function && !saw_return {
                self.output
                    .push_back(Token::of(TokenKind::Return).with_sub(TokenSub::ValNull));
            }
            self.output.push_back(Token::of(TokenKind::ScopeClose));
            self.context.last_closed_scope = Some(kind);
        }
    }

    /// Try each grammar sequence in table order; the first one whose terms
    /// match completely through end of line wins and is flushed.
    fn match_line(&mut self, line: usize) -> Result<(), Error> {
        self.furthest = 0;
        let base = self.snapshot();
        for sequence in grammar::table() {
            self.restore(base.clone());
            if self.match_terms(&sequence.terms, 0, 0, &Cont::Done)? {
                self.flush();
                return Ok(());
            }
        }

        let at = self.furthest;
        let unmatched = self.chunk_at(at)?.cloned();
        let kind = match unmatched {
            Some(chunk) if chunk.is_newline() => ErrorKind::UnexpectedEol,
            Some(chunk) => ErrorKind::UnexpectedInput(chunk.text),
            None => ErrorKind::UnexpectedEndOfInput,
        };
        Err(Error::new(kind, line))
    }

    /// Move the matched line's tokens to the output queue and clear the
    /// per-line buffers.
    fn flush(&mut self) {
        self.output.extend(self.stack.drain(..));
        self.line_chunks.clear();
        self.line_done = false;
        self.cursor = 0;
        self.furthest = 0;
        self.context.end_line();
    }

    // --- the sequence matcher ---

    /// Match `terms[index..]`, with `count` instances of `terms[index]`
    /// already consumed, then the continuation.
    fn match_terms<'a>(
        &mut self,
        terms: &'a [Term],
        index: usize,
        count: usize,
        cont: &'a Cont<'a>,
    ) -> Result<bool, Error> {
        if index >= terms.len() {
            return self.run_cont(cont);
        }
        let term = &terms[index];

        if count < term.max() {
            let snapshot = self.snapshot();
            let resume = Cont::Resume {
                terms,
                index,
                count,
                at: self.cursor,
                next: cont,
            };
            match &term.body {
                TermBody::Kind(kind) => {
                    if self.attempt(*kind)? && self.run_cont(&resume)? {
                        return Ok(true);
                    }
                }
                TermBody::Sub(inner) => {
                    if self.match_terms(inner, 0, 0, &resume)? {
                        return Ok(true);
                    }
                }
                TermBody::Branch(alternatives) => {
                    for alternative in alternatives {
                        self.restore(snapshot.clone());
                        if self.match_terms(alternative, 0, 0, &resume)? {
                            return Ok(true);
                        }
                    }
                }
            }
            self.restore(snapshot);
        }

        if count >= term.min() {
            return self.match_terms(terms, index + 1, 0, cont);
        }
        Ok(false)
    }

    /// After a completed term instance: advance to the next term first;
    /// only when that whole continuation fails, retry the same term. A
    /// zero-length instance is never retried, which bounds the search.
    fn run_cont(&mut self, cont: &Cont<'_>) -> Result<bool, Error> {
        match cont {
            Cont::Done => Ok(true),
            Cont::Resume {
                terms,
                index,
                count,
                at,
                next,
            } => {
                let (terms, index, count, at, next) = (*terms, *index, *count, *at, *next);
                if self.match_terms(terms, index + 1, 0, next)? {
                    return Ok(true);
                }
                if self.cursor > at {
                    return self.match_terms(terms, index, count + 1, next);
                }
                Ok(false)
            }
        }
    }

    /// One term attempt: classifier, then builder.
    fn attempt(&mut self, kind: TokenKind) -> Result<bool, Error> {
        if !self.kind_matches(kind)? {
            return Ok(false);
        }
        self.build_kind(kind)?;
        if self.cursor > self.furthest {
            self.furthest = self.cursor;
        }
        Ok(true)
    }

    fn snapshot(&self) -> MatchState {
        MatchState {
            cursor: self.cursor,
            stack: self.stack.clone(),
            context: self.context.clone(),
        }
    }

    fn restore(&mut self, state: MatchState) {
        self.cursor = state.cursor;
        self.stack = state.stack;
        self.context = state.context;
    }

    // --- chunk access ---

    /// The chunk at a buffer index, pulling from the reader only past what
    /// is already buffered. Buffered chunks are re-examined freely during
    /// backtracking without re-reading. Nothing is pulled past the line's
    /// newline.
    pub(crate) fn chunk_at(&mut self, index: usize) -> Result<Option<&Chunk>, Error> {
        while self.line_chunks.len() <= index && !self.line_done {
            match self.reader.next_chunk()? {
                None => break,
                Some(chunk) if chunk.is_whitespace() => continue,
                Some(chunk) => {
                    if chunk.is_newline() {
                        self.line_done = true;
                    }
                    self.line_chunks.push(chunk);
                }
            }
        }
        Ok(self.line_chunks.get(index))
    }

    pub(crate) fn current_chunk(&mut self) -> Result<Option<Chunk>, Error> {
        let cursor = self.cursor;
        Ok(self.chunk_at(cursor)?.cloned())
    }

    /// A word with one of the given particles at the cursor, or a string
    /// literal followed by a bare particle word.
    pub(crate) fn phrase_at(&mut self, particles: &[&str]) -> Result<Option<Phrase>, Error> {
        let cursor = self.cursor;
        let Some(chunk) = self.chunk_at(cursor)?.cloned() else {
            return Ok(None);
        };
        if chunk.is_string() {
            let Some(next) = self.chunk_at(cursor + 1)?.cloned() else {
                return Ok(None);
            };
            if next.kind == chunks::ChunkKind::Word
                && chunks::is_bare_particle(&next.text, particles)
            {
                return Ok(Some(Phrase {
                    stem: chunk.string_contents().to_string(),
                    particle: next.text,
                    chunks: 2,
                    is_string: true,
                }));
            }
            return Ok(None);
        }
        Ok(chunk.split_particle(particles).map(|(stem, particle)| Phrase {
            stem: stem.to_string(),
            particle: particle.to_string(),
            chunks: 1,
            is_string: false,
        }))
    }

    /// Consume the phrase the classifier just accepted.
    pub(crate) fn expect_phrase(&mut self, particles: &[&str]) -> Result<Phrase, Error> {
        match self.phrase_at(particles)? {
            Some(phrase) => {
                self.advance(phrase.chunks);
                Ok(phrase)
            }
            None => Err(self.fail(ErrorKind::UnexpectedEol)),
        }
    }

    /// Consume the chunk the classifier just accepted.
    pub(crate) fn expect_chunk(&mut self) -> Result<Chunk, Error> {
        match self.current_chunk()? {
            Some(chunk) => {
                self.advance(1);
                Ok(chunk)
            }
            None => Err(self.fail(ErrorKind::UnexpectedEol)),
        }
    }

    pub(crate) fn advance(&mut self, chunks: usize) {
        self.cursor += chunks;
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.context.last_kind = Some(token.kind);
        self.stack.push(token);
    }

    /// Line number for an error at the current position.
    pub(crate) fn error_line(&self) -> usize {
        self.line_chunks
            .get(self.cursor.min(self.line_chunks.len().saturating_sub(1)))
            .map(|chunk| chunk.line)
            .unwrap_or_else(|| self.reader.line())
    }

    pub(crate) fn fail(&mut self, kind: ErrorKind) -> Error {
        Error::new(kind, self.error_line())
    }
}

/// Resolve an interpolation target against a live scope at run time: a
/// bare variable yields one token, an owner-plus-property pair two. This
/// is a standalone function on purpose; it is the evaluator's one
/// re-entrant callback into token building.
pub fn interpolate_string(raw: &str, scope: &Scope, line: usize) -> Result<Vec<Token>, Error> {
    let is_space = |c: char| c == ' ' || c == '　' || c == '\t';
    let parts: Vec<&str> = raw.split(is_space).filter(|p| !p.is_empty()).collect();

    let invalid = || Error::new(ErrorKind::InvalidInterpolation(raw.to_string()), line);

    match parts.as_slice() {
        [single] => {
            let sub = if *single == "それ" {
                TokenSub::ValSore
            } else if scope.has_variable(single) {
                TokenSub::ValVar
            } else {
                return Err(invalid());
            };
            Ok(vec![Token::new(TokenKind::Variable, *single).with_sub(sub)])
        }
        [owner, target] => {
            let stem = owner
                .strip_suffix(words::POSSESSIVE_PARTICLE)
                .filter(|stem| !stem.is_empty())
                .ok_or_else(|| invalid())?;
            let owner_sub = if stem == "それ" {
                TokenSub::ValSore
            } else if scope.has_variable(stem) {
                TokenSub::ValVar
            } else {
                return Err(invalid());
            };
            let possessive = Token::new(TokenKind::Possessive, stem)
                .with_sub(owner_sub)
                .with_particle(words::POSSESSIVE_PARTICLE);

            let accessor = if let Some(sub) = words::property_sub(target) {
                Token::new(TokenKind::Property, *target).with_sub(sub)
            } else if words::is_number(target) {
                Token::new(TokenKind::Attribute, *target).with_sub(TokenSub::KeyIndex)
            } else if scope.has_variable(target) {
                Token::new(TokenKind::Attribute, *target).with_sub(TokenSub::KeyVar)
            } else {
                return Err(invalid());
            };
            Ok(vec![possessive, accessor])
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kotoba::testing;
    use crate::kotoba::tokens::TokenKind as K;

    #[test]
    fn test_assignment_line() {
        let tokens = testing::tokenize("ほげは 10\n");
        assert_eq!(
            testing::kinds(&tokens),
            vec![K::Assignment, K::Variable, K::Eol]
        );
        assert_eq!(tokens[0].text, "ほげ");
        assert_eq!(tokens[1].text, "10");
        assert_eq!(tokens[1].sub, Some(TokenSub::ValNum));
    }

    #[test]
    fn test_if_line_reorders_comparator() {
        let tokens = testing::tokenize("もし 1が 1と 等しければ\n　・・・\n");
        assert_eq!(
            testing::kinds(&tokens),
            vec![
                K::If,
                K::CompEq,
                K::Variable,
                K::Variable,
                K::ScopeBegin,
                K::NoOp,
                K::ScopeClose,
            ]
        );
    }

    #[test]
    fn test_double_indent_jump_is_fatal() {
        let error = testing::tokenize_err("もし 1が 1と 等しければ\n　　・・・\n");
        assert_eq!(error.kind, ErrorKind::UnexpectedIndent(2));
        assert_eq!(error.line, 2);
    }

    #[test]
    fn test_unmatched_line_reports_furthest_chunk() {
        let error = testing::tokenize_err("ほげは ふがを\n");
        assert_eq!(error.kind, ErrorKind::UnexpectedInput("ふがを".to_string()));
    }

    #[test]
    fn test_reset_recovers_for_interactive_use() {
        let mut tokenizer = Tokenizer::new("10は 5\nほげは 1\n");
        let error = loop {
            match tokenizer.next_token() {
                Ok(Some(_)) => {}
                Ok(None) => panic!("expected an error"),
                Err(error) => break error,
            }
        };
        assert_eq!(error.kind, ErrorKind::AssignmentToValue("10".to_string()));

        tokenizer.reset();
        let mut kinds = Vec::new();
        while let Some(token) = tokenizer.next_token().unwrap() {
            kinds.push(token.kind);
        }
        assert_eq!(kinds, vec![K::Assignment, K::Variable, K::Eol]);
    }

    #[test]
    fn test_interpolate_bare_variable() {
        let mut scope = Scope::new();
        scope.add_variable("ほげ");
        let tokens = interpolate_string("ほげ", &scope, 1).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, K::Variable);
        assert_eq!(tokens[0].sub, Some(TokenSub::ValVar));
    }

    #[test]
    fn test_interpolate_property_pair() {
        let mut scope = Scope::new();
        scope.add_variable("ほげ");
        let tokens = interpolate_string("ほげの 長さ", &scope, 1).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, K::Possessive);
        assert_eq!(tokens[1].kind, K::Property);
        assert_eq!(tokens[1].sub, Some(TokenSub::PropLen));
    }

    #[test]
    fn test_interpolate_rejects_unknown() {
        let scope = Scope::new();
        let error = interpolate_string("ふが", &scope, 7).unwrap_err();
        assert_eq!(
            error.kind,
            ErrorKind::InvalidInterpolation("ふが".to_string())
        );
        assert_eq!(error.line, 7);
    }
}
