//! The pull-based reader
//!
//! Wraps the raw scan and serves chunks on demand. Comments, collapsed
//! whitespace runs, and line continuations are discarded here; quoted
//! strings, separators, and newlines come through verbatim. Peeking never
//! advances the stream.

use std::collections::VecDeque;

use logos::Logos;

use crate::kotoba::errors::{Error, ErrorKind};
use crate::kotoba::reading::chunks::{Chunk, ChunkKind};
use crate::kotoba::reading::raw::{RawToken, ScanError};

pub struct Reader<'s> {
    lexer: logos::Lexer<'s, RawToken>,
    lookahead: VecDeque<Chunk>,
    line: usize,
    exhausted: bool,
}

impl<'s> Reader<'s> {
    pub fn new(source: &'s str) -> Self {
        Reader {
            lexer: RawToken::lexer(source),
            lookahead: VecDeque::new(),
            line: 1,
            exhausted: false,
        }
    }

    /// 1-based line number of the next unconsumed chunk.
    pub fn line(&self) -> usize {
        self.lookahead.front().map(|c| c.line).unwrap_or(self.line)
    }

    /// True once the raw stream and the lookahead buffer are both empty.
    pub fn finished(&self) -> bool {
        self.exhausted && self.lookahead.is_empty()
    }

    /// Consume and return the next chunk, or `None` at end of input.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, Error> {
        self.fill(1)?;
        Ok(self.lookahead.pop_front())
    }

    /// Look at the next chunk without consuming anything. With
    /// `skip_whitespace`, the first non-whitespace chunk is returned
    /// (newlines are not skipped).
    pub fn peek_next_chunk(&mut self, skip_whitespace: bool) -> Result<Option<&Chunk>, Error> {
        let mut index = 0;
        loop {
            self.fill(index + 1)?;
            match self.lookahead.get(index) {
                None => return Ok(None),
                Some(chunk) if skip_whitespace && chunk.is_whitespace() => index += 1,
                Some(_) => return Ok(self.lookahead.get(index)),
            }
        }
    }

    /// Discard chunks through the next newline (inclusive). Used by an
    /// interactive driver to abandon the rest of an erroring line.
    pub fn skip_to_newline(&mut self) -> Result<(), Error> {
        while let Some(chunk) = self.next_chunk()? {
            if chunk.is_newline() {
                break;
            }
        }
        Ok(())
    }

    fn fill(&mut self, wanted: usize) -> Result<(), Error> {
        while self.lookahead.len() < wanted && !self.exhausted {
            match self.pull()? {
                Some(chunk) => self.lookahead.push_back(chunk),
                None => break,
            }
        }
        Ok(())
    }

    /// Pull raw tokens until one produces a chunk or the stream ends.
    fn pull(&mut self) -> Result<Option<Chunk>, Error> {
        loop {
            let Some(result) = self.lexer.next() else {
                self.exhausted = true;
                return Ok(None);
            };
            let start_line = self.line;
            let slice = self.lexer.slice();
            self.line += slice.matches('\n').count();

            let token = match result {
                Ok(token) => token,
                Err(scan_error) => {
                    self.exhausted = true;
                    let kind = match scan_error {
                        ScanError::UnclosedString => ErrorKind::UnclosedString,
                        ScanError::UnclosedBlockComment => ErrorKind::UnclosedBlockComment,
                        ScanError::UnexpectedCharacter => {
                            ErrorKind::UnexpectedInput(slice.to_string())
                        }
                    };
                    return Err(Error::new(kind, start_line));
                }
            };

            let chunk = match token {
                RawToken::Newline => Chunk::new(ChunkKind::Newline, "\n", start_line),
                RawToken::Whitespace => Chunk::new(ChunkKind::Whitespace, slice, start_line),
                RawToken::Comma => Chunk::new(ChunkKind::Comma, slice, start_line),
                RawToken::Question => Chunk::new(ChunkKind::Question, slice, start_line),
                RawToken::Bang => Chunk::new(ChunkKind::Bang, slice, start_line),
                RawToken::Str(text) => Chunk::new(ChunkKind::StringLiteral, text, start_line),
                RawToken::Word => Chunk::new(ChunkKind::Word, slice, start_line),
                RawToken::LineContinuation
                | RawToken::BlockComment
                | RawToken::InlineComment => continue,
            };
            return Ok(Some(chunk));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_kinds(source: &str) -> Vec<ChunkKind> {
        let mut reader = Reader::new(source);
        let mut kinds = Vec::new();
        while let Some(chunk) = reader.next_chunk().unwrap() {
            kinds.push(chunk.kind);
        }
        kinds
    }

    #[test]
    fn test_words_and_newline() {
        assert_eq!(
            chunk_kinds("ほげは 10\n"),
            vec![
                ChunkKind::Word,
                ChunkKind::Whitespace,
                ChunkKind::Word,
                ChunkKind::Newline
            ]
        );
    }

    #[test]
    fn test_comments_produce_nothing() {
        assert_eq!(
            chunk_kinds("ほげ（注釈）は ※残り\n"),
            vec![ChunkKind::Word, ChunkKind::Word, ChunkKind::Whitespace, ChunkKind::Newline]
        );
    }

    #[test]
    fn test_line_continuation_is_silent() {
        let mut reader = Reader::new("ほげは \\\n10\n");
        let mut texts = Vec::new();
        while let Some(chunk) = reader.next_chunk().unwrap() {
            texts.push((chunk.kind, chunk.text, chunk.line));
        }
        assert_eq!(
            texts,
            vec![
                (ChunkKind::Word, "ほげは".to_string(), 1),
                (ChunkKind::Whitespace, " ".to_string(), 1),
                (ChunkKind::Word, "10".to_string(), 2),
                (ChunkKind::Newline, "\n".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_peek_is_idempotent() {
        let mut reader = Reader::new("ほげは 10\n");
        let first = reader.peek_next_chunk(false).unwrap().cloned();
        let second = reader.peek_next_chunk(false).unwrap().cloned();
        assert_eq!(first, second);
        assert_eq!(reader.line(), 1);

        let consumed = reader.next_chunk().unwrap();
        assert_eq!(consumed, first);
    }

    #[test]
    fn test_peek_skipping_whitespace() {
        let mut reader = Reader::new("　 ほげ\n");
        let peeked = reader.peek_next_chunk(true).unwrap().unwrap();
        assert_eq!(peeked.text, "ほげ");
        // nothing consumed
        assert_eq!(reader.next_chunk().unwrap().unwrap().kind, ChunkKind::Whitespace);
    }

    #[test]
    fn test_line_numbers_across_multiline_string() {
        let mut reader = Reader::new("「一\n二」 ほげ\n");
        let string_chunk = reader.next_chunk().unwrap().unwrap();
        assert_eq!(string_chunk.line, 1);
        let whitespace = reader.next_chunk().unwrap().unwrap();
        assert_eq!(whitespace.line, 2);
    }

    #[test]
    fn test_unclosed_string_is_fatal() {
        let mut reader = Reader::new("ほげは 「やあ");
        reader.next_chunk().unwrap();
        reader.next_chunk().unwrap();
        let error = reader.next_chunk().unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnclosedString);
    }

    #[test]
    fn test_unclosed_comment_is_fatal() {
        let mut reader = Reader::new("（どこまでも");
        let error = reader.next_chunk().unwrap_err();
        assert_eq!(error.kind, ErrorKind::UnclosedBlockComment);
    }

    #[test]
    fn test_finished() {
        let mut reader = Reader::new("ほげ");
        assert!(!reader.finished());
        reader.next_chunk().unwrap();
        assert!(reader.next_chunk().unwrap().is_none());
        assert!(reader.finished());
    }

    #[test]
    fn test_skip_to_newline() {
        let mut reader = Reader::new("ほげ ふが\nぴよ\n");
        reader.next_chunk().unwrap();
        reader.skip_to_newline().unwrap();
        assert_eq!(reader.next_chunk().unwrap().unwrap().text, "ぴよ");
    }
}
