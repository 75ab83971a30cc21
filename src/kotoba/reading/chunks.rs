//! Chunks: the reader's lookahead unit
//!
//! A chunk is one word (with any trailing grammatical particle still
//! attached), a full quoted string, a standalone separator, a whitespace
//! run, or a newline. Comments and line continuations never become chunks.

use crate::kotoba::words;

/// Classification of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Word,
    StringLiteral,
    Comma,
    Question,
    Bang,
    Whitespace,
    Newline,
}

/// One chunk of source text, tagged with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub text: String,
    pub line: usize,
}

impl Chunk {
    pub fn new(kind: ChunkKind, text: impl Into<String>, line: usize) -> Self {
        Chunk {
            kind,
            text: text.into(),
            line,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == ChunkKind::Whitespace
    }

    pub fn is_newline(&self) -> bool {
        self.kind == ChunkKind::Newline
    }

    pub fn is_string(&self) -> bool {
        self.kind == ChunkKind::StringLiteral
    }

    /// The string contents without the surrounding quote marks. Only
    /// meaningful for string literal chunks.
    pub fn string_contents(&self) -> &str {
        self.text
            .strip_prefix('「')
            .and_then(|rest| rest.strip_suffix('」'))
            .unwrap_or(&self.text)
    }

    /// Split a word chunk into stem and trailing particle, preferring the
    /// longest particle in `particles`. The stem must be non-empty, so a
    /// bare particle never splits.
    pub fn split_particle<'p>(&self, particles: &[&'p str]) -> Option<(&str, &'p str)> {
        if self.kind != ChunkKind::Word {
            return None;
        }
        let mut best: Option<(&str, &str)> = None;
        for particle in particles {
            if let Some(stem) = self.text.strip_suffix(particle) {
                if stem.is_empty() {
                    continue;
                }
                match best {
                    Some((_, chosen)) if chosen.len() >= particle.len() => {}
                    _ => best = Some((stem, particle)),
                }
            }
        }
        best
    }

    /// Number of indentation units in a whitespace chunk: each full-width
    /// space or tab is one level, half-width spaces are insignificant.
    pub fn indent_level(&self) -> usize {
        self.text
            .chars()
            .filter(|c| *c == '　' || *c == '\t')
            .count()
    }
}

/// True when the whole word is exactly one of the given particles (used to
/// attach a particle word to a preceding string literal chunk).
pub fn is_bare_particle(text: &str, particles: &[&str]) -> bool {
    particles.contains(&text)
}

/// Convenience for the most common split: function-argument particles.
pub fn split_function_particle(chunk: &Chunk) -> Option<(&str, &'static str)> {
    chunk.split_particle(words::FUNCTION_PARTICLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Chunk {
        Chunk::new(ChunkKind::Word, text, 1)
    }

    #[test]
    fn test_split_particle() {
        let chunk = word("ほげを");
        assert_eq!(chunk.split_particle(&["を"]), Some(("ほげ", "を")));
    }

    #[test]
    fn test_split_prefers_longest_particle() {
        // から must win over a hypothetical single-character match
        let chunk = word("それから");
        assert_eq!(
            split_function_particle(&chunk),
            Some(("それ", "から"))
        );
    }

    #[test]
    fn test_bare_particle_does_not_split() {
        let chunk = word("を");
        assert_eq!(split_function_particle(&chunk), None);
    }

    #[test]
    fn test_split_requires_word_chunk() {
        let chunk = Chunk::new(ChunkKind::StringLiteral, "「やあを」", 1);
        assert_eq!(split_function_particle(&chunk), None);
    }

    #[test]
    fn test_string_contents() {
        let chunk = Chunk::new(ChunkKind::StringLiteral, "「こんにちは」", 1);
        assert_eq!(chunk.string_contents(), "こんにちは");
    }

    #[test]
    fn test_indent_level() {
        assert_eq!(Chunk::new(ChunkKind::Whitespace, "　　", 1).indent_level(), 2);
        assert_eq!(Chunk::new(ChunkKind::Whitespace, "\t", 1).indent_level(), 1);
        assert_eq!(Chunk::new(ChunkKind::Whitespace, "  ", 1).indent_level(), 0);
        assert_eq!(Chunk::new(ChunkKind::Whitespace, " 　 ", 1).indent_level(), 1);
    }
}
