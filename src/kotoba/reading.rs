//! Character reading pipeline
//!
//! Two layers: [raw] performs the character-class scan (words, separators,
//! strings, comments), and [reader] groups the raw stream into [chunks]
//! with lookahead and line tracking.

pub mod chunks;
pub mod raw;
pub mod reader;

pub use chunks::{Chunk, ChunkKind};
pub use reader::Reader;
