//! Forward-only "typewriter" rendering of a finished suggestion.
//!
//! Chunks are emitted strictly in order and never revisited, so whatever has
//! been written is always a prefix of the final text.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

pub const DEFAULT_CHARS_PER_CHUNK: usize = 4;
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(15);

/// Splits `text` into consecutive pieces of at most `chars_per_chunk`
/// characters. A chunk size of zero is treated as one.
pub fn progressive_chunks(text: &str, chars_per_chunk: usize) -> ProgressiveChunks<'_> {
    ProgressiveChunks {
        remaining: text,
        chars_per_chunk: chars_per_chunk.max(1),
    }
}

#[derive(Debug, Clone)]
pub struct ProgressiveChunks<'a> {
    remaining: &'a str,
    chars_per_chunk: usize,
}

impl<'a> Iterator for ProgressiveChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining.is_empty() {
            return None;
        }
        let split = self
            .remaining
            .char_indices()
            .nth(self.chars_per_chunk)
            .map_or(self.remaining.len(), |(index, _)| index);
        let (chunk, rest) = self.remaining.split_at(split);
        self.remaining = rest;
        Some(chunk)
    }
}

/// Writes `text` chunk by chunk, flushing after each one and pausing
/// `delay` between chunks.
pub fn render_progressively<W: Write>(
    writer: &mut W,
    text: &str,
    chars_per_chunk: usize,
    delay: Duration,
) -> io::Result<()> {
    let mut chunks = progressive_chunks(text, chars_per_chunk).peekable();
    while let Some(chunk) = chunks.next() {
        writer.write_all(chunk.as_bytes())?;
        writer.flush()?;
        if chunks.peek().is_some() && !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    Ok(())
}
