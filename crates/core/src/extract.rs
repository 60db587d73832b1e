//! Record extraction from noisy, line-oriented model output.
//!
//! Every line is parsed on its own: blank lines, code-fence markers,
//! lines that are not JSON and JSON without a known `type` tag are
//! dropped without affecting their neighbours.
//!
//! Two delivery modes share the same line classifier:
//! - batch: [`extract_records`] / [`iter_records`] over a complete text
//! - incremental: [`IncrementalExtractor`] (push), [`Records`] (pull
//!   iterator over [`Chunk`]s) and, with the `stream` feature,
//!   [`records_stream`] (async).

use crate::types::SlideRecord;
use std::collections::VecDeque;

/// Prefix of a markdown code fence line (```` ``` ```` or ```` ```json ````).
const CODE_FENCE: &str = "```";

/// A piece of upstream text, or the end-of-stream sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Data(String),
    Done,
}

impl From<&str> for Chunk {
    fn from(s: &str) -> Self {
        Chunk::Data(s.to_string())
    }
}

impl From<String> for Chunk {
    fn from(s: String) -> Self {
        Chunk::Data(s)
    }
}

/// Why a line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    Blank,
    CodeFence,
    Malformed,
    UnknownType,
}

fn classify_line(line: &str) -> Result<SlideRecord, Skip> {
    let line = line.trim();
    if line.is_empty() {
        return Err(Skip::Blank);
    }
    if line.starts_with(CODE_FENCE) {
        return Err(Skip::CodeFence);
    }

    let value: serde_json::Value = serde_json::from_str(line).map_err(|_| Skip::Malformed)?;
    SlideRecord::from_value(&value).ok_or(Skip::UnknownType)
}

/// Extract a record from a single line, or `None` if the line is noise.
pub fn extract_line(line: &str) -> Option<SlideRecord> {
    match classify_line(line) {
        Ok(record) => Some(record),
        Err(Skip::Blank) => None,
        Err(reason) => {
            log::debug!("Skipping {:?} line: {}", reason, truncate(line.trim(), 80));
            None
        }
    }
}

/// Lazily extract records from a complete text, in line order.
pub fn iter_records(text: &str) -> impl Iterator<Item = SlideRecord> + '_ {
    text.split('\n').filter_map(extract_line)
}

/// Extract all records from a complete text, in line order.
pub fn extract_records(text: &str) -> Vec<SlideRecord> {
    iter_records(text).collect()
}

/// Push-style incremental extractor.
///
/// Buffers text until a line boundary is seen; complete lines are
/// extracted immediately and any trailing partial line is carried over.
#[derive(Debug, Default)]
pub struct IncrementalExtractor {
    buffer: String,
    done: bool,
}

impl IncrementalExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of text, returning records for every line it completes.
    ///
    /// Input after [`finish`](Self::finish) is ignored.
    pub fn push(&mut self, chunk: &str) -> Vec<SlideRecord> {
        if self.done {
            return Vec::new();
        }
        self.buffer.push_str(chunk);

        let mut records = Vec::new();
        let mut consumed = 0;
        while let Some(pos) = self.buffer[consumed..].find('\n') {
            let end = consumed + pos;
            records.extend(extract_line(&self.buffer[consumed..end]));
            consumed = end + 1;
        }
        self.buffer.drain(..consumed);

        records
    }

    /// Signal end of stream, flushing the trailing partial line.
    pub fn finish(&mut self) -> Vec<SlideRecord> {
        if self.done {
            return Vec::new();
        }
        self.done = true;
        let rest = std::mem::take(&mut self.buffer);
        extract_line(&rest).into_iter().collect()
    }

    /// Feed a [`Chunk`], finishing on the sentinel.
    pub fn feed(&mut self, chunk: Chunk) -> Vec<SlideRecord> {
        match chunk {
            Chunk::Data(data) => self.push(&data),
            Chunk::Done => self.finish(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Pull-style incremental extraction over a chunk source.
///
/// Stops at [`Chunk::Done`] (or when the source is exhausted) without
/// asking the source for more input. Not restartable.
pub struct Records<I> {
    chunks: I,
    extractor: IncrementalExtractor,
    pending: VecDeque<SlideRecord>,
}

impl<I> Records<I>
where
    I: Iterator<Item = Chunk>,
{
    pub fn new(chunks: I) -> Self {
        Self {
            chunks,
            extractor: IncrementalExtractor::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<I> Iterator for Records<I>
where
    I: Iterator<Item = Chunk>,
{
    type Item = SlideRecord;

    fn next(&mut self) -> Option<SlideRecord> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(record);
            }
            if self.extractor.is_done() {
                return None;
            }
            let chunk = self.chunks.next().unwrap_or(Chunk::Done);
            self.pending.extend(self.extractor.feed(chunk));
        }
    }
}

/// Async incremental extraction over a chunk stream.
#[cfg(feature = "stream")]
pub fn records_stream<S>(chunks: S) -> impl futures::Stream<Item = SlideRecord>
where
    S: futures::Stream<Item = Chunk> + Unpin,
{
    use futures::stream::{self, StreamExt};

    stream::unfold(
        (chunks, IncrementalExtractor::new()),
        |(mut chunks, mut extractor)| async move {
            if extractor.is_done() {
                return None;
            }
            let chunk = chunks.next().await.unwrap_or(Chunk::Done);
            let records = extractor.feed(chunk);
            Some((stream::iter(records), (chunks, extractor)))
        },
    )
    .flatten()
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
