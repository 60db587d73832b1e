//! Decoding of OpenAI-compatible Server-Sent-Events completions into [`Chunk`]s.
//!
//! Providers stream frames like `data: {"choices":[{"delta":{"content":"..."}}]}`
//! and terminate with `data: [DONE]`. Only the delta content is forwarded.

use crate::extract::Chunk;
use serde_json::Value;
use std::collections::VecDeque;

/// Payload of the terminating frame.
pub const DONE_SENTINEL: &str = "[DONE]";

const DATA_PREFIX: &str = "data:";

/// Decode one SSE line into a chunk, if it carries content or the sentinel.
fn decode_line(line: &str) -> Option<Chunk> {
    let payload = line.trim().strip_prefix(DATA_PREFIX)?.trim();
    if payload == DONE_SENTINEL {
        return Some(Chunk::Done);
    }

    let frame: Value = match serde_json::from_str(payload) {
        Ok(frame) => frame,
        Err(e) => {
            log::debug!("Ignoring malformed SSE frame: {}", e);
            return None;
        }
    };

    frame
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(Chunk::from)
}

/// Push-style SSE decoder, tolerant of frames split across network reads.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw SSE text, returning decoded chunks for complete lines.
    ///
    /// Ends with [`Chunk::Done`] once the sentinel is seen; later input is ignored.
    pub fn push(&mut self, raw: &str) -> Vec<Chunk> {
        if self.done {
            return Vec::new();
        }
        self.buffer.push_str(raw);

        let mut chunks = Vec::new();
        let mut consumed = 0;
        while let Some(pos) = self.buffer[consumed..].find('\n') {
            let end = consumed + pos;
            let decoded = decode_line(&self.buffer[consumed..end]);
            consumed = end + 1;
            if let Some(chunk) = decoded {
                let is_done = chunk == Chunk::Done;
                chunks.push(chunk);
                if is_done {
                    self.done = true;
                    break;
                }
            }
        }

        if self.done {
            self.buffer.clear();
        } else {
            self.buffer.drain(..consumed);
        }
        chunks
    }

    /// The upstream connection closed: flush and emit the sentinel if not yet seen.
    pub fn finish(&mut self) -> Vec<Chunk> {
        if self.done {
            return Vec::new();
        }
        self.done = true;
        let rest = std::mem::take(&mut self.buffer);
        let mut chunks: Vec<Chunk> = decode_line(&rest).into_iter().collect();
        if chunks.last() != Some(&Chunk::Done) {
            chunks.push(Chunk::Done);
        }
        chunks
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Pull-style adapter from raw SSE text pieces to [`Chunk`]s.
pub struct SseChunks<I> {
    raw: I,
    decoder: SseDecoder,
    pending: VecDeque<Chunk>,
}

impl<I, T> SseChunks<I>
where
    I: Iterator<Item = T>,
    T: AsRef<str>,
{
    pub fn new(raw: I) -> Self {
        Self {
            raw,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
        }
    }
}

impl<I, T> Iterator for SseChunks<I>
where
    I: Iterator<Item = T>,
    T: AsRef<str>,
{
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        loop {
            if let Some(chunk) = self.pending.pop_front() {
                return Some(chunk);
            }
            if self.decoder.is_done() {
                return None;
            }
            match self.raw.next() {
                Some(raw) => self.pending.extend(self.decoder.push(raw.as_ref())),
                None => self.pending.extend(self.decoder.finish()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Records;
    use crate::types::SlideRecord;

    fn frame(content: &str) -> String {
        let delta = serde_json::json!({ "choices": [{ "delta": { "content": content } }] });
        format!("data: {}\n\n", delta)
    }

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line("data: [DONE]"), Some(Chunk::Done));
        assert_eq!(decode_line(&frame("hi")), Some(Chunk::from("hi")));
        assert_eq!(decode_line(": keep-alive"), None);
        assert_eq!(decode_line("data: {broken"), None);
        assert_eq!(decode_line("data: {\"choices\":[]}"), None);
    }

    #[test]
    fn test_decoder_handles_split_frames() {
        let raw = format!("{}{}data: [DONE]\n{}", frame("ab"), frame("c\n"), frame("late"));
        let (head, tail) = raw.split_at(17);

        let mut decoder = SseDecoder::new();
        let mut chunks = decoder.push(head);
        chunks.extend(decoder.push(tail));

        assert_eq!(
            chunks,
            vec![Chunk::from("ab"), Chunk::from("c\n"), Chunk::Done]
        );
        assert!(decoder.is_done());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_finish_without_sentinel_emits_done() {
        let mut decoder = SseDecoder::new();
        assert!(decoder
            .push("data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}")
            .is_empty());
        assert_eq!(decoder.finish(), vec![Chunk::from("x"), Chunk::Done]);
    }

    #[test]
    fn test_sse_into_records() {
        let raw = vec![
            frame("```json\n{\"type\":\"co"),
            frame("ver\",\"data\":{\"title\":\"T\"}}\n{\"ty"),
            frame("pe\":\"end\"}"),
            "data: [DONE]\n".to_string(),
        ];
        let records: Vec<_> = Records::new(SseChunks::new(raw.into_iter())).collect();
        assert_eq!(
            records,
            vec![
                SlideRecord::Cover {
                    title: "T".to_string(),
                    subtitle: None,
                },
                SlideRecord::End,
            ]
        );
    }
}
