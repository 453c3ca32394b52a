use std::collections::VecDeque;

use crate::error::FrameError;

/// Byte buffer that carries incomplete lines across network chunks
///
/// Lines are split on `\n` at the byte level, so a multi-byte character split
/// between two chunks is reassembled before decoding.
pub struct CircularLineBuffer {
    buffer: VecDeque<u8>,
}

impl CircularLineBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract the next complete line, trimmed
    ///
    /// Returns None while only an incomplete fragment remains.
    pub fn next_line(&mut self) -> Option<Result<String, FrameError>> {
        let newline_pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();

        match std::str::from_utf8(&line_bytes) {
            Ok(line) => Some(Ok(line.trim().to_string())),
            Err(e) => Some(Err(FrameError::Utf8(e))),
        }
    }

    /// Bytes of the pending (incomplete) fragment
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}
