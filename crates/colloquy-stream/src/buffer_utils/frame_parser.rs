use futures::{Stream, StreamExt};
use std::pin::Pin;
use thiserror::Error;

use super::buffering::CircularLineBuffer;
use crate::error::{AgentError, FrameError};
use crate::streaming::StreamEvent;
use crate::traits::ByteStream;

const FRAME_PREFIX: &str = "data: ";

/// Why an item of the frame stream is not an event
#[derive(Error, Debug)]
pub enum StreamFault {
    /// One frame was unreadable; the stream goes on
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The body could not be read any further
    #[error(transparent)]
    Transport(#[from] AgentError),
}

pub type FrameItem = Result<StreamEvent, StreamFault>;

/// Parse one complete, trimmed line
///
/// Returns None for blank separator lines and anything that is not a data frame.
pub fn parse_frame_line(line: &str) -> Option<Result<StreamEvent, FrameError>> {
    let data = line.strip_prefix(FRAME_PREFIX)?;
    Some(serde_json::from_str::<StreamEvent>(data).map_err(FrameError::from))
}

/// Turn a chunked response body into a stream of frame events
///
/// A transport error is yielded once and ends the stream.
pub fn parse_frame_stream(body: ByteStream) -> Pin<Box<dyn Stream<Item = FrameItem> + Send>> {
    Box::pin(async_stream::stream! {
        let mut chunks = body;
        let mut buffer = CircularLineBuffer::with_capacity(4096);

        while let Some(chunk_result) = chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(&bytes);

                    while let Some(line_result) = buffer.next_line() {
                        match line_result {
                            Ok(line) => {
                                if let Some(parsed) = parse_frame_line(&line) {
                                    yield parsed.map_err(StreamFault::from);
                                }
                            }
                            Err(e) => yield Err(StreamFault::from(e)),
                        }
                    }
                }
                Err(e) => {
                    yield Err(StreamFault::from(e));
                    break;
                }
            }
        }

        if !buffer.is_empty() {
            tracing::debug!(pending_bytes = buffer.len(), "Discarding unterminated trailing fragment");
        }
    })
}
