mod buffering;
mod frame_parser;

pub use buffering::CircularLineBuffer;
pub use frame_parser::{parse_frame_line, parse_frame_stream, FrameItem, StreamFault};
