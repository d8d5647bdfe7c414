//! Channel layer: line framing, settle delays and output decoding.

mod buffer;
mod console;

pub use buffer::ResponseBuffer;
pub use console::{ChannelConfig, ConsoleChannel};
