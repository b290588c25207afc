//! Radio wire protocol
//!
//! # Frame layout
//!
//! Every frame is exactly [`FRAME_LEN`] bytes: a one-byte tag followed by a
//! fixed 9-byte payload. All multi-byte fields are little-endian; floats travel
//! as their IEEE-754 bit pattern so NaN payloads and signed zero survive.
//!
//! ```text
//! ┌─────┬────────┬──────────────────┬──────────────────┐
//! │ tag │ id: u8 │ bytes 2..6       │ bytes 6..10      │
//! ├─────┼────────┼──────────────────┼──────────────────┤
//! │ 77  │ target │ sequence: u32    │ distance: f32    │  Advertisement
//! │ 56  │ target │ padding: u32     │ padding: u32     │  BearingRequest
//! │ 25  │ target │ heading: f32     │ padding: u32     │  BearingResponse
//! └─────┴────────┴──────────────────┴──────────────────┘
//! ```
//!
//! There is no length prefix and no sender identity. A broadcast payload is a
//! concatenation of frames; an advertisement batch carries one frame per table
//! entry. [`frames`] walks a payload and stops at the first bad frame, since
//! without framing there is nothing to resynchronise on.

mod constants;
mod message;

pub use constants::*;
pub use message::{DecodeError, Frames, Message, encode_all, frames};
