//! Message encoding and decoding

use super::constants::*;

/// Why a frame was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Tag byte is not one of the three known kinds
    #[error("unknown tag {0}")]
    UnknownTag(u8),

    /// Fewer bytes than the tag's fixed length
    #[error("truncated frame (tag {tag}): expected {expected} bytes, got {actual}")]
    Truncated {
        tag: u8,
        expected: usize,
        actual: usize,
    },

    /// Nothing to decode
    #[error("empty frame")]
    Empty,
}

/// The three wire messages
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    /// "I am `distance` away from `target_id`, at freshness `sequence`."
    Advertisement {
        target_id: u8,
        sequence: u32,
        distance: f32,
    },
    /// "Send me your stored bearing toward `target_id`."
    BearingRequest { target_id: u8 },
    /// Relative heading correction toward `target_id`.
    BearingResponse { target_id: u8, heading: f32 },
}

impl Message {
    /// Tag byte for this kind
    pub fn tag(&self) -> u8 {
        match self {
            Message::Advertisement { .. } => TAG_ADVERTISEMENT,
            Message::BearingRequest { .. } => TAG_BEARING_REQUEST,
            Message::BearingResponse { .. } => TAG_BEARING_RESPONSE,
        }
    }

    pub fn target_id(&self) -> u8 {
        match *self {
            Message::Advertisement { target_id, .. }
            | Message::BearingRequest { target_id }
            | Message::BearingResponse { target_id, .. } => target_id,
        }
    }

    /// True when every float field is finite
    ///
    /// The codec carries any bit pattern; receivers use this to drop values
    /// that cannot stand for a distance or heading.
    pub fn is_finite(&self) -> bool {
        match *self {
            Message::Advertisement { distance, .. } => distance.is_finite(),
            Message::BearingRequest { .. } => true,
            Message::BearingResponse { heading, .. } => heading.is_finite(),
        }
    }

    /// Encode into a fixed-size frame
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut data = [0u8; FRAME_LEN];
        data[0] = self.tag();
        data[1] = self.target_id();
        match *self {
            Message::Advertisement {
                sequence, distance, ..
            } => {
                data[2..6].copy_from_slice(&sequence.to_le_bytes());
                data[6..10].copy_from_slice(&distance.to_bits().to_le_bytes());
            }
            Message::BearingRequest { .. } => {}
            Message::BearingResponse { heading, .. } => {
                data[2..6].copy_from_slice(&heading.to_bits().to_le_bytes());
            }
        }
        data
    }

    /// Append the encoded frame to a buffer
    #[inline]
    pub fn encode_into(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(&self.encode());
    }

    /// Decode the frame at the start of `bytes`
    ///
    /// Trailing bytes beyond [`FRAME_LEN`] are ignored; use [`frames`] to walk
    /// a concatenated payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let Some(&tag) = bytes.first() else {
            return Err(DecodeError::Empty);
        };

        if !matches!(
            tag,
            TAG_ADVERTISEMENT | TAG_BEARING_REQUEST | TAG_BEARING_RESPONSE
        ) {
            return Err(DecodeError::UnknownTag(tag));
        }

        if bytes.len() < FRAME_LEN {
            return Err(DecodeError::Truncated {
                tag,
                expected: FRAME_LEN,
                actual: bytes.len(),
            });
        }

        let target_id = bytes[1];
        let word_a = u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
        let word_b = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);

        Ok(match tag {
            TAG_ADVERTISEMENT => Message::Advertisement {
                target_id,
                sequence: word_a,
                distance: f32::from_bits(word_b),
            },
            TAG_BEARING_REQUEST => Message::BearingRequest { target_id },
            _ => Message::BearingResponse {
                target_id,
                heading: f32::from_bits(word_a),
            },
        })
    }
}

/// Encode a batch of messages into one broadcast payload
pub fn encode_all<'a, I>(messages: I) -> Vec<u8>
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut buffer = Vec::new();
    for message in messages {
        message.encode_into(&mut buffer);
    }
    buffer
}

/// Iterate over the frames of a broadcast payload
pub fn frames(payload: &[u8]) -> Frames<'_> {
    Frames {
        remaining: payload,
        failed: false,
    }
}

/// Iterator returned by [`frames`]
///
/// Yields each decoded frame in order. After the first error it yields that
/// error once and then stops.
pub struct Frames<'a> {
    remaining: &'a [u8],
    failed: bool,
}

impl Iterator for Frames<'_> {
    type Item = Result<Message, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining.is_empty() {
            return None;
        }

        match Message::decode(self.remaining) {
            Ok(message) => {
                self.remaining = &self.remaining[FRAME_LEN..];
                Some(Ok(message))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}
