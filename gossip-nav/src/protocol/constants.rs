//! Wire constants

/// Tag byte: distance advertisement
pub const TAG_ADVERTISEMENT: u8 = 77;

/// Tag byte: request for a stored bearing
pub const TAG_BEARING_REQUEST: u8 = 56;

/// Tag byte: reply carrying a relative heading
pub const TAG_BEARING_RESPONSE: u8 = 25;

/// Payload bytes following the tag (identical for all kinds)
pub const PAYLOAD_LEN: usize = 9;

/// Tag + payload
pub const FRAME_LEN: usize = 1 + PAYLOAD_LEN;
