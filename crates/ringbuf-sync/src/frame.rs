//! Length + CRC32 framing over a byte ring.
//!
//! The ring buffer carries a raw element stream with no notion of message
//! boundaries. A frame puts an 8-byte header in front of a payload:
//!
//! ```text
//! +----------------+----------------+-------------------+
//! | len: u32 (LE)  | crc32: u32 (LE)| payload (len B)   |
//! +----------------+----------------+-------------------+
//! ```
//!
//! The receiver reads the header, reassembles `len` bytes and checks the
//! CRC32 before handing the payload back. A header announcing more than the
//! receiver's limit is rejected before any payload buffer is allocated.

use crate::transfer::{read_exact, write_all, RetryPolicy};
use crate::{RingBuffer, RingError};
use tracing::warn;

/// Header preceding each framed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Payload length in bytes
    pub len: u32,
    /// CRC32 (IEEE) of the payload
    pub checksum: u32,
}

impl FrameHeader {
    /// Encoded size of the header in bytes.
    pub const SIZE: usize = 8;

    /// Largest payload [`recv_frame`] accepts (64 MiB).
    pub const DEFAULT_MAX_LEN: usize = 64 * 1024 * 1024;

    /// Builds the header describing `payload`.
    pub fn for_payload(payload: &[u8]) -> Result<Self, RingError> {
        let len = u32::try_from(payload.len())
            .map_err(|_| RingError::PayloadTooLarge { len: payload.len() })?;
        Ok(Self {
            len,
            checksum: crc32fast::hash(payload),
        })
    }

    /// Encodes the header as little-endian bytes.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[..4].copy_from_slice(&self.len.to_le_bytes());
        out[4..].copy_from_slice(&self.checksum.to_le_bytes());
        out
    }

    /// Decodes a header from its little-endian encoding.
    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        let [l0, l1, l2, l3, c0, c1, c2, c3] = bytes;
        Self {
            len: u32::from_le_bytes([l0, l1, l2, l3]),
            checksum: u32::from_le_bytes([c0, c1, c2, c3]),
        }
    }

    /// Returns true if `payload` matches this header's length and checksum.
    pub fn verify(&self, payload: &[u8]) -> bool {
        payload.len() == self.len as usize && crc32fast::hash(payload) == self.checksum
    }
}

/// Writes `payload` as one frame. Returns the header that was sent.
pub fn send_frame(
    ring: &RingBuffer<u8>,
    payload: &[u8],
    policy: RetryPolicy,
) -> Result<FrameHeader, RingError> {
    let header = FrameHeader::for_payload(payload)?;
    write_all(ring, &header.to_bytes(), policy)?;
    write_all(ring, payload, policy)?;
    Ok(header)
}

/// Reads one frame and returns its payload after checking the CRC32.
///
/// Payloads over [`FrameHeader::DEFAULT_MAX_LEN`] are rejected with
/// [`RingError::FrameTooLarge`].
pub fn recv_frame(ring: &RingBuffer<u8>, policy: RetryPolicy) -> Result<Vec<u8>, RingError> {
    recv_frame_with_limit(ring, policy, FrameHeader::DEFAULT_MAX_LEN)
}

/// Like [`recv_frame`], with a caller-chosen payload limit in bytes.
///
/// On [`RingError::FrameTooLarge`] only the header has been consumed; the
/// stream is out of step and should be abandoned.
pub fn recv_frame_with_limit(
    ring: &RingBuffer<u8>,
    policy: RetryPolicy,
    max_len: usize,
) -> Result<Vec<u8>, RingError> {
    let mut raw = [0u8; FrameHeader::SIZE];
    read_exact(ring, &mut raw, policy)?;
    let header = FrameHeader::from_bytes(raw);

    let len = header.len as usize;
    if len > max_len {
        warn!(len, max_len, "frame header exceeds payload limit");
        return Err(RingError::FrameTooLarge { len, max: max_len });
    }

    let mut payload = vec![0u8; len];
    read_exact(ring, &mut payload, policy)?;

    let actual = crc32fast::hash(&payload);
    if actual != header.checksum {
        warn!(
            len = header.len,
            expected = header.checksum,
            actual,
            "frame checksum mismatch"
        );
        return Err(RingError::ChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }

    Ok(payload)
}
