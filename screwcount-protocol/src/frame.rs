//! Link framing shared by the display and bridge UARTs
//!
//! ```text
//! 0xA5 | LEN_LO | LEN_HI | TYPE | PAYLOAD (LEN bytes) | CHECK
//! ```
//!
//! `CHECK` is the XOR of both length bytes, the type and every payload byte.
//! The receiver drops anything before a start byte, so a corrupted frame
//! costs at most that frame.

use heapless::Vec;

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xA5;

/// Maximum payload size in bytes
///
/// Large enough for a 1024-byte broker payload plus its topic.
pub const MAX_PAYLOAD_SIZE: usize = 1152;

/// START, two length bytes, TYPE and CHECK
const HEADER_LEN: usize = 4;
const OVERHEAD: usize = HEADER_LEN + 1;

/// Largest encoded frame
pub const MAX_FRAME_SIZE: usize = MAX_PAYLOAD_SIZE + OVERHEAD;

/// Framing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload longer than [`MAX_PAYLOAD_SIZE`]
    PayloadTooLarge,
    /// Received CHECK byte does not match the frame
    InvalidChecksum,
    /// Length field out of range, or payload malformed for its type
    InvalidFrame,
    /// Output buffer shorter than the encoded frame
    BufferTooSmall,
}

/// One message on the link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub msg_type: u8,
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

fn checksum(len: u16, msg_type: u8, payload: &[u8]) -> u8 {
    let [lo, hi] = len.to_le_bytes();
    payload.iter().fold(lo ^ hi ^ msg_type, |acc, &b| acc ^ b)
}

impl Frame {
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Frame carrying only a type
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    pub fn encoded_len(&self) -> usize {
        self.payload.len() + OVERHEAD
    }

    /// Write the encoded frame to the front of `out`
    ///
    /// Returns the number of bytes written.
    pub fn encode(&self, out: &mut [u8]) -> Result<usize, FrameError> {
        let total = self.encoded_len();
        let out = out.get_mut(..total).ok_or(FrameError::BufferTooSmall)?;

        // Bounded by MAX_PAYLOAD_SIZE
        let len = self.payload.len() as u16;
        let (header, rest) = out.split_at_mut(HEADER_LEN);
        let (body, check) = rest.split_at_mut(self.payload.len());

        let [lo, hi] = len.to_le_bytes();
        header.copy_from_slice(&[FRAME_START, lo, hi, self.msg_type]);
        body.copy_from_slice(&self.payload);
        check[0] = checksum(len, self.msg_type, &self.payload);

        Ok(total)
    }

    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut out = Vec::new();
        out.resize_default(self.encoded_len())
            .map_err(|_| FrameError::BufferTooSmall)?;
        self.encode(&mut out)?;
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Sync,
    LenLo,
    LenHi { lo: u8 },
    Type { len: u16 },
    Payload,
    Check,
}

/// Incremental frame decoder fed one byte at a time
#[derive(Debug, Clone)]
pub struct FrameParser {
    stage: Stage,
    len: u16,
    msg_type: u8,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            stage: Stage::Sync,
            len: 0,
            msg_type: 0,
            payload: Vec::new(),
        }
    }

    /// Drop any partial frame and wait for the next start byte
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one byte
    ///
    /// Yields a frame when its check byte arrives. After an error the parser
    /// is back to waiting for a start byte.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        self.stage = match self.stage {
            Stage::Sync if byte == FRAME_START => Stage::LenLo,
            Stage::Sync => Stage::Sync,
            Stage::LenLo => Stage::LenHi { lo: byte },
            Stage::LenHi { lo } => {
                let len = u16::from_le_bytes([lo, byte]);
                if usize::from(len) > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidFrame);
                }
                Stage::Type { len }
            }
            Stage::Type { len } => {
                self.len = len;
                self.msg_type = byte;
                self.payload.clear();
                if len == 0 {
                    Stage::Check
                } else {
                    Stage::Payload
                }
            }
            Stage::Payload => {
                // Length was checked against capacity
                let _ = self.payload.push(byte);
                if self.payload.len() == usize::from(self.len) {
                    Stage::Check
                } else {
                    Stage::Payload
                }
            }
            Stage::Check => {
                let valid = byte == checksum(self.len, self.msg_type, &self.payload);
                let frame = Frame {
                    msg_type: self.msg_type,
                    payload: core::mem::take(&mut self.payload),
                };
                self.reset();
                return if valid {
                    Ok(Some(frame))
                } else {
                    Err(FrameError::InvalidChecksum)
                };
            }
        };
        Ok(None)
    }

    /// Feed bytes until the first complete frame
    ///
    /// Bytes after that frame are left unread.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Frame>, FrameError> {
        for &byte in bytes {
            if let Some(frame) = self.feed(byte)? {
                return Ok(Some(frame));
            }
        }
        Ok(None)
    }
}
