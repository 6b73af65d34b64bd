//! Self-describing packet carrying the file name, payload and a CRC32.
//!
//! Layout, all little-endian:
//! magic "AEDC" (4) | name_len (1) | name | data_len (4) | payload | crc32 (4)
//!
//! The CRC covers every byte before it. Trailing bytes after the CRC are
//! ignored so the parser tolerates FEC block padding.

use crate::error::{ModemError, Result};
use tracing::warn;

pub const PACKET_MAGIC: [u8; 4] = *b"AEDC";

/// 1-byte name, empty payload: 4 + 1 + 1 + 4 + 0 + 4.
pub const MIN_PACKET_SIZE: usize = 14;

pub const MAX_NAME_LEN: usize = 255;

/// CRC-32 (IEEE 802.3): reflected polynomial 0xEDB88320, init 0xFFFFFFFF,
/// final xor 0xFFFFFFFF, bytes processed LSB-first.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
        }
    }
    !crc
}

pub struct ParsedPacket {
    /// Base file name, raw bytes as transmitted.
    pub file_name: Vec<u8>,
    pub payload: Vec<u8>,
    /// False when the trailing CRC32 did not match; the payload is still
    /// returned so callers can persist best-effort output.
    pub crc_ok: bool,
}

/// Serialize a file into a packet. `file_name` must be a base name with
/// directory components already stripped; names longer than 255 bytes are
/// truncated.
pub fn build_packet(file_name: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    if file_name.is_empty() {
        return Err(ModemError::EmptyFileName);
    }
    let data_len =
        u32::try_from(payload.len()).map_err(|_| ModemError::PayloadTooLarge(payload.len()))?;

    let name = &file_name[..file_name.len().min(MAX_NAME_LEN)];

    let mut packet = Vec::with_capacity(MIN_PACKET_SIZE + name.len() + payload.len());
    packet.extend_from_slice(&PACKET_MAGIC);
    packet.push(name.len() as u8);
    packet.extend_from_slice(name);
    packet.extend_from_slice(&data_len.to_le_bytes());
    packet.extend_from_slice(payload);

    let crc = crc32(&packet);
    packet.extend_from_slice(&crc.to_le_bytes());

    Ok(packet)
}

/// Parse a packet from the front of `buf`. Short buffers, a wrong magic or
/// field lengths overflowing the buffer are hard errors; a CRC mismatch is
/// reported through `crc_ok` and a warning only.
pub fn parse_packet(buf: &[u8]) -> Result<ParsedPacket> {
    if buf.len() < MIN_PACKET_SIZE {
        return Err(ModemError::PacketTooShort(buf.len()));
    }
    if buf[..4] != PACKET_MAGIC {
        return Err(ModemError::InvalidMagic);
    }

    let name_len = buf[4] as usize;
    let name_end = 5 + name_len;
    if name_end + 4 > buf.len() {
        return Err(ModemError::TruncatedPacket);
    }
    let file_name = buf[5..name_end].to_vec();

    let data_len = u32::from_le_bytes([
        buf[name_end],
        buf[name_end + 1],
        buf[name_end + 2],
        buf[name_end + 3],
    ]) as usize;

    let payload_start = name_end + 4;
    let crc_end = payload_start
        .checked_add(data_len)
        .and_then(|end| end.checked_add(4))
        .ok_or(ModemError::TruncatedPacket)?;
    if crc_end > buf.len() {
        return Err(ModemError::TruncatedPacket);
    }

    let payload_end = payload_start + data_len;
    let payload = buf[payload_start..payload_end].to_vec();

    let stored_crc = u32::from_le_bytes([
        buf[payload_end],
        buf[payload_end + 1],
        buf[payload_end + 2],
        buf[payload_end + 3],
    ]);
    let computed_crc = crc32(&buf[..payload_end]);

    let crc_ok = stored_crc == computed_crc;
    if !crc_ok {
        warn!(
            "CRC32 mismatch: stored {stored_crc:#010x}, computed {computed_crc:#010x}; \
             payload may be corrupt"
        );
    }

    Ok(ParsedPacket {
        file_name,
        payload,
        crc_ok,
    })
}
