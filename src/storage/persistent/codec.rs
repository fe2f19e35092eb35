//! Binary framing for profile record files.
//!
//! Every record file is laid out as:
//! ```text
//! [magic: 4 bytes "NPRF"][version: 1 byte][length: 4 bytes LE][data: N bytes JSON][crc32: 4 bytes LE]
//! ```
//! The checksum covers the JSON body, so a torn or bit-flipped file is
//! detected instead of being parsed into a wrong profile.

use std::io::{Error as IoError, ErrorKind, Read, Result as IoResult, Write};

use crc32fast::Hasher;
use serde::{de::DeserializeOwned, Serialize};

/// Current codec version.
const CODEC_VERSION: u8 = 1;

/// Magic bytes identifying a profile record file.
pub const MAGIC: [u8; 4] = *b"NPRF";

/// Profiles are small; anything beyond this is a corrupt length field.
const MAX_ENTRY_SIZE: usize = 16 * 1024 * 1024;

/// Serialize a value into a complete record file image.
pub fn encode<T: Serialize>(value: &T) -> IoResult<Vec<u8>> {
    let data = serde_json::to_vec(value)
        .map_err(|e| IoError::new(ErrorKind::InvalidData, format!("serialization failed: {e}")))?;
    let len = u32::try_from(data.len())
        .map_err(|_| IoError::new(ErrorKind::InvalidData, "record too large to frame"))?;

    let mut hasher = Hasher::new();
    hasher.update(&data);
    let crc = hasher.finalize();

    let mut out = Vec::with_capacity(MAGIC.len() + 1 + 4 + data.len() + 4);
    write_header(&mut out)?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&data);
    out.extend_from_slice(&crc.to_le_bytes());
    Ok(out)
}

/// Read one record, verifying header and checksum.
///
/// # Errors
/// - Bad magic or unsupported version
/// - Oversized length field
/// - CRC mismatch (corruption detected)
/// - JSON that does not match `T`
pub fn decode<T: DeserializeOwned>(reader: &mut impl Read) -> IoResult<T> {
    let version = read_header(reader)?;
    if version != CODEC_VERSION {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("unsupported codec version: {version} (expected {CODEC_VERSION})"),
        ));
    }

    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > MAX_ENTRY_SIZE {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("entry size {len} exceeds maximum {MAX_ENTRY_SIZE}"),
        ));
    }

    let mut data = vec![0u8; len];
    reader.read_exact(&mut data)?;

    let mut crc_bytes = [0u8; 4];
    reader.read_exact(&mut crc_bytes)?;
    let stored_crc = u32::from_le_bytes(crc_bytes);

    let mut hasher = Hasher::new();
    hasher.update(&data);
    let computed_crc = hasher.finalize();
    if stored_crc != computed_crc {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("CRC mismatch: stored={stored_crc:08x}, computed={computed_crc:08x} (data corrupted)"),
        ));
    }

    serde_json::from_slice(&data)
        .map_err(|e| IoError::new(ErrorKind::InvalidData, format!("deserialization failed: {e}")))
}

fn write_header(writer: &mut impl Write) -> IoResult<()> {
    writer.write_all(&MAGIC)?;
    writer.write_all(&[CODEC_VERSION])
}

fn read_header(reader: &mut impl Read) -> IoResult<u8> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(IoError::new(
            ErrorKind::InvalidData,
            format!("invalid magic bytes: expected {MAGIC:?}, got {magic:?}"),
        ));
    }

    let mut version = [0u8; 1];
    reader.read_exact(&mut version)?;
    Ok(version[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::profile::{CognitiveProfile, ProfileId};
    use crate::trait_vector::{CognitiveTrait, TraitVector};

    fn sample() -> CognitiveProfile {
        let traits = TraitVector::neutral().with(CognitiveTrait::Systematic, 0.82);
        CognitiveProfile::assessed(ProfileId::new(), traits, Vec::new(), chrono::Utc::now())
    }

    #[test]
    fn test_profile_record_decodes() {
        let profile = sample();
        let encoded = encode(&profile).unwrap();
        assert_eq!(&encoded[..4], b"NPRF");

        let decoded: CognitiveProfile = decode(&mut Cursor::new(encoded)).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn test_detects_corruption() {
        let mut encoded = encode(&sample()).unwrap();
        encoded[20] ^= 0xFF;

        let err = decode::<CognitiveProfile>(&mut Cursor::new(encoded)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("CRC"));
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut encoded = encode(&sample()).unwrap();
        encoded[0] = b'X';
        let err = decode::<CognitiveProfile>(&mut Cursor::new(encoded)).unwrap_err();
        assert!(err.to_string().contains("magic"));
    }

    #[test]
    fn test_rejects_oversized_entry() {
        let mut bad = MAGIC.to_vec();
        bad.push(CODEC_VERSION);
        bad.extend_from_slice(&200_000_000u32.to_le_bytes());

        let err = decode::<CognitiveProfile>(&mut Cursor::new(bad)).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_truncated_file_is_error() {
        let encoded = encode(&sample()).unwrap();
        let cut = encoded[..encoded.len() - 3].to_vec();
        let err = decode::<CognitiveProfile>(&mut Cursor::new(cut)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
