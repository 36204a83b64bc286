//! Heating profile and its persisted record.
//!
//! On-card layout (`data.txt`):
//! ```text
//! id=<u32>,heat=<ms>,preserve=<ms>,rest=<ms>~
//! ```
//!
//! The trailing `~` is written last.  A record without it was cut short by
//! a power loss or a failed write and is never parsed.  The body uses the
//! same `key=value` pairs as the serial protocol, so decoding reuses the
//! protocol tokenizer.
//!
//! Everything here except [`save`] and [`read_record`] is pure; those two
//! only talk to a [`FileStoragePort`].

use log::{info, warn};

use crate::app::ports::{FileStoragePort, StorageError};
use crate::error::CorruptError;
use crate::protocol::parser::{Token, pairs};

/// Default name of the persisted profile file.
pub const DATA_FILE_NAME: &str = "data.txt";

/// Last byte of every complete record.
pub const INTEGRITY_MARKER: u8 = b'~';

const SECOND_MS: u32 = 1000;

/// Timing configuration for one heating cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub id: u32,
    /// Heating phase length (ms).
    pub heat_ms: u32,
    /// Preserving phase length (ms).
    pub preserve_ms: u32,
    /// Resting phase length (ms).
    pub rest_ms: u32,
}

impl Default for Profile {
    fn default() -> Self {
        load_default()
    }
}

/// Fixed nominal schedule used until a profile is loaded or sent.
pub fn load_default() -> Profile {
    Profile {
        id: 1,
        heat_ms: 5 * SECOND_MS,
        preserve_ms: 3 * SECOND_MS,
        rest_ms: 2 * SECOND_MS,
    }
}

/// The updatable fields, by wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Id,
    Heat,
    Preserve,
    Rest,
}

impl ProfileField {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(Self::Id),
            "heat" => Some(Self::Heat),
            "preserve" => Some(Self::Preserve),
            "rest" => Some(Self::Rest),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Heat => "heat",
            Self::Preserve => "preserve",
            Self::Rest => "rest",
        }
    }
}

/// Decode a non-negative integer field value.
///
/// Anything that is not a plain `u32` (sign, letters, overflow, empty)
/// becomes `0` and a warning is logged.
pub fn parse_value(value: &str) -> u32 {
    match value.trim().parse::<u32>() {
        Ok(v) => v,
        Err(_) => {
            warn!("Profile: value {:?} is not a non-negative integer, using 0", value);
            0
        }
    }
}

/// Return `profile` with exactly one field replaced.
///
/// An unknown key is logged and the profile comes back unchanged.
pub fn apply_field(profile: Profile, key: &str, value: &str) -> Profile {
    let Some(field) = ProfileField::from_key(key) else {
        warn!("Profile: unknown field {:?}", key);
        return profile;
    };
    let v = parse_value(value);
    info!("Profile: {} changed to {}", field.key(), v);
    match field {
        ProfileField::Id => Profile { id: v, ..profile },
        ProfileField::Heat => Profile { heat_ms: v, ..profile },
        ProfileField::Preserve => Profile {
            preserve_ms: v,
            ..profile
        },
        ProfileField::Rest => Profile { rest_ms: v, ..profile },
    }
}

/// Serialise the whole profile, marker included.
pub fn encode(profile: &Profile) -> Vec<u8> {
    let mut out = format!(
        "id={},heat={},preserve={},rest={}",
        profile.id, profile.heat_ms, profile.preserve_ms, profile.rest_ms
    )
    .into_bytes();
    out.push(INTEGRITY_MARKER);
    out
}

/// Check the integrity marker and return the record body without it.
pub fn record_payload(bytes: &[u8]) -> Result<&str, CorruptError> {
    let body = bytes
        .strip_suffix(&[INTEGRITY_MARKER])
        .ok_or(CorruptError::MissingMarker)?;
    core::str::from_utf8(body).map_err(|_| CorruptError::NotUtf8)
}

/// Decode a record, starting from the default profile for missing fields.
pub fn decode(bytes: &[u8]) -> Result<Profile, CorruptError> {
    decode_onto(load_default(), bytes)
}

/// Decode a record on top of `base`; fields absent from the record keep
/// their `base` value.
pub fn decode_onto(base: Profile, bytes: &[u8]) -> Result<Profile, CorruptError> {
    let payload = record_payload(bytes)?;
    Ok(pairs(payload).fold(base, |profile, token| match token {
        Token::Pair { key, value } => apply_field(profile, key, value),
        Token::Dangling(key) => {
            warn!("Profile: record ends with dangling key {:?}", key);
            profile
        }
    }))
}

/// Read the raw record from storage.
pub fn read_record(
    storage: &impl FileStoragePort,
    file_name: &str,
) -> Result<Vec<u8>, StorageError> {
    storage.read(file_name)
}

/// Rewrite the record: delete the old file, then create the new one.
///
/// A crash in between leaves no file (or one without the marker), which
/// the loader treats as absent.
pub fn save(
    storage: &mut impl FileStoragePort,
    file_name: &str,
    profile: &Profile,
) -> Result<(), StorageError> {
    storage.remove(file_name)?;
    storage.write(file_name, &encode(profile))?;
    info!("Profile: saved id={} to {}", profile.id, file_name);
    Ok(())
}
