//! The capture record filled in while scanning a log.

use serde::{Serialize, Serializer};
use std::fmt;

/// Every value the extractor knows how to pick out of a WPS debug trace.
///
/// Variant order is the diagnostic dump order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PeerPublicKey,
    OwnPublicKey,
    EHash1,
    EHash2,
    AuthKey,
    ENonce,
    ESNonce1,
    ESNonce2,
    WpaPsk,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::PeerPublicKey,
        Field::OwnPublicKey,
        Field::EHash1,
        Field::EHash2,
        Field::AuthKey,
        Field::ENonce,
        Field::ESNonce1,
        Field::ESNonce2,
        Field::WpaPsk,
    ];

    /// Fields that must be set before a command can be built.
    pub const REQUIRED: [Field; 6] = [
        Field::PeerPublicKey,
        Field::OwnPublicKey,
        Field::EHash1,
        Field::EHash2,
        Field::AuthKey,
        Field::ENonce,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::PeerPublicKey => "peer_public_key",
            Field::OwnPublicKey => "own_public_key",
            Field::EHash1 => "e_hash1",
            Field::EHash2 => "e_hash2",
            Field::AuthKey => "auth_key",
            Field::ENonce => "e_nonce",
            Field::ESNonce1 => "e_snonce1",
            Field::ESNonce2 => "e_snonce2",
            Field::WpaPsk => "wpa_psk",
        }
    }

    /// Size in bytes the payload must decode to, `None` when unchecked.
    pub fn expected_bytes(self) -> Option<usize> {
        match self {
            Field::PeerPublicKey | Field::OwnPublicKey => Some(192),
            Field::EHash1 | Field::EHash2 | Field::AuthKey => Some(32),
            Field::ENonce | Field::ESNonce1 | Field::ESNonce2 => Some(16),
            Field::WpaPsk => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values collected from one capture session.
///
/// All fields start empty. A later matching line overwrites an earlier one;
/// nothing is ever cleared. `wpa_psk` holds decoded bytes, everything else
/// holds the hex text exactly as it appeared with spaces removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub peer_public_key: String,
    pub own_public_key: String,
    pub e_hash1: String,
    pub e_hash2: String,
    pub auth_key: String,
    pub e_nonce: String,
    pub e_snonce1: String,
    pub e_snonce2: String,
    #[serde(serialize_with = "lossy_text")]
    pub wpa_psk: Vec<u8>,
}

fn lossy_text<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hex value of a field. `wpa_psk` has no hex form and yields `None`.
    pub fn hex(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::PeerPublicKey => &self.peer_public_key,
            Field::OwnPublicKey => &self.own_public_key,
            Field::EHash1 => &self.e_hash1,
            Field::EHash2 => &self.e_hash2,
            Field::AuthKey => &self.auth_key,
            Field::ENonce => &self.e_nonce,
            Field::ESNonce1 => &self.e_snonce1,
            Field::ESNonce2 => &self.e_snonce2,
            Field::WpaPsk => return None,
        };
        Some(value.as_str())
    }

    pub(crate) fn hex_slot_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::PeerPublicKey => Some(&mut self.peer_public_key),
            Field::OwnPublicKey => Some(&mut self.own_public_key),
            Field::EHash1 => Some(&mut self.e_hash1),
            Field::EHash2 => Some(&mut self.e_hash2),
            Field::AuthKey => Some(&mut self.auth_key),
            Field::ENonce => Some(&mut self.e_nonce),
            Field::ESNonce1 => Some(&mut self.e_snonce1),
            Field::ESNonce2 => Some(&mut self.e_snonce2),
            Field::WpaPsk => None,
        }
    }

    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::WpaPsk => !self.wpa_psk.is_empty(),
            other => self.hex(other).is_some_and(|v| !v.is_empty()),
        }
    }

    /// Required fields that are still empty, in dump order.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .iter()
            .copied()
            .filter(|f| !self.is_set(*f))
            .collect()
    }

    /// True once every field needed by the recovery tool is present.
    ///
    /// `wpa_psk`, `e_snonce1` and `e_snonce2` are informational only.
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Free-function form of [`Record::is_complete`].
pub fn is_complete(record: &Record) -> bool {
    record.is_complete()
}

/// One `name = value` line per field, empties included.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for field in Field::ALL {
            match self.hex(field) {
                Some(value) => writeln!(f, "{} = {}", field, value)?,
                None => writeln!(f, "{} = {}", field, String::from_utf8_lossy(&self.wpa_psk))?,
            }
        }
        Ok(())
    }
}
