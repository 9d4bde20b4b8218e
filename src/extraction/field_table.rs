use super::record::Field;

/// Prefix every wpa_supplicant WPS debug line starts with.
pub const WPS_SENTINEL: &str = "WPS: ";

/// Substring marking a line as a hexdump of binary data.
pub const HEXDUMP_MARKER: &str = "hexdump";

/// A line marker and the field it fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMarker {
    pub marker: &'static str,
    pub field: Field,
}

/// Checked top to bottom; the first marker contained in a line wins.
pub const FIELD_MARKERS: [FieldMarker; 9] = [
    FieldMarker { marker: "Enrollee Nonce", field: Field::ENonce },
    FieldMarker { marker: "DH own Public Key", field: Field::OwnPublicKey },
    FieldMarker { marker: "DH peer Public Key", field: Field::PeerPublicKey },
    FieldMarker { marker: "AuthKey", field: Field::AuthKey },
    FieldMarker { marker: "E-Hash1", field: Field::EHash1 },
    FieldMarker { marker: "E-Hash2", field: Field::EHash2 },
    FieldMarker { marker: "Network Key", field: Field::WpaPsk },
    FieldMarker { marker: "E-SNonce1", field: Field::ESNonce1 },
    FieldMarker { marker: "E-SNonce2", field: Field::ESNonce2 },
];

/// Field a qualifying line refers to, if any.
pub fn match_field(line: &str) -> Option<Field> {
    FIELD_MARKERS
        .iter()
        .find(|m| line.contains(m.marker))
        .map(|m| m.field)
}
