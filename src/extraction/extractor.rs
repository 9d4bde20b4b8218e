use log::{debug, trace, warn};

use super::field_table::{match_field, HEXDUMP_MARKER, WPS_SENTINEL};
use super::record::{Field, Record};
use crate::error_handling::types::ExtractError;

/// Pulls the hex payload out of a hexdump line.
///
/// The line is split on ':' into at most four parts and the third one is
/// the payload; spaces between octets are dropped.
fn payload_hex(line: &str, field: Field) -> Result<String, ExtractError> {
    let payload = line
        .splitn(4, ':')
        .nth(2)
        .ok_or(ExtractError::MissingPayload { field: field.name() })?;
    Ok(payload.replace(' ', ""))
}

/// Updates `record` from a single log line (terminator already stripped).
///
/// Returns the field that was written, or `None` when the line is not a WPS
/// hexdump of a known value. Lines are matched against the marker table in
/// order and the first hit wins. A second hit for the same field replaces
/// the earlier value.
pub fn process_line(record: &mut Record, line: &str) -> Result<Option<Field>, ExtractError> {
    if !line.starts_with(WPS_SENTINEL) || !line.contains(HEXDUMP_MARKER) {
        return Ok(None);
    }
    let Some(field) = match_field(line) else {
        return Ok(None);
    };

    let payload = payload_hex(line, field)?;

    match record.hex_slot_mut(field) {
        Some(slot) => {
            if let Some(bytes) = field.expected_bytes() {
                if payload.len() != bytes * 2 {
                    return Err(ExtractError::LengthMismatch {
                        field: field.name(),
                        expected: bytes * 2,
                        actual: payload.len(),
                    });
                }
            }
            if !slot.is_empty() {
                debug!("{} seen again, replacing earlier value", field);
            }
            *slot = payload;
        }
        None => {
            record.wpa_psk = hex::decode(&payload).map_err(|e| ExtractError::InvalidHex {
                field: field.name(),
                reason: e.to_string(),
            })?;
        }
    }

    debug!("Extracted {}", field);
    Ok(Some(field))
}

/// Line-by-line driver owning the record for one capture session.
#[derive(Debug, Default)]
pub struct Extractor {
    record: Record,
    lines_seen: usize,
    fields_extracted: usize,
}

impl Extractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, line: &str) -> Result<Option<Field>, ExtractError> {
        self.lines_seen += 1;
        match process_line(&mut self.record, line) {
            Ok(Some(field)) => {
                self.fields_extracted += 1;
                Ok(Some(field))
            }
            Ok(None) => {
                trace!("line {} ignored", self.lines_seen);
                Ok(None)
            }
            Err(e) => {
                warn!("line {}: {}", self.lines_seen, e);
                Err(e)
            }
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn lines_seen(&self) -> usize {
        self.lines_seen
    }

    pub fn fields_extracted(&self) -> usize {
        self.fields_extracted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZED_FIELDS: [(&str, usize, Field); 8] = [
        ("Enrollee Nonce", 16, Field::ENonce),
        ("DH own Public Key", 192, Field::OwnPublicKey),
        ("DH peer Public Key", 192, Field::PeerPublicKey),
        ("AuthKey", 32, Field::AuthKey),
        ("E-Hash1", 32, Field::EHash1),
        ("E-Hash2", 32, Field::EHash2),
        ("E-SNonce1", 16, Field::ESNonce1),
        ("E-SNonce2", 16, Field::ESNonce2),
    ];

    fn dump_line(label: &str, len: usize, hex: &str) -> String {
        format!("WPS: {} - hexdump(len={}): {}", label, len, hex)
    }

    /// Space separated octets the way wpa_supplicant prints them.
    fn spaced(byte: &str, count: usize) -> String {
        vec![byte; count].join(" ")
    }

    #[test]
    fn non_wps_lines_leave_record_untouched() {
        let mut record = Record::new();
        let lines = [
            "",
            "random noise",
            "EAPOL: E-Hash1 - hexdump(len=32): 00",
            " WPS: E-Hash1 - hexdump(len=32): 00",
            "wps: AuthKey - hexdump(len=32): 00",
        ];
        for line in lines {
            assert_eq!(process_line(&mut record, line), Ok(None));
        }
        assert_eq!(record, Record::new());
    }

    #[test]
    fn wps_line_without_hexdump_marker_is_ignored() {
        let mut record = Record::new();
        let line = format!("WPS: E-Hash1 - dump(len=32): {}", "dd".repeat(32));
        assert_eq!(process_line(&mut record, &line), Ok(None));
        assert_eq!(record, Record::new());
    }

    #[test]
    fn wps_hexdump_of_unknown_value_is_ignored() {
        let mut record = Record::new();
        let line = dump_line("R-Hash1", 32, &"00".repeat(32));
        assert_eq!(process_line(&mut record, &line), Ok(None));
        assert_eq!(record, Record::new());
    }

    #[test]
    fn spaces_are_removed_from_payload() {
        let mut record = Record::new();
        let line = dump_line("E-Hash1", 32, &spaced("d4", 32));
        assert_eq!(process_line(&mut record, &line), Ok(Some(Field::EHash1)));
        assert_eq!(record.e_hash1, "d4".repeat(32));
    }

    #[test]
    fn every_sized_field_is_extracted() {
        for (label, len, field) in SIZED_FIELDS {
            let mut record = Record::new();
            let line = dump_line(label, len, &spaced("3a", len));
            assert_eq!(process_line(&mut record, &line), Ok(Some(field)));
            assert_eq!(record.hex(field), Some("3a".repeat(len).as_str()));
        }
    }

    #[test]
    fn wrong_length_is_fatal_for_every_sized_field() {
        for (label, len, field) in SIZED_FIELDS {
            for bytes in [len - 1, len + 1] {
                let mut record = Record::new();
                let line = dump_line(label, len, &"00".repeat(bytes));
                assert_eq!(
                    process_line(&mut record, &line),
                    Err(ExtractError::LengthMismatch {
                        field: field.name(),
                        expected: len * 2,
                        actual: bytes * 2,
                    })
                );
                assert_eq!(record, Record::new());
            }
        }
    }

    #[test]
    fn odd_hex_length_is_rejected() {
        let mut record = Record::new();
        let line = dump_line("Enrollee Nonce", 16, &format!("{}f", "ff".repeat(16)));
        assert!(matches!(
            process_line(&mut record, &line),
            Err(ExtractError::LengthMismatch { actual: 33, .. })
        ));
    }

    #[test]
    fn network_key_is_decoded_without_length_check() {
        let mut record = Record::new();
        let line = dump_line("Network Key", 12, "70 61 73 73 77 6f 72 64 31 32 33 34");
        assert_eq!(process_line(&mut record, &line), Ok(Some(Field::WpaPsk)));
        assert_eq!(record.wpa_psk, b"password1234".to_vec());

        let line = dump_line("Network Key", 1, "41");
        assert_eq!(process_line(&mut record, &line), Ok(Some(Field::WpaPsk)));
        assert_eq!(record.wpa_psk, b"A".to_vec());
    }

    #[test]
    fn undecodable_network_key_is_fatal() {
        let mut record = Record::new();
        let line = dump_line("Network Key", 2, "zz zz");
        assert!(matches!(
            process_line(&mut record, &line),
            Err(ExtractError::InvalidHex { field: "wpa_psk", .. })
        ));
    }

    #[test]
    fn missing_payload_part_is_fatal() {
        let mut record = Record::new();
        assert_eq!(
            process_line(&mut record, "WPS: AuthKey - hexdump(len=32)"),
            Err(ExtractError::MissingPayload { field: "auth_key" })
        );
    }

    #[test]
    fn payload_stops_at_next_colon() {
        // Fourth part is dropped, as with any extra ':' separated text.
        let mut record = Record::new();
        let line = format!("{}:trailing", dump_line("AuthKey", 32, &"cc".repeat(32)));
        assert_eq!(process_line(&mut record, &line), Ok(Some(Field::AuthKey)));
        assert_eq!(record.auth_key, "cc".repeat(32));
    }

    #[test]
    fn last_write_wins() {
        let mut record = Record::new();
        process_line(&mut record, &dump_line("E-Hash2", 32, &"01".repeat(32))).unwrap();
        process_line(&mut record, &dump_line("E-Hash2", 32, &"02".repeat(32))).unwrap();
        assert_eq!(record.e_hash2, "02".repeat(32));
    }

    #[test]
    fn extractor_counts_lines_and_hits() {
        let mut extractor = Extractor::new();
        extractor.feed("WPS: noise").unwrap();
        extractor
            .feed(&dump_line("Enrollee Nonce", 16, &"ff".repeat(16)))
            .unwrap();
        extractor.feed("").unwrap();
        assert_eq!(extractor.lines_seen(), 3);
        assert_eq!(extractor.fields_extracted(), 1);
        assert_eq!(extractor.record().e_nonce, "ff".repeat(16));
    }

    #[test]
    fn extractor_surfaces_fatal_error() {
        let mut extractor = Extractor::new();
        let err = extractor
            .feed(&dump_line("AuthKey", 32, "cc"))
            .unwrap_err();
        assert!(matches!(err, ExtractError::LengthMismatch { field: "auth_key", .. }));
        assert!(extractor.into_record().auth_key.is_empty());
    }
}
