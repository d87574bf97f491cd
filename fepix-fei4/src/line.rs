//! Log-line classification and data-record parsing.

use crate::{Error, Result};
use fepix_core::{FE_COLS, FE_ROWS};

/// Classification of one decoded log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Data header (DH); advances the readout-window header count.
    DataHeader,
    /// Data record (DR) with parsed fields.
    DataRecord {
        /// Column (1-based).
        x: u16,
        /// Row (1-based).
        y: u16,
        /// ToT code of the first slot.
        tot1: u8,
        /// ToT code of the second slot.
        tot2: u8,
    },
    /// Trigger word (TD) from an external trigger.
    TriggerData,
    /// Channel marker interleaved by the readout software.
    Channel,
    /// Any other line; ignored downstream.
    Unrecognized,
}

/// Classifies a decoded log line by its marker prefix.
///
/// # Errors
/// Returns a parse error for a `DR` line whose fields are missing, not
/// numeric, or out of range. Lines with other prefixes never fail.
pub fn classify_line(line: &str) -> Result<LineKind> {
    if line.starts_with("CHANNEL") {
        Ok(LineKind::Channel)
    } else if line.starts_with("DH") {
        Ok(LineKind::DataHeader)
    } else if line.starts_with("DR") {
        parse_data_record(line)
    } else if line.starts_with("TD") {
        Ok(LineKind::TriggerData)
    } else {
        Ok(LineKind::Unrecognized)
    }
}

/// Parses one `DR <x> <y> <tot1> <tot2>` line into a data record.
///
/// # Errors
/// Returns [`Error::MalformedRecord`] if fewer than four numeric fields
/// follow the marker, [`Error::CoordinateOutOfRange`] or
/// [`Error::TotCodeOutOfRange`] if a field is outside the hardware range.
pub fn parse_data_record(line: &str) -> Result<LineKind> {
    let mut tokens = line.split_whitespace();
    let _marker = tokens.next();

    let mut field = || -> Result<i64> {
        let token = tokens
            .next()
            .ok_or_else(|| Error::MalformedRecord(line.to_string()))?;
        token
            .parse()
            .map_err(|_| Error::MalformedRecord(line.to_string()))
    };

    let x = field()?;
    let y = field()?;
    let tot1 = field()?;
    let tot2 = field()?;

    if x < 1 || x > i64::from(FE_COLS) || y < 1 || y > i64::from(FE_ROWS) {
        return Err(Error::CoordinateOutOfRange { x, y });
    }
    for tot in [tot1, tot2] {
        if !(0..=15).contains(&tot) {
            return Err(Error::TotCodeOutOfRange(tot));
        }
    }

    Ok(LineKind::DataRecord {
        x: x as u16,
        y: y as u16,
        tot1: tot1 as u8,
        tot2: tot2 as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_markers() {
        assert_eq!(classify_line("DH 0 15").unwrap(), LineKind::DataHeader);
        assert_eq!(classify_line("TD 3").unwrap(), LineKind::TriggerData);
        assert_eq!(classify_line("CHANNEL 2").unwrap(), LineKind::Channel);
        assert_eq!(classify_line("XY foo").unwrap(), LineKind::Unrecognized);
        assert_eq!(classify_line("").unwrap(), LineKind::Unrecognized);
    }

    #[test]
    fn test_parse_data_record() {
        let kind = classify_line("DR 3 5 2 14").unwrap();
        assert_eq!(
            kind,
            LineKind::DataRecord {
                x: 3,
                y: 5,
                tot1: 2,
                tot2: 14
            }
        );
    }

    #[test]
    fn test_parse_short_record_fails() {
        assert!(matches!(
            classify_line("DR 3 5 2"),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_parse_non_numeric_record_fails() {
        assert!(matches!(
            classify_line("DR 3 five 2 14"),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_parse_out_of_range_fields() {
        assert!(matches!(
            classify_line("DR 81 5 2 14"),
            Err(Error::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            classify_line("DR 3 337 2 14"),
            Err(Error::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            classify_line("DR 3 5 16 14"),
            Err(Error::TotCodeOutOfRange(16))
        ));
        assert!(matches!(
            classify_line("DR 3 5 2 -1"),
            Err(Error::TotCodeOutOfRange(-1))
        ));
    }
}
