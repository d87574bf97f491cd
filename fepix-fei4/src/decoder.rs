//! ToT decoders for the three discriminator configurations.

use crate::record::{cantor_pair, RawRecord, TOT_CODE_NO_HIT, TOT_CODE_SMALL_OR_DELAYED};
use fepix_core::{CalibrationTable, PixelCoord, PixelHit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hardware discriminator configuration (HitDiscCnfg).
///
/// Selects which ToT-code-to-true-ToT mapping applies. The configuration is
/// a property of the run, chosen once before decoding starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitDiscCnfg {
    /// Codes 0-13 map to code + 1; code 14 announces a delayed hit.
    Cnfg0,
    /// Codes map to code + 2; code 14 is the degenerate true ToT 1.
    Cnfg1,
    /// Codes map to code + 3; code 14 is the degenerate true ToT 1,
    /// flagged as a small-ToT hit.
    Cnfg2,
}

/// Hits decoded from one trigger window.
#[derive(Debug, Clone, Default)]
pub struct DecodedWindow {
    /// Physical hits, in record order.
    pub hits: Vec<PixelHit>,
    /// Hit slots rejected as data corruption (outside the calibrated grid).
    pub rejected: usize,
}

impl DecodedWindow {
    fn emit(&mut self, hit: fepix_core::Result<PixelHit>) {
        match hit {
            Ok(hit) => self.hits.push(hit),
            Err(_) => self.rejected += 1,
        }
    }
}

/// Window-scoped bookkeeping for the delayed-hit protocol (HitDiscCnfg 0).
///
/// A record with second-slot code 14 announces that the hit at `(x, y + 1)`
/// belongs to the announcing record's lvl1 but will be reported by a later
/// record. The ledger lives for exactly one decode call.
#[derive(Debug, Default)]
struct DelayedHitLedger {
    pending: HashMap<u32, u32>,
}

impl DelayedHitLedger {
    fn announce(&mut self, coord: PixelCoord, lvl1: u32) {
        self.pending
            .insert(cantor_pair(u32::from(coord.x), u32::from(coord.y)), lvl1);
    }

    fn consume(&mut self, coord: PixelCoord) -> Option<u32> {
        self.pending
            .remove(&cantor_pair(u32::from(coord.x), u32::from(coord.y)))
    }
}

/// Decoder from raw data records to physical hits.
#[derive(Debug, Clone, Copy)]
pub struct TotDecoder {
    cnfg: HitDiscCnfg,
}

impl TotDecoder {
    /// Creates a decoder for the given discriminator configuration.
    #[must_use]
    pub fn new(cnfg: HitDiscCnfg) -> Self {
        Self { cnfg }
    }

    /// Returns the discriminator configuration this decoder applies.
    #[must_use]
    pub fn cnfg(&self) -> HitDiscCnfg {
        self.cnfg
    }

    /// Decodes one trigger window's records into hits.
    ///
    /// A record yields up to two hits: one at `(x, y)` from `tot1`, and one
    /// at `(x, y + 1)` from `tot2` unless the second slot carries the no-hit
    /// code. Hits that would land outside the calibrated grid are rejected
    /// and counted, never clamped.
    #[must_use]
    pub fn decode_window(
        &self,
        records: &[RawRecord],
        calibration: &CalibrationTable,
    ) -> DecodedWindow {
        match self.cnfg {
            HitDiscCnfg::Cnfg0 => Self::decode_cnfg0(records, calibration),
            HitDiscCnfg::Cnfg1 => Self::decode_stateless(records, calibration, 2, false),
            HitDiscCnfg::Cnfg2 => Self::decode_stateless(records, calibration, 3, true),
        }
    }

    /// HitDiscCnfg 0: codes map to code + 1, with the delayed-hit protocol
    /// threaded through a window-local ledger.
    fn decode_cnfg0(records: &[RawRecord], calibration: &CalibrationTable) -> DecodedWindow {
        let mut out = DecodedWindow::default();
        let mut ledger = DelayedHitLedger::default();

        for record in records {
            let first = PixelCoord::new(record.x, record.y);
            if record.tot2 == TOT_CODE_NO_HIT {
                // A pending announcement for this pixel carries the lvl1 of
                // the record that made it; the announcement is consumed.
                let lvl1 = ledger.consume(first).unwrap_or(record.lvl1);
                out.emit(PixelHit::new(
                    first,
                    u16::from(record.tot1) + 1,
                    lvl1,
                    calibration,
                ));
            } else if record.tot2 == TOT_CODE_SMALL_OR_DELAYED {
                // Announcement only; the hit itself arrives in a later
                // record. Note the stored key is the neighbour row.
                ledger.announce(PixelCoord::new(record.x, record.y + 1), record.lvl1);
            } else {
                out.emit(PixelHit::new(
                    first,
                    u16::from(record.tot1) + 1,
                    record.lvl1,
                    calibration,
                ));
                out.emit(PixelHit::new(
                    PixelCoord::new(record.x, record.y + 1),
                    u16::from(record.tot2) + 1,
                    record.lvl1,
                    calibration,
                ));
            }
        }
        out
    }

    /// HitDiscCnfg 1 and 2: no cross-record state. Code 14 is the degenerate
    /// true ToT 1; every other code maps to code + offset.
    fn decode_stateless(
        records: &[RawRecord],
        calibration: &CalibrationTable,
        offset: u16,
        track_small: bool,
    ) -> DecodedWindow {
        let mut out = DecodedWindow::default();

        for record in records {
            let (tot, small) = Self::true_tot(record.tot1, offset);
            out.emit(PixelHit::with_small_tot(
                PixelCoord::new(record.x, record.y),
                tot,
                record.lvl1,
                small && track_small,
                calibration,
            ));

            if record.tot2 != TOT_CODE_NO_HIT {
                let (tot, small) = Self::true_tot(record.tot2, offset);
                out.emit(PixelHit::with_small_tot(
                    PixelCoord::new(record.x, record.y + 1),
                    tot,
                    record.lvl1,
                    small && track_small,
                    calibration,
                ));
            }
        }
        out
    }

    fn true_tot(code: u8, offset: u16) -> (u16, bool) {
        if code == TOT_CODE_SMALL_OR_DELAYED {
            (1, true)
        } else {
            (u16::from(code) + offset, false)
        }
    }
}
