//! Raw data-record type and ToT-code constants.

use serde::{Deserialize, Serialize};

/// ToT code marking "no hit" in the second slot of a data record.
pub const TOT_CODE_NO_HIT: u8 = 15;

/// ToT code marking a delayed hit (HitDiscCnfg 0) or the degenerate minimum
/// ToT (HitDiscCnfg 1 and 2).
pub const TOT_CODE_SMALL_OR_DELAYED: u8 = 14;

/// One FE-I4B data record (DR) as transmitted.
///
/// A record does not necessarily correspond to a single hit: depending on the
/// discriminator configuration it can announce a delayed hit, or carry two
/// hits for the vertically neighbouring pixels `(x, y)` and `(x, y + 1)`.
/// The ToT values are ToT codes, not true ToT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Column (1-based).
    pub x: u16,
    /// Row (1-based).
    pub y: u16,
    /// ToT code of the pixel at `(x, y)`.
    pub tot1: u8,
    /// ToT code of the neighbour slot at `(x, y + 1)`.
    pub tot2: u8,
    /// Readout-header index at which the record was observed.
    pub lvl1: u32,
}

/// Cantor pairing of a coordinate pair into a single collision-free key.
///
/// Used to key the delayed-hit ledger; injective for all non-negative pairs,
/// which front-end coordinates always are.
#[inline]
#[must_use]
pub fn cantor_pair(x: u32, y: u32) -> u32 {
    y + (x + y) * (x + y + 1) / 2
}
