//! Stable notification slots for recurring items
//!
//! Rescheduling the reminder of an item must replace its previous reminder,
//! so each item id maps to a fixed slot. Slots live in a band reserved for
//! recurring items. Distinct ids may share a slot: the band is much wider than
//! the expected number of items and a shared slot only means the last
//! scheduled reminder wins.

use std::fmt;

/// First slot of the reserved band
pub const BAND_START: u32 = 200_000;
/// One past the last slot of the reserved band
pub const BAND_END: u32 = 299_999;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Identifier of a reschedulable reminder, always in `BAND_START..BAND_END`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u32);

impl SlotId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 32-bit FNV-1a over the UTF-16 code units of `s`
fn fnv1a(s: &str) -> u32 {
    s.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Slot of the item with the given id, the same for every call
pub fn derive_slot_id(id: &str) -> SlotId {
    SlotId(BAND_START + fnv1a(id) % (BAND_END - BAND_START))
}
