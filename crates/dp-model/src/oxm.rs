//! In-memory OXM match representation.
//!
//! This is the pipeline's own shape for "the TLV encoding of match fields"
//! (see the glossary entry for OXM): an ordered list of typed field
//! constraints. Wire-level (de)serialization of OXM TLVs is a collaborator's
//! job (message parsing is out of scope for this crate); here we only need
//! enough structure to validate and compare matches.

use serde::{Deserialize, Serialize};

/// Canonical field ids used by the in-memory adapters to look fields up in
/// a packet's `HandleStd::fields` map. Real OXM field numbers are a wire
/// concern (out of scope, §1); these only need to be internally
/// consistent between a packet's parsed fields and a table's matches.
pub const FIELD_ETH_DST: u32 = 1;
pub const FIELD_ETH_SRC: u32 = 2;
pub const FIELD_IPV4_DST: u32 = 3;

/// A single field constraint inside a match.
///
/// `Ipv4DstMasked` and `Ipv4Dst` are kept as distinct variants (rather than
/// one variant with an `Option<mask>`) because the longest-prefix-match
/// table (table 61) treats exact vs. masked `IPV4_DST` as different
/// acceptance rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OxmField {
    EthDst([u8; 6]),
    EthSrc([u8; 6]),
    Ipv4Dst(u32),
    Ipv4DstMasked { value: u32, mask: u32 },
    /// Catch-all for fields this crate doesn't need to reason about
    /// specifically (e.g. transport ports, VLAN tags).
    Opaque { field_id: u32, value: Vec<u8> },
}

impl OxmField {
    pub fn is_eth_dst(&self) -> bool {
        matches!(self, OxmField::EthDst(_))
    }

    pub fn is_eth_src(&self) -> bool {
        matches!(self, OxmField::EthSrc(_))
    }

    /// Swaps `ETH_DST` for `ETH_SRC` and vice versa, keeping the address
    /// value. Used by the table 62 -> 63 sibling synchronization.
    pub fn transpose_eth(&self) -> OxmField {
        match self {
            OxmField::EthDst(addr) => OxmField::EthSrc(*addr),
            OxmField::EthSrc(addr) => OxmField::EthDst(*addr),
            other => other.clone(),
        }
    }
}

/// An ordered set of field constraints. Order is preserved from insertion;
/// no two OpenFlow TLVs with the same field id are expected, but nothing
/// here enforces that (it isn't relevant to the invariants this crate
/// implements).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    fields: Vec<OxmField>,
}

impl Match {
    pub fn new(fields: Vec<OxmField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[OxmField] {
        &self.fields
    }

    /// An empty OXM list, i.e. a match of minimal length (<= 4 bytes in the
    /// wire encoding). Combined with priority 0 this identifies a
    /// table-miss entry.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn find_ipv4_dst(&self) -> Option<&OxmField> {
        self.fields.iter().find(|f| matches!(f, OxmField::Ipv4Dst(_) | OxmField::Ipv4DstMasked { .. }))
    }

    /// Returns a clone of this match with every `ETH_DST` transposed to
    /// `ETH_SRC` and vice versa. Non-Ethernet fields are left untouched.
    pub fn transposed_eth(&self) -> Match {
        Match::new(self.fields.iter().map(OxmField::transpose_eth).collect())
    }
}

/// Returns the number of leading 1-bits in `mask`, or `None` if `mask` has a
/// 0-bit followed later by a 1-bit (a "hole"), which makes it an invalid
/// prefix mask.
pub fn prefix_len(mask: u32) -> Option<u32> {
    let leading = mask.leading_ones();
    if leading == 32 {
        return Some(32);
    }
    let rest = mask << leading;
    if rest == 0 {
        Some(leading)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_len_accepts_the_fully_specified_mask() {
        assert_eq!(prefix_len(0xFFFF_FFFF), Some(32));
    }

    #[test]
    fn prefix_len_rejects_a_mask_with_a_hole() {
        assert_eq!(prefix_len(0xFF00_FF00), None);
    }
}
