//! Interface identifiers.
//!
//! An [`Iid`] names one capability contract. Identifiers are fixed at
//! compile time and never reused once shipped.

use std::fmt;

use uuid::Uuid;

/// A stable 128-bit interface identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iid(Uuid);

impl Iid {
    /// Build an identifier from its 128-bit value.
    pub const fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for Iid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Registry format: {xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}
        write!(f, "{{{}}}", self.0.hyphenated())
    }
}

/// Base capability every object supports.
pub const IID_IUNKNOWN: Iid = Iid::from_u128(0x00000000_0000_0000_c000_000000000046);

pub const IID_IMENU: Iid = Iid::from_u128(0x2e2cda0a_9fae_4331_8f2e_6f0c6d3b8a01);

pub const IID_IMENU_ITEM: Iid = Iid::from_u128(0xf229d1e6_1b40_4c2c_9d77_3a5b0d1e2c02);

pub const IID_IACTION_CALLBACK: Iid = Iid::from_u128(0x04c1b049_6f1d_4f8b_a8e4_5d1f7c9e4d03);

pub const IID_IPREDICATE_CALLBACK: Iid = Iid::from_u128(0x8d2b4c6a_30e5_4f71_b6a2_c41e9f0a7e04);

pub const IID_IMENU_EVENTS: Iid = Iid::from_u128(0x5f7e9a1c_c2d4_4e8b_91a3_0b6d8e2f4c05);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_braced_hyphenated_form() {
        assert_eq!(
            IID_IUNKNOWN.to_string(),
            "{00000000-0000-0000-c000-000000000046}"
        );
    }

    #[test]
    fn test_well_known_identifiers_are_distinct() {
        let all = [
            IID_IUNKNOWN,
            IID_IMENU,
            IID_IMENU_ITEM,
            IID_IACTION_CALLBACK,
            IID_IPREDICATE_CALLBACK,
            IID_IMENU_EVENTS,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_u128_round_trip() {
        assert_eq!(
            Iid::from_u128(IID_IMENU.as_u128()),
            IID_IMENU
        );
    }
}
