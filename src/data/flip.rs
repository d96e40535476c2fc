//! Flip flags packed into the high bits of a raw tile identifier

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Mask selecting the renderable identifier from a raw GID
pub const GID_MASK: u32 = 0x1FFF_FFFF;

/// Per-tile mirroring flags, stored in the three highest bits of a raw GID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flip(u32);

impl Flip {
    /// No mirroring
    pub const NONE: Flip = Flip(0);
    /// Bit 31
    pub const HORIZONTAL: Flip = Flip(0x8000_0000);
    /// Bit 30
    pub const VERTICAL: Flip = Flip(0x4000_0000);
    /// Bit 29 (anti-diagonal, i.e. x/y swap)
    pub const DIAGONAL: Flip = Flip(0x2000_0000);

    const ALL: u32 = !GID_MASK;

    /// Split a raw identifier into its clean GID and flip flags
    ///
    /// Total: every `u32` decomposes.
    ///
    /// ```rust
    /// use tmx_reader::data::Flip;
    ///
    /// let (gid, flip) = Flip::decompose(0x6000_00EB);
    /// assert_eq!(gid, 235);
    /// assert_eq!(flip, Flip::VERTICAL | Flip::DIAGONAL);
    /// ```
    pub const fn decompose(raw: u32) -> (u32, Flip) {
        (raw & GID_MASK, Flip(raw & Self::ALL))
    }

    /// Pack a clean GID and flip flags back into a raw identifier
    pub const fn compose(gid: u32, flip: Flip) -> u32 {
        (gid & GID_MASK) | flip.0
    }

    /// The raw bit pattern of these flags
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Flip) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn horizontal(self) -> bool {
        self.contains(Self::HORIZONTAL)
    }

    pub const fn vertical(self) -> bool {
        self.contains(Self::VERTICAL)
    }

    pub const fn diagonal(self) -> bool {
        self.contains(Self::DIAGONAL)
    }
}

impl BitOr for Flip {
    type Output = Flip;

    fn bitor(self, rhs: Flip) -> Flip {
        Flip(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flip {
    fn bitor_assign(&mut self, rhs: Flip) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Flip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        let names = [
            (Self::HORIZONTAL, "H"),
            (Self::VERTICAL, "V"),
            (Self::DIAGONAL, "D"),
        ];
        for (flag, name) in names {
            if self.contains(flag) {
                f.write_str(name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_vertical_diagonal() {
        let raw = 235 | 0x4000_0000 | 0x2000_0000;
        let (gid, flip) = Flip::decompose(raw);
        assert_eq!(gid, 235);
        assert_eq!(flip, Flip::VERTICAL | Flip::DIAGONAL);
        assert!(!flip.horizontal());
        assert!(flip.vertical());
        assert!(flip.diagonal());
    }

    #[test]
    fn test_decompose_plain_gid() {
        let (gid, flip) = Flip::decompose(356);
        assert_eq!(gid, 356);
        assert!(flip.is_empty());
    }

    #[test]
    fn test_compose_inverts_decompose_for_all_flag_combinations() {
        let flags = [Flip::HORIZONTAL, Flip::VERTICAL, Flip::DIAGONAL];
        for gid in [0, 1, 235, 4096, GID_MASK] {
            for mask in 0..8u32 {
                let mut flip = Flip::NONE;
                for (bit, flag) in flags.iter().enumerate() {
                    if mask & (1 << bit) != 0 {
                        flip |= *flag;
                    }
                }
                let raw = Flip::compose(gid, flip);
                assert_eq!(Flip::decompose(raw), (gid, flip));
                assert_eq!(Flip::compose(Flip::decompose(raw).0, Flip::decompose(raw).1), raw);
            }
        }
    }

    #[test]
    fn test_compose_clears_stray_high_bits_in_gid() {
        assert_eq!(Flip::compose(0xFFFF_FFFF, Flip::NONE), GID_MASK);
    }

    #[test]
    fn test_display() {
        assert_eq!(Flip::NONE.to_string(), "-");
        assert_eq!((Flip::HORIZONTAL | Flip::DIAGONAL).to_string(), "HD");
    }
}
