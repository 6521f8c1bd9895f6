//! Library version stamps carried by every chunk header

use std::fmt;

/// Expand a raw library stamp into the packed `0xMmmrr` form.
///
/// Newer files store the version in the upper 16 bits alongside a build
/// number. Older files store only a small version number, which is shifted
/// up by 8 so both eras compare on the same scale.
pub fn expand_version(raw: u32) -> u32 {
    if raw & 0xFFFF_0000 != 0 {
        (((raw >> 14) & 0x3FF00) + 0x30000) | ((raw >> 16) & 0x3F)
    } else {
        raw << 8
    }
}

/// An expanded library version such as `0x36003`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraryVersion(pub u32);

impl LibraryVersion {
    /// Build from a raw header stamp
    pub fn from_raw(raw: u32) -> Self {
        Self(expand_version(raw))
    }

    pub fn major(self) -> u32 {
        (self.0 >> 16) & 0xF
    }

    pub fn minor(self) -> u32 {
        (self.0 >> 12) & 0xF
    }

    pub fn revision(self) -> u32 {
        (self.0 >> 8) & 0xF
    }

    pub fn patch(self) -> u32 {
        self.0 & 0xFF
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major(),
            self.minor(),
            self.revision(),
            self.patch()
        )
    }
}
