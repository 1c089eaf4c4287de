use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Attribute flags of a directory entry
///
/// Bit values follow the Windows file attribute constants so that platform
/// metadata can be carried over unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FileAttributes(u32);

impl FileAttributes {
    pub const READ_ONLY: Self = Self(0x1);
    pub const HIDDEN: Self = Self(0x2);
    pub const SYSTEM: Self = Self(0x4);
    pub const DIRECTORY: Self = Self(0x10);
    pub const ARCHIVE: Self = Self(0x20);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// All flags of `other` are set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// At least one flag of `other` is set
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for FileAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FileAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Debug for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(FileAttributes, &str); 5] = [
            (FileAttributes::READ_ONLY, "READ_ONLY"),
            (FileAttributes::HIDDEN, "HIDDEN"),
            (FileAttributes::SYSTEM, "SYSTEM"),
            (FileAttributes::DIRECTORY, "DIRECTORY"),
            (FileAttributes::ARCHIVE, "ARCHIVE"),
        ];

        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "FileAttributes({})", set.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut attrs = FileAttributes::empty();
        attrs.insert(FileAttributes::HIDDEN);
        attrs |= FileAttributes::SYSTEM;
        assert!(attrs.contains(FileAttributes::HIDDEN | FileAttributes::SYSTEM));

        attrs.remove(FileAttributes::HIDDEN);
        assert!(!attrs.intersects(FileAttributes::HIDDEN));
        assert!(attrs.intersects(FileAttributes::HIDDEN | FileAttributes::SYSTEM));
    }

    #[test]
    fn test_debug_lists_flags() {
        let attrs = FileAttributes::HIDDEN | FileAttributes::READ_ONLY;
        assert_eq!(format!("{:?}", attrs), "FileAttributes(READ_ONLY | HIDDEN)");
    }
}
