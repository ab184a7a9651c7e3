use core::fmt;
use core::str::FromStr;

use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

use bitflags::bitflags;

/// Grammatical role of a morpheme inside a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Role {
    Prefix = 0,
    Root = 1,
    Suffix = 2,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Prefix => "prefix",
            Role::Root => "root",
            Role::Suffix => "suffix",
        }
    }

    /// The single-bit set for this role.
    pub const fn bit(self) -> RoleSet {
        match self {
            Role::Prefix => RoleSet::PREFIX,
            Role::Root => RoleSet::ROOT,
            Role::Suffix => RoleSet::SUFFIX,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [Role::Prefix, Role::Root, Role::Suffix]
            .into_iter()
            .find(|role| s.eq_ignore_ascii_case(role.as_str()))
            .ok_or(ParseTagError::Role)
    }
}

/// Difficulty tier. Partitions the word catalog into disjoint lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Difficulty {
    Easy = 0,
    Medium = 1,
    Hard = 2,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseTagError;

    /// Case-insensitive: "Medium", "medium" and "MEDIUM" all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Difficulty::ALL
            .into_iter()
            .find(|d| s.eq_ignore_ascii_case(d.as_str()))
            .ok_or(ParseTagError::Difficulty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseTagError {
    Role,
    Difficulty,
}

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseTagError::Role => f.write_str("expected one of: prefix, root, suffix"),
            ParseTagError::Difficulty => f.write_str("expected one of: Easy, Medium, Hard"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseTagError {}

bitflags! {
    /// A set of roles, used to filter catalog queries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct RoleSet: u8 {
        const PREFIX = 1;
        const ROOT = 2;
        const SUFFIX = 4;

        const AFFIX = Self::PREFIX.bits() | Self::SUFFIX.bits();
    }
}

impl RoleSet {
    pub fn has(self, role: Role) -> bool {
        self.contains(role.bit())
    }
}
