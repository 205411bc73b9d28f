//! Stat keys and the sparse per-stat tables shared by catalog and evaluator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::ProjectionError;

/// Closed set of character attributes.
///
/// `Mv` is special: it is never grown per level and is read directly from the
/// class occupying the final interval of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    Hp,
    Str,
    Mag,
    Dex,
    Spd,
    Lck,
    Def,
    Res,
    Cha,
    Mv,
}

impl StatKey {
    /// Every stat key, movement included, in display order.
    pub const ALL: [Self; 10] = [
        Self::Hp,
        Self::Str,
        Self::Mag,
        Self::Dex,
        Self::Spd,
        Self::Lck,
        Self::Def,
        Self::Res,
        Self::Cha,
        Self::Mv,
    ];

    /// Stats subject to per-level growth rolls.
    pub const GROWN: [Self; 9] = [
        Self::Hp,
        Self::Str,
        Self::Mag,
        Self::Dex,
        Self::Spd,
        Self::Lck,
        Self::Def,
        Self::Res,
        Self::Cha,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hp => "hp",
            Self::Str => "str",
            Self::Mag => "mag",
            Self::Dex => "dex",
            Self::Spd => "spd",
            Self::Lck => "lck",
            Self::Def => "def",
            Self::Res => "res",
            Self::Cha => "cha",
            Self::Mv => "mv",
        }
    }

    /// Whether this stat accumulates growth over level intervals.
    #[must_use]
    pub const fn is_grown(self) -> bool {
        !matches!(self, Self::Mv)
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKey {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ProjectionError::InvalidStatKey(s.to_string()))
    }
}

/// Sparse map from stat key to an integer magnitude.
///
/// Catalog JSON frequently omits keys a class or character does not care
/// about; reads of missing keys yield 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatBlock(HashMap<StatKey, i32>);

impl StatBlock {
    #[must_use]
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Read one stat, defaulting missing entries to 0.
    #[must_use]
    pub fn get(&self, stat: StatKey) -> i32 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    pub fn set(&mut self, stat: StatKey, value: i32) {
        self.0.insert(stat, value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKey, i32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(StatKey, i32)> for StatBlock {
    fn from_iter<T: IntoIterator<Item = (StatKey, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
