//! Read-only reference tables for characters and classes.
//!
//! Both catalogs arrive fully populated from the surrounding application
//! (JSON assets, typically) before any evaluation call, and are never mutated
//! or reloaded by the engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::stats::StatBlock;

/// Immutable character definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    /// Id of the class the character starts in.
    pub class: String,
    /// Percent-per-level growth contribution, additive with class growth.
    #[serde(default)]
    pub growths: StatBlock,
    /// Stats as of `base_level`, before any projected growth.
    #[serde(default)]
    pub base_stats: StatBlock,
    /// Level at which `base_stats` apply.
    #[serde(default = "default_base_level")]
    pub base_level: i32,
}

const fn default_base_level() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct CharacterNoId {
    pub name: String,
    pub class: String,
    #[serde(default)]
    pub growths: StatBlock,
    #[serde(default)]
    pub base_stats: StatBlock,
    #[serde(default = "default_base_level")]
    pub base_level: i32,
}

impl Character {
    fn with_id(id: String, c: CharacterNoId) -> Self {
        Self {
            id,
            name: c.name,
            class: c.class,
            growths: c.growths,
            base_stats: c.base_stats,
            base_level: c.base_level,
        }
    }
}

/// Immutable class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub id: String,
    pub name: String,
    /// Entry floors: a stat is raised to the class base when the class is
    /// entered, never lowered.
    #[serde(default)]
    pub bases: StatBlock,
    /// Percent-per-level growth contribution while the class is held.
    #[serde(default)]
    pub growths: StatBlock,
    /// Flat bonus applied once, from the class of the last real interval.
    #[serde(default)]
    pub boosts: StatBlock,
    /// Fixed movement value; not subject to growth.
    #[serde(default)]
    pub movement: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ClassNoId {
    pub name: String,
    #[serde(default)]
    pub bases: StatBlock,
    #[serde(default)]
    pub growths: StatBlock,
    #[serde(default)]
    pub boosts: StatBlock,
    #[serde(default)]
    pub movement: i32,
}

impl ClassDefinition {
    fn with_id(id: String, c: ClassNoId) -> Self {
        Self {
            id,
            name: c.name,
            bases: c.bases,
            growths: c.growths,
            boosts: c.boosts,
            movement: c.movement,
        }
    }
}

/// Character definitions keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterCatalog(HashMap<String, Character>);

impl CharacterCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Load characters from a JSON object keyed by character id.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into character entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: HashMap<String, CharacterNoId> = serde_json::from_str(json)?;
        Ok(Self(
            map.into_iter()
                .map(|(id, c)| (id.clone(), Character::with_id(id, c)))
                .collect(),
        ))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Character> {
        self.0.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.0.values()
    }
}

impl FromIterator<Character> for CharacterCatalog {
    fn from_iter<T: IntoIterator<Item = Character>>(iter: T) -> Self {
        Self(iter.into_iter().map(|c| (c.id.clone(), c)).collect())
    }
}

/// Class definitions keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassCatalog(HashMap<String, ClassDefinition>);

impl ClassCatalog {
    #[must_use]
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Load classes from a JSON object keyed by class id.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into class entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let map: HashMap<String, ClassNoId> = serde_json::from_str(json)?;
        Ok(Self(
            map.into_iter()
                .map(|(id, c)| (id.clone(), ClassDefinition::with_id(id, c)))
                .collect(),
        ))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ClassDefinition> {
        self.0.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.0.values()
    }
}

impl FromIterator<ClassDefinition> for ClassCatalog {
    fn from_iter<T: IntoIterator<Item = ClassDefinition>>(iter: T) -> Self {
        Self(iter.into_iter().map(|c| (c.id.clone(), c)).collect())
    }
}
