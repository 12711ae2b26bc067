//! Element catalog - element types and the matching relation
//!
//! Each type declares the types it matches with as a directed list of names.
//! The catalog closes that relation under symmetry, so `matches(a, b)` and
//! `matches(b, a)` always agree. Every type must list itself.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ElementId, MAX_ELEMENT_TYPES};

const STANDARD_NAMES: [&str; 8] = [
    "red", "green", "blue", "yellow", "purple", "orange", "white", "black",
];

/// One element type as declared in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementType {
    pub name: String,
    /// Material / sprite reference handed to the visual layer
    #[serde(default)]
    pub material: String,
    /// Particle effect played when an element of this type is collected
    #[serde(default)]
    pub effect_tag: String,
    #[serde(default)]
    pub matches_with: Vec<String>,
}

impl ElementType {
    /// Type that matches only itself
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            material: name.clone(),
            effect_tag: format!("{name}_burst"),
            matches_with: vec![name.clone()],
            name,
        }
    }

    /// Also match `other` (the catalog mirrors the relation)
    pub fn matching(mut self, other: impl Into<String>) -> Self {
        self.matches_with.push(other.into());
        self
    }
}

/// Validated set of element types with a precomputed symmetric match table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementCatalog {
    types: Vec<ElementType>,
    masks: Vec<u64>,
}

impl ElementCatalog {
    pub fn new(types: Vec<ElementType>) -> Result<Self, ConfigError> {
        if types.is_empty() {
            return Err(ConfigError::NoElementTypes);
        }
        if types.len() > MAX_ELEMENT_TYPES {
            return Err(ConfigError::TooManyElementTypes {
                count: types.len(),
                max: MAX_ELEMENT_TYPES,
            });
        }
        for (i, t) in types.iter().enumerate() {
            if types[..i].iter().any(|other| other.name == t.name) {
                return Err(ConfigError::DuplicateElementType(t.name.clone()));
            }
            if !t.matches_with.iter().any(|m| *m == t.name) {
                return Err(ConfigError::MissingSelfMatch(t.name.clone()));
            }
        }

        let mut masks = vec![0u64; types.len()];
        for (i, t) in types.iter().enumerate() {
            for name in &t.matches_with {
                let j = types.iter().position(|o| o.name == *name).ok_or_else(|| {
                    ConfigError::UnknownElementType {
                        owner: t.name.clone(),
                        name: name.clone(),
                    }
                })?;
                masks[i] |= 1u64 << j;
                masks[j] |= 1u64 << i;
            }
        }

        Ok(Self { types, masks })
    }

    /// `count` self-matching types with stock names
    pub fn standard(count: usize) -> Result<Self, ConfigError> {
        Self::new(standard_types(count))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementType> {
        self.types.get(id.index())
    }

    pub fn id_of(&self, name: &str) -> Option<ElementId> {
        self.types
            .iter()
            .position(|t| t.name == name)
            .map(|i| ElementId(i as u8))
    }

    pub fn ids(&self) -> impl Iterator<Item = ElementId> {
        (0..self.types.len() as u8).map(ElementId)
    }

    pub fn types(&self) -> &[ElementType] {
        &self.types
    }

    /// Symmetric match relation; unknown ids never match
    #[inline]
    pub fn matches(&self, a: ElementId, b: ElementId) -> bool {
        self.masks
            .get(a.index())
            .is_some_and(|&mask| b.index() < 64 && mask & (1u64 << b.index()) != 0)
    }
}

/// Stock type list used by the default configuration
pub fn standard_types(count: usize) -> Vec<ElementType> {
    (0..count)
        .map(|i| match STANDARD_NAMES.get(i) {
            Some(name) => ElementType::new(*name),
            None => ElementType::new(format!("type{i}")),
        })
        .collect()
}
