//! Roster with positional bit identity. Each unit's bit index is its position in the
//! roster, so team identity and overlap checks are single integer operations.

use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::data::unit::Unit;
use crate::error::{PlannerError, Result};

/// Largest roster a [UnitMask] can index.
pub const MAX_ROSTER_SIZE: usize = 128;

pub const TEAM_LABEL_SEPARATOR: &str = " / ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitMask(u128);

impl UnitMask {
    pub const EMPTY: UnitMask = UnitMask(0);

    pub fn single(index: usize) -> Self {
        debug_assert!(index < MAX_ROSTER_SIZE);
        Self(1u128 << index)
    }

    pub fn from_indices(indices: &[usize]) -> Self {
        indices
            .iter()
            .fold(Self::EMPTY, |mask, &index| mask.with(index))
    }

    pub fn with(self, index: usize) -> Self {
        self.union(Self::single(index))
    }

    pub fn without(self, index: usize) -> Self {
        Self(self.0 & !Self::single(index).0)
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn contains(self, index: usize) -> bool {
        index < MAX_ROSTER_SIZE && self.0 & (1u128 << index) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn indices(self) -> impl Iterator<Item = usize> {
        (0..MAX_ROSTER_SIZE).filter(move |&index| self.contains(index))
    }
}

#[derive(Debug, Clone)]
pub struct Roster {
    units: Vec<Arc<Unit>>,
}

impl Roster {
    pub fn new(units: Vec<Unit>) -> Result<Self> {
        if units.len() > MAX_ROSTER_SIZE {
            return Err(PlannerError::RosterTooLarge {
                max: MAX_ROSTER_SIZE,
                found: units.len(),
            });
        }
        for (index, unit) in units.iter().enumerate() {
            if units[..index].iter().any(|earlier| earlier.id == unit.id) {
                return Err(PlannerError::InvalidUnit {
                    name: unit.name.clone(),
                    reason: format!("duplicate id '{}'", unit.id),
                });
            }
        }
        Ok(Self {
            units: units.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Arc<Unit>] {
        &self.units
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Unit>> {
        self.units.get(index)
    }

    /// Index by id or case-insensitive name.
    pub fn index_of(&self, name_or_id: &str) -> Option<usize> {
        self.units.iter().position(|unit| unit.is_named(name_or_id))
    }

    pub fn resolve_indices(&self, names: &[String]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                self.index_of(name)
                    .ok_or_else(|| PlannerError::UnknownUnit(name.clone()))
            })
            .collect()
    }

    pub fn all_mask(&self) -> UnitMask {
        (0..self.units.len()).fold(UnitMask::EMPTY, UnitMask::with)
    }
}

/// Two or three distinct units in canonical order (role, then name).
#[derive(Debug, Clone)]
pub struct Team {
    members: Vec<Arc<Unit>>,
    indices: Vec<usize>,
    mask: UnitMask,
    label: String,
    flex_member: Option<usize>,
}

impl Team {
    /// Build a team from roster positions. Indices must be distinct and in range.
    pub fn new(roster: &Roster, indices: &[usize]) -> Self {
        Self::build(roster, indices, None)
    }

    /// Extend a pair with a flex unit that bypassed the join check.
    pub fn with_flex(roster: &Roster, pair: &Team, flex_index: usize) -> Self {
        let mut indices = pair.indices.clone();
        indices.push(flex_index);
        Self::build(roster, &indices, Some(flex_index))
    }

    fn build(roster: &Roster, indices: &[usize], flex_member: Option<usize>) -> Self {
        let mut ordered: Vec<usize> = indices.to_vec();
        ordered.sort_by(|&left, &right| {
            let (left, right) = (&roster.units[left], &roster.units[right]);
            left.role
                .cmp(&right.role)
                .then_with(|| left.name.cmp(&right.name))
        });
        ordered.dedup();

        let members: Vec<Arc<Unit>> = ordered
            .iter()
            .map(|&index| Arc::clone(&roster.units[index]))
            .collect();
        let label = members
            .iter()
            .map(|unit| unit.name.as_str())
            .collect::<Vec<_>>()
            .join(TEAM_LABEL_SEPARATOR);

        Self {
            mask: UnitMask::from_indices(&ordered),
            members,
            indices: ordered,
            label,
            flex_member,
        }
    }

    pub fn members(&self) -> &[Arc<Unit>] {
        &self.members
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn mask(&self) -> UnitMask {
        self.mask
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn flex_member(&self) -> Option<usize> {
        self.flex_member
    }

    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|unit| unit.name.as_str()).collect()
    }
}

impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        self.mask == other.mask
    }
}

impl Eq for Team {}

impl Serialize for Team {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Team", 3)?;
        state.serialize_field("label", &self.label)?;
        state.serialize_field("members", &self.names())?;
        let flex = self
            .flex_member
            .and_then(|index| self.indices.iter().position(|&member| member == index))
            .map(|position| self.members[position].name.as_str());
        state.serialize_field("flex", &flex)?;
        state.end()
    }
}
