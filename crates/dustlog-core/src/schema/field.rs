//! Record fields and field sets

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value slot a record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// X coordinate of the bot's current target node
    TargetX,
    /// Y coordinate of the bot's current target node
    TargetY,
    /// Car location, i component
    CarX,
    /// Car location, j component
    CarY,
    /// Continuous target heading (degrees)
    TargetAngle,
    /// Continuous current heading (degrees)
    CurrentAngle,
    /// Steering target angle from the single-line steering log
    SteerAngle,
    /// Steering current angle from the single-line steering log
    SteerCurrent,
    /// Target minus current heading
    Diff,
    /// Control (steering) input
    Control,
}

impl Field {
    /// Every field, in column order
    pub const ALL: [Field; 10] = [
        Field::TargetX,
        Field::TargetY,
        Field::CarX,
        Field::CarY,
        Field::TargetAngle,
        Field::CurrentAngle,
        Field::SteerAngle,
        Field::SteerCurrent,
        Field::Diff,
        Field::Control,
    ];

    /// Column name used in exports
    pub fn name(&self) -> &'static str {
        match self {
            Field::TargetX => "target_x",
            Field::TargetY => "target_y",
            Field::CarX => "car_x",
            Field::CarY => "car_y",
            Field::TargetAngle => "target_angle",
            Field::CurrentAngle => "current_angle",
            Field::SteerAngle => "steer_angle",
            Field::SteerCurrent => "steer_current",
            Field::Diff => "diff",
            Field::Control => "control",
        }
    }

    /// Look a field up by its column name
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of fields, used for "seen so far" and "required"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct FieldSet(u16);

impl FieldSet {
    /// The empty set
    pub const fn empty() -> Self {
        FieldSet(0)
    }

    /// Build a set from a slice of fields
    pub fn from_fields(fields: &[Field]) -> Self {
        fields.iter().copied().collect()
    }

    /// Add a field; returns `true` if it was not already present
    pub fn insert(&mut self, field: Field) -> bool {
        let was_new = !self.contains(field);
        self.0 |= field.bit();
        was_new
    }

    /// Check membership
    pub fn contains(&self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    /// Number of fields in the set
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Union of two sets
    pub fn union(self, other: FieldSet) -> FieldSet {
        FieldSet(self.0 | other.0)
    }

    /// Remove every field
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Fields in column order
    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = FieldSet::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}
