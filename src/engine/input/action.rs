// Action definitions and the action catalog

use super::InputError;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The shape of value an action carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Digital on/off (`bool`)
    Button,
    /// One-dimensional analog value (`f32`, usually `[-1, 1]`)
    Axis,
    /// Two-dimensional analog value (`Vec2`)
    Vector,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Button => "button",
            ActionKind::Axis => "axis",
            ActionKind::Vector => "vector",
        };
        f.write_str(name)
    }
}

/// Current value of an action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionValue {
    Button(bool),
    Axis(f32),
    Vector(Vec2),
}

impl ActionValue {
    /// The resting value for an action kind (`false`, `0.0`, `(0, 0)`)
    pub fn default_for(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Button => ActionValue::Button(false),
            ActionKind::Axis => ActionValue::Axis(0.0),
            ActionKind::Vector => ActionValue::Vector(Vec2::ZERO),
        }
    }

    /// Kind of this value
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionValue::Button(_) => ActionKind::Button,
            ActionValue::Axis(_) => ActionKind::Axis,
            ActionValue::Vector(_) => ActionKind::Vector,
        }
    }

    /// Whether this value counts as "down"
    ///
    /// Button: the value itself. Axis: non-zero. Vector: either component non-zero.
    pub fn is_active(&self) -> bool {
        match *self {
            ActionValue::Button(pressed) => pressed,
            ActionValue::Axis(value) => value != 0.0,
            ActionValue::Vector(value) => value.x != 0.0 || value.y != 0.0,
        }
    }

    pub fn as_button(&self) -> Option<bool> {
        match *self {
            ActionValue::Button(pressed) => Some(pressed),
            _ => None,
        }
    }

    pub fn as_axis(&self) -> Option<f32> {
        match *self {
            ActionValue::Axis(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<Vec2> {
        match *self {
            ActionValue::Vector(value) => Some(value),
            _ => None,
        }
    }
}

impl From<bool> for ActionValue {
    fn from(value: bool) -> Self {
        ActionValue::Button(value)
    }
}

impl From<f32> for ActionValue {
    fn from(value: f32) -> Self {
        ActionValue::Axis(value)
    }
}

impl From<Vec2> for ActionValue {
    fn from(value: Vec2) -> Self {
        ActionValue::Vector(value)
    }
}

/// A named, device-independent action
///
/// Immutable once constructed; the initial value always matches the kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDefinition {
    name: String,
    kind: ActionKind,
    initial_value: ActionValue,
}

impl ActionDefinition {
    /// Create an action with the resting value for its kind
    pub fn new(name: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            initial_value: ActionValue::default_for(kind),
        }
    }

    /// Create a button action
    pub fn button(name: impl Into<String>) -> Self {
        Self::new(name, ActionKind::Button)
    }

    /// Create an axis action
    pub fn axis(name: impl Into<String>) -> Self {
        Self::new(name, ActionKind::Axis)
    }

    /// Create a vector action
    pub fn vector(name: impl Into<String>) -> Self {
        Self::new(name, ActionKind::Vector)
    }

    /// Replace the initial value, rejecting values of the wrong kind
    pub fn with_initial_value(mut self, value: impl Into<ActionValue>) -> Result<Self, InputError> {
        let value = value.into();
        if value.kind() != self.kind {
            return Err(InputError::InvalidInitialValue {
                name: self.name,
                expected: self.kind,
            });
        }
        self.initial_value = value;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn initial_value(&self) -> ActionValue {
        self.initial_value
    }
}

/// The set of actions an engine knows about, keyed by unique name
///
/// Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: Vec<ActionDefinition>,
    index: HashMap<String, usize>,
}

impl ActionCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of definitions
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = ActionDefinition>,
    ) -> Result<Self, InputError> {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition)?;
        }
        Ok(catalog)
    }

    /// Add a definition; names must be unique
    pub fn insert(&mut self, definition: ActionDefinition) -> Result<(), InputError> {
        if self.index.contains_key(definition.name()) {
            return Err(InputError::DuplicateAction(definition.name().to_string()));
        }
        self.index
            .insert(definition.name().to_string(), self.actions.len());
        self.actions.push(definition);
        Ok(())
    }

    /// Look up a definition by name
    pub fn get(&self, name: &str) -> Option<&ActionDefinition> {
        self.index.get(name).map(|&i| &self.actions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDefinition> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values_per_kind() {
        assert_eq!(ActionValue::default_for(ActionKind::Button), ActionValue::Button(false));
        assert_eq!(ActionValue::default_for(ActionKind::Axis), ActionValue::Axis(0.0));
        assert_eq!(
            ActionValue::default_for(ActionKind::Vector),
            ActionValue::Vector(Vec2::ZERO)
        );
    }

    #[test]
    fn test_is_active_rules() {
        assert!(ActionValue::Button(true).is_active());
        assert!(!ActionValue::Button(false).is_active());
        assert!(ActionValue::Axis(-0.2).is_active());
        assert!(!ActionValue::Axis(0.0).is_active());
        assert!(ActionValue::Vector(Vec2::new(0.0, 1.0)).is_active());
        assert!(!ActionValue::Vector(Vec2::ZERO).is_active());
    }

    #[test]
    fn test_definition_constructors() {
        let fire = ActionDefinition::button("fire");
        assert_eq!(fire.name(), "fire");
        assert_eq!(fire.kind(), ActionKind::Button);
        assert_eq!(fire.initial_value(), ActionValue::Button(false));

        let movement = ActionDefinition::vector("move");
        assert_eq!(movement.initial_value(), ActionValue::Vector(Vec2::ZERO));
    }

    #[test]
    fn test_initial_value_must_match_kind() {
        let ok = ActionDefinition::axis("zoom").with_initial_value(0.5);
        assert_eq!(ok.unwrap().initial_value(), ActionValue::Axis(0.5));

        let err = ActionDefinition::axis("zoom").with_initial_value(true);
        assert!(matches!(
            err,
            Err(InputError::InvalidInitialValue {
                expected: ActionKind::Axis,
                ..
            })
        ));
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let mut catalog = ActionCatalog::new();
        catalog.insert(ActionDefinition::button("fire")).unwrap();
        let err = catalog.insert(ActionDefinition::axis("fire"));
        assert!(matches!(err, Err(InputError::DuplicateAction(name)) if name == "fire"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = ActionCatalog::from_definitions([
            ActionDefinition::vector("move"),
            ActionDefinition::button("fire"),
        ])
        .unwrap();

        let names: Vec<&str> = catalog.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["move", "fire"]);
        assert!(catalog.contains("fire"));
        assert!(catalog.get("jump").is_none());
    }
}
