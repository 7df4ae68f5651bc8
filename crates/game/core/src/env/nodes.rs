//! Stat and resource node definitions.
//!
//! Stats and resources share one shape so a single resolution graph can hold
//! both kinds of node.

/// A stat or resource definition participating in modifier resolution.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct NodeDefinition {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<Modifier>,
    /// Per-tick regeneration for resources. `None` means the resource does not regenerate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub regen: Option<f64>,
}

impl NodeDefinition {
    pub fn new(id: impl Into<String>, base: f64) -> Self {
        Self {
            id: id.into(),
            base,
            modifiers: Vec::new(),
            regen: None,
        }
    }

    /// Adds a flat modifier targeting another node (builder pattern).
    pub fn with_modifier(mut self, target_id: impl Into<String>, value: f64) -> Self {
        self.modifiers.push(Modifier::flat(target_id, value));
        self
    }

    /// Sets the per-tick regeneration amount (builder pattern).
    pub fn with_regen(mut self, regen: f64) -> Self {
        self.regen = Some(regen);
        self
    }
}

/// "Source value times `value`, added to `target_id`."
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Modifier {
    #[cfg_attr(feature = "serde", serde(default))]
    pub target_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: ModifierKind,
}

impl Modifier {
    pub fn flat(target_id: impl Into<String>, value: f64) -> Self {
        Self {
            target_id: target_id.into(),
            value,
            kind: ModifierKind::Flat,
        }
    }

    /// Malformed modifiers (no target, non-finite value, unknown kind) never propagate.
    pub fn is_applicable(&self) -> bool {
        self.kind == ModifierKind::Flat && !self.target_id.is_empty() && self.value.is_finite()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModifierKind {
    #[default]
    Flat,
    /// Any kind this version does not understand.
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}
