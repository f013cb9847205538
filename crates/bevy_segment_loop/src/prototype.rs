//! Segment prototype registry.
//!
//! Holds the immutable length metadata for every segment kind. The special
//! sub-segment of a prototype is resolved here once, from data, instead of
//! being searched for in the scene graph at runtime.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::LoopConfig;
use crate::error::ConfigurationError;

/// Name of a segment prototype.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentKind(String);

impl SegmentKind {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Default for SegmentKind {
  fn default() -> Self {
    Self::new("chunk")
  }
}

impl fmt::Display for SegmentKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for SegmentKind {
  fn from(name: &str) -> Self {
    Self::new(name)
  }
}

/// Immutable geometry metadata of one prototype.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSpec {
  /// Length along the travel axis.
  pub length: f32,
  /// Offset from the prototype's anchor to its special sub-segment, if any.
  pub special_offset: Option<f32>,
}

impl SegmentSpec {
  pub fn new(length: f32) -> Self {
    Self {
      length,
      special_offset: None,
    }
  }

  pub fn with_special_offset(mut self, offset: f32) -> Self {
    self.special_offset = Some(offset);
    self
  }
}

/// Read-only (after setup) lookup of prototype specs by kind.
#[derive(Clone, Debug, Default)]
pub struct PrototypeRegistry {
  specs: HashMap<SegmentKind, SegmentSpec>,
}

impl PrototypeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Builds the registry implied by a loop configuration: the pooled kind and,
  /// when configured, the special kind.
  pub fn from_config(config: &LoopConfig) -> Result<Self, ConfigurationError> {
    let mut registry = Self::new();
    let mut spec = SegmentSpec::new(config.segment_length);
    if let Some(special) = &config.special {
      spec = spec.with_special_offset(special.offset);
      registry.register(special.kind.clone(), SegmentSpec::new(special.length))?;
    }
    registry.register(config.segment_kind.clone(), spec)?;
    Ok(registry)
  }

  /// Registers (or replaces) a prototype.
  pub fn register(
    &mut self,
    kind: impl Into<SegmentKind>,
    spec: SegmentSpec,
  ) -> Result<(), ConfigurationError> {
    let kind = kind.into();
    if !(spec.length.is_finite() && spec.length > 0.0) {
      return Err(ConfigurationError::NonPositiveLength {
        kind,
        length: spec.length,
      });
    }
    self.specs.insert(kind, spec);
    Ok(())
  }

  pub fn contains(&self, kind: &SegmentKind) -> bool {
    self.specs.contains_key(kind)
  }

  pub fn spec(&self, kind: &SegmentKind) -> Result<&SegmentSpec, ConfigurationError> {
    self
      .specs
      .get(kind)
      .ok_or_else(|| ConfigurationError::UnknownKind(kind.clone()))
  }

  pub fn length_of(&self, kind: &SegmentKind) -> Result<f32, ConfigurationError> {
    self.spec(kind).map(|s| s.length)
  }

  pub fn special_offset_of(&self, kind: &SegmentKind) -> Result<Option<f32>, ConfigurationError> {
    self.spec(kind).map(|s| s.special_offset)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SpecialSegmentConfig;

  #[test]
  fn unknown_kind_is_a_configuration_error() {
    let registry = PrototypeRegistry::new();
    assert_eq!(
      registry.length_of(&SegmentKind::new("tunnel")),
      Err(ConfigurationError::UnknownKind(SegmentKind::new("tunnel")))
    );
  }

  #[test]
  fn zero_length_is_rejected_on_register() {
    let mut registry = PrototypeRegistry::new();
    let err = registry.register("chunk", SegmentSpec::new(0.0)).unwrap_err();
    assert!(matches!(err, ConfigurationError::NonPositiveLength { .. }));
    assert!(!registry.contains(&SegmentKind::default()));
  }

  #[test]
  fn from_config_attaches_special_offset_to_pooled_kind() {
    let config = LoopConfig {
      special: Some(SpecialSegmentConfig {
        kind: SegmentKind::new("station"),
        offset: 30.0,
        length: 12.0,
      }),
      ..LoopConfig::default()
    };
    let registry = PrototypeRegistry::from_config(&config).unwrap();

    assert_eq!(registry.length_of(&SegmentKind::default()), Ok(100.0));
    assert_eq!(
      registry.special_offset_of(&SegmentKind::default()),
      Ok(Some(30.0))
    );
    assert_eq!(registry.length_of(&SegmentKind::new("station")), Ok(12.0));
  }
}
