//! Loop configuration.
//!
//! A small set of scalar options supplied once at initialization. The struct
//! deserializes from TOML so it can be embedded in a game config file:
//!
//! ```toml
//! [track]
//! pool_size = 3
//! segment_length = 100.0
//! trigger_ratio = 0.7
//! overlap = 1.0
//! axis = "x"
//! direction = "negative"
//!
//! [track.special]
//! kind = "station"
//! offset = 30.0
//! ```

use serde::{Deserialize, Serialize};

use crate::coords::{Axis, Direction, TravelAxis};
use crate::error::{ConfigurationError, LoopError};
use crate::prototype::SegmentKind;

/// Configuration of the optional special (landmark) segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpecialSegmentConfig {
  /// Prototype kind cloned for the special instance.
  pub kind: SegmentKind,
  /// Offset from the leading edge to the special instance's anchor.
  pub offset: f32,
  /// Length of the special prototype itself.
  #[serde(default = "default_special_length")]
  pub length: f32,
}

fn default_special_length() -> f32 {
  10.0
}

/// Segment loop configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
  /// Number of concurrently active segments (at least 2).
  pub pool_size: usize,
  /// Length of every segment along the travel axis.
  pub segment_length: f32,
  /// Fraction of a segment the observer must cross before it is recycled.
  pub trigger_ratio: f32,
  /// Extra distance past the ratio boundary before a recycle triggers.
  pub trigger_offset: f32,
  /// Amount by which consecutive segments overlap to hide seams.
  pub overlap: f32,
  /// Width of synthesized ground across the track.
  pub ground_width: f32,
  /// Thickness of synthesized ground.
  pub ground_thickness: f32,
  /// Oriented position the observer must reach before recycling starts.
  pub loop_start_position: Option<f32>,
  /// Oriented anchor of the first segment.
  pub base_position: f32,
  /// Prototype kind cloned for pooled segments.
  pub segment_kind: SegmentKind,
  pub special: Option<SpecialSegmentConfig>,
  /// Reuse an already-placed segment as the first pool instance.
  pub adopt_existing: bool,
  pub axis: Axis,
  pub direction: Direction,
}

impl Default for LoopConfig {
  fn default() -> Self {
    Self {
      pool_size: 2,
      segment_length: 100.0,
      trigger_ratio: 0.7,
      trigger_offset: 0.0,
      overlap: 0.0,
      ground_width: 30.0,
      ground_thickness: 1.0,
      loop_start_position: None,
      base_position: 0.0,
      segment_kind: SegmentKind::default(),
      special: None,
      adopt_existing: false,
      axis: Axis::X,
      direction: Direction::Positive,
    }
  }
}

impl LoopConfig {
  /// Parses a configuration from TOML text and validates it.
  pub fn from_toml(text: &str) -> Result<Self, LoopError> {
    let config: Self =
      toml::from_str(text).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn travel_axis(&self) -> TravelAxis {
    TravelAxis::new(self.axis, self.direction)
  }

  /// Checks every scalar option, returning the first violation.
  pub fn validate(&self) -> Result<(), ConfigurationError> {
    if self.pool_size < 2 {
      return Err(ConfigurationError::PoolTooSmall {
        pool_size: self.pool_size,
      });
    }
    if !(self.segment_length.is_finite() && self.segment_length > 0.0) {
      return Err(ConfigurationError::NonPositiveLength {
        kind: self.segment_kind.clone(),
        length: self.segment_length,
      });
    }
    if !(self.trigger_ratio > 0.0 && self.trigger_ratio < 1.0) {
      return Err(ConfigurationError::InvalidTriggerRatio(self.trigger_ratio));
    }
    let finite = [
      ("trigger_offset", Some(self.trigger_offset)),
      ("base_position", Some(self.base_position)),
      ("loop_start_position", self.loop_start_position),
      ("special.offset", self.special.as_ref().map(|s| s.offset)),
    ];
    for (name, value) in finite {
      if let Some(value) = value
        && !value.is_finite()
      {
        return Err(ConfigurationError::NonFiniteOption { name, value });
      }
    }
    self.check_length(self.segment_length)?;
    if !(self.ground_width > 0.0 && self.ground_thickness > 0.0) {
      return Err(ConfigurationError::InvalidGroundSize {
        width: self.ground_width,
        thickness: self.ground_thickness,
      });
    }
    Ok(())
  }

  /// Checks the options that depend on the actual segment length, which may
  /// come from a registry rather than `segment_length`.
  pub fn check_length(&self, length: f32) -> Result<(), ConfigurationError> {
    if !(self.overlap >= 0.0 && self.overlap < length) {
      return Err(ConfigurationError::InvalidOverlap {
        overlap: self.overlap,
        length,
      });
    }
    let min = -self.trigger_ratio * length;
    if self.trigger_offset < min {
      return Err(ConfigurationError::InvalidTriggerOffset {
        offset: self.trigger_offset,
        min,
      });
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    assert_eq!(LoopConfig::default().validate(), Ok(()));
  }

  #[test]
  fn rejects_single_segment_pool() {
    let config = LoopConfig {
      pool_size: 1,
      ..default_config()
    };
    assert_eq!(
      config.validate(),
      Err(ConfigurationError::PoolTooSmall { pool_size: 1 })
    );
  }

  #[test]
  fn rejects_trigger_ratio_at_bounds() {
    for ratio in [0.0, 1.0, -0.5, 1.5] {
      let config = LoopConfig {
        trigger_ratio: ratio,
        ..default_config()
      };
      assert!(matches!(
        config.validate(),
        Err(ConfigurationError::InvalidTriggerRatio(_))
      ));
    }
  }

  #[test]
  fn rejects_overlap_as_long_as_segment() {
    let config = LoopConfig {
      overlap: 100.0,
      ..default_config()
    };
    assert!(matches!(
      config.validate(),
      Err(ConfigurationError::InvalidOverlap { .. })
    ));
  }

  #[test]
  fn rejects_non_finite_positions_and_offsets() {
    let configs = [
      LoopConfig {
        trigger_offset: f32::NAN,
        ..default_config()
      },
      LoopConfig {
        base_position: f32::INFINITY,
        ..default_config()
      },
      LoopConfig {
        loop_start_position: Some(f32::NAN),
        ..default_config()
      },
      LoopConfig {
        special: Some(SpecialSegmentConfig {
          kind: SegmentKind::new("station"),
          offset: f32::NEG_INFINITY,
          length: 10.0,
        }),
        ..default_config()
      },
    ];
    let names: Vec<_> = configs
      .iter()
      .map(|config| match config.validate() {
        Err(ConfigurationError::NonFiniteOption { name, .. }) => name,
        other => panic!("expected non-finite rejection, got {other:?}"),
      })
      .collect();
    assert_eq!(
      names,
      vec!["trigger_offset", "base_position", "loop_start_position", "special.offset"]
    );
  }

  #[test]
  fn rejects_trigger_offset_behind_anchor() {
    let config = LoopConfig {
      trigger_offset: -70.5,
      ..default_config()
    };
    assert!(matches!(
      config.validate(),
      Err(ConfigurationError::InvalidTriggerOffset { offset, min })
        if offset == -70.5 && (min + 70.0).abs() < 1e-4
    ));

    let early = LoopConfig {
      trigger_offset: -60.0,
      ..default_config()
    };
    assert_eq!(early.validate(), Ok(()));
  }

  #[test]
  fn overlap_is_checked_against_actual_length() {
    let config = LoopConfig {
      overlap: 5.0,
      ..default_config()
    };
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(
      config.check_length(2.0),
      Err(ConfigurationError::InvalidOverlap {
        overlap: 5.0,
        length: 2.0
      })
    );
  }

  #[test]
  fn parses_track_section_from_toml() {
    let config = LoopConfig::from_toml(
      r#"
        pool_size = 3
        segment_length = 80.0
        overlap = 1.0
        axis = "z"
        direction = "negative"
        loop_start_position = 40.0

        [special]
        kind = "station"
        offset = 30.0
      "#,
    )
    .unwrap();

    assert_eq!(config.pool_size, 3);
    assert_eq!(config.segment_length, 80.0);
    assert_eq!(config.trigger_ratio, 0.7);
    assert_eq!(config.axis, Axis::Z);
    assert_eq!(config.direction, Direction::Negative);
    assert_eq!(config.loop_start_position, Some(40.0));
    let special = config.special.unwrap();
    assert_eq!(special.kind, SegmentKind::new("station"));
    assert_eq!(special.length, 10.0);
  }

  #[test]
  fn parse_errors_are_configuration_errors() {
    let err = LoopConfig::from_toml("pool_size = \"many\"").unwrap_err();
    assert!(matches!(
      err,
      LoopError::Configuration(ConfigurationError::Parse(_))
    ));
  }

  fn default_config() -> LoopConfig {
    LoopConfig::default()
  }
}
