//! Error taxonomy for the segment loop.
//!
//! Configuration and allocation failures are fatal at startup and leave the
//! loop disabled. A malformed segment is only a warning: the affected
//! instance stops triggering and everything else keeps running.

use std::fmt;

use crate::pool::SlotIndex;
use crate::prototype::SegmentKind;

/// Invalid or incomplete loop configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigurationError {
  /// Fewer than two segments cannot cover the observer seamlessly.
  PoolTooSmall { pool_size: usize },
  /// A prototype was registered or requested with a non-positive length.
  NonPositiveLength { kind: SegmentKind, length: f32 },
  /// The requested prototype kind was never registered.
  UnknownKind(SegmentKind),
  /// A special segment is configured but the prototype has no special offset.
  MissingSpecialOffset(SegmentKind),
  /// Trigger ratio outside the open interval (0, 1).
  InvalidTriggerRatio(f32),
  /// Overlap must be non-negative and shorter than a segment.
  InvalidOverlap { overlap: f32, length: f32 },
  /// A position or offset option is NaN or infinite.
  NonFiniteOption { name: &'static str, value: f32 },
  /// The trigger offset pulls the boundary behind the segment's anchor.
  InvalidTriggerOffset { offset: f32, min: f32 },
  /// Ground width or thickness is not positive.
  InvalidGroundSize { width: f32, thickness: f32 },
  /// A required collaborator (observer, track root) is absent.
  MissingCollaborator(&'static str),
  /// The configuration text could not be parsed.
  Parse(String),
}

impl fmt::Display for ConfigurationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::PoolTooSmall { pool_size } => {
        write!(f, "pool size {pool_size} is too small, at least 2 segments are required")
      }
      Self::NonPositiveLength { kind, length } => {
        write!(f, "segment kind '{kind}' has non-positive length {length}")
      }
      Self::UnknownKind(kind) => write!(f, "segment kind '{kind}' is not registered"),
      Self::MissingSpecialOffset(kind) => {
        write!(f, "segment kind '{kind}' has no special sub-segment offset")
      }
      Self::InvalidTriggerRatio(ratio) => {
        write!(f, "trigger ratio {ratio} must lie strictly between 0 and 1")
      }
      Self::InvalidOverlap { overlap, length } => {
        write!(f, "overlap {overlap} must be in [0, {length})")
      }
      Self::NonFiniteOption { name, value } => write!(f, "{name} must be finite, got {value}"),
      Self::InvalidTriggerOffset { offset, min } => {
        write!(f, "trigger offset {offset} must be at least {min}")
      }
      Self::InvalidGroundSize { width, thickness } => {
        write!(f, "ground size {width}x{thickness} must be positive")
      }
      Self::MissingCollaborator(name) => write!(f, "missing collaborator: {name}"),
      Self::Parse(msg) => write!(f, "failed to parse loop config: {msg}"),
    }
  }
}

impl std::error::Error for ConfigurationError {}

/// The ground or geometry collaborator could not produce a handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationFailure {
  pub what: &'static str,
  pub reason: String,
}

impl AllocationFailure {
  pub fn new(what: &'static str, reason: impl Into<String>) -> Self {
    Self {
      what,
      reason: reason.into(),
    }
  }
}

impl fmt::Display for AllocationFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "failed to allocate {}: {}", self.what, self.reason)
  }
}

impl std::error::Error for AllocationFailure {}

/// Fatal segment loop error.
#[derive(Clone, Debug, PartialEq)]
pub enum LoopError {
  Configuration(ConfigurationError),
  Allocation(AllocationFailure),
}

impl From<ConfigurationError> for LoopError {
  fn from(err: ConfigurationError) -> Self {
    Self::Configuration(err)
  }
}

impl From<AllocationFailure> for LoopError {
  fn from(err: AllocationFailure) -> Self {
    Self::Allocation(err)
  }
}

impl fmt::Display for LoopError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Configuration(e) => write!(f, "configuration error: {e}"),
      Self::Allocation(e) => write!(f, "allocation failure: {e}"),
    }
  }
}

impl std::error::Error for LoopError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Configuration(e) => Some(e),
      Self::Allocation(e) => Some(e),
    }
  }
}

/// A cloned instance reported a non-positive length.
///
/// The instance stays in the pool (pool size is conserved) but never
/// triggers a recycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MalformedSegment {
  pub slot: SlotIndex,
  pub reported_length: f32,
}

impl fmt::Display for MalformedSegment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "segment in slot {} reported length {}, disabled from triggering",
      self.slot.0, self.reported_length
    )
  }
}
