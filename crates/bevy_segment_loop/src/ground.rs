//! Ground synthesis for pooled segments.
//!
//! Each segment owns one planar support collider sized to its span. The
//! ground is created lazily on first placement and afterwards only
//! repositioned and rescaled, never reallocated.

use bevy::math::Vec3;

use crate::config::LoopConfig;
use crate::coords::TravelAxis;
use crate::error::AllocationFailure;
use crate::pool::SegmentInstance;

/// Ground extents in the owning segment's local frame.
///
/// The ground is parented to its segment, so the span never contains the
/// segment's world position: moving the segment moves the ground.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSpan {
  /// Oriented distance from the segment anchor to the ground center.
  pub center_offset: f32,
  pub length: f32,
  pub width: f32,
  pub thickness: f32,
}

impl GroundSpan {
  /// Local translation of the ground center. The top face sits flush with
  /// the segment's base plane.
  pub fn local_translation(&self, axis: TravelAxis) -> Vec3 {
    axis.forward() * self.center_offset - axis.normal().unit() * (self.thickness / 2.0)
  }

  /// Half extents in world axes, as expected by cuboid colliders.
  pub fn half_extents(&self, axis: TravelAxis) -> Vec3 {
    (axis.axis.unit() * self.length
      + axis.lateral().unit() * self.width
      + axis.normal().unit() * self.thickness)
      / 2.0
  }
}

/// Rendering/physics collaborator that owns the actual ground objects.
///
/// The loop only ever calls these two operations and never inspects a
/// handle.
pub trait GroundSupport<I> {
  type Handle: Copy;

  /// Creates a new ground object attached to `owner`.
  fn allocate(&mut self, owner: I, span: &GroundSpan) -> Result<Self::Handle, AllocationFailure>;

  /// Repositions and rescales an existing ground object.
  fn update(&mut self, handle: Self::Handle, span: &GroundSpan);
}

/// Produces ground spans and keeps each instance's ground in sync.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundSynthesizer {
  pub width: f32,
  pub thickness: f32,
}

impl GroundSynthesizer {
  pub fn from_config(config: &LoopConfig) -> Self {
    Self {
      width: config.ground_width,
      thickness: config.ground_thickness,
    }
  }

  /// Ground span covering a segment of `length`.
  pub fn span_for(&self, length: f32) -> GroundSpan {
    GroundSpan {
      center_offset: length / 2.0,
      length,
      width: self.width,
      thickness: self.thickness,
    }
  }

  /// Allocates the instance's ground on first use, updates it afterwards.
  pub fn ensure_ground<I, S>(
    &self,
    instance: &mut SegmentInstance<I, S::Handle>,
    length: f32,
    support: &mut S,
  ) -> Result<S::Handle, AllocationFailure>
  where
    I: Copy,
    S: GroundSupport<I>,
  {
    let span = self.span_for(length);
    match instance.ground {
      Some(handle) => {
        support.update(handle, &span);
        Ok(handle)
      }
      None => {
        let handle = support.allocate(instance.handle, &span)?;
        instance.ground = Some(handle);
        Ok(handle)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::coords::{Axis, Direction};
  use crate::headless::HeadlessHost;

  #[test]
  fn allocates_once_then_updates() {
    let synth = GroundSynthesizer {
      width: 30.0,
      thickness: 1.0,
    };
    let mut host = HeadlessHost::new();
    let mut instance = SegmentInstance::new(7u32, 0.0, 100.0);

    let first = synth.ensure_ground(&mut instance, 100.0, &mut host).unwrap();
    let second = synth.ensure_ground(&mut instance, 100.0, &mut host).unwrap();

    assert_eq!(first, second);
    assert_eq!(host.ground_allocations(), 1);
    assert_eq!(host.ground_updates(), 1);
    assert_eq!(host.ground(first).unwrap().owner, 7);
  }

  #[test]
  fn allocation_failure_leaves_instance_without_ground() {
    let synth = GroundSynthesizer {
      width: 30.0,
      thickness: 1.0,
    };
    let mut host = HeadlessHost::new().with_ground_budget(0);
    let mut instance = SegmentInstance::new(0u32, 0.0, 100.0);

    assert!(synth.ensure_ground(&mut instance, 100.0, &mut host).is_err());
    assert_eq!(instance.ground(), None);
  }

  #[test]
  fn span_is_centered_ahead_of_anchor() {
    let axis = TravelAxis::new(Axis::X, Direction::Negative);
    let span = GroundSpan {
      center_offset: 50.0,
      length: 100.0,
      width: 30.0,
      thickness: 2.0,
    };

    assert_eq!(span.local_translation(axis), Vec3::new(-50.0, -1.0, 0.0));
    assert_eq!(span.half_extents(axis), Vec3::new(50.0, 1.0, 15.0));
  }
}
