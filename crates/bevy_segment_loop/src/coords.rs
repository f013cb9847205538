//! Track axis and oriented coordinates.
//!
//! All pool arithmetic happens in *oriented* coordinates: the world
//! coordinate along the travel axis multiplied by the travel sign. In oriented
//! space "ahead of the observer" is always "greater", regardless of whether
//! the runner moves towards +X or -Z.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// One of the three spatial axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
  #[default]
  X,
  Y,
  Z,
}

impl Axis {
  /// Unit vector pointing along the positive axis.
  pub fn unit(self) -> Vec3 {
    match self {
      Self::X => Vec3::X,
      Self::Y => Vec3::Y,
      Self::Z => Vec3::Z,
    }
  }

  /// Reads this axis' component of `v`.
  #[inline]
  pub fn component(self, v: Vec3) -> f32 {
    match self {
      Self::X => v.x,
      Self::Y => v.y,
      Self::Z => v.z,
    }
  }

  /// Returns `v` with this axis' component replaced by `value`.
  #[inline]
  pub fn with_component(self, mut v: Vec3, value: f32) -> Vec3 {
    match self {
      Self::X => v.x = value,
      Self::Y => v.y = value,
      Self::Z => v.z = value,
    }
    v
  }
}

/// Direction of travel along an [`Axis`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  #[default]
  Positive,
  Negative,
}

impl Direction {
  #[inline]
  pub fn sign(self) -> f32 {
    match self {
      Self::Positive => 1.0,
      Self::Negative => -1.0,
    }
  }
}

/// The movement axis of a track together with the observer's direction of
/// travel along it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TravelAxis {
  pub axis: Axis,
  pub direction: Direction,
}

impl TravelAxis {
  pub const fn new(axis: Axis, direction: Direction) -> Self {
    Self { axis, direction }
  }

  /// Projects a world position onto the track, oriented by travel sign.
  #[inline]
  pub fn project(self, world: Vec3) -> f32 {
    self.direction.sign() * self.axis.component(world)
  }

  /// Converts an oriented scalar back to a world-space axis coordinate.
  #[inline]
  pub fn to_world(self, oriented: f32) -> f32 {
    self.direction.sign() * oriented
  }

  /// Moves `world` along the axis so that it projects to `oriented`.
  ///
  /// The two off-axis coordinates are left untouched.
  #[inline]
  pub fn place(self, world: Vec3, oriented: f32) -> Vec3 {
    self.axis.with_component(world, self.to_world(oriented))
  }

  /// World-space unit vector pointing in the direction of travel.
  pub fn forward(self) -> Vec3 {
    self.axis.unit() * self.direction.sign()
  }

  /// The horizontal axis perpendicular to travel (lanes, ground width).
  pub fn lateral(self) -> Axis {
    match self.axis {
      Axis::X => Axis::Z,
      Axis::Y | Axis::Z => Axis::X,
    }
  }

  /// The remaining axis (ground thickness, "up" for horizontal tracks).
  pub fn normal(self) -> Axis {
    match self.axis {
      Axis::X | Axis::Z => Axis::Y,
      Axis::Y => Axis::Z,
    }
  }
}
