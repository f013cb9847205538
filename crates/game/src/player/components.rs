use bevy::prelude::*;
use bevy_segment_loop::TravelAxis;

#[derive(Component)]
pub struct Player;

/// World-space velocity fed to the character controller.
#[derive(Component, Default)]
pub struct CharacterVelocity(pub Vec3);

/// Runner tuning plus the track frame it runs in.
#[derive(Component, Debug, Clone)]
pub struct Runner {
  pub axis: TravelAxis,
  pub forward_speed: f32,
  pub lane_distance: f32,
  pub lane_offset: f32,
  pub lane_switch_speed: f32,
  pub jump_height: f32,
  pub roll_duration: f32,
}

impl Runner {
  /// Lateral coordinate of the center of `lane`.
  pub fn lane_position(&self, lane: Lane) -> f32 {
    self.lane_offset + lane.0 as f32 * self.lane_distance
  }
}

/// Current lane, -1 (left) to 1 (right).
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane(pub i32);

impl Lane {
  pub const MIN: i32 = -1;
  pub const MAX: i32 = 1;

  /// Moves one lane by `delta`, staying within range. Returns whether the
  /// lane changed.
  pub fn shift(&mut self, delta: i32) -> bool {
    let next = (self.0 + delta).clamp(Self::MIN, Self::MAX);
    let changed = next != self.0;
    self.0 = next;
    changed
  }
}

/// Grounded state read back from the character controller.
#[derive(Component, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grounded(pub bool);

/// Active roll, if any.
#[derive(Component, Default)]
pub struct Rolling(pub Option<Timer>);

impl Rolling {
  pub fn is_active(&self) -> bool {
    self.0.is_some()
  }
}

/// The runner hit something. Input is ignored and forward motion stops.
#[derive(Component, Debug, Default)]
pub struct Dead;

/// What the runner was asked to do this frame.
///
/// Actions only fire on the frame their key goes down (see the `Press`
/// conditions in the input bindings), so holding a key acts once.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerIntent {
  pub lane_delta: i32,
  pub jump: bool,
  pub roll: bool,
}

impl RunnerIntent {
  pub fn new(lane_left: bool, lane_right: bool, jump: bool, roll: bool) -> Self {
    Self {
      lane_delta: lane_right as i32 - lane_left as i32,
      jump,
      roll,
    }
  }
}
