//! `World` and `Commands` adapters for the loop's collaborator traits.

use bevy::prelude::*;

use super::{GroundPlane, LoopSegment, PlacedSegment, SpecialSegment};
use crate::coords::TravelAxis;
use crate::error::{AllocationFailure, LoopError};
use crate::ground::{GroundSpan, GroundSupport};
use crate::physics::ground_physics;
use crate::pool::{ClonedSegment, SegmentSpawner, SlotIndex};
use crate::prototype::SegmentKind;

/// Instantiates segment prototypes as entity hierarchies.
///
/// Implemented by the game. The returned root entity is re-parented under
/// the track and moved along the travel axis; its other coordinates are
/// left as built.
pub trait SegmentBuilder: Send + Sync + 'static {
  /// Spawns one instance of `kind` and reports its length.
  fn build(&self, world: &mut World, kind: &SegmentKind) -> Result<ClonedSegment<Entity>, LoopError>;

  /// Spawns the special landmark.
  fn build_special(&self, world: &mut World, kind: &SegmentKind) -> Result<Entity, LoopError> {
    self.build(world, kind).map(|cloned| cloned.handle)
  }
}

/// Startup collaborator with exclusive world access.
pub struct WorldHost<'a> {
  world: &'a mut World,
  builder: &'a dyn SegmentBuilder,
  track: Entity,
  axis: TravelAxis,
}

impl<'a> WorldHost<'a> {
  pub fn new(
    world: &'a mut World,
    builder: &'a dyn SegmentBuilder,
    track: Entity,
    axis: TravelAxis,
  ) -> Self {
    Self {
      world,
      builder,
      track,
      axis,
    }
  }
}

impl SegmentSpawner for WorldHost<'_> {
  type Instance = Entity;

  fn clone_prototype(
    &mut self,
    kind: &SegmentKind,
    slot: SlotIndex,
  ) -> Result<ClonedSegment<Entity>, LoopError> {
    let cloned = self.builder.build(self.world, kind)?;
    self.world.entity_mut(cloned.handle).insert((
      LoopSegment {
        track: self.track,
        slot,
      },
      ChildOf(self.track),
    ));
    Ok(cloned)
  }

  fn clone_special(&mut self, kind: &SegmentKind) -> Result<Entity, LoopError> {
    let entity = self.builder.build_special(self.world, kind)?;
    self.world.entity_mut(entity).insert((
      SpecialSegment { track: self.track },
      Visibility::Hidden,
      ChildOf(self.track),
    ));
    Ok(entity)
  }

  fn adopt_existing(&mut self, kind: &SegmentKind) -> Option<ClonedSegment<Entity>> {
    let mut placed = self.world.query::<(Entity, &PlacedSegment)>();
    let (entity, length) = placed
      .iter(self.world)
      .find(|(_, p)| &p.kind == kind)
      .map(|(e, p)| (e, p.length))?;

    debug!("Adopting placed segment {entity} as first {kind} instance");
    self.world.entity_mut(entity).remove::<PlacedSegment>().insert((
      LoopSegment {
        track: self.track,
        slot: SlotIndex(0),
      },
      ChildOf(self.track),
    ));
    Some(ClonedSegment {
      handle: entity,
      length,
    })
  }
}

impl GroundSupport<Entity> for WorldHost<'_> {
  type Handle = Entity;

  fn allocate(&mut self, owner: Entity, span: &GroundSpan) -> Result<Entity, AllocationFailure> {
    if self.world.get_entity(owner).is_err() {
      return Err(AllocationFailure::new(
        "ground",
        format!("owner {owner} does not exist"),
      ));
    }
    let half_extents = span.half_extents(self.axis);
    let ground = self
      .world
      .spawn((
        Name::new("SegmentGround"),
        GroundPlane { half_extents },
        Transform::from_translation(span.local_translation(self.axis)),
        ground_physics(half_extents),
        ChildOf(owner),
      ))
      .id();
    Ok(ground)
  }

  fn update(&mut self, handle: Entity, span: &GroundSpan) {
    let half_extents = span.half_extents(self.axis);
    if let Ok(mut entity) = self.world.get_entity_mut(handle) {
      entity.insert((
        GroundPlane { half_extents },
        Transform::from_translation(span.local_translation(self.axis)),
        ground_physics(half_extents),
      ));
    }
  }
}

/// Per-tick ground collaborator that defers mutations through `Commands`.
///
/// Changes land at the next command flush, before transforms propagate.
pub struct CommandsGround<'a, 'w, 's> {
  commands: &'a mut Commands<'w, 's>,
  axis: TravelAxis,
}

impl<'a, 'w, 's> CommandsGround<'a, 'w, 's> {
  pub fn new(commands: &'a mut Commands<'w, 's>, axis: TravelAxis) -> Self {
    Self { commands, axis }
  }
}

impl GroundSupport<Entity> for CommandsGround<'_, '_, '_> {
  type Handle = Entity;

  fn allocate(&mut self, owner: Entity, span: &GroundSpan) -> Result<Entity, AllocationFailure> {
    let half_extents = span.half_extents(self.axis);
    let ground = self
      .commands
      .spawn((
        Name::new("SegmentGround"),
        GroundPlane { half_extents },
        Transform::from_translation(span.local_translation(self.axis)),
        ground_physics(half_extents),
        ChildOf(owner),
      ))
      .id();
    Ok(ground)
  }

  fn update(&mut self, handle: Entity, span: &GroundSpan) {
    let half_extents = span.half_extents(self.axis);
    self.commands.entity(handle).try_insert((
      GroundPlane { half_extents },
      Transform::from_translation(span.local_translation(self.axis)),
      ground_physics(half_extents),
    ));
  }
}
