//! E2E tests for segment tracks in a headless Bevy app.
//!
//! Verifies the data flow:
//! 1. `SpawnSegmentTrack` clones segments and synthesizes child ground
//! 2. Moving the observer recycles trailing segments
//! 3. Sync systems write the travel-axis coordinate back to `Transform`
//!
//! Run: cargo test -p bevy_segment_loop --test track_e2e

use bevy::ecs::system::Command;
use bevy::prelude::*;
use bevy_segment_loop::{
  AllocationFailure, Axis, ClonedSegment, ConfigurationError, Direction, GroundPlane, LoopConfig,
  LoopError, LoopObserver, LoopSegment, PlacedSegment, SegmentBuilder, SegmentKind,
  SegmentLoopPlugin, SegmentTrack, SlotIndex, SpawnSegmentTrack, SpecialSegment,
  SpecialSegmentConfig,
};

/// Off-axis offset given to every built segment; recycling must preserve it.
const LATERAL: f32 = 5.0;

struct BoxBuilder {
  length: f32,
}

impl SegmentBuilder for BoxBuilder {
  fn build(&self, world: &mut World, kind: &SegmentKind) -> Result<ClonedSegment<Entity>, LoopError> {
    let entity = world
      .spawn((
        Name::new(kind.to_string()),
        Transform::from_xyz(0.0, 0.0, LATERAL),
        Visibility::default(),
      ))
      .id();
    Ok(ClonedSegment {
      handle: entity,
      length: self.length,
    })
  }
}

struct BrokenBuilder;

impl SegmentBuilder for BrokenBuilder {
  fn build(&self, _world: &mut World, _kind: &SegmentKind) -> Result<ClonedSegment<Entity>, LoopError> {
    Err(AllocationFailure::new("segment", "prototype asset missing").into())
  }
}

fn create_app() -> App {
  let mut app = App::new();
  app.add_plugins(MinimalPlugins);
  app.add_plugins(SegmentLoopPlugin);
  app
}

fn spawn_observer(app: &mut App) -> Entity {
  app
    .world_mut()
    .spawn((LoopObserver, Transform::default(), GlobalTransform::default()))
    .id()
}

fn move_observer(app: &mut App, observer: Entity, position: Vec3) {
  *app
    .world_mut()
    .get_mut::<GlobalTransform>(observer)
    .expect("observer should exist") = GlobalTransform::from_translation(position);
}

fn track(app: &mut App) -> &SegmentTrack {
  let world = app.world_mut();
  let entity = world
    .query_filtered::<Entity, With<SegmentTrack>>()
    .iter(world)
    .next()
    .expect("track should be spawned");
  app.world().get::<SegmentTrack>(entity).unwrap()
}

/// Translation of each pooled segment, ordered by slot.
fn segment_translations(app: &mut App) -> Vec<Vec3> {
  let world = app.world_mut();
  let mut segments: Vec<(SlotIndex, Vec3)> = world
    .query::<(&LoopSegment, &Transform)>()
    .iter(world)
    .map(|(s, t)| (s.slot, t.translation))
    .collect();
  segments.sort_by_key(|(slot, _)| *slot);
  segments.into_iter().map(|(_, t)| t).collect()
}

fn two_segment_config() -> LoopConfig {
  LoopConfig {
    pool_size: 2,
    segment_length: 100.0,
    trigger_ratio: 0.7,
    overlap: 1.0,
    ..LoopConfig::default()
  }
}

#[test]
fn spawn_places_segments_and_ground() {
  let mut app = create_app();
  spawn_observer(&mut app);

  let config = LoopConfig {
    pool_size: 3,
    ..two_segment_config()
  };
  SpawnSegmentTrack::new(config, BoxBuilder { length: 100.0 }).apply(app.world_mut());
  app.update();

  assert!(track(&mut app).is_enabled());
  assert_eq!(track(&mut app).furthest_edge(), Some(300.0));
  assert_eq!(
    segment_translations(&mut app),
    vec![
      Vec3::new(0.0, 0.0, LATERAL),
      Vec3::new(100.0, 0.0, LATERAL),
      Vec3::new(200.0, 0.0, LATERAL),
    ]
  );

  let world = app.world_mut();
  let grounds: Vec<(GroundPlane, Transform, Entity)> = world
    .query::<(&GroundPlane, &Transform, &ChildOf)>()
    .iter(world)
    .map(|(g, t, c)| (*g, *t, c.parent()))
    .collect();
  assert_eq!(grounds.len(), 3);
  for (ground, transform, parent) in grounds {
    assert!(app.world().get::<LoopSegment>(parent).is_some());
    assert_eq!(ground.half_extents, Vec3::new(50.0, 0.5, 15.0));
    assert_eq!(transform.translation, Vec3::new(50.0, -0.5, 0.0));
  }
}

#[test]
fn observer_progress_recycles_trailing_segment() {
  let mut app = create_app();
  let observer = spawn_observer(&mut app);

  SpawnSegmentTrack::new(two_segment_config(), BoxBuilder { length: 100.0 })
    .apply(app.world_mut());
  app.update();

  move_observer(&mut app, observer, Vec3::new(70.0, 0.0, 0.0));
  app.update();
  assert_eq!(track(&mut app).furthest_edge(), Some(200.0));

  move_observer(&mut app, observer, Vec3::new(71.0, 2.0, -3.0));
  app.update();

  assert_eq!(track(&mut app).furthest_edge(), Some(299.0));
  assert_eq!(
    track(&mut app).last_report().recycled,
    vec![(SlotIndex(0), 199.0)]
  );
  assert_eq!(
    segment_translations(&mut app),
    vec![
      Vec3::new(199.0, 0.0, LATERAL),
      Vec3::new(100.0, 0.0, LATERAL),
    ]
  );

  // Ground stays attached and is not reallocated.
  let world = app.world_mut();
  let ground_count = world.query::<&GroundPlane>().iter(world).count();
  assert_eq!(ground_count, 2);
}

#[test]
fn negative_direction_moves_segments_towards_negative_axis() {
  let mut app = create_app();
  let observer = spawn_observer(&mut app);

  let config = LoopConfig {
    axis: Axis::X,
    direction: Direction::Negative,
    ..two_segment_config()
  };
  SpawnSegmentTrack::new(config, BoxBuilder { length: 100.0 }).apply(app.world_mut());
  app.update();

  assert_eq!(
    segment_translations(&mut app),
    vec![
      Vec3::new(0.0, 0.0, LATERAL),
      Vec3::new(-100.0, 0.0, LATERAL),
    ]
  );

  move_observer(&mut app, observer, Vec3::new(-71.0, 0.0, 0.0));
  app.update();

  assert_eq!(segment_translations(&mut app)[0], Vec3::new(-199.0, 0.0, LATERAL));
}

#[test]
fn special_segment_is_revealed_ahead_of_the_track() {
  let mut app = create_app();
  let observer = spawn_observer(&mut app);

  let config = LoopConfig {
    special: Some(SpecialSegmentConfig {
      kind: SegmentKind::new("station"),
      offset: 30.0,
      length: 10.0,
    }),
    ..two_segment_config()
  };
  SpawnSegmentTrack::new(config, BoxBuilder { length: 100.0 }).apply(app.world_mut());
  app.update();

  let special = {
    let world = app.world_mut();
    world
      .query_filtered::<Entity, With<SpecialSegment>>()
      .iter(world)
      .next()
      .expect("special should be spawned")
  };
  assert_eq!(
    app.world().get::<Visibility>(special),
    Some(&Visibility::Hidden)
  );

  move_observer(&mut app, observer, Vec3::new(71.0, 0.0, 0.0));
  app.update();

  assert_eq!(
    app.world().get::<Visibility>(special),
    Some(&Visibility::Inherited)
  );
  assert_eq!(
    app.world().get::<Transform>(special).unwrap().translation,
    Vec3::new(329.0, 0.0, LATERAL)
  );
}

#[test]
fn missing_observer_disables_track() {
  let mut app = create_app();

  SpawnSegmentTrack::new(two_segment_config(), BoxBuilder { length: 100.0 })
    .apply(app.world_mut());
  app.update();

  let segment_loop = track(&mut app).segment_loop();
  assert!(!segment_loop.is_enabled());
  assert_eq!(
    segment_loop.failure(),
    Some(&LoopError::Configuration(
      ConfigurationError::MissingCollaborator("observer")
    ))
  );
  assert!(segment_translations(&mut app).is_empty());
}

#[test]
fn builder_failure_disables_track_without_panicking() {
  let mut app = create_app();
  spawn_observer(&mut app);

  SpawnSegmentTrack::new(two_segment_config(), BrokenBuilder).apply(app.world_mut());
  for _ in 0..3 {
    app.update();
  }

  assert!(matches!(
    track(&mut app).segment_loop().failure(),
    Some(LoopError::Allocation(_))
  ));
  assert_eq!(track(&mut app).furthest_edge(), None);
}

#[test]
fn malformed_clone_gets_no_ground() {
  let mut app = create_app();
  let observer = spawn_observer(&mut app);

  SpawnSegmentTrack::new(two_segment_config(), BoxBuilder { length: 0.0 })
    .apply(app.world_mut());
  app.update();

  assert!(track(&mut app).is_enabled());
  assert_eq!(track(&mut app).segment_loop().warnings().len(), 2);

  move_observer(&mut app, observer, Vec3::new(500.0, 0.0, 0.0));
  app.update();

  let world = app.world_mut();
  assert_eq!(world.query::<&GroundPlane>().iter(world).count(), 0);
  assert_eq!(track(&mut app).furthest_edge(), Some(200.0));
}

#[test]
fn placed_segment_is_adopted_as_first_instance() {
  let mut app = create_app();
  spawn_observer(&mut app);
  let placed = app
    .world_mut()
    .spawn((
      PlacedSegment {
        kind: SegmentKind::default(),
        length: 100.0,
      },
      Transform::from_xyz(0.0, 1.0, 0.0),
    ))
    .id();

  let config = LoopConfig {
    adopt_existing: true,
    ..two_segment_config()
  };
  SpawnSegmentTrack::new(config, BoxBuilder { length: 100.0 }).apply(app.world_mut());
  app.update();

  assert_eq!(
    app.world().get::<LoopSegment>(placed).map(|s| s.slot),
    Some(SlotIndex(0))
  );
  assert!(app.world().get::<PlacedSegment>(placed).is_none());
  let world = app.world_mut();
  assert_eq!(world.query::<&LoopSegment>().iter(world).count(), 2);
}
