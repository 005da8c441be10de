//! Whole-loop scenarios run headless: world, controllers and scheduler
//! together, without a window.

use std::time::{Duration, Instant};

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sandbox::config::SandboxConfig;
use sandbox::entity::{Material, Rgba, ShapeParams};
use sandbox::interaction::{Controller, DragController, InputEvent, Key, PointerButton};
use sandbox::presentation::hud_text;
use sandbox::scheduler::{FramePacer, FrameScheduler};
use sandbox::world::WALL_FRICTION;
use sandbox::World;

const RADIUS: f32 = 30.0;

fn ball_pit() -> (SandboxConfig, World) {
    let config = SandboxConfig::fullscreen();
    let world = World::new(config.gravity, &config.boundary(), config.wall_material);
    (config, world)
}

fn drag_controller(config: &SandboxConfig) -> DragController {
    DragController::with_rng(config.spawn, config.world_size(), StdRng::seed_from_u64(42))
}

fn press(button: PointerButton, at: Vec2) -> InputEvent {
    InputEvent::PointerDown {
        button,
        position: at,
    }
}

fn nominal_step(config: &SandboxConfig) -> f32 {
    FramePacer::new(config.target_fps).nominal_step()
}

/// Drop a ball from `drop_y` and record its position after each of `steps` steps
fn trajectory(world: &mut World, dt: f32, drop_y: f32, steps: usize) -> Vec<Vec2> {
    let handle = world.spawn_entity(
        ShapeParams::Circle { radius: RADIUS },
        5.0,
        Vec2::new(500.0, drop_y),
        Rgba::WHITE,
    );
    (0..steps)
        .map(|_| {
            world.step(dt);
            world.pose(handle).expect("ball is live").position
        })
        .collect()
}

#[test]
fn dropped_ball_overlaps_the_floor_by_less_than_one_step() {
    let (config, mut world) = ball_pit();
    let dt = nominal_step(&config);
    let rest = config.height as f32 - 10.0 - RADIUS;
    let drop_y = 500.0;

    // Contacts are found after the move, so the deepest overlap is the
    // distance covered in the impact step
    let impact_speed = (2.0 * config.gravity.y * (rest - drop_y)).sqrt();
    let max_overlap = 1.25 * impact_speed * dt;

    let path = trajectory(&mut world, dt, drop_y, 600);
    let deepest = path.iter().map(|p| p.y).fold(f32::MIN, f32::max);

    assert!(deepest >= rest - 5.0, "never reached the floor, lowest y = {}", deepest);
    assert!(
        deepest <= rest + max_overlap,
        "ball sank {} px into the floor, allowed {}",
        deepest - rest,
        max_overlap
    );
    assert!(deepest < rest + RADIUS, "center crossed the floor");
    for p in &path {
        assert!((p.x - 500.0).abs() < 1.0, "drifted to x = {}", p.x);
    }
}

#[test]
fn perfectly_elastic_ball_keeps_bouncing_without_gaining_height() {
    let (config, mut world) = ball_pit();
    let dt = nominal_step(&config);
    let drop_y = 500.0;

    let path = trajectory(&mut world, dt, drop_y, 600);

    // The first impact lands about 62 steps in; after it every apex stays
    // within a radius of the drop height and the ball still covers most of the fall
    let later = &path[90..];
    let highest = later.iter().map(|p| p.y).fold(f32::MAX, f32::min);
    let lowest = later.iter().map(|p| p.y).fold(f32::MIN, f32::max);
    assert!(highest >= drop_y - RADIUS, "bounced above the drop height: y = {}", highest);
    assert!(lowest - highest > 300.0, "bounce died out: {}..{}", highest, lowest);
}

#[test]
fn ball_on_an_inelastic_floor_settles() {
    let config = SandboxConfig::fullscreen();
    let dead_walls = Material {
        friction: WALL_FRICTION,
        elasticity: 0.0,
    };
    let mut world = World::new(config.gravity, &config.boundary(), dead_walls);
    let dt = nominal_step(&config);
    let rest = config.height as f32 - 10.0 - RADIUS;

    let path = trajectory(&mut world, dt, 500.0, 600);
    let handle = world.handles().next().expect("one ball");

    let end = path.last().copied().unwrap_or_default();
    assert!((end.y - rest).abs() < RADIUS, "resting at y = {}", end.y);
    let velocity = world.velocity(handle).expect("ball is live");
    assert!(velocity.length() < 5.0, "still moving at {:?}", velocity);
}

#[test]
fn ball_pushed_sideways_stays_between_the_walls() {
    let (config, mut world) = ball_pit();
    let handle = world.spawn_entity(
        ShapeParams::Circle { radius: RADIUS },
        5.0,
        Vec2::new(960.0, 540.0),
        Rgba::WHITE,
    );
    world.set_velocity(handle, Vec2::new(800.0, 0.0));

    let (left, right) = (10.0 + RADIUS - 5.0, config.width as f32 - 10.0 - RADIUS + 5.0);
    for _ in 0..600 {
        world.step(nominal_step(&config));
        let x = world.pose(handle).expect("ball is live").position.x;
        assert!(x >= left && x <= right, "escaped the enclosure at x = {}", x);
    }
}

#[test]
fn reset_with_a_held_ball_leaves_only_the_walls() {
    let (config, mut world) = ball_pit();
    let walls_only = world.engine_stats();
    let mut controller = drag_controller(&config);

    for i in 0..5 {
        controller.handle(
            &mut world,
            &press(PointerButton::Primary, Vec2::new(300.0 + 150.0 * i as f32, 400.0)),
        );
    }
    let spawned: Vec<_> = world
        .entities()
        .iter()
        .map(|e| (e.body_handle(), e.collider_handle()))
        .collect();
    assert_eq!(spawned.len(), 5);

    controller.handle(&mut world, &press(PointerButton::Secondary, Vec2::new(600.0, 400.0)));
    assert!(controller.drag().is_some());
    assert_eq!(world.engine_stats().joints, 1);

    controller.handle(&mut world, &InputEvent::KeyDown(Key::Reset));

    assert!(world.is_empty());
    assert!(controller.drag().is_none());
    assert_eq!(world.engine_stats(), walls_only);
    for (body, collider) in spawned {
        assert!(!world.contains_body(body));
        assert!(!world.contains_collider(collider));
    }

    // The world keeps working after a reset
    controller.handle(&mut world, &press(PointerButton::Primary, Vec2::new(500.0, 500.0)));
    world.step(nominal_step(&config));
    assert_eq!(world.len(), 1);
}

#[test]
fn dragged_ball_is_carried_to_the_pointer() {
    let (config, mut world) = ball_pit();
    let mut controller = drag_controller(&config);
    controller.handle(&mut world, &press(PointerButton::Primary, Vec2::new(500.0, 500.0)));
    let handle = world.handles().next().expect("one ball");

    controller.handle(&mut world, &press(PointerButton::Secondary, Vec2::new(500.0, 500.0)));
    let target = Vec2::new(800.0, 300.0);
    // Move the pointer in small increments, one per frame
    for i in 1..=30 {
        let position = Vec2::new(500.0, 500.0).lerp(target, i as f32 / 30.0);
        controller.handle(&mut world, &InputEvent::PointerMove { position });
        world.step(nominal_step(&config));
    }
    for _ in 0..120 {
        world.step(nominal_step(&config));
    }

    let position = world.pose(handle).expect("ball is live").position;
    assert!(
        position.distance(target) < 15.0,
        "ball at {:?}, pointer at {:?}",
        position,
        target
    );

    controller.handle(
        &mut world,
        &InputEvent::PointerUp {
            button: PointerButton::Secondary,
            position: target,
        },
    );
    assert_eq!(world.engine_stats().joints, 0);
}

#[test]
fn paused_frames_do_not_step_or_count() {
    let (config, mut world) = ball_pit();
    let handle = world.spawn_entity(
        ShapeParams::Circle { radius: RADIUS },
        5.0,
        Vec2::new(500.0, 500.0),
        Rgba::WHITE,
    );
    let t0 = Instant::now();
    let mut scheduler = FrameScheduler::new(config.target_fps, t0);
    let frame = Duration::from_millis(20);

    let mut now = t0;
    for _ in 0..10 {
        scheduler.begin_frame(now);
        if scheduler.should_step() {
            world.step(scheduler.nominal_step());
        }
        now += frame;
        scheduler.end_frame(now);
    }
    scheduler.toggle_pause(now);
    let frozen = world.pose(handle).expect("ball is live");

    for _ in 0..10 {
        scheduler.begin_frame(now);
        if scheduler.should_step() {
            world.step(scheduler.nominal_step());
        }
        now += frame;
        scheduler.end_frame(now);
    }

    assert_eq!(world.pose(handle).expect("ball is live"), frozen);
    assert_eq!(scheduler.frames(), 10);
    assert_eq!(hud_text(world.len(), scheduler.fps(now)), "Balls count : 1 - FPS : 50");
}
