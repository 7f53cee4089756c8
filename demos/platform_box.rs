//! Platform Box Example
//!
//! A playable box in a walled room with a floating platform and a low ledge.
//! Level geometry is plain Rapier colliders; the box sweeps against them.
//!
//! ## Controls
//! - **A/D**: Move horizontally
//! - **W/S**: Move up and down
//! - **Space**: Jump (hold to float when enabled in `player.ron`)
//! - **Left Shift**: Dash
//! - **Mouse**: Aim
//!
//! Tuning is read from `demos/player.ron`. The camera trails the box and
//! never rises above it.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;
use sweep_box_controller::prelude::*;

// ==================== Constants ====================

const CONFIG_PATH: &str = "demos/player.ron";

const ROOM_WIDTH: f32 = 40.0;
const ROOM_HEIGHT: f32 = 20.0;
const WALL_THICKNESS: f32 = 1.0;

const PLATFORM_Y: f32 = -3.0;
const PLATFORM_HALF_WIDTH: f32 = 4.0;

/// World units drawn per screen pixel.
const CAMERA_SCALE: f32 = 1.0 / 32.0;
const CAMERA_FOLLOW_RADIUS: f32 = 2.0;
const CAMERA_FOLLOW_RATE: f32 = 4.0;

/// Marker for the controlled box.
#[derive(Component)]
struct Player;

// ==================== Main ====================

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Platform Box - Box Controller Example".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        // Box controller
        .add_plugins(BoxControllerPlugin::<Rapier2dBackend>::default())
        .add_plugins(BoxDebugGizmosPlugin)
        // Systems
        .add_systems(Startup, setup)
        .add_systems(Update, (handle_input, camera_follow))
        .run();
}

fn player_config() -> BoxControllerConfig {
    match BoxControllerConfig::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            warn!("Using built-in player tuning: {err}");
            BoxControllerConfig::player()
        }
    }
}

// ==================== Setup ====================

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: CAMERA_SCALE,
            ..OrthographicProjection::default_2d()
        }),
    ));

    spawn_room(&mut commands);

    // Platform and a low ledge by the right wall
    spawn_static_box(
        &mut commands,
        Vec2::new(0.0, PLATFORM_Y),
        Vec2::new(PLATFORM_HALF_WIDTH, 0.25),
        Color::srgb(0.4, 0.5, 0.3),
    );
    spawn_static_box(
        &mut commands,
        Vec2::new(ROOM_WIDTH / 2.0 - 4.0, -ROOM_HEIGHT / 2.0 + 1.0),
        Vec2::new(3.0, 1.0),
        Color::srgb(0.5, 0.4, 0.3),
    );

    spawn_player(&mut commands);

    commands.spawn((
        Text::new("A/D: Move | W/S: Up/Down | Space: Jump | Shift: Dash | Mouse: Aim"),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
    ));
}

fn spawn_room(commands: &mut Commands) {
    let half_width = ROOM_WIDTH / 2.0;
    let half_height = ROOM_HEIGHT / 2.0;
    let half_wall = WALL_THICKNESS / 2.0;
    let color = Color::srgb(0.3, 0.3, 0.3);

    // Floor and ceiling
    for y in [-half_height - half_wall, half_height + half_wall] {
        spawn_static_box(
            commands,
            Vec2::new(0.0, y),
            Vec2::new(half_width + WALL_THICKNESS, half_wall),
            color,
        );
    }

    // Walls
    for x in [-half_width - half_wall, half_width + half_wall] {
        spawn_static_box(
            commands,
            Vec2::new(x, 0.0),
            Vec2::new(half_wall, half_height),
            color,
        );
    }
}

fn spawn_static_box(commands: &mut Commands, position: Vec2, half_size: Vec2, color: Color) {
    commands.spawn((
        Transform::from_translation(position.extend(0.0)),
        RigidBody::Fixed,
        Collider::cuboid(half_size.x, half_size.y),
        Sprite::from_color(color, half_size * 2.0),
    ));
}

fn spawn_player(commands: &mut Commands) {
    let config = player_config();
    info!("Spawning player box with {config:?}");

    commands.spawn((
        Player,
        Transform::from_xyz(-ROOM_WIDTH / 4.0, 0.0, 1.0),
        config,
        BoxInput::default(),
        Rapier2dBoxBundle::new(&config),
        Sprite::from_color(Color::srgb(0.2, 0.6, 0.9), config.size()),
    ));
}

// ==================== Input ====================

/// Forwards held keys and the cursor position to the player's [`BoxInput`].
///
/// Key-down edges are derived by the controller from the held state.
fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform)>,
    mut q_input: Query<&mut BoxInput, With<Player>>,
) {
    let mut held = Actions::empty();
    for (key, action) in [
        (KeyCode::KeyA, Actions::MOVE_LEFT),
        (KeyCode::KeyD, Actions::MOVE_RIGHT),
        (KeyCode::KeyW, Actions::MOVE_UP),
        (KeyCode::KeyS, Actions::MOVE_DOWN),
        (KeyCode::Space, Actions::JUMP),
        (KeyCode::ShiftLeft, Actions::DASH),
    ] {
        held.set(action, keyboard.pressed(key));
    }

    let aim_target = q_window
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .and_then(|cursor| {
            let (camera, camera_transform) = q_camera.single().ok()?;
            camera.viewport_to_world_2d(camera_transform, cursor).ok()
        });

    for mut input in &mut q_input {
        input.set_all_held(held);
        if aim_target.is_some() {
            input.set_aim_target(aim_target);
        }
    }
}

// ==================== Camera ====================

/// Moves the camera toward the player once it leaves the follow radius.
fn camera_follow(
    time: Res<Time>,
    q_player: Query<&Transform, (With<Player>, Without<Camera2d>)>,
    mut q_camera: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(player_transform) = q_player.single() else {
        return;
    };
    let Ok(mut camera_transform) = q_camera.single_mut() else {
        return;
    };

    let target = player_transform.translation.xy();
    let difference = target - camera_transform.translation.xy();
    let distance = difference.length();

    if distance > CAMERA_FOLLOW_RADIUS {
        let rate = (CAMERA_FOLLOW_RATE * time.delta_secs()).clamp(0.0, 1.0);
        let step = difference / distance * (distance - CAMERA_FOLLOW_RADIUS) * rate;
        camera_transform.translation += step.extend(0.0);
    }

    // The camera never sits above the player
    camera_transform.translation.y = camera_transform.translation.y.min(target.y);
}
