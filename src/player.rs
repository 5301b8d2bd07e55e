/*
Skydash
*/
use bevy::prelude::*;

use crate::run::{GoalReached, RunState};
use crate::scene::{Goal, LevelColliders};
use crate::skins::{SKINS, SkinModel};

#[derive(Component)]
pub struct Player;

/// Integrated velocity; zeroed on respawn and level load so no momentum
/// carries over.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerMotion {
    pub velocity: Vec3,
    pub grounded: bool,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct FollowCamera {
    pub offset: Vec3,
}

#[derive(Resource)]
pub struct PlayerSettings {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            move_speed: 7.0,
            jump_speed: 9.0,
            gravity: 22.0,
        }
    }
}

const PLAYER_HALF_HEIGHT: f32 = 0.5;
const PLAYER_RADIUS: f32 = 0.35;

pub fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    record: Res<crate::save::ProgressRecord>,
) {
    let body = meshes.add(Cuboid::new(
        PLAYER_RADIUS * 2.0,
        PLAYER_HALF_HEIGHT * 2.0,
        PLAYER_RADIUS * 2.0,
    ));

    commands
        .spawn((
            Player,
            PlayerMotion::default(),
            Transform::from_xyz(0.0, 1.5, 0.0),
            Visibility::default(),
        ))
        .with_children(|player| {
            // One model per skin; exactly one visible at a time.
            for (index, skin) in SKINS.iter().enumerate() {
                let visibility = if index == record.equipped_skin_index {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                };
                player.spawn((
                    SkinModel(index),
                    Mesh3d(body.clone()),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: skin.tint,
                        ..default()
                    })),
                    Transform::default(),
                    visibility,
                ));
            }
        });

    commands.spawn((
        Camera3d::default(),
        FollowCamera { offset: Vec3::new(0.0, 6.0, 9.0) },
        Transform::from_xyz(0.0, 7.5, 9.0).looking_at(Vec3::new(0.0, 1.5, 0.0), Vec3::Y),
    ));
}

pub fn player_move(
    time: Res<Time<Fixed>>,
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<PlayerSettings>,
    run: Res<RunState>,
    colliders: Res<LevelColliders>,
    mut q_player: Query<(&mut Transform, &mut PlayerMotion), With<Player>>,
) {
    let Ok((mut transform, mut motion)) = q_player.single_mut() else {
        return;
    };

    // Movement is frozen entirely while play is suspended.
    if !run.playing {
        return;
    }

    let dt = time.delta_secs();

    let mut wish = Vec3::ZERO;
    if keys.pressed(KeyCode::KeyW) { wish.z -= 1.0; }
    if keys.pressed(KeyCode::KeyS) { wish.z += 1.0; }
    if keys.pressed(KeyCode::KeyD) { wish.x += 1.0; }
    if keys.pressed(KeyCode::KeyA) { wish.x -= 1.0; }
    let wish = wish.normalize_or_zero();

    motion.velocity.x = wish.x * settings.move_speed;
    motion.velocity.z = wish.z * settings.move_speed;

    if motion.grounded && keys.pressed(KeyCode::Space) {
        motion.velocity.y = settings.jump_speed;
        motion.grounded = false;
    }

    motion.velocity.y -= settings.gravity * dt;
    let step = motion.velocity * dt;
    transform.translation += step;

    // Land on platform tops while falling.
    motion.grounded = false;
    if motion.velocity.y <= 0.0 {
        let feet = transform.translation.y - PLAYER_HALF_HEIGHT;
        for (center, half) in &colliders.boxes {
            let top = center.y + half.y;
            let within_x = (transform.translation.x - center.x).abs() <= half.x + PLAYER_RADIUS;
            let within_z = (transform.translation.z - center.z).abs() <= half.z + PLAYER_RADIUS;
            let crossing = feet <= top && feet - step.y >= top - 0.01;
            if within_x && within_z && crossing {
                transform.translation.y = top + PLAYER_HALF_HEIGHT;
                motion.velocity.y = 0.0;
                motion.grounded = true;
                break;
            }
        }
    }
}

pub fn camera_follow(
    q_player: Query<&Transform, (With<Player>, Without<FollowCamera>)>,
    mut q_camera: Query<(&mut Transform, &FollowCamera), Without<Player>>,
) {
    let Ok(player) = q_player.single() else {
        return;
    };
    for (mut transform, follow) in &mut q_camera {
        transform.translation = player.translation + follow.offset;
        transform.look_at(player.translation, Vec3::Y);
    }
}

/// Goal trigger. Only fires while playing, so a touch after play stopped
/// (or a second touch in the same completion) is ignored.
pub fn reach_goal(
    run: Res<RunState>,
    q_player: Query<&Transform, With<Player>>,
    q_goal: Query<(&Transform, &Goal), Without<Player>>,
    mut reached: MessageWriter<GoalReached>,
) {
    if !run.playing {
        return;
    }
    let Ok(player) = q_player.single() else {
        return;
    };
    for (goal_tf, goal) in q_goal.iter() {
        if player.translation.distance(goal_tf.translation) <= goal.radius {
            reached.write(GoalReached);
            return;
        }
    }
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerSettings>()
            .add_systems(Startup, spawn_player)
            .add_systems(FixedUpdate, player_move)
            .add_systems(Update, (camera_follow, reach_goal));
    }
}
