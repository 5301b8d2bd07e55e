/*
Skydash
*/
use bevy::prelude::*;

use crate::levels::{HUB_INDEX, LevelTable};
use crate::player::{Player, PlayerMotion};

/// Ask the gateway to tear down the current level and build another.
#[derive(Message, Debug, Clone, Copy)]
pub struct LoadLevel {
    pub index: usize,
}

/// Emitted once the new level's entities are in place.
#[derive(Message, Debug, Clone, Copy)]
pub struct LevelLoaded {
    pub index: usize,
}

/// Everything tagged with this is torn down on a level change. The player,
/// camera, and UI persist across loads.
#[derive(Component)]
pub struct LevelEntity;

#[derive(Component, Debug, Clone, Copy)]
pub struct Goal {
    pub radius: f32,
}

/// Axis-aligned platform volumes of the loaded level, for ground collision.
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelColliders {
    pub boxes: Vec<(Vec3, Vec3)>, // (center, half extents)
}

pub fn request_initial_load(mut load: MessageWriter<LoadLevel>) {
    load.write(LoadLevel { index: HUB_INDEX });
}

pub fn handle_load_level(
    mut requests: MessageReader<LoadLevel>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    table: Res<LevelTable>,
    mut colliders: ResMut<LevelColliders>,
    q_level: Query<Entity, With<LevelEntity>>,
    mut q_player: Query<(&mut Transform, &mut PlayerMotion), With<Player>>,
    mut loaded: MessageWriter<LevelLoaded>,
) {
    // Only the last request this frame matters.
    let Some(request) = requests.read().last().copied() else {
        return;
    };

    let spec = table.get(request.index);
    info!("Loading {} (index {})", spec.name, request.index);

    for entity in q_level.iter() {
        commands.entity(entity).despawn();
    }
    colliders.boxes.clear();

    let platform_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.4, 0.5),
        perceptual_roughness: 0.9,
        ..default()
    });
    let goal_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.85, 0.2),
        emissive: LinearRgba::rgb(2.0, 1.6, 0.2),
        ..default()
    });

    for platform in &spec.platforms {
        let size = Vec3::from_array(platform.size);
        let center = Vec3::from_array(platform.pos);

        commands.spawn((
            LevelEntity,
            Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
            MeshMaterial3d(platform_mat.clone()),
            Transform::from_translation(center),
        ));
        colliders.boxes.push((center, size * 0.5));
    }

    // Goal beacon
    commands.spawn((
        LevelEntity,
        Goal { radius: 1.2 },
        Mesh3d(meshes.add(Cuboid::new(0.8, 1.6, 0.8))),
        MeshMaterial3d(goal_mat),
        Transform::from_translation(spec.goal()),
    ));

    commands.spawn((
        LevelEntity,
        PointLight {
            intensity: 2_000_000.0,
            shadows_enabled: true,
            range: 120.0,
            ..default()
        },
        Transform::from_translation(spec.spawn_point() + Vec3::new(0.0, 12.0, -8.0)),
    ));

    if let Ok((mut transform, mut motion)) = q_player.single_mut() {
        transform.translation = spec.spawn_point();
        motion.velocity = Vec3::ZERO;
    }

    loaded.write(LevelLoaded { index: request.index });
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelColliders>()
            .add_message::<LoadLevel>()
            .add_message::<LevelLoaded>()
            .add_systems(Startup, request_initial_load)
            .add_systems(Update, handle_load_level);
    }
}
