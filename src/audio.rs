/*
Skydash
*/
use bevy::audio::{AudioPlayer, AudioSource, PlaybackSettings, Volume};
use bevy::prelude::*;

use crate::run::{GameOverDeclared, LevelStatsReady, PlayStarted};

#[derive(Resource)]
pub struct GameAudio {
    pub music: Handle<AudioSource>,
    pub goal_chime: Handle<AudioSource>,
}

#[derive(Component)]
pub struct Music;

pub fn setup_audio(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(GameAudio {
        music: asset_server.load("sounds/music/skyline.wav"),
        goal_chime: asset_server.load("sounds/sfx/goal_chime.wav"),
    });
}

/// Background music runs while a level is live and stops on game over.
pub fn start_music_on_play(
    mut commands: Commands,
    mut started: MessageReader<PlayStarted>,
    audio: Res<GameAudio>,
    q_music: Query<(), With<Music>>,
) {
    if started.is_empty() {
        return;
    }
    started.clear();

    // prevent duplicates when play restarts quickly
    if q_music.iter().next().is_some() {
        return;
    }

    commands.spawn((
        Music,
        AudioPlayer::new(audio.music.clone()),
        PlaybackSettings::LOOP.with_volume(Volume::Linear(0.3)),
    ));
}

pub fn stop_music_on_game_over(
    mut commands: Commands,
    mut declared: MessageReader<GameOverDeclared>,
    q_music: Query<Entity, With<Music>>,
) {
    if declared.is_empty() {
        return;
    }
    declared.clear();

    for entity in q_music.iter() {
        commands.entity(entity).despawn();
    }
}

pub fn chime_on_level_complete(
    mut commands: Commands,
    mut stats: MessageReader<LevelStatsReady>,
    audio: Res<GameAudio>,
) {
    if stats.is_empty() {
        return;
    }
    stats.clear();

    commands.spawn((
        AudioPlayer::new(audio.goal_chime.clone()),
        PlaybackSettings::DESPAWN.with_volume(Volume::Linear(0.9)),
    ));
}

pub struct AudioPlugin;

impl Plugin for AudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_audio).add_systems(
            Update,
            (
                start_music_on_play,
                stop_music_on_game_over,
                chime_on_level_complete,
            ),
        );
    }
}
