/*
Skydash
*/
use bevy::prelude::*;

use crate::levels::HUB_INDEX;
use crate::pause::{PauseLedger, PauseReason};
use crate::run::StartRequested;
use crate::save::{ProgressRecord, SaveStore};
use crate::scene::LoadLevel;

/// One-time blocking tutorial shown on the very first play request.
#[derive(Resource, Debug, Clone, Default)]
pub struct TutorialGate {
    pub active: bool,
}

#[derive(Component)]
pub struct TutorialOverlay;

pub fn setup_tutorial_overlay(mut commands: Commands) {
    commands
        .spawn((
            TutorialOverlay,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(12.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.85)),
            Visibility::Hidden,
        ))
        .with_children(|overlay| {
            overlay.spawn((
                Text::new("WELCOME TO SKYDASH"),
                TextFont { font_size: 40.0, ..default() },
                TextColor(Color::WHITE),
            ));
            overlay.spawn((
                Text::new(
                    "WASD to move, Space to jump. Reach the beacon before the\n\
                     timer runs out - the faster you finish, the higher the score.\n\
                     Falling off costs a life; three falls end the run.",
                ),
                TextFont { font_size: 22.0, ..default() },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
            ));
            overlay.spawn((
                Text::new("Press Enter to continue"),
                TextFont { font_size: 22.0, ..default() },
                TextColor(Color::srgb(0.9, 0.8, 0.3)),
            ));
        });
}

/// Play intent from the hub: returning players go straight to level 1,
/// first-timers get the blocking tutorial instead.
pub fn handle_start_requests(
    mut requests: MessageReader<StartRequested>,
    record: Res<ProgressRecord>,
    mut gate: ResMut<TutorialGate>,
    mut ledger: ResMut<PauseLedger>,
    mut load: MessageWriter<LoadLevel>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    if gate.active {
        return;
    }

    if record.first_time_shown {
        load.write(LoadLevel { index: HUB_INDEX + 1 });
    } else {
        info!("First-time player, showing tutorial");
        gate.active = true;
        ledger.request(PauseReason::Tutorial);
    }
}

/// Runs before `handle_start_requests` so the keypress that opened the
/// tutorial cannot also dismiss it in the same frame.
pub fn dismiss_tutorial(
    keys: Res<ButtonInput<KeyCode>>,
    mut gate: ResMut<TutorialGate>,
    mut record: ResMut<ProgressRecord>,
    store: Res<SaveStore>,
    mut ledger: ResMut<PauseLedger>,
    mut load: MessageWriter<LoadLevel>,
) {
    if !gate.active {
        return;
    }
    if !keys.just_pressed(KeyCode::Enter) {
        return;
    }

    gate.active = false;
    record.first_time_shown = true;
    store.save(&record);
    ledger.clear(PauseReason::Tutorial);

    load.write(LoadLevel { index: HUB_INDEX + 1 });
}

/// Re-asserted every tick while the tutorial is up, so another component
/// clearing its own pause cannot unfreeze the tutorial.
pub fn enforce_tutorial_freeze(gate: Res<TutorialGate>, mut ledger: ResMut<PauseLedger>) {
    if gate.active && !ledger.holds(PauseReason::Tutorial) {
        ledger.request(PauseReason::Tutorial);
    }
}

pub fn sync_tutorial_overlay(
    gate: Res<TutorialGate>,
    mut q: Query<&mut Visibility, With<TutorialOverlay>>,
) {
    let Some(mut visibility) = q.iter_mut().next() else {
        return;
    };
    *visibility = if gate.active {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };
}

pub struct FirstTimePlugin;

impl Plugin for FirstTimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TutorialGate>()
            .add_systems(Startup, setup_tutorial_overlay)
            .add_systems(
                Update,
                (
                    dismiss_tutorial.before(handle_start_requests),
                    handle_start_requests,
                    enforce_tutorial_freeze,
                    sync_tutorial_overlay,
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pause::PausePlugin;
    use crate::run::{GameFinished, GameOverDeclared, LevelStatsReady, RetryRequested, RunState};
    use crate::skins::SkinsPlugin;
    use crate::ui::UiPlugin;
    use std::path::PathBuf;

    fn gate_app(store_root: PathBuf) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<RunState>()
            .insert_resource(ProgressRecord::default())
            .insert_resource(SaveStore::at(store_root))
            .add_message::<StartRequested>()
            .add_message::<RetryRequested>()
            .add_message::<GameOverDeclared>()
            .add_message::<LevelStatsReady>()
            .add_message::<GameFinished>()
            .add_message::<LoadLevel>()
            .add_plugins((PausePlugin, SkinsPlugin, FirstTimePlugin, UiPlugin));
        app
    }

    fn press_enter(app: &mut App) {
        let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keys.reset_all();
        keys.press(KeyCode::Enter);
    }

    #[test]
    fn test_dismissal_keypress_loads_level_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = gate_app(dir.path().to_path_buf());

        // First Enter at the hub opens the tutorial instead of starting.
        press_enter(&mut app);
        app.update();
        assert!(app.world().resource::<TutorialGate>().active);
        assert!(app.world().resource::<PauseLedger>().is_paused());
        assert_eq!(app.world().resource::<Messages<LoadLevel>>().len(), 0);

        // Second Enter dismisses the tutorial. The same press must not also
        // count as a fresh start request, so exactly one load goes out.
        press_enter(&mut app);
        app.update();
        assert!(!app.world().resource::<TutorialGate>().active);
        assert!(app.world().resource::<ProgressRecord>().first_time_shown);
        assert!(!app.world().resource::<PauseLedger>().is_paused());
        assert_eq!(app.world().resource::<Messages<LoadLevel>>().len(), 1);

        // An idle frame afterwards: a leftover start request would surface
        // as a second load here.
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .reset_all();
        app.update();
        assert_eq!(app.world().resource::<Messages<LoadLevel>>().len(), 1);
    }

    #[test]
    fn test_returning_player_skips_tutorial() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = gate_app(dir.path().to_path_buf());
        app.world_mut()
            .resource_mut::<ProgressRecord>()
            .first_time_shown = true;

        press_enter(&mut app);
        app.update();
        assert!(!app.world().resource::<TutorialGate>().active);
        assert_eq!(app.world().resource::<Messages<LoadLevel>>().len(), 1);
    }
}
