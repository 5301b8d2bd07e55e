use bevy::prelude::*;

use crate::first_time::TutorialGate;
use crate::levels::HUB_INDEX;
use crate::pause::{PauseLedger, PauseReason};
use crate::run::{RunState, StartRequested};
use crate::save::{ProgressRecord, SaveStore};
use crate::scene::LoadLevel;
use crate::skins::{EquipDenied, EquipRequest, SKINS, unlocked};

#[derive(Component)]
pub(super) struct HubMenu;

#[derive(Component)]
pub(super) struct HubStatsText;

#[derive(Component)]
pub(super) struct HubSkinsText;

#[derive(Component)]
pub(super) struct PauseOverlay;

#[derive(Resource, Debug, Clone, Default)]
pub(crate) struct PauseMenu {
    pub open: bool,
}

pub(crate) fn setup_menus(mut commands: Commands) {
    commands
        .spawn((
            HubMenu,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(10.0),
                ..default()
            },
            Visibility::Hidden,
        ))
        .with_children(|menu| {
            menu.spawn((
                Text::new("SKYDASH"),
                TextFont { font_size: 56.0, ..default() },
                TextColor(Color::WHITE),
            ));
            menu.spawn((
                Text::new("Press Enter to play, Backspace to wipe progress"),
                TextFont { font_size: 26.0, ..default() },
                TextColor(Color::srgb(0.9, 0.8, 0.3)),
            ));
            menu.spawn((
                HubStatsText,
                Text::new(""),
                TextFont { font_size: 20.0, ..default() },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
            ));
            menu.spawn((
                HubSkinsText,
                Text::new(""),
                TextFont { font_size: 20.0, ..default() },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
            ));
        });

    commands
        .spawn((
            PauseOverlay,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            Visibility::Hidden,
        ))
        .with_children(|overlay| {
            overlay.spawn((
                Text::new("PAUSED"),
                TextFont { font_size: 48.0, ..default() },
                TextColor(Color::WHITE),
            ));
            overlay.spawn((
                Text::new("Esc to resume, Q to quit to the hub"),
                TextFont { font_size: 22.0, ..default() },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
            ));
        });
}

/// Hub intents: Enter requests a start (routed through the first-time gate),
/// digit keys equip skins.
pub(crate) fn hub_menu_input(
    keys: Res<ButtonInput<KeyCode>>,
    run: Res<RunState>,
    gate: Res<TutorialGate>,
    mut start: MessageWriter<StartRequested>,
    mut equip: MessageWriter<EquipRequest>,
) {
    if run.level_index != HUB_INDEX || gate.active {
        return;
    }

    if keys.just_pressed(KeyCode::Enter) {
        start.write(StartRequested);
    }

    const SKIN_KEYS: [KeyCode; 4] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
    ];
    for (index, code) in SKIN_KEYS.iter().enumerate() {
        if keys.just_pressed(*code) {
            equip.write(EquipRequest { index });
        }
    }
}

/// Wiping progress is hub-only and deletes the save file outright rather than
/// writing a blank record.
pub(crate) fn reset_progress_input(
    keys: Res<ButtonInput<KeyCode>>,
    run: Res<RunState>,
    gate: Res<TutorialGate>,
    store: Res<SaveStore>,
    mut record: ResMut<ProgressRecord>,
) {
    if run.level_index != HUB_INDEX || gate.active {
        return;
    }
    if keys.just_pressed(KeyCode::Backspace) {
        store.clear();
        *record = ProgressRecord::default();
        info!("Progress wiped");
    }
}

pub(crate) fn sync_hub_menu(
    run: Res<RunState>,
    record: Res<ProgressRecord>,
    mut denied: MessageReader<EquipDenied>,
    mut q_menu: Query<&mut Visibility, With<HubMenu>>,
    mut q_stats: Query<&mut Text, (With<HubStatsText>, Without<HubSkinsText>)>,
    mut q_skins: Query<&mut Text, (With<HubSkinsText>, Without<HubStatsText>)>,
) {
    let at_hub = run.level_index == HUB_INDEX;
    if let Ok(mut visibility) = q_menu.single_mut() {
        *visibility = if at_hub { Visibility::Visible } else { Visibility::Hidden };
    }
    if !at_hub {
        denied.clear();
        return;
    }

    if let Ok(mut text) = q_stats.single_mut() {
        let completed = record.completed_count();
        *text = if completed > 0 {
            Text::new(format!(
                "Overall Highscore: {}   Total Time: {}s   ({completed}/10 levels)",
                record.overall_highscore.floor() as i32,
                record.total_completion_time.floor() as i32,
            ))
        } else {
            Text::new("No levels completed yet")
        };
    }

    let denial = denied.read().last().copied();
    if let Ok(mut text) = q_skins.single_mut() {
        let mut lines = String::from("Skins (press 1-4 to equip):\n");
        for (index, skin) in SKINS.iter().enumerate() {
            let state = if index == record.equipped_skin_index {
                "equipped".to_string()
            } else if unlocked(&record, index) {
                "unlocked".to_string()
            } else {
                format!("locked, needs {}", skin.unlock_score as i32)
            };
            lines.push_str(&format!("{}. {} [{state}]\n", index + 1, skin.name));
        }
        if let Some(denial) = denial {
            lines.push_str(&format!(
                "Cannot equip {}: {}\n",
                SKINS.get(denial.index).map(|s| s.name).unwrap_or("?"),
                match denial.reason {
                    crate::skins::EquipError::OutOfRange => "no such skin",
                    crate::skins::EquipError::Locked => "score too low",
                }
            ));
        }
        *text = Text::new(lines);
    }
}

/// Esc toggles the pause menu while a level is live. Quitting clears the
/// menu's own pause reason only; anything else holding the pause keeps it.
pub(crate) fn pause_menu_input(
    keys: Res<ButtonInput<KeyCode>>,
    run: Res<RunState>,
    mut menu: ResMut<PauseMenu>,
    mut ledger: ResMut<PauseLedger>,
    mut load: MessageWriter<LoadLevel>,
    mut q_overlay: Query<&mut Visibility, With<PauseOverlay>>,
) {
    let can_pause = run.playing || menu.open;
    if can_pause && keys.just_pressed(KeyCode::Escape) {
        menu.open = !menu.open;
        if menu.open {
            ledger.request(PauseReason::Menu);
        } else {
            ledger.clear(PauseReason::Menu);
        }
    }

    if menu.open && keys.just_pressed(KeyCode::KeyQ) {
        menu.open = false;
        ledger.clear(PauseReason::Menu);
        load.write(LoadLevel { index: HUB_INDEX });
    }

    if let Ok(mut visibility) = q_overlay.single_mut() {
        *visibility = if menu.open { Visibility::Visible } else { Visibility::Hidden };
    }
}
