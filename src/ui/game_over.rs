use bevy::prelude::*;

use crate::levels::HUB_INDEX;
use crate::pause::{PauseLedger, PauseReason};
use crate::run::{GameFinished, GameOverDeclared, RetryRequested, RunState};
use crate::save::ProgressRecord;
use crate::scene::LoadLevel;

#[derive(Component)]
pub(super) struct GameOverOverlay;

#[derive(Component)]
pub(super) struct GameOverStatsText;

#[derive(Component)]
pub(super) struct FinishedOverlay;

#[derive(Component)]
pub(super) struct FinishedStatsText;

/// Short beat between the game-over moment and the overlay, then the ledger
/// freezes time until the player picks retry or hub.
#[derive(Resource, Debug, Clone)]
pub struct GameOverScreen {
    pub pending: bool,
    pub active: bool,
    pub final_score: i32,
    pub reveal: Timer,
}

impl Default for GameOverScreen {
    fn default() -> Self {
        let mut reveal = Timer::from_seconds(1.0, TimerMode::Once);
        // Start finished so it does nothing until activated
        reveal.set_elapsed(reveal.duration());
        Self {
            pending: false,
            active: false,
            final_score: 0,
            reveal,
        }
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct FinishedScreen {
    pub active: bool,
}

pub(crate) fn setup_overlays(mut commands: Commands) {
    commands
        .spawn((
            GameOverOverlay,
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
            BackgroundColor(Color::srgba(0.25, 0.0, 0.0, 0.8)),
            Visibility::Hidden,
        ))
        .with_children(|overlay| {
            overlay.spawn((
                Text::new("GAME OVER"),
                TextFont { font_size: 52.0, ..default() },
                TextColor(Color::srgb(0.95, 0.3, 0.25)),
            ));
            overlay.spawn((
                GameOverStatsText,
                Text::new(""),
                TextFont { font_size: 22.0, ..default() },
                TextColor(Color::WHITE),
            ));
            overlay.spawn((
                Text::new("R to retry, M for the hub"),
                TextFont { font_size: 22.0, ..default() },
                TextColor(Color::srgb(0.9, 0.8, 0.3)),
            ));
        });

    commands
        .spawn((
            FinishedOverlay,
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
            BackgroundColor(Color::srgba(0.0, 0.1, 0.25, 0.85)),
            Visibility::Hidden,
        ))
        .with_children(|overlay| {
            overlay.spawn((
                Text::new("CONGRATULATIONS! YOU FINISHED THE GAME!"),
                TextFont { font_size: 40.0, ..default() },
                TextColor(Color::srgb(0.4, 0.9, 0.5)),
            ));
            overlay.spawn((
                FinishedStatsText,
                Text::new(""),
                TextFont { font_size: 22.0, ..default() },
                TextColor(Color::WHITE),
            ));
            overlay.spawn((
                Text::new("M for the hub"),
                TextFont { font_size: 22.0, ..default() },
                TextColor(Color::srgb(0.9, 0.8, 0.3)),
            ));
        });
}

/// Level rows only appear once that level has a recorded completion, and the
/// overall rows once anything has been completed at all.
fn stats_lines(run: &RunState, record: &ProgressRecord, final_score: i32) -> String {
    let mut lines = format!("Score: {final_score}\n");

    if run.level_index != HUB_INDEX && record.level_completed(run.level_index) {
        let slot = ProgressRecord::slot(run.level_index);
        lines.push_str(&format!(
            "Level Highscore: {}\nBest Time: {} seconds\n",
            record.level_highscores[slot].floor() as i32,
            record.level_completion_times[slot].floor() as i32,
        ));
    }

    let completed = record.completed_count();
    if completed > 0 {
        lines.push_str(&format!(
            "Total Time: {} seconds ({completed}/10 levels)\nOverall Highscore: {}\n",
            record.total_completion_time.floor() as i32,
            record.overall_highscore.floor() as i32,
        ));
    }
    lines
}

pub(crate) fn reveal_game_over(
    time: Res<Time>,
    mut declared: MessageReader<GameOverDeclared>,
    mut screen: ResMut<GameOverScreen>,
    mut ledger: ResMut<PauseLedger>,
    run: Res<RunState>,
    record: Res<ProgressRecord>,
    mut q_overlay: Query<&mut Visibility, With<GameOverOverlay>>,
    mut q_stats: Query<&mut Text, With<GameOverStatsText>>,
) {
    for msg in declared.read() {
        screen.pending = true;
        screen.final_score = msg.final_score;
        screen.reveal.reset();
    }

    if !screen.pending {
        return;
    }

    screen.reveal.tick(time.delta());
    if !screen.reveal.is_finished() {
        return;
    }

    screen.pending = false;
    screen.active = true;
    ledger.request(PauseReason::GameOverScreen);

    if let Ok(mut text) = q_stats.single_mut() {
        *text = Text::new(stats_lines(&run, &record, screen.final_score));
    }
    if let Ok(mut visibility) = q_overlay.single_mut() {
        *visibility = Visibility::Visible;
    }
}

pub(crate) fn game_over_input(
    keys: Res<ButtonInput<KeyCode>>,
    mut screen: ResMut<GameOverScreen>,
    mut ledger: ResMut<PauseLedger>,
    mut retry: MessageWriter<RetryRequested>,
    mut load: MessageWriter<LoadLevel>,
    mut q_overlay: Query<&mut Visibility, With<GameOverOverlay>>,
) {
    if !screen.active {
        return;
    }

    let retry_pressed = keys.just_pressed(KeyCode::KeyR);
    let hub_pressed = keys.just_pressed(KeyCode::KeyM);
    if !retry_pressed && !hub_pressed {
        return;
    }

    screen.active = false;
    ledger.clear(PauseReason::GameOverScreen);
    if let Ok(mut visibility) = q_overlay.single_mut() {
        *visibility = Visibility::Hidden;
    }

    if retry_pressed {
        retry.write(RetryRequested);
    } else {
        load.write(LoadLevel { index: HUB_INDEX });
    }
}

pub(crate) fn handle_game_finished(
    keys: Res<ButtonInput<KeyCode>>,
    mut finished_msgs: MessageReader<GameFinished>,
    mut screen: ResMut<FinishedScreen>,
    mut ledger: ResMut<PauseLedger>,
    record: Res<ProgressRecord>,
    mut load: MessageWriter<LoadLevel>,
    mut q_overlay: Query<&mut Visibility, With<FinishedOverlay>>,
    mut q_stats: Query<&mut Text, With<FinishedStatsText>>,
) {
    if !finished_msgs.is_empty() {
        finished_msgs.clear();
        screen.active = true;
        ledger.request(PauseReason::GameFinished);

        if let Ok(mut text) = q_stats.single_mut() {
            *text = Text::new(format!(
                "Overall Highscore: {}\nTotal Time: {} seconds",
                record.overall_highscore.floor() as i32,
                record.total_completion_time.floor() as i32,
            ));
        }
        if let Ok(mut visibility) = q_overlay.single_mut() {
            *visibility = Visibility::Visible;
        }
    }

    if screen.active && keys.just_pressed(KeyCode::KeyM) {
        screen.active = false;
        ledger.clear(PauseReason::GameFinished);
        if let Ok(mut visibility) = q_overlay.single_mut() {
            *visibility = Visibility::Hidden;
        }
        load.write(LoadLevel { index: HUB_INDEX });
    }
}
