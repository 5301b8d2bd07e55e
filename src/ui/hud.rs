use bevy::prelude::*;

use crate::levels::HUB_INDEX;
use crate::run::{LevelStatsReady, RunState};

#[derive(Component)]
pub(super) struct HudTimerText;

#[derive(Component)]
pub(super) struct HudScoreText;

#[derive(Component)]
pub(super) struct HudLivesText;

/// Transient one-liner under the HUD bar ("Level complete!" and the like).
#[derive(Component)]
pub(super) struct HudToastText;

#[derive(Component)]
pub(super) struct ToastTimer(pub Timer);

const UI_PAD: f32 = 8.0;

pub(crate) fn setup_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            ..default()
        })
        .with_children(|ui| {
            ui.spawn((
                Node {
                    width: Val::Percent(100.0),
                    height: Val::Px(48.0),
                    padding: UiRect::all(Val::Px(UI_PAD)),
                    justify_content: JustifyContent::SpaceBetween,
                    align_items: AlignItems::Center,
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
            ))
            .with_children(|bar| {
                bar.spawn((
                    HudTimerText,
                    Text::new("Time: --"),
                    TextFont { font_size: 28.0, ..default() },
                    TextColor(Color::WHITE),
                ));
                bar.spawn((
                    HudScoreText,
                    Text::new("Potential Score: --"),
                    TextFont { font_size: 28.0, ..default() },
                    TextColor(Color::WHITE),
                ));
                bar.spawn((
                    HudLivesText,
                    Text::new("Lives: 3"),
                    TextFont { font_size: 28.0, ..default() },
                    TextColor(Color::WHITE),
                ));
            });

            ui.spawn((
                HudToastText,
                ToastTimer(Timer::from_seconds(3.0, TimerMode::Once)),
                Text::new(""),
                TextFont { font_size: 22.0, ..default() },
                TextColor(Color::srgb(0.9, 0.8, 0.3)),
                Node {
                    margin: UiRect::all(Val::Px(UI_PAD)),
                    align_self: AlignSelf::Center,
                    ..default()
                },
            ));
        });
}

/// Numeric formatting is owned here: seconds are ceiling-rounded, scores are
/// floor-rounded.
pub(crate) fn sync_hud_text(
    run: Res<RunState>,
    mut q: Query<(
        &mut Text,
        Option<&HudTimerText>,
        Option<&HudScoreText>,
        Option<&HudLivesText>,
    )>,
) {
    if !run.is_changed() {
        return;
    }

    let in_level = run.level_index != HUB_INDEX;
    for (mut text, timer_tag, score_tag, lives_tag) in &mut q {
        if timer_tag.is_some() {
            *text = if in_level {
                Text::new(format!("Time: {}", run.timer.max(0.0).ceil() as i32))
            } else {
                Text::new("Time: --")
            };
        } else if score_tag.is_some() {
            *text = if in_level {
                Text::new(format!("Potential Score: {}", run.current_score.floor() as i32))
            } else {
                Text::new("Potential Score: --")
            };
        } else if lives_tag.is_some() {
            *text = Text::new(format!("Lives: {}", run.lives));
        }
    }
}

pub(crate) fn show_level_toast(
    time: Res<Time>,
    mut stats: MessageReader<LevelStatsReady>,
    mut q: Query<(&mut Text, &mut ToastTimer), With<HudToastText>>,
) {
    let Ok((mut text, mut toast)) = q.single_mut() else {
        return;
    };

    for msg in stats.read() {
        let best = if msg.new_best { " - new best!" } else { "" };
        *text = Text::new(format!(
            "Level complete! Score {} in {:.0}s{best}",
            msg.score,
            msg.time_taken.ceil()
        ));
        toast.0.reset();
    }

    toast.0.tick(time.delta());
    if toast.0.just_finished() {
        *text = Text::new("");
    }
}
