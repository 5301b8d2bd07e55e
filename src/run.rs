/*
Skydash
*/
use bevy::prelude::*;

use crate::levels::{HUB_INDEX, LevelTable};
use crate::player::{Player, PlayerMotion};
use crate::save::{ProgressRecord, SaveStore};
use crate::scene::{LevelLoaded, LoadLevel};
use crate::scoring::dynamic_score;

pub const STARTING_LIVES: u32 = 3;

/// The countdown does not run all the way to zero; anything at or below this
/// is already a loss.
const TIMER_EPSILON: f32 = 0.9;

/// Play begins (fresh timer and lives).
#[derive(Message, Debug, Clone, Copy)]
pub struct PlayStarted;

/// Player intent from the hub menu; the first-time gate decides whether play
/// actually starts or the tutorial blocks first.
#[derive(Message, Debug, Clone, Copy)]
pub struct StartRequested;

/// Retry the current level from the game-over screen.
#[derive(Message, Debug, Clone, Copy)]
pub struct RetryRequested;

/// Player touched the level goal.
#[derive(Message, Debug, Clone, Copy)]
pub struct GoalReached;

#[derive(Message, Debug, Clone, Copy)]
pub struct GameOverDeclared {
    pub final_score: i32,
}

/// Completion stats banked and persisted, ready for the UI.
#[derive(Message, Debug, Clone, Copy)]
pub struct LevelStatsReady {
    pub level_index: usize,
    pub score: i32,
    pub time_taken: f32,
    pub new_best: bool,
}

/// The last level was completed; there is no next level to load.
#[derive(Message, Debug, Clone, Copy)]
pub struct GameFinished;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeLoss {
    Survived { remaining: u32 },
    OutOfLives,
}

/// Transient state of the active run.
#[derive(Resource, Debug, Clone)]
pub struct RunState {
    pub level_index: usize,
    /// Seconds remaining on the current level.
    pub timer: f32,
    pub playing: bool,
    /// Derived from the timer while playing, frozen the moment play stops.
    pub current_score: f32,
    pub lives: u32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            level_index: HUB_INDEX,
            timer: 0.0,
            playing: false,
            current_score: 0.0,
            lives: STARTING_LIVES,
        }
    }
}

impl RunState {
    pub fn start(&mut self, duration: f32) {
        self.playing = true;
        self.current_score = 0.0;
        self.lives = STARTING_LIVES;
        self.timer = duration;
    }

    /// Returns true when the countdown has run out.
    pub fn tick_down(&mut self, dt: f32) -> bool {
        self.timer -= dt;
        self.timer <= TIMER_EPSILON
    }

    /// Losing the last life is terminal: lives snap to 0 and the caller must
    /// run the game-over flow instead of a respawn.
    pub fn lose_life(&mut self) -> LifeLoss {
        if self.lives > 1 {
            self.lives -= 1;
            LifeLoss::Survived { remaining: self.lives }
        } else {
            self.lives = 0;
            LifeLoss::OutOfLives
        }
    }
}

/// Shared game-over path for the timer running out and falling with no lives
/// left. Per-level bests are only banked on completion; failing a level never
/// records one, even though the aggregates are recomputed and saved.
pub fn do_game_over(
    run: &mut RunState,
    record: &mut ProgressRecord,
    table: &LevelTable,
    store: &SaveStore,
    declared: &mut MessageWriter<GameOverDeclared>,
) {
    run.playing = false;

    let final_score = dynamic_score(run.timer.max(0.0), table.duration(run.level_index));
    run.current_score = final_score as f32;

    record.recompute_totals();
    store.save(record);

    declared.write(GameOverDeclared { final_score });
    info!(
        "Game over on {} with score {final_score}",
        table.get(run.level_index).name
    );
}

pub fn tick_run_timer(
    time: Res<Time>,
    table: Res<LevelTable>,
    mut run: ResMut<RunState>,
    mut record: ResMut<ProgressRecord>,
    store: Res<SaveStore>,
    mut declared: MessageWriter<GameOverDeclared>,
) {
    if !run.playing {
        return;
    }

    if run.tick_down(time.delta_secs()) {
        // Out of time: game over immediately, skip the per-frame score.
        do_game_over(&mut run, &mut record, &table, &store, &mut declared);
        return;
    }

    run.current_score = dynamic_score(run.timer, table.duration(run.level_index)) as f32;
}

pub fn handle_goal_reached(
    mut reached: MessageReader<GoalReached>,
    table: Res<LevelTable>,
    mut run: ResMut<RunState>,
    mut record: ResMut<ProgressRecord>,
    store: Res<SaveStore>,
    mut stats: MessageWriter<LevelStatsReady>,
    mut finished: MessageWriter<GameFinished>,
    mut load: MessageWriter<LoadLevel>,
) {
    if reached.is_empty() {
        return;
    }
    reached.clear();

    // A goal touched after play already stopped is a redundant trigger.
    if !run.playing {
        return;
    }
    run.playing = false;

    let duration = table.duration(run.level_index);
    let final_score = dynamic_score(run.timer, duration);
    run.current_score = final_score as f32;

    let time_taken = duration - run.timer;
    let new_best = record.record_completion(run.level_index, final_score as f32, time_taken);
    store.save(&record);

    info!(
        "{} complete: score {final_score}, time {time_taken:.1}s{}",
        table.get(run.level_index).name,
        if new_best { " (new best)" } else { "" }
    );

    stats.write(LevelStatsReady {
        level_index: run.level_index,
        score: final_score,
        time_taken,
        new_best,
    });

    if run.level_index >= table.last_level() {
        finished.write(GameFinished);
    } else {
        load.write(LoadLevel { index: run.level_index + 1 });
    }
}

/// Scene gateway callback: reset the run for the freshly loaded level. The
/// hub waits for an explicit start; real levels begin immediately.
pub fn handle_level_loaded(
    mut loaded: MessageReader<LevelLoaded>,
    table: Res<LevelTable>,
    mut run: ResMut<RunState>,
    mut started: MessageWriter<PlayStarted>,
) {
    for msg in loaded.read() {
        run.level_index = msg.index;
        run.playing = false;
        run.current_score = 0.0;
        run.timer = table.duration(msg.index);

        if msg.index > HUB_INDEX {
            run.start(table.duration(msg.index));
            started.write(PlayStarted);
        }
    }
}

pub fn handle_retry(
    mut retry: MessageReader<RetryRequested>,
    table: Res<LevelTable>,
    mut run: ResMut<RunState>,
    mut respawn: ResMut<crate::fall::RespawnSequence>,
    mut q_player: Query<(&mut Transform, &mut PlayerMotion), With<Player>>,
    mut started: MessageWriter<PlayStarted>,
) {
    if retry.is_empty() {
        return;
    }
    retry.clear();

    let spec = table.get(run.level_index);
    if let Ok((mut transform, mut motion)) = q_player.single_mut() {
        transform.translation = spec.spawn_point();
        motion.velocity = Vec3::ZERO;
    }
    respawn.reset();

    run.start(spec.duration_secs);
    started.write(PlayStarted);
    info!("Retrying {}", spec.name);
}

pub struct RunPlugin;

impl Plugin for RunPlugin {
    fn build(&self, app: &mut App) {
        let store = SaveStore::default_location();
        let record = store.load().unwrap_or_default();

        app.insert_resource(LevelTable::load_embedded())
            .insert_resource(record)
            .insert_resource(store)
            .init_resource::<RunState>()
            .add_message::<PlayStarted>()
            .add_message::<StartRequested>()
            .add_message::<RetryRequested>()
            .add_message::<GoalReached>()
            .add_message::<GameOverDeclared>()
            .add_message::<LevelStatsReady>()
            .add_message::<GameFinished>()
            .add_systems(
                Update,
                (
                    tick_run_timer,
                    handle_goal_reached,
                    handle_level_loaded,
                    handle_retry,
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lives_sequence() {
        let mut run = RunState::default();
        run.start(60.0);

        assert_eq!(run.lose_life(), LifeLoss::Survived { remaining: 2 });
        assert_eq!(run.lose_life(), LifeLoss::Survived { remaining: 1 });
        assert_eq!(run.lose_life(), LifeLoss::OutOfLives);
        assert_eq!(run.lives, 0);
    }

    #[test]
    fn test_start_resets_run() {
        let mut run = RunState {
            level_index: 4,
            timer: 3.2,
            playing: false,
            current_score: 55.0,
            lives: 1,
        };
        run.start(90.0);

        assert!(run.playing);
        assert_eq!(run.timer, 90.0);
        assert_eq!(run.current_score, 0.0);
        assert_eq!(run.lives, STARTING_LIVES);
    }

    #[test]
    fn test_timeout_uses_near_zero_epsilon() {
        let mut run = RunState::default();
        run.start(10.0);

        assert!(!run.tick_down(8.0), "2.0s left is not a timeout");
        assert!(run.tick_down(1.2), "0.8s left is a timeout");
    }
}
