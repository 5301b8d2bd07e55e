/*
Skydash
*/
use bevy::prelude::*;
use std::collections::HashSet;

/// Why the game is currently frozen. Several of these can be held at once;
/// time only resumes when every holder has released its reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseReason {
    Menu,
    Tutorial,
    GameOverScreen,
    GameFinished,
}

/// Single owner of the global time scale. Components never touch
/// `Time<Virtual>` directly; they request and clear named reasons here, so
/// one component's resume can't clobber another's pause.
#[derive(Resource, Debug, Clone, Default)]
pub struct PauseLedger {
    reasons: HashSet<PauseReason>,
}

impl PauseLedger {
    pub fn request(&mut self, reason: PauseReason) {
        self.reasons.insert(reason);
    }

    pub fn clear(&mut self, reason: PauseReason) {
        self.reasons.remove(&reason);
    }

    pub fn is_paused(&self) -> bool {
        !self.reasons.is_empty()
    }

    pub fn holds(&self, reason: PauseReason) -> bool {
        self.reasons.contains(&reason)
    }
}

/// Reapplied every frame, so anything else that unpauses virtual time gets
/// corrected on the next tick.
pub fn apply_pause_ledger(ledger: Res<PauseLedger>, mut time: ResMut<Time<Virtual>>) {
    if ledger.is_paused() {
        if !time.is_paused() {
            time.pause();
        }
    } else if time.is_paused() {
        time.unpause();
    }
}

pub struct PausePlugin;

impl Plugin for PausePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PauseLedger>()
            .add_systems(Update, apply_pause_ledger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resumes_only_when_all_reasons_cleared() {
        let mut ledger = PauseLedger::default();
        assert!(!ledger.is_paused());

        ledger.request(PauseReason::Menu);
        ledger.request(PauseReason::Tutorial);
        assert!(ledger.is_paused());

        ledger.clear(PauseReason::Menu);
        assert!(ledger.is_paused(), "tutorial still holds the pause");

        ledger.clear(PauseReason::Tutorial);
        assert!(!ledger.is_paused());
    }

    #[test]
    fn test_duplicate_requests_are_idempotent() {
        let mut ledger = PauseLedger::default();
        ledger.request(PauseReason::Menu);
        ledger.request(PauseReason::Menu);
        ledger.clear(PauseReason::Menu);
        assert!(!ledger.is_paused());
    }
}
