/*
Skydash
*/
use bevy::prelude::*;

use crate::save::{ProgressRecord, SaveStore};

/// Fixed cosmetic catalog: display name, unlock score, body tint.
pub const SKINS: [SkinDef; 4] = [
    SkinDef { name: "Rookie", unlock_score: 0.0, tint: Color::srgb(0.85, 0.85, 0.9) },
    SkinDef { name: "Ember", unlock_score: 150.0, tint: Color::srgb(0.9, 0.35, 0.2) },
    SkinDef { name: "Tide", unlock_score: 400.0, tint: Color::srgb(0.2, 0.5, 0.9) },
    SkinDef { name: "Midnight", unlock_score: 750.0, tint: Color::srgb(0.15, 0.1, 0.3) },
];

#[derive(Debug, Clone, Copy)]
pub struct SkinDef {
    pub name: &'static str,
    pub unlock_score: f32,
    pub tint: Color,
}

/// One per skin, spawned as children of the player. Exactly one is visible.
#[derive(Component, Debug, Clone, Copy)]
pub struct SkinModel(pub usize);

#[derive(Message, Debug, Clone, Copy)]
pub struct EquipRequest {
    pub index: usize,
}

/// Observable denial; the UI surfaces it instead of silently ignoring.
#[derive(Message, Debug, Clone, Copy)]
pub struct EquipDenied {
    pub index: usize,
    pub reason: EquipError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipError {
    OutOfRange,
    Locked,
}

pub fn unlocked(record: &ProgressRecord, index: usize) -> bool {
    index < SKINS.len() && record.overall_highscore >= SKINS[index].unlock_score
}

/// Validate and apply an equip. The record is untouched on denial.
pub fn try_equip(record: &mut ProgressRecord, index: usize) -> Result<(), EquipError> {
    if index >= SKINS.len() {
        return Err(EquipError::OutOfRange);
    }
    if record.overall_highscore < SKINS[index].unlock_score {
        return Err(EquipError::Locked);
    }
    record.equipped_skin_index = index;
    Ok(())
}

pub fn handle_equip_requests(
    mut requests: MessageReader<EquipRequest>,
    mut record: ResMut<ProgressRecord>,
    store: Res<SaveStore>,
    mut denied: MessageWriter<EquipDenied>,
) {
    for req in requests.read() {
        match try_equip(&mut record, req.index) {
            Ok(()) => {
                store.save(&record);
                info!("Equipped skin {} ({})", req.index, SKINS[req.index].name);
            }
            Err(reason) => {
                match reason {
                    EquipError::OutOfRange => {
                        warn!("Invalid skin index {}", req.index);
                    }
                    EquipError::Locked => {
                        warn!(
                            "Skin {} is locked, needs overall highscore {}",
                            req.index, SKINS[req.index].unlock_score
                        );
                    }
                }
                denied.write(EquipDenied { index: req.index, reason });
            }
        }
    }
}

/// Mutual exclusion: the equipped model is visible, every other one hidden.
pub fn sync_skin_visibility(
    record: Res<ProgressRecord>,
    mut q_models: Query<(&SkinModel, &mut Visibility)>,
) {
    if !record.is_changed() {
        return;
    }
    for (model, mut visibility) in &mut q_models {
        *visibility = if model.0 == record.equipped_skin_index {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

pub struct SkinsPlugin;

impl Plugin for SkinsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<EquipRequest>()
            .add_message::<EquipDenied>()
            .add_systems(Update, (handle_equip_requests, sync_skin_visibility));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_when_locked() {
        let mut record = ProgressRecord::default();
        record.overall_highscore = 100.0;

        assert_eq!(try_equip(&mut record, 1), Err(EquipError::Locked));
        assert_eq!(record.equipped_skin_index, 0, "denial leaves record unchanged");
    }

    #[test]
    fn test_denied_out_of_range() {
        let mut record = ProgressRecord::default();
        assert_eq!(try_equip(&mut record, SKINS.len()), Err(EquipError::OutOfRange));
    }

    #[test]
    fn test_accepted_when_threshold_met() {
        let mut record = ProgressRecord::default();
        record.overall_highscore = 150.0;

        assert_eq!(try_equip(&mut record, 1), Ok(()));
        assert_eq!(record.equipped_skin_index, 1);
        assert!(unlocked(&record, 1));
        assert!(!unlocked(&record, 2));
    }
}
