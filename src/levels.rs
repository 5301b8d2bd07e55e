/*
Skydash
*/
use bevy::prelude::*;
use serde::Deserialize;

use crate::save::LEVEL_SLOTS;

/// Hub scene index. Everything above it is a playable level.
pub const HUB_INDEX: usize = 0;

/// Embedded level table; parsed and validated once at startup.
const LEVEL_TABLE_RON: &str = include_str!("../assets/levels.ron");

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformSpec {
    pub pos: [f32; 3],
    pub size: [f32; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct LevelSpec {
    pub name: String,
    /// Countdown duration in seconds. Unused for the hub.
    pub duration_secs: f32,
    /// Dropping below this Y counts as a fall.
    pub fall_boundary_y: f32,
    pub spawn_point: [f32; 3],
    pub goal: [f32; 3],
    pub platforms: Vec<PlatformSpec>,
}

impl LevelSpec {
    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from_array(self.spawn_point)
    }

    pub fn goal(&self) -> Vec3 {
        Vec3::from_array(self.goal)
    }
}

/// One entry per scene index: hub at 0, then the ten levels.
/// Replaces the old per-scene switch tables with a single validated map.
#[derive(Resource, Debug, Clone)]
pub struct LevelTable {
    levels: Vec<LevelSpec>,
}

impl LevelTable {
    /// Parse the embedded table. A malformed or incomplete table is a
    /// build/data mismatch, not a runtime condition, so this panics loudly.
    pub fn load_embedded() -> Self {
        let levels: Vec<LevelSpec> = match ron::from_str(LEVEL_TABLE_RON) {
            Ok(levels) => levels,
            Err(err) => panic!("assets/levels.ron is malformed: {err}"),
        };
        let table = Self { levels };
        table.validate();
        table
    }

    fn validate(&self) {
        assert_eq!(
            self.levels.len(),
            LEVEL_SLOTS + 1,
            "level table must hold the hub plus {LEVEL_SLOTS} levels, found {}",
            self.levels.len()
        );
        for (index, spec) in self.levels.iter().enumerate() {
            assert!(!spec.name.is_empty(), "level {index} has no name");
            if index > HUB_INDEX {
                assert!(
                    spec.duration_secs > 0.0,
                    "level {index} ({}) has no duration configured",
                    spec.name
                );
                assert!(
                    spec.spawn_point[1] > spec.fall_boundary_y,
                    "level {index} ({}) spawns below its fall boundary",
                    spec.name
                );
            }
        }
        info!("Level table validated: {} entries", self.levels.len());
    }

    /// Fatal on an unknown index: a load request for a level that is not in
    /// the table means the build and the data disagree.
    pub fn get(&self, index: usize) -> &LevelSpec {
        self.levels
            .get(index)
            .unwrap_or_else(|| panic!("no level configured at index {index}"))
    }

    pub fn duration(&self, index: usize) -> f32 {
        self.get(index).duration_secs
    }

    pub fn last_level(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::load_embedded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_table_is_valid() {
        let table = LevelTable::load_embedded();
        assert_eq!(table.len(), LEVEL_SLOTS + 1);
        assert_eq!(table.last_level(), 10);
        assert_eq!(table.get(HUB_INDEX).name, "Hub");
    }

    #[test]
    fn test_playable_levels_have_goals_off_spawn() {
        let table = LevelTable::load_embedded();
        for index in 1..=table.last_level() {
            let spec = table.get(index);
            assert!(
                spec.spawn_point().distance(spec.goal()) > 2.0,
                "{} goal sits on its spawn point",
                spec.name
            );
        }
    }
}
