use bevy::prelude::*;

mod game_over;
mod hud;
mod menu;

pub use game_over::{FinishedScreen, GameOverScreen};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameOverScreen>()
            .init_resource::<FinishedScreen>()
            .init_resource::<menu::PauseMenu>()
            .add_systems(
                Startup,
                (hud::setup_hud, menu::setup_menus, game_over::setup_overlays),
            )
            .add_systems(
                Update,
                (
                    hud::sync_hud_text,
                    hud::show_level_toast,
                    // Before the tutorial systems, so the Enter press that
                    // dismisses the tutorial is never also read as a new
                    // start request.
                    menu::hub_menu_input.before(crate::first_time::dismiss_tutorial),
                    menu::reset_progress_input,
                    menu::sync_hub_menu,
                    menu::pause_menu_input,
                    game_over::reveal_game_over,
                    game_over::game_over_input,
                    game_over::handle_game_finished,
                ),
            );
    }
}
