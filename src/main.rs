use bevy::prelude::*;
use skylib::audio::AudioPlugin;
use skylib::fall::FallPlugin;
use skylib::first_time::FirstTimePlugin;
use skylib::pause::PausePlugin;
use skylib::player::PlayerPlugin;
use skylib::run::RunPlugin;
use skylib::scene::ScenePlugin;
use skylib::skins::SkinsPlugin;
use skylib::ui::UiPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(Time::<Fixed>::from_seconds(1.0 / 60.0))
        .add_plugins((
            RunPlugin,
            ScenePlugin,
            PausePlugin,
            FallPlugin,
            PlayerPlugin,
            SkinsPlugin,
            FirstTimePlugin,
            AudioPlugin,
            UiPlugin,
        ))
        .run();
}
