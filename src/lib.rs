/*
Skydash
*/
pub mod audio;
pub mod fall;
pub mod first_time;
pub mod levels;
pub mod pause;
pub mod player;
pub mod run;
pub mod save;
pub mod scene;
pub mod scoring;
pub mod skins;
pub mod ui;
