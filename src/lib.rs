pub mod capture;
pub mod config;
pub mod export;
pub mod playback;
pub mod pose;
pub mod render;
pub mod track;
pub mod video;
