//! Arclight library - audio-reactive HUD visualization core

pub mod audio;
pub mod deploy;
pub mod params;
pub mod particles;
pub mod rendering;
pub mod response;
pub mod rings;
pub mod spectrum;
pub mod spring;
