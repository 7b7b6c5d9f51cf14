//! Game simulation
//!
//! `Session` owns one run: the loaded level, actors, effects, score and the
//! level transition. `Session::step` only simulates; drawing reads the
//! session through `renderer::compose_frame` and sounds leave it as queued
//! `SoundCue`s.

pub mod camera;
pub mod clouds;
pub mod context;
pub mod effects;
pub mod enemy;
pub mod entity;
pub mod event;
pub mod player;
pub mod projectile;
pub mod renderer;
pub mod session;
