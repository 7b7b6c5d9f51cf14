//! Top-level mode switching
//!
//! One mode is active per frame. Pause is a mode of its own: the session is
//! kept but not stepped.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::MusicTrack;
use crate::game::event::SoundCue;
use crate::game::session::{Session, StepOutcome};
use crate::input::{Command, InputState};
use crate::world::LevelSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Menu,
    Run,
    Paused,
}

impl AppMode {
    pub fn music(self) -> MusicTrack {
        match self {
            AppMode::Menu => MusicTrack::Menu,
            AppMode::Run | AppMode::Paused => MusicTrack::Run,
        }
    }
}

pub struct AppState {
    mode: AppMode,
    session: Option<Session>,
    pub input: InputState,
    levels: LevelSet,
    /// Seeds each run's session
    rng: StdRng,
    cloud_images: usize,
}

impl AppState {
    pub fn new(levels: LevelSet, rng: StdRng, cloud_images: usize) -> Self {
        Self {
            mode: AppMode::Menu,
            session: None,
            input: InputState::new(),
            levels,
            rng,
            cloud_images,
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Begin a new run from level 0 with score 0
    pub fn start_run(&mut self) {
        let rng = StdRng::seed_from_u64(self.rng.gen());
        self.session = Some(Session::new(self.levels.clone(), rng, self.cloud_images));
        self.input.release_all();
        self.set_mode(AppMode::Run);
    }

    pub fn return_to_menu(&mut self) {
        self.session = None;
        self.input.release_all();
        self.set_mode(AppMode::Menu);
    }

    fn set_mode(&mut self, mode: AppMode) {
        if self.mode != mode {
            log::info!("mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    pub fn handle_command(&mut self, command: Command) {
        match (self.mode, command) {
            (AppMode::Run, Command::Pause) => self.set_mode(AppMode::Paused),
            (AppMode::Paused, Command::Pause) => self.set_mode(AppMode::Run),
            (AppMode::Run, Command::Jump) => {
                if let Some(session) = &mut self.session {
                    session.jump();
                }
            }
            (AppMode::Run, Command::Dash) => {
                if let Some(session) = &mut self.session {
                    session.dash();
                }
            }
            _ => {}
        }
    }

    /// Advance the active run by one frame; returns the sound cues it raised
    pub fn update(&mut self) -> Vec<SoundCue> {
        if self.mode != AppMode::Run {
            return Vec::new();
        }
        let Some(session) = &mut self.session else {
            return Vec::new();
        };

        let outcome = session.step(self.input.movement());
        let cues = session.drain_cues().collect();
        if outcome == StepOutcome::GameComplete {
            log::info!("all levels cleared");
            self.return_to_menu();
        }
        cues
    }
}
