//! Sound effects and looping music

use std::collections::HashMap;
use std::path::Path;

use macroquad::audio::{load_sound, play_sound, stop_sound, PlaySoundParams, Sound};

use crate::asset::AssetError;
use crate::config::Volumes;
use crate::game::event::SoundCue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Menu,
    Run,
}

impl MusicTrack {
    pub fn file_name(self) -> &'static str {
        match self {
            MusicTrack::Menu => "8BitMenu.wav",
            MusicTrack::Run => "ElectromanAdventures.wav",
        }
    }
}

pub struct Audio {
    sfx: HashMap<SoundCue, Sound>,
    menu_music: Sound,
    run_music: Sound,
    playing: Option<MusicTrack>,
    volumes: Volumes,
}

async fn load(path: &Path) -> Result<Sound, AssetError> {
    let name = path.to_string_lossy();
    load_sound(&name)
        .await
        .map_err(|e| AssetError::Io(format!("{}: {}", name, e)))
}

impl Audio {
    /// Load `<data_dir>/sfx/*.wav` and `<data_dir>/music/*.wav`
    pub async fn load(data_dir: &Path, volumes: Volumes) -> Result<Self, AssetError> {
        let mut sfx = HashMap::new();
        for cue in SoundCue::ALL {
            let path = data_dir.join("sfx").join(format!("{}.wav", cue.file_stem()));
            sfx.insert(cue, load(&path).await?);
        }
        let music = data_dir.join("music");
        let menu_music = load(&music.join(MusicTrack::Menu.file_name())).await?;
        let run_music = load(&music.join(MusicTrack::Run.file_name())).await?;
        log::info!("loaded {} sound effects and 2 music tracks", sfx.len());

        Ok(Self { sfx, menu_music, run_music, playing: None, volumes })
    }

    pub fn play(&self, cue: SoundCue) {
        if let Some(sound) = self.sfx.get(&cue) {
            play_sound(sound, PlaySoundParams { looped: false, volume: self.volumes.for_cue(cue) });
        }
    }

    fn track(&self, track: MusicTrack) -> &Sound {
        match track {
            MusicTrack::Menu => &self.menu_music,
            MusicTrack::Run => &self.run_music,
        }
    }

    /// Switch the looping background music; restarts nothing if already playing
    pub fn play_music(&mut self, track: MusicTrack) {
        if self.playing == Some(track) {
            return;
        }
        if let Some(current) = self.playing {
            stop_sound(self.track(current));
        }
        play_sound(self.track(track), PlaySoundParams { looped: true, volume: self.volumes.music });
        self.playing = Some(track);
    }
}
