//! Event queues
//!
//! Simulation code never touches the audio device. It sends a cue into a
//! queue during the frame, and the run loop drains the queue and plays the
//! matching sound afterwards. This keeps the session testable headless.

/// Per-frame FIFO of events of one type
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Take every queued event in send order, leaving the queue empty
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sound effects the simulation can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Jump,
    Dash,
    Hit,
    Shoot,
}

impl SoundCue {
    pub const ALL: [SoundCue; 4] = [SoundCue::Jump, SoundCue::Dash, SoundCue::Hit, SoundCue::Shoot];

    /// File stem under `sfx/`
    pub fn file_stem(self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Dash => "dash",
            SoundCue::Hit => "hit",
            SoundCue::Shoot => "shoot",
        }
    }
}

pub type SoundCues = EventQueue<SoundCue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_in_order() {
        let mut queue = EventQueue::default();
        for n in [4, 8, 15] {
            queue.send(n);
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain().collect::<Vec<i32>>(), vec![4, 8, 15]);
        assert!(queue.is_empty());
        assert_eq!(queue.drain().count(), 0);
    }

    #[test]
    fn test_sound_cues_keep_order() {
        let mut cues = SoundCues::new();
        cues.send(SoundCue::Shoot);
        cues.send(SoundCue::Hit);
        assert_eq!(cues.iter().copied().collect::<Vec<_>>(), vec![SoundCue::Shoot, SoundCue::Hit]);
        assert_eq!(cues.drain().last(), Some(SoundCue::Hit));
        assert!(cues.is_empty());
    }
}
