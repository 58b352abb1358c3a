//! Sound intents. The game only says when music should start or stop; a
//! sink decides what that sounds like. Sink failures are logged and never
//! reach the simulation.

use std::io::Write;

use log::warn;

use crate::game::GameEvent;

const BELL: &[u8] = b"\x07";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AudioSignal {
    Start,
    Stop,
}

pub trait AudioSink {
    fn signal(&mut self, signal: AudioSignal);
}

/// Discards every signal.
#[derive(Default, Debug)]
pub struct Silent;

impl AudioSink for Silent {
    fn signal(&mut self, _signal: AudioSignal) {}
}

/// Rings the terminal bell when music starts.
pub struct Bell<W: Write> {
    out: W,
    playing: bool,
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for Bell<W> {
    fn signal(&mut self, signal: AudioSignal) {
        match signal {
            AudioSignal::Start => {
                self.playing = true;
                if let Err(err) = self.out.write_all(BELL).and_then(|_| self.out.flush()) {
                    warn!("audio output failed: {}", err);
                }
            }
            AudioSignal::Stop => self.playing = false,
        }
    }
}

/// The audio intent implied by a game event, if any.
pub fn signal_for(event: &GameEvent, sound_on: bool) -> Option<AudioSignal> {
    match event {
        GameEvent::GameRestarted if sound_on => Some(AudioSignal::Start),
        GameEvent::SoundToggled(true) => Some(AudioSignal::Start),
        GameEvent::SoundToggled(false) | GameEvent::GameOver => Some(AudioSignal::Stop),
        _ => None,
    }
}
