//! Audio cue playback
//!
//! The simulation only emits named cues. This module turns them into simple
//! procedural tone descriptions and hands them to whatever synthesizer the
//! host provides through [`AudioSink`].

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, SoundCue};

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single enveloped oscillator burst
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    /// Hz
    pub frequency: f32,
    /// Seconds
    pub duration: f32,
    pub waveform: Waveform,
    /// Gain at the start of the envelope (before volume scaling)
    pub start_gain: f32,
    /// Gain reached by exponential ramp at the end
    pub end_gain: f32,
}

impl ToneSpec {
    const fn new(frequency: f32, duration: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            duration,
            waveform,
            start_gain: 0.1,
            end_gain: 0.01,
        }
    }

    /// Tone for a cue
    pub fn for_cue(cue: SoundCue) -> Self {
        match cue {
            SoundCue::BowDraw => Self::new(200.0, 0.1, Waveform::Sawtooth),
            SoundCue::ArrowRelease => Self::new(400.0, 0.2, Waveform::Triangle),
            SoundCue::Hit => Self::new(150.0, 0.3, Waveform::Square),
            SoundCue::Fire => Self::new(300.0, 0.4, Waveform::Sawtooth),
            SoundCue::Death => Self::new(100.0, 0.8, Waveform::Square),
        }
    }
}

/// Host-side tone player. Must not block the simulation.
pub trait AudioSink {
    fn play_tone(&mut self, cue: SoundCue, tone: &ToneSpec, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudioSink {
    played: u64,
}

impl LogAudioSink {
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudioSink {
    fn play_tone(&mut self, cue: SoundCue, tone: &ToneSpec, volume: f32) {
        self.played += 1;
        log::debug!(
            "Sound {cue:?}: {:.0} Hz {:?} for {:.1}s at volume {volume:.2}",
            tone.frequency,
            tone.waveform,
            tone.duration
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a single cue
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play_tone(cue, &ToneSpec::for_cue(cue), vol);
    }

    /// Play the sound cues among a batch of drained events
    pub fn play_events<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            if let GameEvent::Sound(cue) = event {
                self.play(*cue);
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        played: Vec<(SoundCue, f32, f32)>,
    }

    impl AudioSink for RecordingSink {
        fn play_tone(&mut self, cue: SoundCue, tone: &ToneSpec, volume: f32) {
            self.played.push((cue, tone.frequency, volume));
        }
    }

    #[test]
    fn test_tone_table() {
        let death = ToneSpec::for_cue(SoundCue::Death);
        assert_eq!(death.frequency, 100.0);
        assert_eq!(death.duration, 0.8);
        assert_eq!(death.waveform, Waveform::Square);
        assert_eq!(
            ToneSpec::for_cue(SoundCue::ArrowRelease).waveform,
            Waveform::Triangle
        );
    }

    #[test]
    fn test_plays_only_sound_events() {
        let mut audio = AudioManager::new(RecordingSink::default());
        let events = [
            GameEvent::Sound(SoundCue::Hit),
            GameEvent::ArrowSplit,
            GameEvent::Sound(SoundCue::Fire),
        ];
        audio.play_events(events.iter());
        let played: Vec<_> = audio.sink().played.iter().map(|p| p.0).collect();
        assert_eq!(played, vec![SoundCue::Hit, SoundCue::Fire]);
        assert!((audio.sink().played[0].2 - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new(RecordingSink::default());
        audio.set_muted(true);
        audio.play(SoundCue::Hit);
        audio.set_muted(false);
        audio.set_sfx_volume(0.0);
        audio.play(SoundCue::Hit);
        assert!(audio.sink().played.is_empty());
    }

    #[test]
    fn test_log_sink_counts() {
        let mut audio = AudioManager::new(LogAudioSink::default());
        audio.play(SoundCue::BowDraw);
        audio.play(SoundCue::Death);
        assert_eq!(audio.sink().played(), 2);
    }
}
