//! Synthesized show audio.
//!
//! Every clip is generated in memory at startup, nothing is loaded from disk.
//! Playback goes through rodio when the crate is built with the `sound`
//! feature and an output device opens; otherwise the show runs [`Silent`].

use crate::collab::{Audio, Silent};
use fastrand::Rng;
use std::f32::consts::TAU;

pub const SAMPLE_RATE: u32 = 44_100;
pub const EXPLOSION_VARIANTS: usize = 3;

const LAUNCH_SECONDS: f32 = 0.35;
/// Rumble pitch of each explosion variant relative to the first.
const RUMBLE_PITCH: [f32; EXPLOSION_VARIANTS] = [1.0, 0.8, 1.25];
const EXPLOSION_SECONDS: [f32; EXPLOSION_VARIANTS] = [0.9, 1.1, 0.75];

/// Major pentatonic loop, Hz.
const MELODY: [f32; 16] = [
    392.0, 440.0, 523.25, 587.33, 659.25, 587.33, 523.25, 440.0, //
    392.0, 329.63, 293.66, 329.63, 392.0, 440.0, 392.0, 329.63,
];
const NOTE_SECONDS: f32 = 0.3;
const MUSIC_VOLUME: f32 = 0.08;

fn sample_count(seconds: f32) -> usize {
    (seconds * SAMPLE_RATE as f32) as usize
}

fn time_of(i: usize) -> f32 {
    i as f32 / SAMPLE_RATE as f32
}

/// Rising whistle with a little hiss.
pub fn launch_samples(rng: &mut Rng) -> Vec<f32> {
    let mut phase = 0.0f32;
    (0..sample_count(LAUNCH_SECONDS))
        .map(|i| {
            let progress = time_of(i) / LAUNCH_SECONDS;
            let freq = 300.0 + 600.0 * progress;
            phase = (phase + TAU * freq / SAMPLE_RATE as f32) % TAU;

            let envelope = (1.0 - progress) * (progress * 20.0).min(1.0);
            let hiss = (rng.f32() * 2.0 - 1.0) * 0.4;
            (phase.sin() * 0.6 + hiss) * envelope * 0.25
        })
        .collect()
}

/// Low rumble and noise with a short attack. `variant` wraps around.
pub fn explosion_samples(variant: usize, rng: &mut Rng) -> Vec<f32> {
    let variant = variant % EXPLOSION_VARIANTS;
    let pitch = RUMBLE_PITCH[variant];

    (0..sample_count(EXPLOSION_SECONDS[variant]))
        .map(|i| {
            let t = time_of(i);
            let envelope = if t < 0.02 {
                t / 0.02
            } else {
                (-(t - 0.02) * 4.0).exp()
            };

            let rumble = (TAU * 60.0 * pitch * t).sin() * 0.4
                + (TAU * 80.0 * pitch * t).sin() * 0.3
                + (TAU * 40.0 * pitch * t).sin() * 0.3;
            let noise = (rng.f32() * 2.0 - 1.0) * 0.5;

            (rumble + noise) * envelope * 0.5
        })
        .collect()
}

/// One pass of the background melody; the player loops it.
pub fn music_samples() -> Vec<f32> {
    let per_note = sample_count(NOTE_SECONDS);
    MELODY
        .iter()
        .flat_map(|&freq| {
            (0..per_note).map(move |i| {
                let t = time_of(i);
                let progress = i as f32 / per_note as f32;
                // Soft attack and release so notes do not click
                let envelope = (progress * 10.0).min(1.0) * (1.0 - progress).powf(0.5);
                let tone = (TAU * freq * t).sin() + 0.3 * (TAU * freq * 2.0 * t).sin();
                tone * envelope * MUSIC_VOLUME
            })
        })
        .collect()
}

#[cfg(feature = "sound")]
mod output {
    use super::{EXPLOSION_VARIANTS, SAMPLE_RATE};
    use fastrand::Rng;
    use rodio::{OutputStream, OutputStreamHandle, Sink, Source, buffer::SamplesBuffer};

    pub struct Output {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        launch: Vec<f32>,
        explosions: [Vec<f32>; EXPLOSION_VARIANTS],
        music: Vec<f32>,
        music_sink: Option<Sink>,
    }

    impl Output {
        pub fn open(rng: &mut Rng) -> Result<Self, rodio::StreamError> {
            let (stream, handle) = OutputStream::try_default()?;
            Ok(Self {
                _stream: stream,
                handle,
                launch: super::launch_samples(rng),
                explosions: std::array::from_fn(|v| super::explosion_samples(v, rng)),
                music: super::music_samples(),
                music_sink: None,
            })
        }

        fn play_once(&self, samples: &[f32]) {
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec()));
                    sink.detach();
                }
                Err(e) => log::warn!("Cannot play clip: {e}"),
            }
        }

        pub fn launch(&self) {
            self.play_once(&self.launch);
        }

        pub fn explosion(&self, variant: usize) {
            self.play_once(&self.explosions[variant % EXPLOSION_VARIANTS]);
        }

        pub fn start_music(&mut self) {
            if self.music_sink.is_some() {
                return;
            }
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    let source = SamplesBuffer::new(1, SAMPLE_RATE, self.music.clone());
                    sink.append(source.repeat_infinite());
                    self.music_sink = Some(sink);
                }
                Err(e) => log::warn!("Cannot start music: {e}"),
            }
        }

        pub fn pause_music(&self) {
            if let Some(sink) = &self.music_sink {
                sink.pause();
            }
        }

        pub fn resume_music(&self) {
            if let Some(sink) = &self.music_sink {
                sink.play();
            }
        }
    }
}

/// Speaker for the terminal show. Explosions rotate through
/// [`EXPLOSION_VARIANTS`] clips so consecutive bursts sound different.
pub struct Sound {
    next_explosion: usize,
    #[cfg(feature = "sound")]
    output: Option<output::Output>,
}

impl Sound {
    /// Opens the default output device, falling back to silence.
    #[cfg(feature = "sound")]
    pub fn open(seed: Option<u64>) -> Self {
        let mut rng = seed.map_or_else(Rng::new, Rng::with_seed);
        let output = match output::Output::open(&mut rng) {
            Ok(output) => {
                log::info!("Audio output opened");
                Some(output)
            }
            Err(e) => {
                log::warn!("No audio output, running silent: {e}");
                None
            }
        };
        Self {
            next_explosion: 0,
            output,
        }
    }

    #[cfg(not(feature = "sound"))]
    pub fn open(_seed: Option<u64>) -> Self {
        log::info!("Built without the sound feature, running silent");
        Self::silent()
    }

    pub fn silent() -> Self {
        Self {
            next_explosion: 0,
            #[cfg(feature = "sound")]
            output: None,
        }
    }

    #[cfg(feature = "sound")]
    pub fn is_audible(&self) -> bool {
        self.output.is_some()
    }

    #[cfg(not(feature = "sound"))]
    pub fn is_audible(&self) -> bool {
        false
    }

    fn take_variant(&mut self) -> usize {
        let variant = self.next_explosion;
        self.next_explosion = (variant + 1) % EXPLOSION_VARIANTS;
        variant
    }
}

impl Audio for Sound {
    fn play_launch(&mut self) {
        #[cfg(feature = "sound")]
        if let Some(out) = &self.output {
            out.launch();
            return;
        }
        Silent.play_launch();
    }

    fn play_explosion(&mut self) {
        let variant = self.take_variant();
        #[cfg(feature = "sound")]
        if let Some(out) = &self.output {
            out.explosion(variant);
            return;
        }
        log::trace!("explosion variant {variant}");
        Silent.play_explosion();
    }

    fn play_background_music(&mut self) {
        #[cfg(feature = "sound")]
        if let Some(out) = &mut self.output {
            out.start_music();
            return;
        }
        Silent.play_background_music();
    }

    fn pause_background_music(&mut self) {
        #[cfg(feature = "sound")]
        if let Some(out) = &self.output {
            out.pause_music();
        }
    }

    fn resume_background_music(&mut self) {
        #[cfg(feature = "sound")]
        if let Some(out) = &self.output {
            out.resume_music();
        }
    }
}
