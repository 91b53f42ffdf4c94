/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
/// Playback failures are logged and otherwise ignored; the game never
/// waits on audio.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

/// Every effect the game can request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SoundEffect {
    Hit,
    Start,
    Pause,
    End,
    Celebration,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 5] = [
        SoundEffect::Hit,
        SoundEffect::Start,
        SoundEffect::Pause,
        SoundEffect::End,
        SoundEffect::Celebration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SoundEffect::Hit => "hit",
            SoundEffect::Start => "start",
            SoundEffect::Pause => "pause",
            SoundEffect::End => "end",
            SoundEffect::Celebration => "celebration",
        }
    }
}

/// The audio collaborator: play an effect, no feedback.
pub trait AudioSink {
    fn play(&self, effect: SoundEffect);
}

/// Which effects a batch of events asks for, in order.
pub fn effects_for(events: &[GameEvent]) -> Vec<SoundEffect> {
    let mut out = Vec::new();
    for event in events {
        match event {
            GameEvent::MoleWhacked { .. } => out.push(SoundEffect::Hit),
            GameEvent::SessionStarted { .. } => out.push(SoundEffect::Start),
            GameEvent::PauseChanged { paused: true } => out.push(SoundEffect::Pause),
            GameEvent::SessionEnded { new_best, .. } => {
                out.push(SoundEffect::End);
                if *new_best {
                    out.push(SoundEffect::Celebration);
                }
            }
            _ => {}
        }
    }
    out
}

/// Play whatever `events` call for.
pub fn play_events(sink: Option<&dyn AudioSink>, events: &[GameEvent]) {
    let sink = match sink {
        Some(s) => s,
        None => return,
    };
    for effect in effects_for(events) {
        sink.play(effect);
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;

    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use tracing::{debug, warn};

    use super::{AudioSink, SoundEffect};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers, indexed by `SoundEffect as usize`.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        volume: f32,
        buffers: Vec<Vec<u8>>,
    }

    impl std::fmt::Debug for SoundEngine {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("SoundEngine").field("volume", &self.volume).finish()
        }
    }

    impl SoundEngine {
        /// `volume` is 0..=100. Returns None when no output device is available.
        pub fn new(volume: u8) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("audio output unavailable: {e}");
                    return None;
                }
            };

            let buffers: Vec<Vec<u8>> = SoundEffect::ALL
                .iter()
                .map(|fx| make_wav(&generate(*fx)))
                .collect();

            Some(SoundEngine {
                _stream: stream,
                handle,
                volume: volume.min(100) as f32 / 100.0,
                buffers,
            })
        }
    }

    impl AudioSink for SoundEngine {
        fn play(&self, effect: SoundEffect) {
            let buf = match self.buffers.get(effect as usize) {
                Some(b) => b,
                None => return,
            };
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    debug!(effect = effect.name(), "sound dropped: {e}");
                    return;
                }
            };
            match rodio::Decoder::new(Cursor::new(buf.clone())) {
                Ok(src) => {
                    sink.set_volume(self.volume);
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
                Err(e) => debug!(effect = effect.name(), "sound decode failed: {e}"),
            }
        }
    }

    fn generate(effect: SoundEffect) -> Vec<f32> {
        match effect {
            SoundEffect::Hit => gen_hit(),
            SoundEffect::Start => gen_start(),
            SoundEffect::Pause => gen_pause(),
            SoundEffect::End => gen_end(),
            SoundEffect::Celebration => gen_celebration(),
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(freq: f32, i: usize) -> f32 {
        let t = i as f32 / SAMPLE_RATE as f32;
        (t * freq * 2.0 * std::f32::consts::PI).sin()
    }

    /// A run of notes, each with a linear decay to `1 - decay`.
    fn notes(seq: &[(f32, f32)], decay: f32, volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in seq {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let env = 1.0 - (i as f32 / n as f32) * decay;
                let wave = tone(freq, i) * 0.7 + tone(freq * 2.0, i) * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Hit: noise thump into a short high blip
    fn gen_hit() -> Vec<f32> {
        let thump_n = (SAMPLE_RATE as f32 * 0.05) as usize;
        let mut rng: u32 = 2463534242;
        let mut samples: Vec<f32> = (0..thump_n)
            .map(|i| {
                let t = i as f32 / thump_n as f32;
                // xorshift noise
                rng ^= rng << 13;
                rng ^= rng >> 17;
                rng ^= rng << 5;
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let body = tone(140.0 - t * 60.0, i);
                (body * 0.6 + noise * 0.4) * (1.0 - t) * 0.4
            })
            .collect();

        let blip_n = (SAMPLE_RATE as f32 * 0.07) as usize;
        samples.extend((0..blip_n).map(|i| {
            let env = 1.0 - (i as f32 / blip_n as f32).powf(0.5);
            tone(1319.0, i) * env * 0.25 // E6
        }));
        samples
    }

    /// Start: quick ascending arpeggio C5→E5→G5
    fn gen_start() -> Vec<f32> {
        notes(&[(523.0, 0.07), (659.0, 0.07), (784.0, 0.12)], 0.4, 0.3)
    }

    /// Pause: two-note drop G5→C5
    fn gen_pause() -> Vec<f32> {
        notes(&[(784.0, 0.08), (523.0, 0.12)], 0.5, 0.25)
    }

    /// Time's up: descending tone with a tail fade
    fn gen_end() -> Vec<f32> {
        let mut samples = notes(&[(440.0, 0.12), (370.0, 0.12), (311.0, 0.12), (261.0, 0.2)], 0.3, 0.3);
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for i in (total - fade_len)..total {
            let ratio = (total - i) as f32 / fade_len as f32;
            samples[i] *= ratio;
        }
        samples
    }

    /// New best: fanfare C5→E5→G5→C6 with a sustained top note
    fn gen_celebration() -> Vec<f32> {
        let mut samples = notes(&[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.1)], 0.3, 0.3);
        let n = (SAMPLE_RATE as f32 * 0.3) as usize;
        for i in 0..n {
            let env = 1.0 - (i as f32 / n as f32);
            samples.push(tone(1047.0, i) * env * 0.3);
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
#[derive(Debug)]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_volume: u8) -> Option<Self> { Some(SoundEngine) }
}

#[cfg(not(feature = "sound"))]
impl AudioSink for SoundEngine {
    fn play(&self, _effect: SoundEffect) {}
}
