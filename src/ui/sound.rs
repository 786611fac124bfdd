/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// Every `SoundId` maps to an in-memory WAV buffer generated once at init.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

use std::f32::consts::PI;

use frackfield::sim::event::SoundId;

const SAMPLE_RATE: u32 = 22050;

#[cfg(feature = "sound")]
mod inner {
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use tracing::warn;

    use frackfield::sim::event::SoundId;

    use super::{make_wav, samples_for, ALL_SOUNDS};

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        clips: HashMap<SoundId, Arc<Vec<u8>>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output: {e}");
                    return None;
                }
            };
            let clips = ALL_SOUNDS
                .iter()
                .map(|&id| (id, Arc::new(make_wav(&samples_for(id)))))
                .collect();
            Some(SoundEngine { _stream: stream, handle, clips })
        }

        pub fn play(&self, id: SoundId) {
            let Some(buf) = self.clips.get(&id) else { return };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _id: SoundId) {}
}

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
const ALL_SOUNDS: [SoundId; 13] = [
    SoundId::Dig,
    SoundId::FallingRock,
    SoundId::PlayerSquirt,
    SoundId::PlayerGiveUp,
    SoundId::PlayerAnnoyed,
    SoundId::ProtesterYell,
    SoundId::ProtesterAnnoyed,
    SoundId::ProtesterGiveUp,
    SoundId::ProtesterFoundGold,
    SoundId::FoundOil,
    SoundId::GotGoodie,
    SoundId::Sonar,
    SoundId::FinishedLevel,
];

// ════════════════════════════════════════════════════════════
//  Waveform generators: all produce Vec<f32> mono samples
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn samples_for(id: SoundId) -> Vec<f32> {
    match id {
        SoundId::Dig => gen_noise(0.06, 0.2),
        SoundId::FallingRock => gen_sweep(600.0, 150.0, 0.35, 0.3),
        SoundId::PlayerSquirt => gen_sweep(900.0, 1400.0, 0.12, 0.2),
        SoundId::PlayerGiveUp => gen_notes(&[(440.0, 0.12), (370.0, 0.12), (311.0, 0.12), (261.0, 0.25)], 0.3),
        SoundId::PlayerAnnoyed => gen_notes(&[(220.0, 0.08)], 0.3),
        SoundId::ProtesterYell => gen_sweep(300.0, 500.0, 0.2, 0.3),
        SoundId::ProtesterAnnoyed => gen_notes(&[(330.0, 0.06), (262.0, 0.06)], 0.25),
        SoundId::ProtesterGiveUp => gen_sweep(500.0, 120.0, 0.3, 0.25),
        SoundId::ProtesterFoundGold => gen_notes(&[(784.0, 0.06), (659.0, 0.08)], 0.25),
        SoundId::FoundOil => gen_notes(&[(523.0, 0.08), (659.0, 0.08), (784.0, 0.08), (1047.0, 0.2)], 0.3),
        SoundId::GotGoodie => gen_notes(&[(1047.0, 0.045), (1319.0, 0.045), (1568.0, 0.045)], 0.25),
        SoundId::Sonar => gen_notes(&[(1200.0, 0.3)], 0.2),
        SoundId::FinishedLevel => gen_notes(
            &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.1), (1047.0, 0.3)],
            0.3,
        ),
    }
}

/// Sequence of sine notes with a soft decay on each.
fn gen_notes(notes: &[(f32, f32)], volume: f32) -> Vec<f32> {
    let mut samples = Vec::new();
    for &(freq, dur) in notes {
        let n = (SAMPLE_RATE as f32 * dur) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32).powf(0.5) * 0.7;
            let wave = (t * freq * 2.0 * PI).sin() * 0.7 + (t * freq * 3.0 * 2.0 * PI).sin() * 0.3;
            samples.push(wave * env * volume);
        }
    }
    samples
}

/// Linear frequency sweep from `from` to `to` Hz.
fn gen_sweep(from: f32, to: f32, duration: f32, volume: f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * duration) as usize;
    let mut phase = 0.0_f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let freq = from + (to - from) * t;
            phase += freq * 2.0 * PI / SAMPLE_RATE as f32;
            phase.sin() * (1.0 - t).powf(0.6) * volume
        })
        .collect()
}

/// Short noise burst (LCG noise, fading out).
fn gen_noise(duration: f32, volume: f32) -> Vec<f32> {
    let n = (SAMPLE_RATE as f32 * duration) as usize;
    let mut rng: u32 = 12345;
    (0..n)
        .map(|i| {
            rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
            let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
            noise * (1.0 - i as f32 / n as f32) * volume
        })
        .collect()
}

// ════════════════════════════════════════════════════════════
//  WAV encoder: wraps f32 samples into a valid WAV buffer
// ════════════════════════════════════════════════════════════

#[cfg_attr(not(feature = "sound"), allow(dead_code))]
fn make_wav(samples: &[f32]) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 16;
    let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
    let block_align = num_channels * bits_per_sample / 8;
    let data_size = samples.len() as u32 * 2;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&num_channels.to_le_bytes());
    buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());

    for &s in samples {
        let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        buf.extend_from_slice(&val.to_le_bytes());
    }

    buf
}
