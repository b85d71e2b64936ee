// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Audio loading for the transcription path
//!
//! Turns an uploaded audio file into the 16kHz mono f32 stream the ASR
//! model consumes, whatever container and codec the client sent.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::warn;

use super::SpeechError;

/// Sample rate the ASR model expects
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Decode an audio file into 16kHz mono f32 samples.
///
/// Container and codec support comes from symphonia (WAV, AAC/M4A, ...).
/// Multichannel input is mixed down to mono; the rate is converted when the
/// source differs from the model rate.
pub fn decode_file(path: &Path) -> Result<Vec<f32>, SpeechError> {
    let file = File::open(path)?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| SpeechError::AudioDecode(format!("unrecognized container: {e}")))?;

    let (samples, source_rate) = read_mono_samples(probed.format)?;

    if source_rate == TARGET_SAMPLE_RATE {
        Ok(samples)
    } else {
        to_target_rate(samples, source_rate)
    }
}

/// Drain the container's default audio track into mono f32 samples
fn read_mono_samples(mut format: Box<dyn FormatReader>) -> Result<(Vec<f32>, u32), SpeechError> {
    let track = format
        .default_track()
        .ok_or_else(|| SpeechError::AudioDecode("container has no audio track".into()))?;
    let track_id = track.id;
    let params = track.codec_params.clone();
    let source_rate = params.sample_rate.unwrap_or(TARGET_SAMPLE_RATE);
    let channel_count = params.channels.map_or(1, |c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| SpeechError::AudioDecode(format!("no decoder for codec: {e}")))?;

    let mut mono = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream surfaces as an unexpected EOF
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(SpeechError::AudioDecode(format!("truncated stream: {e}"))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let buffer = match decoder.decode(&packet) {
            Ok(buffer) => buffer,
            // One bad packet is recoverable; drop it and keep going
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => return Err(SpeechError::AudioDecode(format!("decode failed: {e}"))),
        };

        let mut interleaved = SampleBuffer::<f32>::new(buffer.capacity() as u64, *buffer.spec());
        interleaved.copy_interleaved_ref(buffer);

        if channel_count == 1 {
            mono.extend_from_slice(interleaved.samples());
        } else {
            let gain = 1.0 / channel_count as f32;
            mono.extend(
                interleaved
                    .samples()
                    .chunks_exact(channel_count)
                    .map(|frame| frame.iter().sum::<f32>() * gain),
            );
        }
    }

    if mono.is_empty() {
        return Err(SpeechError::AudioDecode("stream contained no samples".into()));
    }

    Ok((mono, source_rate))
}

/// Convert mono samples to the model rate with rubato's FFT resampler
fn to_target_rate(samples: Vec<f32>, source_rate: u32) -> Result<Vec<f32>, SpeechError> {
    use rubato::{FftFixedIn, Resampler};

    const CHUNK: usize = 2048;

    let mut resampler =
        FftFixedIn::<f32>::new(source_rate as usize, TARGET_SAMPLE_RATE as usize, CHUNK, 2, 1)
            .map_err(|e| SpeechError::Resample(format!("resampler init: {e}")))?;

    let estimated = samples.len() * TARGET_SAMPLE_RATE as usize / source_rate as usize;
    let mut resampled = Vec::with_capacity(estimated + CHUNK);

    let mut chunks = samples.chunks_exact(CHUNK);
    for chunk in &mut chunks {
        let out = resampler
            .process(&[chunk], None)
            .map_err(|e| SpeechError::Resample(format!("chunk failed: {e}")))?;
        resampled.extend_from_slice(&out[0]);
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        let out = resampler
            .process_partial(Some(&[tail]), None)
            .map_err(|e| SpeechError::Resample(format!("tail failed: {e}")))?;
        resampled.extend_from_slice(&out[0]);
    }

    Ok(resampled)
}
