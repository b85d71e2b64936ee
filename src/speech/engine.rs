// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ONNX speech-to-text engine
//!
//! Runs a parakeet-tdt export on CPU. Three sessions share the work: a mel
//! spectrogram frontend (`nemo128.onnx`), an acoustic encoder
//! (`encoder-model.onnx`), and a combined decoder/joint network
//! (`decoder_joint-model.onnx`) that is stepped frame by frame. Emitted
//! token IDs map to SentencePiece pieces from `vocab.txt`. The tensor names
//! fed to each session are fixed by the exported model graphs.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::{debug, info};

use super::audio;
use super::{SpeechError, Transcriber, Transcription};

/// Intra-op threads for the frontend and encoder sessions
const ENCODER_THREADS: usize = 4;

/// The TDT duration head scores frame jumps of 0 through 4
const DURATION_BINS: usize = 5;

/// Width of each decoder LSTM state tensor
const STATE_WIDTH: usize = 640;

/// SentencePiece marker on pieces that start a new word
const WORD_BOUNDARY: char = '\u{2581}';

/// Paths to the model files inside a model directory
#[derive(Debug, Clone)]
pub struct AsrModelPaths {
    pub preprocessor: PathBuf,
    pub encoder: PathBuf,
    pub decoder_joint: PathBuf,
    pub vocab: PathBuf,
}

impl AsrModelPaths {
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            preprocessor: dir.join("nemo128.onnx"),
            encoder: dir.join("encoder-model.onnx"),
            decoder_joint: dir.join("decoder_joint-model.onnx"),
            vocab: dir.join("vocab.txt"),
        }
    }
}

/// Flat `[1, 128, T]` mel tensor plus the frame count the frontend reported
struct MelFeatures {
    dims: [i64; 3],
    data: Vec<f32>,
    frames: i64,
}

/// Encoder output laid out row-major, one row per acoustic frame
struct EncodedFrames {
    data: Vec<f32>,
    frames: usize,
    width: usize,
}

impl EncodedFrames {
    fn row(&self, frame: usize) -> &[f32] {
        &self.data[frame * self.width..(frame + 1) * self.width]
    }
}

/// Speech engine: three ONNX sessions plus the SentencePiece vocabulary.
///
/// `Session::run` needs `&mut`, so each session sits behind a `Mutex`; the
/// engine itself is immutable after load and shared via `Arc`.
pub struct AsrEngine {
    frontend: Mutex<Session>,
    encoder: Mutex<Session>,
    joint: Mutex<Session>,
    vocab: Vec<String>,
}

impl AsrEngine {
    /// Load the engine from `model_dir` on a blocking task; the weights run
    /// to hundreds of megabytes. Called once at startup by the registry.
    pub async fn new(model_dir: &Path) -> Result<Self, SpeechError> {
        let dir = model_dir.to_path_buf();
        tokio::task::spawn_blocking(move || Self::load(&dir))
            .await
            .map_err(|e| SpeechError::Inference(format!("load task failed: {e}")))?
    }

    fn load(model_dir: &Path) -> Result<Self, SpeechError> {
        info!("loading ASR model from {}", model_dir.display());
        let paths = AsrModelPaths::from_dir(model_dir);

        let engine = Self {
            frontend: Mutex::new(open_session(&paths.preprocessor, ENCODER_THREADS)?),
            encoder: Mutex::new(open_session(&paths.encoder, ENCODER_THREADS)?),
            // The decode loop is strictly sequential; parallelism buys nothing
            joint: Mutex::new(open_session(&paths.decoder_joint, 1)?),
            vocab: read_vocab(&paths.vocab)?,
        };

        info!("ASR engine ready: {} vocabulary pieces", engine.vocab.len());
        Ok(engine)
    }

    /// Mel spectrogram frontend: waveform in, `[1, 128, T]` features out.
    ///
    /// The features stay flat; the encoder consumes the buffer as-is.
    fn mel_features(&self, samples: &[f32]) -> Result<MelFeatures, SpeechError> {
        let len = samples.len() as i64;
        let wave = tensor_f32([1, len], samples.to_vec())?;
        let wave_len = tensor_i64([1], vec![len])?;

        let mut session = lock(&self.frontend)?;
        let outputs = session
            .run(ort::inputs!["waveforms" => wave, "waveforms_lens" => wave_len])
            .map_err(|e| SpeechError::Inference(format!("mel frontend: {e}")))?;

        let (dims, data) = outputs["features"]
            .try_extract_tensor::<f32>()
            .map_err(|e| SpeechError::Inference(format!("mel frontend output: {e}")))?;
        let (_, lens) = outputs["features_lens"]
            .try_extract_tensor::<i64>()
            .map_err(|e| SpeechError::Inference(format!("mel frontend length: {e}")))?;

        Ok(MelFeatures {
            dims: [dims[0], dims[1], dims[2]],
            data: data.to_vec(),
            frames: lens[0],
        })
    }

    /// Acoustic encoder: mel features to one hidden vector per frame
    fn encode(&self, mel: MelFeatures) -> Result<EncodedFrames, SpeechError> {
        let signal = tensor_f32(mel.dims, mel.data)?;
        let signal_len = tensor_i64([1], vec![mel.frames])?;

        let mut session = lock(&self.encoder)?;
        let outputs = session
            .run(ort::inputs!["audio_signal" => signal, "length" => signal_len])
            .map_err(|e| SpeechError::Inference(format!("encoder: {e}")))?;

        let (dims, data) = outputs["outputs"]
            .try_extract_tensor::<f32>()
            .map_err(|e| SpeechError::Inference(format!("encoder output: {e}")))?;

        // Output is [1, frames, width]; the flat layout drops the batch dim
        Ok(EncodedFrames {
            data: data.to_vec(),
            frames: dims[1] as usize,
            width: dims[2] as usize,
        })
    }

    /// Greedy TDT pass: step the decoder/joint network over the encoded
    /// frames, emitting at most one piece per step and jumping ahead by the
    /// predicted duration.
    fn decode(&self, encoded: &EncodedFrames) -> Result<String, SpeechError> {
        let blank = self.vocab.len();
        let mut session = lock(&self.joint)?;

        let mut text = String::new();
        let mut last_token = blank;
        // Decoder LSTM state, carried across steps
        let mut state_h = vec![0.0f32; STATE_WIDTH];
        let mut state_c = vec![0.0f32; STATE_WIDTH];

        let mut frame = 0;
        while frame < encoded.frames {
            let row = encoded.row(frame);
            let outputs = session
                .run(ort::inputs![
                    "encoder_outputs" => tensor_f32([1, 1, row.len() as i64], row.to_vec())?,
                    "targets" => tensor_i64([1, 1], vec![last_token as i64])?,
                    "target_length" => tensor_i64([1], vec![1])?,
                    "input_states_1" => tensor_f32([1, 1, STATE_WIDTH as i64], state_h)?,
                    "input_states_2" => tensor_f32([1, 1, STATE_WIDTH as i64], state_c)?,
                ])
                .map_err(|e| SpeechError::Inference(format!("joint step: {e}")))?;

            let (_, logits) = outputs["outputs"]
                .try_extract_tensor::<f32>()
                .map_err(|e| SpeechError::Inference(format!("joint output: {e}")))?;

            // Logit layout: one per vocabulary piece, one for blank, then
            // the duration head
            let token_head = blank + 1;
            if logits.len() < token_head + DURATION_BINS {
                return Err(SpeechError::Inference(format!(
                    "joint produced {} logits, need {}",
                    logits.len(),
                    token_head + DURATION_BINS
                )));
            }

            let token = argmax(&logits[..token_head]);
            let jump = argmax(&logits[token_head..token_head + DURATION_BINS]);

            if token != blank {
                push_piece(&self.vocab, &mut text, token);
                last_token = token;
            }

            let (_, h) = outputs["output_states_1"]
                .try_extract_tensor::<f32>()
                .map_err(|e| SpeechError::Inference(format!("decoder state: {e}")))?;
            let (_, c) = outputs["output_states_2"]
                .try_extract_tensor::<f32>()
                .map_err(|e| SpeechError::Inference(format!("decoder state: {e}")))?;
            state_h = h.to_vec();
            state_c = c.to_vec();

            // A zero jump would replay this frame forever; the greedy pass
            // allows at most one emission per frame
            frame += jump.max(1);
        }

        Ok(text.trim().to_string())
    }
}

impl Transcriber for AsrEngine {
    fn transcribe(&self, audio_path: &Path) -> Result<Transcription, SpeechError> {
        let samples = audio::decode_file(audio_path)?;
        debug!(
            "transcribing {:.1}s of audio",
            samples.len() as f64 / f64::from(audio::TARGET_SAMPLE_RATE)
        );

        let mel = self.mel_features(&samples)?;
        let encoded = self.encode(mel)?;
        let text = self.decode(&encoded)?;
        debug!("decoded {} chars from {} frames", text.len(), encoded.frames);

        Ok(Transcription {
            text,
            language: Some("en".into()), // the model is English-only
        })
    }
}

fn open_session(path: &Path, threads: usize) -> Result<Session, SpeechError> {
    if !path.exists() {
        return Err(SpeechError::ModelNotAvailable(format!(
            "model file not found: {}",
            path.display()
        )));
    }

    Session::builder()
        .and_then(|b| b.with_execution_providers([CPUExecutionProvider::default().build()]))
        .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
        .and_then(|b| b.with_intra_threads(threads))
        .and_then(|b| b.commit_from_file(path))
        .map_err(|e| SpeechError::Inference(format!("cannot open {}: {e}", path.display())))
}

/// One SentencePiece piece per line; the blank token is implicit at
/// index == piece count
fn read_vocab(path: &Path) -> Result<Vec<String>, SpeechError> {
    let file = File::open(path).map_err(|e| {
        SpeechError::ModelNotAvailable(format!("cannot read {}: {e}", path.display()))
    })?;
    BufReader::new(file)
        .lines()
        .collect::<Result<_, _>>()
        .map_err(SpeechError::Io)
}

/// Append one vocabulary piece, turning the word-boundary marker into a
/// leading space
fn push_piece(vocab: &[String], text: &mut String, token: usize) {
    let Some(piece) = vocab.get(token) else {
        return;
    };
    match piece.strip_prefix(WORD_BOUNDARY) {
        Some(rest) => {
            text.push(' ');
            text.push_str(rest);
        }
        None => text.push_str(piece),
    }
}

/// Index of the largest value
fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0usize, f32::NEG_INFINITY), |best, (i, &v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
        .0
}

fn tensor_f32<const N: usize>(shape: [i64; N], data: Vec<f32>) -> Result<Tensor<f32>, SpeechError> {
    Tensor::from_array((shape, data))
        .map_err(|e| SpeechError::Inference(format!("input tensor: {e}")))
}

fn tensor_i64<const N: usize>(shape: [i64; N], data: Vec<i64>) -> Result<Tensor<i64>, SpeechError> {
    Tensor::from_array((shape, data))
        .map_err(|e| SpeechError::Inference(format!("input tensor: {e}")))
}

fn lock(session: &Mutex<Session>) -> Result<std::sync::MutexGuard<'_, Session>, SpeechError> {
    session
        .lock()
        .map_err(|_| SpeechError::Inference("session mutex poisoned".into()))
}
