// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text recognition for cropped regions
//!
//! Runs the PaddleOCR recognition model on a single text line and decodes
//! the per-timestep character distribution with greedy CTC.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use super::preprocessing;

/// Recognized text for one region
#[derive(Debug, Clone)]
pub struct RecognizedLine {
    pub text: String,
    /// Mean per-character probability (0.0-1.0)
    pub confidence: f32,
}

/// PaddleOCR recognition model session plus its character dictionary
pub struct LineRecognizer {
    session: Mutex<Session>,
    input_name: String,
    /// Index 0 is the CTC blank token; characters start at 1
    dictionary: Vec<char>,
}

impl LineRecognizer {
    /// Load the recognition model and character dictionary (CPU-only)
    pub fn new(model_path: &Path, dict_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("OCR recognition model not found: {}", model_path.display());
        }

        let session = Session::builder()
            .context("failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("failed to set optimization level")?
            .with_intra_threads(4)
            .context("failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("failed to load recognition model from {}", model_path.display())
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "x".to_string());

        let dictionary = load_dictionary(dict_path)?;
        debug!(
            "recognition model loaded, input: {}, dictionary: {} chars",
            input_name,
            dictionary.len()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            dictionary,
        })
    }

    /// Recognize the text in one cropped region
    pub fn recognize(&self, region: &DynamicImage) -> Result<RecognizedLine> {
        let input = preprocessing::recognition_tensor(region);
        let shape = input.shape();
        let flat: Vec<f32> = input.iter().copied().collect();

        let tensor = Tensor::from_array((
            [1i64, 3, shape[2] as i64, shape[3] as i64],
            flat,
        ))
        .context("failed to build recognition input tensor")?;

        let mut session = self.session.lock().expect("recognition session poisoned");
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .context("recognition inference failed")?;

        let (out_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("failed to extract recognition output")?;

        // Output is [1, T, C]: per-timestep distribution over characters
        let dims = out_shape.len();
        if dims < 2 {
            anyhow::bail!("unexpected recognition output shape: {:?}", out_shape);
        }
        let seq_len = out_shape[dims - 2] as usize;
        let num_classes = out_shape[dims - 1] as usize;

        let (text, confidence) = ctc_decode(&self.dictionary, data, seq_len, num_classes);
        Ok(RecognizedLine { text, confidence })
    }
}

/// Greedy CTC decoding: best class per timestep, collapse repeats, drop
/// blanks (index 0). Returns the text and the mean kept-character
/// probability.
fn ctc_decode(
    dictionary: &[char],
    data: &[f32],
    seq_len: usize,
    num_classes: usize,
) -> (String, f32) {
    let mut text = String::new();
    let mut prob_sum = 0.0f32;
    let mut emitted = 0usize;
    let mut prev_class = 0usize;

    for t in 0..seq_len {
        let step = &data[t * num_classes..(t + 1) * num_classes];

        let (best_class, best_prob) = step.iter().enumerate().fold(
            (0usize, f32::NEG_INFINITY),
            |(bi, bp), (i, &p)| if p > bp { (i, p) } else { (bi, bp) },
        );

        if best_class != 0 && best_class != prev_class {
            if let Some(&ch) = dictionary.get(best_class) {
                text.push(ch);
                prob_sum += best_prob;
                emitted += 1;
            }
        }
        prev_class = best_class;
    }

    let confidence = if emitted == 0 {
        0.0
    } else {
        (prob_sum / emitted as f32).clamp(0.0, 1.0)
    };

    (text, confidence)
}

/// Load the character dictionary: one character per line, with index 0
/// reserved for the CTC blank token.
fn load_dictionary(path: &Path) -> Result<Vec<char>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open dictionary: {}", path.display()))?;

    let mut dictionary = vec!['\0']; // blank
    for line in BufReader::new(file).lines() {
        let line = line.context("failed to read dictionary line")?;
        if let Some(ch) = line.chars().next() {
            dictionary.push(ch);
        }
    }

    if !dictionary.contains(&' ') {
        dictionary.push(' ');
    }

    Ok(dictionary)
}
