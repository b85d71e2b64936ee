// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text post-processing for downstream order parsing

pub mod normalize;

pub use normalize::{collapse_whitespace, normalize, NormalizedText, REPLACEMENTS};
