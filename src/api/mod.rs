// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod http_server;
pub mod multipart;
pub mod ocr;
pub mod preprocess;
pub mod transcribe;

pub use errors::{ApiError, ErrorBody};
pub use http_server::{build_router, start_server, AppState, HealthResponse};
pub use ocr::{ocr_handler, ImageTextResponse};
pub use preprocess::{preprocess_handler, PreprocessRequest, PreprocessResponse};
pub use transcribe::{transcribe_handler, TranscribeResponse};
