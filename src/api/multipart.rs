// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart helpers shared by the upload endpoints

use axum::body::Bytes;
use axum::extract::Multipart;
use tracing::warn;

/// Pull the bytes of the named file field out of a multipart body.
///
/// Returns `None` when the request is not multipart, the field is absent,
/// or the body is malformed; the caller turns that into its field-specific
/// validation error.
pub async fn read_file_field(multipart: Option<Multipart>, name: &str) -> Option<Bytes> {
    let mut multipart = multipart?;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some(name) {
                    match field.bytes().await {
                        Ok(bytes) => return Some(bytes),
                        Err(e) => {
                            warn!("failed to read multipart field '{}': {}", name, e);
                            return None;
                        }
                    }
                }
                // Not the field we want; keep scanning
            }
            Ok(None) => return None,
            Err(e) => {
                warn!("malformed multipart body: {}", e);
                return None;
            }
        }
    }
}
