//! Receipt file storage.
//!
//! Files land under a configurable directory with a collision-resistant name
//! built from the upload time, a uuid fragment, and the sanitized original
//! filename.

use std::path::PathBuf;

use chrono::Utc;
use uuid::Uuid;

use crate::ServerError;

pub(crate) const MAX_RECEIPT_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "application/pdf",
];

#[derive(Clone)]
pub(crate) struct ReceiptStore {
    dir: PathBuf,
}

impl ReceiptStore {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub(crate) async fn store(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, ServerError> {
        let allowed = content_type
            .map(|ct| ALLOWED_TYPES.contains(&ct.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !allowed {
            return Err(ServerError::bad_request(
                "INVALID_FILE_TYPE",
                "only jpeg, png, gif and pdf receipts are accepted",
            ));
        }
        if bytes.len() > MAX_RECEIPT_BYTES {
            return Err(ServerError::bad_request(
                "FILE_TOO_LARGE",
                "receipt exceeds the 5 MB limit",
            ));
        }

        let name = format!(
            "{}-{}-{}",
            Utc::now().timestamp_millis(),
            uuid_fragment(),
            sanitize(original_name)
        );

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| {
                ServerError::Internal(format!("failed to create receipts directory: {err}"))
            })?;
        let path = self.dir.join(&name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| ServerError::Internal(format!("failed to store receipt: {err}")))?;

        Ok(path.to_string_lossy().into_owned())
    }
}

fn uuid_fragment() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "receipt".to_string()
    } else {
        cleaned
    }
}
