//! Proof-of-payment storage
//!
//! Stores uploaded transfer receipts under `work_dir/uploads` and hands
//! back the public URL recorded on the purchase request. The uploads
//! directory is served read-only by the router.

use std::path::PathBuf;

use rand::Rng;

use crate::core::Config;
use crate::utils::AppError;

const PROOFS_SUBDIR: &str = "payment-proofs";
const MAX_PROOF_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct StorageService {
    uploads_dir: PathBuf,
    public_base_url: String,
}

impl StorageService {
    pub fn new(config: &Config) -> Self {
        Self {
            uploads_dir: config.uploads_dir(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    /// Directory the router serves at `/uploads`
    pub fn uploads_dir(&self) -> &PathBuf {
        &self.uploads_dir
    }

    /// Persist a proof-of-payment file, returning its public URL.
    ///
    /// The stored name is generated (timestamp + random suffix); only the
    /// extension survives from the client's filename, sanitized.
    pub async fn store_payment_proof(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        if bytes.is_empty() {
            return Err(AppError::validation("Proof of payment file is empty"));
        }
        if bytes.len() > MAX_PROOF_BYTES {
            return Err(AppError::validation(format!(
                "Proof of payment too large ({} bytes, max {MAX_PROOF_BYTES})",
                bytes.len()
            )));
        }

        let ext = sanitize_extension(original_name);
        let suffix: u32 = rand::thread_rng().gen_range(100000..1000000);
        let file_name = format!("{}_{suffix}.{ext}", shared::util::now_millis());

        let dir = self.uploads_dir.join(PROOFS_SUBDIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::upstream(format!("Failed to prepare upload dir: {e}")))?;
        tokio::fs::write(dir.join(&file_name), bytes)
            .await
            .map_err(|e| AppError::upstream(format!("Failed to store proof: {e}")))?;

        Ok(format!(
            "{}/uploads/{PROOFS_SUBDIR}/{file_name}",
            self.public_base_url
        ))
    }
}

/// Keep only a short alphanumeric extension; anything else becomes "bin"
fn sanitize_extension(original_name: &str) -> String {
    original_name
        .rsplit('.')
        .next()
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "bin".to_string())
}
