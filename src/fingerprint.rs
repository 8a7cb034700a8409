use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

use crate::error::BuildError;

/// Length of the `?v=` token.
pub const TOKEN_LEN: usize = 8;

/// Hashes the stylesheets, in order, into the cache-bust token.
///
/// Every file is read in full before anything else in the build runs, so a
/// missing stylesheet aborts the build with no output written.
pub async fn fingerprint(root: &Path, stylesheets: &[String]) -> Result<String, BuildError> {
    let mut chunks = Vec::with_capacity(stylesheets.len());
    for sheet in stylesheets {
        let path = root.join(sheet);
        let bytes = fs::read(&path)
            .await
            .map_err(|source| BuildError::Read { path: path.clone(), source })?;
        debug!(path = %path.display(), len = bytes.len(), "hashing stylesheet");
        chunks.push(bytes);
    }
    Ok(fingerprint_bytes(chunks.iter().map(Vec::as_slice)))
}

pub fn fingerprint_bytes<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> String {
    let mut hasher = Sha256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    let mut token = hex::encode(hasher.finalize());
    token.truncate(TOKEN_LEN);
    token
}
