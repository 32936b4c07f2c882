//! Rewrite `file://` URLs produced on another machine onto a local checkout.
//!
//! Remote and local checkouts are assumed to share file names but not roots,
//! so only the final path segment survives the rewrite. This is lossy: two
//! files with the same name in different local directories map to the same
//! URL, and callers should treat the result as a suggestion.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::file_url::{assemble_file_url, encode_path};

const FILE_SCHEME_PREFIX: &str = "file://";

/// Viewer-side mapping settings, read once at startup and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMappingConfig {
    #[serde(default)]
    pub local_base_path: String,
}

impl PathMappingConfig {
    pub fn new(local_base_path: impl Into<String>) -> Self {
        Self {
            local_base_path: local_base_path.into(),
        }
    }

    pub fn remap(&self, remote_url: &str) -> String {
        remap_to_local(remote_url, &self.local_base_path)
    }
}

/// Re-root `remote_url` under `local_base_path`, keeping the file name and
/// any fragment (such as a `#L14` line anchor).
///
/// Anything that is not a parseable `file://` URL is returned unchanged.
pub fn remap_to_local(remote_url: &str, local_base_path: &str) -> String {
    if remote_url.is_empty() || !remote_url.starts_with(FILE_SCHEME_PREFIX) {
        return remote_url.to_string();
    }

    let parsed = match Url::parse(remote_url) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(url = %remote_url, error = %err, "unparseable file url passed through");
            return remote_url.to_string();
        }
    };

    let remote_path = percent_decode_str(parsed.path()).decode_utf8_lossy();
    let filename = remote_path
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let mut local_path = join_local(local_base_path, filename);
    if !local_path.starts_with('/') {
        local_path.insert(0, '/');
    }

    let mut local_url = assemble_file_url(&encode_path(&local_path));
    // Taken from the raw input: the parsed fragment comes back percent-encoded.
    let fragment = remote_url.split_once('#').map(|(_, fragment)| fragment);
    if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
        local_url.push('#');
        local_url.push_str(fragment);
    }
    debug!(remote = %remote_url, local = %local_url, "remapped file url");
    local_url
}

fn join_local(base: &str, filename: &str) -> String {
    if base.is_empty() {
        return filename.to_string();
    }
    let base = base.replace('\\', "/");
    format!("{}/{}", base.trim_end_matches('/'), filename)
}
