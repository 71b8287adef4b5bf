//! Block/interstitial signature lists.
//!
//! Marketplaces rotate their anti-bot pages often, so the substrings used to
//! recognise them live in data rather than in the detector. The built-in
//! defaults cover the pages seen so far; a YAML file can replace them.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_URL_SIGNATURES: &[&str] = &[
    "punish",
    "unusual traffic",
    "error:gvs",
    "captcha",
    "robot-check",
    "/_____tmd_____/",
];

const DEFAULT_TEXT_SIGNATURES: &[&str] = &[
    "unusual traffic",
    "error:gvs",
    "robot check",
    "are you a robot",
    "are you human",
    "please verify you are a human",
    "verify you are human",
    "security verification",
    "complete the captcha",
    "captcha verification",
    "please complete the captcha",
    "please slide to verify",
    "desliza para verificar",
];

const DEFAULT_CAPTCHA_MARKERS: &[&str] = &[
    "g-recaptcha",
    "h-captcha",
    "cf-turnstile",
    "nc_wrapper",
    "baxia-punish",
    "x5secdata",
];

/// Case-insensitive substrings that identify a block page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSignatures {
    /// Checked against the lower-cased current URL.
    pub url_signatures: Vec<String>,
    /// Checked against the markup-stripped page text.
    pub text_signatures: Vec<String>,
    /// Checked against raw markup (widget class names, script hosts).
    pub captcha_markers: Vec<String>,
}

impl Default for BlockSignatures {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| (*s).to_string()).collect();
        Self {
            url_signatures: owned(DEFAULT_URL_SIGNATURES),
            text_signatures: owned(DEFAULT_TEXT_SIGNATURES),
            captcha_markers: owned(DEFAULT_CAPTCHA_MARKERS),
        }
    }
}

impl BlockSignatures {
    /// Lower-cases, trims and de-duplicates every list, keeping first occurrences.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn clean(list: Vec<String>) -> Vec<String> {
            let mut seen = HashSet::new();
            list.into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| seen.insert(s.clone()))
                .collect()
        }

        Self {
            url_signatures: clean(self.url_signatures),
            text_signatures: clean(self.text_signatures),
            captcha_markers: clean(self.captcha_markers),
        }
    }
}

/// Load and validate block signatures from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_block_signatures(path: &Path) -> Result<BlockSignatures, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SignaturesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let signatures: BlockSignatures = serde_yaml::from_str(&content)?;

    validate_signatures(&signatures)?;

    Ok(signatures.normalized())
}

fn validate_signatures(signatures: &BlockSignatures) -> Result<(), ConfigError> {
    let lists = [
        ("url_signatures", &signatures.url_signatures),
        ("text_signatures", &signatures.text_signatures),
        ("captcha_markers", &signatures.captcha_markers),
    ];

    for (name, list) in lists {
        if list.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{name} must contain at least one entry"
            )));
        }
        if let Some(idx) = list.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{name}[{idx}] is blank"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "signatures_test.rs"]
mod tests;
