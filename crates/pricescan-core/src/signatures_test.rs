use std::io::Write;

use super::*;

fn write_yaml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn defaults_are_lowercase_and_non_empty() {
    let sigs = BlockSignatures::default();
    for list in [&sigs.url_signatures, &sigs.text_signatures, &sigs.captcha_markers] {
        assert!(!list.is_empty());
        assert!(list.iter().all(|s| *s == s.to_lowercase()));
    }
}

#[test]
fn defaults_do_not_flag_bare_robot_word() {
    // "robot" alone appears in ordinary listings (robot vacuums, toys).
    let sigs = BlockSignatures::default();
    assert!(!sigs.text_signatures.iter().any(|s| s == "robot"));
}

#[test]
fn load_normalizes_entries() {
    let file = write_yaml(
        "url_signatures: [\"  PUNISH \", \"punish\"]\n\
         text_signatures: [\"Robot Check\"]\n\
         captcha_markers: [\"g-recaptcha\"]\n",
    );

    let sigs = load_block_signatures(file.path()).unwrap();

    assert_eq!(sigs.url_signatures, vec!["punish"]);
    assert_eq!(sigs.text_signatures, vec!["robot check"]);
}

#[test]
fn load_rejects_empty_list() {
    let file = write_yaml("url_signatures: []\ntext_signatures: [a]\ncaptcha_markers: [b]\n");
    let result = load_block_signatures(file.path());
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("url_signatures")),
        "expected Validation error, got: {result:?}"
    );
}

#[test]
fn load_rejects_blank_entry() {
    let file = write_yaml("url_signatures: [a]\ntext_signatures: [\"  \"]\ncaptcha_markers: [b]\n");
    let result = load_block_signatures(file.path());
    assert!(
        matches!(result, Err(ConfigError::Validation(ref msg)) if msg.contains("text_signatures[0]")),
        "expected Validation error, got: {result:?}"
    );
}

#[test]
fn load_reports_missing_file() {
    let result = load_block_signatures(Path::new("/nonexistent/signatures.yaml"));
    assert!(matches!(result, Err(ConfigError::SignaturesFileIo { .. })));
}

#[test]
fn load_reports_malformed_yaml() {
    let file = write_yaml("url_signatures: [unterminated\n");
    let result = load_block_signatures(file.path());
    assert!(matches!(result, Err(ConfigError::SignaturesFileParse(_))));
}
