/*!
 * Common test utilities for the textstim test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;


/// Routes library log output through the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a header-less tab-delimited word list (text, onset, duration)
pub fn create_test_word_list(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = "the\t0.0\t0.25\nquick\t0.3\t0.3\nbrown\t0.7\t0.3\nfox\t1.1\t0.4\n";
    create_test_file(dir, filename, content)
}

/// Creates a tab-delimited file with a header row
pub fn create_test_header_file(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = "onset\ttext\tspeaker\n1.0\tHello\tA\n2.5\tworld\tB\n";
    create_test_file(dir, filename, content)
}

/// Creates a sample subtitle file for testing
pub fn create_test_subtitle(dir: &PathBuf, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple
entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#;
    create_test_file(dir, filename, content)
}
