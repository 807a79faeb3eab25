//! Text-vs-binary detection used to decide whether to content-search a file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Extensions always treated as text, without sniffing.
const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "py", "js", "html", "css", "json", "xml", "md", "csv", "log", "ini", "cfg", "conf",
    "yaml", "yml", "sql", "sh", "bat", "c", "cpp", "h", "java", "php", "rb", "go", "rs", "kt",
    "swift",
];

/// How many leading bytes are sniffed for unknown extensions.
const SNIFF_BYTES: u64 = 1024;

/// Minimum printable-byte ratio for the sniffed prefix.
const PRINTABLE_RATIO: f64 = 0.7;

/// Returns true when `path` looks like a text file.
///
/// Known text extensions are accepted immediately. Otherwise the first
/// 1024 bytes are inspected: any null byte rejects the file, and more than
/// 70% of the bytes must be printable ASCII or tab/newline/carriage-return.
/// An empty file counts as text; an unreadable one does not.
pub fn is_text_file(path: &Path) -> bool {
    if let Some(extension) = path.extension().and_then(|extension| extension.to_str()) {
        if TEXT_EXTENSIONS.contains(&extension.to_lowercase().as_str()) {
            return true;
        }
    }

    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut prefix = Vec::with_capacity(SNIFF_BYTES as usize);
    if file.take(SNIFF_BYTES).read_to_end(&mut prefix).is_err() {
        return false;
    }
    if prefix.is_empty() {
        return true;
    }
    if prefix.contains(&0) {
        return false;
    }
    let printable = prefix
        .iter()
        .filter(|&&byte| (32..=126).contains(&byte) || matches!(byte, b'\t' | b'\n' | b'\r'))
        .count();
    printable as f64 / prefix.len() as f64 > PRINTABLE_RATIO
}
