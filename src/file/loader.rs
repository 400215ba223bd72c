//! Document loading for JSON and YAML inputs.
//!
//! This module reads documents from files or stdin and deserializes them into
//! [`Value`] trees that field paths can be walked against. Gzip-compressed
//! input is decompressed transparently.

use crate::value::Value;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Input document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Pick from the file extension; stdin tries JSON, then YAML.
    #[default]
    Auto,
    Json,
    Yaml,
}

/// Loads and parses a document from the filesystem.
///
/// With [`Format::Auto`], `.json` files are read as JSON and everything else
/// as YAML. A trailing `.gz` is ignored for detection and the content is
/// decompressed.
///
/// # Examples
///
/// ```no_run
/// use fieldwalk::file::loader::{load_file, Format};
///
/// let document = load_file("payload.json", Format::Auto).unwrap();
/// assert!(document.is_mapping());
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist or cannot be read
/// - The file is gzipped but corrupted
/// - The file contents are not valid in the selected format
pub fn load_file<P: AsRef<Path>>(path: P, format: Format) -> Result<Value> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file {}", path_ref.display()))?
    };

    let format = match format {
        Format::Auto => determine_format(path_ref),
        explicit => explicit,
    };
    debug!("loading {} as {:?}", path_ref.display(), format);

    parse_content(&content, format)
        .with_context(|| format!("Failed to parse {}", path_ref.display()))
}

/// Loads and parses a document from standard input.
///
/// Gzip input is detected by its magic bytes. With [`Format::Auto`] the input
/// is parsed as JSON first and as YAML if that fails.
///
/// # Errors
///
/// This function will return an error if:
/// - Reading from stdin fails
/// - The input is not valid UTF-8 after decompression
/// - The input is not a valid document in the selected format
pub fn load_from_stdin(format: Format) -> Result<Value> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    // Gzip magic bytes (0x1f 0x8b)
    let content = if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")?
    };

    parse_content(&content, format).context("Failed to parse document from stdin")
}

/// Parses document text in the given format.
///
/// [`Format::Auto`] tries JSON first, then YAML.
pub fn parse_content(content: &str, format: Format) -> Result<Value> {
    match format {
        Format::Json => serde_json::from_str(content).context("Invalid JSON"),
        Format::Yaml => serde_yaml::from_str(content).context("Invalid YAML"),
        Format::Auto => match serde_json::from_str(content) {
            Ok(value) => Ok(value),
            Err(_) => serde_yaml::from_str(content)
                .context("Input is neither valid JSON nor valid YAML"),
        },
    }
}

/// Determines the format from a file name, ignoring a `.gz` suffix.
///
/// - `data.json` → JSON
/// - `data.json.gz` → JSON
/// - `data.yaml`, `data.yml`, anything else → YAML
fn determine_format<P: AsRef<Path>>(path: P) -> Format {
    let path_str = path.as_ref().to_string_lossy();

    let base = if let Some(stripped) = path_str.strip_suffix(".gz") {
        stripped
    } else {
        &path_str
    };

    if base.ends_with(".json") {
        Format::Json
    } else {
        Format::Yaml
    }
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped stdin")?;
    Ok(content)
}
