//! Byte-level CSV input handling for the reference tables.
//!
//! The SGT/IBGE/serventias exports circulate in a mix of UTF-8 and legacy
//! Windows/Latin encodings, so inputs are sniffed with chardet and decoded
//! before parsing. Every table in this system uses the `;` dialect; outputs
//! are fully quoted.

use std::fs::File;
use std::path::Path;

use crate::error::ReferenceResult;

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" => {
            encoding_rs::ISO_8859_15.decode(bytes).0.to_string()
        }
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252.decode(bytes).0.to_string(),
        // Fallback: UTF-8 with lossy conversion
        _ => String::from_utf8_lossy(bytes).to_string(),
    }
}

/// Read a reference file into decoded UTF-8 text.
pub fn read_decoded(path: &Path) -> ReferenceResult<String> {
    let bytes = std::fs::read(path)?;
    let encoding = detect_encoding(&bytes);
    Ok(decode_content(&bytes, &encoding))
}

/// Reader over decoded text with the `;` dialect shared by every table.
///
/// Flexible mode: short rows read as empty trailing cells instead of
/// erroring, matching how the exports pad optional columns.
pub fn table_reader(content: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(content.as_bytes())
}

/// Writer with the `;`-delimited, fully-quoted dialect of the outputs.
pub fn table_writer(path: &Path) -> ReferenceResult<csv::Writer<File>> {
    Ok(csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Always)
        .from_path(path)?)
}
