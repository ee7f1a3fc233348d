//! Zip packaging of synthesized audio

use std::io::{Cursor, Write};

use domain::SpeechChunk;
use zip::{CompressionMethod, ZipWriter, result::ZipError, write::SimpleFileOptions};

/// File name of the download
pub const ARCHIVE_FILE_NAME: &str = "files.zip";

/// Pack every chunk into one zip, entries in (text, chunk) order
///
/// MP3 is already compressed, so entries are stored as-is.
pub fn zip_chunks(texts: &[Vec<SpeechChunk>]) -> Result<Vec<u8>, ZipError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for chunk in texts.iter().flatten() {
        writer.start_file(chunk.name.as_str(), options)?;
        writer.write_all(&chunk.audio)?;
    }

    Ok(writer.finish()?.into_inner())
}
