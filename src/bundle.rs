use crate::error::ArchiveError;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Deflate level used for every entry
const COMPRESSION_LEVEL: i64 = 9;

/// A finished, flushed archive
#[derive(Debug, Clone)]
pub struct Bundle {
    pub path: PathBuf,
    pub entries: Vec<String>,
    pub bytes: u64,
}

/// Packs every regular file directly inside `staging_dir` into a flat zip at `archive_path`
///
/// Entries are written in file name order. The archive is synced to disk
/// before this returns.
pub fn build(staging_dir: &Path, archive_path: &Path) -> Result<Bundle, ArchiveError> {
    let files = staged_files(staging_dir)?;

    let file = File::create(archive_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    let mut entries = Vec::with_capacity(files.len());
    for (name, path) in files {
        writer.start_file(name.as_str(), options)?;
        let mut source = File::open(&path)?;
        io::copy(&mut source, &mut writer)?;
        entries.push(name);
    }

    let file = writer.finish()?;
    file.sync_all()?;
    let bytes = file.metadata()?.len();

    ::log::info!("{} total bytes", bytes);
    ::log::info!("Zip file created at: {}", archive_path.display());

    Ok(Bundle {
        path: archive_path.to_path_buf(),
        entries,
        bytes,
    })
}

/// Regular files in the staging directory, sorted by name
fn staged_files(staging_dir: &Path) -> Result<Vec<(String, PathBuf)>, ArchiveError> {
    let mut files = Vec::new();

    for entry in fs::read_dir(staging_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            ::log::debug!("Skipping non-file entry {}", entry.path().display());
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => files.push((name, entry.path())),
            Err(name) => ::log::warn!("Skipping non UTF-8 file name {:?}", name),
        }
    }

    files.sort();
    Ok(files)
}
