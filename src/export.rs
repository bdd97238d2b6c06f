use crate::error::ExportError;
use crate::results::ContentRecord;
use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Column order of the export
pub const EXPORT_HEADERS: [&str; 5] = ["tag", "content", "href", "pageUrl", "image"];

/// Sets `image` on every record whose href is one of the staged file names
///
/// Staged names look like `image_3.png` while hrefs are absolute URLs, so
/// this only links records whose href is literally such a name.
pub fn correlate(records: Vec<ContentRecord>, image_file_names: &[String]) -> Vec<ContentRecord> {
    let names: HashSet<&str> = image_file_names.iter().map(String::as_str).collect();

    records
        .into_iter()
        .map(|mut record| {
            record.asset_ref = record
                .href
                .as_deref()
                .filter(|href| names.contains(href))
                .map(str::to_string);
            record
        })
        .collect()
}

/// Correlates records with staged images and writes them as one CSV sheet
pub fn write(
    path: &Path,
    records: Vec<ContentRecord>,
    image_file_names: &[String],
) -> Result<PathBuf, ExportError> {
    let records = correlate(records, image_file_names);
    let linked = records.iter().filter(|r| r.asset_ref.is_some()).count();

    // Header written by hand so an empty export still carries it
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(EXPORT_HEADERS)?;

    for record in &records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    ::log::info!(
        "Export file created at: {} ({} rows, {} linked to images)",
        path.display(),
        records.len(),
        linked
    );

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Tag;

    fn record(tag: Tag, content: &str, href: Option<&str>, page_url: &str) -> ContentRecord {
        ContentRecord {
            tag,
            content: content.to_string(),
            href: href.map(str::to_string),
            page_url: page_url.to_string(),
            asset_ref: None,
        }
    }

    fn read_rows(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_path(path).unwrap();
        let headers = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|row| row.unwrap().iter().map(str::to_string).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn test_correlation_matches_only_literal_file_names() {
        let records = vec![
            record(Tag::A, "Go", Some("http://root/x"), "http://root/"),
            record(Tag::A, "Pic", Some("image_1.png"), "http://root/"),
            record(Tag::P, "Text", None, "http://root/"),
        ];
        let names = vec!["image_1.png".to_string()];

        let correlated = correlate(records, &names);

        assert_eq!(correlated[0].asset_ref, None);
        assert_eq!(correlated[1].asset_ref.as_deref(), Some("image_1.png"));
        assert_eq!(correlated[2].asset_ref, None);
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrapedData_run.csv");
        let records = vec![
            record(Tag::P, "A", None, "http://root/"),
            record(Tag::A, "Go, \"now\"", Some("http://root/x"), "http://root/"),
            record(Tag::P, "C", None, "http://root/x"),
        ];

        let written = write(&path, records, &["image_1.png".to_string()]).unwrap();
        assert_eq!(written, path);

        let (headers, rows) = read_rows(&path);
        assert_eq!(headers, EXPORT_HEADERS);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["p", "A", "", "http://root/", ""]);
        assert_eq!(
            rows[1],
            vec!["a", "Go, \"now\"", "http://root/x", "http://root/", ""]
        );
        assert_eq!(rows[2], vec!["p", "C", "", "http://root/x", ""]);
    }

    #[test]
    fn test_export_rows_read_back_as_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrapedData_run.csv");
        let records = vec![
            record(Tag::H2, "Heading", None, "http://root/"),
            record(Tag::A, "", Some("image_1.png"), "http://root/"),
        ];

        write(&path, records.clone(), &["image_1.png".to_string()]).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let read: Vec<ContentRecord> = reader.deserialize().map(|row| row.unwrap()).collect();
        assert_eq!(read[0], records[0]);
        assert_eq!(read[1].tag, Tag::A);
        assert_eq!(read[1].content, "");
        assert_eq!(read[1].asset_ref.as_deref(), Some("image_1.png"));
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write(&path, Vec::new(), &[]).unwrap();

        let (headers, rows) = read_rows(&path);
        assert_eq!(headers, EXPORT_HEADERS);
        assert!(rows.is_empty());
    }
}
