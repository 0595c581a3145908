//! CSV record store
//!
//! Rows are written as UTF-8 CSV with a byte-order mark and a fixed header.
//! Writes go to a sibling temporary file that is renamed over the
//! destination, so readers see either the previous row set or the new one.

use crate::record::{FlatRow, NormalizedRow, COLUMNS};
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// File-backed store at a single CSV path
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "output.csv".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_file(&self, target: &Path, rows: &[NormalizedRow]) -> StorageResult<()> {
        let mut file = File::create(target).map_err(|e| StorageError::io(target, e))?;
        file.write_all(UTF8_BOM)
            .map_err(|e| StorageError::io(target, e))?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&file);
            writer.write_record(COLUMNS)?;
            for row in rows {
                writer.serialize(FlatRow::from(row))?;
            }
            writer.flush().map_err(|e| StorageError::io(target, e))?;
        }

        file.sync_all().map_err(|e| StorageError::io(target, e))?;
        Ok(())
    }
}

impl RecordStore for CsvStore {
    fn save(&self, rows: &[NormalizedRow]) -> StorageResult<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }

        let temp = self.temp_path();
        if let Err(e) = self.write_file(&temp, rows) {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(StorageError::io(&self.path, e));
        }

        Ok(rows.len())
    }

    fn load_rows(&self) -> StorageResult<Vec<NormalizedRow>> {
        let bytes = fs::read(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(body);

        let headers = reader.headers()?.clone();
        let has_type = headers.iter().any(|h| h == "record_type" || h == "type");
        if !has_type || !headers.iter().any(|h| h == "source_url") {
            return Err(StorageError::Header(headers.iter().collect::<Vec<_>>().join(",")));
        }

        let mut rows = Vec::new();
        for record in reader.deserialize::<FlatRow>() {
            rows.push(NormalizedRow::try_from(record?)?);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ContactDetails, RecordKind, RecordType};
    use tempfile::TempDir;

    const SOURCE: &str = "https://example.com/scottsdale";

    fn service(units: u32, price: f64) -> NormalizedRow {
        NormalizedRow::new(
            SOURCE,
            RecordKind::Service {
                units,
                price,
                member_fee_month: Some(9.72),
                content: Some("It's all we do.".to_string()),
                contact: ContactDetails {
                    phone: Some("(480) 555-0100".to_string()),
                    email: None,
                    address: Some("7001 N Scottsdale Rd, Scottsdale, AZ 85253".to_string()),
                    hours: None,
                },
            },
        )
        .with_label("Botox / Dysport")
        .with_title(Some("Botox® / Dysport®".to_string()))
    }

    fn sample_rows() -> Vec<NormalizedRow> {
        vec![
            service(20, 150.8),
            service(40, 280.0),
            NormalizedRow::new(
                SOURCE,
                RecordKind::About {
                    content: "ClubInject is a group of nurses, \"with quotes\",\nand newlines"
                        .to_string(),
                },
            )
            .with_label("About"),
            NormalizedRow::new(
                SOURCE,
                RecordKind::Link {
                    text: None,
                    url: "https://example.com/book?x=1,2".to_string(),
                },
            )
            .with_label("Link"),
            NormalizedRow::new(SOURCE, RecordKind::Generic { content: None }),
        ]
    }

    #[test]
    fn test_roundtrip_preserves_rows() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("out.csv"));
        let rows = sample_rows();

        assert_eq!(store.save(&rows).unwrap(), rows.len());
        assert_eq!(store.load_rows().unwrap(), rows);
    }

    #[test]
    fn test_file_starts_with_bom_and_header() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("out.csv"));
        store.save(&sample_rows()).unwrap();

        let bytes = fs::read(store.path()).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn test_save_overwrites_previous_rows() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("out.csv"));
        store.save(&sample_rows()).unwrap();
        store.save(&[service(10, 80.0)]).unwrap();

        let rows = store.load_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record_type(), RecordType::Service);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("nested").join("out.csv");
        let store = CsvStore::new(&path);
        store.save(&[]).unwrap();

        assert!(path.exists());
        assert!(store.load_rows().unwrap().is_empty());
        assert!(!dir.path().join("data/nested/out.csv.tmp").exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.path().join("missing.csv"));
        assert!(matches!(
            store.load_rows().unwrap_err(),
            StorageError::Io { .. }
        ));
    }

    #[test]
    fn test_load_accepts_legacy_type_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.csv");
        fs::write(
            &path,
            "\u{feff}type,content,source_url\nabout,We are nurses,https://example.com/\n",
        )
        .unwrap();

        let rows = CsvStore::new(&path).load_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind.content(), Some("We are nurses"));
    }

    #[test]
    fn test_load_rejects_foreign_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("other.csv");
        fs::write(&path, "name,age\nbob,3\n").unwrap();
        assert!(matches!(
            CsvStore::new(&path).load_rows().unwrap_err(),
            StorageError::Header(_)
        ));
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let store = CsvStore::new(&path);
        store.save(&sample_rows()).unwrap();

        // A directory squatting on the temp path makes the write fail.
        fs::create_dir(dir.path().join("out.csv.tmp")).unwrap();
        assert!(store.save(&[service(10, 80.0)]).is_err());
        assert_eq!(store.load_rows().unwrap(), sample_rows());
    }
}
