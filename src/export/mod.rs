//! Spreadsheet export of the filtered vendor list.
//!
//! One CSV row per vendor with every record field as a column, in record field
//! order. Files are named after the export date and written atomically.

use crate::domain::error::{Result, VendorizerError};
use crate::domain::Vendor;
use chrono::NaiveDate;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name for an export made on `date`.
#[must_use]
pub fn file_name_for(date: NaiveDate) -> String {
    format!("vendors_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes `vendors` as CSV with a header row and returns the row count.
///
/// # Errors
///
/// Returns [`VendorizerError::Export`] if a row cannot be written.
pub fn write_csv<W: Write>(writer: W, vendors: &[Vendor]) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    for vendor in vendors {
        csv.serialize(vendor)?;
    }
    csv.flush()?;
    Ok(vendors.len())
}

/// Exports `vendors` into `dir` under the name for `date`.
///
/// # Errors
///
/// Returns [`VendorizerError::Export`] for an empty list, and I/O errors from
/// creating the directory or writing the file.
#[tracing::instrument(level = "debug", skip(vendors), fields(count = vendors.len(), dir = %dir.display()))]
pub fn export_to_dir(dir: &Path, vendors: &[Vendor], date: NaiveDate) -> Result<PathBuf> {
    if vendors.is_empty() {
        return Err(VendorizerError::Export("No vendors to export".to_string()));
    }

    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name_for(date));
    let tmp_path = path.with_extension("csv.tmp");

    let file = std::fs::File::create(&tmp_path)?;
    write_csv(std::io::BufWriter::new(file), vendors)?;
    std::fs::rename(&tmp_path, &path)?;

    tracing::debug!(path = %path.display(), "vendors exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Region, Status, VendorType};

    fn vendor(id: &str, name: &str) -> Vendor {
        Vendor {
            id: id.to_string(),
            name: name.to_string(),
            category: Category::Electrical,
            location: "Kochi".to_string(),
            status: Status::Active,
            vendor_type: VendorType::Sap,
            region: Region::South,
            date: "2024-07-09".parse().unwrap(),
        }
    }

    #[test]
    fn name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(file_name_for(date), "vendors_2025-03-04.csv");
    }

    #[test]
    fn csv_has_header_and_all_columns() {
        let mut out = Vec::new();
        let rows = write_csv(&mut out, &[vendor("V1", "Volt, Inc")]).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(rows, 1);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,name,category,location,status,type,region,date"));
        assert_eq!(
            lines.next(),
            Some("V1,\"Volt, Inc\",Electrical,Kochi,Active,SAP,South,2024-07-09")
        );
    }

    #[test]
    fn export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

        let path = export_to_dir(dir.path(), &[vendor("A", "a"), vendor("B", "b")], date).unwrap();

        assert_eq!(path, dir.path().join("vendors_2024-12-31.csv"));
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 3);
    }

    #[test]
    fn empty_export_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            export_to_dir(dir.path(), &[], date),
            Err(VendorizerError::Export(_))
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
