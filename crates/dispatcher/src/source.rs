//! CSV-backed recipient source.

use std::path::PathBuf;

use courier_engine::{CadenceError, DeliveryError, Recipient, RecipientSource};

/// Reads recipients from a headered CSV table, preserving row order.
///
/// The file must expose NOME, EMPRESA and EMAIL columns; extra columns
/// are ignored. A row missing one of the three fails that row only, the
/// way the dispatch loop expects.
pub struct CsvRecipientSource {
    path: PathBuf,
}

impl CsvRecipientSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecipientSource for CsvRecipientSource {
    fn load(&self) -> Result<Vec<Result<Recipient, DeliveryError>>, CadenceError> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| {
            CadenceError::SourceUnreadable(format!("{}: {e}", self.path.display()))
        })?;

        let rows = reader
            .deserialize::<Recipient>()
            .map(|row| row.map_err(|e| DeliveryError::MissingField(e.to_string())))
            .collect();
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> (tempfile::TempDir, CsvRecipientSource) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, CsvRecipientSource::new(path))
    }

    #[test]
    fn test_rows_come_back_in_file_order() {
        let (_dir, source) = write_csv(
            "NOME,EMPRESA,EMAIL\nAna,Acme,ana@acme.com\nBia,Bcorp,bia@bcorp.com\n",
        );

        let rows = source.load().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].as_ref().unwrap().name, "Ana");
        assert_eq!(rows[1].as_ref().unwrap().email, "bia@bcorp.com");
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let (_dir, source) = write_csv(
            "NOME,EMPRESA,EMAIL,TELEFONE\nAna,Acme,ana@acme.com,5511999\n",
        );

        let rows = source.load().unwrap();
        assert_eq!(rows[0].as_ref().unwrap().company, "Acme");
    }

    #[test]
    fn test_missing_column_fails_that_row() {
        let (_dir, source) = write_csv("NOME,EMPRESA\nAna,Acme\n");

        let rows = source.load().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0], Err(DeliveryError::MissingField(_))));
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvRecipientSource::new(dir.path().join("absent.csv"));
        assert!(matches!(
            source.load(),
            Err(CadenceError::SourceUnreadable(_))
        ));
    }
}
