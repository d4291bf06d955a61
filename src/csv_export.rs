//! CSV download of the cleaned table.

use base64::{engine::general_purpose::STANDARD, Engine};
use csv::Writer;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::observation::AnnotatedObservation;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    time: &'a str,
    latitude: f64,
    longitude: f64,
    distance: f64,
    sats: u32,
    precision: f64,
    category: i64,
}

impl<'a> From<&'a AnnotatedObservation> for ExportRow<'a> {
    fn from(row: &'a AnnotatedObservation) -> Self {
        let obs = &row.observation;
        Self {
            time: &obs.time,
            latitude: obs.latitude,
            longitude: obs.longitude,
            distance: row.distance,
            sats: obs.sats,
            precision: obs.precision,
            category: obs.category,
        }
    }
}

/// Serialize the table as UTF-8 CSV with a header row. Fields containing
/// commas, quotes or newlines are quoted.
pub fn export_csv(rows: &[AnnotatedObservation]) -> Result<Vec<u8>> {
    let mut wtr = Writer::from_writer(Vec::new());
    if rows.is_empty() {
        wtr.write_record(["time", "latitude", "longitude", "distance", "sats", "precision", "category"])?;
    }
    for row in rows {
        wtr.serialize(ExportRow::from(row))?;
    }
    wtr.into_inner().map_err(|e| Error::Io(e.into_error()))
}

/// `data:` URI a browser can download the CSV from.
pub fn download_href(csv: &[u8]) -> String {
    format!("data:file/csv;base64,{}", STANDARD.encode(csv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_ingest::read_observations;
    use crate::observation::fix;

    fn annotated() -> Vec<AnnotatedObservation> {
        let mut quoted = fix("2021-03-04 10:00:00, \"local\"", 46.0569, 14.5058, 7, 2);
        quoted.precision = 0.83;
        vec![
            AnnotatedObservation { observation: fix("t0", 46.0561, 14.5051, 6, 1), distance: 0.0 },
            AnnotatedObservation { observation: quoted, distance: 103.47 },
        ]
    }

    #[test]
    fn test_header_and_column_order() {
        let bytes = export_csv(&annotated()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("time,latitude,longitude,distance,sats,precision,category"));
        assert_eq!(lines.next(), Some("t0,46.0561,14.5051,0.0,6,1.5,1"));
    }

    #[test]
    fn test_embedded_commas_and_quotes_are_quoted() {
        let text = String::from_utf8(export_csv(&annotated()).unwrap()).unwrap();
        assert!(text.contains("\"2021-03-04 10:00:00, \"\"local\"\"\""));
    }

    #[test]
    fn test_export_reparses_to_same_values() {
        let rows = annotated();
        let parsed = read_observations(&export_csv(&rows).unwrap()).unwrap();
        assert_eq!(parsed.len(), rows.len());
        for (original, back) in rows.iter().zip(&parsed) {
            assert_eq!(&original.observation, back);
        }

        let exported = export_csv(&rows).unwrap();
        let mut rdr = csv::Reader::from_reader(exported.as_slice());
        let distances: Vec<f64> = rdr
            .records()
            .map(|r| r.unwrap()[3].parse().unwrap())
            .collect();
        assert_eq!(distances, vec![0.0, 103.47]);
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let text = String::from_utf8(export_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.trim_end(), "time,latitude,longitude,distance,sats,precision,category");
    }

    #[test]
    fn test_download_href() {
        assert_eq!(download_href(b"a,b\n"), "data:file/csv;base64,YSxiCg==");
    }
}
