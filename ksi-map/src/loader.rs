//! Reading road segments from CSV with WKT geometries.
//!
//! A missing `geometry` column or a file without a single usable line aborts the load. Problems
//! with individual rows only drop those rows; each row is turned into a
//! `Result<RoadSegment, SkipReason>` so the decision is visible to callers through [`LoadReport`].

use std::io::Read;

use csv::StringRecord;
use geo_types::{Geometry, LineString};
use wkt::TryFromWkt;

use crate::error::KsiMapError;
use crate::record::{
    RoadSegment, GEOMETRY_COLUMN, KSI_COUNT_COLUMN, ROAD_NUMBER_COLUMN, SPEED_LIMIT_COLUMN,
    UNKNOWN_ROAD,
};

/// Reason a row was left out of the record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The geometry field is empty.
    MissingGeometry,
    /// The geometry field is not valid WKT.
    InvalidWkt(String),
    /// The geometry is valid but not a `LINESTRING`.
    NotLineString(&'static str),
    /// The line has fewer than two vertices.
    TooFewVertices(usize),
    /// The CSV record itself could not be decoded.
    MalformedRow(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingGeometry => write!(f, "empty geometry"),
            SkipReason::InvalidWkt(err) => write!(f, "invalid WKT: {err}"),
            SkipReason::NotLineString(kind) => write!(f, "expected LineString, got {kind}"),
            SkipReason::TooFewVertices(count) => {
                write!(f, "line has {count} vertices, at least 2 required")
            }
            SkipReason::MalformedRow(err) => write!(f, "malformed row: {err}"),
        }
    }
}

/// Summary of a load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Number of data rows read, including skipped ones.
    pub rows: usize,
    /// Zero based data row index and reason for every dropped row.
    pub skipped: Vec<(usize, SkipReason)>,
}

impl LoadReport {
    /// Number of rows that made it into the record set.
    pub fn loaded(&self) -> usize {
        self.rows - self.skipped.len()
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    geometry: usize,
    road_number: Option<usize>,
    speed_limit: Option<usize>,
    ksi_count: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, KsiMapError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.trim_start_matches('\u{feff}').trim() == name)
        };

        Ok(Self {
            geometry: find(GEOMETRY_COLUMN).ok_or(KsiMapError::MissingColumn(GEOMETRY_COLUMN))?,
            road_number: find(ROAD_NUMBER_COLUMN),
            speed_limit: find(SPEED_LIMIT_COLUMN),
            ksi_count: find(KSI_COUNT_COLUMN),
        })
    }
}

/// Loads road segments from CSV input, dropping rows without a usable line geometry.
pub fn load(reader: impl Read) -> Result<Vec<RoadSegment>, KsiMapError> {
    load_with_report(reader).map(|(records, _)| records)
}

/// Same as [`load`], also returning which rows were dropped and why.
pub fn load_with_report(reader: impl Read) -> Result<(Vec<RoadSegment>, LoadReport), KsiMapError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::from_headers(reader.headers()?)?;

    let mut records = vec![];
    let mut report = LoadReport::default();

    for (index, row) in reader.records().enumerate() {
        report.rows += 1;

        let parsed = match row {
            Ok(row) => parse_row(&row, columns),
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => Err(SkipReason::MalformedRow(err.to_string())),
        };

        match parsed {
            Ok(record) => records.push(record),
            Err(reason) => {
                log::debug!("Skipping row {index}: {reason}");
                report.skipped.push((index, reason));
            }
        }
    }

    if !report.skipped.is_empty() {
        log::info!(
            "Loaded {} of {} rows, {} skipped",
            records.len(),
            report.rows,
            report.skipped.len()
        );
    }

    if records.is_empty() {
        return Err(KsiMapError::EmptyDataset);
    }

    Ok((records, report))
}

fn parse_row(row: &StringRecord, columns: Columns) -> Result<RoadSegment, SkipReason> {
    let field = |index: Option<usize>| index.and_then(|i| row.get(i));

    let geometry = parse_geometry(row.get(columns.geometry).unwrap_or_default())?;
    let road_number = match field(columns.road_number).map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN_ROAD.to_string(),
    };

    Ok(RoadSegment {
        geometry,
        road_number,
        speed_limit: parse_count(field(columns.speed_limit)),
        ksi_count: parse_count(field(columns.ksi_count)),
    })
}

/// Parses a WKT string, accepting only line strings with at least two vertices.
pub fn parse_geometry(wkt_str: &str) -> Result<LineString, SkipReason> {
    let wkt_str = wkt_str.trim();
    if wkt_str.is_empty() {
        return Err(SkipReason::MissingGeometry);
    }

    let geometry: Geometry = Geometry::try_from_wkt_str(wkt_str)
        .map_err(|err| SkipReason::InvalidWkt(err.to_string()))?;

    match geometry {
        Geometry::LineString(line) if line.0.len() >= 2 => Ok(line),
        Geometry::LineString(line) => Err(SkipReason::TooFewVertices(line.0.len())),
        other => Err(SkipReason::NotLineString(geometry_kind(&other))),
    }
}

fn geometry_kind(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// Integer-like count. Missing, negative and unparsable values become `0`, fractional values
/// are truncated.
fn parse_count(value: Option<&str>) -> u32 {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0;
    };

    if let Ok(count) = value.parse::<u32>() {
        return count;
    }

    match value.parse::<f64>() {
        Ok(v) if (0.0..=u32::MAX as f64).contains(&v) => v.trunc() as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use geo_types::coord;

    #[test]
    fn keeps_vertices_in_order() {
        let line = parse_geometry("LINESTRING (0.1 51.5, 0.2 51.6, 0.35 51.62)").expect("valid");
        assert_eq!(
            line.0,
            vec![
                coord! { x: 0.1, y: 51.5 },
                coord! { x: 0.2, y: 51.6 },
                coord! { x: 0.35, y: 51.62 },
            ]
        );
    }

    #[test]
    fn rejects_other_geometries() {
        assert_matches!(
            parse_geometry("POINT (0.1 51.5)"),
            Err(SkipReason::NotLineString("Point"))
        );
        assert_matches!(
            parse_geometry("MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))"),
            Err(SkipReason::NotLineString("MultiLineString"))
        );
        assert_matches!(parse_geometry("LINESTRING EMPTY"), Err(SkipReason::TooFewVertices(0)));
        assert_matches!(parse_geometry("LINESTRING (0 1"), Err(SkipReason::InvalidWkt(_)));
        assert_matches!(parse_geometry("  "), Err(SkipReason::MissingGeometry));
    }

    #[test]
    fn coerces_auxiliary_columns() {
        let csv = "\
geometry,Road Number,speed_limit,KSI Count
\"LINESTRING (0 0, 1 1)\",  A12 ,30,3
\"LINESTRING (0 0, 1 1)\",,,
\"LINESTRING (0 0, 1 1)\",B1,40.0,-2
";
        let (records, report) = load_with_report(csv.as_bytes()).expect("loads");

        assert_eq!(report.rows, 3);
        assert!(report.skipped.is_empty());
        assert_eq!(records[0].road_number, "A12");
        assert_eq!(records[0].speed_limit, 30);
        assert_eq!(records[0].ksi_count, 3);
        assert_eq!(records[1].road_number, UNKNOWN_ROAD);
        assert_eq!(records[1].speed_limit, 0);
        assert_eq!(records[1].ksi_count, 0);
        assert_eq!(records[2].speed_limit, 40);
        assert_eq!(records[2].ksi_count, 0);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = "geometry\n\"LINESTRING (0 0, 1 1, 2 0)\"\n";
        let records = load(csv.as_bytes()).expect("loads");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].road_number, UNKNOWN_ROAD);
        assert_eq!(records[0].vertex_count(), 3);
    }

    #[test]
    fn drops_only_bad_rows() {
        let csv = "\
Road Number,geometry,KSI Count
A1,\"LINESTRING (0 0, 1 1)\",1
A2,\"POINT (0 0)\",2
A3,not wkt,3
A4,\"LINESTRING (2 2, 3 3, 4 5)\",4
";
        let (records, report) = load_with_report(csv.as_bytes()).expect("loads");

        let roads: Vec<_> = records.iter().map(|r| r.road_number.as_str()).collect();
        assert_eq!(roads, ["A1", "A4"]);
        assert_eq!(report.loaded(), 2);
        assert_matches!(report.skipped[0], (1, SkipReason::NotLineString("Point")));
        assert_matches!(report.skipped[1], (2, SkipReason::InvalidWkt(_)));
    }

    #[test]
    fn missing_geometry_column() {
        let csv = "Road Number,KSI Count\nA12,3\n";
        assert_matches!(
            load(csv.as_bytes()),
            Err(KsiMapError::MissingColumn(GEOMETRY_COLUMN))
        );
    }

    #[test]
    fn no_valid_lines() {
        let csv = "geometry\n\"POINT (0 0)\"\n\"POLYGON ((0 0, 1 0, 1 1, 0 0))\"\n";
        assert_matches!(load(csv.as_bytes()), Err(KsiMapError::EmptyDataset));

        let header_only = "geometry,KSI Count\n";
        assert_matches!(load(header_only.as_bytes()), Err(KsiMapError::EmptyDataset));
    }

    #[test]
    fn count_parsing() {
        assert_eq!(parse_count(None), 0);
        assert_eq!(parse_count(Some("")), 0);
        assert_eq!(parse_count(Some(" 12 ")), 12);
        assert_eq!(parse_count(Some("7.9")), 7);
        assert_eq!(parse_count(Some("abc")), 0);
        assert_eq!(parse_count(Some("-3")), 0);
    }
}
