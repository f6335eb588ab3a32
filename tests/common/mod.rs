#![allow(dead_code)]

use std::{fs, path::Path};

use geo::{polygon, MultiPolygon};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};

/// Axis-aligned square with its lower left corner at `(x, y)`.
pub fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: x, y: y),
        (x: x + size, y: y),
        (x: x + size, y: y + size),
        (x: x, y: y + size),
        (x: x, y: y),
    ]])
}

/// Write an ASCII grid with unit cells and its lower left corner at the origin.
/// `rows` are given top to bottom.
pub fn write_grid(path: &Path, rows: &[&[f64]]) {
    let mut text = format!(
        "ncols {}\nnrows {}\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -9999\n",
        rows[0].len(),
        rows.len(),
    );
    for row in rows {
        let line: Vec<String> = row.iter().map(f64::to_string).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    fs::write(path, text).unwrap();
}

/// Write unit squares `(id, x, y)` to a polygon shapefile with an integer `ID` field.
pub fn write_polygons(path: &Path, squares: &[(i64, f64, f64)]) {
    let table = TableWriterBuilder::new()
        .add_numeric_field(FieldName::try_from("ID").unwrap(), 10, 0);
    let mut writer = shapefile::Writer::from_path(path, table).unwrap();

    for &(id, x, y) in squares {
        // Exterior rings are clockwise.
        let ring = vec![
            shapefile::Point::new(x, y),
            shapefile::Point::new(x, y + 1.0),
            shapefile::Point::new(x + 1.0, y + 1.0),
            shapefile::Point::new(x + 1.0, y),
            shapefile::Point::new(x, y),
        ];
        let polygon = shapefile::Polygon::new(shapefile::PolygonRing::Outer(ring));
        let mut record = Record::default();
        record.insert("ID".to_string(), FieldValue::Numeric(Some(id as f64)));
        writer.write_shape_and_record(&polygon, &record).unwrap();
    }
}

/// Write squares `(x, y, size, value)` with one numeric attribute `field`.
pub fn write_values(path: &Path, field: &str, squares: &[(f64, f64, f64, f64)]) {
    let table = TableWriterBuilder::new()
        .add_numeric_field(FieldName::try_from(field).unwrap(), 18, 6);
    let mut writer = shapefile::Writer::from_path(path, table).unwrap();

    for &(x, y, size, value) in squares {
        let ring = vec![
            shapefile::Point::new(x, y),
            shapefile::Point::new(x, y + size),
            shapefile::Point::new(x + size, y + size),
            shapefile::Point::new(x + size, y),
            shapefile::Point::new(x, y),
        ];
        let polygon = shapefile::Polygon::new(shapefile::PolygonRing::Outer(ring));
        let mut record = Record::default();
        record.insert(field.to_string(), FieldValue::Numeric(Some(value)));
        writer.write_shape_and_record(&polygon, &record).unwrap();
    }
}

/// Write conflict events `(year, lon, lat)` as a CSV table.
pub fn write_events(path: &Path, events: &[(i32, f64, f64)]) {
    let mut text = String::from("id,year,longitude,latitude\n");
    for (i, (year, lon, lat)) in events.iter().enumerate() {
        text.push_str(&format!("{i},{year},{lon},{lat}\n"));
    }
    fs::write(path, text).unwrap();
}
