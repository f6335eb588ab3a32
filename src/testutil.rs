//! Fixtures shared by unit tests.

use std::path::Path;

use geo::{polygon, MultiPolygon};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};

/// Axis-aligned square with its lower left corner at `(x, y)`.
pub(crate) fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
    MultiPolygon(vec![polygon![
        (x: x, y: y),
        (x: x + size, y: y),
        (x: x + size, y: y + size),
        (x: x, y: y + size),
        (x: x, y: y),
    ]])
}

fn table(fields: &[&str]) -> TableWriterBuilder {
    fields.iter().fold(TableWriterBuilder::new(), |table, &name| {
        table.add_numeric_field(FieldName::try_from(name).unwrap(), 18, 6)
    })
}

fn record(fields: &[&str], values: &[Option<f64>]) -> Record {
    let mut record = Record::default();
    for (name, value) in fields.iter().zip(values) {
        record.insert(name.to_string(), FieldValue::Numeric(*value));
    }
    record
}

/// Clockwise square ring, as shapefiles store exteriors.
fn square_shape(x: f64, y: f64, size: f64) -> shapefile::Polygon {
    shapefile::Polygon::new(shapefile::PolygonRing::Outer(vec![
        shapefile::Point::new(x, y),
        shapefile::Point::new(x, y + size),
        shapefile::Point::new(x + size, y + size),
        shapefile::Point::new(x + size, y),
        shapefile::Point::new(x, y),
    ]))
}

/// Write squares `((x, y, size), values)` with numeric attributes `fields`.
pub(crate) fn write_squares(path: &Path, fields: &[&str], squares: &[((f64, f64, f64), Vec<Option<f64>>)]) {
    let mut writer = shapefile::Writer::from_path(path, table(fields)).unwrap();
    for ((x, y, size), values) in squares {
        writer.write_shape_and_record(&square_shape(*x, *y, *size), &record(fields, values)).unwrap();
    }
}

/// Write points `((x, y), values)` with numeric attributes `fields`.
pub(crate) fn write_points(path: &Path, fields: &[&str], points: &[((f64, f64), Vec<Option<f64>>)]) {
    let mut writer = shapefile::Writer::from_path(path, table(fields)).unwrap();
    for ((x, y), values) in points {
        writer.write_shape_and_record(&shapefile::Point::new(*x, *y), &record(fields, values)).unwrap();
    }
}

/// Write polylines `(vertices, values)` with numeric attributes `fields`.
pub(crate) fn write_lines(path: &Path, fields: &[&str], lines: &[(Vec<(f64, f64)>, Vec<Option<f64>>)]) {
    let mut writer = shapefile::Writer::from_path(path, table(fields)).unwrap();
    for (vertices, values) in lines {
        let line = shapefile::Polyline::new(
            vertices.iter().map(|&(x, y)| shapefile::Point::new(x, y)).collect(),
        );
        writer.write_shape_and_record(&line, &record(fields, values)).unwrap();
    }
}
