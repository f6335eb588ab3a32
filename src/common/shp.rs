use std::path::Path;

use geo::{Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use shapefile::{self as shp, dbase::{FieldValue, Record}, Reader, Shape};

use crate::{CoproError, Result};

/// Reads all shapes + attribute records from a given `.shp` file path.
/// The file handles are released before returning.
pub(crate) fn read_shapefile(path: &Path) -> Result<Vec<(Shape, Record)>> {
    let mut reader = Reader::from_path(path)?;

    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        items.push(result?);
    }
    Ok(items)
}

/// Whether the attribute table next to a `.shp` file declares `field`.
/// Only the `.dbf` header is read.
pub(crate) fn has_field(path: &Path, field: &str) -> Result<bool> {
    let table = shp::dbase::Reader::from_path(path.with_extension("dbf"))
        .map_err(shp::Error::from)?;
    Ok(table.fields().iter().any(|info| info.name() == field))
}

/// Convert shapefile::Polygon to geo::MultiPolygon<f64>
pub(crate) fn shp_to_geo(p: &shp::Polygon) -> MultiPolygon<f64> {
    /// Get the signed area of a closed coord list (negative for clockwise)
    fn signed_area(pts: &[Coord<f64>]) -> f64 {
        pts.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
    }

    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes: Vec<LineString<f64>> = Vec::new();

    // Shapefile stores each clockwise exterior followed by its counter-clockwise holes.
    for ring in p.rings() {
        let mut coords: Vec<Coord<f64>> = ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect();
        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }
        let is_exterior = signed_area(&coords) < 0.0;
        let ls = LineString(coords);

        if is_exterior {
            if let Some(ext) = exterior.take() {
                polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(ls);
        } else {
            holes.push(ls);
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}

/// Convert a shape into a geo geometry. `Ok(None)` for null shapes.
pub(crate) fn shape_to_geometry(shape: Shape, path: &Path) -> Result<Option<Geometry<f64>>> {
    let geometry = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::PointM(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::PointZ(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::Multipoint(mp) => Geometry::MultiPoint(MultiPoint(
            mp.points().iter().map(|p| Point::new(p.x, p.y)).collect(),
        )),
        Shape::Polyline(pl) => Geometry::MultiLineString(MultiLineString(
            pl.parts().iter()
                .map(|part| LineString(part.iter().map(|p| Coord { x: p.x, y: p.y }).collect()))
                .collect(),
        )),
        Shape::Polygon(polygon) => Geometry::MultiPolygon(shp_to_geo(&polygon)),
        other => return Err(CoproError::input(
            path,
            format!("unsupported shape type {:?}", other.shapetype()),
        )),
    };
    Ok(Some(geometry))
}

/// Coerce a shape into a multipolygon, raising an error for any other shape.
pub(crate) fn shape_to_multipolygon(shape: Shape, path: &Path) -> Result<MultiPolygon<f64>> {
    match shape {
        Shape::Polygon(polygon) => Ok(shp_to_geo(&polygon)),
        other => Err(CoproError::input(
            path,
            format!("found non-Polygon shape in polygon layer: {:?}", other.shapetype()),
        )),
    }
}

/// Interpret an attribute value as a number. Null values map to `None`.
pub(crate) fn numeric_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Numeric(n) => *n,
        FieldValue::Float(f) => f.map(f64::from),
        FieldValue::Integer(i) => Some(f64::from(*i)),
        FieldValue::Double(d) | FieldValue::Currency(d) => Some(*d),
        FieldValue::Character(Some(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Get an integer id from a numeric or character attribute.
pub(crate) fn integer_field(record: &Record, field: &str) -> Option<i64> {
    match record.get(field)? {
        FieldValue::Character(Some(s)) => s.trim().parse().ok(),
        value => numeric_value(value)
            .filter(|n| n.fract() == 0.0)
            .map(|n| n as i64),
    }
}

/// Get a trimmed, non-empty character attribute.
pub(crate) fn character_field(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        FieldValue::Character(Some(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
