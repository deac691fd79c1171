//! Shape → GeoJSON conversion for insertion through `ST_GeomFromGeoJSON`.

use shapefile::Shape;

#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    #[error("failed to encode geometry as GeoJSON: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Encode a polygon shape as a 2D GeoJSON MultiPolygon; M and Z values are dropped.
///
/// Returns `Ok(None)` for shapes the table does not store: null shapes,
/// non-polygon shapes and polygons without rings.
pub fn to_geojson(shape: Shape) -> Result<Option<String>, ShapeError> {
    let multi: geo::MultiPolygon<f64> = match shape {
        Shape::Polygon(polygon) => polygon.into(),
        Shape::PolygonM(polygon) => polygon.into(),
        Shape::PolygonZ(polygon) => polygon.into(),
        _ => return Ok(None),
    };

    if multi.0.is_empty() {
        return Ok(None);
    }

    let geometry = geojson::Geometry::new(geojson::Value::from(&multi));
    Ok(Some(serde_json::to_string(&geometry)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapefile::{Point, PointM, PointZ, Polygon, PolygonM, PolygonRing, PolygonZ};

    #[test]
    fn polygon_becomes_multipolygon() {
        let ring = PolygonRing::Outer(vec![
            Point::new(-51.074144648, -21.708854973),
            Point::new(-51.072451456, -21.708112303),
            Point::new(-51.071743304, -21.709722639),
            Point::new(-51.074144648, -21.708854973),
        ]);
        let shape = Shape::Polygon(Polygon::new(ring));

        let json = to_geojson(shape).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["type"], "MultiPolygon");
        assert_eq!(value["coordinates"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn measured_and_3d_polygons_are_kept() {
        let ring_z = PolygonRing::Outer(vec![
            PointZ::new(-51.07, -21.70, 410.0, 0.0),
            PointZ::new(-51.06, -21.70, 412.0, 0.0),
            PointZ::new(-51.06, -21.71, 415.0, 0.0),
            PointZ::new(-51.07, -21.70, 410.0, 0.0),
        ]);
        let json = to_geojson(Shape::PolygonZ(PolygonZ::new(ring_z))).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "MultiPolygon");
        assert_eq!(value["coordinates"][0][0][0].as_array().unwrap().len(), 2);

        let ring_m = PolygonRing::Outer(vec![
            PointM::new(-51.07, -21.70, 1.0),
            PointM::new(-51.06, -21.70, 2.0),
            PointM::new(-51.06, -21.71, 3.0),
            PointM::new(-51.07, -21.70, 1.0),
        ]);
        let json = to_geojson(Shape::PolygonM(PolygonM::new(ring_m))).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "MultiPolygon");
    }

    #[test]
    fn non_polygon_shapes_are_skipped() {
        assert_eq!(to_geojson(Shape::NullShape).unwrap(), None);
        assert_eq!(to_geojson(Shape::Point(Point::new(1.0, 2.0))).unwrap(), None);
    }
}
