//! Shapefile shapes as `geo` geometries and GeoJSON geometry objects.

use geo::{
    Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use serde_json::{Value, json};
use shapefile::{PolygonRing, Shape};

/// Shape kinds with no GeoJSON counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unsupported(pub(crate) &'static str);

/// Planar access to the three shapefile point flavours. Z and M are dropped.
trait Planar {
    fn coord(&self) -> Coord<f64>;
}

impl Planar for shapefile::Point {
    fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl Planar for shapefile::PointM {
    fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl Planar for shapefile::PointZ {
    fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

/// Convert a shape into a geometry; null shapes yield `None`.
pub(crate) fn shape_to_geometry(shape: &Shape) -> Result<Option<Geometry<f64>>, Unsupported> {
    let geometry = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(point) => Geometry::Point(Point(point.coord())),
        Shape::PointM(point) => Geometry::Point(Point(point.coord())),
        Shape::PointZ(point) => Geometry::Point(Point(point.coord())),
        Shape::Multipoint(points) => multipoint(points.points()),
        Shape::MultipointM(points) => multipoint(points.points()),
        Shape::MultipointZ(points) => multipoint(points.points()),
        Shape::Polyline(line) => lines(line.parts()),
        Shape::PolylineM(line) => lines(line.parts()),
        Shape::PolylineZ(line) => lines(line.parts()),
        Shape::Polygon(polygon) => polygons(polygon.rings()),
        Shape::PolygonM(polygon) => polygons(polygon.rings()),
        Shape::PolygonZ(polygon) => polygons(polygon.rings()),
        Shape::Multipatch(_) => return Err(Unsupported("Multipatch")),
    };
    Ok(Some(geometry))
}

fn ring<P: Planar>(points: &[P]) -> LineString<f64> {
    points.iter().map(Planar::coord).collect()
}

fn multipoint<P: Planar>(points: &[P]) -> Geometry<f64> {
    Geometry::MultiPoint(MultiPoint(
        points.iter().map(|p| Point(p.coord())).collect(),
    ))
}

fn lines<P: Planar>(parts: &[Vec<P>]) -> Geometry<f64> {
    let mut strings: Vec<LineString<f64>> = parts.iter().map(|part| ring(part)).collect();
    if strings.len() == 1 {
        if let Some(only) = strings.pop() {
            return Geometry::LineString(only);
        }
    }
    Geometry::MultiLineString(MultiLineString(strings))
}

/// Group rings in file order: each outer ring opens a polygon and the inner
/// rings that follow become its holes. An inner ring with no preceding outer
/// ring is kept as an exterior so no coordinates are lost.
fn polygons<P: Planar>(rings: &[PolygonRing<P>]) -> Geometry<f64> {
    let mut grouped: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    for entry in rings {
        match entry {
            PolygonRing::Inner(points) if !grouped.is_empty() => {
                if let Some((_, holes)) = grouped.last_mut() {
                    holes.push(ring(points));
                }
            }
            PolygonRing::Outer(points) | PolygonRing::Inner(points) => {
                grouped.push((ring(points), Vec::new()));
            }
        }
    }
    let mut built: Vec<Polygon<f64>> = grouped
        .into_iter()
        .map(|(exterior, holes)| Polygon::new(exterior, holes))
        .collect();
    if built.len() == 1 {
        if let Some(only) = built.pop() {
            return Geometry::Polygon(only);
        }
    }
    Geometry::MultiPolygon(MultiPolygon(built))
}

/// Render a geometry as a GeoJSON geometry object.
pub(crate) fn geometry_to_geojson(geometry: &Geometry<f64>) -> Value {
    match geometry {
        Geometry::Point(point) => json!({ "type": "Point", "coordinates": position(point.0) }),
        Geometry::MultiPoint(points) => json!({
            "type": "MultiPoint",
            "coordinates": points.iter().map(|p| position(p.0)).collect::<Vec<_>>(),
        }),
        Geometry::Line(line) => json!({
            "type": "LineString",
            "coordinates": [position(line.start), position(line.end)],
        }),
        Geometry::LineString(line) => json!({
            "type": "LineString",
            "coordinates": path(line),
        }),
        Geometry::MultiLineString(lines) => json!({
            "type": "MultiLineString",
            "coordinates": lines.iter().map(path).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(polygon) => json!({
            "type": "Polygon",
            "coordinates": polygon_rings(polygon),
        }),
        Geometry::MultiPolygon(polygons) => json!({
            "type": "MultiPolygon",
            "coordinates": polygons.iter().map(polygon_rings).collect::<Vec<_>>(),
        }),
        Geometry::Rect(rect) => geometry_to_geojson(&Geometry::Polygon(rect.to_polygon())),
        Geometry::Triangle(triangle) => {
            geometry_to_geojson(&Geometry::Polygon(triangle.to_polygon()))
        }
        Geometry::GeometryCollection(collection) => json!({
            "type": "GeometryCollection",
            "geometries": collection.iter().map(geometry_to_geojson).collect::<Vec<_>>(),
        }),
    }
}

fn position(coord: Coord<f64>) -> [f64; 2] {
    [coord.x, coord.y]
}

fn path(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.coords().copied().map(position).collect()
}

fn polygon_rings(polygon: &Polygon<f64>) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pt(x: f64, y: f64) -> shapefile::Point {
        shapefile::Point { x, y }
    }

    fn square(origin: f64, size: f64) -> Vec<shapefile::Point> {
        let far = origin + size;
        vec![
            pt(origin, origin),
            pt(origin, far),
            pt(far, far),
            pt(far, origin),
            pt(origin, origin),
        ]
    }

    #[rstest]
    fn null_shape_has_no_geometry() {
        assert_eq!(shape_to_geometry(&Shape::NullShape), Ok(None));
    }

    #[rstest]
    fn point_z_drops_elevation() {
        let shape = Shape::PointZ(shapefile::PointZ {
            x: 1.5,
            y: -2.0,
            z: 40.0,
            m: 0.0,
        });
        let geometry = shape_to_geometry(&shape)
            .expect("points convert")
            .expect("point is not null");
        assert_eq!(
            geometry_to_geojson(&geometry),
            json!({ "type": "Point", "coordinates": [1.5, -2.0] })
        );
    }

    #[rstest]
    fn inner_rings_attach_to_preceding_outer_ring() {
        let rings = vec![
            PolygonRing::Outer(square(0.0, 10.0)),
            PolygonRing::Inner(square(2.0, 2.0)),
            PolygonRing::Outer(square(20.0, 5.0)),
        ];
        match polygons(&rings) {
            Geometry::MultiPolygon(multi) => {
                assert_eq!(multi.0.len(), 2);
                assert_eq!(multi.0[0].interiors().len(), 1);
                assert!(multi.0[1].interiors().is_empty());
            }
            other => panic!("expected a multipolygon, got {other:?}"),
        }
    }

    #[rstest]
    fn single_outer_ring_is_a_polygon() {
        let geometry = polygons(&[PolygonRing::Outer(square(0.0, 1.0))]);
        let value = geometry_to_geojson(&geometry);
        assert_eq!(value["type"], "Polygon");
        assert_eq!(value["coordinates"][0].as_array().map(Vec::len), Some(5));
    }

    #[rstest]
    fn single_part_polyline_is_a_line_string() {
        let geometry = lines(&[vec![pt(0.0, 0.0), pt(1.0, 1.0)]]);
        assert_eq!(
            geometry_to_geojson(&geometry),
            json!({ "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]] })
        );
    }
}
