//! Geometry construction from legacy coordinate strings.
//!
//! Coordinates use GeoJSON ordering (`[longitude, latitude]`) and nesting:
//! a point is one position, a polygon a list of closed rings, a multi-polygon
//! a list of polygons.

use thiserror::Error;
use tracker_model::FeatureType;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("malformed coordinates: {0}")]
    Json(#[from] serde_json::Error),

    #[error("position must have 2 or 3 numbers, found {0}")]
    PositionArity(usize),

    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),

    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("linear ring must have at least 4 positions, found {0}")]
    RingTooShort(usize),

    #[error("linear ring is not closed")]
    RingNotClosed,

    #[error("{0} must contain at least one {1}")]
    Empty(&'static str, &'static str),

    #[error("cannot create geometry for feature type {0}")]
    Unsupported(FeatureType),
}

pub type Position = Vec<f64>;
pub type Ring = Vec<Position>;

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedGeometry {
    Point(Position),
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl ParsedGeometry {
    pub fn feature_type(&self) -> FeatureType {
        match self {
            ParsedGeometry::Point(_) => FeatureType::Point,
            ParsedGeometry::Polygon(_) => FeatureType::Polygon,
            ParsedGeometry::MultiPolygon(_) => FeatureType::MultiPolygon,
        }
    }
}

/// Build a geometry of `feature_type` from a JSON coordinate string.
pub fn geometry_from_coordinates(
    feature_type: FeatureType,
    coordinates: &str,
) -> Result<ParsedGeometry, GeometryError> {
    match feature_type {
        FeatureType::Point => {
            let position: Position = serde_json::from_str(coordinates)?;
            check_position(&position)?;
            Ok(ParsedGeometry::Point(position))
        }
        FeatureType::Polygon => {
            let rings: Vec<Ring> = serde_json::from_str(coordinates)?;
            check_polygon(&rings)?;
            Ok(ParsedGeometry::Polygon(rings))
        }
        FeatureType::MultiPolygon => {
            let polygons: Vec<Vec<Ring>> = serde_json::from_str(coordinates)?;
            if polygons.is_empty() {
                return Err(GeometryError::Empty("multi-polygon", "polygon"));
            }
            for polygon in &polygons {
                check_polygon(polygon)?;
            }
            Ok(ParsedGeometry::MultiPolygon(polygons))
        }
        FeatureType::None | FeatureType::Symbol => Err(GeometryError::Unsupported(feature_type)),
    }
}

/// Parse a single `[longitude, latitude]` position.
pub fn parse_point(coordinates: &str) -> Result<Position, GeometryError> {
    let position: Position = serde_json::from_str(coordinates)?;
    check_position(&position)?;
    Ok(position)
}

fn check_position(position: &[f64]) -> Result<(), GeometryError> {
    if !(2..=3).contains(&position.len()) {
        return Err(GeometryError::PositionArity(position.len()));
    }
    let (longitude, latitude) = (position[0], position[1]);
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(GeometryError::Longitude(longitude));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(GeometryError::Latitude(latitude));
    }
    Ok(())
}

fn check_polygon(rings: &[Ring]) -> Result<(), GeometryError> {
    if rings.is_empty() {
        return Err(GeometryError::Empty("polygon", "ring"));
    }
    for ring in rings {
        if ring.len() < 4 {
            return Err(GeometryError::RingTooShort(ring.len()));
        }
        for position in ring {
            check_position(position)?;
        }
        if ring.first() != ring.last() {
            return Err(GeometryError::RingNotClosed);
        }
    }
    Ok(())
}
