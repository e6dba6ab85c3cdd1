//! Bring every input layer into the single planar frame used for scoring.

use geo::{Coord, Geometry, MapCoords, MultiPolygon, Point};
use superfund_core::{
    Crs, Layer, LayerKind, Layers, NaturalArea, PopulationBlock, ProjectionError, School, Site,
};

/// Marker for a transform that left the finite plane.
struct NonFiniteCoordinate;

/// A feature whose geometry can be carried between reference systems.
trait Reproject: Sized + Clone {
    fn reproject(&self, from: Crs, to: Crs) -> Result<Self, NonFiniteCoordinate>;
}

fn transform(from: Crs, to: Crs, coord: Coord<f64>) -> Result<Coord<f64>, NonFiniteCoordinate> {
    let projected = from.transform(to, coord);
    if projected.x.is_finite() && projected.y.is_finite() {
        Ok(projected)
    } else {
        Err(NonFiniteCoordinate)
    }
}

fn reproject_geometry(
    geometry: &Geometry<f64>,
    from: Crs,
    to: Crs,
) -> Result<Geometry<f64>, NonFiniteCoordinate> {
    geometry.try_map_coords(|coord| transform(from, to, coord))
}

fn reproject_multipolygon(
    geometry: &MultiPolygon<f64>,
    from: Crs,
    to: Crs,
) -> Result<MultiPolygon<f64>, NonFiniteCoordinate> {
    geometry.try_map_coords(|coord| transform(from, to, coord))
}

impl Reproject for Site {
    fn reproject(&self, from: Crs, to: Crs) -> Result<Self, NonFiniteCoordinate> {
        Ok(Self {
            geometry: reproject_geometry(&self.geometry, from, to)?,
            ..self.clone()
        })
    }
}

impl Reproject for NaturalArea {
    fn reproject(&self, from: Crs, to: Crs) -> Result<Self, NonFiniteCoordinate> {
        Ok(Self {
            geometry: reproject_multipolygon(&self.geometry, from, to)?,
        })
    }
}

impl Reproject for PopulationBlock {
    fn reproject(&self, from: Crs, to: Crs) -> Result<Self, NonFiniteCoordinate> {
        Ok(Self {
            id: self.id.clone(),
            population: self.population,
            geometry: reproject_multipolygon(&self.geometry, from, to)?,
        })
    }
}

impl Reproject for School {
    fn reproject(&self, from: Crs, to: Crs) -> Result<Self, NonFiniteCoordinate> {
        let location: Point<f64> = transform(from, to, self.location.0)?.into();
        Ok(Self { location })
    }
}

fn reproject_layer<T: Reproject>(
    layer: &Layer<T>,
    kind: LayerKind,
    target: Crs,
) -> Result<Layer<T>, ProjectionError> {
    let source = layer.crs().ok_or(ProjectionError::Undefined { layer: kind })?;
    if source == target {
        return Ok(layer.clone());
    }
    log::debug!(
        "reprojecting {} {kind} features from {source} to {target}",
        layer.len()
    );
    let features = layer
        .features()
        .iter()
        .map(|feature| feature.reproject(source, target))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|NonFiniteCoordinate| ProjectionError::NonFinite {
            layer: kind,
            from: source,
            to: target,
        })?;
    Ok(Layer::new(target, features))
}

/// Reproject all four layers into `target`, returning new layers.
///
/// The input is left untouched. Layers already in `target` are copied
/// without coordinate changes.
///
/// # Errors
/// Returns [`ProjectionError::NotPlanar`] when `target` is not a planar
/// metric system, [`ProjectionError::Undefined`] for a layer with no
/// reference system, and [`ProjectionError::NonFinite`] when a transform
/// leaves the finite plane. Layers are checked in the order sites, natural
/// areas, population blocks, schools.
pub fn reproject_layers(layers: &Layers, target: Crs) -> Result<Layers, ProjectionError> {
    if !target.is_planar_metric() {
        return Err(ProjectionError::NotPlanar { crs: target });
    }
    Ok(Layers {
        sites: reproject_layer(&layers.sites, LayerKind::Sites, target)?,
        natural_areas: reproject_layer(&layers.natural_areas, LayerKind::NaturalAreas, target)?,
        population_blocks: reproject_layer(
            &layers.population_blocks,
            LayerKind::PopulationBlocks,
            target,
        )?,
        schools: reproject_layer(&layers.schools, LayerKind::Schools, target)?,
    })
}
