use geo::{BooleanOps, CoordsIter, MultiPolygon, RemoveRepeatedPoints, Validation};

/// Normalize a shape so spatial predicates behave: drop repeated vertices, overlay each
/// part with nothing to resolve ring self-intersections, then union the parts so they
/// no longer overlap. Returns the shape unchanged if it is already valid.
/// Shapes with NaN or infinite coordinates cannot be repaired.
pub(crate) fn repair_shape(shape: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, String> {
    if shape.is_valid() { return Ok(shape.clone()) }
    if shape.coords_iter().any(|coord| !(coord.x.is_finite() && coord.y.is_finite())) {
        return Err("non-finite coordinate".into())
    }

    let empty = MultiPolygon::<f64>::new(vec![]);
    let repaired = shape.remove_repeated_points().0.into_iter()
        .map(|polygon| MultiPolygon::new(vec![polygon]).union(&empty))
        .reduce(|a, b| a.union(&b))
        .unwrap_or_else(|| MultiPolygon::new(vec![]));

    if repaired.is_valid() {
        Ok(repaired)
    } else {
        Err(format!("{} polygon(s) still invalid after repair", repaired.0.len()))
    }
}
