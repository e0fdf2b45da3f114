//! Coordinate math shared by the generators and the graph builder.

/// Earth mean radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Stretch factor applied to the raw cell spacing so that the grid lands in
/// degree space at the scale the visualizer expects.
const CELL_DEGREE_SCALE: f64 = (115.0 / 32.177) * (115.0 / 32.177);

/// Map a cell index along one axis to its coordinate in degrees.
pub fn cell_coordinate(index: u32, spacing: f64) -> f64 {
    (index as f64 * spacing) * CELL_DEGREE_SCALE
}

/// Great-circle distance in meters between two points given in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}
