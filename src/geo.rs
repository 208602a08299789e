//! Small geodesy helpers for turn angles and phantom-node projection.

use crate::types::FixedPointCoordinate;

/// Initial bearing from `from` to `to` in degrees, clockwise from north.
pub fn bearing_degrees(from: FixedPointCoordinate, to: FixedPointCoordinate) -> f64 {
    let lat1 = from.lat_degrees().to_radians();
    let lat2 = to.lat_degrees().to_radians();
    let delta_lon = (to.lon_degrees() - from.lon_degrees()).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    let bearing = y.atan2(x).to_degrees();
    (bearing + 360.0) % 360.0
}

/// Signed turn angle at `via` when travelling u -> via -> w, wrapped to
/// [-180, 180]. Positive values turn right, negative values turn left.
pub fn turn_angle(
    u: FixedPointCoordinate,
    via: FixedPointCoordinate,
    w: FixedPointCoordinate,
) -> f64 {
    let incoming = bearing_degrees(u, via);
    let outgoing = bearing_degrees(via, w);

    let mut delta = outgoing - incoming;
    while delta > 180.0 {
        delta -= 360.0;
    }
    while delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Projects `p` onto the segment a-b in an equirectangular plane centered
/// on the segment. Returns the clamped segment parameter in [0, 1] and the
/// projected coordinate.
pub fn project_onto_segment(
    a: FixedPointCoordinate,
    b: FixedPointCoordinate,
    p: FixedPointCoordinate,
) -> (f64, FixedPointCoordinate) {
    let cos_lat = (a.lat_degrees().to_radians()).cos();

    let ax = a.lon_degrees() * cos_lat;
    let ay = a.lat_degrees();
    let bx = b.lon_degrees() * cos_lat;
    let by = b.lat_degrees();
    let px = p.lon_degrees() * cos_lat;
    let py = p.lat_degrees();

    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (0.0, a);
    }

    let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
    let proj_lon = (ax + t * dx) / cos_lat;
    let proj_lat = ay + t * dy;
    (t, FixedPointCoordinate::from_degrees(proj_lat, proj_lon))
}
