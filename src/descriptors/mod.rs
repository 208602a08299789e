//! Response renderers turning a `RawRoute` into a reply body.
//!
//! A descriptor is configured once per request and then renders; concrete
//! implementations are picked by the requested output format.

pub mod gpx;
pub mod json;

use anyhow::Result;

use crate::facade::DataFacade;
use crate::server::params::RouteParameters;
use crate::types::RawRoute;

pub trait Descriptor {
    fn set_config(&mut self, params: &RouteParameters);

    fn render(&self, facade: &DataFacade, route: &RawRoute, out: &mut Vec<u8>) -> Result<()>;
}

/// Selects a descriptor for the requested output format; anything but
/// "gpx" renders JSON.
pub fn by_format(format: Option<&str>) -> Box<dyn Descriptor> {
    match format {
        Some("gpx") => Box::new(gpx::GpxDescriptor::default()),
        _ => Box::new(json::JsonDescriptor::default()),
    }
}

/// Route geometry as coordinates: the snapped start point, one point per
/// traversed segment, the snapped end point.
pub(crate) fn route_coordinates(
    facade: &DataFacade,
    route: &RawRoute,
) -> Vec<(f64, f64)> {
    let mut coords = Vec::new();
    if let Some(ends) = route.segment_end_coordinates.first() {
        coords.push((
            ends.source.location.lat_degrees(),
            ends.source.location.lon_degrees(),
        ));
    }
    for segment in &route.unpacked_path_segments {
        for &node in segment {
            let coord = facade.edge_based_coordinate(node);
            coords.push((coord.lat_degrees(), coord.lon_degrees()));
        }
    }
    if let Some(ends) = route.segment_end_coordinates.first() {
        coords.push((
            ends.target.location.lat_degrees(),
            ends.target.location.lon_degrees(),
        ));
    }
    coords
}
