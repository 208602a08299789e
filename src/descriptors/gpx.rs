//! GPX 1.1 route rendering.

use std::io::Write;

use anyhow::Result;

use crate::facade::DataFacade;
use crate::server::params::RouteParameters;
use crate::types::RawRoute;

use super::{route_coordinates, Descriptor};

#[derive(Default)]
pub struct GpxDescriptor;

impl Descriptor for GpxDescriptor {
    fn set_config(&mut self, _params: &RouteParameters) {}

    fn render(&self, facade: &DataFacade, route: &RawRoute, out: &mut Vec<u8>) -> Result<()> {
        write!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <gpx creator=\"wayfarer\" version=\"1.1\" \
             xmlns=\"http://www.topografix.com/GPX/1/1\">"
        )?;
        write!(out, "<rte>")?;
        if route.is_valid() {
            for (lat, lon) in route_coordinates(facade, route) {
                write!(out, "<rtept lat=\"{lat:.6}\" lon=\"{lon:.6}\"/>")?;
            }
        }
        write!(out, "</rte></gpx>")?;
        Ok(())
    }
}
