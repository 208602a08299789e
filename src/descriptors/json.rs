//! JSON route rendering.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;

use crate::facade::DataFacade;
use crate::server::params::RouteParameters;
use crate::types::RawRoute;

use super::{route_coordinates, Descriptor};

#[derive(Serialize)]
struct RouteSummary {
    total_distance: i32,
    total_time: i32,
}

#[derive(Default)]
pub struct JsonDescriptor {
    print_instructions: bool,
}

impl Descriptor for JsonDescriptor {
    fn set_config(&mut self, params: &RouteParameters) {
        self.print_instructions = params.print_instructions;
    }

    fn render(&self, facade: &DataFacade, route: &RawRoute, out: &mut Vec<u8>) -> Result<()> {
        let body = if route.is_valid() {
            let geometry: Vec<[f64; 2]> = route_coordinates(facade, route)
                .into_iter()
                .map(|(lat, lon)| [lat, lon])
                .collect();
            let via_points = [
                geometry.first().copied().unwrap_or([0.0, 0.0]),
                geometry.last().copied().unwrap_or([0.0, 0.0]),
            ];
            let summary = RouteSummary {
                total_distance: route.shortest_path_length,
                total_time: route.shortest_path_length / 10,
            };
            let mut body = json!({
                "status": 0,
                "status_message": "Found route between points",
                "route_summary": summary,
                "route_geometry": geometry,
                "via_points": via_points,
            });
            if self.print_instructions {
                body["route_instructions"] = json!([]);
            }
            body
        } else {
            json!({
                "status": 207,
                "status_message": "Cannot find route between points",
            })
        };
        serde_json::to_writer(&mut *out, &body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::expanded::ExpandedGraph;
    use crate::types::{
        FixedPointCoordinate, PhantomNode, PhantomNodes, RawRoute, INVALID_NODE,
    };

    fn empty_facade() -> DataFacade {
        DataFacade::from_parts(
            ExpandedGraph {
                check_sum: 0,
                node_count: 1,
                edges: vec![],
            },
            vec![],
            vec![],
        )
        .unwrap()
    }

    fn phantom_pair() -> PhantomNodes {
        let phantom = PhantomNode {
            forward_node_id: INVALID_NODE,
            reverse_node_id: INVALID_NODE,
            forward_weight_offset: 0,
            reverse_weight_offset: 0,
            location: FixedPointCoordinate::from_degrees(50.0, 8.0),
        };
        PhantomNodes {
            source: phantom,
            target: phantom,
        }
    }

    #[test]
    fn test_no_route_renders_status_207() {
        let facade = empty_facade();
        let route = RawRoute::new(phantom_pair());
        let descriptor = JsonDescriptor::default();

        let mut out = Vec::new();
        descriptor.render(&facade, &route, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], 207);
        assert_eq!(value["status_message"], "Cannot find route between points");
    }

    #[test]
    fn test_instructions_flag_adds_array() {
        let facade = empty_facade();
        let mut route = RawRoute::new(phantom_pair());
        route.shortest_path_length = 30;
        route.unpacked_path_segments.push(vec![]);

        let mut descriptor = JsonDescriptor::default();
        let params = RouteParameters {
            print_instructions: true,
            ..Default::default()
        };
        descriptor.set_config(&params);

        let mut out = Vec::new();
        descriptor.render(&facade, &route, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], 0);
        assert_eq!(value["route_summary"]["total_distance"], 30);
        assert!(value["route_instructions"].is_array());
    }
}
