//! R-tree over edge-based node geometry, resolving request coordinates to
//! phantom nodes.

use rstar::{primitives::GeomWithData, RTree};

use crate::geo;
use crate::types::{EdgeBasedNode, FixedPointCoordinate, PhantomNode};

pub struct SpatialIndex {
    tree: RTree<GeomWithData<[f64; 2], u32>>,
    nodes: Vec<EdgeBasedNode>,
}

impl SpatialIndex {
    pub fn build(nodes: Vec<EdgeBasedNode>) -> Self {
        let points: Vec<GeomWithData<[f64; 2], u32>> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let mid_lat = (node.u.lat_degrees() + node.v.lat_degrees()) / 2.0;
                let mid_lon = (node.u.lon_degrees() + node.v.lon_degrees()) / 2.0;
                GeomWithData::new([mid_lon, mid_lat], index as u32)
            })
            .collect();
        Self {
            tree: RTree::bulk_load(points),
            nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Projects the coordinate onto the nearest road segment. The weight
    /// offsets carry the cost already spent on the segment before the
    /// projection, one per travel direction.
    pub fn nearest_phantom(&self, coord: FixedPointCoordinate) -> Option<PhantomNode> {
        let hit = self
            .tree
            .nearest_neighbor(&[coord.lon_degrees(), coord.lat_degrees()])?;
        let record = &self.nodes[hit.data as usize];

        let (t, location) = geo::project_onto_segment(record.u, record.v, coord);
        let forward_weight_offset = (t * record.forward_weight as f64).round() as i32;
        let reverse_weight_offset = ((1.0 - t) * record.reverse_weight as f64).round() as i32;

        Some(PhantomNode {
            forward_node_id: record.forward_edge_id,
            reverse_node_id: record.reverse_edge_id,
            forward_weight_offset,
            reverse_weight_offset,
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::INVALID_NODE;

    fn segment(
        forward_edge_id: u32,
        reverse_edge_id: u32,
        u: (f64, f64),
        v: (f64, f64),
        weight: i32,
    ) -> EdgeBasedNode {
        EdgeBasedNode {
            forward_edge_id,
            reverse_edge_id,
            u: FixedPointCoordinate::from_degrees(u.0, u.1),
            v: FixedPointCoordinate::from_degrees(v.0, v.1),
            name_id: 0,
            forward_weight: weight,
            reverse_weight: weight,
        }
    }

    #[test]
    fn test_snaps_to_closest_segment() {
        let index = SpatialIndex::build(vec![
            segment(0, 1, (50.0, 8.0), (50.0, 8.01), 100),
            segment(2, 3, (51.0, 9.0), (51.0, 9.01), 100),
        ]);
        let phantom = index
            .nearest_phantom(FixedPointCoordinate::from_degrees(51.0005, 9.005))
            .unwrap();
        assert_eq!(phantom.forward_node_id, 2);
        assert_eq!(phantom.reverse_node_id, 3);
    }

    #[test]
    fn test_offsets_split_the_segment() {
        let index = SpatialIndex::build(vec![segment(0, 1, (50.0, 8.0), (50.0, 8.01), 100)]);
        // a quarter of the way along the segment
        let phantom = index
            .nearest_phantom(FixedPointCoordinate::from_degrees(50.0001, 8.0025))
            .unwrap();
        assert!((phantom.forward_weight_offset - 25).abs() <= 1);
        assert!((phantom.reverse_weight_offset - 75).abs() <= 1);
        assert!(phantom.location.is_valid());
    }

    #[test]
    fn test_oneway_keeps_invalid_reverse() {
        let index = SpatialIndex::build(vec![segment(
            0,
            INVALID_NODE,
            (50.0, 8.0),
            (50.0, 8.01),
            100,
        )]);
        let phantom = index
            .nearest_phantom(FixedPointCoordinate::from_degrees(50.0, 8.005))
            .unwrap();
        assert_eq!(phantom.reverse_node_id, INVALID_NODE);
        assert!(phantom.is_valid());
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::build(vec![]);
        assert!(index
            .nearest_phantom(FixedPointCoordinate::from_degrees(50.0, 8.0))
            .is_none());
    }
}
