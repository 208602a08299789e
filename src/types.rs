//! Core identifiers, coordinates and graph records shared across the crate.

pub type NodeID = u32;
pub type EdgeID = u32;

/// Sentinel marking deleted or unmapped entities.
pub const INVALID_NODE: NodeID = u32::MAX;

/// Sentinel result of an unreachable shortest-path query. This is a value,
/// not an error.
pub const INVALID_EDGE_WEIGHT: i32 = i32::MAX;

/// Fixed-point coordinates carry six decimal digits.
pub const COORDINATE_PRECISION: f64 = 1_000_000.0;

/// Geographic position in fixed-point 10^-6 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedPointCoordinate {
    pub lat: i32,
    pub lon: i32,
}

impl FixedPointCoordinate {
    pub fn new(lat: i32, lon: i32) -> Self {
        Self { lat, lon }
    }

    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self {
            lat: (lat * COORDINATE_PRECISION).round() as i32,
            lon: (lon * COORDINATE_PRECISION).round() as i32,
        }
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat as f64 / COORDINATE_PRECISION
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon as f64 / COORDINATE_PRECISION
    }

    pub fn is_valid(&self) -> bool {
        self.lat.abs() <= 90_000_000 && self.lon.abs() <= 180_000_000
    }
}

/// Node record as it appears in the input graph, before renumbering.
#[derive(Debug, Clone, Copy)]
pub struct ExternalNode {
    pub external_id: u64,
    pub lat: i32,
    pub lon: i32,
    pub is_barrier: bool,
    pub has_traffic_light: bool,
}

/// Node-based edge after renumbering and canonicalization.
///
/// Invariant after loading: `source <= target`; the forward/backward flags
/// are swapped together with the endpoints to preserve traversability.
#[derive(Debug, Clone, Copy)]
pub struct ImportEdge {
    pub source: NodeID,
    pub target: NodeID,
    pub name_id: u32,
    pub weight: i32,
    pub forward: bool,
    pub backward: bool,
    pub is_roundabout: bool,
    pub ignore_in_grid: bool,
    pub access_restricted: bool,
    pub travel_mode: u8,
    pub is_split: bool,
}

/// A (from, via, to) turn restriction. `is_only` flips the semantics from
/// "this turn is forbidden" to "only this turn is permitted".
#[derive(Debug, Clone, Copy)]
pub struct TurnRestriction {
    pub from: NodeID,
    pub via: NodeID,
    pub to: NodeID,
    pub is_only: bool,
}

/// Edge of the edge-expanded graph: a permitted turn between two directed
/// road segments.
#[derive(Debug, Clone, Copy)]
pub struct EdgeBasedEdge {
    pub source: NodeID,
    pub target: NodeID,
    pub edge_id: u32,
    pub weight: i32,
    pub forward: bool,
    pub backward: bool,
}

/// Geometry and per-direction ids of one surviving node-based segment.
/// Consumed by the spatial index; the expanded-graph checksum is computed
/// over the packed form of these records.
#[derive(Debug, Clone, Copy)]
pub struct EdgeBasedNode {
    pub forward_edge_id: NodeID,
    pub reverse_edge_id: NodeID,
    pub u: FixedPointCoordinate,
    pub v: FixedPointCoordinate,
    pub name_id: u32,
    pub forward_weight: i32,
    pub reverse_weight: i32,
}

/// In-memory payload of one expanded edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeData {
    pub distance: i32,
    pub id: u32,
    pub shortcut: bool,
    pub forward: bool,
    pub backward: bool,
}

/// Expanded edge as handed to the static graph builder.
#[derive(Debug, Clone, Copy)]
pub struct QueryEdge {
    pub source: NodeID,
    pub target: NodeID,
    pub data: EdgeData,
}

/// A point projected onto a road segment. The weight offsets describe how
/// much of the segment lies behind the projection in either direction; the
/// query engine seeds its heap with their negation.
#[derive(Debug, Clone, Copy)]
pub struct PhantomNode {
    pub forward_node_id: NodeID,
    pub reverse_node_id: NodeID,
    pub forward_weight_offset: i32,
    pub reverse_weight_offset: i32,
    pub location: FixedPointCoordinate,
}

impl PhantomNode {
    pub fn is_valid(&self) -> bool {
        self.forward_node_id != INVALID_NODE || self.reverse_node_id != INVALID_NODE
    }
}

/// Source and target phantoms of one route leg.
#[derive(Debug, Clone, Copy)]
pub struct PhantomNodes {
    pub source: PhantomNode,
    pub target: PhantomNode,
}

/// Result of a shortest-path query before rendering.
#[derive(Debug, Clone)]
pub struct RawRoute {
    pub segment_end_coordinates: Vec<PhantomNodes>,
    pub unpacked_path_segments: Vec<Vec<NodeID>>,
    pub shortest_path_length: i32,
    pub source_traversed_in_reverse: Vec<bool>,
    pub target_traversed_in_reverse: Vec<bool>,
}

impl RawRoute {
    pub fn new(ends: PhantomNodes) -> Self {
        Self {
            segment_end_coordinates: vec![ends],
            unpacked_path_segments: Vec::new(),
            shortest_path_length: INVALID_EDGE_WEIGHT,
            source_traversed_in_reverse: Vec::new(),
            target_traversed_in_reverse: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.shortest_path_length != INVALID_EDGE_WEIGHT
    }
}
