//! One-to-one shortest path on the edge-expanded graph.
//!
//! The search starts from both directions of the source phantom with the
//! negated weight offsets as keys, settles nodes in key order and stops at
//! the first target phantom direction reached. Unreachable targets are a
//! result, not an error: the route comes back with
//! `shortest_path_length == INVALID_EDGE_WEIGHT`.

use std::cell::RefCell;
use std::sync::Arc;

use crate::facade::DataFacade;
use crate::types::{NodeID, PhantomNodes, RawRoute, INVALID_EDGE_WEIGHT, INVALID_NODE};

use super::heap::QueryHeap;

thread_local! {
    // per-thread scratch heap, reused across queries
    static WORK_HEAP: RefCell<Option<QueryHeap>> = const { RefCell::new(None) };
}

pub struct SearchEngine {
    facade: Arc<DataFacade>,
}

impl SearchEngine {
    pub fn new(facade: Arc<DataFacade>) -> Self {
        Self { facade }
    }

    pub fn shortest_path(&self, ends: &PhantomNodes, uturn_allowed: bool) -> RawRoute {
        WORK_HEAP.with(|slot| {
            let mut slot = slot.borrow_mut();
            let node_count = self.facade.node_count() as usize;
            let too_small = slot
                .as_ref()
                .map(|heap| heap.capacity() < node_count)
                .unwrap_or(true);
            if too_small {
                *slot = Some(QueryHeap::new(node_count));
            }
            let heap = slot.as_mut().expect("scratch heap initialized above");
            heap.clear();
            self.run(heap, ends, uturn_allowed)
        })
    }

    fn run(&self, heap: &mut QueryHeap, ends: &PhantomNodes, _uturn_allowed: bool) -> RawRoute {
        let mut route = RawRoute::new(*ends);
        let source = &ends.source;
        let target = &ends.target;

        if self.facade.node_count() == 0 || !source.is_valid() {
            return route;
        }

        if source.forward_node_id != INVALID_NODE {
            heap.insert(
                source.forward_node_id,
                -source.forward_weight_offset,
                source.forward_node_id,
            );
        }
        if source.reverse_node_id != INVALID_NODE {
            heap.insert(
                source.reverse_node_id,
                -source.reverse_weight_offset,
                source.reverse_node_id,
            );
        }

        let mut reached = INVALID_NODE;
        while !heap.is_empty() {
            let current = heap.delete_min();
            let distance = heap.get_key(current);

            if current == target.forward_node_id || current == target.reverse_node_id {
                reached = current;
                break;
            }

            for edge in self.facade.adjacent_edge_range(current) {
                let data = self.facade.edge_data(edge);
                if !data.forward {
                    continue;
                }
                debug_assert!(data.distance > 0, "edge weight must be positive");
                let to = self.facade.target(edge);
                let to_distance = distance + data.distance;

                if !heap.was_inserted(to) {
                    heap.insert(to, to_distance, current);
                } else if to_distance < heap.get_key(to) {
                    heap.set_parent(to, current);
                    heap.decrease_key(to, to_distance);
                }
            }
        }

        if reached == INVALID_NODE {
            route.shortest_path_length = INVALID_EDGE_WEIGHT;
            return route;
        }

        // walk the parent chain back to its fixed point
        let mut packed = Vec::new();
        let mut node = reached;
        while node != heap.parent_of(node) {
            packed.push(node);
            node = heap.parent_of(node);
        }
        packed.push(node);
        packed.reverse();

        route
            .unpacked_path_segments
            .push(self.unpack_path(&packed));
        route
            .source_traversed_in_reverse
            .push(packed[0] != source.forward_node_id);
        route
            .target_traversed_in_reverse
            .push(*packed.last().expect("packed path is non-empty") != target.forward_node_id);
        route.shortest_path_length = heap.get_key(reached).max(0);
        route
    }

    /// Expands shortcut edges in the packed path. The plain expanded graph
    /// carries no shortcuts, so the path passes through unchanged; the
    /// recursion only kicks in for contracted variants.
    fn unpack_path(&self, packed: &[NodeID]) -> Vec<NodeID> {
        let mut unpacked = Vec::with_capacity(packed.len());
        let mut stack: Vec<(NodeID, NodeID)> = packed
            .windows(2)
            .rev()
            .map(|pair| (pair[0], pair[1]))
            .collect();

        while let Some((from, to)) = stack.pop() {
            match self.facade.find_smallest_edge(from, to) {
                Some(edge) if self.facade.edge_data(edge).shortcut => {
                    let middle = self.facade.edge_data(edge).id;
                    stack.push((middle, to));
                    stack.push((from, middle));
                }
                _ => unpacked.push(from),
            }
        }
        if let Some(&last) = packed.last() {
            unpacked.push(last);
        }
        unpacked
    }
}
