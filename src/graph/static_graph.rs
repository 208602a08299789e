//! Compressed-sparse-row adjacency over the expanded edge list.
//!
//! Two parallel arrays: `first_edge` with one sentinel entry past the last
//! node, and the edge array itself. `first_edge[n]..first_edge[n + 1]` is
//! the half-open range of edges leaving node `n`. Read-only after
//! construction and shared across worker threads.

use std::ops::Range;

use crate::types::{EdgeData, EdgeID, NodeID, QueryEdge};

#[derive(Debug, Clone, Copy)]
struct StaticEdge {
    target: NodeID,
    data: EdgeData,
}

#[derive(Debug)]
pub struct StaticGraph {
    first_edge: Vec<u32>,
    edges: Vec<StaticEdge>,
}

impl StaticGraph {
    /// Builds the CSR in one pass. The input must be sorted by
    /// (source, target); `new` enforces this with a sort to stay safe for
    /// callers assembling edges by hand.
    pub fn new(node_count: u32, mut input: Vec<QueryEdge>) -> Self {
        input.sort_unstable_by_key(|e| (e.source, e.target));

        let mut first_edge = Vec::with_capacity(node_count as usize + 1);
        let mut cursor = 0usize;
        for node in 0..node_count {
            first_edge.push(cursor as u32);
            while cursor < input.len() && input[cursor].source == node {
                cursor += 1;
            }
        }
        // sentinel, keeps every range lookup in bounds
        first_edge.push(input.len() as u32);

        let edges = input
            .into_iter()
            .map(|e| {
                debug_assert!(e.target < node_count);
                StaticEdge {
                    target: e.target,
                    data: e.data,
                }
            })
            .collect();

        Self { first_edge, edges }
    }

    pub fn node_count(&self) -> u32 {
        (self.first_edge.len() - 1) as u32
    }

    pub fn edge_count(&self) -> u32 {
        self.edges.len() as u32
    }

    pub fn adjacent_edge_range(&self, node: NodeID) -> Range<EdgeID> {
        self.first_edge[node as usize]..self.first_edge[node as usize + 1]
    }

    pub fn target(&self, edge: EdgeID) -> NodeID {
        self.edges[edge as usize].target
    }

    pub fn edge_data(&self, edge: EdgeID) -> &EdgeData {
        &self.edges[edge as usize].data
    }

    /// Cheapest edge from `source` to `target`, used when unpacking paths.
    pub fn find_smallest_edge(&self, source: NodeID, target: NodeID) -> Option<EdgeID> {
        self.adjacent_edge_range(source)
            .filter(|&e| self.target(e) == target)
            .min_by_key(|&e| self.edge_data(e).distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_edge(source: NodeID, target: NodeID, distance: i32) -> QueryEdge {
        QueryEdge {
            source,
            target,
            data: EdgeData {
                distance,
                id: 0,
                shortcut: false,
                forward: true,
                backward: false,
            },
        }
    }

    #[test]
    fn test_ranges_and_sentinel() {
        let graph = StaticGraph::new(
            4,
            vec![
                query_edge(0, 1, 1),
                query_edge(0, 2, 2),
                query_edge(2, 3, 3),
            ],
        );
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.adjacent_edge_range(0), 0..2);
        assert_eq!(graph.adjacent_edge_range(1), 2..2);
        assert_eq!(graph.adjacent_edge_range(2), 2..3);
        assert_eq!(graph.adjacent_edge_range(3), 3..3);
    }

    #[test]
    fn test_first_edge_monotone() {
        let graph = StaticGraph::new(
            5,
            vec![query_edge(1, 0, 1), query_edge(3, 4, 1), query_edge(1, 2, 1)],
        );
        let mut previous = 0;
        for node in 0..graph.node_count() {
            let range = graph.adjacent_edge_range(node);
            assert!(range.start >= previous);
            assert!(range.end <= graph.edge_count());
            assert!(range.start <= range.end);
            previous = range.start;
        }
    }

    #[test]
    fn test_find_smallest_edge() {
        let graph = StaticGraph::new(
            2,
            vec![query_edge(0, 1, 9), query_edge(0, 1, 4), query_edge(1, 0, 2)],
        );
        let edge = graph.find_smallest_edge(0, 1).unwrap();
        assert_eq!(graph.edge_data(edge).distance, 4);
        assert!(graph.find_smallest_edge(1, 1).is_none());
    }

    #[test]
    fn test_empty_node_has_empty_range() {
        let graph = StaticGraph::new(3, vec![]);
        for node in 0..3 {
            assert!(graph.adjacent_edge_range(node).is_empty());
        }
    }
}
