//! Fast lookup of turn restrictions keyed by (from, via).

use std::collections::HashMap;

use crate::types::{NodeID, TurnRestriction};

#[derive(Debug, Default)]
pub struct RestrictionMap {
    map: HashMap<(NodeID, NodeID), Vec<(NodeID, bool)>>,
}

impl RestrictionMap {
    pub fn new(restrictions: &[TurnRestriction]) -> Self {
        let mut map: HashMap<(NodeID, NodeID), Vec<(NodeID, bool)>> = HashMap::new();
        for restriction in restrictions {
            map.entry((restriction.from, restriction.via))
                .or_default()
                .push((restriction.to, restriction.is_only));
        }
        Self { map }
    }

    /// An only-turn restriction emanating from (from, via), if any. All
    /// other turns at the via node are then forbidden.
    pub fn only_turn_target(&self, from: NodeID, via: NodeID) -> Option<NodeID> {
        self.map
            .get(&(from, via))?
            .iter()
            .find(|(_, is_only)| *is_only)
            .map(|(to, _)| *to)
    }

    /// Whether the turn from -> via -> to is explicitly forbidden.
    pub fn is_restricted(&self, from: NodeID, via: NodeID, to: NodeID) -> bool {
        self.map
            .get(&(from, via))
            .map(|entries| {
                entries
                    .iter()
                    .any(|(target, is_only)| !is_only && *target == to)
            })
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
