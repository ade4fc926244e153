//! # Attribute Projector
//!
//! Extracts the flat attribute mapping embedded in node-added, edge-added
//! and attributes-changed events from an entity's attribute row, applying
//! the visibility policy: the reserved identifier column and absent values
//! are excluded; visualization fields are appended when enabled.
//!
//! Projection is pure with respect to a point-in-time entity snapshot.
//! When the entity lives in a `SharedGraph`, callers must hold at least
//! the read lock across lookup-and-projection.

use crate::event::StreamEvent;
use crate::graph::{Edge, Node};
use crate::primitives::{
    ID_COLUMN_INDEX, VIZ_B, VIZ_G, VIZ_R, VIZ_SIZE, VIZ_WEIGHT, VIZ_X, VIZ_Y, VIZ_Z,
};
use crate::types::{AttrValue, AttributeRow, Attributes};

/// Project the visible attributes of a node.
///
/// With `include_viz`, position, color and size are appended after the row
/// fields, so a visualization value always wins over a same-named
/// application attribute.
#[must_use]
pub fn node_attributes(node: &Node, include_viz: bool) -> Attributes {
    let mut attributes = row_attributes(node.row());

    if include_viz {
        let v = node.visual;
        attributes.insert(VIZ_X.to_string(), AttrValue::from(v.x));
        attributes.insert(VIZ_Y.to_string(), AttrValue::from(v.y));
        attributes.insert(VIZ_Z.to_string(), AttrValue::from(v.z));
        attributes.insert(VIZ_R.to_string(), AttrValue::from(v.r));
        attributes.insert(VIZ_G.to_string(), AttrValue::from(v.g));
        attributes.insert(VIZ_B.to_string(), AttrValue::from(v.b));
        attributes.insert(VIZ_SIZE.to_string(), AttrValue::from(v.size));
    }

    attributes
}

/// Project the visible attributes of an edge.
#[must_use]
pub fn edge_attributes(edge: &Edge, include_viz: bool) -> Attributes {
    let mut attributes = row_attributes(edge.row());

    if include_viz {
        let v = edge.visual;
        attributes.insert(VIZ_X.to_string(), AttrValue::from(v.x));
        attributes.insert(VIZ_Y.to_string(), AttrValue::from(v.y));
        attributes.insert(VIZ_Z.to_string(), AttrValue::from(v.z));
        attributes.insert(VIZ_R.to_string(), AttrValue::from(v.r));
        attributes.insert(VIZ_G.to_string(), AttrValue::from(v.g));
        attributes.insert(VIZ_B.to_string(), AttrValue::from(v.b));
        attributes.insert(VIZ_WEIGHT.to_string(), AttrValue::from(v.weight));
    }

    attributes
}

/// Build the node-added event announcing a node.
#[must_use]
pub fn node_added_event(node: &Node, include_viz: bool) -> StreamEvent {
    StreamEvent::NodeAdded {
        id: node.id().to_string(),
        attributes: node_attributes(node, include_viz),
    }
}

/// Build the edge-added event announcing an edge, carrying source, target
/// and directedness.
#[must_use]
pub fn edge_added_event(edge: &Edge, include_viz: bool) -> StreamEvent {
    StreamEvent::EdgeAdded {
        id: edge.id().to_string(),
        source: edge.source().to_string(),
        target: edge.target().to_string(),
        directed: edge.directed(),
        attributes: edge_attributes(edge, include_viz),
    }
}

/// The row cells that survive the visibility policy, keyed by column title.
fn row_attributes(row: &AttributeRow) -> Attributes {
    let mut attributes = Attributes::new();
    for cell in row.cells() {
        if cell.column.index == ID_COLUMN_INDEX {
            continue;
        }
        let Some(value) = &cell.value else {
            continue;
        };
        attributes.insert(cell.column.title.clone(), value.clone());
    }
    attributes
}

// =============================================================================
// TESTS
// =============================================================================
