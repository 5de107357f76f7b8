use super::enums::NodeColor;
use super::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const NODE_WIDTH: f64 = 200.0;
pub const NODE_HEIGHT: f64 = 100.0;
pub const DEFAULT_NODE_TITLE: &str = "New node";
pub const DEFAULT_MAP_NAME: &str = "My first map";
pub const DEFAULT_AUTO_CONNECT_DISTANCE: f64 = 250.0;

fn default_width() -> f64 {
    NODE_WIDTH
}

fn default_height() -> f64 {
    NODE_HEIGHT
}

/// A free-text note placed on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindMapNode {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub color: NodeColor,
    /// Top-left corner in canvas coordinates
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

impl MindMapNode {
    /// New node centered on `(cx, cy)`
    pub fn centered_at(cx: f64, cy: f64, color: NodeColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_NODE_TITLE.to_string(),
            content: String::new(),
            color,
            x: cx - NODE_WIDTH / 2.0,
            y: cy - NODE_HEIGHT / 2.0,
            width: NODE_WIDTH,
            height: NODE_HEIGHT,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Euclidean distance between the centers of two nodes
    pub fn distance_to(&self, other: &MindMapNode) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }
}

/// Connection between two nodes. Direction is kept for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: Uuid,
    pub source: Uuid,
    pub target: Uuid,
}

impl Edge {
    pub fn new(source: Uuid, target: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            target,
        }
    }

    /// True if this edge joins `a` and `b` in either direction
    pub fn joins(&self, a: Uuid, b: Uuid) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    pub fn touches(&self, node: Uuid) -> bool {
        self.source == node || self.target == node
    }

    /// The endpoint opposite to `node`
    pub fn other(&self, node: Uuid) -> Option<Uuid> {
        if self.source == node {
            Some(self.target)
        } else if self.target == node {
            Some(self.source)
        } else {
            None
        }
    }
}

/// One mind-map document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMap {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub nodes: Vec<MindMapNode>,
    /// Older documents stored these as "connections"
    #[serde(default, alias = "connections")]
    pub edges: Vec<Edge>,
}

impl MindMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(&self, id: Uuid) -> Option<&MindMapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: Uuid) -> Option<&mut MindMapNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn has_edge_between(&self, a: Uuid, b: Uuid) -> bool {
        self.edges.iter().any(|e| e.joins(a, b))
    }

    /// Edges incident to `node`
    pub fn edges_of(&self, node: Uuid) -> Vec<&Edge> {
        self.edges.iter().filter(|e| e.touches(node)).collect()
    }

    /// Drop edges whose endpoints are missing, self-loops and repeated
    /// pairs. Returns how many were removed.
    pub fn prune_invalid_edges(&mut self) -> usize {
        let before = self.edges.len();
        let node_ids: Vec<Uuid> = self.nodes.iter().map(|n| n.id).collect();
        let mut kept: Vec<Edge> = Vec::with_capacity(before);
        for edge in self.edges.drain(..) {
            let valid = edge.source != edge.target
                && node_ids.contains(&edge.source)
                && node_ids.contains(&edge.target)
                && !kept.iter().any(|k| k.joins(edge.source, edge.target));
            if valid {
                kept.push(edge);
            }
        }
        self.edges = kept;
        before - self.edges.len()
    }
}

/// Partial update of a node's text and color
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<NodeColor>,
}

/// Proximity auto-connect settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoConnect {
    pub enabled: bool,
    pub distance: f64,
}

impl Default for AutoConnect {
    fn default() -> Self {
        Self {
            enabled: true,
            distance: DEFAULT_AUTO_CONNECT_DISTANCE,
        }
    }
}

/// All mind maps plus the current-map and node selection.
///
/// At least one map always exists; node and edge operations act on the
/// current map.
#[derive(Debug, Clone)]
pub struct MindMapStore {
    maps: Vec<MindMap>,
    current_map_id: Uuid,
    selected_node: Option<Uuid>,
    pub node_color: NodeColor,
    pub auto_connect: AutoConnect,
}

impl MindMapStore {
    /// Build the store from loaded maps. Falls back to a default map when
    /// none are given and to the first map when `current` is unknown.
    pub fn new(
        mut maps: Vec<MindMap>,
        current: Option<Uuid>,
        node_color: NodeColor,
        auto_connect: AutoConnect,
    ) -> Self {
        for map in &mut maps {
            let removed = map.prune_invalid_edges();
            if removed > 0 {
                log::warn!("event=mindmap_prune map={} removed_edges={}", map.id, removed);
            }
        }
        if maps.is_empty() {
            maps.push(MindMap::new(DEFAULT_MAP_NAME));
        }
        let current_map_id = current
            .filter(|id| maps.iter().any(|m| m.id == *id))
            .unwrap_or(maps[0].id);

        Self {
            maps,
            current_map_id,
            selected_node: None,
            node_color,
            auto_connect,
        }
    }

    pub fn maps(&self) -> &[MindMap] {
        &self.maps
    }

    pub fn current_map_id(&self) -> Uuid {
        self.current_map_id
    }

    fn current_index(&self) -> usize {
        self.maps
            .iter()
            .position(|m| m.id == self.current_map_id)
            .unwrap_or(0)
    }

    pub fn current_map(&self) -> &MindMap {
        &self.maps[self.current_index()]
    }

    fn current_map_mut(&mut self) -> &mut MindMap {
        let index = self.current_index();
        &mut self.maps[index]
    }

    // ---- node operations ----

    pub fn selected_node_id(&self) -> Option<Uuid> {
        self.selected_node
    }

    pub fn selected_node(&self) -> Option<&MindMapNode> {
        self.selected_node.and_then(|id| self.current_map().node(id))
    }

    /// Select a node of the current map (or clear with `None`)
    pub fn select_node(&mut self, id: Option<Uuid>) -> Result<(), StoreError> {
        if let Some(id) = id {
            if self.current_map().node(id).is_none() {
                return Err(StoreError::NodeNotFound(id));
            }
        }
        self.selected_node = id;
        Ok(())
    }

    /// Move the selection through nodes in insertion order
    pub fn cycle_selection(&mut self, delta: isize) {
        let nodes = &self.current_map().nodes;
        if nodes.is_empty() {
            self.selected_node = None;
            return;
        }
        let len = nodes.len() as isize;
        let next = match self.selected_node.and_then(|id| nodes.iter().position(|n| n.id == id)) {
            Some(idx) => (idx as isize + delta).rem_euclid(len),
            None => 0,
        };
        self.selected_node = Some(nodes[next as usize].id);
    }

    /// Color given to nodes created from now on
    pub fn set_node_color(&mut self, color: NodeColor) {
        self.node_color = color;
    }

    /// Add a node centered on `(x, y)` and select it
    pub fn add_node(&mut self, x: f64, y: f64) -> Uuid {
        let node = MindMapNode::centered_at(x, y, self.node_color);
        let id = node.id;
        self.current_map_mut().nodes.push(node);
        self.selected_node = Some(id);
        if self.auto_connect.enabled {
            // The node was just inserted, so this cannot fail
            let _ = self.auto_connect(id);
        }
        id
    }

    pub fn update_node(&mut self, id: Uuid, patch: NodePatch) -> Result<(), StoreError> {
        let node = self
            .current_map_mut()
            .node_mut(id)
            .ok_or(StoreError::NodeNotFound(id))?;
        if let Some(title) = patch.title {
            node.title = title;
        }
        if let Some(content) = patch.content {
            node.content = content;
        }
        if let Some(color) = patch.color {
            node.color = color;
        }
        Ok(())
    }

    /// Reposition a node; returns edges created by auto-connect
    pub fn move_node(&mut self, id: Uuid, x: f64, y: f64) -> Result<Vec<Uuid>, StoreError> {
        let node = self
            .current_map_mut()
            .node_mut(id)
            .ok_or(StoreError::NodeNotFound(id))?;
        node.x = x;
        node.y = y;
        if self.auto_connect.enabled {
            self.auto_connect(id)
        } else {
            Ok(Vec::new())
        }
    }

    /// Move a node by a relative offset
    pub fn nudge_node(&mut self, id: Uuid, dx: f64, dy: f64) -> Result<Vec<Uuid>, StoreError> {
        let (x, y) = {
            let node = self
                .current_map()
                .node(id)
                .ok_or(StoreError::NodeNotFound(id))?;
            (node.x + dx, node.y + dy)
        };
        self.move_node(id, x, y)
    }

    /// Delete a node and every edge touching it
    pub fn delete_node(&mut self, id: Uuid) -> Result<MindMapNode, StoreError> {
        let map = self.current_map_mut();
        let index = map
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(StoreError::NodeNotFound(id))?;
        let node = map.nodes.remove(index);
        map.edges.retain(|e| !e.touches(id));

        if self.selected_node == Some(id) {
            self.selected_node = None;
        }
        Ok(node)
    }

    // ---- edge operations ----

    /// Connect two nodes of the current map
    pub fn connect(&mut self, source: Uuid, target: Uuid) -> Result<Uuid, StoreError> {
        if source == target {
            return Err(StoreError::SelfLoop);
        }
        let map = self.current_map_mut();
        for id in [source, target] {
            if map.node(id).is_none() {
                return Err(StoreError::NodeNotFound(id));
            }
        }
        if map.has_edge_between(source, target) {
            return Err(StoreError::DuplicateEdge);
        }
        let edge = Edge::new(source, target);
        let id = edge.id;
        map.edges.push(edge);
        Ok(id)
    }

    pub fn disconnect(&mut self, edge_id: Uuid) -> Result<Edge, StoreError> {
        let map = self.current_map_mut();
        let index = map
            .edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or(StoreError::EdgeNotFound(edge_id))?;
        Ok(map.edges.remove(index))
    }

    pub fn edges_of(&self, node: Uuid) -> Vec<&Edge> {
        self.current_map().edges_of(node)
    }

    /// Connect `node_id` to every node whose center lies within the
    /// auto-connect distance, skipping pairs that are already connected
    pub fn auto_connect(&mut self, node_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let threshold = self.auto_connect.distance;
        let map = self.current_map_mut();
        let node = map.node(node_id).ok_or(StoreError::NodeNotFound(node_id))?;

        let neighbours: Vec<Uuid> = map
            .nodes
            .iter()
            .filter(|other| other.id != node_id)
            .filter(|other| node.distance_to(other) <= threshold)
            .map(|other| other.id)
            .filter(|other| !map.has_edge_between(node_id, *other))
            .collect();

        let mut created = Vec::with_capacity(neighbours.len());
        for other in neighbours {
            let edge = Edge::new(node_id, other);
            created.push(edge.id);
            map.edges.push(edge);
        }
        Ok(created)
    }

    // ---- map operations ----

    /// Create a map and make it current
    pub fn create_map(&mut self, name: &str) -> Result<Uuid, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyMapName);
        }
        let map = MindMap::new(name);
        let id = map.id;
        self.maps.push(map);
        self.current_map_id = id;
        self.selected_node = None;
        Ok(id)
    }

    pub fn rename_map(&mut self, id: Uuid, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyMapName);
        }
        let map = self
            .maps
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(StoreError::MapNotFound(id))?;
        map.name = name.to_string();
        Ok(())
    }

    /// Delete a map. Deleting the last map recreates the default one.
    pub fn delete_map(&mut self, id: Uuid) -> Result<MindMap, StoreError> {
        let index = self
            .maps
            .iter()
            .position(|m| m.id == id)
            .ok_or(StoreError::MapNotFound(id))?;
        let removed = self.maps.remove(index);

        if self.maps.is_empty() {
            self.maps.push(MindMap::new(DEFAULT_MAP_NAME));
        }
        if self.current_map_id == id {
            self.current_map_id = self.maps[0].id;
            self.selected_node = None;
        }
        Ok(removed)
    }

    pub fn select_map(&mut self, id: Uuid) -> Result<(), StoreError> {
        if !self.maps.iter().any(|m| m.id == id) {
            return Err(StoreError::MapNotFound(id));
        }
        if self.current_map_id != id {
            self.current_map_id = id;
            self.selected_node = None;
        }
        Ok(())
    }

    /// Switch to the previous/next map (wraps around)
    pub fn cycle_map(&mut self, delta: isize) {
        let len = self.maps.len() as isize;
        let next = (self.current_index() as isize + delta).rem_euclid(len) as usize;
        let id = self.maps[next].id;
        // id comes from the list itself
        let _ = self.select_map(id);
    }
}
