use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the in-memory stores. A failed operation leaves the
/// store unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("map name cannot be empty")]
    EmptyMapName,

    #[error("event {0} not found")]
    EventNotFound(Uuid),

    #[error("node {0} not found")]
    NodeNotFound(Uuid),

    #[error("map {0} not found")]
    MapNotFound(Uuid),

    #[error("connection {0} not found")]
    EdgeNotFound(Uuid),

    #[error("a node cannot be connected to itself")]
    SelfLoop,

    #[error("these nodes are already connected")]
    DuplicateEdge,

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}
