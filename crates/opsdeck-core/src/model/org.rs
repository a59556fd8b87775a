// ── Stores and regions ──

use serde::Serialize;

use super::EntityId;

/// A physical store location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Store {
    pub id: EntityId,
    pub name: String,
    pub region_id: Option<EntityId>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub enabled: bool,
}

/// A sales region grouping stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub id: EntityId,
    pub name: String,
    pub code: Option<String>,
}
