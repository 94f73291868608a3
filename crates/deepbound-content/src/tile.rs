//! Tile catalog: maps compact [`TileId`] values to [`TileDef`] metadata.
//!
//! The catalog is built once during startup and then shared read-only. Air is
//! always ID 0 so that zero-initialized chunk memory represents empty space,
//! and ID 1 is the hard fallback tile substituted for unresolved references.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resource_id::ResourceId;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored inside every chunk cell (2 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileId(pub u16);

impl TileId {
    /// Empty space.
    pub const AIR: Self = Self(0);
    /// Developer-visible stand-in for tiles that could not be resolved.
    pub const FALLBACK: Self = Self(1);
}

/// Full descriptor for a tile type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TileDef {
    /// Namespaced code, e.g. `deepbound:rock-granite`.
    pub id: ResourceId,
    /// Whether entities collide with this tile.
    pub solid: bool,
    /// Mining hardness.
    pub hardness: f32,
}

impl TileDef {
    /// A solid tile with unit hardness.
    pub fn solid(id: ResourceId) -> Self {
        Self {
            id,
            solid: true,
            hardness: 1.0,
        }
    }

    /// A non-solid tile (air, liquids).
    pub fn open(id: ResourceId) -> Self {
        Self {
            id,
            solid: false,
            hardness: 0.0,
        }
    }
}

/// Errors that can occur during tile registration.
#[derive(Debug, Error)]
pub enum TileCatalogError {
    /// A tile with the same id has already been registered.
    #[error("duplicate tile id: {0}")]
    DuplicateId(ResourceId),
    /// All 65 536 slots have been consumed.
    #[error("tile catalog is full (max 65536 tiles)")]
    CatalogFull,
}

/// Read-only lookup of tiles by namespaced code.
///
/// World generation depends on this trait rather than on [`TileCatalog`]
/// directly, so tests can supply synthetic catalogs.
pub trait TileLookup: Send + Sync {
    /// Returns the tile registered under `id`, or `None` if there is none.
    fn lookup(&self, id: &ResourceId) -> Option<TileId>;
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Maps [`TileId`] → [`TileDef`] with O(1) lookup by index and O(1) reverse
/// lookup by [`ResourceId`].
pub struct TileCatalog {
    /// Dense array where `index == TileId.0`.
    tiles: Vec<TileDef>,
    /// Reverse lookup: code → ID.
    by_code: FxHashMap<ResourceId, TileId>,
}

impl TileCatalog {
    /// Code of the always-present air tile.
    pub const AIR_CODE: &'static str = "air";
    /// Code of the always-present fallback tile.
    pub const FALLBACK_CODE: &'static str = "missing-tile";

    /// Creates a catalog with air (ID 0) and the fallback tile (ID 1) pre-registered.
    pub fn new() -> Self {
        let air = TileDef::open(ResourceId::deepbound(Self::AIR_CODE));
        let fallback = TileDef::solid(ResourceId::deepbound(Self::FALLBACK_CODE));

        let mut by_code = FxHashMap::default();
        by_code.insert(air.id.clone(), TileId::AIR);
        by_code.insert(fallback.id.clone(), TileId::FALLBACK);

        Self {
            tiles: vec![air, fallback],
            by_code,
        }
    }

    /// Registers a new tile and returns its assigned ID.
    ///
    /// IDs are assigned sequentially after the two built-in tiles.
    ///
    /// # Errors
    ///
    /// Returns [`TileCatalogError::DuplicateId`] if the code is taken, or
    /// [`TileCatalogError::CatalogFull`] once all slots are used.
    pub fn register(&mut self, def: TileDef) -> Result<TileId, TileCatalogError> {
        if self.by_code.contains_key(&def.id) {
            return Err(TileCatalogError::DuplicateId(def.id));
        }
        if self.tiles.len() > u16::MAX as usize {
            return Err(TileCatalogError::CatalogFull);
        }

        let id = TileId(self.tiles.len() as u16);
        self.by_code.insert(def.id.clone(), id);
        self.tiles.push(def);
        Ok(id)
    }

    /// Returns the definition for a given ID, or `None` if out of range.
    pub fn get(&self, id: TileId) -> Option<&TileDef> {
        self.tiles.get(id.0 as usize)
    }

    /// Returns the total number of registered tiles (including the built-ins).
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns `true` if only the built-in tiles are registered.
    pub fn is_empty(&self) -> bool {
        self.tiles.len() <= 2
    }

    /// Returns `true` if the tile blocks movement. Unknown IDs count as open.
    pub fn is_solid(&self, id: TileId) -> bool {
        self.get(id).is_some_and(|def| def.solid)
    }

    /// Iterates every registered tile in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (TileId, &TileDef)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, def)| (TileId(index as u16), def))
    }
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TileLookup for TileCatalog {
    fn lookup(&self, id: &ResourceId) -> Option<TileId> {
        self.by_code.get(id).copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
