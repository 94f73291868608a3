//! Game content identifiers and the tile catalog consumed by world generation.

pub mod resource_id;
pub mod tile;

pub use resource_id::{DEFAULT_NAMESPACE, ResourceId, ResourceIdError};
pub use tile::{TileCatalog, TileCatalogError, TileDef, TileId, TileLookup};
