//! Resolution of configured tile codes into [`TileId`]s.
//!
//! Done once when the generator is built so chunk assembly never formats or
//! hashes resource ids. Unknown codes become [`TileId::FALLBACK`].

use deepbound_content::{ResourceId, TileId, TileLookup};
use hashbrown::HashSet;

use crate::catalog::WorldGenCatalog;
use crate::error::GenerationIssue;

/// Code of the liquid placed in open cells below sea level.
pub const WATER_CODE: &str = "water";

/// Every tile a generator can place, resolved against a tile catalog.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedTiles {
    pub water: TileId,
    /// Indexed by `StratumId`.
    pub strata: Vec<TileId>,
    /// Indexed by `ProvinceId`, then by rule.
    pub sub_layers: Vec<Vec<TileId>>,
    /// Indexed by `SoilLayerId`: surface entries, then underwater entries.
    pub soil: Vec<(Vec<TileId>, Vec<TileId>)>,
}

impl ResolvedTiles {
    /// Resolve every tile referenced by `catalog`.
    ///
    /// Each distinct unresolved code is logged once and reported once.
    pub fn resolve(
        catalog: &WorldGenCatalog,
        lookup: &dyn TileLookup,
    ) -> (Self, Vec<GenerationIssue>) {
        let mut resolver = Resolver {
            lookup,
            reported: HashSet::new(),
            issues: Vec::new(),
        };

        let water = resolver.resolve(&ResourceId::deepbound(WATER_CODE));
        let strata = catalog
            .strata()
            .map(|(_, def)| resolver.resolve(&def.block))
            .collect();
        let sub_layers = catalog
            .provinces()
            .map(|(_, def)| {
                def.sub_layers
                    .iter()
                    .map(|rule| resolver.resolve(&rule.tile))
                    .collect()
            })
            .collect();
        let soil = catalog
            .soil_layers()
            .map(|(_, def)| {
                let surface = def.surface.iter().map(|e| resolver.resolve(&e.tile)).collect();
                let underwater = def
                    .underwater
                    .iter()
                    .map(|e| resolver.resolve(&e.tile))
                    .collect();
                (surface, underwater)
            })
            .collect();

        let tiles = Self {
            water,
            strata,
            sub_layers,
            soil,
        };
        (tiles, resolver.issues)
    }
}

struct Resolver<'a> {
    lookup: &'a dyn TileLookup,
    reported: HashSet<ResourceId>,
    issues: Vec<GenerationIssue>,
}

impl Resolver<'_> {
    fn resolve(&mut self, code: &ResourceId) -> TileId {
        if let Some(tile) = self.lookup.lookup(code) {
            return tile;
        }
        if self.reported.insert(code.clone()) {
            tracing::warn!("Unresolved tile reference {code}, substituting the fallback tile");
            self.issues
                .push(GenerationIssue::UnresolvedTileReference(code.clone()));
        }
        TileId::FALLBACK
    }
}
