//! Surface soil compositor: climate-gated soil bands laid over bedrock.

use deepbound_content::TileId;
use rand::Rng;

use crate::catalog::{SoilLayerId, Thickness, WorldGenCatalog, gate_accepts};
use crate::climate::ClimateSample;
use crate::seed::{column_rng, salt};
use crate::tiles::ResolvedTiles;

/// Soil tile covering rows `y_min..=y_max` of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoilBand {
    pub tile: TileId,
    pub y_min: i32,
    pub y_max: i32,
}

impl SoilBand {
    #[inline]
    pub fn contains(&self, y: i32) -> bool {
        (self.y_min..=self.y_max).contains(&y)
    }
}

/// First soil layer, in catalog order, whose gate accepts `climate`.
pub fn select_soil_layer(
    catalog: &WorldGenCatalog,
    climate: &ClimateSample,
) -> Option<SoilLayerId> {
    catalog
        .soil_layers()
        .find(|(_, def)| {
            gate_accepts(
                def.climate.as_ref(),
                f64::from(climate.temperature),
                f64::from(climate.rainfall),
            )
        })
        .map(|(id, _)| id)
}

/// Resolve the soil bands of column `x`, walking down from `surface_y`.
///
/// The surface list applies when the surface is at or above sea level, the
/// underwater list otherwise. Ranged thicknesses are drawn from the
/// column's RNG, so a column always gets the same soil.
pub fn resolve_soil(
    catalog: &WorldGenCatalog,
    tiles: &ResolvedTiles,
    world_seed: u64,
    x: i32,
    surface_y: i32,
    sea_level: i32,
    climate: &ClimateSample,
) -> Vec<SoilBand> {
    if surface_y < 0 {
        return Vec::new();
    }
    let Some(id) = select_soil_layer(catalog, climate) else {
        return Vec::new();
    };
    let def = catalog.soil_layer(id);
    let (surface_tiles, underwater_tiles) = tiles
        .soil
        .get(id.0 as usize)
        .map(|(surface, underwater)| (surface.as_slice(), underwater.as_slice()))
        .unwrap_or_default();
    let (entries, entry_tiles) = if surface_y >= sea_level {
        (def.surface.as_slice(), surface_tiles)
    } else {
        (def.underwater.as_slice(), underwater_tiles)
    };

    let mut rng = column_rng(world_seed, x, salt::SOIL);
    let mut cursor = surface_y;
    let mut bands = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        if cursor < 0 {
            break;
        }
        // Bands never reach below row 0.
        let thickness = draw_thickness(&mut rng, entry.thickness).min(cursor.saturating_add(1));
        if thickness <= 0 {
            continue;
        }
        let tile = entry_tiles.get(index).copied().unwrap_or(TileId::FALLBACK);
        bands.push(SoilBand {
            tile,
            y_min: cursor - thickness + 1,
            y_max: cursor,
        });
        cursor -= thickness;
    }
    bands
}

fn draw_thickness(rng: &mut impl Rng, thickness: Thickness) -> i32 {
    let tiles = if thickness.is_fixed() {
        thickness.min
    } else {
        rng.random_range(thickness.min..=thickness.max)
    };
    i32::try_from(tiles).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClimateGate, SoilEntry, SoilLayerDefinition};
    use deepbound_content::ResourceId;

    fn sample(temperature: f32, rainfall: f32) -> ClimateSample {
        ClimateSample {
            temperature,
            rainfall,
        }
    }

    fn layer(
        code: &str,
        gate: Option<ClimateGate>,
        surface: Vec<SoilEntry>,
    ) -> SoilLayerDefinition {
        SoilLayerDefinition {
            code: code.into(),
            climate: gate,
            surface,
            underwater: vec![SoilEntry::new(
                ResourceId::deepbound("sand"),
                Thickness::fixed(3),
            )],
        }
    }

    fn grass_and_dirt() -> Vec<SoilEntry> {
        vec![
            SoilEntry::new(ResourceId::deepbound("grass"), Thickness::fixed(1)),
            SoilEntry::new(ResourceId::deepbound("dirt"), Thickness::range(2, 5)),
        ]
    }

    fn fixture() -> (WorldGenCatalog, ResolvedTiles) {
        let mut catalog = WorldGenCatalog::new();
        catalog
            .register_soil_layer(layer(
                "tundra",
                Some(ClimateGate::new((-50.0, 0.0), (0.0, 255.0))),
                vec![SoilEntry::new(ResourceId::deepbound("snow"), Thickness::fixed(2))],
            ))
            .unwrap();
        catalog
            .register_soil_layer(layer("temperate", None, grass_and_dirt()))
            .unwrap();
        let tiles = ResolvedTiles {
            water: TileId(2),
            soil: vec![
                (vec![TileId(30)], vec![TileId(33)]),
                (vec![TileId(31), TileId(32)], vec![TileId(33)]),
            ],
            ..ResolvedTiles::default()
        };
        (catalog, tiles)
    }

    #[test]
    fn test_first_match_wins() {
        let (catalog, _) = fixture();
        assert_eq!(
            select_soil_layer(&catalog, &sample(-10.0, 50.0)),
            Some(SoilLayerId(0))
        );
        assert_eq!(
            select_soil_layer(&catalog, &sample(0.0, 50.0)),
            Some(SoilLayerId(0)),
            "gate bounds are inclusive"
        );
        assert_eq!(
            select_soil_layer(&catalog, &sample(15.0, 50.0)),
            Some(SoilLayerId(1))
        );
    }

    #[test]
    fn test_bands_walk_down_from_surface() {
        let (catalog, tiles) = fixture();
        let bands = resolve_soil(&catalog, &tiles, 1337, 5, 500, 440, &sample(15.0, 50.0));
        assert_eq!(bands.len(), 2);
        assert_eq!(bands[0], SoilBand { tile: TileId(31), y_min: 500, y_max: 500 });
        assert_eq!(bands[1].tile, TileId(32));
        assert_eq!(bands[1].y_max, 499);
        let dirt = bands[1].y_max - bands[1].y_min + 1;
        assert!((2..=5).contains(&dirt), "dirt thickness {dirt}");
    }

    #[test]
    fn test_huge_thickness_stops_at_row_zero() {
        let mut catalog = WorldGenCatalog::new();
        catalog
            .register_soil_layer(layer(
                "abyss",
                None,
                vec![
                    SoilEntry::new(ResourceId::deepbound("grass"), Thickness::fixed(u32::MAX)),
                    SoilEntry::new(ResourceId::deepbound("dirt"), Thickness::fixed(u32::MAX)),
                ],
            ))
            .unwrap();
        let tiles = ResolvedTiles {
            soil: vec![(vec![TileId(31), TileId(32)], vec![TileId(33)])],
            ..ResolvedTiles::default()
        };
        let bands = resolve_soil(&catalog, &tiles, 1337, 5, 500, 440, &sample(15.0, 50.0));
        assert_eq!(bands, vec![SoilBand { tile: TileId(31), y_min: 0, y_max: 500 }]);

        let top = resolve_soil(&catalog, &tiles, 1337, 5, i32::MAX, 440, &sample(15.0, 50.0));
        assert_eq!(top[0].y_max, i32::MAX);
        assert_eq!(top.last().map(|band| band.y_min), Some(0));
    }

    #[test]
    fn test_underwater_list_below_sea_level() {
        let (catalog, tiles) = fixture();
        let bands = resolve_soil(&catalog, &tiles, 1337, 5, 300, 440, &sample(15.0, 50.0));
        assert_eq!(bands, vec![SoilBand { tile: TileId(33), y_min: 298, y_max: 300 }]);
    }

    #[test]
    fn test_thickness_is_deterministic_per_column() {
        let (catalog, tiles) = fixture();
        let climate = sample(15.0, 50.0);
        for x in -50..50 {
            assert_eq!(
                resolve_soil(&catalog, &tiles, 9, x, 500, 440, &climate),
                resolve_soil(&catalog, &tiles, 9, x, 500, 440, &climate)
            );
        }
    }

    #[test]
    fn test_no_layers_or_open_column() {
        let (catalog, tiles) = fixture();
        assert!(resolve_soil(&catalog, &tiles, 1, 0, -1, 440, &sample(15.0, 50.0)).is_empty());
        let empty = WorldGenCatalog::new();
        let none = ResolvedTiles::default();
        assert!(resolve_soil(&empty, &none, 1, 0, 500, 440, &sample(15.0, 50.0)).is_empty());
    }
}
