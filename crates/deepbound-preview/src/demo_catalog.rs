//! Definition and tile catalogs for the preview.
//!
//! A `catalog.ron` next to `config.ron` replaces the built-in definitions.

use std::path::Path;

use deepbound_content::{ResourceId, TileCatalog, TileDef, TileLookup};
use deepbound_worldgen::{
    CatalogDefinitions, CatalogError, ClimateGate, GenDirection, GeologicProvinceDefinition,
    LandformDefinition, RockGroup, RockGroupBudget, RockStratumDefinition, SoilEntry,
    SoilLayerDefinition, SplineError, SubLayerPattern, SubLayerRule, TerrainSpline, Thickness,
    WATER_CODE, WorldGenCatalog,
};

/// File name of the optional definition override.
pub const CATALOG_FILE: &str = "catalog.ron";

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("failed to read {CATALOG_FILE}: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to parse {CATALOG_FILE}: {0}")]
    Parse(#[source] ron::error::SpannedError),
    #[error("invalid definitions: {0}")]
    Invalid(#[from] CatalogError),
}

/// Load `catalog.ron` from `config_dir`, or the built-in definitions when
/// there is none.
pub fn load_catalog(config_dir: &Path) -> Result<WorldGenCatalog, CatalogLoadError> {
    let path = config_dir.join(CATALOG_FILE);
    let definitions = if path.exists() {
        let contents = std::fs::read_to_string(&path).map_err(CatalogLoadError::Read)?;
        let definitions: CatalogDefinitions =
            ron::from_str(&contents).map_err(CatalogLoadError::Parse)?;
        tracing::info!("Loaded world definitions from {}", path.display());
        definitions
    } else {
        demo_definitions().map_err(CatalogError::from)?
    };
    Ok(WorldGenCatalog::from_definitions(definitions)?)
}

/// Tile catalog holding water and every tile `catalog` references.
pub fn tile_catalog_for(catalog: &WorldGenCatalog) -> TileCatalog {
    let mut tiles = TileCatalog::new();
    let water = ResourceId::deepbound(WATER_CODE);
    let codes = std::iter::once(&water).chain(catalog.referenced_tiles());
    for code in codes {
        if tiles.lookup(code).is_some() {
            continue;
        }
        let def = if *code == water {
            TileDef::open(code.clone())
        } else {
            TileDef::solid(code.clone())
        };
        if let Err(e) = tiles.register(def) {
            tracing::warn!("Skipping tile {code}: {e}");
        }
    }
    tiles
}

fn id(path: &str) -> ResourceId {
    ResourceId::deepbound(path)
}

fn landform(
    code: &str,
    weight: f64,
    climate: Option<ClimateGate>,
    octaves: &[f64],
    spline: &[(f64, f64)],
) -> Result<LandformDefinition, SplineError> {
    Ok(LandformDefinition {
        code: code.into(),
        weight,
        climate,
        terrain_octaves: octaves.to_vec(),
        octave_thresholds: vec![0.0; octaves.len()],
        y_keys: TerrainSpline::from_points(spline)?,
    })
}

fn stratum(
    block: &str,
    group: RockGroup,
    direction: GenDirection,
    amplitudes: &[f64],
    frequencies: &[f64],
) -> RockStratumDefinition {
    RockStratumDefinition {
        block: id(block),
        group,
        amplitudes: amplitudes.to_vec(),
        thresholds: vec![0.0; amplitudes.len()],
        frequencies: frequencies.to_vec(),
        direction,
    }
}

fn sub_layer(tile: &str, pattern: SubLayerPattern, frequency: f64, threshold: f64) -> SubLayerRule {
    SubLayerRule {
        tile: id(tile),
        pattern,
        frequency,
        threshold,
    }
}

/// Built-in world: four landforms, five strata, three provinces and three
/// soil layers.
pub fn demo_definitions() -> Result<CatalogDefinitions, SplineError> {
    let landforms = vec![
        landform("plains", 3.0, None, &[0.6, 0.3], &[(0.0, 0.45), (1.0, 0.48)])?,
        landform(
            "hills",
            2.0,
            Some(ClimateGate::new((-30.0, 35.0), (40.0, 255.0))),
            &[1.0, 0.6, 0.3, 0.15],
            &[(0.0, 0.46), (0.5, 0.52), (1.0, 0.55)],
        )?,
        landform(
            "mountains",
            1.0,
            Some(ClimateGate::new((-50.0, 10.0), (0.0, 255.0))),
            &[1.5, 1.0, 0.6, 0.3, 0.15],
            &[(0.0, 0.50), (0.4, 0.58), (1.0, 0.66)],
        )?,
        landform(
            "ocean",
            1.0,
            Some(ClimateGate::new((-10.0, 50.0), (120.0, 255.0))),
            &[0.4],
            &[(0.0, 0.36), (1.0, 0.40)],
        )?,
    ];

    let strata = vec![
        stratum(
            "rock-bedrock",
            RockGroup::Metamorphic,
            GenDirection::BottomUp,
            &[1.0, 0.5],
            &[0.01, 0.02],
        ),
        stratum(
            "rock-basalt",
            RockGroup::Volcanic,
            GenDirection::BottomUp,
            &[2.0, 0.5],
            &[0.004, 0.02],
        ),
        stratum(
            "rock-granite",
            RockGroup::Igneous,
            GenDirection::BottomUp,
            &[3.0, 1.0],
            &[0.003, 0.015],
        ),
        stratum(
            "rock-limestone",
            RockGroup::Sedimentary,
            GenDirection::TopDown,
            &[1.5, 0.5],
            &[0.008, 0.03],
        ),
        stratum(
            "rock-sandstone",
            RockGroup::Sedimentary,
            GenDirection::TopDown,
            &[1.0, 0.5],
            &[0.01, 0.04],
        ),
    ];

    let provinces = vec![
        GeologicProvinceDefinition {
            code: "craton".into(),
            weight: 2.0,
            thickness: RockGroupBudget::default()
                .with(RockGroup::Metamorphic, 10.0)
                .with(RockGroup::Igneous, 40.0)
                .with(RockGroup::Sedimentary, 8.0),
            sub_layers: vec![
                sub_layer("ore-iron", SubLayerPattern::Blob, 0.06, 0.55),
                sub_layer("ore-gold", SubLayerPattern::Vein, 0.03, 0.97),
            ],
        },
        GeologicProvinceDefinition {
            code: "basin".into(),
            weight: 2.0,
            thickness: RockGroupBudget::default()
                .with(RockGroup::Metamorphic, 6.0)
                .with(RockGroup::Igneous, 10.0)
                .with(RockGroup::Sedimentary, 40.0),
            sub_layers: vec![
                sub_layer("ore-coal", SubLayerPattern::Band, 0.04, 0.6),
                sub_layer("soil-clay", SubLayerPattern::Crust, 0.05, 0.2),
            ],
        },
        GeologicProvinceDefinition {
            code: "arc".into(),
            weight: 1.0,
            thickness: RockGroupBudget::default()
                .with(RockGroup::Metamorphic, 6.0)
                .with(RockGroup::Volcanic, 30.0)
                .with(RockGroup::Igneous, 15.0),
            sub_layers: vec![sub_layer("rock-obsidian", SubLayerPattern::Intrusion, 0.05, 0.7)],
        },
    ];

    let soil_layers = vec![
        SoilLayerDefinition {
            code: "tundra".into(),
            climate: Some(ClimateGate::new((-50.0, -15.0), (0.0, 255.0))),
            surface: vec![
                SoilEntry::new(id("soil-snow"), Thickness::range(1, 3)),
                SoilEntry::new(id("soil-gravel"), Thickness::range(1, 2)),
            ],
            underwater: vec![SoilEntry::new(id("soil-gravel"), Thickness::fixed(2))],
        },
        SoilLayerDefinition {
            code: "desert".into(),
            climate: Some(ClimateGate::new((25.0, 50.0), (0.0, 60.0))),
            surface: vec![SoilEntry::new(id("soil-sand"), Thickness::range(3, 6))],
            underwater: vec![SoilEntry::new(id("soil-sand"), Thickness::fixed(3))],
        },
        SoilLayerDefinition {
            code: "temperate".into(),
            climate: None,
            surface: vec![
                SoilEntry::new(id("soil-grass"), Thickness::fixed(1)),
                SoilEntry::new(id("soil-dirt"), Thickness::range(2, 5)),
            ],
            underwater: vec![SoilEntry::new(id("soil-sand"), Thickness::range(2, 4))],
        },
    ];

    Ok(CatalogDefinitions {
        landforms,
        strata,
        provinces,
        soil_layers,
    })
}
