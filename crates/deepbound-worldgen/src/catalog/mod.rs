//! Definition catalog: immutable landform, stratum, province and soil rules.

mod def;
mod registry;

pub use def::{
    ClimateGate, GenDirection, GeologicProvinceDefinition, LandformDefinition, RockGroup,
    RockGroupBudget, RockStratumDefinition, SoilEntry, SoilLayerDefinition, SubLayerPattern,
    SubLayerRule, Thickness,
};
pub(crate) use def::gate_accepts;
pub use registry::{
    CatalogDefinitions, LandformId, ProvinceId, SoilLayerId, StratumId, WorldGenCatalog,
};
