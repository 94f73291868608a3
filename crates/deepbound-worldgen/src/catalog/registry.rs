//! Append-only arenas of generation definitions with typed ids.

use deepbound_content::ResourceId;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::def::{
    GeologicProvinceDefinition, LandformDefinition, RockStratumDefinition, SoilEntry,
    SoilLayerDefinition,
};
use crate::error::CatalogError;

/// Index of a landform in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LandformId(pub u16);

/// Index of a rock stratum in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StratumId(pub u16);

/// Index of a geologic province in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProvinceId(pub u16);

/// Index of a soil layer in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SoilLayerId(pub u16);

/// Every definition list in one serializable document, in catalog order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDefinitions {
    pub landforms: Vec<LandformDefinition>,
    pub strata: Vec<RockStratumDefinition>,
    pub provinces: Vec<GeologicProvinceDefinition>,
    pub soil_layers: Vec<SoilLayerDefinition>,
}

/// All generation definitions, populated once at load time.
///
/// Ids are handed out in registration order, which is also the order every
/// "catalog order" rule iterates in.
#[derive(Clone, Debug, Default)]
pub struct WorldGenCatalog {
    landforms: Vec<LandformDefinition>,
    strata: Vec<RockStratumDefinition>,
    provinces: Vec<GeologicProvinceDefinition>,
    soil_layers: Vec<SoilLayerDefinition>,
    landform_codes: HashMap<String, LandformId>,
    stratum_codes: HashMap<ResourceId, StratumId>,
    province_codes: HashMap<String, ProvinceId>,
    soil_codes: HashMap<String, SoilLayerId>,
}

impl WorldGenCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every definition of `definitions`, stopping at the first error.
    pub fn from_definitions(definitions: CatalogDefinitions) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for landform in definitions.landforms {
            catalog.register_landform(landform)?;
        }
        for stratum in definitions.strata {
            catalog.register_stratum(stratum)?;
        }
        for province in definitions.provinces {
            catalog.register_province(province)?;
        }
        for soil in definitions.soil_layers {
            catalog.register_soil_layer(soil)?;
        }
        Ok(catalog)
    }

    /// Registers a landform.
    ///
    /// # Errors
    ///
    /// Duplicate code, negative or non-finite weight, non-finite octave
    /// values or more thresholds than amplitudes.
    pub fn register_landform(
        &mut self,
        def: LandformDefinition,
    ) -> Result<LandformId, CatalogError> {
        const KIND: &str = "landform";
        if self.landform_codes.contains_key(&def.code) {
            return Err(duplicate(KIND, &def.code));
        }
        check_weight(KIND, &def.code, def.weight)?;
        check_octaves(&def.code, &def.terrain_octaves, &def.octave_thresholds)?;

        let id = LandformId(next_index(KIND, self.landforms.len())?);
        self.landform_codes.insert(def.code.clone(), id);
        self.landforms.push(def);
        Ok(id)
    }

    /// Registers a rock stratum. Its block code must be unique among strata.
    pub fn register_stratum(
        &mut self,
        def: RockStratumDefinition,
    ) -> Result<StratumId, CatalogError> {
        const KIND: &str = "stratum";
        let code = def.block.to_string();
        if self.stratum_codes.contains_key(&def.block) {
            return Err(duplicate(KIND, &code));
        }
        check_octaves(&code, &def.amplitudes, &def.thresholds)?;
        if def.frequencies.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(CatalogError::InvalidValue {
                code,
                field: "frequencies",
            });
        }

        let id = StratumId(next_index(KIND, self.strata.len())?);
        self.stratum_codes.insert(def.block.clone(), id);
        self.strata.push(def);
        Ok(id)
    }

    /// Registers a geologic province.
    pub fn register_province(
        &mut self,
        def: GeologicProvinceDefinition,
    ) -> Result<ProvinceId, CatalogError> {
        const KIND: &str = "province";
        if self.province_codes.contains_key(&def.code) {
            return Err(duplicate(KIND, &def.code));
        }
        check_weight(KIND, &def.code, def.weight)?;
        if def.thickness.0.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(CatalogError::InvalidValue {
                code: def.code,
                field: "thickness",
            });
        }
        if def
            .sub_layers
            .iter()
            .any(|rule| !rule.frequency.is_finite() || !rule.threshold.is_finite())
        {
            return Err(CatalogError::InvalidValue {
                code: def.code,
                field: "sub_layers",
            });
        }

        let id = ProvinceId(next_index(KIND, self.provinces.len())?);
        self.province_codes.insert(def.code.clone(), id);
        self.provinces.push(def);
        Ok(id)
    }

    /// Registers a soil layer.
    pub fn register_soil_layer(
        &mut self,
        def: SoilLayerDefinition,
    ) -> Result<SoilLayerId, CatalogError> {
        const KIND: &str = "soil layer";
        if self.soil_codes.contains_key(&def.code) {
            return Err(duplicate(KIND, &def.code));
        }
        let bad_range = def
            .surface
            .iter()
            .chain(&def.underwater)
            .map(|entry: &SoilEntry| entry.thickness)
            .find(|thickness| thickness.min > thickness.max);
        if let Some(thickness) = bad_range {
            return Err(CatalogError::InvalidThickness {
                code: def.code,
                min: thickness.min,
                max: thickness.max,
            });
        }

        let id = SoilLayerId(next_index(KIND, self.soil_layers.len())?);
        self.soil_codes.insert(def.code.clone(), id);
        self.soil_layers.push(def);
        Ok(id)
    }

    /// # Panics
    ///
    /// Panics if `id` did not come from this catalog.
    pub fn landform(&self, id: LandformId) -> &LandformDefinition {
        &self.landforms[id.0 as usize]
    }

    pub fn stratum(&self, id: StratumId) -> &RockStratumDefinition {
        &self.strata[id.0 as usize]
    }

    pub fn province(&self, id: ProvinceId) -> &GeologicProvinceDefinition {
        &self.provinces[id.0 as usize]
    }

    pub fn soil_layer(&self, id: SoilLayerId) -> &SoilLayerDefinition {
        &self.soil_layers[id.0 as usize]
    }

    pub fn landforms(&self) -> impl Iterator<Item = (LandformId, &LandformDefinition)> {
        self.landforms
            .iter()
            .enumerate()
            .map(|(i, def)| (LandformId(i as u16), def))
    }

    pub fn strata(&self) -> impl Iterator<Item = (StratumId, &RockStratumDefinition)> {
        self.strata
            .iter()
            .enumerate()
            .map(|(i, def)| (StratumId(i as u16), def))
    }

    pub fn provinces(&self) -> impl Iterator<Item = (ProvinceId, &GeologicProvinceDefinition)> {
        self.provinces
            .iter()
            .enumerate()
            .map(|(i, def)| (ProvinceId(i as u16), def))
    }

    pub fn soil_layers(&self) -> impl Iterator<Item = (SoilLayerId, &SoilLayerDefinition)> {
        self.soil_layers
            .iter()
            .enumerate()
            .map(|(i, def)| (SoilLayerId(i as u16), def))
    }

    pub fn landform_by_code(&self, code: &str) -> Option<LandformId> {
        self.landform_codes.get(code).copied()
    }

    pub fn stratum_by_block(&self, block: &ResourceId) -> Option<StratumId> {
        self.stratum_codes.get(block).copied()
    }

    pub fn province_by_code(&self, code: &str) -> Option<ProvinceId> {
        self.province_codes.get(code).copied()
    }

    pub fn soil_layer_by_code(&self, code: &str) -> Option<SoilLayerId> {
        self.soil_codes.get(code).copied()
    }

    pub fn landform_count(&self) -> usize {
        self.landforms.len()
    }

    pub fn stratum_count(&self) -> usize {
        self.strata.len()
    }

    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }

    pub fn soil_layer_count(&self) -> usize {
        self.soil_layers.len()
    }

    /// Every tile code referenced by any definition, in catalog order.
    pub fn referenced_tiles(&self) -> impl Iterator<Item = &ResourceId> {
        let strata = self.strata.iter().map(|s| &s.block);
        let sub_layers = self
            .provinces
            .iter()
            .flat_map(|p| p.sub_layers.iter().map(|rule| &rule.tile));
        let soil = self
            .soil_layers
            .iter()
            .flat_map(|s| s.surface.iter().chain(&s.underwater).map(|e| &e.tile));
        strata.chain(sub_layers).chain(soil)
    }
}

fn duplicate(kind: &'static str, code: &str) -> CatalogError {
    CatalogError::DuplicateCode {
        kind,
        code: code.to_string(),
    }
}

fn check_weight(kind: &'static str, code: &str, weight: f64) -> Result<(), CatalogError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidWeight {
            kind,
            code: code.to_string(),
            weight,
        })
    }
}

fn check_octaves(code: &str, amplitudes: &[f64], thresholds: &[f64]) -> Result<(), CatalogError> {
    if thresholds.len() > amplitudes.len() {
        return Err(CatalogError::ThresholdsExceedAmplitudes {
            code: code.to_string(),
            thresholds: thresholds.len(),
            amplitudes: amplitudes.len(),
        });
    }
    if amplitudes.iter().chain(thresholds).any(|v| !v.is_finite()) {
        return Err(CatalogError::InvalidValue {
            code: code.to_string(),
            field: "octaves",
        });
    }
    Ok(())
}

fn next_index(kind: &'static str, len: usize) -> Result<u16, CatalogError> {
    u16::try_from(len).map_err(|_| CatalogError::TooManyEntries { kind })
}
