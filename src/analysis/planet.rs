// src/analysis/planet.rs
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Температура замерзания воды, К
pub const FREEZING_POINT_K: f64 = 273.0;

/// Характеристики небесного тела от внешнего каталога.
///
/// Любое поле может отсутствовать: отсутствие означает «нет данных», а не «нет воды».
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanetCharacteristics {
    /// Явный тип тела; `terrestrial_planet` не считается переопределением
    #[serde(rename = "type", default)]
    pub body_type: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub atmosphere: Option<Atmosphere>,
    #[serde(default)]
    pub hydrosphere: Option<HydrosphereData>,
    /// Температура поверхности, К
    #[serde(default)]
    pub surface_temperature: Option<f64>,
    #[serde(default)]
    pub body_category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Atmosphere {
    /// Газ → доля, количество или вложенное описание (`{"percentage": 0.4}`)
    #[serde(default)]
    pub composition: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HydrosphereData {
    #[serde(default)]
    pub water_bodies: WaterBodies,
}

/// Водные тела в любом из форматов каталога: список имён или словарь «имя → объём»
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaterBodies {
    List(Vec<serde_json::Value>),
    Map(BTreeMap<String, serde_json::Value>),
    Other(serde_json::Value),
}

impl Default for WaterBodies {
    fn default() -> Self {
        WaterBodies::List(Vec::new())
    }
}

impl WaterBodies {
    /// Есть ли хотя бы одно водное тело
    #[must_use]
    pub fn any(&self) -> bool {
        match self {
            WaterBodies::List(items) => !items.is_empty(),
            WaterBodies::Map(entries) => !entries.is_empty(),
            WaterBodies::Other(value) => !value.is_null(),
        }
    }
}

/// Категория планеты для выбора стратегии сбора воды
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanetType {
    /// Марсоподобная: ни пара, ни открытой воды
    Arid,
    /// Землеподобная: и пар, и океаны
    Oceanic,
    Temperate,
    IceWorld,
    /// Явно заданный тип, не совпадающий ни с одной категорией
    Unclassified,
}

impl PlanetType {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "arid" => Some(PlanetType::Arid),
            "oceanic" => Some(PlanetType::Oceanic),
            "temperate" => Some(PlanetType::Temperate),
            "ice_world" => Some(PlanetType::IceWorld),
            _ => None,
        }
    }

    /// Классифицирует планету по её свойствам, а не по имени
    #[must_use]
    pub fn classify(characteristics: Option<&PlanetCharacteristics>) -> Self {
        let Some(c) = characteristics else {
            return PlanetType::Temperate;
        };

        if let Some(body_type) = c.body_type.as_deref() {
            if body_type != "terrestrial_planet" {
                return Self::from_name(body_type).unwrap_or(PlanetType::Unclassified);
            }
        }

        let has_water_vapor = c
            .atmosphere
            .as_ref()
            .map(|a| a.composition.contains_key("water_vapor"));
        let has_surface_water = c
            .hydrosphere
            .as_ref()
            .map(|h| h.water_bodies.any());
        let is_very_cold = c.surface_temperature.is_some_and(|t| t < FREEZING_POINT_K);
        let category = c.body_category.as_deref().or(c.body_type.as_deref());

        if category == Some("ice_world") || (is_very_cold && has_surface_water != Some(true)) {
            PlanetType::IceWorld
        } else {
            match (has_water_vapor, has_surface_water) {
                (Some(false), Some(false)) => PlanetType::Arid,
                (Some(true), Some(true)) => PlanetType::Oceanic,
                _ => PlanetType::Temperate,
            }
        }
    }
}
