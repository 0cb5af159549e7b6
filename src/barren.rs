// src/barren.rs
//! Обратное терраформирование
//!
//! Превращает «живую» карту в безжизненную исходную поверхность планеты,
//! с которой начинается игра: вода уходит в котловины или лёд,
//! растительность — в пустыню и скалы. Таблица замен зависит от типа планеты.

use std::collections::BTreeMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::{HydrosphereAnalyzer, HydrosphereReport, PlanetCharacteristics, PlanetType};
use crate::config::AnalyzerSettings;
use crate::strategic::{MarkerKind, StrategicMarker};
use crate::terrain::{TerrainCell, TerrainGrid};

/// Безжизненная карта и всё, что о ней известно
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrenTerrain {
    pub width: usize,
    pub height: usize,
    pub planet_type: PlanetType,
    pub terrain: TerrainGrid,
    pub biome_counts: BTreeMap<String, usize>,
    pub original_biome_counts: BTreeMap<String, usize>,
    pub strategic_markers: Vec<StrategicMarker>,
    pub hydrosphere_analysis: HydrosphereReport,
}

/// Во что превращается клетка при обратном терраформировании
#[must_use]
pub fn reverse_terraform(cell: TerrainCell, planet_type: PlanetType) -> TerrainCell {
    use TerrainCell::{
        Arctic, BorealForest, DeepSea, Desert, Forest, Grasslands, Jungle, Ocean, Plains, Rocky,
        Swamp, Tundra,
    };

    match planet_type {
        PlanetType::Arid => match cell {
            Ocean | DeepSea | Tundra => Arctic,
            Grasslands | Plains | Swamp => Desert,
            Forest | Jungle | BorealForest => Rocky,
            other => other,
        },
        PlanetType::IceWorld => match cell {
            Ocean | DeepSea | Forest | Jungle | Swamp | BorealForest | Tundra => Arctic,
            Grasslands | Plains | Desert => Tundra,
            other => other,
        },
        PlanetType::Oceanic | PlanetType::Temperate | PlanetType::Unclassified => match cell {
            Ocean => DeepSea,
            DeepSea | Forest => Rocky,
            Grasslands | Plains => Desert,
            Jungle => Swamp,
            BorealForest => Tundra,
            other => other,
        },
    }
}

/// Клетки, которые на безжизненной планете становятся месторождениями
fn resource_sources(planet_type: PlanetType) -> &'static [TerrainCell] {
    match planet_type {
        PlanetType::IceWorld => &[TerrainCell::Arctic, TerrainCell::Tundra],
        PlanetType::Arid => &[TerrainCell::Arctic, TerrainCell::Rocky],
        PlanetType::Oceanic => &[TerrainCell::Rocky],
        PlanetType::Temperate => &[TerrainCell::Tundra, TerrainCell::Rocky],
        PlanetType::Unclassified => &[TerrainCell::Arctic, TerrainCell::Tundra, TerrainCell::DeepSea],
    }
}

fn is_permanent_landmass(cell: TerrainCell) -> bool {
    matches!(cell, TerrainCell::BorealForest | TerrainCell::Rocky)
}

fn keeps_surface_water(planet_type: PlanetType) -> bool {
    matches!(
        planet_type,
        PlanetType::Oceanic | PlanetType::Temperate | PlanetType::Unclassified
    )
}

fn count_cells(grid: &TerrainGrid) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for cell in &grid.data {
        *counts.entry(cell.tag().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Строит безжизненную карту с порогами анализатора по умолчанию.
///
/// Пустая сетка даёт `None`.
#[must_use]
pub fn generate_barren_terrain(
    grid: &TerrainGrid,
    planet: Option<&PlanetCharacteristics>,
) -> Option<BarrenTerrain> {
    generate_barren_terrain_with(grid, planet, &AnalyzerSettings::default())
}

#[must_use]
pub fn generate_barren_terrain_with(
    grid: &TerrainGrid,
    planet: Option<&PlanetCharacteristics>,
    settings: &AnalyzerSettings,
) -> Option<BarrenTerrain> {
    if grid.is_empty() {
        warn!("Пустая сетка: обратное терраформирование невозможно");
        return None;
    }

    let planet_type = PlanetType::classify(planet);
    let sources = resource_sources(planet_type);
    let mut strategic_markers = Vec::new();

    let barren = grid.map(|&cell| reverse_terraform(cell, planet_type));

    for y in 0..grid.height {
        for x in 0..grid.width {
            let idx = grid.index(x, y);
            let original = grid.data[idx];
            let reduced = barren.data[idx];

            if is_permanent_landmass(original) {
                strategic_markers.push(StrategicMarker::new(MarkerKind::PermanentLandmass, x, y));
            }
            if sources.contains(&reduced) {
                strategic_markers.push(StrategicMarker::new(MarkerKind::ResourceNode, x, y));
            }
            if keeps_surface_water(planet_type) && original.is_open_water() {
                strategic_markers.push(StrategicMarker::new(MarkerKind::WaterCollectionZone, x, y));
            }
        }
    }

    let hydrosphere_analysis = HydrosphereAnalyzer::new(settings.clone()).analyze(&barren, planet);

    info!(
        "🏜️ Обратное терраформирование ({planet_type:?}): {}×{}, {} стратегических точек",
        grid.width,
        grid.height,
        strategic_markers.len()
    );

    Some(BarrenTerrain {
        width: grid.width,
        height: grid.height,
        planet_type,
        biome_counts: count_cells(&barren),
        original_biome_counts: count_cells(grid),
        terrain: barren,
        strategic_markers,
        hydrosphere_analysis,
    })
}
