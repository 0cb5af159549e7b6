// src/hydrosphere.rs
//! Динамическая гидросфера: уровень моря из объёма воды
//!
//! Уровень моря выбирается как порядковая статистика высот, поэтому он монотонно
//! растёт вместе с объёмом. Каждое изменение объёма запускает полный пересчёт
//! поверхности от исходной карты, так что серия терраформирований воспроизводима.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::HydrosphereSettings;
use crate::decompose::{DecomposedMap, Layers};
use crate::grid::{Grid, map_cells};
use crate::terrain::TerrainCell;

/// Во что превращается осушенное морское дно
pub const EXPOSED_SEABED: TerrainCell = TerrainCell::Rocky;

/// Уровень моря для карты.
///
/// Без явного `volume` берётся текущий объём карты. Пустой рельеф даёт `0.0`.
#[must_use]
pub fn calculate_sea_level(map: &DecomposedMap, volume: Option<f64>) -> f64 {
    sea_level_for(&map.elevation.data, volume.unwrap_or(map.water_volume))
}

/// Порядковая статистика: высота, ниже которой лежит `round(volume * n)` клеток
#[must_use]
pub fn sea_level_for(elevations: &[f64], volume: f64) -> f64 {
    if elevations.is_empty() {
        return 0.0;
    }

    let mut sorted = elevations.to_vec();
    sorted.sort_by(f64::total_cmp);

    let total = sorted.len();
    let water_tiles = (clamp_volume(volume) * total as f64).round() as usize;

    if water_tiles == 0 {
        sorted[0]
    } else if water_tiles >= total {
        sorted[total - 1]
    } else {
        sorted[water_tiles - 1]
    }
}

/// Объём воды в `[0, 1]`; NaN считается нулём
#[must_use]
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Тип клетки при заданном уровне моря
#[must_use]
pub fn classify_cell(
    base: TerrainCell,
    elevation: f64,
    sea_level: f64,
    settings: &HydrosphereSettings,
) -> TerrainCell {
    if elevation < sea_level {
        let depth = sea_level - elevation;
        return if depth < settings.coast_depth {
            TerrainCell::Coast
        } else if depth < settings.ocean_depth {
            TerrainCell::Ocean
        } else {
            TerrainCell::DeepSea
        };
    }

    let land = if base.is_water_body() {
        EXPOSED_SEABED
    } else {
        base
    };

    // Низкие пустыни и скалы у самой воды становятся побережьем
    if matches!(land, TerrainCell::Desert | TerrainCell::Rocky)
        && elevation < sea_level + settings.coastal_window
    {
        TerrainCell::Coast
    } else {
        land
    }
}

/// Пересчитывает воду и сушу на всей карте по текущему объёму воды.
///
/// Без данных о рельефе карта не меняется, а уровень моря становится `0.0`.
pub fn update_water_bodies(map: &mut DecomposedMap, settings: &HydrosphereSettings) {
    if map.elevation.is_empty() || map.elevation.len() != map.base_terrain.len() {
        warn!("Нет данных о рельефе, пересчёт гидросферы пропущен");
        map.sea_level = 0.0;
        return;
    }

    map.water_volume = clamp_volume(map.water_volume);
    let sea_level = calculate_sea_level(map, None);

    let base = &map.base_terrain.data;
    let elevation = &map.elevation.data;
    let data = map_cells(base.len(), |i| {
        classify_cell(base[i], elevation[i], sea_level, settings)
    });

    let terrain = Grid {
        width: map.base_terrain.width,
        height: map.base_terrain.height,
        data,
    };
    let water = terrain.data.iter().filter(|c| c.is_water_body()).count();

    map.sea_level = sea_level;
    map.water_coverage = water as f64 / terrain.len() as f64;
    map.layers = Layers::split(&terrain);
    map.terrain = terrain;

    debug!(
        "Уровень моря {sea_level:.3} при объёме {:.3}: {water} водных клеток",
        map.water_volume
    );
}

/// Добавляет воду (падение кометы, конденсация атмосферы) и пересчитывает карту
pub fn add_water_volume(map: &mut DecomposedMap, delta: f64, settings: &HydrosphereSettings) {
    change_water_volume(map, delta, settings);
}

/// Убирает воду (испарение, сублимация) и пересчитывает карту
pub fn remove_water_volume(map: &mut DecomposedMap, delta: f64, settings: &HydrosphereSettings) {
    change_water_volume(map, -delta, settings);
}

fn change_water_volume(map: &mut DecomposedMap, delta: f64, settings: &HydrosphereSettings) {
    if delta.is_nan() {
        warn!("Изменение объёма воды NaN проигнорировано");
        return;
    }

    let before = map.water_volume;
    map.water_volume = clamp_volume(before + delta);
    let previous_sea_level = map.sea_level;
    update_water_bodies(map, settings);

    info!(
        "Объём воды {before:.3} → {:.3}, уровень моря {previous_sea_level:.3} → {:.3}",
        map.water_volume, map.sea_level
    );
}

/// Событие терраформирования от внешнего планировщика
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerraformingEvent {
    /// Падение кометы или объекта пояса Койпера
    CometImpact { volume: f64 },
    /// Выпадение атмосферной влаги
    AtmosphericCondensation { volume: f64 },
    Evaporation { volume: f64 },
    Sublimation { volume: f64 },
}

impl TerraformingEvent {
    /// Изменение объёма со знаком
    #[must_use]
    pub fn volume_delta(&self) -> f64 {
        match *self {
            TerraformingEvent::CometImpact { volume }
            | TerraformingEvent::AtmosphericCondensation { volume } => volume,
            TerraformingEvent::Evaporation { volume } | TerraformingEvent::Sublimation { volume } => {
                -volume
            }
        }
    }
}

/// Применяет событие к карте
pub fn apply_event(map: &mut DecomposedMap, event: TerraformingEvent, settings: &HydrosphereSettings) {
    debug!("Событие терраформирования: {event:?}");
    match event {
        TerraformingEvent::CometImpact { volume }
        | TerraformingEvent::AtmosphericCondensation { volume } => {
            add_water_volume(map, volume, settings);
        }
        TerraformingEvent::Evaporation { volume } | TerraformingEvent::Sublimation { volume } => {
            remove_water_volume(map, volume, settings);
        }
    }
}
