// src/decompose.rs
//! Разложение плоской карты местности на слои
//!
//! Сырая сетка тегов превращается в [`DecomposedMap`]: синтезированный рельеф,
//! три независимых слоя (геология, гидрология, биология), начальный объём воды
//! и уровень моря, пересчитанный сервисом гидросферы.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::HydrosphereSettings;
use crate::elevation::{ElevationGrid, synthesize_elevation};
use crate::grid::Grid;
use crate::hydrosphere::update_water_bodies;
use crate::terrain::{FALLBACK_CELL, Layer, LayerGrid, RawTerrain, TerrainCell, TerrainGrid};

/// Три слоя разложения; каждая клетка заполнена ровно в одном из них
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layers {
    pub geological: LayerGrid,
    pub hydrological: LayerGrid,
    pub biological: LayerGrid,
}

impl Layers {
    /// Раскладывает сетку местности по слоям
    #[must_use]
    pub fn split(terrain: &TerrainGrid) -> Self {
        let pick = |layer: Layer| terrain.map(|&cell| (cell.layer() == layer).then_some(cell));
        Self {
            geological: pick(Layer::Geological),
            hydrological: pick(Layer::Hydrological),
            biological: pick(Layer::Biological),
        }
    }

    #[must_use]
    pub fn get(&self, layer: Layer) -> &LayerGrid {
        match layer {
            Layer::Geological => &self.geological,
            Layer::Hydrological => &self.hydrological,
            Layer::Biological => &self.biological,
        }
    }

    /// Тип клетки из того слоя, в котором она заполнена
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<TerrainCell> {
        [&self.geological, &self.hydrological, &self.biological]
            .into_iter()
            .find_map(|grid| grid.get(x, y).copied().flatten())
    }

    /// Собирает слои обратно в одну сетку; пустые во всех слоях клетки становятся `rocky`
    #[must_use]
    pub fn compose(&self, width: usize, height: usize) -> TerrainGrid {
        let mut missing = 0usize;
        let data = (0..width * height)
            .map(|i| {
                self.cell(i % width, i / width).unwrap_or_else(|| {
                    missing += 1;
                    FALLBACK_CELL
                })
            })
            .collect();
        if missing > 0 {
            warn!("{missing} клеток отсутствуют во всех слоях и считаются rocky");
        }
        Grid {
            width,
            height,
            data,
        }
    }
}

/// Разложенная карта планеты
///
/// Создаётся один раз из сырой сетки и затем пересчитывается целиком при каждом
/// изменении объёма воды. Сохранённая карта без `terrain`/`base_terrain`
/// восстанавливает обе поверхности из слоёв.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredMap")]
pub struct DecomposedMap {
    pub width: usize,
    pub height: usize,
    pub elevation: ElevationGrid,
    /// Доля клеток, которая должна оказаться под водой, в `[0, 1]`
    pub water_volume: f64,
    pub layers: Layers,
    pub biome_counts: BTreeMap<String, usize>,
    /// Производное: порог высоты, ниже которого клетки затоплены
    pub sea_level: f64,
    /// Производное: доля клеток `ocean`, `deep_sea` и `coast`
    pub water_coverage: f64,
    /// Текущая поверхность после пересчёта гидросферы
    pub terrain: TerrainGrid,
    /// Поверхность до первого пересчёта гидросферы
    pub base_terrain: TerrainGrid,
}

/// Карта в том виде, в каком её сохраняют внешние хранилища
#[derive(Deserialize)]
struct StoredMap {
    #[serde(default)]
    width: usize,
    #[serde(default)]
    height: usize,
    #[serde(default)]
    elevation: ElevationGrid,
    #[serde(default)]
    water_volume: f64,
    #[serde(default)]
    layers: Layers,
    #[serde(default)]
    biome_counts: BTreeMap<String, usize>,
    #[serde(default)]
    sea_level: f64,
    #[serde(default)]
    water_coverage: f64,
    #[serde(default)]
    terrain: TerrainGrid,
    #[serde(default)]
    base_terrain: TerrainGrid,
}

impl From<StoredMap> for DecomposedMap {
    fn from(stored: StoredMap) -> Self {
        let total = stored.width * stored.height;
        let terrain = if stored.terrain.len() == total {
            stored.terrain
        } else {
            stored.layers.compose(stored.width, stored.height)
        };
        let base_terrain = if stored.base_terrain.len() == total {
            stored.base_terrain
        } else {
            terrain.clone()
        };

        Self {
            width: stored.width,
            height: stored.height,
            elevation: stored.elevation,
            water_volume: stored.water_volume,
            layers: stored.layers,
            biome_counts: stored.biome_counts,
            sea_level: stored.sea_level,
            water_coverage: stored.water_coverage,
            terrain,
            base_terrain,
        }
    }
}

impl DecomposedMap {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[must_use]
    pub fn total_tiles(&self) -> usize {
        self.width * self.height
    }
}

/// Раскладывает сырую карту с внешним генератором случайных чисел.
///
/// Пустая сетка или нулевые размеры дают пустую карту без ошибки.
pub fn decompose<R: Rng + ?Sized>(
    raw: &RawTerrain,
    rng: &mut R,
    settings: &HydrosphereSettings,
) -> DecomposedMap {
    let (width, height) = raw.dimensions();
    if width == 0 || height == 0 {
        warn!("Пустая карта: разложение пропущено");
        return DecomposedMap::default();
    }
    if raw.grid.iter().any(|row| row.len() != width) {
        warn!("Строки карты разной длины, недостающие клетки считаются неизвестными");
    }

    let elevation = synthesize_elevation(raw, rng);
    let base_terrain = raw.to_terrain_grid();
    let layers = Layers::split(&base_terrain);

    let total = width * height;
    let water_cells = layers
        .hydrological
        .data
        .iter()
        .flatten()
        .filter(|cell| cell.holds_water())
        .count();
    let water_volume = water_cells as f64 / total as f64;

    let biome_counts = count_biomes(raw, width, height);
    let unknown = (0..total)
        .filter_map(|i| raw.tag_at(i % width, i / width))
        .filter(|tag| TerrainCell::from_tag(tag).is_none())
        .count();
    if unknown > 0 {
        warn!("{unknown} клеток с неизвестным типом местности заменены на rocky");
    }
    debug!("Начальный объём воды: {water_volume:.3} ({water_cells}/{total})");

    let mut map = DecomposedMap {
        width,
        height,
        elevation,
        water_volume,
        layers,
        biome_counts,
        sea_level: 0.0,
        water_coverage: 0.0,
        terrain: base_terrain.clone(),
        base_terrain,
    };
    update_water_bodies(&mut map, settings);

    info!(
        "Карта {width}×{height} разложена: уровень моря {:.3}, покрытие водой {:.1}%",
        map.sea_level,
        map.water_coverage * 100.0
    );
    map
}

/// Разложение с генератором ChaCha8 от сида
#[must_use]
pub fn decompose_seeded(raw: &RawTerrain, seed: u64, settings: &HydrosphereSettings) -> DecomposedMap {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    decompose(raw, &mut rng, settings)
}

/// Считает теги в пределах `width × height`; недостающие клетки учитываются как `rocky`
fn count_biomes(raw: &RawTerrain, width: usize, height: usize) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for y in 0..height {
        for x in 0..width {
            let tag = raw
                .tag_at(x, y)
                .map_or_else(|| FALLBACK_CELL.tag().to_string(), |t| t.trim().to_ascii_lowercase());
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts
}
