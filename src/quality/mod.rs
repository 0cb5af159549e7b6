// src/quality/mod.rs
//! Оценка качества карты
//!
//! Четыре нормированные оценки и их взвешенная сумма:
//! - реализм: рельеф соответствует размеру планеты, биомы — температуре
//! - играбельность: доля и скученность ресурсов, стратегические точки, проходимость
//! - разнообразие: вариация высот, энтропия Шеннона по биомам, число типов ресурсов
//! - баланс: ни один ресурс не доминирует, стратегические точки разнесены

pub mod clusters;

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::decompose::DecomposedMap;
use crate::elevation::ElevationStats;
use crate::grid::Grid;
use crate::strategic::{StrategicMarker, find_strategic_markers};
use crate::terrain::TerrainCell;

use clusters::analyze_resource_clusters;

const REALISM_WEIGHT: f64 = 0.4;
const PLAYABILITY_WEIGHT: f64 = 0.3;
const DIVERSITY_WEIGHT: f64 = 0.2;
const BALANCE_WEIGHT: f64 = 0.1;

const COLD_BIOMES: [&str; 4] = ["ice", "arctic", "tundra", "snow"];
const EARTH_LIKE_BIOMES: [&str; 5] = ["grassland", "grasslands", "forest", "plains", "desert"];

/// Диагональ сетки 100×100, если размеры карты неизвестны
const FALLBACK_DIAGONAL: f64 = std::f64::consts::SQRT_2 * 100.0;

/// Данные карты для оценки; любой раздел может отсутствовать
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainData {
    #[serde(default, alias = "elevation_data")]
    pub elevation: Option<Vec<Vec<f64>>>,
    #[serde(default, alias = "terrain", alias = "terrain_grid")]
    pub biomes: Option<Vec<Vec<String>>>,
    /// Тип ресурса в клетке или `null`
    #[serde(default)]
    pub resource_grid: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    pub resource_counts: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    pub strategic_markers: Option<Vec<StrategicMarker>>,
}

impl TerrainData {
    /// Данные для оценки разложенной карты: рельеф, текущая поверхность, стратегические точки
    #[must_use]
    pub fn from_decomposed(map: &DecomposedMap) -> Self {
        Self {
            elevation: Some(map.elevation.rows().map(<[f64]>::to_vec).collect()),
            biomes: Some(map.terrain.to_tag_rows()),
            resource_grid: None,
            resource_counts: None,
            strategic_markers: Some(find_strategic_markers(map)),
        }
    }

    fn elevation_values(&self) -> Vec<f64> {
        self.elevation
            .iter()
            .flatten()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .collect()
    }

    /// Ширина и высота по рельефу или биомам
    fn dimensions(&self) -> Option<(usize, usize)> {
        let dims = |rows: usize, widest: usize| (rows > 0 && widest > 0).then_some((widest, rows));
        self.elevation
            .as_ref()
            .and_then(|e| dims(e.len(), e.iter().map(Vec::len).max().unwrap_or(0)))
            .or_else(|| {
                self.biomes
                    .as_ref()
                    .and_then(|b| dims(b.len(), b.iter().map(Vec::len).max().unwrap_or(0)))
            })
    }
}

/// Свойства планеты для оценки реализма
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanetProperties {
    /// Радиус, м
    #[serde(default)]
    pub radius: Option<f64>,
    /// Температура поверхности, К
    #[serde(default)]
    pub surface_temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScoreSet {
    pub realism: f64,
    pub playability: f64,
    pub diversity: f64,
    pub balance: f64,
    pub overall: f64,
}

/// Оценивает карту. Все оценки лежат в `[0, 1]`, в том числе для пустых данных.
#[must_use]
pub fn assess_terrain_quality(
    data: &TerrainData,
    planet: Option<&PlanetProperties>,
) -> QualityScoreSet {
    let realism = realism_score(data, planet);
    let playability = playability_score(data);
    let diversity = diversity_score(data);
    let balance = balance_score(data);
    let overall = realism * REALISM_WEIGHT
        + playability * PLAYABILITY_WEIGHT
        + diversity * DIVERSITY_WEIGHT
        + balance * BALANCE_WEIGHT;

    debug!(
        "Качество карты: реализм {realism:.2}, играбельность {playability:.2}, разнообразие {diversity:.2}, баланс {balance:.2}"
    );

    QualityScoreSet {
        realism,
        playability,
        diversity,
        balance,
        overall: overall.clamp(0.0, 1.0),
    }
}

/// Ожидаемая максимальная высота рельефа для радиуса в км
fn expected_max_elevation(radius_km: f64) -> f64 {
    if (0.0..=5000.0).contains(&radius_km) {
        radius_km * 0.1
    } else if (5000.0..=10_000.0).contains(&radius_km) {
        radius_km * 0.05
    } else {
        radius_km * 0.02
    }
}

fn realism_score(data: &TerrainData, planet: Option<&PlanetProperties>) -> f64 {
    let mut score: f64 = 0.5;
    let Some(planet) = planet else {
        return score;
    };

    if let (Some(_), Some(radius)) = (&data.elevation, planet.radius) {
        let max_elevation = data
            .elevation_values()
            .into_iter()
            .reduce(f64::max)
            .unwrap_or(0.0);
        let expected = expected_max_elevation(radius / 1000.0);
        if (expected * 0.5..=expected * 1.5).contains(&max_elevation) {
            score += 0.2;
        }
    }

    if let (Some(biomes), Some(temp)) = (&data.biomes, planet.surface_temperature) {
        let counts = count_biomes(biomes);
        let total: usize = counts.values().sum();
        let share_of = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| counts.get(*name))
                .sum::<usize>() as f64
        };

        if temp < 273.0 {
            if share_of(&COLD_BIOMES) > total as f64 * 0.7 {
                score += 0.15;
            }
        } else if (273.0..=373.0).contains(&temp) && share_of(&EARTH_LIKE_BIOMES) > total as f64 * 0.5
        {
            score += 0.15;
        }
    }

    score.clamp(0.0, 1.0)
}

fn playability_score(data: &TerrainData) -> f64 {
    let mut score: f64 = 0.5;

    if let Some(resource_grid) = &data.resource_grid {
        let occupied = occupancy_grid(resource_grid);
        let total = occupied.len();
        if total > 0 {
            let resource_cells = occupied.data.iter().filter(|&&o| o).count();
            let ratio = resource_cells as f64 / total as f64;
            if (0.05..=0.25).contains(&ratio) {
                score += 0.2;
            }
        }

        let clusters = analyze_resource_clusters(&occupied);
        if (3.0..=15.0).contains(&clusters.average_cluster_size) {
            score += 0.1;
        }
    }

    if data.strategic_markers.as_ref().is_some_and(|m| m.len() > 5) {
        score += 0.1;
    }

    // Карта проходима, пока вода не занимает почти всё
    if let Some(biomes) = &data.biomes {
        if water_ratio(biomes) < 0.8 {
            score += 0.1;
        }
    }

    score.clamp(0.0, 1.0)
}

fn diversity_score(data: &TerrainData) -> f64 {
    let mut score: f64 = 0.0;

    let elevations = data.elevation_values();
    if elevations.len() > 10 {
        if let Some(stats) = ElevationStats::from_values(&elevations) {
            score += (stats.coefficient_of_variation() * 2.0).clamp(0.0, 0.3);
        }
    }

    if let Some(biomes) = &data.biomes {
        let counts = count_biomes(biomes);
        score += (shannon_index(&counts) * 0.5).min(0.4);
    }

    if let Some(resource_counts) = &data.resource_counts {
        score += (resource_counts.len() as f64 * 0.05).min(0.3);
    }

    score.clamp(0.0, 1.0)
}

fn balance_score(data: &TerrainData) -> f64 {
    let mut score: f64 = 0.5;

    if let Some(resource_counts) = &data.resource_counts {
        let total: u64 = resource_counts.values().sum();
        if total > 0 {
            let max = resource_counts.values().copied().max().unwrap_or(0);
            if (max as f64 / total as f64) < 0.5 {
                score += 0.2;
            }
            if resource_counts.len() >= 3 {
                score += 0.1;
            }
        }
    }

    if let Some(markers) = &data.strategic_markers {
        let diagonal = data
            .dimensions()
            .map_or(FALLBACK_DIAGONAL, |(w, h)| (w as f64).hypot(h as f64));
        if marker_spread(markers, diagonal) > 0.6 {
            score += 0.2;
        }
    }

    score.clamp(0.0, 1.0)
}

fn count_biomes(biomes: &[Vec<String>]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for biome in biomes.iter().flatten() {
        *counts.entry(biome.trim().to_ascii_lowercase()).or_insert(0) += 1;
    }
    counts
}

/// Индекс разнообразия Шеннона `-Σ p·ln p`
#[must_use]
pub fn shannon_index(counts: &BTreeMap<String, usize>) -> f64 {
    let total: usize = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    counts
        .values()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.ln()
        })
        .sum()
}

fn water_ratio(biomes: &[Vec<String>]) -> f64 {
    let total = biomes.iter().map(Vec::len).sum::<usize>();
    if total == 0 {
        return 0.0;
    }
    let water = biomes
        .iter()
        .flatten()
        .filter(|tag| {
            let lower = tag.to_ascii_lowercase();
            TerrainCell::from_tag(&lower).is_some_and(TerrainCell::is_water_body)
                || lower.contains("water")
                || lower.contains("ocean")
        })
        .count();
    water as f64 / total as f64
}

fn occupancy_grid(resource_grid: &[Vec<Option<String>>]) -> Grid<bool> {
    let height = resource_grid.len();
    let width = resource_grid.iter().map(Vec::len).max().unwrap_or(0);
    let mut occupied = Grid::new(width, height, false);
    for (y, row) in resource_grid.iter().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            occupied.set(x, y, cell.is_some());
        }
    }
    occupied
}

/// Средняя попарная дистанция, делённая на диагональ карты, в `[0, 1]`
fn marker_spread(markers: &[StrategicMarker], diagonal: f64) -> f64 {
    if markers.len() < 2 || diagonal <= 0.0 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut count = 0usize;
    for (i, a) in markers.iter().enumerate() {
        for b in &markers[i + 1..] {
            let dx = a.x as f64 - b.x as f64;
            let dy = a.y as f64 - b.y as f64;
            total += dx.hypot(dy);
            count += 1;
        }
    }

    (total / count as f64 / diagonal).min(1.0)
}
