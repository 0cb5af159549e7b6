// src/analysis/subsurface.rs
//! Подземные воды и лёд
//!
//! Потенциал водоносного горизонта оценивается по близости открытой воды и льда,
//! устойчивость льда — по соседству с горами и скалами.

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerSettings;
use crate::grid::filter_map_cells;
use crate::terrain::{TerrainCell, TerrainGrid};

/// Ожидаемая глубина залегания, м
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AquiferZone {
    pub coordinates: (usize, usize),
    pub potential: f64,
    pub terrain: TerrainCell,
    pub depth_estimate: DepthRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceZone {
    pub coordinates: (usize, usize),
    #[serde(rename = "type")]
    pub terrain: TerrainCell,
    pub stability: f64,
}

/// Местность, под которой ищем водоносные горизонты
#[must_use]
pub fn has_aquifer_potential(cell: TerrainCell) -> bool {
    matches!(
        cell,
        TerrainCell::Desert | TerrainCell::Rocky | TerrainCell::Mountains
    )
}

#[must_use]
pub fn estimate_aquifer_depth(terrain: TerrainCell) -> DepthRange {
    let (min, max) = match terrain {
        TerrainCell::Desert => (50, 200),
        TerrainCell::Rocky => (100, 500),
        TerrainCell::Mountains => (200, 1000),
        _ => (100, 300),
    };
    DepthRange { min, max }
}

/// Потенциал водоносного горизонта в клетке, `[0, 1]`.
///
/// Каждая вода в радиусе выборки добавляет `1 / (d + 1)`, каждый лёд — `0.5 / (d + 1)`.
#[must_use]
pub fn aquifer_potential(grid: &TerrainGrid, x: usize, y: usize, settings: &AnalyzerSettings) -> f64 {
    let radius = settings.sample_radius as i64;
    let mut score = 0.0;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let Some(&nearby) = grid.get_signed(x as i64 + dx, y as i64 + dy) else {
                continue;
            };
            let distance = ((dx * dx + dy * dy) as f64).sqrt();
            if distance > radius as f64 {
                continue;
            }

            if nearby.is_open_water() {
                score += 1.0 / (distance + 1.0);
            } else if nearby.is_ice() {
                score += 0.5 / (distance + 1.0);
            }
        }
    }

    if settings.aquifer_normalizer > 0.0 {
        (score / settings.aquifer_normalizer).min(1.0)
    } else {
        0.0
    }
}

/// Перспективные водоносные горизонты выше порога, лучшие первыми
#[must_use]
pub fn analyze_subsurface_water(grid: &TerrainGrid, settings: &AnalyzerSettings) -> Vec<AquiferZone> {
    let mut zones = filter_map_cells(grid.len(), |idx| {
        let terrain = grid.data[idx];
        if !has_aquifer_potential(terrain) {
            return None;
        }
        let (x, y) = grid.coords(idx);
        let potential = aquifer_potential(grid, x, y, settings);
        (potential > settings.aquifer_threshold).then(|| AquiferZone {
            coordinates: (x, y),
            potential,
            terrain,
            depth_estimate: estimate_aquifer_depth(terrain),
        })
    });

    zones.sort_by(|a, b| b.potential.total_cmp(&a.potential));
    zones
}

/// Устойчивость льда: 1.0 минус штраф за каждую гору или скалу рядом
#[must_use]
pub fn ice_stability(grid: &TerrainGrid, x: usize, y: usize, settings: &AnalyzerSettings) -> f64 {
    let mut stability = 1.0;

    for dy in -1..=1 {
        for dx in -1..=1 {
            if let Some(TerrainCell::Mountains | TerrainCell::Rocky) =
                grid.get_signed(x as i64 + dx, y as i64 + dy)
            {
                stability -= settings.ice_proximity_penalty;
            }
        }
    }

    f64::max(stability, 0.0)
}

/// Все ледяные клетки (`arctic`, `tundra`) в порядке обхода карты
#[must_use]
pub fn map_ice_distribution(grid: &TerrainGrid, settings: &AnalyzerSettings) -> Vec<IceZone> {
    grid.data
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.is_ice())
        .map(|(idx, &terrain)| {
            let (x, y) = grid.coords(idx);
            IceZone {
                coordinates: (x, y),
                terrain,
                stability: ice_stability(grid, x, y, settings),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> TerrainGrid {
        let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.to_vec()).collect();
        TerrainGrid::from_tags(&rows)
    }

    #[test]
    fn test_desert_surrounded_by_ocean() {
        let mut rows = vec![vec!["ocean"; 5]; 5];
        rows[2][2] = "desert";
        let g = TerrainGrid::from_tags(&rows);
        let settings = AnalyzerSettings::default();

        let potential = aquifer_potential(&g, 2, 2, &settings);
        // 4 соседа на d=1, 4 на d=√2, 4 на d=2
        let expected = (4.0 / 2.0 + 4.0 / (2f64.sqrt() + 1.0) + 4.0 / 3.0) / 10.0;
        assert!((potential - expected).abs() < 1e-12);

        let zones = analyze_subsurface_water(&g, &settings);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].depth_estimate, DepthRange { min: 50, max: 200 });
    }

    #[test]
    fn test_ice_counts_half_as_much_as_water() {
        let mut rows = vec![vec!["arctic"; 5]; 5];
        rows[2][2] = "desert";
        let g = TerrainGrid::from_tags(&rows);
        let settings = AnalyzerSettings::default();

        let potential = aquifer_potential(&g, 2, 2, &settings);
        let expected = 0.5 * (4.0 / 2.0 + 4.0 / (2f64.sqrt() + 1.0) + 4.0 / 3.0) / 10.0;
        assert!((potential - expected).abs() < 1e-12);
        // ≈ 0.25, ниже порога
        assert!(analyze_subsurface_water(&g, &settings).is_empty());
    }

    #[test]
    fn test_water_and_ice_mixed() {
        let mut rows = vec![vec!["tundra"; 5]; 5];
        rows[2][2] = "rocky";
        for (x, y) in [(2, 1), (2, 3), (1, 2), (3, 2)] {
            rows[y][x] = "ocean";
        }
        let g = TerrainGrid::from_tags(&rows);
        let settings = AnalyzerSettings::default();

        let potential = aquifer_potential(&g, 2, 2, &settings);
        let expected = (4.0 / 2.0 + 0.5 * 4.0 / (2f64.sqrt() + 1.0) + 0.5 * 4.0 / 3.0) / 10.0;
        assert!((potential - expected).abs() < 1e-12);

        let zones = analyze_subsurface_water(&g, &settings);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].terrain, TerrainCell::Rocky);
        assert_eq!(zones[0].depth_estimate, DepthRange { min: 100, max: 500 });
    }

    #[test]
    fn test_depth_by_terrain() {
        assert_eq!(
            estimate_aquifer_depth(TerrainCell::Desert),
            DepthRange { min: 50, max: 200 }
        );
        assert_eq!(
            estimate_aquifer_depth(TerrainCell::Rocky),
            DepthRange { min: 100, max: 500 }
        );
        assert_eq!(
            estimate_aquifer_depth(TerrainCell::Mountains),
            DepthRange { min: 200, max: 1000 }
        );
        assert_eq!(
            estimate_aquifer_depth(TerrainCell::Plains),
            DepthRange { min: 100, max: 300 }
        );
    }

    #[test]
    fn test_dry_region_has_no_aquifers() {
        let g = grid(&[&["desert", "rocky", "mountains"], &["plains", "forest", "desert"]]);
        assert!(analyze_subsurface_water(&g, &AnalyzerSettings::default()).is_empty());
    }

    #[test]
    fn test_aquifers_sorted_by_potential() {
        let g = grid(&[
            &["ocean", "ocean", "ocean", "plains", "plains", "plains"],
            &["ocean", "rocky", "ocean", "plains", "plains", "plains"],
            &["ocean", "ocean", "mountains", "plains", "plains", "plains"],
        ]);
        let zones = analyze_subsurface_water(&g, &AnalyzerSettings::default());
        assert!(!zones.is_empty());
        for pair in zones.windows(2) {
            assert!(pair[0].potential >= pair[1].potential);
        }
        assert_eq!(zones[0].coordinates, (1, 1));
    }

    #[test]
    fn test_ice_stability_near_mountains() {
        let g = grid(&[
            &["mountains", "rocky", "plains"],
            &["plains", "arctic", "plains"],
            &["plains", "plains", "tundra"],
        ]);
        let settings = AnalyzerSettings::default();
        let ice = map_ice_distribution(&g, &settings);
        assert_eq!(ice.len(), 2);
        assert!((ice[0].stability - 0.8).abs() < 1e-12);
        assert_eq!(ice[1].terrain, TerrainCell::Tundra);
        assert!((ice[1].stability - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ice_stability_floors_at_zero() {
        let mut rows = vec![vec!["mountains"; 3]; 3];
        rows[1][1] = "arctic";
        let g = TerrainGrid::from_tags(&rows);
        let settings = AnalyzerSettings {
            ice_proximity_penalty: 0.2,
            ..AnalyzerSettings::default()
        };
        assert_eq!(ice_stability(&g, 1, 1, &settings), 0.0);
    }
}
