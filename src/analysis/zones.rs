// src/analysis/zones.rs
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::terrain::{TerrainCell, TerrainGrid};

/// Связная по 4 направлениям область открытой воды
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterZone {
    pub size: usize,
    /// Клетки в порядке обхода BFS, первая — стартовая
    pub coordinates: Vec<(usize, usize)>,
    /// Тип стартовой клетки
    #[serde(rename = "type")]
    pub zone_type: TerrainCell,
}

/// Находит все водные зоны (`ocean` и `deep_sea`), крупные первыми.
///
/// Обход итеративный, с плоским массивом посещённых клеток.
#[must_use]
pub fn find_water_zones(grid: &TerrainGrid) -> Vec<WaterZone> {
    let mut visited = vec![false; grid.len()];
    let mut zones = Vec::new();

    for idx in 0..grid.len() {
        if visited[idx] || !grid.data[idx].is_open_water() {
            continue;
        }
        let (x, y) = grid.coords(idx);
        zones.push(flood_fill(grid, &mut visited, x, y));
    }

    // Стабильная сортировка: при равных размерах сохраняется порядок обнаружения
    zones.sort_by(|a, b| b.size.cmp(&a.size));
    zones
}

fn flood_fill(grid: &TerrainGrid, visited: &mut [bool], start_x: usize, start_y: usize) -> WaterZone {
    let start = grid.index(start_x, start_y);
    let zone_type = grid.data[start];
    let mut coordinates = Vec::new();
    let mut queue = VecDeque::new();

    visited[start] = true;
    queue.push_back((start_x, start_y));

    while let Some((x, y)) = queue.pop_front() {
        coordinates.push((x, y));
        for (nx, ny) in grid.neighbors4(x, y) {
            let nidx = grid.index(nx, ny);
            if !visited[nidx] && grid.data[nidx].is_open_water() {
                visited[nidx] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    WaterZone {
        size: coordinates.len(),
        coordinates,
        zone_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> TerrainGrid {
        let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.to_vec()).collect();
        TerrainGrid::from_tags(&rows)
    }

    #[test]
    fn test_two_separate_zones_sorted_by_size() {
        let g = grid(&[
            &["ocean", "ocean", "plains", "deep_sea"],
            &["ocean", "plains", "plains", "plains"],
            &["deep_sea", "plains", "coast", "plains"],
        ]);
        let zones = find_water_zones(&g);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].size, 4);
        assert_eq!(zones[0].zone_type, TerrainCell::Ocean);
        assert_eq!(zones[0].coordinates[0], (0, 0));
        assert_eq!(zones[1].size, 1);
        assert_eq!(zones[1].zone_type, TerrainCell::DeepSea);
    }

    #[test]
    fn test_diagonal_cells_are_not_connected() {
        let g = grid(&[&["ocean", "plains"], &["plains", "ocean"]]);
        assert_eq!(find_water_zones(&g).len(), 2);
    }

    #[test]
    fn test_zone_sizes_cover_all_open_water() {
        let g = grid(&[
            &["ocean", "coast", "deep_sea", "ocean", "forest"],
            &["plains", "ocean", "deep_sea", "swamp", "ocean"],
            &["ocean", "ocean", "mountains", "ocean", "ocean"],
        ]);
        let total: usize = find_water_zones(&g).iter().map(|z| z.size).sum();
        let open = g.data.iter().filter(|c| c.is_open_water()).count();
        assert_eq!(total, open);
    }

    #[test]
    fn test_large_single_zone_without_recursion() {
        let rows: Vec<Vec<&str>> = vec![vec!["ocean"; 400]; 400];
        let g = TerrainGrid::from_tags(&rows);
        let zones = find_water_zones(&g);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].size, 160_000);
    }

    #[test]
    fn test_no_water_no_zones() {
        let g = grid(&[&["mountains", "mountains"], &["mountains", "mountains"]]);
        assert!(find_water_zones(&g).is_empty());
    }
}
