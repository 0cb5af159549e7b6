// src/strategic.rs
use serde::{Deserialize, Serialize};

use crate::decompose::DecomposedMap;
use crate::terrain::{TerrainCell, TerrainGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Port,
    Pass,
    Estuary,
    Strait,
    PermanentLandmass,
    ResourceNode,
    WaterCollectionZone,
}

/// Стратегическая точка на карте
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategicMarker {
    pub kind: MarkerKind,
    pub x: usize,
    pub y: usize,
}

impl StrategicMarker {
    #[must_use]
    pub fn new(kind: MarkerKind, x: usize, y: usize) -> Self {
        Self { kind, x, y }
    }
}

fn is_land(cell: TerrainCell) -> bool {
    !cell.is_water_body()
}

#[must_use]
pub fn find_strategic_markers(map: &DecomposedMap) -> Vec<StrategicMarker> {
    find_terrain_markers(&map.terrain)
}

/// Порты, устья, перевалы и проливы по текущей поверхности
#[must_use]
pub fn find_terrain_markers(terrain: &TerrainGrid) -> Vec<StrategicMarker> {
    let mut markers = Vec::new();
    let at = |x: i64, y: i64| terrain.get_signed(x, y).copied();

    for y in 0..terrain.height {
        for x in 0..terrain.width {
            let cell = terrain.data[terrain.index(x, y)];
            let touches_sea = terrain
                .neighbors4(x, y)
                .any(|(nx, ny)| terrain.data[terrain.index(nx, ny)].is_open_water());
            let (xi, yi) = (x as i64, y as i64);
            // Пары противоположных соседей: слева-справа и сверху-снизу
            let opposite = [
                (at(xi - 1, yi), at(xi + 1, yi)),
                (at(xi, yi - 1), at(xi, yi + 1)),
            ];

            let kind = if cell == TerrainCell::Swamp && touches_sea {
                Some(MarkerKind::Estuary)
            } else if is_land(cell) && touches_sea {
                Some(MarkerKind::Port)
            } else if is_land(cell)
                && cell != TerrainCell::Mountains
                && opposite.iter().any(|pair| {
                    matches!(
                        pair,
                        (Some(TerrainCell::Mountains), Some(TerrainCell::Mountains))
                    )
                })
            {
                Some(MarkerKind::Pass)
            } else if cell.is_water_body()
                && opposite
                    .iter()
                    .any(|&(a, b)| a.is_some_and(is_land) && b.is_some_and(is_land))
            {
                Some(MarkerKind::Strait)
            } else {
                None
            };

            if let Some(kind) = kind {
                markers.push(StrategicMarker::new(kind, x, y));
            }
        }
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> TerrainGrid {
        let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.to_vec()).collect();
        TerrainGrid::from_tags(&rows)
    }

    fn kinds_at(markers: &[StrategicMarker], x: usize, y: usize) -> Vec<MarkerKind> {
        markers
            .iter()
            .filter(|m| m.x == x && m.y == y)
            .map(|m| m.kind)
            .collect()
    }

    #[test]
    fn test_port_and_estuary() {
        let g = grid(&[&["plains", "ocean", "swamp"], &["forest", "ocean", "desert"]]);
        let markers = find_terrain_markers(&g);
        assert_eq!(kinds_at(&markers, 0, 0), vec![MarkerKind::Port]);
        assert_eq!(kinds_at(&markers, 2, 0), vec![MarkerKind::Estuary]);
    }

    #[test]
    fn test_pass_between_mountains() {
        let g = grid(&[
            &["plains", "mountains", "plains"],
            &["mountains", "grasslands", "mountains"],
            &["plains", "plains", "plains"],
        ]);
        let markers = find_terrain_markers(&g);
        assert_eq!(kinds_at(&markers, 1, 1), vec![MarkerKind::Pass]);
    }

    #[test]
    fn test_strait_between_land() {
        let g = grid(&[
            &["ocean", "ocean", "ocean"],
            &["plains", "coast", "plains"],
            &["ocean", "ocean", "ocean"],
        ]);
        let markers = find_terrain_markers(&g);
        assert_eq!(kinds_at(&markers, 1, 1), vec![MarkerKind::Strait]);
    }
}
