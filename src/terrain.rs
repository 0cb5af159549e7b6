// src/terrain.rs
//! Словарь типов местности и их классификация по слоям
//!
//! Каждый тип относится ровно к одному слою: геологическому, гидрологическому
//! или биологическому. Неизвестные теги трактуются как `rocky` (геология).

use serde::{Deserialize, Serialize};

use crate::grid::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainCell {
    DeepSea,
    Ocean,
    Coast,
    Swamp,
    Plains,
    Grasslands,
    Forest,
    Jungle,
    BorealForest,
    Tundra,
    Desert,
    Rocky,
    Mountains,
    Arctic,
}

/// Слой разложения карты
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Geological,
    Hydrological,
    Biological,
}

/// Диапазон высот для тегов, которых нет в таблице
pub const DEFAULT_ELEVATION_RANGE: (f64, f64) = (0.2, 0.6);

/// Тип, в который превращаются нераспознанные теги
pub const FALLBACK_CELL: TerrainCell = TerrainCell::Rocky;

impl TerrainCell {
    pub const ALL: [TerrainCell; 14] = [
        TerrainCell::DeepSea,
        TerrainCell::Ocean,
        TerrainCell::Coast,
        TerrainCell::Swamp,
        TerrainCell::Plains,
        TerrainCell::Grasslands,
        TerrainCell::Forest,
        TerrainCell::Jungle,
        TerrainCell::BorealForest,
        TerrainCell::Tundra,
        TerrainCell::Desert,
        TerrainCell::Rocky,
        TerrainCell::Mountains,
        TerrainCell::Arctic,
    ];

    /// Разбирает тег без учёта регистра
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|cell| cell.tag() == tag)
    }

    /// Тег в snake_case, совпадает с сериализованным видом
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            TerrainCell::DeepSea => "deep_sea",
            TerrainCell::Ocean => "ocean",
            TerrainCell::Coast => "coast",
            TerrainCell::Swamp => "swamp",
            TerrainCell::Plains => "plains",
            TerrainCell::Grasslands => "grasslands",
            TerrainCell::Forest => "forest",
            TerrainCell::Jungle => "jungle",
            TerrainCell::BorealForest => "boreal_forest",
            TerrainCell::Tundra => "tundra",
            TerrainCell::Desert => "desert",
            TerrainCell::Rocky => "rocky",
            TerrainCell::Mountains => "mountains",
            TerrainCell::Arctic => "arctic",
        }
    }

    #[must_use]
    pub fn layer(self) -> Layer {
        match self {
            TerrainCell::DeepSea | TerrainCell::Ocean | TerrainCell::Coast | TerrainCell::Swamp => {
                Layer::Hydrological
            }
            TerrainCell::Plains
            | TerrainCell::Grasslands
            | TerrainCell::Forest
            | TerrainCell::Jungle
            | TerrainCell::BorealForest
            | TerrainCell::Tundra => Layer::Biological,
            TerrainCell::Desert
            | TerrainCell::Rocky
            | TerrainCell::Mountains
            | TerrainCell::Arctic => Layer::Geological,
        }
    }

    /// Диапазон `[min, max]` синтезируемой высоты
    #[must_use]
    pub fn elevation_range(self) -> (f64, f64) {
        match self {
            TerrainCell::DeepSea => (0.0, 0.1),
            TerrainCell::Coast => (0.1, 0.2),
            TerrainCell::Swamp => (0.1, 0.3),
            TerrainCell::Plains | TerrainCell::Grasslands => (0.2, 0.5),
            TerrainCell::Forest | TerrainCell::Jungle => (0.4, 0.6),
            TerrainCell::Desert | TerrainCell::Rocky => (0.2, 0.8),
            TerrainCell::Mountains | TerrainCell::Arctic => (0.7, 1.0),
            TerrainCell::Tundra | TerrainCell::BorealForest => (0.5, 0.8),
            // Океана нет в исходной таблице высот
            TerrainCell::Ocean => DEFAULT_ELEVATION_RANGE,
        }
    }

    /// Вода, учитываемая в начальном объёме гидросферы
    #[must_use]
    pub fn holds_water(self) -> bool {
        self.layer() == Layer::Hydrological
    }

    /// Открытая вода: покрытие водой после пересчёта уровня моря
    #[must_use]
    pub fn is_water_body(self) -> bool {
        matches!(
            self,
            TerrainCell::Ocean | TerrainCell::DeepSea | TerrainCell::Coast
        )
    }

    /// Глубокая вода, по которой строятся зоны поверхностной воды
    #[must_use]
    pub fn is_open_water(self) -> bool {
        matches!(self, TerrainCell::Ocean | TerrainCell::DeepSea)
    }

    #[must_use]
    pub fn is_ice(self) -> bool {
        matches!(self, TerrainCell::Arctic | TerrainCell::Tundra)
    }
}

/// Диапазон высот для произвольного тега (включая нераспознанные)
#[must_use]
pub fn elevation_range_for_tag(tag: &str) -> (f64, f64) {
    TerrainCell::from_tag(tag).map_or(DEFAULT_ELEVATION_RANGE, TerrainCell::elevation_range)
}

/// Сетка типов местности
pub type TerrainGrid = Grid<TerrainCell>;

/// Сетка одного слоя: `None` там, где клетка принадлежит другому слою
pub type LayerGrid = Grid<Option<TerrainCell>>;

/// Сырые данные карты, как их отдают импортёры
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTerrain {
    #[serde(default)]
    pub width: usize,
    #[serde(default)]
    pub height: usize,
    #[serde(default)]
    pub grid: Vec<Vec<String>>,
}

impl RawTerrain {
    #[must_use]
    pub fn new(grid: Vec<Vec<String>>) -> Self {
        Self {
            width: grid.first().map_or(0, Vec::len),
            height: grid.len(),
            grid,
        }
    }

    /// Фактические размеры: строки сетки против заявленных полей.
    ///
    /// Высота берётся по числу строк, ширина по полю `width` или по самой длинной строке.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        let height = self.grid.len();
        if height == 0 {
            return (0, 0);
        }
        let widest = self.grid.iter().map(Vec::len).max().unwrap_or(0);
        let width = if self.width > 0 { self.width } else { widest };
        (width, height)
    }

    /// Тег клетки; отсутствующие в рваных строках клетки дают `None`
    #[must_use]
    pub fn tag_at(&self, x: usize, y: usize) -> Option<&str> {
        self.grid.get(y)?.get(x).map(String::as_str)
    }

    /// Переводит теги в типизированную сетку, неизвестные теги становятся `rocky`
    #[must_use]
    pub fn to_terrain_grid(&self) -> TerrainGrid {
        let (width, height) = self.dimensions();
        let data = (0..width * height)
            .map(|i| {
                self.tag_at(i % width, i / width)
                    .and_then(TerrainCell::from_tag)
                    .unwrap_or(FALLBACK_CELL)
            })
            .collect();
        Grid {
            width,
            height,
            data,
        }
    }
}

impl TerrainGrid {
    /// Строит сетку из строк тегов
    #[must_use]
    pub fn from_tags<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        let raw = RawTerrain::new(
            rows.iter()
                .map(|row| row.iter().map(|s| s.as_ref().to_string()).collect())
                .collect(),
        );
        raw.to_terrain_grid()
    }

    /// Теги по строкам, для отчётов и оценщика качества
    #[must_use]
    pub fn to_tag_rows(&self) -> Vec<Vec<String>> {
        self.rows()
            .map(|row| row.iter().map(|c| c.tag().to_string()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_disjoint_and_total() {
        let mut geo = 0;
        let mut hydro = 0;
        let mut bio = 0;
        for cell in TerrainCell::ALL {
            match cell.layer() {
                Layer::Geological => geo += 1,
                Layer::Hydrological => hydro += 1,
                Layer::Biological => bio += 1,
            }
        }
        assert_eq!(geo + hydro + bio, TerrainCell::ALL.len());
        assert_eq!(hydro, 4);
    }

    #[test]
    fn test_tag_round_trip_through_serde() {
        for cell in TerrainCell::ALL {
            let json = serde_json::to_string(&cell).unwrap();
            assert_eq!(json, format!("\"{}\"", cell.tag()));
            assert_eq!(TerrainCell::from_tag(cell.tag()), Some(cell));
        }
    }

    #[test]
    fn test_unknown_tag_defaults() {
        assert_eq!(TerrainCell::from_tag("lava_field"), None);
        assert_eq!(elevation_range_for_tag("lava_field"), DEFAULT_ELEVATION_RANGE);
        assert_eq!(TerrainCell::from_tag(" Mountains "), Some(TerrainCell::Mountains));
    }

    #[test]
    fn test_ragged_rows_fill_with_fallback() {
        let raw = RawTerrain {
            width: 0,
            height: 2,
            grid: vec![
                vec!["ocean".into(), "forest".into()],
                vec!["plains".into()],
            ],
        };
        let grid = raw.to_terrain_grid();
        assert_eq!((grid.width, grid.height), (2, 2));
        assert_eq!(grid.get(1, 1), Some(&FALLBACK_CELL));
        assert_eq!(grid.get(1, 0), Some(&TerrainCell::Forest));
    }
}
