// src/elevation.rs
use rand::{Rng, SeedableRng};

use crate::grid::Grid;
use crate::terrain::{DEFAULT_ELEVATION_RANGE, RawTerrain, elevation_range_for_tag};

/// Карта высот: значения от 0.0 (глубокое море) до 1.0 (высокие горы).
///
/// Строгое соблюдение диапазона не гарантируется.
pub type ElevationGrid = Grid<f64>;

/// Синтезирует высоты по тегам местности.
///
/// Для каждой клетки берётся диапазон высот её тега и равномерно выбирается значение
/// внутри него. Генератор потребляется строго построчно, поэтому один и тот же сид
/// всегда даёт одну и ту же карту.
pub fn synthesize_elevation<R: Rng + ?Sized>(raw: &RawTerrain, rng: &mut R) -> ElevationGrid {
    let (width, height) = raw.dimensions();
    let mut elevation = Grid::new(width, height, 0.0);

    for y in 0..height {
        for x in 0..width {
            let (min, max) = raw
                .tag_at(x, y)
                .map_or(DEFAULT_ELEVATION_RANGE, elevation_range_for_tag);
            let value = if max > min {
                rng.gen_range(min..=max)
            } else {
                min
            };
            elevation.set(x, y, value);
        }
    }

    elevation
}

/// То же, что [`synthesize_elevation`], с генератором ChaCha8 от сида
#[must_use]
pub fn synthesize_elevation_seeded(raw: &RawTerrain, seed: u64) -> ElevationGrid {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(seed);
    synthesize_elevation(raw, &mut rng)
}

/// Сводная статистика по набору высот
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl ElevationStats {
    /// Статистика по срезу; пустой срез даёт `None`
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / n;
        // Дисперсия генеральной совокупности
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Коэффициент вариации; при нулевом среднем равен 0
    #[must_use]
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean
        }
    }
}

impl ElevationGrid {
    #[must_use]
    pub fn stats(&self) -> Option<ElevationStats> {
        ElevationStats::from_values(&self.data)
    }
}
