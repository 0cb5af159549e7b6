// src/config.rs
//! Настраиваемые параметры движка
//!
//! Этот модуль собирает все эмпирические пороги гидросферы и анализатора:
//! - Глубинные пояса и окно прибрежной зоны при пересчёте уровня моря
//! - Пороги водоносных горизонтов, устойчивости льда и размеров водных зон
//! - Сид генератора высот
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Параметры пересчёта водных тел
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HydrosphereSettings {
    /// Глубина ниже уровня моря, до которой клетка считается прибрежной водой
    #[serde(default = "default_coast_depth")]
    pub coast_depth: f64,

    /// Глубина, до которой клетка считается океаном (глубже — `deep_sea`)
    #[serde(default = "default_ocean_depth")]
    pub ocean_depth: f64,

    /// Превышение над уровнем моря, в пределах которого пустыни и скалы становятся побережьем
    #[serde(default = "default_coastal_window")]
    pub coastal_window: f64,
}

fn default_coast_depth() -> f64 {
    0.1
}
fn default_ocean_depth() -> f64 {
    0.3
}
fn default_coastal_window() -> f64 {
    0.05
}

impl Default for HydrosphereSettings {
    fn default() -> Self {
        Self {
            coast_depth: 0.1,
            ocean_depth: 0.3,
            coastal_window: 0.05,
        }
    }
}

/// Пороги анализатора гидросферы
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerSettings {
    /// Радиус выборки вокруг клетки при оценке водоносного горизонта
    #[serde(default = "default_sample_radius")]
    pub sample_radius: usize,

    /// Минимальный потенциал, при котором горизонт попадает в отчёт
    #[serde(default = "default_aquifer_threshold")]
    pub aquifer_threshold: f64,

    /// Делитель суммарного вклада соседей (результат ограничен 1.0)
    #[serde(default = "default_aquifer_normalizer")]
    pub aquifer_normalizer: f64,

    /// Потенциал, начиная с которого на засушливых планетах имеет смысл бурение
    #[serde(default = "default_aquifer_drilling_threshold")]
    pub aquifer_drilling_threshold: f64,

    /// Устойчивость льда, начиная с которой на засушливых планетах ставится добыча
    #[serde(default = "default_ice_mining_stability")]
    pub ice_mining_stability: f64,

    /// Устойчивость, выше которой ледяной мир даёт высокий выход
    #[serde(default = "default_ice_harvest_high_stability")]
    pub ice_harvest_high_stability: f64,

    /// Потеря устойчивости льда за каждую соседнюю гору или скалу
    #[serde(default = "default_ice_proximity_penalty")]
    pub ice_proximity_penalty: f64,

    /// Минимальный размер водной зоны для сбора на водных планетах
    #[serde(default = "default_min_surface_zone_size")]
    pub min_surface_zone_size: usize,

    /// Минимальный размер водной зоны для неклассифицированных планет
    #[serde(default = "default_fallback_surface_zone_size")]
    pub fallback_surface_zone_size: usize,

    /// Сколько ледяных зон предлагать, если поверхностной воды нет
    #[serde(default = "default_fallback_ice_sites")]
    pub fallback_ice_sites: usize,
}

fn default_sample_radius() -> usize {
    2
}
fn default_aquifer_threshold() -> f64 {
    0.3
}
fn default_aquifer_normalizer() -> f64 {
    10.0
}
fn default_aquifer_drilling_threshold() -> f64 {
    0.5
}
fn default_ice_mining_stability() -> f64 {
    0.7
}
fn default_ice_harvest_high_stability() -> f64 {
    0.8
}
fn default_ice_proximity_penalty() -> f64 {
    0.1
}
fn default_min_surface_zone_size() -> usize {
    10
}
fn default_fallback_surface_zone_size() -> usize {
    5
}
fn default_fallback_ice_sites() -> usize {
    5
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            sample_radius: 2,
            aquifer_threshold: 0.3,
            aquifer_normalizer: 10.0,
            aquifer_drilling_threshold: 0.5,
            ice_mining_stability: 0.7,
            ice_harvest_high_stability: 0.8,
            ice_proximity_penalty: 0.1,
            min_surface_zone_size: 10,
            fallback_surface_zone_size: 5,
            fallback_ice_sites: 5,
        }
    }
}

/// Полная конфигурация движка
///
/// Загружается из TOML-файла; все секции необязательны.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Сид генератора высот (детерминированное разложение)
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub hydrosphere: HydrosphereSettings,

    #[serde(default)]
    pub analyzer: AnalyzerSettings,
}

impl EngineConfig {
    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # engine.toml
    /// seed = 42
    ///
    /// [hydrosphere]
    /// coastal_window = 0.08
    ///
    /// [analyzer]
    /// aquifer_threshold = 0.25
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Читает JSON-документ (сырая карта, разложенная карта, характеристики планеты)
pub fn read_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Сохраняет значение как форматированный JSON
pub fn write_json_file<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            seed = 9

            [analyzer]
            aquifer_threshold = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 9);
        assert_eq!(config.hydrosphere, HydrosphereSettings::default());
        assert!((config.analyzer.aquifer_threshold - 0.25).abs() < 1e-12);
        assert_eq!(config.analyzer.sample_radius, 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("hydroterra-config-{}.json", std::process::id()));
        let settings = AnalyzerSettings {
            fallback_ice_sites: 3,
            ..AnalyzerSettings::default()
        };
        write_json_file(&path, &settings).unwrap();
        let loaded: AnalyzerSettings = read_json_file(&path).unwrap();
        assert_eq!(loaded, settings);

        fs::write(&path, "{ not json").unwrap();
        let err = read_json_file::<AnalyzerSettings>(&path).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
        let _ = fs::remove_file(&path);
    }
}
