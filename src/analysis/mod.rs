// src/analysis/mod.rs
//! Анализ гидросферы
//!
//! По сетке местности и (необязательно) характеристикам планеты строит:
//! - зоны поверхностной воды (связные компоненты)
//! - потенциал подземных водоносных горизонтов
//! - распределение и устойчивость льда
//! - рекомендуемые точки добычи воды и сводку

pub mod planet;
pub mod sites;
pub mod subsurface;
pub mod zones;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AnalyzerSettings;
use crate::terrain::TerrainGrid;

pub use planet::{PlanetCharacteristics, PlanetType};
pub use sites::{CollectionSite, WaterAvailability, identify_collection_sites};
pub use subsurface::{AquiferZone, IceZone, analyze_subsurface_water, map_ice_distribution};
pub use zones::{WaterZone, find_water_zones};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrosphereSummary {
    /// Суммарная площадь открытой воды в клетках
    pub total_surface_water_coverage: usize,
    pub subsurface_water_sites: usize,
    pub ice_zones_count: usize,
    pub viable_collection_sites: usize,
    pub planet_type: PlanetType,
    pub water_availability: WaterAvailability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrosphereReport {
    pub surface_water_zones: Vec<WaterZone>,
    pub subsurface_water_potential: Vec<AquiferZone>,
    pub ice_distribution: Vec<IceZone>,
    pub water_collection_sites: Vec<CollectionSite>,
    pub summary: HydrosphereSummary,
}

/// Анализатор с настраиваемыми порогами
#[derive(Debug, Clone, Default)]
pub struct HydrosphereAnalyzer {
    pub settings: AnalyzerSettings,
}

impl HydrosphereAnalyzer {
    #[must_use]
    pub fn new(settings: AnalyzerSettings) -> Self {
        Self { settings }
    }

    /// Полный анализ сетки. Пустая сетка даёт пустой отчёт.
    #[must_use]
    pub fn analyze(
        &self,
        grid: &TerrainGrid,
        planet: Option<&PlanetCharacteristics>,
    ) -> HydrosphereReport {
        let planet_type = PlanetType::classify(planet);

        let surface_water_zones = find_water_zones(grid);
        let subsurface_water_potential = analyze_subsurface_water(grid, &self.settings);
        let ice_distribution = map_ice_distribution(grid, &self.settings);
        let water_collection_sites = identify_collection_sites(
            planet_type,
            &surface_water_zones,
            &subsurface_water_potential,
            &ice_distribution,
            &self.settings,
        );

        let summary = HydrosphereSummary {
            total_surface_water_coverage: surface_water_zones.iter().map(|z| z.size).sum(),
            subsurface_water_sites: subsurface_water_potential.len(),
            ice_zones_count: ice_distribution.len(),
            viable_collection_sites: water_collection_sites.len(),
            planet_type,
            water_availability: WaterAvailability::from_sites(&water_collection_sites),
        };

        debug!(
            "Гидросфера ({planet_type:?}): {} водных зон, {} горизонтов, {} ледяных клеток, {} точек добычи",
            surface_water_zones.len(),
            summary.subsurface_water_sites,
            summary.ice_zones_count,
            summary.viable_collection_sites
        );

        HydrosphereReport {
            surface_water_zones,
            subsurface_water_potential,
            ice_distribution,
            water_collection_sites,
            summary,
        }
    }
}

/// Анализ с порогами по умолчанию
#[must_use]
pub fn analyze_hydrosphere(
    grid: &TerrainGrid,
    planet: Option<&PlanetCharacteristics>,
) -> HydrosphereReport {
    HydrosphereAnalyzer::default().analyze(grid, planet)
}
