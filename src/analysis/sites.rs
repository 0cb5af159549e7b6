// src/analysis/sites.rs
use serde::{Deserialize, Serialize};

use crate::analysis::planet::PlanetType;
use crate::analysis::subsurface::{AquiferZone, DepthRange, IceZone};
use crate::analysis::zones::WaterZone;
use crate::config::AnalyzerSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    IceMining,
    AquiferDrilling,
    SurfaceCollection,
    IceHarvesting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldPotential {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl YieldPotential {
    #[must_use]
    pub fn is_high(self) -> bool {
        matches!(self, YieldPotential::High | YieldPotential::VeryHigh)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Surface,
    Subsurface,
}

/// Рекомендуемая точка добычи воды
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSite {
    pub coordinates: (usize, usize),
    #[serde(rename = "type")]
    pub site_type: SiteType,
    pub resource: Resource,
    pub yield_potential: YieldPotential,
    pub accessibility: Accessibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<DepthRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_size: Option<usize>,
}

impl CollectionSite {
    fn water(
        coordinates: (usize, usize),
        site_type: SiteType,
        yield_potential: YieldPotential,
        accessibility: Accessibility,
    ) -> Self {
        Self {
            coordinates,
            site_type,
            resource: Resource::Water,
            yield_potential,
            accessibility,
            depth: None,
            zone_size: None,
        }
    }

    fn ice_mining(zone: &IceZone, yield_potential: YieldPotential) -> Self {
        Self::water(
            zone.coordinates,
            SiteType::IceMining,
            yield_potential,
            Accessibility::Surface,
        )
    }

    fn surface(zone: &WaterZone, yield_potential: YieldPotential) -> Option<Self> {
        let &coordinates = zone.coordinates.first()?;
        Some(Self {
            zone_size: Some(zone.size),
            ..Self::water(
                coordinates,
                SiteType::SurfaceCollection,
                yield_potential,
                Accessibility::Surface,
            )
        })
    }
}

/// Качественная оценка доступности воды
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterAvailability {
    Abundant,
    Moderate,
    Limited,
    Scarce,
    None,
}

impl WaterAvailability {
    /// По доле точек с высоким выходом; без точек — `None`
    #[must_use]
    pub fn from_sites(sites: &[CollectionSite]) -> Self {
        if sites.is_empty() {
            return WaterAvailability::None;
        }
        let high = sites.iter().filter(|s| s.yield_potential.is_high()).count();
        let ratio = high as f64 / sites.len() as f64;

        if ratio > 0.7 {
            WaterAvailability::Abundant
        } else if ratio > 0.4 {
            WaterAvailability::Moderate
        } else if ratio > 0.1 {
            WaterAvailability::Limited
        } else {
            WaterAvailability::Scarce
        }
    }
}

/// Выбирает точки добычи в зависимости от типа планеты
#[must_use]
pub fn identify_collection_sites(
    planet_type: PlanetType,
    surface_zones: &[WaterZone],
    aquifers: &[AquiferZone],
    ice_zones: &[IceZone],
    settings: &AnalyzerSettings,
) -> Vec<CollectionSite> {
    match planet_type {
        PlanetType::Arid => {
            // Лёд и водоносные горизонты: открытой воды на таких планетах нет
            let ice = ice_zones
                .iter()
                .filter(|z| z.stability > settings.ice_mining_stability)
                .map(|z| CollectionSite::ice_mining(z, YieldPotential::High));
            let drilling = aquifers
                .iter()
                .filter(|z| z.potential > settings.aquifer_drilling_threshold)
                .map(|z| CollectionSite {
                    depth: Some(z.depth_estimate),
                    ..CollectionSite::water(
                        z.coordinates,
                        SiteType::AquiferDrilling,
                        YieldPotential::Medium,
                        Accessibility::Subsurface,
                    )
                });
            ice.chain(drilling).collect()
        }
        PlanetType::Oceanic | PlanetType::Temperate => surface_zones
            .iter()
            .filter(|z| z.size > settings.min_surface_zone_size)
            .filter_map(|z| CollectionSite::surface(z, YieldPotential::VeryHigh))
            .collect(),
        PlanetType::IceWorld => ranked_by_stability(ice_zones)
            .into_iter()
            .map(|z| {
                let yield_potential = if z.stability > settings.ice_harvest_high_stability {
                    YieldPotential::High
                } else {
                    YieldPotential::Medium
                };
                CollectionSite::water(
                    z.coordinates,
                    SiteType::IceHarvesting,
                    yield_potential,
                    Accessibility::Surface,
                )
            })
            .collect(),
        PlanetType::Unclassified => {
            let surface: Vec<_> = surface_zones
                .iter()
                .filter(|z| z.size > settings.fallback_surface_zone_size)
                .filter_map(|z| CollectionSite::surface(z, YieldPotential::High))
                .collect();
            if !surface.is_empty() {
                return surface;
            }
            ranked_by_stability(ice_zones)
                .into_iter()
                .take(settings.fallback_ice_sites)
                .map(|z| CollectionSite::ice_mining(z, YieldPotential::Medium))
                .collect()
        }
    }
}

fn ranked_by_stability(ice_zones: &[IceZone]) -> Vec<&IceZone> {
    let mut ranked: Vec<&IceZone> = ice_zones.iter().collect();
    ranked.sort_by(|a, b| b.stability.total_cmp(&a.stability));
    ranked
}
