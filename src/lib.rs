pub mod analysis;
pub mod barren;
pub mod config;
pub mod decompose;
pub mod elevation;
pub mod error;
pub mod grid;
pub mod hydrosphere;
pub mod quality;
pub mod strategic;
pub mod terrain;

pub use analysis::{
    HydrosphereAnalyzer, HydrosphereReport, PlanetCharacteristics, PlanetType, analyze_hydrosphere,
};
pub use barren::{BarrenTerrain, generate_barren_terrain};
pub use config::{AnalyzerSettings, EngineConfig, HydrosphereSettings};
pub use decompose::{DecomposedMap, Layers, decompose, decompose_seeded};
pub use error::{Error, Result};
pub use grid::Grid;
pub use hydrosphere::{
    TerraformingEvent, add_water_volume, apply_event, calculate_sea_level, remove_water_volume,
    update_water_bodies,
};
pub use quality::{PlanetProperties, QualityScoreSet, TerrainData, assess_terrain_quality};
pub use strategic::{MarkerKind, StrategicMarker, find_strategic_markers};
pub use terrain::{Layer, RawTerrain, TerrainCell, TerrainGrid};
