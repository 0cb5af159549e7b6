use hydroterra::analysis::WaterAvailability;
use hydroterra::strategic::find_terrain_markers;
use hydroterra::{
    DecomposedMap, HydrosphereSettings, MarkerKind, RawTerrain, TerraformingEvent, TerrainCell,
    TerrainData, analyze_hydrosphere, apply_event, assess_terrain_quality, calculate_sea_level,
    decompose, decompose_seeded, find_strategic_markers, generate_barren_terrain,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn raw(rows: &[&[&str]]) -> RawTerrain {
    RawTerrain::new(
        rows.iter()
            .map(|r| r.iter().map(|s| (*s).to_string()).collect())
            .collect(),
    )
}

/// Континент в окружении океана: 12×8
fn continent() -> RawTerrain {
    let mut rows = Vec::new();
    for y in 0..8 {
        let row: Vec<String> = (0..12)
            .map(|x| {
                let tag = match (x, y) {
                    (0 | 11, _) | (_, 0 | 7) => "deep_sea",
                    (1 | 10, _) | (_, 1 | 6) => "ocean",
                    (5 | 6, 3) => "mountains",
                    (3, _) => "forest",
                    (8, _) => "tundra",
                    _ => "plains",
                };
                tag.to_string()
            })
            .collect();
        rows.push(row);
    }
    RawTerrain::new(rows)
}

#[test]
fn test_small_grid_decomposes_into_three_layers() {
    let input = raw(&[
        &["deep_sea", "coast", "plains"],
        &["grasslands", "forest", "rocky"],
        &["mountains", "tundra", "arctic"],
    ]);
    let map = decompose_seeded(&input, 7, &HydrosphereSettings::default());

    assert!(map.water_volume > 0.0);

    let json = serde_json::to_value(&map).unwrap();
    let mut keys: Vec<&str> = json["layers"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["biological", "geological", "hydrological"]);
}

#[test]
fn test_comet_impact_raises_water() {
    let settings = HydrosphereSettings::default();
    let mut map = decompose_seeded(&continent(), 3, &settings);
    map.water_volume = 0.5;
    hydroterra::update_water_bodies(&mut map, &settings);
    let before = map.sea_level;

    apply_event(&mut map, TerraformingEvent::CometImpact { volume: 0.3 }, &settings);

    assert!((map.water_volume - 0.8).abs() < 1e-9);
    assert!(map.sea_level >= before);
}

#[test]
fn test_evaporation_then_impact_restores_surface() {
    let settings = HydrosphereSettings::default();
    let original = decompose_seeded(&continent(), 11, &settings);
    let mut map = original.clone();

    apply_event(&mut map, TerraformingEvent::Evaporation { volume: 0.2 }, &settings);
    assert!(map.water_coverage <= original.water_coverage);
    apply_event(&mut map, TerraformingEvent::CometImpact { volume: 0.2 }, &settings);

    assert!((map.water_volume - original.water_volume).abs() < 1e-9);
    assert_eq!(map.terrain, original.terrain);
}

#[test]
fn test_volume_is_clamped() {
    let settings = HydrosphereSettings::default();
    let mut map = decompose_seeded(&continent(), 5, &settings);

    hydroterra::add_water_volume(&mut map, 10.0, &settings);
    assert!((map.water_volume - 1.0).abs() < f64::EPSILON);
    hydroterra::remove_water_volume(&mut map, 10.0, &settings);
    assert!(map.water_volume.abs() < f64::EPSILON);
}

#[test]
fn test_sea_level_is_monotonic_in_volume() {
    let map = decompose_seeded(&continent(), 21, &HydrosphereSettings::default());
    let levels: Vec<f64> = (0..=10)
        .map(|i| calculate_sea_level(&map, Some(f64::from(i) / 10.0)))
        .collect();
    assert!(levels.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_surface_zones_cover_open_water() {
    let map = decompose_seeded(&continent(), 13, &HydrosphereSettings::default());
    let report = analyze_hydrosphere(&map.terrain, None);

    let open_water = map
        .layers
        .hydrological
        .data
        .iter()
        .flatten()
        .filter(|c| c.is_open_water())
        .count();
    let covered: usize = report.surface_water_zones.iter().map(|z| z.size).sum();
    assert_eq!(covered, open_water);
}

#[test]
fn test_all_mountains_has_no_water() {
    let rows = vec![vec!["mountains".to_string(); 10]; 10];
    let map = decompose_seeded(&RawTerrain::new(rows), 1, &HydrosphereSettings::default());
    let report = analyze_hydrosphere(&map.base_terrain, None);

    assert!(report.surface_water_zones.is_empty());
    assert_eq!(report.summary.water_availability, WaterAvailability::None);
}

#[test]
fn test_same_seed_same_elevation() {
    let settings = HydrosphereSettings::default();
    let a = decompose(&continent(), &mut ChaCha8Rng::seed_from_u64(99), &settings);
    let b = decompose(&continent(), &mut ChaCha8Rng::seed_from_u64(99), &settings);
    assert_eq!(a.elevation, b.elevation);
}

#[test]
fn test_quality_scores_stay_in_range() {
    let settings = HydrosphereSettings::default();
    let maps = [
        DecomposedMap::default(),
        decompose_seeded(&continent(), 8, &settings),
        decompose_seeded(&raw(&[&["ocean"]]), 8, &settings),
    ];

    for map in &maps {
        let data = TerrainData::from_decomposed(map);
        let scores = assess_terrain_quality(&data, None);
        for score in [
            scores.realism,
            scores.playability,
            scores.diversity,
            scores.balance,
            scores.overall,
        ] {
            assert!((0.0..=1.0).contains(&score), "{scores:?}");
        }
    }
}

#[test]
fn test_continent_has_ports() {
    let grid = continent().to_terrain_grid();
    let markers = find_terrain_markers(&grid);
    // Западный берег: равнины x = 2 рядом с океаном x = 1
    for y in 2..6 {
        assert!(
            markers
                .iter()
                .any(|m| m.kind == MarkerKind::Port && (m.x, m.y) == (2, y))
        );
    }

    let map = decompose_seeded(&continent(), 2, &HydrosphereSettings::default());
    assert_eq!(find_strategic_markers(&map), find_terrain_markers(&map.terrain));
}

#[test]
fn test_barren_baseline_of_continent() {
    let grid = continent().to_terrain_grid();
    let barren = generate_barren_terrain(&grid, None).unwrap();

    assert_eq!((barren.width, barren.height), (12, 8));
    assert!(!barren.terrain.data.contains(&TerrainCell::Plains));
    assert!(!barren.terrain.data.contains(&TerrainCell::Forest));
    let total: usize = barren.biome_counts.values().sum();
    assert_eq!(total, 12 * 8);
}
