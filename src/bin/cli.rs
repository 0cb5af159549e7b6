use clap::{Parser, Subcommand};
use hydroterra::config::{read_json_file, write_json_file};
use hydroterra::quality::PlanetProperties;
use hydroterra::{
    EngineConfig, PlanetCharacteristics, RawTerrain, TerraformingEvent, TerrainData,
    analysis::HydrosphereAnalyzer, apply_event, assess_terrain_quality, barren, decompose_seeded,
    hydrosphere,
};
use std::path::{Path, PathBuf};

/// Разложение карт и динамическая гидросфера планет
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Сид генератора высот (перекрывает значение из конфигурации)
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Разложить сырую карту на слои и рассчитать уровень моря
    Decompose {
        /// Сырая карта в JSON (`grid`, `width`, `height`)
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, default_value = "map.json")]
        output: PathBuf,
    },
    /// Изменить объём воды на разложенной карте
    Terraform {
        /// Разложенная карта в JSON
        #[arg(short, long)]
        map: PathBuf,

        /// Изменение объёма со знаком, например 0.1 или -0.05
        #[arg(short, long, allow_hyphen_values = true)]
        delta: Option<f64>,

        /// Список событий терраформирования в JSON
        #[arg(short, long)]
        events: Option<PathBuf>,

        #[arg(short, long, default_value = "map.json")]
        output: PathBuf,
    },
    /// Проанализировать гидросферу сырой карты
    Analyze {
        #[arg(short, long)]
        input: PathBuf,

        /// Характеристики планеты в JSON
        #[arg(short, long)]
        planet: Option<PathBuf>,

        #[arg(short, long, default_value = "hydrosphere.json")]
        output: PathBuf,
    },
    /// Оценить качество разложенной карты
    Assess {
        #[arg(short, long)]
        map: PathBuf,

        /// Радиус (м) и температура поверхности (К) в JSON
        #[arg(short, long)]
        planet: Option<PathBuf>,
    },
    /// Построить безжизненную исходную карту
    Barren {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        planet: Option<PathBuf>,

        #[arg(short, long, default_value = "barren.json")]
        output: PathBuf,
    },
}

fn load_optional<T: serde::de::DeserializeOwned>(
    path: Option<&Path>,
) -> hydroterra::Result<Option<T>> {
    path.map(read_json_file).transpose()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            println!("🔍 Загрузка конфигурации...");
            EngineConfig::from_toml_file(path)?
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    match cli.command {
        Command::Decompose { input, output } => {
            let raw: RawTerrain = read_json_file(&input)?;
            println!("Разложение карты (сид: {})...", config.seed);
            let map = decompose_seeded(&raw, config.seed, &config.hydrosphere);
            println!(
                "🌊 {}×{}: вода {:.1}%, уровень моря {:.3}",
                map.width,
                map.height,
                map.water_coverage * 100.0,
                map.sea_level
            );
            write_json_file(&output, &map)?;
            println!("Сохранение в {}", output.display());
        }
        Command::Terraform {
            map,
            delta,
            events,
            output,
        } => {
            let mut decomposed: hydroterra::DecomposedMap = read_json_file(&map)?;
            if let Some(delta) = delta {
                if delta >= 0.0 {
                    hydrosphere::add_water_volume(&mut decomposed, delta, &config.hydrosphere);
                } else {
                    hydrosphere::remove_water_volume(&mut decomposed, -delta, &config.hydrosphere);
                }
            }
            let events: Vec<TerraformingEvent> =
                load_optional(events.as_deref())?.unwrap_or_default();
            for event in events {
                apply_event(&mut decomposed, event, &config.hydrosphere);
            }
            println!(
                "🌊 Объём воды {:.3}, уровень моря {:.3}, покрытие {:.1}%",
                decomposed.water_volume,
                decomposed.sea_level,
                decomposed.water_coverage * 100.0
            );
            write_json_file(&output, &decomposed)?;
            println!("Сохранение в {}", output.display());
        }
        Command::Analyze {
            input,
            planet,
            output,
        } => {
            let raw: RawTerrain = read_json_file(&input)?;
            let planet: Option<PlanetCharacteristics> = load_optional(planet.as_deref())?;
            let report = HydrosphereAnalyzer::new(config.analyzer.clone())
                .analyze(&raw.to_terrain_grid(), planet.as_ref());
            println!(
                "💧 {:?}: {} точек добычи, доступность воды {:?}",
                report.summary.planet_type,
                report.summary.viable_collection_sites,
                report.summary.water_availability
            );
            write_json_file(&output, &report)?;
            println!("Сохранение в {}", output.display());
        }
        Command::Assess { map, planet } => {
            let decomposed: hydroterra::DecomposedMap = read_json_file(&map)?;
            let planet: Option<PlanetProperties> = load_optional(planet.as_deref())?;
            let scores =
                assess_terrain_quality(&TerrainData::from_decomposed(&decomposed), planet.as_ref());
            println!("📊 Оценка качества карты:");
            println!("   реализм:        {:.2}", scores.realism);
            println!("   играбельность:  {:.2}", scores.playability);
            println!("   разнообразие:   {:.2}", scores.diversity);
            println!("   баланс:         {:.2}", scores.balance);
            println!("   итог:           {:.2}", scores.overall);
        }
        Command::Barren {
            input,
            planet,
            output,
        } => {
            let raw: RawTerrain = read_json_file(&input)?;
            let planet: Option<PlanetCharacteristics> = load_optional(planet.as_deref())?;
            let Some(result) = barren::generate_barren_terrain_with(
                &raw.to_terrain_grid(),
                planet.as_ref(),
                &config.analyzer,
            ) else {
                println!("⚠️ Пустая карта, нечего преобразовывать");
                return Ok(());
            };
            println!(
                "🏜️ {:?}: {} стратегических точек",
                result.planet_type,
                result.strategic_markers.len()
            );
            write_json_file(&output, &result)?;
            println!("Сохранение в {}", output.display());
        }
    }

    println!("\nГотово!");
    Ok(())
}
