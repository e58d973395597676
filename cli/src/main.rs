use chandec_common::db::core::LayoutDb;
use chandec_common::geom::rect::Rect;
use chandec_common::util::config::Config;
use chandec_common::util::{generator, logger, visualization};
use chandec_router::channel_map::ChannelMap;
use chandec_router::decompose::{self, verify};
use chandec_router::grid::RouteGrid;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Decompose,
    Generate {
        #[arg(long, default_value_t = 20)]
        macros: usize,
        #[arg(long, default_value = "inputs/random.def")]
        output: String,
        #[arg(long, default_value = "inputs/random.lef")]
        lef: String,
    },
}

/// What the report records for each channel.
#[derive(Debug)]
struct ChannelInfo {
    area: Rect,
    columns: u32,
    rows: u32,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    match args.command.unwrap_or(Commands::Decompose) {
        Commands::Generate {
            macros,
            output,
            lef,
        } => {
            prepare_output_dir(&output)?;
            prepare_output_dir(&lef)?;
            log::info!("Generating random macro benchmark ({} macros)...", macros);
            generator::generate_random_macros(&output, &lef, macros)?;
            log::info!("Generated: {} and {}", output, lef);
        }
        Commands::Decompose => {
            validate_input_paths(&config)?;
            prepare_output_dir(&config.output.report)?;
            prepare_output_dir(&config.output.image)?;

            if let Err(e) = run_decomposition(&config) {
                log::error!("{:#}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn validate_input_paths(config: &Config) -> anyhow::Result<()> {
    for lef in &config.input.lef_files {
        if !Path::new(lef).exists() {
            return Err(anyhow::anyhow!("Input LEF file missing: {}", lef));
        }
    }
    if !Path::new(&config.input.def_file).exists() {
        return Err(anyhow::anyhow!(
            "Input DEF file missing: {}",
            config.input.def_file
        ));
    }
    Ok(())
}

fn prepare_output_dir(path_str: &str) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(path_str).parent()
        && !parent.exists()
        && !parent.as_os_str().is_empty()
    {
        log::info!("Creating output directory: {:?}", parent);
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn run_decomposition(config: &Config) -> anyhow::Result<()> {
    let mut db = LayoutDb::new();

    for lef_path in &config.input.lef_files {
        log::info!("Parsing LEF: {}", lef_path);
        chandec_common::db::parser::lef::parse(&mut db, lef_path)
            .map_err(|e| anyhow::anyhow!("Invalid LEF syntax in '{}': {:#}", lef_path, e))?;
    }

    let def_path = &config.input.def_file;
    log::info!("Parsing DEF: {}", def_path);
    let top = chandec_common::db::parser::def::parse(&mut db, def_path)
        .map_err(|e| anyhow::anyhow!("Invalid DEF syntax in '{}': {:#}", def_path, e))?;
    log::info!(
        "Design '{}': {} sub-cell uses, bbox {:?}",
        db.def(top).name,
        db.def(top).uses.len(),
        db.def(top).bbox
    );

    let settings = &config.decompose;
    let mut channels: ChannelMap<ChannelInfo> = ChannelMap::new();
    let Some((result, area)) =
        chandec_router::decompose_cell(&mut db, top, settings, &mut channels)
    else {
        return Err(anyhow::anyhow!("Routing area has no usable extent"));
    };

    let planes = db
        .def(result)
        .planes
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Channel cell has no planes"))?;

    if settings.verify {
        verify::verify(&planes.check, &planes.result, area)
            .map_err(|e| anyhow::anyhow!("Verification Failed: {}", e))?;
    }

    let grid = RouteGrid::from_config(settings);
    for (id, rect) in decompose::channels_in(&planes.result, area) {
        let (columns, rows) = grid.tracks(rect);
        channels.insert(
            id,
            ChannelInfo {
                area: rect,
                columns,
                rows,
            },
        );
    }

    log::info!("Writing channel report to {}", config.output.report);
    write_report(&channels, area, &config.output.report)?;

    log::info!("Generating channel visualization...");
    visualization::draw_channels(
        &planes.result,
        area,
        &config.output.image,
        config.output.image_size,
        config.output.image_size,
    )?;

    Ok(())
}

fn write_report(
    channels: &ChannelMap<ChannelInfo>,
    area: Rect,
    filename: &str,
) -> std::io::Result<()> {
    let mut rows: Vec<&ChannelInfo> = channels.iter().map(|(_, info)| info).collect();
    rows.sort_by_key(|c| (c.area.bottom(), c.area.left()));

    let mut file = std::io::BufWriter::new(std::fs::File::create(filename)?);
    writeln!(
        file,
        "AREA ( {} {} ) ( {} {} ) ;",
        area.left(),
        area.bottom(),
        area.right(),
        area.top()
    )?;
    writeln!(file, "CHANNELS {} ;", rows.len())?;
    for (i, c) in rows.iter().enumerate() {
        writeln!(
            file,
            "- ch{} ( {} {} ) ( {} {} ) + TRACKS {} {} ;",
            i,
            c.area.left(),
            c.area.bottom(),
            c.area.right(),
            c.area.top(),
            c.columns,
            c.rows
        )?;
    }
    writeln!(file, "END CHANNELS")?;
    file.flush()
}
