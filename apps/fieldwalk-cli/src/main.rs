use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use fieldwalk_client::{ClientError, ClientOptions, Controller};
use fieldwalk_common::TimeOfDay;
use fieldwalk_input::{Action, parse_moves};
use fieldwalk_kernel::SessionFlag;
use fieldwalk_observe::{CorridorLegend, PanelMode, predator_notices};
use fieldwalk_stream::{DataGateway, FixtureGateway, WorldFixture};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fieldwalk-cli", about = "Explore a fixture world from the terminal")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// World fixture (.yaml, .yml or .json)
    #[arg(short, long, default_value = "demos/lakeshore.yaml")]
    world: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the world summary, terrain table and god-mode legends
    Info,
    /// Replay a walk and print the map and observation panel
    Walk {
        /// Steps as w/a/s/d characters, e.g. "ddds"
        #[arg(default_value = "")]
        moves: String,
        /// Turn on god mode before walking
        #[arg(long)]
        god: bool,
        /// Show all terrain regardless of visibility
        #[arg(long)]
        all_terrain: bool,
        /// Hide the corridor overlay in god mode
        #[arg(long)]
        no_corridors: bool,
        /// Hide the full sign overlay in god mode
        #[arg(long)]
        no_signs: bool,
        /// Time of day to set before walking
        #[arg(long)]
        time: Option<TimeOfDay>,
        /// Hover the cell at this offset from the player after walking, e.g. "1,-2"
        #[arg(long, value_parser = parse_offset, allow_hyphen_values = true)]
        hover: Option<(i32, i32)>,
        /// List every species instead of the first three
        #[arg(long)]
        all_species: bool,
        /// Cells fetched on each side of the player
        #[arg(long, default_value = "25")]
        view_radius: u32,
        /// Pixels per cell in the PPM frame
        #[arg(long, default_value = "8")]
        cell_size: u32,
        /// Write the final frame as a PPM image
        #[arg(long)]
        ppm: Option<PathBuf>,
    },
}

fn parse_offset(s: &str) -> Result<(i32, i32), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected dx,dy, got {s:?}"))?;
    let parse = |v: &str| v.trim().parse::<i32>().map_err(|e| format!("{v:?}: {e}"));
    Ok((parse(dx)?, parse(dy)?))
}

fn load_gateway(path: &Path) -> anyhow::Result<FixtureGateway> {
    let fixture = WorldFixture::load(path)
        .with_context(|| format!("failed to load world fixture {}", path.display()))?;
    Ok(FixtureGateway::new(fixture)?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let gateway = load_gateway(&cli.world)?;

    match cli.command {
        Commands::Info => info(&gateway).await?,
        Commands::Walk {
            moves,
            god,
            all_terrain,
            no_corridors,
            no_signs,
            time,
            hover,
            all_species,
            view_radius,
            cell_size,
            ppm,
        } => {
            let steps = parse_moves(&moves)?;
            let panel_mode = if all_species {
                PanelMode::All
            } else {
                PanelMode::default()
            };
            let options = ClientOptions::fitted(view_radius, cell_size, panel_mode)
                .context("invalid --view-radius or --cell-size")?;
            let mut ctl = Controller::connect(gateway, options)
                .await
                .context("could not start the session")?;

            let mut actions = Vec::new();
            if let Some(time) = time {
                actions.push(Action::SetTimeOfDay(time));
            }
            for (on, flag) in [
                (god, SessionFlag::GodMode),
                (all_terrain, SessionFlag::AllTerrain),
                (no_corridors, SessionFlag::Corridors),
                (no_signs, SessionFlag::Signs),
            ] {
                if on {
                    actions.push(Action::Toggle(flag));
                }
            }
            actions.extend(steps.into_iter().map(Action::Move));

            for action in actions {
                match ctl.dispatch(action).await {
                    Ok(_) => {}
                    Err(ClientError::Fetch(error)) => {
                        tracing::warn!(%error, ?action, "update failed, keeping last frame")
                    }
                    Err(error) => return Err(error.into()),
                }
            }
            if let Some((dx, dy)) = hover {
                let view = ctl.transform();
                let point = view.center() + Vec2::new(dx as f32, dy as f32) * view.cell_size;
                ctl.dispatch(Action::Hover(point)).await?;
            }

            match ctl.text_frame() {
                Some(map) => print!("{map}"),
                None => println!("(map unavailable: last update failed)"),
            }
            if let Some(legend) = ctl.legend() {
                print!("\n{legend}");
            }
            let notices = ctl.predator_notices();
            if !notices.is_empty() {
                println!("\nPredator presence");
                for notice in notices {
                    println!("  {notice}");
                }
            }
            println!("\n{}", ctl.panel());

            let stats = ctl.stats();
            tracing::info!(
                applied = stats.applied,
                stale = stats.stale_dropped,
                failed = stats.failed,
                revealed = ctl.session().memory().len(),
                "walk finished"
            );

            if let Some(path) = ppm {
                let raster = ctl.redraw().context("no frame was rendered")?;
                let file = File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                raster.write_ppm(BufWriter::new(file))?;
                println!("Frame written to {}", path.display());
            }
        }
    }

    Ok(())
}

async fn info(gateway: &FixtureGateway) -> anyhow::Result<()> {
    let config = gateway.config().await?;
    let fixture = gateway.fixture();

    println!("fieldwalk-cli v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "World: {}x{} spawn={} radius={}",
        config.grid_cols,
        config.grid_rows,
        config.spawn(),
        config.visibility_radius
    );
    if let Some(time) = config.time_of_day {
        match &config.season {
            Some(season) => println!("Time: {time}, {season}"),
            None => println!("Time: {time}"),
        }
    }
    println!(
        "Species: {}  Sign types: {}  Signs: {}",
        fixture.species.len(),
        fixture.sign_types.len(),
        fixture.signs.len()
    );

    println!("\nTerrain");
    for (id, tile) in &config.terrain_types {
        match &tile.description {
            Some(desc) => println!("  {id:>2} {} {} - {desc}", tile.color, tile.name),
            None => println!("  {id:>2} {} {}", tile.color, tile.name),
        }
    }

    let corridors = gateway.corridors().await?;
    print!("\n{}", CorridorLegend::from_corridors(&corridors));

    let notices = predator_notices(&config);
    if !notices.is_empty() {
        println!("\nPredator presence");
        for notice in notices {
            println!("  {notice}");
        }
    }
    Ok(())
}
