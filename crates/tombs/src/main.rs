//! Tombs of the Ancient Kings: dungeon generator
//!
//! Builds a game session (or a single level), optionally walks down the
//! stairs a few times, and prints what the player has seen.

mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tk_core::dungeon::{Map, generate_level};
use tk_core::entity::{EntityIds, PortalKind, player};
use tk_core::geometry::Point;
use tk_core::{GenConfig, Session, StairsOutcome};

use render::render_ascii;

/// Generate and print dungeon levels
#[derive(Parser, Debug)]
#[command(name = "tombs-map")]
#[command(author, version, about = "Tombs of the Ancient Kings - dungeon generator", long_about = None)]
struct Args {
    /// Seed for the whole session (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generate a single level at this depth instead of playing a session
    #[arg(short, long, conflicts_with_all = ["descend", "save"])]
    level: Option<u32>,

    /// Map width
    #[arg(long, requires = "height")]
    width: Option<i32>,

    /// Map height
    #[arg(long, requires = "width")]
    height: Option<i32>,

    /// JSON generation config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Take the down stairs this many times
    #[arg(short, long, default_value_t = 0)]
    descend: u32,

    /// Draw the whole map, not only what the player has seen
    #[arg(short, long)]
    reveal: bool,

    /// Save the session (to the default location if no path is given)
    #[arg(long)]
    save: Option<Option<PathBuf>>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => GenConfig::load_from_file(path)?,
        None => GenConfig::default(),
    };
    if let (Some(width), Some(height)) = (args.width, args.height) {
        config.map_width = width;
        config.map_height = height;
    }
    config.validate()?;

    match args.level {
        Some(level) => print_level(&config, level, &args),
        None => run_session(config, &args),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Generate one level on its own and show it from the player's position
fn print_level(config: &GenConfig, level: u32, args: &Args) -> Result<()> {
    let mut ids = EntityIds::new();
    let hero = player(ids.allocate(), Point::default());
    let mut map = generate_level(config, level.max(1), hero.clone(), args.seed, &mut ids);

    let origin = map.object(hero.id).map_or(hero.pos, |p| p.pos);
    map.compute_fov(
        origin,
        config.torch_radius,
        config.fov_light_walls,
        config.fov_algorithm,
    );

    print_header(&map);
    print!("{}", render_ascii(&map, hero.id, args.reveal));
    Ok(())
}

fn run_session(config: GenConfig, args: &Args) -> Result<()> {
    let mut session = Session::new_game(config, args.seed)?;
    session.refresh_fov();

    for _ in 0..args.descend {
        let Some(stairs) = find_down_stairs(session.current_map()) else {
            tracing::warn!(level = session.dungeon_level(), "no stairs down");
            break;
        };
        session.player_entity_mut().pos = stairs;
        session.current_map_mut().request_fov_recompute();
        match session.try_stairs() {
            Some(StairsOutcome::Descended { generated }) => {
                tracing::debug!(map = generated.0, "descended");
            }
            outcome => tracing::warn!(?outcome, "stairs did not lead to a new level"),
        }
        session.refresh_fov();
    }
    session.fov_drawn();

    print_header(session.current_map());
    print!(
        "{}",
        render_ascii(session.current_map(), session.player, args.reveal)
    );
    for message in session.log.recent(5) {
        println!("{message}");
    }

    if let Some(path) = &args.save {
        let path = path.clone().unwrap_or_else(tk_save::default_save_path);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        tk_save::save_session(&session, &path)
            .with_context(|| format!("saving to {}", path.display()))?;
        println!("Saved to {}", path.display());
    }
    Ok(())
}

fn find_down_stairs(map: &Map) -> Option<Point> {
    map.portals()
        .find(|p| p.portal.as_ref().is_some_and(|s| s.kind == PortalKind::Down))
        .map(|p| p.pos)
}

fn print_header(map: &Map) {
    println!(
        "Level {}  seed {}  {}x{}  rooms {}  occupants {}",
        map.dungeon_level(),
        map.random_seed,
        map.width(),
        map.height(),
        map.rooms().len(),
        map.objects().len()
    );
}
