mod config;
mod input;
mod renderer;
mod runner;

use std::io::BufRead;
use std::path::Path;

use clap::{Parser, ValueEnum};
use common::logger::{self, LogLevel};
use common::session::SnakeSession;
use common::snake::{BotKind, Preset};
use common::store::{MemoryProgressStore, ProgressStore, SqliteProgressStore};
use common::{log, log_error, PlayerName, SessionRng};
use tokio::sync::mpsc;

use config::{get_config_manager, Config, CONFIG_FILE};
use input::{spawn_stdin_reader, HELP};
use renderer::{StatusRenderer, TextRenderer};
use runner::run_snake_game;

#[derive(Clone, Copy, ValueEnum)]
enum BotArg {
    Greedy,
    Random,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Arcade,
    Classic,
}

#[derive(Parser)]
#[command(name = "snake_client", about = "Grid snake with saved level and score")]
struct Args {
    #[arg(long, default_value = CONFIG_FILE)]
    config: String,
    #[arg(long)]
    player: Option<String>,
    #[arg(long)]
    database: Option<String>,
    /// Keep progress in memory only.
    #[arg(long)]
    no_store: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, value_enum)]
    bot: Option<BotArg>,
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,
    /// Log score changes instead of drawing the field.
    #[arg(long)]
    no_draw: bool,
    #[arg(long)]
    use_log_prefix: bool,
    #[arg(long)]
    verbose: bool,
}

fn bot_arg_to_engine(arg: BotArg) -> BotKind {
    match arg {
        BotArg::Greedy => BotKind::Greedy,
        BotArg::Random => BotKind::Random,
    }
}

fn preset_arg_to_engine(arg: PresetArg) -> Preset {
    match arg {
        PresetArg::Arcade => Preset::Arcade,
        PresetArg::Classic => Preset::Classic,
    }
}

fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(player) = &args.player {
        config.player = Some(player.clone());
    }
    if let Some(database) = &args.database {
        config.store.database_path = database.clone();
    }
    if args.no_store {
        config.store.enabled = false;
    }
    if let Some(preset) = args.preset {
        config.game.preset = preset_arg_to_engine(preset);
        config.game.rules = None;
    }
    if let Some(bot) = args.bot {
        config.game.bot = Some(bot_arg_to_engine(bot));
    }
    if args.no_draw {
        config.display.draw_field = false;
    }
    config
}

fn open_store(config: &Config) -> Box<dyn ProgressStore + Send> {
    if !config.store.enabled {
        return Box::new(MemoryProgressStore::new());
    }
    match SqliteProgressStore::open(Path::new(&config.store.database_path)) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log_error!("{}; progress will not be saved to disk", e);
            Box::new(MemoryProgressStore::new())
        }
    }
}

fn resolve_player(config: &Config) -> Result<PlayerName, Box<dyn std::error::Error>> {
    if let Some(player) = &config.player {
        return Ok(PlayerName::parse(player)?);
    }

    let stdin = std::io::stdin();
    loop {
        println!("Enter your username:");
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Err("no username given".into());
        }
        match PlayerName::parse(&line) {
            Ok(player) => return Ok(player),
            Err(e) => println!("{}", e),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Snake".to_string())
    } else {
        None
    };
    let min_level = if args.verbose { LogLevel::Debug } else { LogLevel::Info };
    logger::init_logger(prefix, min_level);

    let config = get_config_manager(&args.config).load()?;
    let config = apply_args(config, &args);
    let player = resolve_player(&config)?;

    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    let store = open_store(&config);
    let mut session = SnakeSession::start(config.game.settings(), player, store, rng)?;

    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(command_tx)?;
    let bot = config.game.bot;
    log!("{}", HELP);

    let runtime = tokio::runtime::Runtime::new()?;
    let reason = runtime.block_on(async {
        if config.display.draw_field {
            let mut renderer = TextRenderer::new(std::io::stdout(), config.display.clear_screen);
            run_snake_game(&mut session, &mut command_rx, &mut renderer, bot, bot.is_none()).await
        } else {
            let mut renderer = StatusRenderer::default();
            run_snake_game(&mut session, &mut command_rx, &mut renderer, bot, bot.is_none()).await
        }
    });

    let state = session.state();
    log!(
        "Game over for {}: {}. Score: {}, Level: {}",
        session.player(),
        reason,
        state.score(),
        state.level()
    );

    Ok(())
}
