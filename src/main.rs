use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;
use puzzle_2048::{EngineConfig, GameEngine, GameState, Move};

#[derive(Debug, Parser)]
#[command(name = "puzzle-2048", about = "Play 2048 in the terminal")]
struct Args {
    /// Seed for tile spawns (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Grid side length (overrides the config file)
    #[arg(long)]
    size: Option<usize>,

    /// TOML engine config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Best score carried over from earlier sessions
    #[arg(long, default_value_t = 0)]
    best_score: u64,

    /// JSON game state: resumed at start if the file exists, written on exit
    #[arg(long)]
    state: Option<PathBuf>,

    /// Follow hints until the game ends
    #[arg(long)]
    autoplay: bool,

    /// Stop autoplay after this many moves
    #[arg(long)]
    steps: Option<u64>,

    /// Autoplay: only print the final board
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Move(Move),
    Undo,
    Hint,
    Restart,
    KeepPlaying,
    Quit,
}

const HELP: &str = "commands: w/a/s/d (or up/left/down/right), u(ndo), h(int), r(estart), k(eep playing), q(uit)";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => EngineConfig::from_toml(path).with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(size) = args.size {
        cfg.size = size;
    }
    let mut game = GameEngine::with_config(cfg, args.seed)?;
    game.set_best_score(args.best_score);

    if let Some(path) = &args.state {
        if path.exists() {
            game.restore(load_state(path)?)?;
            info!("resumed {} at move {}", path.display(), game.move_count());
        }
    }

    if args.autoplay {
        autoplay(&mut game, args.steps, args.quiet);
    } else {
        interactive(&mut game)?;
    }

    let state = game.game_state();
    println!("{}", state.grid);
    println!("Score: {} | Best: {} | Moves: {}", state.score, state.best_score, state.move_count);
    if let Some(path) = &args.state {
        save_state(path, &state)?;
        info!("saved game to {}", path.display());
    }
    Ok(())
}

fn autoplay(game: &mut GameEngine, steps: Option<u64>, quiet: bool) {
    let mut played = 0u64;
    while !game.is_game_over() {
        if steps.map_or(false, |limit| played >= limit) {
            break;
        }
        let Some(dir) = game.hint() else { break };
        game.make_move(dir);
        played += 1;
        if game.is_won() {
            info!("reached {} after {} moves", game.config().win_value, game.move_count());
            game.keep_playing();
        }
        if !quiet {
            println!("{dir}{}", game.grid());
        }
    }
}

fn interactive(game: &mut GameEngine) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    println!("{HELP}");
    print_status(game);
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let Some(cmd) = parse_command(&line) else {
            println!("{HELP}");
            continue;
        };
        match cmd {
            Command::Move(dir) => {
                if !game.make_move(dir) {
                    if game.is_game_over() {
                        println!("game over: undo or restart");
                    } else {
                        println!("nothing moves {dir}");
                    }
                    continue;
                }
            }
            Command::Undo => {
                if !game.undo() {
                    println!("nothing to undo");
                    continue;
                }
            }
            Command::Hint => {
                match game.hint() {
                    Some(dir) => println!("hint: {dir}"),
                    None => println!("no moves left"),
                }
                continue;
            }
            Command::Restart => game.restart(),
            Command::KeepPlaying => game.keep_playing(),
            Command::Quit => break,
        }
        print_status(game);
    }
    Ok(())
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim().to_ascii_lowercase().as_str() {
        "w" => Some(Command::Move(Move::Up)),
        "a" => Some(Command::Move(Move::Left)),
        "s" => Some(Command::Move(Move::Down)),
        "d" => Some(Command::Move(Move::Right)),
        "u" | "undo" => Some(Command::Undo),
        "h" | "hint" => Some(Command::Hint),
        "r" | "restart" => Some(Command::Restart),
        "k" | "keep" => Some(Command::KeepPlaying),
        "q" | "quit" => Some(Command::Quit),
        other => other.parse().ok().map(Command::Move),
    }
}

fn print_status(game: &GameEngine) {
    println!("{}", game.grid());
    println!("Score: {} | Best: {} | Moves: {}", game.score(), game.best_score(), game.move_count());
    if game.is_won() {
        println!("You reached {}! k to keep playing, r to restart.", game.config().win_value);
    }
    if game.is_game_over() {
        println!("No moves left. u to undo, r to restart.");
    }
}

fn load_state(path: &Path) -> anyhow::Result<GameState> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn save_state(path: &Path, state: &GameState) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(state)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
