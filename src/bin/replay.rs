#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::io::{self, BufRead, BufReader, Write};
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, bail};
#[cfg(not(target_arch = "wasm32"))]
use blockfall::{Game, GameEvent, GameSettings, Intent};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// Plays a scripted game headlessly and prints the resulting frames.
///
/// Each script line is one of: a bound key name (`ArrowLeft`), an intent name
/// (`rotate`, `drop`, ...), `tick [n]` for gravity steps, or `wait <ms>` to run
/// the gravity clock. Blank lines and `#` comments are skipped.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
struct Opts {
    /// Settings JSON file; defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Script file; reads stdin when omitted
    #[arg(long)]
    script: Option<PathBuf>,
    /// Emit frames as JSON lines instead of text grids
    #[arg(long)]
    json: bool,
    /// Print a frame after every script line, not just at the end
    #[arg(long)]
    every: bool,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
enum Command {
    Intent(Intent),
    Tick(u32),
    Wait(u32),
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_line(line: &str, settings: &GameSettings) -> anyhow::Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default();
    let arg = parts.next();
    let cmd = match head {
        "tick" => Command::Tick(arg.map(str::parse).transpose()?.unwrap_or(1)),
        "wait" => match arg {
            Some(ms) => Command::Wait(ms.parse().with_context(|| format!("bad wait `{}`", ms))?),
            None => bail!("`wait` needs a duration in ms"),
        },
        _ => match settings.bindings.intent_for(head) {
            Some(intent) => Command::Intent(intent),
            None => Command::Intent(head.parse()?),
        },
    };
    Ok(Some(cmd))
}

#[cfg(not(target_arch = "wasm32"))]
fn print_frame(out: &mut impl Write, game: &Game, json: bool) -> anyhow::Result<()> {
    let frame = game.snapshot();
    if json {
        writeln!(out, "{}", serde_json::to_string(&frame)?)?;
    } else {
        write!(out, "{}", frame.to_text())?;
        writeln!(out, "score {} lines {}", frame.score, frame.lines)?;
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opts = Opts::parse();

    let settings = match opts.settings.as_ref() {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GameSettings::from_json(&raw)?
        }
        None => GameSettings::default(),
    };
    let mut game = Game::new(&settings);

    let input: Box<dyn BufRead> = match opts.script.as_ref() {
        Some(path) => Box::new(BufReader::new(
            fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (lineno, line) in input.lines().enumerate() {
        let line = line?;
        let Some(cmd) = parse_line(&line, &settings)
            .with_context(|| format!("line {}", lineno + 1))?
        else {
            continue;
        };
        match cmd {
            Command::Intent(intent) => {
                game.apply(intent);
            }
            Command::Tick(n) => {
                for _ in 0..n {
                    game.tick();
                }
            }
            Command::Wait(ms) => {
                game.advance(ms);
            }
        }
        for event in game.drain_events() {
            if let GameEvent::GameOver { final_score } = event {
                writeln!(out, "game over! score {}", final_score)?;
            }
        }
        if opts.every {
            print_frame(&mut out, &game, opts.json)?;
        }
    }
    if !opts.every {
        print_frame(&mut out, &game, opts.json)?;
    }
    Ok(())
}
