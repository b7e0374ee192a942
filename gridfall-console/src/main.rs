use anyhow::Result;
use colored::Colorize;
use gridfall::prelude::*;
use gridfall::{ENGINE_NAME, VERSION as LIB_VERSION};
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use tokio::sync::{broadcast, mpsc};
use tracing::info;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct CommandHighlighter;

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.green().bold();
            let colored_rest = rest.green();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.green().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    println!("{}", r"  ___  ____  __  ____  ____  __   __    __   ".cyan());
    println!("{}", r" / __)(  _ \(  )(    \(  __)/ _\ (  )  (  )  ".cyan());
    println!("{}", r"( (_ \ )   / )(  ) D ( ) _)/    \/ (_/\/ (_/\".cyan());
    println!("{}", r" \___/(__\_)(__)(____/(__) \_/\_/\____/\____/".cyan());
    let version_string = format!(
        "          Console v{:<8} Library v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );
    println!("{}", version_string);
    println!(
        "{}",
        "---------------------------------------------".dimmed()
    );
}

/// Renders the engine's collaborator calls as colored console output and
/// supplies just enough toy physics for the effects to finish.
#[derive(Debug, Default)]
struct ConsoleWorld {
    fall_steps: u8,
    decay_steps: u8,
    overflow_next: bool,
}

impl World for ConsoleWorld {
    fn set_backdrop(&mut self, backdrop: Backdrop) {
        println!("{}", format!("  · backdrop shifts to {:?}", backdrop).dimmed());
    }
    fn show(&mut self, view: View) {
        let line = match view {
            View::Menu => "==[ GRIDFALL ]== press start to begin".cyan(),
            View::Controls => "controls: x/y move, drop, eval, pause".normal(),
            View::Gameplay => "goal: overflow the grid before it decays".normal(),
            View::Lore | View::Lore2 => "long ago, the grid swallowed its makers...".normal(),
            View::Hud => "[HUD refreshed]".dimmed(),
            View::PauseOverlay => "== PAUSED ==".yellow().bold(),
            View::Stats => "==[ RUN STATS ]==".cyan().bold(),
            View::Overflow => "OVERFLOW!".green().bold(),
            View::Fail => "miss.".red(),
            View::GridRebuild => "the grid is coming apart...".magenta(),
            View::GameOver => "== RUN OVER ==".red().bold(),
            View::IntroPanel1 => "a runner drops into the grid.".normal(),
            View::IntroPanel2 => "break it before it rebuilds you.".normal(),
        };
        println!("  {}", line);
    }
    fn say(&mut self, _row: u8, line: &str) {
        if !line.is_empty() {
            println!("  {}", line.cyan());
        }
    }
    fn clear_text(&mut self) {}
    fn display_grid(&mut self, visible: bool) {
        let line = if visible { "the grid resolves into view" } else { "the grid fades out" };
        println!("{}", format!("  · {}", line).dimmed());
    }
    fn spawn_capsules(&mut self) {
        println!(
            "  two capsules hover: {} / {}",
            "blue".blue().bold(),
            "red".red().bold()
        );
    }
    fn resolve_capsule(&mut self, capsule: Capsule) {
        println!("{}", format!("  · the {:?} capsule dissolves", capsule).dimmed());
    }
    fn spawn_runner(&mut self) {
        println!("{}", "  · the runner materializes".dimmed());
    }
    fn rebuild_bit_block(&mut self) {
        println!("{}", "  · a fresh bit block assembles".dimmed());
    }
    fn rebuild_grid(&mut self) {
        println!("{}", "  · the grid reassembles, denser".dimmed());
    }
    fn begin_move(&mut self, axis: Axis) {
        println!("{}", format!("  · runner slides along {:?}", axis).dimmed());
    }
    fn update_pivot(&mut self) {}
    fn shake_bit(&mut self, _offset: i8) {}
    fn commit_frame(&mut self) {}

    fn bit_block_landed(&mut self) -> bool {
        if self.fall_steps == 0 {
            self.fall_steps = 3;
            true
        } else {
            self.fall_steps -= 1;
            false
        }
    }
    fn grid_decay_done(&mut self) -> bool {
        if self.decay_steps == 0 {
            self.decay_steps = 2;
            true
        } else {
            self.decay_steps -= 1;
            false
        }
    }
    fn move_finished(&mut self, _axis: Axis) -> bool {
        true
    }
    fn capsule_landed(&mut self, _capsule: Capsule) -> bool {
        true
    }
    fn bit_block_overflowed(&mut self) -> bool {
        self.overflow_next = !self.overflow_next;
        self.overflow_next
    }
}

/// Prints the engine notifications worth surfacing between prompts.
fn spawn_event_listener(engine: &GridfallEngine<ConsoleWorld>) {
    let mut events_rx = engine.subscribe_engine_events();
    tokio::spawn(async move {
        while let Ok(event) = events_rx.recv().await {
            match event {
                EngineEvent::GameOver { victory } => {
                    println!("\n<-- run over (victory: {victory})\n>> ");
                }
                EngineEvent::ScreenChanged { screen } => {
                    println!("\n<-- screen: {:?}\n>> ", screen);
                }
                EngineEvent::EventDropped { id } => {
                    println!("\n<-- queue full, {:?} dropped\n>> ", id);
                }
                _ => {}
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let config = GridfallConfig::load("gridfall")?;
    let engine = GridfallEngine::new(config, ConsoleWorld::default());
    spawn_event_listener(&engine);

    let (driver, commands) = TimerDriver::new(engine);
    let (shutdown_tx, _) = broadcast::channel(1);
    info!("Spawning {} in the background...", ENGINE_NAME);
    let driver_handle = tokio::spawn(driver.run(shutdown_tx.subscribe()));

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CommandHighlighter));

    println!(
        "{} is running. Type 'help' for commands or 'exit' to quit.",
        ENGINE_NAME.cyan()
    );

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        let readline = rl.readline(&prompt);
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let command = line.trim();
                let key = match command {
                    "start" => Some(KeyPress::Start),
                    "blue" => Some(KeyPress::ChooseBlue),
                    "red" => Some(KeyPress::ChooseRed),
                    "x" => Some(KeyPress::MoveX),
                    "y" => Some(KeyPress::MoveY),
                    "drop" => Some(KeyPress::Drop),
                    "eval" => Some(KeyPress::Evaluate),
                    "pause" => Some(KeyPress::Pause),
                    "resume" => Some(KeyPress::Resume),
                    "surrender" => Some(KeyPress::Surrender),
                    "status" => {
                        commands.send(DriverCommand::Status).await?;
                        None
                    }
                    "help" => {
                        println!("Available commands:");
                        println!("  start            - leave the menu, run the intro");
                        println!("  blue | red       - pick a capsule during the intro");
                        println!("  x | y            - move the runner");
                        println!("  drop             - drop the bit block");
                        println!("  eval             - evaluate the dropped block");
                        println!("  pause | resume   - suspend / continue processing");
                        println!("  surrender        - give up the run");
                        println!("  status           - log a clock/state snapshot");
                        println!("  exit             - quit the console");
                        None
                    }
                    "exit" => break,
                    "" => None,
                    other => {
                        println!("Unknown command: '{}'. Type 'help'.", other);
                        None
                    }
                };
                if let Some(key) = key {
                    commands.send(DriverCommand::Key(key)).await?;
                }
            }
            Err(_) => {
                println!("Exiting gridfall console...");
                break;
            }
        }
    }

    commands.send(DriverCommand::Shutdown).await.ok();
    shutdown_tx.send(()).ok();
    driver_handle.await??;
    Ok(())
}
