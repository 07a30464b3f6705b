use std::io;
use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossterm::cursor;
use crossterm::execute;
use crossterm::terminal;
use crossterm::terminal::ClearType;
use tracing::info;
use tracing_subscriber::EnvFilter;

use torlife::command::Command;
use torlife::command::CommandError;
use torlife::engine::Engine;
use torlife::engine::Mode;
use torlife::preset;
use torlife::screen::Screen;

/// Rows x columns of the console world.
const FIELD_HEIGHT: i64 = 20;
const FIELD_WIDTH: i64 = 60;

/// Delay between animation frames during `tick n`.
const TICK_DELAY: Duration = Duration::from_millis(40);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let mode = match (args.next(), args.next()) {
        (None, _) => Mode::Default,
        (Some(path), None) => Mode::File(PathBuf::from(path)),
        (Some(_), Some(_)) => anyhow::bail!("Too many arguments. Usage: torlife [preset-file]"),
    };

    println!("Loading...");

    let (engine, loaded) = Engine::from_mode(&mode, FIELD_HEIGHT, FIELD_WIDTH)
        .context("Failed to load initial state")?;

    if let Some(preset) = &loaded {
        info!(name = %preset.name, warnings = preset.warnings.len(), "Preset loaded");
    }

    println!("Complete.");

    let screen = Screen::new(engine.field());

    let mut app = App {
        engine,
        screen,
        preset_name: loaded.map(|p| p.name),
        last_error: None,
        show_help: false,
    };

    app.run()
}

struct App {
    engine: Engine,
    screen: Screen,

    /// Name of the loaded preset, if we started in file mode.
    preset_name: Option<String>,

    /// Last command error, shown once in the info box and then cleared.
    last_error: Option<String>,

    show_help: bool,
}

impl App {
    fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut line = String::new();

        loop {
            self.draw_frame()?;

            line.clear();
            let n = stdin.lock().read_line(&mut line).context("Failed to read input")?;
            if n == 0 {
                // stdin closed
                return Ok(());
            }

            match line.parse::<Command>() {
                Ok(Command::Tick(n)) => self.ticks(n)?,
                Ok(Command::Dump(path)) => self.dump(&path),
                Ok(Command::Help) => self.show_help = true,
                Ok(Command::Exit) => {
                    println!("Closing game.");
                    return Ok(());
                }
                Err(CommandError::Empty) => {}
                Err(e) => self.last_error = Some(e.to_string()),
            }
        }
    }

    /// Animate `n` generations, one frame per tick.
    fn ticks(&mut self, n: u32) -> anyhow::Result<()> {
        for remaining in (0..n).rev() {
            self.engine.tick();

            clear_screen()?;
            let frame = self.screen.render(self.engine.field());
            print!("{frame}");
            println!("Remained ticks = {remaining}");
            io::stdout().flush()?;

            thread::sleep(TICK_DELAY);
        }

        Ok(())
    }

    /// Write the session out in the preset format, reloadable via file mode.
    fn dump(&mut self, path: &Path) {
        let name = self.preset_name.as_deref().unwrap_or("Dump");
        let text = preset::write_state(name, self.engine.rule(), self.engine.live_cells());

        if let Err(e) = std::fs::write(path, text) {
            self.last_error = Some(format!("Failed to write {}: {e}", path.display()));
        }
    }

    fn draw_frame(&mut self) -> anyhow::Result<()> {
        clear_screen()?;

        let mut stdout = io::stdout();

        let frame = self.screen.render(self.engine.field());
        write!(stdout, "{frame}")?;

        writeln!(stdout, "[INFO]----------------------------")?;
        match &self.preset_name {
            Some(name) => writeln!(stdout, "Name: {name}")?,
            None => writeln!(stdout, "Default loaded preset")?,
        }
        writeln!(stdout, "Rule: {}", self.engine.rule())?;

        if let Some(error) = self.last_error.take() {
            writeln!(stdout, "[Error]: {error}")?;
        }

        writeln!(stdout, "[INPUT]---------------------------")?;
        if self.show_help {
            writeln!(stdout, "Type \"tick\" <n> to advance game on n ticks.")?;
            writeln!(stdout, "Type \"dump\" <file> to save state in file.")?;
            writeln!(stdout, "Type \"exit\" to end game.")?;
            self.show_help = false;
        } else {
            writeln!(stdout, "Type \"help\" to view commands.")?;
        }
        write!(stdout, "Input command: ")?;
        stdout.flush()?;

        Ok(())
    }
}

fn clear_screen() -> io::Result<()> {
    execute!(
        io::stdout(),
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )
}
