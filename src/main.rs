use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use worktui::access::AccessLedger;
use worktui::app::{App, Exit, StartView};
use worktui::claude::ClaudeSessions;
use worktui::config::Config;
use worktui::event_loop::run_app;
use worktui::git::WorktreeManager;
use worktui::launch::{hand_off, shell_init_script, WorkingDir};
use worktui::worker::Worker;

/// Browse git worktrees and the Claude sessions inside them
#[derive(Parser)]
#[command(name = "worktui", version, about)]
struct Cli {
    /// Create (or reuse) a worktree for BRANCH, print its path and exit
    #[arg(short = 'b', long = "branch", value_name = "BRANCH")]
    branch: Option<String>,

    /// With --branch: push the branch and open a draft pull request
    #[arg(long, requires = "branch")]
    pr: bool,

    /// Enable debug logging (written to the log file while the dashboard runs)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the dashboard on the bulk cleanup screen
    Cleanup,
    /// Print a shell function that follows worktui's directory changes
    ShellInit,
}

fn main() {
    let cli = Cli::parse();

    let dashboard = cli.branch.is_none() && !matches!(cli.command, Some(Commands::ShellInit));
    init_logging(cli.verbose, dashboard);

    let result = match (&cli.command, &cli.branch) {
        (Some(Commands::ShellInit), _) => {
            print!("{}", shell_init_script());
            Ok(())
        }
        (_, Some(branch)) => create_from_cli(branch, cli.pr),
        (Some(Commands::Cleanup), None) => run_dashboard(StartView::Cleanup),
        (None, None) => run_dashboard(StartView::List),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Configure logging based on --verbose flag or RUST_LOG env var.
///
/// While the dashboard owns the terminal, records go to
/// `<data_dir>/worktui/worktui.log` instead of stderr.
fn init_logging(verbose: bool, dashboard: bool) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "off" }),
    );
    builder.format(|buf, record| {
        let thread = std::thread::current();
        writeln!(
            buf,
            "{} {:<5} [{}] {}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            record.level(),
            thread.name().unwrap_or("?"),
            record.args()
        )
    });

    let wants_logs = verbose || std::env::var_os("RUST_LOG").is_some();
    if dashboard && wants_logs {
        match log_file() {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("worktui: logging disabled: {:#}", e),
        }
    }
    builder.init();
}

fn log_file() -> Result<fs::File> {
    let dir = dirs::data_dir()
        .context("Could not find data directory")?
        .join("worktui");
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join("worktui.log");
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open {}", path.display()))
}

fn manager(config: &Config) -> Result<WorktreeManager> {
    let sessions = ClaudeSessions::new(&config.claude_dir()?);
    Ok(WorktreeManager::system(Arc::new(sessions)))
}

/// `worktui -b <branch> [--pr]`
fn create_from_cli(branch: &str, pr: bool) -> Result<()> {
    let config = Config::load()?;
    let manager = manager(&config)?;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let root = manager.resolve_root(&cwd)?;

    let created = manager.create_worktree(&root, branch)?;
    for warning in &created.warnings {
        eprintln!("warning: {}", warning);
    }
    println!("{}", created.path.display());

    if pr {
        let url = manager.create_draft_pr(&created.path, branch.trim())?;
        println!("{}", url);
    }
    Ok(())
}

fn run_dashboard(start: StartView) -> Result<()> {
    // Check if we're in a proper terminal
    if !io::stdin().is_terminal() {
        anyhow::bail!("worktui must be run in an interactive terminal");
    }

    let config = Config::load()?;
    let manager = manager(&config)?;
    let working_dir = WorkingDir::from_process()?;
    let root = match manager.resolve_root(working_dir.current()) {
        Ok(root) => Some(root),
        Err(e) => {
            log::debug!("{} is not in a repository: {}", working_dir.current().display(), e);
            None
        }
    };
    let worker = Worker::new(manager, AccessLedger::load()?);
    let mut app = App::new(
        root,
        working_dir,
        config.projects_dir()?,
        config.default_sort,
        start,
    );

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode - are you in a terminal?")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_app(&mut terminal, &mut app, &worker);

    // Restore terminal (always try to restore even on error)
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    match result? {
        Exit::Quit => Ok(()),
        Exit::Launch(target) => {
            log::info!("Handing off to {}", target.cwd().display());
            hand_off(&target, &config.assistant_command)
        }
    }
}
