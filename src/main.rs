mod app;
mod auth;
mod config;
mod entity;
mod error;
mod event;
mod github;
mod loader;
mod summary;
#[cfg(test)]
mod test_utils;
mod ui;
mod watcher;

use app::{App, TargetSource};
use auth::ConfigTokenProvider;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::{GithubInfoError, Result};
use event::AppEvent;
use futures::StreamExt;
use github::api::GitHubApi;
use github::types::Slug;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "github-info", about = "GitHub repository summary for a catalog entity")]
struct Cli {
    #[arg(long, short, help = "Path to the entity descriptor (catalog-info.yaml)")]
    entity: Option<PathBuf>,

    #[arg(
        long,
        short,
        conflicts_with = "entity",
        help = "Show owner/repo directly instead of reading an entity"
    )]
    slug: Option<String>,

    #[arg(long, help = "Print the summary once as text instead of opening the TUI")]
    plain: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print repository metadata as JSON
    RepoInfo { slug: String },
    /// Publish a release (never a draft or prerelease)
    Release {
        slug: String,
        #[arg(long)]
        tag: String,
        #[arg(long, help = "Release title; defaults to the tag")]
        name: Option<String>,
        #[arg(long, default_value = "")]
        body: String,
    },
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.entity.clone());

    let tui = cli.command.is_none() && !cli.plain;
    init_logging(&config.log_level, tui);

    if let Some(command) = cli.command {
        if let Err(e) = run_command(&config, command).await {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    let source = match cli.slug.as_deref().map(str::parse::<Slug>).transpose() {
        Ok(Some(slug)) => TargetSource::Slug(slug),
        Ok(None) => TargetSource::Entity(config.entity_path.clone()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if cli.plain {
        if let Err(e) = run_plain(&config, &source).await {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    run_tui(config, source).await
}

fn init_logging(level: &str, to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Raw mode owns the terminal, so the TUI logs to a file.
    let writer = if to_file {
        let path = config::log_file();
        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }
        match std::fs::OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(_) => BoxMakeWriter::new(std::io::sink),
        }
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(!to_file),
        )
        .try_init();
}

async fn run_command(config: &Config, command: Command) -> Result<()> {
    let token = config.token().ok_or_else(|| {
        GithubInfoError::Auth("set GITHUB_TOKEN or github_token in config.toml".to_string())
    })?;
    let client = github::client::create_client(token, &config.api_url)?;

    match command {
        Command::RepoInfo { slug } => {
            let slug: Slug = slug.parse()?;
            let repo = github::client::get_repository_info(&client, &slug.owner, &slug.repo).await?;
            println!("{}", to_json(&repo)?);
        }
        Command::Release {
            slug,
            tag,
            name,
            body,
        } => {
            let slug: Slug = slug.parse()?;
            let name = name.unwrap_or_else(|| tag.clone());
            let release = github::client::create_release(
                &client, &slug.owner, &slug.repo, &tag, &name, &body,
            )
            .await?;
            println!("{}", to_json(&release)?);
        }
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| GithubInfoError::Config(format!("json: {e}")))
}

/// One fetch, printed as text. Entities without a slug print nothing.
async fn run_plain(config: &Config, source: &TargetSource) -> Result<()> {
    let target = source.resolve()?;
    let Some(slug) = target.slug else {
        return Ok(());
    };
    let api = GitHubApi::from_config(config)?;
    let auth = ConfigTokenProvider::from_config(config);
    let summary = api.fetch_summary(&slug, &auth).await?;
    print!("{}", ui::plain::render_plain(&summary));
    Ok(())
}

async fn run_tui(
    config: Config,
    source: TargetSource,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let refresh_secs = config.refresh_interval_secs;
    let entity_path = match &source {
        TargetSource::Entity(path) => Some(path.clone()),
        TargetSource::Slug(_) => None,
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut app = App::new(config, config::config_file(), source, tx.clone())?;

    // Install panic hook before entering raw mode so terminal is restored on panic
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    app.refresh_target();

    let mut watchers = Vec::new();
    if let Some(path) = &entity_path {
        match watcher::fs::watch_file(path, tx.clone(), || AppEvent::EntityChanged) {
            Ok(w) => watchers.push(w),
            Err(e) => tracing::warn!("cannot watch {}: {e}", path.display()),
        }
    }
    match watcher::fs::watch_file(&config::config_file(), tx.clone(), || AppEvent::ConfigChanged) {
        Ok(w) => watchers.push(w),
        Err(e) => tracing::warn!("cannot watch config file: {e}"),
    }

    let poller = (refresh_secs > 0).then(|| {
        let poll_tx = tx.clone();
        tokio::spawn(async move {
            watcher::poll::start_refresh_poller(poll_tx, refresh_secs).await;
        })
    });

    let input_tx = tx.clone();
    let input = tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            let app_event = match event {
                Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
                Event::Resize(_, _) => Some(AppEvent::Resize),
                _ => None,
            };
            if let Some(e) = app_event {
                if input_tx.send(e).is_err() {
                    break;
                }
            }
        }
    });
    drop(tx);

    loop {
        terminal.draw(|f| app.render(f))?;

        let first = match rx.recv().await {
            Some(e) => e,
            None => break,
        };

        // Editors emit bursts of file events per save; handle each kind once.
        let mut entity_changed = false;
        let mut config_changed = false;
        for event in std::iter::once(first).chain(std::iter::from_fn(|| rx.try_recv().ok())) {
            match event {
                AppEvent::EntityChanged => entity_changed = true,
                AppEvent::ConfigChanged => config_changed = true,
                other => app.handle_event(other),
            }
        }
        if config_changed {
            app.handle_event(AppEvent::ConfigChanged);
        }
        if entity_changed {
            app.handle_event(AppEvent::EntityChanged);
        }

        if app.should_quit {
            break;
        }
    }

    input.abort();
    if let Some(handle) = poller {
        handle.abort();
    }
    drop(watchers);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
