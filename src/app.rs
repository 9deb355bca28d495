use crate::auth::{ConfigTokenProvider, TokenProvider};
use crate::config::Config;
use crate::entity::Entity;
use crate::error::Result;
use crate::event::AppEvent;
use crate::github::api::GitHubApi;
use crate::github::types::Slug;
use crate::loader::Loader;
use crate::summary::RepositorySummary;
use crate::ui::{
    cards::{ContributorsCard, RepositoryStatusCard},
    header_bar::HeaderBar,
    help_panel::HelpPanel,
    input::{self, Action},
    notice::{Notice, NoticeLevel},
    readme_panel::{self, ReadmePanel},
    status_bar::StatusBar,
};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub const NO_DATA: &str = "No GitHub data available";

/// Where the repository to show comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSource {
    Entity(PathBuf),
    Slug(Slug),
}

/// Entity identity plus the repository it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub entity_ref: String,
    pub slug: Option<Slug>,
}

impl TargetSource {
    pub fn resolve(&self) -> Result<Target> {
        let entity = match self {
            TargetSource::Entity(path) => Entity::load(path)?,
            TargetSource::Slug(slug) => Entity::for_slug(slug),
        };
        Ok(Target {
            entity_ref: entity.entity_ref(),
            slug: entity.project_slug()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// No project-slug annotation: nothing to show.
    Hidden,
    Empty,
    Loading,
    Failed(String),
    Loaded(Box<RepositorySummary>),
}

pub struct App {
    pub config: Config,
    config_path: PathBuf,
    pub source: TargetSource,
    pub target: Option<Target>,
    pub view: ViewState,

    api: GitHubApi,
    auth: Arc<dyn TokenProvider>,
    loader: Loader,

    pub readme_scroll: u16,
    readme_page: u16,
    readme_width: u16,
    pub show_help: bool,
    pub last_sync: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        source: TargetSource,
        tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self> {
        let api = GitHubApi::from_config(&config)?;
        let auth: Arc<dyn TokenProvider> = Arc::new(ConfigTokenProvider::from_config(&config));

        Ok(Self {
            config,
            config_path,
            source,
            target: None,
            view: ViewState::Empty,
            api,
            auth,
            loader: Loader::new(tx),
            readme_scroll: 0,
            readme_page: 10,
            readme_width: 0,
            show_help: false,
            last_sync: "never".to_string(),
            should_quit: false,
        })
    }

    /// Re-reads the entity and reloads when its identity or slug changed.
    pub fn refresh_target(&mut self) {
        match self.source.resolve() {
            Ok(target) => {
                let unchanged = self.target.as_ref() == Some(&target)
                    && !matches!(self.view, ViewState::Failed(_) | ViewState::Empty);
                if unchanged {
                    debug!(entity = %target.entity_ref, "entity unchanged");
                    return;
                }
                info!(entity = %target.entity_ref, slug = ?target.slug.as_ref().map(|s| s.to_string()), "entity target set");
                self.target = Some(target);
                self.load();
            }
            Err(e) => {
                warn!("error reading entity: {e}");
                self.loader.cancel();
                self.target = None;
                self.view = ViewState::Failed(e.to_string());
            }
        }
    }

    /// Starts a fresh load for the current target, superseding any in flight.
    pub fn load(&mut self) {
        // An unreadable entity keeps its error on screen.
        let Some(target) = self.target.as_ref() else {
            return;
        };
        let Some(slug) = target.slug.clone() else {
            self.loader.cancel();
            self.view = ViewState::Hidden;
            return;
        };
        self.view = ViewState::Loading;
        self.loader
            .start(self.api.clone(), slug, Arc::clone(&self.auth));
    }

    /// Picks up token and endpoint changes from the config file.
    pub fn reload_config(&mut self) {
        let mut fresh = Config::load_from(&self.config_path, None);
        fresh.entity_path = self.config.entity_path.clone();

        let auth_changed = fresh.token() != self.config.token();
        let endpoints_changed =
            fresh.api_url != self.config.api_url || fresh.web_url != self.config.web_url;
        if !auth_changed && !endpoints_changed {
            self.config = fresh;
            return;
        }

        match GitHubApi::from_config(&fresh) {
            Ok(api) => self.api = api,
            Err(e) => {
                self.view = ViewState::Failed(e.to_string());
                return;
            }
        }
        if auth_changed {
            info!("token provider changed");
            self.auth = Arc::new(ConfigTokenProvider::from_config(&fresh));
        }
        self.config = fresh;
        self.load();
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => {
                let action = input::map_key(key);
                self.handle_action(action);
            }
            AppEvent::EntityChanged => self.refresh_target(),
            AppEvent::ConfigChanged => self.reload_config(),
            AppEvent::Refresh => {
                if !self.loader.is_loading() {
                    self.load();
                }
            }
            AppEvent::SummaryLoaded { generation, result } => {
                self.finish_load(generation, result)
            }
            AppEvent::Resize => {}
        }
    }

    fn finish_load(&mut self, generation: u64, result: std::result::Result<Box<RepositorySummary>, String>) {
        if !self.loader.finish(generation) {
            debug!(generation, "discarding superseded load result");
            return;
        }
        match result {
            Ok(summary) => {
                self.last_sync = summary
                    .fetched_at
                    .with_timezone(&Local)
                    .format("%H:%M:%S")
                    .to_string();
                self.view = ViewState::Loaded(summary);
                self.clamp_scroll();
            }
            Err(message) => {
                self.last_sync = "failed".to_string();
                self.view = ViewState::Failed(message);
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.loader.cancel();
                self.should_quit = true;
            }
            Action::ScrollDown => self.scroll_by(1),
            Action::ScrollUp => self.scroll_by(-1),
            Action::PageDown => self.scroll_by(i32::from(self.readme_page)),
            Action::PageUp => self.scroll_by(-i32::from(self.readme_page)),
            Action::Top => self.readme_scroll = 0,
            Action::Bottom => self.readme_scroll = self.max_scroll(),
            Action::Refresh => self.load(),
            Action::Help => self.show_help = !self.show_help,
            Action::ClosePopup => self.show_help = false,
            Action::None => {}
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.readme_scroll) + delta).max(0);
        self.readme_scroll = u16::try_from(next).unwrap_or(u16::MAX);
        self.clamp_scroll();
    }

    fn max_scroll(&self) -> u16 {
        match &self.view {
            ViewState::Loaded(summary) => {
                let rows = readme_panel::rendered_height(&summary.readme, self.readme_width);
                let hidden = rows.saturating_sub(usize::from(self.readme_page));
                u16::try_from(hidden).unwrap_or(u16::MAX)
            }
            _ => 0,
        }
    }

    fn clamp_scroll(&mut self) {
        self.readme_scroll = self.readme_scroll.min(self.max_scroll());
    }

    fn title(&self) -> String {
        match &self.target {
            Some(Target { slug: Some(slug), .. }) => slug.to_string(),
            Some(target) => target.entity_ref.clone(),
            None => "no entity".to_string(),
        }
    }

    fn state_label(&self) -> &'static str {
        match &self.view {
            ViewState::Hidden => "no github.com/project-slug annotation",
            ViewState::Empty => "idle",
            ViewState::Loading => "loading\u{2026}",
            ViewState::Failed(_) => "error",
            ViewState::Loaded(_) => "ready",
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(size);

        let title = self.title();
        let description = match &self.view {
            ViewState::Loaded(summary) => summary.repository.description.as_deref(),
            _ => None,
        };
        frame.render_widget(
            HeaderBar {
                title: &title,
                description,
                last_sync: &self.last_sync,
            },
            main_chunks[0],
        );

        let body = main_chunks[1];
        let mut position = None;
        match &self.view {
            ViewState::Hidden => {}
            ViewState::Empty => frame.render_widget(
                Notice {
                    message: NO_DATA,
                    level: NoticeLevel::Warn,
                },
                body,
            ),
            ViewState::Loading => {
                let message = format!("Loading GitHub data for {title}\u{2026}");
                frame.render_widget(
                    Notice {
                        message: &message,
                        level: NoticeLevel::Info,
                    },
                    body,
                );
            }
            ViewState::Failed(message) => frame.render_widget(
                Notice {
                    message,
                    level: NoticeLevel::Error,
                },
                body,
            ),
            ViewState::Loaded(summary) => {
                let card_height = cards_height(summary);
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(card_height), Constraint::Min(3)])
                    .split(body);
                let cards = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(rows[0]);

                frame.render_widget(RepositoryStatusCard { summary }, cards[0]);
                frame.render_widget(ContributorsCard { summary }, cards[1]);
                frame.render_widget(
                    ReadmePanel {
                        readme: &summary.readme,
                        scroll: self.readme_scroll,
                    },
                    rows[1],
                );
                self.readme_page = rows[1].height.saturating_sub(2).max(1);
                self.readme_width = rows[1].width.saturating_sub(2);
                let total = readme_panel::rendered_height(&summary.readme, self.readme_width);
                position = Some(format!(
                    "README {}/{}",
                    self.readme_scroll + 1,
                    total.max(1)
                ));
            }
        }

        let entity_ref = self
            .target
            .as_ref()
            .map(|t| t.entity_ref.as_str())
            .unwrap_or("-");
        frame.render_widget(
            StatusBar {
                entity_ref,
                state: self.state_label(),
                detail: position.as_deref(),
            },
            main_chunks[2],
        );

        if self.show_help {
            frame.render_widget(HelpPanel, size);
        }
    }
}

fn cards_height(summary: &RepositorySummary) -> u16 {
    let contributor_lines = match summary.last_commit {
        None => 1,
        Some(_) if summary.shows_other_contributors() => {
            4 + summary.other_contributors().len()
        }
        Some(_) => 2,
    };
    let lines = contributor_lines.max(5) + 2;
    u16::try_from(lines).unwrap_or(u16::MAX).min(16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn test_config() -> Config {
        Config {
            github_token: Some("ghp_test".to_string()),
            api_url: "http://127.0.0.1:1".to_string(),
            ..Config::default()
        }
    }

    fn app_for(source: TargetSource) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dir = std::env::temp_dir().join("github-info-missing-config.toml");
        let app = App::new(test_config(), dir, source, tx).unwrap();
        (app, rx)
    }

    fn slug_app() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        app_for(TargetSource::Slug("octo/repo".parse().unwrap()))
    }

    fn render_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        buffer_lines(terminal.backend().buffer()).join("\n")
    }

    fn deliver(app: &mut App, result: std::result::Result<RepositorySummary, String>) {
        let generation = app.loader.generation();
        app.handle_event(AppEvent::SummaryLoaded {
            generation,
            result: result.map(Box::new),
        });
    }

    #[tokio::test]
    async fn slug_target_starts_loading() {
        let (mut app, _rx) = slug_app();
        app.refresh_target();
        assert_eq!(app.view, ViewState::Loading);
        assert_eq!(app.target.as_ref().unwrap().entity_ref, "component:default/repo");
        assert!(render_text(&mut app).contains("Loading GitHub data for octo/repo"));
    }

    #[tokio::test]
    async fn entity_without_annotation_is_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog-info.yaml");
        std::fs::write(&path, "kind: Component\nmetadata:\n  name: web\n").unwrap();

        let (mut app, _rx) = app_for(TargetSource::Entity(path));
        app.refresh_target();
        assert_eq!(app.view, ViewState::Hidden);
        assert!(!app.loader.is_loading());
    }

    #[tokio::test]
    async fn loaded_summary_is_rendered() {
        let (mut app, _rx) = slug_app();
        app.refresh_target();
        deliver(&mut app, Ok(make_summary(Some("alice"), &[("alice", 1), ("bob", 3)])));

        assert!(matches!(app.view, ViewState::Loaded(_)));
        assert_ne!(app.last_sync, "never");
        let text = render_text(&mut app);
        assert!(text.contains("Repository Status"));
        assert!(text.contains("Open Issues: 3"));
        assert!(text.contains("bob (3 commits in the last 30 days)"));
        assert!(text.contains("README"));
        assert!(text.contains("Hello."));
    }

    #[tokio::test]
    async fn failure_is_rendered_as_error() {
        let (mut app, _rx) = slug_app();
        app.refresh_target();
        deliver(&mut app, Err("Failed to fetch issues (HTTP 404 Not Found)".to_string()));

        assert_eq!(
            app.view,
            ViewState::Failed("Failed to fetch issues (HTTP 404 Not Found)".to_string())
        );
        assert!(render_text(&mut app).contains("Failed to fetch issues"));
    }

    #[tokio::test]
    async fn superseded_result_is_discarded() {
        let (mut app, _rx) = slug_app();
        app.refresh_target();
        let stale = app.loader.generation();
        app.handle_event(AppEvent::Key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE)));
        assert!(app.loader.generation() > stale);

        app.handle_event(AppEvent::SummaryLoaded {
            generation: stale,
            result: Ok(Box::new(make_summary(None, &[]))),
        });
        assert_eq!(app.view, ViewState::Loading);
    }

    #[tokio::test]
    async fn entity_slug_change_triggers_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog-info.yaml");
        let descriptor = |slug: &str| {
            format!(
                "kind: Component\nmetadata:\n  name: web\n  annotations:\n    github.com/project-slug: {slug}\n"
            )
        };
        std::fs::write(&path, descriptor("octo/one")).unwrap();

        let (mut app, _rx) = app_for(TargetSource::Entity(path.clone()));
        app.refresh_target();
        deliver(&mut app, Ok(make_summary(None, &[])));
        let before = app.loader.generation();

        app.handle_event(AppEvent::EntityChanged);
        assert_eq!(app.loader.generation(), before, "unchanged entity must not refetch");

        std::fs::write(&path, descriptor("octo/two")).unwrap();
        app.handle_event(AppEvent::EntityChanged);
        assert_eq!(app.loader.generation(), before + 1);
        assert_eq!(app.view, ViewState::Loading);
        assert_eq!(app.title(), "octo/two");
    }

    #[tokio::test]
    async fn removing_annotation_cancels_and_hides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog-info.yaml");
        std::fs::write(
            &path,
            "kind: Component\nmetadata:\n  name: web\n  annotations:\n    github.com/project-slug: octo/one\n",
        )
        .unwrap();
        let (mut app, _rx) = app_for(TargetSource::Entity(path.clone()));
        app.refresh_target();
        assert!(app.loader.is_loading());

        std::fs::write(&path, "kind: Component\nmetadata:\n  name: web\n").unwrap();
        app.handle_event(AppEvent::EntityChanged);
        assert_eq!(app.view, ViewState::Hidden);
        assert!(!app.loader.is_loading());
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn summary_with_readme(readme: String) -> RepositorySummary {
        let mut summary = make_summary(None, &[]);
        summary.readme = readme;
        summary
    }

    #[tokio::test]
    async fn readme_scroll_is_clamped() {
        let (mut app, _rx) = slug_app();
        app.refresh_target();
        let readme: Vec<String> = (1..=40).map(|i| format!("line {i}")).collect();
        deliver(&mut app, Ok(summary_with_readme(readme.join("\n\n"))));
        render_text(&mut app);

        for _ in 0..100 {
            press(&mut app, KeyCode::Char('j'));
        }
        // 79 rows (40 lines plus gaps) in a 19-row panel
        assert_eq!(app.readme_scroll, 60);
        let text = render_text(&mut app);
        assert!(text.contains("line 40"));
        assert!(text.contains("README 61/79"));

        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.readme_scroll, 0);
    }

    #[tokio::test]
    async fn bottom_key_reaches_end_of_wrapped_readme() {
        let (mut app, _rx) = slug_app();
        app.refresh_target();
        let mut paragraphs: Vec<String> = (0..10)
            .map(|_| "lorem ipsum dolor sit amet ".repeat(15))
            .collect();
        paragraphs.push("ENDMARK".to_string());
        deliver(&mut app, Ok(summary_with_readme(paragraphs.join("\n\n"))));

        assert!(!render_text(&mut app).contains("ENDMARK"));
        press(&mut app, KeyCode::Char('G'));
        assert!(app.readme_scroll > 10);
        assert!(render_text(&mut app).contains("ENDMARK"));
    }

    #[tokio::test]
    async fn entity_error_survives_reload_requests() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog-info.yaml");
        std::fs::write(&path, "kind: [unclosed\n").unwrap();

        let (mut app, _rx) = app_for(TargetSource::Entity(path));
        app.refresh_target();
        assert!(matches!(app.view, ViewState::Failed(_)));

        app.handle_event(AppEvent::Refresh);
        press(&mut app, KeyCode::Char('r'));
        assert!(matches!(app.view, ViewState::Failed(_)));
        assert!(!app.loader.is_loading());
    }

    #[tokio::test]
    async fn quit_key_stops_the_app() {
        let (mut app, _rx) = slug_app();
        app.refresh_target();
        app.handle_event(AppEvent::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(app.should_quit);
        assert!(!app.loader.is_loading());
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn config_token_change_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "github_token = \"ghp_rotated\"\napi_url = \"http://127.0.0.1:1\"\n",
        )
        .unwrap();

        std::env::remove_var("GITHUB_TOKEN");
        std::env::remove_var("GITHUB_INFO_GITHUB_TOKEN");

        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            test_config(),
            config_path,
            TargetSource::Slug("octo/repo".parse().unwrap()),
            tx,
        )
        .unwrap();
        app.refresh_target();
        let before = app.loader.generation();

        app.handle_event(AppEvent::ConfigChanged);
        assert_eq!(app.config.token(), Some("ghp_rotated"));
        assert_eq!(app.loader.generation(), before + 1);
    }
}
