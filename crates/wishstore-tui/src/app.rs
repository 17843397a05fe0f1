//! Application core: event loop, navigation, screen management, action dispatch.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use wishstore_core::{
    CoreError, ModalOutcome, Navigator, PendingTransition, StateParams, Storefront, Wish, Wishlist,
    resolve_entity,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::event::{Event, FrameRates};
use crate::record::{AnyRecord, Record};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// How long a toast stays up before the next one replaces it.
const TOAST_TTL: Duration = Duration::from_secs(3);

/// Connection status as seen by the TUI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

/// Top-level application state and event loop.
pub struct App {
    store: Storefront,
    /// Authorizes transitions and tracks the active state.
    nav: Navigator,
    /// Deep link to open once signed in.
    start_url: Option<String>,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    connection_status: ConnectionStatus,
    help_visible: bool,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
    queued: VecDeque<Notification>,
    /// Bumped on every transition so a slow resolve cannot land after a newer one.
    nav_generation: u64,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(store: Storefront, start_url: Option<String>) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(&store).into_iter().collect();

        Self {
            nav: store.navigator(),
            store,
            start_url,
            active_screen: ScreenId::default(),
            screens,
            running: true,
            connection_status: ConnectionStatus::default(),
            help_visible: false,
            notification: None,
            queued: VecDeque::new(),
            nav_generation: 0,
            action_tx,
            action_rx,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::start(FrameRates::default())?;
        self.init_screens()?;
        self.connect();
        info!("TUI event loop started");

        while self.running {
            let Some(event) = tui.next_event().await else {
                break;
            };
            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                let render = matches!(action, Action::Render);
                self.process_action(action)?;
                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        info!("TUI event loop ended");
        Ok(())
    }

    fn connect(&mut self) {
        self.connection_status = ConnectionStatus::Connecting;
        let store = self.store.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match store.connect().await {
                Ok(principal) => Action::Connected(principal),
                Err(e) => {
                    warn!(error = %e, "connection failed");
                    Action::Disconnected(e.to_string())
                }
            };
            let _ = tx.send(action);
        });
    }

    // ── Keys ────────────────────────────────────────────────────────

    /// Global keys are handled here; everything else goes to the active
    /// screen. A screen with an open overlay receives every key.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        let captured = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());

        if !captured {
            if self.help_visible {
                return match key.code {
                    KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                    _ => Ok(None),
                };
            }
            if let Some(action) = self.global_key(key) {
                return Ok(Some(action));
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn global_key(&self, key: KeyEvent) -> Option<Action> {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('?')) => Some(Action::ToggleHelp),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => c
                .to_digit(10)
                .and_then(|n| u8::try_from(n).ok())
                .and_then(ScreenId::from_number)
                .map(Action::SwitchScreen),
            (KeyModifiers::NONE, KeyCode::Tab) => {
                Some(Action::SwitchScreen(self.active_screen.next()))
            }
            (_, KeyCode::BackTab) => Some(Action::SwitchScreen(self.active_screen.prev())),
            _ => None,
        }
    }

    // ── Actions ─────────────────────────────────────────────────────

    fn process_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Tick => self.on_tick(),
            Action::Render => {}

            Action::Connected(principal) => {
                info!(login = %principal.login, "signed in");
                self.connection_status = ConnectionStatus::Connected;
                self.nav.set_principal(Some(principal));
                match self.start_url.take() {
                    Some(url) => match self.nav.go_url(&url) {
                        Ok(pending) => self.resolve(pending),
                        Err(e) => {
                            warn!(%url, error = %e, "cannot open start url");
                            self.store.alerts().error(&e);
                            self.go(&ScreenId::default().list_state(), StateParams::default());
                        }
                    },
                    None => self.go(&ScreenId::default().list_state(), StateParams::default()),
                }
            }
            Action::Disconnected(reason) => {
                self.connection_status = ConnectionStatus::Disconnected;
                self.notify(Notification::error(reason));
            }

            Action::SwitchScreen(target) => {
                if target != self.active_screen {
                    debug!("switching screen: {} → {}", self.active_screen, target);
                }
                self.go(&target.list_state(), StateParams::default());
            }
            Action::Go { state, params } => self.go(&state, params),
            Action::Resolved {
                pending,
                generation,
                result,
            } => {
                if generation != self.nav_generation {
                    debug!(state = %pending.to, "stale resolve dropped");
                    return Ok(());
                }
                match result {
                    Ok(record) => self.activate(pending, record)?,
                    Err(e) => {
                        warn!(state = %pending.to, error = %e, "resolve failed");
                        self.store.alerts().error(&e);
                    }
                }
            }
            Action::ModalExit { closed } => self.exit_modal(closed)?,

            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Notify(notification) => self.notify(notification),

            routed => self.route(routed)?,
        }
        Ok(())
    }

    /// Hand an entity-scoped action to the screen that shows the entity.
    fn route(&mut self, action: Action) -> Result<()> {
        let Some(screen_id) = action.entity().and_then(ScreenId::for_entity) else {
            warn!(?action, "no screen for action");
            return Ok(());
        };
        let Some(screen) = self.screens.get_mut(&screen_id) else {
            return Ok(());
        };
        if let Some(follow_up) = screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    // ── Navigation ──────────────────────────────────────────────────

    fn go(&mut self, state: &str, params: StateParams) {
        match self.nav.go(state, params) {
            Ok(pending) => self.resolve(pending),
            Err(e) => {
                warn!(state, error = %e, "transition refused");
                self.store.alerts().error(&e);
            }
        }
    }

    /// Run the resolve step of `pending` in the background.
    fn resolve(&mut self, pending: PendingTransition) {
        self.nav_generation += 1;
        let generation = self.nav_generation;
        let store = self.store.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = match ScreenId::for_entity(&pending.entity) {
                Some(ScreenId::Wishlists) => resolve_record::<Wishlist>(&store, &pending).await,
                Some(ScreenId::Wishes) => resolve_record::<Wish>(&store, &pending).await,
                None => Err(CoreError::UnknownState {
                    name: pending.to.clone(),
                }),
            };
            let _ = tx.send(Action::Resolved {
                pending,
                generation,
                result,
            });
        });
    }

    fn activate(&mut self, pending: PendingTransition, record: Option<AnyRecord>) -> Result<()> {
        self.nav.commit(&pending);
        if let Some(screen) = ScreenId::for_entity(&pending.entity) {
            self.switch_to(screen);
        }
        self.route(Action::Enter { pending, record })
    }

    /// Leave the active modal state for its close or dismiss target.
    fn exit_modal(&mut self, closed: bool) -> Result<()> {
        let outcome = if closed {
            ModalOutcome::Closed(())
        } else {
            ModalOutcome::Dismissed
        };
        let target = self
            .nav
            .exit_modal(&outcome)
            .and_then(|exit| Ok((self.nav.go(&exit.to, exit.params)?, exit.reload)));
        let (pending, reload) = match target {
            Ok(target) => target,
            Err(e) => {
                warn!(error = %e, "modal exit failed");
                return Ok(());
            }
        };

        self.nav_generation += 1;
        self.nav.commit(&pending);
        if let Some(screen) = ScreenId::for_entity(&pending.entity) {
            self.switch_to(screen);
        }
        self.route(Action::Return { pending, reload })
    }

    fn switch_to(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&target) {
            screen.set_focused(true);
        }
    }

    // ── Notifications ───────────────────────────────────────────────

    fn notify(&mut self, notification: Notification) {
        if self.notification.is_none() {
            self.notification = Some((notification, Instant::now()));
        } else {
            self.queued.push_back(notification);
        }
    }

    fn on_tick(&mut self) {
        for alert in self.store.alerts().drain() {
            self.notify(Notification {
                message: alert.message,
                level: alert.kind.into(),
            });
        }
        if self
            .notification
            .as_ref()
            .is_some_and(|(_, shown)| shown.elapsed() >= TOAST_TTL)
        {
            self.notification = self.queued.pop_front().map(|n| (n, Instant::now()));
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [header] [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_header(frame, layout[0]);
        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }
        self.render_tab_bar(frame, layout[2]);
        self.render_status_bar(frame, layout[3]);

        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    /// Title of the active state, its URL and the signed-in user.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = self
            .nav
            .current()
            .and_then(|s| self.store.registry().page_title(&s.name))
            .map_or_else(String::new, |key| {
                self.store.alerts().catalog().translate(key, None)
            });
        let url = self.nav.current_url().unwrap_or_default();
        let login = self
            .nav
            .principal()
            .map_or_else(|| "not signed in".to_owned(), |p| p.login.clone());

        let line = Line::from(vec![
            Span::styled(
                " wishstore ",
                theme::brand(),
            ),
            Span::styled("│ ", theme::key_hint()),
            Span::styled(title, theme::title_style()),
            Span::styled(format!("  {url}"), theme::key_hint()),
        ]);
        let user = Paragraph::new(Line::from(Span::styled(
            format!("{login} "),
            theme::principal(),
        )))
        .alignment(Alignment::Right);

        frame.render_widget(Paragraph::new(line), area);
        frame.render_widget(user, area);
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let connection_indicator = match &self.connection_status {
            ConnectionStatus::Connected => {
                Span::styled("● connected", theme::connected())
            }
            ConnectionStatus::Disconnected => {
                Span::styled("○ disconnected", theme::error_text())
            }
            ConnectionStatus::Connecting => {
                Span::styled("◐ connecting", theme::pending())
            }
        };

        let hints = Span::styled(" │ ? help  Tab switch  q quit", theme::key_hint());
        let line = Line::from(vec![Span::raw(" "), connection_indicator, hints]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

async fn resolve_record<T: Record>(
    store: &Storefront,
    pending: &PendingTransition,
) -> Result<Option<AnyRecord>, CoreError> {
    let service = store.resource::<T>();
    Ok(resolve_entity::<T, _>(&service, pending)
        .await?
        .map(T::wrap))
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_width = 56u16.min(area.width.saturating_sub(4));
    let help_height = 20u16.min(area.height.saturating_sub(4));

    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

    frame.render_widget(
        Block::default().style(theme::surface()),
        help_area,
    );

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |name: &'static str| {
        Line::from(Span::styled(format!("  {name}"), theme::heading()))
    };
    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        section("Navigation"),
        entry("1-2", "Jump to screen"),
        entry("Tab", "Next screen"),
        entry("j/k ↑/↓", "Move up/down"),
        entry("g/G", "Top / bottom"),
        entry("Enter", "View details"),
        entry("Esc", "Back / close"),
        Line::from(""),
        section("Records"),
        entry("n", "Create"),
        entry("e", "Edit"),
        entry("d", "Delete"),
        entry("r", "Reload"),
        Line::from(""),
        section("Global"),
        entry("?", "This help"),
        entry("q", "Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
#[allow(clippy::cast_possible_truncation)]
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = notif.message.chars().count().min(usize::from(u16::MAX)) as u16;
    let width = (msg_len.saturating_add(6)).clamp(20, 60).min(area.width);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (border, icon) = theme::toast(notif.level);

    frame.render_widget(
        Block::default().style(theme::surface()),
        toast_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);

    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), border),
        Span::styled(&notif.message, theme::toast_text()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use url::Url;
    use wishstore_core::{ClientConfig, Principal};

    use super::*;

    fn app() -> App {
        let config = ClientConfig::new(Url::parse("http://127.0.0.1:9/").unwrap());
        App::new(Storefront::new(config).unwrap(), None)
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn frame_shows_tabs_and_status() {
        let app = app();
        let text = screen_text(&app);
        assert!(text.contains("1 Wishlists"));
        assert!(text.contains("2 Wishes"));
        assert!(text.contains("connecting"));
        assert!(text.contains("not signed in"));
    }

    #[test]
    fn global_keys_map_to_actions() {
        let mut app = app();
        let action = app.handle_key_event(KeyEvent::from(KeyCode::Char('2'))).unwrap();
        assert!(matches!(action, Some(Action::SwitchScreen(ScreenId::Wishes))));
        let action = app.handle_key_event(KeyEvent::from(KeyCode::Tab)).unwrap();
        assert!(matches!(action, Some(Action::SwitchScreen(ScreenId::Wishes))));
        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(matches!(action, Some(Action::Quit)));
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = app();
        app.process_action(Action::ToggleHelp).unwrap();
        let action = app.handle_key_event(KeyEvent::from(KeyCode::Char('q'))).unwrap();
        assert!(action.is_none());
        let action = app.handle_key_event(KeyEvent::from(KeyCode::Esc)).unwrap();
        assert!(matches!(action, Some(Action::ToggleHelp)));
    }

    #[test]
    fn transitions_need_a_signed_in_user() {
        let mut app = app();
        app.process_action(Action::Go {
            state: "wishlist".into(),
            params: StateParams::default(),
        })
        .unwrap();
        assert_eq!(app.nav_generation, 0);
        let alerts = app.store.alerts().drain();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "Not signed in");
    }

    #[tokio::test]
    async fn stale_resolve_results_are_dropped() {
        let mut app = app();
        app.nav.set_principal(Some(Principal::new("user", &["ROLE_USER"])));
        let pending = app.nav.go("wishlist", StateParams::default()).unwrap();
        app.nav_generation = 2;

        app.process_action(Action::Resolved {
            pending: pending.clone(),
            generation: 1,
            result: Ok(None),
        })
        .unwrap();
        assert!(app.nav.current().is_none());

        app.process_action(Action::Resolved {
            pending,
            generation: 2,
            result: Ok(None),
        })
        .unwrap();
        assert_eq!(app.nav.current().unwrap().name, "wishlist");
        assert_eq!(app.active_screen, ScreenId::Wishlists);
    }

    #[test]
    fn toasts_queue_and_expire() {
        let mut app = app();
        app.notify(Notification::error("first"));
        app.notify(Notification::error("second"));
        assert_eq!(app.queued.len(), 1);

        if let Some((_, shown)) = app.notification.as_mut() {
            *shown = Instant::now().checked_sub(TOAST_TTL).unwrap();
        }
        app.on_tick();
        assert_eq!(app.notification.as_ref().unwrap().0.message, "second");
        assert!(app.queued.is_empty());
    }
}
