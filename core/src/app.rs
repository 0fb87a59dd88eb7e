/// App shell: routing, event loop, background fetches
///
/// The UI thread never blocks on I/O. Every fetch runs as a spawned task
/// that posts its outcome into an mpsc channel drained by the event loop.
/// Tasks carry the navigation generation current when they were spawned;
/// results from an older generation are dropped on receipt, which closes
/// the late-response race the per-view busy flags alone cannot. There is no
/// shared cache between views — navigating to a view always refetches.
use crate::error::ClientError;
use crate::host::HostContext;
use crate::inbox;
use crate::services::Services;
use crate::types::{AttentionListing, Client, Integration, Message};
use crate::views::automation::AutomationData;
use crate::views::chat::ChatData;
use crate::views::dashboard::DashboardData;
use crate::views::messages::InboxData;
use crate::views::{
    AttentionView, AutomationView, ChatView, ClientsView, DashboardView, IntegrationsView,
    MessagesView, Route, Theme,
};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

const RECENT_CHATS_LIMIT: u32 = 5;
const INBOX_LIMIT: u32 = 100;

fn err_text(e: ClientError) -> String {
    e.to_string()
}

/// Results posted back by fetch tasks
pub enum AppMessage {
    DashboardLoaded { gen: u64, result: Result<DashboardData, String> },
    ClientsLoaded { gen: u64, result: Result<Vec<Client>, String> },
    InboxLoaded { gen: u64, result: Result<InboxData, String> },
    SearchLoaded { gen: u64, result: Result<Vec<Message>, String> },
    ChatLoaded { gen: u64, result: Result<ChatData, String> },
    MessageSent { gen: u64, result: Result<Message, String> },
    SuggestionsLoaded { gen: u64, result: Result<Vec<String>, String> },
    AttentionLoaded { gen: u64, result: Result<Vec<AttentionListing>, String> },
    AutomationLoaded { gen: u64, result: Result<AutomationData, String> },
    IntegrationsLoaded { gen: u64, result: Result<Vec<Integration>, String> },
    /// Outcome of a side-effecting action. `reload` refetches the current
    /// view; `goto` navigates on success (e.g. close from the chat header).
    ActionDone {
        gen: u64,
        result: Result<String, String>,
        reload: bool,
        goto: Option<Route>,
    },
}

impl AppMessage {
    fn generation(&self) -> u64 {
        match self {
            AppMessage::DashboardLoaded { gen, .. }
            | AppMessage::ClientsLoaded { gen, .. }
            | AppMessage::InboxLoaded { gen, .. }
            | AppMessage::SearchLoaded { gen, .. }
            | AppMessage::ChatLoaded { gen, .. }
            | AppMessage::MessageSent { gen, .. }
            | AppMessage::SuggestionsLoaded { gen, .. }
            | AppMessage::AttentionLoaded { gen, .. }
            | AppMessage::AutomationLoaded { gen, .. }
            | AppMessage::IntegrationsLoaded { gen, .. }
            | AppMessage::ActionDone { gen, .. } => *gen,
        }
    }
}

pub struct App {
    services: Arc<Services>,
    tx: mpsc::UnboundedSender<AppMessage>,
    theme: Theme,
    greeting: String,

    route: Route,
    /// Bumped on every navigation; stale task results are discarded
    generation: u64,
    /// Gates call/close while one is in flight
    action_busy: bool,
    pub should_quit: bool,

    dashboard: DashboardView,
    clients: ClientsView,
    inbox: MessagesView,
    chat: Option<ChatView>,
    attention: AttentionView,
    automation: AutomationView,
    integrations: IntegrationsView,
}

impl App {
    pub fn new(
        services: Arc<Services>,
        host: &HostContext,
        tx: mpsc::UnboundedSender<AppMessage>,
    ) -> Self {
        Self {
            services,
            tx,
            theme: Theme::from_scheme(host.color_scheme),
            greeting: format!("Welcome, {}", host.display_name()),
            route: Route::Dashboard,
            generation: 0,
            action_busy: false,
            should_quit: false,
            dashboard: DashboardView::new(),
            clients: ClientsView::new(),
            inbox: MessagesView::new(),
            chat: None,
            attention: AttentionView::new(),
            automation: AutomationView::new(),
            integrations: IntegrationsView::new(),
        }
    }

    // ─── Navigation ──────────────────────────────────────────────────────────

    pub fn navigate(&mut self, route: Route) {
        self.generation += 1;
        self.action_busy = false;
        self.route = route.clone();
        match route {
            Route::Dashboard => {
                self.dashboard = DashboardView::new();
                self.load_dashboard();
            }
            Route::Clients => {
                // Filters survive reload; data does not
                self.clients.state = crate::views::ViewState::Loading;
                self.clients.selected = 0;
                self.load_clients();
            }
            Route::Messages => {
                self.inbox = MessagesView::new();
                self.load_inbox();
            }
            Route::Attention => {
                self.attention = AttentionView::new();
                self.load_attention();
            }
            Route::Automation => {
                self.automation = AutomationView::new();
                self.load_automation();
            }
            Route::Integrations => {
                self.integrations = IntegrationsView::new();
                self.load_integrations();
            }
            Route::Chat(client_id) => {
                self.chat = Some(ChatView::new(client_id));
                self.load_chat();
            }
        }
    }

    fn reload_current(&mut self) {
        self.navigate(self.route.clone());
    }

    // ─── Fetch tasks ─────────────────────────────────────────────────────────

    fn load_dashboard(&mut self) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let (stats, recent, summary) = tokio::join!(
                services.clients.dashboard_stats(),
                services.clients.recent(RECENT_CHATS_LIMIT),
                services.attention.summary(),
            );
            let result: Result<DashboardData, String> = (|| {
                Ok(DashboardData {
                    stats: stats.map_err(err_text)?,
                    recent: recent.map_err(err_text)?,
                    summary: summary.map_err(err_text)?,
                })
            })();
            let _ = tx.send(AppMessage::DashboardLoaded { gen, result });
        });
    }

    fn load_clients(&mut self) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        let status = self.clients.status_filter;
        let source = self.clients.source_filter;
        tokio::spawn(async move {
            let result = services
                .clients
                .list(status, source, None)
                .await
                .map_err(err_text);
            let _ = tx.send(AppMessage::ClientsLoaded { gen, result });
        });
    }

    fn load_inbox(&mut self) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let result = load_inbox_data(&services).await;
            let _ = tx.send(AppMessage::InboxLoaded { gen, result });
        });
    }

    fn load_attention(&mut self) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let result = services.attention.listings().await.map_err(err_text);
            let _ = tx.send(AppMessage::AttentionLoaded { gen, result });
        });
    }

    fn load_automation(&mut self) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let (automations, templates) =
                tokio::join!(services.automation.list(), services.automation.templates());
            let result: Result<AutomationData, String> = (|| {
                Ok(AutomationData {
                    automations: automations.map_err(err_text)?,
                    templates: templates.map_err(err_text)?,
                })
            })();
            let _ = tx.send(AppMessage::AutomationLoaded { gen, result });
        });
    }

    fn load_integrations(&mut self) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let result = services.integrations.list().await.map_err(err_text);
            let _ = tx.send(AppMessage::IntegrationsLoaded { gen, result });
        });
    }

    fn load_chat(&mut self) {
        let client_id = match &self.chat {
            Some(chat) => chat.client_id.clone(),
            None => return,
        };
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            // Client and thread load concurrently
            let (client, messages) = tokio::join!(
                services.clients.get(&client_id),
                services.messages.for_client(&client_id, None),
            );
            let result: Result<ChatData, String> = (|| {
                Ok(ChatData {
                    client: client.map_err(err_text)?,
                    messages: messages.map_err(err_text)?,
                })
            })();
            let _ = tx.send(AppMessage::ChatLoaded { gen, result });
        });
    }

    fn search_inbox(&mut self, query: String) {
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let result = services
                .messages
                .search(&query, None)
                .await
                .map_err(err_text);
            let _ = tx.send(AppMessage::SearchLoaded { gen, result });
        });
    }

    fn send_chat_message(&mut self, content: String) {
        let client_id = match &self.chat {
            Some(chat) => chat.client_id.clone(),
            None => return,
        };
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let result = services
                .messages
                .respond(&client_id, &content)
                .await
                .map_err(err_text);
            let _ = tx.send(AppMessage::MessageSent { gen, result });
        });
    }

    fn fetch_suggestions(&mut self, history: Vec<String>) {
        let client_id = match &self.chat {
            Some(chat) => chat.client_id.clone(),
            None => return,
        };
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let result = services
                .ai
                .suggest_response(&client_id, &history)
                .await
                .map(|r| r.suggestions)
                .map_err(err_text);
            let _ = tx.send(AppMessage::SuggestionsLoaded { gen, result });
        });
    }

    fn call_client(&mut self, client_id: String) {
        if self.action_busy {
            return;
        }
        self.action_busy = true;
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let result = services
                .clients
                .call(&client_id)
                .await
                .map(|ack| ack.message)
                .map_err(err_text);
            let _ = tx.send(AppMessage::ActionDone {
                gen,
                result,
                reload: false,
                goto: None,
            });
        });
    }

    fn close_client(&mut self, client_id: String, goto: Option<Route>) {
        if self.action_busy {
            return;
        }
        self.action_busy = true;
        let services = self.services.clone();
        let tx = self.tx.clone();
        let gen = self.generation;
        tokio::spawn(async move {
            let result = services
                .clients
                .close(&client_id)
                .await
                .map(|ack| ack.message)
                .map_err(err_text);
            let _ = tx.send(AppMessage::ActionDone {
                gen,
                result,
                reload: true,
                goto,
            });
        });
    }

    // ─── Message handling ────────────────────────────────────────────────────

    pub fn on_message(&mut self, msg: AppMessage) {
        if msg.generation() != self.generation {
            // Response from a view the user already left
            debug!("dropping late response (gen {})", msg.generation());
            return;
        }
        match msg {
            AppMessage::DashboardLoaded { result, .. } => self.dashboard.on_loaded(result),
            AppMessage::ClientsLoaded { result, .. } => self.clients.on_loaded(result),
            AppMessage::InboxLoaded { result, .. } => self.inbox.on_loaded(result),
            AppMessage::SearchLoaded { result, .. } => self.inbox.on_search_results(result),
            AppMessage::ChatLoaded { result, .. } => {
                if let Some(chat) = &mut self.chat {
                    chat.on_loaded(result);
                }
            }
            AppMessage::MessageSent { result, .. } => {
                if let Some(chat) = &mut self.chat {
                    match result {
                        Ok(message) => chat.on_send_ok(message),
                        Err(e) => chat.on_send_err(e),
                    }
                }
            }
            AppMessage::SuggestionsLoaded { result, .. } => {
                if let Some(chat) = &mut self.chat {
                    chat.on_suggestions(result);
                }
            }
            AppMessage::AttentionLoaded { result, .. } => self.attention.on_loaded(result),
            AppMessage::AutomationLoaded { result, .. } => self.automation.on_loaded(result),
            AppMessage::IntegrationsLoaded { result, .. } => self.integrations.on_loaded(result),
            AppMessage::ActionDone {
                result,
                reload,
                goto,
                ..
            } => {
                self.action_busy = false;
                match result {
                    Ok(message) => {
                        if let Some(route) = goto {
                            self.navigate(route);
                        } else if reload {
                            self.reload_current();
                        }
                        self.set_notice(message);
                    }
                    Err(e) => self.set_notice(format!("Action failed: {}", e)),
                }
            }
        }
    }

    /// Blocking acknowledgment on the active view
    fn set_notice(&mut self, message: String) {
        match &self.route {
            Route::Dashboard => self.dashboard.notice = Some(message),
            Route::Clients => self.clients.notice = Some(message),
            Route::Automation => self.automation.on_action_done(Ok(message)),
            Route::Integrations => self.integrations.on_test_done(Ok(message)),
            Route::Chat(_) => {
                if let Some(chat) = &mut self.chat {
                    chat.notice = Some(message);
                }
            }
            _ => {}
        }
    }

    fn clear_notice(&mut self) {
        self.dashboard.notice = None;
        self.clients.notice = None;
        self.automation.notice = None;
        self.integrations.notice = None;
        if let Some(chat) = &mut self.chat {
            chat.notice = None;
        }
    }

    // ─── Key handling ────────────────────────────────────────────────────────

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Text-entry contexts capture plain characters
        let typing = match &self.route {
            Route::Clients => self.clients.search_active,
            Route::Messages => self.inbox.search_active,
            Route::Chat(_) => true,
            _ => false,
        };

        if !typing {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('1') => return self.navigate(Route::Dashboard),
                KeyCode::Char('2') => return self.navigate(Route::Clients),
                KeyCode::Char('3') => return self.navigate(Route::Messages),
                KeyCode::Char('4') => return self.navigate(Route::Attention),
                KeyCode::Char('5') => return self.navigate(Route::Automation),
                KeyCode::Char('6') => return self.navigate(Route::Integrations),
                KeyCode::Char('r') => return self.reload_current(),
                _ => {}
            }
        }

        match self.route.clone() {
            Route::Dashboard => self.handle_dashboard_key(key),
            Route::Clients => self.handle_clients_key(key),
            Route::Messages => self.handle_messages_key(key),
            Route::Attention => self.handle_attention_key(key),
            Route::Automation => self.handle_automation_key(key),
            Route::Integrations => self.handle_integrations_key(key),
            Route::Chat(_) => self.handle_chat_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.dashboard.move_selection(-1),
            KeyCode::Down => self.dashboard.move_selection(1),
            KeyCode::Enter => {
                if let Some(client) = self.dashboard.selected_client() {
                    let id = client.id.clone();
                    self.navigate(Route::Chat(id));
                }
            }
            KeyCode::Char('c') => {
                if let Some(client) = self.dashboard.selected_client() {
                    let id = client.id.clone();
                    self.call_client(id);
                }
            }
            KeyCode::Char('x') => {
                if let Some(client) = self.dashboard.selected_client() {
                    let id = client.id.clone();
                    self.close_client(id, None);
                }
            }
            KeyCode::Esc => self.clear_notice(),
            _ => {}
        }
    }

    fn handle_clients_key(&mut self, key: KeyEvent) {
        if self.clients.search_active {
            match key.code {
                KeyCode::Esc => self.clients.search_active = false,
                KeyCode::Enter => self.clients.search_active = false,
                KeyCode::Backspace => self.clients.backspace(),
                KeyCode::Char(c) => self.clients.input_char(c),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('/') => self.clients.search_active = true,
            KeyCode::Char('s') => {
                if self.clients.cycle_status_filter() {
                    self.generation += 1;
                    self.clients.state = crate::views::ViewState::Loading;
                    self.load_clients();
                }
            }
            KeyCode::Char('o') => {
                if self.clients.cycle_source_filter() {
                    self.generation += 1;
                    self.clients.state = crate::views::ViewState::Loading;
                    self.load_clients();
                }
            }
            KeyCode::Up => self.clients.move_selection(-1),
            KeyCode::Down => self.clients.move_selection(1),
            KeyCode::Enter => {
                if let Some(client) = self.clients.selected_client() {
                    let id = client.id.clone();
                    self.navigate(Route::Chat(id));
                }
            }
            KeyCode::Char('c') => {
                if let Some(client) = self.clients.selected_client() {
                    let id = client.id.clone();
                    self.call_client(id);
                }
            }
            KeyCode::Char('x') => {
                if let Some(client) = self.clients.selected_client() {
                    let id = client.id.clone();
                    self.close_client(id, None);
                }
            }
            KeyCode::Esc => self.clear_notice(),
            _ => {}
        }
    }

    fn handle_messages_key(&mut self, key: KeyEvent) {
        if self.inbox.search_active {
            match key.code {
                KeyCode::Esc => self.inbox.search_active = false,
                KeyCode::Enter => match self.inbox.submit_search() {
                    Some(query) => {
                        self.generation += 1;
                        self.search_inbox(query);
                    }
                    // Empty query falls back to a plain reload
                    None if self.inbox.search.trim().is_empty() => self.reload_current(),
                    None => {}
                },
                KeyCode::Backspace => self.inbox.backspace(),
                KeyCode::Char(c) => self.inbox.input_char(c),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Char('/') => self.inbox.search_active = true,
            KeyCode::Up => self.inbox.move_selection(-1),
            KeyCode::Down => self.inbox.move_selection(1),
            KeyCode::Enter => {
                if let Some(conv) = self.inbox.selected_conversation() {
                    let id = conv.client_id.clone();
                    self.navigate(Route::Chat(id));
                }
            }
            _ => {}
        }
    }

    fn handle_attention_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.attention.move_selection(-1),
            KeyCode::Down => self.attention.move_selection(1),
            _ => {}
        }
    }

    fn handle_automation_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.automation.switch_section(),
            KeyCode::Up => self.automation.move_selection(-1),
            KeyCode::Down => self.automation.move_selection(1),
            KeyCode::Char(' ') => {
                if let Some((id, patch)) = self.automation.toggle_request() {
                    let services = self.services.clone();
                    let tx = self.tx.clone();
                    let gen = self.generation;
                    tokio::spawn(async move {
                        // Exactly one update; the list refetch happens on ack
                        let result = services
                            .automation
                            .update(&id, &patch)
                            .await
                            .map(|a| format!("{} is now {}", a.name, a.status.label().to_lowercase()))
                            .map_err(err_text);
                        let _ = tx.send(AppMessage::ActionDone {
                            gen,
                            result,
                            reload: true,
                            goto: None,
                        });
                    });
                }
            }
            KeyCode::Char('t') => {
                if let Some(id) = self.automation.test_request() {
                    let services = self.services.clone();
                    let tx = self.tx.clone();
                    let gen = self.generation;
                    tokio::spawn(async move {
                        let payload = serde_json::json!({ "test_message": "Test message" });
                        let result = services
                            .automation
                            .test(&id, &payload)
                            .await
                            .map(|v| {
                                v.get("message")
                                    .and_then(|m| m.as_str())
                                    .unwrap_or("Automation tested")
                                    .to_string()
                            })
                            .map_err(err_text);
                        let _ = tx.send(AppMessage::ActionDone {
                            gen,
                            result,
                            reload: false,
                            goto: None,
                        });
                    });
                }
            }
            KeyCode::Enter => {
                if let Some(payload) = self.automation.create_request() {
                    let services = self.services.clone();
                    let tx = self.tx.clone();
                    let gen = self.generation;
                    tokio::spawn(async move {
                        let result = services
                            .automation
                            .create(&payload)
                            .await
                            .map(|a| format!("Created automation {}", a.name))
                            .map_err(err_text);
                        let _ = tx.send(AppMessage::ActionDone {
                            gen,
                            result,
                            reload: true,
                            goto: None,
                        });
                    });
                }
            }
            KeyCode::Esc => {
                self.automation.notice = None;
                self.clear_notice();
            }
            _ => {}
        }
    }

    fn handle_integrations_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.integrations.move_selection(-1),
            KeyCode::Down => self.integrations.move_selection(1),
            KeyCode::Char('t') => {
                if let Some(id) = self.integrations.test_request() {
                    let services = self.services.clone();
                    let tx = self.tx.clone();
                    let gen = self.generation;
                    tokio::spawn(async move {
                        let result = services
                            .integrations
                            .test(&id)
                            .await
                            .map(|_| "Integration test passed".to_string())
                            .map_err(err_text);
                        let _ = tx.send(AppMessage::ActionDone {
                            gen,
                            result,
                            reload: false,
                            goto: None,
                        });
                    });
                }
            }
            KeyCode::Esc => {
                self.integrations.notice = None;
                self.clear_notice();
            }
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        let chat = match &mut self.chat {
            Some(chat) => chat,
            None => return,
        };

        // Control-chords are commands; everything else feeds the compose box
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => {
                    if let Some(history) = chat.request_suggestions() {
                        self.fetch_suggestions(history);
                    }
                }
                KeyCode::Char('p') => {
                    let id = chat.client_id.clone();
                    self.call_client(id);
                }
                KeyCode::Char('x') => {
                    let id = chat.client_id.clone();
                    self.close_client(id, Some(Route::Clients));
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                if chat.notice.is_some() {
                    chat.notice = None;
                } else if chat.suggestions.is_some() {
                    chat.close_suggestions();
                } else {
                    self.navigate(Route::Clients);
                }
            }
            KeyCode::Up if chat.suggestions.is_some() => chat.move_suggestion(-1),
            KeyCode::Down if chat.suggestions.is_some() => chat.move_suggestion(1),
            KeyCode::Enter if chat.suggestions.is_some() => chat.use_selected_suggestion(),
            KeyCode::Enter => {
                if let Some(content) = chat.submit() {
                    self.send_chat_message(content);
                }
            }
            KeyCode::Backspace => chat.backspace(),
            KeyCode::Char(c) => chat.input_char(c),
            _ => {}
        }
    }

    // ─── Rendering ───────────────────────────────────────────────────────────

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(4),
                Constraint::Length(1),
            ])
            .split(f.size());

        self.render_tabs(f, chunks[0]);

        match &self.route {
            Route::Dashboard => self.dashboard.render(f, chunks[1], &self.theme, &self.greeting),
            Route::Clients => self.clients.render(f, chunks[1], &self.theme),
            Route::Messages => self.inbox.render(f, chunks[1], &self.theme),
            Route::Attention => self.attention.render(f, chunks[1], &self.theme),
            Route::Automation => self.automation.render(f, chunks[1], &self.theme),
            Route::Integrations => self.integrations.render(f, chunks[1], &self.theme),
            Route::Chat(_) => {
                if let Some(chat) = &self.chat {
                    chat.render(f, chunks[1], &self.theme);
                }
            }
        }

        let hints = Paragraph::new(Line::from(Span::styled(
            format!(" {} · 1-6: views · r: reload · q: quit", self.route.title()),
            Style::default().fg(self.theme.dim),
        )));
        f.render_widget(hints, chunks[2]);
    }

    fn render_tabs(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let tabs = [
            (Route::Dashboard, "1 Dashboard"),
            (Route::Clients, "2 Clients"),
            (Route::Messages, "3 Messages"),
            (Route::Attention, "4 Attention"),
            (Route::Automation, "5 Automation"),
            (Route::Integrations, "6 Integrations"),
        ];
        let mut spans: Vec<Span> = Vec::new();
        for (route, label) in tabs {
            let active = match (&self.route, &route) {
                (Route::Chat(_), Route::Clients) => true,
                (current, candidate) => current == candidate,
            };
            let style = if active {
                Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.dim)
            };
            spans.push(Span::styled(format!(" {} ", label), style));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Inbox load: recent messages, the unread badge, and a best-effort name
/// lookup per client (missing clients render as unknown, like the source
/// product tolerated).
async fn load_inbox_data(services: &Services) -> Result<InboxData, String> {
    let (messages, unread) = tokio::join!(
        services.messages.recent(Some(INBOX_LIMIT)),
        services.messages.unread_count(),
    );
    let messages = messages.map_err(err_text)?;
    let unread_total = unread.map(|u| u.unread_count).unwrap_or(0);

    let conversations = inbox::group_by_client(messages);
    let mut clients: HashMap<String, Client> = HashMap::new();
    for conv in &conversations {
        match services.clients.get(&conv.client_id).await {
            Ok(client) => {
                clients.insert(conv.client_id.clone(), client);
            }
            Err(e) => debug!("client lookup failed for {}: {}", conv.client_id, e),
        }
    }

    Ok(InboxData {
        conversations,
        unread_total,
        clients,
    })
}

// ─── Terminal entry point ────────────────────────────────────────────────────

pub async fn run(
    services: Arc<Services>,
    host: Arc<HostContext>,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new(services, &host, tx);
    app.navigate(Route::Dashboard);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &mut app, &mut rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::UnboundedReceiver<AppMessage>,
) -> std::io::Result<()> {
    let mut last_redraw = Instant::now();

    loop {
        // Drain completed fetches
        while let Ok(msg) = rx.try_recv() {
            app.on_message(msg);
        }

        if event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }

        // ~30 FPS cap is plenty for list UIs
        if last_redraw.elapsed() >= Duration::from_millis(33) {
            terminal.draw(|f| app.render(f))?;
            last_redraw = Instant::now();
        }

        std::thread::sleep(Duration::from_millis(8));
    }
}
