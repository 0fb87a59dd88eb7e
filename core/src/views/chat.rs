/// Chat view — per-client thread with compose box and AI suggestions
///
/// State machine: loading → ready ⇄ sending, and ready → suggesting →
/// ready. A failed load is terminal until the user retries. The outgoing
/// message is appended only after the send call resolves; nothing is
/// applied optimistically, so a failed send has nothing to roll back.
use crate::types::{Client, Message, MessageType};
use crate::views::{error_paragraph, loading_paragraph, Theme, ViewState};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

#[derive(Debug, Clone)]
pub struct ChatData {
    pub client: Client,
    /// Oldest first for display; normalized on load
    pub messages: Vec<Message>,
}

pub struct ChatView {
    pub client_id: String,
    pub state: ViewState<ChatData>,
    pub compose: String,
    /// Busy flag gating duplicate submits
    pub sending: bool,
    /// Some = suggestion list is open
    pub suggestions: Option<Vec<String>>,
    pub suggestion_selected: usize,
    /// Side fetch in flight; never blocks sending
    pub suggesting: bool,
    /// Blocking acknowledgment for failed side-effecting actions
    pub notice: Option<String>,
}

impl ChatView {
    pub fn new(client_id: String) -> Self {
        Self {
            client_id,
            state: ViewState::Loading,
            compose: String::new(),
            sending: false,
            suggestions: None,
            suggestion_selected: 0,
            suggesting: false,
            notice: None,
        }
    }

    pub fn on_loaded(&mut self, result: Result<ChatData, String>) {
        self.state = match result {
            Ok(mut data) => {
                data.messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
                ViewState::Ready(data)
            }
            Err(e) => ViewState::Failed(e),
        };
    }

    // ─── Sending ─────────────────────────────────────────────────────────────

    /// Take the compose text for sending. Returns None — and stays put —
    /// when the input trims to empty, a send is already in flight, or the
    /// thread has not loaded.
    pub fn submit(&mut self) -> Option<String> {
        if self.sending || self.state.ready().is_none() {
            return None;
        }
        let content = self.compose.trim().to_string();
        if content.is_empty() {
            return None;
        }
        self.sending = true;
        Some(content)
    }

    /// Confirmed by the backend: append exactly the returned message and
    /// clear the compose field.
    pub fn on_send_ok(&mut self, message: Message) {
        self.sending = false;
        self.compose.clear();
        self.suggestions = None;
        if let Some(data) = self.state.ready_mut() {
            data.messages.push(message);
        }
    }

    pub fn on_send_err(&mut self, error: String) {
        self.sending = false;
        self.notice = Some(format!("Send failed: {}", error));
    }

    // ─── AI suggestions ──────────────────────────────────────────────────────

    /// Kick off the suggestion side fetch; returns the history snapshot to
    /// send, or None when already fetching or the thread is not ready.
    pub fn request_suggestions(&mut self) -> Option<Vec<String>> {
        if self.suggesting {
            return None;
        }
        let data = self.state.ready()?;
        self.suggesting = true;
        Some(data.messages.iter().map(|m| m.content.clone()).collect())
    }

    pub fn on_suggestions(&mut self, result: Result<Vec<String>, String>) {
        self.suggesting = false;
        match result {
            Ok(suggestions) if !suggestions.is_empty() => {
                self.suggestion_selected = 0;
                self.suggestions = Some(suggestions);
            }
            Ok(_) => self.notice = Some("No suggestions available".to_string()),
            Err(e) => self.notice = Some(format!("Suggestions failed: {}", e)),
        }
    }

    pub fn move_suggestion(&mut self, delta: i32) {
        if let Some(suggestions) = &self.suggestions {
            self.suggestion_selected =
                super::move_selection(self.suggestion_selected, suggestions.len(), delta);
        }
    }

    /// Populate the compose field and close the list without sending
    pub fn use_selected_suggestion(&mut self) {
        if let Some(suggestions) = self.suggestions.take() {
            if let Some(s) = suggestions.get(self.suggestion_selected) {
                self.compose = s.clone();
            }
        }
    }

    pub fn close_suggestions(&mut self) {
        self.suggestions = None;
    }

    // ─── Compose input ───────────────────────────────────────────────────────

    pub fn input_char(&mut self, c: char) {
        self.compose.push(c);
    }

    pub fn backspace(&mut self) {
        self.compose.pop();
    }

    // ─── Rendering ───────────────────────────────────────────────────────────

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let data = match &self.state {
            ViewState::Loading => {
                f.render_widget(loading_paragraph(theme, "chat"), area);
                return;
            }
            ViewState::Failed(message) => {
                f.render_widget(error_paragraph(theme, message), area);
                return;
            }
            ViewState::Ready(data) => data,
        };

        let suggestion_height = match &self.suggestions {
            Some(s) => (s.len() as u16 + 2).min(8),
            None => 0,
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(suggestion_height),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_header(f, chunks[0], theme, &data.client);
        self.render_messages(f, chunks[1], theme, data);
        if self.suggestions.is_some() {
            self.render_suggestions(f, chunks[2], theme);
        }
        self.render_compose(f, chunks[3], theme);

        if let Some(notice) = &self.notice {
            let line = Paragraph::new(Line::from(Span::styled(
                format!(" {} — press Esc ", notice),
                Style::default().fg(theme.err).add_modifier(Modifier::BOLD),
            )));
            let bar = Rect {
                y: area.bottom().saturating_sub(1),
                height: 1,
                ..area
            };
            f.render_widget(line, bar);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect, theme: &Theme, client: &Client) {
        let mut spans = vec![Span::styled(
            client.name.clone(),
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )];
        if let Some(phone) = &client.phone {
            spans.push(Span::styled(
                format!("  {}", phone),
                Style::default().fg(theme.dim),
            ));
        }
        if let Some(title) = &client.listing_title {
            spans.push(Span::styled(
                format!("  · {}", title),
                Style::default().fg(theme.dim),
            ));
        }
        spans.push(Span::styled(
            "   (^A suggest · ^P call · ^X close · Esc back)",
            Style::default().fg(theme.dim),
        ));
        f.render_widget(
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn render_messages(&self, f: &mut Frame, area: Rect, theme: &Theme, data: &ChatData) {
        let mut lines: Vec<Line> = Vec::new();
        if data.messages.is_empty() {
            lines.push(Line::from(Span::styled(
                "No messages yet",
                Style::default().fg(theme.dim),
            )));
        }
        for message in &data.messages {
            let (who, style) = match message.message_type {
                MessageType::Outgoing => ("you", Style::default().fg(theme.accent)),
                MessageType::Incoming => ("them", Style::default().fg(theme.fg)),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} {}: ", message.timestamp.format("%H:%M"), who),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(message.content.clone(), style),
            ]));
        }

        // Stick to the bottom of the thread
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(visible) as u16;
        let para = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Conversation"))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        f.render_widget(para, area);
    }

    fn render_suggestions(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let suggestions = match &self.suggestions {
            Some(s) => s,
            None => return,
        };
        let lines: Vec<Line> = suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let style = if i == self.suggestion_selected {
                    theme.selected()
                } else {
                    Style::default().fg(theme.fg)
                };
                Line::from(Span::styled(format!("{} {}", if i == self.suggestion_selected { "▸" } else { " " }, s), style))
            })
            .collect();
        f.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("AI suggestions (Enter: use, Esc: close)"),
                )
                .wrap(Wrap { trim: true }),
            area,
        );
    }

    fn render_compose(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let (text, style) = if self.sending {
            ("sending…".to_string(), Style::default().fg(theme.dim))
        } else if self.compose.is_empty() {
            ("Type a message…".to_string(), Style::default().fg(theme.dim))
        } else {
            (format!("{}_", self.compose), Style::default().fg(theme.fg))
        };
        let mut title = "Compose (Enter: send)".to_string();
        if self.suggesting {
            title.push_str(" · fetching suggestions…");
        }
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(text, style)))
                .block(Block::default().borders(Borders::ALL).title(title)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClientStatus, MessageSource};
    use chrono::{TimeZone, Utc};

    fn data() -> ChatData {
        ChatData {
            client: Client {
                id: "c1".to_string(),
                name: "Anna".to_string(),
                phone: None,
                source: MessageSource::Telegram,
                status: ClientStatus::InProgress,
                listing_id: None,
                listing_title: None,
                created_at: None,
                updated_at: None,
                last_message_at: None,
                messages_count: 1,
            },
            messages: vec![message("m1", MessageType::Incoming, 10)],
        }
    }

    fn message(id: &str, message_type: MessageType, minute: u32) -> Message {
        Message {
            id: id.to_string(),
            client_id: "c1".to_string(),
            content: format!("content {}", id),
            message_type,
            source: MessageSource::Telegram,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 9, minute, 0).unwrap(),
            is_read: true,
        }
    }

    fn ready_view() -> ChatView {
        let mut view = ChatView::new("c1".to_string());
        view.on_loaded(Ok(data()));
        view
    }

    #[test]
    fn test_submit_takes_trimmed_content_once() {
        let mut view = ready_view();
        view.compose = "  Hello  ".to_string();

        assert_eq!(view.submit(), Some("Hello".to_string()));
        assert!(view.sending);

        // Duplicate submit while in flight is a no-op
        view.compose = "Hello again".to_string();
        assert_eq!(view.submit(), None);
    }

    #[test]
    fn test_submit_rejects_empty_and_unloaded() {
        let mut view = ready_view();
        view.compose = "   ".to_string();
        assert_eq!(view.submit(), None);
        assert!(!view.sending);

        let mut loading = ChatView::new("c1".to_string());
        loading.compose = "Hello".to_string();
        assert_eq!(loading.submit(), None);
    }

    #[test]
    fn test_send_ok_appends_exactly_one_and_clears_compose() {
        let mut view = ready_view();
        view.compose = "Hello".to_string();
        view.submit().unwrap();

        view.on_send_ok(message("m2", MessageType::Outgoing, 11));

        let data = view.state.ready().unwrap();
        assert_eq!(data.messages.len(), 2);
        assert_eq!(data.messages.last().unwrap().id, "m2");
        assert_eq!(data.messages.last().unwrap().message_type, MessageType::Outgoing);
        assert!(view.compose.is_empty());
        assert!(!view.sending);

        // Ready again: the next submit goes through
        view.compose = "Second".to_string();
        assert_eq!(view.submit(), Some("Second".to_string()));
    }

    #[test]
    fn test_send_err_unblocks_and_raises_notice() {
        let mut view = ready_view();
        view.compose = "Hello".to_string();
        view.submit().unwrap();
        view.on_send_err("network".to_string());

        assert!(!view.sending);
        assert!(view.notice.as_deref().unwrap().contains("network"));
        // Compose content is kept for a retry
        assert_eq!(view.compose, "Hello");
    }

    #[test]
    fn test_messages_normalized_oldest_first() {
        let mut view = ChatView::new("c1".to_string());
        let mut d = data();
        d.messages = vec![
            message("new", MessageType::Incoming, 30),
            message("old", MessageType::Incoming, 5),
        ];
        view.on_loaded(Ok(d));
        let messages = &view.state.ready().unwrap().messages;
        assert_eq!(messages[0].id, "old");
        assert_eq!(messages[1].id, "new");
    }

    #[test]
    fn test_suggestion_flow_populates_compose_without_sending() {
        let mut view = ready_view();
        let history = view.request_suggestions().unwrap();
        assert_eq!(history, vec!["content m1".to_string()]);
        assert!(view.suggesting);
        // A second request while fetching is a no-op
        assert!(view.request_suggestions().is_none());

        view.on_suggestions(Ok(vec!["First".to_string(), "Second".to_string()]));
        assert!(!view.suggesting);
        view.move_suggestion(1);
        view.use_selected_suggestion();

        assert_eq!(view.compose, "Second");
        assert!(view.suggestions.is_none());
        assert!(!view.sending, "choosing a suggestion must not send");
    }

    #[test]
    fn test_suggestions_do_not_block_sending() {
        let mut view = ready_view();
        view.request_suggestions().unwrap();
        view.compose = "Hello".to_string();
        assert_eq!(view.submit(), Some("Hello".to_string()));
    }
}
