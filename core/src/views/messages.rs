/// Unified inbox view — one card per conversation
use crate::inbox::Conversation;
use crate::types::{Client, Message, MessageType};
use crate::views::{error_paragraph, loading_paragraph, relative_time, Theme, ViewState};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct InboxData {
    pub conversations: Vec<Conversation>,
    /// Backend-reported total across all clients, not derived locally
    pub unread_total: u64,
    /// Client lookups for card headers; misses render as "Unknown client"
    pub clients: HashMap<String, Client>,
}

pub struct MessagesView {
    pub state: ViewState<InboxData>,
    pub search: String,
    pub search_active: bool,
    /// True while a server-side search is in flight
    pub searching: bool,
    pub selected: usize,
}

impl MessagesView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            search: String::new(),
            search_active: false,
            searching: false,
            selected: 0,
        }
    }

    pub fn on_loaded(&mut self, result: Result<InboxData, String>) {
        self.searching = false;
        self.state = match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Failed(e),
        };
        self.selected = 0;
    }

    /// Server-side search results replace the conversation list; the
    /// unread badge and client lookups are kept from the previous load.
    pub fn on_search_results(&mut self, result: Result<Vec<Message>, String>) {
        self.searching = false;
        match result {
            Ok(messages) => {
                if let Some(data) = self.state.ready_mut() {
                    data.conversations = crate::inbox::group_by_client(messages);
                } else {
                    self.state = ViewState::Ready(InboxData {
                        conversations: crate::inbox::group_by_client(messages),
                        unread_total: 0,
                        clients: HashMap::new(),
                    });
                }
                self.selected = 0;
            }
            Err(e) => self.state = ViewState::Failed(e),
        }
    }

    /// Trimmed query to submit, or None when a search makes no sense
    /// (empty input falls back to a plain reload, in-flight search blocks)
    pub fn submit_search(&mut self) -> Option<String> {
        if self.searching {
            return None;
        }
        let query = self.search.trim().to_string();
        self.search_active = false;
        if query.is_empty() {
            None
        } else {
            self.searching = true;
            Some(query)
        }
    }

    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.state.ready().and_then(|d| d.conversations.get(self.selected))
    }

    pub fn move_selection(&mut self, delta: i32) {
        if let Some(data) = self.state.ready() {
            self.selected = super::move_selection(self.selected, data.conversations.len(), delta);
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn backspace(&mut self) {
        self.search.pop();
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(area);

        self.render_search_bar(f, chunks[0], theme);

        match &self.state {
            ViewState::Loading => f.render_widget(loading_paragraph(theme, "messages"), chunks[1]),
            ViewState::Failed(message) => f.render_widget(error_paragraph(theme, message), chunks[1]),
            ViewState::Ready(data) => self.render_conversations(f, chunks[1], theme, data),
        }
    }

    fn render_search_bar(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let search = if self.search_active {
            Span::styled(
                format!("/{}_", self.search),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            )
        } else if self.search.is_empty() {
            Span::styled("(/ to search messages)", Style::default().fg(theme.dim))
        } else {
            Span::styled(format!("/{}", self.search), Style::default().fg(theme.accent))
        };
        let mut spans = vec![search];
        if self.searching {
            spans.push(Span::styled("  searching…", Style::default().fg(theme.dim)));
        }
        f.render_widget(
            Paragraph::new(Line::from(spans))
                .block(Block::default().borders(Borders::ALL).title("Search")),
            area,
        );
    }

    fn render_conversations(&self, f: &mut Frame, area: Rect, theme: &Theme, data: &InboxData) {
        let mut lines: Vec<Line> = Vec::new();

        if data.conversations.is_empty() {
            lines.push(Line::from(Span::styled(
                "No messages",
                Style::default().fg(theme.dim),
            )));
        }

        for (i, conv) in data.conversations.iter().enumerate() {
            let last = conv.last_message();
            let marker = if i == self.selected { "▸ " } else { "  " };
            let name = data
                .clients
                .get(&conv.client_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Unknown client".to_string());
            let name_style = if i == self.selected {
                theme.selected()
            } else {
                Style::default().fg(theme.fg)
            };

            let mut header = vec![
                Span::raw(marker),
                Span::styled(name, name_style),
                Span::styled(
                    format!("  [{}]", last.source.label()),
                    Style::default().fg(super::source_color(last.source)),
                ),
                Span::styled(
                    format!("  {} · {} messages", relative_time(last.timestamp), conv.message_count()),
                    Style::default().fg(theme.dim),
                ),
            ];
            if conv.unread_count > 0 {
                header.push(Span::styled(
                    format!("  ({} unread)", conv.unread_count),
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                ));
            }
            lines.push(Line::from(header));

            let prefix = match last.message_type {
                MessageType::Outgoing => "You: ",
                MessageType::Incoming => "",
            };
            let mut preview = last.content.replace('\n', " ");
            if preview.chars().count() > 80 {
                preview = preview.chars().take(79).collect::<String>() + "…";
            }
            lines.push(Line::from(Span::styled(
                format!("    {}{}", prefix, preview),
                Style::default().fg(theme.dim),
            )));
        }

        let title = if data.unread_total > 0 {
            format!("Messages — {} unread", data.unread_total)
        } else {
            "Messages".to_string()
        };
        let scroll = self.selected.saturating_sub(area.height.saturating_sub(4) as usize / 2) as u16;
        let para = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false })
            .scroll((scroll * 2, 0));
        f.render_widget(para, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageSource;
    use chrono::{TimeZone, Utc};

    fn msg(id: &str, client: &str, minute: u32) -> Message {
        Message {
            id: id.to_string(),
            client_id: client.to_string(),
            content: "hi".to_string(),
            message_type: MessageType::Incoming,
            source: MessageSource::Telegram,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, 0).unwrap(),
            is_read: false,
        }
    }

    #[test]
    fn test_search_submit_requires_nonempty_query() {
        let mut view = MessagesView::new();
        view.search = "   ".to_string();
        assert_eq!(view.submit_search(), None);

        view.search = " deposit ".to_string();
        assert_eq!(view.submit_search(), Some("deposit".to_string()));
        // Second submit while the first is in flight is a no-op
        view.search = "deposit".to_string();
        assert_eq!(view.submit_search(), None);
    }

    #[test]
    fn test_search_results_replace_conversations() {
        let mut view = MessagesView::new();
        view.on_loaded(Ok(InboxData {
            conversations: crate::inbox::group_by_client(vec![msg("1", "a", 1), msg("2", "b", 2)]),
            unread_total: 7,
            clients: HashMap::new(),
        }));
        view.searching = true;
        view.on_search_results(Ok(vec![msg("3", "b", 3)]));

        let data = view.state.ready().unwrap();
        assert_eq!(data.conversations.len(), 1);
        assert_eq!(data.conversations[0].client_id, "b");
        // Unread badge survives a search
        assert_eq!(data.unread_total, 7);
        assert!(!view.searching);
    }
}
