/// Clients view — server-side status/source filters, local text search
use crate::types::{Client, ClientStatus, MessageSource};
use crate::views::{error_paragraph, loading_paragraph, relative_time, Theme, ViewState};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub struct ClientsView {
    pub state: ViewState<Vec<Client>>,
    /// Local, case-insensitive filter; never triggers a network call
    pub search: String,
    pub search_active: bool,
    /// Server-side filters; changing either refetches
    pub status_filter: Option<ClientStatus>,
    pub source_filter: Option<MessageSource>,
    pub selected: usize,
    pub notice: Option<String>,
}

impl ClientsView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            search: String::new(),
            search_active: false,
            status_filter: None,
            source_filter: None,
            selected: 0,
            notice: None,
        }
    }

    pub fn on_loaded(&mut self, result: Result<Vec<Client>, String>) {
        self.state = match result {
            Ok(clients) => ViewState::Ready(clients),
            Err(e) => ViewState::Failed(e),
        };
        self.selected = 0;
    }

    /// Clients passing the local search filter, in backend order
    pub fn visible(&self) -> Vec<&Client> {
        match self.state.ready() {
            Some(clients) => clients.iter().filter(|c| c.matches(&self.search)).collect(),
            None => Vec::new(),
        }
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.visible().get(self.selected).copied()
    }

    pub fn move_selection(&mut self, delta: i32) {
        let len = self.visible().len();
        self.selected = super::move_selection(self.selected, len, delta);
    }

    /// Returns true when the list must be refetched
    pub fn cycle_status_filter(&mut self) -> bool {
        self.status_filter = match self.status_filter {
            None => Some(ClientStatus::New),
            Some(ClientStatus::New) => Some(ClientStatus::InProgress),
            Some(ClientStatus::InProgress) => Some(ClientStatus::Closed),
            Some(ClientStatus::Closed) => None,
        };
        self.selected = 0;
        true
    }

    pub fn cycle_source_filter(&mut self) -> bool {
        self.source_filter = match self.source_filter {
            None => Some(MessageSource::Telegram),
            Some(MessageSource::Telegram) => Some(MessageSource::Whatsapp),
            Some(MessageSource::Whatsapp) => Some(MessageSource::Olx),
            Some(MessageSource::Olx) | Some(MessageSource::N8n) | Some(MessageSource::Other) => None,
        };
        self.selected = 0;
        true
    }

    pub fn input_char(&mut self, c: char) {
        self.search.push(c);
        self.selected = 0;
    }

    pub fn backspace(&mut self) {
        self.search.pop();
        self.selected = 0;
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(area);

        self.render_filter_bar(f, chunks[0], theme);

        match &self.state {
            ViewState::Loading => f.render_widget(loading_paragraph(theme, "clients"), chunks[1]),
            ViewState::Failed(message) => f.render_widget(error_paragraph(theme, message), chunks[1]),
            ViewState::Ready(_) => self.render_list(f, chunks[1], theme),
        }
    }

    fn render_filter_bar(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let status = self
            .status_filter
            .map(|s| s.label())
            .unwrap_or("all statuses");
        let source = self
            .source_filter
            .map(|s| s.label())
            .unwrap_or("all sources");
        let search = if self.search_active {
            Span::styled(
                format!("/{}_", self.search),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            )
        } else if self.search.is_empty() {
            Span::styled("(/ to search)", Style::default().fg(theme.dim))
        } else {
            Span::styled(format!("/{}", self.search), Style::default().fg(theme.accent))
        };

        let bar = Paragraph::new(Line::from(vec![
            Span::styled(format!("[s] {}", status), Style::default().fg(theme.fg)),
            Span::raw("  "),
            Span::styled(format!("[o] {}", source), Style::default().fg(theme.fg)),
            Span::raw("  "),
            search,
        ]))
        .block(Block::default().borders(Borders::ALL).title("Filters"));
        f.render_widget(bar, area);
    }

    fn render_list(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let visible = self.visible();
        let mut lines: Vec<Line> = Vec::new();

        if visible.is_empty() {
            let empty = if self.search.trim().is_empty()
                && self.status_filter.is_none()
                && self.source_filter.is_none()
            {
                "No clients"
            } else {
                "No clients match the current filters"
            };
            lines.push(Line::from(Span::styled(empty, Style::default().fg(theme.dim))));
        }

        for (i, client) in visible.iter().enumerate() {
            let marker = if i == self.selected { "▸ " } else { "  " };
            let name_style = if i == self.selected {
                theme.selected()
            } else {
                Style::default().fg(theme.fg)
            };
            let mut spans = vec![
                Span::raw(marker),
                Span::styled(client.name.clone(), name_style),
                Span::styled(
                    format!("  {}", client.status.label()),
                    Style::default().fg(match client.status {
                        ClientStatus::New => theme.ok,
                        ClientStatus::InProgress => theme.warn,
                        ClientStatus::Closed => theme.dim,
                    }),
                ),
                Span::styled(
                    format!("  [{}]", client.source.label()),
                    Style::default().fg(super::source_color(client.source)),
                ),
            ];
            if let Some(phone) = &client.phone {
                spans.push(Span::styled(
                    format!("  {}", phone),
                    Style::default().fg(theme.dim),
                ));
            }
            lines.push(Line::from(spans));

            let mut detail: Vec<Span> = Vec::new();
            if let Some(title) = &client.listing_title {
                detail.push(Span::styled(
                    format!("    {}", title),
                    Style::default().fg(theme.dim),
                ));
            }
            if let Some(ts) = client.last_message_at {
                detail.push(Span::styled(
                    format!("    {} · {} messages", relative_time(ts), client.messages_count),
                    Style::default().fg(theme.dim),
                ));
            }
            if !detail.is_empty() {
                lines.push(Line::from(detail));
            }
        }

        let scroll = self.selected.saturating_sub(area.height.saturating_sub(4) as usize / 2) as u16;
        let title = format!("Clients ({})", visible.len());
        let para = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        f.render_widget(para, area);

        if let Some(notice) = &self.notice {
            let line = Paragraph::new(Line::from(Span::styled(
                format!(" {} — press Esc ", notice),
                Style::default().fg(theme.warn).add_modifier(Modifier::BOLD),
            )));
            let bar = Rect {
                y: area.bottom().saturating_sub(1),
                height: 1,
                ..area
            };
            f.render_widget(line, bar);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, name: &str) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            phone: None,
            source: MessageSource::Telegram,
            status: ClientStatus::New,
            listing_id: None,
            listing_title: None,
            created_at: None,
            updated_at: None,
            last_message_at: None,
            messages_count: 0,
        }
    }

    #[test]
    fn test_visible_applies_local_search_only() {
        let mut view = ClientsView::new();
        view.on_loaded(Ok(vec![client("1", "Anna"), client("2", "Boris")]));

        assert_eq!(view.visible().len(), 2);
        view.search = "ann".to_string();
        let visible = view.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Anna");

        view.search.clear();
        assert_eq!(view.visible().len(), 2);
    }

    #[test]
    fn test_status_filter_cycles_back_to_none() {
        let mut view = ClientsView::new();
        assert!(view.cycle_status_filter());
        assert_eq!(view.status_filter, Some(ClientStatus::New));
        view.cycle_status_filter();
        view.cycle_status_filter();
        view.cycle_status_filter();
        assert_eq!(view.status_filter, None);
    }

    #[test]
    fn test_selection_follows_filtered_list() {
        let mut view = ClientsView::new();
        view.on_loaded(Ok(vec![client("1", "Anna"), client("2", "Boris")]));
        view.move_selection(1);
        assert_eq!(view.selected_client().unwrap().name, "Boris");
        view.input_char('a');
        view.input_char('n');
        assert_eq!(view.selected_client().unwrap().name, "Anna");
    }
}
