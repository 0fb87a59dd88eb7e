/// Dashboard view — stat tiles, recent chats, attention panel
use crate::types::{AttentionSummary, Client, DashboardStats};
use crate::views::{error_paragraph, loading_paragraph, relative_time, Theme, ViewState};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

#[derive(Debug, Clone)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub recent: Vec<Client>,
    pub summary: AttentionSummary,
}

pub struct DashboardView {
    pub state: ViewState<DashboardData>,
    pub selected: usize,
    pub notice: Option<String>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            selected: 0,
            notice: None,
        }
    }

    pub fn on_loaded(&mut self, result: Result<DashboardData, String>) {
        self.state = match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => ViewState::Failed(e),
        };
        self.selected = 0;
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.state.ready().and_then(|d| d.recent.get(self.selected))
    }

    pub fn move_selection(&mut self, delta: i32) {
        if let Some(data) = self.state.ready() {
            self.selected = super::move_selection(self.selected, data.recent.len(), delta);
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, greeting: &str) {
        let data = match &self.state {
            ViewState::Loading => {
                f.render_widget(loading_paragraph(theme, "dashboard"), area);
                return;
            }
            ViewState::Failed(message) => {
                f.render_widget(error_paragraph(theme, message), area);
                return;
            }
            ViewState::Ready(data) => data,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // stat tiles
                Constraint::Min(6),    // recent chats
                Constraint::Length(5), // attention panel
            ])
            .split(area);

        self.render_stats(f, chunks[0], theme, &data.stats, greeting);
        self.render_recent(f, chunks[1], theme, &data.recent);
        self.render_summary(f, chunks[2], theme, &data.summary);

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

    fn render_stats(&self, f: &mut Frame, area: Rect, theme: &Theme, stats: &DashboardStats, greeting: &str) {
        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        let cells = [
            (stats.new_leads, "new leads", theme.ok),
            (stats.pending_attention, "need attention", theme.warn),
            (stats.active_chats, "active chats", theme.accent),
            (stats.completed_sales, "closed deals", theme.ok),
        ];
        for (i, (value, label, color)) in cells.into_iter().enumerate() {
            let block = if i == 0 {
                Block::default().borders(Borders::ALL).title(greeting.to_string())
            } else {
                Block::default().borders(Borders::ALL)
            };
            f.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", value),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(label, Style::default().fg(theme.dim)),
                ]))
                .block(block),
                tiles[i],
            );
        }
    }

    fn render_recent(&self, f: &mut Frame, area: Rect, theme: &Theme, recent: &[Client]) {
        let mut lines: Vec<Line> = Vec::new();
        if recent.is_empty() {
            lines.push(Line::from(Span::styled(
                "No active chats",
                Style::default().fg(theme.dim),
            )));
        }
        for (i, client) in recent.iter().enumerate() {
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
                    format!("  [{}]", client.source.label()),
                    Style::default().fg(super::source_color(client.source)),
                ),
            ];
            if let Some(ts) = client.last_message_at {
                spans.push(Span::styled(
                    format!("  {}", relative_time(ts)),
                    Style::default().fg(theme.dim),
                ));
            }
            lines.push(Line::from(spans));
            if let Some(title) = &client.listing_title {
                lines.push(Line::from(Span::styled(
                    format!("    {}", title),
                    Style::default().fg(theme.dim),
                )));
            }
        }

        let para = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Recent chats (Enter: open, c: call, x: close)"),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(para, area);
    }

    fn render_summary(&self, f: &mut Frame, area: Rect, theme: &Theme, summary: &AttentionSummary) {
        let mut lines = vec![Line::from(Span::styled(
            format!("{} listings need review", summary.total_listings),
            Style::default().fg(if summary.total_listings > 0 {
                theme.warn
            } else {
                theme.ok
            }),
        ))];
        if let Some(top) = &summary.top_listing {
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", top.reason.icon())),
                Span::styled(
                    top.listing_title.clone().unwrap_or_else(|| "Untitled".to_string()),
                    Style::default().fg(theme.fg),
                ),
                Span::styled(
                    format!("  {}", top.reason.label()),
                    Style::default().fg(super::severity_color(top.reason.severity())),
                ),
            ]));
        }
        let para = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Attention"))
            .wrap(Wrap { trim: true });
        f.render_widget(para, area);
    }
}
