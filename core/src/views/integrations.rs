/// Integrations view — connected channels plus the static catalog
use crate::types::{Integration, IntegrationStatus};
use crate::views::{error_paragraph, loading_paragraph, Theme, ViewState};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

/// Connectable channel types; availability is a product decision, not
/// something the backend reports.
pub const CATALOG: &[(&str, &str, bool)] = &[
    ("Telegram", "Receive messages from Telegram", true),
    ("WhatsApp Business", "WhatsApp Business API integration", false),
    ("OLX", "Sync with OLX listings", false),
    ("n8n", "Workflow automation via n8n", true),
];

pub struct IntegrationsView {
    pub state: ViewState<Vec<Integration>>,
    pub selected: usize,
    /// One probe at a time
    pub testing: bool,
    pub notice: Option<String>,
}

impl IntegrationsView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            selected: 0,
            testing: false,
            notice: None,
        }
    }

    pub fn on_loaded(&mut self, result: Result<Vec<Integration>, String>) {
        self.testing = false;
        self.state = match result {
            Ok(integrations) => ViewState::Ready(integrations),
            Err(e) => ViewState::Failed(e),
        };
        self.selected = 0;
    }

    pub fn move_selection(&mut self, delta: i32) {
        if let Some(integrations) = self.state.ready() {
            self.selected = super::move_selection(self.selected, integrations.len(), delta);
        }
    }

    /// Id of the integration to probe, or None while busy
    pub fn test_request(&mut self) -> Option<String> {
        if self.testing {
            return None;
        }
        let integration = self.state.ready()?.get(self.selected)?;
        self.testing = true;
        Some(integration.id.clone())
    }

    pub fn on_test_done(&mut self, result: Result<String, String>) {
        self.testing = false;
        match result {
            Ok(message) => self.notice = Some(message),
            Err(e) => self.notice = Some(format!("Test failed: {}", e)),
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let integrations = match &self.state {
            ViewState::Loading => {
                f.render_widget(loading_paragraph(theme, "integrations"), area);
                return;
            }
            ViewState::Failed(message) => {
                f.render_widget(error_paragraph(theme, message), area);
                return;
            }
            ViewState::Ready(integrations) => integrations,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        self.render_connected(f, chunks[0], theme, integrations);
        self.render_catalog(f, chunks[1], theme);

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

    fn render_connected(&self, f: &mut Frame, area: Rect, theme: &Theme, integrations: &[Integration]) {
        let mut lines: Vec<Line> = Vec::new();
        if integrations.is_empty() {
            lines.push(Line::from(Span::styled(
                "No integrations connected",
                Style::default().fg(theme.dim),
            )));
        }
        for (i, integration) in integrations.iter().enumerate() {
            let here = i == self.selected;
            let status_color = match integration.status {
                IntegrationStatus::Active => theme.ok,
                IntegrationStatus::Inactive => theme.dim,
                IntegrationStatus::Error => theme.err,
            };
            lines.push(Line::from(vec![
                Span::raw(if here { "▸ " } else { "  " }),
                Span::styled(
                    integration.name.clone(),
                    if here { theme.selected() } else { Style::default().fg(theme.fg) },
                ),
                Span::styled(
                    format!("  [{}]", integration.kind.label()),
                    Style::default().fg(super::source_color(integration.kind)),
                ),
                Span::styled(
                    format!("  {}", integration.status.label()),
                    Style::default().fg(status_color).add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        let mut title = "Connected (t: test)".to_string();
        if self.testing {
            title.push_str(" · probing…");
        }
        f.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(title))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_catalog(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let mut lines: Vec<Line> = Vec::new();
        for (name, description, available) in CATALOG {
            lines.push(Line::from(vec![
                Span::styled(*name, Style::default().fg(theme.fg)),
                Span::styled(
                    if *available { "" } else { "  (coming soon)" },
                    Style::default().fg(theme.warn),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", description),
                Style::default().fg(theme.dim),
            )));
        }
        f.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Available"))
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}
