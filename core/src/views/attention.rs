/// Attention triage view
///
/// The classification is computed server-side; this view only maps reason
/// codes to labels and severity colors. Unknown codes get the generic
/// fallback rather than failing.
use crate::types::{AttentionListing, AttentionReason};
use crate::views::{error_paragraph, loading_paragraph, severity_color, Theme, ViewState};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub struct AttentionView {
    pub state: ViewState<Vec<AttentionListing>>,
    pub selected: usize,
}

impl AttentionView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            selected: 0,
        }
    }

    pub fn on_loaded(&mut self, result: Result<Vec<AttentionListing>, String>) {
        self.state = match result {
            Ok(listings) => ViewState::Ready(listings),
            Err(e) => ViewState::Failed(e),
        };
        self.selected = 0;
    }

    pub fn move_selection(&mut self, delta: i32) {
        if let Some(listings) = self.state.ready() {
            self.selected = super::move_selection(self.selected, listings.len(), delta);
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let listings = match &self.state {
            ViewState::Loading => {
                f.render_widget(loading_paragraph(theme, "attention listings"), area);
                return;
            }
            ViewState::Failed(message) => {
                f.render_widget(error_paragraph(theme, message), area);
                return;
            }
            ViewState::Ready(listings) => listings,
        };

        if listings.is_empty() {
            f.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(
                        "✓ All under control",
                        Style::default().fg(theme.ok).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        "No listings need review right now.",
                        Style::default().fg(theme.dim),
                    )),
                ])
                .block(Block::default().borders(Borders::ALL).title("Attention")),
                area,
            );
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(area);

        self.render_counts(f, chunks[0], theme, listings);
        self.render_listings(f, chunks[1], theme, listings);
    }

    fn render_counts(&self, f: &mut Frame, area: Rect, theme: &Theme, listings: &[AttentionListing]) {
        let count = |reason: AttentionReason| listings.iter().filter(|l| l.reason == reason).count();
        let unknown = listings
            .iter()
            .filter(|l| l.reason == AttentionReason::Other)
            .count();
        let mut spans = vec![
            Span::styled(
                format!("🔥 {} high volume", count(AttentionReason::HighVolume)),
                Style::default().fg(severity_color(AttentionReason::HighVolume.severity())),
            ),
            Span::raw("   "),
            Span::styled(
                format!("⚠ {} few replies", count(AttentionReason::LowResponse)),
                Style::default().fg(severity_color(AttentionReason::LowResponse.severity())),
            ),
            Span::raw("   "),
            Span::styled(
                format!("⏰ {} inactive", count(AttentionReason::NoRecentActivity)),
                Style::default().fg(severity_color(AttentionReason::NoRecentActivity.severity())),
            ),
        ];
        if unknown > 0 {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("❗ {} other", unknown),
                Style::default().fg(theme.dim),
            ));
        }
        f.render_widget(
            Paragraph::new(Line::from(spans))
                .block(Block::default().borders(Borders::ALL).title("Summary")),
            area,
        );
    }

    fn render_listings(&self, f: &mut Frame, area: Rect, theme: &Theme, listings: &[AttentionListing]) {
        let mut lines: Vec<Line> = Vec::new();
        for (i, listing) in listings.iter().enumerate() {
            let marker = if i == self.selected { "▸ " } else { "  " };
            let title = listing
                .listing_title
                .clone()
                .unwrap_or_else(|| "Untitled listing".to_string());
            let title_style = if i == self.selected {
                theme.selected()
            } else {
                Style::default().fg(theme.fg)
            };
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::raw(format!("{} ", listing.reason.icon())),
                Span::styled(title, title_style),
                Span::styled(
                    format!("  {}", listing.reason.label()),
                    Style::default().fg(severity_color(listing.reason.severity())),
                ),
            ]));

            let mut detail = vec![Span::styled(
                format!("    {}", listing.details),
                Style::default().fg(theme.dim),
            )];
            if let Some(incoming) = listing.incoming_count {
                detail.push(Span::styled(
                    format!("  📨 {}", incoming),
                    Style::default().fg(theme.dim),
                ));
            }
            if let Some(outgoing) = listing.outgoing_count {
                detail.push(Span::styled(
                    format!("  📤 {}", outgoing),
                    Style::default().fg(theme.dim),
                ));
            }
            if let Some(name) = &listing.client_name {
                detail.push(Span::styled(
                    format!("  👤 {}", name),
                    Style::default().fg(theme.dim),
                ));
            }
            lines.push(Line::from(detail));
        }

        let scroll = self.selected.saturating_sub(area.height.saturating_sub(4) as usize / 2) as u16;
        f.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Needs review ({})", listings.len())),
                )
                .wrap(Wrap { trim: false })
                .scroll((scroll * 2, 0)),
            area,
        );
    }
}
