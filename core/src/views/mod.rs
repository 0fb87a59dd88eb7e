/// View controllers
///
/// Each screen owns its state as a `ViewState<T>` and renders with ratatui.
/// Controllers never talk to the network themselves: they expose intents
/// (load, submit, toggle) and the app shell runs the actual calls, feeding
/// results back through `on_*` handlers.
pub mod attention;
pub mod automation;
pub mod chat;
pub mod clients;
pub mod dashboard;
pub mod integrations;
pub mod messages;

use crate::host::ColorScheme;
use chrono::{DateTime, Utc};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub use attention::AttentionView;
pub use automation::AutomationView;
pub use chat::ChatView;
pub use clients::ClientsView;
pub use dashboard::DashboardView;
pub use integrations::IntegrationsView;
pub use messages::MessagesView;

/// Uniform per-view fetch state. Rendering matches on this exhaustively,
/// so a view can never silently show stale data as fresh.
#[derive(Debug, Clone)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

/// Addressable screens. Six fixed views plus the chat view keyed by client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Clients,
    Messages,
    Attention,
    Automation,
    Integrations,
    Chat(String),
}

impl Route {
    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Clients => "Clients",
            Route::Messages => "Messages",
            Route::Attention => "Attention",
            Route::Automation => "Automation",
            Route::Integrations => "Integrations",
            Route::Chat(_) => "Chat",
        }
    }
}

/// Palette derived from the host color scheme
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    pub ok: Color,
    pub warn: Color,
    pub err: Color,
}

impl Theme {
    pub fn from_scheme(scheme: ColorScheme) -> Self {
        match scheme {
            ColorScheme::Dark => Self {
                fg: Color::White,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                ok: Color::Green,
                warn: Color::Yellow,
                err: Color::Red,
            },
            ColorScheme::Light => Self {
                fg: Color::Black,
                dim: Color::Gray,
                accent: Color::Blue,
                ok: Color::Green,
                warn: Color::Yellow,
                err: Color::Red,
            },
        }
    }

    pub fn selected(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }
}

// ─── Shared render helpers ───────────────────────────────────────────────────

pub fn loading_paragraph(theme: &Theme, what: &str) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        format!("Loading {}…", what),
        Style::default().fg(theme.dim),
    )))
    .block(Block::default().borders(Borders::ALL))
}

/// Error display with the manual retry affordance every view offers
pub fn error_paragraph(theme: &Theme, message: &str) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            format!("✗ {}", message),
            Style::default().fg(theme.err),
        )),
        Line::from(Span::styled(
            "press r to retry",
            Style::default().fg(theme.dim),
        )),
    ])
    .block(Block::default().borders(Borders::ALL))
    .wrap(Wrap { trim: true })
}

/// Coarse relative time, enough for list rows
pub fn relative_time(ts: DateTime<Utc>) -> String {
    let delta = Utc::now().signed_duration_since(ts);
    let minutes = delta.num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

pub fn source_color(source: crate::types::MessageSource) -> Color {
    use crate::types::MessageSource::*;
    match source {
        Telegram => Color::Blue,
        Whatsapp => Color::Green,
        Olx => Color::Magenta,
        N8n => Color::Cyan,
        Other => Color::Gray,
    }
}

pub fn severity_color(severity: crate::types::Severity) -> Color {
    use crate::types::Severity::*;
    match severity {
        Info => Color::Gray,
        Warning => Color::Yellow,
        High => Color::LightRed,
        Critical => Color::Red,
    }
}

/// Move a selection cursor within a list of `len` items
pub fn move_selection(selected: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len - 1;
    if delta < 0 {
        selected.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        (selected + delta as usize).min(max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_selection_clamps() {
        assert_eq!(move_selection(0, 5, -1), 0);
        assert_eq!(move_selection(4, 5, 1), 4);
        assert_eq!(move_selection(2, 5, 1), 3);
        assert_eq!(move_selection(0, 0, 1), 0);
    }
}
