//! Reusable TUI components

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::HealthyRange;

/// Range status of a metric's latest value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Within the healthy range
    Ok,
    /// Outside the healthy range
    Alert,
    /// Nothing recorded
    Unknown,
}

impl Status {
    /// Status of an optional latest value against a range
    pub fn of(range: HealthyRange, latest: Option<f64>) -> Self {
        match latest {
            Some(v) if range.contains(v) => Self::Ok,
            Some(_) => Self::Alert,
            None => Self::Unknown,
        }
    }

    /// Display color
    pub fn color(self) -> Color {
        match self {
            Self::Ok => Color::Green,
            Self::Alert => Color::Red,
            Self::Unknown => Color::DarkGray,
        }
    }
}

/// A metric card widget showing the latest value with a label
pub struct MetricCard {
    title: String,
    value: String,
    status: Status,
    selected: bool,
}

impl MetricCard {
    /// Card with a title and formatted value, status unknown
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            status: Status::Unknown,
            selected: false,
        }
    }

    /// Set the range status that colors the value
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Highlight the border when selected
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Draw the card into `area`
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border = if self.selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(border);

        let content = Line::from(vec![
            Span::styled(self.value, Style::default().fg(self.status.color())),
            Span::raw(" "),
            StatusIndicator::new(self.status).to_span(),
        ]);

        let paragraph = Paragraph::new(content)
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
    }
}

/// Status indicator (colored dot)
pub struct StatusIndicator {
    status: Status,
}

impl StatusIndicator {
    /// Indicator for a status
    pub fn new(status: Status) -> Self {
        Self { status }
    }

    /// Colored dot, hollow when nothing was recorded
    pub fn to_span(&self) -> Span<'static> {
        let symbol = match self.status {
            Status::Ok | Status::Alert => "●",
            Status::Unknown => "○",
        };

        Span::styled(symbol, Style::default().fg(self.status.color()))
    }
}
