//! UI rendering for the TUI

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Wrap,
    },
    Frame,
};

use super::app::{App, PopupKind, View};
use super::chart;
use super::components::{MetricCard, Status, StatusIndicator};
use crate::models::{format_value, MetricKind};
use crate::tracker::TIMESTAMP_FORMAT;

/// Main colors
const PRIMARY: Color = Color::Cyan;
const SUCCESS: Color = Color::Green;
const WARNING: Color = Color::Yellow;
const ERROR: Color = Color::Red;
const MUTED: Color = Color::DarkGray;

/// Most recent readings listed under the entry box
const RECENT_READINGS: usize = 10;

/// Draw the entire UI
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.size());

    draw_header(frame, app, chunks[0]);
    match app.view {
        View::Entry => draw_entry(frame, app, chunks[1]),
        View::Metric(metric) => draw_metric_chart(frame, app, metric, chunks[1]),
        View::AllMetrics => draw_all_metrics_chart(frame, app, chunks[1]),
    }
    draw_status_bar(frame, app, chunks[2]);

    if app.show_help {
        draw_help_overlay(frame);
    }
    if let Some(popup) = &app.popup {
        draw_popup(frame, popup.kind, &popup.title, &popup.body);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let view = match app.view {
        View::Entry => "Entry".to_string(),
        View::Metric(metric) => format!("{} chart", metric.title()),
        View::AllMetrics => "All metrics".to_string(),
    };

    let header = Line::from(vec![
        Span::styled("♥ VitalTrack", Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)),
        Span::styled("  Suit and Health Tracker", Style::default().fg(MUTED)),
        Span::raw("  │  "),
        Span::styled(view, Style::default().fg(PRIMARY)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn draw_entry(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    draw_metric_cards(frame, app, chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    draw_input(frame, app, bottom[0]);
    draw_recent_readings(frame, app, bottom[1]);
}

fn draw_metric_cards(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (metric, chunk) in MetricKind::ALL.into_iter().zip(chunks.iter()) {
        let latest = app.tracker.latest(metric).map(|r| r.value);
        let value = latest.map_or_else(
            || "N/A".to_string(),
            |v| format!("{} {}", format_value(v), metric.unit()),
        );
        let status = Status::of(app.tracker.ranges().bounds_for(metric), latest);

        MetricCard::new(format!("{} {}", metric.index() + 1, metric.title()), value)
            .status(status)
            .selected(metric == app.selected)
            .render(frame, *chunk);
    }
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let metric = app.selected;
    let range = app.tracker.ranges().bounds_for(metric);

    let border = if app.editing { PRIMARY } else { MUTED };
    let block = Block::default()
        .title(format!(" Update {} ", metric.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let input_line = if app.editing {
        Line::from(vec![
            Span::raw("> "),
            Span::styled(app.input.as_str(), Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(PRIMARY)),
        ])
    } else {
        Line::from(Span::styled(
            "Press e or Enter to enter a value",
            Style::default().fg(MUTED),
        ))
    };

    let text = Text::from(vec![
        input_line,
        Line::raw(""),
        Line::from(vec![
            Span::styled("Healthy range: ", Style::default().fg(MUTED)),
            Span::styled(format!("{range} {}", metric.unit()), Style::default().fg(SUCCESS)),
        ]),
        Line::from(vec![
            Span::styled("Readings: ", Style::default().fg(MUTED)),
            Span::raw(app.tracker.series_for(metric).len().to_string()),
        ]),
    ]);

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_recent_readings(frame: &mut Frame, app: &App, area: Rect) {
    let metric = app.selected;
    let range = app.tracker.ranges().bounds_for(metric);
    let series = app.tracker.series_for(metric);

    let rows: Vec<Row> = series
        .iter()
        .rev()
        .take(RECENT_READINGS)
        .map(|reading| {
            let status = Status::of(range, Some(reading.value));
            let condition = app
                .tracker
                .evaluate(metric, reading.value)
                .map_or_else(String::new, |alert| alert.condition.to_string());
            Row::new(vec![
                Cell::from(reading.timestamp.format(TIMESTAMP_FORMAT).to_string()),
                Cell::from(Line::from(vec![
                    StatusIndicator::new(status).to_span(),
                    Span::raw(" "),
                    Span::raw(reading.display_value()),
                ])),
                Cell::from(Span::styled(condition, Style::default().fg(WARNING))),
            ])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Recent {} ", metric.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED));

    if rows.is_empty() {
        let empty = Paragraph::new("No readings yet")
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let table = Table::new(
        rows,
        [Constraint::Length(20), Constraint::Length(12), Constraint::Min(10)],
    )
    .header(
        Row::new(vec!["Time", "Value", "Condition"])
            .style(Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)),
    )
    .block(block);

    frame.render_widget(table, area);
}

fn draw_metric_chart(frame: &mut Frame, app: &App, metric: MetricKind, area: Rect) {
    let range = app.tracker.ranges().bounds_for(metric);
    let data = chart::points(&app.tracker.series_for(metric));

    let x_bounds = chart::time_bounds([data.as_slice()]);
    let y_bounds = chart::value_bounds([data.as_slice()], Some(range));
    let min_line = chart::band_line(x_bounds, range.min);
    let max_line = chart::band_line(x_bounds, range.max);

    let datasets = vec![
        Dataset::default()
            .name("Min healthy value")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(ERROR))
            .data(&min_line),
        Dataset::default()
            .name("Max healthy value")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(SUCCESS))
            .data(&max_line),
        Dataset::default()
            .name(metric.title())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(chart::metric_color(metric)))
            .data(&data),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(chart::metric_color(metric)))
            .data(&data),
    ];

    let title = format!(" {} Over Time ", metric.title());
    frame.render_widget(build_chart(datasets, title, metric.title(), x_bounds, y_bounds), area);
}

fn draw_all_metrics_chart(frame: &mut Frame, app: &App, area: Rect) {
    let series: Vec<(MetricKind, Vec<(f64, f64)>)> = app
        .tracker
        .all_series()
        .into_iter()
        .filter(|(_, readings)| !readings.is_empty())
        .map(|(metric, readings)| (metric, chart::points(&readings)))
        .collect();

    if series.is_empty() {
        let empty = Paragraph::new("No data recorded yet")
            .style(Style::default().fg(MUTED))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(" Cumulative Health Metrics Over Time ")
                    .borders(Borders::ALL),
            );
        frame.render_widget(empty, area);
        return;
    }

    let x_bounds = chart::time_bounds(series.iter().map(|(_, points)| points.as_slice()));
    let y_bounds = chart::value_bounds(series.iter().map(|(_, points)| points.as_slice()), None);

    let datasets = series
        .iter()
        .map(|(metric, points)| {
            Dataset::default()
                .name(metric.title())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(chart::metric_color(*metric)))
                .data(points)
        })
        .collect();

    frame.render_widget(
        build_chart(
            datasets,
            " Cumulative Health Metrics Over Time ".to_string(),
            "Metrics Values".to_string(),
            x_bounds,
            y_bounds,
        ),
        area,
    );
}

fn build_chart<'a>(
    datasets: Vec<Dataset<'a>>,
    title: String,
    y_title: String,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) -> Chart<'a> {
    let x_labels = chart::time_labels(x_bounds).into_iter().map(Span::raw).collect();
    let y_labels = chart::value_labels(y_bounds).into_iter().map(Span::raw).collect();

    Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED)),
        )
        .x_axis(
            Axis::default()
                .title("Time")
                .style(Style::default().fg(MUTED))
                .bounds(x_bounds)
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(y_title)
                .style(Style::default().fg(MUTED))
                .bounds(y_bounds)
                .labels(y_labels),
        )
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hints = if app.editing {
        "Enter submit │ Esc cancel"
    } else {
        "↑↓ select │ e enter value │ v chart │ a all │ t transcript │ ? help │ q quit"
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(MUTED))];
    if let Some(status) = app.get_status() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.to_string(), Style::default().fg(SUCCESS)));
    }
    spans.push(Span::styled(
        format!("  │ {} readings", app.tracker.reading_count()),
        Style::default().fg(MUTED),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_popup(frame: &mut Frame, kind: PopupKind, title: &str, body: &str) {
    let area = centered_rect(60, 40, frame.size());
    let color = match kind {
        PopupKind::Alert => WARNING,
        PopupKind::Error => ERROR,
        PopupKind::Info => PRIMARY,
    };

    let mut lines: Vec<Line> = body.lines().map(|l| Line::raw(l.to_string())).collect();
    lines.push(Line::raw(""));
    lines.push(Line::styled("Press Enter to close", Style::default().fg(MUTED)));

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn draw_help_overlay(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.size());

    let bindings = [
        ("↑/k ↓/j Tab", "Select metric"),
        ("1-4", "Jump to metric"),
        ("e / Enter", "Enter a value"),
        ("Enter", "Submit value"),
        ("Esc", "Cancel / back to entry"),
        ("v", "Chart selected metric"),
        ("a", "Chart all metrics"),
        ("t", "Show transcript"),
        ("?", "Toggle help"),
        ("q / Ctrl+C", "Quit"),
    ];

    let lines: Vec<Line> = bindings
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:>14}  "),
                    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*action),
            ])
        })
        .collect();

    let help = Paragraph::new(lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(PRIMARY)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(help, area);
}

/// Centered rectangle taking the given percentages of `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn enter(app: &mut App, keys: &str) {
        app.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE));
        for c in keys.chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    }

    #[test]
    fn test_entry_view_renders_cards() {
        let app = App::default();
        let screen = render(&app);
        assert!(screen.contains("Heart Rate"));
        assert!(screen.contains("Hydration"));
        assert!(screen.contains("No readings yet"));
    }

    #[test]
    fn test_charts_render_with_data() {
        let mut app = App::default();
        enter(&mut app, "72");
        enter(&mut app, "75");

        app.handle_key(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::NONE));
        assert!(render(&app).contains("Heart Rate Over Time"));

        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert!(render(&app).contains("Cumulative Health Metrics Over Time"));
    }

    #[test]
    fn test_popup_renders_over_view() {
        let mut app = App::default();
        enter(&mut app, "40");
        assert!(render(&app).contains("Health Alert"));
    }

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, outer);
        assert!(inner.x >= outer.x && inner.right() <= outer.right());
        assert!(inner.y >= outer.y && inner.bottom() <= outer.bottom());
    }
}
