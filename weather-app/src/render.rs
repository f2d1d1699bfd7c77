use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use weather_core::{Favourite, SortMode, WeatherSnapshot};

use crate::app::{App, FavouritesPopup, ResultView};
use crate::theme::{
    ACTIVE_HIGHLIGHT, BORDER, HEADING_BLUE, LABEL_GREEN, MUTED_TEXT, POPUP_BORDER, WARNING_RED,
};

const INPUT_PREFIX: &str = "Enter City Name: ";

pub fn draw(frame: &mut Frame, app: &App, view: &ResultView) {
    let [input, body, footer] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .areas(frame.area());

    draw_input(frame, app, input);
    draw_results(frame, view, body);
    draw_footer(frame, app, footer);

    if let Some(popup) = app.popup() {
        draw_favourites(frame, app, popup);
    }
}

fn panel(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(format!(" {title} "), Style::default().fg(LABEL_GREEN)))
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(INPUT_PREFIX, Style::default().fg(LABEL_GREEN)),
        Span::raw(app.input()),
    ]);
    frame.render_widget(Paragraph::new(line).block(panel("Weather App")), area);

    if app.popup().is_none() {
        let offset = u16::try_from(INPUT_PREFIX.len() + app.input().chars().count())
            .unwrap_or(u16::MAX);
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(offset)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn draw_results(frame: &mut Frame, view: &ResultView, area: Rect) {
    let block = panel("Fetched Weather Data");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let snapshot = match view {
        ResultView::Weather(snapshot) => snapshot,
        ResultView::Invalid => {
            let msg = "Error: Invalid city name or data not available. Please enter a valid city.";
            frame.render_widget(error_paragraph(msg), inner);
            return;
        }
        ResultView::Prompt => {
            frame.render_widget(error_paragraph("Search For A Valid City Please!"), inner);
            return;
        }
    };

    let [summary, table] =
        Layout::vertical([Constraint::Length(6), Constraint::Min(0)]).areas(inner);

    let location = &snapshot.location;
    let lines = vec![
        Line::styled("Location:", Style::default().fg(LABEL_GREEN)),
        bullet(format!("City: {}", location.name)),
        bullet(format!("Region: {}", location.region)),
        bullet(format!("Country: {}", location.country)),
        Line::styled("Current Weather:", Style::default().fg(HEADING_BLUE)),
        Line::raw(snapshot.current.condition.text.clone()),
    ];
    frame.render_widget(Paragraph::new(lines), summary);

    let rows = weather_rows(snapshot).into_iter().map(|(name, value, style)| {
        Row::new(vec![Cell::from(name), Cell::from(Span::styled(value, style))])
    });
    let widget = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(
            Row::new(vec!["Property", "Value"])
                .style(Style::default().fg(HEADING_BLUE).add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(BORDER)));
    frame.render_widget(widget, table);
}

/// Property table rows: label, formatted value, value style.
pub fn weather_rows(snapshot: &WeatherSnapshot) -> Vec<(&'static str, String, Style)> {
    let current = &snapshot.current;
    let plain = Style::default();

    vec![
        ("Temperature (C)", format!("{:.2}", current.temp_c), temperature_style(snapshot)),
        ("Humidity", format!("{}%", current.humidity), plain),
        ("Wind Speed (kph)", format!("{:.2}", current.wind_kph), plain),
        ("Wind Direction", current.wind_dir.clone(), plain),
        ("Pressure (mb)", format!("{:.2}", current.pressure_mb), plain),
        ("Precipitation (mm)", format!("{:.2}", current.precip_mm), plain),
        ("Cloud Coverage", format!("{}%", current.cloud), plain),
    ]
}

pub fn temperature_style(snapshot: &WeatherSnapshot) -> Style {
    let color = if snapshot.is_hot() { WARNING_RED } else { HEADING_BLUE };
    Style::default().fg(color)
}

fn bullet(text: String) -> Line<'static> {
    Line::raw(format!("  • {text}"))
}

fn error_paragraph(msg: &str) -> Paragraph<'_> {
    Paragraph::new(Line::styled(msg, Style::default().fg(WARNING_RED))).wrap(Wrap { trim: true })
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let status = match (app.in_flight(), app.last_update()) {
        (Some(query), _) => format!("Fetching {query}..."),
        (None, Some(at)) => format!("Updated {}", at.with_timezone(&Local).format("%H:%M:%S")),
        (None, None) => String::new(),
    };

    let line = Line::from(vec![
        Span::styled(
            "Enter search · Ctrl+A add favourite · Ctrl+F favourites · Esc quit",
            Style::default().fg(MUTED_TEXT),
        ),
        Span::raw("   "),
        Span::styled(status, Style::default().fg(HEADING_BLUE)),
    ]);
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(BORDER));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_favourites(frame: &mut Frame, app: &App, popup: FavouritesPopup) {
    let area = centered_rect(70, 80, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(POPUP_BORDER))
        .title(Span::styled(" Favourites ", Style::default().fg(LABEL_GREEN)));
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let [controls, list] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(inner);
    frame.render_widget(Paragraph::new(sort_line(app.sort_mode())), controls);

    let entries = app.favourites().entries();
    if entries.is_empty() {
        let msg = "No favourites yet. Press Ctrl+A to add the current city.";
        frame.render_widget(Paragraph::new(Line::styled(msg, Style::default().fg(MUTED_TEXT))), list);
        return;
    }

    let mut lines = Vec::new();
    let mut selected_start = 0;
    for (idx, fav) in entries.iter().enumerate() {
        let selected = idx == popup.selected;
        if selected {
            selected_start = lines.len();
        }
        lines.extend(favourite_lines(fav, selected));
    }

    // Keep the highlighted entry in view.
    let scroll = selected_start.saturating_sub(list.height as usize / 2) as u16;
    frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), list);
}

fn sort_line(mode: SortMode) -> Line<'static> {
    let mut spans = vec![Span::styled("Sort By: ", Style::default().fg(LABEL_GREEN))];
    for (idx, candidate) in SortMode::ALL.iter().enumerate() {
        let style = if *candidate == mode {
            Style::default().fg(HEADING_BLUE).add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(MUTED_TEXT)
        };
        spans.push(Span::styled(format!(" {} {} ", idx + 1, candidate.label()), style));
    }
    spans.push(Span::styled(
        "   Tab cycle · ↑↓ select · d remove · Esc close",
        Style::default().fg(MUTED_TEXT),
    ));
    Line::from(spans)
}

fn favourite_lines(fav: &Favourite, selected: bool) -> Vec<Line<'static>> {
    let mut header_style = Style::default().fg(HEADING_BLUE);
    if selected {
        header_style = header_style.bg(ACTIVE_HIGHLIGHT).add_modifier(Modifier::BOLD);
    }

    let mut lines = vec![Line::from(vec![
        Span::styled(fav.label.clone(), header_style),
        Span::styled(if selected { "  [d] remove" } else { "" }, Style::default().fg(MUTED_TEXT)),
    ])];

    match fav.snapshot() {
        Ok(snap) => {
            let current = &snap.current;
            lines.push(bullet(format!("Temperature (C): {:.2}", current.temp_c)));
            lines.push(bullet(format!("Humidity: {}%", current.humidity)));
            lines.push(bullet(format!("Wind Speed (kph): {:.2}", current.wind_kph)));
            lines.push(bullet(format!("Pressure (mb): {:.2}", current.pressure_mb)));
            lines.push(bullet(format!("Cloud Coverage: {}%", current.cloud)));
        }
        Err(_) => lines.push(Line::styled("Invalid data.", Style::default().fg(WARNING_RED))),
    }
    lines.push(Line::raw(""));
    lines
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);

    center
}
