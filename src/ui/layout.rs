use {
    crate::stream_core::Snapshot,
    crate::ui::renderer::{format_optional_time, format_pct, format_score, sparkline_value},
    ratatui::{
        layout::{Constraint, Direction, Layout as RatLayout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Paragraph, Row, Sparkline, Table},
        Frame,
    },
};

/// Render the main UI layout
pub fn render_layout(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let chunks = RatLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(7), // Series
            Constraint::Min(0),    // Tables
            Constraint::Length(3), // Footer/Status
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_series(f, chunks[1], snapshot);

    let tables = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_keywords_table(f, tables[0], snapshot);
    render_totals_table(f, tables[1], snapshot);

    render_footer(f, chunks[3], snapshot);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Block::default()
        .borders(Borders::ALL)
        .title("Lexiflow - Live Message Analysis");

    let text = vec![Line::from(vec![
        Span::styled(
            "Lexiflow",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" - Press 'q' or Esc to quit"),
    ])];

    f.render_widget(Paragraph::new(text).block(header), area);
}

fn render_series(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let halves = RatLayout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let content: Vec<u64> = snapshot
        .content_series
        .iter()
        .map(|p| sparkline_value(p.value))
        .collect();
    let impact: Vec<u64> = snapshot
        .impact_series
        .iter()
        .map(|p| sparkline_value(p.value))
        .collect();

    let latest_content = snapshot
        .content_series
        .last()
        .map(|p| format_score(p.value))
        .unwrap_or_else(|| "-".to_string());
    let latest_impact = snapshot
        .impact_series
        .last()
        .map(|p| format_score(p.value))
        .unwrap_or_else(|| "-".to_string());

    let content_spark = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Content ({})", latest_content)),
        )
        .data(&content)
        .max(100)
        .style(Style::default().fg(Color::Green));
    let impact_spark = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Impact ({})", latest_impact)),
        )
        .data(&impact)
        .max(100)
        .style(Style::default().fg(Color::Blue));

    f.render_widget(content_spark, halves[0]);
    f.render_widget(impact_spark, halves[1]);
}

fn render_keywords_table(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let header = Row::new(vec!["Keyword", "Mentions"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let visible = area.height.saturating_sub(3) as usize;
    let rows: Vec<Row> = snapshot
        .top_keywords(visible)
        .iter()
        .map(|tc| Row::new(vec![tc.term.clone(), tc.count.to_string()]))
        .collect();

    let widths = [Constraint::Min(16), Constraint::Length(10)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Top Keywords"));

    f.render_widget(table, area);
}

fn render_totals_table(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let totals = &snapshot.totals;
    let rates = &snapshot.rates;

    let header = Row::new(vec!["Metric", "Count", "Rate"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows = vec![
        Row::new(vec![
            "Messages".to_string(),
            totals.event_count.to_string(),
            String::new(),
        ]),
        Row::new(vec![
            "Significant".to_string(),
            totals.significant_count.to_string(),
            format_pct(rates.significant_pct),
        ])
        .style(Style::default().fg(Color::Green)),
        Row::new(vec![
            "High impact".to_string(),
            totals.high_impact_count.to_string(),
            format_pct(rates.high_impact_pct),
        ])
        .style(Style::default().fg(Color::Yellow)),
        Row::new(vec![
            "Opportunities".to_string(),
            totals.opportunity_count.to_string(),
            format_pct(rates.opportunity_pct),
        ])
        .style(Style::default().fg(Color::Red)),
        Row::new(vec![
            "Contributors".to_string(),
            snapshot.contributor_count.to_string(),
            String::new(),
        ]),
    ];

    let widths = [
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Totals"));

    f.render_widget(table, area);
}

fn render_footer(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let text = vec![Line::from(vec![
        Span::styled("Window: ", Style::default().fg(Color::Cyan)),
        Span::raw(format!(
            "{}/{}",
            snapshot.content_series.len(),
            snapshot.window_capacity
        )),
        Span::raw(" | "),
        Span::styled("Skipped: ", Style::default().fg(Color::Cyan)),
        Span::raw(snapshot.totals.skipped_count.to_string()),
        Span::raw(" | "),
        Span::styled("Last event: ", Style::default().fg(Color::Cyan)),
        Span::raw(format_optional_time(snapshot.last_event_at)),
    ])];

    let footer = Block::default().borders(Borders::ALL).title("Status");

    f.render_widget(Paragraph::new(text).block(footer), area);
}
