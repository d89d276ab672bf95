//! Rendering: pure function of the current `App` state.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Focus, ResultsFocus};
use crate::buffer::EditBuffer;
use crate::theme;
use cvlift_types::{AnalysisReport, Route};

const THROBBER: &[&str] = &["⠋", "⠙", "⠸", "⠴", "⠦", "⠇"];

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tab bar
            Constraint::Min(10),   // body
            Constraint::Length(1), // hints
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    match app.route {
        Route::Editor => draw_editor(f, app, chunks[1]),
        Route::Results => draw_results(f, app, chunks[1]),
    }
    draw_hints(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let results_style = if app.report.is_some() {
        theme::text_style()
    } else {
        // Visibly disabled until a report exists.
        Style::default().fg(theme::BORDER).add_modifier(Modifier::DIM)
    };
    let titles = vec![
        Line::from(Span::styled("Upload CV", theme::text_style())),
        Line::from(Span::styled("Results", results_style)),
    ];
    let selected = match app.route {
        Route::Editor => 0,
        Route::Results => 1,
    };
    let title = if app.ctx.debug_enabled {
        Line::from(vec![
            Span::styled("CV Lift", theme::title_style()),
            Span::raw("  "),
            Span::styled("[DEBUG]", theme::title_style().fg(theme::ACCENT)),
        ])
    } else {
        Line::from(Span::styled("CV Lift", theme::title_style()))
    };
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD))
        .block(Block::default().title(title).borders(Borders::ALL).border_style(theme::border_style(false)));
    f.render_widget(tabs, area);
}

fn draw_editor(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // file path
            Constraint::Min(6),    // CV text
            Constraint::Length(6), // JD text
            Constraint::Length(3), // status / error banner
        ])
        .split(area);

    draw_text_field(
        f,
        chunks[0],
        "CV file (pdf, doc, docx, txt · max 10MB)",
        &app.editor.file_path,
        app.editor.focus == Focus::FilePath,
    );
    draw_text_field(
        f,
        chunks[1],
        "Or paste the CV text",
        &app.editor.cv_text,
        app.editor.focus == Focus::CvText,
    );
    draw_text_field(
        f,
        chunks[2],
        "Job description (optional)",
        &app.editor.jd_text,
        app.editor.focus == Focus::JdText,
    );
    draw_status(f, app, chunks[3]);
}

/// Render one edit field with scroll-follow and a visible cursor when focused.
fn draw_text_field(f: &mut Frame, area: Rect, title: &str, buffer: &EditBuffer, focused: bool) {
    let block = Block::default()
        .title(Span::styled(title, theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused));
    let inner = block.inner(area);

    let (row, _) = buffer.cursor();
    let display_col = buffer.cursor_display_col();
    let height = inner.height.max(1) as usize;
    let width = inner.width.max(1) as usize;
    let scroll_y = row.saturating_sub(height - 1);
    let scroll_x = display_col.saturating_sub(width - 1);

    let paragraph = Paragraph::new(buffer.text())
        .style(theme::text_style())
        .scroll((scroll_y as u16, scroll_x as u16))
        .block(block);
    f.render_widget(paragraph, area);

    if focused {
        let x = inner.x + (display_col - scroll_x) as u16;
        let y = inner.y + (row - scroll_y) as u16;
        f.set_cursor_position((x, y));
    }
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let (line, style) = if app.run.executing {
        let frame = THROBBER[app.run.throbber_idx % THROBBER.len()];
        let stage = app
            .run
            .stage
            .map(|s| s.to_string())
            .unwrap_or_else(|| "starting analysis".into());
        (
            Line::from(vec![
                Span::styled(format!("{frame} "), Style::default().fg(theme::ACCENT)),
                Span::styled(format!("{stage}…"), theme::text_style()),
                Span::styled("  (Esc cancels)", theme::text_muted()),
            ]),
            theme::border_style(false),
        )
    } else if let Some(error) = &app.error {
        (
            Line::from(Span::styled(error.clone(), theme::error_style())),
            Style::default().fg(theme::WARN),
        )
    } else {
        (
            Line::from(Span::styled("Ready. Press Ctrl+A to analyze and optimize.", theme::text_muted())),
            theme::border_style(false),
        )
    };

    let paragraph = Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(style));
    f.render_widget(paragraph, area);
}

fn draw_results(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(report) = app.report.clone() else {
        // Unreachable through navigation; render nothing rather than panic.
        return;
    };

    let mut constraints = vec![
        Constraint::Length(8),  // scores
        Constraint::Min(5),     // optimized CV
        Constraint::Length(10), // skill gaps
    ];
    if !report.improvements.is_empty() {
        constraints.insert(2, Constraint::Length(report.improvements.len().min(4) as u16 + 2));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_scores(f, &report, chunks[0]);
    draw_optimized_cv(f, app, &report, chunks[1]);
    if report.improvements.is_empty() {
        draw_skill_gaps(f, app, &report, chunks[2]);
    } else {
        draw_improvements(f, &report, chunks[2]);
        draw_skill_gaps(f, app, &report, chunks[3]);
    }
}

fn draw_improvements(f: &mut Frame, report: &AnalysisReport, area: Rect) {
    let lines: Vec<Line> = report
        .improvements
        .iter()
        .map(|improvement| {
            Line::from(vec![
                Span::styled("✓ ", Style::default().fg(theme::OK)),
                Span::styled(improvement.clone(), theme::text_style()),
            ])
        })
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(Span::styled("Improvements applied", theme::title_style()))
            .borders(Borders::ALL)
            .border_style(theme::border_style(false)),
    );
    f.render_widget(paragraph, area);
}

fn draw_scores(f: &mut Frame, report: &AnalysisReport, area: Rect) {
    let block = Block::default()
        .title(Span::styled("Performance scores", theme::title_style()))
        .borders(Borders::ALL)
        .border_style(theme::border_style(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(30),
            Constraint::Percentage(35),
        ])
        .split(inner);

    draw_score_gauge(f, columns[0], "Original CV", report.original_score);
    draw_delta(f, columns[1], report);
    draw_score_gauge(f, columns[2], "Optimized CV", report.optimized_score);
}

fn draw_score_gauge(f: &mut Frame, area: Rect, label: &str, score: u8) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let caption = Paragraph::new(Span::styled(label, theme::text_muted())).alignment(Alignment::Center);
    f.render_widget(caption, rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme::score_color(score)))
        .percent(u16::from(score.min(100)))
        .label(Span::styled(
            format!("{score}/100"),
            Style::default().fg(theme::FG).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(gauge, rows[1]);
}

fn draw_delta(f: &mut Frame, area: Rect, report: &AnalysisReport) {
    let delta = report.delta();
    let delta_color = if delta >= 0 { theme::OK } else { theme::WARN };
    let mut lines = vec![
        Line::from(Span::styled("→", theme::text_muted())).alignment(Alignment::Center),
        Line::from(Span::styled(
            format!("{} points", report.delta_label()),
            Style::default().fg(delta_color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
    ];
    if let Some(match_score) = report.match_score {
        lines.push(
            Line::from(Span::styled(format!("JD match: {match_score}%"), theme::text_muted()))
                .alignment(Alignment::Center),
        );
    }
    if !report.ats_keywords.is_empty() {
        let keywords = cvlift_util::preview_line(&report.ats_keywords.join(", "), area.width.saturating_sub(2) as usize);
        lines.push(Line::from(Span::styled(keywords, theme::text_muted())).alignment(Alignment::Center));
    }
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_optimized_cv(f: &mut Frame, app: &App, report: &AnalysisReport, area: Rect) {
    let focused = app.results.focus == ResultsFocus::OptimizedText;
    let paragraph = Paragraph::new(report.optimized_cv_text.clone())
        .style(theme::text_style())
        .wrap(Wrap { trim: false })
        .scroll((app.results.cv_scroll, 0))
        .block(
            Block::default()
                .title(Span::styled("Optimized CV", theme::title_style()))
                .borders(Borders::ALL)
                .border_style(theme::border_style(focused)),
        );
    f.render_widget(paragraph, area);
}

fn draw_skill_gaps(f: &mut Frame, app: &mut App, report: &AnalysisReport, area: Rect) {
    let focused = app.results.focus == ResultsFocus::SkillGaps;
    let block = Block::default()
        .title(Span::styled(
            format!("Skills to develop ({})", report.skill_gaps.len()),
            theme::title_style(),
        ))
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if report.skill_gaps.is_empty() {
        let empty = Paragraph::new(Span::styled("No skill gaps detected.", theme::text_muted()));
        f.render_widget(empty, inner);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let items: Vec<ListItem> = report
        .skill_gaps
        .iter()
        .enumerate()
        .map(|(index, gap)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>2}. ", index + 1), theme::text_muted()),
                Span::styled(gap.skill.clone(), theme::text_style()),
                Span::styled(format!("  [{}]", gap.priority), theme::text_muted()),
            ]))
        })
        .collect();
    let list = List::new(items).highlight_style(
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    );
    f.render_stateful_widget(list, rows[0], &mut app.results.gap_list);

    let suggestion = app
        .results
        .gap_list
        .selected()
        .and_then(|index| report.skill_gaps.get(index))
        .map(|gap| gap.suggestion.clone())
        .unwrap_or_default();
    let detail = Paragraph::new(Span::styled(suggestion, theme::text_muted())).wrap(Wrap { trim: true });
    f.render_widget(detail, rows[1]);
}

fn draw_hints(f: &mut Frame, app: &App, area: Rect) {
    let pairs: &[(&str, &str)] = match app.route {
        Route::Editor => &[
            ("Tab", " fields  "),
            ("Ctrl+A", " analyze  "),
            ("Esc", " cancel/clear  "),
            ("Ctrl+R", " results  "),
            ("Ctrl+C", " quit"),
        ],
        Route::Results => &[
            ("Tab", " panes  "),
            ("↑/↓", " scroll/select  "),
            ("c", " copy CV  "),
            ("n", " new analysis  "),
            ("Ctrl+E", " editor  "),
            ("q", " quit"),
        ],
    };
    let mut spans = vec![Span::styled("Hints: ", theme::text_muted())];
    for (key, label) in pairs {
        spans.push(Span::styled(*key, theme::title_style().fg(theme::ACCENT)));
        spans.push(Span::styled(*label, theme::text_muted()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
