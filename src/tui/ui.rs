use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Block, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Tabs,
};

use crate::output::{format_movement, truncate_name};
use crate::scoring::Session;
use crate::season::team_rgb;
use crate::standings::{earned_points, StandingsTable};
use crate::tui::app::{App, EditTarget, FlashKind, InputMode, Tab};
use crate::tui::chart::{build_chart_data, ranked_series, LineStyle};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Title(1) + Tabs(1) + Scheme(1) + Content(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_tabs(frame, chunks[1], app);
    render_scheme_bar(frame, chunks[2], app);
    match app.tab {
        Tab::Drivers => render_standings(frame, chunks[3], app, false),
        Tab::Teams => render_standings(frame, chunks[3], app, true),
        Tab::Progression => render_progression(frame, chunks[3], app),
        Tab::Results => render_results(frame, chunks[3], app),
    }
    render_status_bar(frame, chunks[4], app);

    match app.input_mode {
        InputMode::Editing(target) => render_edit_popup(frame, app, target),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Normal => {}
    }

    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn team_color(name: &str) -> Color {
    let (r, g, b) = team_rgb(name);
    Color::Rgb(r, g, b)
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let left = match app.display_season() {
        Some(season) => format!("gridpoints  {} season", season),
        None => "gridpoints".to_string(),
    };
    let mut spans = vec![Span::styled(
        left.clone(),
        Style::default().fg(theme.title_color).bold(),
    )];

    let scheme = if app.session.scoring().is_customized() {
        "custom scheme"
    } else {
        "official scheme"
    };
    let right = format!("{} rounds  {}", app.session.rounds().len(), scheme);
    let padding_len = (area.width as usize).saturating_sub(left.len() + right.chars().count());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(right, Style::default().fg(theme.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| format!("{} {}", i + 1, tab.title()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style.reversed())
        .divider(" | ");

    frame.render_widget(tabs, area);
}

/// One line showing what the editors would change for the selected position
fn render_scheme_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.muted));
    let value = |v: u32| Span::styled(v.to_string(), Style::default().fg(theme.accent).bold());

    let line = Line::from(vec![
        Span::styled(
            format!("P{}/{}", app.selected_position, app.max_position()),
            Style::default().fg(theme.title_color).bold(),
        ),
        label("  race "),
        value(app.current_value(EditTarget::Race)),
        label("  sprint "),
        value(app.current_value(EditTarget::Sprint)),
        label("  pole bonus "),
        value(app.current_value(EditTarget::PoleBonus)),
        label("  fastest lap bonus "),
        value(app.current_value(EditTarget::FastestLapBonus)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_empty(frame: &mut Frame, area: Rect, app: &App) {
    let text = if app.is_loading {
        String::new()
    } else if let Some(err) = &app.load_error {
        format!("Season not loaded: {} (R to retry)", err)
    } else {
        "No results for this season".to_string()
    };
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.muted)),
        area,
    );
}

fn render_standings(frame: &mut Frame, area: Rect, app: &mut App, teams: bool) {
    let standings = &app.session.snapshot().standings;
    let (custom, official): (&StandingsTable, &StandingsTable) = if teams {
        (&standings.team_custom, &standings.team_official)
    } else {
        (&standings.driver_custom, &standings.driver_official)
    };

    if custom.is_empty() {
        render_empty(frame, area, app);
        return;
    }

    let theme = &app.theme;
    let rows: Vec<Row> = custom
        .iter()
        .enumerate()
        .map(|(idx, standing)| {
            let position = idx + 1;
            let official_position = official.position_of(&standing.key);
            let delta = official_position
                .map(|p| p as i64 - position as i64)
                .unwrap_or(0);
            let official_points = official
                .points_of(&standing.key)
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());

            let name_style = if teams {
                Style::default().fg(team_color(&standing.name))
            } else {
                Style::default()
            };
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", position)).style(Style::default().fg(theme.index_color)),
                Cell::from(truncate_name(&standing.name, 32)).style(name_style),
                Cell::from(format!("{:>5}", standing.points)).style(Style::default().bold()),
                Cell::from(format!("{:>8}", official_points)).style(Style::default().fg(theme.muted)),
                Cell::from(format!("{:>5}", format_movement(position, official_position)))
                    .style(Style::default().fg(theme.movement_color(delta))),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(6),
    ];
    let heading = if teams { "Team" } else { "Driver" };
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", heading, "  Pts", " Official", " Move"])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_progression(frame: &mut Frame, area: Rect, app: &mut App) {
    let columns =
        Layout::horizontal([Constraint::Length(30), Constraint::Fill(1)]).split(area);
    render_driver_list(frame, columns[0], app);
    render_chart(frame, columns[1], app);
}

/// Drivers in chart order; `1`/`2` mark the pinned pair.
fn render_driver_list(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let focus = &app.chart_focus;
    let progression = &app.session.snapshot().progression;

    let rows: Vec<Row> = ranked_series(progression)
        .into_iter()
        .map(|series| {
            let pin = match focus.line_style(&series.key) {
                Some(LineStyle::Solid) => "1",
                Some(LineStyle::Dashed) => "2",
                None => " ",
            };
            Row::new(vec![
                Cell::from(pin).style(Style::default().fg(theme.status_key_color).bold()),
                Cell::from(truncate_name(&series.name, 18)),
                Cell::from(format!("{:>5}", series.final_total())).style(Style::default().bold()),
            ])
        })
        .collect();

    let title = if focus.is_active() {
        " Drivers (c: show all) "
    } else {
        " Drivers (a/b: pin) "
    };
    let table = Table::new(
        rows,
        [Constraint::Length(1), Constraint::Fill(1), Constraint::Length(5)],
    )
    .block(Block::bordered().title(title))
    .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_chart(frame: &mut Frame, area: Rect, app: &App) {
    let snapshot = app.session.snapshot();
    let data = match build_chart_data(&snapshot.progression, app.session.rounds(), &app.chart_focus) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(error = %e, "Progression chart unavailable");
            let text = if app.is_loading {
                String::new()
            } else {
                format!("Chart unavailable: {}", e)
            };
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(app.theme.muted)),
                area,
            );
            return;
        }
    };

    let datasets: Vec<Dataset> = data
        .series
        .iter()
        .map(|s| {
            let (r, g, b) = s.rgb;
            let marker = match s.style {
                LineStyle::Solid => symbols::Marker::Braille,
                LineStyle::Dashed => symbols::Marker::Dot,
            };
            Dataset::default()
                .name(s.name.clone())
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Rgb(r, g, b)))
                .data(&s.points)
        })
        .collect();

    let axis_style = Style::default().fg(app.theme.chart_axis);
    let first = data.labels.first().cloned().unwrap_or_default();
    let last = data.labels.last().cloned().unwrap_or_default();
    let x_labels = vec![
        Span::raw(truncate_name(&first, 20)),
        Span::raw(truncate_name(&last, 20)),
    ];
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{:.0}", data.y_max / 2.0)),
        Span::raw(format!("{:.0}", data.y_max)),
    ];

    let title = if data.focused {
        " Cumulative points (head to head) "
    } else {
        " Cumulative points (top drivers) "
    };
    let chart = Chart::new(datasets)
        .block(Block::bordered().title(title))
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, data.x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, data.y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

fn render_results(frame: &mut Frame, area: Rect, app: &mut App) {
    if app.session.rounds().is_empty() {
        render_empty(frame, area, app);
        return;
    }

    let columns =
        Layout::horizontal([Constraint::Length(34), Constraint::Fill(1)]).split(area);

    let theme = &app.theme;
    let round_rows: Vec<Row> = app
        .session
        .rounds()
        .iter()
        .map(|round| {
            let sprint = if round.has_sprint() { " S" } else { "" };
            Row::new(vec![
                Cell::from(format!("{:>2}", round.number)).style(Style::default().fg(theme.index_color)),
                Cell::from(format!("{}{}", truncate_name(&round.name, 26), sprint)),
            ])
        })
        .collect();
    let rounds_table = Table::new(round_rows, [Constraint::Length(3), Constraint::Fill(1)])
        .block(Block::bordered().title(" Rounds "))
        .row_highlight_style(theme.row_selected);
    frame.render_stateful_widget(rounds_table, columns[0], &mut app.table_state);

    render_round_detail(frame, columns[1], app);
}

fn render_round_detail(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let Some(round) = app.selected_round() else {
        return;
    };
    let scoring = app.session.scoring();

    let mut rows: Vec<Row> = Vec::new();
    let sessions = [(Session::Race, &round.results[..]), (Session::Sprint, round.sprint_results())];
    for (session, results) in sessions {
        if results.is_empty() {
            continue;
        }
        if session == Session::Sprint {
            rows.push(Row::new(vec![Cell::from(""), Cell::from("Sprint").style(theme.header_style)]));
        }
        for result in results {
            let earned = earned_points(result, round, scoring, session);
            let mut extras = Vec::new();
            if earned.fastest_lap > 0 {
                extras.push(format!("+{} FL", earned.fastest_lap));
            }
            if earned.pole > 0 {
                extras.push(format!("+{} pole", earned.pole));
            }
            rows.push(Row::new(vec![
                Cell::from(result.position.label()).style(Style::default().fg(theme.index_color)),
                Cell::from(result.driver.name.clone()),
                Cell::from(result.constructor.name.clone())
                    .style(Style::default().fg(team_color(&result.constructor.name))),
                Cell::from(format!("{:>4}", earned.total())).style(Style::default().bold()),
                Cell::from(extras.join(" ")).style(Style::default().fg(theme.accent)),
            ]));
        }
    }

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Length(5),
        Constraint::Fill(1),
    ];
    let title = format!(" R{} {} ", round.number, round.label());
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Pos", "Driver", "Team", " Pts", ""])
                .style(theme.header_style)
                .bottom_margin(1),
        )
        .block(Block::bordered().title(title));
    frame.render_widget(table, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let text = if let Some((ref msg, kind, _)) = app.flash_message {
        let color = match kind {
            FlashKind::Info => theme.flash_success,
            FlashKind::Error => theme.flash_error,
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(color)))
    } else {
        let mut hints = vec![
            ("Tab", ":view "),
            ("h/l", ":season "),
            ("+/-", ":position "),
            ("r/s", ":race/sprint pts "),
            ("p/f", ":bonus "),
            ("w", ":save "),
        ];
        match app.tab {
            Tab::Results => hints.push(("Enter", ":open ")),
            Tab::Progression => hints.push(("a/b/c", ":pin/clear ")),
            _ => {}
        }
        hints.push(("?", ":help "));
        hints.push(("q", ":quit"));

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_edit_popup(frame: &mut Frame, app: &App, target: EditTarget) {
    let theme = &app.theme;
    let popup_area = centered_rect_fixed(44, 5, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(format!(" {} ", target.prompt(app.selected_position)))
        .title_style(theme.popup_title)
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(inner);
    frame.render_widget(Paragraph::new(format!("{}|", app.input)), chunks[0]);
    frame.render_widget(
        Paragraph::new("Enter: apply | Esc: cancel | not a number = 0")
            .style(Style::default().fg(theme.muted)),
        chunks[1],
    );
}

fn render_help_popup(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let popup_area = centered_rect_fixed(54, 22, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Keyboard Shortcuts ")
        .title_style(theme.popup_title)
        .border_style(Style::default().fg(theme.popup_border))
        .style(Style::default().bg(theme.popup_bg));
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let entries = [
        ("Tab / 1-4     ", "Switch view"),
        ("j / k         ", "Move selection"),
        ("h / l, [ / ]  ", "Previous / next season"),
        ("R             ", "Reload season"),
        ("+ / -         ", "Select finishing position"),
        ("r             ", "Edit race points for position"),
        ("s             ", "Edit sprint points for position"),
        ("p             ", "Edit pole bonus"),
        ("f             ", "Edit fastest lap bonus"),
        ("x             ", "Reset to official points"),
        ("w             ", "Save scheme to config"),
        ("Enter / o     ", "Open round page (Results)"),
        ("a / b         ", "Pin driver 1 / 2 (Progression)"),
        ("c             ", "Show all drivers on chart"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];
    let mut lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered();
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % spinner_chars.len()];
    let text = match app.display_season() {
        Some(season) => format!("{} Loading {}...", spinner, season),
        None => format!("{} Loading...", spinner),
    };

    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.title_color)),
        inner,
    );
}
