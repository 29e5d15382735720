//! Dashboard layout and widget rendering.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Paragraph};
use ratatui::Frame;

use super::runtime::{App, Tab};
use super::style;

/// Renders the full dashboard frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(8), // KPI panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.tab {
        Tab::Mix => render_mix(frame, app, chunks[1]),
        Tab::Capacity => render_capacity(frame, app, chunks[1]),
        Tab::Seasonal => render_seasonal(frame, app, chunks[1]),
        Tab::Forecast => render_forecast(frame, app, chunks[1]),
    }
    render_kpis(frame, app, chunks[2]);
    render_footer(frame, chunks[3]);
}

/// Header bar: app name and tab selector.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " GRIDSCOPE ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let label = format!(" {}:{} ", i + 1, tab.title());
        if *tab == app.tab {
            spans.push(Span::styled(
                label,
                Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ));
        } else {
            spans.push(Span::raw(label));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Daily solar/wind/load energy chart.
fn render_mix(frame: &mut Frame, app: &App, area: Rect) {
    let (start, end) = app.visible_range(app.daily.len());
    let slice = &app.daily[start..end];

    let solar = series(slice, start, |d| d.solar_mwh);
    let wind = series(slice, start, |d| d.wind_mwh);
    let load = series(slice, start, |d| d.load_mwh);

    let datasets = vec![
        line_dataset("Solar", style::SOLAR_COLOR, &solar),
        line_dataset("Wind", style::WIND_COLOR, &wind),
        line_dataset("Load", style::LOAD_COLOR, &load),
    ];

    let x_labels = match (slice.first(), slice.last()) {
        (Some(a), Some(b)) => vec![a.date.to_string(), b.date.to_string()],
        _ => vec![String::new(), String::new()],
    };
    let y_bounds = style::auto_bounds_y(&[&solar, &wind, &load]);

    render_chart(
        frame,
        area,
        " Daily Energy Mix (MWh) ",
        datasets,
        [start as f64, end.max(start + 1) as f64],
        x_labels,
        y_bounds,
    );
}

/// Yearly installed capacity chart.
fn render_capacity(frame: &mut Frame, app: &App, area: Rect) {
    let solar = year_series(&app.capacity, |c| c.solar_mw);
    let wind = year_series(&app.capacity, |c| c.wind_mw);
    let offshore = year_series(&app.capacity, |c| c.wind_offshore_mw);

    let datasets = vec![
        line_dataset("Solar", style::SOLAR_COLOR, &solar),
        line_dataset("Wind", style::WIND_COLOR, &wind),
        line_dataset("Offshore", style::OFFSHORE_COLOR, &offshore),
    ];

    let (x_lo, x_hi) = match (app.capacity.first(), app.capacity.last()) {
        (Some(a), Some(b)) => (f64::from(a.year), f64::from(b.year).max(f64::from(a.year) + 1.0)),
        _ => (0.0, 1.0),
    };
    let x_labels = vec![format!("{}", x_lo as i64), format!("{}", x_hi as i64)];
    let y_bounds = style::auto_bounds_y(&[&solar, &wind, &offshore]);

    render_chart(
        frame,
        area,
        " Installed Capacity (MW) ",
        datasets,
        [x_lo, x_hi],
        x_labels,
        y_bounds,
    );
}

/// Mean generation and load per calendar month.
fn render_seasonal(frame: &mut Frame, app: &App, area: Rect) {
    let solar: Vec<(f64, f64)> = month_series(&app.monthly, |m| m.solar_mw);
    let wind: Vec<(f64, f64)> = month_series(&app.monthly, |m| m.wind_mw);
    let load: Vec<(f64, f64)> = month_series(&app.monthly, |m| m.load_mw);

    let datasets = vec![
        line_dataset("Solar", style::SOLAR_COLOR, &solar),
        line_dataset("Wind", style::WIND_COLOR, &wind),
        line_dataset("Load", style::LOAD_COLOR, &load),
    ];
    let y_bounds = style::auto_bounds_y(&[&solar, &wind, &load]);

    render_chart(
        frame,
        area,
        " Seasonal Profile (mean MW by month) ",
        datasets,
        [1.0, 12.0],
        vec!["Jan".to_string(), "Dec".to_string()],
        y_bounds,
    );
}

/// Actual vs predicted renewable generation.
fn render_forecast(frame: &mut Frame, app: &App, area: Rect) {
    let Some(points) = app.forecast.as_ref() else {
        let message = Paragraph::new(
            "  No forecast available — run with --train or --model-in to populate this panel.",
        )
        .block(
            Block::default()
                .title(" Forecast ")
                .borders(Borders::ALL),
        );
        frame.render_widget(message, area);
        return;
    };

    let (start, end) = app.visible_range(points.len());
    let slice = &points[start..end];

    let actual: Vec<(f64, f64)> = slice
        .iter()
        .enumerate()
        .map(|(i, p)| ((start + i) as f64, f64::from(p.actual_mw)))
        .collect();
    let predicted: Vec<(f64, f64)> = slice
        .iter()
        .enumerate()
        .map(|(i, p)| ((start + i) as f64, f64::from(p.predicted_mw)))
        .collect();

    let datasets = vec![
        line_dataset("Actual", style::ACTUAL_COLOR, &actual),
        line_dataset("Predicted", style::PREDICTED_COLOR, &predicted),
    ];

    let x_labels = match (slice.first(), slice.last()) {
        (Some(a), Some(b)) => vec![
            a.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            b.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        ],
        _ => vec![String::new(), String::new()],
    };
    let y_bounds = style::auto_bounds_y(&[&actual, &predicted]);

    render_chart(
        frame,
        area,
        " Renewable Generation Forecast (MW) ",
        datasets,
        [start as f64, end.max(start + 1) as f64],
        x_labels,
        y_bounds,
    );
}

/// KPI panel mirroring the printed report.
fn render_kpis(frame: &mut Frame, app: &App, area: Rect) {
    let pct = |v: Option<f32>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}%"));
    let lines = vec![
        Line::from(format!(
            "  Renewable share:        {}",
            pct(app.kpi.renewable_share_pct)
        )),
        Line::from(format!(
            "  Solar utilization:      {}",
            pct(app.kpi.solar_utilization_pct)
        )),
        Line::from(format!(
            "  Wind utilization:       {}",
            pct(app.kpi.wind_utilization_pct)
        )),
        Line::from(format!(
            "  Offshore wind share:    {}",
            pct(app.kpi.offshore_wind_share_pct)
        )),
        Line::from(format!(
            "  Load forecast accuracy: {}",
            pct(app.kpi.load_forecast_accuracy_pct)
        )),
        Line::from(format!(
            "  Anomalous rows:         {}",
            app.kpi.anomalous_rows
        )),
    ];
    let block = Block::default().title(" KPIs ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Tab/1-4:Panel  ←/→:Scroll  +/-:Zoom",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

fn series<T>(
    slice: &[T],
    start: usize,
    value: impl Fn(&T) -> Option<f32>,
) -> Vec<(f64, f64)> {
    slice
        .iter()
        .enumerate()
        .filter_map(|(i, item)| value(item).map(|v| ((start + i) as f64, f64::from(v))))
        .collect()
}

fn year_series(
    items: &[crate::report::YearlyCapacity],
    value: impl Fn(&crate::report::YearlyCapacity) -> Option<f32>,
) -> Vec<(f64, f64)> {
    items
        .iter()
        .filter_map(|c| value(c).map(|v| (f64::from(c.year), f64::from(v))))
        .collect()
}

fn month_series(
    items: &[crate::report::MonthlyProfile],
    value: impl Fn(&crate::report::MonthlyProfile) -> Option<f32>,
) -> Vec<(f64, f64)> {
    items
        .iter()
        .filter_map(|m| value(m).map(|v| (f64::from(m.month), f64::from(v))))
        .collect()
}

fn line_dataset<'a>(
    name: &'a str,
    color: ratatui::style::Color,
    data: &'a [(f64, f64)],
) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(color))
        .data(data)
}

fn render_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    datasets: Vec<Dataset<'_>>,
    x_bounds: [f64; 2],
    x_labels: Vec<String>,
    y_bounds: [f64; 2],
) {
    let y_labels = vec![format!("{:.0}", y_bounds[0]), format!("{:.0}", y_bounds[1])];
    let chart = Chart::new(datasets)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .x_axis(Axis::default().bounds(x_bounds).labels(x_labels))
        .y_axis(Axis::default().bounds(y_bounds).labels(y_labels));
    frame.render_widget(chart, area);
}
