use std::path::Path;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph,
        Row, Table, Wrap,
    },
    Frame,
};

use crate::error::Result;
use crate::filter::{self, Controls, FilterOptions, ALL_CLIENTS, ALL_TBMS};
use crate::fmt::{compact_money, money, number};
use crate::models::{Month, TransactionTable};
use crate::pipeline::{self, Render, Session, NO_VIEW_DATA};
use crate::settings::Settings;
use crate::summary::{ClientSummary, GroupTotal, Summary};
use crate::tui::{
    money_span, run_app, truncate, App, AppAction, BOLD, ERROR_STYLE, FOOTER_STYLE, HEADER_STYLE,
    SELECTED_STYLE, SUCCESS_STYLE,
};

const SIDEBAR_WIDTH: u16 = 36;

/// A multi-select dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dim {
    Branch,
    Month,
    Client,
    Tbm,
}

impl Dim {
    fn label(self) -> &'static str {
        match self {
            Dim::Branch => "Branch",
            Dim::Month => "Month",
            Dim::Client => "Client",
            Dim::Tbm => "TBM",
        }
    }

    fn select_all_label(self) -> &'static str {
        match self {
            Dim::Branch => "Select All Branches",
            Dim::Month => "Select All Months",
            Dim::Client => "Select All Clients (Dashboard)",
            Dim::Tbm => "Select All TBMs (Dashboard)",
        }
    }
}

/// One focusable row in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Multi(Dim),
    QuickClient,
    QuickTbm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Overview,
    ClientSummary,
    RawData,
}

impl Page {
    fn next(self) -> Self {
        match self {
            Page::Overview => Page::ClientSummary,
            Page::ClientSummary => Page::RawData,
            Page::RawData => Page::Overview,
        }
    }

    fn prev(self) -> Self {
        match self {
            Page::Overview => Page::RawData,
            Page::ClientSummary => Page::Overview,
            Page::RawData => Page::ClientSummary,
        }
    }

    fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::ClientSummary => "Client Summary",
            Page::RawData => "Raw Data",
        }
    }
}

struct Picker {
    dim: Dim,
    cursor: usize,
}

struct Dashboard {
    session: Session,
    settings: Settings,
    controls: Controls,
    focus: usize,
    picker: Option<Picker>,
    page: Page,
    scroll: usize,
    visible_rows: usize,
    status_message: Option<String>,
}

impl Dashboard {
    fn new(session: Session, settings: Settings) -> Self {
        let controls = Controls::new(settings.select_all_by_default);
        Self {
            session,
            settings,
            controls,
            focus: 0,
            picker: None,
            page: Page::Overview,
            scroll: 0,
            visible_rows: 20,
            status_message: None,
        }
    }

    fn has_tbm(&self) -> bool {
        self.session.table().is_ok_and(|t| t.has_tbm)
    }

    fn control_list(&self) -> Vec<Control> {
        let mut list = vec![
            Control::Multi(Dim::Branch),
            Control::Multi(Dim::Month),
            Control::Multi(Dim::Client),
        ];
        if self.has_tbm() {
            list.push(Control::Multi(Dim::Tbm));
        }
        list.push(Control::QuickClient);
        if self.has_tbm() {
            list.push(Control::QuickTbm);
        }
        list
    }

    fn current_options(&self) -> FilterOptions {
        match self.session.table() {
            Ok(table) => filter::options(table, &self.controls),
            Err(_) => FilterOptions::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Control mutation
    // -----------------------------------------------------------------------

    fn toggle_all(&mut self, dim: Dim) {
        match dim {
            Dim::Branch => self.controls.branches.toggle_all(),
            Dim::Month => self.controls.months.toggle_all(),
            Dim::Client => self.controls.clients.toggle_all(),
            Dim::Tbm => self.controls.tbms.toggle_all(),
        }
        self.scroll = 0;
    }

    fn toggle_item(&mut self, dim: Dim, idx: usize, opts: &FilterOptions) {
        match dim {
            Dim::Branch => {
                if let Some(item) = opts.branches.get(idx) {
                    self.controls.branches.toggle_item(item, &opts.branches);
                }
            }
            Dim::Month => {
                if let Some(item) = opts.months.get(idx) {
                    self.controls.months.toggle_item(item, &opts.months);
                }
            }
            Dim::Client => {
                if let Some(item) = opts.clients.get(idx) {
                    self.controls.clients.toggle_item(item, &opts.clients);
                }
            }
            Dim::Tbm => {
                if let Some(item) = opts.tbms.get(idx) {
                    self.controls.tbms.toggle_item(item, &opts.tbms);
                }
            }
        }
        self.scroll = 0;
    }

    fn step_quick(&mut self, control: Control, delta: isize) {
        let opts = self.current_options();
        match control {
            Control::QuickClient => {
                self.controls.quick_client =
                    filter::step_quick(&self.controls.quick_client, &opts.quick_clients, delta);
            }
            Control::QuickTbm => {
                self.controls.quick_tbm =
                    filter::step_quick(&self.controls.quick_tbm, &opts.quick_tbms, delta);
            }
            Control::Multi(_) => {}
        }
        self.scroll = 0;
    }

    /// Furthest the raw data table can scroll. Only the Raw Data page scrolls.
    fn max_scroll(&self) -> usize {
        if self.page != Page::RawData {
            return 0;
        }
        match self.session.table() {
            Ok(table) => pipeline::run(table, &self.controls, &self.settings)
                .raw
                .len()
                .saturating_sub(self.visible_rows),
            Err(_) => 0,
        }
    }

    fn reload(&mut self) {
        let changed = self.session.reload();
        tracing::debug!(changed, decodes = self.session.decode_count(), "reload requested");
        if changed {
            self.controls = Controls::new(self.settings.select_all_by_default);
            self.focus = 0;
            self.picker = None;
            self.scroll = 0;
            self.status_message = Some(match self.session.table() {
                Ok(_) => "Workbook reloaded.".to_string(),
                Err(e) => format!("Reload failed: {e}"),
            });
        } else {
            self.status_message = Some("Workbook unchanged; using cached data.".to_string());
        }
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    fn handle_picker_key(&mut self, code: KeyCode) {
        let Some(picker) = &self.picker else {
            return;
        };
        let dim = picker.dim;
        let cursor = picker.cursor;
        let opts = self.current_options();
        let len = option_labels(dim, &opts).len();
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.picker = None,
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(p) = &mut self.picker {
                    p.cursor = cursor.saturating_sub(1);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(p) = &mut self.picker {
                    p.cursor = (cursor + 1).min(len.saturating_sub(1));
                }
            }
            KeyCode::Char(' ') => self.toggle_item(dim, cursor, &opts),
            KeyCode::Char('a') => self.toggle_all(dim),
            _ => {}
        }
    }

    fn handle_sidebar_key(&mut self, code: KeyCode) -> AppAction {
        let list = self.control_list();
        let focused = list.get(self.focus).copied();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Close,
            KeyCode::Up => self.focus = self.focus.saturating_sub(1),
            KeyCode::Down => self.focus = (self.focus + 1).min(list.len().saturating_sub(1)),
            KeyCode::Tab => {
                self.page = self.page.next();
                self.scroll = 0;
            }
            KeyCode::BackTab => {
                self.page = self.page.prev();
                self.scroll = 0;
            }
            KeyCode::PageDown | KeyCode::Char('j') => {
                self.scroll = (self.scroll + self.visible_rows.max(1)).min(self.max_scroll())
            }
            KeyCode::PageUp | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(self.visible_rows.max(1))
            }
            KeyCode::Home => self.scroll = 0,
            KeyCode::Char('r') => self.reload(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(Control::Multi(dim)) = focused {
                    self.picker = Some(Picker { dim, cursor: 0 });
                }
            }
            KeyCode::Char('a') => {
                if let Some(Control::Multi(dim)) = focused {
                    self.toggle_all(dim);
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let delta = if code == KeyCode::Left { -1 } else { 1 };
                if let Some(c @ (Control::QuickClient | Control::QuickTbm)) = focused {
                    self.step_quick(c, delta);
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw_sidebar(&self, frame: &mut Frame, area: Rect, table: &TransactionTable, render: &Render) {
        if let Some(picker) = &self.picker {
            self.draw_picker(frame, area, picker, &render.options);
            return;
        }

        let opts = &render.options;
        let list = self.control_list();
        let mut lines = vec![Line::from(Span::styled(" Filter Controls", BOLD))];

        for (i, control) in list.iter().enumerate() {
            let marker = if i == self.focus { ">" } else { " " };
            let style = if i == self.focus { SELECTED_STYLE } else { Style::default() };
            if *control == Control::QuickClient {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(" Quick Client View", BOLD)));
            }
            let text = match control {
                Control::Multi(dim) => {
                    let (all, picked, total) = self.selection_state(*dim, opts);
                    let flag = if all { "[all]" } else { "[   ]" };
                    format!(" {marker} {:<7}{flag} {picked}/{total}", dim.label())
                }
                Control::QuickClient => {
                    let name = self.controls.quick_client.as_deref().unwrap_or(ALL_CLIENTS);
                    format!(" {marker} Client \u{2039} {} \u{203a}", truncate(name, 20))
                }
                Control::QuickTbm => {
                    let name = self.controls.quick_tbm.as_deref().unwrap_or(ALL_TBMS);
                    format!(" {marker} TBM    \u{2039} {} \u{203a}", truncate(name, 20))
                }
            };
            lines.push(Line::from(Span::styled(text, style)));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Dashboard View", BOLD)));
        lines.push(Line::from(format!("   Rows    {}", number(render.dashboard.len()))));
        lines.push(Line::from(vec![
            Span::raw("   Total   "),
            money_span(render.dashboard_total()),
        ]));

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" Workbook", BOLD)));
        let file_name = self
            .session
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        lines.push(Line::from(format!("   {}", truncate(&file_name, 30))));
        lines.push(Line::from(format!(
            "   {} rows, {} dropped",
            number(table.rows.len()),
            number(table.dropped)
        )));
        if !table.has_tbm {
            lines.push(Line::from(Span::styled("   no TBM column", FOOTER_STYLE)));
        }

        let block = Block::default().borders(Borders::RIGHT).border_style(FOOTER_STYLE);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    /// (select-all on, picked count, option count) for a dimension.
    fn selection_state(&self, dim: Dim, opts: &FilterOptions) -> (bool, usize, usize) {
        match dim {
            Dim::Branch => (
                self.controls.branches.is_all(),
                self.controls.branches.picked_count(&opts.branches),
                opts.branches.len(),
            ),
            Dim::Month => (
                self.controls.months.is_all(),
                self.controls.months.picked_count(&opts.months),
                opts.months.len(),
            ),
            Dim::Client => (
                self.controls.clients.is_all(),
                self.controls.clients.picked_count(&opts.clients),
                opts.clients.len(),
            ),
            Dim::Tbm => (
                self.controls.tbms.is_all(),
                self.controls.tbms.picked_count(&opts.tbms),
                opts.tbms.len(),
            ),
        }
    }

    fn is_picked(&self, dim: Dim, idx: usize, opts: &FilterOptions) -> bool {
        match dim {
            Dim::Branch => opts.branches.get(idx).is_some_and(|o| self.controls.branches.is_picked(o)),
            Dim::Month => opts.months.get(idx).is_some_and(|o| self.controls.months.is_picked(o)),
            Dim::Client => opts.clients.get(idx).is_some_and(|o| self.controls.clients.is_picked(o)),
            Dim::Tbm => opts.tbms.get(idx).is_some_and(|o| self.controls.tbms.is_picked(o)),
        }
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect, picker: &Picker, opts: &FilterOptions) {
        let labels = option_labels(picker.dim, opts);
        let (all, _, _) = self.selection_state(picker.dim, opts);

        let mut lines = vec![
            Line::from(Span::styled(format!(" Select {}", picker.dim.label()), BOLD)),
            Line::from(format!(
                " [{}] {}",
                if all { "x" } else { " " },
                picker.dim.select_all_label()
            )),
            Line::from(""),
        ];

        let visible = area.height.saturating_sub(5) as usize;
        let offset = picker.cursor.saturating_sub(visible.saturating_sub(1));
        if labels.is_empty() {
            lines.push(Line::from(Span::styled("   (no options)", FOOTER_STYLE)));
        }
        for (i, label) in labels.iter().enumerate().skip(offset).take(visible) {
            let mark = if self.is_picked(picker.dim, i, opts) { "x" } else { " " };
            let style = if i == picker.cursor { SELECTED_STYLE } else { Style::default() };
            lines.push(Line::from(Span::styled(
                format!(" [{mark}] {}", truncate(label, SIDEBAR_WIDTH as usize - 8)),
                style,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " Space=pick  a=all  Esc=done",
            FOOTER_STYLE,
        )));

        let block = Block::default().borders(Borders::RIGHT).border_style(FOOTER_STYLE);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_main(&self, frame: &mut Frame, area: Rect, table: &TransactionTable, render: &Render) {
        let [tabs_area, content_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

        let tabs: Vec<Span> = [Page::Overview, Page::ClientSummary, Page::RawData]
            .iter()
            .flat_map(|p| {
                let style = if *p == self.page { HEADER_STYLE } else { FOOTER_STYLE };
                [Span::styled(format!(" {} ", p.title()), style), Span::raw(" ")]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(tabs)), tabs_area);

        let Some(summary) = &render.summary else {
            frame.render_widget(
                Paragraph::new(format!("\n {NO_VIEW_DATA}")).style(ERROR_STYLE),
                content_area,
            );
            return;
        };

        match self.page {
            Page::Overview => draw_overview(frame, content_area, summary, self.settings.top_clients),
            Page::ClientSummary => {
                draw_client_summary(frame, content_area, render.client_summary.as_ref())
            }
            Page::RawData => {
                let max = render.raw.len().saturating_sub(self.visible_rows);
                draw_raw_data(frame, content_area, render, table.has_tbm, self.scroll.min(max));
            }
        }
    }
}

impl App for Dashboard {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, sep_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new("━".repeat(area.width as usize)).style(FOOTER_STYLE),
            sep_area,
        );

        let hints = if self.picker.is_some() {
            " \u{2191}/\u{2193}=move  Space=pick  a=select all  Esc=done"
        } else {
            " \u{2191}/\u{2193}=control  Enter=pick  a=all  \u{2190}/\u{2192}=quick  Tab=page  PgUp/PgDn=scroll  r=reload  q=quit"
        };
        let footer = match &self.status_message {
            Some(msg) => Paragraph::new(format!(" {msg}")).style(Style::default().fg(Color::Yellow)),
            None => Paragraph::new(hints).style(FOOTER_STYLE),
        };
        frame.render_widget(footer, footer_area);

        let [sidebar_area, main_area] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                .areas(body_area);
        // tabs line, table header, position line
        self.visible_rows = main_area.height.saturating_sub(3) as usize;

        let table = match self.session.table() {
            Ok(table) => table,
            Err(msg) => {
                frame.render_widget(
                    Paragraph::new(" Sales Dashboard").style(HEADER_STYLE),
                    header_area,
                );
                frame.render_widget(
                    Paragraph::new(format!("\n {msg}"))
                        .style(ERROR_STYLE)
                        .wrap(Wrap { trim: false }),
                    body_area,
                );
                return;
            }
        };

        let title = match table.latest_year() {
            Some(year) => format!(" Sales Dashboard: Data Overview for {year}"),
            None => " Sales Dashboard".to_string(),
        };
        frame.render_widget(Paragraph::new(title).style(HEADER_STYLE), header_area);

        let render = pipeline::run(table, &self.controls, &self.settings);
        self.draw_sidebar(frame, sidebar_area, table, &render);
        self.draw_main(frame, main_area, table, &render);

        let max_scroll = render.raw.len().saturating_sub(self.visible_rows);
        self.scroll = self.scroll.min(max_scroll);
    }

    fn handle_key(&mut self, code: KeyCode) -> AppAction {
        self.status_message = None;
        if self.picker.is_some() {
            self.handle_picker_key(code);
            return AppAction::Continue;
        }
        self.handle_sidebar_key(code)
    }
}

fn option_labels(dim: Dim, opts: &FilterOptions) -> Vec<String> {
    match dim {
        Dim::Branch => opts.branches.clone(),
        Dim::Month => opts.months.iter().map(|m| m.name().to_string()).collect(),
        Dim::Client => opts.clients.clone(),
        Dim::Tbm => opts.tbms.clone(),
    }
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

fn kpi_box(frame: &mut Frame, area: Rect, title: &str, value: String) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(FOOTER_STYLE);
    frame.render_widget(Paragraph::new(Span::styled(value, BOLD)).block(block), area);
}

fn draw_overview(frame: &mut Frame, area: Rect, summary: &Summary, top_n: usize) {
    let [kpi_area, charts_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(area);

    let [k1, k2, k3] = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(kpi_area);
    kpi_box(frame, k1, " Total Sales ", money(summary.total));
    kpi_box(frame, k2, " Transactions ", number(summary.count));
    kpi_box(frame, k3, " Avg Sale Value ", money(summary.average));

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(charts_area);
    let [trend_area, branch_area] =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(left);
    let [clients_area, leader_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(4)]).areas(right);

    draw_monthly_trend(frame, trend_area, summary);
    draw_group_bars(frame, branch_area, " Sales by Branch ", &summary.by_branch);
    draw_group_bars(
        frame,
        clients_area,
        &format!(" Top {top_n} Clients "),
        &summary.top_clients,
    );

    let block = Block::default()
        .title(" Leading Branch ")
        .borders(Borders::ALL)
        .border_style(FOOTER_STYLE);
    let text = match &summary.top_branch {
        Some(top) => Line::from(vec![
            Span::styled(top.name.clone(), BOLD),
            Span::raw(" is the top performer with "),
            Span::styled(money(top.total), BOLD),
            Span::raw(" in sales."),
        ]),
        None => Line::from("No branch totals."),
    };
    frame.render_widget(
        Paragraph::new(text)
            .style(SUCCESS_STYLE)
            .wrap(Wrap { trim: true })
            .block(block),
        leader_area,
    );
}

fn draw_monthly_trend(frame: &mut Frame, area: Rect, summary: &Summary) {
    let points: Vec<(f64, f64)> = summary
        .monthly
        .iter()
        .map(|m| (m.month.index() as f64, m.total))
        .collect();
    let max = points.iter().map(|p| p.1).fold(0.0_f64, f64::max);
    let min = points.iter().map(|p| p.1).fold(0.0_f64, f64::min);
    let top = if max > 0.0 { max * 1.1 } else { 1.0 };

    let dataset = Dataset::default()
        .name("USDAmt")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let x_labels: Vec<Span> = [Month::January, Month::June, Month::December]
        .iter()
        .map(|m| Span::raw(m.abbrev()))
        .collect();
    let y_labels: Vec<Span> = [min, (min + top) / 2.0, top]
        .iter()
        .map(|v| Span::styled(compact_money(*v), FOOTER_STYLE))
        .collect();

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(" Monthly Sales Trend ")
                .borders(Borders::ALL)
                .border_style(FOOTER_STYLE),
        )
        .x_axis(Axis::default().bounds([0.0, 11.0]).labels(x_labels))
        .y_axis(Axis::default().bounds([min, top]).labels(y_labels));
    frame.render_widget(chart, area);
}

fn draw_group_bars(frame: &mut Frame, area: Rect, title: &str, groups: &[GroupTotal]) {
    let label_width = 14;
    let bars: Vec<Bar> = groups
        .iter()
        .map(|g| {
            Bar::default()
                .label(Line::from(truncate(&g.name, label_width)))
                .value(g.total.max(0.0).round() as u64)
                .text_value(money(g.total))
        })
        .collect();
    let chart = BarChart::default()
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(FOOTER_STYLE),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_style(Style::default().fg(Color::Rgb(80, 220, 100)))
        .value_style(BOLD)
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn draw_client_summary(frame: &mut Frame, area: Rect, client: Option<&ClientSummary>) {
    let Some(cs) = client else {
        frame.render_widget(
            Paragraph::new("\n Select a quick client to see the client summary.").style(FOOTER_STYLE),
            area,
        );
        return;
    };

    let [title_area, month_area, branch_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(cs.by_month.len() as u16 + 3),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(
        Paragraph::new(format!(" Client Summary: {}", cs.client)).style(HEADER_STYLE),
        title_area,
    );

    let month_rows: Vec<Row> = cs
        .by_month
        .iter()
        .map(|m| {
            Row::new(vec![
                Cell::from(m.month.name()),
                Cell::from(money_span(m.total)),
                Cell::from(number(m.count)),
            ])
        })
        .collect();
    frame.render_widget(
        summary_table(month_rows, "Month").block(Block::default().title(" By Month ").borders(Borders::TOP)),
        month_area,
    );

    let branch_rows: Vec<Row> = cs
        .by_branch
        .iter()
        .map(|b| {
            Row::new(vec![
                Cell::from(b.name.clone()),
                Cell::from(money_span(b.total)),
                Cell::from(number(b.count)),
            ])
        })
        .collect();
    frame.render_widget(
        summary_table(branch_rows, "BranchName")
            .block(Block::default().title(" By Branch ").borders(Borders::TOP)),
        branch_area,
    );
}

fn summary_table<'a>(rows: Vec<Row<'a>>, key: &'a str) -> Table<'a> {
    Table::new(
        rows,
        [Constraint::Length(24), Constraint::Length(18), Constraint::Length(14)],
    )
    .header(Row::new(vec![key, "Total Sales", "Transactions"]).style(BOLD))
    .column_spacing(2)
}

fn draw_raw_data(frame: &mut Frame, area: Rect, render: &Render, has_tbm: bool, offset: usize) {
    let mut header = vec!["Date", "BranchName", "CustomerName"];
    if has_tbm {
        header.push("TBM");
    }
    header.extend(["USDAmt", "DT"]);

    let mut widths = vec![Constraint::Length(10), Constraint::Length(18), Constraint::Fill(1)];
    if has_tbm {
        widths.push(Constraint::Length(12));
    }
    widths.extend([Constraint::Length(14), Constraint::Length(10)]);

    let visible = area.height.saturating_sub(2) as usize;
    let rows: Vec<Row> = render
        .raw
        .iter()
        .skip(offset)
        .take(visible)
        .map(|r| {
            let mut cells = vec![
                Cell::from(r.date.format("%Y-%m-%d").to_string()),
                Cell::from(r.branch.clone().unwrap_or_default()),
                Cell::from(r.customer.clone().unwrap_or_default()),
            ];
            if has_tbm {
                cells.push(Cell::from(r.tbm.clone().unwrap_or_default()));
            }
            cells.push(Cell::from(money_span(r.amount)));
            cells.push(Cell::from(format!("{}", r.dt)));
            Row::new(cells)
        })
        .collect();

    let [table_area, pos_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
    frame.render_widget(
        Table::new(rows, widths)
            .header(Row::new(header).style(BOLD))
            .column_spacing(1),
        table_area,
    );
    let shown_to = (offset + visible).min(render.raw.len());
    frame.render_widget(
        Paragraph::new(format!(
            " rows {}-{} of {}",
            (offset + 1).min(shown_to),
            shown_to,
            number(render.raw.len())
        ))
        .style(FOOTER_STYLE),
        pos_area,
    );
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(file: &Path, settings: Settings) -> Result<()> {
    let session = Session::open(file);
    let mut dashboard = Dashboard::new(session, settings);
    run_app(&mut dashboard)
}
