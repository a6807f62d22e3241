// Terminal UI dashboard for ROOMWATCH
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use parking_lot::Mutex;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use roomwatch_core::error::DisplayError;
use roomwatch_core::ports::{DisplaySurface, Emphasis, Region};
use roomwatch_core::reactor::ReactorHandle;
use roomwatch_core::AlertKind;
use std::collections::HashMap;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

/// Everything the reactor has painted so far
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub texts: HashMap<Region, String>,
    pub alarm_emphasis: Emphasis,
    pub log: Vec<String>,
    pub banner: Option<String>,
    pub user: String,
}

impl DashboardView {
    pub fn text(&self, region: Region) -> &str {
        self.texts.get(&region).map(String::as_str).unwrap_or("")
    }
}

/// Display surface that paints into a shared [`DashboardView`]
#[derive(Clone, Default)]
pub struct TuiDisplay {
    view: Arc<Mutex<DashboardView>>,
}

impl TuiDisplay {
    pub fn new(view: Arc<Mutex<DashboardView>>) -> Self {
        Self { view }
    }

    pub fn view(&self) -> Arc<Mutex<DashboardView>> {
        self.view.clone()
    }
}

impl DisplaySurface for TuiDisplay {
    fn set_text(&mut self, region: Region, text: &str) -> Result<(), DisplayError> {
        self.view.lock().texts.insert(region, text.to_string());
        Ok(())
    }

    fn set_emphasis(&mut self, region: Region, emphasis: Emphasis) -> Result<(), DisplayError> {
        if region == Region::Alarm {
            self.view.lock().alarm_emphasis = emphasis;
        }
        Ok(())
    }

    fn render_log(&mut self, lines: &[String]) -> Result<(), DisplayError> {
        self.view.lock().log = lines.to_vec();
        Ok(())
    }

    fn show_banner(&mut self, text: &str) -> Result<(), DisplayError> {
        self.view.lock().banner = Some(text.to_string());
        Ok(())
    }

    fn hide_banner(&mut self) -> Result<(), DisplayError> {
        self.view.lock().banner = None;
        Ok(())
    }
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Acknowledge(AlertKind),
    ToggleHelp,
    Quit,
}

pub fn key_action(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::Char('t') | KeyCode::Char('T') => {
            Some(KeyAction::Acknowledge(AlertKind::Temperature))
        }
        KeyCode::Char('l') | KeyCode::Char('L') => Some(KeyAction::Acknowledge(AlertKind::Light)),
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Char('H') => Some(KeyAction::ToggleHelp),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(KeyAction::Quit),
        _ => None,
    }
}

pub struct TuiDashboard {
    view: Arc<Mutex<DashboardView>>,
    handle: ReactorHandle,
    show_help: bool,
}

impl TuiDashboard {
    pub fn new(view: Arc<Mutex<DashboardView>>, handle: ReactorHandle) -> Self {
        Self {
            view,
            handle,
            show_help: false,
        }
    }

    /// Take over the terminal until the user quits or the reactor stops
    pub fn run(mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_app(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            if self.handle.is_closed() {
                return Ok(());
            }

            let view = self.view.lock().clone();
            terminal.draw(|f| self.draw_ui(f, &view))?;

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if self.show_help {
                self.show_help = false;
                continue;
            }

            match key_action(key.code) {
                Some(KeyAction::Quit) => {
                    // Reactor may already be gone
                    let _ = self.handle.shutdown();
                    return Ok(());
                }
                Some(KeyAction::Acknowledge(kind)) => {
                    if self.handle.acknowledge(kind).is_err() {
                        return Ok(());
                    }
                }
                Some(KeyAction::ToggleHelp) => self.show_help = true,
                None => {}
            }
        }
    }

    fn draw_ui(&self, f: &mut Frame, view: &DashboardView) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Readings
                Constraint::Length(3), // Alarm + light timer
                Constraint::Min(0),    // Log
                Constraint::Length(3), // Banner
                Constraint::Length(1), // Footer
            ])
            .split(f.size());

        self.draw_header(f, chunks[0], view);
        if self.show_help {
            self.draw_help(f, chunks[1].union(chunks[3]));
        } else {
            self.draw_readings(f, chunks[1], view);
            self.draw_alarm(f, chunks[2], view);
            self.draw_log(f, chunks[3], view);
        }
        self.draw_banner(f, chunks[4], view);
        self.draw_footer(f, chunks[5]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect, view: &DashboardView) {
        let header_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));

        let status_text = vec![
            Span::styled(
                "Hostel Monitor ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("| "),
            Span::styled(view.user.clone(), Style::default().fg(Color::Green)),
        ];

        let header = Paragraph::new(Line::from(status_text))
            .alignment(Alignment::Center)
            .block(header_block);
        f.render_widget(header, area);
    }

    fn draw_readings(&self, f: &mut Frame, area: Rect, view: &DashboardView) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ])
            .split(area);

        for (column, region) in columns
            .iter()
            .zip([Region::Temperature, Region::Humidity, Region::Light])
        {
            let reading = Paragraph::new(view.text(region).to_string())
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(reading, *column);
        }
    }

    fn draw_alarm(&self, f: &mut Frame, area: Rect, view: &DashboardView) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let (r, g, b) = view.alarm_emphasis.rgb();
        let mut style = Style::default().fg(Color::Rgb(r, g, b));
        if view.alarm_emphasis == Emphasis::Alert {
            style = style.add_modifier(Modifier::BOLD);
        }
        let alarm = Paragraph::new(Span::styled(view.text(Region::Alarm).to_string(), style))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Rgb(r, g, b))),
            );
        f.render_widget(alarm, columns[0]);

        let timer = Paragraph::new(view.text(Region::LightTimer).to_string())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(timer, columns[1]);
    }

    fn draw_log(&self, f: &mut Frame, area: Rect, view: &DashboardView) {
        let items: Vec<ListItem> = view
            .log
            .iter()
            .map(|line| ListItem::new(line.clone()))
            .collect();
        let list = List::new(items).block(
            Block::default()
                .title(" Temperature log ")
                .borders(Borders::ALL),
        );
        f.render_widget(list, area);
    }

    fn draw_banner(&self, f: &mut Frame, area: Rect, view: &DashboardView) {
        let text = view.banner.clone().unwrap_or_default();
        let banner = Paragraph::new(Span::styled(
            text,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(banner, area);
    }

    fn draw_help(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from("t  acknowledge temperature alarm"),
            Line::from("l  acknowledge light alarm"),
            Line::from("q  leave the dashboard"),
            Line::from(""),
            Line::from("Press any key to close help"),
        ];
        let help =
            Paragraph::new(lines).block(Block::default().title(" Help ").borders(Borders::ALL));
        f.render_widget(help, area);
    }

    fn draw_footer(&self, f: &mut Frame, area: Rect) {
        let footer_text = if self.show_help {
            "Press any key to close help"
        } else {
            "[T] Ack Temperature | [L] Ack Light | [?] Help | [Q] Quit"
        };

        let footer = Paragraph::new(footer_text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));

        f.render_widget(footer, area);
    }
}
