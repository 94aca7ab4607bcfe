use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing_subscriber::EnvFilter;

use quizclock::app::{App, AppScreen, NoticeLevel};
use quizclock::bank::QuestionBank;
use quizclock::config::Config;
use quizclock::engine::stats;
use quizclock::event::{AppEvent, EventHandler};
use quizclock::store::json_store::JsonStore;
use quizclock::store::schema::ExportData;
use quizclock::ui::components::dashboard::Dashboard;
use quizclock::ui::components::history_table::HistoryTable;
use quizclock::ui::components::menu::QuizMenuView;
use quizclock::ui::components::question_view::QuestionView;
use quizclock::ui::components::session_sidebar::SessionSidebar;
use quizclock::ui::components::timer_bar::TimerBar;
use quizclock::ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use quizclock::ui::theme::Theme;

const LOG_ENV: &str = "QUIZCLOCK_LOG";
const LOG_FILE: &str = "quizclock.log";

#[derive(Parser)]
#[command(name = "quizclock", version, about = "Timed web development quizzes in the terminal")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Extra directory of quiz bank JSON files")]
    bank: Option<PathBuf>,

    #[arg(short, long, help = "Start this quiz right away")]
    quiz: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List the available quizzes
    List,
    /// Show recorded results
    History,
    /// Write config and result history to a JSON file
    Export { path: PathBuf },
    /// Replace the result history with an export file's and apply its settings
    Import { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    match cli.command {
        Some(command) => {
            init_stderr_logging();
            run_command(command, &config, cli.bank)
        }
        None => {
            init_file_logging(&config)?;
            run_tui(config, cli.bank, cli.quiz)
        }
    }
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(io::stderr)
        .init();
}

// The TUI owns the terminal, so logs go to a file in the data dir.
fn init_file_logging(config: &Config) -> Result<()> {
    let dir = config.data_path();
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .with_context(|| format!("opening {}", dir.join(LOG_FILE).display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_bank(config: &Config, extra: Option<PathBuf>) -> Result<(QuestionBank, usize)> {
    let mut dirs = vec![config.quiz_path()];
    dirs.extend(extra);
    let (bank, skipped) = QuestionBank::load(&dirs)?;
    Ok((bank, skipped.len()))
}

fn run_command(command: Command, config: &Config, extra_bank: Option<PathBuf>) -> Result<()> {
    match command {
        Command::List => {
            let (bank, _) = load_bank(config, extra_bank)?;
            for category in bank.categories() {
                println!("{category}");
                for quiz in bank.by_category(category) {
                    println!(
                        "  {:<28} {:<12} {:>3} questions  {}",
                        quiz.id,
                        quiz.tier.label(),
                        quiz.len(),
                        quiz.title
                    );
                }
            }
        }
        Command::History => {
            let store = JsonStore::new(config)?;
            let history = store.load_history().results;
            if history.is_empty() {
                println!("No results recorded yet.");
                return Ok(());
            }
            for record in &history {
                println!(
                    "{}  {:<28} {:<12} {:>3}%  {}/{}{}",
                    record.recorded_at.format("%Y-%m-%d %H:%M"),
                    record.quiz_id,
                    record.tier.label(),
                    record.result.score_percent,
                    record.result.correct_count,
                    record.result.total_questions,
                    if record.result.timed_out { "  (timed out)" } else { "" },
                );
            }
            if let Some(avg) = stats::average_percent(&history) {
                println!("\n{} results, average {avg:.0}%", history.len());
            }
        }
        Command::Export { path } => {
            let store = JsonStore::new(config)?;
            let data = store.export_all(config);
            let json = serde_json::to_string_pretty(&data)?;
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(
                "exported {} results to {}",
                data.history.results.len(),
                path.display()
            );
        }
        Command::Import { path } => {
            let content =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            let data: ExportData = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            let store = JsonStore::new(config)?;
            store.import_all(&data)?;

            let mut merged = config.clone();
            merged.adopt_preferences(&data.config);
            merged.save()?;
            tracing::info!(
                "imported {} results and settings from {}",
                data.history.results.len(),
                path.display()
            );
        }
    }
    Ok(())
}

fn run_tui(config: Config, extra_bank: Option<PathBuf>, quiz: Option<String>) -> Result<()> {
    let (bank, skipped) = load_bank(&config, extra_bank)?;
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut app = App::new(config, bank)?;

    if Theme::load(&app.config.theme).is_none() {
        let text = format!(
            "Unknown theme '{}', available: {}",
            app.config.theme,
            Theme::available_themes().join(", ")
        );
        app.notify(NoticeLevel::Warning, text);
    }
    if skipped > 0 {
        app.notify(
            NoticeLevel::Warning,
            format!("{skipped} quiz file(s) skipped, see {LOG_FILE}"),
        );
    }
    if let Some(id) = quiz {
        app.menu.select_quiz(&id);
        app.start_quiz(&id);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Drop the app here so the recorder flushes pending writes.
    drop(app);

    if let Err(err) = result {
        tracing::error!("quitting after error: {err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::QuizSelect => handle_select_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::QuizResult => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
    }
}

fn handle_select_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.start_selected_quiz(),
        KeyCode::Char('h') => app.go_to_history(),
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.abandon_quiz(),
        KeyCode::Char(ch @ '1'..='9') => app.select_option(ch as usize - '1' as usize),
        KeyCode::Char(ch @ 'a'..='i') => app.select_option(ch as usize - 'a' as usize),
        KeyCode::Up => {
            app.move_highlight(-1);
            app.select_highlighted();
        }
        KeyCode::Down => {
            app.move_highlight(1);
            app.select_highlighted();
        }
        KeyCode::Char(' ') => app.select_highlighted(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('n') => app.next_question(),
        KeyCode::Left | KeyCode::Char('p') => app.previous_question(),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter | KeyCode::Esc => app.go_to_select(),
        KeyCode::Char('h') => app.go_to_history(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_select(),
        KeyCode::Down | KeyCode::Char('j') => app.history_down(),
        KeyCode::Up | KeyCode::Char('k') => app.history_up(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::QuizSelect => render_select(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::QuizResult => render_result(frame, app),
        AppScreen::History => render_history(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, info: &str, area: Rect) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " quizclock ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {info}"),
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

/// A live notice replaces the key hints until it expires.
fn render_footer(frame: &mut ratatui::Frame, app: &App, hints: &[&str], area: Rect) {
    let colors = &app.theme.colors;

    let lines: Vec<Line> = match &app.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => colors.success(),
                NoticeLevel::Warning => colors.warning(),
                NoticeLevel::Error => colors.error(),
            };
            vec![Line::from(Span::styled(
                format!("  {}", notice.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))]
        }
        None => pack_hint_lines(hints, area.width as usize)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_dim()))))
            .collect(),
    };
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_select(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let info = format!(
        "{} quizzes | {} results",
        app.engine.bank().len(),
        app.history.len()
    );
    render_header(frame, app, &info, layout[0]);

    let menu_area = centered_rect(70, 90, layout[1]);
    frame.render_widget(
        QuizMenuView::new(&app.menu, &app.summaries, app.theme),
        menu_area,
    );

    render_footer(
        frame,
        app,
        &["[↑/↓] Choose", "[Enter] Start", "[h] History", "[q] Quit"],
        layout[2],
    );
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let snapshot = app.snapshot();
    let Some(quiz) = snapshot.quiz.as_ref() else {
        return;
    };
    let Some(question) = snapshot.current_question() else {
        return;
    };

    let app_layout = AppLayout::new(frame.area());
    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(app_layout.header);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" {}", quiz.title),
            Style::default()
                .fg(app.theme.colors.accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {} · {}", quiz.tier.label(), quiz.category),
            Style::default().fg(app.theme.colors.text_dim()),
        )),
    ]);
    frame.render_widget(title, header[0]);
    frame.render_widget(
        TimerBar::new(
            snapshot.remaining_secs,
            snapshot.time_fraction_left(),
            app.theme,
        ),
        header[1],
    );

    frame.render_widget(
        QuestionView::new(
            question,
            snapshot.current_index,
            snapshot.question_count(),
            snapshot.selected_answer,
            app.highlighted,
            app.theme,
        ),
        app_layout.main,
    );

    if let Some(sidebar) = app_layout.sidebar {
        frame.render_widget(SessionSidebar::new(&snapshot, app.theme), sidebar);
    }

    let next_hint = if snapshot.is_last_question {
        "[Enter] Submit"
    } else {
        "[Enter/→] Next"
    };
    render_footer(
        frame,
        app,
        &["[1-9/a-i] Answer", "[↑/↓] Change", next_hint, "[←] Back", "[Esc] Abandon"],
        app_layout.footer,
    );
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    let snapshot = app.snapshot();
    let (Some(quiz), Some(result)) = (snapshot.quiz.as_ref(), snapshot.result.as_ref()) else {
        return;
    };

    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let centered = centered_rect(80, 90, layout[0]);
    frame.render_widget(
        Dashboard::new(
            quiz,
            result,
            &snapshot.answers,
            snapshot.remaining_secs,
            app.theme,
        ),
        centered,
    );
    render_footer(frame, app, &[], layout[1]);
}

fn render_history(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    render_header(frame, app, "history", layout[0]);
    frame.render_widget(
        HistoryTable::new(&app.history, app.history_selected, app.theme),
        centered_rect(90, 95, layout[1]),
    );
    render_footer(
        frame,
        app,
        &["[↑/↓] Scroll", "[Esc/q] Back"],
        layout[2],
    );
}
