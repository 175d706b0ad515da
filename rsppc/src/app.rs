//! 终端仪表板
//!
//! 50ms 轮询按键加整帧重画的事件循环。自动刷新用单一截止时间实现：
//! 重新开启时总是从「现在 + 周期」重新计时，任何时刻最多只有一个
//! 待触发的刷新任务。

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};

use crate::api::ApiClient;
use crate::config::Config;
use crate::state::{DashboardState, SortColumn};

/// 自动刷新定时器：单一截止时间，开启即重置
pub struct RefreshTimer {
    period: Duration,
    deadline: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    /// 开启（或重新开启）：旧的截止时间直接作废
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// 到期返回 true 并顺延一个周期
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

/// 输入模式：普通按键或搜索输入
#[derive(PartialEq)]
enum InputMode {
    Normal,
    Search,
}

pub struct App {
    api: ApiClient,
    state: DashboardState,
    timer: RefreshTimer,
    input_mode: InputMode,
    status_message: String,
    should_quit: bool,
}

const KEY_HELP: &str = "r 刷新 | a 自动刷新 | / 搜索 | c 国家过滤 | p 随机代理 | 1-6 排序 | q 退出";

impl App {
    pub fn new(cfg: Config) -> Result<Self> {
        let api = ApiClient::new(&cfg.stats_url, &cfg.pool_url)?;

        Ok(Self {
            api,
            state: DashboardState::new(),
            timer: RefreshTimer::new(Duration::from_secs(cfg.refresh_secs)),
            input_mode: InputMode::Normal,
            status_message: KEY_HELP.to_string(),
            should_quit: false,
        })
    }

    /// 运行终端仪表板
    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        // 启动先拉一次数据，再开自动刷新
        self.refresh_all().await;
        self.timer.start(Instant::now());

        loop {
            terminal.draw(|f| self.ui(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_input(key.code).await;
                        if self.should_quit {
                            break;
                        }
                    }
                }
            }

            if self.timer.fire(Instant::now()) {
                self.refresh_all().await;
            }
        }

        Ok(())
    }

    /// 并发拉取三路数据；任何一路失败只影响自己的区域，不阻塞其余两路
    async fn refresh_all(&mut self) {
        let (stats, rows, sources) = tokio::join!(
            self.api.fetch_stats(),
            self.api.fetch_proxy_rows(),
            self.api.fetch_sources(),
        );

        match stats {
            Ok(stats) => self.state.set_stats(stats),
            Err(e) => {
                tracing::warn!("获取统计数据失败: {}", e);
                self.state.set_stats_error(format!("加载失败: {}", e));
            }
        }

        match rows {
            Ok(rows) => self.state.set_rows(rows),
            Err(e) => {
                tracing::warn!("获取代理列表失败: {}", e);
                self.state.set_rows_error(format!("加载失败: {}", e));
            }
        }

        match sources {
            Ok(sources) => self.state.set_sources(sources),
            Err(e) => {
                tracing::warn!("获取代理源状态失败: {}", e);
                self.state.set_sources_error(format!("加载失败: {}", e));
            }
        }

        // 三路都结束后才盖时间戳
        self.state.stamp_updated();
    }

    async fn handle_input(&mut self, key: KeyCode) {
        if self.input_mode == InputMode::Search {
            match key {
                KeyCode::Enter | KeyCode::Esc => self.input_mode = InputMode::Normal,
                KeyCode::Backspace => self.state.pop_search_char(),
                KeyCode::Char(c) => self.state.push_search_char(c),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') => self.refresh_all().await,
            KeyCode::Char('a') => {
                if self.timer.is_running() {
                    self.timer.stop();
                    self.status_message = "自动刷新已关闭".to_string();
                } else {
                    self.timer.start(Instant::now());
                    self.status_message = "自动刷新已开启".to_string();
                }
            }
            KeyCode::Char('/') => self.input_mode = InputMode::Search,
            KeyCode::Char('c') => self.state.cycle_country_filter(),
            KeyCode::Char('p') => match self.api.fetch_random().await {
                Ok(reply) => {
                    self.status_message = format!("随机代理: {} ({})", reply.proxy, reply.country);
                }
                Err(e) => {
                    tracing::warn!("获取随机代理失败: {}", e);
                    self.status_message = format!("获取随机代理失败: {}", e);
                }
            },
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                self.state.toggle_sort(SortColumn::ALL[index]);
            }
            _ => {}
        }
    }

    fn ui(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),  // 统计卡片
                Constraint::Min(8),     // 代理表格
                Constraint::Length(12), // 两个图表
                Constraint::Length(4),  // 状态栏
            ])
            .split(f.size());

        self.render_stats(f, chunks[0]);
        self.render_table(f, chunks[1]);
        self.render_charts(f, chunks[2]);
        self.render_status(f, chunks[3]);
    }

    fn render_stats(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let text = if let Some(stats) = &self.state.stats {
            format!(
                "代理总数 {} | 24h 活跃 {} | 24h 成功率 {:.1}% | 验证次数 {}",
                stats.total_proxies,
                stats.active_proxies_24h,
                stats.success_rate_24h * 100.0,
                stats.total_validations
            )
        } else if let Some(error) = &self.state.stats_error {
            error.clone()
        } else {
            "加载中...".to_string()
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("📊 代理池概览"));
        f.render_widget(paragraph, area);
    }

    fn render_table(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let header_cells: Vec<Cell> = SortColumn::ALL
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let marker = if *column == self.state.sort_column {
                    if self.state.sort_ascending {
                        " ▲"
                    } else {
                        " ▼"
                    }
                } else {
                    ""
                };
                Cell::from(format!("{} {}{}", index + 1, column.title(), marker))
                    .style(Style::default().add_modifier(Modifier::BOLD))
            })
            .collect();
        let header = Row::new(header_cells).style(Style::default().fg(Color::Yellow));

        let rows: Vec<Row> = self
            .state
            .filtered
            .iter()
            .map(|row| {
                let score = row.avg_score.unwrap_or(0.0);
                let score_color = if score >= 70.0 {
                    Color::Green
                } else if score >= 50.0 {
                    Color::Yellow
                } else {
                    Color::Red
                };
                let response_time = row
                    .avg_response_time
                    .map(|t| format!("{:.2}s", t))
                    .unwrap_or_else(|| "N/A".to_string());

                Row::new(vec![
                    Cell::from(row.proxy_address.clone()),
                    Cell::from(row.country.clone().unwrap_or_else(|| "未知".to_string())),
                    Cell::from(format!("{:.1}", score)).style(Style::default().fg(score_color)),
                    Cell::from(format!("{:.0}%", row.success_rate * 100.0)),
                    Cell::from(response_time),
                    Cell::from(row.total_checks.to_string()),
                ])
            })
            .collect();

        let title = if let Some(error) = &self.state.rows_error {
            format!("代理列表 - {}", error)
        } else {
            format!("代理列表 ({}/{})", self.state.filtered.len(), self.state.all_rows.len())
        };

        let widths = [
            Constraint::Min(22),
            Constraint::Length(14),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(11),
        ];
        let table = Table::new(rows)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .widths(&widths);
        f.render_widget(table, area);
    }

    fn render_charts(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let chart_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let country_data: Vec<(&str, u64)> = self
            .state
            .country_chart
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        let country_chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title("国家分布 (前 8)"))
            .data(&country_data)
            .bar_width(7)
            .bar_style(Style::default().fg(Color::LightBlue))
            .value_style(Style::default().fg(Color::Black).bg(Color::LightBlue));
        f.render_widget(country_chart, chart_chunks[0]);

        let sources_data: Vec<(&str, u64)> = self
            .state
            .sources_chart
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        let title = match &self.state.sources_error {
            Some(error) => format!("活跃来源 - {}", error),
            None => "活跃来源 (前 10)".to_string(),
        };
        let sources_chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .data(&sources_data)
            .bar_width(7)
            .bar_style(Style::default().fg(Color::Magenta))
            .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));
        f.render_widget(sources_chart, chart_chunks[1]);
    }

    fn render_status(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let search_line = if self.input_mode == InputMode::Search {
            format!("搜索: {}▌", self.state.search)
        } else if !self.state.search.is_empty() {
            format!("搜索: {}", self.state.search)
        } else {
            self.status_message.clone()
        };

        let info_line = format!(
            "最后更新: {} | 自动刷新: {} | 国家过滤: {}",
            self.state.last_update.as_deref().unwrap_or("--:--:--"),
            if self.timer.is_running() { "开" } else { "关" },
            self.state.country_filter.as_deref().unwrap_or("全部")
        );

        let paragraph = Paragraph::new(format!("{}\n{}", search_line, info_line))
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title("状态"));
        f.render_widget(paragraph, area);
    }
}
