//! 仪表板视图状态
//!
//! 行数据、过滤条件、排序状态、统计卡片和两个图表序列都集中在
//! [`DashboardState`] 里，由 App 独占持有。每次刷新或输入变化都
//! 整体重建过滤视图和图表序列，不做增量更新。

use std::cmp::Ordering;

use chrono::Local;

use rspp_common::{PoolStats, ProxyStatRow, SourceStatus};

/// 国家分布图最多显示的国家数
const COUNTRY_CHART_LIMIT: usize = 8;
/// 来源图最多显示的活跃来源数
const SOURCES_CHART_LIMIT: usize = 10;

/// 可排序的列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Address,
    Country,
    AvgScore,
    SuccessRate,
    AvgResponseTime,
    TotalChecks,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Address,
        SortColumn::Country,
        SortColumn::AvgScore,
        SortColumn::SuccessRate,
        SortColumn::AvgResponseTime,
        SortColumn::TotalChecks,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            SortColumn::Address => "地址",
            SortColumn::Country => "国家",
            SortColumn::AvgScore => "评分",
            SortColumn::SuccessRate => "成功率",
            SortColumn::AvgResponseTime => "响应时间",
            SortColumn::TotalChecks => "检查次数",
        }
    }

    fn key(&self, row: &ProxyStatRow) -> SortKey {
        match self {
            SortColumn::Address => SortKey::Text(Some(row.proxy_address.to_lowercase())),
            SortColumn::Country => SortKey::Text(row.country.as_ref().map(|c| c.to_lowercase())),
            SortColumn::AvgScore => SortKey::Number(row.avg_score),
            SortColumn::SuccessRate => SortKey::Number(Some(row.success_rate)),
            SortColumn::AvgResponseTime => SortKey::Number(row.avg_response_time),
            SortColumn::TotalChecks => SortKey::Number(Some(row.total_checks as f64)),
        }
    }
}

/// 排序键：字符串列与数值列分开比较
enum SortKey {
    Text(Option<String>),
    Number(Option<f64>),
}

/// 缺失值固定排在最后，升降序只作用于两边都有值的情况
fn compare_options<T>(
    a: Option<T>,
    b: Option<T>,
    ascending: bool,
    cmp: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = cmp(&a, &b);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        }
    }
}

/// 仪表板的全部可变状态
pub struct DashboardState {
    pub all_rows: Vec<ProxyStatRow>,
    pub filtered: Vec<ProxyStatRow>,
    pub search: String,
    pub country_filter: Option<String>,
    pub sort_column: SortColumn,
    pub sort_ascending: bool,
    pub stats: Option<PoolStats>,
    /// 国家分布图序列，每次刷新整体重建
    pub country_chart: Vec<(String, u64)>,
    /// 来源活跃度图序列，每次刷新整体重建
    pub sources_chart: Vec<(String, u64)>,
    pub last_update: Option<String>,
    pub rows_error: Option<String>,
    pub stats_error: Option<String>,
    pub sources_error: Option<String>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            all_rows: Vec::new(),
            filtered: Vec::new(),
            search: String::new(),
            country_filter: None,
            sort_column: SortColumn::AvgScore,
            sort_ascending: false,
            stats: None,
            country_chart: Vec::new(),
            sources_chart: Vec::new(),
            last_update: None,
            rows_error: None,
            stats_error: None,
            sources_error: None,
        }
    }

    /// 整体替换行数据并重建过滤视图
    pub fn set_rows(&mut self, rows: Vec<ProxyStatRow>) {
        self.all_rows = rows;
        self.rows_error = None;
        self.apply_filter();
    }

    pub fn set_rows_error(&mut self, message: String) {
        self.rows_error = Some(message);
    }

    /// 整体替换统计数据并重建国家分布序列
    pub fn set_stats(&mut self, stats: PoolStats) {
        self.country_chart = stats
            .top_countries
            .iter()
            .take(COUNTRY_CHART_LIMIT)
            .map(|c| (c.country.clone(), c.count.max(0) as u64))
            .collect();
        self.stats_error = None;
        self.stats = Some(stats);
    }

    pub fn set_stats_error(&mut self, message: String) {
        self.stats_error = Some(message);
    }

    /// 只保留活跃来源的前 10 个，超长 URL 截断
    pub fn set_sources(&mut self, sources: Vec<SourceStatus>) {
        self.sources_chart = sources
            .iter()
            .filter(|s| s.is_active)
            .take(SOURCES_CHART_LIMIT)
            .map(|s| (truncate_label(&s.source_url), s.total_proxies_found.max(0) as u64))
            .collect();
        self.sources_error = None;
    }

    pub fn set_sources_error(&mut self, message: String) {
        self.sources_error = Some(message);
    }

    /// 过滤：搜索词对地址/国家做大小写无关的子串匹配，国家过滤是精确匹配。
    /// 每次输入变化都对全量行重算，过滤视图整体替换。
    pub fn apply_filter(&mut self) {
        let term = self.search.to_lowercase();
        self.filtered = self
            .all_rows
            .iter()
            .filter(|row| {
                let matches_search = term.is_empty()
                    || row.proxy_address.to_lowercase().contains(&term)
                    || row
                        .country
                        .as_ref()
                        .map(|c| c.to_lowercase().contains(&term))
                        .unwrap_or(false);

                let matches_country = match &self.country_filter {
                    Some(country) => row.country.as_deref() == Some(country.as_str()),
                    None => true,
                };

                matches_search && matches_country
            })
            .cloned()
            .collect();
        self.sort_filtered();
    }

    /// 选同一列翻转方向，选新列换列并从降序开始
    pub fn toggle_sort(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_column = column;
            self.sort_ascending = false;
        }
        self.sort_filtered();
    }

    fn sort_filtered(&mut self) {
        let column = self.sort_column;
        let ascending = self.sort_ascending;
        self.filtered.sort_by(|a, b| match (column.key(a), column.key(b)) {
            (SortKey::Text(a), SortKey::Text(b)) => {
                compare_options(a, b, ascending, |a, b| a.cmp(b))
            }
            (SortKey::Number(a), SortKey::Number(b)) => compare_options(a, b, ascending, |a, b| {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }),
            _ => Ordering::Equal,
        });
    }

    /// 国家过滤在「全部 → 各热门国家」之间循环
    pub fn cycle_country_filter(&mut self) {
        let options: Vec<String> = self
            .stats
            .as_ref()
            .map(|s| s.top_countries.iter().map(|c| c.country.clone()).collect())
            .unwrap_or_default();

        self.country_filter = match &self.country_filter {
            None => options.first().cloned(),
            Some(current) => match options.iter().position(|c| c == current) {
                Some(index) if index + 1 < options.len() => Some(options[index + 1].clone()),
                _ => None,
            },
        };
        self.apply_filter();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
        self.apply_filter();
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.apply_filter();
    }

    /// 三路拉取都结束后盖本地时间戳，成功失败都算结束
    pub fn stamp_updated(&mut self) {
        self.last_update = Some(Local::now().format("%H:%M:%S").to_string());
    }
}

/// 超过 30 个字符的标签截到前 27 个字符加省略号
fn truncate_label(url: &str) -> String {
    if url.chars().count() > 30 {
        let head: String = url.chars().take(27).collect();
        format!("{}...", head)
    } else {
        url.to_string()
    }
}
