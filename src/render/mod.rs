//! 展示层
//!
//! - `ChartSpec` - 与具体输出格式无关的横向柱状图描述
//! - `HtmlChart` - 输出带悬停提示的 HTML/SVG 图表
//! - `TextTable` - 在终端打印结果表

pub mod html_chart;
pub mod text_table;

pub use html_chart::HtmlChart;
pub use text_table::TextTable;

use crate::models::{format_lap_time, DerivedRow, Outline, Rgba, SessionId};

/// 单根柱子
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// 纵轴类别（车手代码）
    pub label: String,
    /// 柱长（差距秒数）
    pub value: f64,
    pub fill: Rgba,
    pub outline: Option<Outline>,
    /// 悬停提示，每项一行
    pub hover: Vec<String>,
}

/// 横向柱状图描述
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// 横轴范围
    pub x_range: (f64, f64),
    /// 按类别顺序排列，第一根画在最上面
    pub bars: Vec<Bar>,
}

impl ChartSpec {
    /// 由已排序的行生成图表描述
    ///
    /// # 参数
    /// - `rows`: 已按显示顺序排好的行
    /// - `session`: 赛段标识，用于标题
    /// - `zoom_margin`: 横轴右侧留白比例
    pub fn from_rows(rows: &[DerivedRow], session: &SessionId, zoom_margin: f64) -> Self {
        let max_delta = rows.iter().map(|r| r.delta).fold(0.0, f64::max);
        // 全部差距为 0 时也给出一个可见的范围
        let upper = if max_delta > 0.0 {
            max_delta * (1.0 + zoom_margin)
        } else {
            1.0
        };

        Self {
            title: format!(
                "Fastest lap delta - {} {} {}",
                session.year, session.event_name, session.session_type
            ),
            x_label: "Delta to fastest lap (s)".to_string(),
            y_label: "Driver".to_string(),
            x_range: (0.0, upper),
            bars: rows
                .iter()
                .map(|row| Bar {
                    label: row.driver.clone(),
                    value: row.delta,
                    fill: row.color,
                    outline: row.outline,
                    hover: hover_lines(row),
                })
                .collect(),
        }
    }

    /// 类别顺序
    pub fn category_order(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.label.as_str()).collect()
    }
}

/// 悬停提示：车队、圈速、差距、状态，未完赛时追加 "DNF on lap X of Y"
pub fn hover_lines(row: &DerivedRow) -> Vec<String> {
    let mut lines = vec![
        format!("Driver: {}", row.driver),
        format!("Team: {}", row.team),
        format!(
            "Lap time: {} (lap {})",
            format_lap_time(row.fastest_lap),
            row.fastest_lap_number
        ),
        format!("Delta: +{:.3}s", row.delta),
        format!("Status: {}", row.status_text()),
    ];
    if let Some(note) = row.dnf_note() {
        lines.push(note);
    }
    lines
}
