//! HTML 图表输出
//!
//! 生成单文件 HTML，内嵌 SVG 横向柱状图；每根柱子带 `<title>`，浏览器中悬停即显示提示

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::render::{Bar, ChartSpec};

const WIDTH: f64 = 960.0;
const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 40.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 60.0;
const BAR_HEIGHT: f64 = 22.0;
const BAR_GAP: f64 = 8.0;
const TICKS: usize = 5;

/// HTML 图表渲染器
#[derive(Debug, Clone)]
pub struct HtmlChart {
    output_path: PathBuf,
}

impl HtmlChart {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// 渲染并写入文件
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub fn render(&self, spec: &ChartSpec) -> AppResult<PathBuf> {
        let html = render_html(spec);
        std::fs::write(&self.output_path, html)
            .map_err(|e| AppError::file_write_failed(self.output_path.display().to_string(), e))?;
        info!("📈 图表已保存至: {}", self.output_path.display());
        Ok(self.output_path.clone())
    }
}

/// 生成完整 HTML 文档
pub fn render_html(spec: &ChartSpec) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{styles}</style>
</head>
<body>
{svg}
<p class="footer">Generated {generated}</p>
</body>
</html>
"#,
        title = escape_html(&spec.title),
        styles = STYLES,
        svg = render_svg(spec),
        generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    )
}

/// 生成 SVG 图表
pub fn render_svg(spec: &ChartSpec) -> String {
    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = spec.bars.len() as f64 * (BAR_HEIGHT + BAR_GAP);
    let height = MARGIN_TOP + plot_height + MARGIN_BOTTOM;
    let (x_min, x_max) = spec.x_range;
    let span = if x_max > x_min { x_max - x_min } else { 1.0 };
    let scale = |v: f64| MARGIN_LEFT + ((v - x_min) / span).clamp(0.0, 1.0) * plot_width;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WIDTH,
        h = height
    );
    let _ = writeln!(
        svg,
        r#"<text class="title" x="{}" y="30" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape_html(&spec.title)
    );

    // 网格线与刻度
    for i in 0..=TICKS {
        let value = x_min + span * i as f64 / TICKS as f64;
        let x = scale(value);
        let _ = writeln!(
            svg,
            r#"<line class="grid" x1="{x:.1}" y1="{top}" x2="{x:.1}" y2="{bottom}"/>"#,
            top = MARGIN_TOP,
            bottom = MARGIN_TOP + plot_height
        );
        let _ = writeln!(
            svg,
            r#"<text class="tick" x="{x:.1}" y="{y}" text-anchor="middle">{value:.2}</text>"#,
            y = MARGIN_TOP + plot_height + 18.0
        );
    }

    for (idx, bar) in spec.bars.iter().enumerate() {
        let y = MARGIN_TOP + idx as f64 * (BAR_HEIGHT + BAR_GAP) + BAR_GAP / 2.0;
        svg.push_str(&render_bar(bar, y, scale(x_min), scale(bar.value)));
    }

    let _ = writeln!(
        svg,
        r#"<text class="axis" x="{}" y="{}" text-anchor="middle">{}</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        height - 15.0,
        escape_html(&spec.x_label)
    );
    let _ = writeln!(
        svg,
        r#"<text class="axis" x="20" y="{y}" text-anchor="middle" transform="rotate(-90 20 {y})">{}</text>"#,
        escape_html(&spec.y_label),
        y = MARGIN_TOP + plot_height / 2.0
    );
    svg.push_str("</svg>");
    svg
}

fn render_bar(bar: &Bar, y: f64, x0: f64, x1: f64) -> String {
    let stroke = match &bar.outline {
        Some(outline) => format!(
            r#" stroke="rgb({}, {}, {})" stroke-opacity="{}" stroke-width="{}""#,
            outline.color.r, outline.color.g, outline.color.b, outline.color.a, outline.width
        ),
        None => String::new(),
    };

    format!(
        concat!(
            r#"<g class="bar">"#,
            r#"<title>{hover}</title>"#,
            r#"<text class="label" x="{lx:.1}" y="{ty:.1}" text-anchor="end">{label}</text>"#,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h}" fill="rgb({r}, {g}, {b})" fill-opacity="{a}"{stroke}/>"#,
            "</g>\n"
        ),
        hover = bar
            .hover
            .iter()
            .map(|line| escape_html(line))
            .collect::<Vec<_>>()
            .join("&#10;"),
        lx = x0 - 8.0,
        ty = y + BAR_HEIGHT * 0.7,
        label = escape_html(&bar.label),
        x = x0,
        y = y,
        w = (x1 - x0).max(0.0),
        h = BAR_HEIGHT,
        r = bar.fill.r,
        g = bar.fill.g,
        b = bar.fill.b,
        a = bar.fill.a,
        stroke = stroke,
    )
}

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const STYLES: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; background-color: #f5f5f5; }
svg { background-color: white; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
.title { font-size: 18px; font-weight: bold; fill: #333; }
.axis { font-size: 13px; fill: #555; }
.tick { font-size: 11px; fill: #777; }
.label { font-size: 12px; fill: #333; font-family: monospace; }
.grid { stroke: #e5e5e5; stroke-width: 1; }
.bar:hover rect { filter: brightness(1.1); }
.footer { color: #999; font-size: 11px; }
"#;
