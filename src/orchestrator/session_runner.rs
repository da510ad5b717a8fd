use std::collections::HashSet;

use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{DerivedRow, SessionData};
use crate::render::{ChartSpec, HtmlChart, TextTable};
use crate::services::{
    build_rows, fastest_per_driver, sort_by_delta_desc, DnfClassifier, QuickLapFilter,
    SessionLoader,
};
use crate::utils::logging::{
    log_drivers_without_quick_laps, log_session_loaded, log_startup, print_final_stats,
};

/// 应用主结构
pub struct App {
    config: Config,
    loader: SessionLoader,
    filter: QuickLapFilter,
    classifier: DnfClassifier,
    chart: HtmlChart,
}

/// 分析结果
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// 已按显示顺序排好的行
    pub rows: Vec<DerivedRow>,
    /// 没有快圈的车手
    pub without_quick_laps: Vec<String>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config);

        Ok(Self {
            loader: SessionLoader::new(&config)?,
            filter: QuickLapFilter::new(&config),
            classifier: DnfClassifier::from_config(&config)?,
            chart: HtmlChart::new(&config.output_file),
            config,
        })
    }

    /// 运行：加载 → 分析 → 输出
    pub async fn run(&self) -> AppResult<Vec<DerivedRow>> {
        info!("\n📡 正在加载赛段数据...");
        let (session_id, data) = self
            .loader
            .load_session(self.config.year, &self.config.event, self.config.session)
            .await?;
        log_session_loaded(&session_id, &data);

        let analysis = analyze(&data, &self.filter, &self.classifier);
        log_drivers_without_quick_laps(&analysis.without_quick_laps);

        TextTable::print(&analysis.rows);

        let spec = ChartSpec::from_rows(&analysis.rows, &session_id, self.config.zoom_margin);
        let chart_path = self.chart.render(&spec)?;

        print_final_stats(&analysis.rows, &chart_path);
        Ok(analysis.rows)
    }
}

/// 对一个赛段做完整分析：快圈筛选 → 每人最快圈 → 合并成绩 → 排序
pub fn analyze(data: &SessionData, filter: &QuickLapFilter, classifier: &DnfClassifier) -> Analysis {
    let quick = filter.pick_quick_laps(&data.laps);
    let fastest = fastest_per_driver(&quick);

    let mut rows = build_rows(data, &fastest, classifier);
    sort_by_delta_desc(&mut rows);

    let with_rows: HashSet<&str> = rows.iter().map(|r| r.driver.as_str()).collect();
    let mut without_quick_laps: Vec<String> = Vec::new();
    let all_drivers = data
        .laps
        .iter()
        .map(|l| l.driver.as_str())
        .chain(data.results.iter().map(|r| r.driver.as_str()));
    for driver in all_drivers {
        if !with_rows.contains(driver) && !without_quick_laps.iter().any(|d| d == driver) {
            without_quick_laps.push(driver.to_string());
        }
    }

    Analysis {
        rows,
        without_quick_laps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DriverResult, LapRecord};

    fn lap(driver: &str, lap_number: u32, lap_time: f64) -> LapRecord {
        LapRecord {
            driver: driver.to_string(),
            team: "Haas F1 Team".to_string(),
            lap_number,
            lap_time,
            session: "2024-12-R".to_string(),
            pit_in: false,
            pit_out: false,
        }
    }

    fn result(driver: &str, status: &str, laps: u32) -> DriverResult {
        DriverResult {
            driver: driver.to_string(),
            full_name: driver.to_string(),
            team: "Haas F1 Team".to_string(),
            position: 1,
            status: Some(status.to_string()),
            laps_completed: laps,
        }
    }

    #[test]
    fn test_analyze_reports_drivers_without_quick_laps() {
        let data = SessionData {
            laps: vec![lap("HUL", 1, 90.0), lap("MAG", 1, 120.0)],
            results: vec![
                result("HUL", "Finished", 52),
                result("MAG", "Retired", 1),
                result("BEA", "Did not start", 0),
            ],
            total_laps: 52,
        };
        let analysis = analyze(
            &data,
            &QuickLapFilter::default(),
            &DnfClassifier::standard().unwrap(),
        );

        assert_eq!(analysis.rows.len(), 1);
        assert_eq!(analysis.rows[0].driver, "HUL");
        assert_eq!(analysis.without_quick_laps, vec!["MAG", "BEA"]);
    }
}
