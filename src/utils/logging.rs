/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::path::Path;

use tracing::{info, warn};

use crate::config::Config;
use crate::models::{format_lap_time, DerivedRow, SessionData, SessionId};

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🏁 程序启动 - {} {} {}",
        config.year, config.event, config.session
    );
    info!("🌐 数据源: {}", config.api_base_url);
    if config.cache_enabled {
        info!("💾 缓存目录: {}", config.cache_dir);
    }
    info!("{}", "=".repeat(60));
}

/// 记录赛段加载信息
pub fn log_session_loaded(session_id: &SessionId, data: &SessionData) {
    info!(
        "✓ {} 加载完成: {} 条圈速, {} 名车手, 共 {} 圈",
        session_id,
        data.laps.len(),
        data.results.len(),
        data.total_laps
    );
}

/// 记录没有快圈、不会出现在图表中的车手
pub fn log_drivers_without_quick_laps(missing: &[String]) {
    if !missing.is_empty() {
        warn!(
            "⚠️ {} 名车手没有快圈，不显示: {}",
            missing.len(),
            missing.join(", ")
        );
    }
}

/// 打印最终统计信息
pub fn print_final_stats(rows: &[DerivedRow], chart_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 分析完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));

    if let Some(best) = rows.iter().find(|r| r.delta == 0.0) {
        info!(
            "🟣 全场最快圈: {} ({}) {}",
            best.driver,
            best.team,
            format_lap_time(best.fastest_lap)
        );
    }
    info!("✅ 车手: {}", rows.len());
    info!("❌ 未完赛: {}", rows.iter().filter(|r| r.is_dnf).count());
    info!("{}", "=".repeat(60));
    info!("\n图表已保存至: {}", chart_path.display());
}
