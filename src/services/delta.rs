//! 差距与配色 - 业务能力层
//!
//! 把每位车手的最快圈和成绩表合并为 [`DerivedRow`]，计算与全场最快圈的差距，
//! 并按差距从大到小排序

use std::cmp::Ordering;

use crate::models::{team_color, DerivedRow, Outline, SessionData};
use crate::services::dnf::DnfClassifier;
use crate::services::fastest_lap::FastestLap;

/// 未完赛车手柱形的透明度系数
pub const DNF_OPACITY: f64 = 0.4;

/// 合并最快圈与成绩，生成每位车手一行
///
/// 输出顺序与 `fastest` 一致，排序交给 [`sort_by_delta_desc`]
pub fn build_rows(
    session: &SessionData,
    fastest: &[FastestLap],
    classifier: &DnfClassifier,
) -> Vec<DerivedRow> {
    let Some(session_best) = fastest.iter().map(|f| f.lap_time).reduce(f64::min) else {
        return Vec::new();
    };

    fastest
        .iter()
        .map(|f| {
            let result = session.result_for(&f.driver);
            let status = result.and_then(|r| r.status.clone());
            let is_dnf = classifier.is_dnf(status.as_deref());

            let team = result
                .map(|r| r.team.clone())
                .unwrap_or_else(|| f.team.clone());

            let last_lap = result.map(|r| r.laps_completed).unwrap_or_else(|| {
                session
                    .laps
                    .iter()
                    .filter(|lap| lap.driver == f.driver)
                    .map(|lap| lap.lap_number)
                    .max()
                    .unwrap_or(0)
            });

            let base = team_color(&team);
            let (color, outline) = if is_dnf {
                (base.scale_opacity(DNF_OPACITY), Some(Outline::DNF))
            } else {
                (base, None)
            };

            DerivedRow {
                driver: f.driver.clone(),
                team,
                fastest_lap: f.lap_time,
                fastest_lap_number: f.lap_number,
                last_lap,
                total_laps: session.total_laps,
                status,
                is_dnf,
                delta: (f.lap_time - session_best).max(0.0),
                color,
                outline,
            }
        })
        .collect()
}

/// 按差距从大到小排序（最慢在前），差距相同保持原顺序
pub fn sort_by_delta_desc(rows: &mut [DerivedRow]) {
    rows.sort_by(|a, b| b.delta.partial_cmp(&a.delta).unwrap_or(Ordering::Equal));
}
