//! 最快圈聚合 - 业务能力层
//!
//! 先筛出快圈，再按车手取最小圈速

use std::collections::HashMap;

use tracing::debug;

use crate::config::Config;
use crate::models::LapRecord;

/// 车手最快圈
#[derive(Debug, Clone, PartialEq)]
pub struct FastestLap {
    pub driver: String,
    pub team: String,
    pub lap_number: u32,
    pub lap_time: f64,
}

/// 快圈筛选规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickLapFilter {
    /// 不慢于全场最快圈的倍数
    pub threshold: f64,
    /// 是否先剔除进出站圈
    pub exclude_pit_laps: bool,
}

impl Default for QuickLapFilter {
    fn default() -> Self {
        Self {
            threshold: 1.07,
            exclude_pit_laps: false,
        }
    }
}

impl QuickLapFilter {
    pub fn new(config: &Config) -> Self {
        Self {
            threshold: config.quicklap_threshold,
            exclude_pit_laps: config.exclude_pit_laps,
        }
    }

    /// 筛出快圈，保持原顺序
    ///
    /// 阈值基于（剔除进出站圈后）全场最快圈计算
    pub fn pick_quick_laps<'a>(&self, laps: &'a [LapRecord]) -> Vec<&'a LapRecord> {
        let candidates: Vec<&LapRecord> = laps
            .iter()
            .filter(|lap| lap.lap_time.is_finite() && lap.lap_time > 0.0)
            .filter(|lap| !(self.exclude_pit_laps && lap.is_pit_lap()))
            .collect();

        let Some(session_best) = candidates.iter().map(|lap| lap.lap_time).reduce(f64::min) else {
            return Vec::new();
        };

        let limit = session_best * self.threshold;
        debug!(
            "快圈阈值: 最快 {:.3}s × {} = {:.3}s",
            session_best, self.threshold, limit
        );

        candidates
            .into_iter()
            .filter(|lap| lap.lap_time <= limit)
            .collect()
    }
}

/// 每位车手取最快的一圈
///
/// 结果按车手首次出现的顺序排列；圈速相同时取较早出现的那一圈
pub fn fastest_per_driver(laps: &[&LapRecord]) -> Vec<FastestLap> {
    let mut order: Vec<FastestLap> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for lap in laps {
        match index.get(lap.driver.as_str()) {
            Some(&idx) => {
                // 严格小于，保证并列时保留先出现的圈
                if lap.lap_time < order[idx].lap_time {
                    order[idx].lap_time = lap.lap_time;
                    order[idx].lap_number = lap.lap_number;
                    order[idx].team = lap.team.clone();
                }
            }
            None => {
                index.insert(lap.driver.as_str(), order.len());
                order.push(FastestLap {
                    driver: lap.driver.clone(),
                    team: lap.team.clone(),
                    lap_number: lap.lap_number,
                    lap_time: lap.lap_time,
                });
            }
        }
    }

    order
}
