use serde::Serialize;

use super::team::{Outline, Rgba};

/// 每位车手一行的汇总结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    pub driver: String,
    pub team: String,
    /// 最快圈（秒）
    pub fastest_lap: f64,
    /// 最快圈所在圈数
    pub fastest_lap_number: u32,
    /// 最后完成的圈数
    pub last_lap: u32,
    /// 比赛总圈数
    pub total_laps: u32,
    pub status: Option<String>,
    pub is_dnf: bool,
    /// 与全场最快圈的差距（秒）
    pub delta: f64,
    pub color: Rgba,
    pub outline: Option<Outline>,
}

impl DerivedRow {
    /// 仅未完赛车手有值，例如 "DNF on lap 23 of 52"
    pub fn dnf_note(&self) -> Option<String> {
        self.is_dnf
            .then(|| format!("DNF on lap {} of {}", self.last_lap, self.total_laps))
    }

    /// 状态文本，缺失时显示 "-"
    pub fn status_text(&self) -> &str {
        self.status.as_deref().unwrap_or("-")
    }
}
