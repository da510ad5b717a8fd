use super::lap::LapRecord;
use serde::{Deserialize, Serialize};

/// 车手最终成绩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverResult {
    /// 车手三字母代码
    pub driver: String,
    pub full_name: String,
    pub team: String,
    pub position: u32,
    /// 完赛状态，排位赛没有该字段
    pub status: Option<String>,
    /// 完成圈数
    pub laps_completed: u32,
}

/// 一个赛段的全部数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub laps: Vec<LapRecord>,
    pub results: Vec<DriverResult>,
    /// 正赛总圈数
    pub total_laps: u32,
}

impl SessionData {
    /// 按车手代码查找成绩
    pub fn result_for(&self, driver: &str) -> Option<&DriverResult> {
        self.results.iter().find(|r| r.driver == driver)
    }
}
