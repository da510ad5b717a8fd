use serde::{Deserialize, Serialize};

/// 单圈记录，获取后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    /// 车手三字母代码（如 VER）
    pub driver: String,
    pub team: String,
    pub lap_number: u32,
    /// 单圈时间（秒）
    pub lap_time: f64,
    /// 赛段标识（如 "2024-12-R"）
    pub session: String,
    /// 本圈进站
    #[serde(default)]
    pub pit_in: bool,
    /// 本圈出站
    #[serde(default)]
    pub pit_out: bool,
}

impl LapRecord {
    pub fn is_pit_lap(&self) -> bool {
        self.pit_in || self.pit_out
    }
}

/// 将 "1:32.123" / "32.123" / "1:01:32.123" 格式的圈速解析为秒
///
/// 无法解析时返回 None
pub fn parse_lap_time(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return None;
    }

    for (idx, part) in parts.iter().enumerate() {
        let is_last = idx == parts.len() - 1;
        let value: f64 = if is_last {
            part.parse().ok()?
        } else {
            part.parse::<u32>().ok()? as f64
        };
        if value < 0.0 || !value.is_finite() {
            return None;
        }
        // 非首段的分、秒必须小于 60
        if idx > 0 && value >= 60.0 {
            return None;
        }
        total = total * 60.0 + value;
    }

    Some(total)
}

/// 将秒格式化为 "M:SS.mmm"
pub fn format_lap_time(seconds: f64) -> String {
    let millis = (seconds * 1000.0).round() as u64;
    let minutes = millis / 60_000;
    let rest = millis % 60_000;
    format!("{}:{:02}.{:03}", minutes, rest / 1000, rest % 1000)
}
