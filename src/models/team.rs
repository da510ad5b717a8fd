//! 车队配色表
//!
//! 只读常量表 + 显式兜底色，调用方不需要处理"找不到"的情况

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 未知车队使用的中性灰 (#888888)
pub const FALLBACK_COLOR: Rgba = Rgba::rgb(0x88, 0x88, 0x88);

/// 车队名称（小写）→ RGB
///
/// 同时收录 Ergast 的车队名和常见别名
static TEAM_COLORS: phf::Map<&'static str, (u8, u8, u8)> = phf_map! {
    "red bull" => (0x36, 0x71, 0xC6),
    "red bull racing" => (0x36, 0x71, 0xC6),
    "ferrari" => (0xE8, 0x00, 0x2D),
    "mercedes" => (0x27, 0xF4, 0xD2),
    "mclaren" => (0xFF, 0x80, 0x00),
    "aston martin" => (0x22, 0x99, 0x71),
    "alpine" => (0x00, 0x93, 0xCC),
    "alpine f1 team" => (0x00, 0x93, 0xCC),
    "williams" => (0x64, 0xC4, 0xFF),
    "rb" => (0x66, 0x92, 0xFF),
    "rb f1 team" => (0x66, 0x92, 0xFF),
    "racing bulls" => (0x66, 0x92, 0xFF),
    "sauber" => (0x52, 0xE2, 0x52),
    "kick sauber" => (0x52, 0xE2, 0x52),
    "haas" => (0xB6, 0xBA, 0xBD),
    "haas f1 team" => (0xB6, 0xBA, 0xBD),
};

/// RGBA 颜色，透明度取值 0.0 ~ 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// 不透明颜色
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// 按比例缩放透明度，RGB 不变
    pub fn scale_opacity(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// "#RRGGBB"
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// 查询车队颜色，未知车队返回 [`FALLBACK_COLOR`]
pub fn team_color(team: &str) -> Rgba {
    TEAM_COLORS
        .get(team.trim().to_lowercase().as_str())
        .map(|&(r, g, b)| Rgba::rgb(r, g, b))
        .unwrap_or(FALLBACK_COLOR)
}

/// 柱形描边
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub color: Rgba,
    pub width: f64,
}

impl Outline {
    /// 未完赛车手使用的红色实线描边
    pub const DNF: Outline = Outline {
        color: Rgba::rgb(0xFF, 0x00, 0x00),
        width: 1.0,
    };
}
