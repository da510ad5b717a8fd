use serde::{Deserialize, Serialize};

/// 赛段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    /// 正赛
    Race,
    /// 排位赛
    Qualifying,
}

impl SessionType {
    /// 获取赛段代码
    pub fn code(self) -> &'static str {
        match self {
            SessionType::Race => "R",
            SessionType::Qualifying => "Q",
        }
    }

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            SessionType::Race => "Race",
            SessionType::Qualifying => "Qualifying",
        }
    }

    /// 从代码或名称解析赛段（不区分大小写）
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "r" | "race" => Some(SessionType::Race),
            "q" | "qualifying" | "quali" => Some(SessionType::Qualifying),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 赛段标识：赛季 + 分站 + 赛段类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionId {
    pub year: u16,
    pub round: u32,
    pub event_name: String,
    pub session_type: SessionType,
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} (R{}) {}",
            self.year, self.event_name, self.round, self.session_type
        )
    }
}
