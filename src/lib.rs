//! # Fastest Lap Delta
//!
//! 获取 F1 赛段计时数据，计算每位车手的最快圈与全场最快圈的差距，输出横向柱状图
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 只负责 HTTP 和磁盘缓存
//! - `ErgastClient` - Ergast 兼容 API（分页、缓存）
//! - `ResponseCache` - 按请求路径缓存 JSON 原文
//!
//! ### ② 业务能力层（Services）
//! - `SessionLoader` - 赛段数据获取（分站匹配、圈速、成绩、进站）
//! - `QuickLapFilter` / `fastest_per_driver` - 快圈筛选与每人最快圈
//! - `DnfClassifier` - 未完赛判定
//! - `build_rows` / `sort_by_delta_desc` - 差距、配色与排序
//!
//! ### ③ 展示层（Render）
//! - `ChartSpec` - 图表描述
//! - `HtmlChart` - HTML/SVG 输出
//! - `TextTable` - 终端表格
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/session_runner` - 一次完整分析
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod render;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{DerivedRow, LapRecord, SessionData, SessionType};
pub use orchestrator::{analyze, Analysis, App};
