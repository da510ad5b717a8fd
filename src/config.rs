use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::models::SessionType;

/// 默认配置文件名（位于当前工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "fastest_lap_delta.toml";

/// 默认的未完赛关键字
pub const DEFAULT_DNF_KEYWORDS: [&str; 9] = [
    "accident",
    "mechanical",
    "collision",
    "water",
    "dnf",
    "retired",
    "electrical",
    "power",
    "hydraulic",
];

/// 程序配置
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// 赛季
    pub year: u16,
    /// 分站名称（赛道、城市、国家或轮次均可）
    pub event: String,
    /// 赛段
    pub session: SessionType,
    // --- 数据源 ---
    pub api_base_url: String,
    pub cache_enabled: bool,
    pub cache_dir: String,
    pub request_timeout_secs: u64,
    /// 圈速分页大小
    pub page_size: u32,
    // --- 分析 ---
    /// 快圈阈值：不慢于全场最快圈的该倍数
    pub quicklap_threshold: f64,
    /// 是否剔除进出站圈
    pub exclude_pit_laps: bool,
    pub dnf_keywords: Vec<String>,
    // --- 输出 ---
    /// 横轴右侧留白比例
    pub zoom_margin: f64,
    pub output_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            year: 2024,
            event: "Silverstone".to_string(),
            session: SessionType::Race,
            api_base_url: "https://api.jolpi.ca/ergast/f1".to_string(),
            cache_enabled: true,
            cache_dir: "cache".to_string(),
            request_timeout_secs: 30,
            page_size: 100,
            quicklap_threshold: 1.07,
            exclude_pit_laps: false,
            dnf_keywords: DEFAULT_DNF_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            zoom_margin: 0.1,
            output_file: "fastest_lap_delta.html".to_string(),
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    year: Option<u16>,
    event: Option<String>,
    session: Option<String>,
    api_base_url: Option<String>,
    cache_enabled: Option<bool>,
    cache_dir: Option<String>,
    request_timeout_secs: Option<u64>,
    page_size: Option<u32>,
    quicklap_threshold: Option<f64>,
    exclude_pit_laps: Option<bool>,
    dnf_keywords: Option<Vec<String>>,
    zoom_margin: Option<f64>,
    output_file: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 加载配置：默认值 ← TOML 文件 ← 环境变量
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        let file_path = std::env::var("F1_CONFIG_FILE")
            .ok()
            .or_else(|| Path::new(DEFAULT_CONFIG_FILE).exists().then(|| DEFAULT_CONFIG_FILE.to_string()));

        if let Some(path) = file_path {
            debug!("读取配置文件: {}", path);
            let content = std::fs::read_to_string(&path)
                .map_err(|e| AppError::file_read_failed(&path, e))?;
            config.apply_toml(&content).map_err(|e| match e {
                AppError::File(FileError::TomlParseFailed { source, .. }) => {
                    AppError::File(FileError::TomlParseFailed { path, source })
                }
                other => other,
            })?;
        }

        config.apply_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// 用 TOML 文本覆盖当前配置
    pub fn apply_toml(&mut self, content: &str) -> AppResult<()> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(v) = file.year {
            self.year = v;
        }
        if let Some(v) = file.event {
            self.event = v;
        }
        if let Some(v) = file.session {
            self.session = parse_session(&v)?;
        }
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.cache_enabled {
            self.cache_enabled = v;
        }
        if let Some(v) = file.cache_dir {
            self.cache_dir = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = file.page_size {
            self.page_size = v;
        }
        if let Some(v) = file.quicklap_threshold {
            self.quicklap_threshold = v;
        }
        if let Some(v) = file.exclude_pit_laps {
            self.exclude_pit_laps = v;
        }
        if let Some(v) = file.dnf_keywords {
            self.dnf_keywords = v;
        }
        if let Some(v) = file.zoom_margin {
            self.zoom_margin = v;
        }
        if let Some(v) = file.output_file {
            self.output_file = v;
        }
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        Ok(())
    }

    /// 用环境变量覆盖当前配置
    ///
    /// `lookup` 用于读取变量，测试时可以传入固定的映射
    pub fn apply_env_with<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("F1_YEAR") {
            self.year = parse_env("F1_YEAR", &v, "u16")?;
        }
        if let Some(v) = lookup("F1_EVENT") {
            self.event = v;
        }
        if let Some(v) = lookup("F1_SESSION") {
            self.session = parse_session(&v)?;
        }
        if let Some(v) = lookup("F1_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("F1_CACHE_ENABLED") {
            self.cache_enabled = parse_env("F1_CACHE_ENABLED", &v, "bool")?;
        }
        if let Some(v) = lookup("F1_CACHE_DIR") {
            self.cache_dir = v;
        }
        if let Some(v) = lookup("F1_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("F1_REQUEST_TIMEOUT_SECS", &v, "u64")?;
        }
        if let Some(v) = lookup("F1_PAGE_SIZE") {
            self.page_size = parse_env("F1_PAGE_SIZE", &v, "u32")?;
        }
        if let Some(v) = lookup("F1_QUICKLAP_THRESHOLD") {
            self.quicklap_threshold = parse_env("F1_QUICKLAP_THRESHOLD", &v, "f64")?;
        }
        if let Some(v) = lookup("F1_EXCLUDE_PIT_LAPS") {
            self.exclude_pit_laps = parse_env("F1_EXCLUDE_PIT_LAPS", &v, "bool")?;
        }
        if let Some(v) = lookup("F1_DNF_KEYWORDS") {
            self.dnf_keywords = v
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
        }
        if let Some(v) = lookup("F1_ZOOM_MARGIN") {
            self.zoom_margin = parse_env("F1_ZOOM_MARGIN", &v, "f64")?;
        }
        if let Some(v) = lookup("F1_OUTPUT_FILE") {
            self.output_file = v;
        }
        if let Some(v) = lookup("VERBOSE_LOGGING") {
            self.verbose_logging = parse_env("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(())
    }

    /// 检查配置取值
    pub fn validate(&self) -> AppResult<()> {
        if !(self.quicklap_threshold > 1.0) {
            return Err(AppError::invalid_config(
                "quicklap_threshold",
                format!("必须大于 1.0，当前为 {}", self.quicklap_threshold),
            ));
        }
        if !(self.zoom_margin >= 0.0) {
            return Err(AppError::invalid_config(
                "zoom_margin",
                format!("不能为负数，当前为 {}", self.zoom_margin),
            ));
        }
        if self.page_size == 0 {
            return Err(AppError::invalid_config("page_size", "不能为 0"));
        }
        if self.dnf_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(AppError::invalid_config("dnf_keywords", "至少需要一个关键字"));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, value: &str, expected_type: &str) -> AppResult<T> {
    value.trim().parse().map_err(|_| {
        AppError::Config(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value: value.to_string(),
            expected_type: expected_type.to_string(),
        })
    })
}

fn parse_session(value: &str) -> AppResult<SessionType> {
    SessionType::parse(value)
        .ok_or_else(|| AppError::Config(ConfigError::UnknownSessionType(value.to_string())))
}
