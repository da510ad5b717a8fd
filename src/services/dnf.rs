//! 未完赛判定 - 业务能力层
//!
//! 状态文本只要包含任意一个关键字（不区分大小写）就算未完赛。
//! 关键字列表来自配置，默认见 [`DEFAULT_DNF_KEYWORDS`]

use regex::Regex;

use crate::config::{Config, DEFAULT_DNF_KEYWORDS};
use crate::error::{AppError, AppResult};

/// 单个关键字匹配器
#[derive(Debug, Clone)]
struct KeywordMatcher {
    keyword: String,
    pattern: Regex,
}

/// 未完赛判定器
#[derive(Debug, Clone)]
pub struct DnfClassifier {
    matchers: Vec<KeywordMatcher>,
}

impl DnfClassifier {
    /// 由关键字列表创建，空白关键字会被忽略
    pub fn new<I, S>(keywords: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matchers = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim();
            if keyword.is_empty() {
                continue;
            }
            let pattern = Regex::new(&format!("(?i){}", regex::escape(keyword)))
                .map_err(|e| AppError::invalid_config("dnf_keywords", e.to_string()))?;
            matchers.push(KeywordMatcher {
                keyword: keyword.to_string(),
                pattern,
            });
        }

        if matchers.is_empty() {
            return Err(AppError::invalid_config("dnf_keywords", "至少需要一个关键字"));
        }

        Ok(Self { matchers })
    }

    /// 使用内置的九个关键字
    pub fn standard() -> AppResult<Self> {
        Self::new(DEFAULT_DNF_KEYWORDS)
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(&config.dnf_keywords)
    }

    /// 判断状态是否属于未完赛，状态缺失视为完赛
    pub fn is_dnf(&self, status: Option<&str>) -> bool {
        self.matched_keyword(status).is_some()
    }

    /// 返回第一个命中的关键字
    pub fn matched_keyword(&self, status: Option<&str>) -> Option<&str> {
        let status = status?;
        self.matchers
            .iter()
            .find(|m| m.pattern.is_match(status))
            .map(|m| m.keyword.as_str())
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.matchers.iter().map(|m| m.keyword.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retired_any_case_is_dnf() {
        let classifier = DnfClassifier::standard().unwrap();
        for status in ["Retired", "retired", "RETIRED", "Driver retired early"] {
            assert!(classifier.is_dnf(Some(status)), "{status} should be DNF");
        }
    }

    #[test]
    fn test_finished_statuses_are_not_dnf() {
        let classifier = DnfClassifier::standard().unwrap();
        assert!(!classifier.is_dnf(Some("Finished")));
        assert!(!classifier.is_dnf(Some("+1 Lap")));
        assert!(!classifier.is_dnf(Some("+3 Laps")));
    }

    #[test]
    fn test_default_keywords_skip_gearbox() {
        let classifier = DnfClassifier::standard().unwrap();
        assert!(!classifier.is_dnf(Some("Gearbox")));
        assert!(!classifier.is_dnf(Some("Suspension")));
    }

    #[test]
    fn test_keyword_substring_matches() {
        let classifier = DnfClassifier::standard().unwrap();
        assert_eq!(classifier.matched_keyword(Some("Water pressure")), Some("water"));
        assert_eq!(classifier.matched_keyword(Some("Power Unit")), Some("power"));
        assert_eq!(classifier.matched_keyword(Some("Collision damage")), Some("collision"));
        assert!(classifier.is_dnf(Some("Accident")));
        assert!(classifier.is_dnf(Some("Hydraulics")));
        assert!(classifier.is_dnf(Some("Electrical")));
    }

    #[test]
    fn test_missing_status_is_not_dnf() {
        assert!(!DnfClassifier::standard().unwrap().is_dnf(None));
    }

    #[test]
    fn test_custom_keywords_extend_coverage() {
        let classifier = DnfClassifier::new(["retired", "gearbox", " "]).unwrap();
        assert!(classifier.is_dnf(Some("Gearbox")));
        assert!(!classifier.is_dnf(Some("Accident")));
        assert_eq!(classifier.keywords().count(), 2);
    }

    #[test]
    fn test_keywords_are_literal_not_regex() {
        let classifier = DnfClassifier::new(["+1"]).unwrap();
        assert!(classifier.is_dnf(Some("+1 Lap")));
        assert!(!classifier.is_dnf(Some("11 Laps")));
    }

    #[test]
    fn test_empty_keyword_list_is_rejected() {
        assert!(DnfClassifier::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_default_matches_config_default() {
        let from_config = DnfClassifier::from_config(&Config::default()).unwrap();
        let standard = DnfClassifier::standard().unwrap();
        assert!(from_config.keywords().eq(standard.keywords()));
    }
}
