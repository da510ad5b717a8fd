//! Ergast 兼容 API（Jolpica）的响应结构
//!
//! 数字字段在接口里是字符串，统一用 [`deserialize_u32`] 兼容字符串和整数

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MrData {
    #[serde(deserialize_with = "deserialize_u32", default)]
    pub limit: u32,
    #[serde(deserialize_with = "deserialize_u32", default)]
    pub offset: u32,
    #[serde(deserialize_with = "deserialize_u32", default)]
    pub total: u32,
    #[serde(rename = "RaceTable")]
    pub race_table: Option<RaceTable>,
}

impl Response {
    /// 取出 Races 列表，缺失时为空
    pub fn into_races(self) -> Vec<Race> {
        self.mr_data
            .race_table
            .map(|t| t.races)
            .unwrap_or_default()
    }

    /// 响应里是否带有至少一场比赛
    ///
    /// 成绩尚未发布时接口返回 `total = 0` 和空的 Races
    pub fn has_races(&self) -> bool {
        self.mr_data.total > 0
            && self
                .mr_data
                .race_table
                .as_ref()
                .map_or(false, |t| !t.races.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceTable {
    #[serde(rename = "Races", default)]
    pub races: Vec<Race>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Race {
    #[serde(deserialize_with = "deserialize_u32")]
    pub round: u32,
    #[serde(rename = "raceName")]
    pub race_name: String,
    #[serde(rename = "Circuit")]
    pub circuit: Circuit,
    #[serde(rename = "Results", default)]
    pub results: Vec<RaceResult>,
    #[serde(rename = "QualifyingResults", default)]
    pub qualifying_results: Vec<QualifyingResult>,
    #[serde(rename = "Laps", default)]
    pub laps: Vec<Lap>,
    #[serde(rename = "PitStops", default)]
    pub pit_stops: Vec<PitStop>,
}

impl Race {
    /// 本页的数据行数，与 `MRData.total` 的计数口径一致
    pub fn page_rows(&self) -> usize {
        self.results.len()
            + self.qualifying_results.len()
            + self.pit_stops.len()
            + self.laps.iter().map(|lap| lap.timings.len()).sum::<usize>()
    }

    /// 追加下一页的数据行
    pub fn append_page(&mut self, page: Race) {
        self.results.extend(page.results);
        self.qualifying_results.extend(page.qualifying_results);
        self.laps.extend(page.laps);
        self.pit_stops.extend(page.pit_stops);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    #[serde(rename = "circuitId")]
    pub circuit_id: String,
    #[serde(rename = "circuitName")]
    pub circuit_name: String,
    #[serde(rename = "Location")]
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    pub code: Option<String>,
    #[serde(rename = "givenName")]
    pub given_name: String,
    #[serde(rename = "familyName")]
    pub family_name: String,
}

impl Driver {
    /// 三字母代码，早年车手没有代码时用大写姓氏
    pub fn abbreviation(&self) -> String {
        match &self.code {
            Some(code) if !code.trim().is_empty() => code.trim().to_string(),
            _ => self.family_name.to_uppercase(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(rename = "constructorId")]
    pub constructor_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceResult {
    #[serde(deserialize_with = "deserialize_u32")]
    pub position: u32,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
    #[serde(deserialize_with = "deserialize_u32", default)]
    pub laps: u32,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifyingResult {
    #[serde(deserialize_with = "deserialize_u32")]
    pub position: u32,
    #[serde(rename = "Driver")]
    pub driver: Driver,
    #[serde(rename = "Constructor")]
    pub constructor: Constructor,
    #[serde(rename = "Q1")]
    pub q1: Option<String>,
    #[serde(rename = "Q2")]
    pub q2: Option<String>,
    #[serde(rename = "Q3")]
    pub q3: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lap {
    #[serde(deserialize_with = "deserialize_u32")]
    pub number: u32,
    #[serde(rename = "Timings", default)]
    pub timings: Vec<Timing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timing {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PitStop {
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(deserialize_with = "deserialize_u32")]
    pub lap: u32,
}

/// 兼容字符串或整数形式的数字
fn deserialize_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer representing a non-negative number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value.trim().parse().map_err(E::custom)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u32::try_from(value).map_err(E::custom)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u32::try_from(value).map_err(E::custom)
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_as_strings_or_integers() {
        let json = r#"{"MRData":{"limit":"30","offset":0,"total":"2",
            "RaceTable":{"Races":[{"round":"12","raceName":"British Grand Prix",
            "Circuit":{"circuitId":"silverstone","circuitName":"Silverstone Circuit",
            "Location":{"locality":"Silverstone","country":"UK"}}}]}}}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(response.mr_data.limit, 30);
        assert_eq!(response.mr_data.total, 2);
        let races = response.into_races();
        assert_eq!(races[0].round, 12);
        assert!(races[0].laps.is_empty());
    }

    #[test]
    fn test_missing_race_table_yields_no_races() {
        let json = r#"{"MRData":{"limit":"30","offset":"0","total":"0"}}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert!(!response.has_races());
        assert!(response.into_races().is_empty());
    }

    #[test]
    fn test_empty_races_is_not_data() {
        let json = r#"{"MRData":{"limit":"30","offset":"0","total":"0",
            "RaceTable":{"season":"2024","round":"12","Races":[]}}}"#;
        let response: Response = serde_json::from_str(json).unwrap();
        assert!(!response.has_races());
    }

    #[test]
    fn test_append_page_counts_rows() {
        let page = |driver: &str| -> Race {
            serde_json::from_value(serde_json::json!({
                "round": "12",
                "raceName": "British Grand Prix",
                "Circuit": {
                    "circuitId": "silverstone",
                    "circuitName": "Silverstone Circuit",
                    "Location": {"locality": "Silverstone", "country": "UK"}
                },
                "Laps": [{"number": "1", "Timings": [{"driverId": driver, "time": "1:30.000"}]}],
                "PitStops": [{"driverId": driver, "lap": "20"}]
            }))
            .unwrap()
        };

        let mut race = page("hamilton");
        assert_eq!(race.page_rows(), 2);
        race.append_page(page("norris"));
        assert_eq!(race.page_rows(), 4);
        assert_eq!(race.laps.len(), 2);
        assert_eq!(race.pit_stops[1].driver_id, "norris");
    }

    #[test]
    fn test_driver_abbreviation_fallback() {
        let driver = Driver {
            driver_id: "fangio".to_string(),
            code: None,
            given_name: "Juan".to_string(),
            family_name: "Fangio".to_string(),
        };
        assert_eq!(driver.abbreviation(), "FANGIO");
        assert_eq!(driver.full_name(), "Juan Fangio");
    }
}
