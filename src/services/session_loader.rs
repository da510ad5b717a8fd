//! 赛段数据获取 - 业务能力层
//!
//! 把 Ergast 的赛程、成绩、圈速、进站记录拼成 [`SessionData`]。
//! 任何一步拿不到数据都直接返回 [`DataError`]，不重试、不返回部分结果

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::clients::ErgastClient;
use crate::config::Config;
use crate::error::{AppResult, DataError};
use crate::models::ergast::{Lap, PitStop, QualifyingResult, Race, RaceResult};
use crate::models::{parse_lap_time, DriverResult, LapRecord, SessionData, SessionId, SessionType};

/// 成绩表中找不到车手时使用的车队名
pub const UNKNOWN_TEAM: &str = "Unknown";

/// 赛段数据加载服务
pub struct SessionLoader {
    client: ErgastClient,
}

impl SessionLoader {
    /// 创建新的加载服务
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            client: ErgastClient::new(config)?,
        })
    }

    /// 加载一个赛段的圈速和成绩
    ///
    /// # 参数
    /// - `year`: 赛季
    /// - `event`: 分站名称（赛道、城市、国家或轮次）
    /// - `session_type`: 赛段
    ///
    /// # 返回
    /// 返回 (赛段标识, 赛段数据)
    pub async fn load_session(
        &self,
        year: u16,
        event: &str,
        session_type: SessionType,
    ) -> AppResult<(SessionId, SessionData)> {
        let schedule = self.client.season_schedule(year).await?;
        let race = resolve_event(&schedule, event).ok_or_else(|| DataError::EventNotFound {
            year,
            event: event.to_string(),
        })?;

        let session_id = SessionId {
            year,
            round: race.round,
            event_name: race.race_name.clone(),
            session_type,
        };
        info!("📍 匹配到分站: {}", session_id);

        let data = match session_type {
            SessionType::Race => self.load_race(&session_id).await?,
            SessionType::Qualifying => self.load_qualifying(&session_id).await?,
        };

        Ok((session_id, data))
    }

    async fn load_race(&self, id: &SessionId) -> AppResult<SessionData> {
        let results = self
            .client
            .race_results(id.year, id.round)
            .await?
            .map(|race| race.results)
            .unwrap_or_default();
        if results.is_empty() {
            return Err(DataError::NoClassification {
                year: id.year,
                round: id.round,
            }
            .into());
        }

        let laps = self.client.laps(id.year, id.round).await?;
        if laps.is_empty() {
            return Err(DataError::NoLaps {
                year: id.year,
                round: id.round,
            }
            .into());
        }

        let pit_stops = self.client.pit_stops(id.year, id.round).await?;
        info!(
            "✓ 获取到 {} 条成绩, {} 圈计时, {} 次进站",
            results.len(),
            laps.len(),
            pit_stops.len()
        );

        let data = assemble_race(&session_key(id), &results, &laps, &pit_stops);
        if data.laps.is_empty() {
            return Err(DataError::NoLaps {
                year: id.year,
                round: id.round,
            }
            .into());
        }
        Ok(data)
    }

    async fn load_qualifying(&self, id: &SessionId) -> AppResult<SessionData> {
        let results = self
            .client
            .qualifying_results(id.year, id.round)
            .await?
            .map(|race| race.qualifying_results)
            .unwrap_or_default();
        if results.is_empty() {
            return Err(DataError::SessionUnavailable {
                year: id.year,
                round: id.round,
                session: id.session_type.name().to_string(),
            }
            .into());
        }

        let data = assemble_qualifying(&session_key(id), &results);
        if data.laps.is_empty() {
            return Err(DataError::NoLaps {
                year: id.year,
                round: id.round,
            }
            .into());
        }
        Ok(data)
    }
}

/// 赛段在圈速记录中的标识，如 "2024-12-R"
pub fn session_key(id: &SessionId) -> String {
    format!("{}-{}-{}", id.year, id.round, id.session_type.code())
}

/// 在赛程中查找分站
///
/// 匹配顺序：轮次 → 精确匹配（赛道 ID、分站名、赛道名、城市、国家）→ 包含匹配
pub fn resolve_event<'a>(schedule: &'a [Race], event: &str) -> Option<&'a Race> {
    let needle = event.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Ok(round) = needle.parse::<u32>() {
        return schedule.iter().find(|race| race.round == round);
    }

    schedule
        .iter()
        .find(|race| event_fields(race).iter().any(|f| *f == needle))
        .or_else(|| {
            schedule
                .iter()
                .find(|race| event_fields(race).iter().any(|f| f.contains(&needle)))
        })
}

fn event_fields(race: &Race) -> [String; 5] {
    [
        race.circuit.circuit_id.to_lowercase(),
        race.race_name.to_lowercase(),
        race.circuit.circuit_name.to_lowercase(),
        race.circuit.location.locality.to_lowercase(),
        race.circuit.location.country.to_lowercase(),
    ]
}

/// 组装正赛数据
pub fn assemble_race(
    session: &str,
    results: &[RaceResult],
    laps: &[Lap],
    pit_stops: &[PitStop],
) -> SessionData {
    // driverId → (代码, 车队)
    let drivers: HashMap<&str, (String, &str)> = results
        .iter()
        .map(|r| {
            (
                r.driver.driver_id.as_str(),
                (r.driver.abbreviation(), r.constructor.name.as_str()),
            )
        })
        .collect();

    let pit_in: HashSet<(&str, u32)> = pit_stops
        .iter()
        .map(|p| (p.driver_id.as_str(), p.lap))
        .collect();

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for lap in laps {
        for timing in &lap.timings {
            let Some(lap_time) = parse_lap_time(&timing.time) else {
                warn!(
                    "无法解析圈速 '{}' (车手 {}, 第 {} 圈)，已跳过",
                    timing.time, timing.driver_id, lap.number
                );
                dropped += 1;
                continue;
            };

            let (driver, team) = match drivers.get(timing.driver_id.as_str()) {
                Some((code, team)) => (code.clone(), team.to_string()),
                None => (timing.driver_id.clone(), UNKNOWN_TEAM.to_string()),
            };

            let driver_id = timing.driver_id.as_str();
            records.push(LapRecord {
                driver,
                team,
                lap_number: lap.number,
                lap_time,
                session: session.to_string(),
                pit_in: pit_in.contains(&(driver_id, lap.number)),
                pit_out: lap.number > 1 && pit_in.contains(&(driver_id, lap.number - 1)),
            });
        }
    }
    if dropped > 0 {
        warn!("共跳过 {} 条无法解析的计时", dropped);
    }

    let driver_results: Vec<DriverResult> = results
        .iter()
        .map(|r| DriverResult {
            driver: r.driver.abbreviation(),
            full_name: r.driver.full_name(),
            team: r.constructor.name.clone(),
            position: r.position,
            status: r.status.clone(),
            laps_completed: r.laps,
        })
        .collect();

    let total_laps = results.iter().map(|r| r.laps).max().unwrap_or(0);

    SessionData {
        laps: records,
        results: driver_results,
        total_laps,
    }
}

/// 组装排位赛数据：Q1/Q2/Q3 各算一圈，圈数记为 1/2/3
pub fn assemble_qualifying(session: &str, results: &[QualifyingResult]) -> SessionData {
    let mut records = Vec::new();
    let mut driver_results = Vec::new();

    for result in results {
        let driver = result.driver.abbreviation();
        let team = result.constructor.name.clone();
        let mut completed = 0;

        for (idx, time) in [&result.q1, &result.q2, &result.q3].into_iter().enumerate() {
            let Some(lap_time) = time.as_deref().and_then(parse_lap_time) else {
                continue;
            };
            completed += 1;
            records.push(LapRecord {
                driver: driver.clone(),
                team: team.clone(),
                lap_number: idx as u32 + 1,
                lap_time,
                session: session.to_string(),
                pit_in: false,
                pit_out: false,
            });
        }

        driver_results.push(DriverResult {
            driver,
            full_name: result.driver.full_name(),
            team,
            position: result.position,
            status: None,
            laps_completed: completed,
        });
    }

    SessionData {
        laps: records,
        results: driver_results,
        total_laps: 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ergast::{Circuit, Constructor, Driver, Location, Timing};

    fn race(round: u32, name: &str, circuit_id: &str, locality: &str, country: &str) -> Race {
        Race {
            round,
            race_name: name.to_string(),
            circuit: Circuit {
                circuit_id: circuit_id.to_string(),
                circuit_name: format!("{} Circuit", locality),
                location: Location {
                    locality: locality.to_string(),
                    country: country.to_string(),
                },
            },
            results: Vec::new(),
            qualifying_results: Vec::new(),
            laps: Vec::new(),
            pit_stops: Vec::new(),
        }
    }

    fn schedule() -> Vec<Race> {
        vec![
            race(1, "Bahrain Grand Prix", "bahrain", "Sakhir", "Bahrain"),
            race(7, "Emilia Romagna Grand Prix", "imola", "Imola", "Italy"),
            race(12, "British Grand Prix", "silverstone", "Silverstone", "UK"),
            race(16, "Italian Grand Prix", "monza", "Monza", "Italy"),
        ]
    }

    fn driver(id: &str, code: &str) -> Driver {
        Driver {
            driver_id: id.to_string(),
            code: Some(code.to_string()),
            given_name: "Given".to_string(),
            family_name: id.to_string(),
        }
    }

    fn constructor(name: &str) -> Constructor {
        Constructor {
            constructor_id: name.to_lowercase(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_resolve_event_by_locality_case_insensitive() {
        let schedule = schedule();
        let race = resolve_event(&schedule, "silverstone").unwrap();
        assert_eq!(race.round, 12);
    }

    #[test]
    fn test_resolve_event_by_round() {
        let schedule = schedule();
        assert_eq!(resolve_event(&schedule, "16").unwrap().race_name, "Italian Grand Prix");
        assert!(resolve_event(&schedule, "99").is_none());
    }

    #[test]
    fn test_resolve_event_exact_beats_substring() {
        let schedule = schedule();
        // "Italy" 精确匹配国家，取第一个意大利分站
        assert_eq!(resolve_event(&schedule, "Italy").unwrap().round, 7);
        // "italian" 只能包含匹配
        assert_eq!(resolve_event(&schedule, "italian").unwrap().round, 16);
    }

    #[test]
    fn test_resolve_unknown_event() {
        let schedule = schedule();
        assert!(resolve_event(&schedule, "Atlantis").is_none());
        assert!(resolve_event(&schedule, "  ").is_none());
    }

    #[test]
    fn test_assemble_race_maps_drivers_and_pits() {
        let results = vec![
            RaceResult {
                position: 1,
                driver: driver("hamilton", "HAM"),
                constructor: constructor("Mercedes"),
                laps: 52,
                status: Some("Finished".to_string()),
            },
            RaceResult {
                position: 20,
                driver: driver("russell", "RUS"),
                constructor: constructor("Mercedes"),
                laps: 33,
                status: Some("Water pressure".to_string()),
            },
        ];
        let laps = vec![
            Lap {
                number: 1,
                timings: vec![
                    Timing {
                        driver_id: "hamilton".to_string(),
                        time: "1:36.000".to_string(),
                    },
                    Timing {
                        driver_id: "ghost".to_string(),
                        time: "1:40.000".to_string(),
                    },
                ],
            },
            Lap {
                number: 2,
                timings: vec![
                    Timing {
                        driver_id: "hamilton".to_string(),
                        time: "1:50.000".to_string(),
                    },
                    Timing {
                        driver_id: "russell".to_string(),
                        time: "garbage".to_string(),
                    },
                ],
            },
            Lap {
                number: 3,
                timings: vec![Timing {
                    driver_id: "hamilton".to_string(),
                    time: "1:55.000".to_string(),
                }],
            },
        ];
        let pit_stops = vec![PitStop {
            driver_id: "hamilton".to_string(),
            lap: 2,
        }];

        let data = assemble_race("2024-12-R", &results, &laps, &pit_stops);

        assert_eq!(data.total_laps, 52);
        assert_eq!(data.results.len(), 2);
        // 无法解析的计时被丢弃
        assert_eq!(data.laps.len(), 4);

        let ghost = data.laps.iter().find(|l| l.driver == "ghost").unwrap();
        assert_eq!(ghost.team, UNKNOWN_TEAM);

        let ham: Vec<&LapRecord> = data.laps.iter().filter(|l| l.driver == "HAM").collect();
        assert_eq!(ham.len(), 3);
        assert!(!ham[0].is_pit_lap());
        assert!(ham[1].pit_in && !ham[1].pit_out);
        assert!(ham[2].pit_out && !ham[2].pit_in);
        assert_eq!(ham[0].team, "Mercedes");
        assert_eq!(ham[0].session, "2024-12-R");
    }

    #[test]
    fn test_assemble_qualifying_uses_segments_as_laps() {
        let results = vec![
            QualifyingResult {
                position: 1,
                driver: driver("russell", "RUS"),
                constructor: constructor("Mercedes"),
                q1: Some("1:27.000".to_string()),
                q2: Some("1:26.500".to_string()),
                q3: Some("1:25.819".to_string()),
            },
            QualifyingResult {
                position: 20,
                driver: driver("sargeant", "SAR"),
                constructor: constructor("Williams"),
                q1: Some("1:29.000".to_string()),
                q2: None,
                q3: Some("".to_string()),
            },
        ];

        let data = assemble_qualifying("2024-12-Q", &results);

        assert_eq!(data.total_laps, 3);
        assert_eq!(data.laps.len(), 4);
        let rus_q3 = data
            .laps
            .iter()
            .find(|l| l.driver == "RUS" && l.lap_number == 3)
            .unwrap();
        assert!((rus_q3.lap_time - 85.819).abs() < 1e-9);

        let sar = data.result_for("SAR").unwrap();
        assert_eq!(sar.laps_completed, 1);
        assert!(sar.status.is_none());
    }
}
