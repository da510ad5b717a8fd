/// Ergast 兼容 API 客户端
///
/// 封装所有 HTTP 调用、分页和磁盘缓存
use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use crate::clients::ResponseCache;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::ergast::{Lap, PitStop, Race, Response};

/// Ergast API 客户端
pub struct ErgastClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
    cache: Option<ResponseCache>,
}

impl ErgastClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("fastest_lap_delta/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = config
            .cache_enabled
            .then(|| ResponseCache::new(&config.cache_dir));

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
            cache,
        })
    }

    /// 赛季赛程
    pub async fn season_schedule(&self, year: u16) -> AppResult<Vec<Race>> {
        let response = self.get(&format!("/{}.json", year), None).await?;
        Ok(response.into_races())
    }

    /// 正赛成绩（自动翻页）
    pub async fn race_results(&self, year: u16, round: u32) -> AppResult<Option<Race>> {
        let path = format!("/{}/{}/results.json", year, round);
        self.all_pages(&path).await
    }

    /// 排位赛成绩（自动翻页）
    pub async fn qualifying_results(&self, year: u16, round: u32) -> AppResult<Option<Race>> {
        let path = format!("/{}/{}/qualifying.json", year, round);
        self.all_pages(&path).await
    }

    /// 全部圈速（自动翻页）
    pub async fn laps(&self, year: u16, round: u32) -> AppResult<Vec<Lap>> {
        let path = format!("/{}/{}/laps.json", year, round);
        let laps = self
            .all_pages(&path)
            .await?
            .map(|race| race.laps)
            .unwrap_or_default();
        Ok(merge_laps(laps))
    }

    /// 进站记录（自动翻页）
    pub async fn pit_stops(&self, year: u16, round: u32) -> AppResult<Vec<PitStop>> {
        let path = format!("/{}/{}/pitstops.json", year, round);
        Ok(self
            .all_pages(&path)
            .await?
            .map(|race| race.pit_stops)
            .unwrap_or_default())
    }

    /// 按 `page_size` 逐页请求，把各页数据行追加到第一页的比赛上
    ///
    /// 取到 `MRData.total` 条或遇到空页时停止
    async fn all_pages(&self, path: &str) -> AppResult<Option<Race>> {
        let mut merged: Option<Race> = None;
        let mut offset = 0;

        loop {
            let response = self.get(path, Some((self.page_size, offset))).await?;
            let total = response.mr_data.total;
            let page = response.into_races().into_iter().next();
            let rows_on_page = page.as_ref().map_or(0, Race::page_rows);
            debug!(
                "{} 分页 offset={} 本页 {} 条 / 共 {} 条",
                path, offset, rows_on_page, total
            );

            if let Some(page) = page {
                match merged.as_mut() {
                    Some(race) => race.append_page(page),
                    None => merged = Some(page),
                }
            }

            offset += self.page_size;
            if rows_on_page == 0 || offset >= total {
                break;
            }
        }

        Ok(merged)
    }

    /// 发起 GET 请求并解析响应，优先读缓存
    ///
    /// # 参数
    /// - `path`: 以 `/` 开头的接口路径
    /// - `page`: 分页参数 (limit, offset)
    async fn get(&self, path: &str, page: Option<(u32, u32)>) -> AppResult<Response> {
        let request_key = match page {
            Some((limit, offset)) => format!("{}?limit={}&offset={}", path, limit, offset),
            None => path.to_string(),
        };

        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(&request_key).await {
                match serde_json::from_str::<Response>(&body) {
                    Ok(response) if response.has_races() => return Ok(response),
                    Ok(_) => debug!("缓存为空页，重新请求 {}", request_key),
                    Err(e) => debug!("缓存内容无法解析，重新请求 {}: {}", request_key, e),
                }
            }
        }

        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, page);

        let mut request = self.http.get(&url);
        if let Some((limit, offset)) = page {
            request = request.query(&[("limit", limit), ("offset", offset)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(ApiError::BadStatus {
                endpoint: path.to_string(),
                status: status.as_u16(),
            }));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(path, e))?;
        let parsed: Response = serde_json::from_str(&body)?;

        // 空页说明数据尚未发布，不能缓存
        if let Some(cache) = self.cache.as_ref().filter(|_| parsed.has_races()) {
            cache.put(&request_key, &body).await;
        }

        Ok(parsed)
    }
}

/// 合并圈速：同一圈的计时可能被拆到相邻两页
fn merge_laps(laps: Vec<Lap>) -> Vec<Lap> {
    let mut merged: BTreeMap<u32, Lap> = BTreeMap::new();
    for lap in laps {
        merged
            .entry(lap.number)
            .or_insert_with(|| Lap {
                number: lap.number,
                timings: Vec::new(),
            })
            .timings
            .extend(lap.timings);
    }
    merged.into_values().collect()
}
