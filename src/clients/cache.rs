/// 接口响应磁盘缓存
///
/// 按请求路径保存 JSON 原文，读写失败都不影响主流程
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// 响应缓存
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// 创建缓存（目录在首次写入时创建）
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 请求对应的缓存文件路径
    ///
    /// 非字母数字字符统一替换为 `_`
    pub fn path_for(&self, request_key: &str) -> PathBuf {
        let name: String = request_key
            .trim_matches('/')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", name))
    }

    /// 读取缓存，未命中或读取失败返回 None
    pub async fn get(&self, request_key: &str) -> Option<String> {
        let path = self.path_for(request_key);
        match fs::read_to_string(&path).await {
            Ok(body) => {
                debug!("缓存命中: {}", path.display());
                Some(body)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("读取缓存失败 {}: {}", path.display(), e);
                None
            }
        }
    }

    /// 写入缓存，失败只记录日志
    pub async fn put(&self, request_key: &str, body: &str) {
        if let Err(e) = fs::create_dir_all(&self.dir).await {
            warn!("创建缓存目录失败 {}: {}", self.dir.display(), e);
            return;
        }

        let path = self.path_for(request_key);
        match fs::write(&path, body).await {
            Ok(()) => debug!("已写入缓存: {}", path.display()),
            Err(e) => warn!("写入缓存失败 {}: {}", path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache(name: &str) -> ResponseCache {
        let dir = std::env::temp_dir().join(format!(
            "fastest_lap_delta_cache_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        ResponseCache::new(dir)
    }

    #[test]
    fn test_path_for_sanitises_key() {
        let cache = ResponseCache::new("cache");
        let path = cache.path_for("/2024/12/laps.json?limit=100&offset=200");
        assert_eq!(
            path,
            Path::new("cache").join("2024_12_laps_json_limit_100_offset_200.json")
        );
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = temp_cache("roundtrip");
        assert!(cache.get("/2024.json").await.is_none());

        cache.put("/2024.json", r#"{"MRData":{}}"#).await;
        assert_eq!(
            cache.get("/2024.json").await.as_deref(),
            Some(r#"{"MRData":{}}"#)
        );

        let _ = std::fs::remove_dir_all(cache.dir());
    }

    #[test]
    fn test_miss_with_block_on() {
        let cache = temp_cache("miss");
        let hit = tokio_test::block_on(cache.get("/1950/1/results.json"));
        assert!(hit.is_none());
    }
}
