use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use moka::future::Cache;

use crate::chart_api::{load_preview, ImagePreview, ViewSize};
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PreviewKey {
    path: PathBuf,
    size: ViewSize,
    modified: u128,
}

/// Scaled previews of images on disk, invalidated when the file changes.
pub struct PreviewCache {
    previews: Cache<PreviewKey, ImagePreview>,
}

impl PreviewCache {
    pub fn new() -> Self {
        let previews = Cache::builder()
            .max_capacity(64)
            .time_to_live(Duration::from_secs(30 * 60))
            .build();

        Self { previews }
    }

    async fn modified_nanos(path: &Path) -> AppResult<u128> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .unwrap_or(Duration::ZERO)
            .as_nanos())
    }

    pub async fn get_or_load(&self, path: &Path, size: ViewSize) -> AppResult<ImagePreview> {
        let key = PreviewKey {
            path: path.to_path_buf(),
            size,
            modified: Self::modified_nanos(path).await?,
        };

        if let Some(preview) = self.previews.get(&key).await {
            return Ok(preview);
        }

        let preview = load_preview(path, size).await?;
        self.previews.insert(key, preview.clone()).await;
        Ok(preview)
    }

    pub async fn invalidate(&self, path: &Path) {
        let path = path.to_path_buf();
        // Entries are keyed by size too, so drop every size for this path.
        let stale: Vec<PreviewKey> = self
            .previews
            .iter()
            .filter(|(k, _)| k.path == path)
            .map(|(k, _)| (*k).clone())
            .collect();
        for key in stale {
            self.previews.invalidate(&key).await;
        }
    }

    #[cfg(test)]
    async fn entry_count(&self) -> u64 {
        self.previews.run_pending_tasks().await;
        self.previews.entry_count()
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = ImageBuffer::from_pixel(width, height, Rgb([200u8, 10, 10]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        std::fs::write(path, out).unwrap();
    }

    #[tokio::test]
    async fn caches_per_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.png");
        write_png(&path, 64, 32);

        let cache = PreviewCache::new();
        let small = ViewSize { width: 16, height: 16 };
        let large = ViewSize { width: 32, height: 32 };

        let a = cache.get_or_load(&path, small).await.unwrap();
        let b = cache.get_or_load(&path, small).await.unwrap();
        assert_eq!(a, b);
        let c = cache.get_or_load(&path, large).await.unwrap();
        assert_eq!((c.width, c.height), (32, 16));
        assert_eq!(cache.entry_count().await, 2);

        cache.invalidate(&path).await;
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn resave_within_same_second_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let base = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let touch = |offset_ms: u64| {
            std::fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(base + Duration::from_millis(offset_ms))
                .unwrap();
        };

        let cache = PreviewCache::new();
        let size = ViewSize { width: 64, height: 64 };

        write_png(&path, 64, 32);
        touch(100);
        let first = cache.get_or_load(&path, size).await.unwrap();
        assert_eq!((first.width, first.height), (64, 32));

        write_png(&path, 32, 64);
        touch(200);
        let second = cache.get_or_load(&path, size).await.unwrap();
        assert_eq!((second.width, second.height), (32, 64));
    }

    #[tokio::test]
    async fn missing_file_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PreviewCache::new();
        let size = ViewSize { width: 10, height: 10 };
        assert!(cache.get_or_load(&dir.path().join("nope.png"), size).await.is_err());
        assert_eq!(cache.entry_count().await, 0);
    }
}
