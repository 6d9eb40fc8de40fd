//! On-disk cache of region identifiers per profile.
//!
//! Stored at `<cache_dir>/lazyaliyun/region_cache.json`. Entries older than
//! [`REGION_CACHE_TTL_DAYS`] days are treated as absent.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const CACHE_DIR: &str = "lazyaliyun";
const CACHE_FILE: &str = "region_cache.json";
pub const REGION_CACHE_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCacheEntry {
    pub profile: String,
    pub regions: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl RegionCacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.updated_at) < Duration::days(REGION_CACHE_TTL_DAYS)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(default)]
    profiles: BTreeMap<String, RegionCacheEntry>,
}

#[derive(Debug, Clone)]
pub struct RegionCache {
    path: PathBuf,
}

impl RegionCache {
    /// Cache under the platform cache directory, if there is one.
    pub fn open() -> Option<Self> {
        dirs::cache_dir().map(|dir| Self::at(dir.join(CACHE_DIR).join(CACHE_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Regions cached for `profile`, or `None` on a miss or a stale entry.
    pub fn get(&self, profile: &str) -> Option<Vec<String>> {
        self.get_at(profile, Utc::now())
    }

    fn get_at(&self, profile: &str, now: DateTime<Utc>) -> Option<Vec<String>> {
        let entry = self.read().profiles.remove(profile)?;
        if entry.is_fresh(now) {
            debug!(profile, count = entry.regions.len(), "Region cache hit");
            Some(entry.regions)
        } else {
            debug!(profile, updated_at = %entry.updated_at, "Region cache entry expired");
            None
        }
    }

    /// Store `regions` for `profile`, deduplicated and sorted.
    pub fn set(&self, profile: &str, regions: &[String]) -> Result<()> {
        self.set_at(profile, regions, Utc::now())
    }

    fn set_at(&self, profile: &str, regions: &[String], now: DateTime<Utc>) -> Result<()> {
        let regions: BTreeSet<&String> = regions.iter().filter(|r| !r.is_empty()).collect();
        let mut file = self.read();
        file.profiles.insert(
            profile.to_string(),
            RegionCacheEntry {
                profile: profile.to_string(),
                regions: regions.into_iter().cloned().collect(),
                updated_at: now,
            },
        );
        self.write(&file)
    }

    /// Drop the entry for `profile`, leaving other profiles untouched.
    pub fn clear(&self, profile: &str) -> Result<()> {
        let mut file = self.read();
        if file.profiles.remove(profile).is_some() {
            self.write(&file)?;
        }
        Ok(())
    }

    /// A missing or corrupt file reads as empty.
    fn read(&self) -> CacheFile {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %self.path.display(), error = %e, "Could not read region cache");
                }
                return CacheFile::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Ignoring corrupt region cache");
            CacheFile::default()
        })
    }

    fn write(&self, file: &CacheFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(file)?)?;
        debug!(path = %self.path.display(), "Region cache written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_set_then_get_sorts_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RegionCache::at(dir.path().join("nested").join(CACHE_FILE));

        cache
            .set("default", &regions(&["cn-shanghai", "cn-hangzhou", "cn-shanghai", ""]))
            .unwrap();

        assert_eq!(cache.get("default"), Some(regions(&["cn-hangzhou", "cn-shanghai"])));
        assert_eq!(cache.get("other"), None);
    }

    #[test]
    fn test_entries_expire_after_seven_days() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RegionCache::at(dir.path().join(CACHE_FILE));
        let written = Utc::now() - Duration::days(10);
        cache.set_at("default", &regions(&["cn-beijing"]), written).unwrap();

        assert_eq!(cache.get_at("default", written + Duration::days(6)), Some(regions(&["cn-beijing"])));
        assert_eq!(cache.get_at("default", written + Duration::days(7)), None);
        assert_eq!(cache.get("default"), None);
    }

    #[test]
    fn test_clear_removes_only_that_profile() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RegionCache::at(dir.path().join(CACHE_FILE));
        cache.set("a", &regions(&["cn-hangzhou"])).unwrap();
        cache.set("b", &regions(&["us-west-1"])).unwrap();

        cache.clear("a").unwrap();

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(regions(&["us-west-1"])));
    }

    #[test]
    fn test_file_shape() {
        let dir = tempfile::tempdir().unwrap();
        let cache = RegionCache::at(dir.path().join(CACHE_FILE));
        cache.set("default", &regions(&["cn-hangzhou"])).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(cache.path()).unwrap()).unwrap();
        let entry = &raw["profiles"]["default"];
        assert_eq!(entry["profile"], "default");
        assert_eq!(entry["regions"][0], "cn-hangzhou");
        assert!(entry["updated_at"].is_string());
    }

    #[test]
    fn test_corrupt_file_reads_as_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CACHE_FILE);
        fs::write(&path, "{not json").unwrap();
        let cache = RegionCache::at(&path);

        assert_eq!(cache.get("default"), None);
        cache.set("default", &regions(&["cn-hangzhou"])).unwrap();
        assert!(cache.get("default").is_some());
    }
}
