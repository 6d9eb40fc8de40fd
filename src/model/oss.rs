use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Bucket {
    pub name: String,
    pub location: String,
    pub creation_date: String,
    pub storage_class: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ObjectSummary {
    pub bucket: String,
    pub key: String,
    /// Bytes
    pub size: u64,
    pub last_modified: String,
    pub storage_class: String,
    #[serde(rename = "ETag")]
    pub etag: String,
}

impl ObjectSummary {
    pub fn size_label(&self) -> String {
        const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
        let mut size = self.size as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{} B", self.size)
        } else {
            format!("{size:.1} {}", UNITS[unit])
        }
    }
}

/// One marker-delimited page of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectPage {
    pub objects: Vec<ObjectSummary>,
    /// Marker that continues after this page, when there is one.
    pub next_marker: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_label() {
        let mut object = ObjectSummary {
            size: 512,
            ..ObjectSummary::default()
        };
        assert_eq!(object.size_label(), "512 B");
        object.size = 1536;
        assert_eq!(object.size_label(), "1.5 KiB");
        object.size = 3 * 1024 * 1024 * 1024;
        assert_eq!(object.size_label(), "3.0 GiB");
    }
}
