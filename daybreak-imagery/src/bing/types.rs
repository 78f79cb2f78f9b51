use serde::Deserialize;

/// Archive document returned by `HPImageArchive.aspx`.
///
/// Deserialization is deliberately forgiving: every field defaults, unknown
/// fields are ignored, and a response with no `images` entry still decodes.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArchiveResponse {
    #[serde(default)]
    pub images: Vec<ArchiveImage>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ArchiveImage {
    /// Image path relative to the archive host, including its query string.
    #[serde(default)]
    pub url: String,
    /// Caption plus attribution, e.g. "Sunset over hills (© Someone)".
    #[serde(default)]
    pub copyright: String,
    #[serde(default)]
    pub startdate: Option<String>,
    #[serde(default)]
    pub urlbase: Option<String>,
    #[serde(default)]
    pub copyrightlink: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Caption and resolved absolute URL for the current daily image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyImage {
    pub caption: String,
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_populated_document() {
        let raw = r#"{
            "images": [{
                "startdate": "20210606",
                "url": "/th?id=OHR.Bird_1920x1080.jpg&pid=hp",
                "urlbase": "/th?id=OHR.Bird",
                "copyright": "A bird on a sunflower (© Someone/Getty Images)",
                "copyrightlink": "https://example.com/search?q=bird",
                "title": ""
            }],
            "tooltips": {"loading": "Loading..."}
        }"#;
        let doc: ArchiveResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.images.len(), 1);
        assert_eq!(doc.images[0].url, "/th?id=OHR.Bird_1920x1080.jpg&pid=hp");
        assert!(doc.images[0].copyright.starts_with("A bird"));
    }

    #[test]
    fn decodes_empty_document_to_defaults() {
        let doc: ArchiveResponse = serde_json::from_str("{}").unwrap();
        assert!(doc.images.is_empty());

        let image: ArchiveImage = serde_json::from_str("{}").unwrap();
        assert_eq!(image.url, "");
        assert_eq!(image.copyright, "");
    }
}
