use serde::{Deserialize, Serialize};

pub const PDF_MIME: &str = "application/pdf";

/// A file handed back by the picker, carried unchanged into the upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialFile {
    pub uri: String,
    pub file_name: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    pub file_size: Option<u64>,
}

impl MaterialFile {
    /// Name used for the multipart upload.
    pub fn upload_name(&self) -> String {
        self.file_name
            .clone()
            .or_else(|| {
                self.uri
                    .rsplit('/')
                    .next()
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "material.pdf".to_string())
    }

    pub fn upload_mime(&self) -> &str {
        self.mime_type.as_deref().unwrap_or(PDF_MIME)
    }

    /// Local path behind a `file://` uri, or the uri itself.
    pub fn local_path(&self) -> &str {
        self.uri.strip_prefix("file://").unwrap_or(&self.uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_name_falls_back_to_uri() {
        let file = MaterialFile {
            uri: "file:///tmp/docs/samagri.pdf".into(),
            file_name: None,
            mime_type: None,
            file_size: Some(10),
        };
        assert_eq!(file.upload_name(), "samagri.pdf");
        assert_eq!(file.upload_mime(), PDF_MIME);
        assert_eq!(file.local_path(), "/tmp/docs/samagri.pdf");
    }
}
