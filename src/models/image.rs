use crate::error::{AvatarError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Self-describing image payload stored as a `data:<mime>;base64,<payload>` URL.
///
/// The wrapped string is opaque: it may come back from a collaborator in any
/// shape, so accessors parse lazily and fall back instead of failing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)))
    }

    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    pub fn into_data_url(self) -> String {
        self.0
    }

    /// Media type between `data:` and `;base64`, if both markers are present.
    pub fn media_type(&self) -> Option<&str> {
        let start = self.0.find("data:")? + "data:".len();
        let rest = &self.0[start..];
        let end = rest.find(";base64")?;
        Some(&rest[..end]).filter(|mime| !mime.is_empty())
    }

    pub fn mime_type(&self) -> &str {
        self.media_type().unwrap_or(DEFAULT_MIME_TYPE)
    }

    /// Base64 text after the comma, when the URL has one.
    pub fn payload(&self) -> Option<&str> {
        let marker = self.0.find(";base64,")?;
        Some(&self.0[marker + ";base64,".len()..])
    }

    pub fn decode(&self) -> Result<(String, Vec<u8>)> {
        let mime = self
            .media_type()
            .ok_or_else(|| AvatarError::DecodeError("missing media type".into()))?
            .to_string();
        let payload = self
            .payload()
            .ok_or_else(|| AvatarError::DecodeError("missing base64 payload".into()))?;
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| AvatarError::DecodeError(e.to_string()))?;
        Ok((mime, bytes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Data URLs can be megabytes long, keep Debug output readable.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.media_type())
            .field("len", &self.0.len())
            .finish()
    }
}

/// A file picked by the user, before any validation.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Guess the media type from a file extension, as a file picker would.
    pub fn mime_from_extension(name: &str) -> &'static str {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "heic" => "image/heic",
            "bmp" => "image/bmp",
            _ => "application/octet-stream",
        }
    }
}

// generateContent wire format

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    pub finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_roundtrip() {
        let jpeg = EncodedImage::from_bytes("image/jpeg", &[0xff, 0xd8, 0xff]);
        assert_eq!(jpeg.media_type(), Some("image/jpeg"));
        assert_eq!(jpeg.mime_type(), "image/jpeg");

        let png = EncodedImage::from_bytes("image/png", b"\x89PNG");
        assert_eq!(png.mime_type(), "image/png");
        let (mime, bytes) = png.decode().unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"\x89PNG");
    }

    #[test]
    fn test_unparseable_defaults_to_jpeg() {
        for raw in ["", "not a data url", "data:;base64,AAAA", "data:image/png,AAAA"] {
            let image = EncodedImage::from_data_url(raw);
            assert_eq!(image.media_type(), None, "{raw:?}");
            assert_eq!(image.mime_type(), DEFAULT_MIME_TYPE);
        }
    }

    #[test]
    fn test_decode_rejects_bad_payload() {
        let image = EncodedImage::from_data_url("data:image/png;base64,@@@");
        assert!(matches!(image.decode(), Err(AvatarError::DecodeError(_))));
    }

    #[test]
    fn test_debug_hides_payload() {
        let image = EncodedImage::from_bytes("image/png", &[0u8; 64]);
        let debug = format!("{:?}", image);
        assert!(debug.contains("image/png"));
        assert!(!debug.contains("AAAA"));
    }

    #[test]
    fn test_upload_file_checks() {
        let file = UploadFile::new("me.PNG", UploadFile::mime_from_extension("me.PNG"), vec![1, 2]);
        assert!(file.is_image());
        assert_eq!(file.size(), 2);
        assert!(!UploadFile::new("notes.txt", "text/plain", vec![]).is_image());
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"ho ho"},{"inlineData":{"mimeType":"image/png","data":"iVBO"}}]},"finishReason":"STOP"}]}"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let parts = &response.candidates[0].content.parts;
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].inline_data.as_ref().unwrap().mime_type, "image/png");
    }
}
