//! Gallery Model

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Maximum number of photos (cover included) a gallery may hold
pub const MAX_PHOTOS_PER_GALLERY: usize = 40;

/// Gallery identifier
///
/// New galleries get millisecond timestamps. Ids that do not read as an
/// integer are kept verbatim and compared by their text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GalleryId {
    Num(i64),
    Other(String),
}

impl GalleryId {
    /// Id given in a URL path
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse() {
            Ok(n) => Self::Num(n),
            Err(_) => Self::Other(raw.to_string()),
        }
    }

    /// Id given in a JSON document; `None` for null, empty strings and
    /// composite values
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .map(Self::Num),
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(Self::parse(s)),
            Value::Bool(b) => Some(Self::Other(b.to_string())),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<i64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for GalleryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

impl From<i64> for GalleryId {
    fn from(n: i64) -> Self {
        Self::Num(n)
    }
}

impl From<GalleryId> for Value {
    fn from(id: GalleryId) -> Self {
        match id {
            GalleryId::Num(n) => Value::from(n),
            GalleryId::Other(s) => Value::String(s),
        }
    }
}

impl Serialize for GalleryId {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Num(n) => s.serialize_i64(*n),
            Self::Other(id) => s.serialize_str(id),
        }
    }
}

impl<'de> Deserialize<'de> for GalleryId {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(d)?;
        Self::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid gallery id: {value}")))
    }
}

/// Photo gallery for one edition of the fair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryRecord {
    pub id: GalleryId,
    /// Year label, e.g. "2024"
    pub ano: String,
    /// Cover image path
    pub imagem: String,
    /// Photo paths in append order, cover included
    pub fotos: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GalleryRecord {
    pub fn new(id: i64, ano: impl Into<String>, cover: impl Into<String>) -> Self {
        let cover = cover.into();
        Self {
            id: GalleryId::Num(id),
            ano: ano.into(),
            fotos: vec![cover.clone()],
            imagem: cover,
            extra: Map::new(),
        }
    }

    /// Whether `path` is the cover or one of the photos
    pub fn references(&self, path: &str) -> bool {
        self.imagem == path || self.fotos.iter().any(|f| f == path)
    }
}

/// Gallery as found on disk
///
/// Records written by older versions may lack `id` or `fotos`. An `id` that
/// is present but not numeric is kept as [`GalleryId::Other`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredGallery {
    #[serde(deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<GalleryId>,
    #[serde(deserialize_with = "lenient_label", skip_serializing_if = "Option::is_none")]
    pub ano: Option<String>,
    #[serde(deserialize_with = "lenient_label", skip_serializing_if = "Option::is_none")]
    pub imagem: Option<String>,
    #[serde(deserialize_with = "lenient_paths", skip_serializing_if = "Option::is_none")]
    pub fotos: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<GalleryRecord> for StoredGallery {
    fn from(record: GalleryRecord) -> Self {
        Self {
            id: Some(record.id),
            ano: Some(record.ano),
            imagem: Some(record.imagem),
            fotos: Some(record.fotos),
            extra: record.extra,
        }
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<GalleryId>, D::Error> {
    Ok(GalleryId::from_value(&Value::deserialize(d)?))
}

fn lenient_label<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_paths<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_includes_cover_in_fotos() {
        let g = GalleryRecord::new(1, "2024", "/uploads/cover.jpg");
        assert_eq!(g.imagem, "/uploads/cover.jpg");
        assert_eq!(g.fotos, vec!["/uploads/cover.jpg"]);
        assert!(g.references("/uploads/cover.jpg"));
        assert!(!g.references("/uploads/other.jpg"));
    }

    #[test]
    fn test_stored_gallery_legacy_shapes() {
        let stored: Vec<StoredGallery> = serde_json::from_value(json!([
            {"ano": 2019, "imagem": "/uploads/a.jpg"},
            {"id": "1700000000000", "ano": "2020", "fotos": null},
            {"id": 5, "ano": "2021", "imagem": "/uploads/c.jpg", "fotos": ["/uploads/c.jpg"], "titulo": "x"}
        ]))
        .unwrap();

        assert_eq!(stored[0].id, None);
        assert_eq!(stored[0].ano.as_deref(), Some("2019"));
        assert_eq!(stored[0].fotos, None);
        assert_eq!(stored[1].id, Some(GalleryId::Num(1_700_000_000_000)));
        assert_eq!(stored[1].fotos, None);
        assert_eq!(stored[2].extra["titulo"], "x");
    }

    #[test]
    fn test_record_serializes_flat() {
        let mut g = GalleryRecord::new(7, "2024", "/uploads/c.jpg");
        g.extra.insert("titulo".into(), json!("Edição"));
        let value = serde_json::to_value(&g).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "ano": "2024",
                "imagem": "/uploads/c.jpg",
                "fotos": ["/uploads/c.jpg"],
                "titulo": "Edição"
            })
        );
    }

    #[test]
    fn test_gallery_id_from_value() {
        assert_eq!(GalleryId::from_value(&json!(42)), Some(GalleryId::Num(42)));
        assert_eq!(GalleryId::from_value(&json!(" 42 ")), Some(GalleryId::Num(42)));
        assert_eq!(
            GalleryId::from_value(&json!("legacy-a")),
            Some(GalleryId::Other("legacy-a".into()))
        );
        assert_eq!(GalleryId::from_value(&json!("")), None);
        assert_eq!(GalleryId::from_value(&json!(null)), None);
        assert_eq!(GalleryId::parse("abc"), GalleryId::Other("abc".into()));
        assert_eq!(GalleryId::parse("7").to_string(), "7");
    }

    #[test]
    fn test_foreign_id_round_trips() {
        let stored: StoredGallery =
            serde_json::from_value(json!({"id": "legacy-a", "ano": "2018", "fotos": []})).unwrap();
        assert_eq!(stored.id, Some(GalleryId::Other("legacy-a".into())));
        assert_eq!(serde_json::to_value(&stored).unwrap()["id"], "legacy-a");
    }
}
