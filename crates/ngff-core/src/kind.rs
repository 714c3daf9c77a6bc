//! # Object Kinds
//!
//! An NGFF group is recognised by the structural keys present in its
//! effective attributes. The classifier reports every key it finds, in a
//! fixed priority order, so that callers never depend on map iteration
//! order:
//!
//! | Priority | Key           | Kind    | Schema  |
//! |----------|---------------|---------|---------|
//! | 1        | `multiscales` | Image   | `image` |
//! | 2        | `plate`       | Plate   | `plate` |
//! | 3        | `well`        | Well    | `well`  |
//! | 4        | `image-label` | Label   | `label` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What an NGFF attributes object describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A multiscale image pyramid.
    Image,
    /// A high-content-screening plate.
    Plate,
    /// A single well of a plate.
    Well,
    /// A label (segmentation) image.
    Label,
}

impl ObjectKind {
    /// All kinds, in classification priority order.
    pub const ALL: [ObjectKind; 4] = [Self::Image, Self::Plate, Self::Well, Self::Label];

    /// The attributes key whose presence identifies this kind.
    pub fn key(self) -> &'static str {
        match self {
            Self::Image => "multiscales",
            Self::Plate => "plate",
            Self::Well => "well",
            Self::Label => "image-label",
        }
    }

    /// The schema document that validates this kind.
    pub fn schema_kind(self) -> SchemaKind {
        match self {
            Self::Image => SchemaKind::Image,
            Self::Plate => SchemaKind::Plate,
            Self::Well => SchemaKind::Well,
            Self::Label => SchemaKind::Label,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image => write!(f, "Image"),
            Self::Plate => write!(f, "Plate"),
            Self::Well => write!(f, "Well"),
            Self::Label => write!(f, "Label"),
        }
    }
}

/// A primary schema document published for every spec version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// `image.schema`
    Image,
    /// `plate.schema`
    Plate,
    /// `well.schema`
    Well,
    /// `label.schema`
    Label,
}

impl SchemaKind {
    /// File stem of the schema document, as used in schema URLs.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Plate => "plate",
            Self::Well => "well",
            Self::Label => "label",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "plate" => Ok(Self::Plate),
            "well" => Ok(Self::Well),
            "label" | "image-label" => Ok(Self::Label),
            other => Err(format!(
                "unknown schema kind '{other}' (expected image, plate, well or label)"
            )),
        }
    }
}

/// Every object kind present in `effective`, in priority order.
///
/// Returns an empty vector for non-objects and for objects with none of
/// the structural keys.
pub fn classify(effective: &Value) -> Vec<ObjectKind> {
    let Some(map) = effective.as_object() else {
        return Vec::new();
    };
    ObjectKind::ALL
        .into_iter()
        .filter(|kind| map.contains_key(kind.key()))
        .collect()
}

/// The highest-priority kind present in `effective`.
pub fn primary_kind(effective: &Value) -> Option<ObjectKind> {
    let map = effective.as_object()?;
    ObjectKind::ALL
        .into_iter()
        .find(|kind| map.contains_key(kind.key()))
}
