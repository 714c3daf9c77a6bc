//! # Preview Planning
//!
//! Plans the thumbnail of an image from its smallest resolution level. No
//! chunk is read here: the plan says which plane of each channel to load
//! and how to colour it.
//!
//! - Levels whose x or y extent exceeds [`PREVIEW_MAX_EXTENT`] are skipped.
//! - `z` selects the middle plane, `t` and `c` select 0, `x` and `y` are
//!   loaded in full. Each channel then gets its own `c` index.
//! - Colours come from `omero.channels[].color` (hex `RRGGBB`) and
//!   intensity windows from `omero.channels[].window.{start,end}`.
//! - At most [`MAX_PREVIEW_CHANNELS`] channels are planned, and no more
//!   than `omero.channels` describes when it is present.

use serde::Serialize;
use serde_json::Value;

/// Largest x or y extent that is previewed.
pub const PREVIEW_MAX_EXTENT: u64 = 512;

/// Most channels a preview blends.
pub const MAX_PREVIEW_CHANNELS: u64 = 6;

/// Axis order assumed by 0.1 and 0.2, which do not declare axes.
pub const DEFAULT_AXES: [&str; 5] = ["t", "c", "z", "y", "x"];

/// What to load along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSelection {
    Index(u64),
    Full,
}

/// One channel of the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPlane {
    /// Channel index (0 when there is no `c` axis).
    pub channel: u64,
    /// One selection per array dimension.
    pub selection: Vec<AxisSelection>,
    /// `[r, g, b]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<[u8; 3]>,
    /// Intensity window `(start, end)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<(f64, f64)>,
}

/// A planned preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewPlan {
    /// Dataset (resolution level) the preview is read from.
    pub dataset: String,
    pub width: u64,
    pub height: u64,
    pub channels: Vec<ChannelPlane>,
}

/// Why no preview was planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum PreviewSkip {
    /// The level is larger than [`PREVIEW_MAX_EXTENT`] in x or y.
    TooLarge { width: u64, height: u64 },
    /// Axis names and array dimensions disagree.
    AxesMismatch { axes: usize, dims: usize },
    /// The array has fewer than two dimensions or no shape.
    NoPlane,
    /// The array metadata of the level to preview could not be read.
    Unreadable { dataset: String },
}

/// A preview plan or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "preview", rename_all = "snake_case")]
pub enum Preview {
    Planned(PreviewPlan),
    Skipped(PreviewSkip),
}

impl From<Result<PreviewPlan, PreviewSkip>> for Preview {
    fn from(value: Result<PreviewPlan, PreviewSkip>) -> Self {
        match value {
            Ok(plan) => Self::Planned(plan),
            Err(skip) => Self::Skipped(skip),
        }
    }
}

/// Axis names of `multiscales[0]`.
///
/// Strings (0.3) and `{"name": ..}` objects (0.4+) are both accepted. When
/// no axes are declared (0.1, 0.2) the last `ndim` of [`DEFAULT_AXES`] are
/// assumed.
pub fn axis_names(multiscale: &Value, ndim: usize) -> Vec<String> {
    match multiscale.get("axes").and_then(Value::as_array) {
        Some(axes) => axes
            .iter()
            .map(|axis| match axis {
                Value::String(name) => name.clone(),
                other => other
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect(),
        None => DEFAULT_AXES[DEFAULT_AXES.len().saturating_sub(ndim)..]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    }
}

/// Plan the preview of dataset `dataset` with array `shape`.
///
/// `channels` is `omero.channels`, when present.
pub fn plan_preview(
    dataset: &str,
    axes: &[String],
    shape: &[u64],
    channels: Option<&[Value]>,
) -> Result<PreviewPlan, PreviewSkip> {
    if shape.len() < 2 {
        return Err(PreviewSkip::NoPlane);
    }
    if axes.len() != shape.len() {
        return Err(PreviewSkip::AxesMismatch {
            axes: axes.len(),
            dims: shape.len(),
        });
    }

    let index_of = |name: &str| axes.iter().position(|a| a == name);
    let ndim = shape.len();
    let width = shape[index_of("x").unwrap_or(ndim - 1)];
    let height = shape[index_of("y").unwrap_or(ndim - 2)];
    if width > PREVIEW_MAX_EXTENT || height > PREVIEW_MAX_EXTENT {
        return Err(PreviewSkip::TooLarge { width, height });
    }

    let base = default_selection(axes, shape);
    let channel_axis = index_of("c");
    let size_c = channel_axis.map(|i| shape[i]).unwrap_or(1).max(1);
    let described = channels
        .map(|chs| chs.len() as u64)
        .filter(|&n| n > 0)
        .unwrap_or(MAX_PREVIEW_CHANNELS);
    let planned = size_c.min(described).min(MAX_PREVIEW_CHANNELS);

    let planes = (0..planned)
        .map(|c| {
            let mut selection = base.clone();
            if let Some(i) = channel_axis {
                selection[i] = AxisSelection::Index(c);
            }
            let meta = usize::try_from(c)
                .ok()
                .and_then(|c| channels.and_then(|chs| chs.get(c)));
            ChannelPlane {
                channel: c,
                selection,
                color: meta
                    .and_then(|m| m.get("color"))
                    .and_then(Value::as_str)
                    .and_then(hex_to_rgb),
                window: meta.and_then(|m| m.get("window")).and_then(window_of),
            }
        })
        .collect();

    Ok(PreviewPlan {
        dataset: dataset.to_string(),
        width,
        height,
        channels: planes,
    })
}

fn default_selection(axes: &[String], shape: &[u64]) -> Vec<AxisSelection> {
    axes.iter()
        .zip(shape)
        .map(|(axis, &size)| match axis.as_str() {
            "z" => AxisSelection::Index(size / 2),
            "x" | "y" => AxisSelection::Full,
            _ => AxisSelection::Index(0),
        })
        .collect()
}

/// `"FF8000"` to `[255, 128, 0]`. A leading `#` is tolerated.
pub fn hex_to_rgb(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let mut rgb = [0u8; 3];
    for (i, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(rgb)
}

fn window_of(window: &Value) -> Option<(f64, f64)> {
    Some((
        window.get("start")?.as_f64()?,
        window.get("end")?.as_f64()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(axes: &[&str]) -> Vec<String> {
        axes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tczyx_selects_mid_z_and_one_plane_per_channel() {
        let axes = names(&["t", "c", "z", "y", "x"]);
        let channels = vec![
            json!({"color": "FF0000", "window": {"start": 0, "end": 255}}),
            json!({"color": "00FF00", "window": {"start": 10.5, "end": 900}}),
        ];
        let plan = plan_preview("2", &axes, &[3, 2, 9, 128, 256], Some(&channels)).unwrap();

        assert_eq!((plan.width, plan.height), (256, 128));
        assert_eq!(plan.dataset, "2");
        assert_eq!(plan.channels.len(), 2);
        use AxisSelection::{Full, Index};
        assert_eq!(plan.channels[0].selection, vec![Index(0), Index(0), Index(4), Full, Full]);
        assert_eq!(plan.channels[1].selection, vec![Index(0), Index(1), Index(4), Full, Full]);
        assert_eq!(plan.channels[0].color, Some([255, 0, 0]));
        assert_eq!(plan.channels[1].window, Some((10.5, 900.0)));
    }

    #[test]
    fn large_levels_are_skipped() {
        let axes = names(&["y", "x"]);
        assert_eq!(
            plan_preview("0", &axes, &[600, 100], None),
            Err(PreviewSkip::TooLarge { width: 100, height: 600 })
        );
        assert!(plan_preview("0", &axes, &[512, 512], None).is_ok());
    }

    #[test]
    fn no_channel_axis_gives_one_plane() {
        let axes = names(&["z", "y", "x"]);
        let plan = plan_preview("0", &axes, &[1, 64, 64], None).unwrap();
        assert_eq!(plan.channels.len(), 1);
        assert_eq!(plan.channels[0].selection[0], AxisSelection::Index(0));
        assert_eq!(plan.channels[0].color, None);
    }

    #[test]
    fn channel_count_is_capped() {
        let axes = names(&["c", "y", "x"]);
        let plan = plan_preview("0", &axes, &[1_000_000, 8, 8], None).unwrap();
        assert_eq!(plan.channels.len() as u64, MAX_PREVIEW_CHANNELS);

        let described = vec![json!({"color": "FF0000"}), json!({"color": "0000FF"})];
        let plan = plan_preview("0", &axes, &[50, 8, 8], Some(&described)).unwrap();
        assert_eq!(plan.channels.len(), 2);
        assert_eq!(plan.channels[1].selection[0], AxisSelection::Index(1));
    }

    #[test]
    fn mismatched_axes_are_skipped() {
        let axes = names(&["y", "x"]);
        assert_eq!(
            plan_preview("0", &axes, &[1, 64, 64], None),
            Err(PreviewSkip::AxesMismatch { axes: 2, dims: 3 })
        );
    }

    #[test]
    fn axis_names_across_versions() {
        let v03 = json!({"axes": ["c", "y", "x"]});
        assert_eq!(axis_names(&v03, 3), names(&["c", "y", "x"]));

        let v04 = json!({"axes": [{"name": "z", "type": "space"}, {"name": "y"}, {"name": "x"}]});
        assert_eq!(axis_names(&v04, 3), names(&["z", "y", "x"]));

        let v01 = json!({"datasets": []});
        assert_eq!(axis_names(&v01, 5), names(&DEFAULT_AXES));
        assert_eq!(axis_names(&v01, 2), names(&["y", "x"]));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(hex_to_rgb("FF8000"), Some([255, 128, 0]));
        assert_eq!(hex_to_rgb("#0000ff"), Some([0, 0, 255]));
        assert_eq!(hex_to_rgb("FFF"), None);
        assert_eq!(hex_to_rgb("GG0000"), None);
    }
}
