use serde::{Deserialize, Serialize};

/// Layout hint for a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AspectRatio {
    /// 16:9
    #[default]
    Widescreen,
    /// 9:16
    Vertical,
}

impl AspectRatio {
    /// Height divided by width.
    pub fn height_factor(&self) -> f32 {
        match self {
            AspectRatio::Widescreen => 9.0 / 16.0,
            AspectRatio::Vertical => 16.0 / 9.0,
        }
    }
}

/// Immutable configuration of one viewport, supplied by the page layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportProps {
    pub source: String,
    pub title: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    /// Show reels loop; everything else plays once and stops.
    #[serde(default)]
    pub is_showreel: bool,
}

impl ViewportProps {
    pub fn new(source: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            aspect_ratio: AspectRatio::Widescreen,
            is_showreel: false,
        }
    }

    pub fn vertical(mut self) -> Self {
        self.aspect_ratio = AspectRatio::Vertical;
        self
    }

    pub fn showreel(mut self) -> Self {
        self.is_showreel = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_defaults_to_widescreen() {
        assert_eq!(AspectRatio::default(), AspectRatio::Widescreen);
        assert!((AspectRatio::Widescreen.height_factor() - 0.5625).abs() < 1e-6);
        assert!(AspectRatio::Vertical.height_factor() > 1.0);
    }

    #[test]
    fn props_deserialize_with_defaults() {
        let props: ViewportProps =
            serde_json::from_str(r#"{"source":"a.mp4","title":"PROJECT 01"}"#).unwrap();
        assert_eq!(props.source, "a.mp4");
        assert_eq!(props.aspect_ratio, AspectRatio::Widescreen);
        assert!(!props.is_showreel);
    }

    #[test]
    fn aspect_serializes_lowercase() {
        let props = ViewportProps::new("b.mp4", "SOCIAL 01").vertical();
        let json = serde_json::to_string(&props).unwrap();
        assert!(json.contains("\"vertical\""));
    }

    #[test]
    fn builders_set_flags() {
        let props = ViewportProps::new("reel.mp4", "SHOW REEL").showreel();
        assert!(props.is_showreel);
        assert_eq!(props.aspect_ratio, AspectRatio::Widescreen);
    }
}
