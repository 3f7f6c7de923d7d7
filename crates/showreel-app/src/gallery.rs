//! Page content: the portfolio catalog and the static decoration tables.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::viewport::ViewportProps;

const SHOWREEL_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

const FEATURED_URLS: &[&str] = &[
    "https://ia600904.us.archive.org/35/items/portfolio_202508/Outworking%20everyone%20isn%E2%80%99t%20that%20hard%20v1.mp4",
    "https://ia600904.us.archive.org/35/items/portfolio_202508/What%20is%20the%20most%20normal%20episode%20of%20Family%20Guy%20v3.mp4",
    "https://ia600904.us.archive.org/35/items/portfolio_202508/Never%20running%20out%20of%20things%20to%20say%20is%20easy%2C%20actually%20isn%27t%C2%A0that%C2%A0hard%20v1.mp4",
    "https://ia600904.us.archive.org/35/items/portfolio_202508/sample1_V1.mp4",
    "https://ia600904.us.archive.org/35/items/portfolio_202508/The%20entire%20history%20of%20Thomas%20Shelby%20v2_1.mp4",
    "https://ia600904.us.archive.org/35/items/portfolio_202508/WOLF%27S%20LAIR%20WHAT%20AI%20FOUND%20IN%20THIS%20HIDDEN%20NAZI%20BUNKER%20FROM%20WORLD%20WAR%20II%20IS%20TERRIFYING.mp4",
    "https://ia800906.us.archive.org/16/items/flirting-with-women-isnt-that-hard-v-1/Flirting%20with%20women%20isn%27t%20that%20hard%20v1.mp4",
    "https://ia600904.us.archive.org/35/items/portfolio_202508/Young%20Actresses%20Who%20Tragically%20Passed%20Away.mp4",
    "https://ia601002.us.archive.org/33/items/sample-1-1/sample1%20%281%29.mp4",
];

const SOCIAL_URLS: &[&str] = &[
    "https://ia801704.us.archive.org/11/items/inkuuuu/inkuuuu.mp4",
    "https://ia600902.us.archive.org/33/items/part-1-shorts/Inklwell%20media%20reel%201%20v3.mp4",
    "https://ia801002.us.archive.org/18/items/shorts-2-part/Mj%20real_2.mp4",
    "https://ia801007.us.archive.org/2/items/inkwell-media-video-1-v-2/inkwell%20media%20video%201%20v2.mp4",
    "https://ia800902.us.archive.org/33/items/part-1-shorts/Inkwell%20media%20v2%20FINAL.mp4",
    "https://ia600902.us.archive.org/33/items/part-1-shorts/Inkwell%20Media%20ki%20videooo.mp4",
    "https://ia801002.us.archive.org/18/items/shorts-2-part/mj%20realtyyyyy2.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/SubaruOutbackOnStreetAndDirt.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/VolkswagenGTIReview.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/WeAreGoingOnBullrun.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/WhatCarCanYouGetForAGrand.mp4",
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerEscapes.mp4",
];

/// Floating testimonial badge in the page header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Badge {
    pub label: &'static str,
    /// Position as a fraction of the header size.
    pub top: f32,
    pub left: f32,
    pub delay_secs: f32,
    pub shine_delay_secs: f32,
    pub shine_duration_secs: f32,
    pub scale: f32,
}

const fn badge(label: &'static str, top: f32, left: f32, delay: f32, shine_delay: f32, shine_duration: f32, scale: f32) -> Badge {
    Badge {
        label,
        top,
        left,
        delay_secs: delay,
        shine_delay_secs: shine_delay,
        shine_duration_secs: shine_duration,
        scale,
    }
}

pub const TESTIMONIAL_BADGES: &[Badge] = &[
    badge("1", 0.30, 0.24, 1.5, 1.3, 14.0, 1.0),
    badge("2", 0.10, 0.70, 2.8, 0.2, 12.0, 0.8),
    badge("3", 0.50, 0.29, 1.1, 1.7, 15.0, 0.9),
    badge("4", 0.25, 0.77, 3.4, 0.1, 13.0, 0.7),
    badge("5", 0.25, 0.10, 2.7, 1.9, 16.0, 1.1),
    badge("6", 0.42, 0.74, 1.0, 0.8, 12.0, 0.8),
    badge("7", 0.10, 0.17, 3.3, 1.5, 14.0, 0.9),
    badge("8", 0.42, 0.13, 2.6, 0.2, 13.0, 0.6),
    badge("9", 0.50, 0.58, 1.9, 1.7, 15.0, 0.9),
    badge("10", 0.30, 0.63, 3.2, 0.1, 16.0, 0.8),
];

impl Badge {
    /// Opacity at `elapsed` seconds after page start: hidden until `delay`, then a 0.8s fade.
    pub fn opacity(&self, elapsed: f32) -> f32 {
        ((elapsed - self.delay_secs) / 0.8).clamp(0.0, 1.0)
    }

    /// Shine sweep position in `[0, 1)`, repeating every `shine_duration_secs`.
    pub fn shine_phase(&self, elapsed: f32) -> f32 {
        let t = elapsed - self.shine_delay_secs;
        if t <= 0.0 || self.shine_duration_secs <= 0.0 {
            return 0.0;
        }
        (t / self.shine_duration_secs).fract()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactLink {
    pub label: &'static str,
    pub href: &'static str,
    pub blurb: &'static str,
}

pub const CONTACT_HEADING: &str = "LET'S START A CONVERSATION";
pub const CONTACT_SUBHEADING: &str = "Drop me a message, let's make something users will love.";

pub const CONTACT_LINKS: &[ContactLink] = &[
    ContactLink {
        label: "BROSKIAGENCY@GMAIL.COM",
        href: "https://mail.google.com/mail/?view=cm&to=broskiagency@gmail.com",
        blurb: "Let's create something that actually works.",
    },
    ContactLink {
        label: "LINKEDIN",
        href: "https://www.linkedin.com/in/aamir-naqvi/",
        blurb: "See how UX meets business - connect with me.",
    },
    ContactLink {
        label: "INSTAGRAM",
        href: "https://www.instagram.com/aamir.naqvii/",
        blurb: "Tap in for visuals with purpose. - follow the flow.",
    },
];

/// One headed grid of tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    /// Columns on a wide window; narrow windows use fewer.
    pub columns: usize,
    pub entries: Vec<ViewportProps>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub title: String,
    pub tagline: String,
    pub sections: Vec<Section>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let showreel = Section {
            heading: "SHOW REEL".to_string(),
            columns: 1,
            entries: vec![ViewportProps::new(SHOWREEL_URL, "SHOW REEL").showreel()],
        };
        let featured = Section {
            heading: "FEATURED WORK".to_string(),
            columns: 3,
            entries: FEATURED_URLS
                .iter()
                .enumerate()
                .map(|(i, url)| ViewportProps::new(*url, numbered_title("PROJECT", i)))
                .collect(),
        };
        let social = Section {
            heading: "SOCIAL CONTENT".to_string(),
            columns: 4,
            entries: SOCIAL_URLS
                .iter()
                .enumerate()
                .map(|(i, url)| ViewportProps::new(*url, numbered_title("SOCIAL", i)).vertical())
                .collect(),
        };

        Self {
            title: "PORTFOLIO".to_string(),
            tagline: "Visual stories that shape brands and captivate audiences worldwide".to_string(),
            sections: vec![showreel, featured, social],
        }
    }

    /// Load a catalog override from JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let catalog: Catalog = serde_json::from_str(&json)
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            bail!("catalog has no sections");
        }
        for section in &self.sections {
            if section.columns == 0 {
                bail!("section \"{}\" has zero columns", section.heading);
            }
            if let Some(entry) = section.entries.iter().find(|e| e.source.trim().is_empty()) {
                bail!(
                    "entry \"{}\" in section \"{}\" has an empty source",
                    entry.title,
                    section.heading
                );
            }
        }
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }
}

/// `PROJECT 01`, `PROJECT 02`, ...
pub fn numbered_title(prefix: &str, index: usize) -> String {
    format!("{prefix} {:02}", index + 1)
}

/// Column count for a section at the given content width.
pub fn columns_for_width(preferred: usize, width: f32) -> usize {
    let cap = if width < 640.0 {
        2
    } else if width < 768.0 {
        3
    } else {
        preferred
    };
    preferred.min(cap).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::AspectRatio;

    #[test]
    fn builtin_catalog_matches_page_layout() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.sections.len(), 3);
        assert_eq!(catalog.entry_count(), 1 + 9 + 12);
        catalog.validate().unwrap();

        let reel = &catalog.sections[0].entries[0];
        assert!(reel.is_showreel);
        assert_eq!(reel.title, "SHOW REEL");

        let featured = &catalog.sections[1];
        assert_eq!(featured.entries[0].title, "PROJECT 01");
        assert_eq!(featured.entries[8].title, "PROJECT 09");
        assert!(featured.entries.iter().all(|e| !e.is_showreel));
        assert!(featured.entries.iter().all(|e| e.aspect_ratio == AspectRatio::Widescreen));

        let social = &catalog.sections[2];
        assert_eq!(social.entries[11].title, "SOCIAL 12");
        assert!(social.entries.iter().all(|e| e.aspect_ratio == AspectRatio::Vertical));
    }

    #[test]
    fn numbered_titles_are_zero_padded() {
        assert_eq!(numbered_title("PROJECT", 0), "PROJECT 01");
        assert_eq!(numbered_title("SOCIAL", 9), "SOCIAL 10");
    }

    #[test]
    fn columns_collapse_on_narrow_windows() {
        assert_eq!(columns_for_width(3, 1200.0), 3);
        assert_eq!(columns_for_width(4, 700.0), 3);
        assert_eq!(columns_for_width(3, 400.0), 2);
        assert_eq!(columns_for_width(1, 400.0), 1);
        assert_eq!(columns_for_width(0, 1200.0), 1);
    }

    #[test]
    fn load_catalog_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let json = r#"{
            "title": "REEL",
            "tagline": "",
            "sections": [{
                "heading": "CLIPS",
                "columns": 2,
                "entries": [
                    {"source": "a.mp4", "title": "A"},
                    {"source": "b.mp4", "title": "B", "aspect_ratio": "vertical", "is_showreel": true}
                ]
            }]
        }"#;
        std::fs::write(&path, json).unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.entry_count(), 2);
        assert_eq!(catalog.sections[0].entries[1].aspect_ratio, AspectRatio::Vertical);
        assert!(catalog.sections[0].entries[1].is_showreel);
    }

    #[test]
    fn load_rejects_invalid_catalogs() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(Catalog::load(&missing).is_err());

        let garbage = dir.path().join("garbage.json");
        std::fs::write(&garbage, "{").unwrap();
        let err = Catalog::load(&garbage).unwrap_err();
        assert!(format!("{err:#}").contains("parsing catalog"));

        let empty_source = dir.path().join("empty.json");
        std::fs::write(
            &empty_source,
            r#"{"title":"","tagline":"","sections":[{"heading":"X","columns":1,"entries":[{"source":" ","title":"T"}]}]}"#,
        )
        .unwrap();
        assert!(Catalog::load(&empty_source).is_err());
    }

    #[test]
    fn badges_fade_in_after_delay() {
        let b = TESTIMONIAL_BADGES[0];
        assert_eq!(b.opacity(0.0), 0.0);
        assert_eq!(b.opacity(b.delay_secs + 10.0), 1.0);
        assert_eq!(b.shine_phase(0.0), 0.0);
        let phase = b.shine_phase(b.shine_delay_secs + b.shine_duration_secs * 1.5);
        assert!((phase - 0.5).abs() < 1e-4);
    }

    #[test]
    fn static_tables_are_populated() {
        assert_eq!(TESTIMONIAL_BADGES.len(), 10);
        assert_eq!(CONTACT_LINKS.len(), 3);
        assert!(CONTACT_LINKS.iter().all(|l| l.href.starts_with("https://")));
    }
}
