use std::fmt;

use super::error::ProbeError;

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;
const TOLERANCE: f64 = 0.01;

/// Coarse aspect-ratio class of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectLabel {
    SixteenByNine,
    NineBySixteen,
    Other,
}

impl AspectLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectLabel::SixteenByNine => "16:9",
            AspectLabel::NineBySixteen => "9:16",
            AspectLabel::Other => "other",
        }
    }

    /// Directory prefix used for the stored object key.
    pub fn storage_prefix(&self) -> &'static str {
        match self {
            AspectLabel::SixteenByNine => "landscape",
            AspectLabel::NineBySixteen => "portrait",
            AspectLabel::Other => "other",
        }
    }
}

impl fmt::Display for AspectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a width/height ratio. Both bands are open intervals.
pub fn classify_ratio(ratio: f64) -> AspectLabel {
    if LANDSCAPE_RATIO * (1.0 - TOLERANCE) < ratio && ratio < LANDSCAPE_RATIO * (1.0 + TOLERANCE) {
        AspectLabel::SixteenByNine
    } else if PORTRAIT_RATIO * (1.0 - TOLERANCE) < ratio
        && ratio < PORTRAIT_RATIO * (1.0 + TOLERANCE)
    {
        AspectLabel::NineBySixteen
    } else {
        AspectLabel::Other
    }
}

pub fn classify(width: u32, height: u32) -> Result<AspectLabel, ProbeError> {
    if width == 0 || height == 0 {
        return Err(ProbeError::DegenerateDimensions { width, height });
    }
    Ok(classify_ratio(f64::from(width) / f64::from(height)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_resolutions() {
        assert_eq!(classify(1920, 1080).unwrap(), AspectLabel::SixteenByNine);
        assert_eq!(classify(1280, 720).unwrap(), AspectLabel::SixteenByNine);
        assert_eq!(classify(1080, 1920).unwrap(), AspectLabel::NineBySixteen);
        assert_eq!(classify(720, 1280).unwrap(), AspectLabel::NineBySixteen);
        assert_eq!(classify(1000, 1000).unwrap(), AspectLabel::Other);
        assert_eq!(classify(640, 480).unwrap(), AspectLabel::Other);
    }

    #[test]
    fn near_miss_resolutions_still_classify() {
        // 854x480 is the usual "480p widescreen", 0.06% off 16:9
        assert_eq!(classify(854, 480).unwrap(), AspectLabel::SixteenByNine);
        assert_eq!(classify(480, 854).unwrap(), AspectLabel::NineBySixteen);
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            classify(1920, 0),
            Err(ProbeError::DegenerateDimensions {
                width: 1920,
                height: 0
            })
        ));
        assert!(matches!(
            classify(0, 1080),
            Err(ProbeError::DegenerateDimensions { width: 0, .. })
        ));
        assert!(classify(0, 0).is_err());
    }

    #[test]
    fn band_edges_are_exclusive() {
        assert_eq!(
            classify_ratio(LANDSCAPE_RATIO * (1.0 + TOLERANCE)),
            AspectLabel::Other
        );
        assert_eq!(
            classify_ratio(LANDSCAPE_RATIO * (1.0 - TOLERANCE)),
            AspectLabel::Other
        );
        assert_eq!(
            classify_ratio(PORTRAIT_RATIO * (1.0 + TOLERANCE)),
            AspectLabel::Other
        );
        assert_eq!(
            classify_ratio(PORTRAIT_RATIO * (1.0 - TOLERANCE)),
            AspectLabel::Other
        );
    }

    #[test]
    fn sweep_matches_band_definition() {
        let mut ratio = 0.1;
        while ratio < 4.0 {
            let expected = if (ratio / LANDSCAPE_RATIO - 1.0).abs() < 0.0099 {
                Some(AspectLabel::SixteenByNine)
            } else if (ratio / PORTRAIT_RATIO - 1.0).abs() < 0.0099 {
                Some(AspectLabel::NineBySixteen)
            } else if (ratio / LANDSCAPE_RATIO - 1.0).abs() > 0.0101
                && (ratio / PORTRAIT_RATIO - 1.0).abs() > 0.0101
            {
                Some(AspectLabel::Other)
            } else {
                // too close to a band edge for the check above to be exact
                None
            };
            if let Some(expected) = expected {
                assert_eq!(classify_ratio(ratio), expected, "ratio {}", ratio);
            }
            ratio += 0.001;
        }
    }

    #[test]
    fn labels_map_to_prefixes() {
        assert_eq!(AspectLabel::SixteenByNine.storage_prefix(), "landscape");
        assert_eq!(AspectLabel::NineBySixteen.storage_prefix(), "portrait");
        assert_eq!(AspectLabel::Other.storage_prefix(), "other");
        assert_eq!(AspectLabel::SixteenByNine.to_string(), "16:9");
        assert_eq!(AspectLabel::NineBySixteen.to_string(), "9:16");
        assert_eq!(AspectLabel::Other.to_string(), "other");
    }
}
