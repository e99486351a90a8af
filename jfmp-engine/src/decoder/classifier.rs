//! Hardware vs. software decoder classification
//!
//! Decoder names are the only signal some platforms give. The heuristic is
//! kept behind [`HardwareClassifier`] so a platform-provided flag can replace
//! it without touching the ranking algorithm.

use crate::oracle::DecoderCandidate;

/// Decides whether a decoder candidate runs on dedicated hardware
pub trait HardwareClassifier: Send + Sync {
    fn is_hardware(&self, candidate: &DecoderCandidate) -> bool;
}

/// Name-based classification
#[derive(Debug, Clone, Copy, Default)]
pub struct NameHeuristicClassifier;

const SOFTWARE_TOKENS: &[&str] = &["google", "ffmpeg", "software", "c2.android."];

const HARDWARE_TOKENS: &[&str] = &[
    "qcom", "qti", "exynos", "mtk", "mediatek", "nvidia", "tegra", "hisi", "amlogic",
    "realtek", "broadcom", "intel", "rockchip", "sec.", "imgtec", "allwinner",
];

/// Short tokens only count as whole name segments
const HARDWARE_SEGMENTS: &[&str] = &["rk", "amd", "arm", "hw"];

impl NameHeuristicClassifier {
    fn segments(name: &str) -> impl Iterator<Item = &str> {
        name.split(|c: char| c == '.' || c == '-' || c == '_')
    }
}

impl HardwareClassifier for NameHeuristicClassifier {
    fn is_hardware(&self, candidate: &DecoderCandidate) -> bool {
        let name = candidate.name.to_ascii_lowercase();

        if SOFTWARE_TOKENS.iter().any(|t| name.contains(t))
            || Self::segments(&name).any(|s| s == "sw")
        {
            return false;
        }

        HARDWARE_TOKENS.iter().any(|t| name.contains(t))
            || Self::segments(&name).any(|s| HARDWARE_SEGMENTS.contains(&s))
            || name.starts_with("omx.")
            || name.starts_with("c2.")
    }
}

/// Trusts the platform-reported flag on each candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformFlagClassifier;

impl HardwareClassifier for PlatformFlagClassifier {
    fn is_hardware(&self, candidate: &DecoderCandidate) -> bool {
        candidate.is_hardware_accelerated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hw(name: &str) -> bool {
        NameHeuristicClassifier.is_hardware(&DecoderCandidate::new(name, "video/avc", false))
    }

    #[test]
    fn test_software_names() {
        assert!(!is_hw("OMX.google.h264.decoder"));
        assert!(!is_hw("c2.android.avc.decoder"));
        assert!(!is_hw("ffmpeg-hevc"));
        assert!(!is_hw("c2.exynos.h264.decoder.sw"));
        assert!(!is_hw("libdav1d"));
    }

    #[test]
    fn test_hardware_names() {
        assert!(is_hw("OMX.qcom.video.decoder.avc"));
        assert!(is_hw("c2.qti.hevc.decoder"));
        assert!(is_hw("OMX.MTK.VIDEO.DECODER.HEVC"));
        assert!(is_hw("c2.exynos.hevc.decoder"));
        assert!(is_hw("OMX.Nvidia.h264.decode"));
        assert!(is_hw("rk.video_decoder.avc"));
    }

    #[test]
    fn test_platform_flag() {
        let hw = DecoderCandidate::new("libdav1d", "video/av01", true);
        assert!(PlatformFlagClassifier.is_hardware(&hw));
        assert!(!NameHeuristicClassifier.is_hardware(&hw));
    }
}
