//! Hardware target selection and decomposition profile mapping.

use std::fmt;

/// Backend a compiled artifact is destined for.
///
/// Target resolution is total: an unrecognized or absent selector falls back
/// to the default target instead of erroring, so callers never see a failure
/// from this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HardwareTarget {
    /// Default target.
    #[default]
    Rigetti,
    /// Selected by the exact header value `quantinuum`.
    Quantinuum,
}

impl HardwareTarget {
    /// Resolve a target from the `x-hardware-target` request header.
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some("quantinuum") => Self::Quantinuum,
            _ => Self::Rigetti,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rigetti => "rigetti",
            Self::Quantinuum => "quantinuum",
        }
    }

    /// Name of the decomposition profile bundled for this target.
    pub fn profile_file_name(&self) -> &'static str {
        match self {
            Self::Rigetti => "decomp_b340.ll",
            Self::Quantinuum => "decomp_7ee0.ll",
        }
    }
}

impl fmt::Display for HardwareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantinuum_header_selects_alternate_target() {
        assert_eq!(
            HardwareTarget::from_header(Some("quantinuum")),
            HardwareTarget::Quantinuum
        );
    }

    #[test]
    fn absent_header_selects_default() {
        assert_eq!(HardwareTarget::from_header(None), HardwareTarget::Rigetti);
    }

    #[test]
    fn unrecognized_header_selects_default() {
        for value in ["ionq", "QUANTINUUM", "Quantinuum", "", " quantinuum"] {
            assert_eq!(
                HardwareTarget::from_header(Some(value)),
                HardwareTarget::Rigetti,
                "value {value:?} must fall back to the default target"
            );
        }
    }

    #[test]
    fn profile_names_are_distinct() {
        assert_eq!(HardwareTarget::Rigetti.profile_file_name(), "decomp_b340.ll");
        assert_eq!(
            HardwareTarget::Quantinuum.profile_file_name(),
            "decomp_7ee0.ll"
        );
    }
}
