//! Named colour schemes shared by the chart generators and the vector renderer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Default,
    Blue,
    Purple,
    Gradient,
    Professional,
}

impl ColorScheme {
    pub fn colors(&self) -> &'static [&'static str; 6] {
        match self {
            ColorScheme::Default => &[
                "#3B82F6", "#8B5CF6", "#EC4899", "#10B981", "#F59E0B", "#EF4444",
            ],
            ColorScheme::Blue => &[
                "#1E40AF", "#3B82F6", "#60A5FA", "#93C5FD", "#BFDBFE", "#DBEAFE",
            ],
            ColorScheme::Purple => &[
                "#6B21A8", "#8B5CF6", "#A78BFA", "#C4B5FD", "#DDD6FE", "#EDE9FE",
            ],
            ColorScheme::Gradient => &[
                "#667EEA", "#764BA2", "#F093FB", "#4FACFE", "#00F2FE", "#43E97B",
            ],
            ColorScheme::Professional => &[
                "#1F2937", "#374151", "#4B5563", "#6B7280", "#9CA3AF", "#D1D5DB",
            ],
        }
    }

    /// Owned copy, for embedding in a chart spec.
    pub fn to_vec(&self) -> Vec<String> {
        self.colors().iter().map(|c| c.to_string()).collect()
    }

    /// Colour for series index `i`, cycling through the scheme.
    pub fn cycle(&self, i: usize) -> &'static str {
        let colors = self.colors();
        colors[i % colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_after_six() {
        let scheme = ColorScheme::Default;
        assert_eq!(scheme.cycle(0), "#3B82F6");
        assert_eq!(scheme.cycle(6), "#3B82F6");
        assert_eq!(scheme.cycle(11), "#EF4444");
    }

    #[test]
    fn test_scheme_deserializes_lowercase() {
        let scheme: ColorScheme = serde_json::from_str(r#""gradient""#).unwrap();
        assert_eq!(scheme, ColorScheme::Gradient);
        assert_eq!(scheme.to_vec()[0], "#667EEA");
    }
}
