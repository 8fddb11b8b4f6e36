use crate::report::Reporter;

/// Requested rendering for list and get output. A closed set: the remote
/// renderers understand exactly these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    List,
    Dict,
    #[default]
    Md,
    Form,
    Report,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::List => "LIST",
            OutputFormat::Dict => "DICT",
            OutputFormat::Md => "MD",
            OutputFormat::Form => "FORM",
            OutputFormat::Report => "REPORT",
        }
    }

    /// Normalize an `## Output Format` attribute value, case-insensitively.
    /// An unrecognized value falls back to MD with a warning; a missing
    /// attribute is silently MD.
    pub fn from_attribute(value: Option<&str>, reporter: &mut Reporter) -> Self {
        let Some(value) = value else {
            return OutputFormat::Md;
        };
        match value.trim().to_ascii_uppercase().as_str() {
            "LIST" => OutputFormat::List,
            "DICT" => OutputFormat::Dict,
            "MD" => OutputFormat::Md,
            "FORM" => OutputFormat::Form,
            "REPORT" => OutputFormat::Report,
            other => {
                reporter.warning(format!(
                    "unrecognized output format '{}', using MD",
                    other
                ));
                OutputFormat::Md
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_values_normalize_case() {
        let mut reporter = Reporter::new(0);
        assert_eq!(
            OutputFormat::from_attribute(Some("list"), &mut reporter),
            OutputFormat::List
        );
        assert_eq!(
            OutputFormat::from_attribute(Some("Report"), &mut reporter),
            OutputFormat::Report
        );
        assert!(reporter.notes().is_empty());
    }

    #[test]
    fn unrecognized_defaults_to_md_with_warning() {
        let mut reporter = Reporter::new(0);
        assert_eq!(
            OutputFormat::from_attribute(Some("Banana"), &mut reporter),
            OutputFormat::Md
        );
        assert_eq!(reporter.notes().len(), 1);
    }

    #[test]
    fn missing_is_silently_md() {
        let mut reporter = Reporter::new(0);
        assert_eq!(
            OutputFormat::from_attribute(None, &mut reporter),
            OutputFormat::Md
        );
        assert!(reporter.notes().is_empty());
    }
}
