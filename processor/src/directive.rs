/// Execution directive for a command block.
///
/// `Display` echoes what would happen, `Validate` checks it against the
/// remote catalog, `Process` performs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directive {
    #[default]
    Display,
    Validate,
    Process,
}

impl Directive {
    /// Strict parse of the three directive literals, any case.
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "display" => Some(Directive::Display),
            "validate" => Some(Directive::Validate),
            "process" => Some(Directive::Process),
            _ => None,
        }
    }

    /// Lenient parse: anything unrecognized behaves as Display, which
    /// short-circuits validation and never mutates.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Directive::Display => "display",
            Directive::Validate => "validate",
            Directive::Process => "process",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_parse_any_case() {
        assert_eq!(Directive::parse("Process"), Directive::Process);
        assert_eq!(Directive::parse("VALIDATE"), Directive::Validate);
        assert_eq!(Directive::parse("display"), Directive::Display);
    }

    #[test]
    fn unrecognized_falls_back_to_display() {
        assert_eq!(Directive::parse("banana"), Directive::Display);
        assert_eq!(Directive::try_parse("banana"), None);
    }
}
