use regex::Regex;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Left-hand side of a rule.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches only an identical input.
    Literal(String),
    /// Matches when the regex finds a match; group 1 (if any) is captured.
    Regex(Regex),
}

/// Transform applied to the captured group (or `None` for literals and
/// patterns without a group).
pub type Transform<T> = Box<dyn Fn(Option<&str>) -> T + Send + Sync>;

/// Right-hand side of a rule.
pub enum Replacement<T> {
    Value(T),
    Transform(Transform<T>),
}

pub struct Rule<T> {
    pub pattern: Pattern,
    pub replacement: Replacement<T>,
}

impl<T> Rule<T> {
    /// Match `pattern` against the input; a capture group is passed to the
    /// transform.
    fn capture<'a>(&self, input: &'a str) -> Option<Option<&'a str>> {
        match &self.pattern {
            Pattern::Literal(text) => (input == text).then_some(None),
            Pattern::Regex(re) => re
                .captures(input)
                .map(|caps| caps.get(1).map(|m| m.as_str())),
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An ordered list of rules, evaluated first-match-wins.
pub struct MatcherTable<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for MatcherTable<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T: Clone> MatcherTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn literal(mut self, text: &str, value: T) -> Self {
        self.rules.push(Rule {
            pattern: Pattern::Literal(text.to_string()),
            replacement: Replacement::Value(value),
        });
        self
    }

    pub fn regex_value(mut self, re: Regex, value: T) -> Self {
        self.rules.push(Rule {
            pattern: Pattern::Regex(re),
            replacement: Replacement::Value(value),
        });
        self
    }

    pub fn regex(
        mut self,
        re: Regex,
        transform: impl Fn(Option<&str>) -> T + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule {
            pattern: Pattern::Regex(re),
            replacement: Replacement::Transform(Box::new(transform)),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn evaluate(&self, input: &str, default: T) -> T {
        evaluate_matchers(input, &self.rules, default)
    }
}

/// Evaluate `rules` in order against `input`. The first literal that equals
/// the input, or pattern that matches it, decides the result; otherwise
/// `default` is returned.
pub fn evaluate_matchers<T: Clone>(input: &str, rules: &[Rule<T>], default: T) -> T {
    for rule in rules {
        if let Some(captured) = rule.capture(input) {
            return match &rule.replacement {
                Replacement::Value(value) => value.clone(),
                Replacement::Transform(transform) => transform(captured),
            };
        }
    }
    default
}

#[cfg(test)]
mod tests {
    use super::*;

    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    fn event_table() -> MatcherTable<String> {
        MatcherTable::new()
            .regex(re(r"(?i)^(\d+) Meter(?:s| Dash| Fly)$"), |s| {
                format!("{} meter", s.unwrap_or_default())
            })
            .literal("Mile", "1 mile".to_string())
            .regex(re(r"(?i)^(\d+(?:\.\d+)?) Miles?$"), |s| {
                format!("{} mile", s.unwrap_or_default())
            })
    }

    #[test]
    fn transform_receives_capture() {
        let table = event_table();
        assert_eq!(table.evaluate("100 Meters", "fallback".into()), "100 meter");
        assert_eq!(table.evaluate("400 Meter Dash", "fallback".into()), "400 meter");
        assert_eq!(table.evaluate("2 Miles", "fallback".into()), "2 mile");
    }

    #[test]
    fn literal_matches_exactly() {
        let table = event_table();
        assert_eq!(table.evaluate("Mile", "fallback".into()), "1 mile");
        assert_eq!(table.evaluate("mile", "fallback".into()), "fallback");
    }

    #[test]
    fn unmatched_returns_default() {
        let table = event_table();
        assert_eq!(table.evaluate("unknown-code", "unknown-code".into()), "unknown-code");
    }

    #[test]
    fn first_match_wins() {
        let table = MatcherTable::new()
            .regex_value(re(r"^\d+m$"), "first")
            .regex_value(re(r"^1600m$"), "second");
        assert_eq!(table.evaluate("1600m", "none"), "first");
    }

    #[test]
    fn pattern_without_group_passes_none() {
        let table: MatcherTable<Option<String>> =
            MatcherTable::new().regex(re(r"^HJ$"), |s| s.map(str::to_string));
        assert_eq!(table.evaluate("HJ", Some("default".into())), None);
    }
}
