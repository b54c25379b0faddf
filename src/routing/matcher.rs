//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile configured path patterns ("/v1/banks/{bankId}/users") into
//!   segment matchers
//! - Match request paths segment by segment
//! - Expose a specificity key so the route table can rank patterns
//!
//! # Design Decisions
//! - Literal segments match exactly, case-sensitive
//! - A `{variable}` matches any single non-empty segment, never more
//! - One trailing slash on the request path is ignored
//! - No regex to guarantee O(n) matching

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable,
}

/// Error raised while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern {0:?} must start with '/'")]
    NotAbsolute(String),

    #[error("pattern {0:?} contains an empty segment")]
    EmptySegment(String),

    #[error("pattern {0:?} contains a malformed variable segment")]
    MalformedVariable(String),
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern string.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.to_string()));
        }

        let trimmed = pattern.trim_end_matches('/');
        let mut segments = Vec::new();
        for part in trimmed.split('/').skip(1) {
            if part.is_empty() {
                return Err(PatternError::EmptySegment(pattern.to_string()));
            }
            if part.starts_with('{') || part.ends_with('}') {
                let inner = part
                    .strip_prefix('{')
                    .and_then(|p| p.strip_suffix('}'))
                    .filter(|name| !name.is_empty() && !name.contains(['{', '}']));
                match inner {
                    Some(_) => segments.push(Segment::Variable),
                    None => return Err(PatternError::MalformedVariable(pattern.to_string())),
                }
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// Returns true if the request path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        if !path.starts_with('/') {
            return false;
        }

        let trimmed = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };

        // "/" yields a single empty part; treat it as zero segments.
        let parts: Vec<&str> = if trimmed == "/" {
            Vec::new()
        } else {
            trimmed.split('/').skip(1).collect()
        };

        if parts.len() != self.segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(parts)
            .all(|(segment, part)| match segment {
                Segment::Literal(literal) => literal == part,
                Segment::Variable => !part.is_empty(),
            })
    }

    /// Ranking key: more segments, then more literals, is more specific.
    pub fn specificity(&self) -> (usize, usize) {
        let literals = self
            .segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Literal(_)))
            .count();
        (self.segments.len(), literals)
    }

    /// The pattern as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_exactly() {
        let pattern = PathPattern::parse("/v1/banks").unwrap();
        assert!(pattern.matches("/v1/banks"));
        assert!(pattern.matches("/v1/banks/"));
        assert!(!pattern.matches("/v1/Banks"));
        assert!(!pattern.matches("/v1/banks/extra"));
        assert!(!pattern.matches("/v1"));
    }

    #[test]
    fn variables_match_any_single_segment() {
        let pattern = PathPattern::parse("/v1/banks/{bankId}/users").unwrap();
        assert!(pattern.matches("/v1/banks/b-42/users"));
        assert!(pattern.matches("/v1/banks/anything/users"));
        assert!(!pattern.matches("/v1/banks/users"));
        assert!(!pattern.matches("/v1/banks/a/b/users"));
    }

    #[test]
    fn deeper_pattern_distinct_from_parent() {
        let users = PathPattern::parse("/v1/banks/{bankId}/users/{userId}").unwrap();
        let photo = PathPattern::parse("/v1/banks/{bankId}/users/{userId}/photo").unwrap();

        assert!(users.matches("/v1/banks/b1/users/u1"));
        assert!(!users.matches("/v1/banks/b1/users/u1/photo"));
        assert!(photo.matches("/v1/banks/b1/users/u1/photo"));
    }

    #[test]
    fn specificity_prefers_longer_then_more_literal() {
        let short = PathPattern::parse("/v1/banks/{bankId}/users").unwrap();
        let long = PathPattern::parse("/v1/banks/{bankId}/users/{userId}").unwrap();
        let literal = PathPattern::parse("/v1/banks/main/users").unwrap();

        assert!(long.specificity() > short.specificity());
        assert!(literal.specificity() > short.specificity());
    }

    #[test]
    fn malformed_patterns_rejected() {
        assert!(matches!(
            PathPattern::parse("v1/users"),
            Err(PatternError::NotAbsolute(_))
        ));
        assert!(matches!(
            PathPattern::parse("/v1//users"),
            Err(PatternError::EmptySegment(_))
        ));
        assert!(matches!(
            PathPattern::parse("/v1/{unclosed/users"),
            Err(PatternError::MalformedVariable(_))
        ));
        assert!(matches!(
            PathPattern::parse("/v1/{}/users"),
            Err(PatternError::MalformedVariable(_))
        ));
    }

    #[test]
    fn root_pattern_matches_root_only() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.matches("/"));
        assert!(!pattern.matches("/anything"));
    }
}
