use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three quiz topics, in the order they are taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "CSS")]
    Css,
    #[serde(rename = "JS")]
    Js,
}

impl Subject {
    /// Progression order.
    pub const ALL: [Subject; 3] = [Subject::Html, Subject::Css, Subject::Js];

    /// Looks up a subject by its position in the progression.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position of this subject in the progression.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Subject::Html => 0,
            Subject::Css => 1,
            Subject::Js => 2,
        }
    }

    /// Key used in the question document and persisted snapshots.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Subject::Html => "HTML",
            Subject::Css => "CSS",
            Subject::Js => "JS",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Subject::Html => "HTML Quiz",
            Subject::Css => "CSS Quiz",
            Subject::Js => "JavaScript Quiz",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Subject::Html => "🧩",
            Subject::Css => "🎨",
            Subject::Js => "💻",
        }
    }

    /// The subject taken after this one, if any.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    #[must_use]
    pub fn is_last(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_order_is_html_css_js() {
        assert_eq!(Subject::from_index(0), Some(Subject::Html));
        assert_eq!(Subject::Html.next(), Some(Subject::Css));
        assert_eq!(Subject::Css.next(), Some(Subject::Js));
        assert!(Subject::Js.is_last());
        assert_eq!(Subject::from_index(3), None);
    }

    #[test]
    fn index_round_trips_for_every_subject() {
        for (i, subject) in Subject::ALL.iter().enumerate() {
            assert_eq!(subject.index(), i);
        }
    }

    #[test]
    fn serializes_with_document_keys() {
        let json = serde_json::to_string(&Subject::Js).unwrap();
        assert_eq!(json, "\"JS\"");
    }
}
