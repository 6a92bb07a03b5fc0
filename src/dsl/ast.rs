//! Syntax tree for a parsed fragment.
//!
//! A fragment is pure data: parsing never touches a net. The
//! [`Session`](crate::Session) materializes fragments into a graph.

use std::fmt;

/// One parsed fragment: a place followed by one or more
/// `-> transition -> place` steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Label of the leading place
    pub head: String,
    /// The chain of transitions and the places they lead to
    pub steps: Vec<Step>,
}

impl Fragment {
    /// Labels of every place in chain order, the head included.
    pub fn place_labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.head.as_str()).chain(self.steps.iter().map(|s| s.place.as_str()))
    }

    /// Every transition in chain order.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionSpec> {
        self.steps.iter().map(|s| &s.transition)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        for step in &self.steps {
            write!(f, " -> {} -> {}", step.transition, step.place)?;
        }
        Ok(())
    }
}

/// A transition followed by the place it produces into.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub transition: TransitionSpec,
    pub place: String,
}

/// A transition reference as written in the fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionSpec {
    /// Display label (`tau` for silent transitions)
    pub label: String,
    /// Numeric suffix given with `label__id`
    pub id: Option<String>,
    /// Whether the label was the silent marker
    pub silent: bool,
    /// Simple `[..]` or weighted `{..}` syntax
    pub style: TransitionStyle,
}

impl TransitionSpec {
    /// The key the transition is resolved by: the label, or
    /// `label__id` when an id suffix was given.
    pub fn key(&self) -> String {
        match &self.id {
            Some(id) => format!("{}{}{}", self.label, crate::ID_SEPARATOR, id),
            None => self.label.clone(),
        }
    }

    /// The weight a newly created transition gets, `None` for simple ones.
    pub fn weight(&self) -> Option<f64> {
        match self.style {
            TransitionStyle::Simple => None,
            TransitionStyle::Weighted(weight) => Some(weight),
        }
    }
}

impl fmt::Display for TransitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            TransitionStyle::Simple => write!(f, "[{}]", self.key()),
            TransitionStyle::Weighted(weight) => {
                write!(f, "{{{} {}}}", self.key(), decimal(weight))
            }
        }
    }
}

/// Plain decimal notation with a fractional part, as the weight token needs.
fn decimal(weight: f64) -> String {
    let mut text = weight.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Transition syntax variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionStyle {
    /// `[label]`, no weight
    Simple,
    /// `{label weight}`, weight defaults to 1.0 when omitted
    Weighted(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(label: &str, id: Option<&str>, style: TransitionStyle) -> TransitionSpec {
        TransitionSpec {
            label: label.to_string(),
            id: id.map(str::to_string),
            silent: label == crate::SILENT_LABEL,
            style,
        }
    }

    #[test]
    fn test_transition_key() {
        assert_eq!(spec("a", None, TransitionStyle::Simple).key(), "a");
        assert_eq!(spec("a", Some("2"), TransitionStyle::Simple).key(), "a__2");
    }

    #[test]
    fn test_fragment_display() {
        let fragment = Fragment {
            head: "I".to_string(),
            steps: vec![
                Step {
                    transition: spec("a", Some("1"), TransitionStyle::Weighted(0.4)),
                    place: "p1".to_string(),
                },
                Step {
                    transition: spec("b", None, TransitionStyle::Simple),
                    place: "F".to_string(),
                },
            ],
        };
        assert_eq!(fragment.to_string(), "I -> {a__1 0.4} -> p1 -> [b] -> F");
        assert_eq!(fragment.place_labels().collect::<Vec<_>>(), vec!["I", "p1", "F"]);
    }

    #[test]
    fn test_weight_display_is_plain_decimal() {
        let display = |weight| spec("a", None, TransitionStyle::Weighted(weight)).to_string();
        assert_eq!(display(1.0), "{a 1.0}");
        assert_eq!(display(0.4), "{a 0.4}");
        assert_eq!(display(1e20), "{a 100000000000000000000.0}");
        assert_eq!(display(1e-7), "{a 0.0000001}");
    }
}
