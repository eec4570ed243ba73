//! # Interaction Toggle
//!
//! Three states per (post, user): none, liked, disliked. Both symbols cancel
//! themselves and override each other:
//!
//! | current  | request | step      | next     |
//! |----------|---------|-----------|----------|
//! | none     | x       | insert x  | x        |
//! | x        | x       | delete    | none     |
//! | opposite | x       | overwrite | x        |

use serde::Serialize;

use crate::models::{InteractionKind, Tally};

/// The store operation needed to move from the observed state to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleStep {
    /// No row exists yet
    Insert(InteractionKind),
    /// A row with the requested value exists; retract it
    Delete(InteractionKind),
    /// A row with the opposite value exists; overwrite it in place
    Overwrite {
        from: InteractionKind,
        to: InteractionKind,
    },
}

impl ToggleStep {
    /// The state the pair is in once this step has been applied.
    pub fn next_state(&self) -> Option<InteractionKind> {
        match self {
            Self::Insert(kind) => Some(*kind),
            Self::Delete(_) => None,
            Self::Overwrite { to, .. } => Some(*to),
        }
    }

    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Insert(_) => "inserted",
            Self::Delete(_) => "deleted",
            Self::Overwrite { .. } => "overwritten",
        }
    }
}

/// Decides the step from an explicit read of the current row.
pub fn resolve_toggle(current: Option<InteractionKind>, requested: InteractionKind) -> ToggleStep {
    match current {
        None => ToggleStep::Insert(requested),
        Some(existing) if existing == requested => ToggleStep::Delete(existing),
        Some(existing) => ToggleStep::Overwrite { from: existing, to: requested },
    }
}

/// What a toggle request reports back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub state: Option<InteractionKind>,
    /// The step that was actually applied
    #[serde(skip)]
    pub step: ToggleStep,
    #[serde(flatten)]
    pub tally: Tally,
}

#[cfg(test)]
mod tests {
    use super::*;
    use InteractionKind::*;

    #[test]
    fn every_transition_of_the_automaton() {
        let cases = [
            (None, Like, ToggleStep::Insert(Like), Some(Like)),
            (Some(Like), Like, ToggleStep::Delete(Like), None),
            (Some(Dislike), Like, ToggleStep::Overwrite { from: Dislike, to: Like }, Some(Like)),
            (None, Dislike, ToggleStep::Insert(Dislike), Some(Dislike)),
            (Some(Dislike), Dislike, ToggleStep::Delete(Dislike), None),
            (Some(Like), Dislike, ToggleStep::Overwrite { from: Like, to: Dislike }, Some(Dislike)),
        ];
        for (current, requested, step, next) in cases {
            let got = resolve_toggle(current, requested);
            assert_eq!(got, step, "{current:?} + {requested:?}");
            assert_eq!(got.next_state(), next);
        }
    }

    #[test]
    fn like_twice_returns_to_none() {
        let first = resolve_toggle(None, Like).next_state();
        let second = resolve_toggle(first, Like).next_state();
        assert_eq!(second, None);
    }

    #[test]
    fn outcome_serializes_flat() {
        let outcome = ToggleOutcome {
            state: Some(Dislike),
            step: ToggleStep::Insert(Dislike),
            tally: Tally { likes: 2, dislikes: 1 },
        };
        assert_eq!(
            serde_json::to_value(outcome).unwrap(),
            serde_json::json!({ "state": "dislike", "likes": 2, "dislikes": 1 })
        );
    }
}
