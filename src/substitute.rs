//! Slot substitution: rewrite a template sentence with entity labels.
//!
//! Slots are processed in template order against a progressively updated
//! string. For each slot bound to a concrete query entity, the first
//! occurrence of the slot's surface form is replaced by the entity's label,
//! or by `<surface>_N/A` when no label could be resolved. Slots bound to
//! query variables keep their wording ("who", "what", ...).
//!
//! Replacement is by first textual occurrence, not by slot position: when two
//! slots share the same surface text, the first slot consumes the first
//! occurrence and the second slot the next one still present.

use crate::align::VariableCorrespondence;
use crate::label::{LABEL_NOT_FOUND, Label};
use crate::template::Slot;
use crate::token::Token;

/// What happened to one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// Anchor has no counterpart in the query.
    Unmapped,
    /// Anchor maps to a query variable; wording kept.
    Variable,
    /// Surface form replaced by the label.
    Replaced { label: String },
    /// Surface form marked as unresolved.
    Unresolved,
    /// Surface form no longer present in the working string.
    Missing,
}

/// Apply the slots to `question`.
///
/// `label_of` is called at most once per slot and only for concrete tokens.
pub fn substitute<F>(
    question: &str,
    slots: &[Slot],
    correspondence: &VariableCorrespondence,
    label_of: F,
) -> String
where
    F: FnMut(&Token) -> Label,
{
    substitute_with_outcomes(question, slots, correspondence, label_of).0
}

/// Like [`substitute`], also reporting the outcome of each slot.
pub fn substitute_with_outcomes<F>(
    question: &str,
    slots: &[Slot],
    correspondence: &VariableCorrespondence,
    mut label_of: F,
) -> (String, Vec<SlotOutcome>)
where
    F: FnMut(&Token) -> Label,
{
    let mut text = question.to_string();
    let mut outcomes = Vec::with_capacity(slots.len());

    for slot in slots {
        let Some(target) = correspondence.query_token(&slot.anchor_token()) else {
            tracing::trace!(anchor = %slot.anchor, "slot has no query counterpart");
            outcomes.push(SlotOutcome::Unmapped);
            continue;
        };
        if target.is_variable() {
            tracing::trace!(anchor = %slot.anchor, variable = %target, "slot kept verbatim");
            outcomes.push(SlotOutcome::Variable);
            continue;
        }

        let label = label_of(target);
        let words = slot.surface_form();
        if words.is_empty() || !text.contains(&words) {
            tracing::debug!(anchor = %slot.anchor, %words, "surface form not in question");
            outcomes.push(SlotOutcome::Missing);
            continue;
        }

        let (replacement, outcome) = match label {
            Label::Found(found) => (found.clone(), SlotOutcome::Replaced { label: found }),
            Label::NotFound => (format!("{words}_{LABEL_NOT_FOUND}"), SlotOutcome::Unresolved),
        };
        tracing::debug!(anchor = %slot.anchor, %words, %replacement, "substituting slot");
        text = text.replacen(&words, &replacement, 1);
        outcomes.push(outcome);
    }

    (text, outcomes)
}
