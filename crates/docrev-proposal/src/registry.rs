//! Proposal registry
//!
//! Keyed store holding exactly one proposal slot per kind. Every mutation
//! locks only the slot it touches, so operations on different kinds never
//! contend. The `Pending` guard enforced by `begin` is the single-flight
//! mechanism for generations: a second `begin` for an in-flight kind is an
//! `InvalidTransition`, never a second generation.

use crate::error::RegistryError;
use crate::kind::ProposalKind;
use crate::lifecycle::{validate_transition, ProposalState};
use crate::payload::{ProposalPayload, QaField};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

const DEFAULT_HISTORY_CAP: usize = 16;

/// One kind's slot: lifecycle state, current payload, edit history
#[derive(Debug, Clone, Default)]
struct ProposalSlot {
    state: ProposalState,
    payload: Option<ProposalPayload>,
    history: Vec<ProposalPayload>,
}

/// By-value view of one slot for display layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalSnapshot {
    pub kind: ProposalKind,
    pub state: ProposalState,
    pub payload: Option<ProposalPayload>,
    /// Accepted-item count (0 unless a Questions payload is present)
    pub accepted: usize,
    /// Number of superseded payload revisions
    pub revisions: usize,
}

/// Keyed store of proposals, one slot per kind
#[derive(Debug)]
pub struct ProposalRegistry {
    slots: DashMap<ProposalKind, ProposalSlot>,
    history_cap: usize,
}

impl ProposalRegistry {
    /// Create a registry with every kind Idle
    #[must_use]
    pub fn new() -> Self {
        let slots = DashMap::new();
        for kind in ProposalKind::ALL {
            slots.insert(kind, ProposalSlot::default());
        }
        Self {
            slots,
            history_cap: DEFAULT_HISTORY_CAP,
        }
    }

    /// Cap on retained edit-history revisions per slot
    #[inline]
    #[must_use]
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap;
        self
    }

    /// Reset every slot to Idle, clearing payloads (document switch)
    pub fn reset(&self) {
        for kind in ProposalKind::ALL {
            self.slots.insert(kind, ProposalSlot::default());
        }
        tracing::debug!("proposal registry reset");
    }

    /// Current state for `kind`
    #[must_use]
    pub fn state(&self, kind: ProposalKind) -> ProposalState {
        self.slots
            .get(&kind)
            .map(|slot| slot.state)
            .unwrap_or(ProposalState::Idle)
    }

    /// `Idle -> Pending` (or `Applied -> Pending`, starting a fresh cycle).
    ///
    /// # Errors
    /// `InvalidTransition` if the slot is already Pending or Ready.
    pub fn begin(&self, kind: ProposalKind) -> Result<(), RegistryError> {
        let mut slot = self.slot_mut(kind);
        let from = slot.state;
        validate_transition(kind, from, ProposalState::Pending, "begin")?;

        // A fresh cycle starts clean
        slot.payload = None;
        slot.history.clear();
        slot.state = ProposalState::Pending;
        tracing::debug!(%kind, %from, "proposal pending");
        Ok(())
    }

    /// `Pending -> Ready`, storing the payload.
    ///
    /// # Errors
    /// `InvalidTransition` unless the slot is Pending.
    pub fn complete(
        &self,
        kind: ProposalKind,
        payload: ProposalPayload,
    ) -> Result<(), RegistryError> {
        let mut slot = self.slot_mut(kind);
        let from = slot.state;
        if from != ProposalState::Pending {
            return Err(RegistryError::InvalidTransition {
                kind,
                from,
                op: "complete",
            });
        }
        slot.payload = Some(payload);
        slot.state = ProposalState::Ready;
        tracing::debug!(%kind, "proposal ready");
        Ok(())
    }

    /// `Pending -> Idle` after a failed generation, so the kind is
    /// retryable.
    ///
    /// # Errors
    /// `InvalidTransition` unless the slot is Pending.
    pub fn fail(&self, kind: ProposalKind) -> Result<(), RegistryError> {
        let mut slot = self.slot_mut(kind);
        let from = slot.state;
        if from != ProposalState::Pending {
            return Err(RegistryError::InvalidTransition {
                kind,
                from,
                op: "fail",
            });
        }
        slot.payload = None;
        slot.state = ProposalState::Idle;
        tracing::debug!(%kind, "proposal reset after failure");
        Ok(())
    }

    /// Edit one field of a Q&A item in place. Valid only on a Ready
    /// Questions slot; the superseded payload goes into the edit history.
    ///
    /// # Errors
    /// `InvalidTransition` for the wrong kind or state, `IndexOutOfRange`
    /// for a bad index.
    pub fn edit_item(
        &self,
        kind: ProposalKind,
        index: usize,
        field: QaField,
        value: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let cap = self.history_cap;
        let mut guard = self.slot_mut(kind);
        let slot = &mut *guard;
        let from = slot.state;

        match (kind, from, slot.payload.as_mut()) {
            (
                ProposalKind::Questions,
                ProposalState::Ready,
                Some(ProposalPayload::Questions(items)),
            ) => {
                if index >= items.len() {
                    return Err(RegistryError::IndexOutOfRange {
                        kind,
                        index,
                        len: items.len(),
                    });
                }
                push_history(
                    &mut slot.history,
                    ProposalPayload::Questions(items.clone()),
                    cap,
                );
                let item = &mut items[index];
                match field {
                    QaField::Question => item.question = value.into(),
                    QaField::Answer => item.answer = value.into(),
                }
                tracing::debug!(%kind, index, "item edited");
                Ok(())
            }
            _ => Err(RegistryError::InvalidTransition {
                kind,
                from,
                op: "edit_item",
            }),
        }
    }

    /// Replace the text of a Ready Rewrite or Summary payload (the live
    /// editable candidate); the superseded payload goes into the history.
    ///
    /// # Errors
    /// `InvalidTransition` for a Questions slot or any non-Ready state.
    pub fn edit_text(
        &self,
        kind: ProposalKind,
        value: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let cap = self.history_cap;
        let mut guard = self.slot_mut(kind);
        let slot = &mut *guard;
        let from = slot.state;

        match (from, slot.payload.as_mut()) {
            (
                ProposalState::Ready,
                Some(ProposalPayload::Rewrite(text) | ProposalPayload::Summary(text)),
            ) => {
                let snapshot = match kind {
                    ProposalKind::Rewrite => ProposalPayload::Rewrite(text.clone()),
                    _ => ProposalPayload::Summary(text.clone()),
                };
                *text = value.into();
                push_history(&mut slot.history, snapshot, cap);
                tracing::debug!(%kind, "candidate text edited");
                Ok(())
            }
            _ => Err(RegistryError::InvalidTransition {
                kind,
                from,
                op: "edit_text",
            }),
        }
    }

    /// Flip a Q&A item's accepted flag. Valid only on a Ready Questions
    /// slot.
    ///
    /// # Errors
    /// `InvalidTransition` for the wrong kind or state, `IndexOutOfRange`
    /// for a bad index.
    pub fn toggle_accept(&self, kind: ProposalKind, index: usize) -> Result<bool, RegistryError> {
        let mut slot = self.slot_mut(kind);
        let from = slot.state;

        match (kind, from, &mut slot.payload) {
            (
                ProposalKind::Questions,
                ProposalState::Ready,
                Some(ProposalPayload::Questions(items)),
            ) => {
                let len = items.len();
                let item = items
                    .get_mut(index)
                    .ok_or(RegistryError::IndexOutOfRange { kind, index, len })?;
                item.accepted = !item.accepted;
                tracing::debug!(%kind, index, accepted = item.accepted, "item toggled");
                Ok(item.accepted)
            }
            _ => Err(RegistryError::InvalidTransition {
                kind,
                from,
                op: "toggle_accept",
            }),
        }
    }

    /// Discard the current proposal: any state except Applied returns to
    /// Idle with payload and history cleared. Discarding Idle is a no-op.
    ///
    /// # Errors
    /// `InvalidTransition` if the slot is Applied.
    pub fn discard(&self, kind: ProposalKind) -> Result<(), RegistryError> {
        let mut slot = self.slot_mut(kind);
        let from = slot.state;
        if from == ProposalState::Applied {
            return Err(RegistryError::InvalidTransition {
                kind,
                from,
                op: "discard",
            });
        }
        slot.payload = None;
        slot.history.clear();
        slot.state = ProposalState::Idle;
        tracing::debug!(%kind, %from, "proposal discarded");
        Ok(())
    }

    /// `Ready -> Applied`, returning what the controller must merge: the
    /// full payload for Rewrite/Summary, only the accepted items (original
    /// order) for Questions. Acceptance flags are cleared on the retained
    /// payload.
    ///
    /// # Errors
    /// `InvalidTransition` unless Ready; `NoSelection` if a Questions
    /// payload has zero accepted items (the slot stays Ready).
    pub fn apply(&self, kind: ProposalKind) -> Result<ProposalPayload, RegistryError> {
        let mut slot = self.slot_mut(kind);
        let from = slot.state;

        let Some(payload) = slot.payload.as_mut().filter(|_| from == ProposalState::Ready) else {
            return Err(RegistryError::InvalidTransition {
                kind,
                from,
                op: "apply",
            });
        };

        let merged = match payload {
            ProposalPayload::Questions(items) => {
                let accepted: Vec<_> = items.iter().filter(|i| i.accepted).cloned().collect();
                if accepted.is_empty() {
                    return Err(RegistryError::NoSelection { kind });
                }
                for item in items.iter_mut() {
                    item.accepted = false;
                }
                ProposalPayload::Questions(accepted)
            }
            other => other.clone(),
        };

        slot.state = ProposalState::Applied;
        tracing::info!(%kind, "proposal applied");
        Ok(merged)
    }

    /// Accepted-item count for `kind` (0 unless a Questions payload exists)
    #[must_use]
    pub fn accepted_count(&self, kind: ProposalKind) -> usize {
        self.slots
            .get(&kind)
            .and_then(|slot| slot.payload.as_ref().map(ProposalPayload::accepted_count))
            .unwrap_or(0)
    }

    /// By-value view of one slot
    #[must_use]
    pub fn snapshot(&self, kind: ProposalKind) -> ProposalSnapshot {
        self.slots
            .get(&kind)
            .map(|slot| ProposalSnapshot {
                kind,
                state: slot.state,
                payload: slot.payload.clone(),
                accepted: slot
                    .payload
                    .as_ref()
                    .map(ProposalPayload::accepted_count)
                    .unwrap_or(0),
                revisions: slot.history.len(),
            })
            .unwrap_or(ProposalSnapshot {
                kind,
                state: ProposalState::Idle,
                payload: None,
                accepted: 0,
                revisions: 0,
            })
    }

    fn slot_mut(&self, kind: ProposalKind) -> dashmap::mapref::one::RefMut<'_, ProposalKind, ProposalSlot> {
        self.slots.entry(kind).or_default()
    }
}

impl Default for ProposalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn push_history(history: &mut Vec<ProposalPayload>, payload: ProposalPayload, cap: usize) {
    history.push(payload);
    if history.len() > cap {
        history.remove(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::QaItem;
    use pretty_assertions::assert_eq;

    fn questions(n: usize) -> ProposalPayload {
        ProposalPayload::Questions(
            (0..n)
                .map(|i| QaItem::new(format!("q{i}"), format!("a{i}")))
                .collect(),
        )
    }

    #[test]
    fn begin_guards_pending_and_ready() {
        let reg = ProposalRegistry::new();
        reg.begin(ProposalKind::Rewrite).unwrap();

        let err = reg.begin(ProposalKind::Rewrite).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::InvalidTransition {
                from: ProposalState::Pending,
                ..
            }
        ));

        reg.complete(ProposalKind::Rewrite, ProposalPayload::Rewrite("r".into()))
            .unwrap();
        assert!(reg.begin(ProposalKind::Rewrite).is_err());
    }

    #[test]
    fn begin_after_apply_starts_fresh_cycle() {
        let reg = ProposalRegistry::new();
        reg.begin(ProposalKind::Summary).unwrap();
        reg.complete(ProposalKind::Summary, ProposalPayload::Summary("s".into()))
            .unwrap();
        reg.apply(ProposalKind::Summary).unwrap();
        assert_eq!(reg.state(ProposalKind::Summary), ProposalState::Applied);

        reg.begin(ProposalKind::Summary).unwrap();
        assert_eq!(reg.state(ProposalKind::Summary), ProposalState::Pending);
        assert!(reg.snapshot(ProposalKind::Summary).payload.is_none());
    }

    #[test]
    fn fail_resets_to_idle() {
        let reg = ProposalRegistry::new();
        reg.begin(ProposalKind::Questions).unwrap();
        reg.fail(ProposalKind::Questions).unwrap();
        assert_eq!(reg.state(ProposalKind::Questions), ProposalState::Idle);

        // Retryable
        reg.begin(ProposalKind::Questions).unwrap();
    }

    #[test]
    fn apply_questions_returns_accepted_subset_in_order() {
        let reg = ProposalRegistry::new();
        reg.begin(ProposalKind::Questions).unwrap();
        reg.complete(ProposalKind::Questions, questions(4)).unwrap();

        reg.toggle_accept(ProposalKind::Questions, 1).unwrap();
        reg.toggle_accept(ProposalKind::Questions, 3).unwrap();
        assert_eq!(reg.accepted_count(ProposalKind::Questions), 2);

        let merged = reg.apply(ProposalKind::Questions).unwrap();
        let items = merged.as_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].question, "q1");
        assert_eq!(items[1].question, "q3");
        assert_eq!(reg.state(ProposalKind::Questions), ProposalState::Applied);

        // Flags cleared on the retained payload
        let snap = reg.snapshot(ProposalKind::Questions);
        assert_eq!(snap.accepted, 0);
    }

    #[test]
    fn apply_questions_with_no_selection_fails_and_stays_ready() {
        let reg = ProposalRegistry::new();
        reg.begin(ProposalKind::Questions).unwrap();
        reg.complete(ProposalKind::Questions, questions(2)).unwrap();

        let err = reg.apply(ProposalKind::Questions).unwrap_err();
        assert!(matches!(err, RegistryError::NoSelection { .. }));
        assert_eq!(reg.state(ProposalKind::Questions), ProposalState::Ready);
    }

    #[test]
    fn edit_item_records_history_and_respects_bounds() {
        let reg = ProposalRegistry::new();
        reg.begin(ProposalKind::Questions).unwrap();
        reg.complete(ProposalKind::Questions, questions(2)).unwrap();

        reg.edit_item(ProposalKind::Questions, 0, QaField::Answer, "better")
            .unwrap();
        let snap = reg.snapshot(ProposalKind::Questions);
        assert_eq!(snap.revisions, 1);
        assert_eq!(snap.payload.unwrap().as_items().unwrap()[0].answer, "better");

        let err = reg
            .edit_item(ProposalKind::Questions, 9, QaField::Question, "x")
            .unwrap_err();
        assert!(matches!(err, RegistryError::IndexOutOfRange { index: 9, len: 2, .. }));
    }

    #[test]
    fn edit_item_rejects_wrong_kind_and_state() {
        let reg = ProposalRegistry::new();
        let err = reg
            .edit_item(ProposalKind::Rewrite, 0, QaField::Answer, "x")
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTransition { .. }));

        reg.begin(ProposalKind::Questions).unwrap();
        // Still Pending, not Ready
        let err = reg
            .edit_item(ProposalKind::Questions, 0, QaField::Answer, "x")
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidTransition { .. }));
    }

    #[test]
    fn edit_text_only_for_ready_text_payloads() {
        let reg = ProposalRegistry::new();
        reg.begin(ProposalKind::Summary).unwrap();
        reg.complete(ProposalKind::Summary, ProposalPayload::Summary("v1".into()))
            .unwrap();

        reg.edit_text(ProposalKind::Summary, "v2").unwrap();
        let snap = reg.snapshot(ProposalKind::Summary);
        assert_eq!(snap.payload.unwrap().as_text(), Some("v2"));
        assert_eq!(snap.revisions, 1);

        assert!(reg.edit_text(ProposalKind::Questions, "x").is_err());
    }

    #[test]
    fn discard_clears_everything_except_applied() {
        let reg = ProposalRegistry::new();
        reg.begin(ProposalKind::Rewrite).unwrap();
        reg.complete(ProposalKind::Rewrite, ProposalPayload::Rewrite("r".into()))
            .unwrap();
        reg.discard(ProposalKind::Rewrite).unwrap();
        assert_eq!(reg.state(ProposalKind::Rewrite), ProposalState::Idle);
        assert!(reg.snapshot(ProposalKind::Rewrite).payload.is_none());

        // Discarding Idle is a no-op
        reg.discard(ProposalKind::Rewrite).unwrap();

        // Applied is terminal
        reg.begin(ProposalKind::Rewrite).unwrap();
        reg.complete(ProposalKind::Rewrite, ProposalPayload::Rewrite("r".into()))
            .unwrap();
        reg.apply(ProposalKind::Rewrite).unwrap();
        assert!(reg.discard(ProposalKind::Rewrite).is_err());
    }

    #[test]
    fn history_cap_drops_oldest() {
        let reg = ProposalRegistry::new().with_history_cap(2);
        reg.begin(ProposalKind::Summary).unwrap();
        reg.complete(ProposalKind::Summary, ProposalPayload::Summary("v1".into()))
            .unwrap();

        reg.edit_text(ProposalKind::Summary, "v2").unwrap();
        reg.edit_text(ProposalKind::Summary, "v3").unwrap();
        reg.edit_text(ProposalKind::Summary, "v4").unwrap();

        assert_eq!(reg.snapshot(ProposalKind::Summary).revisions, 2);
    }

    #[test]
    fn reset_returns_every_slot_to_idle() {
        let reg = ProposalRegistry::new();
        reg.begin(ProposalKind::Rewrite).unwrap();
        reg.begin(ProposalKind::Summary).unwrap();
        reg.reset();

        for kind in ProposalKind::ALL {
            assert_eq!(reg.state(kind), ProposalState::Idle);
        }
    }
}
