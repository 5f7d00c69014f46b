//! Engine lock/unlock gate.
//!
//! The gate compares the entered credential against locally cached
//! candidates and asks for an explicit confirmation before flipping the
//! lock state. No backend call is involved.
//!
//! The comparison is plain string equality against plaintext values, one of
//! which is the cached display username. This mirrors how the product
//! behaves today and is kept as-is until the lock action is verified by the
//! server instead.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::registration::LocalRegistration;

/// Client-local engine state. Starts unlocked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineState {
    pub is_blocked: bool,
}

/// The action a toggle would perform from a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineAction {
    Lock,
    Unlock,
}

impl EngineAction {
    fn from_state(state: EngineState) -> Self {
        if state.is_blocked {
            EngineAction::Unlock
        } else {
            EngineAction::Lock
        }
    }

    /// Question shown before the action is committed.
    pub fn prompt(self) -> &'static str {
        match self {
            EngineAction::Lock => "Confirm engine lock?",
            EngineAction::Unlock => "Confirm engine unlock?",
        }
    }

    /// Past-tense description once the action is committed.
    pub fn done_message(self) -> &'static str {
        match self {
            EngineAction::Lock => "Engine locked",
            EngineAction::Unlock => "Engine unlocked",
        }
    }
}

/// Credentials the entered value is compared against, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialCandidates(Vec<String>);

impl CredentialCandidates {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            candidates
                .into_iter()
                .map(Into::into)
                .filter(|c: &String| !c.is_empty())
                .collect(),
        )
    }

    /// Registration password, nested `usuario.contrasena`, then the cached
    /// display username.
    pub fn from_sources(
        registration: Option<&LocalRegistration>,
        cached_username: Option<&str>,
    ) -> Self {
        let mut candidates = Vec::new();
        if let Some(record) = registration {
            if let Some(password) = record.contrasena.as_deref() {
                candidates.push(password.to_string());
            }
            if let Some(nested) = record.usuario.as_ref().and_then(|u| u.nested_password()) {
                candidates.push(nested.to_string());
            }
        }
        if let Some(username) = cached_username {
            candidates.push(username.to_string());
        }
        Self::new(candidates)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-empty `entered` equal to any candidate.
    pub fn matches(&self, entered: &str) -> bool {
        !entered.is_empty() && self.0.iter().any(|candidate| candidate == entered)
    }
}

/// A matched toggle waiting for the user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a pending toggle does nothing until it is resolved"]
pub struct PendingToggle {
    action: EngineAction,
    from: EngineState,
}

impl PendingToggle {
    pub fn action(&self) -> EngineAction {
        self.action
    }

    pub fn prompt(&self) -> &'static str {
        self.action.prompt()
    }
}

/// Result of resolving a pending toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// State flipped.
    Committed(EngineState),
    /// User declined; state unchanged.
    Cancelled,
    /// State changed after the confirmation was requested.
    Stale,
}

/// Asks the user a yes/no question.
pub trait Confirmer {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirmer for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineGate {
    state: EngineState,
    entered: String,
}

impl EngineGate {
    pub fn new(state: EngineState) -> Self {
        Self {
            state,
            entered: String::new(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn entered(&self) -> &str {
        &self.entered
    }

    /// Update the credential input field.
    pub fn set_credential(&mut self, value: impl Into<String>) {
        self.entered = value.into();
    }

    /// Check the entered credential and, on a match, return the pending
    /// confirmation step for the current state.
    pub fn request_toggle(
        &self,
        candidates: &CredentialCandidates,
    ) -> Result<PendingToggle, ValidationError> {
        if !candidates.matches(&self.entered) {
            debug!(
                "[Engine] Credential mismatch ({} candidates)",
                candidates.len()
            );
            return Err(ValidationError::CredentialMismatch);
        }

        Ok(PendingToggle {
            action: EngineAction::from_state(self.state),
            from: self.state,
        })
    }

    /// Apply the user's answer to a pending toggle. Only an affirmative
    /// answer on an unchanged state flips it and clears the input.
    pub fn resolve(&mut self, pending: PendingToggle, confirmed: bool) -> ToggleOutcome {
        if pending.from != self.state {
            debug!("[Engine] Ignoring stale confirmation");
            return ToggleOutcome::Stale;
        }
        if !confirmed {
            return ToggleOutcome::Cancelled;
        }

        self.state.is_blocked = !self.state.is_blocked;
        self.entered.clear();
        info!("[Engine] {}", pending.action.done_message());
        ToggleOutcome::Committed(self.state)
    }

    /// `request_toggle` followed by `resolve` with the confirmer's answer.
    pub fn toggle(
        &mut self,
        candidates: &CredentialCandidates,
        confirmer: &mut dyn Confirmer,
    ) -> Result<ToggleOutcome, ValidationError> {
        let pending = self.request_toggle(candidates)?;
        let confirmed = confirmer.confirm(pending.prompt());
        Ok(self.resolve(pending, confirmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{UserProfile, UserRef};

    fn always(answer: bool) -> impl FnMut(&str) -> bool {
        move |_| answer
    }

    #[test]
    fn registration_password_matches() {
        let record = LocalRegistration {
            contrasena: Some("Secr3tA".to_string()),
            ..LocalRegistration::default()
        };
        let candidates = CredentialCandidates::from_sources(Some(&record), None);
        assert!(candidates.matches("Secr3tA"));
        assert!(!candidates.matches("secr3ta"));
    }

    #[test]
    fn empty_entry_never_matches() {
        let candidates = CredentialCandidates::new(["Secr3tA", ""]);
        assert!(!candidates.matches(""));

        let gate = EngineGate::default();
        assert_eq!(
            gate.request_toggle(&candidates),
            Err(ValidationError::CredentialMismatch)
        );
    }

    #[test]
    fn candidates_include_nested_password_and_username() {
        let record = LocalRegistration {
            usuario: Some(UserRef::Profile(Box::new(UserProfile {
                contrasena: Some("Nested9X".to_string()),
                ..UserProfile::default()
            }))),
            ..LocalRegistration::default()
        };
        let candidates = CredentialCandidates::from_sources(Some(&record), Some("maria"));
        assert_eq!(candidates.len(), 2);
        assert!(candidates.matches("Nested9X"));
        assert!(candidates.matches("maria"));
    }

    #[test]
    fn confirmed_toggles_lock_then_unlock() {
        let candidates = CredentialCandidates::new(["Secr3tA"]);
        let mut gate = EngineGate::default();
        assert!(!gate.state().is_blocked);

        gate.set_credential("Secr3tA");
        let outcome = gate.toggle(&candidates, &mut always(true)).unwrap();
        assert_eq!(outcome, ToggleOutcome::Committed(EngineState { is_blocked: true }));
        assert_eq!(gate.entered(), "");

        gate.set_credential("Secr3tA");
        let pending = gate.request_toggle(&candidates).unwrap();
        assert_eq!(pending.action(), EngineAction::Unlock);
        assert_eq!(pending.prompt(), "Confirm engine unlock?");
        assert_eq!(
            gate.resolve(pending, true),
            ToggleOutcome::Committed(EngineState { is_blocked: false })
        );
    }

    #[test]
    fn declined_confirmation_keeps_state_and_input() {
        let candidates = CredentialCandidates::new(["Secr3tA"]);
        let mut gate = EngineGate::default();
        gate.set_credential("Secr3tA");

        let mut asked = Vec::new();
        let outcome = gate
            .toggle(&candidates, &mut |prompt: &str| {
                asked.push(prompt.to_string());
                false
            })
            .unwrap();

        assert_eq!(outcome, ToggleOutcome::Cancelled);
        assert_eq!(asked, vec!["Confirm engine lock?".to_string()]);
        assert!(!gate.state().is_blocked);
        assert_eq!(gate.entered(), "Secr3tA");
    }

    #[test]
    fn mismatch_leaves_state_unchanged() {
        let candidates = CredentialCandidates::new(["Secr3tA"]);
        let mut gate = EngineGate::new(EngineState { is_blocked: true });
        gate.set_credential("wrong");

        let result = gate.toggle(&candidates, &mut always(true));
        assert_eq!(result, Err(ValidationError::CredentialMismatch));
        assert!(gate.state().is_blocked);
    }

    #[test]
    fn stale_confirmation_is_rejected() {
        let candidates = CredentialCandidates::new(["Secr3tA"]);
        let mut gate = EngineGate::default();
        gate.set_credential("Secr3tA");

        let first = gate.request_toggle(&candidates).unwrap();
        let second = gate.request_toggle(&candidates).unwrap();
        assert!(matches!(gate.resolve(first, true), ToggleOutcome::Committed(_)));
        assert_eq!(gate.resolve(second, true), ToggleOutcome::Stale);
        assert!(gate.state().is_blocked);
    }
}
