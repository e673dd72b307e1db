use crate::draft::{RegistrationFields, ResetDraft, SignupDraft};
use crate::ids::IdentityId;
use crate::role::Role;

/// Side-effects produced by state transitions.
///
/// 状态迁移产生的副作用。
#[derive(Debug, Clone, PartialEq)]
pub enum FlowAction {
    /// Record the role chosen at sign-up.
    SetRole(Role),
    /// Replace the signup draft.
    StoreSignupDraft(SignupDraft),
    /// Write the `pendingIdentityId` marker.
    RememberPendingIdentity(IdentityId),
    /// Replace the password-reset draft.
    StoreResetDraft(ResetDraft),
    /// Adopt the identity reported by a successful login.
    EstablishSession {
        role: Role,
        display_name: String,
        profile_complete: bool,
    },
    /// Merge step fields into the role's registration draft.
    MergeRegistration {
        role: Role,
        fields: RegistrationFields,
    },
    /// Hand the accumulated draft over and reset it.
    SubmitRegistration { role: Role },
    /// Tell the backend the profile is complete.
    MarkProfileComplete,
    /// Remove the `pendingIdentityId` marker.
    ClearPendingIdentity,
    /// Drop the role's registration draft without submitting.
    DiscardRegistration { role: Role },
    /// Clear the persisted snapshot, the role and all drafts, and sign out.
    SignOut,
}
