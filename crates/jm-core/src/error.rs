/// Failures the flow controller can hit at its collaborator boundary.
///
/// None of them is fatal: each one is logged and navigation proceeds with
/// defaults.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// Treated as "no identity found".
    #[error("identity check failed")]
    IdentityCheckFailed(#[source] anyhow::Error),
    #[error("session persistence failed")]
    PersistenceFailed(#[source] anyhow::Error),
    #[error("profile completion failed")]
    ProfileCompletionFailed(#[source] anyhow::Error),
    #[error("sign out failed")]
    SignOutFailed(#[source] anyhow::Error),
}

impl FlowError {
    /// Message followed by every cause, outermost first.
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            report.push_str(": ");
            report.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        report
    }
}
