//! Ephemeral drafts accumulated while the user walks through a flow.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the user identifies themselves during sign-up or password reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Phone,
    Email,
}

/// Data carried from the sign-up screen to verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupDraft {
    pub method: ContactMethod,
    pub contact: String,
    /// Only carried on the phone path; the email path re-derives credentials
    /// after backend verification.
    pub password: Option<String>,
}

/// Data carried from the forgot-password screen to the reset screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetDraft {
    pub method: ContactMethod,
    pub contact: String,
}

/// Partial registration fields submitted by one wizard step.
pub type RegistrationFields = Map<String, Value>;

/// Registration data accumulated across wizard steps.
///
/// Merging is a shallow overwrite: a later step can replace a field but never
/// drops fields it does not mention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationDraft {
    fields: RegistrationFields,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, fields: RegistrationFields) {
        for (name, value) in fields {
            self.fields.insert(name, value);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &RegistrationFields {
        &self.fields
    }

    /// Empties the draft and returns what it held.
    pub fn take(&mut self) -> RegistrationDraft {
        std::mem::take(self)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl From<RegistrationFields> for RegistrationDraft {
    fn from(fields: RegistrationFields) -> Self {
        Self { fields }
    }
}
