//! Contact queries from the storefront form.

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use packline_shared::ContactForm;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use super::error::CatalogError;
use super::fields::search_term;
use super::resource::Resource;

/// A stored contact query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactQuery {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Ten digits, when given.
    pub phone: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated new contact query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

/// How the contact list is searched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactSearch {
    /// Digits matched against the phone number.
    Phone(String),
    /// Text matched against names, email and message, ignoring case.
    Text(String),
}

/// List filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    pub search: Option<ContactSearch>,
}

impl ContactFilter {
    /// Builds a filter from the `search` query parameter.
    #[must_use]
    pub fn from_search(raw: Option<&str>) -> Self {
        let search = search_term(raw).map(|term| {
            if term.chars().all(|c| c.is_ascii_digit()) {
                ContactSearch::Phone(term)
            } else {
                ContactSearch::Text(term)
            }
        });
        Self { search }
    }
}

impl Resource for ContactQuery {
    type Draft = ContactDraft;
    type Changes = Infallible;
    type Filter = ContactFilter;
    type Key = Infallible;

    fn id(&self) -> Uuid {
        self.id
    }

    fn draft_key(_: &ContactDraft) -> Option<Infallible> {
        None
    }

    fn changed_key(&self, changes: &Infallible) -> Option<Infallible> {
        match *changes {}
    }
}

/// Body of `POST /contacts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

impl ContactInput {
    /// Validate and normalize. Every field is optional; sent email and
    /// phone values must be well formed.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` for a malformed email or phone.
    pub fn into_draft(self) -> Result<ContactDraft, CatalogError> {
        let email = owned(self.email);
        if !email.is_empty() {
            check_email(&email)?;
        }

        let phone = match owned(self.phone) {
            phone if phone.is_empty() => None,
            phone => Some(check_phone(phone)?),
        };

        Ok(ContactDraft {
            first_name: owned(self.first_name),
            last_name: owned(self.last_name),
            email,
            phone,
            message: owned(self.message),
        })
    }
}

/// Body of `POST /admin/send`, forwarded to the shop inbox by mail.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// A [`ContactMessage`] that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactMessage {
    /// Validate. Name, email and message are required.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Invalid` for missing or malformed fields.
    pub fn validate(self) -> Result<ValidContactMessage, CatalogError> {
        let name = owned(self.name);
        let email = owned(self.email);
        let message = owned(self.message);
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(CatalogError::invalid("Name, email and message are required"));
        }
        check_email(&email)?;

        let phone = match owned(self.phone) {
            phone if phone.is_empty() => None,
            phone => Some(check_phone(phone)?),
        };

        Ok(ValidContactMessage {
            name,
            email,
            phone,
            message,
        })
    }
}

impl ValidContactMessage {
    /// Borrow as the mail payload.
    #[must_use]
    pub fn as_form(&self) -> ContactForm<'_> {
        ContactForm {
            name: &self.name,
            email: &self.email,
            phone: self.phone.as_deref(),
            message: &self.message,
        }
    }
}

fn owned(raw: Option<String>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

fn check_email(email: &str) -> Result<(), CatalogError> {
    // The mailbox check alone accepts dotless domains like `a@localhost`.
    let dotted_domain = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.') && !domain.ends_with('.'));

    if email.validate_email() && dotted_domain {
        Ok(())
    } else {
        Err(CatalogError::invalid("Invalid email format"))
    }
}

fn check_phone(phone: String) -> Result<String, CatalogError> {
    if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(phone)
    } else {
        Err(CatalogError::invalid("Phone number must be 10 digits"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_blank_input_is_accepted() {
        let draft = ContactInput::default().into_draft().unwrap();
        assert_eq!(draft.first_name, "");
        assert_eq!(draft.email, "");
        assert_eq!(draft.phone, None);
    }

    #[rstest]
    #[case("buyer@example.com", true)]
    #[case("buyer@example", false)]
    #[case("not-an-email", false)]
    #[case("two words@example.com", false)]
    fn test_email_rule(#[case] email: &str, #[case] ok: bool) {
        let input: ContactInput = serde_json::from_value(json!({"email": email})).unwrap();
        assert_eq!(input.into_draft().is_ok(), ok);
    }

    #[rstest]
    #[case("9876543210", true)]
    #[case("98765", false)]
    #[case("98765432101", false)]
    #[case("98765-4321", false)]
    fn test_phone_rule(#[case] phone: &str, #[case] ok: bool) {
        let input: ContactInput = serde_json::from_value(json!({"phone": phone})).unwrap();
        let result = input.into_draft();
        assert_eq!(result.is_ok(), ok);
        if let Err(err) = result {
            assert_eq!(err.to_string(), "Phone number must be 10 digits");
        }
    }

    #[test]
    fn test_search_classification() {
        assert_eq!(
            ContactFilter::from_search(Some(" 98765 ")).search,
            Some(ContactSearch::Phone("98765".into()))
        );
        assert_eq!(
            ContactFilter::from_search(Some("Mehta")).search,
            Some(ContactSearch::Text("Mehta".into()))
        );
        assert_eq!(ContactFilter::from_search(Some("  ")).search, None);
    }

    #[test]
    fn test_contact_message_requires_fields() {
        let msg: ContactMessage =
            serde_json::from_value(json!({"name": "Asha", "email": "asha@example.com"})).unwrap();
        assert!(msg.validate().is_err());

        let msg: ContactMessage = serde_json::from_value(json!({
            "name": "Asha",
            "email": "asha@example.com",
            "message": "Need 500 mailer boxes"
        }))
        .unwrap();
        let valid = msg.validate().unwrap();
        assert_eq!(valid.as_form().phone, None);
        assert_eq!(valid.as_form().name, "Asha");
    }
}
