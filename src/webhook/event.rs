use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::store::{NewUser, UserUpdate};

/// Raw webhook envelope: an event type tag plus a type-dependent data object
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: Value,
}

#[derive(Debug, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// Payload of a `user.created` event
#[derive(Debug, Deserialize)]
pub struct UserCreatedData {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Payload of a `user.updated` event
#[derive(Debug, Deserialize)]
pub struct UserUpdatedData {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Payload of a `user.deleted` event
#[derive(Debug, Deserialize)]
pub struct UserDeletedData {
    pub id: String,
}

/// A verified webhook event, decoded into a closed set of variants.
///
/// Event types outside the handled set land in [`Other`](Self::Other) rather
/// than being an error; the handler acknowledges them without side effects.
#[derive(Debug)]
pub enum UserEvent {
    Created(UserCreatedData),
    Updated(UserUpdatedData),
    Deleted(UserDeletedData),
    Other(String),
}

impl UserEvent {
    /// Decode a verified request body into a typed event
    pub fn parse(body: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        Self::from_envelope(envelope)
    }

    pub fn from_envelope(envelope: Envelope) -> Result<Self> {
        match envelope.kind.as_str() {
            "user.created" => Ok(Self::Created(serde_json::from_value(envelope.data)?)),
            "user.updated" => Ok(Self::Updated(serde_json::from_value(envelope.data)?)),
            "user.deleted" => Ok(Self::Deleted(serde_json::from_value(envelope.data)?)),
            _ => Ok(Self::Other(envelope.kind)),
        }
    }

    /// The event type tag, for logging
    pub fn kind(&self) -> &str {
        match self {
            Self::Created(_) => "user.created",
            Self::Updated(_) => "user.updated",
            Self::Deleted(_) => "user.deleted",
            Self::Other(kind) => kind,
        }
    }
}

impl UserCreatedData {
    /// Build the record handed to the store.
    ///
    /// The first email address wins. Clerk delivers at least one address and a
    /// username for created users, but payloads missing either are rejected
    /// as malformed instead of trusted. Missing names default to `""`.
    pub fn into_new_user(self) -> Result<NewUser> {
        let email = self
            .email_addresses
            .into_iter()
            .next()
            .map(|e| e.email_address)
            .ok_or_else(|| SyncError::malformed_payload("user.created without email addresses"))?;

        let username = self
            .username
            .ok_or_else(|| SyncError::malformed_payload("user.created without username"))?;

        Ok(NewUser {
            clerk_id: self.id,
            email,
            username,
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            photo: self.image_url.unwrap_or_default(),
        })
    }
}

impl UserUpdatedData {
    /// Split into the target Clerk id and the partial record to apply
    pub fn into_update(self) -> Result<(String, UserUpdate)> {
        let username = self
            .username
            .ok_or_else(|| SyncError::malformed_payload("user.updated without username"))?;

        Ok((
            self.id,
            UserUpdate {
                first_name: self.first_name.unwrap_or_default(),
                last_name: self.last_name.unwrap_or_default(),
                username,
                photo: self.image_url.unwrap_or_default(),
            },
        ))
    }
}
