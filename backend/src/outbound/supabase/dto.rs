//! DTOs for Supabase auth payloads.
//!
//! The adapters decode into these transport DTOs first, then map into domain
//! records in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::{AccessToken, AccountId, Identity};

#[derive(Debug, Serialize)]
pub(super) struct PasswordCredentialsDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
}

impl AuthUserDto {
    pub(super) fn into_identity(self) -> Result<Identity, String> {
        let id = AccountId::new(self.id).map_err(|err| format!("auth user id: {err}"))?;
        Ok(Identity {
            id,
            email: self.email,
        })
    }
}

/// Sign-up answers with a bare user when email confirmation is pending and
/// with a session wrapping the user otherwise.
///
/// Untagged variants are tried in order. `User` comes first because the
/// session shape's optional `user` would otherwise match any object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum SignUpResponseDto {
    User(AuthUserDto),
    Session { user: Option<AuthUserDto> },
}

impl SignUpResponseDto {
    pub(super) fn into_user(self) -> Option<AuthUserDto> {
        match self {
            Self::Session { user } => user,
            Self::User(user) => Some(user),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    #[serde(default)]
    pub(super) access_token: Option<String>,
    #[serde(default)]
    pub(super) user: Option<AuthUserDto>,
}

impl TokenResponseDto {
    pub(super) fn into_parts(self) -> Result<(Option<Identity>, Option<AccessToken>), String> {
        let identity = self.user.map(AuthUserDto::into_identity).transpose()?;
        let token = self
            .access_token
            .filter(|token| !token.is_empty())
            .map(AccessToken::new);
        Ok((identity, token))
    }
}

/// Error bodies from GoTrue and PostgREST use different keys for the
/// human-readable text.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBodyDto {
    pub(super) fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
    }
}
