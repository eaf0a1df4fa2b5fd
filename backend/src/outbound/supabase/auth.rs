//! Supabase auth (GoTrue) adapter for the identity provider port.

use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::client::{
    SupabaseClient, TransportFailure, body_preview, map_status, map_transport_error,
};
use super::dto::{
    AuthUserDto, ErrorBodyDto, PasswordCredentialsDto, SignUpResponseDto, TokenResponseDto,
};
use crate::domain::ports::{IdentityProvider, IdentityProviderError, SignInSession};
use crate::domain::{Identity, LoginCredentials};

const SIGN_UP_PATH: &str = "auth/v1/signup";
const TOKEN_PATH: &str = "auth/v1/token";

/// Identity provider backed by a Supabase project's auth service.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: SupabaseClient,
}

impl SupabaseAuth {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn post_credentials<T: DeserializeOwned>(
        &self,
        url: reqwest::Url,
        credentials: &LoginCredentials,
    ) -> Result<T, IdentityProviderError> {
        let body = PasswordCredentialsDto {
            email: credentials.email(),
            password: credentials.password(),
        };
        let response = self
            .client
            .request(Method::POST, url)
            .json(&body)
            .send()
            .await
            .map_err(|err| map_failure(map_transport_error(err)))?;
        decode_response(response).await
    }
}

async fn decode_response<T: DeserializeOwned>(
    response: Response,
) -> Result<T, IdentityProviderError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| map_failure(map_transport_error(err)))?;
    if !status.is_success() {
        return Err(map_failure(map_status(status, &error_message(&body))));
    }
    serde_json::from_slice(&body).map_err(|err| {
        IdentityProviderError::decode(format!("invalid auth payload: {err}"))
    })
}

/// Best message from an auth error body, falling back to a raw preview.
pub(super) fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBodyDto>(body)
        .ok()
        .and_then(ErrorBodyDto::into_message)
        .unwrap_or_else(|| body_preview(body))
}

fn map_failure(failure: TransportFailure) -> IdentityProviderError {
    match failure {
        TransportFailure::Rejected(message) => IdentityProviderError::rejected(message),
        TransportFailure::Connection(message) | TransportFailure::Server(message) => {
            IdentityProviderError::connection(message)
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn sign_up(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Identity>, IdentityProviderError> {
        let url = self.client.endpoint(SIGN_UP_PATH);
        let decoded: SignUpResponseDto = self.post_credentials(url, credentials).await?;
        let identity = decoded
            .into_user()
            .map(AuthUserDto::into_identity)
            .transpose()
            .map_err(IdentityProviderError::decode)?;
        debug!(returned_identity = identity.is_some(), "supabase sign-up");
        Ok(identity)
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SignInSession, IdentityProviderError> {
        let mut url = self.client.endpoint(TOKEN_PATH);
        url.query_pairs_mut().append_pair("grant_type", "password");
        let decoded: TokenResponseDto = self.post_credentials(url, credentials).await?;
        let (identity, access_token) = decoded
            .into_parts()
            .map_err(IdentityProviderError::decode)?;
        debug!(
            returned_identity = identity.is_some(),
            returned_token = access_token.is_some(),
            "supabase sign-in"
        );
        Ok(SignInSession {
            identity,
            access_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TransportFailure::Rejected("status 400: Invalid login credentials".into()), "Rejected")]
    #[case(TransportFailure::Connection("timed out".into()), "Connection")]
    #[case(TransportFailure::Server("status 500".into()), "Connection")]
    fn failures_map_to_identity_errors(#[case] failure: TransportFailure, #[case] expected: &str) {
        let actual = match map_failure(failure) {
            IdentityProviderError::Rejected { .. } => "Rejected",
            IdentityProviderError::Connection { .. } => "Connection",
            IdentityProviderError::Decode { .. } => "Decode",
        };
        assert_eq!(actual, expected);
    }

    #[rstest]
    fn error_message_reads_gotrue_fields() {
        let body =
            br#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
        assert_eq!(error_message(body), "Invalid login credentials");
    }

    #[rstest]
    fn error_message_falls_back_to_body_preview() {
        assert_eq!(error_message(b"<html>  bad gateway </html>"), "<html> bad gateway </html>");
    }
}
