//! Correlation identifier carried by every request.
//!
//! The identifier lives in Tokio task-local storage for the duration of a
//! request, so error constructors and log lines deep inside services can pick
//! it up. Task-locals do not follow `tokio::spawn`; wrap spawned futures in
//! [`TraceId::scope`] to carry it across.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying one request across logs, error bodies, and the
/// `trace-id` response header.
///
/// # Examples
/// ```
/// use civic_complaints::TraceId;
///
/// fn log_context() -> String {
///     TraceId::current().map_or_else(|| "-".to_owned(), |id| id.to_string())
/// }
/// # assert_eq!(log_context(), "-");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Identifier supplied by a caller in a request header.
    ///
    /// Surrounding whitespace is ignored. The nil UUID is refused so clients
    /// cannot collapse unrelated requests onto one identifier.
    #[must_use]
    pub fn from_header(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<Self>()
            .ok()
            .filter(|id| !id.0.is_nil())
    }

    /// Identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current identifier.
    ///
    /// # Examples
    /// ```
    /// use civic_complaints::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let id = TraceId::generate();
    /// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    /// # });
    /// ```
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(" 7d3f0c52-8f0e-4f5e-9b44-1c1f3f0d9a10 ", true)]
    #[case("7D3F0C52-8F0E-4F5E-9B44-1C1F3F0D9A10", true)]
    #[case("00000000-0000-0000-0000-000000000000", false)]
    #[case("request-42", false)]
    #[case("", false)]
    fn header_values_are_screened(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(TraceId::from_header(raw).is_some(), accepted);
    }

    #[rstest]
    fn display_is_lowercase_hyphenated() {
        let id = TraceId::from_header("7D3F0C52-8F0E-4F5E-9B44-1C1F3F0D9A10").expect("valid");
        assert_eq!(id.to_string(), "7d3f0c52-8f0e-4f5e-9b44-1c1f3f0d9a10");
    }

    #[tokio::test]
    async fn scope_is_visible_only_inside() {
        let id = TraceId::generate();
        assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn nested_scopes_shadow_outer_identifier() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();
        let seen = TraceId::scope(outer, async move {
            let nested = TraceId::scope(inner, async { TraceId::current() }).await;
            (nested, TraceId::current())
        })
        .await;
        assert_eq!(seen, (Some(inner), Some(outer)));
    }
}
