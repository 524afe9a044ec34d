#[cfg(feature = "web")]
use axum_extra::extract::cookie::{Cookie, CookieJar};
use uuid::Uuid;

/// Name of the cookie carrying the identity token
pub const IDENTITY_COOKIE: &str = "userid";

/// Outcome of resolving a client's identity
///
/// When `is_new` is set the caller owes the client an identity cookie,
/// see [`identity_cookie`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// The identity token, either the client's or a freshly generated one
    pub identity: String,

    /// Whether the token was generated for this request
    pub is_new: bool,
}

/// Resolve the identity for a request from its cookie value
///
/// A present, non-blank value is returned unchanged. Anything else gets a new
/// random v4 UUID.
///
/// # Arguments
/// * `existing` - Value of the identity cookie, if the client sent one
///
/// # Returns
/// * `ResolvedIdentity` - The identity and whether it was just generated
///
/// # Examples
/// ```
/// use farmweb::identity::resolve_identity;
///
/// let known = resolve_identity(Some("abc"));
/// assert_eq!(known.identity, "abc");
/// assert!(!known.is_new);
///
/// let fresh = resolve_identity(None);
/// assert!(fresh.is_new);
/// ```
pub fn resolve_identity(existing: Option<&str>) -> ResolvedIdentity {
    match existing {
        Some(value) if !value.trim().is_empty() => ResolvedIdentity {
            identity: value.to_string(),
            is_new: false,
        },
        _ => ResolvedIdentity {
            identity: Uuid::new_v4().to_string(),
            is_new: true,
        },
    }
}

/// Build the identity cookie, scoped to the site root with no expiry
#[cfg(feature = "web")]
pub fn identity_cookie(identity: &str) -> Cookie<'static> {
    Cookie::build((IDENTITY_COOKIE, identity.to_string()))
        .path("/")
        .build()
}

/// Resolve the identity carried by a cookie jar
///
/// When a new identity is generated, the returned jar also holds the cookie
/// for it. Handlers return that jar alongside their response so the client
/// keeps the identity on later requests.
///
/// # Arguments
/// * `jar` - Cookie jar extracted from the request
///
/// # Returns
/// * `(CookieJar, ResolvedIdentity)` - Jar to send back and the resolved identity
#[cfg(feature = "web")]
pub fn identify(jar: CookieJar) -> (CookieJar, ResolvedIdentity) {
    let resolved = resolve_identity(jar.get(IDENTITY_COOKIE).map(|cookie| cookie.value()));

    if resolved.is_new {
        log::debug!("Issuing new identity {}", resolved.identity);
        (jar.add(identity_cookie(&resolved.identity)), resolved)
    } else {
        (jar, resolved)
    }
}

/// Identity of a client that must already have one
///
/// Actions that modify a list never mint identities; they need the cookie
/// set by an earlier page load.
#[cfg(feature = "web")]
pub fn existing_identity(jar: &CookieJar) -> Option<String> {
    jar.get(IDENTITY_COOKIE)
        .map(|cookie| cookie.value())
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}
