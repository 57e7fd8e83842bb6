//! Cookie-backed storage.
//!
//! Each request gets one [`CookieJar`]: entries the client sent, plus the
//! mutations handlers make, emitted as `Set-Cookie` headers when the
//! response leaves. The jar is the [`StorageBackend`] the session store
//! writes through, so entry attributes (`Secure`, `SameSite`, max-age) map
//! one-to-one onto cookie attributes.
//!
//! Values are base64url-encoded on the wire: session records are JSON, and
//! raw JSON is not a valid cookie value.

use std::collections::HashMap;
use std::sync::Mutex;

use axum::extract::Request;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use facturo_session::{EntryAttributes, SameSite, StorageBackend};

#[derive(Debug, Clone)]
enum Mutation {
    Set { value: String, attrs: EntryAttributes },
    Remove,
}

/// Request-scoped cookie storage.
#[derive(Debug, Default)]
pub struct CookieJar {
    incoming: HashMap<String, String>,
    pending: Mutex<HashMap<String, Mutation>>,
}

impl CookieJar {
    /// Parse the request's `Cookie` headers. Unreadable pairs are skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut incoming = HashMap::new();

        for header in headers.get_all(COOKIE) {
            let Ok(header) = header.to_str() else {
                continue;
            };
            for pair in header.split(';') {
                let Some((name, value)) = pair.trim().split_once('=') else {
                    continue;
                };
                let Ok(decoded) = URL_SAFE_NO_PAD.decode(value) else {
                    continue;
                };
                let Ok(decoded) = String::from_utf8(decoded) else {
                    continue;
                };
                incoming.insert(name.to_string(), decoded);
            }
        }

        Self {
            incoming,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Append one `Set-Cookie` header per mutated entry.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        let Ok(pending) = self.pending.lock() else {
            return;
        };

        for (name, mutation) in pending.iter() {
            let cookie = match mutation {
                Mutation::Set { value, attrs } => {
                    format_set_cookie(name, &URL_SAFE_NO_PAD.encode(value), attrs)
                }
                Mutation::Remove => format_removal(name),
            };
            if let Ok(header) = HeaderValue::from_str(&cookie) {
                headers.append(SET_COOKIE, header);
            }
        }
    }
}

impl StorageBackend for CookieJar {
    // Mutations made earlier in the same request shadow what the client sent.
    fn get(&self, key: &str) -> Option<String> {
        if let Ok(pending) = self.pending.lock() {
            match pending.get(key) {
                Some(Mutation::Set { value, .. }) => return Some(value.clone()),
                Some(Mutation::Remove) => return None,
                None => {}
            }
        }
        self.incoming.get(key).cloned()
    }

    fn set(&self, key: &str, value: String, attrs: EntryAttributes) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(key.to_string(), Mutation::Set { value, attrs });
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(key.to_string(), Mutation::Remove);
        }
    }
}

fn format_set_cookie(name: &str, encoded: &str, attrs: &EntryAttributes) -> String {
    let mut cookie = format!(
        "{name}={encoded}; Max-Age={}; Path=/; HttpOnly; SameSite={}",
        attrs.max_age.num_seconds(),
        match attrs.same_site {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
        }
    );
    if attrs.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn format_removal(name: &str) -> String {
    format!("{name}=; Max-Age=0; Path=/; HttpOnly; SameSite=Lax")
}

/// Outermost middleware: builds the jar from the request, exposes it through
/// request extensions, and flushes its mutations onto the response.
pub async fn cookie_layer(mut req: Request, next: Next) -> Response {
    let jar = std::sync::Arc::new(CookieJar::from_headers(req.headers()));
    req.extensions_mut().insert(std::sync::Arc::clone(&jar));

    let mut res = next.run(req).await;
    jar.apply_to(res.headers_mut());
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn attrs(secure: bool) -> EntryAttributes {
        EntryAttributes {
            max_age: Duration::days(7),
            secure,
            same_site: SameSite::Lax,
        }
    }

    fn jar_from(cookie_header: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie_header).unwrap());
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn round_trips_a_written_entry_through_headers() {
        let jar = CookieJar::default();
        jar.set("facturo_access_token", "tok-1".to_string(), attrs(true));

        let mut headers = HeaderMap::new();
        jar.apply_to(&mut headers);

        let set_cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        let encoded = URL_SAFE_NO_PAD.encode("tok-1");
        assert!(set_cookie.starts_with(&format!("facturo_access_token={encoded}")));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Secure"));

        // And back in through a request header.
        let jar = jar_from(&format!("facturo_access_token={encoded}"));
        assert_eq!(jar.get("facturo_access_token").as_deref(), Some("tok-1"));
    }

    #[test]
    fn insecure_mode_drops_only_the_secure_attribute() {
        let jar = CookieJar::default();
        jar.set("k", "v".to_string(), attrs(false));

        let mut headers = HeaderMap::new();
        jar.apply_to(&mut headers);

        let set_cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(!set_cookie.contains("Secure"));
        assert!(set_cookie.contains("HttpOnly"));
    }

    #[test]
    fn same_request_mutations_shadow_incoming_values() {
        let encoded = URL_SAFE_NO_PAD.encode("old");
        let jar = jar_from(&format!("k={encoded}"));

        assert_eq!(jar.get("k").as_deref(), Some("old"));
        jar.set("k", "new".to_string(), attrs(true));
        assert_eq!(jar.get("k").as_deref(), Some("new"));
        jar.remove("k");
        assert_eq!(jar.get("k"), None);
    }

    #[test]
    fn removal_emits_an_expiring_cookie() {
        let jar = CookieJar::default();
        jar.remove("facturo_user_role");

        let mut headers = HeaderMap::new();
        jar.apply_to(&mut headers);

        let set_cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("facturo_user_role=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[test]
    fn undecodable_cookie_values_read_as_absent() {
        let jar = jar_from("k=%%%not-base64%%%");
        assert_eq!(jar.get("k"), None);
    }
}
