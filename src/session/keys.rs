//! Cookie key ring with rotation support.
//!
//! Each secret is stretched to a 64-byte key with SHA-512 and used for the
//! cookie crate's private (AES-256-GCM, authenticated) jar. The first key
//! seals new cookies; every key is tried when opening one, so secrets can be
//! rotated by prepending the new secret and keeping the old one around until
//! outstanding cookies expire.

use sha2::{Digest, Sha512};
use tower_cookies::cookie::CookieJar;
use tower_cookies::{Cookie, Key};

use crate::session::SessionError;

/// Ordered, non-empty list of cookie keys.
#[derive(Clone)]
pub struct KeyRing {
    keys: Vec<Key>,
}

/// A cookie successfully opened by the key ring.
#[derive(Debug)]
pub struct Opened {
    /// The decrypted cookie.
    pub cookie: Cookie<'static>,
    /// Position of the key that opened it (0 = primary).
    pub key_index: usize,
}

impl Opened {
    /// True when the cookie was sealed with a rotated-out key and should be
    /// re-issued under the primary key.
    pub fn needs_reseal(&self) -> bool {
        self.key_index > 0
    }
}

impl KeyRing {
    /// Derive keys from secrets, newest first. Empty secrets are skipped.
    pub fn from_secrets<S: AsRef<str>>(secrets: &[S]) -> Result<Self, SessionError> {
        let keys: Vec<Key> = secrets
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.is_empty())
            .map(derive_key)
            .collect();

        if keys.is_empty() {
            return Err(SessionError::NoKeys);
        }
        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Encrypt `cookie` with the primary key. Attributes are preserved.
    pub fn seal(&self, cookie: Cookie<'static>) -> Option<Cookie<'static>> {
        let name = cookie.name().to_string();
        let mut jar = CookieJar::new();
        jar.private_mut(&self.keys[0]).add(cookie);
        jar.get(&name).cloned()
    }

    /// Decrypt and authenticate `sealed` against each key in order.
    pub fn open(&self, sealed: &Cookie<'_>) -> Option<Opened> {
        let sealed = sealed.clone().into_owned();
        let jar = CookieJar::new();
        self.keys.iter().enumerate().find_map(|(key_index, key)| {
            jar.private(key)
                .decrypt(sealed.clone())
                .map(|cookie| Opened { cookie, key_index })
        })
    }
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRing").field("keys", &self.keys.len()).finish()
    }
}

fn derive_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(value: &str) -> Cookie<'static> {
        Cookie::build(("session", value.to_string())).path("/").build()
    }

    #[test]
    fn test_rejects_empty_secret_list() {
        assert!(matches!(
            KeyRing::from_secrets::<&str>(&[]),
            Err(SessionError::NoKeys)
        ));
        assert!(matches!(
            KeyRing::from_secrets(&["", ""]),
            Err(SessionError::NoKeys)
        ));
    }

    #[test]
    fn test_seal_hides_value_and_keeps_attributes() {
        let ring = KeyRing::from_secrets(&["primary"]).unwrap();
        let sealed = ring.seal(cookie("user=42")).unwrap();

        assert_ne!(sealed.value(), "user=42");
        assert_eq!(sealed.path(), Some("/"));

        let opened = ring.open(&sealed).unwrap();
        assert_eq!(opened.cookie.value(), "user=42");
        assert!(!opened.needs_reseal());
    }

    #[test]
    fn test_rotated_key_still_opens() {
        let old = KeyRing::from_secrets(&["old-secret"]).unwrap();
        let sealed = old.seal(cookie("payload")).unwrap();

        let rotated = KeyRing::from_secrets(&["new-secret", "old-secret"]).unwrap();
        let opened = rotated.open(&sealed).unwrap();
        assert_eq!(opened.cookie.value(), "payload");
        assert_eq!(opened.key_index, 1);
        assert!(opened.needs_reseal());
    }

    #[test]
    fn test_unknown_key_and_tampering_fail() {
        let ring = KeyRing::from_secrets(&["primary"]).unwrap();
        let other = KeyRing::from_secrets(&["someone-else"]).unwrap();
        let sealed = other.seal(cookie("payload")).unwrap();
        assert!(ring.open(&sealed).is_none());

        let mut tampered = ring.seal(cookie("payload")).unwrap();
        let mut value = tampered.value().to_string();
        value.replace_range(0..1, if value.starts_with('A') { "B" } else { "A" });
        tampered.set_value(value);
        assert!(ring.open(&tampered).is_none());

        assert!(ring.open(&cookie("plaintext")).is_none());
    }

    #[test]
    fn test_cookie_name_is_authenticated() {
        let ring = KeyRing::from_secrets(&["primary"]).unwrap();
        let sealed = ring.seal(cookie("payload")).unwrap();
        let renamed = Cookie::new("other", sealed.value().to_string());
        assert!(ring.open(&renamed).is_none());
    }

    #[test]
    fn test_opens_cookie_borrowed_from_header() {
        let ring = KeyRing::from_secrets(&["primary"]).unwrap();
        let sealed = ring.seal(cookie("payload")).unwrap();
        let header = format!("{}={}", sealed.name(), sealed.value());

        let parsed = Cookie::parse(header.as_str()).unwrap();
        let opened = ring.open(&parsed).unwrap();
        drop(parsed);
        assert_eq!(opened.cookie.value(), "payload");
    }
}
