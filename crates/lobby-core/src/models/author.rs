use serde::{Deserialize, Serialize};
use std::fmt;

/// Key pair identifying the local author.
///
/// Owned by the identity layer; this crate only ever reads it back.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorKeypair {
    pub address: String,
    pub secret: String,
}

impl AuthorKeypair {
    /// The `suzy` in `@suzy.b...`
    pub fn shortname(&self) -> Option<&str> {
        self.address
            .strip_prefix('@')
            .and_then(|rest| rest.split_once('.'))
            .map(|(shortname, _)| shortname)
    }
}

// Keep the secret out of logs
impl fmt::Debug for AuthorKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorKeypair")
            .field("address", &self.address)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Identity validation capability.
pub trait KeypairValidator: Send + Sync {
    fn is_valid_keypair(&self, keypair: &AuthorKeypair) -> bool;
}

/// Syntactic check of the `@<shortname>.b<base32 pubkey>` address and the
/// `b<base32>` secret. Does not verify that the secret matches the address.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeValidator;

const SHORTNAME_LEN: usize = 4;
const KEY_BODY_LEN: usize = 52;

fn is_b32_key(s: &str) -> bool {
    match s.strip_prefix('b') {
        Some(body) => {
            body.len() == KEY_BODY_LEN
                && body
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || ('2'..='7').contains(&c))
        }
        None => false,
    }
}

fn is_shortname(s: &str) -> bool {
    let mut chars = s.chars();
    s.len() == SHORTNAME_LEN
        && chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

impl KeypairValidator for ShapeValidator {
    fn is_valid_keypair(&self, keypair: &AuthorKeypair) -> bool {
        let Some(rest) = keypair.address.strip_prefix('@') else {
            return false;
        };
        let Some((shortname, pubkey)) = rest.split_once('.') else {
            return false;
        };
        is_shortname(shortname) && is_b32_key(pubkey) && is_b32_key(&keypair.secret)
    }
}

impl<F> KeypairValidator for F
where
    F: Fn(&AuthorKeypair) -> bool + Send + Sync,
{
    fn is_valid_keypair(&self, keypair: &AuthorKeypair) -> bool {
        self(keypair)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_validator_accepts_well_formed_pair() {
        assert!(ShapeValidator.is_valid_keypair(&fixtures::keypair()));
    }

    #[test]
    fn test_shape_validator_rejects_bad_addresses() {
        let good = fixtures::keypair();
        let body = "a".repeat(52);

        for address in [
            format!("suzy.b{}", body),   // missing sigil
            format!("@suzy{}", body),    // missing dot
            format!("@Suzy.b{}", body),  // uppercase shortname
            format!("@1uzy.b{}", body),  // leading digit
            format!("@suzyq.b{}", body), // shortname too long
            format!("@suzy.b{}", &body[1..]),
            format!("@suzy.x{}", body),
        ] {
            let kp = AuthorKeypair {
                address,
                secret: good.secret.clone(),
            };
            assert!(!ShapeValidator.is_valid_keypair(&kp), "{:?}", kp.address);
        }
    }

    #[test]
    fn test_shape_validator_rejects_bad_secret() {
        let mut kp = fixtures::keypair();
        kp.secret = format!("b{}", "1".repeat(52));
        assert!(!ShapeValidator.is_valid_keypair(&kp));
    }

    #[test]
    fn test_closure_validator() {
        let accept_all = |_: &AuthorKeypair| true;
        let kp = AuthorKeypair {
            address: "anything".into(),
            secret: "anything".into(),
        };
        assert!(accept_all.is_valid_keypair(&kp));
    }

    #[test]
    fn test_shortname_and_redacted_debug() {
        let kp = fixtures::keypair();
        assert_eq!(kp.shortname(), Some("suzy"));
        assert!(!format!("{:?}", kp).contains(&kp.secret));
    }
}
