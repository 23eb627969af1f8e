use delegation_core::PrincipalId;
use ed25519_dalek::SigningKey;

use crate::encoding::b64url_encode;

/// An Ed25519 keypair plus the principal id it mints. The private key is
/// never serialized by this type — there is deliberately no `Serialize` impl.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
    pub principal: PrincipalId,
    pub name: Option<String>,
}

impl Keypair {
    /// Derives a `Keypair` from an existing 32-byte private key, e.g. when
    /// restoring from a secret store. Callers are responsible for the key's
    /// provenance — this never reads or writes external state.
    pub fn from_private_key(private_key: [u8; 32], name: Option<String>) -> Self {
        let signing_key = SigningKey::from_bytes(&private_key);
        let principal = PrincipalId(b64url_encode(signing_key.verifying_key().to_bytes()));
        Self {
            signing_key,
            principal,
            name,
        }
    }

    pub fn private_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

/// Generates a uniformly random keypair and derives its principal id.
pub fn generate_keypair(name: Option<String>) -> Keypair {
    let mut csprng = rand::rngs::OsRng;
    let signing_key = SigningKey::generate(&mut csprng);
    let principal = PrincipalId(b64url_encode(signing_key.verifying_key().to_bytes()));
    Keypair {
        signing_key,
        principal,
        name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_is_43_chars() {
        let kp = generate_keypair(None);
        assert_eq!(kp.principal.as_str().len(), 43);
    }

    #[test]
    fn distinct_keypairs_have_distinct_principals() {
        let a = generate_keypair(None);
        let b = generate_keypair(None);
        assert_ne!(a.principal, b.principal);
    }

    #[test]
    fn round_trips_through_private_key_bytes() {
        let kp = generate_keypair(Some("agent-1".into()));
        let restored = Keypair::from_private_key(kp.private_key_bytes(), kp.name.clone());
        assert_eq!(kp.principal, restored.principal);
    }
}
