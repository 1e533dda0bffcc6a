use acta_crypto::ToyKeypair;
use tracing::debug;

use crate::error::{SdkError, SdkResult};

/// State held for the length of one interactive session.
///
/// A session owns at most one toy keypair. It is never serialized; the only
/// trace it can leave in a store is its public key, copied into the `voter`
/// field of votes cast through [`crate::Acta::cast_vote_as`].
#[derive(Debug, Default)]
pub struct Session {
    keypair: Option<ToyKeypair>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh keypair, replacing any previous one.
    pub fn generate_keypair(&mut self) -> &ToyKeypair {
        let keypair = ToyKeypair::generate();
        debug!(public = %keypair.public_key().short_hex(), "session keypair generated");
        self.keypair.insert(keypair)
    }

    /// Adopt a keypair rebuilt from a known private key.
    pub fn restore_keypair(&mut self, private_hex: &str) -> SdkResult<&ToyKeypair> {
        let keypair = ToyKeypair::from_private_hex(private_hex)?;
        Ok(&*self.keypair.insert(keypair))
    }

    pub fn keypair(&self) -> Option<&ToyKeypair> {
        self.keypair.as_ref()
    }

    /// The public key to record as voter, if a keypair exists.
    pub fn voter(&self) -> Option<String> {
        self.keypair.as_ref().map(ToyKeypair::public_hex)
    }

    /// Like [`Session::voter`], but an absent keypair is an error.
    pub fn require_voter(&self) -> SdkResult<String> {
        self.voter().ok_or(SdkError::NoSessionKey)
    }

    /// Drop the keypair.
    pub fn forget(&mut self) {
        self.keypair = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_no_identity() {
        let session = Session::new();
        assert!(session.keypair().is_none());
        assert!(session.voter().is_none());
        assert!(matches!(session.require_voter(), Err(SdkError::NoSessionKey)));
    }

    #[test]
    fn generate_replaces_previous_keypair() {
        let mut session = Session::new();
        let first = session.generate_keypair().clone();
        let second = session.generate_keypair().clone();
        assert_ne!(first, second);
        assert_eq!(session.keypair(), Some(&second));
        assert_eq!(session.voter(), Some(second.public_hex()));
    }

    #[test]
    fn restore_rebuilds_public_key() {
        let original = ToyKeypair::generate();
        let mut session = Session::new();
        session.restore_keypair(original.private_hex()).unwrap();
        assert_eq!(session.voter(), Some(original.public_hex()));
    }

    #[test]
    fn restore_rejects_garbage() {
        let mut session = Session::new();
        assert!(matches!(
            session.restore_keypair("nope"),
            Err(SdkError::Key(_))
        ));
        assert!(session.keypair().is_none());
    }

    #[test]
    fn forget_clears_identity() {
        let mut session = Session::new();
        session.generate_keypair();
        session.forget();
        assert!(session.voter().is_none());
    }
}
