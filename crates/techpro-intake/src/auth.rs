//! Shared-secret check for submissions.
//!
//! The secret is configured as an argon2 PHC string; the plaintext travels
//! in the submission's `secret` field.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::Error;

/// The expected secret, if the service requires one.
#[derive(Clone, Default)]
pub struct SecretConfig {
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub secret_hash: Option<String>,
}

impl SecretConfig {
  pub fn is_required(&self) -> bool { self.secret_hash.is_some() }
}

/// Accept `presented` if no secret is configured or it matches the hash.
pub fn verify_secret(presented: Option<&str>, config: &SecretConfig) -> Result<(), Error> {
  let Some(hash) = config.secret_hash.as_deref() else {
    return Ok(());
  };

  let presented = presented.ok_or(Error::Unauthorized)?;
  let parsed_hash = PasswordHash::new(hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(presented.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)
}

/// Produce the PHC string to put in `secret_hash`.
pub fn hash_secret(secret: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(secret.as_bytes(), &salt)?
      .to_string(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn config(secret: &str) -> SecretConfig {
    SecretConfig { secret_hash: Some(hash_secret(secret).unwrap()) }
  }

  #[test]
  fn no_secret_configured_accepts_anything() {
    let open = SecretConfig::default();
    assert!(!open.is_required());
    assert!(verify_secret(None, &open).is_ok());
    assert!(verify_secret(Some("whatever"), &open).is_ok());
  }

  #[test]
  fn correct_secret() {
    assert!(verify_secret(Some("s3cret"), &config("s3cret")).is_ok());
  }

  #[test]
  fn wrong_secret() {
    assert!(matches!(
      verify_secret(Some("nope"), &config("s3cret")),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn missing_secret() {
    assert!(matches!(
      verify_secret(None, &config("s3cret")),
      Err(Error::Unauthorized)
    ));
  }

  #[test]
  fn malformed_hash_rejects() {
    let broken = SecretConfig { secret_hash: Some("not-a-phc-string".into()) };
    assert!(matches!(
      verify_secret(Some("x"), &broken),
      Err(Error::Unauthorized)
    ));
  }
}
