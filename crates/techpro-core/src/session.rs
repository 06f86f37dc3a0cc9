//! Session gate: demo sign-in, registration and role checks.
//!
//! Credentials are stored and compared in plaintext, with no hashing and no
//! rate limiting. This is mock authentication for a demo site and must not
//! guard anything real.

use chrono::Utc;

use crate::{
  AuthError, Result,
  collection,
  kv::KvStore,
  model::{Role, Session, User},
  records::{RecordStore, SESSION_KEY, Users},
};

/// Proof that the caller holds an admin session. Only [`SessionGate`] can
/// produce one.
#[derive(Debug)]
pub struct AdminToken(());

impl AdminToken {
  pub(crate) fn new() -> Self { Self(()) }
}

/// Authentication state for one browser-profile equivalent.
///
/// The gate borrows the record store it reads users from and keeps the
/// active session in.
pub struct SessionGate<'a, K> {
  records: &'a RecordStore<K>,
}

impl<'a, K: KvStore> SessionGate<'a, K> {
  pub fn new(records: &'a RecordStore<K>) -> Self { Self { records } }

  /// Sign in with an exact email and password match.
  ///
  /// On failure the current session, if any, is left as it was.
  pub fn login(&self, email: &str, password: &str) -> Result<Session> {
    let users = self.records.list::<Users>();
    let user = users
      .iter()
      .find(|u| u.email == email && u.password == password)
      .ok_or(AuthError::InvalidCredentials)?;

    let session = Session::from(user);
    self.records.kv().write(SESSION_KEY, &session)?;
    tracing::info!(email, role = ?session.role, "signed in");
    Ok(session)
  }

  /// Create a `user` account and sign it in. The name is stored as given;
  /// an empty or missing one falls back to the email address.
  pub fn register(
    &self,
    email: &str,
    password: &str,
    name: Option<&str>,
  ) -> Result<Session> {
    let users = self.records.list::<Users>();
    if users.iter().any(|u| u.email == email) {
      return Err(AuthError::EmailExists.into());
    }

    let name = name.filter(|n| !n.is_empty()).unwrap_or(email);
    let user = User {
      id:       collection::next_id(&users, Utc::now()),
      email:    email.to_owned(),
      password: password.to_owned(),
      role:     Role::User,
      name:     name.to_owned(),
    };
    let session = Session::from(&user);

    self
      .records
      .replace_all::<Users>(&collection::append(users, user))?;
    self.records.kv().write(SESSION_KEY, &session)?;
    tracing::info!(email, id = %session.id, "registered");
    Ok(session)
  }

  pub fn logout(&self) -> Result<()> {
    self.records.kv().remove(SESSION_KEY)?;
    tracing::info!("signed out");
    Ok(())
  }

  pub fn current_session(&self) -> Option<Session> {
    self.records.kv().read(SESSION_KEY)
  }

  pub fn is_signed_in(&self) -> bool { self.current_session().is_some() }

  pub fn is_admin(&self) -> bool {
    self.current_session().is_some_and(|s| s.is_admin())
  }

  pub fn require_session(&self) -> Result<Session, AuthError> {
    self.current_session().ok_or(AuthError::SignInRequired)
  }

  pub fn require_admin(&self) -> Result<AdminToken, AuthError> {
    match self.current_session() {
      Some(s) if s.is_admin() => Ok(AdminToken::new()),
      Some(_) => Err(AuthError::AdminRequired),
      None => Err(AuthError::SignInRequired),
    }
  }
}
