//! Command handlers. Each returns the text to print.

use std::{fmt::Write as _, path::Path};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use techpro_core::{
  RecordStore, SessionGate,
  export::ExportFormat,
  kv::KvStore,
  model::{Project, ProjectDraft, RecordId},
  records::{Contacts, Projects},
  submission::{ClientInfo, Courier, Inquiry, Outcome, SubmissionPipeline},
};

/// Everything a command needs: the local records and the delivery setup.
pub struct App<K, C> {
  pub records: RecordStore<K>,
  pub courier: Option<C>,
  pub client:  ClientInfo,
}

impl<K: KvStore, C: Courier> App<K, C> {
  /// Wrap `records`, seeding any missing collections.
  pub fn new(records: RecordStore<K>, courier: Option<C>, client: ClientInfo) -> Result<Self> {
    records.ensure_seeded().context("seeding local store")?;
    Ok(Self { records, courier, client })
  }

  fn gate(&self) -> SessionGate<'_, K> { SessionGate::new(&self.records) }

  // ── Projects ──────────────────────────────────────────────────────────────

  pub fn projects(&self, tag: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tags: {}", self.records.project_tags().join(", "));
    let projects = self.records.projects_tagged(tag);
    if projects.is_empty() {
      out.push_str("No projects.\n");
    }
    for p in projects {
      let _ = writeln!(out, "{:>14}  {}  [{}]", p.id, p.title, p.tags.join(", "));
    }
    out
  }

  pub fn project_show(&self, id: RecordId) -> Result<String> {
    let p = self
      .records
      .find_by_id::<Projects>(id)
      .with_context(|| format!("no project with id {id}"))?;
    Ok(describe(&p))
  }

  pub fn project_deck(&self, id: RecordId) -> Result<String> {
    let session = self.gate().require_session()?;
    let deck = self.records.deck_url(&session, id)?;
    Ok(deck.unwrap_or_else(|| "No PPT available".to_string()))
  }

  pub fn project_save(&self, id: Option<RecordId>, draft: ProjectDraft) -> Result<String> {
    let admin = self.gate().require_admin()?;
    let saved = self.records.save_project(&admin, id, draft)?;
    Ok(format!("Saved project {} ({})", saved.id, saved.title))
  }

  pub fn project_delete(&self, id: RecordId) -> Result<String> {
    let admin = self.gate().require_admin()?;
    if self.records.delete_project(&admin, id)? {
      Ok(format!("Deleted project {id}"))
    } else {
      anyhow::bail!("no project with id {id}")
    }
  }

  // ── Session ───────────────────────────────────────────────────────────────

  pub fn login(&self, email: &str, password: &str) -> Result<String> {
    let session = self.gate().login(email, password)?;
    Ok(format!("Signed in as {} ({:?})", session.name, session.role))
  }

  pub fn register(&self, email: &str, password: &str, name: Option<&str>) -> Result<String> {
    let session = self.gate().register(email, password, name)?;
    Ok(format!("Registered and signed in as {}", session.name))
  }

  pub fn logout(&self) -> Result<String> {
    self.gate().logout()?;
    Ok("Signed out".to_string())
  }

  pub fn whoami(&self) -> String {
    match self.gate().current_session() {
      Some(s) => format!("{} <{}> ({:?})", s.name, s.email, s.role),
      None => "Not signed in".to_string(),
    }
  }

  // ── Contacts ──────────────────────────────────────────────────────────────

  pub async fn contact(&self, inquiry: Inquiry) -> Result<Outcome> {
    let pipeline =
      SubmissionPipeline::new(&self.records, self.courier.as_ref(), self.client.clone());
    Ok(pipeline.submit(inquiry).await?)
  }

  pub fn contacts_list(&self) -> Result<String> {
    self.gate().require_admin()?;
    let contacts = self.records.list::<Contacts>();
    let mut out = format!("Submissions ({})\n", contacts.len());
    if contacts.is_empty() {
      out.push_str("No submissions\n");
    }
    for c in contacts {
      let _ = writeln!(out, "{}  {}  {}  {}", c.created, c.name, c.details, c.message);
    }
    Ok(out)
  }

  pub fn contacts_export(
    &self,
    format: ExportFormat,
    out_dir: &Path,
    now: DateTime<Utc>,
  ) -> Result<String> {
    let admin = self.gate().require_admin()?;
    let file = self.records.export(&admin, format, now)?;
    let path = out_dir.join(&file.file_name);
    std::fs::write(&path, &file.body)
      .with_context(|| format!("writing {}", path.display()))?;
    Ok(format!("Wrote {}", path.display()))
  }
}

fn describe(p: &Project) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} (#{})", p.title, p.id);
  let _ = writeln!(out, "{}", p.summary);
  let _ = writeln!(out, "Algorithm: {}", p.algo);
  let _ = writeln!(out, "Tech:      {}", p.tech);
  let _ = writeln!(out, "Tags:      {}", p.tags.join(", "));
  let _ = writeln!(
    out,
    "Demo:      {}",
    p.video.as_deref().unwrap_or("No demo")
  );
  let _ = writeln!(
    out,
    "Slides:    {}",
    if p.ppt.is_some() { "available (sign in to view)" } else { "none" }
  );
  out
}
