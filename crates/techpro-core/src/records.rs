//! [`RecordStore`]: typed collections over the persistence adapter.
//!
//! Every mutation is read → transform → [`RecordStore::replace_all`]. The
//! cycle is not atomic; the last writer wins.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
  Error, Result,
  collection,
  export::{ExportFile, ExportFormat},
  kv::{JsonKv, KvStore},
  model::{ContactSubmission, Identified, Project, ProjectDraft, RecordId, Session, User},
  seed,
  session::AdminToken,
};

// ─── Collections ─────────────────────────────────────────────────────────────

/// Storage key of the signed-in session record.
pub const SESSION_KEY: &str = "il_sess_v2";

/// A named, fully-replaceable list of records stored under a fixed key.
pub trait Collection {
  const KEY: &'static str;
  type Record: Identified + Clone + Serialize + DeserializeOwned;

  /// Contents written when the collection is absent.
  fn seed() -> Vec<Self::Record>;
}

pub struct Projects;
pub struct Users;
pub struct Contacts;

impl Collection for Projects {
  const KEY: &'static str = "il_proj_v2";
  type Record = Project;

  fn seed() -> Vec<Project> { seed::projects() }
}

impl Collection for Users {
  const KEY: &'static str = "il_users_v2";
  type Record = User;

  fn seed() -> Vec<User> { seed::users() }
}

impl Collection for Contacts {
  const KEY: &'static str = "il_contacts_v2";
  type Record = ContactSubmission;

  fn seed() -> Vec<ContactSubmission> { Vec::new() }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// CRUD over the projects, users and contacts collections.
#[derive(Debug)]
pub struct RecordStore<K> {
  kv: JsonKv<K>,
}

impl<K: KvStore> RecordStore<K> {
  pub fn new(host: K) -> Self { Self { kv: JsonKv::new(host) } }

  pub(crate) fn kv(&self) -> &JsonKv<K> { &self.kv }

  /// Write seed data for every collection that is absent (or unreadable).
  /// Safe to call on every start.
  pub fn ensure_seeded(&self) -> Result<()> {
    self.seed_if_absent::<Projects>()?;
    self.seed_if_absent::<Users>()?;
    self.seed_if_absent::<Contacts>()?;
    Ok(())
  }

  fn seed_if_absent<C: Collection>(&self) -> Result<()> {
    if self.kv.read::<Vec<C::Record>>(C::KEY).is_none() {
      tracing::info!(key = C::KEY, "seeding collection");
      self.kv.write(C::KEY, &C::seed())?;
    }
    Ok(())
  }

  /// All records of `C`, or an empty list when absent or unreadable.
  pub fn list<C: Collection>(&self) -> Vec<C::Record> {
    self.kv.read(C::KEY).unwrap_or_default()
  }

  /// Overwrite the whole collection.
  pub fn replace_all<C: Collection>(&self, records: &[C::Record]) -> Result<()> {
    self.kv.write(C::KEY, records)
  }

  pub fn find_by_id<C: Collection>(&self, id: RecordId) -> Option<C::Record> {
    collection::find_by_id(&self.list::<C>(), id).cloned()
  }

  // ── Projects ──────────────────────────────────────────────────────────

  pub fn projects_tagged(&self, tag: &str) -> Vec<Project> {
    collection::filter_by_tag(&self.list::<Projects>(), tag)
  }

  pub fn project_tags(&self) -> Vec<String> {
    collection::distinct_tags(&self.list::<Projects>())
  }

  /// Create (`id` is `None` or unknown) or edit a project.
  pub fn save_project(
    &self,
    _admin: &AdminToken,
    id: Option<RecordId>,
    draft: ProjectDraft,
  ) -> Result<Project> {
    let (projects, saved) =
      collection::upsert_project(self.list::<Projects>(), id, draft, Utc::now());
    self.replace_all::<Projects>(&projects)?;
    tracing::info!(id = %saved.id, title = %saved.title, "saved project");
    Ok(saved)
  }

  /// Returns `false` when no project had `id`.
  pub fn delete_project(&self, _admin: &AdminToken, id: RecordId) -> Result<bool> {
    let (projects, removed) = collection::remove_by_id(self.list::<Projects>(), id);
    if removed {
      self.replace_all::<Projects>(&projects)?;
      tracing::info!(%id, "deleted project");
    }
    Ok(removed)
  }

  /// The slide deck link of a project. Only handed out to signed-in users.
  pub fn deck_url(&self, _session: &Session, id: RecordId) -> Result<Option<String>> {
    let project = self.find_by_id::<Projects>(id).ok_or(Error::NotFound(id))?;
    Ok(project.ppt)
  }

  // ── Contacts ──────────────────────────────────────────────────────────

  pub fn add_contact(&self, record: ContactSubmission) -> Result<()> {
    let contacts = collection::append(self.list::<Contacts>(), record);
    self.replace_all::<Contacts>(&contacts)
  }

  /// Render the contact collection for download.
  pub fn export(
    &self,
    _admin: &AdminToken,
    format: ExportFormat,
    now: DateTime<Utc>,
  ) -> Result<ExportFile> {
    let contacts = self.list::<Contacts>();
    if contacts.is_empty() {
      return Err(Error::NothingToExport);
    }
    ExportFile::render(format, &contacts, now)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::kv::MemoryKv;

  fn store() -> RecordStore<MemoryKv> {
    let store = RecordStore::new(MemoryKv::new());
    store.ensure_seeded().unwrap();
    store
  }

  fn raw(store: &RecordStore<MemoryKv>, key: &str) -> Option<String> {
    store.kv().host().get(key).unwrap()
  }

  #[test]
  fn seeding_twice_equals_seeding_once() {
    let s = RecordStore::new(MemoryKv::new());
    s.ensure_seeded().unwrap();
    let once = [
      raw(&s, Projects::KEY),
      raw(&s, Users::KEY),
      raw(&s, Contacts::KEY),
    ];
    s.ensure_seeded().unwrap();
    let twice = [
      raw(&s, Projects::KEY),
      raw(&s, Users::KEY),
      raw(&s, Contacts::KEY),
    ];
    assert_eq!(once, twice);
    assert_eq!(s.list::<Projects>().len(), 3);
    assert_eq!(s.list::<Users>().len(), 2);
    assert!(s.list::<Contacts>().is_empty());
  }

  #[test]
  fn seeding_keeps_existing_empty_collections() {
    let s = RecordStore::new(MemoryKv::new());
    s.replace_all::<Projects>(&[]).unwrap();
    s.ensure_seeded().unwrap();
    assert!(s.list::<Projects>().is_empty());
  }

  #[test]
  fn seeding_replaces_corrupt_collections() {
    let s = RecordStore::new(MemoryKv::new());
    s.kv().host().set(Users::KEY, "[{\"id\":").unwrap();
    s.ensure_seeded().unwrap();
    assert_eq!(s.list::<Users>(), seed::users());
  }

  #[test]
  fn list_of_absent_collection_is_empty() {
    let s = RecordStore::new(MemoryKv::new());
    assert!(s.list::<Projects>().is_empty());
    assert!(s.find_by_id::<Projects>(RecordId(1)).is_none());
  }

  #[test]
  fn find_by_id_matches_legacy_string_ids() {
    let s = RecordStore::new(MemoryKv::new());
    s.kv()
      .host()
      .set(
        Projects::KEY,
        r#"[{"id":"12","title":"T","abstract":"A","tags":["AI"]}]"#,
      )
      .unwrap();
    let found = s.find_by_id::<Projects>(RecordId(12)).unwrap();
    assert_eq!(found.title, "T");
  }

  #[test]
  fn tag_queries() {
    let s = store();
    let tagged: Vec<_> = s.projects_tagged("Web").into_iter().map(|p| p.id).collect();
    assert_eq!(tagged, vec![RecordId(3)]);
    assert_eq!(s.projects_tagged("all").len(), 3);
    assert_eq!(s.project_tags().len(), 6);
  }

  #[test]
  fn save_and_delete_projects() {
    let s = store();
    let admin = AdminToken::new();
    let draft = ProjectDraft {
      title: "Edge Inference".into(),
      summary: "Tiny models".into(),
      tags: vec!["AI".into()],
      ..ProjectDraft::default()
    };
    let created = s.save_project(&admin, None, draft.clone()).unwrap();
    let projects = s.list::<Projects>();
    assert_eq!(projects.len(), 4);
    assert_eq!(projects[0].id, created.id);

    let edited = ProjectDraft { title: "Edge Inference v2".into(), ..draft };
    s.save_project(&admin, Some(created.id), edited).unwrap();
    assert_eq!(
      s.find_by_id::<Projects>(created.id).unwrap().title,
      "Edge Inference v2"
    );
    assert_eq!(s.list::<Projects>().len(), 4);

    assert!(s.delete_project(&admin, created.id).unwrap());
    assert!(!s.delete_project(&admin, created.id).unwrap());
    assert_eq!(s.list::<Projects>().len(), 3);
  }

  #[test]
  fn deck_url_of_missing_project_is_not_found() {
    let s = store();
    let session = Session::from(&seed::users()[1]);
    assert_eq!(
      s.deck_url(&session, RecordId(1)).unwrap().as_deref(),
      Some("https://example.com/duplicate_detection_ppt.pdf")
    );
    assert_eq!(s.deck_url(&session, RecordId(2)).unwrap(), None);
    assert!(matches!(
      s.deck_url(&session, RecordId(99)),
      Err(Error::NotFound(RecordId(99)))
    ));
  }

  #[test]
  fn export_refuses_empty_collection() {
    let s = store();
    let admin = AdminToken::new();
    assert!(matches!(
      s.export(&admin, ExportFormat::Csv, Utc::now()),
      Err(Error::NothingToExport)
    ));

    s.add_contact(ContactSubmission {
      id:      RecordId(1),
      name:    "N".into(),
      details: "D".into(),
      message: "M".into(),
      created: "2024-01-01T00:00:00Z".into(),
    })
    .unwrap();
    let file = s.export(&admin, ExportFormat::Json, Utc::now()).unwrap();
    assert!(file.file_name.ends_with(".json"));
    assert!(file.body.contains("\"name\": \"N\""));
  }
}
