//! Pure collection transforms: `(collection, change) -> new collection`.
//!
//! Nothing here touches storage. [`crate::RecordStore`] reads a collection,
//! applies one of these, and writes the whole result back.

use chrono::{DateTime, Utc};

use crate::model::{Identified, Project, ProjectDraft, RecordId};

/// Tag value that selects every project.
pub const ALL_TAGS: &str = "all";

pub fn append<T>(mut items: Vec<T>, item: T) -> Vec<T> {
  items.push(item);
  items
}

pub fn find_by_id<T: Identified>(items: &[T], id: RecordId) -> Option<&T> {
  items.iter().find(|r| r.id() == id)
}

/// Drop every record with `id`. The flag reports whether anything matched.
pub fn remove_by_id<T: Identified>(items: Vec<T>, id: RecordId) -> (Vec<T>, bool) {
  let before = items.len();
  let kept: Vec<T> = items.into_iter().filter(|r| r.id() != id).collect();
  let removed = kept.len() != before;
  (kept, removed)
}

/// A fresh id derived from `now`, bumped past the highest id in `items` so
/// two records created within the same millisecond never collide.
///
/// When the highest id is already `i64::MAX`, the first unused id at or
/// after the clock value is taken instead.
pub fn next_id<T: Identified>(items: &[T], now: DateTime<Utc>) -> RecordId {
  let from_clock = RecordId::from_time(now);
  match items.iter().map(Identified::id).max() {
    Some(RecordId(max)) if max >= from_clock.0 => match max.checked_add(1) {
      Some(next) => RecordId(next),
      None => (from_clock.0..=i64::MAX)
        .map(RecordId)
        .find(|id| items.iter().all(|r| r.id() != *id))
        .unwrap_or(from_clock),
    },
    _ => from_clock,
  }
}

/// Apply an editor save.
///
/// With the id of an existing project, the draft replaces its fields in
/// place. Otherwise the draft becomes a new project with a fresh id, placed
/// at the front of the list.
pub fn upsert_project(
  mut projects: Vec<Project>,
  id: Option<RecordId>,
  draft: ProjectDraft,
  now: DateTime<Utc>,
) -> (Vec<Project>, Project) {
  if let Some(id) = id
    && let Some(slot) = projects.iter_mut().find(|p| p.id == id)
  {
    *slot = draft.into_project(id);
    let saved = slot.clone();
    return (projects, saved);
  }

  let project = draft.into_project(next_id(&projects, now));
  projects.insert(0, project.clone());
  (projects, project)
}

/// Projects carrying `tag`, in their original order. [`ALL_TAGS`] keeps
/// everything.
pub fn filter_by_tag(projects: &[Project], tag: &str) -> Vec<Project> {
  if tag == ALL_TAGS {
    return projects.to_vec();
  }
  projects.iter().filter(|p| p.has_tag(tag)).cloned().collect()
}

/// Every tag used by `projects`, deduplicated, in first-seen order.
pub fn distinct_tags(projects: &[Project]) -> Vec<String> {
  let mut seen: Vec<String> = Vec::new();
  for tag in projects.iter().flat_map(|p| &p.tags) {
    if !seen.contains(tag) {
      seen.push(tag.clone());
    }
  }
  seen
}

/// Split an editor's comma-separated tag field.
pub fn parse_tags(input: &str) -> Vec<String> {
  input
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_owned)
    .collect()
}
