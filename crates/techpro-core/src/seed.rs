//! Demo data written on first run.

use crate::model::{Project, RecordId, Role, User};

pub fn projects() -> Vec<Project> {
  vec![
    Project {
      id:      RecordId(1),
      title:   "Duplicate Image Detection".into(),
      summary: "Detect duplicate or near-duplicate images at scale using \
                hybrid CNN + SIFT matching. Short demo available."
        .into(),
      algo:    "ResNet + SIFT".into(),
      tech:    "Flask, Redis, MongoDB".into(),
      video:   Some(
        "https://interactive-examples.mdn.mozilla.net/media/cc0-videos/flower.mp4"
          .into(),
      ),
      ppt:     Some("https://example.com/duplicate_detection_ppt.pdf".into()),
      tags:    vec!["Computer Vision".into(), "Deep Learning".into()],
    },
    Project {
      id:      RecordId(2),
      title:   "Smart Scheduler".into(),
      summary: "An optimization-based scheduler that balances preferences and \
                constraints using a hybrid GA + ILP approach."
        .into(),
      algo:    "Genetic Algorithm".into(),
      tech:    "Python, Flask".into(),
      video:   None,
      ppt:     None,
      tags:    vec!["Optimization".into(), "Algorithms".into()],
    },
    Project {
      id:      RecordId(3),
      title:   "LMS Revamp".into(),
      summary: "A modern, accessible library-management platform with \
                role-based access and analytics dashboards."
        .into(),
      algo:    "CRUD, RBAC".into(),
      tech:    "Django, PostgreSQL".into(),
      video:   None,
      ppt:     None,
      tags:    vec!["Web".into(), "Full-Stack".into()],
    },
  ]
}

pub fn users() -> Vec<User> {
  vec![
    User {
      id:       RecordId(1),
      email:    "admin@innovate.local".into(),
      password: "Admin123!".into(),
      role:     Role::Admin,
      name:     "Admin".into(),
    },
    User {
      id:       RecordId(2),
      email:    "user@innovate.local".into(),
      password: "User123!".into(),
      role:     Role::User,
      name:     "Demo User".into(),
    },
  ]
}
