//! `GET /`: a small page listing the API.

use axum::response::Html;

const LANDING: &str = r#"<!doctype html>
<html>
  <head><title>TechPro Intake</title></head>
  <body style="font-family:system-ui,Arial,sans-serif;line-height:1.5;padding:24px">
    <h2>TechPro Projects: contact intake</h2>
    <ul>
      <li><strong>GET</strong> <a href="/api/contacts">/api/contacts</a>: list saved contacts</li>
      <li><strong>POST</strong> <code>/api/contact</code>: accept JSON {name, details, message}</li>
    </ul>
  </body>
</html>
"#;

pub async fn handler() -> Html<&'static str> { Html(LANDING) }
