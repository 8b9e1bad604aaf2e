//! `GET /api/export.csv`: the executive summary as a sectioned CSV download.
//!
//! Three sections, each a `=== Title ===` line followed by a header row and
//! one row per record, separated by a blank line.

use axum::{
  extract::State,
  http::header,
  response::{IntoResponse, Response},
};
use cadence_core::{
  aggregate::open_escalations,
  source::{Dataset, DeliverySource},
};
use chrono::Local;

use super::dataset;
use crate::{AppState, error::ApiError};

/// Quote a field when it contains a separator, quote, or line break.
fn field(value: &str) -> String {
  if value.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_string()
  }
}

fn row(out: &mut String, values: &[&str]) {
  let fields: Vec<String> = values.iter().map(|v| field(v)).collect();
  out.push_str(&fields.join(","));
  out.push('\n');
}

pub(crate) fn render(data: &Dataset) -> String {
  let mut out = String::from("=== Programs ===\n");
  row(&mut out, &["name", "status", "percent_complete", "department", "owner"]);
  for p in &data.programs {
    let percent = p.percent_complete.to_string();
    row(&mut out, &[&p.name, p.status.label(), &percent, &p.department, &p.owner]);
  }

  out.push_str("\n=== Open Risks ===\n");
  row(&mut out, &["title", "program_id", "severity", "likelihood"]);
  for r in data.risks.iter().filter(|r| r.is_open) {
    row(&mut out, &[&r.title, &r.program_id, r.severity.label(), r.likelihood.label()]);
  }

  out.push_str("\n=== Open Escalations ===\n");
  row(&mut out, &["title", "program_id", "level", "raised_date"]);
  for e in open_escalations(&data.escalations) {
    let raised = e.raised_date.to_string();
    row(&mut out, &[&e.title, &e.program_id, e.level.label(), &raised]);
  }
  out
}

pub async fn handler<S: DeliverySource>(
  State(state): State<AppState<S>>,
) -> Result<Response, ApiError> {
  let data = dataset(&state).await?;
  let filename = format!("executive_summary_{}.csv", Local::now().date_naive());
  Ok(
    (
      [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
      ],
      render(&data),
    )
      .into_response(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quotes_only_when_needed() {
    assert_eq!(field("Cloud vendor lock-in"), "Cloud vendor lock-in");
    assert_eq!(field("a, b"), "\"a, b\"");
    assert_eq!(field("say \"hi\""), "\"say \"\"hi\"\"\"");
  }

  #[test]
  fn empty_dataset_keeps_section_headers() {
    let csv = render(&Dataset::default());
    assert_eq!(
      csv,
      "=== Programs ===\nname,status,percent_complete,department,owner\n\
       \n=== Open Risks ===\ntitle,program_id,severity,likelihood\n\
       \n=== Open Escalations ===\ntitle,program_id,level,raised_date\n"
    );
  }
}
