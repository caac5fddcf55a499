//! Plain-text rendering of job cards.

use crate::job::Job;
use std::fmt::Write;

/// Human-readable posting date, e.g. "May 15, 2023".
///
/// Falls back to the raw wire value when it doesn't parse, and to a
/// placeholder when the field is missing.
pub fn human_date(job: &Job) -> String {
    match (job.posted_on(), job.posting_date.as_deref()) {
        (Some(date), _) => date.format("%b %-d, %Y").to_string(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "N/A".to_string(),
    }
}

/// Renders one job the way the listing card lays it out.
pub fn render_card(job: &Job) -> String {
    let mut card = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(card, "[{}] {}", job.id, job.title_or_placeholder());
    let _ = writeln!(card, "  Company:  {}", job.company_or_placeholder());
    let _ = writeln!(card, "  Location: {}", job.location_or_placeholder());
    let _ = writeln!(card, "  Type:     {}", job.job_type_or_placeholder());
    let _ = writeln!(card, "  Posted:   {}", human_date(job));
    if job.tags.is_empty() {
        let _ = writeln!(card, "  Tags:     -");
    } else {
        let _ = writeln!(card, "  Tags:     {}", job.tags.join(", "));
    }

    card
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobId;

    fn bare_job() -> Job {
        Job {
            id: JobId::Int(3),
            title: None,
            company: None,
            location: None,
            job_type: None,
            description: None,
            tags: vec![],
            posting_date: None,
        }
    }

    #[test]
    fn test_human_date() {
        let mut job = bare_job();
        assert_eq!(human_date(&job), "N/A");

        job.posting_date = Some("2023-05-08".to_string());
        assert_eq!(human_date(&job), "May 8, 2023");

        job.posting_date = Some("soon".to_string());
        assert_eq!(human_date(&job), "soon");
    }

    #[test]
    fn test_render_card_with_placeholders() {
        let card = render_card(&bare_job());
        assert!(card.starts_with("[3] Untitled\n"));
        assert!(card.contains("Company:  Unknown company"));
        assert!(card.contains("Tags:     -"));
    }

    #[test]
    fn test_render_card_full() {
        let job = Job {
            id: JobId::Text("ux-1".to_string()),
            title: Some("UI/UX Designer".to_string()),
            company: Some("CreativeMinds".to_string()),
            location: Some("Remote".to_string()),
            job_type: Some("Contract".to_string()),
            description: None,
            tags: vec!["UI/UX".to_string(), "Figma".to_string()],
            posting_date: Some("2023-05-18".to_string()),
        };
        let card = render_card(&job);
        assert!(card.starts_with("[ux-1] UI/UX Designer\n"));
        assert!(card.contains("Type:     Contract"));
        assert!(card.contains("Posted:   May 18, 2023"));
        assert!(card.contains("Tags:     UI/UX, Figma"));
    }
}
