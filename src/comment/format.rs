//! Rendering of report comment bodies.

use super::entry::Entry;
use super::template::{RenderError, ReportTemplate};
use super::{POSTSUBMIT_NOTE, REPORT_MARKER};
use crate::types::{JobResult, Sha};

const PRESUBMIT_COLUMNS: [&str; 2] = [
    "Test name | Commit | Details | Required | Rerun command",
    "--- | --- | --- | --- | ---",
];

const POSTSUBMIT_COLUMNS: [&str; 2] = ["Test name | Commit | Details", "--- | --- | ---"];

/// Renders the body of a report comment.
///
/// `first` is the first job of the batch: it decides the phrasing (pre- or
/// post-merge), whom the comment addresses, and is the context for the
/// template. With no entries the body says that all tests passed.
pub fn format_report_comment(
    first: &JobResult,
    entries: &[Entry],
    template: Option<&ReportTemplate>,
    about: &str,
) -> Result<String, RenderError> {
    let extra = template.map(|t| t.render(first)).transpose()?;

    let author = first.author();
    let mut lines: Vec<String> = Vec::with_capacity(entries.len() + 12);

    if entries.is_empty() {
        lines.push(format!("@{author}: all tests **passed!**"));
        lines.push(String::new());
    } else {
        let plural = if entries.len() > 1 { "s" } else { "" };
        let (header, columns) = if first.is_postsubmit() {
            (
                format!("@{author}: The following test{plural} **failed**:"),
                POSTSUBMIT_COLUMNS,
            )
        } else {
            (
                format!(
                    "@{author}: The following test{plural} **failed**, say `/retest` to rerun all failed tests or `/retest-required` to rerun all mandatory failed tests:"
                ),
                PRESUBMIT_COLUMNS,
            )
        };
        lines.push(header);
        lines.push(String::new());
        lines.extend(columns.iter().map(|column| column.to_string()));
        lines.extend(entries.iter().map(|entry| entry.to_string()));
    }

    if let Some(extra) = extra {
        lines.push(String::new());
        lines.push(extra);
    }

    lines.extend([
        String::new(),
        "<details>".to_string(),
        String::new(),
        about.to_string(),
        "</details>".to_string(),
        REPORT_MARKER.to_string(),
    ]);

    Ok(lines.join("\n"))
}

/// Renders the one-time note pointing a pull at its post-merge commit.
///
/// The note text ends in a space and is followed by another, so the SHA is
/// separated by two spaces.
pub fn format_postsubmit_note(sha: &Sha) -> String {
    format!("{POSTSUBMIT_NOTE} {sha}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::parse::extract_entries;
    use crate::test_utils::JobBuilder;
    use crate::types::JobState;

    const ABOUT: &str = "Instructions for interacting with me.";

    fn closing() -> String {
        format!("\n\n<details>\n\n{ABOUT}\n</details>\n{REPORT_MARKER}")
    }

    #[test]
    fn single_presubmit_failure() {
        let job = JobBuilder::presubmit("unit")
            .state(JobState::Failure)
            .build();
        let entries = [Entry::new("unit | headsha | [link](u) | true | `/test unit`")];

        let body = format_report_comment(&job, &entries, None, ABOUT).unwrap();

        let expected = format!(
            "@pr-author: The following test **failed**, say `/retest` to rerun all failed tests or `/retest-required` to rerun all mandatory failed tests:\n\
             \n\
             Test name | Commit | Details | Required | Rerun command\n\
             --- | --- | --- | --- | ---\n\
             unit | headsha | [link](u) | true | `/test unit`{}",
            closing()
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn plural_header_for_several_failures() {
        let job = JobBuilder::presubmit("unit").build();
        let entries = [Entry::new("a | 1"), Entry::new("b | 2")];
        let body = format_report_comment(&job, &entries, None, ABOUT).unwrap();
        assert!(
            body.starts_with("@pr-author: The following tests **failed**, say")
        );
    }

    #[test]
    fn postsubmit_uses_three_columns_and_pusher() {
        let job = JobBuilder::postsubmit("deploy").build();
        let entries = [Entry::new("deploy | basesha | [link](u)")];

        let body = format_report_comment(&job, &entries, None, ABOUT).unwrap();

        let expected = format!(
            "@pusher: The following test **failed**:\n\
             \n\
             Test name | Commit | Details\n\
             --- | --- | ---\n\
             deploy | basesha | [link](u){}",
            closing()
        );
        assert_eq!(body, expected);
    }

    #[test]
    fn no_entries_means_all_passed() {
        let job = JobBuilder::presubmit("unit").build();
        let body = format_report_comment(&job, &[], None, ABOUT).unwrap();
        assert_eq!(
            body,
            format!("@pr-author: all tests **passed!**\n{}", closing())
        );
    }

    #[test]
    fn postsubmit_with_no_entries_has_no_table() {
        let job = JobBuilder::postsubmit("deploy").build();
        let body = format_report_comment(&job, &[], None, ABOUT).unwrap();
        assert_eq!(
            body,
            format!("@pusher: all tests **passed!**\n{}", closing())
        );
        assert!(!body.contains("Test name"));
    }

    #[test]
    fn template_output_follows_the_table() {
        let first = JobBuilder::presubmit("unit").job_name("pull-unit").build();
        let template = ReportTemplate::new("First failure: {{ job }}").unwrap();
        let entries = [Entry::new("unit | x | y | true | ``")];

        let body = format_report_comment(&first, &entries, Some(&template), ABOUT).unwrap();

        let expected = "unit | x | y | true | ``\n\nFirst failure: pull-unit\n\n<details>";
        assert!(body.contains(expected));
    }

    #[test]
    fn template_errors_are_returned() {
        let first = JobBuilder::presubmit("unit").build();
        let template = ReportTemplate::new("{{ missing.field }}").unwrap();
        let result = format_report_comment(&first, &[], Some(&template), ABOUT);
        assert!(matches!(result, Err(RenderError::Execute(_))));
    }

    #[test]
    fn rendered_rows_parse_back() {
        let job = JobBuilder::presubmit("unit").build();
        let entries = [Entry::new("a | 1 | x"), Entry::new("b | 2 | y")];
        let body = format_report_comment(&job, &entries, None, ABOUT).unwrap();
        assert_eq!(extract_entries(&body), entries);
    }

    #[test]
    fn note_separates_sha_with_two_spaces() {
        assert_eq!(
            format_postsubmit_note(&Sha::new("abc123")),
            "postsubmit job(s) were triggered at commit:  abc123\n"
        );
    }
}
