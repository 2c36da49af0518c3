use std::fmt::Write;

use curator_core::{AppViewModel, Mode, SearchStatus};

const TITLE_WIDTH: usize = 60;

/// Plain-text rendering of the view model for stdout.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "query: {}", view.query);
    let _ = writeln!(out, "mode:  {}", view.mode);
    if view.mode == Mode::Heuristic {
        if view.rules.is_empty() {
            let _ = writeln!(out, "rules: (none, every result passes)");
        }
        for (index, draft) in view.rules.iter().enumerate() {
            let note = if draft.to_rule().is_permissive() {
                " (never excludes)"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "rule {}: {} {} {:?}{note}",
                index + 1,
                draft.field,
                draft.operator,
                draft.value
            );
        }
    }
    match &view.status {
        SearchStatus::Idle => {
            let _ = writeln!(out, "no search yet");
        }
        SearchStatus::Searching { request_id } => {
            let _ = writeln!(out, "searching (request {request_id})");
        }
        SearchStatus::Failed { message } => {
            let _ = writeln!(out, "error: {message}");
        }
        SearchStatus::Ready => {
            let _ = writeln!(
                out,
                "{} results, {} selected",
                view.rows.len(),
                view.selected_count
            );
        }
    }
    for row in &view.rows {
        let mark = match (row.selected, row.overridden) {
            (true, false) => "[x]",
            (false, false) => "[ ]",
            (true, true) => "[X]",
            (false, true) => "[-]",
        };
        let title = row.title.as_deref().unwrap_or("untitled");
        let _ = writeln!(
            out,
            "{mark} {title:<width$} {words:>6}w {date:<10} {id}",
            title = truncate(title, TITLE_WIDTH),
            width = TITLE_WIDTH,
            words = row.word_count,
            date = row
                .published_date
                .as_deref()
                .map(|date| date.get(..10).unwrap_or(date))
                .unwrap_or("-"),
            id = row.id,
        );
    }
    out
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::{RecordRowView, RuleDraft};

    fn row(id: &str, selected: bool, overridden: bool) -> RecordRowView {
        RecordRowView {
            id: id.into(),
            title: Some(format!("Title {id}")),
            url: None,
            published_date: Some("2026-09-01T00:00:00.000Z".into()),
            word_count: 42,
            selected,
            overridden,
        }
    }

    #[test]
    fn renders_rules_status_and_marks() {
        let view = AppViewModel {
            mode: Mode::Heuristic,
            query: "rust".into(),
            status: SearchStatus::Ready,
            rules: vec![
                RuleDraft::new("wordCount", ">=", "200"),
                RuleDraft::new("publishedDate", ">=", "3"),
            ],
            rows: vec![row("a", true, false), row("b", false, true)],
            selected_count: 1,
            dirty: true,
        };
        let text = render(&view);
        assert!(text.contains("mode:  heuristic"));
        assert!(text.contains("rule 1: wordCount >= \"200\"\n"));
        assert!(text.contains("rule 2: publishedDate >= \"3\" (never excludes)"));
        assert!(text.contains("2 results, 1 selected"));
        assert!(text.contains("[x] Title a"));
        assert!(text.contains("[-] Title b"));
        assert!(text.contains("2026-09-01 a"));
    }

    #[test]
    fn renders_failures() {
        let view = AppViewModel {
            status: SearchStatus::Failed {
                message: "http status 401".into(),
            },
            ..AppViewModel::default()
        };
        assert!(render(&view).contains("error: http status 401"));
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
