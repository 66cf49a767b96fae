use reviewer_core::types::PullRequest;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Render rows under a header, padding every column to its widest cell.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in render_table(headers, rows) {
        println!("{line}");
    }
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let pad = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(pad(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        lines.push(pad(row.iter().map(String::as_str).collect()));
    }
    lines
}

pub fn pr_row(pr: &PullRequest) -> Vec<String> {
    let reviewers = if pr.assigned_reviewers.is_empty() {
        "-".to_string()
    } else {
        pr.assigned_reviewers.join(", ")
    };
    vec![
        pr.id.clone(),
        pr.name.clone(),
        pr.author_id.clone(),
        pr.status.to_string(),
        reviewers,
    ]
}

pub const PR_HEADERS: &[&str] = &["ID", "NAME", "AUTHOR", "STATUS", "REVIEWERS"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_pad_to_widest_cell() {
        let rows = vec![vec!["u1".to_string(), "Alice".to_string()]];
        let lines = render_table(&["ID", "USERNAME"], &rows);
        assert_eq!(lines[0], "ID  USERNAME");
        assert_eq!(lines[1], "--  --------");
        assert_eq!(lines[2], "u1  Alice");
    }

    #[test]
    fn pr_row_marks_missing_reviewers() {
        let mut pr = PullRequest::open("pr-1", "Lonely", "a", chrono::Utc::now());
        assert_eq!(pr_row(&pr)[4], "-");
        pr.assigned_reviewers = vec!["b".into(), "c".into()];
        assert_eq!(pr_row(&pr)[4], "b, c");
    }
}
