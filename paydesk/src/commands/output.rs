//! Plain-text rendering for terminal output

use paydesk_client::Origin;

/// Left-aligned columns padded to the widest cell
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut out = vec![line(headers.to_vec())];
    out.push(line(rule.iter().map(String::as_str).collect()));
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}

/// Banner appended when the data did not come from the backend
pub fn origin_banner(origin: Option<Origin>) -> Option<&'static str> {
    match origin {
        Some(Origin::Mock) => Some("(backend unavailable, showing sample data)"),
        _ => None,
    }
}

/// Join non-empty blocks with a blank line
pub fn blocks<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .filter(|p| !p.as_ref().is_empty())
        .map(|p| p.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alignment() {
        let out = table(
            &["ID", "Name"],
            &[vec!["1".into(), "John Doe".into()], vec!["12".into(), "Al".into()]],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID  Name");
        assert_eq!(lines[1], "--  --------");
        assert_eq!(lines[2], "1   John Doe");
        assert_eq!(lines[3], "12  Al");
    }

    #[test]
    fn test_origin_banner() {
        assert!(origin_banner(Some(Origin::Mock)).is_some());
        assert!(origin_banner(Some(Origin::Backend)).is_none());
        assert!(origin_banner(None).is_none());
    }

    #[test]
    fn test_blocks_skip_empty() {
        assert_eq!(blocks(["a", "", "b"]), "a\n\nb");
    }
}
