//! Plain-text tables with computed column widths.

/// Renders `rows` under `headers`, left-aligned, two spaces between columns.
///
/// Each column is as wide as its widest cell or header. Trailing spaces are
/// trimmed from every line.
pub(crate) fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| display_width(cell))
                .max()
                .unwrap_or(0)
                .max(display_width(header))
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths, ' ');
    push_line(&mut out, headers.iter().map(|_| ""), &widths, '-');
    for row in rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths, ' ');
    }
    out
}

/// Width in characters, so non-ASCII domains line up.
fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn push_line<'a>(
    out: &mut String,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
    fill: char,
) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| {
            let padding = width.saturating_sub(display_width(cell));
            format!("{cell}{}", fill.to_string().repeat(padding))
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_fit_widest_cell() {
        let rows = vec![
            vec!["web1".to_string(), "10.0.0.1".to_string()],
            vec!["database".to_string(), "db".to_string()],
        ];
        let table = render(&["NAME", "HOST"], &rows);
        assert_eq!(
            table,
            "NAME      HOST\n--------  --------\nweb1      10.0.0.1\ndatabase  db\n"
        );
    }

    #[test]
    fn headers_set_minimum_width() {
        let table = render(&["NAME", "PORT"], &[vec!["a".to_string(), "22".to_string()]]);
        assert_eq!(table.lines().nth(1), Some("----  ----"));
        assert_eq!(table.lines().nth(2), Some("a     22"));
    }

    #[test]
    fn non_ascii_cells_align_by_characters() {
        let rows = vec![
            vec!["bücher.example".to_string(), "main".to_string()],
            vec!["shop.example".to_string(), "main".to_string()],
        ];
        let table = render(&["DOMAIN", "BRANCH"], &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[1], "--------------  ------");
        assert_eq!(lines[2], "bücher.example  main");
        assert_eq!(lines[3], "shop.example    main");
    }
}
