use ceasa_matrix::{Cell, ColumnKey, RawTable, GENERAL_GROUP};

/// Builds the column keys from the two header rows.
///
/// Merged group cells only fill their first cell: an empty group continues
/// the previous one. Columns before the first group are flat.
pub fn build_header(groups: &[Option<String>], metrics: &[Option<String>]) -> Vec<ColumnKey> {
    let width = groups.len().max(metrics.len());
    let mut current: Option<String> = None;
    let mut res: Vec<ColumnKey> = Vec::with_capacity(width);
    for idx in 0..width {
        if let Some(Some(g)) = groups.get(idx) {
            if !g.trim().is_empty() {
                current = Some(g.clone());
            }
        }
        let metric = metrics.get(idx).cloned().flatten().unwrap_or_default();
        res.push(match &current {
            Some(g) => ColumnKey::Grouped {
                group: g.clone(),
                metric,
            },
            None => ColumnKey::Flat(metric),
        });
    }
    res
}

/// Assembles the table and carries the block id down to every activity row.
pub fn finish_table(columns: Vec<ColumnKey>, rows: Vec<Vec<Cell>>) -> RawTable {
    let mut table = RawTable::new(columns, rows);
    if !table.forward_fill(&ColumnKey::flat("Bloco")) {
        table.forward_fill(&ColumnKey::grouped(GENERAL_GROUP, "Bloco"));
    }
    table
}

/// Reads a text cell: blank is empty, numbers are numbers, the rest stays text.
pub fn parse_text_cell(s: &str) -> Cell {
    let t = s.trim();
    if t.is_empty() {
        Cell::Empty
    } else if let Ok(x) = t.parse::<f64>() {
        Cell::Number(x)
    } else {
        Cell::Text(s.to_string())
    }
}

/// Formats a share (0.25) as a percentage ("25.00%").
pub fn format_percent(x: Option<f64>) -> String {
    match x {
        Some(v) if v.is_finite() => format!("{:.2}%", v * 100.0),
        _ => "".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(xs: &[&str]) -> Vec<Option<String>> {
        xs.iter()
            .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
            .collect()
    }

    #[test]
    fn header_groups_are_carried() {
        let h = build_header(
            &opt(&["", "GERAL", "", "Belem/PA", ""]),
            &opt(&["idx", "Bloco", "Atividade", "Belem/PA pontuação", "Pontuação no Bloco "]),
        );
        assert_eq!(
            h,
            vec![
                ColumnKey::flat("idx"),
                ColumnKey::grouped("GERAL", "Bloco"),
                ColumnKey::grouped("GERAL", "Atividade"),
                ColumnKey::grouped("Belem/PA", "Belem/PA pontuação"),
                ColumnKey::grouped("Belem/PA", "Pontuação no Bloco "),
            ]
        );
    }

    #[test]
    fn uneven_header_rows() {
        let h = build_header(&opt(&["GERAL"]), &opt(&["Bloco", "Atividade", ""]));
        assert_eq!(h[2], ColumnKey::grouped("GERAL", ""));
    }

    #[test]
    fn text_cells() {
        assert_eq!(parse_text_cell(" "), Cell::Empty);
        assert_eq!(parse_text_cell("14"), Cell::Number(14.0));
        assert_eq!(parse_text_cell("0.5"), Cell::Number(0.5));
        assert_eq!(parse_text_cell("BLOCO 1"), Cell::Text("BLOCO 1".to_string()));
    }

    #[test]
    fn percent_format() {
        assert_eq!(format_percent(Some(0.2534)), "25.34%");
        assert_eq!(format_percent(None), "");
        assert_eq!(format_percent(Some(f64::NAN)), "");
    }
}
