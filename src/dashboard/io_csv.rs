// Primitives for reading and writing CSV files.

use std::io;

use ceasa_matrix::views::ExportRow;

use crate::dashboard::{io_common::*, *};

/// Reads the evaluation matrix from a CSV export of the sheet.
pub fn read_matrix_csv_file(path: &str) -> DashResult<RawTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_records(rdr)
}

pub fn read_matrix_csv<R: io::Read>(reader: R) -> DashResult<RawTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    read_records(rdr)
}

fn read_records<R: io::Read>(rdr: csv::Reader<R>) -> DashResult<RawTable> {
    let mut records = rdr.into_records();
    let groups = header_line(records.next(), 1)?;
    let metrics = header_line(records.next(), 2)?;
    let columns = build_header(&groups, &metrics);
    debug!("read_matrix_csv: columns: {:?}", columns);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        // The two header lines come first.
        let lineno = idx + 3;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let cells: Vec<Cell> = line.iter().map(parse_text_cell).collect();
        debug!("read_matrix_csv: lineno: {:?} row: {:?}", lineno, &cells);
        rows.push(cells);
    }
    Ok(finish_table(columns, rows))
}

fn header_line(
    line: Option<csv::Result<csv::StringRecord>>,
    lineno: usize,
) -> DashResult<Vec<Option<String>>> {
    let line = line
        .context(MissingHeaderSnafu {})?
        .context(CsvLineParseSnafu { lineno })?;
    Ok(line
        .iter()
        .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
        .collect())
}

pub const EXPORT_HEADER: [&str; 6] = [
    "Região",
    "Bloco",
    "Título",
    "Atividades",
    "Pontuações",
    "% em relação ao Total do Bloco",
];

/// Writes the filtered table, with `;` as the separator.
pub fn write_export_csv<W: io::Write>(writer: W, path: &str, rows: &[ExportRow]) -> DashResult<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(writer);
    wtr.write_record(EXPORT_HEADER)
        .context(CsvWriteSnafu { path })?;
    for r in rows {
        let scores: Vec<String> = r.activity_scores.iter().map(|x| x.to_string()).collect();
        let percents: Vec<String> = r.block_total_percent.iter().map(|x| format_percent(*x)).collect();
        wtr.write_record([
            r.region.clone(),
            r.block_id.clone(),
            r.block_title.clone(),
            r.activities.join(", "),
            scores.join(", "),
            percents.join(", "),
        ])
        .context(CsvWriteSnafu { path })?;
    }
    wtr.flush().context(WritingOutputSnafu { path })?;
    Ok(())
}

pub fn write_export_csv_file(path: &str, rows: &[ExportRow]) -> DashResult<()> {
    let f = std::fs::File::create(path).context(WritingOutputSnafu { path })?;
    write_export_csv(f, path, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
,GERAL,,Belem/PA,,
idx,Bloco,Atividade,Belem/PA pontuação,Pontuação no Bloco ,Belem/PA %
1,BLOCO 1,Articulação,2,6,0.5
2,,Triagem e Logística,4,,
";

    #[test]
    fn read_two_header_lines() {
        let t = read_matrix_csv(SHEET.as_bytes()).unwrap();
        assert_eq!(t.columns()[0], ColumnKey::flat("idx"));
        assert_eq!(t.columns()[4], ColumnKey::grouped("Belem/PA", "Pontuação no Bloco "));
        assert_eq!(t.columns()[5], ColumnKey::grouped("Belem/PA", "Belem/PA %"));
        assert_eq!(t.num_rows(), 2);
        // Forward-filled block column.
        assert_eq!(t.cell(1, 1), Some(&Cell::Text("BLOCO 1".to_string())));
        assert_eq!(t.cell(1, 3), Some(&Cell::Number(4.0)));
        assert_eq!(t.cell(1, 4), Some(&Cell::Empty));
    }

    #[test]
    fn missing_second_header_line() {
        assert!(matches!(
            read_matrix_csv(",GERAL\n".as_bytes()),
            Err(DashError::MissingHeader {})
        ));
    }

    #[test]
    fn export_with_semicolons() {
        let rows = vec![ExportRow {
            region: "Belem/PA".to_string(),
            block_id: "BLOCO 2".to_string(),
            block_title: "Operação do Banco de Alimentos".to_string(),
            activities: vec!["Estrutura".to_string(), "Processos".to_string()],
            activity_scores: vec![8.0, 6.5],
            block_total_percent: vec![Some(0.25), None],
        }];
        let mut buf: Vec<u8> = Vec::new();
        write_export_csv(&mut buf, "memory", &rows).unwrap();
        let s = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(
            lines[0],
            "Região;Bloco;Título;Atividades;Pontuações;% em relação ao Total do Bloco"
        );
        assert_eq!(
            lines[1],
            "Belem/PA;BLOCO 2;Operação do Banco de Alimentos;Estrutura, Processos;8, 6.5;25.00%, "
        );
    }
}
