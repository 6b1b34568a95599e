use calamine::DataType;

use crate::dashboard::{io_common::*, *};

/// Reads the evaluation matrix from an Excel workbook.
pub fn read_matrix_xlsx(path: &str, worksheet_name: Option<&str>) -> DashResult<RawTable> {
    let wrange = get_range(path, worksheet_name)?;
    debug!(
        "read_matrix_xlsx: path: {:?} size: {:?}",
        path,
        wrange.get_size()
    );
    table_from_rows(wrange.rows())
}

/// Converts the rows of a worksheet, the first two being the header.
pub fn table_from_rows<'a, I>(rows: I) -> DashResult<RawTable>
where
    I: Iterator<Item = &'a [DataType]>,
{
    let mut iter = rows;
    let groups = iter.next().context(MissingHeaderSnafu {})?;
    let metrics = iter.next().context(MissingHeaderSnafu {})?;
    let columns = build_header(&header_labels(groups), &header_labels(metrics));
    debug!("table_from_rows: columns: {:?}", columns);

    let mut res: Vec<Vec<Cell>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let cells: Vec<Cell> = row.iter().map(read_cell).collect();
        debug!("table_from_rows: idx: {:?} row: {:?}", idx, &cells);
        res.push(cells);
    }
    Ok(finish_table(columns, res))
}

fn header_labels(row: &[DataType]) -> Vec<Option<String>> {
    row.iter()
        .map(|dt| match dt {
            DataType::Empty => None,
            DataType::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
        .collect()
}

fn read_cell(dt: &DataType) -> Cell {
    match dt {
        DataType::Empty => Cell::Empty,
        DataType::Float(f) => Cell::Number(*f),
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::Bool(b) => Cell::Bool(*b),
        DataType::DateTime(f) => Cell::Number(*f),
        DataType::String(s) if s.trim().is_empty() => Cell::Empty,
        DataType::String(s) => Cell::Text(s.clone()),
        // Error cells (#DIV/0! and the like) are kept as text so they fail the number conversion.
        other => Cell::Text(other.to_string()),
    }
}

fn get_range(path: &str, worksheet_name_o: Option<&str>) -> DashResult<calamine::Range<DataType>> {
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name,
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyWorkbookSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}
