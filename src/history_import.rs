//! Turns a spreadsheet export of past draws into rows of drawn numbers.
//!
//! The official results sheet has a few title rows, then a header row starting
//! with `Concurso`, then one row per draw: contest number, date and the fifteen
//! balls. Other layouts can be described with [`RowLayout`].

use std::io;
use std::path::Path;
use std::sync::Arc;

use polars::error::PolarsError;
use polars::prelude::{
    CsvReadOptions, DataType, Field, PolarsResult, Schema, SerReader, StringChunked,
};

/// First cell of the header row that precedes the draws.
pub const HEADER_MARKER: &str = "Concurso";

/// Where the drawn numbers sit within a data row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowLayout {
    /// Leading cells before the first ball (contest number and date by default).
    pub skip_columns: usize,
    /// Number of ball cells read after the skipped ones.
    pub numbers: usize,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            skip_columns: 2,
            numbers: 15,
        }
    }
}

/// Read the first `width` cells of every row of a CSV file as text. Empty or
/// missing cells are `None`; cells past `width` are dropped.
///
/// The width is fixed up front because exports open with title rows that are
/// narrower than the draw rows below them.
pub fn read_csv_cells<P: AsRef<Path>>(
    path: P,
    separator: u8,
    width: usize,
) -> io::Result<Vec<Vec<Option<String>>>> {
    let schema = Schema::from_iter(
        (0..width.max(1)).map(|i| Field::new(&format!("cell_{}", i + 1), DataType::String)),
    );
    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_schema(Some(Arc::new(schema)))
        .map_parse_options(|opts| {
            opts.with_separator(separator)
                .with_truncate_ragged_lines(true)
        })
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))
        .map_err(polars_to_io_error)?
        .finish()
        .map_err(polars_to_io_error)?;

    let columns: Vec<&StringChunked> = df
        .get_columns()
        .iter()
        .map(|column| column.str())
        .collect::<PolarsResult<_>>()
        .map_err(polars_to_io_error)?;

    let mut rows = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        rows.push(
            columns
                .iter()
                .map(|column| column.get(row).map(str::to_string))
                .collect(),
        );
    }
    Ok(rows)
}

/// Extract the drawn numbers of every data row.
///
/// Data starts after the [`HEADER_MARKER`] row when there is one, at the top
/// otherwise. Blank rows are dropped. Cells that are not integers are left
/// out, so a damaged row comes back short and is rejected when reconciled.
pub fn rows_from_cells(cells: &[Vec<Option<String>>], layout: RowLayout) -> Vec<Vec<i64>> {
    let start = cells
        .iter()
        .position(|row| {
            row.first()
                .and_then(|cell| cell.as_deref())
                .is_some_and(|cell| cell.trim().eq_ignore_ascii_case(HEADER_MARKER))
        })
        .map_or(0, |header| header + 1);

    cells[start..]
        .iter()
        .filter(|row| {
            row.iter()
                .any(|cell| cell.as_deref().is_some_and(|c| !c.trim().is_empty()))
        })
        .map(|row| {
            row.iter()
                .skip(layout.skip_columns)
                .take(layout.numbers)
                .filter_map(|cell| cell.as_deref().and_then(parse_cell))
                .collect()
        })
        .collect()
}

/// Read a CSV export and extract its draw rows.
pub fn load_history<P: AsRef<Path>>(
    path: P,
    separator: u8,
    layout: RowLayout,
) -> io::Result<Vec<Vec<i64>>> {
    let cells = read_csv_cells(path, separator, layout.skip_columns + layout.numbers)?;
    Ok(rows_from_cells(&cells, layout))
}

/// Spreadsheet exports sometimes write whole numbers as `5.0`.
fn parse_cell(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(value) = cell.parse::<i64>() {
        return Some(value);
    }
    let value = cell.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

fn polars_to_io_error(err: PolarsError) -> io::Error {
    io::Error::other(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<Option<String>> {
        cells
            .iter()
            .map(|c| (!c.is_empty()).then(|| c.to_string()))
            .collect()
    }

    const BALLS: [&str; 15] = [
        "5", "1", "9", "12", "20", "3", "7", "14", "22", "2", "10", "17", "25", "6", "11",
    ];

    fn draw_row(contest: &str) -> Vec<Option<String>> {
        let mut cells = vec![contest, "29/09/2003"];
        cells.extend(BALLS);
        row(&cells)
    }

    #[test]
    fn skips_title_rows_until_header() {
        let mut header = vec!["Concurso", "Data Sorteio"];
        let ball_names: Vec<String> = (1..=15).map(|i| format!("Bola{}", i)).collect();
        header.extend(ball_names.iter().map(String::as_str));
        let cells = vec![
            row(&["Resultados Lotofácil"]),
            row(&[""]),
            row(&header),
            draw_row("1"),
            draw_row("2"),
        ];
        let rows = rows_from_cells(&cells, RowLayout::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec![5, 1, 9, 12, 20, 3, 7, 14, 22, 2, 10, 17, 25, 6, 11]
        );
    }

    #[test]
    fn without_header_reads_from_top() {
        let cells = vec![draw_row("1"), row(&[]), draw_row("2")];
        assert_eq!(rows_from_cells(&cells, RowLayout::default()).len(), 2);
    }

    #[test]
    fn bad_cells_shorten_the_row() {
        let mut damaged = draw_row("3");
        damaged[4] = Some("x".to_string());
        damaged[5] = None;
        let rows = rows_from_cells(&[damaged], RowLayout::default());
        assert_eq!(rows[0].len(), 13);
    }

    #[test]
    fn custom_layout() {
        let cells = vec![row(&BALLS)];
        let layout = RowLayout {
            skip_columns: 0,
            numbers: 15,
        };
        assert_eq!(rows_from_cells(&cells, layout)[0].len(), 15);
    }

    fn temp_csv(name: &str, text: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "lotofacil-history-{}-{}.csv",
            std::process::id(),
            name
        ));
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn narrow_title_row_keeps_draw_cells() {
        let path = temp_csv(
            "narrow-title",
            "Resultados\n\
             Concurso,Data,B1,B2,B3,B4,B5,B6,B7,B8,B9,B10,B11,B12,B13,B14,B15\n\
             1,29/09/2003,5,1,9,12,20,3,7,14,22,2,10,17,25,6,11\n",
        );
        let rows = load_history(&path, b',', RowLayout::default()).unwrap();
        assert_eq!(
            rows,
            vec![vec![5, 1, 9, 12, 20, 3, 7, 14, 22, 2, 10, 17, 25, 6, 11]]
        );
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn cells_past_the_layout_are_dropped() {
        let path = temp_csv("wide-rows", "1,2,3,4\n5,6\n");
        let cells = read_csv_cells(&path, b',', 3).unwrap();
        assert_eq!(
            cells,
            vec![
                vec![Some("1".to_string()), Some("2".to_string()), Some("3".to_string())],
                vec![Some("5".to_string()), Some("6".to_string()), None],
            ]
        );
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn parses_spreadsheet_numbers() {
        assert_eq!(parse_cell(" 7 "), Some(7));
        assert_eq!(parse_cell("7.0"), Some(7));
        assert_eq!(parse_cell("7.5"), None);
        assert_eq!(parse_cell("-3"), Some(-3));
        assert_eq!(parse_cell("NaN"), None);
        assert_eq!(parse_cell(""), None);
    }
}
