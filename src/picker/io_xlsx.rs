use calamine::{open_workbook, DataType, Reader, Xlsx};
use chrono::{Duration, NaiveDate};

use crate::picker::*;

/// Reads an export saved as an Excel workbook into rows of cells.
pub fn read_xlsx_grid(path: &str, worksheet_name: Option<&str>) -> PickerResult<Vec<Vec<String>>> {
    info!(
        "Attempting to read poll workbook {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    let wrange = if let Some(name) = worksheet_name {
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path })?
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?
    };

    let res: Vec<Vec<String>> = wrange
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    debug!("read_xlsx_grid: {} rows", res.len());
    Ok(res)
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Empty => String::new(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Bool(b) => b.to_string(),
        // Date cells become month/day so that they are recognized as dates.
        DataType::DateTime(serial) => serial_to_month_day(*serial).unwrap_or_else(|| {
            warn!("read_xlsx_grid: date cell out of range: {:?}", serial);
            String::new()
        }),
        _ => {
            warn!("read_xlsx_grid: could not understand cell {:?}", cell);
            String::new()
        }
    }
}

// 9999-12-31, the last day Excel can show.
const MAX_SERIAL: f64 = 2958465.0;

// Excel counts days from 1899-12-30.
fn serial_to_month_day(serial: f64) -> Option<String> {
    if !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_signed(Duration::days(serial.floor() as i64))?;
    Some(date.format("%-m/%-d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook() -> String {
        format!("{}/tests/data/workbook/poll.xlsx", env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn date_cells() {
        assert_eq!(serial_to_month_day(45383.0).as_deref(), Some("4/1"));
        assert_eq!(serial_to_month_day(45383.8333).as_deref(), Some("4/1"));
        assert_eq!(serial_to_month_day(45351.0).as_deref(), Some("2/29"));
        assert_eq!(serial_to_month_day(45291.0).as_deref(), Some("12/31"));
        assert_eq!(serial_to_month_day(MAX_SERIAL).as_deref(), Some("12/31"));
    }

    #[test]
    fn out_of_range_dates_are_blank() {
        assert_eq!(serial_to_month_day(1e300), None);
        assert_eq!(serial_to_month_day(-1.0), None);
        assert_eq!(serial_to_month_day(f64::NAN), None);
        assert_eq!(cell_to_string(&DataType::DateTime(1e300)), "");
        assert_eq!(cell_to_string(&DataType::DateTime(f64::INFINITY)), "");
    }

    #[test]
    fn cells() {
        assert_eq!(cell_to_string(&DataType::String("◎".to_string())), "◎");
        assert_eq!(cell_to_string(&DataType::Empty), "");
        assert_eq!(cell_to_string(&DataType::Int(3)), "3");
        assert_eq!(cell_to_string(&DataType::DateTime(45383.0)), "4/1");
    }

    #[test]
    fn first_worksheet_by_default() {
        let grid = read_xlsx_grid(&workbook(), None).unwrap();
        assert_eq!(grid[0], vec!["日程", "たろう", "はなこ"]);
        assert_eq!(grid[1], vec!["4/1", "◎", "◎"]);
        assert_eq!(grid[3], vec!["【シナリオ】", "", ""]);
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn worksheet_by_name() {
        let grid = read_xlsx_grid(&workbook(), Some("予備")).unwrap();
        assert_eq!(
            grid,
            vec![vec!["日程", "さくら"], vec!["5/1(水)", "◎"]]
        );
    }

    #[test]
    fn missing_worksheet() {
        assert!(matches!(
            read_xlsx_grid(&workbook(), Some("集計")),
            Err(PickerError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_xlsx_grid("does/not/exist.xlsx", None),
            Err(PickerError::OpeningExcel { .. })
        ));
    }
}
