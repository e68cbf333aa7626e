// Primitives for reading CSV files.

use encoding_rs::Encoding;

use crate::picker::*;

/// Reads a delimited export into rows of cells.
pub fn read_csv_grid(path: &str, encoding: &str, delimiter: u8) -> PickerResult<Vec<Vec<String>>> {
    info!("Attempting to read poll file {:?}", path);
    let bytes = fs::read(path).context(OpeningInputSnafu { path })?;
    let text = decode(&bytes, encoding, path)?;
    split_grid(&text, delimiter, path)
}

/// Decodes the raw bytes of an export. A byte order mark takes precedence
/// over the requested encoding.
pub fn decode(bytes: &[u8], label: &str, path: &str) -> PickerResult<String> {
    let encoding =
        Encoding::for_label(label.trim().as_bytes()).context(UnknownEncodingSnafu { label })?;
    let (text, used, had_errors) = encoding.decode(bytes);
    if used != encoding {
        debug!(
            "decode: {}: found a byte order mark for {}",
            path,
            used.name()
        );
    }
    ensure!(
        !had_errors,
        DecodingSnafu {
            path,
            encoding: used.name()
        }
    );
    Ok(text.into_owned())
}

pub fn split_grid(text: &str, delimiter: u8, path: &str) -> PickerResult<Vec<Vec<String>>> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());
    let mut res: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        let lineno = idx + 1;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        debug!("split_grid: {:?} {:?}", lineno, line);
        res.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_shift_jis() {
        let text = "日程,たろう\n4/1(月),◎\n4/2(火),△\n";
        let (bytes, _, unmappable) = encoding_rs::SHIFT_JIS.encode(text);
        assert!(!unmappable);
        assert_ne!(&bytes[..], text.as_bytes());
        assert_eq!(decode(&bytes, "shift_jis", "poll.csv").unwrap(), text);
        assert_eq!(decode(&bytes, "Shift_JIS", "poll.csv").unwrap(), text);
    }

    #[test]
    fn byte_order_mark_wins() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend("日程,A\n".as_bytes());
        assert_eq!(decode(&bytes, "shift_jis", "poll.csv").unwrap(), "日程,A\n");
    }

    #[test]
    fn decoding_errors() {
        assert!(matches!(
            decode(b"abc", "klingon", "poll.csv"),
            Err(PickerError::UnknownEncoding { .. })
        ));
        assert!(matches!(
            decode(&[0x82, 0xA0, 0xFF, 0xFE, 0x41], "utf-8", "poll.csv"),
            Err(PickerError::Decoding { .. })
        ));
    }

    #[test]
    fn splits_with_delimiter() {
        let grid = split_grid("日程\tA\tB\n4/1\t◎\n", b'\t', "poll.tsv").unwrap();
        assert_eq!(
            grid,
            vec![
                vec!["日程".to_string(), "A".to_string(), "B".to_string()],
                vec!["4/1".to_string(), "◎".to_string()],
            ]
        );
    }
}
