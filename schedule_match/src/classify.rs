use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::config::{Table, TableError};

lazy_static! {
    // month/day, anywhere in the label: "4/1(月) 20:00〜"
    static ref DATE_PATTERN: Regex = Regex::new(r"\d{1,2}/\d{1,2}").unwrap();
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum RowClass {
    /// A candidate day.
    DateRow,
    /// A named option (a scenario, an activity) that people mark with their
    /// preference or their role.
    OptionRow,
}

/// The heuristics that sort the rows of an export.
///
/// The date pattern is always checked first: the exclusions only apply to
/// rows that are not dates.
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    pub date_pattern: Regex,
    /// Labels containing one of these are section separators.
    pub excluded_substrings: Vec<String>,
    /// Labels wrapped in one of these (opening, closing) pairs are headings.
    pub excluded_brackets: Vec<(String, String)>,
    /// Labels that are bookkeeping lines of the export.
    pub excluded_labels: Vec<String>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        ClassifierRules {
            date_pattern: DATE_PATTERN.clone(),
            excluded_substrings: vec!["----".to_string()],
            excluded_brackets: vec![("【".to_string(), "】".to_string())],
            excluded_labels: vec!["最終更新日時".to_string()],
        }
    }
}

impl ClassifierRules {
    /// The default rules with another pattern for the date rows.
    pub fn with_date_pattern(pattern: &str) -> Result<ClassifierRules, TableError> {
        let date_pattern =
            Regex::new(pattern).map_err(|e| TableError::InvalidPattern(e.to_string()))?;
        Ok(ClassifierRules {
            date_pattern,
            ..ClassifierRules::default()
        })
    }

    pub fn is_date(&self, label: &str) -> bool {
        self.date_pattern.is_match(label)
    }

    pub fn is_excluded(&self, label: &str) -> bool {
        self.excluded_substrings
            .iter()
            .any(|s| !s.is_empty() && label.contains(s.as_str()))
            || self.excluded_brackets.iter().any(|(open, close)| {
                label.len() >= open.len() + close.len()
                    && label.starts_with(open.as_str())
                    && label.ends_with(close.as_str())
            })
            || self.excluded_labels.iter().any(|l| l == label)
    }

    /// The class of a row, or None if the row is not data.
    pub fn row_class(&self, label: &str) -> Option<RowClass> {
        if self.is_date(label) {
            Some(RowClass::DateRow)
        } else if self.is_excluded(label) {
            None
        } else {
            Some(RowClass::OptionRow)
        }
    }
}

/// The rows of a table, split by class. Both lists follow the order of the
/// table.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Classification {
    pub date_rows: Vec<String>,
    pub option_rows: Vec<String>,
}

impl Classification {
    pub fn row_class(&self, label: &str) -> Option<RowClass> {
        if self.date_rows.iter().any(|r| r == label) {
            Some(RowClass::DateRow)
        } else if self.option_rows.iter().any(|r| r == label) {
            Some(RowClass::OptionRow)
        } else {
            None
        }
    }
}

/// Splits the rows of a table into date rows and option rows.
///
/// ```
/// use schedule_match::{classify, load_table, ClassifierRules};
///
/// let table = load_table("日程,A\n4/1(月),◎\n【シナリオ】,\nシナリオX,○\n最終更新日時,\n")?;
/// let classes = classify(&table, &ClassifierRules::default());
/// assert_eq!(classes.date_rows, vec!["4/1(月)".to_string()]);
/// assert_eq!(classes.option_rows, vec!["シナリオX".to_string()]);
/// # Ok::<(), schedule_match::TableError>(())
/// ```
pub fn classify(table: &Table, rules: &ClassifierRules) -> Classification {
    let mut res = Classification::default();
    for label in table.rows() {
        match rules.row_class(label) {
            Some(RowClass::DateRow) => res.date_rows.push(label.clone()),
            Some(RowClass::OptionRow) => res.option_rows.push(label.clone()),
            None => {
                debug!("classify: skipping row {:?}", label);
            }
        }
    }
    debug!(
        "classify: {} date rows, {} option rows out of {} rows",
        res.date_rows.len(),
        res.option_rows.len(),
        table.rows().len()
    );
    res
}
