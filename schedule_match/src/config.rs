// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// The content of one cell of the poll export.
///
/// Only the first three variants express availability. `Cross`, `Other` and
/// `Blank` never satisfy any predicate.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Symbol {
    /// ◎: available, and happy to be there.
    DoubleCircle,
    /// ○: available.
    Circle,
    /// △: maybe.
    Triangle,
    /// ×: not available.
    Cross,
    /// Some content that is not one of the poll symbols.
    Other(String),
    /// An empty cell, or a cell missing from a short row.
    Blank,
}

impl Symbol {
    /// The tiers, from the best one to the weakest one.
    pub const TIERS: [Symbol; 3] = [Symbol::DoubleCircle, Symbol::Circle, Symbol::Triangle];

    /// Reads the content of a cell.
    pub fn parse(cell: &str) -> Symbol {
        match cell.trim() {
            "" => Symbol::Blank,
            "◎" => Symbol::DoubleCircle,
            "○" | "〇" => Symbol::Circle,
            "△" => Symbol::Triangle,
            "×" | "✕" | "x" | "X" => Symbol::Cross,
            s => Symbol::Other(s.to_string()),
        }
    }

    /// The rank of an availability symbol (◎ = 3, ○ = 2, △ = 1).
    pub fn tier_rank(&self) -> Option<u8> {
        match self {
            Symbol::DoubleCircle => Some(3),
            Symbol::Circle => Some(2),
            Symbol::Triangle => Some(1),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Symbol::DoubleCircle => "◎",
            Symbol::Circle => "○",
            Symbol::Triangle => "△",
            Symbol::Cross => "×",
            Symbol::Other(s) => s.as_str(),
            Symbol::Blank => "",
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The availability table, as exported by the poll service.
///
/// Rows are identified by their label (a date or an option name), columns by
/// the participant name. The table cannot be modified once built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Table {
    pub(crate) label_header: String,
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<String>,
    // Keyed by row label. Every vector has exactly one cell per column.
    pub(crate) cells: HashMap<String, Vec<Symbol>>,
}

impl Table {
    /// The name of the first header cell (the label column).
    pub fn label_header(&self) -> &str {
        &self.label_header
    }

    /// The participant names, in the order of the header row.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The row labels, in the order of the export.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell at the given row and column.
    ///
    /// Unknown rows or columns read as `Symbol::Blank`.
    pub fn cell(&self, row: &str, column: &str) -> &Symbol {
        const BLANK: &Symbol = &Symbol::Blank;
        let col_idx = match self.columns.iter().position(|c| c == column) {
            Some(idx) => idx,
            None => return BLANK,
        };
        self.cells
            .get(row)
            .and_then(|cs| cs.get(col_idx))
            .unwrap_or(BLANK)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn has_row(&self, row: &str) -> bool {
        self.cells.contains_key(row)
    }
}

/// Errors that prevent a table from being built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TableError {
    /// The input does not contain a single line.
    EmptyInput,
    /// The first row has no label column name and no participant name.
    MissingHeader,
    /// Two participants share the same name.
    DuplicateColumn(String),
    /// A participant column has an empty name (1-based index of the column).
    EmptyColumnName(usize),
    /// The delimited text could not be read.
    Csv(String),
    /// The date pattern is not a valid regular expression.
    InvalidPattern(String),
}

impl Error for TableError {}

impl Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::EmptyInput => write!(f, "the table is empty"),
            TableError::MissingHeader => write!(f, "the first row is not a header row"),
            TableError::DuplicateColumn(name) => {
                write!(f, "the participant {:?} appears more than once", name)
            }
            TableError::EmptyColumnName(idx) => write!(f, "column {} has no name", idx),
            TableError::Csv(msg) => write!(f, "could not read the table: {}", msg),
            TableError::InvalidPattern(msg) => write!(f, "invalid date pattern: {}", msg),
        }
    }
}

// ********* Configuration **********

/// How `SymbolPredicate::AtLeast` compares symbols.
///
/// Both orderings agree that ◎ satisfies every threshold. They differ on
/// whether ○ satisfies a △-or-better query.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub enum TierOrdering {
    /// `AtLeast(s)` accepts `s` itself or ◎.
    #[default]
    Wildcard,
    /// `AtLeast(s)` accepts every symbol ranked at or above `s`: ◎ ⊇ ○ ⊇ △.
    Total,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SymbolPredicate {
    Exact(Symbol),
    AtLeast(Symbol),
}

impl SymbolPredicate {
    pub fn matches(&self, cell: &Symbol, ordering: TierOrdering) -> bool {
        match self {
            SymbolPredicate::Exact(s) => cell == s,
            SymbolPredicate::AtLeast(s) => match ordering {
                TierOrdering::Wildcard => cell == s || *cell == Symbol::DoubleCircle,
                TierOrdering::Total => match (cell.tier_rank(), s.tier_rank()) {
                    (Some(c), Some(t)) => c >= t,
                    // Not an availability threshold: fall back to equality.
                    (_, None) => cell == s,
                    (None, Some(_)) => false,
                },
            },
        }
    }
}

/// The predicates used for the three result sets of a date match, in
/// priority order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PredicateSet {
    pub double_circle: SymbolPredicate,
    pub circle: SymbolPredicate,
    pub triangle: SymbolPredicate,
}

impl PredicateSet {
    /// ◎ for everyone, then ○-or-better, then △-or-better.
    pub const DEFAULT: PredicateSet = PredicateSet {
        double_circle: SymbolPredicate::Exact(Symbol::DoubleCircle),
        circle: SymbolPredicate::AtLeast(Symbol::Circle),
        triangle: SymbolPredicate::AtLeast(Symbol::Triangle),
    };

    /// Everyone on exactly the same symbol.
    pub const STRICT: PredicateSet = PredicateSet {
        double_circle: SymbolPredicate::Exact(Symbol::DoubleCircle),
        circle: SymbolPredicate::Exact(Symbol::Circle),
        triangle: SymbolPredicate::Exact(Symbol::Triangle),
    };
}

impl Default for PredicateSet {
    fn default() -> Self {
        PredicateSet::DEFAULT
    }
}

// ******** Output data structures *********

/// The days on which all the selected participants agree, one list per
/// tier. A day can appear in several lists.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DateMatches {
    pub double_circle_days: Vec<String>,
    pub circle_or_better_days: Vec<String>,
    pub triangle_or_better_days: Vec<String>,
}

impl DateMatches {
    /// All the candidate days, concatenated in priority order. Duplicates are
    /// kept, each entry tagged with the tier that produced it.
    pub fn candidates(&self) -> Vec<(String, Symbol)> {
        let tiers = [
            (&self.double_circle_days, Symbol::DoubleCircle),
            (&self.circle_or_better_days, Symbol::Circle),
            (&self.triangle_or_better_days, Symbol::Triangle),
        ];
        tiers
            .iter()
            .flat_map(|(days, sym)| days.iter().map(move |d| (d.clone(), sym.clone())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.double_circle_days.is_empty()
            && self.circle_or_better_days.is_empty()
            && self.triangle_or_better_days.is_empty()
    }
}

/// The possible hosts and participants for one option row.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ScenarioRoles {
    /// Columns marked ◎ on the option row.
    pub hosts: Vec<String>,
    /// Columns marked ○ on the option row.
    pub pool: Vec<String>,
}

/// One day on which a host is available, with the pool members who can join.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankingEntry {
    pub day: String,
    /// The host's own symbol on that day.
    pub host_symbol: Symbol,
    pub participants: Vec<String>,
    pub count: usize,
}
