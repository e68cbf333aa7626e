/*!
Availability matching for exported scheduling polls.

A poll export is a table: the rows are candidate days ("4/1(月) 20:00〜") or
named options (a scenario to play, an activity), the columns are the
participants, and every cell holds one of the poll symbols ◎ ○ △ ×.

This crate answers two questions over such a table:
- on which days do all the selected participants agree ([`match_dates`])?
- for a chosen option and a host marked ◎ on it, which days gather the most
  participants ([`rank_host_participants`])?

```
use schedule_match::*;

let table = load_table("日程,A,B\n4/1,◎,○\n4/2,○,○\n")?;
let classes = classify(&table, &ClassifierRules::default());
let members = vec!["A".to_string(), "B".to_string()];
let res = match_dates(
    &table,
    &classes.date_rows,
    &members,
    &PredicateSet::DEFAULT,
    TierOrdering::Wildcard,
);
assert!(res.double_circle_days.is_empty());
assert_eq!(res.circle_or_better_days, vec!["4/1", "4/2"]);
# Ok::<(), TableError>(())
```

See the [manual] for the input format and the matching rules.
*/
pub mod builder;
mod classify;
mod config;
pub mod manual;
mod summary;

use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::classify::*;
pub use crate::config::*;
pub use crate::summary::*;

/// Reads a table from the decoded text of an export.
///
/// The first row is the header (label column name, then participant names),
/// the first column holds the row labels.
pub fn load_table(text: &str) -> Result<Table, TableError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut grid: Vec<Vec<String>> = Vec::new();
    for (idx, record_r) in rdr.records().enumerate() {
        let record = record_r.map_err(|e| TableError::Csv(format!("line {}: {}", idx + 1, e)))?;
        grid.push(record.iter().map(|s| s.to_string()).collect());
    }
    debug!("load_table: read {} lines", grid.len());
    load_grid(grid)
}

/// Builds a table from rows of cells that are already split.
pub fn load_grid(grid: Vec<Vec<String>>) -> Result<Table, TableError> {
    let mut lines = grid.into_iter().filter(|r| !r.is_empty());
    let header = lines.next().ok_or(TableError::EmptyInput)?;
    if header.iter().all(|c| c.trim().is_empty()) {
        return Err(TableError::MissingHeader);
    }

    let label_header = header[0].trim().to_string();
    let mut names: Vec<String> = header[1..].iter().map(|c| c.trim().to_string()).collect();
    // Exports often end their lines with a separator.
    while names.last().map(|n| n.is_empty()).unwrap_or(false) {
        names.pop();
    }
    let mut columns: Vec<String> = Vec::new();
    for (idx, name) in names.into_iter().enumerate() {
        if name.is_empty() {
            return Err(TableError::EmptyColumnName(idx + 2));
        }
        if columns.contains(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        columns.push(name);
    }

    let mut rows: Vec<String> = Vec::new();
    let mut cells: HashMap<String, Vec<Symbol>> = HashMap::new();
    for line in lines {
        let label = line[0].trim().to_string();
        if label.is_empty() {
            debug!("load_grid: skipping line without label: {:?}", line);
            continue;
        }
        if cells.contains_key(&label) {
            warn!("load_grid: row {:?} appears twice, keeping the first one", label);
            continue;
        }
        if line.len() > columns.len() + 1 {
            debug!(
                "load_grid: row {:?}: ignoring {} cells past the last column",
                label,
                line.len() - columns.len() - 1
            );
        }
        let row_cells: Vec<Symbol> = (0..columns.len())
            .map(|idx| {
                line.get(idx + 1)
                    .map(|c| Symbol::parse(c))
                    .unwrap_or(Symbol::Blank)
            })
            .collect();
        rows.push(label.clone());
        cells.insert(label, row_cells);
    }

    info!(
        "Loaded table with {} rows and {} participants",
        rows.len(),
        columns.len()
    );
    Ok(Table {
        label_header,
        columns,
        rows,
        cells,
    })
}

fn check_participants(table: &Table, participants: &[String]) {
    for p in participants.iter().filter(|p| !table.has_column(p)) {
        warn!("Unknown participant {:?}: all the cells will read as blank", p);
    }
}

/// The rows on which every participant satisfies the predicate.
///
/// No participant selected means no conclusion: the result is empty.
pub fn match_rows(
    table: &Table,
    rows: &[String],
    participants: &[String],
    predicate: &SymbolPredicate,
    ordering: TierOrdering,
) -> Vec<String> {
    if participants.is_empty() {
        return Vec::new();
    }
    rows.iter()
        .filter(|row| {
            participants
                .iter()
                .all(|p| predicate.matches(table.cell(row, p), ordering))
        })
        .cloned()
        .collect()
}

/// Finds the days on which all the participants agree, for each of the three
/// tiers of the predicate set.
pub fn match_dates(
    table: &Table,
    date_rows: &[String],
    participants: &[String],
    predicates: &PredicateSet,
    ordering: TierOrdering,
) -> DateMatches {
    check_participants(table, participants);
    let res = DateMatches {
        double_circle_days: match_rows(
            table,
            date_rows,
            participants,
            &predicates.double_circle,
            ordering,
        ),
        circle_or_better_days: match_rows(
            table,
            date_rows,
            participants,
            &predicates.circle,
            ordering,
        ),
        triangle_or_better_days: match_rows(
            table,
            date_rows,
            participants,
            &predicates.triangle,
            ordering,
        ),
    };
    debug!("match_dates: participants: {:?} res: {:?}", participants, res);
    res
}

/// Splits the participants by their mark on an option row: ◎ are the
/// possible hosts, ○ the possible participants.
pub fn scenario_roles(table: &Table, scenario: &str) -> ScenarioRoles {
    if !table.has_row(scenario) {
        warn!("scenario_roles: unknown row {:?}", scenario);
        return ScenarioRoles::default();
    }
    let mut res = ScenarioRoles::default();
    for col in table.columns() {
        match table.cell(scenario, col) {
            Symbol::DoubleCircle => res.hosts.push(col.clone()),
            Symbol::Circle => res.pool.push(col.clone()),
            _ => {}
        }
    }
    res
}

/// Ranks the days on which the host can run the scenario by the number of
/// pool members who can join.
///
/// For each tier ◎, ○, △ in turn, every day on which the host's cell is that
/// symbol produces one entry. A pool member joins when their cell on that day
/// is at least the host's symbol. The entries are sorted by decreasing count;
/// equal counts keep the tier order and then the order of the days.
///
/// Arguments:
/// * `scenario` the option row. The host must be marked ◎ on it.
/// * `pool` the candidate participants, usually the ○ columns of the option row.
/// * `required` if provided, the entries with fewer participants are dropped.
pub fn rank_host_participants(
    table: &Table,
    date_rows: &[String],
    scenario: &str,
    host: Option<&str>,
    pool: &[String],
    required: Option<usize>,
    ordering: TierOrdering,
) -> Vec<RankingEntry> {
    let host = match host.map(|h| h.trim()) {
        Some(h) if !h.is_empty() => h,
        _ => {
            debug!("rank_host_participants: no host selected");
            return Vec::new();
        }
    };
    if *table.cell(scenario, host) != Symbol::DoubleCircle {
        warn!(
            "rank_host_participants: {:?} is not marked ◎ on {:?}",
            host, scenario
        );
        return Vec::new();
    }
    // Each pool member counts once, in the order first given.
    let mut unique_pool: Vec<&String> = Vec::new();
    for p in pool.iter().filter(|p| p.as_str() != host) {
        if unique_pool.contains(&p) {
            debug!("rank_host_participants: {:?} appears twice in the pool", p);
        } else {
            unique_pool.push(p);
        }
    }
    let pool = unique_pool;
    if pool.is_empty() {
        debug!("rank_host_participants: empty pool");
        return Vec::new();
    }

    let mut entries: Vec<RankingEntry> = Vec::new();
    for tier in Symbol::TIERS.iter() {
        let predicate = SymbolPredicate::AtLeast(tier.clone());
        for day in date_rows.iter().filter(|d| table.cell(d, host) == tier) {
            let participants: Vec<String> = pool
                .iter()
                .filter(|p| predicate.matches(table.cell(day, p), ordering))
                .map(|p| p.to_string())
                .collect();
            debug!(
                "rank_host_participants: day: {:?} tier: {} participants: {:?}",
                day, tier, participants
            );
            entries.push(RankingEntry {
                day: day.clone(),
                host_symbol: tier.clone(),
                count: participants.len(),
                participants,
            });
        }
    }

    // Stable: ties stay in tier order, then day order.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(req) = required {
        entries.retain(|e| e.count >= req);
    }
    info!(
        "Ranking for {:?} hosted by {:?}: {} entries",
        scenario,
        host,
        entries.len()
    );
    entries
}
