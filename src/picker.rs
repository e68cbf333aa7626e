use log::{debug, info, warn};

use schedule_match::*;
use snafu::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::picker::config_reader::*;
use crate::picker::io_common::{day_list, guess_provider, simplify_file_name};

mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum PickerError {
    #[snafu(display("Error opening file {path}"))]
    OpeningInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Unknown encoding {label:?}"))]
    UnknownEncoding { label: String },
    #[snafu(display("The file {path} is not valid {encoding}"))]
    Decoding { path: String, encoding: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("No worksheet named {name:?} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Invalid date pattern {pattern:?}"))]
    InvalidPattern {
        source: TableError,
        pattern: String,
    },
    #[snafu(display("Cannot load the poll {path}: {source}"))]
    LoadingTable { source: TableError, path: String },
    #[snafu(display("No input file: use --input or the filePath of the configuration"))]
    MissingInput {},
    #[snafu(display("{scenario:?} is not an option of the poll: {options:?}"))]
    UnknownScenario {
        scenario: String,
        options: Vec<String>,
    },
    #[snafu(display("{day:?} is not one of the proposed days: {candidates:?}"))]
    UnknownDay {
        day: String,
        candidates: Vec<String>,
    },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type PickerResult<T> = Result<T, PickerError>;

/// Everything a run needs, once the command line and the configuration file
/// are merged.
#[derive(Debug, Clone)]
struct RunSettings {
    input_path: String,
    provider: String,
    encoding: String,
    delimiter: u8,
    excel_worksheet_name: Option<String>,
    classifier: ClassifierRules,
    predicates: PredicateSet,
    ordering: TierOrdering,
    required: Option<usize>,
    members: Vec<String>,
    scenario: Option<String>,
    host: Option<String>,
    pool: Option<Vec<String>>,
    day: Option<String>,
    out: Option<String>,
    reference: Option<String>,
}

fn build_settings(args: &Args) -> PickerResult<RunSettings> {
    let (config, root_p): (PickerConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root_p = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (config, root_p)
        }
        None => (PickerConfig::default(), PathBuf::new()),
    };

    // The command line takes precedence over the configuration file.
    let input_path = match (&args.input, &config.source.file_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => root_p.join(p).display().to_string(),
        (None, None) => return MissingInputSnafu {}.fail(),
    };
    let provider = validate_provider(
        args.input_type
            .as_deref()
            .or(config.source.provider.as_deref())
            .unwrap_or_else(|| guess_provider(&input_path)),
    )?;
    let encoding = args
        .encoding
        .clone()
        .or_else(|| config.source.encoding.clone())
        .unwrap_or_else(|| "shift_jis".to_string());
    let predicates = if args.strict {
        PredicateSet::STRICT
    } else {
        validate_predicates(config.rules.predicates.as_deref())?
    };
    let ordering = validate_ordering(
        args.ordering
            .as_deref()
            .or(config.rules.ordering.as_deref()),
    )?;

    Ok(RunSettings {
        input_path,
        provider,
        encoding,
        delimiter: validate_delimiter(config.source.delimiter.as_deref())?,
        excel_worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| config.source.excel_worksheet_name.clone()),
        classifier: validate_classifier(&config.classifier)?,
        predicates,
        ordering,
        required: args.required.or(config.rules.required_participants),
        members: args
            .members
            .clone()
            .or_else(|| config.selection.members.clone())
            .unwrap_or_default(),
        scenario: args
            .scenario
            .clone()
            .or_else(|| config.selection.scenario.clone()),
        host: args.host.clone().or_else(|| config.selection.host.clone()),
        pool: args.pool.clone().or_else(|| config.selection.pool.clone()),
        day: args.day.clone().or_else(|| config.selection.day.clone()),
        out: args.out.clone(),
        reference: args.reference.clone(),
    })
}

fn read_table(settings: &RunSettings) -> PickerResult<Table> {
    let path = settings.input_path.as_str();
    let grid = match settings.provider.as_str() {
        "xlsx" => io_xlsx::read_xlsx_grid(path, settings.excel_worksheet_name.as_deref())?,
        _ => io_csv::read_csv_grid(path, &settings.encoding, settings.delimiter)?,
    };
    load_grid(grid).context(LoadingTableSnafu { path })
}

fn string_list(l: &[String]) -> JSValue {
    json!(l)
}

fn ranking_to_json(entries: &[RankingEntry]) -> Vec<JSValue> {
    entries
        .iter()
        .map(|e| {
            json!({
                "day": e.day,
                "hostSymbol": e.host_symbol.to_string(),
                "count": e.count,
                "participants": e.participants,
            })
        })
        .collect()
}

fn print_decision(summary: &Summary, participants: &[String]) {
    println!("決定: {}", summary);
    println!("コピー用メンバー一覧: {}", member_list(participants));
}

/// Finds the days shared by the members, and confirms the chosen one.
fn pick_date(
    table: &Table,
    classes: &Classification,
    settings: &RunSettings,
    summary_js: &mut JSMap<String, JSValue>,
) -> PickerResult<()> {
    let members = &settings.members;
    let dates = match_dates(
        table,
        &classes.date_rows,
        members,
        &settings.predicates,
        settings.ordering,
    );
    info!("dates for {:?}: {:?}", members, dates);

    println!("全員が◎の日: {}", day_list(&dates.double_circle_days));
    println!("全員が○以上の日: {}", day_list(&dates.circle_or_better_days));
    println!("全員が△以上の日: {}", day_list(&dates.triangle_or_better_days));

    summary_js.insert("members".to_string(), string_list(members));
    summary_js.insert(
        "dates".to_string(),
        json!({
            "doubleCircle": dates.double_circle_days,
            "circleOrBetter": dates.circle_or_better_days,
            "triangleOrBetter": dates.triangle_or_better_days,
        }),
    );

    if let Some(day) = &settings.day {
        let candidates: Vec<String> = dates.candidates().into_iter().map(|(d, _)| d).collect();
        ensure!(
            candidates.contains(day),
            UnknownDaySnafu {
                day: day.clone(),
                candidates
            }
        );
        let summary = Summary::Day {
            day: day.clone(),
            participants: members.clone(),
        };
        print_decision(&summary, members);
        summary_js.insert("decision".to_string(), json!(summary.to_string()));
        summary_js.insert("memberList".to_string(), json!(member_list(members)));
    }
    Ok(())
}

/// Ranks the days of a scenario for its host, and confirms the chosen one.
fn pick_scenario(
    table: &Table,
    classes: &Classification,
    settings: &RunSettings,
    scenario: &str,
    summary_js: &mut JSMap<String, JSValue>,
) -> PickerResult<()> {
    ensure!(
        classes.option_rows.iter().any(|o| o == scenario),
        UnknownScenarioSnafu {
            scenario,
            options: classes.option_rows.clone()
        }
    );
    let roles = scenario_roles(table, scenario);
    let host = match &settings.host {
        Some(h) => h.clone(),
        None => {
            println!("「{}」のGM候補: {}", scenario, member_list(&roles.hosts));
            println!("「{}」のPL候補: {}", scenario, member_list(&roles.pool));
            return Ok(());
        }
    };
    let pool = settings.pool.clone().unwrap_or(roles.pool);
    let ranking = rank_host_participants(
        table,
        &classes.date_rows,
        scenario,
        Some(host.as_str()),
        &pool,
        settings.required,
        settings.ordering,
    );
    if ranking.is_empty() {
        println!("「{}」: 該当なし", scenario);
    }
    for e in ranking.iter() {
        println!(
            "{} (GM {}) {}人: {}",
            e.day,
            e.host_symbol,
            e.count,
            member_list(&e.participants)
        );
    }
    summary_js.insert(
        "ranking".to_string(),
        JSValue::Array(ranking_to_json(&ranking)),
    );

    if let Some(day) = &settings.day {
        let entry = ranking.iter().find(|e| e.day == *day).context(UnknownDaySnafu {
            day: day.clone(),
            candidates: ranking.iter().map(|e| e.day.clone()).collect::<Vec<String>>(),
        })?;
        let summary = Summary::Scenario {
            scenario: scenario.to_string(),
            host,
            participants: entry.participants.clone(),
        };
        print_decision(&summary, &entry.participants);
        summary_js.insert("decision".to_string(), json!(summary.to_string()));
        summary_js.insert(
            "memberList".to_string(),
            json!(member_list(&entry.participants)),
        );
    }
    Ok(())
}

fn build_summary_js(
    table: &Table,
    classes: &Classification,
    settings: &RunSettings,
) -> PickerResult<JSValue> {
    let mut summary_js: JSMap<String, JSValue> = JSMap::new();
    summary_js.insert(
        "source".to_string(),
        json!(simplify_file_name(&settings.input_path)),
    );
    summary_js.insert("participants".to_string(), string_list(table.columns()));
    summary_js.insert("dateRows".to_string(), string_list(&classes.date_rows));
    summary_js.insert("optionRows".to_string(), string_list(&classes.option_rows));

    let scenarios: Vec<JSValue> = classes
        .option_rows
        .iter()
        .map(|o| {
            let roles = scenario_roles(table, o);
            json!({"scenario": o, "hosts": roles.hosts, "pool": roles.pool})
        })
        .collect();
    summary_js.insert("scenarios".to_string(), JSValue::Array(scenarios));

    if settings.members.is_empty() && settings.scenario.is_none() {
        println!("メンバー: {}", member_list(table.columns()));
        println!("日程: {}", day_list(&classes.date_rows));
        println!("シナリオ: {}", day_list(&classes.option_rows));
    }
    if !settings.members.is_empty() {
        pick_date(table, classes, settings, &mut summary_js)?;
    }
    if let Some(scenario) = &settings.scenario {
        pick_scenario(table, classes, settings, scenario, &mut summary_js)?;
    }
    Ok(JSValue::Object(summary_js))
}

fn write_summary(out: &str, pretty_js: &str) -> PickerResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
    } else if !out.is_empty() {
        info!("Writing summary to {:?}", out);
        fs::write(out, pretty_js).context(WritingOutputSnafu { path: out })?;
    }
    Ok(())
}

pub fn run_picker(args: &Args) -> PickerResult<()> {
    let settings = build_settings(args)?;
    info!("settings: {:?}", settings);

    let table = read_table(&settings)?;
    let classes = classify(&table, &settings.classifier);
    debug!("classes: {:?}", classes);

    let summary_js = build_summary_js(&table, &classes, &settings)?;
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    debug!("summary: {}", pretty_js);

    if let Some(out) = &settings.out {
        write_summary(out, &pretty_js)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_p) = &settings.reference {
        let summary_ref = read_summary(reference_p)?;
        if summary_ref != summary_js {
            let pretty_ref =
                serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
            warn!("Found differences with the reference summary");
            print_diff(pretty_ref.as_str(), pretty_js.as_str(), "\n");
            return ReferenceMismatchSnafu {
                path: reference_p.clone(),
            }
            .fail();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_dir(test_name: &str) -> String {
        format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), test_name)
    }

    fn run_picker_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
        init();
        let dir = test_dir(test_name);
        info!("Running test {}", test_name);
        let args = Args {
            config: Some(format!("{}/{}", dir, config_lpath)),
            reference: Some(format!("{}/{}", dir, summary_lpath)),
            ..Default::default()
        };
        let res = run_picker(&args);
        if let Err(e) = &res {
            eprintln!("An error occured {}", e);
        }
        assert!(res.is_ok());
    }

    fn test_wrapper(test_name: &str) {
        run_picker_test(
            test_name,
            format!("{}_config.json", test_name).as_str(),
            format!("{}_expected_summary.json", test_name).as_str(),
        )
    }

    fn session_args() -> Args {
        Args {
            input: Some(format!("{}/poll.csv", test_dir("session"))),
            ..Default::default()
        }
    }

    #[test]
    fn session() {
        test_wrapper("session");
    }

    #[test]
    fn ranking() {
        test_wrapper("ranking");
    }

    #[test]
    fn total_ordering() {
        test_wrapper("total_ordering");
    }

    #[test]
    fn workbook() {
        test_wrapper("workbook");
    }

    #[test]
    fn workbook_named_worksheet() {
        init();
        let out = std::env::temp_dir().join("densuke_picker_workbook_named_worksheet.json");
        let args = Args {
            input: Some(format!("{}/poll.xlsx", test_dir("workbook"))),
            excel_worksheet_name: Some("予備".to_string()),
            members: Some(vec!["さくら".to_string()]),
            out: Some(out.display().to_string()),
            ..Default::default()
        };
        assert!(run_picker(&args).is_ok());
        let js = read_summary(&out.display().to_string()).unwrap();
        assert_eq!(js["participants"], json!(["さくら"]));
        assert_eq!(js["dateRows"], json!(["5/1(水)"]));
        assert_eq!(js["dates"]["doubleCircle"], json!(["5/1(水)"]));
        let _ = fs::remove_file(out);
    }

    #[test]
    fn workbook_missing_worksheet() {
        init();
        let args = Args {
            input: Some(format!("{}/poll.xlsx", test_dir("workbook"))),
            input_type: Some("xlsx".to_string()),
            excel_worksheet_name: Some("集計".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            run_picker(&args),
            Err(PickerError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn roster_only() {
        init();
        assert!(run_picker(&session_args()).is_ok());
    }

    #[test]
    fn command_line_overrides_config() {
        init();
        let dir = test_dir("session");
        let args = Args {
            config: Some(format!("{}/session_config.json", dir)),
            reference: Some(format!("{}/session_expected_summary.json", dir)),
            strict: true,
            ..Default::default()
        };
        // Strict matching leaves 4/3 as the only day for the three members.
        assert!(matches!(
            run_picker(&args),
            Err(PickerError::UnknownDay { .. })
        ));
    }

    #[test]
    fn unknown_day() {
        init();
        let args = Args {
            members: Some(vec!["たろう".to_string(), "さくら".to_string()]),
            day: Some("4/3(水) 20:00".to_string()),
            ..session_args()
        };
        assert!(matches!(
            run_picker(&args),
            Err(PickerError::UnknownDay { .. })
        ));
    }

    #[test]
    fn unknown_scenario() {
        init();
        let args = Args {
            scenario: Some("最終更新日時".to_string()),
            ..session_args()
        };
        assert!(matches!(
            run_picker(&args),
            Err(PickerError::UnknownScenario { .. })
        ));
    }

    #[test]
    fn wrong_encoding() {
        init();
        let args = Args {
            encoding: Some("utf-8".to_string()),
            ..session_args()
        };
        assert!(matches!(
            run_picker(&args),
            Err(PickerError::Decoding { .. })
        ));
    }

    #[test]
    fn missing_input() {
        assert!(matches!(
            run_picker(&Args::default()),
            Err(PickerError::MissingInput {})
        ));
    }

    #[test]
    fn writes_the_summary() {
        init();
        let out = std::env::temp_dir().join("densuke_picker_writes_the_summary.json");
        let args = Args {
            members: Some(vec!["たろう".to_string(), "はなこ".to_string()]),
            out: Some(out.display().to_string()),
            ..session_args()
        };
        assert!(run_picker(&args).is_ok());
        let js = read_summary(&out.display().to_string()).unwrap();
        assert_eq!(js["members"], json!(["たろう", "はなこ"]));
        assert_eq!(js["dates"]["doubleCircle"], json!(["4/3(水) 20:00"]));
        let _ = fs::remove_file(out);
    }
}
