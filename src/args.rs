use clap::Parser;

/// Picks a date (and a host and participants) from the export of a Densuke poll.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the settings of the run. See the manual for the keys.
    /// The options given on the command line override the ones of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The exported poll. Setting this option overrides the path of the --config file.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. Guessed from the file extension if not provided.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default shift_jis) The encoding of a CSV input. Densuke exports are in Shift_JIS.
    #[clap(long, value_parser)]
    pub encoding: Option<String>,

    /// (default: the first sheet) When using an Excel file, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (repeated, optional) The participants who must all be available.
    #[clap(short, long, value_parser)]
    pub members: Option<Vec<String>>,

    /// (optional) The option row (scenario) to organize. Lists the possible hosts if --host is not given.
    #[clap(short, long, value_parser)]
    pub scenario: Option<String>,

    /// (optional) The host of the scenario. It must be marked ◎ on the scenario row.
    #[clap(long, value_parser)]
    pub host: Option<String>,

    /// (repeated, optional) The possible participants of the scenario. Defaults to everyone marked ○ on
    /// the scenario row.
    #[clap(long, value_parser)]
    pub pool: Option<Vec<String>>,

    /// (optional) The minimum number of participants for a day to be listed in the ranking.
    #[clap(long, value_parser)]
    pub required: Option<usize>,

    /// (optional) Confirms the given day. It must be one of the proposed days.
    #[clap(short, long, value_parser)]
    pub day: Option<String>,

    /// If passed, everyone must have exactly the same symbol (no ◎ counted as ○).
    #[clap(long, takes_value = false)]
    pub strict: bool,

    /// (wildcard or total) How "○ or better" is understood. With total, ○ also counts as "△ or better".
    #[clap(long, value_parser)]
    pub ordering: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the run will be written in JSON format
    /// to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a JSON summary. If provided, the summary of this run
    /// is checked against it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
