use clap::Parser;

/// Reporting tool for the evaluation matrix of the Ceasas.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the input, the filters and the outputs.
    /// The other options override what is specified in this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, ceasadash will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the summary in JSON format.
    /// Defaults to the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The spreadsheet with the evaluation matrix.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default xlsx) The type of the input: xlsx or csv.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, the name of the worksheet to use. Defaults to the first one.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path) If specified, the filtered table is written there, with ';' as the separator.
    #[clap(long, value_parser)]
    pub csv_out: Option<String>,

    /// Only keep this region. May be repeated.
    #[clap(long, value_parser)]
    pub region: Vec<String>,

    /// Only keep this block (for example 'BLOCO 2'). May be repeated.
    #[clap(long, value_parser)]
    pub block: Vec<String>,

    /// Only keep the blocks with this activity. May be repeated.
    #[clap(long, value_parser)]
    pub activity: Vec<String>,

    /// Lowest block score to keep (inclusive).
    #[clap(long, value_parser)]
    pub min_score: Option<f64>,

    /// Highest block score to keep (inclusive).
    #[clap(long, value_parser)]
    pub max_score: Option<f64>,

    /// The kind of percentage to report per region, for example '% em relação ao Bloco'.
    #[clap(long, value_parser)]
    pub percentage_type: Option<String>,

    /// The block used for the percentages that are not matrix-wide. Defaults to the first block.
    #[clap(long, value_parser)]
    pub percentage_block: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
