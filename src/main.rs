use clap::Parser;
use crate::commands::extract::ExtractOptions;
use crate::features::Profile;

pub mod utils;
mod commands;
mod datasets;
mod errors;
mod features;
mod statistics;

const DEFAULT_INPUT: &str = "../rt_results/rt_*.csv";
const DEFAULT_OUTPUT: &str = "../rt_results/country_features.csv";

#[derive(clap::Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    Extract(ExtractCommand),
    Inspect(InspectCommand),
    ListFeatures(ListFeaturesCommand),
}

#[derive(clap::Args)]
struct ExtractCommand {
    #[clap(short, long, default_value = DEFAULT_INPUT)]
    input: String,

    #[clap(short, long, default_value = DEFAULT_OUTPUT)]
    output: std::path::PathBuf,

    #[clap(short, long, value_enum, default_value_t = Profile::Efficient)]
    profile: Profile,

    #[clap(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    fill_value: f64,

    #[clap(short, long)]
    summary: Option<std::path::PathBuf>,

    #[clap(long)]
    no_progress: bool,
}

#[derive(clap::Args)]
struct InspectCommand {
    #[clap(short, long, default_value = DEFAULT_INPUT)]
    input: String,
}

#[derive(clap::Args)]
struct ListFeaturesCommand {
    #[clap(short, long, value_enum, default_value_t = Profile::Efficient)]
    profile: Profile,
}

fn setup_logging() -> anyhow::Result<flexi_logger::LoggerHandle> {
    let spec = flexi_logger::LogSpecification::parse("warn,rt_features=debug")?;
    let handle = flexi_logger::Logger::with(spec)
        .log_to_file(
            flexi_logger::FileSpec::default()
                .directory("logs")
                .basename("rt_features")
                .use_timestamp(false),
        )
        .duplicate_to_stdout(flexi_logger::Duplicate::Info)
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stdout(flexi_logger::colored_detailed_format)
        .set_palette("b1;3;2;4;6".to_string())
        .start()?;
    Ok(handle)
}

fn main() -> anyhow::Result<()> {
    let _logger = setup_logging()?;
    log::info!("Starting rt_features!");

    let cli = Cli::parse();

    match cli.command {
        Command::Extract(extract) => {
            commands::extract::extract_country_features(ExtractOptions {
                input_pattern: extract.input,
                output: extract.output,
                profile: extract.profile,
                fill_value: extract.fill_value,
                summary: extract.summary,
                show_progress: !extract.no_progress,
            })?;
        }
        Command::Inspect(inspect) => {
            commands::inspect::inspect_country_files(&inspect.input)?;
        }
        Command::ListFeatures(list) => {
            commands::list_features::list_features(list.profile)?;
        }
    }

    Ok(())
}
