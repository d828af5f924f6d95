use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::{LevelFilter, info};
use std::fs;
use std::path::PathBuf;

use packing_list::downloader::to_xlsx;
use packing_list::loader::load_dataset_from_path;
use packing_list::options::{GroupingPolicy, ReportOptions};
use packing_list::report::ReportBuilder;

fn command() -> Command {
    Command::new("packing-list")
        .version(clap::crate_version!())
        .about("Generate a packing list workbook from a carton line-item dump")
        .arg(
            Arg::new("input")
                .help("Workbook with the line items (first worksheet is read)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Where to write the packing list. Defaults to the options file name.")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("options")
                .long("options")
                .help("JSON file with report layout options")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("grouping")
                .long("grouping")
                .help("How to group a carton that reappears after another carton")
                .value_parser(["contiguous", "partition"]),
        )
}

fn load_options(matches: &ArgMatches) -> Result<ReportOptions> {
    let mut options = match matches.get_one::<PathBuf>("options") {
        Some(path) => ReportOptions::from_json_file(path).map_err(|e| {
            anyhow::anyhow!("Failed to load options from {}: {}", path.display(), e)
        })?,
        None => ReportOptions::default(),
    };

    match matches.get_one::<String>("grouping").map(String::as_str) {
        Some("partition") => options.grouping = GroupingPolicy::Partition,
        Some("contiguous") => options.grouping = GroupingPolicy::Contiguous,
        _ => {}
    }

    Ok(options)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default().filter_or("PACKING_LIST_LOG", "error,packing_list=info"),
        )
        .init();

    let matches = command().get_matches();
    let options = load_options(&matches)?;

    let input = matches
        .get_one::<PathBuf>("input")
        .context("missing input file")?;
    let output = matches
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(&options.file_name));

    let dataset = load_dataset_from_path(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let builder = ReportBuilder::new(options);
    let grid = builder.build(&dataset)?;
    let bytes = to_xlsx(&grid, builder.options())?;

    fs::write(&output, bytes).with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Total quantity {}, total carton weight {}, {} packages",
        grid.totals.total_quantity, grid.totals.total_carton_weight, grid.totals.package_count
    );
    println!("Packing List created successfully! Saved to {}", output.display());

    Ok(())
}
