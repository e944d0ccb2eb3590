use anyhow::Result;
use clap::{Arg, ArgMatches, Command, value_parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Relative path of the optional manually-curated overrides file.
pub const OVERRIDES_PATH: &str = "metadata/overrides.json";
/// Relative path of the generated suggestions report.
pub const REPORT_PATH: &str = "metadata/suggestions.json";

pub struct Config {
    pub pattern: String,
    pub apply: bool,
    pub project_root: PathBuf,
    pub overrides_path: PathBuf,
    pub report_path: PathBuf,
}

fn command() -> Command {
    Command::new("seosuggest")
        .version("0.1.0")
        .about("Suggests SEO metadata for HTML files and optionally writes it into their <head>")
        .arg(
            Arg::new("glob")
                .long("glob")
                .value_name("PATTERN")
                .help("Glob pattern selecting the HTML files to process")
                .default_value("**/*.html")
                .num_args(1),
        )
        .arg(
            Arg::new("apply")
                .long("apply")
                .value_name("BOOL")
                .help("Rewrite the matched files' <head> sections with the suggested metadata")
                .num_args(0..=1)
                .default_value("false")
                .default_missing_value("true")
                .value_parser(value_parser!(bool)),
        )
}

/// Parses the process arguments. Help and version requests print and exit
/// here, as clap normally does.
pub fn parse_args() -> Result<Config> {
    config_from_matches(command().get_matches())
}

/// Parses an explicit argument list, returning an error instead of exiting.
pub fn parse_args_from<I, T>(args: I) -> Result<Config>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    config_from_matches(command().try_get_matches_from(args)?)
}

fn config_from_matches(matches: ArgMatches) -> Result<Config> {
    let project_root = std::env::current_dir()?;

    let pattern = matches
        .get_one::<String>("glob")
        .cloned()
        .unwrap_or_else(|| "**/*.html".to_string());

    let apply = matches.get_one::<bool>("apply").copied().unwrap_or(false);

    Ok(Config {
        pattern,
        apply,
        overrides_path: project_root.join(OVERRIDES_PATH),
        report_path: project_root.join(REPORT_PATH),
        project_root,
    })
}
