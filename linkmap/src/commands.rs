use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkmap")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress the summary and rendered map on stdout").required(false))
        .subcommand_required(true)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl breadth-first from one or more seed pages and record every link, \
                stylesheet, script and image reference as an edge table.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("A seed URL to crawl (repeatable)")
                        .value_parser(clap::value_parser!(Url))
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of seed URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-b --"base" <URL>)
                        .required(false)
                        .help("Site root that --path routes are appended to")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-p --"path" <ROUTE>)
                        .required(false)
                        .help("A route under --base to seed from, e.g. /blog (repeatable)")
                        .action(clap::ArgAction::Append)
                        .requires("base"),
                )
                .arg(
                    arg!(-d --"max-depth" <DEPTH>)
                        .required(false)
                        .help("How many links away from a seed to fetch")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("Maximum number of fetches in flight at once")
                        .value_parser(clap::builder::RangedU64ValueParser::<usize>::new().range(1..))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"max-redirects" <COUNT>)
                        .required(false)
                        .help("Maximum redirects to follow per request")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("5")
                        .conflicts_with("no-redirects"),
                )
                .arg(
                    arg!(--"no-redirects")
                        .required(false)
                        .help("Do not follow redirects; a redirect counts as a failed fetch")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-o --"output-dir" <PATH>)
                        .required(false)
                        .help("Directory the edge table is written to")
                        .default_value("./static"),
                )
                .arg(
                    arg!(--"file-name" <NAME>)
                        .required(false)
                        .help("File name of the edge table")
                        .default_value("website_links.csv"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Rendering shown after the crawl: csv, json, dot, text")
                        .value_parser(["csv", "json", "dot", "text"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-r --"report" <PATH>)
                        .required(false)
                        .help("Save the rendering to a file instead of printing it")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
}
