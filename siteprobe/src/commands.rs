use crate::CLAP_STYLING;
use clap::arg;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("siteprobe")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("siteprobe")
        .styles(CLAP_STYLING)
        .about(
            "Probes every API site declared in the configuration documents of a directory \
            and writes pruned copies, plus their base58 transcriptions, to another.",
        )
        .arg(arg!(-q --"quiet" "Suppress banner, progress and report output").required(false))
        .arg(
            arg!(-i --"input" <DIR>)
                .required(false)
                .help("Directory holding the *.json configuration documents")
                .default_value("./input"),
        )
        .arg(
            arg!(-o --"output" <DIR>)
                .required(false)
                .help("Directory receiving <name>.json and <name>_base58.txt")
                .default_value("./output"),
        )
        .arg(
            arg!(-a --"attempts" <NUM>)
                .required(false)
                .help("Maximum probe attempts per site")
                .value_parser(clap::value_parser!(u32).range(1..))
                .default_value("3"),
        )
        .arg(
            arg!(--"base-delay" <SECONDS>)
                .required(false)
                .help("Base backoff delay, doubled after every failed attempt")
                .value_parser(clap::value_parser!(f64))
                .default_value("1.0"),
        )
        .arg(
            arg!(-t --"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(--"run-timeout" <SECONDS>)
                .required(false)
                .help("Abort the whole run after this many seconds")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            arg!(--"verify-tls")
                .required(false)
                .help("Reject invalid TLS certificates (default: accept them)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"strict-body")
                .required(false)
                .help("Retry success responses whose body is not a recognizable record list")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-c --"concurrency" <NUM>)
                .required(false)
                .help("Sites probed at once within a document")
                .value_parser(clap::value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            arg!(-r --"rate" <PER_SECOND>)
                .required(false)
                .help("Global request rate limit, 0 disables pacing")
                .value_parser(clap::value_parser!(f64))
                .default_value("1.0"),
        )
        .arg(
            arg!(--"api-marker" <TEXT>)
                .required(false)
                .help("URL fragment marking a site as an API to probe (repeatable)")
                .action(clap::ArgAction::Append),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(--"report-file" <PATH>)
                .required(false)
                .help("Save the run report to a file (default: display to screen)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
