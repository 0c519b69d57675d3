use clap::{
    Arg, ColorChoice, Command,
    builder::{PossibleValuesParser, ValueParser, styling::{AnsiColor, Effects, Styles}},
};

pub const ARG_STORE: &str = "store";
pub const ARG_DATA_FILE: &str = "data-file";
pub const ARG_FIREBASE_PROJECT: &str = "firebase-project";
pub const ARG_FIREBASE_API_KEY: &str = "firebase-api-key";
pub const ARG_TIMEOUT: &str = "timeout";
pub const ARG_LOCKOUT: &str = "lockout";
pub const ARG_LOG_FILE: &str = "log-file";
pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            if parsed <= 4 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("agrismart")
        .about("Farmer registration and dashboard in the terminal")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_STORE)
                .long("store")
                .help("Backend for credentials and farmer records")
                .env("AGRISMART_STORE")
                .default_value("file")
                .value_parser(PossibleValuesParser::new(["memory", "file", "firebase"])),
        )
        .arg(
            Arg::new(ARG_DATA_FILE)
                .long("data-file")
                .help("JSON file used by the file store")
                .env("AGRISMART_DATA_FILE")
                .default_value("farmers.json"),
        )
        .arg(
            Arg::new(ARG_FIREBASE_PROJECT)
                .long("firebase-project")
                .help("Firebase project id, required with --store firebase")
                .env("AGRISMART_FIREBASE_PROJECT"),
        )
        .arg(
            Arg::new(ARG_FIREBASE_API_KEY)
                .long("firebase-api-key")
                .help("Firebase web API key, required with --store firebase")
                .env("AGRISMART_FIREBASE_API_KEY")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long("timeout")
                .help("Backend request timeout in seconds")
                .env("AGRISMART_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_LOCKOUT)
                .long("lockout")
                .help("Seconds a session stays locked after too many failed logins")
                .env("AGRISMART_LOCKOUT")
                .default_value("300")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_LOG_FILE)
                .long("log-file")
                .help("File receiving log output")
                .env("AGRISMART_LOG_FILE")
                .default_value("agrismart.log"),
        )
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbosity")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("AGRISMART_LOG_LEVEL")
                .default_value("error")
                .value_parser(validator_log_level()),
        )
}
