extern crate anyhow;
extern crate getopts;
extern crate serde_json;

use anyhow::Context;

use crate::poll_loop;
use crate::wmata;

pub const DEFAULT_STATION_CODE: &str = "B35";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_FONT: &str = "/usr/share/fonts/truetype/roboto/hinted/RobotoCondensed-Regular.ttf";
pub const API_KEY_ENV_VAR: &str = "WMATA_API_KEY";

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    #[serde(default)]
    pub station_code: Option<String>,
}

pub fn credentials_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Credentials> {
    let debug_path = path.as_ref().to_str().map(|x| x.to_string());
    let file = std::fs::File::open(path)
        .with_context(|| format!("Opening WMATA creds from '{:?}'", debug_path))?;
    let reader = std::io::BufReader::new(file);
    let creds: Credentials = serde_json::from_reader(reader)
        .with_context(|| format!("while parsing credentials"))?;
    return Ok(creds);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub station_code: String,
    pub api_key: String,
    pub base_url: String,

    pub refresh_ms: u64,
    pub redraw_ms: u64,
    pub timeout_ms: u64,

    pub save_image: Option<String>,
    pub font: String,
    pub one_shot: bool,
    pub debug_port: Option<u16>,
}

pub enum ParsedArgs {
    Help(String),
    Run(Config),
}

pub fn options() -> getopts::Options {
    let mut opts = getopts::Options::new();
    opts.optflag("h", "help", "print this help");
    opts.optopt("s", "station", "WMATA station code", "CODE");
    opts.optopt("k", "credentials", "JSON file with api_key (and optionally station_code)", "FILE");
    opts.optopt("", "base-url", "StationPrediction endpoint", "URL");
    opts.optopt("", "refresh-ms", "how often to refetch predictions", "MILLIS");
    opts.optopt("", "redraw-ms", "how often to redraw the 'ago' line", "MILLIS");
    opts.optopt("", "timeout-ms", "HTTP request timeout", "MILLIS");
    opts.optopt("i", "save-image", "Where to put a png.", "FILENAME");
    opts.optopt("", "font", "TTF font used for the png", "FILE");
    opts.optflag("o", "one-shot", "fetch and draw once, then exit");
    opts.optopt("p", "debug-port", "serve a debug page on this port", "PORT");
    return opts;
}

fn millis_opt(matches: &getopts::Matches, name: &str, default: u64) -> anyhow::Result<u64> {
    let value: u64 = matches.opt_get_default(name, default).with_context(|| format!("--{}", name))?;
    if value == 0 {
        anyhow::bail!("--{} must be greater than zero", name);
    }
    return Ok(value);
}

/// `env_api_key` is consulted only when no credentials file is given.
pub fn parse_args(args: &[String], env_api_key: Option<String>) -> anyhow::Result<ParsedArgs> {
    let opts = options();
    let matches = opts.parse(args).context("parsing command line")?;

    if matches.opt_present("help") {
        return Ok(ParsedArgs::Help(opts.usage("Usage: metrodash [options]")));
    }

    let creds = match matches.opt_str("credentials") {
        Some(path) => Some(credentials_from_file(&path)?),
        None => None,
    };

    let api_key = match creds {
        Some(ref creds) => creds.api_key.clone(),
        None => env_api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow::anyhow!(
                "No API key: pass --credentials or set {}", API_KEY_ENV_VAR))?,
    };

    let station_code = matches.opt_str("station")
        .or_else(|| creds.as_ref().and_then(|c| c.station_code.clone()))
        .unwrap_or(DEFAULT_STATION_CODE.to_string());

    return Ok(ParsedArgs::Run(Config {
        station_code: station_code,
        api_key: api_key,
        base_url: matches.opt_str("base-url").unwrap_or(wmata::DEFAULT_BASE_URL.to_string()),
        refresh_ms: millis_opt(&matches, "refresh-ms", poll_loop::DEFAULT_REFRESH_MS)?,
        redraw_ms: millis_opt(&matches, "redraw-ms", poll_loop::DEFAULT_REDRAW_MS)?,
        timeout_ms: millis_opt(&matches, "timeout-ms", DEFAULT_TIMEOUT_MS)?,
        save_image: matches.opt_str("save-image"),
        font: matches.opt_str("font").unwrap_or(DEFAULT_FONT.to_string()),
        one_shot: matches.opt_present("one-shot"),
        debug_port: matches.opt_get("debug-port").context("--debug-port")?,
    }));
}

#[cfg(test)]
mod tests {
    use super::{parse_args, Config, ParsedArgs};

    fn args(list: &[&str]) -> Vec<String> {
        return list.iter().map(|s| s.to_string()).collect();
    }

    fn run_config(parsed: ParsedArgs) -> Config {
        match parsed {
            ParsedArgs::Run(config) => return config,
            ParsedArgs::Help(_) => panic!("expected a runnable config"),
        }
    }

    #[test]
    fn defaults_with_env_key() {
        let config = run_config(parse_args(&args(&[]), Some("envkey".to_string())).expect("parse_args"));

        assert_eq!("B35", config.station_code);
        assert_eq!("envkey", config.api_key);
        assert_eq!(crate::wmata::DEFAULT_BASE_URL, config.base_url);
        assert_eq!(30_000, config.refresh_ms);
        assert_eq!(1_000, config.redraw_ms);
        assert_eq!(10_000, config.timeout_ms);
        assert_eq!(None, config.save_image);
        assert!(!config.one_shot);
        assert_eq!(None, config.debug_port);
    }

    #[test]
    fn credentials_file_wins_over_env() {
        let config = run_config(parse_args(
            &args(&["-k", "testdata/credentials.json"]), Some("envkey".to_string())).expect("parse_args"));

        assert_eq!("0123456789abcdef", config.api_key);
        assert_eq!("A01", config.station_code);
    }

    #[test]
    fn station_flag_wins_over_credentials() {
        let config = run_config(parse_args(
            &args(&["-k", "testdata/credentials.json", "--station", "C05", "-o",
                    "-i", "/tmp/out.png", "-p", "8080", "--refresh-ms", "60000"]),
            None).expect("parse_args"));

        assert_eq!("C05", config.station_code);
        assert!(config.one_shot);
        assert_eq!(Some("/tmp/out.png".to_string()), config.save_image);
        assert_eq!(Some(8080), config.debug_port);
        assert_eq!(60_000, config.refresh_ms);
    }

    #[test]
    fn missing_api_key() {
        assert!(parse_args(&args(&[]), None).is_err());
        assert!(parse_args(&args(&[]), Some("".to_string())).is_err());
    }

    #[test]
    fn bad_values() {
        assert!(parse_args(&args(&["--refresh-ms", "soon"]), Some("k".to_string())).is_err());
        assert!(parse_args(&args(&["-p", "99999"]), Some("k".to_string())).is_err());
        assert!(parse_args(&args(&["-k", "testdata/nope.json"]), None).is_err());
        assert!(parse_args(&args(&["--bogus"]), Some("k".to_string())).is_err());
    }

    #[test]
    fn zero_intervals_rejected() {
        for flag in &["--refresh-ms", "--redraw-ms", "--timeout-ms"] {
            let err = match parse_args(&args(&[*flag, "0"]), Some("k".to_string())) {
                Ok(_) => panic!("{} 0 should be rejected", flag),
                Err(err) => err,
            };
            assert!(err.to_string().contains(flag));
        }
        assert!(parse_args(&args(&["--refresh-ms", "1", "--redraw-ms", "1"]), Some("k".to_string())).is_ok());
    }

    #[test]
    fn help() {
        match parse_args(&args(&["--help"]), None).expect("parse_args") {
            ParsedArgs::Help(usage) => assert!(usage.contains("--station")),
            ParsedArgs::Run(_) => panic!("expected help"),
        }
    }
}
