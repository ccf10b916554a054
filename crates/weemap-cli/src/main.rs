use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;
use weemap_core::geocode::nominatim;
use weemap_core::{Bounds, Config, FileStore, MarkerSession, Point, decode_url};

const DEFAULT_STATE_PATH: &str = "weemap.url";
const LOG_ENV: &str = "WEEMAP_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Weemap(weemap_core::Error),
    Json(serde_json::Error),
    NoBounds,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Weemap(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::NoBounds => write!(f, "No --bbox given and no stored markers to derive one"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<weemap_core::Error> for CliError {
    fn from(value: weemap_core::Error) -> Self {
        Self::Weemap(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    List,
    Add,
    Edit,
    Remove,
    Clear,
    Import,
    Export,
    Share,
    Decode,
    SearchUrl,
    Adopt,
}

impl Command {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "list" => Self::List,
            "add" => Self::Add,
            "edit" => Self::Edit,
            "remove" => Self::Remove,
            "clear" => Self::Clear,
            "import" => Self::Import,
            "export" => Self::Export,
            "share" => Self::Share,
            "decode" => Self::Decode,
            "search-url" => Self::SearchUrl,
            "adopt" => Self::Adopt,
            _ => return None,
        })
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Option<Command>,
    operands: Vec<String>,
    state: Option<String>,
    config: Option<String>,
    bbox: Option<String>,
    pretty: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportOut {
    added: usize,
    duplicates: usize,
    skipped_lines: usize,
}

#[derive(Serialize)]
struct AdoptOut {
    added: usize,
    duplicates: usize,
}

#[derive(Serialize)]
struct EditOut {
    updated: bool,
}

#[derive(Serialize)]
struct RemoveOut {
    removed: Option<Point>,
}

fn usage() -> &'static str {
    "weemap-cli\n\
\n\
USAGE:\n\
  weemap-cli [--state <path>] [--config <path>] [--pretty] <command> [args]\n\
\n\
COMMANDS:\n\
  list                          print stored markers as JSON (default)\n\
  add <lat> <lng>               place a marker with the default comment\n\
  edit <lat> <lng> <comment..>  replace the comment of the marker at <lat>,<lng>\n\
  remove <lat> <lng>            remove the marker at <lat>,<lng>\n\
  clear                         remove all markers\n\
  import [<path>|-]             merge pasted permalinks, coordinate lines and weemap links\n\
  export                        print markers as comment + permalink blocks\n\
  share                         print the shareable weemap link\n\
  decode <url>                  print the markers carried by a weemap link as JSON\n\
  search-url <query..> [--bbox <w,n,e,s>]\n\
                                print a place search request bounded to the box\n\
  adopt [<path>|-]              merge the places of a search response (JSON)\n\
\n\
NOTES:\n\
  - The markers are kept as a weemap link in the --state file (default: weemap.url).\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - search-url defaults to the bounds of the stored markers.\n\
  - Set WEEMAP_LOG (e.g. WEEMAP_LOG=debug) to see dropped records and skipped lines.\n\
"
}

fn is_number(arg: &str) -> bool {
    arg.parse::<f64>().is_ok()
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--pretty" => args.pretty = true,
            "--state" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.state = Some(path.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--bbox" => {
                let Some(bbox) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.bbox = Some(bbox.clone());
            }
            "--" => {
                args.operands.extend(it.by_ref().cloned());
            }
            "-" => args.operands.push(a.clone()),
            other if other.starts_with('-') && !is_number(other) => {
                return Err(CliError::Usage(usage()));
            }
            word if args.command.is_none() => {
                let Some(command) = Command::from_name(word) else {
                    return Err(CliError::Usage(usage()));
                };
                args.command = Some(command);
            }
            operand => args.operands.push(operand.to_string()),
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<Config, CliError> {
    match path {
        None => Ok(Config::default()),
        Some(path) => Ok(Config::from_json_str(&std::fs::read_to_string(path)?)?),
    }
}

fn coordinate(arg: Option<&String>) -> Result<f64, CliError> {
    arg.and_then(|s| s.trim().parse::<f64>().ok())
        .ok_or(CliError::Usage(usage()))
}

fn location(operands: &[String]) -> Result<(f64, f64), CliError> {
    Ok((coordinate(operands.first())?, coordinate(operands.get(1))?))
}

fn single_input(operands: &[String]) -> Result<Option<&str>, CliError> {
    match operands {
        [] => Ok(None),
        [path] => Ok(Some(path.as_str())),
        _ => Err(CliError::Usage(usage())),
    }
}

/// `w,n,e,s`, the same order the search request uses.
fn parse_bbox(text: &str) -> Result<Bounds, CliError> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| CliError::Usage(usage()))?;
    let [west, north, east, south] = values.as_slice() else {
        return Err(CliError::Usage(usage()));
    };
    Ok(Bounds::new(*south, *west, *north, *east))
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let command = args.command.unwrap_or_default();
    let ops = args.operands.as_slice();
    let state_path = args.state.as_deref().unwrap_or(DEFAULT_STATE_PATH);
    let store = FileStore::new(state_path, config.site_url.clone());
    let mut session = MarkerSession::with_config(store, config);

    match command {
        Command::List => {
            if !ops.is_empty() {
                return Err(CliError::Usage(usage()));
            }
            write_json(&session.points()?, args.pretty)
        }
        Command::Add => {
            let [_, _] = ops else {
                return Err(CliError::Usage(usage()));
            };
            let (lat, lng) = location(ops)?;
            let point = session.add_point(lat, lng)?;
            write_json(&point, args.pretty)
        }
        Command::Edit => {
            if ops.len() < 3 {
                return Err(CliError::Usage(usage()));
            }
            let (lat, lng) = location(ops)?;
            let comment = ops[2..].join(" ");
            let updated = session.edit_comment(lat, lng, &comment)?;
            write_json(&EditOut { updated }, args.pretty)
        }
        Command::Remove => {
            let [_, _] = ops else {
                return Err(CliError::Usage(usage()));
            };
            let (lat, lng) = location(ops)?;
            let removed = session.remove_point(lat, lng)?;
            write_json(&RemoveOut { removed }, args.pretty)
        }
        Command::Clear => {
            if !ops.is_empty() {
                return Err(CliError::Usage(usage()));
            }
            session.clear()?;
            Ok(())
        }
        Command::Import => {
            let text = read_input(single_input(ops)?)?;
            let before = session.points()?.len();
            let report = session.import(&text)?;
            let after = session.points()?.len();
            write_json(
                &ImportOut {
                    added: after - before,
                    duplicates: report.duplicates,
                    skipped_lines: report.skipped_lines,
                },
                args.pretty,
            )
        }
        Command::Export => {
            if !ops.is_empty() {
                return Err(CliError::Usage(usage()));
            }
            let text = session.export()?;
            if !text.is_empty() {
                println!("{text}");
            }
            Ok(())
        }
        Command::Share => {
            if !ops.is_empty() {
                return Err(CliError::Usage(usage()));
            }
            println!("{}", session.share_url()?);
            Ok(())
        }
        Command::SearchUrl => {
            if ops.is_empty() {
                return Err(CliError::Usage(usage()));
            }
            let bounds = match args.bbox.as_deref() {
                Some(bbox) => parse_bbox(bbox)?,
                None => Bounds::of(&session.points()?).ok_or(CliError::NoBounds)?,
            };
            let query = ops.join(" ");
            let url =
                nominatim::search_url(&session.config().geocoder_endpoint, &query, &bounds)?;
            println!("{url}");
            Ok(())
        }
        Command::Adopt => {
            let text = read_input(single_input(ops)?)?;
            let hits = nominatim::parse_results(&text)?;
            let default_comment = session.config().default_comment.clone();
            let added = session.adopt_all(hits.iter().map(|hit| hit.to_point(&default_comment)))?;
            let out = AdoptOut {
                added,
                duplicates: hits.len() - added,
            };
            write_json(&out, args.pretty)
        }
        Command::Decode => {
            let [url] = ops else {
                return Err(CliError::Usage(usage()));
            };
            write_json(&decode_url(url), args.pretty)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
