use std::ffi::OsString;
use std::fmt::Display;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgGroup, Parser};
use serde_json::Value as JsonValue;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use troopinfo_core::Container;
use troopinfo_core::diff::diff;
use troopinfo_render::{
    JsonStyle, render_debug_dump, render_diff_json, render_diff_text, render_json,
};

const DEFAULT_SOX_PATH: &str =
    r"C:\Program Files (x86)\Steam\steamapps\common\KUF Crusader\Data\SOX\TroopInfo.sox";
const TEXT_EXTENSION: &str = "toml";
const BACKUP_SUFFIX: &str = ".bak";
const TMP_SUFFIX: &str = ".tmp";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mode {
    Restore,
    Debug,
    Diff,
    Write,
    Update,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["restore", "debug", "diff", "write", "update"])
))]
struct Cli {
    /// Restore TroopInfo.sox from its .bak backup
    #[arg(long)]
    restore: bool,
    /// Pretty-print the decoded table to stdout
    #[arg(long)]
    debug: bool,
    /// Print what --write would change in TroopInfo.sox
    #[arg(long)]
    diff: bool,
    /// Write TroopInfo.sox from the text file
    #[arg(long)]
    write: bool,
    /// Regenerate the text file from TroopInfo.sox
    #[arg(long)]
    update: bool,
    #[arg(
        long,
        value_name = "PATH",
        env = "TROOPINFO_SOX",
        default_value = DEFAULT_SOX_PATH
    )]
    sox: PathBuf,
    /// Defaults to the SOX path with a .toml extension
    #[arg(long, value_name = "PATH", env = "TROOPINFO_TEXT")]
    text: Option<PathBuf>,
    /// Use an all-zero trailer instead of the one in the current SOX file
    #[arg(long = "zero-trailer", conflicts_with_all = ["restore", "debug", "update"])]
    zero_trailer: bool,
    #[arg(long, conflicts_with_all = ["restore", "write", "update"])]
    json: bool,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.restore {
            Mode::Restore
        } else if self.debug {
            Mode::Debug
        } else if self.diff {
            Mode::Diff
        } else if self.write {
            Mode::Write
        } else {
            Mode::Update
        }
    }

    fn text_path(&self) -> PathBuf {
        self.text
            .clone()
            .unwrap_or_else(|| self.sox.with_extension(TEXT_EXTENSION))
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let mode = cli.mode();
    debug!(?mode, sox = %cli.sox.display(), "starting");

    match mode {
        Mode::Restore => restore(&cli),
        Mode::Debug => print_debug(&cli),
        Mode::Diff => print_diff(&cli),
        Mode::Write => write_sox(&cli),
        Mode::Update => update_text(&cli),
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

fn restore(cli: &Cli) {
    let backup = backup_path(&cli.sox);
    let bytes = read_file(&backup);
    if let Err(e) = Container::decode(&bytes) {
        fail(format!("backup {} is not a usable SOX file", backup.display()), e);
    }
    write_file(&cli.sox, &bytes);
    info!("restored {} from {}", cli.sox.display(), backup.display());
}

fn print_debug(cli: &Cli) {
    let (_, container) = load_sox(&cli.sox);
    if cli.json {
        print_json(&render_json(&container, JsonStyle::CanonicalV1));
    } else {
        print!("{}", render_debug_dump(&container));
    }
}

fn print_diff(cli: &Cli) {
    let (_, current) = load_sox(&cli.sox);
    let proposed = load_text(cli, &current);
    let changes = diff(&current, &proposed);
    if cli.json {
        print_json(&render_diff_json(&changes));
    } else {
        print!("{}", render_diff_text(&changes));
    }
}

fn write_sox(cli: &Cli) {
    let (original, current) = load_sox(&cli.sox);
    let proposed = load_text(cli, &current);
    let bytes = proposed.encode();

    let backup = backup_path(&cli.sox);
    if backup.exists() {
        debug!(backup = %backup.display(), "backup already present");
    } else {
        write_file(&backup, &original);
        info!("backed up {} to {}", cli.sox.display(), backup.display());
    }

    write_file(&cli.sox, &bytes);
    info!("wrote {}", cli.sox.display());
}

fn update_text(cli: &Cli) {
    let (_, container) = load_sox(&cli.sox);
    let text = container
        .to_text()
        .unwrap_or_else(|e| fail("rendering text document", e));
    let path = cli.text_path();
    write_file(&path, text.as_bytes());
    info!("wrote {}", path.display());
}

// ---------------------------------------------------------------------------
// File handling
// ---------------------------------------------------------------------------

/// Returns the raw bytes alongside the decoded container.
fn load_sox(path: &Path) -> (Vec<u8>, Container) {
    let bytes = read_file(path);
    let container = Container::decode(&bytes)
        .unwrap_or_else(|e| fail(format!("parsing {}", path.display()), e));
    (bytes, container)
}

/// Loads the text file, keeping `current`'s trailer unless `--zero-trailer` is set.
fn load_text(cli: &Cli, current: &Container) -> Container {
    let path = cli.text_path();
    let raw = fs::read_to_string(&path)
        .unwrap_or_else(|e| fail(format!("reading {}", path.display()), e));
    let container = Container::from_text(&raw)
        .unwrap_or_else(|e| fail(format!("parsing {}", path.display()), e));
    if cli.zero_trailer {
        container
    } else {
        container.with_trailer(current.trailer)
    }
}

fn backup_path(sox: &Path) -> PathBuf {
    sibling_path(sox, BACKUP_SUFFIX)
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn read_file(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap_or_else(|e| fail(format!("reading {}", path.display()), e))
}

/// Writes a sibling temp file and renames it over `path`, so a failed write leaves
/// the previous contents intact.
fn write_file(path: &Path, bytes: &[u8]) {
    let tmp = sibling_path(path, TMP_SUFFIX);
    if let Err(e) = replace_file(&tmp, path, bytes) {
        let _ = fs::remove_file(&tmp);
        fail(format!("writing {}", path.display()), e);
    }
}

fn replace_file(tmp: &Path, path: &Path, bytes: &[u8]) -> io::Result<()> {
    {
        let mut f = fs::File::create(tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    fs::rename(tmp, path)
}

fn print_json(value: &JsonValue) {
    let rendered =
        serde_json::to_string_pretty(value).unwrap_or_else(|e| fail("rendering JSON output", e));
    println!("{rendered}");
}

fn fail(context: impl Display, err: impl Display) -> ! {
    error!("{context}: {err}");
    process::exit(1);
}
