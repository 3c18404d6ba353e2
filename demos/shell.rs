//! Interactive shell over an in-memory `TreeFS`.
//!
//! Run with `cargo run --example shell -- --log-level debug`.

use std::io::{self, BufRead, Write};

use clap::{Parser, ValueEnum};
use treefs_kit::{FsBackend, TreeFS, WriteMode};

#[derive(Debug, Clone, ValueEnum, Default)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    fn to_tracing_level(&self) -> Option<tracing::Level> {
        match self {
            LogLevel::Trace => Some(tracing::Level::TRACE),
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(version)]
struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    log_level: LogLevel,

    /// Text shown after the working directory in the prompt
    #[clap(long, short, default_value = "> ")]
    prompt: String,
}

const USAGE: &str = "\
commands:
  ls [path]            cd <path>            pwd
  mkdir [-p] <path>    touch <path>         cat <path>
  echo <text> > <file> echo <text> >> <file>
  rm [-r] <path>       mv <src> <dst>       cp <src> <dst>
  find <text>          tree [path]          clear
  help                 exit";

fn setup_tracing(cli_args: &Cli) {
    if let Some(level) = cli_args.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .without_time()
            .compact()
            .init();
    }
}

/// Splits `-p`/`-r` style flags off the front of the arguments.
fn take_flag<'a>(args: &[&'a str], flag: &str) -> (bool, Vec<&'a str>) {
    let set = args.first() == Some(&flag);
    let rest = if set { args[1..].to_vec() } else { args.to_vec() };
    (set, rest)
}

fn print_listing(fs: &TreeFS, dir: &str, names: &[String]) {
    for name in names {
        let path = if dir.ends_with('/') {
            format!("{dir}{name}")
        } else {
            format!("{dir}/{name}")
        };
        if fs.is_dir(&path).unwrap_or(false) {
            println!("{name}/");
        } else {
            println!("{name}");
        }
    }
}

fn echo(fs: &mut TreeFS, line: &str) -> anyhow::Result<()> {
    let (text, target, mode) = if let Some((text, file)) = line.split_once(">>") {
        (text, file, WriteMode::Append)
    } else if let Some((text, file)) = line.split_once('>') {
        (text, file, WriteMode::Overwrite)
    } else {
        println!("{}", line.trim());
        return Ok(());
    };
    let target = target.trim();
    if target.is_empty() {
        anyhow::bail!("usage: echo <text> > <file>");
    }
    let mut data = text.trim().as_bytes().to_vec();
    data.push(b'\n');
    fs.write(target, &data, mode)?;
    Ok(())
}

/// Executes one command line. Returns `false` when the shell should stop.
fn dispatch(fs: &mut TreeFS, input: &str) -> anyhow::Result<bool> {
    let (cmd, rest) = input.split_once(' ').unwrap_or((input, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();

    match (cmd, args.as_slice()) {
        ("", _) => {}
        ("exit", _) => return Ok(false),
        ("help", _) => println!("{USAGE}"),
        ("clear", _) => print!("\x1b[2J\x1b[H"),
        ("pwd", _) => println!("{}", fs.current_path()),
        ("ls", []) => print_listing(fs, &fs.current_path(), &fs.list()),
        ("ls", [path]) => print_listing(fs, path, &fs.ls(path)?),
        ("cd", [path]) => fs.cd(path)?,
        ("mkdir", _) => match take_flag(&args, "-p") {
            (parents, paths) if !paths.is_empty() => {
                for path in paths {
                    fs.mkdir(path, parents)?;
                }
            }
            _ => anyhow::bail!("usage: mkdir [-p] <path>"),
        },
        ("touch", [path]) => fs.touch(path)?,
        ("cat", [path]) => print!("{}", String::from_utf8_lossy(&fs.read(path)?)),
        ("echo", _) => echo(fs, rest)?,
        ("rm", _) => match take_flag(&args, "-r").1.as_slice() {
            [path] => fs.remove(path, args.first() == Some(&"-r"))?,
            _ => anyhow::bail!("usage: rm [-r] <path>"),
        },
        ("mv", [src, dst]) => fs.move_node(src, dst)?,
        ("cp", [src, dst]) => fs.copy(src, dst)?,
        ("find", [text]) => println!("{}", fs.find(text)?),
        ("tree", []) => fs.tree(".")?.iter().for_each(|p| println!("{p}")),
        ("tree", [path]) => fs.tree(path)?.iter().for_each(|p| println!("{p}")),
        (
            "ls" | "cd" | "touch" | "cat" | "mv" | "cp" | "find" | "tree",
            _,
        ) => anyhow::bail!("{cmd}: wrong number of arguments (try `help`)"),
        (other, _) => anyhow::bail!("unknown command: {other}"),
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);

    let mut fs = TreeFS::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}{}", fs.current_path(), cli_args.prompt);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        match dispatch(&mut fs, line?.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("{e}"),
        }
    }

    Ok(())
}
