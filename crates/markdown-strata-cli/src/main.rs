use anyhow::{Context, Result, bail};
use markdown_strata_config::{Config, expand_patterns};
use markdown_strata_engine::{
    Document, Parser,
    parsing::{properties::ReferenceMap, snapshot},
};
use std::{
    env, fs,
    io::{self, Write},
    path::PathBuf,
    process,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Outline,
    Toml,
}

#[derive(Debug)]
struct Args {
    config_path: Option<PathBuf>,
    format: Format,
    inputs: Vec<String>,
}

const USAGE: &str = "Usage: markdown-strata [--config <path>] [--toml] [file-or-glob ...]\n\
                     Reads stdin when '-' is given as a file.";

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args {
        config_path: None,
        format: Format::Outline,
        inputs: Vec::new(),
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config_path = Some(PathBuf::from(path));
            }
            "--toml" => parsed.format = Format::Toml,
            "-h" | "--help" => {
                println!("{USAGE}");
                process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            input => parsed.inputs.push(input.to_string()),
        }
    }
    Ok(parsed)
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config_path = path.cloned().unwrap_or_else(Config::config_path);
    log::info!("Config path: {}", config_path.display());
    match Config::load_from_path(&config_path)? {
        Some(config) => Ok(config),
        None if path.is_some() => bail!("config file {} not found", config_path.display()),
        None => Ok(Config::default()),
    }
}

/// Expands each argument as a glob; `-` stands for stdin.
fn resolve_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input == "-" {
            files.push(PathBuf::from(input));
            continue;
        }
        let matched = expand_patterns(&[input])?;
        if matched.is_empty() {
            bail!("no files match {input}");
        }
        files.extend(matched);
    }
    Ok(files)
}

fn render(doc: &Document, format: Format, out: &mut impl Write) -> Result<()> {
    match format {
        Format::Outline => {
            write!(out, "{}", snapshot::outline(doc))?;
            if let Some(references) = doc.references().filter(|refs| !refs.is_empty()) {
                write_references(references, out)?;
            }
        }
        Format::Toml => {
            let snap = snapshot::normalize(doc);
            writeln!(out, "{}", toml::to_string_pretty(&snap)?)?;
        }
    }
    Ok(())
}

fn write_references(references: &ReferenceMap, out: &mut impl Write) -> Result<()> {
    writeln!(out, "References")?;
    for (key, definition) in references.iter() {
        match &definition.title {
            Some(title) => writeln!(out, "  [{key}] {} {title:?}", definition.destination)?,
            None => writeln!(out, "  [{key}] {}", definition.destination)?,
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = load_config(args.config_path.as_ref())?;
    let files = if args.inputs.is_empty() {
        config.input_files()?
    } else {
        resolve_inputs(&args.inputs)?
    };
    if files.is_empty() {
        eprintln!("Error: no input files given and none matched by the config file");
        eprintln!("{USAGE}");
        process::exit(1);
    }

    let parser = Parser::with_options(config.parser);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let many = files.len() > 1;

    for path in files {
        let doc = if path.as_os_str() == "-" {
            parser.parse_reader(io::stdin().lock())?
        } else {
            let input = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parser
                .parse(&input)
                .with_context(|| format!("failed to parse {}", path.display()))?
        };
        log::info!("parsed {}", path.display());
        if many {
            writeln!(out, "==> {} <==", path.display())?;
        }
        render(&doc, args.format, &mut out)?;
    }

    Ok(())
}
