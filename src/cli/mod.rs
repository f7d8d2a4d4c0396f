//! The `retiff` CLI binary: a thin `clap`-derived front-end over the four
//! `ops` functions (spec §6). Argument parsing and output formatting only;
//! no business logic lives here that isn't already in `reader`, `writer`
//! or `ops`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use retiff::error::{RetiffError, UsageError};
use retiff::ops::{self, DumpFormat};
use retiff::types::Datatype;
use retiff::WriterOptions;

#[derive(Parser)]
#[command(name = "retiff", version, about = "Tag-preserving TIFF/BigTIFF rewrite toolkit")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one or more TIFF files as a tree of tags.
    Dump {
        /// Cap the number of decoded array elements shown per tag.
        #[arg(long = "max", value_name = "N")]
        max: Option<usize>,
        #[arg(long = "json", conflicts_with = "yaml")]
        json: bool,
        #[arg(long = "yaml", conflicts_with = "json")]
        yaml: bool,
        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },
    /// Emit one file per top-level IFD (and optionally per SubIFD).
    Split {
        #[arg(long = "subifds")]
        subifds: bool,
        #[arg(long = "overwrite", short = 'y')]
        overwrite: bool,
        source: PathBuf,
        prefix: Option<String>,
    },
    /// Merge several files' top-level IFD chains into one output file.
    #[command(alias = "merge")]
    Concat {
        #[arg(long = "overwrite", short = 'y')]
        overwrite: bool,
        #[arg(required = true, num_args = 2..)]
        sources_and_output: Vec<PathBuf>,
    },
    /// Insert, remove or copy tag entries, then re-emit the file.
    Set {
        #[arg(long = "overwrite", short = 'y')]
        overwrite: bool,
        source: PathBuf,
        output: Option<PathBuf>,
        /// `TAG[:DATATYPE][,IFD] VALUE`, repeatable.
        #[arg(long = "set", num_args = 2, value_names = ["DIRECTIVE", "VALUE"])]
        set: Vec<String>,
        /// `TAG[,IFD]`, repeatable.
        #[arg(long = "unset", value_name = "DIRECTIVE")]
        unset: Vec<String>,
        /// `TAG[,IFD] PATH`, repeatable.
        #[arg(long = "setfrom", num_args = 2, value_names = ["DIRECTIVE", "PATH"])]
        setfrom: Vec<String>,
    },
}

/// Exit codes per spec §6.
const EXIT_OK: u8 = 0;
const EXIT_USER: u8 = 1;
const EXIT_IO: u8 = 2;
const EXIT_FORMAT: u8 = 3;

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    match dispatch(cli.command) {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn exit_code_for(err: &RetiffError) -> u8 {
    match err {
        RetiffError::Usage(_) => EXIT_USER,
        RetiffError::Io(_) => EXIT_IO,
        RetiffError::Format(_) | RetiffError::BigTiffRequired => EXIT_FORMAT,
    }
}

fn dispatch(command: Command) -> Result<(), RetiffError> {
    match command {
        Command::Dump { max, json, yaml, sources } => cmd_dump(&sources, max, json, yaml),
        Command::Split { subifds, overwrite, source, prefix } => cmd_split(&source, prefix, subifds, overwrite),
        Command::Concat { overwrite, sources_and_output } => cmd_concat(sources_and_output, overwrite),
        Command::Set { overwrite, source, output, set, unset, setfrom } => {
            cmd_set(&source, output, overwrite, set, unset, setfrom)
        }
    }
}

fn cmd_dump(sources: &[PathBuf], _max: Option<usize>, json: bool, yaml: bool) -> Result<(), RetiffError> {
    let format = if json {
        DumpFormat::Json
    } else if yaml {
        DumpFormat::Yaml
    } else {
        DumpFormat::Text
    };
    for source in sources {
        let info = retiff::read_tiff(source)?;
        println!("== {} ==", source.display());
        println!("{}", ops::dump(&info, format)?);
    }
    Ok(())
}

fn check_overwrite(path: &std::path::Path, overwrite: bool) -> Result<(), RetiffError> {
    if path.exists() && !overwrite {
        return Err(UsageError::OutputExists(path.to_path_buf()).into());
    }
    Ok(())
}

fn cmd_split(source: &PathBuf, prefix: Option<String>, subifds: bool, overwrite: bool) -> Result<(), RetiffError> {
    let info = retiff::read_tiff(source)?;
    let prefix = prefix.unwrap_or_else(|| {
        source.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "split".into())
    });
    let parts = ops::split(&info, subifds);
    for (i, part) in parts.iter().enumerate() {
        let path = format!("{prefix}-{i}.tif");
        check_overwrite(std::path::Path::new(&path), overwrite)?;
        retiff::write_tiff(part, &path, &WriterOptions::default())?;
        println!("wrote {path}");
    }
    Ok(())
}

fn cmd_concat(mut sources_and_output: Vec<PathBuf>, overwrite: bool) -> Result<(), RetiffError> {
    let output = sources_and_output
        .pop()
        .ok_or_else(|| UsageError::ConflictingDirectives("concat requires sources and an output path".into()))?;
    if sources_and_output.is_empty() {
        return Err(UsageError::ConflictingDirectives("concat requires at least one source".into()).into());
    }
    check_overwrite(&output, overwrite)?;

    let inputs: Result<Vec<_>, RetiffError> = sources_and_output.iter().map(retiff::read_tiff).collect();
    let merged = ops::concat(inputs?)?;
    retiff::write_tiff(&merged, &output, &WriterOptions::default())?;
    println!("wrote {}", output.display());
    Ok(())
}

fn cmd_set(
    source: &PathBuf,
    output: Option<PathBuf>,
    overwrite: bool,
    set: Vec<String>,
    unset: Vec<String>,
    setfrom: Vec<String>,
) -> Result<(), RetiffError> {
    let mut info = retiff::read_tiff(source)?;
    let output = output.unwrap_or_else(|| source.clone());
    if output == *source && !overwrite {
        return Err(UsageError::OutputExists(output).into());
    } else if output != *source {
        check_overwrite(&output, overwrite)?;
    }

    let mut directives = Vec::new();
    for chunk in set.chunks(2) {
        let (tag_spec, value) = (&chunk[0], &chunk[1]);
        let (tag, datatype, ifd_index) = parse_tag_spec(tag_spec)?;
        directives.push(ops::Directive::Set { tag, datatype, ifd_index, value: value.clone() });
    }
    for tag_spec in &unset {
        let (tag, _, ifd_index) = parse_tag_spec(tag_spec)?;
        directives.push(ops::Directive::Unset { tag, ifd_index });
    }
    for chunk in setfrom.chunks(2) {
        let (tag_spec, path) = (&chunk[0], &chunk[1]);
        let (tag, _, ifd_index) = parse_tag_spec(tag_spec)?;
        let source_info = retiff::read_tiff(path)?;
        directives.push(ops::Directive::SetFrom { tag, ifd_index, source: source_info });
    }

    ops::apply_directives(&mut info, &directives)?;
    retiff::write_tiff(&info, &output, &WriterOptions::default())?;
    println!("wrote {}", output.display());
    Ok(())
}

/// Parse `TAG[:DATATYPE][,IFD]` into (tag symbol, optional datatype
/// override, IFD index — defaulting to 0).
fn parse_tag_spec(spec: &str) -> Result<(String, Option<Datatype>, usize), RetiffError> {
    let (head, ifd_index) = match spec.split_once(',') {
        Some((head, idx)) => {
            let idx: usize = idx
                .trim()
                .parse()
                .map_err(|_| UsageError::UnparseableValue { tag: spec.to_string(), value: idx.to_string() })?;
            (head, idx)
        }
        None => (spec, 0),
    };
    let (tag, datatype) = match head.split_once(':') {
        Some((tag, dt)) => (tag.to_string(), Some(parse_datatype_name(dt)?)),
        None => (head.to_string(), None),
    };
    Ok((tag, datatype, ifd_index))
}

fn parse_datatype_name(name: &str) -> Result<Datatype, RetiffError> {
    let code = match name.to_ascii_uppercase().as_str() {
        "BYTE" => 1,
        "ASCII" => 2,
        "SHORT" => 3,
        "LONG" => 4,
        "RATIONAL" => 5,
        "SBYTE" => 6,
        "UNDEFINED" => 7,
        "SSHORT" => 8,
        "SLONG" => 9,
        "SRATIONAL" => 10,
        "FLOAT" => 11,
        "DOUBLE" => 12,
        "IFD" => 13,
        "LONG8" => 16,
        "SLONG8" => 17,
        "IFD8" => 18,
        other => return Err(UsageError::UnknownTagName(other.to_string()).into()),
    };
    Ok(Datatype::from_code(code)?)
}
