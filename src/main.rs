use nirmitee::config::{ConfigError, DiagramConfig};
use nirmitee::locate;
use nirmitee::mermaid::to_mermaid;
use nirmitee::pipeline::{parse_schema, Compiler, DEFAULT_THEME};
use nirmitee::Diagnostic;
use std::env;
use std::fs;
use std::io;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Mermaid,
}

impl Format {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "json" => Some(Self::Json),
            "mermaid" => Some(Self::Mermaid),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to serialize diagram: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{id} not found in {path}")]
    NotFound { id: String, path: String },
    #[error("{path}: compilation failed")]
    Compile { path: String, diags: Vec<Diagnostic> },
}

struct Options {
    input_path: String,
    output_path: Option<String>,
    theme: String,
    config_path: Option<String>,
    format: Format,
    locate_id: Option<String>,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} <input.dbml> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>    Output file (default: stdout)");
    eprintln!("  -t, --theme <name>     Theme tag passed to nodes (default: light)");
    eprintln!("  -c, --config <file>    Diagram layout config (JSON)");
    eprintln!("  -f, --format <format>  Output format: json, mermaid (default: json)");
    eprintln!("  -l, --locate <id>      Print the source span of a diagram element");
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let program = args.first().map(String::as_str).unwrap_or("nirmitee");
    if args.len() < 2 {
        usage(program);
    }

    let mut opts = Options {
        input_path: args[1].clone(),
        output_path: None,
        theme: DEFAULT_THEME.to_string(),
        config_path: None,
        format: Format::Json,
        locate_id: None,
    };

    let mut i = 2;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match (args[i].as_str(), value) {
            ("-o" | "--output", Some(v)) => opts.output_path = Some(v),
            ("-t" | "--theme", Some(v)) => opts.theme = v,
            ("-c" | "--config", Some(v)) => opts.config_path = Some(v),
            ("-f" | "--format", Some(v)) => {
                opts.format = Format::from_str(&v).unwrap_or_else(|| {
                    eprintln!("Invalid format: {}", v);
                    process::exit(1);
                });
            }
            ("-l" | "--locate", Some(v)) => opts.locate_id = Some(v),
            ("-o" | "--output" | "-t" | "--theme" | "-c" | "--config" | "-f" | "--format"
            | "-l" | "--locate", None) => {
                eprintln!("Missing value for {}", args[i]);
                process::exit(1);
            }
            (other, _) => {
                eprintln!("Unknown option: {}", other);
                usage(program);
            }
        }
        i += 2;
    }
    opts
}

fn read(path: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

fn run(opts: Options) -> Result<(), CliError> {
    let input = read(&opts.input_path)?;

    if let Some(id) = opts.locate_id {
        let span = locate(&input, &id).ok_or(CliError::NotFound {
            id,
            path: opts.input_path,
        })?;
        println!("{}", span);
        return Ok(());
    }

    let config = match &opts.config_path {
        Some(path) => DiagramConfig::from_json(&read(path)?)?,
        None => DiagramConfig::default(),
    };

    let output = match opts.format {
        Format::Json => {
            let compilation = Compiler::new(config, opts.theme).compile(&input);
            if !compilation.is_ok() {
                return Err(CliError::Compile {
                    path: opts.input_path,
                    diags: compilation.diagnostics,
                });
            }
            serde_json::to_string_pretty(&compilation)?
        }
        Format::Mermaid => match parse_schema(&input) {
            Ok(schema) => to_mermaid(&schema),
            Err(err) => {
                return Err(CliError::Compile {
                    path: opts.input_path,
                    diags: err.diags,
                });
            }
        },
    };

    match opts.output_path {
        Some(path) => fs::write(&path, &output).map_err(|source| CliError::Write { path, source })?,
        None => println!("{}", output),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let opts = parse_args(&args);

    if let Err(e) = run(opts) {
        match &e {
            CliError::Compile { path, diags } => {
                for diag in diags {
                    eprintln!("{}:{}", path, diag);
                }
            }
            other => eprintln!("{}", other),
        }
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(input_path: &str) -> Options {
        Options {
            input_path: input_path.to_string(),
            output_path: None,
            theme: DEFAULT_THEME.to_string(),
            config_path: None,
            format: Format::Json,
            locate_id: None,
        }
    }

    fn scratch(name: &str, contents: &str) -> String {
        let path = env::temp_dir().join(format!("nirmitee-cli-{}-{}", process::id(), name));
        fs::write(&path, contents).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_missing_input_is_read_error() {
        let err = run(opts("/nonexistent/schema.dbml")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
        assert!(err.to_string().starts_with("Failed to read /nonexistent/schema.dbml"));
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let input = scratch("cfg.dbml", "Table a { id int }");
        let mut o = opts(&input);
        o.config_path = Some(scratch("cfg.json", r#"{"minRowWidth": 400, "maxRowWidth": 300}"#));
        assert!(matches!(run(o), Err(CliError::Config(ConfigError::Invalid(_)))));
    }

    #[test]
    fn test_diagnostics_are_compile_error() {
        let input = scratch("broken.dbml", "Table a {\n  b int;\n}");
        match run(opts(&input)) {
            Err(CliError::Compile { diags, .. }) => assert_eq!(diags[0].location.line, 2),
            other => panic!("expected compile error, got {:?}", other),
        }
    }

    #[test]
    fn test_output_written_to_file() {
        let input = scratch("ok.dbml", "Table a { id int }");
        let out = env::temp_dir().join(format!("nirmitee-cli-{}-out.json", process::id()));
        let mut o = opts(&input);
        o.output_path = Some(out.to_string_lossy().into_owned());
        run(o).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["nodes"][0]["id"], "aparent");
    }

    #[test]
    fn test_unknown_locate_id_is_not_found() {
        let input = scratch("loc.dbml", "Table a { id int }");
        let mut o = opts(&input);
        o.locate_id = Some("ghost".into());
        assert!(matches!(run(o), Err(CliError::NotFound { .. })));
    }
}
