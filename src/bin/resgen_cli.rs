//! ResGen CLI - regenerate embedded resources
//!
//! Commands: generate (default), verify, list
//! Progress goes to stderr; JSON output goes to stdout
//! Returns non-zero on any fatal error, 2 when verify finds drift

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use resgen_core::{GenerationPipeline, GeneratorConfig, GeneratorError, Manifest};

#[derive(Parser)]
#[command(name = "resgen-cli")]
#[command(about = "ResGen CLI - Embed resource files as C arrays")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Project root holding res/ and src/generated/
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// JSON manifest to use instead of the built-in one
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Override the resource directory
    #[arg(long)]
    res_dir: Option<PathBuf>,

    /// Override the generated-output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the output directory and regenerate everything
    Generate {
        /// Print a JSON report of the run to stdout
        #[arg(long)]
        report: bool,
    },

    /// Check generated output against the resources without writing
    Verify,

    /// List the manifest as JSON
    List,
}

fn build_pipeline(cli: &Cli) -> Result<GenerationPipeline, GeneratorError> {
    let manifest = match &cli.manifest {
        Some(path) => Manifest::load_from_file(path)?,
        None => Manifest::builtin(),
    };

    let mut config = GeneratorConfig::for_root(&cli.root);
    if let Some(dir) = &cli.res_dir {
        config.resource_dir = dir.clone();
    }
    if let Some(dir) = &cli.out_dir {
        config.output_dir = dir.clone();
    }

    Ok(GenerationPipeline::new(manifest, config))
}

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;
const EXIT_DRIFT: u8 = 2;

fn execute(cli: &Cli) -> Result<u8, GeneratorError> {
    let pipeline = build_pipeline(cli)?;

    match cli.command {
        None => {
            pipeline.run()?;
            Ok(EXIT_SUCCESS)
        }

        Some(Commands::Generate { report }) => {
            let result = pipeline.run()?;
            if report {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Ok(EXIT_SUCCESS)
        }

        Some(Commands::Verify) => {
            let result = pipeline.verify()?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if result.up_to_date {
                Ok(EXIT_SUCCESS)
            } else {
                Ok(EXIT_DRIFT)
            }
        }

        Some(Commands::List) => {
            let listing = serde_json::json!({
                "manifest": pipeline.manifest(),
                "config": pipeline.config(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
            Ok(EXIT_SUCCESS)
        }
    }
}

/// Fatal errors are reported on stderr as plain text.
fn exit_status(cli: &Cli) -> u8 {
    match execute(cli) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("{}", e);
            EXIT_FAILURE
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    let cli = Cli::parse();
    ExitCode::from(exit_status(&cli))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_project() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let res = tmp.path().join("res");
        fs::create_dir_all(&res).unwrap();
        fs::write(res.join("cards.png"), [1u8, 2, 3]).unwrap();
        fs::write(res.join("default.fragmentshader"), "void main() {}").unwrap();
        fs::write(res.join("default.vertexshader"), "abc").unwrap();
        tmp
    }

    fn parse(root: &Path, extra: &[&str]) -> Cli {
        let root = root.to_string_lossy().into_owned();
        let mut args = vec!["resgen-cli".to_string(), "--root".to_string(), root];
        args.extend(extra.iter().map(|a| a.to_string()));
        Cli::parse_from(args)
    }

    #[test]
    fn test_no_command_generates() {
        let project = create_project();
        let cli = parse(project.path(), &[]);
        assert!(cli.command.is_none());

        assert_eq!(exit_status(&cli), EXIT_SUCCESS);
        let header = project.path().join("src").join("generated").join("resources_gen.h");
        assert!(header.is_file());
    }

    #[test]
    fn test_missing_resource_fails() {
        let project = create_project();
        fs::remove_file(project.path().join("res").join("cards.png")).unwrap();
        let cli = parse(project.path(), &[]);

        let err = execute(&cli).unwrap_err();
        assert!(err.to_string().contains("cards.png is not a file"));
        assert_eq!(exit_status(&cli), EXIT_FAILURE);
    }

    #[test]
    fn test_verify_reports_drift() {
        let project = create_project();
        assert_eq!(exit_status(&parse(project.path(), &["generate"])), EXIT_SUCCESS);
        assert_eq!(exit_status(&parse(project.path(), &["verify"])), EXIT_SUCCESS);

        fs::write(project.path().join("res").join("cards.png"), [9u8]).unwrap();
        assert_eq!(exit_status(&parse(project.path(), &["verify"])), EXIT_DRIFT);
    }
}
