//! `cortex` — CLI demo binary for manual smoke-testing the render pipeline
//! without a real forum host, mirroring `seqc` as a thin shell over the
//! library crates.

use clap::{Parser as ClapParser, Subcommand};
use cortex_core::SettingsValue;
use cortex_runtime::{Runtime, TemplateLookup};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;

#[derive(ClapParser)]
#[command(name = "cortex")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render a template file through the Cortex pipeline", long_about = None)]
struct Cli {
    /// JSON settings file (object of setting-name -> value)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory the cache's disk tier writes to (memory-only if omitted)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one template file and print the compiled output
    Render {
        /// Path to the raw template source file
        path: PathBuf,

        /// Template set id, if the host partitions templates into sets
        #[arg(long)]
        set_id: Option<u64>,
    },

    /// Invalidate every cached entry for a template name
    Invalidate {
        /// Template name (the title the cache was seeded under)
        title: String,
    },

    /// Drop every cached entry
    Clear,
}

struct DirectoryTemplateLookup {
    root: PathBuf,
}

impl TemplateLookup for DirectoryTemplateLookup {
    fn lookup(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.root.join(name)).ok()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings_map = match &cli.settings {
        Some(path) => match load_settings(path) {
            Ok(map) => map,
            Err(e) => {
                eprintln!("Error reading settings file {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => HashMap::new(),
    };

    let runtime = Runtime::new(&settings_map, cli.cache_dir.clone());

    match cli.command {
        Commands::Render { path, set_id } => run_render(&runtime, &path, set_id),
        Commands::Invalidate { title } => {
            let count = runtime.invalidate(&title);
            println!("invalidated {} entr{}", count, if count == 1 { "y" } else { "ies" });
        }
        Commands::Clear => {
            let count = runtime.clear();
            println!("cleared {} entr{}", count, if count == 1 { "y" } else { "ies" });
        }
    }
}

fn run_render(runtime: &Runtime, path: &Path, set_id: Option<u64>) {
    let lookup = DirectoryTemplateLookup {
        root: path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "template".to_string());

    let raw = match lookup.lookup(&title) {
        Some(raw) => raw,
        None => {
            eprintln!("Error: could not read {}", path.display());
            process::exit(1);
        }
    };

    println!("{}", runtime.render(&title, &raw, set_id));
}

fn load_settings(path: &Path) -> Result<HashMap<String, SettingsValue>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}
