use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use buildgraph::declaration::{self, ModuleDeclaration};
use buildgraph::graph::ModuleGraph;
use buildgraph::policy::{evaluate_graph, Issue};
use buildgraph::report::{render, ReportData, ReportFormat};

#[derive(Parser)]
#[command(name = "buildgraph")]
#[command(version = "0.1.0")]
#[command(about = "Build configuration model and module dependency graph analyzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load declarations, build the graph, and evaluate issue policies
    Check {
        /// Declaration file or directory to load (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// JSON file with raised issues, keyed by module identity
        #[arg(short, long)]
        issues: Option<PathBuf>,

        /// Report format: json or markdown
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the constructed module graph
    Graph {
        /// Declaration file or directory to load (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },
    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Check {
            path,
            issues,
            format,
            output,
        }) => {
            let format: ReportFormat = format.parse().map_err(anyhow::Error::msg)?;
            let success = check(path, issues.as_deref(), format, output.as_deref())?;
            if !success {
                std::process::exit(1);
            }
        }
        Some(Commands::Graph { path }) => {
            print_graph(path)?;
        }
        Some(Commands::Version) => {
            println!("buildgraph v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("BuildGraph - Build Configuration Analyzer");
            println!("Run 'buildgraph check' to validate a declaration tree");
            println!("Run 'buildgraph --help' for more information");
        }
    }

    Ok(())
}

fn check(
    path: &Path,
    issues: Option<&Path>,
    format: ReportFormat,
    output: Option<&Path>,
) -> anyhow::Result<bool> {
    let declarations = load_declarations(path)?;
    println!("🔍 Loaded {} module declaration(s) from {}", declarations.len(), path.display());

    let graph = ModuleGraph::from_declarations(&declarations)?;
    let raised = load_issues(issues)?;
    let report = evaluate_graph(&graph, &raised);
    let data = ReportData::new(build_name(path), &graph, &report);

    match output {
        Some(output) => {
            let mut file = fs::File::create(output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            render(format, &data, &mut file)?;
            println!("📄 Report written to {}", output.display());
        }
        None => {
            render(format, &data, &mut std::io::stdout())?;
        }
    }

    if report.is_success() {
        println!("✅ {} module(s) passed dependency analysis", report.outcomes.len());
    } else {
        println!("❌ Failing modules: {}", report.failed_modules().join(", "));
    }
    Ok(report.is_success())
}

fn print_graph(path: &Path) -> anyhow::Result<()> {
    let declarations = load_declarations(path)?;
    let graph = ModuleGraph::from_declarations(&declarations)?;

    println!(
        "{} module(s), {} library(ies), {} edge(s)",
        graph.module_count(),
        graph.library_count(),
        graph.edge_count()
    );

    let mut modules: Vec<_> = graph.modules().collect();
    modules.sort_by(|a, b| a.name.cmp(&b.name));
    for module in modules {
        let marker = if module.is_external() { " (external)" } else { "" };
        println!(":{}{}", module.name, marker);
        let mut edges = graph.dependencies_of(&module.name);
        edges.sort_by_key(|edge| (edge.target.clone(), edge.visibility.label()));
        for edge in edges {
            println!("  {} -> {}", edge.visibility, edge.target);
        }
    }
    Ok(())
}

fn load_declarations(path: &Path) -> anyhow::Result<Vec<ModuleDeclaration>> {
    let declarations = if path.is_file() {
        vec![declaration::parse_file(path)
            .with_context(|| format!("failed to parse {}", path.display()))?]
    } else {
        declaration::discover(path)
            .with_context(|| format!("failed to discover declarations under {}", path.display()))?
    };
    anyhow::ensure!(
        !declarations.is_empty(),
        "no *.module.json declarations found under {}",
        path.display()
    );
    Ok(declarations)
}

fn load_issues(path: Option<&Path>) -> anyhow::Result<HashMap<String, Vec<Issue>>> {
    let Some(path) = path else {
        return Ok(HashMap::new());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read issues file {}", path.display()))?;
    let issues = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse issues file {}", path.display()))?;
    Ok(issues)
}

fn build_name(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "build".to_string())
}
