use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use immutcheck_core::{Config, Report, Severity, TypeDeclaration, AnnotatedElement};
use immutcheck_core::config::CONFIG_FILE_NAME;
use immutcheck_engine::Verifier;
use immutcheck_graph::{load_paths, TypeGraph};

/// immutcheck - Immutability verification for annotated types
#[derive(Parser)]
#[command(name = "immutcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: immutcheck.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify every type and field carrying the immutability marker
    Check {
        /// Type graph documents or directories containing them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Show how each field of a type is classified
    Explain {
        /// Type graph document or directory
        path: PathBuf,

        /// Type to explain (fully qualified or simple name)
        type_name: String,
    },

    /// List the effective known-immutable registry
    Registry,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        Config::from_file(Path::new(CONFIG_FILE_NAME))?
    } else {
        tracing::debug!("no config file found, using defaults");
        Config::default()
    };

    match cli.command {
        Commands::Check { paths, output, markdown } => {
            check_command(&config, &paths, &output, markdown.as_deref(), cli.verbose)
        }
        Commands::Explain { path, type_name } => {
            explain_command(&config, &path, &type_name)
        }
        Commands::Registry => registry_command(&config),
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Check command - verify all annotated elements
fn check_command(
    config: &Config,
    paths: &[PathBuf],
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("{}", "Loading type graph...".cyan());
    }

    let graph = load_paths(paths)
        .map_err(|e| anyhow::anyhow!("Failed to load type graph: {}", e))?;

    if verbose {
        eprintln!("{} {} types", "Loaded".cyan(), graph.len());
    }

    let registry = config.registry();
    let verifier = Verifier::from_config(config, &registry);
    let outcome = verifier.verify(&graph);

    if verbose {
        for skipped in &outcome.skipped {
            eprintln!("  {} {}", "Skipped".yellow(), skipped);
        }
        eprintln!(
            "Checked {} annotated elements ({} classes, {} fields)",
            outcome.elements_checked, outcome.classes_verified, outcome.fields_classified
        );
    }

    let report = outcome.to_report().with_metadata(serde_json::json!({
        "graph_fingerprint": graph.fingerprint(),
        "types": graph.len(),
        "producer": graph.metadata().producer,
        "skipped": outcome.skipped,
    }));

    // Save JSON report
    report.save_to_file(output)?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    // Save markdown report if requested
    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    // Exit with error code if there are errors
    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Explain command - show field classifications for one type
fn explain_command(config: &Config, path: &Path, type_name: &str) -> Result<()> {
    let graph = load_paths(&[path.to_path_buf()])
        .map_err(|e| anyhow::anyhow!("Failed to load type graph: {}", e))?;

    let decl = find_type(&graph, type_name)?;
    print!("{}", explain_type(config, &graph, decl));

    Ok(())
}

/// Render the classification of every field of `decl`, plus its diagnostics
/// when it carries the marker
fn explain_type(config: &Config, graph: &TypeGraph, decl: &TypeDeclaration) -> String {
    use std::fmt::Write;

    let registry = config.registry();
    let verifier = Verifier::from_config(config, &registry);
    let classifier = verifier.classifier(graph);
    let rule = "=".repeat(60).bright_blue();

    let mut out = String::new();
    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "{} {}", "Type:".bold(), decl.name.green());
    let _ = writeln!(out, "{}\n", rule);

    let modifiers: Vec<&str> = decl.modifiers.iter().map(|m| m.as_str()).collect();
    let _ = writeln!(out, "{} {}", "Kind:".bold(), decl.kind);
    let _ = writeln!(out, "{} {}", "Modifiers:".bold(), modifiers.join(" "));
    let _ = writeln!(
        out,
        "{} {}\n",
        "Annotated @Immutable:".bold(),
        if decl.annotated_immutable { "yes".green() } else { "no".yellow() }
    );

    if decl.fields.is_empty() {
        let _ = writeln!(out, "No fields declared.");
    } else {
        let _ = writeln!(out, "{}", "Fields:".bold());
        for field in &decl.fields {
            let class = classifier.classify(field);
            let label = if class.is_ok() {
                class.to_string().green()
            } else {
                class.to_string().red().bold()
            };
            let field_modifiers: Vec<&str> = field.modifiers.iter().map(|m| m.as_str()).collect();

            let _ = writeln!(
                out,
                "  {} {} {}: {}",
                field_modifiers.join(" "),
                field.declared_type,
                field.name,
                label
            );
        }
    }

    if decl.annotated_immutable {
        let diagnostics = verifier.verify_element(graph, AnnotatedElement::Type(decl));
        let _ = writeln!(out);
        if diagnostics.is_empty() {
            let _ = writeln!(out, "{}", "✓ Satisfies the immutability rules".green().bold());
        } else {
            let _ = writeln!(out, "{}", "Diagnostics:".bold());
            for diag in &diagnostics {
                let _ = writeln!(out, "  [{}] {}: {}", severity_label(diag.severity), diag.code, diag.message);
            }
        }
    }

    let _ = writeln!(out, "\n{}", rule);
    out
}

/// Registry command - list trusted types
fn registry_command(config: &Config) -> Result<()> {
    let registry = config.registry();

    println!("{}", "Known immutable types:".bold());
    for type_id in registry.iter() {
        println!("  - {}", type_id);
    }
    println!();
    println!("{} types", registry.len());

    Ok(())
}

/// Find a type by fully qualified or simple name
fn find_type<'g>(graph: &'g TypeGraph, name: &str) -> Result<&'g TypeDeclaration> {
    if let Some(decl) = graph.get(name) {
        return Ok(decl);
    }

    let suffix = format!(".{}", name);
    let matches: Vec<&TypeDeclaration> = graph
        .types()
        .iter()
        .filter(|decl| decl.name.ends_with(&suffix))
        .collect();

    match matches.as_slice() {
        [single] => Ok(*single),
        [] => Err(anyhow::anyhow!(
            "Type '{}' not found in type graph. Try using the fully qualified name (e.g., 'com.example.{}')",
            name,
            name
        )),
        many => Err(anyhow::anyhow!(
            "Type name '{}' is ambiguous: {}",
            name,
            many.iter().map(|d| d.name.as_str()).collect::<Vec<_>>().join(", ")
        )),
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warn => "WARN".yellow().bold(),
        Severity::Note => "NOTE".cyan(),
    }
}

/// Print report summary to stdout
fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Immutability Check Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Annotated elements: {}", report.summary.elements_checked);
    println!("  Classes verified:   {}", report.summary.classes_verified);
    println!("  Total diagnostics:  {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Notes:    {}", report.summary.notes);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            println!("  [{}] {}: {}", severity_label(diag.severity), diag.code, diag.message);

            if let Some(loc) = &diag.location {
                println!("    at {}", loc);
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Immutability Check Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Annotated elements: {}\n", report.summary.elements_checked));
    md.push_str(&format!("- Classes verified: {}\n", report.summary.classes_verified));
    md.push_str(&format!("- Total diagnostics: {}\n", report.summary.total));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Notes: {}\n", report.summary.notes));
    md.push('\n');

    if report.diagnostics.is_empty() {
        md.push_str("✅ **No issues found!**\n");
    } else {
        md.push_str("## Diagnostics\n\n");

        for diag in &report.diagnostics {
            let severity_emoji = match diag.severity {
                Severity::Error => "❌",
                Severity::Warn => "⚠️",
                Severity::Note => "ℹ️",
            };

            md.push_str(&format!("### {} {} - {}\n\n", severity_emoji, diag.severity, diag.code));
            md.push_str(&format!("{}\n\n", diag.message));

            if let Some(loc) = &diag.location {
                md.push_str(&format!("**Location:** `{}`\n\n", loc));
            }

            if let Some(exp) = &diag.expected {
                md.push_str(&format!("**Expected:** `{}`\n\n", exp));
            }
            if let Some(act) = &diag.actual {
                md.push_str(&format!("**Actual:** `{}`\n\n", act));
            }
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use immutcheck_core::{Diagnostic, DiagnosticCode, ElementKind, Location};

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn check_requires_paths() {
        assert!(Cli::try_parse_from(["immutcheck", "check"]).is_err());
        assert!(Cli::try_parse_from(["immutcheck", "check", "types.json", "-o", "out.json"]).is_ok());
    }

    #[test]
    fn find_type_by_simple_name() {
        let graph = TypeGraph::from_declarations([
            TypeDeclaration::class("com.example.app.Person"),
            TypeDeclaration::class("com.example.app.Address"),
            TypeDeclaration::class("com.example.legacy.Address"),
        ]).unwrap();

        assert_eq!(find_type(&graph, "Person").unwrap().name, "com.example.app.Person");
        assert_eq!(
            find_type(&graph, "com.example.legacy.Address").unwrap().name,
            "com.example.legacy.Address"
        );

        let ambiguous = find_type(&graph, "Address").unwrap_err().to_string();
        assert!(ambiguous.contains("ambiguous"));
        assert!(find_type(&graph, "Missing").is_err());
    }

    #[test]
    fn markdown_report_lists_diagnostics() {
        let report = Report::from_diagnostics(vec![
            Diagnostic::new(
                DiagnosticCode::ImmutableNotFinal,
                Severity::Error,
                "com.example.Person is annotated as @Immutable but is not marked as final",
            )
            .with_location(Location::new("com.example.Person", ElementKind::Class)),
        ]);

        let md = generate_markdown_report(&report);
        assert!(md.contains("# Immutability Check Report"));
        assert!(md.contains("IMMUTABLE_NOT_FINAL"));
        assert!(md.contains("**Location:** `com.example.Person`"));
    }

    #[test]
    fn check_writes_reports_for_clean_graph() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");
        let markdown = dir.path().join("report.md");
        check_command(&Config::default(), &[fixture("demo-app")], &output, Some(markdown.as_path()), false).unwrap();

        let json = std::fs::read_to_string(&output).unwrap();
        let report: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.summary.classes_verified, 2);

        let metadata = report.metadata.unwrap();
        assert_eq!(metadata["graph_fingerprint"].as_str().unwrap().len(), 64);
        assert_eq!(metadata["producer"], "demo-app");
        assert!(markdown.exists());
    }

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures").join(name)
    }

    #[test]
    fn explain_shows_field_classes_and_diagnostics() {
        colored::control::set_override(false);
        let graph = load_paths(&[fixture("violations")]).unwrap();

        let snapshot = find_type(&graph, "Snapshot").unwrap();
        let text = explain_type(&Config::default(), &graph, snapshot);
        assert!(text.contains("Type: com.example.bad.Snapshot"));
        assert!(text.contains("private final java.util.Date takenAt: field override"));
        assert!(text.contains("tags: invalid"));
        assert!(text.contains("[ERROR] IMMUTABLE_FIELD_INVALID_TYPE"));

        let person_graph = load_paths(&[fixture("demo-app")]).unwrap();
        let person = find_type(&person_graph, "Person").unwrap();
        let text = explain_type(&Config::default(), &person_graph, person);
        assert!(text.contains("Satisfies the immutability rules"));
        assert!(!text.contains("Diagnostics:"));
    }

    #[test]
    fn explain_unknown_type_fails() {
        let err = explain_command(&Config::default(), &fixture("demo-app"), "Missing").unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }

    #[test]
    fn check_applies_fixture_config() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");
        let config = Config::from_file(&fixture("demo-app").join(CONFIG_FILE_NAME)).unwrap();
        assert!(config.registry().contains("java.time.LocalDate"));

        check_command(&config, &[fixture("demo-app")], &output, None, false).unwrap();

        let report: Report = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report.summary.total, 0);
        assert_eq!(report.metadata.unwrap()["producer"], "demo-app");
    }

    #[test]
    fn markdown_report_clean() {
        let md = generate_markdown_report(&Report::new());
        assert!(md.contains("No issues found"));
    }
}
