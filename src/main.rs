use echemflow::config::CONFIG;
use echemflow::{generate, procedure_fingerprint, sample_procedure, summarize_issues, validate_all, OutputFormat};

/// Demostración: arma un procedimiento, lo valida y emite los cuatro formatos.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (metadata, steps) = match sample_procedure() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[demo] no se pudo armar el procedimiento: {e}");
            std::process::exit(2);
        }
    };

    let issues = validate_all(&steps, &metadata);
    let summary = summarize_issues(&issues);
    println!(
        "Validación: {} errores, {} advertencias, {} info",
        summary.errors.len(),
        summary.warnings.len(),
        summary.infos.len()
    );
    for issue in &issues {
        let at = issue.step_index.map(|i| format!(" [step {i}]")).unwrap_or_default();
        println!("  {:?} {}{}: {}", issue.level, issue.code, at, issue.message);
    }
    println!("Fingerprint: {}", procedure_fingerprint(&metadata, &steps));

    let options = CONFIG.generator_options();
    for format in OutputFormat::ALL {
        println!("--- {format} ---");
        match generate(format, &metadata, &steps, &options) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("[demo] {format}: {e}"),
        }
    }
}
