use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding a plain level or a full filter spec.
pub const LOG_ENV: &str = "JAXGEN_LOG";

const CRATES: [&str; 2] = ["jaxgen_cli", "jaxgen_core"];

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

/// Filter directives for a `JAXGEN_LOG` value. A plain level applies to the
/// jaxgen crates only; anything else is used as-is.
fn filter_spec(value: Option<&str>) -> String {
    match value {
        Some(level) if is_plain_level(level) => CRATES
            .iter()
            .map(|name| format!("{name}={level}"))
            .collect::<Vec<_>>()
            .join(","),
        Some(spec) => spec.to_string(),
        None => "jaxgen_cli=info,jaxgen_core=warn".to_string(),
    }
}

/// Install the stderr subscriber.
pub fn init_tracing() {
    let value = std::env::var(LOG_ENV).ok();
    let filter = filter_spec(value.as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_spec() {
        assert_eq!(filter_spec(None), "jaxgen_cli=info,jaxgen_core=warn");
        assert_eq!(
            filter_spec(Some("DEBUG")),
            "jaxgen_cli=DEBUG,jaxgen_core=DEBUG"
        );
        assert_eq!(
            filter_spec(Some("jaxgen_core=trace")),
            "jaxgen_core=trace"
        );
    }
}
