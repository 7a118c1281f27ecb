use super::*;

fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    move |name| {
        pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }
}

#[test]
fn test_log_format_parse() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
    assert_eq!(LogFormat::parse(""), LogFormat::Text);
    assert_eq!(LogFormat::parse("pretty"), LogFormat::Text);
}

#[test]
fn test_no_filter_means_no_logging() {
    assert_eq!(TracingConfig::from_vars(vars(&[])), None);
    assert_eq!(
        TracingConfig::from_vars(vars(&[("DSC_LOG_FORMAT", "json")])),
        None
    );
}

#[test]
fn test_dsc_log_wins_over_rust_log() {
    let config = TracingConfig::from_vars(vars(&[
        ("RUST_LOG", "info"),
        ("DSC_LOG", "dsc_model=trace"),
        ("DSC_LOG_FORMAT", "tree"),
    ]))
    .expect("config");
    assert_eq!(config.directives, "dsc_model=trace");
    assert_eq!(config.format, LogFormat::Tree);
}

#[test]
fn test_rust_log_fallback() {
    let config = TracingConfig::from_vars(vars(&[("RUST_LOG", "warn")])).expect("config");
    assert_eq!(config.directives, "warn");
    assert_eq!(config.format, LogFormat::Text);
}
