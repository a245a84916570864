//! Configuration loader for the icecover front end.
//!
//! Loads and validates the YAML configuration file (`icecover.yaml`) and the
//! coefficient table it points to.
//!
//! Supports environment variable substitution using ${VAR} syntax.

use anyhow::{Context, Result};
use classifier::{ClassifierConfig, CoefficientTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Front-end Configuration (icecover.yaml)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcecoverConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Coefficient table, relative to the configuration file
    pub coefficients: PathBuf,
}

// ============================================================================
// Loading Functions
// ============================================================================

/// Load and parse icecover.yaml with environment variable substitution.
///
/// `ICECOVER_*` environment overrides are applied to the classifier section
/// after parsing, and relative paths are resolved against the file's
/// directory.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<IcecoverConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read icecover config from {:?}", path))?;

    let expanded = expand_env_vars(&content)?;

    let mut config: IcecoverConfig = serde_yaml::from_str(&expanded)
        .with_context(|| format!("Failed to parse icecover config from {:?}", path))?;

    config.classifier = config.classifier.with_env_overrides();
    if config.coefficients.is_relative() {
        if let Some(dir) = path.parent() {
            config.coefficients = dir.join(&config.coefficients);
        }
    }

    validate_config(&config)?;

    Ok(config)
}

/// Load the coefficient table named by the configuration.
pub fn load_coefficients(config: &IcecoverConfig) -> Result<CoefficientTable> {
    let table = CoefficientTable::from_yaml_file(&config.coefficients).with_context(|| {
        format!("Failed to load coefficient table from {:?}", config.coefficients)
    })?;

    info!(
        path = %config.coefficients.display(),
        sets = table.len(),
        "Loaded coefficient table"
    );

    Ok(table)
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand environment variables in YAML content
/// Supports ${VAR} and ${VAR:-default} syntax. Comments are copied verbatim.
pub fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        let (body, comment) = line.split_at(comment_start(line).unwrap_or(line.len()));
        expand_line(body, &mut result)?;
        result.push_str(comment);
    }

    Ok(result)
}

/// Byte offset of a YAML comment: a `#` outside quotes that starts the line
/// or follows whitespace.
fn comment_start(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut prev = ' ';

    for (i, ch) in line.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if (ch == '\'' || ch == '"') && (prev.is_whitespace() || "[{,".contains(prev)) => {
                quote = Some(ch)
            }
            None if ch == '#' && prev.is_whitespace() => return Some(i),
            None => {}
        }
        prev = ch;
    }

    None
}

fn expand_line(line: &str, result: &mut String) -> Result<()> {
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut var_expr = String::new();
            let mut brace_count = 1;

            while brace_count > 0 {
                match chars.next() {
                    Some('{') => {
                        brace_count += 1;
                        var_expr.push('{');
                    }
                    Some('}') => {
                        brace_count -= 1;
                        if brace_count > 0 {
                            var_expr.push('}');
                        }
                    }
                    Some(c) => var_expr.push(c),
                    None => anyhow::bail!("Unclosed variable substitution: ${{{}", var_expr),
                }
            }

            let value = resolve_var_expr(&var_expr)?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(())
}

/// Resolve variable expression (supports VAR and VAR:-default syntax)
fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((var_name, default)) = expr.split_once(":-") {
        match std::env::var(var_name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}

// ============================================================================
// Validation
// ============================================================================

fn validate_config(config: &IcecoverConfig) -> Result<()> {
    config
        .classifier
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid classifier config: {}", e))?;

    anyhow::ensure!(
        !config.coefficients.as_os_str().is_empty(),
        "Coefficient table path cannot be empty"
    );

    Ok(())
}
