//! Token stream processing
//!
//! Drives the tokenizer over a whole source and serializes the result for
//! inspection: a compact text listing, JSON, or YAML.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::kotoba::errors::Error;
use crate::kotoba::tokenizer::{Tokenizer, TokenizerConfig};
use crate::kotoba::tokens::Token;

/// Output formats for a token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = ProcessingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(ProcessingError::UnknownFormat(other.to_string())),
        }
    }
}

/// Errors that can occur during processing.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingError {
    UnknownFormat(String),
    IoError(String),
    SerializeError(String),
    TokenizeError(Error),
}

impl fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingError::UnknownFormat(format) => write!(f, "Unknown format: {}", format),
            ProcessingError::IoError(message) => write!(f, "IO error: {}", message),
            ProcessingError::SerializeError(message) => {
                write!(f, "Serialization error: {}", message)
            }
            ProcessingError::TokenizeError(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for ProcessingError {}

impl From<Error> for ProcessingError {
    fn from(error: Error) -> Self {
        ProcessingError::TokenizeError(error)
    }
}

/// Tokenize a whole source to completion.
pub fn tokenize_all(source: &str) -> Result<Vec<Token>, Error> {
    tokenize_all_with(source, TokenizerConfig::default())
}

pub fn tokenize_all_with(source: &str, config: TokenizerConfig) -> Result<Vec<Token>, Error> {
    let mut tokenizer = Tokenizer::with_config(source, config);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Serialize a token stream in the given format.
pub fn format_tokens(tokens: &[Token], format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for token in tokens {
                out.push_str(&token.to_string());
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Json => serde_json::to_string_pretty(tokens)
            .map_err(|e| ProcessingError::SerializeError(e.to_string())),
        OutputFormat::Yaml => serde_yaml::to_string(tokens)
            .map_err(|e| ProcessingError::SerializeError(e.to_string())),
    }
}

/// Tokenize a source and serialize the stream.
pub fn process_source(source: &str, format: OutputFormat) -> Result<String, ProcessingError> {
    let tokens = tokenize_all(source)?;
    format_tokens(&tokens, format)
}

/// Read, tokenize, and serialize a file.
pub fn process_file<P: AsRef<Path>>(
    path: P,
    format: OutputFormat,
) -> Result<String, ProcessingError> {
    let source =
        fs::read_to_string(path).map_err(|e| ProcessingError::IoError(e.to_string()))?;
    process_source(&source, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_format() {
        let output = process_source("ほげは 10\n", OutputFormat::Text).unwrap();
        assert_eq!(output, "ASSIGNMENT(ほげ):は\nVARIABLE(10):VAL_NUM\nEOL\n");
    }

    #[test]
    fn test_json_format_round_trips() {
        let output = process_source("ほげは 10\n", OutputFormat::Json).unwrap();
        let tokens: Vec<Token> = serde_json::from_str(&output).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "ほげ");
    }

    #[test]
    fn test_yaml_format_parses() {
        let output = process_source("ほげは 10\n", OutputFormat::Yaml).unwrap();
        let tokens: Vec<Token> = serde_yaml::from_str(&output).unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("ast".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_tokenize_error_surfaces() {
        let error = process_source("10は 5\n", OutputFormat::Text).unwrap_err();
        assert!(matches!(error, ProcessingError::TokenizeError(_)));
    }
}
