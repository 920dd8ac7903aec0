use crate::core::{Source, Storage};
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{validate_path, validate_url};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

/// 互動式選擇來源：1 = URL，其他輸入一律視為本機檔案
pub fn prompt_source<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Source> {
    let choice = ask(input, output, "Audit (1) URL or (2) Local Text File? [1/2]: ")?;

    let source = if choice == "1" {
        Source::Url(ask(input, output, "Enter URL: ")?)
    } else {
        Source::File(PathBuf::from(ask(input, output, "Enter file path (.txt): ")?))
    };

    validate_source(&source)?;
    Ok(source)
}

pub fn validate_source(source: &Source) -> Result<()> {
    match source {
        Source::Url(url) => validate_url("source.url", url),
        Source::File(path) => validate_path("source.file", &path.to_string_lossy()),
    }
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AuditError::ConfigError {
            message: "Input ended before a source was chosen".to_string(),
        });
    }
    Ok(line.trim().to_string())
}
