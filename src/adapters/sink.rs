use crate::core::{ConfigProvider, DocumentSink, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::process::{Command, Stdio};

const FILENAME_PREFIX: &str = "logic_ledger_";
const FILENAME_SUFFIX: &str = ".html";
const TITLE_PREFIX_CHARS: usize = 20;

/// Writes the ledger as an HTML file and hands it to the desktop viewer.
pub struct HtmlLedgerSink<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> HtmlLedgerSink<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait]
impl<S: Storage, C: ConfigProvider> DocumentSink for HtmlLedgerSink<S, C> {
    async fn publish(&self, title: &str, document: &str) -> Result<String> {
        let filename = ledger_filename(title);
        self.storage.write_file(&filename, document.as_bytes()).await?;

        let output_path = Path::new(self.config.output_path()).join(&filename);
        tracing::debug!("Ledger written to {}", output_path.display());

        if self.config.open_viewer() {
            // 開啟失敗不影響結果，檔案已經寫好了
            if let Err(e) = open_in_viewer(&output_path, self.config.viewer_command()) {
                tracing::warn!(
                    "⚠️ Could not open {} in a viewer: {}",
                    output_path.display(),
                    e
                );
            }
        }

        Ok(output_path.display().to_string())
    }
}

/// `logic_ledger_<title prefix>.html`; the prefix keeps the first 20 characters
/// of the title with everything but ASCII letters and digits turned into `_`.
pub fn ledger_filename(title: &str) -> String {
    let prefix: String = title
        .chars()
        .take(TITLE_PREFIX_CHARS)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}{}{}", FILENAME_PREFIX, prefix, FILENAME_SUFFIX)
}

fn open_in_viewer(path: &Path, viewer_command: Option<&str>) -> std::io::Result<()> {
    let mut command = match viewer_command {
        Some(program) => Command::new(program),
        None => default_viewer(),
    };

    command
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(target_os = "macos")]
fn default_viewer() -> Command {
    Command::new("open")
}

#[cfg(target_os = "windows")]
fn default_viewer() -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn default_viewer() -> Command {
    Command::new("xdg-open")
}
