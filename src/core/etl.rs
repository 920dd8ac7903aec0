use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct AuditEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AuditEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting logic audit");

        // Extract
        tracing::info!("📥 Loading source text...");
        let document = self.pipeline.extract().await?;
        tracing::info!(
            "📄 Loaded '{}' ({} characters)",
            document.title,
            document.text.char_count()
        );

        // Transform
        tracing::info!("🧠 Performing deep audit...");
        let ledger = self.pipeline.transform(document).await?;
        tracing::info!("🔍 Rendered {} findings", ledger.items.len());

        // Load
        tracing::info!("📝 Writing ledger...");
        let location = self.pipeline.load(ledger).await?;
        tracing::info!("📁 Ledger saved to: {}", location);

        Ok(location)
    }
}
