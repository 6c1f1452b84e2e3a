//! Brand and competitor arguments shared by every command that talks to the
//! intelligence API.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use signal_scale_core::{
    build_payload, normalize_website, AddOutcome, AnalysisRequest, CompetitorDescriptor,
    CompetitorSet, FormInput, MAX_COMPETITORS,
};

#[derive(Debug, Clone, Default, Args)]
pub struct BrandArgs {
    /// Brand name
    #[arg(long)]
    pub brand: Option<String>,
    /// Brand website (e.g. acme.com)
    #[arg(long)]
    pub url: Option<String>,
    /// Industry, used for fallback benchmarks
    #[arg(long)]
    pub industry: Option<String>,
    /// Short brand description
    #[arg(long)]
    pub description: Option<String>,
    /// Target audience
    #[arg(long)]
    pub audience: Option<String>,
    /// Competitor as "Name | URL" or "Name" (repeatable)
    #[arg(long = "competitor", value_name = "NAME | URL")]
    pub competitors: Vec<String>,
    /// File with one competitor per line
    #[arg(long)]
    pub competitors_file: Option<PathBuf>,
    /// Comma-separated questions for the analysis (repeatable)
    #[arg(long = "question")]
    pub questions: Vec<String>,
}

impl BrandArgs {
    /// Collects the arguments into the form the dashboard would submit.
    ///
    /// # Errors
    ///
    /// Fails if `--competitors-file` cannot be read.
    pub fn form_input(&self) -> anyhow::Result<FormInput> {
        let mut lines = self.competitors.clone();
        if let Some(path) = &self.competitors_file {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            lines.extend(text.lines().map(str::to_owned));
        }

        Ok(FormInput {
            brand_name: self.brand.clone().unwrap_or_default(),
            brand_url: self.url.clone().unwrap_or_default(),
            industry: self.industry.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            target_audience: self.audience.clone().unwrap_or_default(),
            competitors: lines.join("\n"),
            questions: self.questions.join(","),
        })
    }

    /// Builds the request payload, dropping duplicate named competitors and
    /// any beyond the cap.
    ///
    /// # Errors
    ///
    /// Fails if `--competitors-file` cannot be read.
    pub fn request(&self) -> anyhow::Result<AnalysisRequest> {
        let mut request = build_payload(&self.form_input()?);
        request.competitors = dedupe_competitors(request.competitors);
        Ok(request)
    }
}

/// Keeps input order. Named competitors are deduplicated by name; entries
/// with only a website are passed through as the API accepts them. The
/// total never exceeds [`MAX_COMPETITORS`].
fn dedupe_competitors(competitors: Vec<CompetitorDescriptor>) -> Vec<CompetitorDescriptor> {
    let mut set = CompetitorSet::new();
    let mut kept = Vec::with_capacity(competitors.len().min(MAX_COMPETITORS));
    for competitor in competitors {
        let name = competitor.name.as_deref().unwrap_or_default();
        if kept.len() >= MAX_COMPETITORS {
            tracing::warn!(name, max = MAX_COMPETITORS, "competitor limit reached; skipping");
            continue;
        }
        match set.add(name, competitor.website.as_deref()) {
            AddOutcome::Added => kept.extend(set.iter().last().cloned()),
            AddOutcome::Duplicate => tracing::warn!(name, "skipping duplicate competitor"),
            AddOutcome::Full => {
                tracing::warn!(name, max = MAX_COMPETITORS, "competitor limit reached; skipping");
            }
            AddOutcome::EmptyName => match competitor.website.as_deref() {
                Some(website) => kept.push(CompetitorDescriptor {
                    name: None,
                    website: Some(normalize_website(website)),
                }),
                None => tracing::warn!("skipping competitor without a name or website"),
            },
        }
    }
    kept
}
