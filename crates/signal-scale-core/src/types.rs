//! Wire types sent to the analysis backend and the pure builder that turns
//! raw form text into them.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// The user's own brand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandDescriptor {
    pub name: Option<String>,
    #[serde(alias = "url")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
}

impl BrandDescriptor {
    /// Brand descriptor with only a name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Name to show in narrative text and filenames.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("Your brand")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorDescriptor {
    pub name: Option<String>,
    #[serde(alias = "url")]
    pub website: Option<String>,
}

/// Payload for every analysis endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub brand: BrandDescriptor,
    #[serde(default)]
    pub competitors: Vec<CompetitorDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<String>>,
}

/// Raw text fields as entered on the setup form.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub brand_name: String,
    pub brand_url: String,
    pub industry: String,
    pub description: String,
    pub target_audience: String,
    /// One competitor per line, `Name | URL` or just `Name`.
    pub competitors: String,
    /// Comma separated.
    pub questions: String,
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Parses one `Name | URL` competitor line.
///
/// Returns `None` for a blank line. Blank segments become `None` rather than
/// empty strings, so `" | https://x.com"` yields a competitor with no name.
#[must_use]
pub fn parse_competitor_line(line: &str) -> Option<CompetitorDescriptor> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut parts = line.split('|');
    let name = parts.next().and_then(non_blank);
    let website = parts.next().and_then(non_blank);

    Some(CompetitorDescriptor { name, website })
}

/// Splits a comma separated list, trimming entries and dropping blanks.
#[must_use]
pub fn parse_name_list(text: &str) -> Vec<String> {
    text.split(',').filter_map(non_blank).collect()
}

/// Builds the analysis payload from form text. Pure; performs no validation.
#[must_use]
pub fn build_payload(form: &FormInput) -> AnalysisRequest {
    let competitors = form
        .competitors
        .lines()
        .filter_map(parse_competitor_line)
        .collect();

    let questions = parse_name_list(&form.questions);

    AnalysisRequest {
        brand: BrandDescriptor {
            name: non_blank(&form.brand_name),
            website: non_blank(&form.brand_url),
            industry: non_blank(&form.industry),
            description: non_blank(&form.description),
            target_audience: non_blank(&form.target_audience),
        },
        competitors,
        questions: (!questions.is_empty()).then_some(questions),
    }
}

/// Rejects a request whose brand name is missing or blank.
///
/// # Errors
///
/// Returns [`CoreError::EmptyBrandName`] when the brand has no usable name.
pub fn validate_request(request: &AnalysisRequest) -> Result<(), CoreError> {
    match request.brand.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => Ok(()),
        _ => Err(CoreError::EmptyBrandName),
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
