//! Profile export as JSON or human-readable text.

use std::fmt::Write;

use crate::error::{ProfileError, ProfileResult};
use crate::profile::CognitiveProfile;

/// Pretty-printed JSON of the full record.
pub fn to_json(profile: &CognitiveProfile) -> ProfileResult<String> {
    serde_json::to_string_pretty(profile)
        .map_err(|e| ProfileError::internal(format!("failed to serialize profile {}: {e}", profile.id)))
}

/// Plain-text report.
#[must_use]
pub fn to_text(profile: &CognitiveProfile) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, profile);
    out
}

fn write_text(out: &mut String, profile: &CognitiveProfile) -> std::fmt::Result {
    writeln!(out, "Cognitive Profile {}", profile.id)?;
    writeln!(out, "Created:   {}", profile.created_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out, "Source:    {}", profile.source)?;
    writeln!(out, "Signature: {}", profile.signature)?;
    if let Some(use_case) = &profile.use_case {
        writeln!(out, "Use case:  {use_case}")?;
    }
    if let Some(score) = profile.compatibility_score {
        writeln!(out, "Compatibility: {score:.2}")?;
    }
    writeln!(
        out,
        "Quality:   {:.2} confidence, {} data",
        profile.quality.confidence, profile.quality.completeness
    )?;

    writeln!(out)?;
    writeln!(out, "Traits:")?;
    for (t, score) in profile.traits.iter() {
        writeln!(out, "  {:<16} {score:.2}", t.as_str())?;
    }

    let narrative = &profile.narrative;
    writeln!(out)?;
    writeln!(out, "Strengths: {}", join_or_none(&narrative.strengths))?;
    writeln!(out, "Biases:    {}", join_or_none(&narrative.biases))?;
    writeln!(out, "Communication style: {}", narrative.communication_style)?;
    writeln!(out, "Learning preference: {}", narrative.learning_preference)?;

    if let Some(sources) = &profile.hybrid_sources {
        writeln!(out)?;
        writeln!(out, "Blended from:")?;
        for s in sources {
            writeln!(out, "  {} ({:.2})", s.profile_id, s.weight)?;
        }
    }
    Ok(())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
