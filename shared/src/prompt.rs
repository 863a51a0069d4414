//! Prompt assembly for the advice endpoint
//!
//! Shared so the form can preview exactly what the server will send.

use std::fmt::Write;

use crate::models::{ConversationHistory, CropName, FeatureVector};

/// Assemble the advice prompt.
///
/// Prior turns are only included when `include_history` is set; otherwise the
/// history is ignored and the prompt depends on the crop, the measurements and
/// the latest question alone.
pub fn build_prompt(
    crop: &CropName,
    features: &FeatureVector,
    follow_up: Option<&str>,
    history: Option<&ConversationHistory>,
    include_history: bool,
) -> String {
    let mut prompt = format!(
        "Provide detailed agricultural guidance for {} cultivation, focusing on:\n\
         1. Optimal cultivation process\n\
         2. Recommended fertilizers\n\
         3. Pest prevention strategies\n\
         4. Best cultivation seasons\n\
         5. Key growth requirements",
        crop
    );

    if include_history {
        if let Some(history) = history.filter(|h| !h.is_empty()) {
            prompt.push_str("\n\nPrevious Conversation Context:\n");
            prompt.push_str(&history.context_lines());
        }
    }

    // Writing into a String cannot fail
    let _ = write!(
        prompt,
        "\n\nDetailed Soil and Environmental Parameters:\n\
         - Nitrogen: {:.1}\n\
         - Phosphorus: {:.1}\n\
         - Potassium: {:.1}\n\
         - Temperature: {:.1}°C\n\
         - Humidity: {:.1}%\n\
         - pH: {:.1}\n\
         - Rainfall: {:.1} mm\n\n\
         Provide comprehensive agricultural insights taking these specific parameters into account.",
        features.nitrogen,
        features.phosphorus,
        features.potassium,
        features.temperature,
        features.humidity,
        features.ph,
        features.rainfall,
    );

    if let Some(question) = follow_up.filter(|q| !q.trim().is_empty()) {
        let _ = write!(prompt, "\n\nLatest User Query: {}", question);
    }

    prompt
}
