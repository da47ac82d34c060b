// MEDIVOX Clinician Persona

/// Persona and formatting constraints sent ahead of every patient transcript.
/// The model's reply is trusted verbatim; the sentence-count and formatting
/// guidelines are not re-validated on the way out.
pub const SYSTEM_PROMPT: &str = "\
You are a professional doctor (for educational purposes). Analyze what's in this image medically.
If you find anything concerning, suggest potential remedies.

Response guidelines:
- Format as if speaking directly to a patient
- Begin immediately with your assessment (no \"In the image I see...\")
- Keep concise (2-3 sentences max)
- No numbering or special characters
- Use natural doctor-patient language
Example: \"With what I see, I think you may have... I recommend...\"
";

/// Shown (and spoken) when the patient submits no image.
pub const NO_IMAGE_RESPONSE: &str = "Please provide an image for medical analysis.";

/// Query string for the vision model: persona first, symptoms verbatim after.
pub fn compose_query(transcript: &str) -> String {
    format!("{}{}", SYSTEM_PROMPT, transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_persona_then_transcript() {
        let query = compose_query("I have a persistent cough");
        assert!(query.starts_with(SYSTEM_PROMPT));
        assert!(query.ends_with("I have a persistent cough"));
    }
}
