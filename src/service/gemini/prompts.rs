//! Prompt construction for the Gemini analysis call

const PROMPT_HEADER: &str = r#"You are an advanced AI fact-checking and misinformation risk analysis system.

Analyze the following text and return STRICT JSON only."#;

const PROMPT_REQUIREMENTS: &str = r#"---------------------------
ANALYSIS REQUIREMENTS
---------------------------

1. Extract factual claims from the text.

2. For each claim, provide:
   - claim (string)
   - verdict ("True", "Likely True", "Uncertain", "Likely False", "False")
   - fact_check_probability (0-100)
     -> How objectively verifiable this claim is.
   - confidence (0-100)
   - reasoning (short explanation)

3. Determine:
   - emotional_tone ("Neutral", "Emotional", "Manipulative", "Fear-Based", "Conspiratorial")
   - manipulation_score (0-100)

4. Compute summary_score USING THIS EXACT FORMULA:

   Step A:
   average_fact_probability = average of all fact_check_probability values

   Step B:
   summary_score = round(
       (manipulation_score * 0.6) +
       ((100 - average_fact_probability) * 0.4)
   )

5. Risk Level Mapping (MANDATORY):

   If summary_score <= 30 -> overall_risk_level = "Low"
   If 31 <= summary_score <= 70 -> overall_risk_level = "Medium"
   If summary_score > 70 -> overall_risk_level = "High"

6. SELF-VALIDATION STEP (MANDATORY):

   Before producing final JSON:
   - Recalculate summary_score.
   - Verify that overall_risk_level matches the mapping rules.
   - If inconsistent, recompute until valid.
   - DO NOT output inconsistent values.

7. Provide:
   - summary_score (0-100)
   - overall_risk_level
   - claims (list)
   - emotional_tone
   - manipulation_score
   - confidence_overall (0-100)

---------------------------
OUTPUT FORMAT (STRICT JSON ONLY)
---------------------------

{
  "summary_score": number,
  "overall_risk_level": "Low | Medium | High",
  "claims": [
    {
      "claim": "string",
      "verdict": "True | Likely True | Uncertain | Likely False | False",
      "fact_check_probability": number,
      "confidence": number,
      "reasoning": "string"
    }
  ],
  "emotional_tone": "string",
  "manipulation_score": number,
  "confidence_overall": number
}

IMPORTANT:
- Return JSON only.
- No markdown.
- No explanation outside JSON.
- No extra keys."#;

/// Build the full analysis prompt for a piece of input text
pub fn build_analysis_prompt(text: &str) -> String {
    format!("{PROMPT_HEADER}\n\nTEXT TO ANALYZE:\n\"{text}\"\n\n{PROMPT_REQUIREMENTS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_text_and_scoring_rules() {
        let prompt = build_analysis_prompt("The moon is made of cheese.");

        assert!(prompt.contains("The moon is made of cheese."));
        assert!(prompt.contains("manipulation_score * 0.6"));
        assert!(prompt.contains("overall_risk_level = \"Low\""));
        assert!(prompt.contains("STRICT JSON"));
    }
}
