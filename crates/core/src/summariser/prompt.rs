/// Instructions placed ahead of every report.
const ANALYSIS_INSTRUCTIONS: &str = "Analyze the following diagnostic report and provide:
1. List of things that are normal.
2. List of things that are abnormal, with possible reasons.
3. Suggested next steps.
4. Consequences if no action is taken.";

/// Builds the fixed-template prompt that embeds the full report text.
pub fn build_summary_prompt(report_content: &str) -> String {
    format!(
        "{}\n\nReport content: {}",
        ANALYSIS_INSTRUCTIONS, report_content
    )
}
