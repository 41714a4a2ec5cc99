// All LLM prompt constants for the interview module.
// Templates use {placeholder} substitution; rendering is pure string work
// and deterministic for identical inputs.

use crate::interview::session::{ExperienceTier, TurnRecord};

/// Role-playing preamble and output contract for the interview agent.
/// Replace `{role}`, `{tier}`, and `{prior_dialogue}` before sending.
pub const INTERVIEW_SYSTEM_TEMPLATE: &str = r#"You are the CareerFlow AI Interview Simulation Agent.
Your sole purpose is to conduct a highly realistic, contextual, and role-specific mock interview.

--- CONTEXT ---
Target Role: {role}
Experience Level: {tier} (BEGINNER, INTERMEDIATE, or EXPERT)
Previous Dialogue: {prior_dialogue}
---

--- INSTRUCTIONS ---
1. **Difficulty Calibration:** Tailor your questions based on the 'Experience Level'.
   * **BEGINNER:** Focus on definitions, basic policy adherence, and entry-level tasks.
   * **INTERMEDIATE:** Focus on tactical implementation, policy interpretation, and handling common scenarios.
   * **EXPERT:** Focus on strategic planning, organizational change management, legal risk mitigation, and leadership philosophy.
2. **Question Generation:** Generate only one, single question per turn. The question must be a direct and professional follow-up or a new question highly relevant to the target role.
3. **Interview Flow:** If the candidate answers well, increase the complexity in the next question. If the candidate answers poorly, probe deeper into that specific area for validation.
4. **Do NOT provide the correct answer or coach the candidate.** Maintain the role of a neutral interviewer.
5. **Format your output STRICTLY as a single JSON object with no surrounding text and no markdown code fences.**

--- JSON OUTPUT FORMAT ---
{
    "question": "Your single, generated interview question here.",
    "interview_status": "continue"
}

"interview_status" must be "continue" while the interview should keep going, or "complete" once the candidate's answers leave nothing further worth probing."#;

/// Suffix asking for the opening question of a fresh session.
pub const OPENING_TASK_TEMPLATE: &str =
    "Generate the first interview question for a {tier} {role}.";

/// Suffix asking for a follow-up based on the recorded dialogue.
pub const FOLLOW_UP_TASK: &str =
    "Generate the next interview question based on the previous dialogue.";

/// Renders the full prompt for a session's next model call.
///
/// `prior` carries the last answered turn; `None` renders the opening
/// request. Output is deterministic for identical inputs.
pub fn render_interview_prompt(
    role: &str,
    tier: ExperienceTier,
    prior: Option<&TurnRecord>,
) -> String {
    let prior_dialogue = match prior {
        Some(turn) => format!("Q: {} - A: {}", turn.question, turn.answer),
        None => "[]".to_string(),
    };

    let system = INTERVIEW_SYSTEM_TEMPLATE
        .replace("{role}", role)
        .replace("{tier}", tier.label())
        .replace("{prior_dialogue}", &prior_dialogue);

    let task = match prior {
        Some(_) => FOLLOW_UP_TASK.to_string(),
        None => OPENING_TASK_TEMPLATE
            .replace("{tier}", tier.label())
            .replace("{role}", role),
    };

    format!("{system}\n\n{task}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_deterministic() {
        let a = render_interview_prompt("HR Analyst", ExperienceTier::Beginner, None);
        let b = render_interview_prompt("HR Analyst", ExperienceTier::Beginner, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_embeds_role_and_tier() {
        let prompt = render_interview_prompt("HR Manager", ExperienceTier::Expert, None);
        assert!(prompt.contains("Target Role: HR Manager"));
        assert!(prompt.contains("Experience Level: EXPERT"));
    }

    #[test]
    fn test_opening_prompt_has_empty_dialogue_marker() {
        let prompt = render_interview_prompt("HR Analyst", ExperienceTier::Beginner, None);
        assert!(prompt.contains("Previous Dialogue: []"));
        assert!(prompt.contains("Generate the first interview question"));
    }

    #[test]
    fn test_follow_up_prompt_embeds_prior_turn() {
        let turn = TurnRecord {
            question: "What is onboarding?".to_string(),
            answer: "Welcoming new hires.".to_string(),
        };
        let prompt =
            render_interview_prompt("HR Analyst", ExperienceTier::Intermediate, Some(&turn));
        assert!(prompt.contains("Q: What is onboarding? - A: Welcoming new hires."));
        assert!(prompt.contains("Generate the next interview question"));
    }

    #[test]
    fn test_prompt_demands_json_only_output() {
        let prompt = render_interview_prompt("HR Analyst", ExperienceTier::Beginner, None);
        assert!(prompt.contains("single JSON object"));
        assert!(prompt.contains("\"interview_status\""));
    }
}
