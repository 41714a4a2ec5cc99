//! Final-verdict templates, keyed by workflow and experience tier.

use serde::Serialize;

use crate::interview::session::ExperienceTier;

/// The one verdict a session produces at completion.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub final_score: u8,
    pub overall_feedback: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

fn verdict(score: u8, feedback: &str, strengths: [&str; 3], weaknesses: [&str; 3]) -> Verdict {
    Verdict {
        final_score: score,
        overall_feedback: feedback.to_string(),
        strengths: strengths.iter().map(|s| s.to_string()).collect(),
        weaknesses: weaknesses.iter().map(|s| s.to_string()).collect(),
    }
}

/// Verdict for the human-like interview workflow.
pub fn human_verdict(tier: ExperienceTier) -> Verdict {
    match tier {
        ExperienceTier::Beginner => verdict(
            88,
            "You did a great job explaining your background and motivations. For future \
             interviews, try to connect your experiences more directly to the role \
             requirements. Your enthusiasm is a strength!",
            [
                "Clear communication",
                "Enthusiasm and motivation",
                "Good foundational understanding",
            ],
            [
                "Could connect experiences more directly to role",
                "Need more specific examples",
                "Technical depth could be improved",
            ],
        ),
        ExperienceTier::Intermediate => verdict(
            88,
            "You demonstrated solid experience and good problem-solving abilities. To \
             elevate your performance, focus on quantifying your achievements with \
             specific metrics and showing more leadership initiative.",
            [
                "Relevant experience",
                "Good problem-solving approach",
                "Clear communication",
            ],
            [
                "Could include more specific metrics",
                "Need to elaborate on leadership examples",
                "Technical depth could be improved",
            ],
        ),
        ExperienceTier::Expert => verdict(
            88,
            "You showcased extensive experience and strategic thinking. To refine your \
             approach, consider providing more concise answers while maintaining depth, \
             and ensure you're directly addressing the question asked.",
            [
                "Extensive experience",
                "Strategic thinking",
                "Strong technical foundation",
            ],
            [
                "Answers could be more concise",
                "Need to directly address questions",
                "Could show more innovative approaches",
            ],
        ),
    }
}

/// Verdict for the HR-specialist interview workflow.
pub fn hr_verdict(tier: ExperienceTier) -> Verdict {
    match tier {
        ExperienceTier::Beginner => verdict(
            85,
            "You handled the foundational questions well and showed a solid grasp of core \
             HR concepts. Keep building familiarity with day-to-day policy application. \
             Overall, BEGINNER-level proficiency demonstrated.",
            [
                "Solid grasp of core concepts",
                "Willingness to reason through scenarios",
                "Professional communication",
            ],
            [
                "Limited exposure to real policy cases",
                "Answers stayed at the definition level",
                "Needs practice with situational questions",
            ],
        ),
        ExperienceTier::Intermediate => verdict(
            85,
            "Excellent response to tactical questions. Need to be more precise on policy \
             details and the reasoning behind them. Overall, INTERMEDIATE-level \
             proficiency demonstrated.",
            [
                "Practical scenario handling",
                "Good policy interpretation",
                "Structured answers",
            ],
            [
                "Policy details were sometimes imprecise",
                "Could quantify outcomes more often",
                "Escalation judgment needs sharpening",
            ],
        ),
        ExperienceTier::Expert => verdict(
            85,
            "Excellent response to strategic questions. Need to be more precise on policy \
             details when moving from vision to execution. Overall, EXPERT-level \
             proficiency demonstrated.",
            [
                "Strategic planning depth",
                "Change-management perspective",
                "Leadership philosophy came through clearly",
            ],
            [
                "Execution details occasionally glossed over",
                "Policy precision behind the strategy",
                "Answers could be tightened",
            ],
        ),
    }
}
