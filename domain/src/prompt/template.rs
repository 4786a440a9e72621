//! Prompt templates for each kind of debate turn

use crate::core::question::Question;
use crate::role::{Role, Stance};
use crate::schedule::TurnKind;
use crate::transcript::{Turn, TranscriptWindow};

/// Templates for generating the prompts of a debate
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for a role: its configured prompt plus the debate framing
    pub fn system_prompt(role: &Role) -> String {
        let framing = match role.stance() {
            Stance::Pro => "You are arguing FOR the proposition in a structured, multi-round debate.",
            Stance::Con => "You are arguing AGAINST the proposition in a structured, multi-round debate.",
            Stance::Neutral => {
                "You are a neutral analyst in a structured, multi-round debate. Weigh both sides without committing to either."
            }
            Stance::Moderator => "You are the moderator of a structured, multi-round debate.",
            Stance::Summary => "You write the final synthesis of a finished debate.",
        };
        format!(
            "{}\n\n{} Your name in this debate is {}. Be concise and stay on the question.",
            role.system_prompt().trim(),
            framing,
            role.name()
        )
    }

    /// User prompt for one scheduled turn
    pub fn turn_prompt(
        kind: TurnKind,
        question: &Question,
        round_index: u32,
        context: &TranscriptWindow,
    ) -> String {
        let mut prompt = format!("Debate question: {}\n", question);
        let round = round_index + 1;

        match kind {
            TurnKind::Opening => {
                if !context.is_empty() {
                    prompt.push_str("\nStatements so far:\n");
                    Self::push_turns(&mut prompt, context);
                }
                prompt.push_str(&format!(
                    "\nThis is round {}, the opening round. State your position and your \
                     two or three strongest arguments.",
                    round
                ));
            }
            TurnKind::Rebuttal => {
                prompt.push_str("\nDebate so far:\n");
                Self::push_turns(&mut prompt, context);
                prompt.push_str(&format!(
                    "\nThis is round {}. Respond directly to the strongest opposing points, \
                     concede what is fair, and strengthen your own case. Do not repeat \
                     earlier arguments verbatim.",
                    round
                ));
            }
            TurnKind::Moderation => {
                prompt.push_str(&format!("\nStatements up to the end of round {}:\n", round));
                Self::push_turns(&mut prompt, context);
                prompt.push_str(
                    "\nAs moderator, briefly:\n\
                     1. Name the strongest point made on each side this round\n\
                     2. Identify what is still disputed\n\
                     3. Pose one focused question for the next round\n\n\
                     Finish with exactly one line: `CONSENSUS: REACHED` if the participants \
                     now substantially agree, otherwise `CONSENSUS: NOT REACHED`.",
                );
            }
            TurnKind::Summary => {
                prompt.push_str("\nFull debate transcript:\n");
                Self::push_turns(&mut prompt, context);
                prompt.push_str(
                    r#"
Please provide:

1. **Conclusion**: A balanced answer to the question drawing on the strongest arguments

2. **Arguments For**: The key supporting points (bullet list)

3. **Arguments Against**: The key opposing points (bullet list)

4. **Common Ground**: Where the participants agreed (bullet list)

Format your response with clear markdown headers."#,
                );
            }
        }
        prompt
    }

    fn push_turns(prompt: &mut String, context: &TranscriptWindow) {
        if context.omitted > 0 {
            prompt.push_str(&format!("\n({} earlier statements omitted)\n", context.omitted));
        }
        if context.is_empty() {
            prompt.push_str("\n(no statements yet)\n");
        }
        for turn in &context.turns {
            prompt.push_str(&Self::render_turn(turn));
        }
    }

    fn render_turn(turn: &Turn) -> String {
        let body = if turn.is_ok() {
            turn.content.trim()
        } else {
            "(no response)"
        };
        format!(
            "\n--- {} · round {} ---\n{}\n",
            turn.role_id,
            turn.round_index + 1,
            body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Model;
    use crate::role::{DisplayColor, RoleId};
    use crate::transcript::TokenUsage;

    fn question() -> Question {
        Question::new("Should cities ban cars?").unwrap()
    }

    fn window(turns: Vec<Turn>, omitted: usize) -> TranscriptWindow {
        TranscriptWindow { turns, omitted }
    }

    fn turn(role: &str, round: u32, content: &str) -> Turn {
        Turn::ok(
            RoleId::from(role),
            round,
            TurnKind::Opening,
            content,
            TokenUsage::default(),
            0,
        )
    }

    #[test]
    fn test_system_prompt_includes_role_prompt_and_name() {
        let role = Role::new(
            RoleId::from("con-1"),
            "Skeptic",
            Stance::Con,
            "You distrust grand plans.",
            Model::default(),
            DisplayColor::for_stance(Stance::Con),
        );
        let prompt = PromptTemplate::system_prompt(&role);
        assert!(prompt.starts_with("You distrust grand plans."));
        assert!(prompt.contains("AGAINST"));
        assert!(prompt.contains("Skeptic"));
    }

    #[test]
    fn test_opening_prompt_first_speaker() {
        let prompt = PromptTemplate::turn_prompt(TurnKind::Opening, &question(), 0, &window(vec![], 0));
        assert!(prompt.contains("Should cities ban cars?"));
        assert!(prompt.contains("opening round"));
        assert!(!prompt.contains("Statements so far"));
    }

    #[test]
    fn test_rebuttal_prompt_lists_turns_and_omissions() {
        let ctx = window(vec![turn("pro-1", 0, "Cars pollute."), turn("con-1", 0, "Cars enable freedom.")], 3);
        let prompt = PromptTemplate::turn_prompt(TurnKind::Rebuttal, &question(), 1, &ctx);
        assert!(prompt.contains("--- pro-1 · round 1 ---"));
        assert!(prompt.contains("Cars enable freedom."));
        assert!(prompt.contains("(3 earlier statements omitted)"));
        assert!(prompt.contains("This is round 2."));
    }

    #[test]
    fn test_moderation_prompt_asks_for_verdict() {
        let prompt = PromptTemplate::turn_prompt(TurnKind::Moderation, &question(), 0, &window(vec![], 0));
        assert!(prompt.contains("CONSENSUS: REACHED"));
        assert!(prompt.contains("CONSENSUS: NOT REACHED"));
    }

    #[test]
    fn test_failed_turns_render_as_no_response() {
        let failed = Turn::failed(RoleId::from("pro-1"), 0, TurnKind::Opening, "timeout", 0);
        let prompt = PromptTemplate::turn_prompt(TurnKind::Summary, &question(), 2, &window(vec![failed], 0));
        assert!(prompt.contains("(no response)"));
        assert!(prompt.contains("Conclusion"));
    }
}
