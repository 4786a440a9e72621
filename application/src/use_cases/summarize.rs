//! Summarizer: the single post-debate synthesis call.
//!
//! A failed summary never changes how the session ended; the caller
//! records a warning and leaves the summary empty.

use super::shared::invoke_with_retry;
use crate::config::InvocationParams;
use crate::ports::turn_invoker::{InvocationError, InvocationRequest, TurnInvoker, Utterance};
use debate_domain::{ContextWindow, Question, Role, Transcript, TurnKind};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizationFailure {
    #[error("summary role failed: {0}")]
    Invocation(#[from] InvocationError),

    #[error("summary role returned an empty synthesis")]
    Empty,
}

pub struct Summarizer<'a, I: TurnInvoker + ?Sized> {
    invoker: &'a I,
    params: &'a InvocationParams,
}

impl<'a, I: TurnInvoker + ?Sized> Summarizer<'a, I> {
    pub fn new(invoker: &'a I, params: &'a InvocationParams) -> Self {
        Self { invoker, params }
    }

    /// Summarize the complete transcript with `role`.
    ///
    /// Uses the same retry budget as debate turns; the context window
    /// setting does not apply, the summarizer always sees everything.
    /// Once `token` is cancelled the call in flight settles but is not
    /// retried.
    pub async fn summarize(
        &self,
        role: &Role,
        question: &Question,
        transcript: &Transcript,
        token: &CancellationToken,
    ) -> Result<Utterance, SummarizationFailure> {
        info!(role = %role.id(), turns = transcript.len(), "Summarizing debate");
        let request = InvocationRequest {
            role: role.clone(),
            kind: TurnKind::Summary,
            round_index: transcript.last().map(|t| t.round_index).unwrap_or(0),
            question: question.clone(),
            context: transcript.window(ContextWindow::Full, None),
        };

        let utterance = invoke_with_retry(self.invoker, &request, self.params, token, |attempt, err| {
            warn!(attempt, error = %err, "Retrying summary");
        })
        .await?;

        if utterance.content.trim().is_empty() {
            return Err(SummarizationFailure::Empty);
        }
        Ok(utterance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use debate_domain::{DisplayColor, Model, RoleId, Stance, TokenUsage, Turn};
    use std::sync::Mutex;

    struct Recording {
        reply: Result<Utterance, InvocationError>,
        seen: Mutex<Vec<InvocationRequest>>,
    }

    #[async_trait]
    impl TurnInvoker for Recording {
        async fn invoke(&self, request: &InvocationRequest) -> Result<Utterance, InvocationError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    fn summary_role() -> Role {
        Role::new(
            RoleId::from("summary"),
            "Summarizer",
            Stance::Summary,
            "Summarize.",
            Model::default(),
            DisplayColor::for_stance(Stance::Summary),
        )
    }

    fn transcript(turns: usize) -> Transcript {
        let mut transcript = Transcript::new();
        for i in 0..turns {
            transcript
                .append(Turn::ok(
                    RoleId::from("pro"),
                    (i / 2) as u32,
                    TurnKind::Rebuttal,
                    "point",
                    TokenUsage::new(1, 1),
                    1,
                ))
                .unwrap();
        }
        transcript
    }

    #[tokio::test]
    async fn test_summary_sees_full_transcript() {
        let invoker = Recording {
            reply: Ok(Utterance {
                content: "Both sides agree on safety.".into(),
                usage: TokenUsage::new(100, 20),
                latency_ms: 3,
            }),
            seen: Mutex::new(Vec::new()),
        };
        let params = InvocationParams::default()
            .with_context_window(debate_domain::ContextWindow::LastTurns(1));
        let question = Question::new("Q?").unwrap();

        let utterance = Summarizer::new(&invoker, &params)
            .summarize(&summary_role(), &question, &transcript(6), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(utterance.content, "Both sides agree on safety.");
        let seen = invoker.seen.lock().unwrap();
        assert_eq!(seen[0].kind, TurnKind::Summary);
        assert_eq!(seen[0].context.turns.len(), 6);
        assert_eq!(seen[0].context.omitted, 0);
    }

    #[tokio::test]
    async fn test_failures_and_empty_replies() {
        let params = InvocationParams::default();
        let question = Question::new("Q?").unwrap();

        let failing = Recording {
            reply: Err(InvocationError::Timeout),
            seen: Mutex::new(Vec::new()),
        };
        let err = Summarizer::new(&failing, &params)
            .summarize(&summary_role(), &question, &transcript(2), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, SummarizationFailure::Invocation(InvocationError::Timeout));
        // One retry with the default budget
        assert_eq!(failing.seen.lock().unwrap().len(), 2);

        let empty = Recording {
            reply: Ok(Utterance {
                content: "   ".into(),
                usage: TokenUsage::default(),
                latency_ms: 0,
            }),
            seen: Mutex::new(Vec::new()),
        };
        let err = Summarizer::new(&empty, &params)
            .summarize(&summary_role(), &question, &transcript(2), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, SummarizationFailure::Empty);
    }

    #[tokio::test]
    async fn test_stopped_summary_is_not_retried() {
        let params = InvocationParams::default();
        let token = CancellationToken::new();
        token.cancel();
        let failing = Recording {
            reply: Err(InvocationError::Timeout),
            seen: Mutex::new(Vec::new()),
        };

        let err = Summarizer::new(&failing, &params)
            .summarize(&summary_role(), &Question::new("Q?").unwrap(), &transcript(2), &token)
            .await
            .unwrap_err();
        assert_eq!(err, SummarizationFailure::Invocation(InvocationError::Timeout));
        assert_eq!(failing.seen.lock().unwrap().len(), 1);
    }
}
