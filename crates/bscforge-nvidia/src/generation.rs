//! Code-generation prompt and streaming accumulation.

use crate::client::NvidiaClient;
use crate::error::{ApiError, ApiResult};
use crate::types::{ChatRequest, StreamEvent};
use bscforge_config::GenerationConfig;
use tokio::sync::mpsc;

/// Fixed instruction directive, first part of every generation prompt.
pub const PROMPT_INSTRUCTIONS: &str = r#"You are an expert in protocol modeling and B2Scala.
You have access to a Knowledge Base which contains canonical, working B2Scala examples.
One canonical example in the Knowledge Base is the QUIC v1 handshake file that uses the exact
package, imports, object structure, DATA / AGENTS / FORMULA & EXEC sections, and B2Scala primitives
shown below. Use that example as the authoritative template and style guide.

Your tasks (MANDATORY):
1) Read the given protocol draft (variable `draft` below) and the Knowledge Base context (variable `context_text`).
2) Summarize the draft internally (agents, messages, goals, assumptions) and then produce a single output:
- Exactly one Scala source file, and nothing else (no extra prose).
- The Scala file MUST follow the package, imports, object name, and structural layout shown in the canonical example.
- All tokens, case classes, agents, messages and formulas MUST be adapted from the draft but preserve the canonical coding style.
3) If any detail in the draft is missing, make reasonable assumptions and document them with inline // comments in the Scala file.
4) Ensure the Scala file is self-contained (all needed case classes and Tokens declared) and is syntactically consistent with the canonical QUIC example from the Knowledge Base.
5) Do NOT output anything outside the Scala file. The entire assistant response must be the file contents only.

RESTRICTIONS (must obey):
- Use **exactly** this package and imports header at the top of the file:
package bscala.bsc_program

import bscala.bsc_data._
import bscala.bsc_agent._
import bscala.bsc_runner._
import bscala.bsc_settings._
import bscala.bsc_formula._

- Follow the canonical section headings and layout: DATA, AGENTS, FORMULA & EXEC as in the example.
- Preserve naming style: Tokens named with quotes like Token("Name"), SI_Term case classes, Agent scripts using tell/get/ask composition, and final execution via new BSC_Runner_BHM().execute(Protocol, F).
- Produce case classes for all structured terms you need (messages, crypto, envelopes, events, etc.).
- All assumptions must be inline commented with // and briefly justified.
- Output must be a compilable B2Scala program using core primitives only (no external libraries beyond the imports above).

VERY IMPORTANT OUTPUT RULE:
- The assistant MUST output a single Scala file only, using the object name `BSC_modelling_<ProtocolNameNoSpaces>` where <ProtocolNameNoSpaces> is derived from the draft title (remove spaces, punctuation).
- Include a one-line doc comment right after the imports briefly describing the protocol.

Input variables available:
- draft: the protocol draft text (use to extract agents, messages, goals, assumptions).
"#;

/// Label separating the draft from the retrieved context.
pub const PROMPT_CONTEXT_LABEL: &str =
    "\n- context_text: Knowledge Base context (contains canonical B2Scala examples you MUST follow).\n";

/// Closing directive, last part of every generation prompt.
pub const PROMPT_CLOSING: &str = "\nNow produce the Scala file ONLY, using the canonical QUIC example style from the Knowledge Base as the template and adapting tokens/messages/agents from the draft. Ensure all missing details are commented with // assumptions.\n";

/// Build the generation prompt by pure concatenation: the fixed directive,
/// the draft, and the retrieved context, with no escaping or truncation.
pub fn build_generation_prompt(draft: &str, context_text: &str) -> String {
    let mut prompt = String::with_capacity(
        PROMPT_INSTRUCTIONS.len()
            + draft.len()
            + PROMPT_CONTEXT_LABEL.len()
            + context_text.len()
            + PROMPT_CLOSING.len(),
    );
    prompt.push_str(PROMPT_INSTRUCTIONS);
    prompt.push_str(draft);
    prompt.push_str(PROMPT_CONTEXT_LABEL);
    prompt.push_str(context_text);
    prompt.push_str(PROMPT_CLOSING);
    prompt
}

/// Result of one completed generation.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// The full generated source listing.
    pub code: String,
    /// The context chunks used to build the prompt.
    pub context: Vec<String>,
}

/// Fold the event stream into the accumulated generation text.
///
/// Content fragments append to the accumulator in arrival order; every
/// event is surfaced through `on_event` before the accumulator grows, so
/// callers can render incrementally. A [`StreamEvent::Failed`] aborts: the
/// error is returned and the partial accumulator is discarded. Dropping
/// the receiver (by returning early from `on_event`'s caller) cancels the
/// stream.
pub async fn accumulate_stream<F>(
    mut rx: mpsc::Receiver<StreamEvent>,
    mut on_event: F,
) -> ApiResult<String>
where
    F: FnMut(&StreamEvent),
{
    let mut accumulated = String::new();

    while let Some(event) = rx.recv().await {
        on_event(&event);
        match event {
            StreamEvent::Content(fragment) => accumulated.push_str(&fragment),
            StreamEvent::Reasoning(_) => {}
            StreamEvent::Failed(message) => return Err(ApiError::Stream(message)),
        }
    }

    Ok(accumulated)
}

impl NvidiaClient {
    /// Start a streaming generation for a draft with retrieved context.
    ///
    /// Builds the fixed prompt, applies the configured sampling parameters,
    /// and enables the reasoning side channel. The returned receiver feeds
    /// [`accumulate_stream`].
    pub async fn generate_stream(
        &self,
        config: &GenerationConfig,
        model: &str,
        draft: &str,
        context: &[String],
    ) -> ApiResult<mpsc::Receiver<StreamEvent>> {
        let context_text = context.join("\n");
        let prompt = build_generation_prompt(draft, &context_text);

        let request = ChatRequest::new(model, prompt)
            .with_temperature(config.temperature)
            .with_top_p(config.top_p)
            .with_max_tokens(config.max_tokens)
            .with_thinking();

        self.chat_stream(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_pure_concatenation() {
        let draft = "Title: Simple Key Exchange\nAgents: Client, Server";
        let context = "object BSC_modelling_QUIC extends App { ... }";

        let prompt = build_generation_prompt(draft, context);

        assert_eq!(
            prompt.len(),
            PROMPT_INSTRUCTIONS.len()
                + draft.len()
                + PROMPT_CONTEXT_LABEL.len()
                + context.len()
                + PROMPT_CLOSING.len()
        );
        assert!(prompt.contains(draft));
        assert!(prompt.contains(context));
        assert!(prompt.starts_with(PROMPT_INSTRUCTIONS));
        assert!(prompt.ends_with(PROMPT_CLOSING));
    }

    #[test]
    fn test_prompt_empty_inputs() {
        let prompt = build_generation_prompt("", "");
        assert_eq!(
            prompt.len(),
            PROMPT_INSTRUCTIONS.len() + PROMPT_CONTEXT_LABEL.len() + PROMPT_CLOSING.len()
        );
    }

    #[tokio::test]
    async fn test_accumulate_fragments_in_order() {
        let (tx, rx) = mpsc::channel(10);

        for fragment in ["Hel", "lo, ", "world"] {
            tx.send(StreamEvent::Content(fragment.to_string()))
                .await
                .unwrap();
        }
        drop(tx);

        let result = accumulate_stream(rx, |_| {}).await.unwrap();
        assert_eq!(result, "Hello, world");
    }

    #[tokio::test]
    async fn test_reasoning_not_accumulated() {
        let (tx, rx) = mpsc::channel(10);

        tx.send(StreamEvent::Reasoning("considering agents".to_string()))
            .await
            .unwrap();
        tx.send(StreamEvent::Content("object X".to_string()))
            .await
            .unwrap();
        tx.send(StreamEvent::Reasoning("done".to_string()))
            .await
            .unwrap();
        drop(tx);

        let mut reasoning_seen = 0;
        let result = accumulate_stream(rx, |event| {
            if matches!(event, StreamEvent::Reasoning(_)) {
                reasoning_seen += 1;
            }
        })
        .await
        .unwrap();

        assert_eq!(result, "object X");
        assert_eq!(reasoning_seen, 2);
    }

    #[tokio::test]
    async fn test_failure_discards_partial_output() {
        let (tx, rx) = mpsc::channel(10);

        tx.send(StreamEvent::Content("partial outp".to_string()))
            .await
            .unwrap();
        tx.send(StreamEvent::Failed("connection reset".to_string()))
            .await
            .unwrap();
        drop(tx);

        let result = accumulate_stream(rx, |_| {}).await;
        match result {
            Err(ApiError::Stream(msg)) => assert_eq!(msg, "connection reset"),
            other => panic!("expected stream error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_empty_stream_yields_empty_text() {
        let (tx, rx) = mpsc::channel::<StreamEvent>(1);
        drop(tx);

        let result = accumulate_stream(rx, |_| {}).await.unwrap();
        assert!(result.is_empty());
    }
}
