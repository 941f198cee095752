use crate::{
    config::Config,
    core::{
        candidates::select_candidates,
        extraction::preferences_from_model_text,
        intent::FollowUpMode,
        prompts::{
            recommend_system_prompt, recommend_user_message, stream_system_prompt,
            EXTRACTION_SYSTEM_PROMPT,
        },
        render::{render_markdown, stream_prelude, RenderContext},
        repair::{degraded_markdown, reconcile_with_facts, recommendation_from_model_text},
    },
    error::Result,
    services::{
        model::{LanguageModel, ModelRequest},
        openai_client::OpenAIClient,
    },
    tools::{FactEngine, OpenMeteoSource},
    types::{
        latest_user_message, ChatMessage, ExtractRequest, ExtractResponse, FactSheetEntry,
        RecommendRequest, RecommendResponse, Recommendation, Role, Tone,
    },
};
use futures::{stream::BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Markdown fragments for the streaming recommendation endpoint.
///
/// Ends when the model finishes or fails; dropping it cancels the upstream request.
pub type MarkdownStream = BoxStream<'static, String>;

/// Appended when the model stream breaks after output has started.
pub const STREAM_ERROR_NOTICE: &str = "\n\n(Streaming ended with an error, please retry)";

const EXTRACTION_TEMPERATURE: f32 = 0.2;
const RECOMMEND_TEMPERATURE: f32 = 0.4;

/// Preference extraction and fact-grounded recommendations.
///
/// Holds no per-request state; the fact engine's caches are the only thing
/// shared between calls.
#[derive(Debug, Clone)]
pub struct TravelAssistant {
    model: Arc<dyn LanguageModel>,
    facts: FactEngine,
    default_tone: Tone,
}

/// Everything computed before the model is invoked.
struct PreparedTurn {
    mode: FollowUpMode,
    tone: Tone,
    facts: Vec<FactSheetEntry>,
    history: Vec<ChatMessage>,
    user_message: String,
}

impl TravelAssistant {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            facts: FactEngine::new(),
            default_tone: Tone::default(),
        }
    }

    pub fn with_fact_engine(mut self, facts: FactEngine) -> Self {
        self.facts = facts;
        self
    }

    /// Tone used when a request does not name one.
    pub fn with_default_tone(mut self, tone: Tone) -> Self {
        self.default_tone = tone;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let client = OpenAIClient::new(config.api_key.clone())
            .with_base_url(config.base_url.clone())
            .with_model(config.model.clone())
            .with_timeout(config.timeout);

        let mut facts = FactEngine::new();
        if let Some(base) = &config.weather_api_base {
            facts = facts.with_weather_source(Arc::new(
                OpenMeteoSource::new(base.clone()).with_timeout(config.timeout),
            ));
        }

        Self::new(Arc::new(client))
            .with_fact_engine(facts)
            .with_default_tone(config.tone)
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(&Config::from_env()?))
    }

    pub fn facts(&self) -> &FactEngine {
        &self.facts
    }

    fn tone_for(&self, requested: Option<&str>) -> Tone {
        match requested.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => Tone::resolve(Some(raw)),
            None => self.default_tone,
        }
    }

    /// Structured preferences from one user message.
    ///
    /// Unreadable model output and shape mismatches are both request failures,
    /// told apart by their error codes.
    pub async fn extract(&self, request: ExtractRequest) -> Result<ExtractResponse> {
        let model_request = ModelRequest::new(EXTRACTION_SYSTEM_PROMPT)
            .with_messages(conversation(&request.history))
            .with_message(ChatMessage::user(request.text))
            .json()
            .with_temperature(EXTRACTION_TEMPERATURE);

        let text = self.model.complete(model_request).await?;
        debug!(target: "voyage::extract", raw = %text, "extraction output");

        let preferences = preferences_from_model_text(&text).map_err(|err| {
            warn!(target: "voyage::extract", code = err.error_code(), error = %err, "extraction failed");
            err
        })?;
        Ok(ExtractResponse { preferences })
    }

    async fn prepare(&self, request: &RecommendRequest) -> Result<PreparedTurn> {
        let preferences = &request.preferences;
        let mode = FollowUpMode::classify(latest_user_message(&request.history));
        let tone = self.tone_for(request.tone.as_deref());

        let candidates = select_candidates(preferences);
        let facts = self.facts.fact_sheet(&candidates, preferences).await;
        let user_message = recommend_user_message(preferences, &facts, mode)?;
        info!(
            target: "voyage::recommend",
            mode = %mode,
            tone = %tone,
            candidates = facts.len(),
            "prepared recommendation turn"
        );

        Ok(PreparedTurn {
            mode,
            tone,
            facts,
            history: conversation(&request.history),
            user_message,
        })
    }

    /// JSON recommendations plus a markdown view for the classified mode.
    ///
    /// Model transport failures are returned as errors. Output that cannot be
    /// read or fails the mode's shape degrades to an explanatory markdown block
    /// with an empty recommendation.
    pub async fn recommend(&self, request: RecommendRequest) -> Result<RecommendResponse> {
        let turn = self.prepare(&request).await?;
        let model_request = ModelRequest::new(recommend_system_prompt(turn.mode, turn.tone))
            .with_messages(turn.history)
            .with_message(ChatMessage::user(turn.user_message))
            .json()
            .with_temperature(RECOMMEND_TEMPERATURE);

        let text = self.model.complete(model_request).await?;

        let (json, markdown) = match recommendation_from_model_text(&text, turn.mode) {
            Ok(mut recommendation) => {
                reconcile_with_facts(&mut recommendation, &turn.facts);
                let ctx = RenderContext {
                    mode: turn.mode,
                    tone: turn.tone,
                    preferences: &request.preferences,
                    facts: &turn.facts,
                    latest_user_message: latest_user_message(&request.history),
                };
                let markdown = render_markdown(&recommendation, &ctx);
                (recommendation, markdown)
            }
            Err(err) => {
                warn!(target: "voyage::recommend", code = err.error_code(), error = %err, "model output unusable, returning degraded response");
                (Recommendation::default(), degraded_markdown(&err))
            }
        };

        Ok(RecommendResponse {
            json,
            markdown,
            mode: turn.mode,
        })
    }

    /// Markdown streamed from the model as tokens arrive.
    ///
    /// Failing to start the model stream is an error. Once started, a broken
    /// stream ends with [`STREAM_ERROR_NOTICE`] and closes.
    pub async fn recommend_stream(&self, request: RecommendRequest) -> Result<MarkdownStream> {
        let turn = self.prepare(&request).await?;
        let prelude = if turn.mode.is_follow_up() {
            String::new()
        } else {
            stream_prelude(&request.preferences, turn.tone, turn.facts.first())
        };

        let model_request = ModelRequest::new(stream_system_prompt(turn.mode, turn.tone))
            .with_messages(turn.history)
            .with_message(ChatMessage::user(turn.user_message))
            .with_temperature(RECOMMEND_TEMPERATURE);
        let mut tokens = self.model.stream(model_request).await?;

        let markdown = async_stream::stream! {
            if !prelude.is_empty() {
                yield prelude;
            }
            while let Some(token) = tokens.next().await {
                match token {
                    Ok(delta) => yield delta,
                    Err(err) => {
                        warn!(target: "voyage::recommend", error = %err, "model stream failed mid-response");
                        yield STREAM_ERROR_NOTICE.to_string();
                        break;
                    }
                }
            }
        };
        Ok(markdown.boxed())
    }
}

/// User and assistant turns only; the pipeline supplies its own system prompt.
fn conversation(history: &[ChatMessage]) -> Vec<ChatMessage> {
    history
        .iter()
        .filter(|message| message.role != Role::System)
        .cloned()
        .collect()
}
