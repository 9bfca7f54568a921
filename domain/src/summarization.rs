//! Generative stages: summarize a transcript into a structured note,
//! critique the note, and fold the critique into final fields.
//!
//! Each stage is one model invocation: load its instruction document, build
//! the user turn, call the model, extract JSON from the reply. The
//! extracted JSON is validated against the expected shape before it is
//! returned; a reply that parses but has the wrong shape is its own error,
//! distinct from an unparseable reply.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::extraction::extract_json;
use crate::gateway::vertex::VertexClient;
use crate::prompts::{self, FINALISER_PROMPT, REVIEWER_PROMPT, SUMMARIZATION_PROMPT};
use crate::summary::Summary;
use log::*;
use scribe_ai::traits::generative::Provider;
use scribe_ai::types::generation::GenerationRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::config::Config;
use utoipa::ToSchema;

/// Note sections the summarizer must produce.
pub const REQUIRED_NOTE_SECTIONS: &[&str] = &[
    "chiefComplaint",
    "historyPresent",
    "physicalExam",
    "assessment",
    "plan",
];

/// Optional chart context embedded in the summarizer's user turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientContext {
    pub patient_id: Option<String>,
    pub patient_age: Option<f64>,
    pub patient_condition: Option<String>,
}

/// Summarize a transcript into a structured clinical note.
pub async fn summarize(
    config: &Config,
    transcript: &str,
    patient_context: Option<PatientContext>,
) -> Result<Summary, Error> {
    if transcript.is_empty() {
        return Err(Error::validation("transcript required"));
    }

    let system_prompt = prompts::load_prompt(config, SUMMARIZATION_PROMPT).await?;
    let user_turn = summarize_user_turn(transcript, patient_context.as_ref());

    let client = VertexClient::from_config(config)?;
    let response = client
        .generate(GenerationRequest::with_system(system_prompt, user_turn))
        .await?;

    let structured = extract_json(&response.text)?;
    validate_note_sections(&structured)?;

    info!("Summarized transcript into structured note ({} chars)", response.text.len());
    Ok(Summary::from_model_output(
        structured,
        response.text,
        response.model,
    ))
}

/// Critique a proposed note against its transcript.
pub async fn review(
    config: &Config,
    transcript: &str,
    proposed_json: &Value,
) -> Result<Value, Error> {
    if transcript.is_empty() {
        return Err(Error::validation("transcript required"));
    }

    let system_prompt = prompts::load_prompt(config, REVIEWER_PROMPT).await?;
    let user_turn = review_user_turn(transcript, proposed_json)?;

    let client = VertexClient::from_config(config)?;
    let response = client
        .generate(GenerationRequest::with_system(system_prompt, user_turn))
        .await?;

    let review = extract_json(&response.text)?;
    require_object(&review)?;
    Ok(review)
}

/// Fold reviewer feedback into the final note fields. The returned object
/// is merged flat into the response body by the web layer.
pub async fn finalise(config: &Config, review: &Value) -> Result<Value, Error> {
    let system_prompt = prompts::load_prompt(config, FINALISER_PROMPT).await?;
    let user_turn = finalise_user_turn(review)?;

    let client = VertexClient::from_config(config)?;
    let response = client
        .generate(GenerationRequest::with_system(system_prompt, user_turn))
        .await?;

    let final_fields = extract_json(&response.text)?;
    require_object(&final_fields)?;
    Ok(final_fields)
}

fn summarize_user_turn(transcript: &str, context: Option<&PatientContext>) -> String {
    let patient_id = context
        .and_then(|c| c.patient_id.as_deref())
        .unwrap_or("");
    let patient_age = context
        .and_then(|c| c.patient_age)
        .map(|age| age.to_string())
        .unwrap_or_default();
    let patient_condition = context
        .and_then(|c| c.patient_condition.as_deref())
        .unwrap_or("");

    format!(
        "Context (optional):\n- Patient ID: {patient_id}\n- Patient age: {patient_age}\n- Condition from chart (if any): {patient_condition}\n\nTranscript:\n\"\"\"\n{transcript}\n\"\"\""
    )
}

fn review_user_turn(transcript: &str, proposed_json: &Value) -> Result<String, Error> {
    let pretty = to_pretty_json(proposed_json)?;
    Ok(format!(
        "Transcript:\n\"\"\"\n{transcript}\n\"\"\"\n\nProposed JSON from the summarizer:\n\n```json\n{pretty}\n```"
    ))
}

fn finalise_user_turn(review: &Value) -> Result<String, Error> {
    let pretty = to_pretty_json(review)?;
    Ok(format!(
        "Reviewer output JSON:\n\n```json\n{pretty}\n```\n\nProduce the final fields."
    ))
}

fn to_pretty_json(value: &Value) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(|err| Error {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::Internal(crate::error::InternalErrorKind::Other(
            "Failed to serialize JSON for prompt embedding".to_string(),
        )),
    })
}

/// The summarizer's output must be an object carrying every required note
/// section as a string. Anything else is an unexpected-shape error, not a
/// parse error: the model produced JSON, just not the JSON we asked for.
fn validate_note_sections(value: &Value) -> Result<(), Error> {
    let Some(object) = value.as_object() else {
        return Err(unexpected_shape("Model output is not a JSON object"));
    };
    for section in REQUIRED_NOTE_SECTIONS {
        match object.get(*section) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(unexpected_shape(format!(
                    "Model output section `{section}` is not a string"
                )));
            }
            None => {
                return Err(unexpected_shape(format!(
                    "Model output missing required note section `{section}`"
                )));
            }
        }
    }
    Ok(())
}

fn require_object(value: &Value) -> Result<(), Error> {
    if value.is_object() {
        Ok(())
    } else {
        Err(unexpected_shape("Model output is not a JSON object"))
    }
}

fn unexpected_shape(msg: impl Into<String>) -> Error {
    let msg = msg.into();
    warn!("Unexpected model output shape: {msg}");
    Error {
        source: None,
        error_kind: DomainErrorKind::External(ExternalErrorKind::UnexpectedShape(msg)),
    }
}
