use domain::summarization::PatientContext;
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Body of the summarize request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummarizeParams {
    pub(crate) transcript: String,
    #[serde(default)]
    pub(crate) patient_context: Option<PatientContext>,
}

/// Body of the review request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReviewParams {
    pub(crate) transcript: String,
    #[schema(value_type = Object)]
    pub(crate) proposed_json: Value,
}

/// Body of the finalise request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FinaliseParams {
    #[schema(value_type = Object)]
    pub(crate) review: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_context_is_optional() {
        let params: SummarizeParams =
            serde_json::from_str(r#"{"transcript": "Doctor: hello"}"#).unwrap();
        assert!(params.patient_context.is_none());
    }

    #[test]
    fn patient_context_fields_are_individually_optional() {
        let params: SummarizeParams = serde_json::from_str(
            r#"{"transcript": "t", "patientContext": {"patientAge": 45}}"#,
        )
        .unwrap();
        let context = params.patient_context.unwrap();
        assert_eq!(context.patient_age, Some(45.0));
        assert!(context.patient_id.is_none());
    }

    #[test]
    fn missing_transcript_is_a_deserialization_error() {
        assert!(serde_json::from_str::<SummarizeParams>("{}").is_err());
        assert!(serde_json::from_str::<ReviewParams>(r#"{"transcript": "t"}"#).is_err());
    }
}
