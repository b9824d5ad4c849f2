//! Semantic labeling service clients
//!
//! Two modes: a synchronous chat-style call that returns one JSON object for
//! a prompt (topic naming, URL classification), and an asynchronous
//! extraction job that is submitted and then polled until it completes.

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

/// Chat-style labeling client returning structured JSON
pub struct Labeler {
    client: Client<OpenAIConfig>,
}

impl Labeler {
    /// Create a labeler with the given API key
    pub fn new(api_key: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
        }
    }

    /// Send one prompt and parse the response content as a JSON object
    pub async fn complete_json(&self, model: &str, prompt: &str) -> Result<Value> {
        debug!("Labeling request: model={}, {} chars", model, prompt.len());

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .response_format(ResponseFormat::JsonObject)
            .temperature(0.3)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| {
                AnalysisError::LabelingError("no content in labeling response".to_string())
            })?;

        let value: Value = serde_json::from_str(&content).map_err(|e| {
            AnalysisError::ParseError(format!("labeling response is not valid JSON: {e}"))
        })?;

        Ok(value)
    }
}

/// Client for the asynchronous extraction job endpoint
///
/// The submit/poll pair is the one labeling path whose faults are not
/// swallowed: the returned topic set drives the entire site-wide
/// classification and there is no fallback.
pub struct ExtractJobClient {
    client: HttpClient,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_attempts: u32,
}

impl ExtractJobClient {
    /// Create a client from analysis config
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let client = HttpClient::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key: config.map_api_key.clone(),
            base_url: config.extract_base_url.clone(),
            poll_interval: config.poll_interval,
            max_attempts: config.max_poll_attempts,
        })
    }

    /// Submit an extraction job and return its id
    pub async fn submit(&self, url: &str, schema: Value, prompt: &str) -> Result<String> {
        info!("Submitting extract job for: {}", url);

        let response = self
            .client
            .post(format!("{}/extract", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "urls": [url],
                "schema": schema,
                "prompt": prompt,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::LabelingError(format!(
                "extract submit returned {status}: {body}"
            )));
        }

        let job: Value = response.json().await?;
        if job["success"].as_bool() != Some(true) {
            return Err(AnalysisError::LabelingError(
                "failed to submit extract job".to_string(),
            ));
        }

        job["id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| AnalysisError::LabelingError("extract job has no id".to_string()))
    }

    /// Poll a job until it completes and return its data payload
    ///
    /// Fixed-interval loop bounded by the configured attempt budget. A
    /// `failed`/`cancelled` status and an exhausted budget are reported as
    /// distinct errors.
    pub async fn poll(&self, job_id: &str) -> Result<Value> {
        info!("Polling extract job {}", job_id);

        for attempt in 1..=self.max_attempts {
            sleep(self.poll_interval).await;

            let response = self
                .client
                .get(format!("{}/extract/{}", self.base_url, job_id))
                .bearer_auth(&self.api_key)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(AnalysisError::LabelingError(format!(
                    "extract status check returned {status}: {body}"
                )));
            }

            let data: Value = response.json().await?;
            let job_status = data["status"].as_str().unwrap_or("unknown");
            debug!("Job {} status (attempt {}): {}", job_id, attempt, job_status);

            match job_status {
                "completed" => {
                    info!("Extract job {} completed", job_id);
                    return Ok(data["data"].clone());
                }
                "failed" | "cancelled" => {
                    let message = data["error"].as_str().unwrap_or("Unknown error").to_string();
                    return Err(AnalysisError::ExtractJobFailed {
                        status: job_status.to_string(),
                        message,
                    });
                }
                _ => {}
            }
        }

        Err(AnalysisError::ExtractJobTimeout(self.max_attempts))
    }

    /// Submit a job and wait for its result
    pub async fn extract(&self, url: &str, schema: Value, prompt: &str) -> Result<Value> {
        let job_id = self.submit(url, schema, prompt).await?;
        self.poll(&job_id).await
    }
}
