//! Headless mode: drive one form session without a terminal UI.
//!
//! Applies the same events the TUI would (dropdown changes, prompt edit,
//! enter button) and pumps the session queue until the request settles.

use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::info;

use crate::catalog::{self, Role};
use crate::config::AppConfig;
use crate::form::sync::IgnoreReason;
use crate::form::{
    FormEvent, FormSession, GenerationStatus, SessionOptions, SubmitTrigger, SyncOutcome,
};
use crate::generation::{GeneratedArtifact, GenerationClient};
use crate::notify::{NotificationId, NotificationKind};

/// What a headless run produced.
#[derive(Debug, Clone)]
pub struct HeadlessOutcome {
    /// Every notification shown during the run, in order.
    pub notifications: Vec<(NotificationKind, String)>,
    pub artifact: GeneratedArtifact,
}

/// A run that got as far as showing notifications and then failed.
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct HeadlessFailure {
    pub reason: String,
    /// Every notification shown before the failure, in order.
    pub notifications: Vec<(NotificationKind, String)>,
}

/// Collects notifications as they appear.
#[derive(Default)]
struct Transcript {
    seen: Option<NotificationId>,
    lines: Vec<(NotificationKind, String)>,
}

impl Transcript {
    fn capture(&mut self, session: &FormSession) {
        for n in session.notifications().all() {
            if self.seen.is_some_and(|seen| n.id <= seen) {
                continue;
            }
            self.seen = Some(n.id);
            self.lines.push((n.kind, n.message.clone()));
        }
    }
}

/// Unknown keys are rejected here. A gated destination is left for
/// validation to report.
fn select(session: &mut FormSession, role: Role, key: &str) -> anyhow::Result<()> {
    if let SyncOutcome::Ignored(IgnoreReason::UnknownKey) = session.select_dropdown(role, key) {
        let valid: Vec<&str> = catalog::identifiers(role).iter().map(|id| id.key()).collect();
        bail!(
            "unknown {} '{key}'; expected one of: {}",
            role.name(),
            valid.join(", ")
        );
    }
    Ok(())
}

/// Run one generation request end to end with the configured backend.
pub async fn generate(
    config: &AppConfig,
    source: &str,
    destination: &str,
    prompt: &str,
) -> anyhow::Result<HeadlessOutcome> {
    let client = config.build_client()?;
    run(client, config.session_options(), source, destination, prompt).await
}

/// Same as `generate`, with an explicit backend.
pub async fn run(
    client: Arc<dyn GenerationClient>,
    options: SessionOptions,
    source: &str,
    destination: &str,
    prompt: &str,
) -> anyhow::Result<HeadlessOutcome> {
    let (mut session, mut rx) = FormSession::new(client, options);
    let mut transcript = Transcript::default();

    select(&mut session, Role::Source, source)?;
    select(&mut session, Role::Destination, destination)?;
    session.handle(FormEvent::PromptEdited(prompt.to_string()));

    let submitted = session.submit(SubmitTrigger::EnterButton);
    transcript.capture(&session);
    let submission = match submitted {
        Ok(submission) => submission,
        Err(e) => {
            return Err(HeadlessFailure {
                reason: e.to_string(),
                notifications: transcript.lines,
            }
            .into())
        }
    };
    info!(%submission, "waiting for generation");

    loop {
        let status = session
            .generation(submission)
            .map(|r| r.status.clone())
            .context("submission record missing")?;
        match status {
            GenerationStatus::Pending => {}
            GenerationStatus::Done(artifact) => {
                return Ok(HeadlessOutcome {
                    notifications: transcript.lines,
                    artifact,
                });
            }
            GenerationStatus::Failed(e) => {
                return Err(HeadlessFailure {
                    reason: format!("ETL code generation failed: {e}"),
                    notifications: transcript.lines,
                }
                .into())
            }
        }

        let event = rx.recv().await.context("session queue closed")?;
        session.handle(event);
        transcript.capture(&session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.generation.latency_ms = 10;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn generates_with_valid_inputs() {
        let outcome = generate(&fast_config(), "database", "aws", "copy users")
            .await
            .unwrap();
        assert!(outcome.artifact.artifact_text.contains("copy users"));
        let messages: Vec<&str> = outcome.notifications.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                crate::form::SUBMITTED_MESSAGE,
                crate::form::GENERATED_MESSAGE
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_key_lists_valid_ones() {
        let err = generate(&fast_config(), "mainframe", "aws", "x")
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("database, file, api"), "{text}");
    }

    #[tokio::test(start_paused = true)]
    async fn destination_key_checked_against_its_role() {
        let err = generate(&fast_config(), "file", "database", "x")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("aws, azure, gcp"));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_source_reports_missing_source() {
        let err = generate(&fast_config(), "", "aws", "map users table")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select a data source first");
        let failure = err.downcast_ref::<HeadlessFailure>().unwrap();
        assert_eq!(
            failure.notifications,
            vec![(
                NotificationKind::Warning,
                "Please select a data source first".to_string()
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn blank_prompt_is_a_validation_error() {
        let err = generate(&fast_config(), "api", "gcp", "   ")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please enter a prompt for ETL code generation");
    }
}
