//! The request form: selection sync, gating, validation, submission.
//!
//! `FormSession` owns every piece of mutable form state for one UI session
//! and is the only thing that writes to it. UI input and timer callbacks
//! arrive as `FormEvent`s on one queue and are applied in order, so no
//! locking is needed anywhere in the form.

pub mod event;
pub mod gate;
pub mod store;
pub mod sync;
pub mod validate;
pub mod voice;

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::Role;
use crate::generation::{GeneratedArtifact, GenerationClient, GenerationError, GenerationRequest};
use crate::notify::{NotificationCenter, NotificationId, NotificationKind, NotificationTiming};

pub use event::{FormEvent, SubmitTrigger};
pub use gate::DestinationAvailability;
pub use store::SelectionStore;
pub use sync::{InputSyncController, SyncOutcome};
pub use validate::ValidationError;

pub const SUBMITTED_MESSAGE: &str = "ETL code generation request submitted successfully!";
pub const GENERATED_MESSAGE: &str = "ETL code generated! Check the output pane for details.";

/// Maximum number of generation records kept.
const GENERATION_HISTORY_CAPACITY: usize = 32;

/// Session knobs that come from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub timing: NotificationTiming,
    pub speech_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    Pending,
    Done(GeneratedArtifact),
    Failed(String),
}

/// One dispatched generation request.
#[derive(Debug, Clone)]
pub struct GenerationRecord {
    pub submission: Uuid,
    pub request: GenerationRequest,
    pub status: GenerationStatus,
}

pub struct FormSession {
    sync: InputSyncController,
    prompt: String,
    notifications: NotificationCenter,
    client: Arc<dyn GenerationClient>,
    events: UnboundedSender<FormEvent>,
    speech_available: bool,
    generations: Vec<GenerationRecord>,
}

impl FormSession {
    /// Start a session: empty dropdowns, destination gated, no notifications.
    ///
    /// Returns the receiving end of the session queue; the owner of the
    /// session must feed every event from it back into `handle`.
    pub fn new(
        client: Arc<dyn GenerationClient>,
        options: SessionOptions,
    ) -> (Self, UnboundedReceiver<FormEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = Self {
            sync: InputSyncController::new(),
            prompt: String::new(),
            notifications: NotificationCenter::new(options.timing, events.clone()),
            client,
            events,
            speech_available: options.speech_available,
            generations: Vec::new(),
        };
        info!("ETL form session initialized");
        (session, rx)
    }

    /// Sender for posting events into this session's queue.
    pub fn sender(&self) -> UnboundedSender<FormEvent> {
        self.events.clone()
    }

    /// Apply one event.
    pub fn handle(&mut self, event: FormEvent) {
        match event {
            FormEvent::DropdownChanged { role, value } => {
                self.select_dropdown(role, &value);
            }
            FormEvent::IconClicked { role, label } => {
                self.click_icon(role, &label);
            }
            FormEvent::PromptEdited(text) => self.set_prompt(text),
            FormEvent::Submit(trigger) => {
                let _ = self.submit(trigger);
            }
            FormEvent::VoiceInput => self.voice_input(),
            FormEvent::CloseNotification(id) => {
                self.close_notification(id);
            }
            FormEvent::NotificationTimer { id, stage } => {
                self.notifications.on_timer(id, stage);
            }
            FormEvent::GenerationFinished { submission, result } => {
                self.generation_finished(submission, result);
            }
        }
    }

    pub fn select_dropdown(&mut self, role: Role, value: &str) -> SyncOutcome {
        self.sync.dropdown_changed(role, value)
    }

    pub fn click_icon(&mut self, role: Role, label: &str) -> SyncOutcome {
        self.sync.icon_clicked(role, label)
    }

    pub fn set_prompt(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    /// Validate and, if valid, dispatch without waiting for the result.
    ///
    /// Every trigger runs the same checks. There is no in-flight guard:
    /// repeated submissions each get their own request and notification.
    pub fn submit(&mut self, trigger: SubmitTrigger) -> Result<Uuid, ValidationError> {
        let request = match validate::validate(&self.prompt, self.sync.store()) {
            Ok(request) => request,
            Err(e) => {
                debug!(?trigger, error = %e, "submission rejected");
                self.notifications.show(e.to_string(), NotificationKind::Warning);
                return Err(e);
            }
        };

        let submission = Uuid::new_v4();
        info!(
            %submission,
            ?trigger,
            source = %request.source,
            destination = %request.destination,
            prompt = %request.prompt,
            "generating ETL code"
        );
        self.notifications.show(SUBMITTED_MESSAGE, NotificationKind::Success);
        self.push_record(GenerationRecord {
            submission,
            request: request.clone(),
            status: GenerationStatus::Pending,
        });

        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.submit(request).await;
            let _ = events.send(FormEvent::GenerationFinished { submission, result });
        });
        Ok(submission)
    }

    /// Parameterless trigger, same as the enter button.
    pub fn submit_global(&mut self) -> Result<Uuid, ValidationError> {
        self.submit(SubmitTrigger::Global)
    }

    pub fn voice_input(&mut self) {
        debug!("voice input requested");
        let (message, kind) = voice::response(self.speech_available);
        self.notifications.show(message, kind);
    }

    pub fn close_notification(&mut self, id: NotificationId) -> bool {
        self.notifications.close(id)
    }

    fn generation_finished(
        &mut self,
        submission: Uuid,
        result: Result<GeneratedArtifact, GenerationError>,
    ) {
        let status = match result {
            Ok(artifact) => {
                info!(%submission, artifact = %artifact.artifact_text, "ETL code generated");
                self.notifications.show(GENERATED_MESSAGE, NotificationKind::Success);
                GenerationStatus::Done(artifact)
            }
            Err(e) => {
                warn!(%submission, error = %e, "ETL code generation failed");
                self.notifications.show(
                    format!("ETL code generation failed: {e}"),
                    NotificationKind::Warning,
                );
                GenerationStatus::Failed(e.to_string())
            }
        };

        match self.generations.iter_mut().find(|r| r.submission == submission) {
            Some(record) => record.status = status,
            None => debug!(%submission, "result for evicted submission"),
        }
        self.trim_history();
    }

    fn push_record(&mut self, record: GenerationRecord) {
        self.generations.push(record);
        self.trim_history();
    }

    /// Drop the oldest finished records past capacity. Pending records are
    /// never evicted, so history may run over while many are in flight.
    fn trim_history(&mut self) {
        while self.generations.len() > GENERATION_HISTORY_CAPACITY {
            let Some(oldest_done) = self
                .generations
                .iter()
                .position(|r| r.status != GenerationStatus::Pending)
            else {
                break;
            };
            self.generations.remove(oldest_done);
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn selections(&self) -> &SelectionStore {
        self.sync.store()
    }

    pub fn inputs(&self) -> &InputSyncController {
        &self.sync
    }

    pub fn availability(&self) -> DestinationAvailability {
        self.sync.availability()
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn generations(&self) -> &[GenerationRecord] {
        &self.generations
    }

    pub fn generation(&self, submission: Uuid) -> Option<&GenerationRecord> {
        self.generations.iter().find(|r| r.submission == submission)
    }

    pub fn pending_generations(&self) -> usize {
        self.generations
            .iter()
            .filter(|r| r.status == GenerationStatus::Pending)
            .count()
    }

    /// Most recent finished artifact.
    pub fn latest_artifact(&self) -> Option<&GeneratedArtifact> {
        self.generations.iter().rev().find_map(|r| match &r.status {
            GenerationStatus::Done(artifact) => Some(artifact),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Identifier;
    use crate::generation::SimulatedClient;
    use crate::notify::Phase;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingClient;

    #[async_trait]
    impl GenerationClient for FailingClient {
        async fn submit(&self, _request: GenerationRequest) -> Result<GeneratedArtifact, GenerationError> {
            Err(GenerationError::Api {
                status: 500,
                message: "boom".into(),
            })
        }
    }

    fn session() -> (FormSession, UnboundedReceiver<FormEvent>) {
        FormSession::new(
            Arc::new(SimulatedClient::new(Duration::from_millis(2000))),
            SessionOptions::default(),
        )
    }

    fn messages(session: &FormSession) -> Vec<(String, NotificationKind)> {
        session
            .notifications()
            .all()
            .iter()
            .map(|n| (n.message.clone(), n.kind))
            .collect()
    }

    /// Feed queued events back until a generation finishes.
    async fn drain_until_generated(session: &mut FormSession, rx: &mut UnboundedReceiver<FormEvent>) {
        while let Some(event) = rx.recv().await {
            let done = matches!(event, FormEvent::GenerationFinished { .. });
            session.handle(event);
            if done {
                return;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn initial_state() {
        let (session, _rx) = session();
        assert_eq!(session.selections().get(Role::Source), None);
        assert_eq!(session.selections().get(Role::Destination), None);
        assert!(!session.availability().enabled);
        assert!(session.notifications().is_empty());
        assert_eq!(session.prompt(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_prompt_warns_from_every_trigger() {
        let (mut session, _rx) = session();
        session.handle(FormEvent::DropdownChanged {
            role: Role::Source,
            value: "database".into(),
        });
        for trigger in [
            SubmitTrigger::PromptEnter,
            SubmitTrigger::SearchIcon,
            SubmitTrigger::EnterButton,
            SubmitTrigger::Global,
        ] {
            assert_eq!(session.submit(trigger), Err(ValidationError::EmptyPrompt));
        }
        let warnings = messages(&session);
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().all(|(m, k)| {
            m == "Please enter a prompt for ETL code generation" && *k == NotificationKind::Warning
        }));
        assert!(session.generations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn successful_submission_round_trip() {
        let (mut session, mut rx) = session();
        session.click_icon(Role::Source, "Database");
        session.select_dropdown(Role::Destination, "aws");
        session.set_prompt("map users table");

        let started = tokio::time::Instant::now();
        let id = session.submit(SubmitTrigger::EnterButton).unwrap();
        assert_eq!(
            messages(&session),
            vec![(SUBMITTED_MESSAGE.to_string(), NotificationKind::Success)]
        );
        assert_eq!(session.pending_generations(), 1);

        drain_until_generated(&mut session, &mut rx).await;
        assert!(started.elapsed() >= Duration::from_millis(2000));

        let record = session.generation(id).unwrap();
        let GenerationStatus::Done(artifact) = &record.status else {
            panic!("expected artifact, got {:?}", record.status);
        };
        assert!(artifact.artifact_text.contains("database"));
        assert!(artifact.artifact_text.contains("aws"));
        assert!(artifact.artifact_text.contains("map users table"));
        assert_eq!(session.latest_artifact(), Some(artifact));
        assert!(messages(&session).contains(&(GENERATED_MESSAGE.to_string(), NotificationKind::Success)));
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_submissions_are_independent() {
        let (mut session, mut rx) = session();
        session.select_dropdown(Role::Source, "file");
        session.select_dropdown(Role::Destination, "gcp");
        session.set_prompt("load csv");

        let a = session.submit(SubmitTrigger::PromptEnter).unwrap();
        let b = session.submit(SubmitTrigger::SearchIcon).unwrap();
        assert_ne!(a, b);
        assert_eq!(session.pending_generations(), 2);

        drain_until_generated(&mut session, &mut rx).await;
        drain_until_generated(&mut session, &mut rx).await;
        assert_eq!(session.pending_generations(), 0);
        let successes = messages(&session)
            .into_iter()
            .filter(|(m, _)| m == GENERATED_MESSAGE)
            .count();
        assert_eq!(successes, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn history_never_evicts_pending_submissions() {
        let (mut session, mut rx) = session();
        session.select_dropdown(Role::Source, "database");
        session.select_dropdown(Role::Destination, "aws");
        session.set_prompt("bulk");

        let total = GENERATION_HISTORY_CAPACITY + 3;
        let first = session.submit_global().unwrap();
        for _ in 1..total {
            session.submit_global().unwrap();
        }
        assert_eq!(session.generations().len(), total);
        assert_eq!(session.pending_generations(), total);
        assert!(session.generation(first).is_some());

        for _ in 0..total {
            drain_until_generated(&mut session, &mut rx).await;
        }
        assert_eq!(session.pending_generations(), 0);
        assert_eq!(session.generations().len(), GENERATION_HISTORY_CAPACITY);
        assert!(session.latest_artifact().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn generation_failure_is_a_warning() {
        let (mut session, mut rx) = FormSession::new(Arc::new(FailingClient), SessionOptions::default());
        session.select_dropdown(Role::Source, "api");
        session.select_dropdown(Role::Destination, "azure");
        session.set_prompt("sync orders");
        let id = session.submit(SubmitTrigger::Global).unwrap();

        drain_until_generated(&mut session, &mut rx).await;
        assert!(matches!(session.generation(id).unwrap().status, GenerationStatus::Failed(_)));
        let last = session.notifications().all().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Warning);
        assert!(last.message.starts_with("ETL code generation failed:"));

        // Session still usable.
        assert!(session.submit(SubmitTrigger::Global).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn voice_input_reports_capability() {
        let (mut session, _rx) = session();
        session.handle(FormEvent::VoiceInput);
        assert_eq!(
            messages(&session),
            vec![(voice::UNSUPPORTED.to_string(), NotificationKind::Warning)]
        );

        let (mut session, _rx) = FormSession::new(
            Arc::new(SimulatedClient::default()),
            SessionOptions {
                speech_available: true,
                ..SessionOptions::default()
            },
        );
        session.voice_input();
        assert_eq!(
            messages(&session),
            vec![(voice::COMING_SOON.to_string(), NotificationKind::Info)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn close_event_routes_to_notifications() {
        let (mut session, _rx) = session();
        session.voice_input();
        let id = session.notifications().newest_visible().unwrap();
        session.handle(FormEvent::CloseNotification(id));
        assert_eq!(session.notifications().get(id).unwrap().phase, Phase::Dismissing);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_icon_changes_nothing() {
        let (mut session, _rx) = session();
        session.handle(FormEvent::IconClicked {
            role: Role::Source,
            label: "Mainframe".into(),
        });
        assert_eq!(session.selections(), &SelectionStore::new());
        assert!(session.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn selections_feed_the_request() {
        let (mut session, _rx) = session();
        session.handle(FormEvent::IconClicked {
            role: Role::Source,
            label: "file".into(),
        });
        session.handle(FormEvent::IconClicked {
            role: Role::Destination,
            label: "Google Cloud".into(),
        });
        session.handle(FormEvent::PromptEdited("dedupe rows".into()));
        let id = session.submit_global().unwrap();
        let req = &session.generation(id).unwrap().request;
        assert_eq!(req.source, Identifier::File);
        assert_eq!(req.destination, Identifier::Gcp);
        assert_eq!(req.prompt, "dedupe rows");
    }
}
