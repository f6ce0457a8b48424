//! The ordered revue check sequence.
//!
//! Steps run strictly in [`Step::ALL`] order because later steps depend on
//! the side effects of earlier ones: the listing step records the id of the
//! last revue in the [`ScenarioContext`], and the edit and delete steps act
//! on that id. A failing step does not stop the run; its failure is recorded
//! in the [`ScenarioReport`] and the next step runs with the same session
//! and context.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, Client, RawResponse, RevueDto};
use crate::listing::{self, ListingError};
use crate::session::Session;

pub const MSG_CREATED: &str = "Successfully created!";
pub const MSG_EDITED: &str = "Edited successfully";
pub const MSG_DELETED: &str = "The revue is deleted!";
pub const MSG_NO_SUCH_REVUE: &str = "There is no such revue!";

/// Id used by the negative-path steps; never issued by the service.
pub const NON_EXISTING_ID: &str = "non-existing-id";

pub fn create_payload() -> RevueDto {
    RevueDto::new("My First Test Revue", "", "Testing create revue")
}

pub fn edit_payload() -> RevueDto {
    RevueDto::new("Edited Revue", "", "Edited description")
}

pub fn fake_payload() -> RevueDto {
    RevueDto::new("Fake", "", "Fake revue")
}

/// A single check in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Create a revue; expect 200 and [`MSG_CREATED`].
    Create,
    /// List revues and record the id of the last one, which must carry the
    /// title created by [`Step::Create`].
    List,
    /// Edit the recorded revue; expect 200 and [`MSG_EDITED`].
    Edit,
    /// Delete the recorded revue; expect 200 and [`MSG_DELETED`].
    Delete,
    /// Delete the recorded revue a second time; expect 400 and [`MSG_NO_SUCH_REVUE`].
    DeleteDeleted,
    /// Create a revue with every field empty; expect 400.
    CreateInvalid,
    /// Edit [`NON_EXISTING_ID`]; expect 400 and [`MSG_NO_SUCH_REVUE`].
    EditNonExisting,
    /// Delete [`NON_EXISTING_ID`]; expect 400 and [`MSG_NO_SUCH_REVUE`].
    DeleteNonExisting,
}

impl Step {
    /// Execution order.
    pub const ALL: [Step; 8] = [
        Step::Create,
        Step::List,
        Step::Edit,
        Step::Delete,
        Step::DeleteDeleted,
        Step::CreateInvalid,
        Step::EditNonExisting,
        Step::DeleteNonExisting,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Step::Create => "create",
            Step::List => "list",
            Step::Edit => "edit",
            Step::Delete => "delete",
            Step::DeleteDeleted => "delete-deleted",
            Step::CreateInvalid => "create-invalid",
            Step::EditNonExisting => "edit-non-existing",
            Step::DeleteNonExisting => "delete-non-existing",
        }
    }

    /// Whether the step acts on the id recorded by [`Step::List`].
    pub fn requires_revue_id(&self) -> bool {
        matches!(self, Step::Edit | Step::Delete | Step::DeleteDeleted)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a step failed.
#[derive(Debug, Error)]
pub enum StepFailure {
    #[error("expected status {expected}, got {actual}: {body}")]
    UnexpectedStatus {
        expected: StatusCode,
        actual: StatusCode,
        body: String,
    },

    #[error("expected message {expected:?}, got {actual:?}: {body}")]
    UnexpectedMessage {
        expected: &'static str,
        actual: Option<String>,
        body: String,
    },

    #[error("last listed revue {id} has title {actual:?}, expected {expected:?}")]
    ForeignRevue {
        id: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("last revue id is empty; did the listing step fail?")]
    MissingRevueId,

    #[error("{0}")]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// State shared between steps of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioContext {
    last_revue_id: Option<String>,
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_revue_id(&self) -> Option<&str> {
        self.last_revue_id.as_deref()
    }

    pub fn set_last_revue_id(&mut self, id: impl Into<String>) {
        self.last_revue_id = Some(id.into());
    }

    /// The recorded id, or [`StepFailure::MissingRevueId`] if none is set.
    fn require_revue_id(&self) -> Result<&str, StepFailure> {
        self.last_revue_id()
            .filter(|id| !id.trim().is_empty())
            .ok_or(StepFailure::MissingRevueId)
    }
}

/// Outcome of a single step.
#[derive(Debug)]
pub struct StepReport {
    pub step: Step,
    pub outcome: Result<(), StepFailure>,
}

impl StepReport {
    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Outcomes of a full run, in execution order.
#[derive(Debug, Default)]
pub struct ScenarioReport {
    steps: Vec<StepReport>,
}

impl ScenarioReport {
    pub fn steps(&self) -> &[StepReport] {
        &self.steps
    }

    pub fn get(&self, step: Step) -> Option<&StepReport> {
        self.steps.iter().find(|report| report.step == step)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepReport> {
        self.steps.iter().filter(|report| !report.passed())
    }

    pub fn is_success(&self) -> bool {
        self.steps.iter().all(StepReport::passed)
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in &self.steps {
            match &report.outcome {
                Ok(()) => writeln!(f, "  ok    {}", report.step)?,
                Err(err) => writeln!(f, "  FAIL  {}: {}", report.step, err)?,
            }
        }
        Ok(())
    }
}

/// Runs steps against an authenticated client.
pub struct Scenario<'a> {
    client: &'a Client,
    context: ScenarioContext,
}

impl<'a> Scenario<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self::with_client(session.client())
    }

    pub fn with_client(client: &'a Client) -> Self {
        Self {
            client,
            context: ScenarioContext::new(),
        }
    }

    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    /// Runs every step in [`Step::ALL`] order.
    pub async fn run(&mut self) -> ScenarioReport {
        let mut report = ScenarioReport::default();

        for step in Step::ALL {
            let outcome = self.run_step(step).await;
            match &outcome {
                Ok(()) => info!(step = %step, "step passed"),
                Err(err) => warn!(step = %step, error = %err, "step failed"),
            }
            report.steps.push(StepReport { step, outcome });
        }

        report
    }

    /// Runs a single step.
    pub async fn run_step(&mut self, step: Step) -> Result<(), StepFailure> {
        match step {
            Step::Create => self.create().await,
            Step::List => self.list().await,
            Step::Edit => self.edit().await,
            Step::Delete => self.delete().await,
            Step::DeleteDeleted => self.delete_deleted().await,
            Step::CreateInvalid => self.create_invalid().await,
            Step::EditNonExisting => self.edit_non_existing().await,
            Step::DeleteNonExisting => self.delete_non_existing().await,
        }
    }

    async fn create(&self) -> Result<(), StepFailure> {
        let response = self.client.create_revue(&create_payload()).await?;
        expect_status(&response, StatusCode::OK)?;
        expect_message(&response, MSG_CREATED)
    }

    async fn list(&mut self) -> Result<(), StepFailure> {
        let response = self.client.list_revues().await?;
        expect_status(&response, StatusCode::OK)?;

        let root: Value = response.json()?;
        let id = listing::last_revue_id(&root)?;

        // Only a revue carrying the create fixture's title may be edited or deleted.
        let expected = create_payload().title;
        let actual = listing::revue_title(listing::last_revue(&root)?).map(str::to_string);
        if actual.as_deref() != Some(expected.as_str()) {
            return Err(StepFailure::ForeignRevue {
                id,
                expected,
                actual,
            });
        }

        self.context.set_last_revue_id(id);
        Ok(())
    }

    async fn edit(&self) -> Result<(), StepFailure> {
        let id = self.context.require_revue_id()?;
        let response = self.client.edit_revue(id, &edit_payload()).await?;
        expect_status(&response, StatusCode::OK)?;
        expect_message(&response, MSG_EDITED)
    }

    async fn delete(&self) -> Result<(), StepFailure> {
        let id = self.context.require_revue_id()?;
        let response = self.client.delete_revue(id).await?;
        expect_status(&response, StatusCode::OK)?;
        expect_message(&response, MSG_DELETED)
    }

    async fn delete_deleted(&self) -> Result<(), StepFailure> {
        let id = self.context.require_revue_id()?;
        let response = self.client.delete_revue(id).await?;
        expect_status(&response, StatusCode::BAD_REQUEST)?;
        expect_message(&response, MSG_NO_SUCH_REVUE)
    }

    async fn create_invalid(&self) -> Result<(), StepFailure> {
        let response = self.client.create_revue(&RevueDto::default()).await?;
        expect_status(&response, StatusCode::BAD_REQUEST)
    }

    async fn edit_non_existing(&self) -> Result<(), StepFailure> {
        let response = self
            .client
            .edit_revue(NON_EXISTING_ID, &fake_payload())
            .await?;
        expect_status(&response, StatusCode::BAD_REQUEST)?;
        expect_message(&response, MSG_NO_SUCH_REVUE)
    }

    async fn delete_non_existing(&self) -> Result<(), StepFailure> {
        let response = self.client.delete_revue(NON_EXISTING_ID).await?;
        expect_status(&response, StatusCode::BAD_REQUEST)?;
        expect_message(&response, MSG_NO_SUCH_REVUE)
    }
}

fn expect_status(response: &RawResponse, expected: StatusCode) -> Result<(), StepFailure> {
    if response.status == expected {
        Ok(())
    } else {
        Err(StepFailure::UnexpectedStatus {
            expected,
            actual: response.status,
            body: response.body.clone(),
        })
    }
}

fn expect_message(response: &RawResponse, expected: &'static str) -> Result<(), StepFailure> {
    let actual = response.message();
    if actual.as_deref() == Some(expected) {
        Ok(())
    } else {
        Err(StepFailure::UnexpectedMessage {
            expected,
            actual,
            body: response.body.clone(),
        })
    }
}
