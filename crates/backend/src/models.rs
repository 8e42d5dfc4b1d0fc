//! Records returned by the backend collections.
//!
//! Field names follow the backend's snake_case JSON. Optional columns
//! default when absent so a sparse record still decodes.

use bizdash_core::calendar::{AgendaEntry, EmployeeDates, VacationSpan};
use bizdash_core::gantt::{TaskDates, TaskPriority, TaskStatus};
use bizdash_core::types::{Date, RecordId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};

/// Accept ids sent either as strings or as integers.
fn record_id<'de, D>(deserializer: D) -> Result<RecordId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn optional_record_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "record_id")] RecordId);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

// ---------------------------------------------------------------------------
// Commercial
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "optional_record_id")]
    pub company_id: Option<RecordId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub name: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Timestamp,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl OpportunityStage {
    /// Pipeline columns in display order.
    pub const ALL: [OpportunityStage; 6] = [
        OpportunityStage::Lead,
        OpportunityStage::Qualified,
        OpportunityStage::Proposal,
        OpportunityStage::Negotiation,
        OpportunityStage::Won,
        OpportunityStage::Lost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OpportunityStage::Lead => "lead",
            OpportunityStage::Qualified => "qualified",
            OpportunityStage::Proposal => "proposal",
            OpportunityStage::Negotiation => "negotiation",
            OpportunityStage::Won => "won",
            OpportunityStage::Lost => "lost",
        }
    }

    pub fn is_open(self) -> bool {
        !matches!(self, OpportunityStage::Won | OpportunityStage::Lost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub client_name: Option<String>,
    pub stage: OpportunityStage,
    #[serde(default)]
    pub amount: f64,
    /// Win probability in percent.
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default, deserialize_with = "optional_record_id")]
    pub owner_id: Option<RecordId>,
    #[serde(default)]
    pub expected_close_date: Option<Date>,
    #[serde(default)]
    pub next_action_date: Option<Date>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub number: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub amount: f64,
    pub status: QuoteStatus,
    pub issued_at: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub amount: f64,
    pub status: String,
    pub submitted_at: Date,
    #[serde(default)]
    pub deadline: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub author: String,
    #[serde(default)]
    pub company: Option<String>,
    pub content: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub published: bool,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Planning,
        ProjectStatus::Active,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Active => "active",
            ProjectStatus::OnHold => "on_hold",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub client_name: Option<String>,
    pub status: ProjectStatus,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub end_date: Option<Date>,
    /// Completion in percent.
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub budget: Option<f64>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTask {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    #[serde(deserialize_with = "record_id")]
    pub project_id: RecordId,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
    #[serde(default)]
    pub assignee_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub due_date: Option<Date>,
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub is_milestone: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

impl ProjectTask {
    /// The date inputs the Gantt helper resolves bars from.
    pub fn to_task_dates(&self) -> TaskDates {
        TaskDates {
            id: self.id.clone(),
            title: self.title.clone(),
            start_date: self.start_date,
            due_date: self.due_date,
            created_at: self.created_at.date_naive(),
            completed_at: self.completed_at.map(|t| t.date_naive()),
            estimated_hours: self.estimated_hours,
            status: self.status,
            priority: self.priority,
            assignee: self.assignee_name.clone(),
            progress: self.progress,
            is_deadline: self.is_milestone,
        }
    }

    /// Open and past its due date.
    pub fn is_overdue(&self, today: Date) -> bool {
        self.status.is_open() && self.due_date.is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    #[serde(deserialize_with = "record_id")]
    pub employee_id: RecordId,
    pub employee_name: String,
    pub date: Date,
    pub hours: f64,
    #[serde(default, deserialize_with = "optional_record_id")]
    pub project_id: Option<RecordId>,
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub birthday: Option<Date>,
    #[serde(default)]
    pub hire_date: Option<Date>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Hours per week; the workload widget assumes 40 when unset.
    #[serde(default)]
    pub weekly_hours: Option<f64>,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn to_employee_dates(&self) -> EmployeeDates {
        EmployeeDates {
            id: self.id.clone(),
            name: self.full_name(),
            birthday: self.birthday,
            hire_date: self.hire_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacationRequest {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub employee_name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: VacationStatus,
}

impl VacationRequest {
    pub fn to_span(&self) -> VacationSpan {
        VacationSpan {
            id: self.id.clone(),
            employee_name: self.employee_name.clone(),
            start: self.start_date,
            end: self.end_date,
            approved: self.status == VacationStatus::Approved,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgendaEvent {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub title: String,
    pub date: Date,
    #[serde(default)]
    pub color: Option<String>,
}

impl AgendaEvent {
    pub fn to_entry(&self) -> AgendaEntry {
        AgendaEntry {
            id: self.id.clone(),
            title: self.title.clone(),
            date: self.date,
            color: self.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    /// Free-form kind, e.g. `contact_created`, `quote_sent`.
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub actor_name: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Finance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub date: Date,
    /// Always positive; the direction is carried by `kind`.
    pub amount: f64,
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// An expense account (ledger category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAccount {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    #[serde(deserialize_with = "record_id")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub institution: Option<String>,
    pub balance: f64,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// `dashboard/revenue`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueStats {
    pub current_month: f64,
    pub previous_month: f64,
    pub year_to_date: f64,
    pub previous_year_to_date: f64,
}

/// `dashboard/clients`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientStats {
    pub count: u64,
    pub previous_count: u64,
    pub new_this_month: u64,
    pub active_count: u64,
    pub previous_active_count: u64,
}

/// `dashboard/projects`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectStats {
    pub active: u64,
    pub total: u64,
    pub completed_this_month: u64,
    pub overdue: u64,
}
