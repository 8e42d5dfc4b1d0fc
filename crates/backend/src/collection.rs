//! Backend collection endpoints and list filters.

use std::fmt;

use bizdash_core::types::Date;

/// A REST collection (or aggregate endpoint) exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Contacts,
    Companies,
    Testimonials,
    Opportunities,
    Quotes,
    Submissions,
    Projects,
    ProjectTasks,
    TimeEntries,
    VacationRequests,
    Employees,
    ExpenseAccounts,
    BankAccounts,
    Clients,
    Transactions,
    Activities,
    AgendaEvents,
    RevenueStats,
    ClientStats,
    ProjectStats,
}

impl Collection {
    pub const ALL: [Collection; 20] = [
        Collection::Contacts,
        Collection::Companies,
        Collection::Testimonials,
        Collection::Opportunities,
        Collection::Quotes,
        Collection::Submissions,
        Collection::Projects,
        Collection::ProjectTasks,
        Collection::TimeEntries,
        Collection::VacationRequests,
        Collection::Employees,
        Collection::ExpenseAccounts,
        Collection::BankAccounts,
        Collection::Clients,
        Collection::Transactions,
        Collection::Activities,
        Collection::AgendaEvents,
        Collection::RevenueStats,
        Collection::ClientStats,
        Collection::ProjectStats,
    ];

    /// Path relative to the backend base URL.
    pub fn path(self) -> &'static str {
        match self {
            Collection::Contacts => "contacts",
            Collection::Companies => "companies",
            Collection::Testimonials => "testimonials",
            Collection::Opportunities => "opportunities",
            Collection::Quotes => "quotes",
            Collection::Submissions => "submissions",
            Collection::Projects => "projects",
            Collection::ProjectTasks => "project-tasks",
            Collection::TimeEntries => "time-entries",
            Collection::VacationRequests => "vacation-requests",
            Collection::Employees => "employees",
            Collection::ExpenseAccounts => "expense-accounts",
            Collection::BankAccounts => "bank-accounts",
            Collection::Clients => "clients",
            Collection::Transactions => "transactions",
            Collection::Activities => "activities",
            Collection::AgendaEvents => "agenda-events",
            Collection::RevenueStats => "dashboard/revenue",
            Collection::ClientStats => "dashboard/clients",
            Collection::ProjectStats => "dashboard/projects",
        }
    }

    /// Aggregate endpoints return a single object rather than a list.
    pub fn is_aggregate(self) -> bool {
        matches!(
            self,
            Collection::RevenueStats | Collection::ClientStats | Collection::ProjectStats
        )
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Filters forwarded to a list endpoint as query-string parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub owner_id: Option<String>,
    pub limit: Option<usize>,
    /// Endpoint-specific filters, e.g. `("status", "active")`.
    pub extra: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, from: Option<Date>, to: Option<Date>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn owner(mut self, owner_id: Option<String>) -> Self {
        self.owner_id = owner_id;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Query-string pairs in a stable order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.extra.len() + 4);
        if let Some(from) = self.from {
            pairs.push(("from".to_string(), from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to".to_string(), to.to_string()));
        }
        if let Some(owner) = &self.owner_id {
            pairs.push(("owner_id".to_string(), owner.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs.extend(self.extra.iter().cloned());
        pairs
    }
}
