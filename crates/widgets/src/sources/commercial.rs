//! Commercial dashboard widgets: clients, opportunities, quotes.

use bizdash_backend::models::{
    Client, ClientStats, Opportunity, OpportunityStage, Quote, QuoteStatus, Submission,
    Testimonial,
};
use bizdash_backend::{fetch_one, list, BackendApi, Collection};
use bizdash_core::currency::format_dashboard_amount;
use bizdash_core::stats::{percentage_change, ratio_pct, round_to, trailing_months, YearMonth};

use crate::context::WidgetContext;
use crate::data::{
    ActionItem, ClientGrowthPoint, ClientsCountData, ClientsGrowthData, CommercialStatsData,
    NeedingActionData, OpportunitiesListData, OpportunityItem, PipelineData, PipelineStage,
    QuoteItem, QuotesListData, SubmissionItem, SubmissionsListData, TestimonialItem,
    TestimonialsData,
};
use crate::error::WidgetError;

/// An open opportunity untouched for this many days needs attention.
const STALE_AFTER_DAYS: i64 = 14;

/// Win probability assumed when an opportunity carries none.
fn default_probability(stage: OpportunityStage) -> f64 {
    match stage {
        OpportunityStage::Lead => 10.0,
        OpportunityStage::Qualified => 25.0,
        OpportunityStage::Proposal => 50.0,
        OpportunityStage::Negotiation => 75.0,
        OpportunityStage::Won => 100.0,
        OpportunityStage::Lost => 0.0,
    }
}

fn growth(current: u64, previous: u64) -> f64 {
    round_to(percentage_change(current as f64, previous as f64), 1)
}

/// Largest open opportunities.
pub async fn opportunities_list(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<OpportunitiesListData, WidgetError> {
    let opportunities: Vec<Opportunity> =
        list(api, Collection::Opportunities, &ctx.query()).await?;
    let mut open: Vec<Opportunity> = opportunities
        .into_iter()
        .filter(|o| o.stage.is_open())
        .collect();
    open.sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.title.cmp(&b.title)));

    Ok(OpportunitiesListData {
        total: open.len() as u64,
        total_amount: open.iter().map(|o| o.amount).sum(),
        items: open
            .into_iter()
            .take(ctx.config.limit_or(5))
            .map(|o| OpportunityItem {
                id: o.id,
                title: o.title,
                client_name: o.client_name,
                stage: o.stage.as_str().to_string(),
                amount: o.amount,
                expected_close_date: o.expected_close_date,
            })
            .collect(),
    })
}

pub async fn clients_count(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<ClientsCountData, WidgetError> {
    let stats: ClientStats = fetch_one(api, Collection::ClientStats, &ctx.query()).await?;
    Ok(ClientsCountData {
        count: stats.count,
        growth: growth(stats.count, stats.previous_count),
        previous_count: stats.previous_count,
        new_this_month: stats.new_this_month,
        active_count: stats.active_count,
        active_growth: growth(stats.active_count, stats.previous_active_count),
        previous_active_count: stats.previous_active_count,
    })
}

/// Most recent quotes and what is still awaiting an answer.
pub async fn quotes_list(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<QuotesListData, WidgetError> {
    let mut quotes: Vec<Quote> = list(api, Collection::Quotes, &ctx.query()).await?;
    quotes.sort_by(|a, b| b.issued_at.cmp(&a.issued_at).then_with(|| a.number.cmp(&b.number)));
    let pending: Vec<&Quote> = quotes
        .iter()
        .filter(|q| q.status == QuoteStatus::Sent)
        .collect();

    Ok(QuotesListData {
        pending: pending.len() as u64,
        pending_amount: pending.iter().map(|q| q.amount).sum(),
        items: quotes
            .iter()
            .take(ctx.config.limit_or(5))
            .map(|q| QuoteItem {
                id: q.id.clone(),
                number: q.number.clone(),
                client_name: q.client_name.clone(),
                amount: q.amount,
                status: quote_status(q.status).to_string(),
                issued_at: q.issued_at,
            })
            .collect(),
    })
}

fn quote_status(status: QuoteStatus) -> &'static str {
    match status {
        QuoteStatus::Draft => "draft",
        QuoteStatus::Sent => "sent",
        QuoteStatus::Accepted => "accepted",
        QuoteStatus::Rejected => "rejected",
        QuoteStatus::Expired => "expired",
    }
}

pub async fn submissions_list(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<SubmissionsListData, WidgetError> {
    let mut submissions: Vec<Submission> = list(api, Collection::Submissions, &ctx.query()).await?;
    submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then_with(|| a.id.cmp(&b.id)));

    Ok(SubmissionsListData {
        total: submissions.len() as u64,
        items: submissions
            .into_iter()
            .take(ctx.config.limit_or(5))
            .map(|s| SubmissionItem {
                id: s.id,
                title: s.title,
                client_name: s.client_name,
                amount: s.amount,
                status: s.status,
                submitted_at: s.submitted_at,
                deadline: s.deadline,
            })
            .collect(),
    })
}

/// Published testimonials, newest first.
pub async fn testimonials(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<TestimonialsData, WidgetError> {
    let testimonials: Vec<Testimonial> = list(api, Collection::Testimonials, &ctx.query()).await?;
    let mut published: Vec<Testimonial> =
        testimonials.into_iter().filter(|t| t.published).collect();
    published.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let rated: Vec<f64> = published
        .iter()
        .filter(|t| t.rating > 0)
        .map(|t| f64::from(t.rating))
        .collect();
    let average_rating = if rated.is_empty() {
        0.0
    } else {
        round_to(rated.iter().sum::<f64>() / rated.len() as f64, 1)
    };

    Ok(TestimonialsData {
        average_rating,
        items: published
            .into_iter()
            .take(ctx.config.limit_or(10))
            .map(|t| TestimonialItem {
                id: t.id,
                author: t.author,
                company: t.company,
                content: t.content,
                rating: t.rating,
            })
            .collect(),
    })
}

/// Count and amount per stage, every stage present.
pub async fn pipeline(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<PipelineData, WidgetError> {
    let opportunities: Vec<Opportunity> =
        list(api, Collection::Opportunities, &ctx.query()).await?;

    let stages = OpportunityStage::ALL
        .iter()
        .map(|stage| {
            let in_stage = opportunities.iter().filter(|o| o.stage == *stage);
            PipelineStage {
                stage: stage.as_str().to_string(),
                count: in_stage.clone().count() as u64,
                amount: in_stage.map(|o| o.amount).sum(),
            }
        })
        .collect();

    let open = opportunities.iter().filter(|o| o.stage.is_open());
    Ok(PipelineData {
        stages,
        total_amount: open.clone().map(|o| o.amount).sum(),
        weighted_amount: round_to(
            open.map(|o| {
                let probability = o.probability.unwrap_or_else(|| default_probability(o.stage));
                o.amount * probability.clamp(0.0, 100.0) / 100.0
            })
            .sum(),
            2,
        ),
    })
}

/// Open opportunities whose next action is due, or which have gone stale.
pub async fn needing_action(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<NeedingActionData, WidgetError> {
    let opportunities: Vec<Opportunity> =
        list(api, Collection::Opportunities, &ctx.query()).await?;

    let mut items: Vec<ActionItem> = opportunities
        .into_iter()
        .filter(|o| o.stage.is_open())
        .filter_map(|o| {
            let (reason, days_late) = match o.next_action_date {
                Some(next) if next <= ctx.today => ("overdue-action", (ctx.today - next).num_days()),
                Some(_) => return None,
                None => {
                    let idle = (ctx.today - o.updated_at.date_naive()).num_days();
                    if idle <= STALE_AFTER_DAYS {
                        return None;
                    }
                    ("stale", idle - STALE_AFTER_DAYS)
                }
            };
            Some(ActionItem {
                id: o.id,
                title: o.title,
                client_name: o.client_name,
                stage: o.stage.as_str().to_string(),
                next_action_date: o.next_action_date,
                reason: reason.to_string(),
                days_late,
            })
        })
        .collect();
    items.sort_by(|a, b| b.days_late.cmp(&a.days_late).then_with(|| a.title.cmp(&b.title)));

    let count = items.len() as u64;
    items.truncate(ctx.config.limit_or(5));
    Ok(NeedingActionData { items, count })
}

/// New and cumulative clients per month.
pub async fn clients_growth(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<ClientsGrowthData, WidgetError> {
    let clients: Vec<Client> = list(api, Collection::Clients, &ctx.query()).await?;
    let months = trailing_months(ctx.today, ctx.config.months_or(6));
    let Some(first) = months.first().copied() else {
        return Ok(ClientsGrowthData::default());
    };

    let created: Vec<YearMonth> = clients
        .iter()
        .map(|c| YearMonth::of(c.created_at.date_naive()))
        .collect();
    let mut total = created.iter().filter(|m| **m < first).count() as u64;

    let points: Vec<ClientGrowthPoint> = months
        .iter()
        .map(|month| {
            let new_clients = created.iter().filter(|m| *m == month).count() as u64;
            total += new_clients;
            ClientGrowthPoint {
                month: month.key(),
                new_clients,
                total,
            }
        })
        .collect();

    let change = match points.as_slice() {
        [.., previous, current] => growth(current.new_clients, previous.new_clients),
        _ => 0.0,
    };
    Ok(ClientsGrowthData {
        months: points,
        growth: change,
    })
}

/// Headline commercial ratios.
pub async fn commercial_stats(
    api: &dyn BackendApi,
    ctx: &WidgetContext,
) -> Result<CommercialStatsData, WidgetError> {
    let q = ctx.query();
    let (opportunities, quotes) = futures::try_join!(
        list::<Opportunity>(api, Collection::Opportunities, &q),
        list::<Quote>(api, Collection::Quotes, &q),
    )?;

    let this_month = YearMonth::of(ctx.today);
    let open: Vec<&Opportunity> = opportunities.iter().filter(|o| o.stage.is_open()).collect();
    let won: Vec<&Opportunity> = opportunities
        .iter()
        .filter(|o| o.stage == OpportunityStage::Won)
        .collect();
    let lost = opportunities
        .iter()
        .filter(|o| o.stage == OpportunityStage::Lost)
        .count();
    let won_this_month: Vec<&&Opportunity> = won
        .iter()
        .filter(|o| this_month.contains(o.updated_at.date_naive()))
        .collect();

    let count_quotes = |status: QuoteStatus| quotes.iter().filter(|q| q.status == status).count();
    let accepted = count_quotes(QuoteStatus::Accepted);
    let decided = accepted + count_quotes(QuoteStatus::Rejected) + count_quotes(QuoteStatus::Expired);
    let pipeline_amount: f64 = open.iter().map(|o| o.amount).sum();

    Ok(CommercialStatsData {
        open_opportunities: open.len() as u64,
        pipeline_amount,
        pipeline_amount_formatted: format_dashboard_amount(pipeline_amount),
        won_this_month: won_this_month.len() as u64,
        won_amount_this_month: won_this_month.iter().map(|o| o.amount).sum(),
        quotes_sent: quotes
            .iter()
            .filter(|q| q.status != QuoteStatus::Draft)
            .count() as u64,
        quote_acceptance_rate: round_to(ratio_pct(accepted as f64, decided as f64), 1),
        conversion_rate: round_to(ratio_pct(won.len() as f64, (won.len() + lost) as f64), 1),
    })
}
