//! Seller application commands for consumers and the admin review queue.

use clap::{Subcommand, ValueEnum};
use foodverse_client::{FoodverseClient, SellerRequest, SellerRequestInput, SellerRequestQuery};
use foodverse_core::seller_request::{can_submit, matches_query, review_allowed, tally};
use foodverse_core::{ReviewDecision, SellerRequestStatus};

use crate::output::{format_time, truncate};
use crate::Context;

/// Page size used when scanning the queue for a single request.
const SCAN_PAGE_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Decision {
    Approve,
    Reject,
}

impl From<Decision> for ReviewDecision {
    fn from(value: Decision) -> Self {
        match value {
            Decision::Approve => ReviewDecision::Approve,
            Decision::Reject => ReviewDecision::Reject,
        }
    }
}

/// Sub-commands available under `seller-request`.
#[derive(Debug, Subcommand)]
pub enum SellerRequestCommands {
    /// Apply to become a seller
    Submit {
        /// National id number
        #[arg(long)]
        id_number: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        face_image_url: String,
    },
    /// Show the status of your application
    Show,
    /// List applications (admins)
    List {
        #[arg(long)]
        status: Option<SellerRequestStatus>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Filter the page by applicant name, email, id number, location or reason
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Approve or reject an application (admins)
    Review {
        id: i64,
        #[arg(value_enum)]
        decision: Decision,
        /// Required when rejecting
        #[arg(long, default_value = "")]
        comments: String,
    },
}

pub(crate) async fn run(ctx: &Context, command: SellerRequestCommands) -> anyhow::Result<()> {
    match command {
        SellerRequestCommands::Submit {
            id_number,
            reason,
            location,
            face_image_url,
        } => {
            let existing = ctx.client.my_seller_request().await?;
            if !can_submit(existing.as_ref().map(|r| r.status)) {
                let status = existing.map_or(SellerRequestStatus::Pending, |r| r.status);
                anyhow::bail!("you already have a {status} seller request");
            }
            let input = SellerRequestInput {
                id_number,
                reason,
                location,
                face_image_url,
            };
            let request = ctx.client.submit_seller_request(&input).await?;
            println!("seller request {} submitted ({})", request.id, request.status);
            Ok(())
        }
        SellerRequestCommands::Show => {
            match ctx.client.my_seller_request().await? {
                Some(request) => print_request(&request),
                None => println!("you have not applied to become a seller"),
            }
            Ok(())
        }
        SellerRequestCommands::List {
            status,
            page,
            limit,
            query,
        } => {
            let page = ctx
                .client
                .list_seller_requests(&SellerRequestQuery {
                    status,
                    page,
                    limit,
                })
                .await?;
            let needle = query.unwrap_or_default();
            let shown: Vec<&SellerRequest> = page
                .requests
                .iter()
                .filter(|r| matches_query(*r, needle.trim()))
                .collect();
            let counts = tally(&page.requests);
            println!(
                "page {} ({} of {} total): {} pending, {} approved, {} rejected",
                page.page,
                counts.total,
                page.total,
                counts.pending,
                counts.approved,
                counts.rejected
            );
            print_request_table(&shown);
            Ok(())
        }
        SellerRequestCommands::Review {
            id,
            decision,
            comments,
        } => run_review(ctx, id, decision.into(), &comments).await,
    }
}

/// Pages through the queue looking for request `id`.
async fn find_request(client: &FoodverseClient, id: i64) -> anyhow::Result<Option<SellerRequest>> {
    let mut page = 1;
    loop {
        let batch = client
            .list_seller_requests(&SellerRequestQuery {
                status: None,
                page: Some(page),
                limit: Some(SCAN_PAGE_LIMIT),
            })
            .await?;
        if let Some(found) = batch.requests.iter().find(|r| r.id == id) {
            return Ok(Some(found.clone()));
        }
        let seen = u64::from(page) * u64::from(SCAN_PAGE_LIMIT);
        if batch.requests.is_empty() || seen >= batch.total {
            return Ok(None);
        }
        page += 1;
    }
}

async fn run_review(
    ctx: &Context,
    id: i64,
    decision: ReviewDecision,
    comments: &str,
) -> anyhow::Result<()> {
    let current = find_request(&ctx.client, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("seller request {id} not found"))?;
    review_allowed(current.status, decision, comments)?;

    let updated = ctx
        .client
        .review_seller_request(id, decision, comments)
        .await?;
    println!(
        "seller request {} for {} is now {}",
        updated.id, updated.user.email, updated.status
    );
    Ok(())
}

fn print_request(request: &SellerRequest) {
    println!("request:   {}", request.id);
    println!("status:    {}", request.status);
    println!("submitted: {}", format_time(request.created_at));
    println!("location:  {}", request.location);
    println!("reason:    {}", request.reason);
    if !request.admin_comments.is_empty() {
        println!("comments:  {}", request.admin_comments);
    }
    if let Some(reviewer) = &request.reviewed_by {
        println!(
            "reviewed:  {} by {}",
            format_time(request.reviewed_at),
            reviewer.name
        );
    }
}

fn print_request_table(requests: &[&SellerRequest]) {
    if requests.is_empty() {
        println!("no matching seller requests");
        return;
    }
    println!(
        "{:<6}{:<10}{:<24}{:<30}{:<18}REASON",
        "ID", "STATUS", "NAME", "EMAIL", "SUBMITTED"
    );
    for r in requests {
        println!(
            "{:<6}{:<10}{:<24}{:<30}{:<18}{}",
            r.id,
            r.status,
            truncate(&r.user.name, 22),
            truncate(&r.user.email, 28),
            format_time(r.created_at),
            truncate(&r.reason, 40)
        );
    }
}
