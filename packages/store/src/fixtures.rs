//! Static newsletters served by [`crate::MockNewsletterSource`].

use chrono::{DateTime, TimeZone, Utc};

use crate::library::SavedNewsletter;
use crate::models::{Newsletter, NewsletterContent, NewsletterMetadata, NewsletterStatus, Sender};

const FUNDING_BODY: &str = "Latest startup funding rounds and analysis. Seed rounds \
slowed through the quarter while late-stage valuations recovered, led by infrastructure \
and developer tooling companies. We break down the ten largest rounds, the investors \
behind them, and what the shift toward smaller, milestone-based tranches means for \
founders raising in the coming months.";

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn newsletter(
    id: &str,
    subject: &str,
    sender: (&str, &str),
    received_at: DateTime<Utc>,
    heading: &str,
    body: &str,
    status: NewsletterStatus,
    tags: &[&str],
    metadata: (u32, u32, &str),
) -> Newsletter {
    Newsletter {
        id: id.to_string(),
        subject: subject.to_string(),
        sender: Sender {
            name: sender.0.to_string(),
            email: sender.1.to_string(),
        },
        received_at,
        content: NewsletterContent {
            html: format!("<h1>{heading}</h1><p>{body}</p>"),
            text: format!("{heading}\n\n{body}"),
        },
        status,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        metadata: NewsletterMetadata {
            read_time: Some(metadata.0),
            word_count: Some(metadata.1),
            preview_text: Some(metadata.2.to_string()),
        },
    }
}

/// The fixture feed, newest first.
pub fn newsletters() -> Vec<Newsletter> {
    vec![
        newsletter(
            "1",
            "The Future of AI: Weekly Insights",
            ("AI Trends Weekly", "newsletter@aitrends.com"),
            at(2024, 1, 5, 8, 0),
            "The Future of AI",
            "This week in AI developments...",
            NewsletterStatus::Unread,
            &["tech", "ai"],
            (
                5,
                1200,
                "Discover the latest breakthroughs in artificial intelligence and their impact on various industries.",
            ),
        ),
        newsletter(
            "2",
            "Weekly Product Design Inspiration",
            ("Design Weekly", "hello@designweekly.com"),
            at(2024, 1, 4, 15, 30),
            "Design Inspiration",
            "This week's most innovative designs...",
            NewsletterStatus::Read,
            &["design", "inspiration"],
            (
                8,
                1800,
                "Explore this week's curated collection of outstanding product designs from around the world.",
            ),
        ),
        newsletter(
            "3",
            "Startup Funding Weekly Report",
            ("Startup Digest", "digest@startupweekly.com"),
            at(2024, 1, 3, 12, 0),
            "Funding Report",
            FUNDING_BODY,
            NewsletterStatus::Archived,
            &["startup", "business"],
            (
                6,
                1500,
                "Your weekly roundup of the most significant startup funding news and market analysis.",
            ),
        ),
    ]
}

/// Every fixture newsletter saved to the library, with fixed reading progress
/// so each [`crate::ReadingStatus`] is represented.
pub fn saved_newsletters() -> Vec<SavedNewsletter> {
    let saved_at = at(2024, 1, 6, 9, 0);
    newsletters()
        .into_iter()
        .zip([0u8, 45, 100])
        .map(|(newsletter, position)| SavedNewsletter {
            newsletter,
            saved_at,
            last_read_position: position,
            notes: Some("Sample note for this newsletter".to_string()),
        })
        .collect()
}
