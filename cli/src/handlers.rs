//! Command handlers
//!
//! Each handler takes the wired services and prints to stdout. The vote
//! handler runs an interactive loop reading `voter index` lines from stdin
//! until the deadline, then resolves ties per the chosen mode.

use crate::commands::{SearchByArg, TieArg};
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use cinevote_application::{
    CatalogService, SearchBy, SessionHandle, VoteCoordinator,
    ports::{DocumentStore, EventLog, ResultsPublisher, SessionOutcome},
};
use cinevote_domain::{
    Block, ParseConfig, SearchScope, TieOutcome, VoterId, break_tie, find_cutoff,
    voting::{RUNOFF_MAX_VOTES, RUNOFF_MINUTES},
};
use chrono::Duration;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;

/// Session scope used by the CLI. The engine supports many parallel scopes;
/// a terminal has exactly one.
const CLI_SCOPE: &str = "cli";

/// Wired services for one invocation.
pub struct App<S: DocumentStore> {
    store: Arc<S>,
    catalog: CatalogService<S>,
    parse_config: ParseConfig,
    page_size: usize,
    event_log: Arc<dyn EventLog>,
}

impl<S: DocumentStore + 'static> App<S> {
    pub fn new(
        store: Arc<S>,
        catalog: CatalogService<S>,
        parse_config: ParseConfig,
        page_size: usize,
        event_log: Arc<dyn EventLog>,
    ) -> Self {
        Self {
            store,
            catalog,
            parse_config,
            page_size,
            event_log,
        }
    }

    pub async fn list(&self, scope: SearchScope, page: usize) -> Result<()> {
        let records = self.catalog.list(scope).await?;
        if records.is_empty() {
            println!("No records in scope.");
            return Ok(());
        }

        let pages = records.len().div_ceil(self.page_size);
        let page = page.clamp(1, pages);
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(records.len());

        for (i, record) in records[start..end].iter().enumerate() {
            println!("{:>3}. {}", start + i + 1, record.display_line());
        }
        println!();
        println!("Page {}/{} ({} records)", page, pages, records.len());
        Ok(())
    }

    pub async fn pick(&self, proposer: Option<&str>) -> Result<()> {
        match self
            .catalog
            .random_pick(SearchScope::Pending, proposer)
            .await?
        {
            Some(record) => println!("{}", record.display_line()),
            None => println!("No pending records match."),
        }
        Ok(())
    }

    pub async fn search(&self, query: &str, by: SearchByArg, scope: SearchScope) -> Result<()> {
        let by = match by {
            SearchByArg::Title => SearchBy::Title,
            SearchByArg::Proposer => SearchBy::Proposer,
        };
        let matches = self.catalog.search(query, by, scope).await?;
        if matches.is_empty() {
            println!("No matches for '{}'.", query);
            return Ok(());
        }
        for record in &matches {
            println!("{}", record.display_line());
        }
        Ok(())
    }

    pub async fn resolve(&self, title: &str) -> Result<()> {
        let matches = self
            .catalog
            .search(title, SearchBy::Title, SearchScope::Pending)
            .await?;

        match matches.as_slice() {
            [] => bail!("no pending record matches '{}'", title),
            [record] => {
                self.catalog.resolve(record).await?;
                println!("Resolved: {} (proposed by {})", record.title, record.proposer);
                Ok(())
            }
            several => {
                println!("'{}' is ambiguous; candidates:", title);
                for record in several {
                    println!("  {}", record.display_line());
                }
                bail!("refusing to resolve an ambiguous title")
            }
        }
    }

    pub async fn vote(
        &self,
        count: usize,
        max_votes: usize,
        minutes: i64,
        tie: TieArg,
    ) -> Result<()> {
        let candidates = self.catalog.draw_candidates(count).await?;

        let (tx, mut rx) = mpsc::unbounded_channel();
        let coordinator = VoteCoordinator::new(Arc::new(ChannelPublisher { tx }))
            .with_event_log(Arc::clone(&self.event_log));

        let handle = coordinator
            .start(CLI_SCOPE, candidates, max_votes, Duration::minutes(minutes))
            .await?;

        println!("Voting round open for {} minute(s), {} vote(s) per voter.", minutes, max_votes);
        println!("Enter 'VOTER INDEX' to toggle a vote, 'status' for counts, 'close' to end early.");
        print_candidates(&handle).await;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut outcome = run_round(&handle, &mut lines, &mut rx).await?;
        print_ranking(&outcome);

        loop {
            if !outcome.is_tied() {
                if let Some(winner) = &outcome.winner {
                    println!("Winner: {} ({} vote(s))", winner.candidate.title, winner.votes);
                }
                return Ok(());
            }

            match tie.to_breaker() {
                cinevote_domain::TieBreaker::Random => {
                    let TieOutcome::Decided(winner) = break_tie(
                        outcome.tied.clone(),
                        cinevote_domain::TieBreaker::Random,
                    )?
                    else {
                        bail!("random tie resolution returned a session");
                    };
                    println!("Tie broken at random.");
                    println!("Winner: {}", winner.title);
                    return Ok(());
                }
                cinevote_domain::TieBreaker::Runoff => {
                    println!(
                        "Tied between {} candidates; runoff for {} minute(s), 1 vote each.",
                        outcome.tied.len(),
                        RUNOFF_MINUTES
                    );
                    let handle = coordinator
                        .start(
                            CLI_SCOPE,
                            outcome.tied.clone(),
                            RUNOFF_MAX_VOTES,
                            Duration::minutes(RUNOFF_MINUTES),
                        )
                        .await?;
                    print_candidates(&handle).await;
                    outcome = run_round(&handle, &mut lines, &mut rx).await?;
                    print_ranking(&outcome);
                }
            }
        }
    }

    pub async fn inspect(&self) -> Result<()> {
        let snapshot = self
            .store
            .fetch()
            .await
            .context("could not fetch document")?;

        let cutoff = find_cutoff(&snapshot.blocks, &self.parse_config);
        let records = cinevote_domain::parse_records(&snapshot, &self.parse_config);

        if let Some(title) = &snapshot.title {
            println!("Document: {}", title);
        }
        for (i, block) in snapshot.blocks.iter().enumerate() {
            let marker = match cutoff {
                Some(c) if i == c => "  <- cutoff",
                Some(c) if i > c => "  (archive)",
                _ => "",
            };
            match block {
                Block::SectionBreak => println!("{:>4}  [section break]{}", i, marker),
                Block::Paragraph(p) => {
                    let text: String = p.text_runs().map(|r| r.content.as_str()).collect();
                    let breaks = if p.has_page_break() { " [page break]" } else { "" };
                    println!("{:>4}  {:?}{}{}", i, text.trim_end(), breaks, marker);
                }
            }
        }
        println!();
        match cutoff {
            Some(c) => println!("Cutoff at block {}; {} record(s) before it.", c, records.len()),
            None => println!("No cutoff; {} record(s) in total.", records.len()),
        }
        Ok(())
    }
}

/// Publisher that forwards the single outcome to the handler.
struct ChannelPublisher {
    tx: mpsc::UnboundedSender<SessionOutcome>,
}

#[async_trait]
impl ResultsPublisher for ChannelPublisher {
    async fn publish(&self, outcome: SessionOutcome) {
        let _ = self.tx.send(outcome);
    }
}

/// Read votes from stdin until the deadline, an explicit close, or EOF.
///
/// Publication is owned by whichever of {timer, close} transitions the
/// session, so the outcome always arrives on the channel exactly once.
async fn run_round(
    handle: &SessionHandle,
    lines: &mut Lines<BufReader<Stdin>>,
    rx: &mut mpsc::UnboundedReceiver<SessionOutcome>,
) -> Result<SessionOutcome> {
    loop {
        let status = handle.status().await;
        if !status.active {
            break;
        }
        let remaining = status.remaining.to_std().unwrap_or_default();

        tokio::select! {
            _ = tokio::time::sleep(remaining) => break,
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break; // stdin closed
                };
                handle_vote_line(handle, line.trim()).await;
            }
        }
    }

    let _ = handle.close().await;
    rx.recv()
        .await
        .ok_or_else(|| anyhow!("session closed without publishing an outcome"))
}

async fn handle_vote_line(handle: &SessionHandle, line: &str) {
    match line {
        "" => {}
        "close" => {
            let _ = handle.close().await;
        }
        "status" => print_candidates(handle).await,
        _ => {
            let mut parts = line.split_whitespace();
            let (Some(voter), Some(index), None) = (parts.next(), parts.next(), parts.next())
            else {
                println!("Expected 'VOTER INDEX', 'status' or 'close'.");
                return;
            };
            let Ok(index) = index.parse::<usize>() else {
                println!("'{}' is not a candidate number.", index);
                return;
            };
            if index == 0 {
                println!("Candidates are numbered from 1.");
                return;
            }
            match handle.toggle_vote(voter_id(voter), index - 1).await {
                Ok(toggle) => println!("{:?} vote by {} on candidate {}.", toggle, voter, index),
                Err(e) => println!("{}", e),
            }
        }
    }
}

async fn print_candidates(handle: &SessionHandle) {
    let status = handle.status().await;
    for (i, (record, count)) in status
        .candidates
        .iter()
        .zip(status.counts.iter())
        .enumerate()
    {
        println!("{:>3}. {} [{} vote(s)]", i + 1, record.display_line(), count);
    }
    println!("Time remaining: {}s", status.remaining.num_seconds().max(0));
}

fn print_ranking(outcome: &SessionOutcome) {
    println!();
    println!("Final ranking:");
    for (i, tally) in outcome.ranking.iter().enumerate() {
        println!("{:>3}. {} - {} vote(s)", i + 1, tally.candidate.title, tally.votes);
    }
}

/// Numeric tokens are used directly; names are hashed to a stable id for
/// the process lifetime.
fn voter_id(token: &str) -> VoterId {
    if let Ok(n) = token.parse::<u64>() {
        return VoterId(n);
    }
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    VoterId(hasher.finish())
}

/// Pick usable defaults for the vote subcommand: explicit flags win over
/// config defaults.
pub fn vote_parameters(
    count: Option<usize>,
    max_votes: Option<usize>,
    minutes: Option<i64>,
    config: &cinevote_infrastructure::FileVotingConfig,
) -> (usize, usize, i64) {
    (
        count.unwrap_or(config.default_candidates),
        max_votes.unwrap_or(config.default_max_votes),
        minutes.unwrap_or(config.default_minutes),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voter_id_numeric_and_named() {
        assert_eq!(voter_id("42"), VoterId(42));
        assert_eq!(voter_id("ana"), voter_id("ana"));
        assert_ne!(voter_id("ana"), voter_id("ben"));
    }

    #[test]
    fn test_vote_parameters_prefer_flags() {
        let config = cinevote_infrastructure::FileVotingConfig::default();
        assert_eq!(vote_parameters(None, None, None, &config), (3, 1, 5));
        assert_eq!(vote_parameters(Some(5), None, Some(10), &config), (5, 1, 10));
    }
}
