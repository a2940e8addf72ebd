use tracing::{info, warn};

use super::disambiguation::DisambiguationResolver;
use super::matching::{CrossSourceMatcher, MatchConfig, MatchDecision};
use super::types::{
    Candidate, CandidateTier, CrossReferenceReport, MatchResult, ObituaryContext, ObituarySource,
    PageExistence, WikipediaLookup,
};
use crate::error::Result;
use crate::subject::SubjectResolver;
use crate::TARGET_MATCH;

/// Cross-references one source's obituaries against a comparison source
/// (the NYTimes) and checks every match for an existing Wikipedia biography.
///
/// Collaborator calls are awaited one at a time, in input order.
pub struct CrossReferencer<'a, S, C, W> {
    source: &'a S,
    comparison: &'a C,
    wikipedia: &'a W,
    matcher: CrossSourceMatcher,
}

impl<'a, S, C, W> CrossReferencer<'a, S, C, W>
where
    S: ObituarySource,
    C: ObituarySource,
    W: WikipediaLookup,
{
    pub fn new(source: &'a S, comparison: &'a C, wikipedia: &'a W, config: MatchConfig) -> Self {
        Self {
            source,
            comparison,
            wikipedia,
            matcher: CrossSourceMatcher::new(config),
        }
    }

    pub async fn cross_reference_month(&self, year: i32, month: u32) -> Result<CrossReferenceReport> {
        info!(target: TARGET_MATCH, "Finding candidates for {}/{}...", year, month);

        let to_check = self.source.resolve_obituaries_of_month(year, month).await?;
        let comparison = self.comparison.resolve_obituaries_of_month(year, month).await?;

        info!(
            target: TARGET_MATCH,
            "Resolved {} {} obituaries and {} {} obituaries to check",
            comparison.len(),
            self.comparison.source_id(),
            to_check.len(),
            self.source.source_id()
        );

        let mut report = CrossReferenceReport::new(year, month);
        for obituary in &to_check {
            let ctx = ObituaryContext {
                obituary,
                comparison: &comparison,
                year,
                month,
            };
            self.cross_reference_obituary(&ctx, &mut report).await?;
        }

        info!(
            target: TARGET_MATCH,
            "All done processing {}/{}. Evaluated matches: {}, candidates: {}, flagged for review: {}",
            year,
            month,
            report.evaluated_matches,
            report.candidates.len(),
            report.review.len()
        );
        Ok(report)
    }

    /// Match one obituary and, when accepted, check the matched subject on Wikipedia.
    pub async fn cross_reference_obituary(
        &self,
        ctx: &ObituaryContext<'_>,
        report: &mut CrossReferenceReport,
    ) -> Result<()> {
        let result = match self.matcher.best_match(ctx.obituary, ctx.comparison) {
            MatchDecision::Accepted(result) => result,
            MatchDecision::Advisory(result) => {
                warn!(
                    target: TARGET_MATCH,
                    "Matching score = {}: '{}' - '{}' ({}). Check manually.",
                    result.score,
                    result.source.subject.normalized_name,
                    result.matched_name,
                    result.target.source()
                );
                report.review.push(result);
                return Ok(());
            }
            MatchDecision::Rejected(_) => return Ok(()),
        };

        report.evaluated_matches += 1;

        let resolver = SubjectResolver::for_source(result.target.source());
        let name_versions = resolver.name_versions(&result.target.subject.name);

        let existence = DisambiguationResolver::new(self.source, self.wikipedia)
            .resolve(ctx, &name_versions)
            .await?;

        let tier = match existence {
            PageExistence::Found { .. } => return Ok(()),
            PageExistence::NotFound if is_weak(&result) => CandidateTier::Weak,
            PageExistence::NotFound => CandidateTier::Strong,
            PageExistence::PossibleCandidate { .. } => CandidateTier::Possible,
        };

        let candidate = Candidate {
            name: result.matched_name.clone(),
            tier,
            source_web_url: result.source.web_url().to_string(),
            comparison_web_url: result.target.web_url().to_string(),
        };
        info!(target: TARGET_MATCH, "{}: {}", candidate.tier, candidate.name);
        report.candidates.push(candidate);

        Ok(())
    }
}

fn is_weak(result: &MatchResult) -> bool {
    !result.source.subject.is_resolved() || !result.target.subject.is_resolved()
}
