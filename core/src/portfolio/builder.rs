use crate::adapters::interface::{OracleCallMeta, OracleClient, OracleMode};
use crate::adapters::runtime::exchange;
use crate::config::EngineConfig;
use crate::determinism::ids::{new_portfolio_id, now_rfc3339_utc};
use crate::oracle::prompts::summarization_prompt;
use crate::oracle::response::{
    coerce_object, coerce_string_list, coerce_text, lookup, OracleFailure,
};
use crate::portfolio::aggregate::{collect_evidence, dedup_evidence, dedup_key, CollectedEvidence};
use crate::portfolio::model::{
    empty_buckets, fallback_summary, EvidenceBucket, PortfolioDocument, PortfolioStatus,
};
use crate::portfolio::sources::EvidenceSources;
use crate::storage::portfolio_store::PortfolioStore;
use crate::taxonomy::category::Category;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub document: PortfolioDocument,
    pub collected: CollectedEvidence,
    pub call: OracleCallMeta,
    pub persisted: bool,
    pub persist_error: Option<String>,
}

/// Collects, deduplicates and summarizes evidence into a portfolio document.
pub struct PortfolioBuilder<'a> {
    client: &'a dyn OracleClient,
    config: &'a EngineConfig,
}

impl<'a> PortfolioBuilder<'a> {
    pub fn new(client: &'a dyn OracleClient, config: &'a EngineConfig) -> Self {
        Self { client, config }
    }

    /// Builds and stores a portfolio. Always returns a document with all six buckets.
    pub fn build_portfolio(
        &self,
        sources: &EvidenceSources,
        store: &dyn PortfolioStore,
    ) -> PortfolioDocument {
        self.build_portfolio_with_store(sources, None, store).document
    }

    pub fn build_portfolio_with_store(
        &self,
        sources: &EvidenceSources,
        owner: Option<&str>,
        store: &dyn PortfolioStore,
    ) -> BuildOutcome {
        let mut outcome = self.organize(sources, owner);
        match store.put(&outcome.document) {
            Ok(_) => outcome.persisted = true,
            Err(e) => {
                tracing::error!(
                    portfolio_id = %outcome.document.id,
                    "failed to persist portfolio: {}",
                    e
                );
                outcome.persist_error = Some(e.to_string());
            }
        }
        outcome
    }

    /// Builds the document without persisting it.
    pub fn organize(&self, sources: &EvidenceSources, owner: Option<&str>) -> BuildOutcome {
        let collected = collect_evidence(sources);
        tracing::info!(
            lessons = collected.source_counts.lesson,
            journals = collected.source_counts.journal,
            assessments = collected.source_counts.assessment,
            attendance = collected.source_counts.attendance,
            uploads = collected.source_counts.external_upload,
            evidence_items = collected.total(),
            "collected portfolio evidence"
        );

        let max_chars = self.config.evidence_truncate_chars;
        let payload = collected.prompt_payload(max_chars);
        let evidence_json =
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        let request = self.config.request(
            self.config.generation.summarization,
            summarization_prompt(&evidence_json),
        );
        let exchange = exchange(
            self.client,
            OracleMode::Summarization,
            &request,
            self.config.raw_preview_chars,
        );

        let (buckets, overall_summary, status, failure) = match exchange.parsed {
            Ok(obj) => {
                let (buckets, overall) = coerce_portfolio_summary(&obj, &collected, max_chars);
                (buckets, overall, PortfolioStatus::Organized, None)
            }
            Err(failure) => fallback_parts(failure),
        };

        let document = PortfolioDocument {
            id: new_portfolio_id(),
            created_at: now_rfc3339_utc(),
            owner: owner.map(str::to_string),
            buckets,
            overall_summary,
            status,
            failure,
            source_counts: collected.source_counts,
        };
        tracing::info!(
            portfolio_id = %document.id,
            status = ?document.status,
            "portfolio built"
        );

        BuildOutcome {
            document,
            collected,
            call: exchange.call,
            persisted: false,
            persist_error: None,
        }
    }
}

type FallbackParts = (
    BTreeMap<Category, EvidenceBucket>,
    String,
    PortfolioStatus,
    Option<OracleFailure>,
);

fn fallback_parts(failure: OracleFailure) -> FallbackParts {
    (
        empty_buckets(),
        fallback_summary(&failure.reason),
        PortfolioStatus::Fallback,
        Some(failure),
    )
}

/// Coerces a summarization answer into six buckets plus the overall summary.
///
/// Evidence entries that match a truncated prompt item are restored to the full
/// collected text.
pub fn coerce_portfolio_summary(
    obj: &Map<String, Value>,
    collected: &CollectedEvidence,
    max_chars: usize,
) -> (BTreeMap<Category, EvidenceBucket>, String) {
    let index = collected.truncation_index(max_chars);
    let mut buckets = BTreeMap::new();
    for category in Category::ALL {
        let section = coerce_object(lookup(obj, &[category.key(), category.code()]));
        let evidence = coerce_string_list(section.get("evidence"))
            .into_iter()
            .map(|item| match index.get(&(category, dedup_key(&item))) {
                Some(full) => full.to_string(),
                None => item,
            });
        buckets.insert(
            category,
            EvidenceBucket {
                evidence: dedup_evidence(evidence),
                summary: coerce_text(section.get("summary")),
            },
        );
    }
    let overall = coerce_text(lookup(obj, &["overall_summary", "overallSummary"]));
    (buckets, overall)
}
