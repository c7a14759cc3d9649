//! Orchestration of the annotation passes:
//! parses -> skeleton -> frozen snapshot -> TAM -> notes -> rejected-candidate
//! stats -> contract + frozen-structure validation.

pub mod config;

pub use config::PipelineConfig;

use gloss_candidates::{collect_rejected_candidates, CandidateError, CandidateFilter};
use gloss_protocol::{Document, ParsedSentence};
use gloss_skeleton::{SkeletonBuilder, SkeletonError};
use gloss_templates::{NoteAssigner, NoteGenerator, TemplateRegistry, BACKOFF_USED};
use gloss_validator::{ensure_document, ContractError, FrozenSkeleton};
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("sentence {0:?} appears more than once in the input")]
    DuplicateSentence(String),
    #[error(transparent)]
    Skeleton(#[from] SkeletonError),
    #[error(transparent)]
    Candidates(#[from] CandidateError),
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Counters for one annotated document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationSummary {
    pub sentences: usize,
    pub nodes: usize,
    pub backoff_nodes: usize,
    pub rejected_candidates: usize,
}

#[derive(Debug, Clone)]
pub struct Annotated {
    pub document: Document,
    pub skeleton: FrozenSkeleton,
    pub summary: AnnotationSummary,
}

pub struct Pipeline {
    config: PipelineConfig,
    registry: TemplateRegistry,
    filter: CandidateFilter,
    generator: Option<Box<dyn NoteGenerator>>,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        let filter = CandidateFilter::new(&config.candidate_policy)?;
        Ok(Self {
            config,
            registry: TemplateRegistry::standard(),
            filter,
            generator: None,
        })
    }

    pub fn with_generator(mut self, generator: Box<dyn NoteGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs every pass over one document. Nothing is returned unless the
    /// result satisfies both the contract and the frozen skeleton.
    pub fn annotate(&self, parses: &[ParsedSentence]) -> Result<Annotated, PipelineError> {
        let mut seen = HashSet::new();
        for parsed in parses {
            if !seen.insert(parsed.text.as_str()) {
                warn!("duplicate sentence in input: {:?}", parsed.text);
                return Err(PipelineError::DuplicateSentence(parsed.text.clone()));
            }
        }

        let mut document = SkeletonBuilder::new().build_document(parses)?;
        let skeleton = FrozenSkeleton::capture(&document)?;

        gloss_tam::annotate_document(&mut document, parses);

        let mut assigner = NoteAssigner::new(&self.registry).with_gates(self.config.note_gates);
        if let Some(generator) = self.generator.as_deref() {
            assigner = assigner.with_generator(generator);
        }
        let nodes = assigner.annotate_document(&mut document);

        let mut rejected_candidates = 0;
        for sentence in document.sentences_mut() {
            rejected_candidates += collect_rejected_candidates(&self.filter, sentence);
        }

        self.validate(&skeleton, &document)?;

        let summary = AnnotationSummary {
            sentences: document.len(),
            nodes,
            backoff_nodes: document
                .sentences()
                .filter_map(|sentence| sentence.backoff_summary)
                .map(|summary| summary.backoff_nodes)
                .sum(),
            rejected_candidates,
        };
        info!(
            "annotated {} sentences ({} nodes, {} via backoff, {} rejected candidates)",
            summary.sentences, summary.nodes, summary.backoff_nodes, summary.rejected_candidates
        );
        Ok(Annotated {
            document,
            skeleton,
            summary,
        })
    }

    /// Contract check under the configured mode, then the frozen diff.
    pub fn validate(&self, skeleton: &FrozenSkeleton, document: &Document) -> Result<(), PipelineError> {
        ensure_document(document, self.config.validation_mode)?;
        skeleton.verify(document)?;
        Ok(())
    }

    /// Annotates independent documents, in parallel unless disabled in the
    /// config. Results keep the input order.
    pub fn annotate_batch(&self, documents: &[Vec<ParsedSentence>]) -> Vec<Result<Annotated, PipelineError>> {
        if self.config.parallel {
            documents.par_iter().map(|parses| self.annotate(parses)).collect()
        } else {
            documents.iter().map(|parses| self.annotate(parses)).collect()
        }
    }
}

/// Number of nodes carrying the backoff flag in a document.
pub fn count_backoff(document: &Document) -> usize {
    let mut count = 0;
    for sentence in document.sentences() {
        sentence.walk(&mut |node| {
            if node.has_flag(BACKOFF_USED) {
                count += 1;
            }
        });
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_protocol::{fixtures, NodeType, NoteSource, ValidationMode};
    use gloss_templates::NoteRequest;

    fn pipeline() -> Pipeline {
        Pipeline::new(PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_fixtures_annotate_cleanly() {
        let annotated = pipeline().annotate(&fixtures::all()).unwrap();
        let document = &annotated.document;
        assert_eq!(document.len(), 6);
        assert_eq!(annotated.summary.sentences, 6);
        assert_eq!(annotated.summary.nodes, document.node_count());
        assert_eq!(annotated.summary.backoff_nodes, count_backoff(document));
        assert_eq!(annotated.skeleton.sentence_count(), 6);
        for sentence in document.sentences() {
            sentence.walk(&mut |node| {
                assert!(node.template_selection.is_some());
                assert_eq!(node.notes.len(), 1);
            });
            assert!(sentence.backoff_summary.is_some());
        }
    }

    #[test]
    fn test_scenarios() {
        let annotated = pipeline().annotate(&fixtures::all()).unwrap();
        let document = &annotated.document;

        let modal = document.get("She should have trusted her instincts.").unwrap();
        assert_eq!(modal.tense, None);
        assert_eq!(modal.aspect.as_deref(), Some("perfect"));
        assert_eq!(modal.mood.as_deref(), Some("modal"));
        assert_eq!(modal.tam_construction, "modal_perfect");

        let past = document.get("She had trusted her instincts.").unwrap();
        assert_eq!(past.tense.as_deref(), Some("past perfect"));
        assert_eq!(past.mood.as_deref(), Some("indicative"));
        assert_eq!(past.tam_construction, "past_perfect");

        let passive = document.get("The car was repaired yesterday.").unwrap();
        assert_eq!(passive.tense.as_deref(), Some("past"));
        assert_eq!(passive.voice.as_deref(), Some("passive"));
        assert_eq!(passive.finiteness.as_deref(), Some("finite"));
        assert_eq!(passive.aspect.as_deref(), Some("simple"));

        let future = document.get("The report will be submitted tomorrow.").unwrap();
        assert_eq!(future.tense.as_deref(), Some("future"));
        assert_eq!(future.mood.as_deref(), Some("modal"));
    }

    #[test]
    fn test_words_carry_no_tam() {
        let annotated = pipeline().annotate(&fixtures::all()).unwrap();
        for sentence in annotated.document.sentences() {
            sentence.walk(&mut |node| {
                if node.node_type == NodeType::Word {
                    assert_eq!(node.mood, None);
                    assert_eq!(node.tam_construction, "none");
                }
            });
        }
    }

    #[test]
    fn test_duplicate_sentences_abort() {
        let parses = vec![fixtures::had_trusted(), fixtures::had_trusted()];
        match pipeline().annotate(&parses) {
            Err(PipelineError::DuplicateSentence(text)) => assert_eq!(text, "She had trusted her instincts."),
            other => panic!("expected a duplicate error, got {:?}", other.map(|a| a.summary)),
        }
    }

    #[test]
    fn test_structural_rewrite_is_refused() {
        let pipeline = pipeline();
        let annotated = pipeline.annotate(&[fixtures::car_was_repaired()]).unwrap();
        let mut document = annotated.document.clone();
        if let Some(sentence) = document.get_mut("The car was repaired yesterday.") {
            sentence.linguistic_elements[0].linguistic_elements[0].content = "A".to_string();
        }
        match pipeline.validate(&annotated.skeleton, &document) {
            Err(PipelineError::Contract(ContractError::FrozenViolation { issues })) => {
                assert_eq!(issues.len(), 1);
                assert!(issues[0].path.ends_with(".linguistic_elements[0].linguistic_elements[0].content"));
            }
            other => panic!("expected a frozen violation, got {other:?}"),
        }
    }

    struct Repetitive;

    impl NoteGenerator for Repetitive {
        fn generate(&self, request: &NoteRequest<'_>) -> Option<String> {
            match request.node_type {
                NodeType::Word => Some("A generated explanation of the verb.".to_string()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_rejected_generator_output_is_summarized() {
        let pipeline = pipeline().with_generator(Box::new(Repetitive));
        let annotated = pipeline.annotate(&[fixtures::is_not_running()]).unwrap();
        let sentence = annotated.document.get("She is not running.").unwrap();

        // The first word's candidate is accepted; every later word repeats it.
        let stats = sentence.rejected_candidate_stats.as_ref().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].text, "A generated explanation of the verb.");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].reasons, vec!["note_duplicate"]);
        assert_eq!(annotated.summary.rejected_candidates, 1);

        let mut sources = Vec::new();
        sentence.walk(&mut |node| sources.extend(node.notes.iter().map(|n| n.source)));
        assert!(sources.contains(&NoteSource::Model));
    }

    #[test]
    fn test_batches_match_sequential_runs() {
        let batches: Vec<Vec<ParsedSentence>> = fixtures::all().into_iter().map(|p| vec![p]).collect();
        let parallel = pipeline().annotate_batch(&batches);

        let config = PipelineConfig {
            parallel: false,
            validation_mode: ValidationMode::V1,
            ..PipelineConfig::default()
        };
        let sequential = Pipeline::new(config).unwrap().annotate_batch(&batches);

        assert_eq!(parallel.len(), sequential.len());
        for (a, b) in parallel.iter().zip(&sequential) {
            let (a, b) = (a.as_ref().unwrap(), b.as_ref().unwrap());
            assert_eq!(a.document, b.document);
            assert_eq!(a.summary, b.summary);
        }
    }
}
