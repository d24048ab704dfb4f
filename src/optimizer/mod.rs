//! Optimization pipeline
//!
//! Runs every analysis agent concurrently, synthesizes the weighted score,
//! then runs the cover letter and rewrite phases in sequence.
//!
//! ## Phases
//!
//! 1. Fan-out: all scheduled agents start together, each bounded by the agent
//!    timeout and guarded against errors and panics
//! 2. Synthesis and action compilation (strictly after every agent resolved)
//! 3. Cover letter (optional, bounded)
//! 4. CV rewrite (optional, needs a model, bounded, falls back to templates)
//!
//! No phase can fail the run: every failure is replaced by a degraded output
//! or a deterministic artifact, so [`Optimizer::optimize`] returns the result
//! directly.

mod actions;
mod progress;
mod recovery;
mod result;
mod synthesis;
mod variants;

pub use actions::compile_actions;
pub use progress::{NoProgress, ProgressSink};
pub use recovery::panic_is_contained;
pub use result::{OptimizationResult, RunMetadata};
pub use synthesis::{Summary, Tier, interview_probability, overall_score, synthesize};
pub use variants::{CvVariants, FallbackVariants};

use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::{
    Agent, AgentKind, AgentOutput, AgentRegistry, AgentRuntime, AnalysisContext, CvVariant,
    RewriteHints, extract_variant,
};
use crate::ai::provider::{CredentialSource, ProviderResolver, ResolvedProvider};
use crate::ai::timeout::{TimeoutConfig, with_timeout_map};
use crate::config::{Config, RetryConfig};
use crate::constants::orchestration::COVER_LETTER_FAILED;
use crate::constants::progress as milestones;
use crate::constants::scoring::SUMMARY_ACTION_ITEMS;
use recovery::ContainedScope;

/// How one guarded agent call ended
enum AgentRun {
    Completed(AgentOutput),
    Failed(String),
    TimedOut,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("agent panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("agent panicked: {}", s)
    } else {
        "agent panicked".to_string()
    }
}

/// Run one agent under a timeout, converting errors and panics
async fn guarded_run(
    agent: &dyn Agent,
    cv: &str,
    jd: &str,
    ctx: &AnalysisContext,
    limit: Duration,
) -> AgentRun {
    let kind = agent.kind();
    let mut analysis = agent.analyze(cv, jd, ctx);
    let tracked = futures::future::poll_fn(move |cx| {
        let _scope = ContainedScope::enter();
        analysis.as_mut().poll(cx)
    });
    let call = AssertUnwindSafe(tracked).catch_unwind();
    match with_timeout_map(limit, call, kind.key()).await {
        Ok(Ok(Ok(output))) => AgentRun::Completed(output),
        Ok(Ok(Err(e))) => AgentRun::Failed(e.to_string()),
        Ok(Err(payload)) => AgentRun::Failed(panic_message(payload.as_ref())),
        Err(_) => AgentRun::TimedOut,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Missing keywords from the algorithm breaker's `Missing Keywords:` finding
fn missing_keywords(outputs: &BTreeMap<AgentKind, AgentOutput>) -> Vec<String> {
    outputs
        .get(&AgentKind::AlgorithmBreaker)
        .and_then(|o| o.findings.iter().find(|f| f.starts_with("Missing Keywords:")))
        .and_then(|f| f.rsplit(':').next())
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty() && *k != "None")
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn rewrite_hints(
    outputs: &BTreeMap<AgentKind, AgentOutput>,
    summary: &Summary,
    actions: &[String],
) -> RewriteHints {
    RewriteHints {
        missing_keywords: missing_keywords(outputs),
        overall_score: summary.overall_score,
        top_fixes: actions.iter().take(SUMMARY_ACTION_ITEMS).cloned().collect(),
    }
}

/// Multi-agent CV optimizer
pub struct Optimizer {
    registry: AgentRegistry,
    resolved: ResolvedProvider,
    timeouts: TimeoutConfig,
}

impl std::fmt::Debug for Optimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Optimizer")
            .field("registry", &self.registry)
            .field("resolved", &self.resolved)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl Optimizer {
    pub fn new(resolved: ResolvedProvider, retry: RetryConfig, timeouts: TimeoutConfig) -> Self {
        let runtime = AgentRuntime::new(resolved.provider.clone(), retry);
        Self {
            registry: AgentRegistry::new(runtime),
            resolved,
            timeouts,
        }
    }

    /// Resolve a backend from `creds` and apply the configured timeouts and retry policy
    pub fn from_config(config: &Config, creds: &dyn CredentialSource) -> Self {
        let resolved = ProviderResolver::resolve(creds, &config.llm);
        Self::new(
            resolved,
            config.retry.clone(),
            TimeoutConfig::from(&config.orchestration),
        )
    }

    /// No backend: every agent runs on heuristics only
    pub fn rule_based() -> Self {
        Self::new(
            ResolvedProvider::rule_based(),
            RetryConfig::default(),
            TimeoutConfig::default(),
        )
    }

    /// Replace the agent set, e.g. to swap one slot in tests
    pub fn with_registry(mut self, registry: AgentRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn ai_mode(&self) -> bool {
        self.resolved.is_ai()
    }

    pub fn provider_label(&self) -> &str {
        &self.resolved.provider_label
    }

    pub fn model_label(&self) -> &str {
        &self.resolved.model_label
    }

    async fn run_one(
        &self,
        agent: Arc<dyn Agent>,
        cv: &str,
        jd: &str,
        ctx: &AnalysisContext,
    ) -> (AgentKind, AgentOutput) {
        let kind = agent.kind();
        let output = match guarded_run(agent.as_ref(), cv, jd, ctx, self.timeouts.agent).await {
            AgentRun::Completed(output) => {
                info!(
                    "[{}] {}/100 ({}ms)",
                    kind,
                    output.score(),
                    output.execution_ms
                );
                output
            }
            AgentRun::Failed(message) => {
                warn!("[{}] failed: {}", kind, message);
                AgentOutput::failed(kind, &message)
            }
            AgentRun::TimedOut => {
                warn!("[{}] timed out after {:?}", kind, self.timeouts.agent);
                AgentOutput::timed_out(kind)
            }
        };
        (kind, output)
    }

    /// Run every scheduled analysis agent concurrently.
    ///
    /// Returns exactly one output per scheduled agent. Progress is reported
    /// once up front and once per completion, in completion order.
    pub async fn run_all(
        &self,
        cv: &str,
        jd: &str,
        ctx: &AnalysisContext,
        progress: &dyn ProgressSink,
    ) -> BTreeMap<AgentKind, AgentOutput> {
        let agents = self.registry.analysis_agents(ctx);
        let total = agents.len();
        progress.report(
            milestones::START,
            &format!(
                "Launching {} specialist agents ({} mode)",
                total, self.resolved.provider_label
            ),
        );

        let mut pending: FuturesUnordered<_> = agents
            .into_iter()
            .map(|agent| self.run_one(agent, cv, jd, ctx))
            .collect();

        let mut outputs = BTreeMap::new();
        while let Some((kind, output)) = pending.next().await {
            outputs.insert(kind, output);
            let completed = outputs.len();
            progress.report(
                milestones::START + completed as f32 / total as f32 * milestones::FAN_OUT_SPAN,
                &format!("{} complete ({}/{})", kind.label(), completed, total),
            );
        }
        outputs
    }

    async fn cover_letter(&self, cv: &str, jd: &str, ctx: &AnalysisContext) -> String {
        let Some(agent) = self.registry.get(AgentKind::CoverLetter) else {
            warn!("Cover letter agent not registered");
            return COVER_LETTER_FAILED.to_string();
        };
        match guarded_run(agent.as_ref(), cv, jd, ctx, self.timeouts.cover_letter).await {
            AgentRun::Completed(output) => output.optimized_content,
            AgentRun::Failed(message) => {
                warn!("Cover letter failed: {}", message);
                COVER_LETTER_FAILED.to_string()
            }
            AgentRun::TimedOut => {
                warn!(
                    "Cover letter timed out after {:?}",
                    self.timeouts.cover_letter
                );
                COVER_LETTER_FAILED.to_string()
            }
        }
    }

    /// Model rewrite with per-variant fallback
    async fn rewrite(
        &self,
        cv: &str,
        jd: &str,
        ctx: &AnalysisContext,
        fallback: &FallbackVariants<'_>,
    ) -> CvVariants {
        let Some(agent) = self.registry.get(AgentKind::CvRewriter) else {
            warn!("CV rewriter not registered, using template variants");
            return fallback.all();
        };
        let content = match guarded_run(agent.as_ref(), cv, jd, ctx, self.timeouts.rewrite).await
        {
            AgentRun::Completed(output) => output.optimized_content,
            AgentRun::Failed(message) => {
                warn!("CV rewrite failed: {}", message);
                return fallback.all();
            }
            AgentRun::TimedOut => {
                warn!("CV rewrite timed out after {:?}", self.timeouts.rewrite);
                return fallback.all();
            }
        };

        let mut variants = CvVariants::default();
        for variant in CvVariant::ALL {
            let text = extract_variant(&content, variant);
            if text.trim().is_empty() {
                info!("{} variant empty, using template", variant);
                variants.set(variant, fallback.build(variant));
            } else {
                variants.set(variant, text);
            }
        }
        variants
    }

    /// Full pipeline: fan-out, synthesis, cover letter, rewrite, actions.
    pub async fn optimize(
        &self,
        cv: &str,
        jd: &str,
        ctx: &AnalysisContext,
        progress: &dyn ProgressSink,
    ) -> OptimizationResult {
        let started = Instant::now();
        let outputs = self.run_all(cv, jd, ctx, progress).await;

        progress.report(milestones::SYNTHESIS, "Synthesizing results");
        let actions = compile_actions(&outputs);
        let summary = synthesize(&outputs, ctx, &actions);
        info!(
            "Overall {:.1}/100 ({}), {} AI-powered agents",
            summary.overall_score, summary.recommended_variant, summary.ai_powered_count
        );

        let cover_letter = if ctx.generate_cover_letter {
            progress.report(milestones::COVER_LETTER, "Writing cover letter");
            self.cover_letter(cv, jd, ctx).await
        } else {
            String::new()
        };

        let date = chrono::Local::now().format("%d %B %Y").to_string();
        let fallback = FallbackVariants::new(cv, &outputs, summary.overall_score, &date);
        let ai_rewrite = ctx.rewrite_cv && self.ai_mode();
        let cv_variants = if ai_rewrite {
            progress.report(milestones::REWRITE, "AI rewriting 3 CV variants");
            let hinted = ctx.with_rewrite_hints(rewrite_hints(&outputs, &summary, &actions));
            self.rewrite(cv, jd, &hinted, &fallback).await
        } else {
            fallback.all()
        };

        progress.report(milestones::ACTIONS, "Compiling priority action items");
        let elapsed = round1(started.elapsed().as_secs_f64());
        progress.report(milestones::DONE, &format!("Done in {:.1}s", elapsed));
        info!("Optimization complete in {:.1}s", elapsed);

        let agents_run = outputs.len();
        OptimizationResult {
            summary,
            agent_results: outputs,
            cv_variants,
            cover_letter,
            action_items: actions,
            ai_mode: self.ai_mode(),
            llm_provider: self.resolved.provider_label.clone(),
            llm_model: self.resolved.model_label.clone(),
            metadata: RunMetadata {
                run_id: Uuid::new_v4(),
                execution_seconds: elapsed,
                timestamp: chrono::Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                agents_run,
                ai_rewrite,
                cover_letter_generated: ctx.generate_cover_letter,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::testing::{StubBehavior, StubProvider};
    use crate::types::{KarooError, Result};
    use async_trait::async_trait;
    use progress::testing::RecordingProgress;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    const CV: &str = "Sipho Ndlovu\nsipho@example.co.za | +27 82 555 0101\n\
                      Senior Data Engineer, 9 years\n\
                      - Increased pipeline throughput by 40% for 3 million users\n\
                      - Led a team of 6 engineers delivering a Spark platform\n\
                      EDUCATION\nBSc Computer Science (NQF Level 7)";
    const JD: &str = "Acme Bank is hiring a Senior Data Engineer.\n\
                      Requirements: Python, Spark, Kafka, Terraform, stakeholder management.";

    struct FailingAgent(AgentKind);

    #[async_trait]
    impl Agent for FailingAgent {
        fn kind(&self) -> AgentKind {
            self.0
        }

        async fn analyze(&self, _cv: &str, _jd: &str, _ctx: &AnalysisContext) -> Result<AgentOutput> {
            Err(KarooError::agent(self.0.key(), "upstream exploded"))
        }
    }

    struct PanickingAgent(AgentKind);

    #[async_trait]
    impl Agent for PanickingAgent {
        fn kind(&self) -> AgentKind {
            self.0
        }

        async fn analyze(&self, _cv: &str, _jd: &str, _ctx: &AnalysisContext) -> Result<AgentOutput> {
            panic!("boom");
        }
    }

    /// Records whether its body ran inside a contained scope
    struct ScopeRecordingAgent(AgentKind, Arc<AtomicBool>);

    #[async_trait]
    impl Agent for ScopeRecordingAgent {
        fn kind(&self) -> AgentKind {
            self.0
        }

        async fn analyze(&self, _cv: &str, _jd: &str, _ctx: &AnalysisContext) -> Result<AgentOutput> {
            tokio::task::yield_now().await;
            self.1.store(panic_is_contained(), Ordering::SeqCst);
            Ok(AgentOutput::new(self.0, 60))
        }
    }

    struct SleepingAgent(AgentKind, Duration);

    #[async_trait]
    impl Agent for SleepingAgent {
        fn kind(&self) -> AgentKind {
            self.0
        }

        async fn analyze(&self, _cv: &str, _jd: &str, _ctx: &AnalysisContext) -> Result<AgentOutput> {
            tokio::time::sleep(self.1).await;
            Ok(AgentOutput::new(self.0, 99))
        }
    }

    /// Rewriter that records its hints and only answers ATS-MAX
    #[derive(Default)]
    struct CapturingRewriter {
        hints: Mutex<Option<RewriteHints>>,
    }

    #[async_trait]
    impl Agent for CapturingRewriter {
        fn kind(&self) -> AgentKind {
            AgentKind::CvRewriter
        }

        async fn analyze(&self, _cv: &str, _jd: &str, ctx: &AnalysisContext) -> Result<AgentOutput> {
            *self.hints.lock().unwrap() = ctx.rewrite_hints.clone();
            Ok(AgentOutput::new(AgentKind::CvRewriter, 85)
                .with_findings(vec!["CV Rewrite: AI-Powered".into()])
                .with_content("ATS_MAX_CV_START\nSipho Ndlovu\nData Engineer\nATS_MAX_CV_END"))
        }
    }

    fn stub_resolved(behavior: StubBehavior) -> ResolvedProvider {
        ResolvedProvider {
            provider: Some(Arc::new(StubProvider::new(behavior))),
            provider_label: "Stub".to_string(),
            model_label: "stub-model".to_string(),
        }
    }

    fn quick_retry() -> RetryConfig {
        RetryConfig {
            max_retries: 0,
            base_delay_ms: 1,
        }
    }

    #[tokio::test]
    async fn test_fan_out_survives_failure_and_timeout() {
        let optimizer = Optimizer::rule_based();
        let registry = optimizer
            .registry()
            .clone()
            .replace(Arc::new(FailingAgent(AgentKind::SemanticMatcher)))
            .replace(Arc::new(SleepingAgent(
                AgentKind::FutureArchitect,
                Duration::from_secs(5),
            )));
        let optimizer = optimizer
            .with_registry(registry)
            .with_timeouts(TimeoutConfig::uniform(Duration::from_millis(100)));

        let outputs = optimizer
            .run_all(CV, JD, &AnalysisContext::default(), &NoProgress)
            .await;

        assert_eq!(outputs.len(), 10);
        let failed = &outputs[&AgentKind::SemanticMatcher];
        assert_eq!(failed.score(), 50);
        assert!(failed.findings[0].starts_with("Error: "));
        assert_eq!(failed.recommendations, vec!["Check API key configuration"]);

        let slow = &outputs[&AgentKind::FutureArchitect];
        assert_eq!(slow.findings, vec!["Agent timed out"]);
        assert_eq!(slow.weight, 1.0);
        assert!(!slow.ai_powered);
    }

    #[tokio::test]
    async fn test_panicking_agent_is_contained() {
        let optimizer = Optimizer::rule_based();
        let registry = optimizer
            .registry()
            .clone()
            .replace(Arc::new(PanickingAgent(AgentKind::HiringManager)));
        let outputs = optimizer
            .with_registry(registry)
            .run_all(CV, JD, &AnalysisContext::default(), &NoProgress)
            .await;
        assert_eq!(outputs.len(), 10);
        assert_eq!(
            outputs[&AgentKind::HiringManager].findings,
            vec!["Error: agent panicked: boom"]
        );
    }

    #[tokio::test]
    async fn test_agent_polls_are_marked_contained() {
        let seen = Arc::new(AtomicBool::new(false));
        let optimizer = Optimizer::rule_based();
        let registry = optimizer.registry().clone().replace(Arc::new(ScopeRecordingAgent(
            AgentKind::SaSpecialist,
            seen.clone(),
        )));
        let outputs = optimizer
            .with_registry(registry)
            .run_all(CV, JD, &AnalysisContext::default(), &NoProgress)
            .await;
        assert_eq!(outputs[&AgentKind::SaSpecialist].score(), 60);
        assert!(seen.load(Ordering::SeqCst));
        assert!(!panic_is_contained());
    }

    #[tokio::test]
    async fn test_core_only_runs_eight() {
        let ctx = AnalysisContext {
            run_optional_agents: false,
            ..Default::default()
        };
        let outputs = Optimizer::rule_based()
            .run_all(CV, JD, &ctx, &NoProgress)
            .await;
        assert_eq!(outputs.len(), 8);
        assert!(!outputs.contains_key(&AgentKind::SalaryIntelligence));
    }

    #[tokio::test]
    async fn test_progress_is_monotonic_and_finishes() {
        let sink = RecordingProgress::default();
        Optimizer::rule_based()
            .optimize(CV, JD, &AnalysisContext::default(), &sink)
            .await;
        let reports = sink.reports();

        assert_eq!(reports.first().map(|r| r.0), Some(milestones::START));
        assert_eq!(reports.last().map(|r| r.0), Some(milestones::DONE));
        assert!(reports.windows(2).all(|w| w[0].0 <= w[1].0));
        let completions = reports
            .iter()
            .filter(|(_, m)| m.contains("complete ("))
            .count();
        assert_eq!(completions, 10);
        assert!(reports.iter().any(|(_, m)| m.ends_with("(10/10)")));
        assert!(reports.last().unwrap().1.starts_with("Done in "));
    }

    #[tokio::test]
    async fn test_rule_based_run_end_to_end() {
        let result = Optimizer::rule_based()
            .optimize(CV, JD, &AnalysisContext::default(), &NoProgress)
            .await;

        assert!(!result.ai_mode);
        assert_eq!(result.llm_provider, "Rule-Based");
        assert_eq!(result.llm_model, "None");
        assert_eq!(result.summary.ai_powered_count, 0);
        assert!(result.action_items.len() <= 18);
        assert_eq!(
            result.summary.top_action_items,
            result.action_items.iter().take(5).cloned().collect::<Vec<_>>()
        );
        assert!(result.cover_letter.starts_with("Dear Hiring Manager,"));
        for variant in CvVariant::ALL {
            assert!(result.cv_variants.get(variant).contains("Sipho Ndlovu"));
        }
        assert_eq!(result.metadata.agents_run, 10);
        assert!(!result.metadata.ai_rewrite);
        assert!(result.metadata.cover_letter_generated);
        assert_eq!(result.metadata.version, env!("CARGO_PKG_VERSION"));

        let json = result.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["agent_results"]["algorithm_breaker"]["findings"].is_array());
        assert!(value["cv_variants"]["ats_max"].is_string());
    }

    #[tokio::test]
    async fn test_disabled_phases() {
        let ctx = AnalysisContext {
            generate_cover_letter: false,
            rewrite_cv: false,
            ..Default::default()
        };
        let sink = RecordingProgress::default();
        let result = Optimizer::rule_based().optimize(CV, JD, &ctx, &sink).await;
        assert_eq!(result.cover_letter, "");
        assert!(!result.metadata.cover_letter_generated);
        assert!(result.cv_variants.balanced.contains("BALANCED VARIANT"));
        assert!(
            !sink
                .reports()
                .iter()
                .any(|(f, _)| *f == milestones::COVER_LETTER || *f == milestones::REWRITE)
        );
    }

    #[tokio::test]
    async fn test_cover_letter_failure_uses_placeholder() {
        let optimizer = Optimizer::rule_based();
        let registry = optimizer
            .registry()
            .clone()
            .replace(Arc::new(FailingAgent(AgentKind::CoverLetter)));
        let result = optimizer
            .with_registry(registry)
            .optimize(CV, JD, &AnalysisContext::default(), &NoProgress)
            .await;
        assert_eq!(result.cover_letter, COVER_LETTER_FAILED);
    }

    #[tokio::test]
    async fn test_rewrite_timeout_falls_back_to_templates() {
        let resolved = stub_resolved(StubBehavior::Sleep(
            Duration::from_millis(200),
            "ATS_SCORE: 70".to_string(),
        ));
        let timeouts = TimeoutConfig {
            agent: Duration::from_secs(5),
            cover_letter: Duration::from_secs(5),
            rewrite: Duration::from_millis(20),
        };
        let result = Optimizer::new(resolved, quick_retry(), timeouts)
            .optimize(CV, JD, &AnalysisContext::default(), &NoProgress)
            .await;

        assert!(result.ai_mode);
        assert!(result.metadata.ai_rewrite);
        for variant in CvVariant::ALL {
            let text = result.cv_variants.get(variant);
            assert!(!text.is_empty());
            assert!(text.contains("Sipho Ndlovu"));
            assert!(text.contains("YOUR ORIGINAL CV"));
        }
    }

    #[tokio::test]
    async fn test_rewrite_receives_hints_and_fills_missing_variants() {
        let rewriter = Arc::new(CapturingRewriter::default());
        let optimizer = Optimizer::new(
            stub_resolved(StubBehavior::Reply("nothing structured".to_string())),
            quick_retry(),
            TimeoutConfig::default(),
        );
        let registry = optimizer.registry().clone().replace(rewriter.clone());
        let result = optimizer
            .with_registry(registry)
            .optimize(CV, JD, &AnalysisContext::default(), &NoProgress)
            .await;

        assert_eq!(result.cv_variants.ats_max, "Sipho Ndlovu\nData Engineer");
        assert!(result.cv_variants.balanced.contains("BALANCED VARIANT"));
        assert!(result.cv_variants.creative.contains("CREATIVE VARIANT"));

        let hints = rewriter.hints.lock().unwrap().clone().unwrap();
        assert_eq!(hints.overall_score, result.summary.overall_score);
        assert_eq!(hints.top_fixes, result.summary.top_action_items);
        assert!(hints.missing_keywords.contains(&"kafka".to_string()));
        assert!(!hints.missing_keywords.iter().any(|k| k == "None"));
    }

    #[test]
    fn test_missing_keywords_parse() {
        let mut outputs = BTreeMap::new();
        outputs.insert(
            AgentKind::AlgorithmBreaker,
            AgentOutput::new(AgentKind::AlgorithmBreaker, 40)
                .with_findings(vec!["Missing Keywords: kafka, terraform".into()]),
        );
        assert_eq!(missing_keywords(&outputs), vec!["kafka", "terraform"]);

        outputs.insert(
            AgentKind::AlgorithmBreaker,
            AgentOutput::new(AgentKind::AlgorithmBreaker, 40)
                .with_findings(vec!["Missing Keywords: None".into()]),
        );
        assert!(missing_keywords(&outputs).is_empty());
    }

    #[test]
    fn test_from_config_without_keys_is_rule_based() {
        let creds: std::collections::HashMap<String, String> = Default::default();
        let optimizer = Optimizer::from_config(&Config::default(), &creds);
        assert!(!optimizer.ai_mode());
        assert_eq!(optimizer.provider_label(), "Rule-Based");
    }
}
