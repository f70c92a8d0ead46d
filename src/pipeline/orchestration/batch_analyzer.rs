use crate::classes::ClassRegistry;
use crate::common::MaskSource;
use crate::error::{AnalysisError, BatchProcessingError, FileFailure};
use crate::pipeline::decode::{ChannelEncoding, ClassEncoding, MaskDecoder};
use crate::pipeline::domain::AnalysisResult;
use crate::pipeline::orchestration::mask_analyzer::MaskAnalyzer;
use crate::pipeline::orchestration::service::analyzer_service::AnalyzerService;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower::util::BoxCloneSyncService;
use tower::{BoxError, Service, ServiceBuilder, ServiceExt};
use tracing::{debug, info, warn};

const DEFAULT_MAX_CONCURRENCY: usize = 8;

type AnalyzerStack = BoxCloneSyncService<Arc<dyn MaskSource>, AnalysisResult, BoxError>;

pub struct BatchAnalyzerBuilder {
    registry: Arc<ClassRegistry>,
    encoding: Box<dyn ClassEncoding>,
    max_concurrency: usize,
    decode_timeout: Option<Duration>,
}

impl BatchAnalyzerBuilder {
    pub fn new(registry: Arc<ClassRegistry>) -> Self {
        Self {
            registry,
            encoding: Box::new(ChannelEncoding::red()),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            decode_timeout: None,
        }
    }

    // Sets how pixels map to class values, red channel by default.
    pub fn encoding(mut self, encoding: Box<dyn ClassEncoding>) -> Self {
        self.encoding = encoding;
        self
    }

    // Upper bound on files analyzed at the same time.
    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Per-file limit covering load and analysis. A file that times out fails
    /// the batch, but its blocking decode is detached rather than aborted and
    /// runs to completion on the blocking pool.
    pub fn decode_timeout(mut self, decode_timeout: Duration) -> Self {
        self.decode_timeout = Some(decode_timeout);
        self
    }

    pub fn build(self) -> BatchAnalyzer {
        let analyzer = MaskAnalyzer::new(self.registry.clone(), MaskDecoder::new(self.encoding));

        let stack = ServiceBuilder::new()
            .concurrency_limit(self.max_concurrency)
            .option_layer(self.decode_timeout.map(TimeoutLayer::new))
            .service(AnalyzerService::new(analyzer));

        BatchAnalyzer {
            registry: self.registry,
            service: BoxCloneSyncService::new(stack),
        }
    }
}

/// Analyzes a batch of masks concurrently and returns results in input order.
///
/// The batch is all-or-nothing: if any input fails, no results are returned
/// and the failures are collected into one [`BatchProcessingError`].
pub struct BatchAnalyzer {
    registry: Arc<ClassRegistry>,
    service: AnalyzerStack,
}

impl BatchAnalyzer {
    pub fn builder(registry: Arc<ClassRegistry>) -> BatchAnalyzerBuilder {
        BatchAnalyzerBuilder::new(registry)
    }

    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    pub async fn analyze(
        &self,
        sources: Vec<Arc<dyn MaskSource>>,
    ) -> Result<Vec<AnalysisResult>, BatchProcessingError> {
        let start = Instant::now();
        let total = sources.len();

        let calls = sources.into_iter().map(|source| {
            let filename = source.filename().to_string();
            let mut service = self.service.clone();
            async move {
                debug!("Analyzing {}", filename);
                // Equivalent to `oneshot`, whose `S: Service<Req>` struct bound
                // defeats the `Send` check for callers spawning this future.
                let outcome = match service.ready().await {
                    Ok(service) => service.call(source).await,
                    Err(e) => Err(e),
                };
                outcome.map_err(|e| into_analysis_error(filename, e))
            }
        });

        // Join everything first, then assemble in input order.
        let outcomes = join_all(calls).await;

        let mut results = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Mask {} of {} failed: {}", index + 1, total, e);
                    failures.push(FileFailure {
                        index,
                        filename: e.filename().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(BatchProcessingError::new(failures));
        }

        info!(
            "Analyzed {} masks in {}ms",
            results.len(),
            start.elapsed().as_millis()
        );
        Ok(results)
    }
}

fn into_analysis_error(filename: String, error: BoxError) -> AnalysisError {
    match error.downcast::<AnalysisError>() {
        Ok(e) => *e,
        Err(other) if other.is::<Elapsed>() => AnalysisError::TimedOut { filename },
        Err(other) => AnalysisError::Worker {
            filename,
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::common::MaskInput;
    use crate::pipeline::decode::decoder::tests::png_mask;
    use async_trait::async_trait;

    /// Source that takes a while to "load", to scramble completion order.
    pub(crate) struct SlowSource {
        pub(crate) input: MaskInput,
        pub(crate) delay: Duration,
    }

    #[async_trait]
    impl MaskSource for SlowSource {
        fn filename(&self) -> &str {
            self.input.filename()
        }

        async fn load(&self) -> Result<MaskInput, AnalysisError> {
            tokio::time::sleep(self.delay).await;
            Ok(self.input.clone())
        }
    }

    fn analyzer() -> BatchAnalyzer {
        BatchAnalyzer::builder(Arc::new(ClassRegistry::grandqc())).build()
    }

    fn mask(name: &str, values: &[u8]) -> Arc<dyn MaskSource> {
        Arc::new(MaskInput::new(name, png_mask(values.len() as u32, 1, values)))
    }

    #[tokio::test]
    async fn preserves_input_order_regardless_of_latency() {
        let sources: Vec<Arc<dyn MaskSource>> = vec![
            Arc::new(SlowSource {
                input: MaskInput::new("slow_mask.png", png_mask(1, 1, &[1])),
                delay: Duration::from_millis(60),
            }),
            Arc::new(SlowSource {
                input: MaskInput::new("fast_mask.png", png_mask(1, 1, &[2])),
                delay: Duration::from_millis(1),
            }),
            mask("instant_mask.png", &[3]),
        ];

        let results = analyzer().analyze(sources).await.unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.filename()).collect();
        assert_eq!(names, vec!["slow_mask.png", "fast_mask.png", "instant_mask.png"]);
        assert_eq!(results[0].percentage(1), Some(100.0));
        assert_eq!(results[1].percentage(2), Some(100.0));
        assert_eq!(results[2].percentage(3), Some(100.0));
    }

    #[tokio::test]
    async fn one_corrupt_file_fails_the_whole_batch() {
        let sources = vec![
            mask("first_mask.png", &[1, 2]),
            Arc::new(MaskInput::new("second_mask.png", b"garbage".to_vec())) as Arc<dyn MaskSource>,
            mask("third_mask.png", &[4, 5]),
        ];

        let error = analyzer().analyze(sources).await.unwrap_err();
        assert_eq!(error.failures().len(), 1);
        assert_eq!(error.failures()[0].index, 1);
        assert_eq!(error.failures()[0].filename, "second_mask.png");
        assert!(!error.to_string().contains("second_mask.png"));
    }

    #[tokio::test]
    async fn empty_batch_is_empty_result() {
        let results = analyzer().analyze(Vec::new()).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn slow_sources_time_out() {
        let analyzer = BatchAnalyzer::builder(Arc::new(ClassRegistry::grandqc()))
            .max_concurrency(2)
            .decode_timeout(Duration::from_millis(20))
            .build();
        let sources: Vec<Arc<dyn MaskSource>> = vec![Arc::new(SlowSource {
            input: MaskInput::new("stuck_mask.png", png_mask(1, 1, &[1])),
            delay: Duration::from_secs(5),
        })];

        let error = analyzer.analyze(sources).await.unwrap_err();
        assert_eq!(error.failures()[0].filename, "stuck_mask.png");
        assert!(error.failures()[0].reason.contains("timed out"));
    }

    #[test]
    fn analyzer_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<BatchAnalyzer>();
    }

    #[tokio::test]
    async fn concurrency_limit_of_one_still_completes() {
        let analyzer = BatchAnalyzer::builder(Arc::new(ClassRegistry::grandqc()))
            .max_concurrency(1)
            .build();
        let sources = (0..5)
            .map(|i| mask(&format!("m{i}_mask.png"), &[1, 6]))
            .collect();

        let results = analyzer.analyze(sources).await.unwrap();
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.percentage(6) == Some(100.0)));
    }
}
