use std::pin::Pin;
use std::sync::Arc;

use crate::common::MaskSource;
use crate::error::AnalysisError;
use crate::pipeline::domain::AnalysisResult;
use crate::pipeline::orchestration::mask_analyzer::MaskAnalyzer;
use futures::Future;
use futures::task::Context;
use futures::task::Poll;
use tower::{BoxError, Service};

/// Loads one mask source and analyzes it off the async executor.
#[derive(Clone)]
pub struct AnalyzerService {
    inner: Arc<MaskAnalyzer>,
}

impl AnalyzerService {
    pub fn new(inner: MaskAnalyzer) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl Service<Arc<dyn MaskSource>> for AnalyzerService {
    type Response = AnalysisResult;
    type Error = BoxError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Arc<dyn MaskSource>) -> Self::Future {
        let inner = self.inner.clone();

        Box::pin(async move {
            let input = req.load().await?;
            let filename = input.filename().to_string();

            tokio::task::spawn_blocking(move || inner.analyze(input))
                .await
                .map_err(|e| AnalysisError::Worker {
                    filename,
                    reason: e.to_string(),
                })?
                .map_err(|e| BoxError::from(AnalysisError::from(e)))
        })
    }
}
