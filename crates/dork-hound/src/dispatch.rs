use crate::config::{Config, OutputFormat};
use crate::extract::extract_links;
use crate::fetch::PageFetcher;
use crate::query::expand;
use crate::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

// tokio channels can't be zero sized, one slot is the closest to a rendezvous
const HANDOFF_CAPACITY: usize = 1;

// region:        --- Models

/// A link pulled out of a result page, with the query it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundLink {
    pub url: String,
    pub site: String,
    pub page: usize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub requests: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub links_dispatched: usize,
    pub links_processed: usize,
    pub cancelled: bool,
}

// endregion:     --- Models

// region:        --- Link handlers

#[async_trait]
pub trait LinkHandler: Send + Sync {
    async fn handle(&self, worker: usize, link: FoundLink) -> Result<()>;
}

/// Print every link on stdout.
pub struct ConsoleHandler {
    output: OutputFormat,
}

impl ConsoleHandler {
    pub fn new(output: OutputFormat) -> Self {
        Self { output }
    }
}

#[async_trait]
impl LinkHandler for ConsoleHandler {
    async fn handle(&self, _worker: usize, link: FoundLink) -> Result<()> {
        match self.output {
            OutputFormat::Text => println!("Scanning URL: {}", link.url),
            OutputFormat::Json => println!("{}", serde_json::to_string(&link)?),
        }
        Ok(())
    }
}

// endregion:     --- Link handlers

pub struct Dispatcher<'a> {
    config: &'a Config,
    cancel: CancellationToken,
}

// region:        --- Constructors

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self::with_cancellation(config, CancellationToken::new())
    }

    pub fn with_cancellation(config: &'a Config, cancel: CancellationToken) -> Self {
        Self { config, cancel }
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

// endregion:     --- Constructors

impl Dispatcher<'_> {
    /// Fetch every search page one after the other and hand the links to a
    /// pool of `config.threads` workers. Returns once all workers are done.
    #[instrument(name = "dispatch", level = "info", skip_all)]
    pub async fn run(
        &self,
        fetcher: Arc<dyn PageFetcher>,
        handler: Arc<dyn LinkHandler>,
    ) -> RunSummary {
        info!(
            "Start run: {} sites x {} pages with {} workers",
            self.config.sites.len(),
            self.config.pages,
            self.config.threads
        );

        let (links_tx, links_rx) = mpsc::channel(HANDOFF_CAPACITY);
        let processed = Arc::new(AtomicUsize::new(0));

        let workers = self.launch_workers(handler, links_rx, processed.clone());

        // the sender is consumed, the channel closes when the producer returns
        let mut summary = self.produce(fetcher.as_ref(), links_tx).await;

        info!("Waiting workers");
        for res in join_all(workers).await {
            if let Err(err) = res {
                error!("Worker stopped abnormally: {}", err);
            }
        }

        summary.links_processed = processed.load(Ordering::SeqCst);
        info!("Finalized: {:?}", summary);
        summary
    }

    #[instrument(name = "workers", level = "info", skip_all)]
    fn launch_workers(
        &self,
        handler: Arc<dyn LinkHandler>,
        links_rx: mpsc::Receiver<FoundLink>,
        processed: Arc<AtomicUsize>,
    ) -> Vec<JoinHandle<()>> {
        let links_rx = Arc::new(Mutex::new(links_rx));
        info!("Launching {}", self.config.threads);

        (0..self.config.threads)
            .map(|worker| {
                let links_rx = links_rx.clone();
                let handler = handler.clone();
                let processed = processed.clone();

                let worker_loop = async move {
                    loop {
                        // release the receiver before processing
                        let next = links_rx.lock().await.recv().await;
                        let Some(link) = next else {
                            break;
                        };

                        debug!("worker {} processing {}", worker, link.url);
                        if let Err(err) = handler.handle(worker, link).await {
                            error!("worker {}: {}", worker, err);
                        }
                        processed.fetch_add(1, Ordering::SeqCst);
                    }
                    debug!("worker {} terminated", worker);
                };

                tokio::spawn(worker_loop.instrument(info_span!("worker", id = worker)))
            })
            .collect()
    }

    #[instrument(name = "producer", level = "info", skip_all)]
    async fn produce(
        &self,
        fetcher: &dyn PageFetcher,
        links_tx: mpsc::Sender<FoundLink>,
    ) -> RunSummary {
        let config = self.config;
        let mut summary = RunSummary::default();

        'requests: for request in expand(config.engine, &config.dork, &config.sites, config.pages)
        {
            let res = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    warn!("Cancelled, no more requests");
                    summary.cancelled = true;
                    break 'requests;
                }
                res = fetcher.fetch(&request.url) => res,
            };
            summary.requests += 1;

            let html = match res {
                Ok(html) => html,
                Err(err) => {
                    error!(
                        "Error fetching results for {} page {}: {}",
                        request.site, request.page, err
                    );
                    summary.pages_failed += 1;
                    continue;
                }
            };
            summary.pages_fetched += 1;

            let links = extract_links(&html);
            info!(
                "{} links found for {} page {}",
                links.len(),
                request.site,
                request.page
            );

            for url in links {
                let link = FoundLink {
                    url,
                    site: request.site.clone(),
                    page: request.page,
                };

                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => {
                        warn!("Cancelled while queuing links");
                        summary.cancelled = true;
                        break 'requests;
                    }
                    sent = links_tx.send(link) => {
                        if sent.is_err() {
                            error!("No worker left to receive links");
                            break 'requests;
                        }
                        summary.links_dispatched += 1;
                    }
                }
            }
        }

        summary
    }
}
