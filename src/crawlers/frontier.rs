use crate::collector::Collector;
use crate::config::CrawlConfig;
use crate::crawlers::renderer::{PageResult, RenderOptions, Renderer};
use crate::error::{ConfigError, CrawlError};
use crate::extract::Extractor;
use crate::filter::FilterChain;
use crate::parsers::parse_links;
use crate::results::EventRecord;
use crate::utils::{canonicalize, resolve_link};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Semaphore, mpsc};
use url::Url;

/// A URL scheduled for rendering at a given distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    InFlight,
    Done,
}

/// Canonical URLs already enqueued or dispatched in this run
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<String>,
}

impl VisitedSet {
    /// Returns `false` when the URL was already present
    pub fn insert(&mut self, url: &Url) -> bool {
        self.seen.insert(canonicalize(url))
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.seen.contains(&canonicalize(url))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// A page the renderer could not deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub url: String,
    pub depth: usize,
    pub error: String,
}

/// What one crawl run produced
#[derive(Debug, Default)]
pub struct CrawlSummary {
    /// Extracted events in extraction completion order
    pub records: Vec<EventRecord>,
    pub failures: Vec<FetchFailure>,
    /// Number of pages handed to the renderer
    pub dispatched: usize,
}

enum TaskEvent {
    Started(String),
    Finished(CrawlTask, PageResult),
}

/// Breadth-first scheduler for one crawl run.
///
/// Tasks of one depth are all spawned at once and gated by a semaphore sized
/// to `max_concurrency`; each reports back over a channel. The frontier loop is
/// the only writer of the visited set, the task states and the collector, and a
/// level is finished completely before the next one is dispatched.
pub struct Frontier {
    seed: Url,
    /// Host scope reference: the seed, then the seed's post-redirect URL
    origin: Url,
    max_depth: usize,
    max_concurrency: usize,
    chain: FilterChain,
    renderer: Arc<dyn Renderer>,
    extractor: Arc<Extractor>,
    options: RenderOptions,
    visited: VisitedSet,
    extracted: VisitedSet,
    states: HashMap<String, TaskState>,
    collector: Collector,
    failures: Vec<FetchFailure>,
    dispatched: usize,
}

impl Frontier {
    pub fn new(
        config: &CrawlConfig,
        renderer: Arc<dyn Renderer>,
        extractor: Arc<Extractor>,
    ) -> Result<Self, ConfigError> {
        let seed = config.seed()?;
        Ok(Self {
            origin: seed.clone(),
            seed,
            max_depth: config.max_depth,
            max_concurrency: config.max_concurrency.max(1),
            chain: config.filter_chain()?,
            renderer,
            extractor,
            options: RenderOptions::fresh(),
            visited: VisitedSet::default(),
            extracted: VisitedSet::default(),
            states: HashMap::new(),
            collector: Collector::new(),
            failures: Vec::new(),
            dispatched: 0,
        })
    }

    /// Replace the filter chain derived from the configuration
    pub fn with_filter_chain(mut self, chain: FilterChain) -> Self {
        self.chain = chain;
        self
    }

    /// Crawl from the seed until no pending or in-flight task remains
    pub async fn run(mut self) -> Result<CrawlSummary, CrawlError> {
        ::log::info!("Starting crawl at {} (max depth {})", self.seed, self.max_depth);

        let seed_task = CrawlTask {
            url: self.seed.clone(),
            depth: 0,
        };
        self.enqueue(&seed_task);

        let mut level = vec![seed_task];
        while !level.is_empty() {
            ::log::info!(
                "Dispatching {} page(s) at depth {}",
                level.len(),
                level[0].depth
            );
            level = self.run_level(level).await;
        }

        let records = self.collector.drain();
        ::log::info!(
            "Crawl finished: {} page(s) rendered, {} event(s), {} failure(s)",
            self.dispatched,
            records.len(),
            self.failures.len()
        );

        Ok(CrawlSummary {
            records,
            failures: self.failures,
            dispatched: self.dispatched,
        })
    }

    fn enqueue(&mut self, task: &CrawlTask) -> bool {
        if !self.visited.insert(&task.url) {
            return false;
        }
        self.states.insert(canonicalize(&task.url), TaskState::Pending);
        true
    }

    fn set_state(&mut self, key: String, state: TaskState) {
        self.states.insert(key, state);
    }

    /// Renders one depth level and returns the tasks discovered for the next
    async fn run_level(&mut self, tasks: Vec<CrawlTask>) -> Vec<CrawlTask> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let (event_tx, mut event_rx) = mpsc::channel::<TaskEvent>(tasks.len() * 2 + 1);
        let level_keys: Vec<(String, CrawlTask)> = tasks
            .iter()
            .map(|task| (canonicalize(&task.url), task.clone()))
            .collect();

        for task in tasks {
            self.spawn_task(task, Arc::clone(&semaphore), event_tx.clone());
        }
        drop(event_tx);

        let mut next = Vec::new();
        while let Some(event) = event_rx.recv().await {
            match event {
                TaskEvent::Started(key) => {
                    self.dispatched += 1;
                    self.set_state(key, TaskState::InFlight);
                }
                TaskEvent::Finished(task, page) => {
                    self.set_state(canonicalize(&task.url), TaskState::Done);
                    self.handle_result(task, page, &mut next);
                }
            }
        }

        // A task that panicked never reports; count it as a failed fetch
        for (key, task) in level_keys {
            if self.states.get(&key) != Some(&TaskState::Done) {
                self.record_failure(&task, "render task aborted".to_string());
                self.set_state(key, TaskState::Done);
            }
        }

        next
    }

    fn spawn_task(
        &self,
        task: CrawlTask,
        semaphore: Arc<Semaphore>,
        event_tx: mpsc::Sender<TaskEvent>,
    ) {
        let renderer = Arc::clone(&self.renderer);
        let options = self.options;

        tokio::spawn(async move {
            let Ok(permit) = semaphore.acquire_owned().await else {
                return;
            };

            ::log::debug!("Rendering {} (depth {})", task.url, task.depth);
            if event_tx
                .send(TaskEvent::Started(canonicalize(&task.url)))
                .await
                .is_err()
            {
                return;
            }

            let page = renderer.render(&task.url, &options).await;
            drop(permit);

            if let Err(e) = event_tx.send(TaskEvent::Finished(task, page)).await {
                ::log::error!("Failed to report render result: {}", e);
            }
        });
    }

    fn handle_result(&mut self, task: CrawlTask, page: PageResult, next: &mut Vec<CrawlTask>) {
        if !page.success {
            let error = page.error.unwrap_or_else(|| "unknown error".to_string());
            self.record_failure(&task, error);
            return;
        }

        // Links back to the post-redirect URL must not be dispatched again
        self.visited.insert(&page.url);

        if task.depth == 0 && page.url != self.seed {
            ::log::info!("Seed redirected to {}; using it as the crawl origin", page.url);
            self.origin = page.url.clone();
        }

        if task.depth < self.max_depth {
            self.discover_links(&task, &page, next);
            return;
        }

        // Two tasks may land on the same page after redirects
        if !self.extracted.insert(&page.url) {
            ::log::debug!("Skipping {}: {} was already extracted", task.url, page.url);
            return;
        }
        let record = self.extractor.extract(&page.html, &page.url);
        self.collector.add(record);
    }

    fn discover_links(&mut self, task: &CrawlTask, page: &PageResult, next: &mut Vec<CrawlTask>) {
        let mut accepted = 0;
        for href in parse_links(&page.html) {
            let Some(url) = resolve_link(&page.url, &href) else {
                ::log::trace!("Skipping unusable link: {}", href);
                continue;
            };
            if self.visited.contains(&url) {
                ::log::trace!("Skipping already visited or queued link: {}", url);
                continue;
            }
            if !self.chain.accepts_url(&url, &self.origin) {
                ::log::debug!("URL filter rejected: {}", url);
                continue;
            }

            let child = CrawlTask {
                url,
                depth: task.depth + 1,
            };
            if self.enqueue(&child) {
                ::log::debug!("Queuing link for crawling: {}", child.url);
                next.push(child);
                accepted += 1;
            }
        }

        ::log::info!("Found {} new page(s) on {}", accepted, page.url);
    }

    fn record_failure(&mut self, task: &CrawlTask, error: String) {
        ::log::warn!("Failed to render {}: {}", task.url, error);
        self.failures.push(FetchFailure {
            url: task.url.to_string(),
            depth: task.depth,
            error,
        });
    }
}
