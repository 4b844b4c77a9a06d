use std::collections::{HashSet, VecDeque};

/// A queued unit of work: a URL and how many hops it is from a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierItem {
    pub url: String,
    pub depth: usize,
}

impl FrontierItem {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// FIFO work queue plus the visited set for one crawl run.
///
/// `push` filters over-depth and already-visited URLs as an optimisation;
/// the authoritative gate is [`Frontier::claim`], applied at dequeue time.
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierItem>,
    visited: HashSet<String>,
    max_depth: usize,
}

impl Frontier {
    pub fn new(max_depth: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            max_depth,
        }
    }

    /// Enqueue every seed at depth 0, duplicates included.
    pub fn seed<I, S>(&mut self, urls: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for url in urls {
            self.queue.push_back(FrontierItem::new(url, 0));
        }
    }

    /// Enqueue `url` unless it is already visited or deeper than the limit.
    /// Returns whether the item was queued.
    pub fn push(&mut self, url: &str, depth: usize) -> bool {
        if depth > self.max_depth || self.visited.contains(url) {
            return false;
        }
        self.queue.push_back(FrontierItem::new(url, depth));
        true
    }

    pub fn pop(&mut self) -> Option<FrontierItem> {
        self.queue.pop_front()
    }

    /// Mark an item's URL visited if it may be processed.
    ///
    /// Returns `false` for items deeper than `max_depth` or whose URL was
    /// already claimed; those must be discarded by the caller.
    pub fn claim(&mut self, item: &FrontierItem) -> bool {
        if item.depth > self.max_depth {
            return false;
        }
        self.visited.insert(item.url.clone())
    }

    /// Pop and claim everything currently queued.
    ///
    /// Under FIFO order the queue only ever holds one BFS level at the
    /// moment the previous level's results have been applied, so the
    /// returned batch is exactly the next level, in discovery order.
    pub fn claim_level(&mut self) -> Vec<FrontierItem> {
        let pending = self.queue.len();
        let mut batch = Vec::with_capacity(pending);

        for _ in 0..pending {
            if let Some(item) = self.pop()
                && self.claim(&item)
            {
                batch.push(item);
            }
        }

        batch
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}
