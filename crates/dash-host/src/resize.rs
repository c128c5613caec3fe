// ABOUTME: Shared resize-observation registry.
// ABOUTME: One underlying watch per region, fanned out to every subscribed callback.

use std::collections::HashMap;
use std::hash::Hash;

use dash_core::Size;

/// Platform hook that actually watches regions for size changes.
pub trait ResizeWatcher<R> {
    fn watch(&mut self, region: &R);
    fn unwatch(&mut self, region: &R);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ResizeCallback = Box<dyn FnMut(Size)>;

struct Region {
    subscribers: Vec<(SubscriptionId, ResizeCallback)>,
    last: Option<Size>,
}

/// Reference-counted resize subscriptions keyed by region handle.
pub struct ResizeRegistry<R, W> {
    watcher: W,
    regions: HashMap<R, Region>,
    owners: HashMap<SubscriptionId, R>,
    next_id: u64,
}

impl<R, W> ResizeRegistry<R, W>
where
    R: Eq + Hash + Clone,
    W: ResizeWatcher<R>,
{
    pub fn new(watcher: W) -> Self {
        Self {
            watcher,
            regions: HashMap::new(),
            owners: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn watcher(&self) -> &W {
        &self.watcher
    }

    /// Register `callback` for size changes of `region`.
    ///
    /// The first subscriber starts the underlying watch. A late subscriber is
    /// immediately told the last known size, if any.
    pub fn subscribe(
        &mut self,
        region: R,
        callback: impl FnMut(Size) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let mut callback: ResizeCallback = Box::new(callback);
        if !self.regions.contains_key(&region) {
            self.watcher.watch(&region);
        }
        let entry = self.regions.entry(region.clone()).or_insert_with(|| Region {
            subscribers: Vec::new(),
            last: None,
        });
        if let Some(size) = entry.last {
            callback(size);
        }
        entry.subscribers.push((id, callback));
        self.owners.insert(id, region);
        id
    }

    /// Stop delivery to one subscriber. Returns false for unknown ids.
    ///
    /// Removing the last subscriber of a region stops watching it.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let Some(region) = self.owners.remove(&id) else {
            return false;
        };
        let Some(entry) = self.regions.get_mut(&region) else {
            return false;
        };
        entry.subscribers.retain(|(sub, _)| *sub != id);
        if entry.subscribers.is_empty() {
            self.regions.remove(&region);
            self.watcher.unwatch(&region);
        }
        true
    }

    /// Report a new measurement for `region`; returns how many callbacks ran.
    ///
    /// Measurements equal to the previous one for the region are dropped.
    pub fn deliver(&mut self, region: &R, size: Size) -> usize {
        let Some(entry) = self.regions.get_mut(region) else {
            return 0;
        };
        if entry.last == Some(size) {
            return 0;
        }
        entry.last = Some(size);
        for (_, callback) in entry.subscribers.iter_mut() {
            callback(size);
        }
        entry.subscribers.len()
    }

    pub fn is_watching(&self, region: &R) -> bool {
        self.regions.contains_key(region)
    }

    pub fn subscriber_count(&self, region: &R) -> usize {
        self.regions
            .get(region)
            .map_or(0, |entry| entry.subscribers.len())
    }

    pub fn watched_regions(&self) -> usize {
        self.regions.len()
    }
}
