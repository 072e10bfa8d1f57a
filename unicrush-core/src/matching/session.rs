use rand::Rng;

use crate::models::UserId;

/// Per-viewer browsing state: three disjoint candidate pools plus the
/// recycle buffer that carries re-shown disliked profiles into the next
/// pass. Lives for as long as the viewer keeps browsing; a filter edit or
/// profile deletion drops it.
#[derive(Debug, Default)]
pub struct BrowseSession {
    pub(crate) loaded: bool,
    /// Eligible candidates the viewer has not reacted to.
    pub(crate) fresh: Vec<UserId>,
    /// Eligible candidates the viewer disliked earlier.
    pub(crate) revisit: Vec<UserId>,
    /// Disliked candidates already re-shown this pass; they re-enter `fresh`
    /// once `revisit` drains, not before.
    pub(crate) recycled: Vec<UserId>,
    /// Already-liked candidates, shown only when nothing else remains.
    pub(crate) fallback: Vec<UserId>,
}

impl BrowseSession {
    pub(crate) fn install(
        &mut self,
        fresh: Vec<UserId>,
        revisit: Vec<UserId>,
        fallback: Vec<UserId>,
    ) {
        self.fresh = fresh;
        self.revisit = revisit;
        self.fallback = fallback;
        self.recycled.clear();
        self.loaded = true;
    }
}

/// Uniform random O(1) pop: draw an index, swap_remove it.
pub(crate) fn pop_random(pool: &mut Vec<UserId>) -> Option<UserId> {
    if pool.is_empty() {
        return None;
    }
    let idx = rand::thread_rng().gen_range(0..pool.len());
    Some(pool.swap_remove(idx))
}
