/// Reusable per-query working memory: the candidate buffer a grid query
/// fills and the raycaster consumes.
#[derive(Debug, Default)]
pub struct QueryScratch {
    /// Candidate mesh ids from the broad phase. Cleared on restore.
    pub candidates: Vec<terrella_scene::MeshId>,
}

/// Fixed-size pool of [`QueryScratch`] objects.
///
/// Raycasts run every frame; allocating a fresh candidate vector per cast
/// creates steady transient garbage and, eventually, collection pauses in
/// the host. The pool keeps a small set of buffers alive across frames.
///
/// Contract: `checkout` transfers ownership to the caller; `restore` clears
/// the buffer and returns it to the pool. A scratch restored to a full pool
/// is dropped. If the pool is empty, `checkout` falls back to a fresh
/// allocation rather than blocking the frame.
#[derive(Debug)]
pub struct ScratchPool {
    free: Vec<QueryScratch>,
    capacity: usize,
}

impl ScratchPool {
    /// Pool holding at most `capacity` scratches, all pre-allocated.
    pub fn new(capacity: usize) -> Self {
        let free = (0..capacity)
            .map(|_| QueryScratch {
                candidates: Vec::with_capacity(32),
            })
            .collect();
        Self { free, capacity }
    }

    /// Take a scratch out of the pool (or allocate if drained).
    pub fn checkout(&mut self) -> QueryScratch {
        self.free.pop().unwrap_or_default()
    }

    /// Clear a scratch and return it to the pool.
    pub fn restore(&mut self, mut scratch: QueryScratch) {
        if self.free.len() < self.capacity {
            scratch.candidates.clear();
            self.free.push(scratch);
        }
    }

    /// Number of scratches currently available.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

impl Default for ScratchPool {
    fn default() -> Self {
        Self::new(4)
    }
}
