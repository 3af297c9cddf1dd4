use glam::Vec2;

/// Map a client-space position to NDC (`x` right, `y` up, both in [-1, 1]).
/// Returns `None` for an empty viewport.
#[inline]
pub fn client_to_ndc(client: Vec2, viewport: Vec2) -> Option<Vec2> {
    if !(viewport.x > 0.0 && viewport.y > 0.0) || !client.is_finite() {
        return None;
    }
    let x = (client.x / viewport.x) * 2.0 - 1.0;
    let y = -(client.y / viewport.y) * 2.0 + 1.0;
    Some(Vec2::new(x, y).clamp(Vec2::NEG_ONE, Vec2::ONE))
}

/// Pointer positions collected by the event listener between two frames.
#[derive(Clone, Debug, Default)]
pub struct PointerQueue {
    latest: Option<Vec2>,
    moves: Vec<Vec2>,
    capacity: usize,
}

impl PointerQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            latest: None,
            moves: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, ndc: Vec2) {
        if self.moves.len() >= self.capacity {
            self.moves.remove(0);
        }
        self.moves.push(ndc);
        self.latest = Some(ndc);
    }

    /// Last known position; survives [`PointerQueue::take_moves`].
    pub fn latest(&self) -> Option<Vec2> {
        self.latest
    }

    pub fn take_moves(&mut self) -> Vec<Vec2> {
        std::mem::take(&mut self.moves)
    }
}

/// Scrollable distance of a page: document height minus the viewport, never
/// negative.
#[inline]
pub fn scroll_extent(document_height: f64, viewport_height: f64) -> f64 {
    let extent = document_height - viewport_height;
    if extent.is_finite() {
        extent.max(0.0)
    } else {
        0.0
    }
}

/// Phone/tablet user agents, or any narrow viewport.
pub fn is_mobile(user_agent: &str, viewport_width: f64, breakpoint: f64) -> bool {
    const AGENTS: [&str; 5] = ["Android", "iPhone", "iPad", "iPod", "Mobile"];
    viewport_width < breakpoint || AGENTS.iter().any(|a| user_agent.contains(a))
}

/// Decides which `pagehide` ends the page. A hide into the back/forward
/// cache (`persisted`) keeps everything running for the restore; the first
/// final hide fires once.
#[derive(Debug, Default)]
pub struct TeardownGate {
    fired: bool,
}

impl TeardownGate {
    pub fn on_pagehide(&mut self, persisted: bool) -> bool {
        if persisted || self.fired {
            return false;
        }
        self.fired = true;
        true
    }
}
