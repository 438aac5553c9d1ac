use slidepanel_core::Point;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// Raw pointer sample delivered by the host event loop.
///
/// `position` is absolute in screen space; deltas are derived by the consumer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
    pub timestamp_ms: i64,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Point, timestamp_ms: i64) -> Self {
        Self {
            id: 0,
            kind,
            position,
            timestamp_ms,
        }
    }

    pub fn down(position: Point, timestamp_ms: i64) -> Self {
        Self::new(PointerEventKind::Down, position, timestamp_ms)
    }

    pub fn moved(position: Point, timestamp_ms: i64) -> Self {
        Self::new(PointerEventKind::Move, position, timestamp_ms)
    }

    pub fn up(position: Point, timestamp_ms: i64) -> Self {
        Self::new(PointerEventKind::Up, position, timestamp_ms)
    }

    pub fn cancel(position: Point, timestamp_ms: i64) -> Self {
        Self::new(PointerEventKind::Cancel, position, timestamp_ms)
    }

    pub fn with_id(mut self, id: PointerId) -> Self {
        self.id = id;
        self
    }
}
